//! Nodes of the playback chain.
//!
//! The chain is fixed: media source, then gain, then the analyser tap. Each
//! node implements `GraphNode` and transforms an interleaved block in place.

/// Lock-free tap feeding the UI-side frequency analyser.
pub mod analyser;
/// The assembled chain and the audio clock.
pub mod chain;
/// Gain stage driven by a scheduled fade curve.
pub mod gain;
/// Core traits shared by all graph nodes.
pub mod node;
/// Decoded media playback with rate conversion.
pub mod source;

pub use analyser::{analyser_pair, AnalyserNode, AnalyserTap};
pub use chain::{OutputFormat, SharedChain, SignalChain};
pub use gain::GainNode;
pub use node::{GraphNode, RenderCtx};
pub use source::MediaElement;
