pub mod config;
pub mod dsp; // Analysis math: FFT magnitudes, curve shaping, smoothing
pub mod error;
pub mod graph; // Playback chain nodes rendered by the output callback
pub mod io;
pub mod playback; // Player, playlist and fade transitions
pub mod visual; // Silhouette sampling and drawing

pub use config::{AnalyserConfig, PlayerConfig};
pub use error::{PlayerError, Result};
pub use playback::{
    MediaAction, MediaControls, NoMediaControls, Player, Song, SongId, TrackMetadata,
    TransitionState,
};

pub const MAX_BLOCK_SIZE: usize = 2048;
