//! Playback control: the output graph, the playlist, fades, and the
//! player that coordinates them with the render loop.

pub mod controls;
pub mod graph;
pub mod player;
pub mod playlist;
pub mod transition;

pub use controls::{MediaAction, MediaControls, NoMediaControls, TrackMetadata};
pub use graph::{GraphManager, PlaybackGraph};
pub use player::Player;
pub use playlist::{Playlist, Removal, Song, SongId};
pub use transition::{Transition, TransitionEvent, TransitionState};
