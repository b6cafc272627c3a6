//! Error type shared by the player, the decoder and the output backends.

use std::path::PathBuf;

use crate::io::media::MediaUrl;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, PlayerError>;

#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode {path:?}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("no playable audio track in {0:?}")]
    NoAudioTrack(PathBuf),

    #[error("no default output device available")]
    NoOutputDevice,

    #[error("unsupported output sample format: {0}")]
    UnsupportedSampleFormat(String),

    /// Opening the device or building the stream failed.
    #[error("audio backend error: {0}")]
    Backend(String),

    /// The output device could not be opened; the next play retries.
    #[error("audio output is unavailable")]
    GraphUnavailable,

    #[error("playback context is closed")]
    ContextClosed,

    #[error("media url {0} is not registered")]
    UnknownMedia(MediaUrl),

    #[error("song index {index} out of range (playlist has {len} songs)")]
    SongIndexOutOfRange { index: usize, len: usize },

    #[error("no source loaded")]
    NoSource,

    #[error("invalid analyser configuration: {0}")]
    InvalidAnalyser(String),
}
