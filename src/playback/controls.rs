//! Hooks for system media controls (hardware keys, OS overlays, window titles).

/// Requests a media control surface can send to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaAction {
    Play,
    Pause,
    TogglePlayback,
    Next,
    Previous,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackMetadata {
    pub title: String,
    /// Position in the playlist, zero-based.
    pub index: usize,
    pub total: usize,
}

/// Receives player state for display by an external media control surface.
pub trait MediaControls {
    /// `None` when no track is current.
    fn set_metadata(&mut self, metadata: Option<&TrackMetadata>);

    fn set_playback_state(&mut self, playing: bool);
}

/// Used when no media control integration is available.
#[derive(Debug, Default)]
pub struct NoMediaControls;

impl MediaControls for NoMediaControls {
    fn set_metadata(&mut self, _metadata: Option<&TrackMetadata>) {}

    fn set_playback_state(&mut self, _playing: bool) {}
}
