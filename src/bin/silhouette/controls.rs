//! Media controls via the terminal window title.

use std::io::stdout;

use crossterm::{execute, terminal::SetTitle};
use tracing::debug;

use silhouette::{MediaControls, TrackMetadata};

pub struct TerminalTitle {
    title: Option<String>,
    playing: bool,
}

impl TerminalTitle {
    pub fn new() -> Self {
        Self {
            title: None,
            playing: false,
        }
    }

    fn refresh(&self) {
        let text = match &self.title {
            Some(title) if self.playing => format!("▶ {title}"),
            Some(title) => format!("⏸ {title}"),
            None => "silhouette".to_string(),
        };
        if let Err(err) = execute!(stdout(), SetTitle(text)) {
            debug!(%err, "could not set terminal title");
        }
    }
}

impl MediaControls for TerminalTitle {
    fn set_metadata(&mut self, metadata: Option<&TrackMetadata>) {
        self.title = metadata.map(|m| m.title.clone());
        self.refresh();
    }

    fn set_playback_state(&mut self, playing: bool) {
        self.playing = playing;
        self.refresh();
    }
}
