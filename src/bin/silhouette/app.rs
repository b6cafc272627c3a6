//! Event loop: drives the player, draws frames, maps keys to requests.

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{DefaultTerminal, Frame};
use tracing::warn;

use silhouette::{Player, PlayerError};

use crate::ui::{self, TransportView};

/// Seconds moved by the arrow keys.
const SKIP_SECONDS: f64 = 5.0;

pub struct App {
    player: Player,
    /// Highlighted playlist row
    selected: usize,
    /// Last error, shown in the help bar until the next key press
    status: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(player: Player) -> Self {
        Self {
            player,
            selected: 0,
            status: None,
            should_quit: false,
        }
    }

    pub fn run(mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        let frame_interval = self.player.config().frame_interval;

        while !self.should_quit {
            if let Err(err) = self.player.poll() {
                self.report(err);
            }

            terminal.draw(|frame| self.render(frame))?;

            // Non-blocking, one tick per display frame
            if event::poll(frame_interval)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        self.player.shutdown();
        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode) {
        self.status = None;
        let len = self.player.playlist().len();

        let result = match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
                Ok(())
            }
            KeyCode::Char(' ') => self.player.toggle_playback(),
            KeyCode::Char('n') => self.player.next_song(),
            KeyCode::Char('p') => self.player.previous_song(),
            KeyCode::Left => {
                self.player.skip_time(-SKIP_SECONDS);
                Ok(())
            }
            KeyCode::Right => {
                self.player.skip_time(SKIP_SECONDS);
                Ok(())
            }
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                Ok(())
            }
            KeyCode::Down => {
                self.selected = (self.selected + 1).min(len.saturating_sub(1));
                Ok(())
            }
            KeyCode::Enter if len > 0 => self.player.play_song(self.selected),
            KeyCode::Char('d') => {
                if let Some(id) = self.player.playlist().get(self.selected).map(|s| s.id) {
                    self.player.delete_song(id);
                    self.selected = self.selected.min(self.player.playlist().len().saturating_sub(1));
                }
                Ok(())
            }
            _ => Ok(()),
        };

        if let Err(err) = result {
            self.report(err);
        }
    }

    fn report(&mut self, err: PlayerError) {
        warn!(%err, "request failed");
        self.status = Some(err.to_string());
    }

    fn render(&mut self, frame: &mut Frame) {
        let [transport, view, playlist, help] = ui::layout(frame.area());

        // Two raster rows per terminal cell (half blocks)
        let inner = ui::visualizer::inner(view);
        self.player
            .visualizer_mut()
            .resize(inner.width as usize, inner.height as usize * 2);
        self.player.animation_frame();

        let song = self.player.current_song();
        ui::transport::render_transport(
            frame,
            transport,
            &TransportView {
                state: self.player.state(),
                title: song.map(|s| s.title.as_str()),
                position: self.player.current_time(),
                duration: self.player.duration(),
            },
        );
        ui::visualizer::render_silhouette(frame, view, self.player.visualizer().surface());
        ui::playlist::render_playlist(
            frame,
            playlist,
            self.player.playlist().songs(),
            self.player.current_index(),
            self.selected,
        );
        ui::render_help(frame, help, self.status.as_deref());
    }
}
