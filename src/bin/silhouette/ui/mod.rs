//! TUI layout and widgets for silhouette.

pub mod playlist;
pub mod transport;
pub mod visualizer;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

pub use transport::TransportView;

/// Split the screen into transport bar, silhouette view, playlist, help bar.
pub fn layout(area: Rect) -> [Rect; 4] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),      // Transport bar
            Constraint::Min(8),         // Silhouette
            Constraint::Percentage(30), // Playlist
            Constraint::Length(1),      // Help bar
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2], chunks[3]]
}

/// Key help, or the last error when there is one.
pub fn render_help(frame: &mut Frame, area: Rect, status: Option<&str>) {
    let help = match status {
        Some(message) => Paragraph::new(format!(" ! {message}"))
            .style(Style::default().fg(Color::Red)),
        None => Paragraph::new(
            " [Space] Play/Pause  [N/P] Next/Prev  [←/→] Seek  [↑/↓] Select  [Enter] Play  [D] Delete  [Q] Quit",
        )
        .style(Style::default().fg(Color::DarkGray)),
    };
    frame.render_widget(help, area);
}
