//! Playlist widget

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use silhouette::Song;

/// Render the playlist, keeping the selected row in view
pub fn render_playlist(
    frame: &mut Frame,
    area: Rect,
    songs: &[Song],
    current: Option<usize>,
    selected: usize,
) {
    let block = Block::default()
        .title(format!(" Playlist ({}) ", songs.len()))
        .borders(Borders::ALL);
    let visible = block.inner(area).height as usize;

    let first = selected.saturating_sub(visible.saturating_sub(1));
    let lines: Vec<Line> = songs
        .iter()
        .enumerate()
        .skip(first)
        .take(visible)
        .map(|(i, song)| {
            let marker = if current == Some(i) { "▶ " } else { "  " };
            let mut style = Style::default().fg(if current == Some(i) {
                Color::Green
            } else {
                Color::White
            });
            if i == selected {
                style = style.add_modifier(Modifier::REVERSED);
            }
            Line::from(Span::styled(format!("{marker}{:>3}. {}", i + 1, song.title), style))
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
