//! Transport bar widget - shows play state, title, position, and progress

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use silhouette::TransitionState;

/// What the transport bar shows for one frame.
pub struct TransportView<'a> {
    pub state: TransitionState,
    pub title: Option<&'a str>,
    pub position: f64,
    pub duration: f64,
}

/// Format seconds as m:ss
fn clock(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Render the transport bar
pub fn render_transport(frame: &mut Frame, area: Rect, view: &TransportView) {
    let block = Block::default().title(" silhouette ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(inner);

    let (symbol, label, color) = match view.state {
        TransitionState::Playing => ("▶", "Playing", Color::Green),
        TransitionState::FadingIn => ("▶", "Fading in", Color::Green),
        TransitionState::FadingOut => ("⏸", "Fading out", Color::Yellow),
        TransitionState::Paused => ("⏸", "Paused", Color::Yellow),
        TransitionState::Stopped => ("■", "Stopped", Color::DarkGray),
    };

    let line = Line::from(vec![
        Span::styled(format!(" {symbol} {label}  "), Style::default().fg(color)),
        Span::styled(
            view.title.unwrap_or("-").to_string(),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("  {} / {}", clock(view.position), clock(view.duration)),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), chunks[0]);

    let ratio = if view.duration > 0.0 {
        (view.position / view.duration).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Magenta))
        .ratio(ratio)
        .label("");
    frame.render_widget(gauge, chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_formats_minutes_and_seconds() {
        assert_eq!(clock(0.0), "0:00");
        assert_eq!(clock(65.9), "1:05");
        assert_eq!(clock(-3.0), "0:00");
    }
}
