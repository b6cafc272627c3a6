//! Silhouette widget
//!
//! Draws the alpha raster with upper half blocks: each terminal cell holds
//! two raster rows, the top one in the foreground color and the bottom one
//! in the background color.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    widgets::{Block, Borders, Widget},
    Frame,
};

use silhouette::visual::Raster;

/// Fill color at full opacity.
const ACCENT: (u8, u8, u8) = (120, 200, 255);

fn block() -> Block<'static> {
    Block::default().title(" Silhouette ").borders(Borders::ALL)
}

/// Drawable area inside the border, in cells.
pub fn inner(area: Rect) -> Rect {
    block().inner(area)
}

/// Blend the accent over black.
fn shade(alpha: f32) -> Color {
    let a = alpha.clamp(0.0, 1.0);
    let (r, g, b) = ACCENT;
    Color::Rgb(
        (r as f32 * a) as u8,
        (g as f32 * a) as u8,
        (b as f32 * a) as u8,
    )
}

struct SilhouetteView<'a> {
    raster: &'a Raster,
}

impl Widget for SilhouetteView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for row in 0..area.height {
            for col in 0..area.width {
                let x = col as usize;
                let y = row as usize * 2;
                let top = shade(self.raster.alpha(x, y));
                let bottom = shade(self.raster.alpha(x, y + 1));

                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_char('▀').set_fg(top).set_bg(bottom);
                }
            }
        }
    }
}

/// Render the silhouette view
pub fn render_silhouette(frame: &mut Frame, area: Rect, raster: Option<&Raster>) {
    let block = block();
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let Some(raster) = raster {
        frame.render_widget(SilhouetteView { raster }, inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shade_scales_the_accent() {
        assert_eq!(shade(0.0), Color::Rgb(0, 0, 0));
        assert_eq!(shade(1.0), Color::Rgb(120, 200, 255));
        assert_eq!(shade(2.0), shade(1.0));
    }
}
