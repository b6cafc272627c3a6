//! Frequency-domain silhouette: sampling, shaping and drawing one frame.

pub mod path;
pub mod render_loop;
pub mod renderer;
pub mod sampler;
pub mod surface;

use tracing::trace;

use crate::{
    config::PlayerConfig,
    dsp::curve::{map_to_display_points, DisplayPoint, DISPLAY_POINTS},
    playback::graph::PlaybackGraph,
};

pub use path::{Path, PathCommand, Point};
pub use render_loop::{FrameHandle, RenderLoop};
pub use renderer::SilhouetteRenderer;
pub use sampler::{FrequencySampler, FrequencySnapshot};
pub use surface::{Raster, Surface, VerticalGradient};

/*
One Frame
=========

    PlaybackGraph ─→ FrequencySampler ─→ curve mapper ─→ SilhouetteRenderer ─→ Raster
                     (bytes, reused)     (181 points)    (smooth, path, fill)

Every buffer on this path is allocated once and overwritten per frame.
*/

pub struct Visualizer {
    sampler: FrequencySampler,
    renderer: SilhouetteRenderer,
    points: [DisplayPoint; DISPLAY_POINTS],
    surface: Option<Raster>,
}

impl Visualizer {
    pub fn new(config: &PlayerConfig) -> Self {
        Self {
            sampler: FrequencySampler::new(),
            renderer: SilhouetteRenderer::new(config.smoothing_passes, config.peak_opacity),
            points: [DisplayPoint::default(); DISPLAY_POINTS],
            surface: None,
        }
    }

    pub fn attach_surface(&mut self, width: usize, height: usize) {
        self.surface = Some(Raster::new(width, height));
    }

    /// Resize the attached surface, attaching one if there is none.
    pub fn resize(&mut self, width: usize, height: usize) {
        match self.surface.as_mut() {
            Some(raster) if raster.size() == (width, height) => {}
            Some(raster) => raster.resize(width, height),
            None => self.attach_surface(width, height),
        }
    }

    pub fn surface(&self) -> Option<&Raster> {
        self.surface.as_ref()
    }

    pub fn clear(&mut self) {
        if let Some(raster) = self.surface.as_mut() {
            raster.clear();
        }
    }

    /// Sample, map and draw one frame. Returns false when the frame was skipped.
    pub fn draw_frame(&mut self, graph: Option<&mut PlaybackGraph>) -> bool {
        let Some(raster) = self.surface.as_mut() else {
            trace!("no surface attached, skipping frame");
            return false;
        };
        let (width, height) = raster.size();
        if width == 0 || height == 0 {
            trace!("zero-size surface, skipping frame");
            return false;
        }

        let snapshot = self.sampler.sample(graph);
        map_to_display_points(
            &snapshot.bins,
            snapshot.sample_rate,
            width as f32,
            height as f32,
            &mut self.points,
        );
        self.renderer.render(&mut self.points, raster);
        true
    }

    pub fn points(&self) -> &[DisplayPoint; DISPLAY_POINTS] {
        &self.points
    }

    pub fn snapshot(&self) -> &FrequencySnapshot {
        self.sampler.snapshot()
    }
}
