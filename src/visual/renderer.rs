use crate::{
    dsp::{curve::DisplayPoint, smoothing},
    visual::{
        path::{build_silhouette, Path},
        surface::{Surface, VerticalGradient},
    },
};

/// Turns display points into a filled, mirrored silhouette.
#[derive(Debug, Clone)]
pub struct SilhouetteRenderer {
    passes: usize,
    peak_opacity: f32,
    path: Path,
}

impl SilhouetteRenderer {
    pub fn new(passes: usize, peak_opacity: f32) -> Self {
        Self {
            passes,
            peak_opacity: peak_opacity.clamp(0.0, 1.0),
            path: Path::new(),
        }
    }

    /// Clear the surface, smooth `points` in place, then fill the silhouette.
    pub fn render(&mut self, points: &mut [DisplayPoint], surface: &mut dyn Surface) {
        surface.clear();

        let (width, height) = surface.size();
        if width == 0 || height == 0 || points.is_empty() {
            return;
        }

        smoothing::smooth(points, self.passes);

        let (width, height) = (width as f32, height as f32);
        build_silhouette(points, width, height, &mut self.path);
        surface.fill_path(&self.path, &VerticalGradient::centered(height, self.peak_opacity));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::curve::DISPLAY_POINTS;
    use crate::visual::surface::Raster;

    fn hump(width: f32, height: f32) -> Vec<DisplayPoint> {
        (0..DISPLAY_POINTS)
            .map(|i| {
                let t = i as f32 / (DISPLAY_POINTS - 1) as f32;
                DisplayPoint {
                    x: width * t,
                    y: height * 0.25 * (std::f32::consts::PI * t).sin(),
                }
            })
            .collect()
    }

    #[test]
    fn draws_a_symmetric_silhouette() {
        let mut raster = Raster::new(90, 40);
        let mut renderer = SilhouetteRenderer::new(3, 0.9);
        let mut points = hump(90.0, 40.0);
        renderer.render(&mut points, &mut raster);

        assert!(raster.alpha(45, 20) > 0.0, "center is filled");
        assert_eq!(raster.alpha(45, 0), 0.0, "top stays empty");
        for y in 0..20 {
            for x in 0..90 {
                assert_eq!(raster.alpha(x, y), raster.alpha(x, 39 - y), "({x}, {y})");
            }
        }
    }

    #[test]
    fn flat_points_leave_the_surface_empty() {
        let mut raster = Raster::new(90, 40);
        let mut renderer = SilhouetteRenderer::new(3, 0.9);
        let mut points: Vec<DisplayPoint> = (0..DISPLAY_POINTS)
            .map(|i| DisplayPoint {
                x: i as f32 * 0.5,
                y: 0.0,
            })
            .collect();
        renderer.render(&mut points, &mut raster);
        assert!(raster.is_blank());
    }

    #[test]
    fn previous_frame_is_cleared() {
        let mut raster = Raster::new(90, 40);
        let mut renderer = SilhouetteRenderer::new(0, 0.9);
        renderer.render(&mut hump(90.0, 40.0), &mut raster);
        assert!(!raster.is_blank());

        let mut silent = vec![DisplayPoint::default(); DISPLAY_POINTS];
        renderer.render(&mut silent, &mut raster);
        assert!(raster.is_blank());
    }
}
