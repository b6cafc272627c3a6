use crate::visual::path::{Path, Point};

/*
Drawing Surface
===============

The renderer draws onto anything that implements `Surface`. The built-in
`Raster` is a plain alpha-coverage grid: one f32 per pixel, 0.0 = empty,
1.0 = fully opaque. The front end turns it into colored terminal cells.

Gradient
--------

The silhouette fill fades toward the top and bottom edges:

    alpha
     0.9 ┤          ╱╲
         │        ╱    ╲
         │      ╱        ╲
     0.0 ┼────╱────────────╲────
         0       h/2        h      y

Alpha is a linear function of the distance from the vertical center, so
the fill is symmetric and always centered on the surface regardless of
how tall the current silhouette is.

Filling
-------

Paths are flattened into polygons and filled with the even-odd rule by
scanline: for each pixel row, intersect the row's center line with every
polygon edge, sort the crossings, and fill between pairs.
*/

/// Line segments per quadratic curve when flattening.
const CURVE_SEGMENTS: usize = 4;

/// Vertical linear gradient, symmetric about the surface center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalGradient {
    height: f32,
    peak: f32,
}

impl VerticalGradient {
    /// Alpha 0 at top and bottom, `peak` at the center of a `height`-tall surface.
    pub fn centered(height: f32, peak: f32) -> Self {
        Self {
            height,
            peak: peak.clamp(0.0, 1.0),
        }
    }

    pub fn alpha_at(&self, y: f32) -> f32 {
        if self.height <= 0.0 {
            return 0.0;
        }
        let center = self.height / 2.0;
        let distance = ((y - center).abs() / center).min(1.0);
        self.peak * (1.0 - distance)
    }
}

/// Something the silhouette can be drawn onto.
pub trait Surface {
    /// Size in pixels as (width, height).
    fn size(&self) -> (usize, usize);

    /// Wipe the previous frame.
    fn clear(&mut self);

    /// Fill a closed path with the gradient.
    fn fill_path(&mut self, path: &Path, gradient: &VerticalGradient);
}

/// Alpha coverage grid, row-major.
#[derive(Debug, Clone, Default)]
pub struct Raster {
    width: usize,
    height: usize,
    alpha: Vec<f32>,
    outline: Vec<Point>,
    crossings: Vec<f32>,
}

impl Raster {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            alpha: vec![0.0; width * height],
            outline: Vec::new(),
            crossings: Vec::new(),
        }
    }

    /// Change the pixel size. Contents are cleared.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.alpha.clear();
        self.alpha.resize(width * height, 0.0);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Coverage at (x, y), or 0.0 outside the raster.
    pub fn alpha(&self, x: usize, y: usize) -> f32 {
        if x >= self.width || y >= self.height {
            return 0.0;
        }
        self.alpha[y * self.width + x]
    }

    pub fn is_blank(&self) -> bool {
        self.alpha.iter().all(|&a| a == 0.0)
    }
}

impl Surface for Raster {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.alpha.fill(0.0);
    }

    fn fill_path(&mut self, path: &Path, gradient: &VerticalGradient) {
        if self.width == 0 || self.height == 0 {
            return;
        }

        self.outline.clear();
        path.flatten(CURVE_SEGMENTS, &mut self.outline);
        if self.outline.len() < 3 {
            return;
        }

        for row in 0..self.height {
            let y = row as f32 + 0.5;

            self.crossings.clear();
            let n = self.outline.len();
            for i in 0..n {
                let a = self.outline[i];
                let b = self.outline[(i + 1) % n];
                // Half-open so a vertex shared by two edges counts once.
                if (a.y <= y) != (b.y <= y) {
                    let t = (y - a.y) / (b.y - a.y);
                    self.crossings.push(a.x + (b.x - a.x) * t);
                }
            }
            self.crossings.sort_by(f32::total_cmp);

            let alpha = gradient.alpha_at(y);
            let line = &mut self.alpha[row * self.width..(row + 1) * self.width];
            for span in self.crossings.chunks_exact(2) {
                let start = (span[0] - 0.5).ceil().max(0.0) as usize;
                let end = ((span[1] - 0.5).floor() + 1.0).max(0.0) as usize;
                for pixel in line.iter_mut().take(end.min(self.width)).skip(start) {
                    *pixel = alpha;
                }
            }
        }
    }
}
