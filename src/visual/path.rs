//! Vector path for the mirrored silhouette.

use crate::dsp::curve::DisplayPoint;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn lerp(self, other: Point, t: f32) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    QuadTo { ctrl: Point, to: Point },
    Close,
}

#[derive(Debug, Clone, Default)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn move_to(&mut self, to: Point) {
        self.commands.push(PathCommand::MoveTo(to));
    }

    pub fn line_to(&mut self, to: Point) {
        self.commands.push(PathCommand::LineTo(to));
    }

    pub fn quad_to(&mut self, ctrl: Point, to: Point) {
        self.commands.push(PathCommand::QuadTo { ctrl, to });
    }

    pub fn close(&mut self) {
        self.commands.push(PathCommand::Close);
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Approximate the path by a polygon, splitting each quadratic segment
    /// into `segments` lines. Appends to `out`.
    pub fn flatten(&self, segments: usize, out: &mut Vec<Point>) {
        let segments = segments.max(1);
        let mut pen = Point::default();

        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(to) | PathCommand::LineTo(to) => {
                    out.push(to);
                    pen = to;
                }
                PathCommand::QuadTo { ctrl, to } => {
                    for s in 1..=segments {
                        let t = s as f32 / segments as f32;
                        let a = pen.lerp(ctrl, t);
                        let b = ctrl.lerp(to, t);
                        out.push(a.lerp(b, t));
                    }
                    pen = to;
                }
                PathCommand::Close => {}
            }
        }
    }
}

/// Build the closed, mirrored silhouette for `points` on a `width` × `height`
/// surface.
///
/// The upper contour runs left to right: each point is the control of a
/// quadratic segment that ends half-way to the next point. The lower contour
/// is the same geometry reflected about the horizontal center line and walked
/// right to left, so the shape is exactly symmetric.
pub fn build_silhouette(points: &[DisplayPoint], width: f32, height: f32, path: &mut Path) {
    let center = height / 2.0;
    let above = |x: f32, y: f32| Point::new(x, center - y);
    let below = |p: Point| Point::new(p.x, 2.0 * center - p.y);

    path.clear();
    let start = Point::new(0.0, center);
    path.move_to(start);

    let upper_start = path.commands.len();
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let ctrl = above(a.x, a.y);
        let mid = above((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
        path.quad_to(ctrl, mid);
    }
    let upper_end = path.commands.len();

    let edge = Point::new(width, center);
    path.line_to(edge);

    // Reverse each upper segment: a quad from P via C to Q becomes Q via C to P.
    let mut last = Some(edge);
    for i in (upper_start..upper_end).rev() {
        let PathCommand::QuadTo { ctrl, to } = path.commands[i] else {
            continue;
        };
        if last.take().is_some() {
            path.line_to(below(to));
        }
        let from = match path.commands[i - 1] {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => p,
            PathCommand::QuadTo { to, .. } => to,
            PathCommand::Close => start,
        };
        path.quad_to(below(ctrl), below(from));
    }

    path.line_to(start);
    path.close();
}
