//! Spatial smoothing of display points.

/*
Neighbor Averaging
==================

The analyser already smooths each bin *over time*. This pass smooths the
curve *across x*: every interior point becomes the mean of itself and its
two neighbors.

    before:  ▁ ▁ █ ▁ ▁        y = [0, 0, 9, 0, 0]
    pass 1:  ▁ ▃ ▃ ▃ ▁        y = [0, 3, 3, 3, 0]
    pass 2:  ▁ ▂ ▃ ▂ ▁        y = [0, 2, 3, 2, 0]

Each pass reads the values as they were at the start of the pass, so the
kernel stays symmetric and a spike spreads evenly to both sides. Endpoints
are never modified.

Because a mean never leaves the range of its inputs, no pass can produce a
value outside [min, max] of the sequence it started from.
*/

use super::curve::DisplayPoint;

/// Replace every interior y with the mean of itself and its two neighbors.
pub fn smooth_pass(points: &mut [DisplayPoint]) {
    if points.len() < 3 {
        return;
    }

    // Carry the pre-pass value of the left neighbor instead of copying the slice.
    let mut left = points[0].y;
    for i in 1..points.len() - 1 {
        let current = points[i].y;
        points[i].y = (left + current + points[i + 1].y) / 3.0;
        left = current;
    }
}

/// Apply `passes` rounds of neighbor averaging.
pub fn smooth(points: &mut [DisplayPoint], passes: usize) {
    for _ in 0..passes {
        smooth_pass(points);
    }
}
