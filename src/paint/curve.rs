//! Centripetal Catmull-Rom interpolation used to smooth sparse pointer samples.

use crate::paint::model::Point;

/// Samples produced per interpolated segment, endpoints included.
pub const SEGMENT_SAMPLES: usize = 100;

const ALPHA: f32 = 0.5;
const MIN_KNOT_INTERVAL: f32 = 1e-4;

fn knot_interval(a: Point, b: Point) -> f32 {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    let interval = (dx * dx + dy * dy).powf(ALPHA * 0.5);
    // coincident control points
    if interval < MIN_KNOT_INTERVAL {
        1.0
    } else {
        interval
    }
}

fn lerp(a: Point, b: Point, ta: f32, tb: f32, t: f32) -> Point {
    let span = tb - ta;
    let wa = (tb - t) / span;
    let wb = (t - ta) / span;
    [a[0] * wa + b[0] * wb, a[1] * wa + b[1] * wb]
}

/// Interpolates the curve between `window[1]` and `window[2]`, using
/// `window[0]` and `window[3]` as the outer control points.
pub fn catmull_rom_segment(window: [Point; 4], samples: usize) -> Vec<Point> {
    let [p0, p1, p2, p3] = window;
    let t0 = 0.0;
    let t1 = t0 + knot_interval(p0, p1);
    let t2 = t1 + knot_interval(p1, p2);
    let t3 = t2 + knot_interval(p2, p3);

    let samples = samples.max(2);
    (0..samples)
        .map(|i| {
            let t = t1 + (t2 - t1) * (i as f32 / (samples - 1) as f32);
            let a1 = lerp(p0, p1, t0, t1, t);
            let a2 = lerp(p1, p2, t1, t2, t);
            let a3 = lerp(p2, p3, t2, t3, t);
            let b1 = lerp(a1, a2, t0, t2, t);
            let b2 = lerp(a2, a3, t1, t3, t);
            lerp(b1, b2, t1, t2, t)
        })
        .collect()
}
