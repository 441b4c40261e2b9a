use crate::paint::model::{BoundingBox, Rgb, BOUNDING_BOX_BIAS};
use crate::paint::surface::RasterSurface;

/// Maximum squared RGB distance still treated as the seed colour.
pub const FILL_TOLERANCE_SQ: u32 = 0;

fn matches(surface: &RasterSurface, x: i32, y: i32, target: Rgb) -> bool {
    surface
        .pixel(x, y)
        .is_some_and(|c| c.distance_sq(target) <= FILL_TOLERANCE_SQ)
}

/// Scanline flood fill from `(x, y)`. Returns the clamped box around every
/// filled span, or `None` when the seed is out of bounds or already `color`.
pub fn flood_fill(surface: &mut RasterSurface, x: i32, y: i32, color: Rgb) -> Option<BoundingBox> {
    let Some(target) = surface.pixel(x, y) else {
        tracing::debug!(x, y, "fill seed outside surface ignored");
        return None;
    };
    if target.distance_sq(color) <= FILL_TOLERANCE_SQ {
        tracing::debug!(x, y, %color, "fill seed already has the fill colour");
        return None;
    }

    let mut bbox: Option<BoundingBox> = None;
    let mut seeds = vec![(x, y)];
    while let Some((sx, sy)) = seeds.pop() {
        if !matches(surface, sx, sy, target) {
            continue;
        }
        let mut left = sx;
        while matches(surface, left - 1, sy, target) {
            left -= 1;
        }
        let mut right = sx;
        while matches(surface, right + 1, sy, target) {
            right += 1;
        }

        for row in [sy - 1, sy + 1] {
            let mut in_span = false;
            for col in left..=right {
                if matches(surface, col, row, target) {
                    if !in_span {
                        seeds.push((col, row));
                        in_span = true;
                    }
                } else {
                    in_span = false;
                }
            }
        }

        surface.fill_span(sy, left, right, color);
        bbox = Some(BoundingBox::accumulate(
            bbox,
            BoundingBox::new(
                [left, sy],
                [right + BOUNDING_BOX_BIAS, sy + BOUNDING_BOX_BIAS],
            ),
        ));
    }

    bbox.and_then(|b| b.clamp(surface.size()))
}
