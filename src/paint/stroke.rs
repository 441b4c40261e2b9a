use crate::paint::curve::{catmull_rom_segment, SEGMENT_SAMPLES};
use crate::paint::model::{BoundingBox, Brush, PaintMode, Point};
use crate::paint::surface::RasterSurface;
use std::collections::VecDeque;

/// Control points needed for one interpolated segment.
const WINDOW_LEN: usize = 4;

/// Stamps one circle per point and returns the clamped, biased box around them.
pub fn stamp_points(
    surface: &mut RasterSurface,
    points: &[Point],
    brush: &Brush,
    mode: PaintMode,
) -> Option<BoundingBox> {
    let radius = brush.stamp_radius();
    let color = mode.stroke_color(brush);
    let mut bbox: Option<BoundingBox> = None;
    for &point in points {
        surface.stamp_circle(point, radius, color);
        bbox = Some(BoundingBox::accumulate(
            bbox,
            BoundingBox::around_point(point, radius),
        ));
    }
    bbox.and_then(|b| b.clamp(surface.size()))
}

#[derive(Debug, Clone, PartialEq)]
struct ActiveStroke {
    brush: Brush,
    mode: PaintMode,
    window: VecDeque<Point>,
    bounding_box: Option<BoundingBox>,
}

impl ActiveStroke {
    fn stamp(&mut self, surface: &mut RasterSurface, points: &[Point]) {
        if let Some(bbox) = stamp_points(surface, points, &self.brush, self.mode) {
            self.bounding_box = Some(BoundingBox::accumulate(self.bounding_box, bbox));
        }
    }

    fn interpolate_window(&self) -> Option<Vec<Point>> {
        if self.window.len() < WINDOW_LEN {
            return None;
        }
        let n = self.window.len();
        let window = [
            self.window[n - 4],
            self.window[n - 3],
            self.window[n - 2],
            self.window[n - 1],
        ];
        Some(catmull_rom_segment(window, SEGMENT_SAMPLES))
    }
}

/// Result of finishing a stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedStroke {
    pub brush: Brush,
    pub mode: PaintMode,
    /// Tail segment drawn while flushing, if any points were still pending.
    pub flushed: Option<Vec<Point>>,
    pub bounding_box: Option<BoundingBox>,
}

/// Idle / Painting state machine turning pointer samples into smoothed stamps.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StrokeEngine {
    active: Option<ActiveStroke>,
}

impl StrokeEngine {
    pub fn is_painting(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_mode(&self) -> Option<PaintMode> {
        self.active.as_ref().map(|a| a.mode)
    }

    pub fn active_brush(&self) -> Option<Brush> {
        self.active.as_ref().map(|a| a.brush)
    }

    /// Starts a stroke and stamps the initial dot. Brush and mode are latched
    /// for the whole stroke. A stroke already in progress is discarded.
    pub fn begin(
        &mut self,
        surface: &mut RasterSurface,
        point: Point,
        brush: Brush,
        mode: PaintMode,
    ) -> Vec<Point> {
        if self.active.is_some() {
            tracing::warn!("stroke begun while another stroke was active");
        }
        // The start point is doubled so the first real segment has a leading
        // control point.
        let mut stroke = ActiveStroke {
            brush,
            mode,
            window: VecDeque::from([point, point]),
            bounding_box: None,
        };
        stroke.stamp(surface, &[point]);
        self.active = Some(stroke);
        vec![point]
    }

    /// Appends a pointer sample. Returns the interpolated segment that was
    /// stamped once four control points are buffered.
    pub fn extend(&mut self, surface: &mut RasterSurface, point: Point) -> Option<Vec<Point>> {
        let stroke = self.active.as_mut()?;
        if stroke.window.back() == Some(&point) {
            return None;
        }
        stroke.window.push_back(point);
        let segment = stroke.interpolate_window()?;
        stroke.stamp(surface, &segment);
        stroke.window.pop_front();
        Some(segment)
    }

    /// Flushes the pending tail and returns to idle.
    pub fn finish(&mut self, surface: &mut RasterSurface) -> Option<FinishedStroke> {
        let mut stroke = self.active.take()?;
        let mut flushed = None;
        if stroke.window.len() == WINDOW_LEN - 1 {
            if let Some(&last) = stroke.window.back() {
                stroke.window.push_back(last);
            }
            if let Some(segment) = stroke.interpolate_window() {
                stroke.stamp(surface, &segment);
                flushed = Some(segment);
            }
        }
        stroke.window.clear();
        Some(FinishedStroke {
            brush: stroke.brush,
            mode: stroke.mode,
            flushed,
            bounding_box: stroke.bounding_box,
        })
    }
}
