use crate::paint::model::{BoundingBox, Point, Rgb, SurfaceSize};

/// Last coordinate of a run of `len` pixels starting at `origin`, saturated
/// to `i32::MAX`.
fn far_edge(origin: i32, len: u32) -> i32 {
    (i64::from(origin) + i64::from(len) - 1).min(i64::from(i32::MAX)) as i32
}

/// Copy of a rectangular region of a [`RasterSurface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl PixelRect {
    /// Inclusive box covered by the rect, `None` for a zero-area rect.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        let x = i32::try_from(self.x).ok()?;
        let y = i32::try_from(self.y).ok()?;
        Some(BoundingBox::new(
            [x, y],
            [far_edge(x, self.width), far_edge(y, self.height)],
        ))
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 4) as usize;
        Some(Rgb::new(
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
        ))
    }
}

/// Opaque RGBA8 pixel storage for one canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterSurface {
    /// New surface cleared to opaque white.
    pub fn new(size: SurfaceSize) -> Self {
        let len = (size.width as usize)
            .saturating_mul(size.height as usize)
            .saturating_mul(4);
        let mut surface = Self {
            width: size.width,
            height: size.height,
            pixels: vec![0; len],
        };
        surface.clear();
        surface
    }

    /// Wraps raw RGBA bytes. `None` when the length does not match the size.
    pub fn from_rgba(size: SurfaceSize, pixels: Vec<u8>) -> Option<Self> {
        let expected = (size.width as usize) * (size.height as usize) * 4;
        if pixels.len() != expected {
            return None;
        }
        Some(Self {
            width: size.width,
            height: size.height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.width, self.height)
    }

    pub fn rgba_pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn clear(&mut self) {
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&Rgb::WHITE.to_rgba_array());
        }
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    fn index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + x as usize) * 4
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb> {
        if !self.in_bounds(x, y) {
            return None;
        }
        let idx = self.index(x as u32, y as u32);
        Some(Rgb::new(
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
        ))
    }

    /// Out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgb) {
        if !self.in_bounds(x, y) {
            return;
        }
        let idx = self.index(x as u32, y as u32);
        self.pixels[idx..idx + 4].copy_from_slice(&color.to_rgba_array());
    }

    /// Paints the inclusive run `x0..=x1` on row `y`, clipped to the surface.
    pub fn fill_span(&mut self, y: i32, x0: i32, x1: i32, color: Rgb) {
        if y < 0 || y as u32 >= self.height || self.width == 0 {
            return;
        }
        let last = self.width as i32 - 1;
        let start = x0.max(0);
        let end = x1.min(last);
        if start > end {
            return;
        }
        let rgba = color.to_rgba_array();
        let from = self.index(start as u32, y as u32);
        let to = self.index(end as u32, y as u32) + 4;
        for px in self.pixels[from..to].chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    /// Fills every pixel whose centre lies within `radius` of `center`. The
    /// pixel holding the centre is always painted so tiny brushes stay visible.
    pub fn stamp_circle(&mut self, center: Point, radius: f32, color: Rgb) {
        let [cx, cy] = center;
        if !cx.is_finite() || !cy.is_finite() {
            return;
        }
        self.set_pixel(cx.floor() as i32, cy.floor() as i32, color);

        let r_sq = radius * radius;
        let y_start = (cy - radius - 0.5).ceil() as i32;
        let y_end = (cy + radius - 0.5).floor() as i32;
        for y in y_start.max(0)..=y_end.min(self.height as i32 - 1) {
            let dy = y as f32 + 0.5 - cy;
            let rem = r_sq - dy * dy;
            if rem < 0.0 {
                continue;
            }
            let half = rem.sqrt();
            let x0 = (cx - half - 0.5).ceil() as i32;
            let x1 = (cx + half - 0.5).floor() as i32;
            self.fill_span(y, x0, x1, color);
        }
    }

    /// Reads a rectangle after clamping it to the surface. `None` when the
    /// request does not overlap the surface at all.
    pub fn read_rect(&self, x: i32, y: i32, width: u32, height: u32) -> Option<PixelRect> {
        if width == 0 || height == 0 {
            return None;
        }
        self.read_box(BoundingBox::new(
            [x, y],
            [far_edge(x, width), far_edge(y, height)],
        ))
    }

    pub fn read_box(&self, bbox: BoundingBox) -> Option<PixelRect> {
        let clamped = bbox.clamp(self.size())?;
        let (x, y) = (clamped.min[0] as u32, clamped.min[1] as u32);
        let (width, height) = (clamped.width(), clamped.height());
        let row_len = (width * 4) as usize;
        let mut pixels = Vec::with_capacity(row_len * height as usize);
        for row in y..y + height {
            let start = self.index(x, row);
            pixels.extend_from_slice(&self.pixels[start..start + row_len]);
        }
        Some(PixelRect {
            x,
            y,
            width,
            height,
            pixels,
        })
    }

    /// Blits a captured rectangle back in place. Rows or columns that fall
    /// outside the surface are dropped; nothing is blended.
    pub fn write_rect(&mut self, rect: &PixelRect) {
        if rect.pixels.len() != (rect.width as usize) * (rect.height as usize) * 4 {
            tracing::error!(
                width = rect.width,
                height = rect.height,
                len = rect.pixels.len(),
                "pixel rect payload does not match its dimensions"
            );
            return;
        }
        let Some(target) = rect.bounding_box().and_then(|b| b.clamp(self.size())) else {
            tracing::debug!(x = rect.x, y = rect.y, "pixel rect is empty or off the surface");
            return;
        };
        let copy_len = (target.width() * 4) as usize;
        for row in target.min[1]..=target.max[1] {
            let src_row = (row as u32 - rect.y) as usize;
            let src_col = (target.min[0] as u32 - rect.x) as usize;
            let src = (src_row * rect.width as usize + src_col) * 4;
            let dst = self.index(target.min[0] as u32, row as u32);
            self.pixels[dst..dst + copy_len].copy_from_slice(&rect.pixels[src..src + copy_len]);
        }
    }
}
