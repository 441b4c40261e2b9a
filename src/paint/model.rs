use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Extra pixels captured past the geometric extent of a stroke or fill.
pub const BOUNDING_BOX_BIAS: i32 = 5;

/// A point in virtual canvas space.
pub type Point = [f32; 2];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const BLACK: Self = Self::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#RRGGBB` or `RRGGBB`.
    pub fn from_hex(value: &str) -> Option<Self> {
        let digits = value.trim().trim_start_matches('#');
        if digits.len() != 6 {
            return None;
        }
        let mut bytes = [0u8; 3];
        hex::decode_to_slice(digits, &mut bytes).ok()?;
        Some(Self::new(bytes[0], bytes[1], bytes[2]))
    }

    pub fn to_hex(self) -> String {
        format!("#{}", hex::encode_upper([self.r, self.g, self.b]))
    }

    pub fn to_rgba_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }

    /// Squared euclidean distance in RGB space.
    pub fn distance_sq(self, other: Rgb) -> u32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s).ok_or_else(|| anyhow::anyhow!("invalid hex colour: {s:?}"))
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Rgb::from_hex(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex colour: {raw:?}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brush {
    pub color: Rgb,
    pub stroke_width: f32,
}

impl Brush {
    pub fn new(color: Rgb, stroke_width: f32) -> Self {
        Self {
            color,
            stroke_width,
        }
    }

    /// Radius of each stamped circle. Widths above one are halved so joints
    /// between overlapping stamps do not bulge; a width of one keeps a full
    /// pixel radius so a tap still leaves a visible dot.
    pub fn stamp_radius(&self) -> f32 {
        if self.stroke_width > 1.0 {
            self.stroke_width / 2.0
        } else {
            self.stroke_width
        }
    }

    pub fn is_valid_width(width: f32) -> bool {
        width.is_finite() && width > 0.0
    }
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            color: Rgb::BLACK,
            stroke_width: 4.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaintMode {
    #[default]
    Draw,
    Erase,
    Fill,
}

impl PaintMode {
    /// Colour a stroke in this mode lays down.
    pub fn stroke_color(self, brush: &Brush) -> Rgb {
        match self {
            PaintMode::Erase => Rgb::WHITE,
            PaintMode::Draw | PaintMode::Fill => brush.color,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
    Other(u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Artist,
    Spectator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Inclusive integer pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: [i32; 2],
    pub max: [i32; 2],
}

impl BoundingBox {
    pub fn new(min: [i32; 2], max: [i32; 2]) -> Self {
        Self {
            min: [min[0].min(max[0]), min[1].min(max[1])],
            max: [min[0].max(max[0]), min[1].max(max[1])],
        }
    }

    /// Box around a circle of `radius` centred on `point`, grown by the bias.
    pub fn around_point(point: Point, radius: f32) -> Self {
        let reach = radius + BOUNDING_BOX_BIAS as f32;
        Self::new(
            [
                (point[0] - reach).floor() as i32,
                (point[1] - reach).floor() as i32,
            ],
            [
                (point[0] + reach).ceil() as i32,
                (point[1] + reach).ceil() as i32,
            ],
        )
    }

    pub fn union(self, other: BoundingBox) -> BoundingBox {
        BoundingBox {
            min: [self.min[0].min(other.min[0]), self.min[1].min(other.min[1])],
            max: [self.max[0].max(other.max[0]), self.max[1].max(other.max[1])],
        }
    }

    /// Grows `acc` to include `other`, starting it when empty.
    pub fn accumulate(acc: Option<BoundingBox>, other: BoundingBox) -> BoundingBox {
        match acc {
            Some(current) => current.union(other),
            None => other,
        }
    }

    /// Intersects with `[0,width) x [0,height)`. `None` when nothing is left,
    /// including for an inverted box with `min > max`.
    pub fn clamp(self, size: SurfaceSize) -> Option<BoundingBox> {
        if size.is_empty() || self.min[0] > self.max[0] || self.min[1] > self.max[1] {
            return None;
        }
        let max_x = size.width as i32 - 1;
        let max_y = size.height as i32 - 1;
        if self.max[0] < 0 || self.max[1] < 0 || self.min[0] > max_x || self.min[1] > max_y {
            return None;
        }
        Some(BoundingBox {
            min: [self.min[0].clamp(0, max_x), self.min[1].clamp(0, max_y)],
            max: [self.max[0].clamp(0, max_x), self.max[1].clamp(0, max_y)],
        })
    }

    pub fn width(&self) -> u32 {
        (self.max[0] - self.min[0] + 1).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        (self.max[1] - self.min[1] + 1).max(0) as u32
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.min[0] && x <= self.max[0] && y >= self.min[1] && y <= self.max[1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colour_parses_with_and_without_hash() {
        assert_eq!(Rgb::from_hex("#FF0000"), Some(Rgb::new(255, 0, 0)));
        assert_eq!(Rgb::from_hex("00ff7f"), Some(Rgb::new(0, 255, 127)));
        assert_eq!(Rgb::from_hex("#FFF"), None);
        assert_eq!(Rgb::from_hex("#GG0000"), None);
        assert_eq!(Rgb::new(1, 2, 171).to_hex(), "#0102AB");
    }

    #[test]
    fn brush_serializes_with_hex_colour_and_camel_case_width() {
        let brush = Brush::new(Rgb::new(255, 0, 0), 10.0);
        let json = serde_json::to_value(brush).expect("serialize brush");
        assert_eq!(json["color"], "#FF0000");
        assert_eq!(json["strokeWidth"], 10.0);
    }

    #[test]
    fn stamp_radius_halves_only_wide_brushes() {
        assert_eq!(Brush::new(Rgb::BLACK, 10.0).stamp_radius(), 5.0);
        assert_eq!(Brush::new(Rgb::BLACK, 1.0).stamp_radius(), 1.0);
        assert_eq!(Brush::new(Rgb::BLACK, 0.5).stamp_radius(), 0.5);
    }

    #[test]
    fn erase_mode_always_paints_white() {
        let brush = Brush::new(Rgb::new(10, 20, 30), 3.0);
        assert_eq!(PaintMode::Erase.stroke_color(&brush), Rgb::WHITE);
        assert_eq!(PaintMode::Draw.stroke_color(&brush), brush.color);
    }

    #[test]
    fn clamp_trims_to_surface_and_drops_disjoint_boxes() {
        let size = SurfaceSize::new(10, 10);
        let clamped = BoundingBox::new([-4, 3], [12, 20]).clamp(size).expect("overlap");
        assert_eq!(clamped, BoundingBox::new([0, 3], [9, 9]));
        assert_eq!(BoundingBox::new([11, 0], [15, 4]).clamp(size), None);
        assert_eq!(BoundingBox::new([-6, -6], [-1, -1]).clamp(size), None);
    }

    #[test]
    fn inverted_box_from_the_wire_clamps_to_nothing() {
        let inverted: BoundingBox =
            serde_json::from_str(r#"{"min":[5,5],"max":[2,2]}"#).expect("decode box");
        assert_eq!(inverted.clamp(SurfaceSize::new(16, 16)), None);
        let flat_x = BoundingBox {
            min: [4, 1],
            max: [3, 6],
        };
        assert_eq!(flat_x.clamp(SurfaceSize::new(16, 16)), None);
    }

    #[test]
    fn around_point_includes_radius_and_bias() {
        let bbox = BoundingBox::around_point([32.0, 32.0], 5.0);
        assert_eq!(bbox, BoundingBox::new([22, 22], [42, 42]));
        assert_eq!(bbox.width(), 21);
    }
}
