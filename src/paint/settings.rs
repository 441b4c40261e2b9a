use crate::paint::history::DEFAULT_HISTORY_LIMIT;
use crate::paint::model::{Brush, SurfaceSize};
use serde::{Deserialize, Serialize};

const DEFAULT_WIDTH: u32 = 800;
const DEFAULT_HEIGHT: u32 = 600;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CanvasSettings {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// Size the canvas is presented at. Zero means "same as the canvas".
    #[serde(default)]
    pub display_width: u32,
    #[serde(default)]
    pub display_height: u32,
    #[serde(default)]
    pub brush: Brush,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default)]
    pub debug_logging: bool,
}

fn default_width() -> u32 {
    DEFAULT_WIDTH
}

fn default_height() -> u32 {
    DEFAULT_HEIGHT
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            display_width: 0,
            display_height: 0,
            brush: Brush::default(),
            history_limit: default_history_limit(),
            debug_logging: false,
        }
    }
}

impl CanvasSettings {
    pub fn surface_size(&self) -> SurfaceSize {
        SurfaceSize::new(self.width, self.height)
    }

    pub fn display_size(&self) -> SurfaceSize {
        if self.display_width == 0 || self.display_height == 0 {
            self.surface_size()
        } else {
            SurfaceSize::new(self.display_width, self.display_height)
        }
    }

    /// Replaces values the canvas cannot be built with.
    pub fn sanitize(&mut self) {
        if self.width == 0 || self.height == 0 {
            tracing::warn!(
                width = self.width,
                height = self.height,
                "empty canvas size in settings; using defaults"
            );
            self.width = DEFAULT_WIDTH;
            self.height = DEFAULT_HEIGHT;
        }
        if !Brush::is_valid_width(self.brush.stroke_width) {
            tracing::warn!(
                width = self.brush.stroke_width,
                "invalid brush width in settings; using default"
            );
            self.brush.stroke_width = Brush::default().stroke_width;
        }
        self.history_limit = self.history_limit.max(1);
    }
}
