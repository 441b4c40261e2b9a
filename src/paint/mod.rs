pub mod canvas;
pub mod curve;
pub mod export;
pub mod fill;
pub mod history;
pub mod keyframe;
pub mod model;
pub mod protocol;
pub mod settings;
pub mod settings_store;
pub mod stroke;
pub mod surface;

pub use canvas::PaintCanvas;
pub use keyframe::Keyframe;
pub use model::{BoundingBox, Brush, PaintMode, Point, PointerButton, Rgb, Role, SurfaceSize};
pub use protocol::{Broadcast, NullBroadcast, PaintEvent};
pub use surface::{PixelRect, RasterSurface};
