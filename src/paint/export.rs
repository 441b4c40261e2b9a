use crate::paint::model::SurfaceSize;
use crate::paint::surface::RasterSurface;
use anyhow::{anyhow, Context, Result};
use chrono::Local;
use image::{ImageFormat, ImageOutputFormat, RgbaImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};

fn to_image(surface: &RasterSurface) -> Result<RgbaImage> {
    RgbaImage::from_raw(
        surface.width(),
        surface.height(),
        surface.rgba_pixels().to_vec(),
    )
    .ok_or_else(|| anyhow!("surface buffer does not match its dimensions"))
}

pub fn encode_png(surface: &RasterSurface) -> Result<Vec<u8>> {
    let image = to_image(surface)?;
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
        .context("encode canvas as png")?;
    Ok(bytes)
}

pub fn decode_png(bytes: &[u8]) -> Result<RasterSurface> {
    let image = image::load_from_memory_with_format(bytes, ImageFormat::Png)
        .context("decode canvas png")?
        .to_rgba8();
    let size = SurfaceSize::new(image.width(), image.height());
    RasterSurface::from_rgba(size, image.into_raw())
        .ok_or_else(|| anyhow!("decoded png has an unexpected buffer length"))
}

pub fn save_png(surface: &RasterSurface, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create export folder {}", parent.display()))?;
    }
    to_image(surface)?
        .save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("write canvas png {}", path.display()))
}

pub fn timestamped_filename(now: chrono::DateTime<Local>) -> String {
    format!("{}_canvas.png", now.format("%Y%m%d_%H%M%S"))
}

/// Writes the surface into `output_dir` under a timestamped name.
pub fn save_timestamped(
    surface: &RasterSurface,
    output_dir: &Path,
    now: chrono::DateTime<Local>,
) -> Result<PathBuf> {
    let path = output_dir.join(timestamped_filename(now));
    save_png(surface, &path)?;
    tracing::info!(path = %path.display(), "canvas exported");
    Ok(path)
}
