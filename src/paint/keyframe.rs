//! Full-bitmap snapshots used to resynchronise a spectator that missed events.

use crate::paint::canvas::PaintCanvas;
use crate::paint::export::{decode_png, encode_png};
use crate::paint::model::{Role, SurfaceSize};
use crate::paint::protocol::Broadcast;
use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyframe {
    pub width: u32,
    pub height: u32,
    pub png_base64: String,
}

impl Keyframe {
    pub fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.width, self.height)
    }
}

impl<B: Broadcast> PaintCanvas<B> {
    pub fn keyframe(&self) -> Result<Keyframe> {
        let png = encode_png(self.surface())?;
        Ok(Keyframe {
            width: self.surface().width(),
            height: self.surface().height(),
            png_base64: general_purpose::STANDARD.encode(png),
        })
    }

    /// Overwrites a spectator's surface with the keyframe. Mirrored history is
    /// dropped because its rectangles no longer describe the surface.
    pub fn apply_keyframe(&mut self, keyframe: &Keyframe) -> Result<()> {
        if self.role() == Role::Artist {
            bail!("artist canvas is authoritative and does not accept keyframes");
        }
        if keyframe.size() != self.surface().size() {
            bail!(
                "keyframe is {}x{} but canvas is {}x{}",
                keyframe.width,
                keyframe.height,
                self.surface().width(),
                self.surface().height()
            );
        }
        let png = general_purpose::STANDARD
            .decode(&keyframe.png_base64)
            .context("decode keyframe base64")?;
        let surface = decode_png(&png)?;
        if surface.size() != keyframe.size() {
            bail!("keyframe image size does not match its header");
        }
        self.replace_surface(surface);
        tracing::info!(
            width = keyframe.width,
            height = keyframe.height,
            "spectator resynchronised from keyframe"
        );
        Ok(())
    }
}
