//! Events an artist canvas broadcasts so spectators can replay its drawing.
//!
//! Coordinates are always in virtual canvas space. Delivery and ordering are
//! the transport's job; events from one artist must arrive in send order.

use crate::paint::model::{BoundingBox, Brush, PaintMode, Point, Rgb};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::sync::mpsc::Sender;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokePayload {
    pub points: Vec<Point>,
    pub current_brush: Brush,
    pub paint_mode: PaintMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillPayload {
    pub x: i32,
    pub y: i32,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PaintEvent {
    StrokeBegin(StrokePayload),
    /// Already smoothed points; receivers stamp them as-is.
    StrokeMove(StrokePayload),
    StrokeEnd {
        #[serde(rename = "boundingBox")]
        bounding_box: BoundingBox,
    },
    Fill(FillPayload),
    Undo,
    Redo,
}

impl PaintEvent {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("serialize paint event")
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).with_context(|| format!("deserialize paint event {raw:?}"))
    }

    pub fn name(&self) -> &'static str {
        match self {
            PaintEvent::StrokeBegin(_) => "stroke-begin",
            PaintEvent::StrokeMove(_) => "stroke-move",
            PaintEvent::StrokeEnd { .. } => "stroke-end",
            PaintEvent::Fill(_) => "fill",
            PaintEvent::Undo => "undo",
            PaintEvent::Redo => "redo",
        }
    }
}

/// Fire-and-forget sink for outgoing events.
pub trait Broadcast {
    fn broadcast(&mut self, event: PaintEvent);
}

impl<F> Broadcast for F
where
    F: FnMut(PaintEvent),
{
    fn broadcast(&mut self, event: PaintEvent) {
        self(event)
    }
}

impl Broadcast for Vec<PaintEvent> {
    fn broadcast(&mut self, event: PaintEvent) {
        self.push(event);
    }
}

impl Broadcast for Sender<PaintEvent> {
    fn broadcast(&mut self, event: PaintEvent) {
        let name = event.name();
        if self.send(event).is_err() {
            tracing::debug!(event = name, "paint event receiver disconnected");
        }
    }
}

/// Discards every event. Spectators use this since they never originate events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBroadcast;

impl Broadcast for NullBroadcast {
    fn broadcast(&mut self, _event: PaintEvent) {}
}
