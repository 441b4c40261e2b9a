use crate::paint::fill::flood_fill;
use crate::paint::history::{ActionKind, PaintAction, PaintHistory};
use crate::paint::model::{
    BoundingBox, Brush, PaintMode, Point, PointerButton, Rgb, Role, SurfaceSize,
};
use crate::paint::protocol::{Broadcast, FillPayload, NullBroadcast, PaintEvent, StrokePayload};
use crate::paint::settings::CanvasSettings;
use crate::paint::stroke::{stamp_points, StrokeEngine};
use crate::paint::surface::{PixelRect, RasterSurface};
use anyhow::{bail, Result};

fn action_kind(mode: PaintMode) -> ActionKind {
    match mode {
        PaintMode::Erase => ActionKind::Erase,
        PaintMode::Draw => ActionKind::Draw,
        PaintMode::Fill => ActionKind::Fill,
    }
}

/// One canvas instance, either the authoritative artist canvas driven by
/// pointer input or a spectator replica driven by [`PaintEvent`]s.
pub struct PaintCanvas<B: Broadcast = NullBroadcast> {
    role: Role,
    surface: RasterSurface,
    /// Pre-stroke copy of `surface` used for before-images.
    baseline: RasterSurface,
    baseline_stale: bool,
    history: PaintHistory,
    stroke: StrokeEngine,
    /// Mode of the remote stroke currently being replayed.
    remote_stroke: Option<PaintMode>,
    brush: Brush,
    mode: PaintMode,
    display_size: SurfaceSize,
    broadcaster: B,
}

impl<B: Broadcast> PaintCanvas<B> {
    pub fn create(
        surface_size: SurfaceSize,
        initial_brush: Brush,
        role: Role,
        display_size: SurfaceSize,
        broadcaster: B,
    ) -> Result<Self> {
        if surface_size.is_empty() {
            bail!(
                "canvas surface must not be empty ({}x{})",
                surface_size.width,
                surface_size.height
            );
        }
        if display_size.is_empty() {
            bail!(
                "canvas display must not be empty ({}x{})",
                display_size.width,
                display_size.height
            );
        }
        if !Brush::is_valid_width(initial_brush.stroke_width) {
            bail!("invalid initial brush width {}", initial_brush.stroke_width);
        }

        let surface = RasterSurface::new(surface_size);
        tracing::debug!(
            ?role,
            width = surface_size.width,
            height = surface_size.height,
            "paint canvas created"
        );
        Ok(Self {
            role,
            baseline: surface.clone(),
            surface,
            baseline_stale: false,
            history: PaintHistory::default(),
            stroke: StrokeEngine::default(),
            remote_stroke: None,
            brush: initial_brush,
            mode: PaintMode::default(),
            display_size,
            broadcaster,
        })
    }

    pub fn from_settings(settings: &CanvasSettings, role: Role, broadcaster: B) -> Result<Self> {
        let mut canvas = Self::create(
            settings.surface_size(),
            settings.brush,
            role,
            settings.display_size(),
            broadcaster,
        )?;
        canvas.history = PaintHistory::with_limit(settings.history_limit);
        Ok(canvas)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Readable bitmap for presentation.
    pub fn surface(&self) -> &RasterSurface {
        &self.surface
    }

    pub fn history(&self) -> &PaintHistory {
        &self.history
    }

    pub fn brush(&self) -> Brush {
        self.brush
    }

    pub fn paint_mode(&self) -> PaintMode {
        self.mode
    }

    pub fn is_painting(&self) -> bool {
        self.stroke.is_painting()
    }

    pub fn display_size(&self) -> SurfaceSize {
        self.display_size
    }

    pub fn set_display_size(&mut self, display_size: SurfaceSize) {
        if display_size.is_empty() {
            tracing::warn!(
                width = display_size.width,
                height = display_size.height,
                "ignoring empty display size"
            );
            return;
        }
        self.display_size = display_size;
    }

    pub fn broadcaster(&self) -> &B {
        &self.broadcaster
    }

    pub fn broadcaster_mut(&mut self) -> &mut B {
        &mut self.broadcaster
    }

    /// Maps a host display position into virtual canvas space.
    pub fn to_virtual(&self, display: Point) -> Point {
        let size = self.surface.size();
        [
            display[0] * size.width as f32 / self.display_size.width as f32,
            display[1] * size.height as f32 / self.display_size.height as f32,
        ]
    }

    pub fn to_display(&self, virtual_point: Point) -> Point {
        let size = self.surface.size();
        [
            virtual_point[0] * self.display_size.width as f32 / size.width as f32,
            virtual_point[1] * self.display_size.height as f32 / size.height as f32,
        ]
    }

    // ---------------------------------------------------------------------
    // Brush and mode
    // ---------------------------------------------------------------------

    /// Takes effect from the next stroke; an active stroke keeps its mode.
    pub fn set_paint_mode(&mut self, mode: PaintMode) {
        tracing::debug!(?mode, "paint mode changed");
        self.mode = mode;
    }

    pub fn set_brush_color(&mut self, hex: &str) -> bool {
        match Rgb::from_hex(hex) {
            Some(color) => {
                self.brush.color = color;
                true
            }
            None => {
                tracing::warn!(value = hex, "rejected invalid brush colour");
                false
            }
        }
    }

    pub fn set_brush_stroke_width(&mut self, width: f32) -> bool {
        if !Brush::is_valid_width(width) {
            tracing::warn!(width, "rejected non-positive brush width");
            return false;
        }
        self.brush.stroke_width = width;
        true
    }

    // ---------------------------------------------------------------------
    // Local pointer input (artist only)
    // ---------------------------------------------------------------------

    fn accepts_local_input(&self, what: &str) -> bool {
        if self.role == Role::Spectator {
            tracing::debug!(input = what, "spectator canvas ignores local input");
            return false;
        }
        true
    }

    pub fn pointer_down(&mut self, button: PointerButton, position: Point) {
        if !self.accepts_local_input("pointer-down") {
            return;
        }
        if button != PointerButton::Primary {
            tracing::trace!(?button, "ignoring non-primary pointer button");
            return;
        }
        if self.stroke.is_painting() {
            tracing::warn!("pointer-down while painting; finishing previous stroke");
            self.finish_stroke();
        }

        let point = self.to_virtual(position);
        if self.mode == PaintMode::Fill {
            let color = self.brush.color;
            self.fill(point[0].floor() as i32, point[1].floor() as i32, color);
            return;
        }

        self.ensure_baseline();
        let brush = self.brush;
        let mode = self.mode;
        let points = self.stroke.begin(&mut self.surface, point, brush, mode);
        self.broadcaster.broadcast(PaintEvent::StrokeBegin(StrokePayload {
            points,
            current_brush: brush,
            paint_mode: mode,
        }));
    }

    pub fn pointer_move(&mut self, position: Point) {
        if self.role == Role::Spectator || !self.stroke.is_painting() {
            return;
        }
        let point = self.to_virtual(position);
        self.extend_stroke(point);
    }

    pub fn pointer_up(&mut self, button: PointerButton, position: Point) {
        if !self.accepts_local_input("pointer-up") || button != PointerButton::Primary {
            return;
        }
        if !self.stroke.is_painting() {
            return;
        }
        let point = self.to_virtual(position);
        self.extend_stroke(point);
        self.finish_stroke();
    }

    /// Leaving the surface mid-stroke finishes and commits the stroke.
    pub fn pointer_leave(&mut self, position: Point) {
        if self.role == Role::Spectator || !self.stroke.is_painting() {
            return;
        }
        let point = self.to_virtual(position);
        self.extend_stroke(point);
        self.finish_stroke();
    }

    fn extend_stroke(&mut self, point: Point) {
        let Some(points) = self.stroke.extend(&mut self.surface, point) else {
            return;
        };
        self.broadcast_segment(points);
    }

    fn broadcast_segment(&mut self, points: Vec<Point>) {
        let (Some(mode), brush) = (self.stroke.active_mode(), self.active_brush()) else {
            return;
        };
        self.broadcaster.broadcast(PaintEvent::StrokeMove(StrokePayload {
            points,
            current_brush: brush,
            paint_mode: mode,
        }));
    }

    fn active_brush(&self) -> Brush {
        self.stroke.active_brush().unwrap_or(self.brush)
    }

    fn finish_stroke(&mut self) {
        let Some(finished) = self.stroke.finish(&mut self.surface) else {
            return;
        };
        if let Some(points) = finished.flushed {
            self.broadcaster.broadcast(PaintEvent::StrokeMove(StrokePayload {
                points,
                current_brush: finished.brush,
                paint_mode: finished.mode,
            }));
        }
        let Some(bounding_box) = finished.bounding_box else {
            tracing::error!("stroke finished with an empty bounding box; not recorded");
            self.baseline_stale = true;
            return;
        };
        self.broadcaster
            .broadcast(PaintEvent::StrokeEnd { bounding_box });
        self.commit_stroke(action_kind(finished.mode), bounding_box);
    }

    // ---------------------------------------------------------------------
    // Fill, undo, redo
    // ---------------------------------------------------------------------

    /// Flood fills from `(x, y)` in virtual coordinates and broadcasts the fill
    /// when anything changed.
    pub fn fill(&mut self, x: i32, y: i32, color: Rgb) -> bool {
        if !self.accepts_local_input("fill") {
            return false;
        }
        if self.stroke.is_painting() {
            self.finish_stroke();
        }
        if !self.apply_fill(x, y, color) {
            return false;
        }
        self.broadcaster
            .broadcast(PaintEvent::Fill(FillPayload { x, y, color }));
        true
    }

    pub fn undo(&mut self) -> bool {
        if !self.accepts_local_input("undo") {
            return false;
        }
        if self.stroke.is_painting() {
            self.finish_stroke();
        }
        if !self.apply_undo() {
            return false;
        }
        self.broadcaster.broadcast(PaintEvent::Undo);
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.accepts_local_input("redo") {
            return false;
        }
        if self.stroke.is_painting() {
            self.finish_stroke();
        }
        if !self.apply_redo() {
            return false;
        }
        self.broadcaster.broadcast(PaintEvent::Redo);
        true
    }

    fn apply_fill(&mut self, x: i32, y: i32, color: Rgb) -> bool {
        self.ensure_baseline();
        let Some(bounding_box) = flood_fill(&mut self.surface, x, y, color) else {
            return false;
        };
        self.commit_action(ActionKind::Fill, bounding_box);
        // the pre-fill copy no longer reflects the surface
        self.baseline_stale = true;
        true
    }

    fn apply_undo(&mut self) -> bool {
        let Some(action) = self.history.last_undo() else {
            tracing::debug!("nothing to undo");
            return false;
        };
        let Some(image) = action.before_image.clone() else {
            tracing::error!(kind = ?action.kind, "undo entry has no before image");
            return false;
        };
        self.history.undo();
        self.restore(&image);
        true
    }

    fn apply_redo(&mut self) -> bool {
        let Some(action) = self.history.last_redo() else {
            tracing::debug!("nothing to redo");
            return false;
        };
        let Some(image) = action.after_image.clone() else {
            tracing::error!(kind = ?action.kind, "redo entry has no after image");
            return false;
        };
        self.history.redo();
        self.restore(&image);
        true
    }

    fn restore(&mut self, image: &PixelRect) {
        self.surface.write_rect(image);
        if !self.baseline_stale {
            self.baseline.write_rect(image);
        }
    }

    // ---------------------------------------------------------------------
    // Remote events (spectator only)
    // ---------------------------------------------------------------------

    /// Applies one event received from the artist.
    pub fn apply_remote(&mut self, event: PaintEvent) {
        if self.role == Role::Artist {
            tracing::warn!(event = event.name(), "artist canvas ignores remote event");
            return;
        }
        match event {
            PaintEvent::StrokeBegin(payload) => self.remote_stroke_begin(payload),
            PaintEvent::StrokeMove(payload) => self.remote_stroke_move(payload),
            PaintEvent::StrokeEnd { bounding_box } => self.remote_stroke_end(bounding_box),
            PaintEvent::Fill(FillPayload { x, y, color }) => {
                self.apply_fill(x, y, color);
            }
            PaintEvent::Undo => {
                self.apply_undo();
            }
            PaintEvent::Redo => {
                self.apply_redo();
            }
        }
    }

    pub fn apply_remote_json(&mut self, raw: &str) -> Result<()> {
        let event = PaintEvent::from_json(raw)?;
        self.apply_remote(event);
        Ok(())
    }

    fn remote_stroke_begin(&mut self, payload: StrokePayload) {
        if self.remote_stroke.is_some() {
            tracing::warn!("remote stroke began before the previous one ended");
        }
        self.ensure_baseline();
        stamp_points(
            &mut self.surface,
            &payload.points,
            &payload.current_brush,
            payload.paint_mode,
        );
        self.remote_stroke = Some(payload.paint_mode);
    }

    fn remote_stroke_move(&mut self, payload: StrokePayload) {
        if self.remote_stroke.is_none() {
            tracing::debug!("remote stroke segment without a begin; drawing anyway");
        }
        stamp_points(
            &mut self.surface,
            &payload.points,
            &payload.current_brush,
            payload.paint_mode,
        );
    }

    fn remote_stroke_end(&mut self, bounding_box: BoundingBox) {
        let Some(mode) = self.remote_stroke.take() else {
            tracing::warn!("remote stroke end without a begin; not recorded");
            self.baseline_stale = true;
            return;
        };
        let Some(bounding_box) = bounding_box.clamp(self.surface.size()) else {
            tracing::error!(?bounding_box, "remote stroke end has an empty bounding box");
            self.baseline_stale = true;
            return;
        };
        self.commit_stroke(action_kind(mode), bounding_box);
    }

    // ---------------------------------------------------------------------
    // Snapshots and history capture
    // ---------------------------------------------------------------------

    fn ensure_baseline(&mut self) {
        if self.baseline_stale {
            self.baseline = self.surface.clone();
            self.baseline_stale = false;
        }
    }

    /// Records a stroke and brings the baseline up to date inside its box.
    fn commit_stroke(&mut self, kind: ActionKind, bounding_box: BoundingBox) {
        let Some(after) = self.commit_action(kind, bounding_box) else {
            self.baseline_stale = true;
            return;
        };
        if !self.baseline_stale {
            self.baseline.write_rect(&after);
        }
    }

    fn commit_action(
        &mut self,
        kind: ActionKind,
        bounding_box: BoundingBox,
    ) -> Option<PixelRect> {
        let before = self.baseline.read_box(bounding_box);
        let after = self.surface.read_box(bounding_box);
        let (Some(before), Some(after)) = (before, after) else {
            tracing::error!(?bounding_box, ?kind, "could not capture history images");
            return None;
        };
        self.history.commit(PaintAction {
            kind,
            before_image: Some(before),
            after_image: Some(after.clone()),
            bounding_box,
        });
        Some(after)
    }

    /// Replaces the whole surface, dropping history and any in-flight stroke.
    pub(crate) fn replace_surface(&mut self, surface: RasterSurface) {
        self.surface = surface;
        self.baseline_stale = true;
        self.remote_stroke = None;
        self.stroke = StrokeEngine::default();
        self.history.clear();
    }
}
