use scribble_canvas::paint::history::ActionKind;
use scribble_canvas::paint::{
    BoundingBox, Brush, NullBroadcast, PaintCanvas, PaintMode, PointerButton, RasterSurface, Rgb,
    Role, SurfaceSize,
};

const RED: Rgb = Rgb::new(255, 0, 0);

fn artist(width: u32, height: u32, brush: Brush) -> PaintCanvas {
    PaintCanvas::create(
        SurfaceSize::new(width, height),
        brush,
        Role::Artist,
        SurfaceSize::new(width, height),
        NullBroadcast,
    )
    .expect("artist canvas")
}

fn stroke(canvas: &mut PaintCanvas, points: &[[f32; 2]]) {
    let (first, rest) = points.split_first().expect("at least one point");
    canvas.pointer_down(PointerButton::Primary, *first);
    for p in rest {
        canvas.pointer_move(*p);
    }
    let last = points.last().copied().unwrap_or(*first);
    canvas.pointer_up(PointerButton::Primary, last);
}

fn changed_pixels(before: &RasterSurface, after: &RasterSurface) -> Vec<(i32, i32)> {
    let mut changed = Vec::new();
    for y in 0..before.height() as i32 {
        for x in 0..before.width() as i32 {
            if before.pixel(x, y) != after.pixel(x, y) {
                changed.push((x, y));
            }
        }
    }
    changed
}

#[test]
fn single_dot_undo_redo_scenario() {
    let mut canvas = artist(64, 64, Brush::new(RED, 10.0));
    canvas.pointer_down(PointerButton::Primary, [32.0, 32.0]);
    canvas.pointer_up(PointerButton::Primary, [32.0, 32.0]);
    assert_eq!(canvas.surface().pixel(32, 32), Some(RED));

    assert!(canvas.undo());
    assert_eq!(canvas.surface().pixel(32, 32), Some(Rgb::WHITE));
    assert_eq!(
        canvas.surface(),
        &RasterSurface::new(SurfaceSize::new(64, 64))
    );

    assert!(canvas.redo());
    assert_eq!(canvas.surface().pixel(32, 32), Some(RED));
}

#[test]
fn blank_fill_scenario_covers_whole_surface() {
    let mut canvas = artist(10, 10, Brush::default());
    assert!(canvas.fill(5, 5, Rgb::from_hex("#00FF00").expect("hex")));
    for y in 0..10 {
        for x in 0..10 {
            assert_eq!(canvas.surface().pixel(x, y), Some(Rgb::new(0, 255, 0)));
        }
    }
    let action = canvas.history().last_undo().expect("fill action");
    assert_eq!(action.kind, ActionKind::Fill);
    assert_eq!(action.bounding_box, BoundingBox::new([0, 0], [9, 9]));
}

#[test]
fn filling_an_already_filled_region_is_idempotent() {
    let mut canvas = artist(20, 20, Brush::default());
    assert!(canvas.fill(3, 3, RED));
    let snapshot = canvas.surface().clone();
    assert!(!canvas.fill(10, 10, RED));
    assert_eq!(canvas.surface(), &snapshot);
    assert_eq!(canvas.history().undo_len(), 1);
}

#[test]
fn out_of_bounds_fill_is_ignored() {
    let mut canvas = artist(20, 20, Brush::default());
    assert!(!canvas.fill(-1, 5, RED));
    assert!(!canvas.fill(5, 20, RED));
    assert_eq!(canvas.history().undo_len(), 0);
}

#[test]
fn undo_all_then_redo_all_restores_final_state() {
    let mut canvas = artist(80, 80, Brush::new(RED, 8.0));
    stroke(&mut canvas, &[[5.0, 5.0], [20.0, 15.0], [35.0, 30.0], [50.0, 20.0]]);
    canvas.set_brush_color("#0000FF");
    canvas.set_brush_stroke_width(3.0);
    stroke(&mut canvas, &[[70.0, 5.0], [60.0, 40.0], [40.0, 70.0]]);
    canvas.fill(75, 75, Rgb::new(0, 200, 0));
    canvas.set_paint_mode(PaintMode::Erase);
    stroke(&mut canvas, &[[10.0, 60.0], [30.0, 60.0], [50.0, 62.0], [70.0, 64.0]]);
    canvas.set_paint_mode(PaintMode::Draw);
    stroke(&mut canvas, &[[40.0, 40.0]]);

    let final_state = canvas.surface().clone();
    let actions = canvas.history().undo_len();
    assert_eq!(actions, 5);

    for _ in 0..actions {
        assert!(canvas.undo());
    }
    assert!(!canvas.undo());
    assert_eq!(
        canvas.surface(),
        &RasterSurface::new(SurfaceSize::new(80, 80))
    );

    for _ in 0..actions {
        assert!(canvas.redo());
    }
    assert!(!canvas.redo());
    assert_eq!(canvas.surface().rgba_pixels(), final_state.rgba_pixels());
    assert_eq!(canvas.history().undo_len(), actions);
    assert_eq!(canvas.history().redo_len(), 0);
}

#[test]
fn new_actions_invalidate_redo() {
    let mut canvas = artist(40, 40, Brush::new(RED, 4.0));
    stroke(&mut canvas, &[[5.0, 5.0], [15.0, 5.0]]);
    stroke(&mut canvas, &[[5.0, 20.0], [15.0, 20.0]]);
    assert!(canvas.undo());
    assert_eq!(canvas.history().redo_len(), 1);

    stroke(&mut canvas, &[[30.0, 30.0]]);
    assert_eq!(canvas.history().redo_len(), 0);
    let snapshot = canvas.surface().clone();
    assert!(!canvas.redo());
    assert_eq!(canvas.surface(), &snapshot);

    assert!(canvas.undo());
    assert!(canvas.fill(1, 39, Rgb::new(9, 9, 9)));
    assert!(!canvas.redo());
}

#[test]
fn recorded_boxes_contain_every_modified_pixel() {
    let mut canvas = artist(120, 90, Brush::new(RED, 12.0));
    let strokes: [&[[f32; 2]]; 4] = [
        &[[2.0, 2.0], [30.0, 10.0], [60.0, 5.0], [90.0, 40.0], [118.0, 88.0]],
        &[[100.0, 10.0], [80.0, 30.0]],
        &[[0.0, 89.0]],
        &[[60.0, 45.0], [61.0, 46.0], [61.0, 47.0], [62.0, 47.0], [70.0, 50.0]],
    ];
    for points in strokes {
        let before = canvas.surface().clone();
        stroke(&mut canvas, points);
        let bbox = canvas.history().last_undo().expect("stroke action").bounding_box;
        for (x, y) in changed_pixels(&before, canvas.surface()) {
            assert!(bbox.contains(x, y), "({x},{y}) outside {bbox:?}");
        }
    }

    let before = canvas.surface().clone();
    assert!(canvas.fill(110, 5, Rgb::new(0, 0, 0)));
    let bbox = canvas.history().last_undo().expect("fill action").bounding_box;
    for (x, y) in changed_pixels(&before, canvas.surface()) {
        assert!(bbox.contains(x, y), "fill pixel ({x},{y}) outside {bbox:?}");
    }
}

#[test]
fn history_limit_from_settings_bounds_undo_depth() {
    let settings = scribble_canvas::paint::settings::CanvasSettings {
        width: 32,
        height: 32,
        history_limit: 2,
        ..Default::default()
    };
    let mut canvas = PaintCanvas::from_settings(&settings, Role::Artist, NullBroadcast)
        .expect("canvas from settings");
    for i in 0..4 {
        let p = [4.0 + i as f32 * 7.0, 16.0];
        canvas.pointer_down(PointerButton::Primary, p);
        canvas.pointer_up(PointerButton::Primary, p);
    }
    assert_eq!(canvas.history().undo_len(), 2);
    assert!(canvas.undo());
    assert!(canvas.undo());
    assert!(!canvas.undo());
    // the two oldest dots are no longer undoable
    assert_eq!(canvas.surface().pixel(4, 16), Some(Brush::default().color));
}
