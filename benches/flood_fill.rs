use criterion::{criterion_group, criterion_main, Criterion};
use scribble_canvas::paint::fill::flood_fill;
use scribble_canvas::paint::{RasterSurface, Rgb, SurfaceSize};

fn maze_surface() -> RasterSurface {
    let mut surface = RasterSurface::new(SurfaceSize::new(800, 600));
    // vertical walls with alternating gaps force many spans
    for x in (20..800).step_by(20) {
        let gap = if (x / 20) % 2 == 0 { 0..20 } else { 580..600 };
        for y in 0..600 {
            if !gap.contains(&y) {
                surface.set_pixel(x, y, Rgb::BLACK);
            }
        }
    }
    surface
}

fn bench_flood_fill(c: &mut Criterion) {
    let blank = RasterSurface::new(SurfaceSize::new(800, 600));
    c.bench_function("fill_blank_800x600", |b| {
        b.iter(|| {
            let mut surface = blank.clone();
            flood_fill(&mut surface, 400, 300, Rgb::new(0, 255, 0))
        })
    });

    let maze = maze_surface();
    c.bench_function("fill_maze_800x600", |b| {
        b.iter(|| {
            let mut surface = maze.clone();
            flood_fill(&mut surface, 5, 5, Rgb::new(0, 0, 255))
        })
    });
}

criterion_group!(benches, bench_flood_fill);
criterion_main!(benches);
