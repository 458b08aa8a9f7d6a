//! Render pipeline benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{Rgba, RgbaImage};

use glyphcam::filter::FilterKind;
use glyphcam::render::{self, RenderMode};

fn create_test_frame(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let r = ((x as f32 / width as f32) * 255.0) as u8;
        let g = ((y as f32 / height as f32) * 255.0) as u8;
        let b = (((x + y) as f32 / (width + height) as f32) * 255.0) as u8;
        Rgba([r, g, b, 255])
    })
}

fn benchmark_render_modes(c: &mut Criterion) {
    let frame = create_test_frame(640, 480);

    let mut group = c.benchmark_group("Render Modes");

    for mode in [
        RenderMode::Ascii,
        RenderMode::Detailed,
        RenderMode::Color,
        RenderMode::Structure,
    ] {
        group.bench_function(format!("{:?}", mode), |b| {
            b.iter(|| render::render_view(black_box(&frame), 80, 24, black_box(mode), true))
        });
    }

    group.finish();
}

fn benchmark_viewport_widths(c: &mut Criterion) {
    let frame = create_test_frame(640, 480);

    let mut group = c.benchmark_group("ASCII Widths");

    for width in [40u32, 80, 120, 160] {
        group.bench_function(format!("width_{}", width), |b| {
            b.iter(|| {
                render::render_view(
                    black_box(&frame),
                    black_box(width),
                    48,
                    RenderMode::Ascii,
                    true,
                )
            })
        });
    }

    group.finish();
}

fn benchmark_filters(c: &mut Criterion) {
    let frame = create_test_frame(640, 480);

    let mut group = c.benchmark_group("Filters");

    for filter in [
        FilterKind::None,
        FilterKind::Grayscale,
        FilterKind::Invert,
        FilterKind::Sepia,
        FilterKind::RedTint,
    ] {
        group.bench_function(format!("{:?}", filter), |b| {
            b.iter(|| filter.apply(black_box(&frame)).into_owned())
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_render_modes,
    benchmark_viewport_widths,
    benchmark_filters,
);

criterion_main!(benches);
