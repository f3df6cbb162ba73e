//! Benchmarks for the per-frame placement pipeline.
//!
//! Run with: `cargo bench --package perch-placement --bench placement_bench`
//!
//! The coordinator calls all three engines up to once per 32ms tick, so
//! the budget of interest is "comfortably under a millisecond for the
//! whole pipeline". Measurement dominates: the bubble path re-wraps text
//! on every call by design.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use perch_geometry::{
    ContainerRect, ModelRect, ViewPoint, VisualFrameOptions, ZoneOptions, compute_frame_pair,
    partition,
};
use perch_placement::{
    BubbleRequest, BubbleSurface, BubbleTuning, ContextZoneConstants, ContextZoneInput,
    DragHandleInput, TextSurface, compute_context_zone, compute_drag_handle, place,
};

const SHORT_TEXT: &str = "Back already? I was watching the cursor wander.";
const LONG_TEXT: &str = "Let me tell you about the afternoon: first the window moved, \
    then the window moved back, and then, in a development nobody predicted, \
    the window moved again. I kept notes. There will be a quiz later.";

fn request() -> BubbleRequest {
    let zones = partition(380.0, 620.0, 1000.0, 1.0, &ZoneOptions::default());
    BubbleRequest {
        scale: 1.0,
        zones,
        zones_visual: zones,
        container_width: 1000.0,
        container_height: 800.0,
        center_left: 380.0,
        center_right: 620.0,
        head_anchor_y: 300.0,
        head_top_y: 320.0,
        desktop_free_left: Some(420.0),
        desktop_free_right: Some(60.0),
        retry: 0,
    }
}

fn bench_bubble(c: &mut Criterion) {
    let mut group = c.benchmark_group("bubble_place");
    let tuning = BubbleTuning::default();
    let req = request();

    for (label, text) in [("short", SHORT_TEXT), ("long", LONG_TEXT)] {
        let mut surface = TextSurface::default();
        surface.set_text(text);
        group.bench_with_input(BenchmarkId::new("text", label), &req, |b, req| {
            b.iter(|| place(black_box(&mut surface), black_box(req), black_box(&tuning)));
        });
    }

    group.finish();
}

fn bench_drag_handle(c: &mut Criterion) {
    let input = DragHandleInput::new(
        1000.0,
        800.0,
        ModelRect::new(300.0, 200.0, 400.0, 600.0),
        ModelRect::new(0.0, 0.0, 1000.0, 1000.0),
    );
    c.bench_function("drag_handle", |b| {
        b.iter(|| compute_drag_handle(black_box(&input)));
    });
}

fn bench_context_zone(c: &mut Criterion) {
    let input = ContextZoneInput {
        container_width: 1000.0,
        container_height: 800.0,
        container_abs: ViewPoint::new(120.0, 90.0),
        model_top_y: 100.0,
        model_height: 400.0,
        desktop_free_left: Some(420.0),
        desktop_free_right: Some(60.0),
    };
    let constants = ContextZoneConstants::default();
    c.bench_function("context_zone", |b| {
        b.iter(|| compute_context_zone(black_box(&input), black_box(&constants)));
    });
}

fn bench_full_pipeline(c: &mut Criterion) {
    // One frame: project, partition twice, place all three engines.
    let bounds = ModelRect::new(300.0, 200.0, 400.0, 600.0);
    let screen = ModelRect::new(0.0, 0.0, 1000.0, 1000.0);
    let container = ContainerRect::sized(1000.0, 800.0);
    let frame_opts = VisualFrameOptions::default();
    let zone_opts = ZoneOptions::default();
    let tuning = BubbleTuning::default();
    let constants = ContextZoneConstants::default();

    let mut surface = TextSurface::default();
    surface.set_text(SHORT_TEXT);

    c.bench_function("frame_pipeline", |b| {
        b.iter(|| {
            let pair = compute_frame_pair(
                black_box(bounds),
                black_box(screen),
                container,
                &frame_opts,
                None,
            );
            let raw = partition(bounds.x / 2.0, bounds.right() / 2.0, 1000.0, 1.0, &zone_opts);
            let visual = pair.map_or(raw, |p| {
                partition(p.visible.left, p.visible.right, 1000.0, 1.0, &zone_opts)
            });
            let mut req = request();
            req.zones = raw;
            req.zones_visual = visual;
            let bubble = place(&mut surface, &req, &tuning);

            let handle = compute_drag_handle(&DragHandleInput::new(1000.0, 800.0, bounds, screen));
            let zone = compute_context_zone(
                &ContextZoneInput {
                    container_width: 1000.0,
                    container_height: 800.0,
                    container_abs: ViewPoint::new(120.0, 90.0),
                    model_top_y: 100.0,
                    model_height: 400.0,
                    desktop_free_left: Some(420.0),
                    desktop_free_right: Some(60.0),
                },
                &constants,
            );
            (bubble, handle, zone)
        });
    });
}

criterion_group!(
    benches,
    bench_bubble,
    bench_drag_handle,
    bench_context_zone,
    bench_full_pipeline,
);

criterion_main!(benches);
