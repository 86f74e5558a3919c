use std::num::NonZeroUsize;

use complexsets_core::{Color, ColorGradient, ColorStop, Complex, EscapeParams, Pixel};
use complexsets_render::{Rasterizer, ViewportController};

fn controller(width: u32, height: u32, budget: u32, workers: usize) -> ViewportController {
    let gradient = ColorGradient::new(vec![
        ColorStop::new(Color::new(0.0, 0.0, 0.3), 0.0),
        ColorStop::new(Color::new(1.0, 0.75, 0.0), 0.25),
        ColorStop::new(Color::WHITE, 1.0),
    ])
    .unwrap();
    ViewportController::new(
        width,
        height,
        EscapeParams::new(budget, 100.0).unwrap(),
        gradient,
        Rasterizer::new(NonZeroUsize::new(workers)).unwrap(),
    )
}

#[test]
fn scenario_centre_pixel_is_black() {
    let c = controller(100, 100, 100, 4);
    let view = c.view_state();
    assert_eq!(view.zoom, 2.1);
    assert_eq!(view.translation, Complex::new(0.75, 0.0));
    assert_eq!(view.iteration_budget, 100);
    assert_eq!(view.escape_radius, 100.0);

    assert_eq!(
        c.buffer().get(50, 50),
        Pixel {
            r: 0,
            g: 0,
            b: 0,
            a: 255
        }
    );
}

#[test]
fn every_pixel_is_opaque_after_render() {
    let c = controller(73, 41, 80, 5);
    assert!(c.buffer().pixels.iter().all(|p| p.a == 255));
    let has_color = c
        .buffer()
        .as_bytes()
        .chunks_exact(4)
        .any(|px| px[0] > 0 || px[1] > 0 || px[2] > 0);
    assert!(has_color, "default view should contain escaped points");
}

#[test]
fn pan_matches_full_render() {
    // A power-of-two zoom on a 64-pixel buffer keeps every coordinate a
    // short dyadic fraction, so shifted and recomputed pixels agree exactly.
    // On other views the shifted pixels carry the rounding of the old
    // translation; see `pan_on_default_view_stays_close_to_full_render`.
    let mut panned = controller(64, 64, 60, 3);
    panned.jump_to(2.0, Complex::new(0.5, 0.0));

    for &(dx, dy) in &[(5, -3), (-12, 7), (0, 9), (20, 0), (-1, -1), (0, -30)] {
        panned.pan(dx, dy);

        let view = panned.view_state();
        let mut fresh = controller(64, 64, 60, 7);
        fresh.jump_to(view.zoom, view.translation);

        assert_eq!(fresh.view_state(), view);
        assert_eq!(
            panned.buffer().pixels,
            fresh.buffer().pixels,
            "pan ({dx}, {dy}) diverged from a full render"
        );
    }
}

#[test]
fn pan_on_default_view_stays_close_to_full_render() {
    // Plane coordinates here are not exactly representable, so a pixel on a
    // color boundary may land on either side after a pan. Only a handful
    // may differ from a fresh render.
    let mut panned = controller(100, 100, 100, 4);
    for &(dx, dy) in &[(5, -3), (-12, 7), (0, 9), (13, 0)] {
        panned.pan(dx, dy);

        let view = panned.view_state();
        let mut fresh = controller(100, 100, 100, 4);
        fresh.jump_to(view.zoom, view.translation);

        let differing = panned
            .buffer()
            .pixels
            .iter()
            .zip(&fresh.buffer().pixels)
            .filter(|(a, b)| a != b)
            .count();
        assert!(
            differing * 100 < 100 * 100,
            "pan ({dx}, {dy}): {differing} pixels differ"
        );
    }
}

#[test]
fn reset_is_idempotent() {
    let mut c = controller(50, 40, 100, 2);
    c.zoom_at_point(3.0, (10.0, 10.0));
    c.pan(7, 4);

    c.reset();
    let first_view = c.view_state();
    let first_pixels = c.buffer().pixels.clone();

    c.reset();
    assert_eq!(c.view_state(), first_view);
    assert_eq!(c.buffer().pixels, first_pixels);

    let fresh = controller(50, 40, 100, 2);
    assert_eq!(fresh.buffer().pixels, first_pixels);
}

#[test]
fn worker_count_does_not_change_output() {
    let mut one = controller(90, 37, 120, 1);
    let mut many = controller(90, 37, 120, 16);
    one.zoom_to_rect((20.0, 5.0), (50.0, 30.0), false);
    many.zoom_to_rect((20.0, 5.0), (50.0, 30.0), false);
    assert_eq!(one.buffer().pixels, many.buffer().pixels);
}

#[test]
fn zoom_to_rect_then_out_restores_view() {
    let mut c = controller(80, 80, 50, 4);
    let start = c.view_state();
    c.zoom_to_rect((20.0, 20.0), (60.0, 60.0), false);
    assert!((c.view_state().zoom - start.zoom * 0.5).abs() < 1e-12);

    c.zoom_to_rect((20.0, 20.0), (60.0, 60.0), true);
    let end = c.view_state();
    assert!((end.zoom - start.zoom).abs() < 1e-12);
    assert!((end.translation.re - start.translation.re).abs() < 1e-12);
    assert!((end.translation.im - start.translation.im).abs() < 1e-12);
}
