use eframe::egui;
use tracing::warn;

use complexsets_render::WindowPlacement;

use crate::app::{canvas_size, ExplorerApp};

/// Scroll delta egui reports for one mouse-wheel notch.
const POINTS_PER_NOTCH: f32 = 50.0;
/// Secondary drags shorter than this (in points) on both axes are ignored.
const MIN_ZOOM_RECT: f32 = 5.0;

impl ExplorerApp {
    pub(crate) fn handle_canvas_input(&mut self, ctx: &egui::Context, response: &egui::Response) {
        let origin = response.rect.min;
        let to_pixel = |pos: egui::Pos2| ((pos.x - origin.x) as f64, (pos.y - origin.y) as f64);

        // -- Wheel zoom around the cursor --
        let scroll_y = ctx.input(|i| i.raw_scroll_delta.y);
        if scroll_y.abs() > 0.0 && response.hovered() {
            if let Some(pos) = response.hover_pos() {
                let notches = (scroll_y / POINTS_PER_NOTCH) as f64;
                let factor = (1.0 + notches * self.preferences.zoom_step).clamp(0.1, 10.0);
                self.controller.zoom_at_point(factor, to_pixel(pos));
            }
        }

        // -- Primary drag pans; a click re-centres --
        if response.drag_started_by(egui::PointerButton::Primary) {
            self.pan_remainder = egui::Vec2::ZERO;
        }
        if response.dragged_by(egui::PointerButton::Primary) {
            self.pan_remainder += response.drag_delta();
            let dx = self.pan_remainder.x.trunc();
            let dy = self.pan_remainder.y.trunc();
            if dx != 0.0 || dy != 0.0 {
                self.pan_remainder -= egui::vec2(dx, dy);
                self.controller.pan(dx as i32, dy as i32);
            }
        }
        if response.clicked_by(egui::PointerButton::Primary) {
            if let Some(pos) = response.interact_pointer_pos() {
                let center = response.rect.center();
                let offset = center - pos;
                self.controller
                    .pan(offset.x.round() as i32, offset.y.round() as i32);
            }
        }

        // -- Secondary drag draws a zoom rectangle --
        if response.drag_started_by(egui::PointerButton::Secondary) {
            self.zoom_rect_start = response.interact_pointer_pos();
        }
        if response.dragged_by(egui::PointerButton::Secondary) {
            self.zoom_rect_current = response.interact_pointer_pos();
        }
        if response.drag_stopped_by(egui::PointerButton::Secondary) {
            let end = response.interact_pointer_pos().or(self.zoom_rect_current);
            if let (Some(start), Some(end)) = (self.zoom_rect_start, end) {
                let size = (end - start).abs();
                if size.x > MIN_ZOOM_RECT || size.y > MIN_ZOOM_RECT {
                    let zoom_out = ctx.input(|i| i.modifiers.shift);
                    self.controller
                        .zoom_to_rect(to_pixel(start), to_pixel(end), zoom_out);
                }
            }
            self.zoom_rect_start = None;
            self.zoom_rect_current = None;
        }
    }

    pub(crate) fn handle_keyboard(&mut self, ctx: &egui::Context) {
        let mut toggle_fullscreen = false;

        ctx.input(|input| {
            if input.key_pressed(egui::Key::R) {
                self.controller.reset();
            }
            if input.key_pressed(egui::Key::Plus) || input.key_pressed(egui::Key::Equals) {
                self.controller.scale_iteration_budget(10.0);
            }
            if input.key_pressed(egui::Key::Minus) {
                self.controller.scale_iteration_budget(0.1);
            }
            if input.key_pressed(egui::Key::H) {
                self.show_hud = !self.show_hud;
            }
            toggle_fullscreen = input.key_pressed(egui::Key::F11);
        });

        if toggle_fullscreen {
            self.toggle_fullscreen(ctx);
        }
    }

    fn toggle_fullscreen(&mut self, ctx: &egui::Context) {
        let (outer, inner, monitor) = ctx.input(|i| {
            let viewport = i.viewport();
            (viewport.outer_rect, viewport.inner_rect, viewport.monitor_size)
        });
        let (Some(outer), Some(inner), Some(monitor)) = (outer, inner, monitor) else {
            warn!("Window geometry unavailable, cannot toggle fullscreen");
            return;
        };

        let (width, height) = canvas_size(inner.size());
        let current = WindowPlacement {
            x: outer.min.x.round() as i32,
            y: outer.min.y.round() as i32,
            width,
            height,
        };
        let next = self.controller.toggle_fullscreen(current, canvas_size(monitor));

        // The canvas fills the window, so the next frame's resize check sees
        // the size the controller already rendered at.
        if self.controller.is_fullscreen() {
            ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(true));
        } else {
            ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(false));
            ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(egui::pos2(
                next.x as f32,
                next.y as f32,
            )));
            ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(egui::vec2(
                next.width as f32,
                next.height as f32,
            )));
        }
    }
}
