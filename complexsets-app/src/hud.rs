use eframe::egui;

use crate::app::{ExplorerApp, HUD_CORNER_RADIUS, HUD_MARGIN};

impl ExplorerApp {
    pub(crate) fn show_hud(&self, ctx: &egui::Context) {
        if !self.show_hud {
            return;
        }

        let state = self.controller.view_state();
        let center = self.controller.map().center();

        egui::Area::new(egui::Id::new("hud_view"))
            .anchor(egui::Align2::LEFT_TOP, [HUD_MARGIN, HUD_MARGIN])
            .show(ctx, |ui| {
                egui::Frame::NONE
                    .fill(egui::Color32::from_black_alpha(180))
                    .inner_margin(egui::Margin::same(8))
                    .corner_radius(HUD_CORNER_RADIUS)
                    .show(ui, |ui| {
                        ui.style_mut().visuals.override_text_color =
                            Some(egui::Color32::from_rgb(220, 220, 220));

                        ui.label(format!("Center: {:.10} {:+.10}i", center.re, center.im));
                        ui.label(format!("Zoom: {:.3e}", state.zoom));
                        ui.label(format!("Iterations: {}", state.iteration_budget));
                        ui.label(format!("Escape radius: {}", state.escape_radius));

                        if let Some(stats) = self.controller.last_render() {
                            ui.label(format!(
                                "{:.1} ms, {:.2} Mpx/s on {} threads",
                                stats.elapsed.as_secs_f64() * 1000.0,
                                stats.pixels_per_second() / 1e6,
                                stats.workers,
                            ));
                        }
                    });
            });
    }
}
