use eframe::egui;
use tracing::info;

use complexsets_core::Complex;
use complexsets_render::{Rasterizer, ViewportController};

use crate::preferences::{LastView, Preferences};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// HUD box margin.
pub(crate) const HUD_MARGIN: f32 = 8.0;
/// HUD box corner radius.
pub(crate) const HUD_CORNER_RADIUS: f32 = 6.0;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

pub(crate) struct ExplorerApp {
    pub(crate) controller: ViewportController,
    pub(crate) preferences: Preferences,

    texture: Option<egui::TextureHandle>,
    /// Buffer generation currently held by `texture`.
    uploaded_generation: Option<u64>,

    /// Corners of the secondary-drag zoom rectangle, in screen points.
    pub(crate) zoom_rect_start: Option<egui::Pos2>,
    pub(crate) zoom_rect_current: Option<egui::Pos2>,
    /// Sub-pixel drag motion not yet applied as a pan.
    pub(crate) pan_remainder: egui::Vec2,

    pub(crate) show_hud: bool,
}

impl ExplorerApp {
    pub(crate) fn new(preferences: Preferences) -> complexsets_render::Result<Self> {
        let rasterizer = Rasterizer::new(preferences.worker_count())?;
        let restored = preferences
            .last_view
            .clone()
            .filter(|_| preferences.restore_last_view);

        let mut params = preferences.escape_params();
        if let Some(view) = &restored {
            params = params.with_iteration_budget(view.iteration_budget.max(1));
        }

        let mut controller = ViewportController::new(
            preferences.window_width.max(1.0) as u32,
            preferences.window_height.max(1.0) as u32,
            params,
            preferences.gradient.clone(),
            rasterizer,
        );
        if let Some(view) = restored {
            info!(zoom = view.zoom, "Restoring last view");
            controller.jump_to(
                view.zoom,
                Complex::new(view.translation_re, view.translation_im),
            );
        }

        Ok(Self {
            controller,
            preferences,
            texture: None,
            uploaded_generation: None,
            zoom_rect_start: None,
            zoom_rect_current: None,
            pan_remainder: egui::Vec2::ZERO,
            show_hud: true,
        })
    }

    fn capture_last_view(&self) -> LastView {
        let state = self.controller.view_state();
        LastView {
            zoom: state.zoom,
            translation_re: state.translation.re,
            translation_im: state.translation.im,
            iteration_budget: state.iteration_budget,
        }
    }

    /// Resize the controller when the canvas size no longer matches the buffer.
    fn check_resize(&mut self, width: u32, height: u32) {
        let buffer = self.controller.buffer();
        if buffer.width != width || buffer.height != height {
            self.controller.resize(width, height);
        }
    }

    /// Re-upload the texture if the controller produced a new frame.
    fn sync_texture(&mut self, ctx: &egui::Context) {
        let generation = self.controller.generation();
        if self.uploaded_generation == Some(generation) {
            return;
        }
        let buffer = self.controller.buffer();
        let image = egui::ColorImage::from_rgba_unmultiplied(
            [buffer.width as usize, buffer.height as usize],
            buffer.as_bytes(),
        );
        match &mut self.texture {
            Some(texture) => texture.set(image, egui::TextureOptions::NEAREST),
            None => {
                self.texture =
                    Some(ctx.load_texture("complex_set", image, egui::TextureOptions::NEAREST));
            }
        }
        self.uploaded_generation = Some(generation);
    }

    fn draw_zoom_rect(&self, painter: &egui::Painter) {
        if let (Some(start), Some(current)) = (self.zoom_rect_start, self.zoom_rect_current) {
            let rect = egui::Rect::from_two_pos(start, current);
            painter.rect_filled(rect, 0.0, egui::Color32::from_white_alpha(20));
            painter.rect_stroke(
                rect,
                0.0,
                egui::Stroke::new(1.0, egui::Color32::WHITE),
                egui::StrokeKind::Inside,
            );
        }
    }
}

/// Whole-pixel buffer size for a canvas or window of `size` points.
///
/// Window placements handed to the controller go through this too, so a
/// fullscreen toggle and the following frame's resize check agree.
pub(crate) fn canvas_size(size: egui::Vec2) -> (u32, u32) {
    (size.x.max(1.0) as u32, size.y.max(1.0) as u32)
}

// ---------------------------------------------------------------------------
// eframe::App
// ---------------------------------------------------------------------------

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(egui::Visuals::dark());

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(egui::Color32::BLACK))
            .show(ctx, |ui| {
                let available = ui.available_size();
                let (width, height) = canvas_size(available);
                self.check_resize(width, height);

                let (response, painter) =
                    ui.allocate_painter(available, egui::Sense::click_and_drag());
                self.handle_canvas_input(ctx, &response);

                self.sync_texture(ctx);
                if let Some(texture) = &self.texture {
                    let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                    let size = egui::vec2(
                        self.controller.buffer().width as f32,
                        self.controller.buffer().height as f32,
                    );
                    let image_rect = egui::Rect::from_min_size(response.rect.min, size);
                    painter.image(texture.id(), image_rect, uv, egui::Color32::WHITE);
                }
                self.draw_zoom_rect(&painter);
            });

        self.handle_keyboard(ctx);
        self.show_hud(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.preferences.last_view = Some(self.capture_last_view());
        self.preferences.save();
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub(crate) fn run() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting Complex Sets");

    let prefs = Preferences::load();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Complex Sets")
            .with_inner_size([prefs.window_width, prefs.window_height]),
        ..Default::default()
    };

    eframe::run_native(
        "Complex Sets",
        options,
        Box::new(move |_cc| Ok(Box::new(ExplorerApp::new(prefs)?))),
    )
}
