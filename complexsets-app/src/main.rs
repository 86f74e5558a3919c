mod app;
mod hud;
mod input;
mod preferences;

fn main() -> eframe::Result {
    app::run()
}
