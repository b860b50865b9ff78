use circular_gallery::gui::frontend::GalleryApp;
use circular_gallery::persistence::settings::AppSettings;

use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();
    let settings = AppSettings::load().unwrap_or_else(|e| {
        log::warn!("could not read settings, using defaults: {:#}", e);
        AppSettings::default()
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([settings.window_width, settings.window_height])
            // Keep room for a handful of tiles on small screens
            .with_min_inner_size([480.0, 420.0])
            .with_resizable(true)
            .with_drag_and_drop(true),
        ..Default::default()
    };
    eframe::run_native(
        "Circular Gallery",
        options,
        Box::new(move |cc| Ok(Box::new(GalleryApp::new(&cc.egui_ctx, settings)) as Box<dyn eframe::App>)),
    )
}
