use std::path::Path;

use log::warn;
use rustic_map::{
    config::settings::{Settings, SETTINGS_FILE},
    errors::error_types::ErrorTypes,
    ui::app::MapViewApp,
};

fn main() -> Result<(), ErrorTypes> {
    env_logger::init();

    let settings = match Settings::load(Path::new(SETTINGS_FILE)) {
        Ok(settings) => settings,
        Err(err) => {
            warn!("{}, using default settings", err);
            Settings::default()
        }
    };

    eframe::run_native(
        "Rustic Map",
        Default::default(),
        Box::new(move |cc| Ok(Box::new(MapViewApp::new(cc.egui_ctx.clone(), &settings)))),
    )
    .map_err(|e| ErrorTypes::new(600, format!("Could not start the window: {}", e)))
}
