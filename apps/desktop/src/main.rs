use anyhow::{anyhow, Result};
use eframe::{egui, NativeOptions};
use tracing_subscriber::EnvFilter;

mod app;
mod app_form;
mod app_result;
mod generation_manager;

use app::App;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([720.0, 480.0]),
        ..NativeOptions::default()
    };
    eframe::run_native(
        "Script Generator",
        options,
        Box::new(|_cc| Ok(Box::new(App::new()))),
    )
    .map_err(|err| anyhow!("failed to start the window: {err}"))
}
