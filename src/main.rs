use log::{error, info, LevelFilter};
use std::error::Error;

mod app;
mod config;
mod core;
mod lottery;
mod screens;
mod store;
mod ui;

fn main() -> Result<(), Box<dyn Error>> {
    // --- Logging Setup ---
    env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::Info) // Default level
        .filter_module("luckystage::lottery", LevelFilter::Debug)
        .filter_module("luckystage::ui::anim", LevelFilter::Info) // cancel chatter
        .filter_module("winit", LevelFilter::Warn)
        .init();

    info!("Application starting...");
    config::load();

    if let Err(e) = app::run() {
        error!("Application exited with error: {}", e);
        return Err(e);
    }

    info!("Application exited gracefully.");
    Ok(())
}
