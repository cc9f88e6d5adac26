// Copyright (C) 2025 Joshua Kesler
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

mod app;
mod camera;
mod capture;
mod config;
mod errors;
mod gallery;
mod imaging;
mod messages;
mod session;
mod state;

use anyhow::{anyhow, Result};
use clap::Parser;
use config::Config;
use crossbeam_channel::{bounded, unbounded};
use eframe::NativeOptions;
use gallery::store::DirectoryGallery;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

// RUST_LOG wins unless -v is given explicitly.
fn log_directives(verbosity: u8, rust_log: Option<String>) -> String {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE
    };
    match rust_log {
        Some(env) if verbosity == 0 && !env.trim().is_empty() => env,
        _ => format!("shutter={},nokhwa=warn,wgpu=warn,winit=warn", level)
    }
}

fn init_tracing(verbosity: u8) -> Result<()> {
    let directives = log_directives(verbosity, std::env::var(EnvFilter::DEFAULT_ENV).ok());
    let filter = EnvFilter::try_new(directives)?;
    fmt().with_env_filter(filter).with_target(true).init();
    Ok(())
}

fn main() -> Result<()> {
    let config = Config::parse();
    init_tracing(config.verbose)?;

    let gallery_root = config.gallery_dir.clone().unwrap_or_else(DirectoryGallery::default_root);
    info!(lens = %config.lens, gallery = %gallery_root.display(), "starting");

    let (cam_tx, cam_rx) = unbounded();
    let (preview_tx, preview_rx) = bounded(1);
    let (cam_command_tx, cam_command_rx) = unbounded();
    let (gallery_command_tx, gallery_command_rx) = unbounded();
    let (gallery_status_tx, gallery_status_rx) = unbounded();
    camera::start_camera_thread(config.clone(), cam_tx, preview_tx, cam_command_rx);
    gallery::start_thread(DirectoryGallery::new(gallery_root.clone(), config.jpeg_quality), gallery_command_rx, gallery_status_tx);

    let options = NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([900.0, 620.0]),
        ..Default::default()
    };

    let lens = config.lens;
    eframe::run_native("Shutter", options, Box::new(move |cc| {
        Ok(Box::new(app::ShutterApp::new(cc, lens, gallery_root, cam_rx, preview_rx, cam_command_tx, gallery_command_tx, gallery_status_rx)))
    })).map_err(|e| anyhow!("window closed with error: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rust_log_is_kept_without_verbose_flag() {
        assert_eq!(log_directives(0, Some(String::from("shutter=trace"))), "shutter=trace");
        assert_eq!(log_directives(0, None), "shutter=INFO,nokhwa=warn,wgpu=warn,winit=warn");
        assert_eq!(log_directives(0, Some(String::new())), "shutter=INFO,nokhwa=warn,wgpu=warn,winit=warn");
    }

    #[test]
    fn verbose_flag_overrides_rust_log() {
        assert_eq!(log_directives(1, Some(String::from("shutter=warn"))), "shutter=DEBUG,nokhwa=warn,wgpu=warn,winit=warn");
        assert_eq!(log_directives(3, None), "shutter=TRACE,nokhwa=warn,wgpu=warn,winit=warn");
        assert!(EnvFilter::try_new(log_directives(2, None)).is_ok());
    }
}
