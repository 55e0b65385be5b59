// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! annobox - bounding-box self-annotation editor
//!
//! A desktop editor for drawing labeled bounding boxes on the images of a
//! dataset version. Sessions come from a local session file or from the
//! dataset backend; saves go to a snapshot file or back to the backend.

mod app;
mod config;
mod interaction;
mod io;
mod models;
mod ui;
mod util;

use anyhow::Result;
use app::{AnnoboxApp, SaveHandler, SessionLoader};
use clap::Parser;
use config::{Config, SaveTarget, SessionSource};
use io::backend::BackendClient;
use models::session::{ImageRef, Session};
use models::store::InitialAnnotations;

fn session_loader(source: SessionSource, client: BackendClient) -> SessionLoader {
    Box::new(move || -> Result<(Vec<ImageRef>, InitialAnnotations)> {
        match source {
            SessionSource::File(ref path) => {
                let file = io::serialization::import_session(path)?;
                log::info!("Read session file {}", path.display());
                Ok((file.images, file.annotations))
            }
            SessionSource::Dataset {
                dataset_id,
                ref version,
            } => Ok(client.session_parts(client.fetch_dataset(dataset_id, version)?)),
        }
    })
}

fn save_handler(target: SaveTarget, client: BackendClient) -> SaveHandler {
    match target {
        SaveTarget::File(path) => Box::new(move |snapshot| {
            match io::serialization::export_snapshot(&snapshot, &path) {
                Ok(()) => log::info!("Wrote annotations to {}", path.display()),
                Err(e) => log::error!("Failed to write annotations to {}: {}", path.display(), e),
            }
        }),
        SaveTarget::Backend {
            dataset_id,
            version_tag,
        } => Box::new(move |snapshot| {
            let client = client.clone();
            let version_tag = version_tag.clone();
            std::thread::spawn(move || {
                if let Err(e) = client.save_annotations(dataset_id, &version_tag, &snapshot) {
                    log::error!("Failed to save annotations: {}", e);
                }
            });
        }),
    }
}

fn main() -> Result<()> {
    let config = Config::parse();

    // Initialize logging; RUST_LOG still overrides the flag
    env_logger::Builder::new()
        .filter_level(config.log_level.to_level_filter())
        .parse_default_env()
        .init();

    let credential = config.credential();
    let client = BackendClient::new(&config.api_base, credential.clone());
    let mut loader = session_loader(config.source()?, client.clone());
    let (images, initial) = loader()?;
    let session = Session::new(images, initial)?;
    let on_save = save_handler(config.save_target()?, client);

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("annobox - Self-Annotation Tool"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "annobox",
        options,
        Box::new(move |_cc| Ok(Box::new(AnnoboxApp::new(session, credential, on_save, loader)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
