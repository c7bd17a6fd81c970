mod cli;
mod routes;
mod settings;
mod state;
mod stream;

use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;

use attendance_core::detection::infrastructure::model_resolver;
use attendance_core::detection::infrastructure::rustface_detector::{
    DetectorParams, RustfaceDetector,
};
use attendance_core::pipeline::frame_annotator::{bundled_font, load_font, FrameAnnotator};
use attendance_core::shared::constants::{FACE_MODEL_NAME, FACE_MODEL_URL};

use crate::cli::Cli;
use crate::settings::Settings;
use crate::state::AppState;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref())?;
    cli.apply(&mut settings);

    // blocking HTTP for the model download must finish before the runtime starts
    let model_path = resolve_model(&settings)?;
    RustfaceDetector::new(&model_path, DetectorParams::default())?;

    let font = match &settings.font_path {
        Some(path) => load_font(path)?,
        None => bundled_font()?,
    };
    let annotator = FrameAnnotator::new(Some(font));

    let state = AppState::from_settings(&settings, model_path, annotator);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(serve(&settings, state))
}

fn resolve_model(settings: &Settings) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(path) = &settings.model_path {
        log::info!("Using face model {}", path.display());
        return Ok(path.clone());
    }

    log::info!("Resolving model: {FACE_MODEL_NAME}");
    let path = model_resolver::resolve(
        FACE_MODEL_NAME,
        FACE_MODEL_URL,
        None,
        Some(Box::new(download_progress)),
    )?;
    Ok(path)
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        log::debug!("Downloading face model... {pct}%");
    } else {
        log::debug!("Downloading face model... {downloaded} bytes");
    }
}

async fn serve(settings: &Settings, state: AppState) -> Result<(), Box<dyn std::error::Error>> {
    let listener = tokio::net::TcpListener::bind((settings.host.as_str(), settings.port)).await?;
    log::info!("Listening on http://{}", listener.local_addr()?);

    let cancelled = state.cancelled.clone();
    axum::serve(listener, routes::router(state))
        .with_graceful_shutdown(shutdown_signal(cancelled))
        .await?;

    log::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C and tells running pipelines to stop.
async fn shutdown_signal(cancelled: Arc<AtomicBool>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("Shutting down");
    cancelled.store(true, Ordering::Relaxed);
}
