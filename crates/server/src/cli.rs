use std::path::PathBuf;

use clap::Parser;

use crate::settings::Settings;

/// Webcam face detection stream with a simulated attendance ledger.
#[derive(Parser, Debug)]
#[command(name = "attendance-server", version)]
pub struct Cli {
    /// Settings file (default: platform config dir).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Address to bind.
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on.
    #[arg(long)]
    pub port: Option<u16>,

    /// V4L2 camera device.
    #[arg(long)]
    pub camera: Option<String>,

    /// Directory for registered face images.
    #[arg(long)]
    pub faces_dir: Option<PathBuf>,

    /// Cascade model file; skips download.
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Font for on-frame text.
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Course label stamped on attendance records.
    #[arg(long)]
    pub course: Option<String>,
}

impl Cli {
    /// Overrides the fields given on the command line.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(host) = &self.host {
            settings.host = host.clone();
        }
        if let Some(port) = self.port {
            settings.port = port;
        }
        if let Some(camera) = &self.camera {
            settings.camera_device = camera.clone();
        }
        if let Some(dir) = &self.faces_dir {
            settings.faces_dir = dir.clone();
        }
        if let Some(model) = &self.model {
            settings.model_path = Some(model.clone());
        }
        if let Some(font) = &self.font {
            settings.font_path = Some(font.clone());
        }
        if let Some(course) = &self.course {
            settings.course = course.clone();
        }
    }
}
