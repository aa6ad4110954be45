use egui::Color32;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tiny_skia::Pixmap;

use crate::image_loader::ImageSource;

/// How a background image is scaled onto the surface.
///
/// Both modes keep the aspect ratio and center the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundMode {
    /// Fully visible, may letterbox
    #[default]
    Fit,
    /// Fully covering, may crop
    Fill,
}

/// Where a scaled background image lands on the surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub scale: f32,
    pub dx: f32,
    pub dy: f32,
    pub width: f32,
    pub height: f32,
}

impl BackgroundMode {
    pub fn scale(self, x_scale: f32, y_scale: f32) -> f32 {
        match self {
            BackgroundMode::Fit => x_scale.min(y_scale),
            BackgroundMode::Fill => x_scale.max(y_scale),
        }
    }

    /// Scale an `image_width x image_height` image onto the surface and center it
    pub fn placement(self, surface_width: f32, surface_height: f32, image_width: f32, image_height: f32) -> Placement {
        let scale = self.scale(surface_width / image_width, surface_height / image_height);
        let width = image_width * scale;
        let height = image_height * scale;
        Placement {
            scale,
            dx: (surface_width - width) / 2.0,
            dy: (surface_height - height) / 2.0,
            width,
            height,
        }
    }
}

impl std::str::FromStr for BackgroundMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fit" => Ok(BackgroundMode::Fit),
            "fill" => Ok(BackgroundMode::Fill),
            other => Err(format!("unknown background mode {other:?}")),
        }
    }
}

/// A background image reference together with its decoded pixels
#[derive(Clone)]
pub struct BackgroundImage {
    source: ImageSource,
    pixels: Arc<Pixmap>,
}

// Custom Debug implementation to keep pixel data out of logs
impl fmt::Debug for BackgroundImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackgroundImage")
            .field("source", &self.source)
            .field("width", &self.pixels.width())
            .field("height", &self.pixels.height())
            .finish()
    }
}

impl BackgroundImage {
    pub fn new(source: ImageSource, pixels: Pixmap) -> Self {
        Self {
            source,
            pixels: Arc::new(pixels),
        }
    }

    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    pub fn pixels(&self) -> &Pixmap {
        &self.pixels
    }
}

/// What is drawn beneath the strokes
#[derive(Debug, Clone, Default)]
pub struct BackgroundSpec {
    pub color: Option<Color32>,
    pub image: Option<BackgroundImage>,
    pub mode: BackgroundMode,
}

impl BackgroundSpec {
    /// Drop color and image, keeping the mode
    pub fn clear(&mut self) {
        self.color = None;
        self.image = None;
    }
}
