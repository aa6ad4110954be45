use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::error::{SurfaceError, SurfaceResult};

/// Live pen and surface settings.
///
/// The pen applies to the next stroke; a size change recreates the pixel context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct SurfaceConfig {
    pub width: u32,
    pub height: u32,
    pub color: Color32,
    pub size: f32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            color: Color32::BLACK,
            size: 16.0,
        }
    }
}

impl SurfaceConfig {
    pub fn validate(&self) -> SurfaceResult<()> {
        validate_dimensions(self.width, self.height)?;
        validate_line_width(self.size)
    }
}

pub(crate) fn validate_dimensions(width: u32, height: u32) -> SurfaceResult<()> {
    if width == 0 || height == 0 {
        return Err(SurfaceError::InvalidDimensions { width, height });
    }
    Ok(())
}

pub(crate) fn validate_line_width(size: f32) -> SurfaceResult<()> {
    if !(size.is_finite() && size > 0.0) {
        return Err(SurfaceError::InvalidLineWidth(size));
    }
    Ok(())
}
