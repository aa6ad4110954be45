use egui::Color32;

use crate::error::{SurfaceError, SurfaceResult};

/// Parse a host-facing color string.
///
/// Accepts `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa` and the CSS basic color keywords.
pub fn parse_color(input: &str) -> SurfaceResult<Color32> {
    let trimmed = input.trim();
    if trimmed.starts_with('#') {
        return Color32::from_hex(trimmed).map_err(|_| SurfaceError::InvalidColor(input.to_owned()));
    }

    named_color(&trimmed.to_ascii_lowercase()).ok_or_else(|| SurfaceError::InvalidColor(input.to_owned()))
}

fn named_color(name: &str) -> Option<Color32> {
    let color = match name {
        "black" => Color32::from_rgb(0, 0, 0),
        "silver" => Color32::from_rgb(192, 192, 192),
        "gray" | "grey" => Color32::from_rgb(128, 128, 128),
        "white" => Color32::from_rgb(255, 255, 255),
        "maroon" => Color32::from_rgb(128, 0, 0),
        "red" => Color32::from_rgb(255, 0, 0),
        "purple" => Color32::from_rgb(128, 0, 128),
        "fuchsia" | "magenta" => Color32::from_rgb(255, 0, 255),
        "green" => Color32::from_rgb(0, 128, 0),
        "lime" => Color32::from_rgb(0, 255, 0),
        "olive" => Color32::from_rgb(128, 128, 0),
        "yellow" => Color32::from_rgb(255, 255, 0),
        "navy" => Color32::from_rgb(0, 0, 128),
        "blue" => Color32::from_rgb(0, 0, 255),
        "teal" => Color32::from_rgb(0, 128, 128),
        "aqua" | "cyan" => Color32::from_rgb(0, 255, 255),
        "orange" => Color32::from_rgb(255, 165, 0),
        "transparent" => Color32::TRANSPARENT,
        _ => return None,
    };
    Some(color)
}

/// Convert to the rasterizer's color type
pub(crate) fn to_skia(color: Color32) -> tiny_skia::Color {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    tiny_skia::Color::from_rgba8(r, g, b, a)
}
