use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::Path;

use crate::background::BackgroundSpec;
use crate::canvas::Canvas;
use crate::compositor;
use crate::error::{SurfaceError, SurfaceResult};
use crate::stroke::StrokeRef;

pub const DEFAULT_FILENAME: &str = "image.png";
pub const DEFAULT_MIME_TYPE: &str = "image/png";

/// Map a MIME type to an encoder
pub fn format_for_mime(mime_type: &str) -> SurfaceResult<ImageFormat> {
    match mime_type.trim().to_ascii_lowercase().as_str() {
        "image/png" => Ok(ImageFormat::Png),
        "image/jpeg" | "image/jpg" => Ok(ImageFormat::Jpeg),
        "image/bmp" => Ok(ImageFormat::Bmp),
        "image/webp" => Ok(ImageFormat::WebP),
        "image/tiff" => Ok(ImageFormat::Tiff),
        _ => Err(SurfaceError::UnsupportedFormat(mime_type.to_owned())),
    }
}

/// Composite onto a fresh buffer, leaving any live canvas untouched
pub fn render_offscreen(
    width: u32,
    height: u32,
    background: &BackgroundSpec,
    strokes: &[StrokeRef],
) -> SurfaceResult<Canvas> {
    let mut canvas = Canvas::new(width, height)?;
    compositor::render(&mut canvas, background, strokes);
    Ok(canvas)
}

/// Encode the canvas in the format named by `mime_type`
pub fn encode(canvas: &Canvas, mime_type: &str) -> SurfaceResult<Vec<u8>> {
    let format = format_for_mime(mime_type)?;
    let rgba = DynamicImage::ImageRgba8(canvas.to_rgba_image());
    let image = match format {
        // JPEG has no alpha channel
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(rgba.to_rgb8()),
        _ => rgba,
    };

    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), format)?;
    Ok(bytes)
}

/// Write encoded bytes to `path`
pub fn write_file(path: &Path, bytes: &[u8]) -> SurfaceResult<()> {
    std::fs::write(path, bytes)?;
    log::info!("Exported {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
