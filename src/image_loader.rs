use futures::future::{self, BoxFuture};
use std::fmt;
use std::path::PathBuf;
use tiny_skia::{ColorU8, Pixmap};

use crate::error::{SurfaceError, SurfaceResult};

/// Where a background image comes from
#[derive(Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Image file on disk
    Path(PathBuf),
    /// Encoded image file contents
    Bytes(Vec<u8>),
}

impl fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::Path(path) => f.debug_tuple("Path").field(path).finish(),
            ImageSource::Bytes(bytes) => write!(f, "Bytes(<{} bytes>)", bytes.len()),
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::Path(path) => write!(f, "{}", path.display()),
            ImageSource::Bytes(bytes) => write!(f, "<{} bytes in memory>", bytes.len()),
        }
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        ImageSource::Path(path)
    }
}

/// Single-shot asynchronous image loading.
///
/// Resolves once with the decoded pixels or a [`SurfaceError::BackgroundLoad`].
pub trait ImageLoader {
    fn load(&self, source: &ImageSource) -> BoxFuture<'static, SurfaceResult<Pixmap>>;
}

/// Reads files and decodes them with the `image` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct DecodingLoader;

impl ImageLoader for DecodingLoader {
    fn load(&self, source: &ImageSource) -> BoxFuture<'static, SurfaceResult<Pixmap>> {
        let result = match source {
            ImageSource::Bytes(bytes) => decode(bytes, source),
            ImageSource::Path(path) => {
                log::info!("Loading background image from path: {}", path.display());
                match std::fs::read(path) {
                    Ok(bytes) => decode(&bytes, source),
                    Err(err) => Err(load_error(source, err)),
                }
            }
        };
        Box::pin(future::ready(result))
    }
}

fn load_error(source: &ImageSource, reason: impl fmt::Display) -> SurfaceError {
    SurfaceError::BackgroundLoad {
        image: source.to_string(),
        reason: reason.to_string(),
    }
}

/// Decode an encoded image into a premultiplied pixmap
pub fn decode(bytes: &[u8], source: &ImageSource) -> SurfaceResult<Pixmap> {
    let img = image::load_from_memory(bytes).map_err(|err| load_error(source, err))?;
    let rgba = img.to_rgba8();
    log::debug!("Decoded background image: {}x{}", rgba.width(), rgba.height());

    let mut pixmap = Pixmap::new(rgba.width(), rgba.height())
        .ok_or_else(|| load_error(source, "image has zero width or height"))?;
    for (dst, px) in pixmap.pixels_mut().iter_mut().zip(rgba.pixels()) {
        let [r, g, b, a] = px.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Ok(pixmap)
}
