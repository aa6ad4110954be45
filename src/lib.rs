#![warn(clippy::all, rust_2018_idioms)]

pub mod background;
pub mod canvas;
pub mod capture;
pub mod color;
pub mod compositor;
pub mod config;
pub mod error;
pub mod event;
pub mod export;
pub mod geometry;
pub mod history;
pub mod image_loader;
pub mod input;
pub mod playback;
pub mod stroke;
pub mod surface;
pub mod util;

pub use background::{BackgroundImage, BackgroundMode, BackgroundSpec, Placement};
pub use canvas::Canvas;
pub use capture::StrokeCapture;
pub use config::SurfaceConfig;
pub use error::{SurfaceError, SurfaceResult};
pub use event::{EventBus, EventHandler, SurfaceEvent};
pub use geometry::{Point, Segment};
pub use history::{History, HistoryState};
pub use image_loader::{DecodingLoader, ImageLoader, ImageSource};
pub use input::InputEvent;
#[cfg(not(target_arch = "wasm32"))]
pub use playback::ThreadTimer;
#[cfg(target_arch = "wasm32")]
pub use playback::WindowTimer;
pub use playback::{FrameTimer, default_timer};
pub use stroke::{StrokeEvent, StrokeRef};
pub use surface::{Surface, SurfaceState};
