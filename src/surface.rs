//! The public drawing surface.
//!
//! Owns the configuration, the background, the stroke history and the pixel canvas. Pointer
//! input goes through [`StrokeCapture`]; every history mutation re-renders the whole
//! composite, so the visible canvas is always a function of the undo stack and the
//! background.

use egui::Color32;
use parking_lot::Mutex;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::background::{BackgroundImage, BackgroundMode, BackgroundSpec};
use crate::canvas::{Canvas, SharedCanvas};
use crate::capture::{CaptureOutput, StrokeCapture};
use crate::color::parse_color;
use crate::config::{self, SurfaceConfig};
use crate::error::{SurfaceError, SurfaceResult};
use crate::event::{EventBus, EventHandler, SurfaceEvent};
use crate::export;
use crate::history::{History, HistoryState};
use crate::image_loader::{DecodingLoader, ImageLoader, ImageSource};
use crate::input::InputEvent;
use crate::playback::{self, FrameTimer, PlaybackJob};
use crate::stroke::{StrokeEvent, StrokeRef};

/// Lifecycle of the pixel context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceState {
    /// No pixel context yet; input is ignored and replay/export fail
    Uninitialized,
    Ready,
}

pub struct Surface {
    config: SurfaceConfig,
    background: BackgroundSpec,
    history: History,
    capture: StrokeCapture,
    canvas: Option<SharedCanvas>,
    events: EventBus,
    loader: Box<dyn ImageLoader>,
    timer: Arc<dyn FrameTimer>,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("state", &self.state())
            .field("config", &self.config)
            .field("background", &self.background)
            .field("history", &self.history)
            .field("events", &self.events)
            .finish()
    }
}

impl Surface {
    pub fn new(config: SurfaceConfig) -> SurfaceResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            background: BackgroundSpec::default(),
            history: History::new(),
            capture: StrokeCapture::new(),
            canvas: None,
            events: EventBus::new(),
            loader: Box::new(DecodingLoader),
            timer: playback::default_timer(),
        })
    }

    /// Replace how background images are loaded
    pub fn with_loader(mut self, loader: impl ImageLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    /// Replace the timer that paces timed replays
    pub fn with_timer(mut self, timer: impl FrameTimer + 'static) -> Self {
        self.timer = Arc::new(timer);
        self
    }

    /// Create the pixel context and render what is already there
    pub fn initialize(&mut self) -> SurfaceResult<()> {
        let canvas = Canvas::new(self.config.width, self.config.height)?;
        match &self.canvas {
            Some(shared) => *shared.lock() = canvas,
            None => self.canvas = Some(Arc::new(Mutex::new(canvas))),
        }
        log::info!("Surface ready at {}x{}", self.config.width, self.config.height);
        self.render_now();
        Ok(())
    }

    pub fn state(&self) -> SurfaceState {
        if self.canvas.is_some() {
            SurfaceState::Ready
        } else {
            SurfaceState::Uninitialized
        }
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Subscribe to change notifications
    pub fn subscribe(&self, handler: impl EventHandler + 'static) {
        self.events.subscribe(handler);
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    pub fn background(&self) -> &BackgroundSpec {
        &self.background
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Copy of the live canvas
    pub fn current_image(&self) -> SurfaceResult<Canvas> {
        let canvas = self.canvas.as_ref().ok_or(SurfaceError::SurfaceNotReady)?;
        Ok(canvas.lock().clone())
    }

    // --- Configuration --------------------------------------------------------------------

    /// Pen color for the next stroke
    pub fn set_color(&mut self, color: Color32) {
        self.config.color = color;
        self.events.emit(SurfaceEvent::ColorChanged(color));
    }

    /// Pen color from a host color string such as `"#ff0000"` or `"black"`
    pub fn set_color_str(&mut self, color: &str) -> SurfaceResult<()> {
        let color = parse_color(color)?;
        self.set_color(color);
        Ok(())
    }

    /// Pen width for the next stroke
    pub fn set_size(&mut self, size: f32) -> SurfaceResult<()> {
        config::validate_line_width(size)?;
        self.config.size = size;
        self.events.emit(SurfaceEvent::SizeChanged(size));
        Ok(())
    }

    pub fn set_width(&mut self, width: u32) -> SurfaceResult<()> {
        self.resize(width, self.config.height)?;
        self.events.emit(SurfaceEvent::WidthChanged(width));
        self.render_now();
        Ok(())
    }

    pub fn set_height(&mut self, height: u32) -> SurfaceResult<()> {
        self.resize(self.config.width, height)?;
        self.events.emit(SurfaceEvent::HeightChanged(height));
        self.render_now();
        Ok(())
    }

    // Recreate the pixel context at the new size; strokes keep their pixel coordinates
    fn resize(&mut self, width: u32, height: u32) -> SurfaceResult<()> {
        config::validate_dimensions(width, height)?;
        if let Some(shared) = &self.canvas {
            let canvas = Canvas::new(width, height)?;
            *shared.lock() = canvas;
            log::info!("Surface resized to {width}x{height}");
        }
        self.config.width = width;
        self.config.height = height;
        Ok(())
    }

    pub fn set_background_color(&mut self, color: Option<Color32>) {
        self.background.color = color;
        self.events.emit(SurfaceEvent::BackgroundColorChanged(color));
        self.render_now();
    }

    pub fn set_background_mode(&mut self, mode: BackgroundMode) {
        self.background.mode = mode;
        self.events.emit(SurfaceEvent::BackgroundModeChanged(mode));
        self.render_now();
    }

    /// Load and set the background image, or remove it with `None`.
    ///
    /// On a load failure the previous background stays in place and nothing is emitted.
    pub async fn set_background_image(&mut self, source: Option<ImageSource>) -> SurfaceResult<()> {
        let image = match source {
            Some(source) => Some(self.load_background(source).await?),
            None => None,
        };
        let echoed = image.as_ref().map(|image| image.source().clone());
        self.background.image = image;
        self.events.emit(SurfaceEvent::BackgroundImageChanged(echoed));
        self.render_now();
        Ok(())
    }

    async fn load_background(&self, source: ImageSource) -> SurfaceResult<BackgroundImage> {
        match self.loader.load(&source).await {
            Ok(pixels) => Ok(BackgroundImage::new(source, pixels)),
            Err(err) => {
                log::warn!("Background image not applied: {err}");
                Err(err)
            }
        }
    }

    // --- Input ----------------------------------------------------------------------------

    /// Feed one pointer event. Returns the stroke if this event completed one.
    pub fn handle_input(&mut self, event: InputEvent) -> Option<StrokeRef> {
        let Some(canvas) = &self.canvas else {
            log::debug!("Ignoring {event:?} before initialization");
            return None;
        };

        match self.capture.handle(event, self.config.color, self.config.size) {
            CaptureOutput::None => None,
            CaptureOutput::Segment(segment) => {
                // Live feedback is drawn incrementally with the current pen
                canvas.lock().draw_segment(&segment, self.config.color, self.config.size);
                None
            }
            CaptureOutput::Completed(stroke) => {
                let stroke = stroke.into_ref();
                self.commit_ref(stroke.clone());
                Some(stroke)
            }
        }
    }

    // --- History --------------------------------------------------------------------------

    /// Commit a finished stroke, truncating the redo stack
    pub fn commit(&mut self, stroke: StrokeEvent) -> HistoryState {
        self.commit_ref(stroke.into_ref())
    }

    fn commit_ref(&mut self, stroke: StrokeRef) -> HistoryState {
        let state = self.history.commit(stroke.clone());
        log::debug!("Committed stroke with {} segments", stroke.path().len());
        self.render_now();
        self.emit_history(state);
        self.events.emit(SurfaceEvent::Draw(stroke));
        state
    }

    /// Undo the newest stroke. `None` if there was nothing to undo.
    pub fn undo(&mut self) -> Option<HistoryState> {
        let state = self.history.undo()?;
        self.render_now();
        self.emit_history(state);
        Some(state)
    }

    /// Redo the most recently undone stroke. `None` if there was nothing to redo.
    pub fn redo(&mut self) -> Option<HistoryState> {
        let state = self.history.redo()?;
        self.render_now();
        self.emit_history(state);
        Some(state)
    }

    /// Drop the history and the background color/image, leaving a background-only render
    pub fn reset(&mut self) -> HistoryState {
        let had_color = self.background.color.is_some();
        let had_image = self.background.image.is_some();
        self.background.clear();
        self.capture.cancel();
        let state = self.history.reset();
        log::info!("Surface reset");

        self.render_now();
        if had_color {
            self.events.emit(SurfaceEvent::BackgroundColorChanged(None));
        }
        if had_image {
            self.events.emit(SurfaceEvent::BackgroundImageChanged(None));
        }
        self.emit_history(state);
        state
    }

    fn emit_history(&self, state: HistoryState) {
        self.events.emit(SurfaceEvent::CanUndo(state.can_undo));
        self.events.emit(SurfaceEvent::CanRedo(state.can_redo));
    }

    // --- Replay ---------------------------------------------------------------------------

    /// Re-render the full history, instantly (`None` or `fps <= 0`) or one segment per frame.
    ///
    /// The returned future owns a snapshot of the history and keeps drawing even if the
    /// surface changes meanwhile; a later instantaneous render clears over it.
    pub fn replay(&self, frames_per_second: Option<f64>) -> impl Future<Output = SurfaceResult<()>> + use<> {
        self.replay_from(frames_per_second, 0)
    }

    /// Like [`Surface::replay`], drawing strokes from `start_index` on. Only a replay from
    /// zero clears the canvas and redraws the background.
    pub fn replay_from(
        &self,
        frames_per_second: Option<f64>,
        start_index: usize,
    ) -> impl Future<Output = SurfaceResult<()>> + use<> {
        let job = self.playback_job(frames_per_second, start_index);
        async move {
            job?.run().await;
            Ok(())
        }
    }

    fn playback_job(&self, frames_per_second: Option<f64>, start_index: usize) -> SurfaceResult<PlaybackJob> {
        let canvas = self.canvas.clone().ok_or(SurfaceError::SurfaceNotReady)?;
        Ok(PlaybackJob::new(
            canvas,
            self.background.clone(),
            self.history.strokes().to_vec(),
            frames_per_second,
            start_index,
            self.timer.clone(),
        ))
    }

    // Instantaneous full render; nothing to do before initialization
    fn render_now(&self) {
        if let Ok(job) = self.playback_job(None, 0) {
            job.run_now();
        }
    }

    // --- Export ---------------------------------------------------------------------------

    /// Encode the full composite at the current size, without touching the live canvas
    pub fn export_bytes(&self, mime_type: &str) -> SurfaceResult<Vec<u8>> {
        if self.canvas.is_none() {
            return Err(SurfaceError::SurfaceNotReady);
        }
        let canvas = export::render_offscreen(
            self.config.width,
            self.config.height,
            &self.background,
            self.history.strokes(),
        )?;
        export::encode(&canvas, mime_type)
    }

    /// Export to `filename` (default `image.png`) as `mime_type` (default PNG)
    pub fn export(&self, filename: Option<&Path>, mime_type: Option<&str>) -> SurfaceResult<PathBuf> {
        let bytes = self.export_bytes(mime_type.unwrap_or(export::DEFAULT_MIME_TYPE))?;
        let path = filename.map_or_else(|| PathBuf::from(export::DEFAULT_FILENAME), Path::to_path_buf);
        export::write_file(&path, &bytes)?;
        Ok(path)
    }
}
