//! Drives the compositor through the history, either in one sweep or one segment per frame.

use futures::channel::oneshot;
use futures::future::BoxFuture;
use std::sync::Arc;
use std::time::Duration;

use crate::background::BackgroundSpec;
use crate::canvas::{Canvas, SharedCanvas};
use crate::compositor;
use crate::stroke::StrokeRef;

/// Suspends timed playback between frames. The host hooks this into its timer loop.
pub trait FrameTimer: Send + Sync {
    fn sleep(&self, delay: Duration) -> BoxFuture<'static, ()>;
}

/// Completes each sleep from a short-lived sleeper thread
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadTimer;

#[cfg(not(target_arch = "wasm32"))]
impl FrameTimer for ThreadTimer {
    fn sleep(&self, delay: Duration) -> BoxFuture<'static, ()> {
        let (tx, rx) = oneshot::channel();
        std::thread::spawn(move || {
            std::thread::sleep(delay);
            let _ = tx.send(());
        });
        Box::pin(async move {
            let _ = rx.await;
        })
    }
}

/// Completes each sleep from a `setTimeout` callback on the browser event loop
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowTimer;

#[cfg(target_arch = "wasm32")]
impl FrameTimer for WindowTimer {
    fn sleep(&self, delay: Duration) -> BoxFuture<'static, ()> {
        use wasm_bindgen::JsCast;

        let (tx, rx) = oneshot::channel();
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        match web_sys::window() {
            Some(window) => {
                let callback = wasm_bindgen::closure::Closure::once_into_js(move || {
                    let _ = tx.send(());
                });
                if window
                    .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), millis)
                    .is_err()
                {
                    log::warn!("setTimeout failed, playback continues without pacing");
                }
            }
            // No event loop to wait on: the dropped sender resolves the sleep at once
            None => log::warn!("No window, playback continues without pacing"),
        }
        Box::pin(async move {
            let _ = rx.await;
        })
    }
}

/// The timer a new surface paces timed replays with on this target
#[cfg(not(target_arch = "wasm32"))]
pub fn default_timer() -> Arc<dyn FrameTimer> {
    Arc::new(ThreadTimer)
}

/// The timer a new surface paces timed replays with on this target
#[cfg(target_arch = "wasm32")]
pub fn default_timer() -> Arc<dyn FrameTimer> {
    Arc::new(WindowTimer)
}

/// Delay between segments, or `None` for an instantaneous sweep.
///
/// Rates too slow for a `Duration` saturate to `Duration::MAX`.
pub fn frame_delay(frames_per_second: Option<f64>) -> Option<Duration> {
    match frames_per_second {
        Some(fps) if fps > 0.0 => Some(Duration::try_from_secs_f64(1.0 / fps).unwrap_or(Duration::MAX)),
        _ => None,
    }
}

/// Cursor over the segments of a stroke list
#[derive(Debug, Clone)]
pub struct Playback {
    strokes: Vec<StrokeRef>,
    stroke_index: usize,
    segment_index: usize,
}

impl Playback {
    pub fn new(strokes: Vec<StrokeRef>, start_index: usize) -> Self {
        let mut playback = Self {
            strokes,
            stroke_index: start_index,
            segment_index: 0,
        };
        playback.skip_exhausted();
        playback
    }

    /// `(stroke_index, segment_index)` of the next segment to draw
    pub fn position(&self) -> (usize, usize) {
        (self.stroke_index, self.segment_index)
    }

    pub fn is_finished(&self) -> bool {
        self.stroke_index >= self.strokes.len()
    }

    /// Draw the next segment. Returns false once every segment has been drawn.
    pub fn step(&mut self, canvas: &mut Canvas) -> bool {
        let Some(stroke) = self.strokes.get(self.stroke_index) else {
            return false;
        };
        let segment = stroke.path()[self.segment_index];
        compositor::draw_segment(canvas, stroke, &segment);

        self.segment_index += 1;
        self.skip_exhausted();
        true
    }

    // Move the cursor past finished (or empty) strokes
    fn skip_exhausted(&mut self) {
        while let Some(stroke) = self.strokes.get(self.stroke_index) {
            if self.segment_index < stroke.path().len() {
                break;
            }
            self.stroke_index += 1;
            self.segment_index = 0;
        }
    }
}

/// One replay request, owning everything it draws from so it can outlive the call
pub struct PlaybackJob {
    canvas: SharedCanvas,
    background: BackgroundSpec,
    playback: Playback,
    redraw_background: bool,
    delay: Option<Duration>,
    timer: Arc<dyn FrameTimer>,
}

impl PlaybackJob {
    pub fn new(
        canvas: SharedCanvas,
        background: BackgroundSpec,
        strokes: Vec<StrokeRef>,
        frames_per_second: Option<f64>,
        start_index: usize,
        timer: Arc<dyn FrameTimer>,
    ) -> Self {
        Self {
            canvas,
            background,
            playback: Playback::new(strokes, start_index),
            redraw_background: start_index == 0,
            delay: frame_delay(frames_per_second),
            timer,
        }
    }

    /// Render synchronously, ignoring any frame delay
    pub fn run_now(mut self) {
        let mut canvas = self.canvas.lock();
        if self.redraw_background {
            compositor::render_background(&mut canvas, &self.background);
        }
        while self.playback.step(&mut canvas) {}
    }

    /// Draw the first segment at once, then sleep one frame delay before each following
    /// segment. There is no sleep after the last segment.
    pub async fn run(mut self) {
        let Some(delay) = self.delay else {
            self.run_now();
            return;
        };

        if self.redraw_background {
            compositor::render_background(&mut self.canvas.lock(), &self.background);
        }
        log::debug!("Timed playback starting, {delay:?} per segment");
        loop {
            let drawn = self.playback.step(&mut self.canvas.lock());
            if !drawn || self.playback.is_finished() {
                break;
            }
            self.timer.sleep(delay).await;
        }
        log::debug!("Timed playback finished");
    }
}
