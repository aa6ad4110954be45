use egui::{Color32, pos2};
use futures::channel::oneshot;
use futures::executor::block_on;
use futures::future::{self, BoxFuture};
use futures::FutureExt;
use image::{ImageFormat, Rgba, RgbaImage};
use paint_surface::compositor;
use paint_surface::{
    BackgroundMode, FrameTimer, ImageSource, Segment, StrokeEvent, Surface, SurfaceConfig, SurfaceError,
    SurfaceEvent,
};
use parking_lot::Mutex;
use std::cell::RefCell;
use std::future::Future;
use std::io::Cursor;
use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

/// Never actually waits
struct ImmediateTimer;

impl FrameTimer for ImmediateTimer {
    fn sleep(&self, _delay: Duration) -> BoxFuture<'static, ()> {
        Box::pin(future::ready(()))
    }
}

/// Holds every sleep until the test releases it
#[derive(Clone, Default)]
struct GateTimer {
    pending: Arc<Mutex<Vec<oneshot::Sender<()>>>>,
}

impl GateTimer {
    fn release_all(&self) {
        for tx in self.pending.lock().drain(..) {
            let _ = tx.send(());
        }
    }
}

impl FrameTimer for GateTimer {
    fn sleep(&self, _delay: Duration) -> BoxFuture<'static, ()> {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().push(tx);
        Box::pin(async move {
            let _ = rx.await;
        })
    }
}

fn poll_once<F: Future + Unpin>(fut: &mut F) -> Poll<F::Output> {
    let mut cx = Context::from_waker(futures::task::noop_waker_ref());
    fut.poll_unpin(&mut cx)
}

fn line(from: (f32, f32), to: (f32, f32), segments: usize, color: Color32, size: f32) -> StrokeEvent {
    let step_x = (to.0 - from.0) / segments as f32;
    let step_y = (to.1 - from.1) / segments as f32;
    let path = (0..segments)
        .map(|i| {
            let i = i as f32;
            Segment::new(
                pos2(from.0 + step_x * i, from.1 + step_y * i),
                pos2(from.0 + step_x * (i + 1.0), from.1 + step_y * (i + 1.0)),
            )
        })
        .collect();
    StrokeEvent::new(path, color, size, None)
}

fn surface_with(width: u32, height: u32, timer: impl FrameTimer + 'static) -> Surface {
    let _ = env_logger::builder().is_test(true).try_init();
    let config = SurfaceConfig {
        width,
        height,
        ..SurfaceConfig::default()
    };
    let mut surface = Surface::new(config).unwrap().with_timer(timer);
    surface.initialize().unwrap();
    surface
}

fn pixels(surface: &Surface) -> Vec<u8> {
    surface.current_image().unwrap().data().to_vec()
}

fn png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba(color));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();
    bytes
}

#[test]
fn test_timed_and_instant_replay_agree() {
    let mut surface = surface_with(100, 100, ImmediateTimer);
    surface.set_background_color(Some(Color32::from_rgb(250, 250, 250)));
    surface.commit(line((10.0, 10.0), (90.0, 90.0), 6, Color32::RED, 5.0));
    surface.commit(line((90.0, 10.0), (10.0, 90.0), 4, Color32::from_rgba_unmultiplied(0, 0, 255, 100), 9.0));
    surface.commit(line((50.0, 5.0), (50.0, 95.0), 1, Color32::BLACK, 2.0));

    block_on(surface.replay(None)).unwrap();
    let instant = pixels(&surface);

    for fps in [1.0, 24.0, 1000.0] {
        block_on(surface.replay(Some(fps))).unwrap();
        assert_eq!(instant, pixels(&surface), "fps {fps}");
    }
    block_on(surface.replay(Some(0.0))).unwrap();
    assert_eq!(instant, pixels(&surface));
}

#[test]
fn test_timed_replay_draws_one_segment_per_frame() {
    let timer = GateTimer::default();
    let mut surface = surface_with(60, 60, timer.clone());
    surface.commit(line((5.0, 10.0), (55.0, 10.0), 2, Color32::BLACK, 4.0));
    surface.commit(line((5.0, 40.0), (55.0, 40.0), 1, Color32::BLACK, 4.0));
    let full = pixels(&surface);

    let mut replay = Box::pin(surface.replay(Some(30.0)));
    assert!(poll_once(&mut replay).is_pending());
    let image = surface.current_image().unwrap();
    // First half of the first stroke only
    assert_eq!(image.pixmap().pixel(15, 10).unwrap().alpha(), 255);
    assert_eq!(image.pixmap().pixel(50, 10).unwrap().alpha(), 0);
    assert_eq!(image.pixmap().pixel(30, 40).unwrap().alpha(), 0);

    timer.release_all();
    assert!(poll_once(&mut replay).is_pending());
    timer.release_all();
    assert!(matches!(poll_once(&mut replay), Poll::Ready(Ok(()))));
    assert_eq!(full, pixels(&surface));
}

#[test]
fn test_undo_supersedes_timed_replay_without_touching_history() {
    let timer = GateTimer::default();
    let mut surface = surface_with(60, 60, timer.clone());
    surface.commit(line((5.0, 10.0), (55.0, 10.0), 3, Color32::BLACK, 4.0));
    surface.commit(line((5.0, 40.0), (55.0, 40.0), 2, Color32::BLACK, 4.0));

    let mut slow = Box::pin(surface.replay(Some(10.0)));
    assert!(poll_once(&mut slow).is_pending());

    // Instantaneous re-render clears over the slow playback
    surface.undo();
    let image = surface.current_image().unwrap();
    assert_eq!(image.pixmap().pixel(50, 10).unwrap().alpha(), 255);
    assert_eq!(image.pixmap().pixel(30, 40).unwrap().alpha(), 0);

    // The older playback keeps appending from its own snapshot once its timers fire
    loop {
        timer.release_all();
        if let Poll::Ready(result) = poll_once(&mut slow) {
            result.unwrap();
            break;
        }
    }
    let image = surface.current_image().unwrap();
    assert_eq!(image.pixmap().pixel(30, 40).unwrap().alpha(), 255);
    assert_eq!(surface.history().strokes().len(), 1);
    assert_eq!(surface.history().undone_len(), 1);
}

#[test]
fn test_replay_on_empty_history_renders_background() {
    let mut surface = surface_with(10, 10, ImmediateTimer);
    surface.set_background_color(Some(Color32::from_rgb(0, 128, 0)));
    block_on(surface.replay(Some(60.0))).unwrap();
    let px = surface.current_image().unwrap().pixmap().pixel(5, 5).unwrap();
    assert_eq!((px.red(), px.green(), px.blue()), (0, 128, 0));
}

#[test]
fn test_replay_from_appends_without_clearing() {
    let mut surface = surface_with(40, 40, ImmediateTimer);
    surface.set_background_color(Some(Color32::WHITE));
    surface.commit(line((5.0, 10.0), (35.0, 10.0), 1, Color32::BLACK, 4.0));
    surface.commit(line((5.0, 30.0), (35.0, 30.0), 1, Color32::RED, 4.0));

    // Only the second stroke is drawn again, on top of what is there
    let mut expected = surface.current_image().unwrap();
    compositor::draw_stroke(&mut expected, &surface.history().strokes()[1]);
    block_on(surface.replay_from(None, 1)).unwrap();
    assert_eq!(expected.data(), surface.current_image().unwrap().data());

    // Past the end there is nothing to draw
    block_on(surface.replay_from(Some(60.0), 5)).unwrap();
    assert_eq!(expected.data(), surface.current_image().unwrap().data());
}

#[test]
fn test_replay_at_vanishing_frame_rate_does_not_panic() {
    let mut surface = surface_with(40, 40, ImmediateTimer);
    surface.commit(line((5.0, 5.0), (35.0, 35.0), 3, Color32::BLACK, 3.0));
    let instant = pixels(&surface);

    block_on(surface.replay(Some(1e-20))).unwrap();
    assert_eq!(instant, pixels(&surface));
}

#[test]
fn test_replay_requires_initialized_surface() {
    let surface = Surface::new(SurfaceConfig::default()).unwrap();
    assert!(matches!(block_on(surface.replay(None)), Err(SurfaceError::SurfaceNotReady)));
    assert!(matches!(block_on(surface.replay(Some(30.0))), Err(SurfaceError::SurfaceNotReady)));
    assert!(matches!(surface.export_bytes("image/png"), Err(SurfaceError::SurfaceNotReady)));
}

#[test]
fn test_background_image_fit_letterboxes() {
    let mut surface = surface_with(300, 300, ImmediateTimer);
    block_on(surface.set_background_image(Some(ImageSource::Bytes(png(200, 100, [255, 0, 0, 255]))))).unwrap();
    assert_eq!(surface.background().mode, BackgroundMode::Fit);

    let image = surface.current_image().unwrap();
    assert_eq!(image.pixmap().pixel(150, 10).unwrap().alpha(), 0);
    let px = image.pixmap().pixel(150, 150).unwrap();
    assert_eq!((px.red(), px.alpha()), (255, 255));

    surface.set_background_mode(BackgroundMode::Fill);
    let image = surface.current_image().unwrap();
    assert_eq!(image.pixmap().pixel(150, 10).unwrap().alpha(), 255);

    // Removing the image echoes the change and renders without it
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    surface.subscribe(move |event: &SurfaceEvent| sink.borrow_mut().push(event.clone()));
    block_on(surface.set_background_image(None)).unwrap();
    assert!(surface.background().image.is_none());
    assert_eq!(*seen.borrow(), vec![SurfaceEvent::BackgroundImageChanged(None)]);
    assert!(pixels(&surface).iter().all(|b| *b == 0));
}

#[test]
fn test_background_load_failure_keeps_previous_state() {
    let mut surface = surface_with(50, 50, ImmediateTimer);
    surface.set_background_color(Some(Color32::WHITE));
    surface.commit(line((5.0, 5.0), (45.0, 45.0), 2, Color32::BLACK, 3.0));
    let before = pixels(&surface);

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    surface.subscribe(move |event: &SurfaceEvent| sink.borrow_mut().push(event.clone()));

    let result = block_on(surface.set_background_image(Some(ImageSource::Bytes(vec![0, 1, 2, 3]))));
    assert!(matches!(result, Err(SurfaceError::BackgroundLoad { .. })));
    assert!(surface.background().image.is_none());
    assert!(seen.borrow().is_empty());
    assert_eq!(before, pixels(&surface));
}

#[test]
fn test_export_leaves_live_surface_alone() {
    let mut surface = surface_with(64, 48, ImmediateTimer);
    surface.set_background_color(Some(Color32::from_rgb(255, 255, 240)));
    surface.commit(line((4.0, 4.0), (60.0, 44.0), 3, Color32::BLUE, 6.0));
    surface.commit(line((4.0, 44.0), (60.0, 4.0), 3, Color32::RED, 6.0));
    surface.undo();

    let live_before = pixels(&surface);
    let history_before = surface.history().clone();

    let bytes = surface.export_bytes("image/png").unwrap();
    let exported = image::load_from_memory(&bytes).unwrap().to_rgba8();

    assert_eq!(live_before, pixels(&surface));
    assert_eq!(surface.history().strokes(), history_before.strokes());
    assert_eq!(surface.history().undone_len(), 1);
    // The export is the composite of the undo stack only
    assert_eq!(exported, surface.current_image().unwrap().to_rgba_image());
}

#[test]
fn test_export_skips_stroke_in_progress() {
    let mut surface = surface_with(40, 40, ImmediateTimer);
    let empty = surface.export_bytes("image/png").unwrap();

    surface.handle_input(paint_surface::InputEvent::PointerDown { position: pos2(5.0, 5.0) });
    surface.handle_input(paint_surface::InputEvent::PointerMove { position: pos2(5.0, 5.0) });
    surface.handle_input(paint_surface::InputEvent::PointerMove { position: pos2(35.0, 35.0) });

    assert_eq!(empty, surface.export_bytes("image/png").unwrap());
    assert!(pixels(&surface).iter().any(|b| *b != 0));
}

#[test]
fn test_export_writes_file() {
    let mut surface = surface_with(32, 32, ImmediateTimer);
    surface.commit(line((2.0, 2.0), (30.0, 30.0), 1, Color32::BLACK, 2.0));

    let path = std::env::temp_dir().join(format!("paint_surface_export_{}.jpg", std::process::id()));
    let written = surface.export(Some(&path), Some("image/jpeg")).unwrap();
    assert_eq!(written, path);

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
    std::fs::remove_file(&path).unwrap();

    assert!(matches!(
        surface.export(Some(&path), Some("image/svg+xml")),
        Err(SurfaceError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_draw_events_replay_elsewhere() {
    let mut original = surface_with(80, 60, ImmediateTimer);
    let recorded = Rc::new(RefCell::new(Vec::new()));
    let sink = recorded.clone();
    original.subscribe(move |event: &SurfaceEvent| {
        if let SurfaceEvent::Draw(stroke) = event {
            sink.borrow_mut().push(stroke.as_ref().clone());
        }
    });
    original.set_background_color(Some(Color32::from_rgb(20, 20, 20)));
    original.commit(line((5.0, 5.0), (75.0, 55.0), 4, Color32::YELLOW, 5.0));
    original.commit(line((5.0, 55.0), (75.0, 5.0), 4, Color32::WHITE, 2.0));

    let mut copy = surface_with(80, 60, ImmediateTimer);
    copy.set_background_color(Some(Color32::from_rgb(20, 20, 20)));
    for stroke in recorded.borrow().iter() {
        copy.commit(stroke.clone());
    }
    assert_eq!(copy.history().strokes(), original.history().strokes());
    assert_eq!(pixels(&original), pixels(&copy));
}
