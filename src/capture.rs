use egui::Color32;

use crate::geometry::Segment;
use crate::input::InputEvent;
use crate::stroke::{PendingStroke, StrokeEvent};
use crate::util::time;

/// What a single pointer event produced
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureOutput {
    /// Nothing to draw or commit
    None,
    /// A new segment to draw live
    Segment(Segment),
    /// The gesture ended with at least one segment
    Completed(StrokeEvent),
}

/// Turns pointer gestures into strokes.
///
/// Only move samples are paired into segments; the press position itself is not a sample.
/// Leaving the surface ends the gesture exactly like releasing the button.
#[derive(Debug, Default)]
pub struct StrokeCapture {
    // Transient state: the stroke being drawn (if any)
    current_stroke: Option<PendingStroke>,
}

impl StrokeCapture {
    pub fn new() -> Self {
        Self { current_stroke: None }
    }

    pub fn is_drawing(&self) -> bool {
        self.current_stroke.is_some()
    }

    /// Feed one pointer event. `color` and `size` are the pen in effect right now and
    /// are only stored if this event completes a stroke.
    pub fn handle(&mut self, event: InputEvent, color: Color32, size: f32) -> CaptureOutput {
        match event {
            InputEvent::PointerDown { .. } => {
                self.current_stroke = Some(PendingStroke::default());
                CaptureOutput::None
            }
            InputEvent::PointerMove { position } => match &mut self.current_stroke {
                Some(stroke) => stroke
                    .add_sample(position)
                    .map_or(CaptureOutput::None, CaptureOutput::Segment),
                None => CaptureOutput::None,
            },
            InputEvent::PointerUp { .. } | InputEvent::PointerLeave { .. } => {
                self.finish(color, size).map_or(CaptureOutput::None, CaptureOutput::Completed)
            }
        }
    }

    fn finish(&mut self, color: Color32, size: f32) -> Option<StrokeEvent> {
        let stroke = self.current_stroke.take()?;
        if stroke.is_empty() {
            return None;
        }
        Some(StrokeEvent::new(
            stroke.into_segments(),
            color,
            size,
            Some(time::timestamp_millis()),
        ))
    }

    /// Drop any gesture in progress without producing a stroke
    pub fn cancel(&mut self) {
        self.current_stroke = None;
    }
}
