use egui::Color32;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::geometry::{Path, Point, Segment};

/// One committed freehand gesture: its segments plus the pen it was drawn with.
///
/// Immutable after creation; the atomic unit of undo/redo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeEvent {
    path: Path,
    color: Color32,
    size: f32,
    /// Milliseconds since the UNIX epoch
    #[serde(default)]
    time: Option<u64>,
}

// Define a reference-counted type alias for StrokeEvent
pub type StrokeRef = Arc<StrokeEvent>;

impl StrokeEvent {
    pub fn new(path: Path, color: Color32, size: f32, time: Option<u64>) -> Self {
        Self {
            path,
            color,
            size,
            time,
        }
    }

    pub fn into_ref(self) -> StrokeRef {
        Arc::new(self)
    }

    pub fn path(&self) -> &[Segment] {
        &self.path
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn time(&self) -> Option<u64> {
        self.time
    }
}

// Mutable path for a gesture in progress
#[derive(Debug, Default)]
pub(crate) struct PendingStroke {
    segments: Path,
    last_sample: Option<Point>,
}

impl PendingStroke {
    /// Record a sample, pairing it with the previous one
    pub(crate) fn add_sample(&mut self, sample: Point) -> Option<Segment> {
        let segment = self.last_sample.map(|start| Segment::new(start, sample));
        if let Some(segment) = segment {
            self.segments.push(segment);
        }
        self.last_sample = Some(sample);
        segment
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub(crate) fn into_segments(self) -> Path {
        self.segments
    }
}
