use serde::{Deserialize, Serialize};

/// Pixel position relative to the surface's top-left corner at capture time
pub type Point = egui::Pos2;

/// One straight line between two consecutive pointer samples
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }
}

/// Ordered sequence of segments making up one stroke
pub type Path = Vec<Segment>;
