//! Renders the background and the stroke history onto a [`Canvas`].
//!
//! Rendering only reads what is passed in: the canvas size, the `BackgroundSpec` and the
//! strokes. Pen color and width come from each stored stroke, never from the live pen, so
//! replaying the history reproduces what was drawn at the time.

use crate::background::BackgroundSpec;
use crate::canvas::Canvas;
use crate::geometry::Segment;
use crate::stroke::{StrokeEvent, StrokeRef};

/// Clear the canvas and draw the background color, then the scaled image
pub fn render_background(canvas: &mut Canvas, background: &BackgroundSpec) {
    canvas.clear();

    if let Some(color) = background.color {
        canvas.fill(color);
    }

    if let Some(image) = &background.image {
        let pixels = image.pixels();
        let placement = background.mode.placement(
            canvas.width() as f32,
            canvas.height() as f32,
            pixels.width() as f32,
            pixels.height() as f32,
        );
        log::debug!(
            "Drawing background image {:?} at ({}, {}) scale {}",
            image.source(),
            placement.dx,
            placement.dy,
            placement.scale
        );
        canvas.draw_image(pixels, &placement);
    }
}

/// Draw one segment of `stroke` with the stroke's own pen
pub fn draw_segment(canvas: &mut Canvas, stroke: &StrokeEvent, segment: &Segment) {
    canvas.draw_segment(segment, stroke.color(), stroke.size());
}

/// Draw every segment of `stroke` in capture order
pub fn draw_stroke(canvas: &mut Canvas, stroke: &StrokeEvent) {
    for segment in stroke.path() {
        draw_segment(canvas, stroke, segment);
    }
}

/// Full composite: background, then every stroke in commit order
pub fn render(canvas: &mut Canvas, background: &BackgroundSpec, strokes: &[StrokeRef]) {
    render_background(canvas, background);
    for stroke in strokes {
        draw_stroke(canvas, stroke);
    }
}
