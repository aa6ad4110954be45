use egui::Color32;
use image::RgbaImage;
use parking_lot::Mutex;
use std::sync::Arc;
use tiny_skia::{
    FilterQuality, LineCap, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke, Transform,
};

use crate::background::Placement;
use crate::color::to_skia;
use crate::error::{SurfaceError, SurfaceResult};
use crate::geometry::Segment;

/// Canvas handle shared between the surface and in-flight playback
pub type SharedCanvas = Arc<Mutex<Canvas>>;

/// A pixel buffer with the handful of 2D drawing calls the compositor needs
#[derive(Clone, PartialEq)]
pub struct Canvas {
    pixmap: Pixmap,
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> SurfaceResult<Self> {
        let pixmap = Pixmap::new(width, height).ok_or(SurfaceError::InvalidDimensions { width, height })?;
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Premultiplied RGBA bytes, row-major
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Reset every pixel to transparent
    pub fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    /// Paint the whole surface with `color`, blending over what is there
    pub fn fill(&mut self, color: Color32) {
        let Some(rect) = Rect::from_xywh(0.0, 0.0, self.width() as f32, self.height() as f32) else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color(to_skia(color));
        self.pixmap.fill_rect(rect, &paint, Transform::identity(), None);
    }

    /// Draw `image` scaled and offset per `placement`
    pub fn draw_image(&mut self, image: &Pixmap, placement: &Placement) {
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        let transform = Transform::from_row(placement.scale, 0.0, 0.0, placement.scale, placement.dx, placement.dy);
        self.pixmap.draw_pixmap(0, 0, image.as_ref(), &paint, transform, None);
    }

    /// Stroke one line segment with round caps
    pub fn draw_segment(&mut self, segment: &Segment, color: Color32, width: f32) {
        let mut pb = PathBuilder::new();
        pb.move_to(segment.start.x, segment.start.y);
        pb.line_to(segment.end.x, segment.end.y);
        // Degenerate paths (zero-length) are dropped by the builder
        let Some(path) = pb.finish() else {
            return;
        };

        let mut paint = Paint::default();
        paint.set_color(to_skia(color));
        paint.anti_alias = true;

        let stroke = Stroke {
            width,
            line_cap: LineCap::Round,
            ..Stroke::default()
        };
        self.pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    /// Unpremultiplied copy for encoding
    pub fn to_rgba_image(&self) -> RgbaImage {
        let mut out = RgbaImage::new(self.width(), self.height());
        for (dst, px) in out.pixels_mut().zip(self.pixmap.pixels()) {
            let c = px.demultiply();
            dst.0 = [c.red(), c.green(), c.blue(), c.alpha()];
        }
        out
    }
}
