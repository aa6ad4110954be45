use egui::Color32;

use crate::background::BackgroundMode;
use crate::image_loader::ImageSource;
use crate::stroke::StrokeRef;

/// Notifications emitted to the host shell.
///
/// Every configuration write is echoed back so two-way bound controls stay in sync.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    ColorChanged(Color32),
    SizeChanged(f32),
    WidthChanged(u32),
    HeightChanged(u32),
    BackgroundColorChanged(Option<Color32>),
    BackgroundImageChanged(Option<ImageSource>),
    BackgroundModeChanged(BackgroundMode),
    /// A stroke was just committed
    Draw(StrokeRef),
    CanUndo(bool),
    CanRedo(bool),
}
