pub mod tooltip;

#[cfg(feature = "egui")]
pub mod widget;

pub use tooltip::Tooltip;

#[cfg(feature = "egui")]
pub use widget::{paint_frame, FrameStyle, MapWidget};
