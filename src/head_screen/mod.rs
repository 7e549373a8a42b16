//! Head screen: a translucent text panel floating above each avatar.
pub mod config;
pub mod display;
pub mod plugin;
pub mod style;
pub mod surface;
pub mod systems;

pub use config::HeadScreenSettings;
pub use display::{HeadDisplays, QuadId, QuadSpec, ScreenHost};
pub use plugin::HeadScreenPlugin;
pub use style::{FontSpec, Rgba, ScreenStyle, StyleError};
pub use surface::ScreenSurface;
pub use systems::{HeadScreen, HeadScreenDisplays};
