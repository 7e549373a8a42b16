//! Idle trigger: plays an ambient avatar animation after a quiet period.
pub mod catalog;
pub mod config;
pub mod controller;
pub mod plugin;
pub mod systems;

pub use catalog::AnimationCatalog;
pub use config::IdleSettings;
pub use controller::{IdleController, IdleNotification, IdlePhase};
pub use plugin::IdlePlugin;
