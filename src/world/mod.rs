//! Demo world standing in for the host: ground, camera and players.
pub mod components;
pub mod plugin;
pub mod systems;

pub use plugin::WorldPlugin;
