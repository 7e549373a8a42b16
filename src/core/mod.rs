//! Host clock, countdown scheduling and host errors shared by every plugin.
pub mod config;
pub mod errors;
pub mod plugin;
pub mod timers;

pub use errors::HostError;
pub use plugin::CorePlugin;
pub use timers::{HostTimers, Scheduler, TimerFired, TimerHandle};
