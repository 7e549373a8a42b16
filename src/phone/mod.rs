// src/phone/mod.rs
//
// Phone overlay: a fixed set of placeholder apps behind a home grid.

pub mod components;
pub mod config;
pub mod plugin;
pub mod shell;
pub mod systems;

pub use config::PhoneSettings;
pub use plugin::PhonePlugin;
pub use shell::{PhoneApp, PhoneShell};
