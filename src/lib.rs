//! HyperFone: an in-world phone overlay, idle avatar animations and floating
//! head screens for a Bevy virtual-world client.
use bevy::prelude::*;

pub mod core;
pub mod head_screen;
pub mod host;
pub mod idle;
pub mod phone;
pub mod world;

pub use crate::{
    core::CorePlugin, head_screen::HeadScreenPlugin, host::HostPlugin, idle::IdlePlugin,
    phone::PhonePlugin,
};

/// Everything except the demo world. Add after `DefaultPlugins`.
///
/// Settings are read from the config directory when the plugin is built.
pub struct HyperfonePlugin;

impl Plugin for HyperfonePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            CorePlugin::default(),
            HostPlugin,
            IdlePlugin::default(),
            HeadScreenPlugin::default(),
            PhonePlugin::default(),
        ));
    }
}
