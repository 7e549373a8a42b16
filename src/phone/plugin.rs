// src/phone/plugin.rs
//
// PhonePlugin wires the phone shell, its overlay UI and input handling.

use bevy::prelude::*;

use super::components::PhoneView;
use super::config::PhoneSettings;
use super::shell::PhoneShell;
use super::systems::{
    handle_phone_buttons, handle_phone_shortcuts, highlight_phone_buttons, spawn_phone,
    sync_phone_view,
};

pub struct PhonePlugin {
    settings: PhoneSettings,
}

impl PhonePlugin {
    pub fn new(settings: PhoneSettings) -> Self {
        Self { settings }
    }
}

impl Default for PhonePlugin {
    fn default() -> Self {
        Self::new(PhoneSettings::load_or_default())
    }
}

impl Plugin for PhonePlugin {
    fn build(&self, app: &mut App) {
        info!(
            "PhonePlugin registered (keyboard shortcuts: {})",
            self.settings.keyboard_shortcuts
        );

        app.insert_resource(self.settings.clone())
            .init_resource::<PhoneShell>()
            .init_resource::<PhoneView>()
            .add_systems(Startup, spawn_phone)
            .add_systems(
                Update,
                (
                    handle_phone_shortcuts,
                    handle_phone_buttons,
                    highlight_phone_buttons,
                    sync_phone_view
                        .after(handle_phone_shortcuts)
                        .after(handle_phone_buttons),
                ),
            );
    }
}
