//! IdlePlugin wires the idle trigger controllers to the host bus.
use bevy::prelude::*;

use super::{
    config::IdleSettings,
    systems::{
        attach_idle_triggers, detach_idle_triggers, drive_idle_triggers, log_idle_notifications,
        IdleRng, IdleTriggers,
    },
};

/// Plays ambient avatar animations after the local player goes quiet.
///
/// # Dependencies
///
/// - `CorePlugin` (provides `HostTimers` and `TimerFired`)
/// - `HostPlugin` (provides the activity and idle messages)
pub struct IdlePlugin {
    settings: IdleSettings,
}

impl IdlePlugin {
    pub fn new(settings: IdleSettings) -> Self {
        Self { settings }
    }
}

impl Default for IdlePlugin {
    fn default() -> Self {
        Self::new(IdleSettings::load_or_default())
    }
}

impl Plugin for IdlePlugin {
    fn build(&self, app: &mut App) {
        info!(
            "IdlePlugin registered (enabled: {}, delay: {} ms)",
            self.settings.enabled,
            self.settings.delay.as_millis()
        );

        app.insert_resource(self.settings.clone())
            .insert_resource(IdleRng::from_seed(self.settings.seed))
            .init_resource::<IdleTriggers>()
            .add_systems(
                Update,
                (
                    attach_idle_triggers,
                    drive_idle_triggers.after(attach_idle_triggers),
                    detach_idle_triggers.after(drive_idle_triggers),
                    log_idle_notifications.after(detach_idle_triggers),
                ),
            );
    }
}
