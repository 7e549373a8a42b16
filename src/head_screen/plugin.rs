//! HeadScreenPlugin mounts a text display above every player.
use bevy::prelude::*;

use super::{
    config::HeadScreenSettings,
    display::HeadDisplays,
    systems::{
        apply_screen_updates, mount_head_screens, sync_status_changes, unmount_head_screens,
        HeadScreenDisplays, HeadScreenQuads,
    },
};

/// # Dependencies
///
/// - `HostPlugin` (provides `ScreenUpdate` and the player components)
/// - Bevy's asset and PBR plugins for the quad mesh, material and texture
pub struct HeadScreenPlugin {
    settings: HeadScreenSettings,
}

impl HeadScreenPlugin {
    pub fn new(settings: HeadScreenSettings) -> Self {
        Self { settings }
    }
}

impl Default for HeadScreenPlugin {
    fn default() -> Self {
        Self::new(HeadScreenSettings::load_or_default())
    }
}

impl Plugin for HeadScreenPlugin {
    fn build(&self, app: &mut App) {
        info!(
            "HeadScreenPlugin registered (enabled: {}, {}x{} px)",
            self.settings.enabled, self.settings.resolution.x, self.settings.resolution.y
        );

        app.insert_resource(self.settings.clone())
            .insert_resource(HeadScreenDisplays(HeadDisplays::new(self.settings.clone())))
            .init_resource::<HeadScreenQuads>()
            .add_systems(
                Update,
                (
                    unmount_head_screens,
                    mount_head_screens.after(unmount_head_screens),
                    sync_status_changes.after(mount_head_screens),
                    apply_screen_updates.after(sync_status_changes),
                ),
            );
    }
}
