//! WorldPlugin hosts the demo scene: players, input and clip playback.
use bevy::prelude::*;

use crate::world::systems::{
    advance_avatar_clips, cycle_remote_statuses, despawn_remote_on_key, drive_local_player,
    follow_local_player, mirror_idle_status, spawn_players, spawn_world_environment,
};

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        info!("WorldPlugin registered (WASD move, Q/E turn, Space jump, F act, X remove remote)");

        app.add_systems(Startup, (spawn_world_environment, spawn_players))
            .add_systems(
                Update,
                (
                    drive_local_player,
                    follow_local_player.after(drive_local_player),
                    advance_avatar_clips,
                    mirror_idle_status,
                    cycle_remote_statuses,
                    despawn_remote_on_key,
                ),
            );
    }
}
