//! Systems for the demo world: scene setup, player spawning and the host-side
//! simulation that feeds the bus.
use std::time::Duration;

use bevy::{
    ecs::message::{MessageReader, MessageWriter},
    input::ButtonInput,
    math::primitives::Plane3d,
    prelude::*,
};

use crate::core::timers::HostTimers;
use crate::host::components::PlayerIdGenerator;
use crate::host::{
    ActivityKind, AnimationFinished, Avatar, IdleEnded, IdleStarted, LocalPlayer, Player,
    PlayerActivity, PlayerId, PlayerStatus, ScreenUpdate,
};
use crate::world::components::{ChaseCamera, PrimarySun, StatusCycle, Walker};

const GROUND_SCALE: f32 = 100.0;
const CAPSULE_RADIUS: f32 = 0.4;
const CAPSULE_LENGTH: f32 = 1.0;
/// How long the demo host "plays" any one-shot clip before reporting it done.
pub const CLIP_LENGTH: Duration = Duration::from_secs(3);
const LOCAL_STATUS: &str = "Hello!";

const REMOTE_PLAYERS: [(Vec3, &[&str]); 3] = [
    (Vec3::new(-3.0, 0.0, -2.0), &["Exploring", "brb"]),
    (Vec3::new(3.0, 0.0, -2.0), &["Trading", "Need 5 wood", "Thanks!"]),
    (Vec3::new(0.0, 0.0, -5.0), &["AFK"]),
];

/// Spawns the initial scene: ground plane, light, and a chase camera.
pub fn spawn_world_environment(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Mesh::from(Plane3d::default()))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb_u8(90, 140, 90),
            perceptual_roughness: 0.9,
            metallic: 0.0,
            ..default()
        })),
        Transform::from_scale(Vec3::splat(GROUND_SCALE)),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 20_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(16.0, 32.0, 16.0).looking_at(Vec3::ZERO, Vec3::Y),
        PrimarySun,
    ));

    let camera = ChaseCamera::default();
    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(camera.offset).looking_at(Vec3::ZERO, Vec3::Y),
        camera,
    ));
}

/// Spawns the local player and a handful of remote players.
pub fn spawn_players(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut ids: ResMut<PlayerIdGenerator>,
) {
    let capsule = meshes.add(Capsule3d::new(CAPSULE_RADIUS, CAPSULE_LENGTH));
    let local_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.2, 0.6, 0.9),
        ..default()
    });
    let remote_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.8, 0.5, 0.3),
        ..default()
    });
    let standing_height = CAPSULE_RADIUS + CAPSULE_LENGTH / 2.0;

    let local_id = ids.next_id();
    commands.spawn((
        Mesh3d(capsule.clone()),
        MeshMaterial3d(local_material),
        Transform::from_xyz(0.0, standing_height, 0.0),
        Player,
        LocalPlayer,
        local_id,
        Avatar::default(),
        PlayerStatus::new(LOCAL_STATUS),
        Walker::default(),
        Name::new(format!("Local {}", local_id)),
    ));
    info!("Spawned local {}", local_id);

    for (position, lines) in REMOTE_PLAYERS {
        let id = ids.next_id();
        commands.spawn((
            Mesh3d(capsule.clone()),
            MeshMaterial3d(remote_material.clone()),
            Transform::from_translation(position + Vec3::Y * standing_height),
            Player,
            id,
            Avatar::default(),
            PlayerStatus::new(lines.first().copied().unwrap_or_default()),
            StatusCycle::new(lines.iter().copied(), 4.0),
            Name::new(format!("Remote {}", id)),
        ));
    }
    info!("Spawned {} remote players", REMOTE_PLAYERS.len());
}

/// WASD walks, Q/E turns, Space jumps and F acts; each emits activity.
pub fn drive_local_player(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    mut query: Query<(Entity, &Walker, &mut Transform, &mut Avatar), With<LocalPlayer>>,
    mut activity: MessageWriter<PlayerActivity>,
) {
    let Ok((player, walker, mut transform, mut avatar)) = query.single_mut() else {
        return;
    };

    let mut direction = Vec3::ZERO;
    let forward = transform.forward().as_vec3();
    let right = transform.right().as_vec3();
    if keyboard.pressed(KeyCode::KeyW) {
        direction += forward;
    }
    if keyboard.pressed(KeyCode::KeyS) {
        direction -= forward;
    }
    if keyboard.pressed(KeyCode::KeyA) {
        direction -= right;
    }
    if keyboard.pressed(KeyCode::KeyD) {
        direction += right;
    }
    let direction = Vec3::new(direction.x, 0.0, direction.z).normalize_or_zero();

    let moving = direction != Vec3::ZERO;
    avatar.set_moving(moving);
    if moving {
        transform.translation += direction * walker.move_speed * time.delta_secs();
        activity.write(PlayerActivity {
            player,
            kind: ActivityKind::Move,
        });
    }

    let mut turn = 0.0;
    if keyboard.pressed(KeyCode::KeyQ) {
        turn += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyE) {
        turn -= 1.0;
    }
    if turn != 0.0 {
        transform.rotate_y(turn * walker.turn_speed * time.delta_secs());
        activity.write(PlayerActivity {
            player,
            kind: ActivityKind::Rotate,
        });
    }

    if keyboard.just_pressed(KeyCode::Space) {
        activity.write(PlayerActivity {
            player,
            kind: ActivityKind::Jump,
        });
    }

    avatar.set_acting(keyboard.pressed(KeyCode::KeyF));
    if keyboard.just_pressed(KeyCode::KeyF) {
        activity.write(PlayerActivity {
            player,
            kind: ActivityKind::Action,
        });
    }
}

/// Plays clips on the host clock and reports one-shot completions.
pub fn advance_avatar_clips(
    timers: Res<HostTimers>,
    mut avatars: Query<(Entity, &mut Avatar)>,
    mut finished: MessageWriter<AnimationFinished>,
) {
    let delta = timers.last_scaled_delta();
    for (player, mut avatar) in avatars.iter_mut() {
        if avatar.playing().is_none() {
            continue;
        }
        if let Some(animation) = avatar.tick(delta, CLIP_LENGTH) {
            finished.write(AnimationFinished { player, animation });
        }
    }
}

/// Shows the local player's idle state on their head screen.
pub fn mirror_idle_status(
    mut started: MessageReader<IdleStarted>,
    mut ended: MessageReader<IdleEnded>,
    mut statuses: Query<&mut PlayerStatus, With<LocalPlayer>>,
) {
    for event in started.read() {
        if let Ok(mut status) = statuses.get_mut(event.player) {
            *status = PlayerStatus::new(format!("zzz\n{}", event.animation));
        }
    }
    for event in ended.read() {
        if let Ok(mut status) = statuses.get_mut(event.player) {
            *status = PlayerStatus::new(LOCAL_STATUS);
        }
    }
}

/// Pushes remote players' cycling status lines onto the bus.
pub fn cycle_remote_statuses(
    time: Res<Time>,
    mut remotes: Query<(Entity, &mut StatusCycle), Without<LocalPlayer>>,
    mut updates: MessageWriter<ScreenUpdate>,
) {
    for (player, mut cycle) in remotes.iter_mut() {
        if let Some(line) = cycle.tick(time.delta()) {
            updates.write(ScreenUpdate {
                player,
                text: line.to_string(),
            });
        }
    }
}

/// X removes the most recently spawned remote player.
pub fn despawn_remote_on_key(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    remotes: Query<(Entity, &PlayerId), (With<Player>, Without<LocalPlayer>)>,
) {
    if !keyboard.just_pressed(KeyCode::KeyX) {
        return;
    }

    let Some((entity, id)) = remotes.iter().max_by_key(|(_, id)| id.value()) else {
        debug!("No remote players left to remove");
        return;
    };
    info!("Removing remote {}", id);
    commands.entity(entity).despawn();
}

/// Keeps the camera trailing the local player.
pub fn follow_local_player(
    players: Query<&Transform, (With<LocalPlayer>, Without<ChaseCamera>)>,
    mut cameras: Query<(&ChaseCamera, &mut Transform), Without<LocalPlayer>>,
) {
    let Ok(target) = players.single() else {
        return;
    };
    for (camera, mut transform) in cameras.iter_mut() {
        let offset = target.rotation * camera.offset;
        transform.translation = target.translation + offset;
        transform.look_at(target.translation + Vec3::Y, Vec3::Y);
    }
}

#[cfg(test)]
mod tests {
    use bevy::ecs::message::Messages;

    use super::*;
    use crate::host::{AnimationId, AvatarControl, HostPlugin, Playback};

    #[test]
    fn finished_clips_are_reported_once() {
        let mut app = App::new();
        app.add_plugins(HostPlugin)
            .insert_resource(HostTimers::new(1.0))
            .add_systems(Update, advance_avatar_clips);

        let mut avatar = Avatar::default();
        avatar.play_animation(&AnimationId::from("idle_wave"), Playback::ONCE);
        let player = app.world_mut().spawn((Player, avatar)).id();

        let fired = app.world_mut().resource_mut::<HostTimers>().tick(CLIP_LENGTH);
        assert!(fired.is_empty());
        app.update();
        app.update();

        let finished = app.world().resource::<Messages<AnimationFinished>>();
        let mut cursor = finished.get_cursor();
        let events: Vec<_> = cursor.read(finished).collect();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].player, player);
        assert_eq!(events[0].animation.as_str(), "idle_wave");
    }

    #[test]
    fn idle_notifications_update_local_status() {
        let mut app = App::new();
        app.add_plugins(HostPlugin)
            .add_systems(Update, mirror_idle_status);
        let player = app
            .world_mut()
            .spawn((Player, LocalPlayer, PlayerStatus::new(LOCAL_STATUS)))
            .id();

        app.world_mut().write_message(IdleStarted {
            player,
            animation: AnimationId::from("idle_stretch"),
        });
        app.update();
        let status = app.world().get::<PlayerStatus>(player).expect("status");
        assert_eq!(status.text(), "zzz\nidle_stretch");

        app.world_mut().write_message(IdleEnded { player });
        app.update();
        let status = app.world().get::<PlayerStatus>(player).expect("status");
        assert_eq!(status.text(), LOCAL_STATUS);
    }
}
