//! Systems that route host messages into the per-player idle controllers.
use std::collections::HashMap;

use bevy::ecs::error::Result;
use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;
use rand::{rngs::StdRng, RngCore, SeedableRng};

use crate::core::errors::HostError;
use crate::core::timers::{HostTimers, TimerFired};
use crate::host::{
    AnimationFinished, AnimationId, Avatar, AvatarControl, IdleEnded, IdleStarted, LocalPlayer,
    Playback, PlayerActivity,
};

use super::config::IdleSettings;
use super::controller::{IdleController, IdleHost, IdleNotification};

/// Seedable randomness used for animation picks.
#[derive(Resource)]
pub struct IdleRng(pub StdRng);

impl IdleRng {
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self(StdRng::seed_from_u64(seed)),
            None => Self(StdRng::from_entropy()),
        }
    }
}

/// One controller per attached local player.
#[derive(Resource, Debug, Default)]
pub struct IdleTriggers {
    pub by_player: HashMap<Entity, IdleController>,
}

/// Stand-in used when detaching from a player whose entity is already gone.
struct DespawnedAvatar;

impl AvatarControl for DespawnedAvatar {
    fn play_animation(&mut self, _id: &AnimationId, _playback: Playback) {}
    fn stop_animation(&mut self, _id: &AnimationId) {}
    fn is_moving(&self) -> bool {
        false
    }
    fn is_acting(&self) -> bool {
        false
    }
}

fn idle_host<'a>(
    timers: &'a mut HostTimers,
    avatar: &'a mut dyn AvatarControl,
    rng: &'a mut dyn RngCore,
    notifications: &'a mut Vec<IdleNotification>,
) -> IdleHost<'a> {
    IdleHost {
        scheduler: timers,
        avatar,
        rng,
        notifications,
    }
}

fn publish(
    player: Entity,
    notifications: &mut Vec<IdleNotification>,
    started: &mut MessageWriter<IdleStarted>,
    ended: &mut MessageWriter<IdleEnded>,
) {
    for notification in notifications.drain(..) {
        match notification {
            IdleNotification::Started(animation) => {
                started.write(IdleStarted { player, animation });
            }
            IdleNotification::Ended => {
                ended.write(IdleEnded { player });
            }
        }
    }
}

/// Attaches a controller to every newly spawned local player.
///
/// A local player without an `Avatar` is an integration bug. The rest of the
/// batch is still attached, then the first such error is returned.
pub fn attach_idle_triggers(
    settings: Res<IdleSettings>,
    mut triggers: ResMut<IdleTriggers>,
    mut timers: ResMut<HostTimers>,
    mut rng: ResMut<IdleRng>,
    mut new_locals: Query<(Entity, Option<&mut Avatar>), Added<LocalPlayer>>,
) -> Result {
    let mut first_error = None;
    for (player, avatar) in new_locals.iter_mut() {
        let Some(mut avatar) = avatar else {
            let err = HostError::missing_avatar(player);
            warn!("{}", err);
            first_error.get_or_insert(err);
            continue;
        };
        if triggers.by_player.contains_key(&player) {
            continue;
        }

        let mut notifications = Vec::new();
        let controller = IdleController::attach(
            IdleSettings::clone(&settings),
            &mut idle_host(&mut timers, &mut *avatar, &mut rng.0, &mut notifications),
        );

        if controller.is_inert() {
            info!("Idle animations disabled for {:?}", player);
        } else {
            info!(
                "Idle trigger attached to {:?} (delay {} ms, {} animations)",
                player,
                settings.delay.as_millis(),
                settings.catalog.len()
            );
        }
        triggers.by_player.insert(player, controller);
    }
    match first_error {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

/// Feeds activity, countdown expiry and clip completion to the controllers,
/// in that order, and publishes their notifications on the bus.
#[allow(clippy::too_many_arguments)] // System function requires all arguments
pub fn drive_idle_triggers(
    mut triggers: ResMut<IdleTriggers>,
    mut timers: ResMut<HostTimers>,
    mut rng: ResMut<IdleRng>,
    mut activity: MessageReader<PlayerActivity>,
    mut fired: MessageReader<TimerFired>,
    mut finished: MessageReader<AnimationFinished>,
    mut avatars: Query<&mut Avatar>,
    mut started: MessageWriter<IdleStarted>,
    mut ended: MessageWriter<IdleEnded>,
) {
    let mut notifications = Vec::new();

    for event in activity.read() {
        let Some(controller) = triggers.by_player.get_mut(&event.player) else {
            continue;
        };
        let Ok(mut avatar) = avatars.get_mut(event.player) else {
            continue;
        };
        controller.on_activity(
            event.kind,
            &mut idle_host(&mut timers, &mut *avatar, &mut rng.0, &mut notifications),
        );
        publish(event.player, &mut notifications, &mut started, &mut ended);
    }

    for TimerFired { handle } in fired.read() {
        for (player, controller) in triggers.by_player.iter_mut() {
            if controller.pending_timer() != Some(*handle) {
                continue;
            }
            let Ok(mut avatar) = avatars.get_mut(*player) else {
                continue;
            };
            controller.on_timer(
                *handle,
                &mut idle_host(&mut timers, &mut *avatar, &mut rng.0, &mut notifications),
            );
            publish(*player, &mut notifications, &mut started, &mut ended);
        }
    }

    for event in finished.read() {
        let Some(controller) = triggers.by_player.get_mut(&event.player) else {
            continue;
        };
        let Ok(mut avatar) = avatars.get_mut(event.player) else {
            continue;
        };
        controller.on_animation_complete(
            &event.animation,
            &mut idle_host(&mut timers, &mut *avatar, &mut rng.0, &mut notifications),
        );
        publish(event.player, &mut notifications, &mut started, &mut ended);
    }
}

/// Detaches controllers whose player lost `LocalPlayer` or was despawned.
pub fn detach_idle_triggers(
    mut triggers: ResMut<IdleTriggers>,
    mut timers: ResMut<HostTimers>,
    mut rng: ResMut<IdleRng>,
    mut removed: RemovedComponents<LocalPlayer>,
    mut avatars: Query<&mut Avatar>,
    mut started: MessageWriter<IdleStarted>,
    mut ended: MessageWriter<IdleEnded>,
) {
    let mut notifications = Vec::new();

    for player in removed.read() {
        let Some(controller) = triggers.by_player.remove(&player) else {
            continue;
        };

        match avatars.get_mut(player) {
            Ok(mut avatar) => controller.detach(&mut idle_host(
                &mut timers,
                &mut *avatar,
                &mut rng.0,
                &mut notifications,
            )),
            Err(_) => controller.detach(&mut idle_host(
                &mut timers,
                &mut DespawnedAvatar,
                &mut rng.0,
                &mut notifications,
            )),
        }
        publish(player, &mut notifications, &mut started, &mut ended);
        info!("Idle trigger detached from {:?}", player);
    }
}

/// Logs idle transitions published on the bus.
pub fn log_idle_notifications(
    mut started: MessageReader<IdleStarted>,
    mut ended: MessageReader<IdleEnded>,
) {
    for event in started.read() {
        info!("idleStart {:?}: {}", event.player, event.animation);
    }
    for event in ended.read() {
        info!("idleEnd {:?}", event.player);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy::ecs::message::Messages;
    use bevy::ecs::system::RunSystemOnce;

    use super::*;
    use crate::host::{ActivityKind, HostPlugin, Player};
    use crate::idle::controller::IdlePhase;

    fn idle_app(delay_ms: u64) -> App {
        let settings = IdleSettings {
            delay: Duration::from_millis(delay_ms),
            seed: Some(7),
            ..IdleSettings::default()
        };

        let mut app = App::new();
        app.add_plugins(HostPlugin)
            .add_message::<TimerFired>()
            .insert_resource(HostTimers::new(1.0))
            .insert_resource(IdleRng::from_seed(settings.seed))
            .insert_resource(settings)
            .init_resource::<IdleTriggers>()
            .add_systems(
                Update,
                (
                    attach_idle_triggers,
                    drive_idle_triggers.after(attach_idle_triggers),
                    detach_idle_triggers.after(drive_idle_triggers),
                ),
            );
        app
    }

    fn expire_countdowns(app: &mut App, by: Duration) {
        let fired = app.world_mut().resource_mut::<HostTimers>().advance(by);
        for handle in fired {
            app.world_mut().write_message(TimerFired { handle });
        }
        app.update();
    }

    fn phase_of(app: &App, player: Entity) -> Option<IdlePhase> {
        app.world()
            .resource::<IdleTriggers>()
            .by_player
            .get(&player)
            .map(IdleController::phase)
    }

    #[test]
    fn quiet_local_player_starts_an_ambient_clip() {
        let mut app = idle_app(10);
        let player = app
            .world_mut()
            .spawn((Player, LocalPlayer, Avatar::default()))
            .id();
        app.update();
        assert_eq!(phase_of(&app, player), Some(IdlePhase::Active));

        expire_countdowns(&mut app, Duration::from_millis(10));

        assert_eq!(phase_of(&app, player), Some(IdlePhase::Animating));
        let avatar = app.world().get::<Avatar>(player).expect("avatar");
        let playing = avatar.playing().expect("ambient clip playing");
        assert!(app
            .world()
            .resource::<IdleSettings>()
            .catalog
            .contains(playing));
    }

    #[test]
    fn activity_interrupts_the_ambient_clip() {
        let mut app = idle_app(10);
        let player = app
            .world_mut()
            .spawn((Player, LocalPlayer, Avatar::default()))
            .id();
        app.update();
        expire_countdowns(&mut app, Duration::from_millis(10));

        app.world_mut().write_message(PlayerActivity {
            player,
            kind: ActivityKind::Jump,
        });
        app.update();

        assert_eq!(phase_of(&app, player), Some(IdlePhase::Active));
        let avatar = app.world().get::<Avatar>(player).expect("avatar");
        assert!(avatar.playing().is_none());
    }

    #[test]
    fn removing_local_player_detaches_and_cancels() {
        let mut app = idle_app(10);
        let player = app
            .world_mut()
            .spawn((Player, LocalPlayer, Avatar::default()))
            .id();
        app.update();
        assert_eq!(app.world().resource::<HostTimers>().pending_count(), 1);

        app.world_mut().entity_mut(player).remove::<LocalPlayer>();
        app.update();

        assert!(phase_of(&app, player).is_none());
        assert_eq!(app.world().resource::<HostTimers>().pending_count(), 0);
    }

    #[test]
    fn remote_players_are_never_attached() {
        let mut app = idle_app(10);
        app.world_mut().spawn((Player, Avatar::default()));
        app.update();

        assert!(app.world().resource::<IdleTriggers>().by_player.is_empty());
    }

    #[test]
    #[should_panic]
    fn local_player_without_avatar_fails_fast() {
        let mut app = idle_app(10);
        app.world_mut().spawn((Player, LocalPlayer));
        app.update();
    }

    #[test]
    fn activity_in_the_same_frame_beats_an_expiring_countdown() {
        let mut app = idle_app(10);
        let player = app
            .world_mut()
            .spawn((Player, LocalPlayer, Avatar::default()))
            .id();
        app.update();

        let fired = app
            .world_mut()
            .resource_mut::<HostTimers>()
            .advance(Duration::from_millis(10));
        assert_eq!(fired.len(), 1);
        for handle in fired {
            app.world_mut().write_message(TimerFired { handle });
        }
        app.world_mut().write_message(PlayerActivity {
            player,
            kind: ActivityKind::Move,
        });
        app.update();

        assert_eq!(phase_of(&app, player), Some(IdlePhase::Active));
        let avatar = app.world().get::<Avatar>(player).expect("avatar");
        assert!(avatar.playing().is_none());

        let started = app.world().resource::<Messages<IdleStarted>>();
        let mut cursor = started.get_cursor();
        assert_eq!(cursor.read(started).count(), 0);
        assert_eq!(app.world().resource::<HostTimers>().pending_count(), 1);
    }

    #[test]
    fn missing_avatar_does_not_block_the_rest_of_the_batch() {
        let mut app = idle_app(10);
        let broken = app.world_mut().spawn((Player, LocalPlayer)).id();
        let healthy = app
            .world_mut()
            .spawn((Player, LocalPlayer, Avatar::default()))
            .id();

        let result: Result = app
            .world_mut()
            .run_system_once(attach_idle_triggers)
            .expect("system runs");

        assert!(result.is_err());
        assert!(phase_of(&app, broken).is_none());
        assert_eq!(phase_of(&app, healthy), Some(IdlePhase::Active));
    }
}
