//! CorePlugin wires the host clock and countdown delivery.
use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;
#[cfg(feature = "core_debug")]
use bevy::time::TimerMode;

use super::timers::{HostTimers, TimerFired, DEFAULT_TIME_SCALE};

#[cfg(feature = "core_debug")]
#[derive(Resource)]
struct DebugTickTimer {
    timer: Timer,
}

#[cfg(feature = "core_debug")]
impl Default for DebugTickTimer {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(1.0, TimerMode::Repeating),
        }
    }
}

/// Registers the host clock and the `TimerFired` message.
#[derive(Debug, Clone, Copy)]
pub struct CorePlugin {
    time_scale: f32,
}

impl CorePlugin {
    /// Creates a CorePlugin with the provided time-scale multiplier.
    pub const fn with_time_scale(time_scale: f32) -> Self {
        Self { time_scale }
    }
}

impl Default for CorePlugin {
    fn default() -> Self {
        Self::with_time_scale(DEFAULT_TIME_SCALE)
    }
}

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(HostTimers::new(self.time_scale))
            .add_message::<TimerFired>()
            .add_systems(Startup, log_startup_time_scale)
            .add_systems(PreUpdate, advance_host_timers);

        #[cfg(feature = "core_debug")]
        {
            app.insert_resource(DebugTickTimer::default())
                .add_systems(Update, log_pending_timers);
        }
    }
}

/// Advances the host clock by the frame delta and announces expired countdowns.
pub fn advance_host_timers(
    time: Res<Time>,
    mut timers: ResMut<HostTimers>,
    mut fired: MessageWriter<TimerFired>,
) {
    for handle in timers.tick(time.delta()) {
        fired.write(TimerFired { handle });
    }
}

fn log_startup_time_scale(timers: Res<HostTimers>) {
    info!(
        "CorePlugin initialised with time scale: {:.3}",
        timers.time_scale()
    );
}

#[cfg(feature = "core_debug")]
fn log_pending_timers(mut timer: ResMut<DebugTickTimer>, timers: Res<HostTimers>) {
    use super::timers::Scheduler;

    if timer.timer.tick(timers.last_scaled_delta()).just_finished() {
        info!(
            target: "core_debug",
            "Host time: {:.2}s | scale: {:.3} | real dt: {:.4}s | pending timers: {}",
            timers.now().as_secs_f32(),
            timers.time_scale(),
            timers.last_real_delta().as_secs_f32(),
            timers.pending_count(),
        );
    }
}
