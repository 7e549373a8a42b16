//! Components used by the demo world.
use bevy::prelude::*;

/// Keyboard-driven movement for the local avatar.
#[derive(Component, Debug)]
pub struct Walker {
    pub move_speed: f32,
    pub turn_speed: f32,
}

impl Default for Walker {
    fn default() -> Self {
        Self {
            move_speed: 4.0,
            turn_speed: 2.5,
        }
    }
}

/// Camera that trails the local player at a fixed offset.
#[derive(Component, Debug)]
pub struct ChaseCamera {
    pub offset: Vec3,
}

impl Default for ChaseCamera {
    fn default() -> Self {
        Self {
            offset: Vec3::new(0.0, 4.0, 8.0),
        }
    }
}

/// Marker component identifying the main directional light (the "sun").
#[derive(Component, Default)]
pub struct PrimarySun;

/// Rotates a remote player's head-screen text through a fixed set of lines.
#[derive(Component, Debug)]
pub struct StatusCycle {
    lines: Vec<String>,
    next: usize,
    timer: Timer,
}

impl StatusCycle {
    pub fn new<I, S>(lines: I, period_secs: f32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            next: 0,
            timer: Timer::from_seconds(period_secs, TimerMode::Repeating),
        }
    }

    /// Returns the next line each time the period elapses.
    pub fn tick(&mut self, delta: std::time::Duration) -> Option<&str> {
        if self.lines.is_empty() || !self.timer.tick(delta).just_finished() {
            return None;
        }
        let line = &self.lines[self.next % self.lines.len()];
        self.next = (self.next + 1) % self.lines.len();
        Some(line)
    }
}
