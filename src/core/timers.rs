//! Host clock and countdown scheduling.
//!
//! `HostTimers` is a virtual clock: it only moves when it is advanced, either
//! by `CorePlugin` from Bevy's frame delta or directly by tests.
use std::{collections::BTreeMap, fmt, time::Duration};

use bevy::ecs::message::Message;
use bevy::prelude::*;

pub const DEFAULT_TIME_SCALE: f32 = 1.0;
pub const MIN_TIME_SCALE: f32 = 0.001;

/// Opaque id for a scheduled countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Schedulable-callback port. Expiry is delivered out of band (see `TimerFired`).
pub trait Scheduler {
    /// Current host time.
    fn now(&self) -> Duration;

    /// Arms a countdown that expires `delay` after `now()`.
    fn schedule_after(&mut self, delay: Duration) -> TimerHandle;

    /// Cancels a countdown. Returns false if it already fired or was never armed.
    fn cancel(&mut self, handle: TimerHandle) -> bool;
}

/// Written once per expired countdown, in deadline order.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFired {
    pub handle: TimerHandle,
}

/// Virtual clock with scaled time and pending countdowns.
#[derive(Resource, Debug)]
pub struct HostTimers {
    time_scale: f32,
    last_real_delta: Duration,
    last_scaled_delta: Duration,
    now: Duration,
    next_handle: u64,
    pending: BTreeMap<TimerHandle, Duration>,
}

impl HostTimers {
    /// Creates a clock with the provided time-scale multiplier.
    pub fn new(time_scale: f32) -> Self {
        Self {
            time_scale: time_scale.max(MIN_TIME_SCALE),
            last_real_delta: Duration::ZERO,
            last_scaled_delta: Duration::ZERO,
            now: Duration::ZERO,
            next_handle: 1,
            pending: BTreeMap::new(),
        }
    }

    /// Sets the time-scale multiplier (clamped to a small positive minimum).
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(MIN_TIME_SCALE);
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Last real (unscaled) delta reported by Bevy's Time resource.
    #[cfg_attr(not(feature = "core_debug"), allow(dead_code))]
    pub fn last_real_delta(&self) -> Duration {
        self.last_real_delta
    }

    /// Last scaled delta after applying the multiplier.
    #[cfg_attr(not(feature = "core_debug"), allow(dead_code))]
    pub fn last_scaled_delta(&self) -> Duration {
        self.last_scaled_delta
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn deadline(&self, handle: TimerHandle) -> Option<Duration> {
        self.pending.get(&handle).copied()
    }

    /// Applies a real frame delta and returns the countdowns that expired.
    pub fn tick(&mut self, real_delta: Duration) -> Vec<TimerHandle> {
        self.last_real_delta = real_delta;
        self.last_scaled_delta = real_delta.mul_f32(self.time_scale);
        self.advance(self.last_scaled_delta)
    }

    /// Moves the clock forward by `by` of host time and returns every countdown
    /// whose deadline has been reached, earliest first.
    pub fn advance(&mut self, by: Duration) -> Vec<TimerHandle> {
        self.now += by;

        let mut expired: Vec<(Duration, TimerHandle)> = self
            .pending
            .iter()
            .filter(|(_, deadline)| **deadline <= self.now)
            .map(|(handle, deadline)| (*deadline, *handle))
            .collect();
        expired.sort();

        for (_, handle) in &expired {
            self.pending.remove(handle);
        }

        expired.into_iter().map(|(_, handle)| handle).collect()
    }
}

impl Default for HostTimers {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_SCALE)
    }
}

impl Scheduler for HostTimers {
    fn now(&self) -> Duration {
        self.now
    }

    fn schedule_after(&mut self, delay: Duration) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.pending.insert(handle, self.now + delay);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.pending.remove(&handle).is_some()
    }
}
