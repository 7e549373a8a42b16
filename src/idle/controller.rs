//! Idle trigger state machine.
//!
//! The controller never touches Bevy directly. Everything it needs from the
//! host (clock, avatar, randomness, outgoing notifications) arrives through an
//! `IdleHost`, so the whole cycle can be driven by a virtual clock in tests.
use std::time::Duration;

use bevy::log::{debug, warn};
use rand::RngCore;

use crate::core::timers::{Scheduler, TimerHandle};
use crate::host::{ActivityKind, AnimationId, AvatarControl, Playback};

use super::config::IdleSettings;

/// Observable phase of the idle cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdlePhase {
    /// The player acted recently; a countdown is armed.
    Active,
    /// The idle cycle re-armed itself (motion at expiry or a clip finished).
    Waiting,
    /// An ambient animation is playing; no countdown is armed.
    Animating,
    /// Feature disabled or controller detached.
    Inert,
}

/// Notifications the controller asks the host to put on its bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdleNotification {
    Started(AnimationId),
    Ended,
}

/// Per-session timer bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct ActivityClock {
    pub last_activity_at: Duration,
    pub pending_deadline: Option<Duration>,
    pub is_animating: bool,
    pub current_animation: Option<AnimationId>,
}

/// Host ports the controller calls into while handling one input.
pub struct IdleHost<'a> {
    pub scheduler: &'a mut dyn Scheduler,
    pub avatar: &'a mut dyn AvatarControl,
    pub rng: &'a mut dyn RngCore,
    pub notifications: &'a mut Vec<IdleNotification>,
}

#[derive(Debug)]
pub struct IdleController {
    settings: IdleSettings,
    clock: ActivityClock,
    pending: Option<TimerHandle>,
    phase: IdlePhase,
}

impl IdleController {
    /// Starts watching. With the feature disabled this schedules nothing and
    /// returns an inert controller.
    pub fn attach(settings: IdleSettings, host: &mut IdleHost<'_>) -> Self {
        let mut controller = Self {
            settings,
            clock: ActivityClock::default(),
            pending: None,
            phase: IdlePhase::Inert,
        };

        if controller.settings.enabled {
            controller.clock.last_activity_at = host.scheduler.now();
            controller.arm(host);
            controller.phase = IdlePhase::Active;
        }
        controller
    }

    pub fn phase(&self) -> IdlePhase {
        self.phase
    }

    pub fn clock(&self) -> &ActivityClock {
        &self.clock
    }

    pub fn pending_timer(&self) -> Option<TimerHandle> {
        self.pending
    }

    pub fn current_animation(&self) -> Option<&AnimationId> {
        self.clock.current_animation.as_ref()
    }

    pub fn is_inert(&self) -> bool {
        self.phase == IdlePhase::Inert
    }

    /// Any activity supersedes the running cycle.
    pub fn on_activity(&mut self, kind: ActivityKind, host: &mut IdleHost<'_>) {
        if self.is_inert() {
            return;
        }

        debug!("Idle countdown reset by {}", kind);
        self.clock.last_activity_at = host.scheduler.now();
        self.cancel_pending(host);
        self.stop_current(host);
        self.arm(host);
        self.phase = IdlePhase::Active;
    }

    /// Handles a countdown expiry. Handles other than the pending one are stale.
    pub fn on_timer(&mut self, handle: TimerHandle, host: &mut IdleHost<'_>) {
        if self.is_inert() || self.pending != Some(handle) {
            return;
        }
        self.pending = None;
        self.clock.pending_deadline = None;

        if host.avatar.is_moving() || host.avatar.is_acting() {
            debug!("Idle countdown expired during motion; re-arming");
            self.arm(host);
            self.phase = IdlePhase::Waiting;
            return;
        }

        let Some(animation) = self.settings.catalog.choose(&mut *host.rng).cloned() else {
            warn!("Idle catalog is empty; re-arming without animation");
            self.arm(host);
            self.phase = IdlePhase::Waiting;
            return;
        };

        host.avatar.play_animation(&animation, Playback::ONCE);
        host.notifications.push(IdleNotification::Started(animation.clone()));
        self.clock.current_animation = Some(animation);
        self.clock.is_animating = true;
        self.phase = IdlePhase::Animating;
    }

    /// Handles the host reporting that a clip finished. Completions for any
    /// clip other than the current one are ignored.
    pub fn on_animation_complete(&mut self, animation: &AnimationId, host: &mut IdleHost<'_>) {
        if self.is_inert() || self.clock.current_animation.as_ref() != Some(animation) {
            return;
        }

        self.clock.current_animation = None;
        self.clock.is_animating = false;
        host.notifications.push(IdleNotification::Ended);
        self.arm(host);
        self.phase = IdlePhase::Waiting;
    }

    /// Cancels the pending countdown and stops any in-flight animation.
    pub fn detach(mut self, host: &mut IdleHost<'_>) {
        if self.is_inert() {
            return;
        }
        self.cancel_pending(host);
        self.stop_current(host);
        self.phase = IdlePhase::Inert;
    }

    fn arm(&mut self, host: &mut IdleHost<'_>) {
        self.cancel_pending(host);
        let handle = host.scheduler.schedule_after(self.settings.delay);
        self.pending = Some(handle);
        self.clock.pending_deadline = Some(host.scheduler.now() + self.settings.delay);
    }

    fn cancel_pending(&mut self, host: &mut IdleHost<'_>) {
        if let Some(handle) = self.pending.take() {
            host.scheduler.cancel(handle);
        }
        self.clock.pending_deadline = None;
    }

    fn stop_current(&mut self, host: &mut IdleHost<'_>) {
        if let Some(animation) = self.clock.current_animation.take() {
            host.avatar.stop_animation(&animation);
            host.notifications.push(IdleNotification::Ended);
        }
        self.clock.is_animating = false;
    }
}
