//! Avatar control contract and the component that implements it.
use std::{fmt, time::Duration};

use bevy::prelude::*;

/// Identifier of an avatar animation clip.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnimationId(String);

impl AnimationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnimationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AnimationId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Playback options passed to `AvatarControl::play_animation`.
///
/// Completion of a non-looping clip is reported back by the host through an
/// `AnimationFinished` message rather than a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Playback {
    pub looped: bool,
}

impl Playback {
    pub const ONCE: Self = Self { looped: false };
}

/// What the idle controller needs from the host avatar.
pub trait AvatarControl {
    fn play_animation(&mut self, id: &AnimationId, playback: Playback);
    fn stop_animation(&mut self, id: &AnimationId);
    fn is_moving(&self) -> bool;
    fn is_acting(&self) -> bool;
}

#[derive(Debug, Clone)]
struct ActiveClip {
    id: AnimationId,
    playback: Playback,
    elapsed: Duration,
}

/// Host-side avatar state: motion flags plus the clip currently playing.
#[derive(Component, Debug, Default)]
pub struct Avatar {
    moving: bool,
    acting: bool,
    clip: Option<ActiveClip>,
}

impl Avatar {
    pub fn set_moving(&mut self, moving: bool) {
        self.moving = moving;
    }

    pub fn set_acting(&mut self, acting: bool) {
        self.acting = acting;
    }

    /// Clip currently playing, if any.
    pub fn playing(&self) -> Option<&AnimationId> {
        self.clip.as_ref().map(|clip| &clip.id)
    }

    /// Advances the playing clip. Returns the clip id once a non-looping clip
    /// has run for `clip_length`; the clip is cleared at that point.
    pub fn tick(&mut self, delta: Duration, clip_length: Duration) -> Option<AnimationId> {
        let clip = self.clip.as_mut()?;
        clip.elapsed += delta;
        if clip.playback.looped || clip.elapsed < clip_length {
            return None;
        }
        self.clip.take().map(|clip| clip.id)
    }
}

impl AvatarControl for Avatar {
    fn play_animation(&mut self, id: &AnimationId, playback: Playback) {
        self.clip = Some(ActiveClip {
            id: id.clone(),
            playback,
            elapsed: Duration::ZERO,
        });
    }

    fn stop_animation(&mut self, id: &AnimationId) {
        if self.playing() == Some(id) {
            self.clip = None;
        }
    }

    fn is_moving(&self) -> bool {
        self.moving
    }

    fn is_acting(&self) -> bool {
        self.acting
    }
}
