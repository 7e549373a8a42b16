//! Messages exchanged over the host bus.
use std::fmt;

use bevy::ecs::message::Message;
use bevy::prelude::Entity;

use super::avatar::AnimationId;

/// Kinds of player activity that reset the idle countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityKind {
    Move,
    Rotate,
    Jump,
    Action,
}

impl ActivityKind {
    pub const ALL: [ActivityKind; 4] = [Self::Move, Self::Rotate, Self::Jump, Self::Action];
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Move => "playerMove",
            Self::Rotate => "playerRotate",
            Self::Jump => "playerJump",
            Self::Action => "playerAction",
        };
        f.write_str(label)
    }
}

/// A player moved, rotated, jumped or performed an action.
#[derive(Message, Debug, Clone, Copy)]
pub struct PlayerActivity {
    pub player: Entity,
    pub kind: ActivityKind,
}

/// The host finished playing a non-looping clip on a player's avatar.
#[derive(Message, Debug, Clone)]
pub struct AnimationFinished {
    pub player: Entity,
    pub animation: AnimationId,
}

/// New head-screen text for one player.
#[derive(Message, Debug, Clone)]
pub struct ScreenUpdate {
    pub player: Entity,
    pub text: String,
}

/// An ambient idle animation started on a player's avatar.
#[derive(Message, Debug, Clone)]
pub struct IdleStarted {
    pub player: Entity,
    pub animation: AnimationId,
}

/// The ambient idle animation on a player's avatar ended or was interrupted.
#[derive(Message, Debug, Clone, Copy)]
pub struct IdleEnded {
    pub player: Entity,
}
