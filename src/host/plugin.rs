//! HostPlugin registers the bus messages and the player registry resources.
use bevy::prelude::*;

use super::{
    components::PlayerIdGenerator,
    events::{AnimationFinished, IdleEnded, IdleStarted, PlayerActivity, ScreenUpdate},
};

pub struct HostPlugin;

impl Plugin for HostPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerIdGenerator>()
            .add_message::<PlayerActivity>()
            .add_message::<AnimationFinished>()
            .add_message::<ScreenUpdate>()
            .add_message::<IdleStarted>()
            .add_message::<IdleEnded>();
    }
}
