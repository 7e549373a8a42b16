//! Host world contract: player registry, avatar control and bus messages.
pub mod avatar;
pub mod components;
pub mod events;
pub mod plugin;

pub use avatar::{AnimationId, Avatar, AvatarControl, Playback};
pub use components::{LocalPlayer, Player, PlayerId, PlayerStatus};
pub use events::{
    ActivityKind, AnimationFinished, IdleEnded, IdleStarted, PlayerActivity, ScreenUpdate,
};
pub use plugin::HostPlugin;
