//! Errors raised when a required host reference is absent.
use thiserror::Error;

/// Missing or invalid host objects. These are integration bugs, so systems
/// propagate them instead of skipping the player.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("player {player} has no avatar; idle trigger cannot attach")]
    MissingAvatar { player: String },

    #[error("scene object {object} does not exist; head screen cannot mount")]
    MissingSceneObject { object: String },
}

impl HostError {
    pub fn missing_avatar(player: impl std::fmt::Debug) -> Self {
        Self::MissingAvatar {
            player: format!("{:?}", player),
        }
    }

    pub fn missing_scene_object(object: impl std::fmt::Debug) -> Self {
        Self::MissingSceneObject {
            object: format!("{:?}", object),
        }
    }
}
