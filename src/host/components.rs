//! Player registry components provided by the host world.
use std::fmt;

use bevy::prelude::*;

/// Marker for every player avatar in the scene (local and remote).
#[derive(Component, Debug, Default)]
pub struct Player;

/// Marker for the player controlled by this client.
#[derive(Component, Debug, Default)]
pub struct LocalPlayer;

/// Stable id the host assigns to a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Component)]
pub struct PlayerId(u64);

impl PlayerId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player-{:04}", self.0)
    }
}

/// Free-form status text shown on the player's head screen.
#[derive(Component, Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerStatus(pub String);

impl PlayerStatus {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn text(&self) -> &str {
        &self.0
    }
}

/// Resource that issues monotonically increasing player ids.
#[derive(Resource, Default)]
pub struct PlayerIdGenerator {
    next: u64,
}

impl PlayerIdGenerator {
    pub fn next_id(&mut self) -> PlayerId {
        let id = self.next;
        self.next += 1;
        PlayerId::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential_and_displayable() {
        let mut generator = PlayerIdGenerator::default();
        let first = generator.next_id();
        let second = generator.next_id();

        assert_eq!(first.value(), 0);
        assert_eq!(second.value(), 1);
        assert_eq!(second.to_string(), "player-0001");
    }
}
