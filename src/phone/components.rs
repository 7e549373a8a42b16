// src/phone/components.rs
//
// Marker components and view bookkeeping for the phone overlay.

use bevy::prelude::*;

use super::shell::PhoneApp;

/// Root node of the phone panel. Hidden while the phone is closed.
#[derive(Component, Debug)]
pub struct PhoneRoot;

/// Header text showing "HyperFone" or the current app's name.
#[derive(Component, Debug)]
pub struct PhoneTitle;

/// Header button only displayed inside a non-home app.
#[derive(Component, Debug)]
pub struct PhoneBackButton;

/// Container the home grid or the current app panel is mounted into.
#[derive(Component, Debug)]
pub struct PhoneContent;

/// The home screen: welcome text plus one tile per app.
#[derive(Component, Debug)]
pub struct PhoneHomeGrid;

/// Placeholder panel for a single app.
#[derive(Component, Debug)]
pub struct PhoneAppPanel {
    pub app: PhoneApp,
}

/// What a phone button does when pressed.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneButton {
    Launch(PhoneApp),
    Back,
    Close,
}

/// Tracks which view is currently mounted under `PhoneContent`.
#[derive(Resource, Debug, Default)]
pub struct PhoneView {
    pub mounted: Option<PhoneApp>,
    pub panel: Option<Entity>,
}
