//! Which phone app is showing, and whether the phone is open at all.
use std::fmt;

use bevy::prelude::*;

/// The closed set of apps the phone can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PhoneApp {
    #[default]
    Home,
    Chat,
    Browser,
    Wallet,
    Settings,
    AppStore,
}

impl PhoneApp {
    /// Home grid order.
    pub const ALL: [PhoneApp; 6] = [
        Self::Home,
        Self::Chat,
        Self::Browser,
        Self::Wallet,
        Self::Settings,
        Self::AppStore,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Chat => "chat",
            Self::Browser => "browser",
            Self::Wallet => "wallet",
            Self::Settings => "settings",
            Self::AppStore => "apps",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Chat => "Chat",
            Self::Browser => "Browser",
            Self::Wallet => "Wallet",
            Self::Settings => "Settings",
            Self::AppStore => "App Store",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|app| app.id() == id)
    }
}

impl fmt::Display for PhoneApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Open flag plus the current app selector.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhoneShell {
    open: bool,
    current: PhoneApp,
}

impl PhoneShell {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn current(&self) -> PhoneApp {
        self.current
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Hides the phone. The next open starts on the home grid.
    pub fn close(&mut self) {
        self.open = false;
        self.current = PhoneApp::Home;
    }

    pub fn toggle(&mut self) {
        if self.open {
            self.close();
        } else {
            self.open();
        }
    }

    pub fn open_app(&mut self, app: PhoneApp) {
        self.current = app;
    }

    pub fn back(&mut self) {
        self.current = PhoneApp::Home;
    }

    /// Non-home apps show a back button returning to the grid.
    pub fn shows_back(&self) -> bool {
        self.current != PhoneApp::Home
    }

    pub fn title(&self) -> &'static str {
        match self.current {
            PhoneApp::Home => "HyperFone",
            app => app.name(),
        }
    }
}
