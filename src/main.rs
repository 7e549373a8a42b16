use std::path::Path;

use bevy::prelude::*;

use hyperfone::{world::WorldPlugin, HyperfonePlugin};

fn main() {
    load_local_env();

    App::new()
        .add_plugins((
            DefaultPlugins,
            HyperfonePlugin,
            WorldPlugin, // Demo host; relies on HostPlugin for PlayerIdGenerator
        ))
        .run();
}

/// Loads `hyperfone.env` (e.g. `HYPERFONE_CONFIG_DIR`, `RUST_LOG`) when present.
fn load_local_env() {
    const ENV_FILE: &str = "hyperfone.env";

    let path = Path::new(ENV_FILE);
    if !path.exists() {
        return;
    }

    if let Err(err) = dotenvy::from_filename(path) {
        eprintln!("Failed to load {}: {}", ENV_FILE, err);
    }
}
