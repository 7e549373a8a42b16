//! Per-player head displays, independent of the scene graph.
//!
//! `HeadDisplays` owns one `ScreenSurface` per mounted player and talks to the
//! scene only through `ScreenHost`. The Bevy adapter lives in `systems`.
use std::{collections::HashMap, hash::Hash};

use bevy::log::{debug, warn};
use bevy::math::{UVec2, Vec2};

use crate::core::errors::HostError;

use super::config::HeadScreenSettings;
use super::surface::ScreenSurface;

/// Scene-side id of a projected quad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuadId(pub u64);

/// Geometry and placement of the projected quad, relative to the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadSpec {
    pub size: Vec2,
    pub offset_y: f32,
    pub yaw: f32,
    pub opacity: f32,
    pub resolution: UVec2,
}

impl From<&HeadScreenSettings> for QuadSpec {
    fn from(settings: &HeadScreenSettings) -> Self {
        Self {
            size: settings.dimensions,
            offset_y: settings.offset_y,
            yaw: settings.rotation,
            opacity: settings.style.opacity,
            resolution: settings.resolution,
        }
    }
}

/// Scene operations a head display needs.
pub trait ScreenHost<K> {
    /// Builds a textured quad and parents it to `player`.
    fn attach_quad(&mut self, player: K, spec: &QuadSpec) -> Result<QuadId, HostError>;

    /// Copies the surface into the quad's texture.
    fn upload(&mut self, quad: QuadId, surface: &ScreenSurface);

    /// Removes the quad from the player and releases its render resources.
    fn detach_quad(&mut self, quad: QuadId);
}

#[derive(Debug)]
struct MountedDisplay {
    quad: QuadId,
    surface: ScreenSurface,
}

#[derive(Debug)]
pub struct HeadDisplays<K> {
    settings: HeadScreenSettings,
    mounted: HashMap<K, MountedDisplay>,
}

impl<K> HeadDisplays<K>
where
    K: Copy + Eq + Hash + std::fmt::Debug,
{
    pub fn new(settings: HeadScreenSettings) -> Self {
        Self {
            settings,
            mounted: HashMap::new(),
        }
    }

    pub fn settings(&self) -> &HeadScreenSettings {
        &self.settings
    }

    pub fn is_mounted(&self, player: K) -> bool {
        self.mounted.contains_key(&player)
    }

    pub fn surface(&self, player: K) -> Option<&ScreenSurface> {
        self.mounted.get(&player).map(|display| &display.surface)
    }

    pub fn quad(&self, player: K) -> Option<QuadId> {
        self.mounted.get(&player).map(|display| display.quad)
    }

    pub fn len(&self) -> usize {
        self.mounted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mounted.is_empty()
    }

    /// Allocates the surface, attaches the quad and renders `text`.
    ///
    /// Returns `Ok(false)` when the feature is disabled or the player already
    /// has a display.
    pub fn mount(
        &mut self,
        player: K,
        text: &str,
        host: &mut dyn ScreenHost<K>,
    ) -> Result<bool, HostError> {
        if !self.settings.enabled {
            return Ok(false);
        }
        if self.is_mounted(player) {
            warn!("Head screen for {:?} is already mounted", player);
            return Ok(false);
        }

        let resolution = self.settings.resolution;
        let mut surface = ScreenSurface::new(resolution.x, resolution.y);
        let quad = host.attach_quad(player, &QuadSpec::from(&self.settings))?;

        surface.render(text, &self.settings.style);
        host.upload(quad, &surface);
        surface.take_dirty();

        self.mounted.insert(player, MountedDisplay { quad, surface });
        debug!("Head screen mounted for {:?}", player);
        Ok(true)
    }

    /// Mounts every player in `players`, continuing past failures.
    ///
    /// Returns how many displays were mounted, or the first error once the
    /// whole batch has been tried.
    pub fn mount_batch<'t>(
        &mut self,
        players: impl IntoIterator<Item = (K, &'t str)>,
        host: &mut dyn ScreenHost<K>,
    ) -> Result<usize, HostError> {
        let mut mounted = 0;
        let mut first_error = None;
        for (player, text) in players {
            match self.mount(player, text, host) {
                Ok(true) => mounted += 1,
                Ok(false) => {}
                Err(err) => {
                    warn!("{}", err);
                    first_error.get_or_insert(err);
                }
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(mounted),
        }
    }

    /// Renders new text for a mounted player. Returns false if not mounted.
    pub fn update(&mut self, player: K, text: &str, host: &mut dyn ScreenHost<K>) -> bool {
        let Some(display) = self.mounted.get_mut(&player) else {
            return false;
        };

        display.surface.render(text, &self.settings.style);
        host.upload(display.quad, &display.surface);
        display.surface.take_dirty();
        true
    }

    /// Detaches the quad and drops the surface. Returns false if not mounted.
    pub fn unmount(&mut self, player: K, host: &mut dyn ScreenHost<K>) -> bool {
        let Some(display) = self.mounted.remove(&player) else {
            return false;
        };

        host.detach_quad(display.quad);
        debug!("Head screen unmounted for {:?}", player);
        true
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[derive(Default)]
    struct FakeScene {
        next: u64,
        live_players: HashSet<u32>,
        attached: HashMap<QuadId, u32>,
        attach_calls: usize,
        uploads: Vec<(QuadId, String)>,
    }

    impl FakeScene {
        fn with_players(players: &[u32]) -> Self {
            Self {
                live_players: players.iter().copied().collect(),
                ..Self::default()
            }
        }
    }

    impl ScreenHost<u32> for FakeScene {
        fn attach_quad(&mut self, player: u32, spec: &QuadSpec) -> Result<QuadId, HostError> {
            if !self.live_players.contains(&player) {
                return Err(HostError::missing_scene_object(player));
            }
            assert_eq!(spec.resolution, UVec2::new(512, 156));
            self.attach_calls += 1;
            self.next += 1;
            let quad = QuadId(self.next);
            self.attached.insert(quad, player);
            Ok(quad)
        }

        fn upload(&mut self, quad: QuadId, surface: &ScreenSurface) {
            assert!(self.attached.contains_key(&quad), "upload to detached quad");
            self.uploads.push((quad, surface.text().to_string()));
        }

        fn detach_quad(&mut self, quad: QuadId) {
            self.attached.remove(&quad);
        }
    }

    #[test]
    fn mount_attaches_and_renders_current_text() {
        let mut scene = FakeScene::with_players(&[1]);
        let mut displays = HeadDisplays::<u32>::new(HeadScreenSettings::default());

        assert_eq!(displays.mount(1, "hello", &mut scene), Ok(true));

        let quad = displays.quad(1).expect("mounted");
        assert_eq!(scene.attached.get(&quad), Some(&1));
        assert_eq!(scene.uploads, vec![(quad, "hello".to_string())]);
        let surface = displays.surface(1).expect("mounted");
        assert_eq!(surface.dimensions(), (512, 156));
        assert!(!surface.is_dirty());
    }

    #[test]
    fn each_update_renders_once() {
        let mut scene = FakeScene::with_players(&[1]);
        let mut displays = HeadDisplays::<u32>::new(HeadScreenSettings::default());
        displays.mount(1, "", &mut scene).expect("mount");

        assert!(displays.update(1, "away", &mut scene));
        assert!(displays.update(1, "away", &mut scene));
        assert!(displays.update(1, "back\nsoon", &mut scene));

        let texts: Vec<&str> = scene.uploads.iter().map(|(_, text)| text.as_str()).collect();
        assert_eq!(texts, vec!["", "away", "away", "back\nsoon"]);
        assert_eq!(displays.surface(1).map(ScreenSurface::text), Some("back\nsoon"));
    }

    #[test]
    fn unmount_detaches_and_ignores_later_updates() {
        let mut scene = FakeScene::with_players(&[1]);
        let mut displays = HeadDisplays::<u32>::new(HeadScreenSettings::default());
        displays.mount(1, "hi", &mut scene).expect("mount");

        assert!(displays.unmount(1, &mut scene));
        assert!(scene.attached.is_empty());
        assert!(displays.surface(1).is_none());

        assert!(!displays.update(1, "ghost", &mut scene));
        assert!(!displays.unmount(1, &mut scene));
        assert!(scene.attached.is_empty());
        assert_eq!(scene.uploads.len(), 1);
    }

    #[test]
    fn batch_mount_continues_past_a_missing_player() {
        let mut scene = FakeScene::with_players(&[1, 3]);
        let mut displays = HeadDisplays::<u32>::new(HeadScreenSettings::default());

        let result = displays.mount_batch([(1, "a"), (2, "b"), (3, "c")], &mut scene);

        assert_eq!(result, Err(HostError::missing_scene_object(2)));
        assert_eq!(displays.surface(1).map(ScreenSurface::text), Some("a"));
        assert!(displays.surface(2).is_none());
        assert_eq!(displays.surface(3).map(ScreenSurface::text), Some("c"));
        assert_eq!(scene.attach_calls, 2);

        assert!(displays.mount_batch([(4, "d")], &mut scene).is_err());
        assert_eq!(displays.mount_batch([(1, "again")], &mut scene), Ok(0));
    }

    #[test]
    fn disabled_mount_touches_nothing() {
        let mut scene = FakeScene::with_players(&[1, 2]);
        let mut displays = HeadDisplays::<u32>::new(HeadScreenSettings::disabled());

        assert_eq!(displays.mount(1, "hi", &mut scene), Ok(false));
        assert_eq!(displays.mount(2, "hi", &mut scene), Ok(false));

        assert_eq!(scene.attach_calls, 0);
        assert!(scene.uploads.is_empty());
        assert!(displays.is_empty());
    }

    #[test]
    fn one_surface_per_player() {
        let mut scene = FakeScene::with_players(&[1, 2]);
        let mut displays = HeadDisplays::<u32>::new(HeadScreenSettings::default());

        assert_eq!(displays.mount(1, "a", &mut scene), Ok(true));
        assert_eq!(displays.mount(1, "b", &mut scene), Ok(false));
        assert_eq!(displays.mount(2, "c", &mut scene), Ok(true));

        assert_eq!(displays.len(), 2);
        assert_eq!(scene.attach_calls, 2);
        assert_ne!(displays.quad(1), displays.quad(2));
    }

    #[test]
    fn missing_scene_object_fails_fast() {
        let mut scene = FakeScene::with_players(&[]);
        let mut displays = HeadDisplays::<u32>::new(HeadScreenSettings::default());

        let err = displays.mount(9, "hi", &mut scene).expect_err("no such player");
        assert!(matches!(err, HostError::MissingSceneObject { .. }));
        assert!(!displays.is_mounted(9));
    }
}
