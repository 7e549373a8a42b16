//! Bevy side of the head screen: quad entities, textures and the systems that
//! keep them in sync with player status.
use std::collections::HashMap;

use bevy::asset::RenderAssetUsages;
use bevy::ecs::error::Result;
use bevy::ecs::message::MessageReader;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

use crate::core::errors::HostError;
use crate::host::{Player, PlayerStatus, ScreenUpdate};

use super::display::{HeadDisplays, QuadId, QuadSpec, ScreenHost};
use super::surface::ScreenSurface;

/// Marker on the projected quad, parented to its player.
#[derive(Component, Debug)]
pub struct HeadScreen {
    pub player: Entity,
    pub quad: QuadId,
}

/// All mounted head displays, keyed by player entity.
#[derive(Resource, Debug, Deref, DerefMut)]
pub struct HeadScreenDisplays(pub HeadDisplays<Entity>);

#[derive(Debug)]
struct QuadAssets {
    entity: Entity,
    image: Handle<Image>,
    material: Handle<StandardMaterial>,
    mesh: Handle<Mesh>,
}

/// Render resources owned by each projected quad.
#[derive(Resource, Debug, Default)]
pub struct HeadScreenQuads {
    next: u64,
    by_id: HashMap<QuadId, QuadAssets>,
}

impl HeadScreenQuads {
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Scene access needed to attach, texture and detach quads.
#[derive(SystemParam)]
pub struct HeadScreenScene<'w, 's> {
    commands: Commands<'w, 's>,
    meshes: ResMut<'w, Assets<Mesh>>,
    materials: ResMut<'w, Assets<StandardMaterial>>,
    images: ResMut<'w, Assets<Image>>,
    quads: ResMut<'w, HeadScreenQuads>,
}

impl ScreenHost<Entity> for HeadScreenScene<'_, '_> {
    fn attach_quad(&mut self, player: Entity, spec: &QuadSpec) -> Result<QuadId, HostError> {
        if self.commands.get_entity(player).is_err() {
            return Err(HostError::missing_scene_object(player));
        }

        let image = self.images.add(Image::new_fill(
            Extent3d {
                width: spec.resolution.x,
                height: spec.resolution.y,
                depth_or_array_layers: 1,
            },
            TextureDimension::D2,
            &[0, 0, 0, 0],
            TextureFormat::Rgba8UnormSrgb,
            RenderAssetUsages::default(),
        ));
        let material = self.materials.add(StandardMaterial {
            base_color: Color::WHITE.with_alpha(spec.opacity),
            base_color_texture: Some(image.clone()),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            double_sided: true,
            cull_mode: None,
            ..default()
        });
        let mesh = self.meshes.add(Rectangle::new(spec.size.x, spec.size.y));

        self.quads.next += 1;
        let quad = QuadId(self.quads.next);

        let entity = self
            .commands
            .spawn((
                Mesh3d(mesh.clone()),
                MeshMaterial3d(material.clone()),
                Transform::from_xyz(0.0, spec.offset_y, 0.0)
                    .with_rotation(Quat::from_rotation_y(spec.yaw)),
                HeadScreen { player, quad },
                Name::new("Head Screen"),
            ))
            .id();
        self.commands.entity(player).add_child(entity);

        self.quads.by_id.insert(
            quad,
            QuadAssets {
                entity,
                image,
                material,
                mesh,
            },
        );
        Ok(quad)
    }

    fn upload(&mut self, quad: QuadId, surface: &ScreenSurface) {
        let Some(assets) = self.quads.by_id.get(&quad) else {
            return;
        };
        // Mutable access flags the image as modified, so it is re-uploaded.
        if let Some(image) = self.images.get_mut(&assets.image) {
            image.data = Some(surface.bitmap().to_vec());
        }
    }

    fn detach_quad(&mut self, quad: QuadId) {
        let Some(assets) = self.quads.by_id.remove(&quad) else {
            return;
        };
        // The quad is already gone when its player was despawned recursively.
        if let Ok(mut entity) = self.commands.get_entity(assets.entity) {
            entity.try_despawn();
        }
        self.images.remove(&assets.image);
        self.materials.remove(&assets.material);
        self.meshes.remove(&assets.mesh);
    }
}

/// Mounts a head screen on every newly spawned player. A failed mount does
/// not stop the rest of the batch.
pub fn mount_head_screens(
    mut scene: HeadScreenScene,
    mut displays: ResMut<HeadScreenDisplays>,
    new_players: Query<(Entity, Option<&PlayerStatus>), Added<Player>>,
) -> Result {
    let batch = new_players
        .iter()
        .map(|(player, status)| (player, status.map(PlayerStatus::text).unwrap_or_default()));
    displays.mount_batch(batch, &mut scene)?;
    Ok(())
}

/// Re-renders when a player's status component changes.
pub fn sync_status_changes(
    mut scene: HeadScreenScene,
    mut displays: ResMut<HeadScreenDisplays>,
    changed: Query<(Entity, Ref<PlayerStatus>), Changed<PlayerStatus>>,
) {
    for (player, status) in changed.iter() {
        // Freshly mounted players were already rendered with this text.
        let already_shown = displays.surface(player).map(ScreenSurface::text) == Some(status.text());
        if status.is_added() && already_shown {
            continue;
        }
        displays.update(player, status.text(), &mut scene);
    }
}

/// Re-renders on `ScreenUpdate` messages addressed to a mounted player.
pub fn apply_screen_updates(
    mut scene: HeadScreenScene,
    mut displays: ResMut<HeadScreenDisplays>,
    mut updates: MessageReader<ScreenUpdate>,
) {
    for update in updates.read() {
        if !displays.update(update.player, &update.text, &mut scene) {
            debug!("Ignoring screen update for unmounted {:?}", update.player);
        }
    }
}

/// Unmounts displays whose player lost `Player` or was despawned.
pub fn unmount_head_screens(
    mut scene: HeadScreenScene,
    mut displays: ResMut<HeadScreenDisplays>,
    mut removed: RemovedComponents<Player>,
) {
    for player in removed.read() {
        displays.unmount(player, &mut scene);
    }
}
