//! The panoramic background: one sky dome, one bound texture at a time.
//!
//! The dome shows either the generated equirectangular skybox for the active
//! territory (when its cache record is `Ready`) or the territory's baked
//! gradient. Binding consults only the *active* territory's record, which is
//! the stale-result guard: a generation that resolves after the user moved on
//! stays in the cache and is simply not applied here.
//!
//! Swapping releases the previously bound GPU image. That is a lifecycle
//! contract, not optional cleanup: resident generated-texture count must not
//! grow with theme switches.

use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

use scene::coords::EYE_HEIGHT;
use scene::environment::{EnvironmentCache, GenerationState};
use scene::themes::{ActiveTerritory, Territory};

use crate::gradient::{gradient_pixels, GRADIENT_HEIGHT, GRADIENT_WIDTH};

/// Sky dome radius; comfortably outside the marker shell and parallax planes.
pub const SKY_RADIUS: f32 = 60.0;

/// Marker component on the dome entity.
#[derive(Component)]
pub struct SkyDome;

/// Handle to the dome's material, so the background swap can retexture it.
#[derive(Resource)]
pub struct SkyMaterial(pub Handle<StandardMaterial>);

/// What the dome currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackgroundKind {
    /// Nothing bound yet (before the first sync frame).
    #[default]
    Unbound,
    Gradient,
    Generated,
}

/// Bookkeeping for the one background image the renderer owns.
#[derive(Resource, Default)]
pub struct ActiveBackground {
    pub territory: Option<Territory>,
    pub kind: BackgroundKind,
    /// The bound image asset. Exactly one is alive at a time.
    pub image: Option<Handle<Image>>,
}

/// Build a GPU-uploadable image from a raw RGBA8 buffer.
pub(crate) fn image_from_rgba8(width: u32, height: u32, data: Vec<u8>) -> Image {
    let mut image = Image::new(
        Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
    );
    image.sampler = bevy::image::ImageSampler::linear();
    image
}

/// Spawn the inside-out sky dome. The material starts untextured; the first
/// `sync_background` frame binds the gradient before anything generated can
/// exist, so there is never a blank frame.
pub fn spawn_sky_dome(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let mesh = meshes.add(Sphere::new(SKY_RADIUS).mesh().uv(64, 32));
    let material = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        unlit: true,
        cull_mode: None,
        ..default()
    });

    commands.spawn((
        SkyDome,
        Mesh3d(mesh),
        MeshMaterial3d(material.clone()),
        // Mirror on X so the equirectangular image reads correctly from inside.
        Transform::from_xyz(0.0, EYE_HEIGHT, 0.0).with_scale(Vec3::new(-1.0, 1.0, 1.0)),
    ));
    commands.insert_resource(SkyMaterial(material));
    commands.init_resource::<ActiveBackground>();
}

/// Bind the right background for the active territory, hot-swapping in place.
///
/// Camera orientation and all other scene state are untouched by a swap; only
/// the dome material's texture changes.
pub fn sync_background(
    active: Res<ActiveTerritory>,
    cache: Res<EnvironmentCache>,
    sky: Option<Res<SkyMaterial>>,
    background: Option<ResMut<ActiveBackground>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
) {
    let (Some(sky), Some(mut background)) = (sky, background) else {
        return;
    };

    let territory = active.0;
    let record = cache.record(territory);
    let desired = match (record.state, &record.background) {
        (GenerationState::Ready, Some(_)) => BackgroundKind::Generated,
        _ => BackgroundKind::Gradient,
    };
    if background.territory == Some(territory) && background.kind == desired {
        return;
    }

    let image = match desired {
        BackgroundKind::Generated => {
            // Checked above; Ready records always carry pixels.
            let Some(pixels) = record.background.as_ref() else {
                return;
            };
            image_from_rgba8(pixels.width, pixels.height, pixels.data.clone())
        }
        _ => {
            let style = territory.style();
            image_from_rgba8(
                GRADIENT_WIDTH,
                GRADIENT_HEIGHT,
                gradient_pixels(style, GRADIENT_WIDTH, GRADIENT_HEIGHT),
            )
        }
    };

    let handle = images.add(image);
    if let Some(material) = materials.get_mut(&sky.0) {
        material.base_color_texture = Some(handle.clone());
    }

    // Release the previous image only after the dome references the new one.
    if let Some(old) = background.image.take() {
        images.remove(&old);
    }

    info!("{:?}: background bound ({:?})", territory, desired);
    background.territory = Some(territory);
    background.kind = desired;
    background.image = Some(handle);
}
