//! Multiplane parallax layers.
//!
//! Each territory stages three big semi-transparent planes, far to near, each
//! textured by a deterministic procedural pattern. Depth illusion comes purely
//! from per-layer sway differences: nearer layers drift further on a slower
//! cycle. This is a cosmetic effect, deliberately not camera-derived parallax.

use bevy::prelude::*;

use scene::clock::AnimationClock;
use scene::coords::EYE_HEIGHT;
use scene::themes::ActiveTerritory;

use crate::panorama::image_from_rgba8;
use crate::patterns::rasterize_pattern;

/// Side length of the rasterized pattern textures.
pub const PATTERN_TEXTURE_SIZE: usize = 256;

const BASE_SWAY_FREQ: f32 = 0.22;
const BASE_SWAY_AMP: f32 = 0.55;

/// One parallax plane. Owns its pattern texture; rebuilds dispose it.
#[derive(Component)]
pub struct ParallaxPlane {
    pub layer_index: usize,
    pub base_position: Vec3,
    image: Handle<Image>,
}

/// Sway offset for a layer at a given clock time.
///
/// Frequency is inversely related to the layer index and amplitude directly
/// related, so near layers (higher index) appear to move faster and further.
pub fn sway_offset(clock: f32, layer_index: usize) -> Vec2 {
    let depth_rank = layer_index as f32 + 1.0;
    let freq = BASE_SWAY_FREQ / depth_rank;
    let amp = BASE_SWAY_AMP * depth_rank;
    let phase = layer_index as f32 * 1.7;
    Vec2::new(
        (clock * freq + phase).sin() * amp,
        (clock * freq * 0.8 + phase).cos() * amp * 0.4,
    )
}

/// Rebuild the plane stack when the territory changes; dispose the previous
/// stack's textures first.
pub fn sync_parallax_layers(
    mut commands: Commands,
    active: Res<ActiveTerritory>,
    existing: Query<(Entity, &ParallaxPlane)>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
) {
    if !active.is_changed() {
        return;
    }

    for (entity, plane) in &existing {
        images.remove(&plane.image);
        commands.entity(entity).despawn();
    }

    let style = active.0.style();
    for (layer_index, layer) in style.parallax.iter().enumerate() {
        let seed = (active.0.index() * 16 + layer_index) as u64;
        let bytes = rasterize_pattern(layer.pattern, layer.color, seed, PATTERN_TEXTURE_SIZE);
        let image = images.add(image_from_rgba8(
            PATTERN_TEXTURE_SIZE as u32,
            PATTERN_TEXTURE_SIZE as u32,
            bytes,
        ));

        let material = materials.add(StandardMaterial {
            base_color: Color::srgba(1.0, 1.0, 1.0, layer.opacity),
            base_color_texture: Some(image.clone()),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            cull_mode: None,
            double_sided: true,
            ..default()
        });

        // Farther planes are larger so each fills a similar view fraction.
        let height = layer.depth * 1.1 * layer.scale;
        let mesh = meshes.add(Rectangle::new(height * 2.4, height));

        let base_position = Vec3::new(0.0, EYE_HEIGHT + layer.vertical_offset, -layer.depth);
        commands.spawn((
            ParallaxPlane {
                layer_index,
                base_position,
                image,
            },
            Mesh3d(mesh),
            MeshMaterial3d(material),
            Transform::from_translation(base_position),
        ));
    }
}

/// Drift each plane around its base position.
pub fn update_parallax_sway(
    clock: Res<AnimationClock>,
    mut planes: Query<(&ParallaxPlane, &mut Transform)>,
) {
    for (plane, mut transform) in &mut planes {
        let offset = sway_offset(clock.elapsed, plane.layer_index);
        transform.translation = plane.base_position + Vec3::new(offset.x, offset.y, 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sway_is_deterministic_in_clock_time() {
        for layer in 0..3 {
            assert_eq!(sway_offset(12.5, layer), sway_offset(12.5, layer));
        }
    }

    #[test]
    fn nearer_layers_sway_further() {
        // Peak amplitude over a long sample window grows with layer index.
        let peak = |layer: usize| {
            let mut max = 0.0f32;
            for i in 0..4000 {
                let t = i as f32 * 0.05;
                max = max.max(sway_offset(t, layer).x.abs());
            }
            max
        };
        let far = peak(0);
        let mid = peak(1);
        let near = peak(2);
        assert!(far < mid && mid < near, "{far} {mid} {near}");
    }

    #[test]
    fn nearer_layers_cycle_more_slowly() {
        // Count sign changes of the horizontal sway over a fixed window; a
        // lower count means a lower frequency.
        let crossings = |layer: usize| {
            let mut count = 0;
            let mut last = sway_offset(0.0, layer).x;
            for i in 1..20000 {
                let v = sway_offset(i as f32 * 0.01, layer).x;
                if v.signum() != last.signum() {
                    count += 1;
                }
                last = v;
            }
            count
        };
        assert!(crossings(0) > crossings(1));
        assert!(crossings(1) > crossings(2));
    }
}
