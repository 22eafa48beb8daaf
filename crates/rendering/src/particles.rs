//! Ambient particle field.
//!
//! A fixed-count point cloud drifting inside a bounded volume around the
//! viewer, under a slowly rotating parent. Particles leaving the bounds are
//! re-seeded to a fresh position inside. Purely decorative.

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use scene::coords::EYE_HEIGHT;
use scene::themes::{ActiveTerritory, ParticleShape};

/// Radius of the bounding volume, in field-local units.
pub const FIELD_RADIUS: f32 = 18.0;

const FIELD_ROTATE_SPEED: f32 = 0.02;

/// Parent entity carrying the whole-field rotation.
#[derive(Component)]
pub struct ParticleField;

#[derive(Component)]
pub struct Particle {
    pub velocity: Vec3,
}

/// Runtime RNG for particle re-seeding, deterministic per territory.
#[derive(Resource)]
pub struct ParticleRng(pub ChaCha8Rng);

fn random_point(rng: &mut ChaCha8Rng) -> Vec3 {
    // Uniform in the sphere: random direction, cube-root radius.
    let dir = Vec3::new(
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
    )
    .normalize_or(Vec3::Y);
    let radius = FIELD_RADIUS * 0.95 * rng.gen_range(0.0f32..1.0).cbrt();
    dir * radius
}

fn particle_mesh(shape: ParticleShape, meshes: &mut Assets<Mesh>) -> Handle<Mesh> {
    match shape {
        ParticleShape::Circle => meshes.add(Sphere::new(1.0).mesh().uv(8, 6)),
        ParticleShape::Square => meshes.add(Cuboid::new(1.6, 1.6, 1.6)),
        ParticleShape::Line => meshes.add(Cuboid::new(0.3, 2.4, 0.3)),
    }
}

/// Rebuild the field when the territory changes.
pub fn sync_particle_field(
    mut commands: Commands,
    active: Res<ActiveTerritory>,
    existing: Query<Entity, With<ParticleField>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !active.is_changed() {
        return;
    }

    for entity in &existing {
        commands.entity(entity).despawn_recursive();
    }

    let config = active.0.style().particles;
    let mut rng = ChaCha8Rng::seed_from_u64(active.0.index() as u64);
    let mesh = particle_mesh(config.shape, &mut meshes);

    let field = commands
        .spawn((
            ParticleField,
            Transform::from_xyz(0.0, EYE_HEIGHT, 0.0),
            Visibility::default(),
        ))
        .id();

    for _ in 0..config.count {
        let position = random_point(&mut rng);
        let direction = Vec3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-0.4..0.4),
            rng.gen_range(-1.0..1.0),
        )
        .normalize_or(Vec3::X);
        let speed = rng.gen_range(config.speed.0..=config.speed.1);
        let size = rng.gen_range(config.size.0..=config.size.1);
        let opacity = rng.gen_range(config.opacity.0..=config.opacity.1);

        let material = materials.add(StandardMaterial {
            base_color: config.color.with_alpha(opacity),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        });

        let child = commands
            .spawn((
                Particle {
                    velocity: direction * speed,
                },
                Mesh3d(mesh.clone()),
                MeshMaterial3d(material),
                Transform::from_translation(position).with_scale(Vec3::splat(size)),
            ))
            .id();
        commands.entity(field).add_child(child);
    }

    commands.insert_resource(ParticleRng(rng));
}

/// Rotate the whole field and drift the particles, re-seeding any that left
/// the bounds.
pub fn update_particles(
    time: Res<Time>,
    rng: Option<ResMut<ParticleRng>>,
    mut fields: Query<&mut Transform, (With<ParticleField>, Without<Particle>)>,
    mut particles: Query<(&Particle, &mut Transform), Without<ParticleField>>,
) {
    let dt = time.delta_secs();
    for mut transform in &mut fields {
        transform.rotate_y(FIELD_ROTATE_SPEED * dt);
    }

    let Some(mut rng) = rng else {
        return;
    };
    for (particle, mut transform) in &mut particles {
        transform.translation += particle.velocity * dt;
        if transform.translation.length() > FIELD_RADIUS {
            transform.translation = random_point(&mut rng.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_points_stay_inside_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..500 {
            let p = random_point(&mut rng);
            assert!(p.length() <= FIELD_RADIUS);
        }
    }

    #[test]
    fn seeding_is_deterministic_per_territory() {
        let mut a = ChaCha8Rng::seed_from_u64(2);
        let mut b = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..20 {
            assert_eq!(random_point(&mut a), random_point(&mut b));
        }
    }
}
