//! Entity markers: one interactive 3D object per snapshot record.
//!
//! Markers idle with a phase-shifted bob and slow rotation, enlarge smoothly
//! on hover, and pulse on click. Hover detection is a cursor ray against each
//! marker's pick sphere; clicking emits `EntityClicked` and nothing else —
//! this layer never mutates entity data.

use bevy::input::mouse::MouseButton;
use bevy::prelude::*;

use scene::clock::AnimationClock;
use scene::coords::{map_to_shell, SHELL_RADIUS};
use scene::entity::{EntityCategory, EntitySnapshot};
use scene::interaction::{EntityClicked, HoveredEntity, InteractionState, CLICK_PULSE_SECS};
use scene::themes::{ActiveTerritory, TerritoryStyle};

use crate::camera::LookDrag;

/// Fixed alert color for markers with an urgent issue. Overrides every other
/// color rule.
pub const ALERT_COLOR: Color = Color::srgb(0.95, 0.26, 0.21);

/// Scale multiplier a hovered marker eases toward.
const HOVER_SCALE: f32 = 1.45;
/// Exponential smoothing rate for the hover scale (per second).
const SCALE_SMOOTHING: f32 = 10.0;

const BOB_FREQ: f32 = 1.1;
const BOB_AMP: f32 = 0.12;
const ROTATE_SPEED: f32 = 0.5;

/// Pick sphere radius in unit-mesh space; world radius scales with the
/// marker's transform.
const PICK_RADIUS: f32 = 0.7;

/// Per-marker render state.
#[derive(Component)]
pub struct MarkerVisual {
    pub id: String,
    pub base_position: Vec3,
    /// Bob phase, derived from the marker's own horizontal coordinate so
    /// markers never move in lockstep.
    pub phase: f32,
    pub base_size: f32,
    pub state: InteractionState,
    /// Clock time at which a click pulse auto-reverts.
    pub pulse_until: f32,
    pub urgent: bool,
}

/// Marker color rule: urgent wins unconditionally, otherwise the territory
/// primary.
pub fn marker_color(style: &TerritoryStyle, urgent: bool) -> Color {
    if urgent {
        ALERT_COLOR
    } else {
        style.primary
    }
}

/// Fixed per-category visual size. Not continuously scaled by any metric.
pub fn category_size(category: EntityCategory) -> f32 {
    match category {
        EntityCategory::Venue => 1.0,
        EntityCategory::Development => 0.9,
        EntityCategory::Experience => 0.75,
        EntityCategory::Brand => 0.7,
        EntityCategory::Program => 0.6,
        EntityCategory::Package => 0.55,
        EntityCategory::Room => 0.5,
    }
}

fn category_mesh(category: EntityCategory, meshes: &mut Assets<Mesh>) -> Handle<Mesh> {
    match category {
        EntityCategory::Venue => meshes.add(Sphere::new(0.5).mesh().uv(24, 16)),
        EntityCategory::Experience => meshes.add(Torus::new(0.18, 0.5)),
        EntityCategory::Brand => meshes.add(Cuboid::new(0.8, 0.8, 0.8)),
        EntityCategory::Development => meshes.add(Cylinder::new(0.45, 0.9)),
        EntityCategory::Package => meshes.add(Cuboid::new(0.7, 0.5, 0.7)),
        EntityCategory::Program => meshes.add(Capsule3d::new(0.3, 0.6)),
        EntityCategory::Room => meshes.add(Cuboid::new(0.9, 0.6, 0.2)),
    }
}

/// Ray/sphere intersection; returns the nearest positive hit distance.
pub fn ray_sphere_hit(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = origin - center;
    let b = oc.dot(direction);
    let c = oc.length_squared() - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    let t = -b - discriminant.sqrt();
    (t > 0.0).then_some(t)
}

/// Rebuild marker entities whenever the snapshot or territory changes.
pub fn sync_markers(
    mut commands: Commands,
    snapshot: Res<EntitySnapshot>,
    active: Res<ActiveTerritory>,
    existing: Query<Entity, With<MarkerVisual>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut hovered: ResMut<HoveredEntity>,
) {
    if !snapshot.is_changed() && !active.is_changed() {
        return;
    }

    for entity in &existing {
        commands.entity(entity).despawn();
    }
    hovered.0 = None;

    let style = active.0.style();
    for marker in &snapshot.0 {
        let base_position = map_to_shell(marker.position2d.x, marker.position2d.y, SHELL_RADIUS);
        let base_size = category_size(marker.category);
        let color = marker_color(style, marker.has_urgent_issue);
        let material = materials.add(StandardMaterial {
            base_color: color,
            perceptual_roughness: 0.6,
            ..default()
        });

        commands.spawn((
            MarkerVisual {
                id: marker.id.clone(),
                base_position,
                phase: marker.position2d.x * 0.12,
                base_size,
                state: InteractionState::default(),
                pulse_until: 0.0,
                urgent: marker.has_urgent_issue,
            },
            Mesh3d(category_mesh(marker.category, &mut meshes)),
            MeshMaterial3d(material),
            Transform::from_translation(base_position).with_scale(Vec3::splat(base_size)),
        ));
    }
}

/// Idle bob and rotation plus smooth hover-scale interpolation.
pub fn animate_markers(
    clock: Res<AnimationClock>,
    time: Res<Time>,
    mut markers: Query<(&MarkerVisual, &mut Transform)>,
) {
    let dt = time.delta_secs();
    let blend = 1.0 - (-SCALE_SMOOTHING * dt).exp();

    for (marker, mut transform) in &mut markers {
        let bob = (clock.elapsed * BOB_FREQ + marker.phase).sin() * BOB_AMP;
        transform.translation = marker.base_position + Vec3::Y * bob;
        transform.rotate_y(ROTATE_SPEED * dt);

        let target = if marker.state.is_enlarged() {
            HOVER_SCALE
        } else {
            1.0
        };
        let current = transform.scale.x / marker.base_size;
        let next = current + (target - current) * blend;
        transform.scale = Vec3::splat(marker.base_size * next);
    }
}

/// Hover and click detection against the cursor ray.
///
/// A release that ended a look-drag never counts as a click, and a click is
/// emitted at most once per release.
#[allow(clippy::too_many_arguments)]
pub fn marker_pointer_input(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    drag: Res<LookDrag>,
    clock: Res<AnimationClock>,
    mut hovered: ResMut<HoveredEntity>,
    mut clicks: EventWriter<EntityClicked>,
    mut markers: Query<(&mut MarkerVisual, &Transform)>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.get_single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        for (mut marker, _) in &mut markers {
            marker.state = marker.state.on_pointer_leave();
        }
        hovered.0 = None;
        return;
    };
    let Ok(ray) = camera.viewport_to_world(camera_transform, cursor) else {
        return;
    };

    // Nearest pick-sphere hit wins.
    let mut best: Option<(f32, String)> = None;
    for (marker, transform) in &markers {
        let radius = PICK_RADIUS * transform.scale.x;
        if let Some(t) =
            ray_sphere_hit(ray.origin, *ray.direction, transform.translation, radius)
        {
            if best.as_ref().is_none_or(|(bt, _)| t < *bt) {
                best = Some((t, marker.id.clone()));
            }
        }
    }
    let best_id = best.map(|(_, id)| id);

    for (mut marker, _) in &mut markers {
        if best_id.as_deref() == Some(marker.id.as_str()) {
            marker.state = marker.state.on_pointer_enter();
        } else {
            marker.state = marker.state.on_pointer_leave();
        }
    }
    hovered.0 = best_id.clone();

    if buttons.just_released(MouseButton::Left) && !drag.is_dragging {
        if let Some(id) = best_id {
            for (mut marker, _) in &mut markers {
                if marker.id == id && marker.state == InteractionState::Hovered {
                    marker.state = marker.state.on_click();
                    marker.pulse_until = clock.elapsed + CLICK_PULSE_SECS;
                    clicks.send(EntityClicked { id: marker.id.clone() });
                }
            }
        }
    }
}

/// Auto-revert click pulses once their timer expires.
pub fn tick_click_pulse(clock: Res<AnimationClock>, mut markers: Query<&mut MarkerVisual>) {
    for mut marker in &mut markers {
        if marker.state == InteractionState::ClickedTransitioning
            && clock.elapsed >= marker.pulse_until
        {
            marker.state = marker.state.on_pulse_elapsed();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene::themes::Territory;

    #[test]
    fn urgent_overrides_every_territory_primary() {
        for territory in Territory::ALL {
            let style = territory.style();
            assert_eq!(marker_color(style, true), ALERT_COLOR);
            assert_eq!(marker_color(style, false), style.primary);
        }
    }

    #[test]
    fn ray_hits_sphere_dead_ahead() {
        let t = ray_sphere_hit(Vec3::ZERO, Vec3::NEG_Z, Vec3::new(0.0, 0.0, -10.0), 1.0);
        assert!((t.unwrap() - 9.0).abs() < 1e-5);
    }

    #[test]
    fn ray_misses_offset_sphere() {
        let t = ray_sphere_hit(Vec3::ZERO, Vec3::NEG_Z, Vec3::new(5.0, 0.0, -10.0), 1.0);
        assert!(t.is_none());
    }

    #[test]
    fn sphere_behind_origin_is_not_hit() {
        let t = ray_sphere_hit(Vec3::ZERO, Vec3::NEG_Z, Vec3::new(0.0, 0.0, 10.0), 1.0);
        assert!(t.is_none());
    }

    #[test]
    fn category_sizes_are_fixed_and_positive() {
        let categories = [
            EntityCategory::Venue,
            EntityCategory::Experience,
            EntityCategory::Brand,
            EntityCategory::Development,
            EntityCategory::Package,
            EntityCategory::Program,
            EntityCategory::Room,
        ];
        for category in categories {
            assert!(category_size(category) > 0.0);
        }
        assert!(category_size(EntityCategory::Venue) > category_size(EntityCategory::Room));
    }
}
