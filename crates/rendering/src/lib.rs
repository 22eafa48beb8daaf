//! Render layer of the territory viewer: panoramic camera, sky dome with
//! generated-or-gradient background, parallax planes, entity markers, and the
//! ambient particle field.
//!
//! Everything here is gated on `scene::surface_ok`: when the render surface is
//! declared unusable the 3D scene never spawns and the UI layer presents the
//! static fallback panel instead.

use bevy::prelude::*;

use scene::surface_ok;

pub mod camera;
pub mod gradient;
pub mod markers;
pub mod panorama;
pub mod parallax;
pub mod particles;
pub mod patterns;

pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Startup,
            (camera::setup_camera, setup_lighting, panorama::spawn_sky_dome)
                .run_if(surface_ok),
        )
        .add_systems(
            Update,
            (camera::camera_look_drag, camera::apply_panorama_camera)
                .chain()
                .run_if(surface_ok),
        )
        .add_systems(
            Update,
            (
                panorama::sync_background,
                parallax::sync_parallax_layers,
                parallax::update_parallax_sway,
            )
                .run_if(surface_ok),
        )
        .add_systems(
            Update,
            (
                markers::sync_markers,
                markers::marker_pointer_input.after(camera::camera_look_drag),
                markers::tick_click_pulse,
                markers::animate_markers,
            )
                .chain()
                .run_if(surface_ok),
        )
        .add_systems(
            Update,
            (particles::sync_particle_field, particles::update_particles)
                .chain()
                .run_if(surface_ok),
        );
    }
}

fn setup_lighting(mut commands: Commands) {
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 250.0,
    });
    commands.spawn((
        DirectionalLight {
            illuminance: 6_000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -0.9, 0.4, 0.0)),
    ));
}
