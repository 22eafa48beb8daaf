//! Domain core of the territory viewer: theme definitions, the entity
//! snapshot boundary, the environment cache with async skybox generation,
//! the coordinate mapper, and the interaction state machine.
//!
//! Nothing in this crate touches the GPU; the `rendering` crate consumes
//! these resources and events.

use bevy::prelude::*;

pub mod clock;
pub mod coords;
pub mod entity;
pub mod environment;
pub mod generator;
pub mod interaction;
pub mod test_harness;
pub mod themes;

/// Present when the 3D render surface is unusable (no GPU context). The scene
/// and render layers never spawn while this exists; the UI layer replaces the
/// experience with a static themed gradient panel. The rest of the application
/// stays usable.
#[derive(Resource, Debug, Clone)]
pub struct SurfaceFatal {
    pub diagnostic: String,
}

/// True when the 3D surface is available. Render systems are gated on this.
pub fn surface_ok(fatal: Option<Res<SurfaceFatal>>) -> bool {
    fatal.is_none()
}

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<environment::EnvironmentCache>()
            .init_resource::<entity::EntitySnapshot>()
            .init_resource::<clock::AnimationClock>()
            .init_resource::<themes::ActiveTerritory>()
            .init_resource::<interaction::HoveredEntity>()
            .add_event::<interaction::EntityClicked>()
            .add_event::<interaction::NavigationEvent>()
            .add_systems(
                Update,
                (
                    clock::advance_clock,
                    environment::request_active_environment,
                    environment::dispatch_generation,
                    environment::poll_generation,
                )
                    .chain()
                    .run_if(surface_ok),
            );
    }
}
