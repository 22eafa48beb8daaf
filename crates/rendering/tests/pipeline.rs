//! Headless pipeline scenarios for the render layer: fallback-first binding,
//! background hot-swap, texture lifecycle across theme switches, and the
//! urgent marker color override.
//!
//! Runs without a window or GPU: asset stores are plain collections here, so
//! binding and disposal bookkeeping is fully observable.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bevy::asset::AssetPlugin;
use bevy::input::InputPlugin;
use bevy::prelude::*;

use rendering::markers::{MarkerVisual, ALERT_COLOR};
use rendering::panorama::{ActiveBackground, BackgroundKind};
use rendering::camera::PanoramaCamera;
use rendering::RenderingPlugin;
use scene::entity::{EntityCategory, EntityLayer, EntityMarker, EntitySnapshot};
use scene::environment::{EnvironmentCache, GenerationState};
use scene::generator::{SkyboxPixels, SkyboxService};
use scene::test_harness::StubGenerator;
use scene::themes::{ActiveTerritory, Territory};
use scene::ScenePlugin;

fn test_app(service: SkyboxService) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(AssetPlugin::default());
    app.add_plugins(InputPlugin);
    app.init_asset::<Image>();
    app.init_asset::<Mesh>();
    app.init_asset::<StandardMaterial>();
    app.insert_resource(service);
    app.add_plugins(ScenePlugin);
    app.add_plugins(RenderingPlugin);
    app
}

fn tick(app: &mut App) {
    std::thread::sleep(std::time::Duration::from_millis(1));
    app.update();
}

fn settle(app: &mut App, territory: Territory) -> GenerationState {
    for _ in 0..2000 {
        tick(app);
        let cache = app.world().resource::<EnvironmentCache>();
        let state = cache.state(territory);
        if state != GenerationState::Loading && !cache.is_in_flight(territory) {
            return state;
        }
    }
    panic!("generation for {territory:?} never settled");
}

fn test_pixels() -> SkyboxPixels {
    SkyboxPixels::solid(8, 4, [40, 90, 160, 255])
}

fn marker(id: &str, urgent: bool) -> EntityMarker {
    EntityMarker {
        id: id.to_string(),
        name: format!("Entity {id}"),
        category: EntityCategory::Venue,
        layer: EntityLayer::Offer,
        description: "A test entity".to_string(),
        kpi_label: "Revenue".to_string(),
        kpi_value: "12k".to_string(),
        position2d: Vec2::new(50.0, 50.0),
        has_urgent_issue: urgent,
    }
}

#[test]
fn gradient_is_bound_before_any_generated_image() {
    let gate = Arc::new(AtomicBool::new(false));
    let service = SkyboxService::new(StubGenerator::gated(gate, test_pixels()));
    let mut app = test_app(service);

    tick(&mut app);

    // Generation is still pending, yet the dome already has a background.
    let background = app.world().resource::<ActiveBackground>();
    assert_eq!(background.kind, BackgroundKind::Gradient);
    assert_eq!(background.territory, Some(Territory::Lobby));
    assert!(background.image.is_some());
}

#[test]
fn background_hot_swaps_without_resetting_camera() {
    let gate = Arc::new(AtomicBool::new(false));
    let service = SkyboxService::new(StubGenerator::gated(gate.clone(), test_pixels()));
    let mut app = test_app(service);

    app.insert_resource(ActiveTerritory(Territory::Garden));
    tick(&mut app);
    assert_eq!(
        app.world().resource::<ActiveBackground>().kind,
        BackgroundKind::Gradient
    );

    // Look somewhere specific before the swap.
    app.world_mut().resource_mut::<PanoramaCamera>().yaw = 0.8;
    app.world_mut().resource_mut::<PanoramaCamera>().pitch = -0.2;
    tick(&mut app);
    let before: Vec<Transform> = app
        .world_mut()
        .query_filtered::<&Transform, With<Camera3d>>()
        .iter(app.world())
        .cloned()
        .collect();

    gate.store(true, Ordering::SeqCst);
    assert_eq!(settle(&mut app, Territory::Garden), GenerationState::Ready);
    tick(&mut app);

    let background = app.world().resource::<ActiveBackground>();
    assert_eq!(background.kind, BackgroundKind::Generated);

    let after: Vec<Transform> = app
        .world_mut()
        .query_filtered::<&Transform, With<Camera3d>>()
        .iter(app.world())
        .cloned()
        .collect();
    assert_eq!(before, after, "hot swap must not touch the camera");
}

#[test]
fn generation_failure_still_shows_the_territory_gradient() {
    let service = SkyboxService::new(StubGenerator::failing());
    let mut app = test_app(service);

    app.insert_resource(ActiveTerritory(Territory::Editorial));
    assert_eq!(settle(&mut app, Territory::Editorial), GenerationState::Error);
    tick(&mut app);

    let background = app.world().resource::<ActiveBackground>();
    assert_eq!(background.kind, BackgroundKind::Gradient);
    assert_eq!(background.territory, Some(Territory::Editorial));
    assert!(background.image.is_some());
}

#[test]
fn theme_switching_does_not_leak_images() {
    let service = SkyboxService::new(StubGenerator::succeeding(test_pixels()));
    let mut app = test_app(service);

    let mut max_alive = 0;
    for round in 0..3 {
        for territory in Territory::ALL {
            app.insert_resource(ActiveTerritory(territory));
            assert_eq!(settle(&mut app, territory), GenerationState::Ready);
            tick(&mut app);
            let alive = app.world().resource::<Assets<Image>>().len();
            max_alive = max_alive.max(alive);
            // One background plus three parallax plane textures.
            assert!(
                alive <= 4,
                "round {round}, {territory:?}: {alive} images resident"
            );
        }
    }
    assert!(max_alive > 0);
}

#[test]
fn urgent_marker_renders_in_alert_color() {
    let service = SkyboxService::new(StubGenerator::succeeding(test_pixels()));
    let mut app = test_app(service);
    app.insert_resource(EntitySnapshot(vec![
        marker("calm", false),
        marker("alarmed", true),
    ]));

    tick(&mut app);

    let mut found = 0;
    let mut query = app
        .world_mut()
        .query::<(&MarkerVisual, &MeshMaterial3d<StandardMaterial>)>();
    let world = app.world();
    let materials = world.resource::<Assets<StandardMaterial>>();
    for (visual, material) in query.iter(world) {
        let color = materials
            .get(&material.0)
            .expect("marker material exists")
            .base_color;
        if visual.id == "alarmed" {
            assert_eq!(color, ALERT_COLOR);
        } else {
            assert_eq!(color, Territory::Lobby.style().primary);
        }
        found += 1;
    }
    assert_eq!(found, 2);
}

#[test]
fn markers_rebuild_when_snapshot_changes() {
    let service = SkyboxService::new(StubGenerator::succeeding(test_pixels()));
    let mut app = test_app(service);
    app.insert_resource(EntitySnapshot(vec![marker("a", false)]));
    tick(&mut app);

    let count = |app: &mut App| {
        app.world_mut()
            .query::<&MarkerVisual>()
            .iter(app.world())
            .count()
    };
    assert_eq!(count(&mut app), 1);

    app.insert_resource(EntitySnapshot(vec![
        marker("a", false),
        marker("b", false),
        marker("c", true),
    ]));
    tick(&mut app);
    assert_eq!(count(&mut app), 3);
}

#[test]
fn center_marker_sits_ahead_at_eye_height() {
    let service = SkyboxService::new(StubGenerator::succeeding(test_pixels()));
    let mut app = test_app(service);
    app.insert_resource(EntitySnapshot(vec![marker("center", false)]));
    tick(&mut app);

    let mut query = app.world_mut().query::<&MarkerVisual>();
    let visual = query.single(app.world());
    assert!(visual.base_position.x.abs() < 1e-4);
    assert!((visual.base_position.y - scene::coords::EYE_HEIGHT).abs() < 1e-4);
    assert!(visual.base_position.z < 0.0);
}
