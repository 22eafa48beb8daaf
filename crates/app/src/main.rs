use bevy::prelude::*;
use bevy::window::PresentMode;
use bevy::winit::{UpdateMode, WinitSettings};

use scene::entity::{parse_snapshot, EntitySnapshot};
use scene::interaction::{EntityClicked, NavigationEvent};
use scene::SurfaceFatal;

mod skybox_gen;

use skybox_gen::ProceduralSkyboxGenerator;

const DEMO_SNAPSHOT: &str = include_str!("../data/demo_snapshot.json");

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Territory".to_string(),
            resolution: (1280.0, 720.0).into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }),
        ..default()
    }))
    .insert_resource(WinitSettings {
        focused_mode: UpdateMode::reactive_low_power(std::time::Duration::from_millis(16)),
        unfocused_mode: UpdateMode::reactive_low_power(std::time::Duration::from_millis(100)),
    })
    .insert_resource(scene::generator::SkyboxService::new(
        ProceduralSkyboxGenerator,
    ))
    .insert_resource(EntitySnapshot(load_demo_snapshot()))
    .add_plugins((scene::ScenePlugin, rendering::RenderingPlugin, ui::UiPlugin))
    .add_systems(Update, (log_entity_clicks, log_navigation));

    // Hosts that already know the surface cannot be created (headless CI,
    // devices without a usable GPU) force the fallback panel up front.
    if std::env::var("TERRITORY_FORCE_FALLBACK").is_ok() {
        app.insert_resource(SurfaceFatal {
            diagnostic: "render surface disabled by TERRITORY_FORCE_FALLBACK".to_string(),
        });
    }

    app.run();
}

fn load_demo_snapshot() -> Vec<scene::entity::EntityMarker> {
    match parse_snapshot(DEMO_SNAPSHOT) {
        Ok(markers) => markers,
        Err(err) => {
            eprintln!("bundled demo snapshot rejected: {err}");
            Vec::new()
        }
    }
}

fn log_entity_clicks(mut events: EventReader<EntityClicked>) {
    for event in events.read() {
        info!("entity clicked: {}", event.id);
    }
}

fn log_navigation(mut events: EventReader<NavigationEvent>) {
    for event in events.read() {
        match event {
            NavigationEvent::Back => info!("navigation: back"),
            NavigationEvent::EnterNextView => info!("navigation: enter next view"),
        }
    }
}
