//! Headless integration harness for the environment pipeline.
//!
//! Wraps `bevy::app::App` + `ScenePlugin` with no window or renderer, plus
//! stub skybox generators with call counting, so generation scenarios (races,
//! failures, retries) run as plain `cargo test`.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use bevy::prelude::*;
use futures_lite::future;

use crate::entity::{EntityMarker, EntitySnapshot};
use crate::environment::{EnvironmentCache, GenerationState};
use crate::generator::{GenerationFuture, SkyboxGenerator, SkyboxPixels, SkyboxService};
use crate::themes::{ActiveTerritory, Territory};
use crate::ScenePlugin;

/// What a [`StubGenerator`] resolves to.
#[derive(Clone)]
pub enum StubBehavior {
    /// Resolve immediately with this image.
    Succeed(SkyboxPixels),
    /// Resolve immediately with no image (generation failure).
    Fail,
    /// Panic inside the future, the worst-behaved generator possible.
    Panic,
    /// Stay pending until the gate flips, then resolve with this image.
    GatedSucceed(Arc<AtomicBool>, SkyboxPixels),
}

/// Counting stub for the generator boundary.
pub struct StubGenerator {
    pub behavior: StubBehavior,
    pub calls: Arc<AtomicUsize>,
}

impl StubGenerator {
    pub fn succeeding(pixels: SkyboxPixels) -> Self {
        Self {
            behavior: StubBehavior::Succeed(pixels),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            behavior: StubBehavior::Fail,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn panicking() -> Self {
        Self {
            behavior: StubBehavior::Panic,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Pending until `gate` is set to true, then succeeds.
    pub fn gated(gate: Arc<AtomicBool>, pixels: SkyboxPixels) -> Self {
        Self {
            behavior: StubBehavior::GatedSucceed(gate, pixels),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SkyboxGenerator for StubGenerator {
    fn generate(&self, _descriptor: &str) -> GenerationFuture {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behavior.clone() {
            StubBehavior::Succeed(pixels) => Box::pin(async move { Some(pixels) }),
            StubBehavior::Fail => Box::pin(async { None }),
            StubBehavior::Panic => Box::pin(async { panic!("generator exploded") }),
            StubBehavior::GatedSucceed(gate, pixels) => Box::pin(async move {
                while !gate.load(Ordering::SeqCst) {
                    future::yield_now().await;
                }
                Some(pixels)
            }),
        }
    }
}

/// A headless app wrapping `ScenePlugin` for integration testing.
pub struct TestStage {
    pub app: App,
}

impl Default for TestStage {
    fn default() -> Self {
        Self::new()
    }
}

impl TestStage {
    pub fn new() -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(ScenePlugin);
        Self { app }
    }

    pub fn with_service(mut self, service: SkyboxService) -> Self {
        self.app.insert_resource(service);
        self
    }

    pub fn with_snapshot(mut self, markers: Vec<EntityMarker>) -> Self {
        self.app.insert_resource(EntitySnapshot(markers));
        self
    }

    pub fn set_active(&mut self, territory: Territory) {
        self.app.insert_resource(ActiveTerritory(territory));
    }

    pub fn tick(&mut self) {
        // A real millisecond per tick keeps Time deltas nonzero.
        std::thread::sleep(std::time::Duration::from_millis(1));
        self.app.update();
    }

    pub fn cache(&self) -> &EnvironmentCache {
        self.app.world().resource::<EnvironmentCache>()
    }

    pub fn cache_mut(&mut self) -> Mut<'_, EnvironmentCache> {
        self.app.world_mut().resource_mut::<EnvironmentCache>()
    }

    pub fn state(&self, territory: Territory) -> GenerationState {
        self.cache().state(territory)
    }

    /// Tick until the territory's generation settles (not loading, nothing
    /// in flight). Panics if it never settles; the stub generators always do.
    pub fn settle(&mut self, territory: Territory) -> GenerationState {
        for _ in 0..2000 {
            self.tick();
            let cache = self.cache();
            let state = cache.state(territory);
            if state != GenerationState::Loading && !cache.is_in_flight(territory) {
                return state;
            }
        }
        panic!("generation for {territory:?} never settled");
    }
}
