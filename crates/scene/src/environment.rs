//! Per-territory environment cache and async skybox generation dispatch.
//!
//! The cache is the single owner of `EnvironmentRecord` mutation. Everything
//! else reads snapshots. Generation requests are queued through
//! `ensure_generated` and drained by `dispatch_generation`, which spawns one
//! task per territory on the async compute pool; `poll_generation` retires
//! finished tasks without blocking the frame.
//!
//! Binding invariant: at most one generation in flight per territory, enforced
//! by the in-flight set. A `Ready` record is never regenerated automatically;
//! only an explicit `invalidate` re-opens it.

use std::collections::{HashMap, HashSet};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use bevy::prelude::*;
use bevy::tasks::{block_on, AsyncComputeTaskPool, Task};
use futures_lite::{future, FutureExt};

use crate::clock::AnimationClock;
use crate::generator::{SkyboxPixels, SkyboxService};
use crate::themes::{ActiveTerritory, Territory};

/// Lifecycle of one territory's generated background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationState {
    #[default]
    Empty,
    Loading,
    Ready,
    Error,
}

/// Cached environment for one territory. Read-only outside this module.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentRecord {
    pub state: GenerationState,
    /// Present iff `Ready`.
    pub background: Option<Arc<SkyboxPixels>>,
    /// Present iff `Error`.
    pub last_error: Option<String>,
    /// Animation-clock seconds of the last successful generation. Display
    /// only; never used for invalidation.
    pub generated_at: Option<f64>,
}

static EMPTY_RECORD: EnvironmentRecord = EnvironmentRecord {
    state: GenerationState::Empty,
    background: None,
    last_error: None,
    generated_at: None,
};

/// Per-territory environment store.
#[derive(Resource, Default)]
pub struct EnvironmentCache {
    records: HashMap<Territory, EnvironmentRecord>,
    /// Territories with a generation task currently running.
    in_flight: HashSet<Territory>,
    /// Requests accepted by `ensure_generated` but not yet dispatched.
    pending: Vec<(Territory, String)>,
}

impl EnvironmentCache {
    /// Current record for a territory. Total: territories that were never
    /// requested read as `Empty`. Never blocks.
    pub fn record(&self, territory: Territory) -> &EnvironmentRecord {
        self.records.get(&territory).unwrap_or(&EMPTY_RECORD)
    }

    pub fn state(&self, territory: Territory) -> GenerationState {
        self.record(territory).state
    }

    /// Queue a generation request. Fire-and-forget: no-op when the record is
    /// already `Ready`, already `Loading`, or already queued this frame.
    /// Failures surface later as an `Error` record, never to the caller.
    pub fn ensure_generated(&mut self, territory: Territory, descriptor: impl Into<String>) {
        match self.state(territory) {
            GenerationState::Ready | GenerationState::Loading => return,
            GenerationState::Empty | GenerationState::Error => {}
        }
        if self.in_flight.contains(&territory) {
            return;
        }
        if self.pending.iter().any(|(t, _)| *t == territory) {
            return;
        }
        self.pending.push((territory, descriptor.into()));
    }

    /// Explicit reset to `Empty`, the only path that re-opens a `Ready` or
    /// `Error` record for regeneration. A territory whose generation is still
    /// in flight is left alone so the one-in-flight invariant holds.
    pub fn invalidate(&mut self, territory: Territory) {
        if self.in_flight.contains(&territory) {
            return;
        }
        self.pending.retain(|(t, _)| *t != territory);
        self.records.insert(territory, EnvironmentRecord::default());
    }

    pub fn is_in_flight(&self, territory: Territory) -> bool {
        self.in_flight.contains(&territory)
    }

    fn take_pending(&mut self) -> Vec<(Territory, String)> {
        std::mem::take(&mut self.pending)
    }

    fn mark_loading(&mut self, territory: Territory) {
        self.in_flight.insert(territory);
        let record = self.records.entry(territory).or_default();
        record.state = GenerationState::Loading;
        record.last_error = None;
    }

    fn complete(&mut self, territory: Territory, pixels: Arc<SkyboxPixels>, now: f64) {
        self.in_flight.remove(&territory);
        let record = self.records.entry(territory).or_default();
        record.state = GenerationState::Ready;
        record.background = Some(pixels);
        record.last_error = None;
        record.generated_at = Some(now);
    }

    fn fail(&mut self, territory: Territory, diagnostic: impl Into<String>) {
        self.in_flight.remove(&territory);
        let record = self.records.entry(territory).or_default();
        record.state = GenerationState::Error;
        record.background = None;
        record.last_error = Some(diagnostic.into());
    }
}

/// Task entity for one in-flight generation. The territory tag is what the
/// stale-result guard compares against at apply time: results are always
/// cached here, but the renderer only applies them when the territory is
/// still the active one.
#[derive(Component)]
pub struct GeneratingSkybox {
    pub territory: Territory,
    task: Task<Option<SkyboxPixels>>,
}

/// Queue a generation request for the active territory whenever it changes
/// (including the first frame).
pub fn request_active_environment(
    active: Res<ActiveTerritory>,
    mut cache: ResMut<EnvironmentCache>,
) {
    if !active.is_changed() {
        return;
    }
    let style = active.0.style();
    cache.ensure_generated(active.0, style.descriptor());
}

/// Drain queued requests into async tasks, one per territory.
pub fn dispatch_generation(
    mut commands: Commands,
    mut cache: ResMut<EnvironmentCache>,
    service: Option<Res<SkyboxService>>,
) {
    if cache.pending.is_empty() {
        return;
    }
    let Some(service) = service else {
        // No generator wired up; requests stay queued until one appears.
        return;
    };

    let pool = AsyncComputeTaskPool::get();
    for (territory, descriptor) in cache.take_pending() {
        if cache.in_flight.contains(&territory) {
            continue;
        }
        match cache.state(territory) {
            GenerationState::Ready | GenerationState::Loading => continue,
            GenerationState::Empty | GenerationState::Error => {}
        }
        cache.mark_loading(territory);
        // The generator is foreign code; a panic inside its future must read
        // as a failed generation, never crash the app.
        let generate = AssertUnwindSafe(service.0.generate(&descriptor));
        let task = pool.spawn(async move { generate.catch_unwind().await.unwrap_or(None) });
        commands.spawn(GeneratingSkybox { territory, task });
        info!("{:?}: skybox generation started", territory);
    }
}

/// Poll in-flight generation tasks. Non-blocking: unfinished tasks are left
/// for a later frame. A `None` result is a generation failure, handled by
/// falling back to the gradient, never by raising an error.
pub fn poll_generation(
    mut commands: Commands,
    mut cache: ResMut<EnvironmentCache>,
    clock: Res<AnimationClock>,
    mut tasks: Query<(Entity, &mut GeneratingSkybox)>,
) {
    for (entity, mut generating) in &mut tasks {
        let Some(result) = block_on(future::poll_once(&mut generating.task)) else {
            continue;
        };
        let territory = generating.territory;
        match result {
            Some(pixels) => {
                info!(
                    "{:?}: skybox ready ({}x{})",
                    territory, pixels.width, pixels.height
                );
                cache.complete(territory, Arc::new(pixels), clock.elapsed_f64());
            }
            None => {
                warn!("{:?}: skybox generation produced no image", territory);
                cache.fail(territory, "generator produced no image");
            }
        }
        commands.entity(entity).despawn();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_territory_reads_as_empty() {
        let cache = EnvironmentCache::default();
        let record = cache.record(Territory::Garden);
        assert_eq!(record.state, GenerationState::Empty);
        assert!(record.background.is_none());
        assert!(record.last_error.is_none());
    }

    #[test]
    fn ensure_generated_queues_once_per_territory() {
        let mut cache = EnvironmentCache::default();
        cache.ensure_generated(Territory::Lobby, "d");
        cache.ensure_generated(Territory::Lobby, "d");
        cache.ensure_generated(Territory::Garden, "d");
        assert_eq!(cache.pending.len(), 2);
    }

    #[test]
    fn ensure_generated_is_noop_while_loading_or_ready() {
        let mut cache = EnvironmentCache::default();
        cache.mark_loading(Territory::Lobby);
        cache.ensure_generated(Territory::Lobby, "d");
        assert!(cache.pending.is_empty());

        cache.complete(
            Territory::Lobby,
            Arc::new(SkyboxPixels::solid(2, 2, [0, 0, 0, 255])),
            1.0,
        );
        cache.ensure_generated(Territory::Lobby, "d");
        assert!(cache.pending.is_empty());
    }

    #[test]
    fn failure_records_diagnostic_and_allows_retry() {
        let mut cache = EnvironmentCache::default();
        cache.mark_loading(Territory::Editorial);
        cache.fail(Territory::Editorial, "quota exceeded");

        let record = cache.record(Territory::Editorial);
        assert_eq!(record.state, GenerationState::Error);
        assert_eq!(record.last_error.as_deref(), Some("quota exceeded"));

        // Error records accept a new request without an invalidate.
        cache.ensure_generated(Territory::Editorial, "d");
        assert_eq!(cache.pending.len(), 1);
    }

    #[test]
    fn invalidate_resets_ready_record() {
        let mut cache = EnvironmentCache::default();
        cache.mark_loading(Territory::JukeJoint);
        cache.complete(
            Territory::JukeJoint,
            Arc::new(SkyboxPixels::solid(2, 2, [5, 5, 5, 255])),
            2.5,
        );
        assert_eq!(cache.state(Territory::JukeJoint), GenerationState::Ready);

        cache.invalidate(Territory::JukeJoint);
        let record = cache.record(Territory::JukeJoint);
        assert_eq!(record.state, GenerationState::Empty);
        assert!(record.background.is_none());
    }

    #[test]
    fn invalidate_leaves_in_flight_generation_alone() {
        let mut cache = EnvironmentCache::default();
        cache.mark_loading(Territory::Lobby);
        cache.invalidate(Territory::Lobby);
        assert_eq!(cache.state(Territory::Lobby), GenerationState::Loading);
        assert!(cache.is_in_flight(Territory::Lobby));
    }

    #[test]
    fn complete_stamps_generated_at() {
        let mut cache = EnvironmentCache::default();
        cache.mark_loading(Territory::Garden);
        cache.complete(
            Territory::Garden,
            Arc::new(SkyboxPixels::solid(1, 1, [1, 2, 3, 255])),
            42.0,
        );
        assert_eq!(cache.record(Territory::Garden).generated_at, Some(42.0));
    }
}
