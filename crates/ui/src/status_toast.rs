//! Non-blocking generation status indicator.
//!
//! Surfaces an `Error` record for the active territory as a small dismissable
//! toast with a retry action. Never a modal: generation failure leaves the
//! gradient experience fully usable.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use scene::clock::AnimationClock;
use scene::environment::{EnvironmentCache, EnvironmentRecord, GenerationState};
use scene::themes::{ActiveTerritory, Territory};

/// Which territory's error toast the user has dismissed. Cleared when the
/// record changes state again.
#[derive(Resource, Debug, Default)]
pub struct ToastDismissed(pub Option<Territory>);

/// Toast copy for a record, or `None` when nothing should show.
pub fn toast_message(record: &EnvironmentRecord) -> Option<String> {
    match record.state {
        GenerationState::Error => {
            let detail = record
                .last_error
                .as_deref()
                .unwrap_or("generation failed");
            Some(format!("Backdrop unavailable: {detail}"))
        }
        GenerationState::Loading => Some("Conjuring backdrop…".to_string()),
        _ => None,
    }
}

/// Freshness caption for a ready record.
pub fn freshness_caption(record: &EnvironmentRecord, now: f64) -> Option<String> {
    let generated_at = record.generated_at?;
    let age = (now - generated_at).max(0.0) as u64;
    Some(format!("backdrop generated {age}s ago"))
}

pub fn status_toast_ui(
    mut contexts: EguiContexts,
    active: Res<ActiveTerritory>,
    clock: Res<AnimationClock>,
    mut cache: ResMut<EnvironmentCache>,
    mut dismissed: ResMut<ToastDismissed>,
) {
    let territory = active.0;
    // Cloned so the retry handler below can mutate the cache.
    let record = cache.record(territory).clone();

    if record.state != GenerationState::Error {
        // State moved on; a stale dismissal no longer applies.
        if dismissed.0 == Some(territory) {
            dismissed.0 = None;
        }
    }

    let Some(message) = toast_message(&record) else {
        return;
    };
    let is_error = record.state == GenerationState::Error;
    if is_error && dismissed.0 == Some(territory) {
        return;
    }

    let screen = contexts.ctx_mut().screen_rect();
    egui::Window::new("Backdrop")
        .title_bar(false)
        .resizable(false)
        .fixed_pos(egui::pos2(screen.max.x - 280.0, screen.max.y - 96.0))
        .show(contexts.ctx_mut(), |ui| {
            ui.label(&message);
            if let Some(caption) = freshness_caption(&record, clock.elapsed_f64()) {
                ui.small(caption);
            }
            if is_error {
                ui.horizontal(|ui| {
                    if ui.small_button("Retry").clicked() {
                        cache.invalidate(territory);
                        let descriptor = territory.style().descriptor();
                        cache.ensure_generated(territory, descriptor);
                    }
                    if ui.small_button("Dismiss").clicked() {
                        dismissed.0 = Some(territory);
                    }
                });
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_and_empty_records_show_nothing() {
        let record = EnvironmentRecord::default();
        assert!(toast_message(&record).is_none());

        let ready = EnvironmentRecord {
            state: GenerationState::Ready,
            ..Default::default()
        };
        assert!(toast_message(&ready).is_none());
    }

    #[test]
    fn error_record_surfaces_its_diagnostic() {
        let record = EnvironmentRecord {
            state: GenerationState::Error,
            last_error: Some("quota exceeded".to_string()),
            ..Default::default()
        };
        let message = toast_message(&record).unwrap();
        assert!(message.contains("quota exceeded"));
    }

    #[test]
    fn loading_record_shows_progress_copy() {
        let record = EnvironmentRecord {
            state: GenerationState::Loading,
            ..Default::default()
        };
        assert!(toast_message(&record).is_some());
    }

    #[test]
    fn freshness_uses_clock_delta() {
        let record = EnvironmentRecord {
            state: GenerationState::Ready,
            generated_at: Some(10.0),
            ..Default::default()
        };
        assert_eq!(
            freshness_caption(&record, 73.0).unwrap(),
            "backdrop generated 63s ago"
        );
        assert!(freshness_caption(&EnvironmentRecord::default(), 5.0).is_none());
    }
}
