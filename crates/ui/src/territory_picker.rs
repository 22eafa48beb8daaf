//! Territory switcher panel.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use scene::environment::{EnvironmentCache, GenerationState};
use scene::themes::{ActiveTerritory, Territory};

/// One-glyph status indicator for a territory's cache record.
pub fn state_glyph(state: GenerationState) -> &'static str {
    match state {
        GenerationState::Empty => "·",
        GenerationState::Loading => "…",
        GenerationState::Ready => "●",
        GenerationState::Error => "!",
    }
}

pub fn territory_picker_ui(
    mut contexts: EguiContexts,
    cache: Res<EnvironmentCache>,
    mut active: ResMut<ActiveTerritory>,
) {
    egui::Window::new("Territories")
        .resizable(false)
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(12.0, 52.0))
        .show(contexts.ctx_mut(), |ui| {
            for territory in Territory::ALL {
                let glyph = state_glyph(cache.state(territory));
                let selected = active.0 == territory;
                let label = format!("{glyph} {}", territory.style().name);
                if ui.selectable_label(selected, label).clicked() && !selected {
                    active.0 = territory;
                }
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_state_has_a_distinct_glyph() {
        let glyphs = [
            state_glyph(GenerationState::Empty),
            state_glyph(GenerationState::Loading),
            state_glyph(GenerationState::Ready),
            state_glyph(GenerationState::Error),
        ];
        for (i, a) in glyphs.iter().enumerate() {
            for b in glyphs.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
