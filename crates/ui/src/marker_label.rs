//! Hover label overlay for entity markers.
//!
//! When a marker is hovered, a small panel is anchored above it (projected
//! through the camera) showing name, category/layer, a truncated description,
//! the KPI, and an urgent-issue badge when applicable.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use rendering::markers::MarkerVisual;
use scene::entity::EntitySnapshot;
use scene::interaction::HoveredEntity;

/// Longest description shown on the label before truncation.
pub const DESCRIPTION_MAX_CHARS: usize = 110;

/// Truncate on a character boundary with an ellipsis.
pub fn truncate_description(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", cut.trim_end())
}

pub fn marker_label_ui(
    mut contexts: EguiContexts,
    hovered: Res<HoveredEntity>,
    snapshot: Res<EntitySnapshot>,
    markers: Query<(&MarkerVisual, &Transform)>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
) {
    let Some(hovered_id) = hovered.0.as_deref() else {
        return;
    };
    let Some(entity) = snapshot.0.iter().find(|m| m.id == hovered_id) else {
        return;
    };
    let Some((_, marker_transform)) = markers
        .iter()
        .find(|(visual, _)| visual.id == hovered_id)
    else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.get_single() else {
        return;
    };

    // Anchor above the marker; fall back to a corner if the projection fails
    // (marker behind the camera).
    let anchor = camera
        .world_to_viewport(
            camera_transform,
            marker_transform.translation + Vec3::Y * 1.2,
        )
        .map(|p| egui::pos2(p.x, p.y))
        .unwrap_or(egui::pos2(16.0, 16.0));

    egui::Area::new(egui::Id::new("marker-label"))
        .pivot(egui::Align2::CENTER_BOTTOM)
        .fixed_pos(anchor)
        .show(contexts.ctx_mut(), |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.set_max_width(240.0);
                ui.strong(&entity.name);
                ui.label(format!(
                    "{} · {}",
                    entity.category.label(),
                    entity.layer.label()
                ));
                if !entity.description.is_empty() {
                    ui.label(truncate_description(
                        &entity.description,
                        DESCRIPTION_MAX_CHARS,
                    ));
                }
                if !entity.kpi_label.is_empty() {
                    ui.label(format!("{}: {}", entity.kpi_label, entity.kpi_value));
                }
                if entity.has_urgent_issue {
                    ui.colored_label(egui::Color32::from_rgb(242, 66, 54), "⚠ urgent issue");
                }
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_description("hello", 10), "hello");
    }

    #[test]
    fn long_text_is_cut_with_ellipsis() {
        let text = "a".repeat(200);
        let out = truncate_description(&text, 50);
        assert!(out.chars().count() <= 50);
        assert!(out.ends_with('…'));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let text = "é".repeat(80);
        let out = truncate_description(&text, 40);
        assert!(out.ends_with('…'));
        assert!(out.chars().count() <= 40);
    }
}
