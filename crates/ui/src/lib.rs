use bevy::prelude::*;
use bevy_egui::EguiPlugin;

use scene::surface_ok;

pub mod fallback;
pub mod marker_label;
pub mod navigation;
pub mod status_toast;
pub mod territory_picker;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin)
            .init_resource::<status_toast::ToastDismissed>()
            .add_systems(Update, fallback::fallback_panel_ui)
            .add_systems(
                Update,
                (
                    territory_picker::territory_picker_ui,
                    navigation::navigation_ui,
                    status_toast::status_toast_ui,
                    marker_label::marker_label_ui,
                )
                    .run_if(surface_ok),
            );
    }
}
