//! Navigation chrome: Back and Enter actions.
//!
//! Both are opaque boundary events; what lies behind them belongs to the host
//! application, not this core.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use scene::interaction::NavigationEvent;

pub fn navigation_ui(mut contexts: EguiContexts, mut events: EventWriter<NavigationEvent>) {
    egui::Window::new("nav-back")
        .title_bar(false)
        .resizable(false)
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(12.0, 12.0))
        .show(contexts.ctx_mut(), |ui| {
            if ui.button("← Back").clicked() {
                events.send(NavigationEvent::Back);
            }
        });

    egui::Window::new("nav-enter")
        .title_bar(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -16.0))
        .show(contexts.ctx_mut(), |ui| {
            if ui.button("Enter ▸").clicked() {
                events.send(NavigationEvent::EnterNextView);
            }
        });
}
