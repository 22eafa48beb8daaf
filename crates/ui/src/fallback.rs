//! Full-screen fallback when the render surface cannot be created.
//!
//! The 3D scene never spawns in that situation; this panel paints a static
//! banded gradient in the active territory's palette with a short diagnostic,
//! so the failure is legible rather than a black window.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use scene::themes::{ActiveTerritory, TerritoryStyle};
use scene::SurfaceFatal;

/// Number of horizontal bands in the stand-in gradient.
const GRADIENT_BANDS: usize = 24;

fn to_egui(color: Color) -> egui::Color32 {
    let srgba = color.to_srgba();
    egui::Color32::from_rgb(
        (srgba.red * 255.0) as u8,
        (srgba.green * 255.0) as u8,
        (srgba.blue * 255.0) as u8,
    )
}

fn lerp_color(a: Color, b: Color, t: f32) -> Color {
    let (a, b) = (a.to_srgba(), b.to_srgba());
    Color::srgb(
        a.red + (b.red - a.red) * t,
        a.green + (b.green - a.green) * t,
        a.blue + (b.blue - a.blue) * t,
    )
}

/// Sky color at a normalized height `t` in `[0, 1]`, top to bottom.
pub fn band_color(style: &TerritoryStyle, t: f32) -> Color {
    if t < 0.5 {
        lerp_color(style.sky_top, style.sky_mid, t * 2.0)
    } else {
        lerp_color(style.sky_mid, style.sky_bottom, (t - 0.5) * 2.0)
    }
}

pub fn fallback_panel_ui(
    mut contexts: EguiContexts,
    fatal: Option<Res<SurfaceFatal>>,
    active: Res<ActiveTerritory>,
) {
    let Some(fatal) = fatal else {
        return;
    };
    let style = active.0.style();

    egui::CentralPanel::default()
        .frame(egui::Frame::NONE)
        .show(contexts.ctx_mut(), |ui| {
            let rect = ui.max_rect();
            let painter = ui.painter();
            let band_height = rect.height() / GRADIENT_BANDS as f32;
            for band in 0..GRADIENT_BANDS {
                let t = band as f32 / (GRADIENT_BANDS - 1) as f32;
                let top = rect.top() + band as f32 * band_height;
                painter.rect_filled(
                    egui::Rect::from_min_max(
                        egui::pos2(rect.left(), top),
                        egui::pos2(rect.right(), top + band_height + 1.0),
                    ),
                    0.0,
                    to_egui(band_color(style, t)),
                );
            }

            ui.vertical_centered(|ui| {
                ui.add_space(rect.height() * 0.4);
                ui.heading(style.name);
                ui.label("3D view unavailable on this device.");
                ui.small(fatal.diagnostic.clone());
            });
        });
}
