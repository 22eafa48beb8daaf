//! Deterministic vertical-gradient fallback for the skybox.
//!
//! Baked from each territory's fixed 3-stop palette. This is what the dome
//! shows whenever the cache has no generated background (`Empty`, `Loading`,
//! or `Error`), so there is never a blank frame.

use scene::themes::TerritoryStyle;

use crate::patterns::to_rgba8;

/// Gradient texture height. Width stays tiny; the dome stretches it.
pub const GRADIENT_HEIGHT: u32 = 256;
pub const GRADIENT_WIDTH: u32 = 4;

fn lerp_rgba(a: [u8; 4], b: [u8; 4], t: f32) -> [u8; 4] {
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = (a[i] as f32 + (b[i] as f32 - a[i] as f32) * t).round() as u8;
    }
    out
}

/// Bake the 3-stop vertical gradient into an RGBA8 buffer, top row first.
pub fn gradient_pixels(style: &TerritoryStyle, width: u32, height: u32) -> Vec<u8> {
    let top = to_rgba8(style.sky_top);
    let mid = to_rgba8(style.sky_mid);
    let bottom = to_rgba8(style.sky_bottom);

    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        let t = y as f32 / (height - 1).max(1) as f32;
        let row = if t < 0.5 {
            lerp_rgba(top, mid, t * 2.0)
        } else {
            lerp_rgba(mid, bottom, (t - 0.5) * 2.0)
        };
        for _ in 0..width {
            data.extend_from_slice(&row);
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene::themes::Territory;

    #[test]
    fn gradient_matches_palette_stops() {
        for territory in Territory::ALL {
            let style = territory.style();
            let data = gradient_pixels(style, 2, 64);
            assert_eq!(data.len(), 2 * 64 * 4);

            let top = to_rgba8(style.sky_top);
            let bottom = to_rgba8(style.sky_bottom);
            assert_eq!(&data[0..4], &top);
            let last = data.len() - 4;
            assert_eq!(&data[last..], &bottom);
        }
    }

    #[test]
    fn gradient_is_deterministic() {
        let style = Territory::Garden.style();
        assert_eq!(
            gradient_pixels(style, 4, 256),
            gradient_pixels(style, 4, 256)
        );
    }

    #[test]
    fn midpoint_row_matches_mid_stop() {
        let style = Territory::Lobby.style();
        let height = 65u32; // odd height puts a row exactly at t = 0.5
        let data = gradient_pixels(style, 1, height);
        let mid_row = (height / 2) as usize * 4;
        let mid = to_rgba8(style.sky_mid);
        for i in 0..4 {
            let diff = (data[mid_row + i] as i16 - mid[i] as i16).abs();
            assert!(diff <= 2, "channel {i} off by {diff}");
        }
    }
}
