//! Procedural parallax-plane textures.
//!
//! Every pattern is rasterized by a pure function of its config and seed into
//! an RGBA8 buffer, independent of any rendering backend: the same generator
//! backs the GPU planes and the unit tests' pixel assertions.

use bevy::prelude::*;
use fastnoise_lite::{FastNoiseLite, FractalType, NoiseType};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use scene::themes::PatternKind;

/// Convert a bevy color to straight-alpha RGBA8.
pub(crate) fn to_rgba8(color: Color) -> [u8; 4] {
    let srgba = color.to_srgba();
    [
        (srgba.red.clamp(0.0, 1.0) * 255.0) as u8,
        (srgba.green.clamp(0.0, 1.0) * 255.0) as u8,
        (srgba.blue.clamp(0.0, 1.0) * 255.0) as u8,
        (srgba.alpha.clamp(0.0, 1.0) * 255.0) as u8,
    ]
}

/// Rasterize one pattern into a `size` x `size` RGBA8 buffer.
///
/// Deterministic: the same `(pattern, color, seed, size)` always yields the
/// same bytes. Alpha carries the pattern; the plane material's own opacity is
/// applied on top at bind time.
pub fn rasterize_pattern(pattern: PatternKind, color: Color, seed: u64, size: usize) -> Vec<u8> {
    let rgb = to_rgba8(color);
    let mut pixels = vec![[0u8; 4]; size * size];
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    match pattern {
        PatternKind::Starfield => starfield(&mut pixels, size, rgb, &mut rng),
        PatternKind::Mist => mist(&mut pixels, size, rgb, seed),
        PatternKind::Columns => columns(&mut pixels, size, rgb, &mut rng),
        PatternKind::Foliage => foliage(&mut pixels, size, rgb, &mut rng),
        PatternKind::NeonStreaks => neon_streaks(&mut pixels, size, rgb, &mut rng),
        PatternKind::Grid => grid(&mut pixels, size, rgb),
    }

    pixels.into_iter().flatten().collect()
}

/// Write a pixel if the new alpha is stronger than what is already there.
fn blend_max(pixels: &mut [[u8; 4]], size: usize, x: usize, y: usize, rgb: [u8; 4], alpha: u8) {
    if x >= size || y >= size {
        return;
    }
    let px = &mut pixels[y * size + x];
    if alpha > px[3] {
        *px = [rgb[0], rgb[1], rgb[2], alpha];
    }
}

/// Paint a filled disc with a hard edge.
fn paint_disc(
    pixels: &mut [[u8; 4]],
    size: usize,
    cx: f32,
    cy: f32,
    radius: f32,
    rgb: [u8; 4],
    alpha: u8,
) {
    let r2 = radius * radius + 0.5;
    let min_x = ((cx - radius).floor().max(0.0)) as usize;
    let max_x = ((cx + radius).ceil() as usize).min(size.saturating_sub(1));
    let min_y = ((cy - radius).floor().max(0.0)) as usize;
    let max_y = ((cy + radius).ceil() as usize).min(size.saturating_sub(1));

    for py in min_y..=max_y {
        for px in min_x..=max_x {
            let dx = px as f32 - cx;
            let dy = py as f32 - cy;
            if dx * dx + dy * dy <= r2 {
                blend_max(pixels, size, px, py, rgb, alpha);
            }
        }
    }
}

/// Paint an axis-aligned soft ellipse whose alpha falls off toward the rim.
fn paint_soft_ellipse(
    pixels: &mut [[u8; 4]],
    size: usize,
    cx: f32,
    cy: f32,
    rx: f32,
    ry: f32,
    rgb: [u8; 4],
    peak_alpha: u8,
) {
    let min_x = ((cx - rx).floor().max(0.0)) as usize;
    let max_x = ((cx + rx).ceil() as usize).min(size.saturating_sub(1));
    let min_y = ((cy - ry).floor().max(0.0)) as usize;
    let max_y = ((cy + ry).ceil() as usize).min(size.saturating_sub(1));

    for py in min_y..=max_y {
        for px in min_x..=max_x {
            let dx = (px as f32 - cx) / rx;
            let dy = (py as f32 - cy) / ry;
            let d2 = dx * dx + dy * dy;
            if d2 <= 1.0 {
                let falloff = 1.0 - d2.sqrt();
                let alpha = (peak_alpha as f32 * falloff) as u8;
                blend_max(pixels, size, px, py, rgb, alpha);
            }
        }
    }
}

fn paint_rect(
    pixels: &mut [[u8; 4]],
    size: usize,
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
    rgb: [u8; 4],
    alpha: u8,
) {
    for py in y0..y1.min(size) {
        for px in x0..x1.min(size) {
            blend_max(pixels, size, px, py, rgb, alpha);
        }
    }
}

/// Scattered dots of random size and brightness.
fn starfield(pixels: &mut [[u8; 4]], size: usize, rgb: [u8; 4], rng: &mut ChaCha8Rng) {
    let count = (size * size) / 200;
    for _ in 0..count {
        let cx = rng.gen_range(0.0..size as f32);
        let cy = rng.gen_range(0.0..size as f32);
        let radius = rng.gen_range(0.4..1.8);
        let alpha = rng.gen_range(90..=255) as u8;
        paint_disc(pixels, size, cx, cy, radius, rgb, alpha);
    }
}

/// Soft noise-shaped haze.
fn mist(pixels: &mut [[u8; 4]], size: usize, rgb: [u8; 4], seed: u64) {
    let mut noise = FastNoiseLite::with_seed(seed as i32);
    noise.set_noise_type(Some(NoiseType::OpenSimplex2));
    noise.set_frequency(Some(0.012));
    noise.set_fractal_type(Some(FractalType::FBm));
    noise.set_fractal_octaves(Some(4));

    for y in 0..size {
        for x in 0..size {
            // fBm with OpenSimplex2 outputs in [-1, 1]; normalize to [0, 1]
            let v = (noise.get_noise_2d(x as f32, y as f32) + 1.0) * 0.5;
            let alpha = (v * v * 210.0) as u8;
            pixels[y * size + x] = [rgb[0], rgb[1], rgb[2], alpha];
        }
    }
}

/// Vertical pillar silhouettes rising from the bottom edge.
fn columns(pixels: &mut [[u8; 4]], size: usize, rgb: [u8; 4], rng: &mut ChaCha8Rng) {
    let count = rng.gen_range(4..=7);
    for _ in 0..count {
        let width = rng.gen_range(size / 20..size / 9);
        let x0 = rng.gen_range(0..size.saturating_sub(width));
        let height = rng.gen_range((size as f32 * 0.55) as usize..(size as f32 * 0.95) as usize);
        let y0 = size - height;
        paint_rect(pixels, size, x0, y0, x0 + width, size, rgb, 235);
        // Capital: a slightly wider slab at the top of the pillar.
        let cap = width / 4 + 1;
        paint_rect(
            pixels,
            size,
            x0.saturating_sub(cap),
            y0,
            (x0 + width + cap).min(size),
            (y0 + cap * 2).min(size),
            rgb,
            235,
        );
    }
}

/// Organic clusters of overlapping soft ellipses.
fn foliage(pixels: &mut [[u8; 4]], size: usize, rgb: [u8; 4], rng: &mut ChaCha8Rng) {
    let clusters = rng.gen_range(8..=13);
    for _ in 0..clusters {
        let cx = rng.gen_range(0.0..size as f32);
        let cy = rng.gen_range(size as f32 * 0.3..size as f32);
        let blobs = rng.gen_range(6..=12);
        for _ in 0..blobs {
            let ox = rng.gen_range(-(size as f32) / 16.0..size as f32 / 16.0);
            let oy = rng.gen_range(-(size as f32) / 16.0..size as f32 / 16.0);
            let rx = rng.gen_range(size as f32 / 40.0..size as f32 / 14.0);
            let ry = rx * rng.gen_range(0.6..1.2);
            let alpha = rng.gen_range(120..=220) as u8;
            paint_soft_ellipse(pixels, size, cx + ox, cy + oy, rx, ry, rgb, alpha);
        }
    }
}

/// Glowing near-horizontal line segments.
fn neon_streaks(pixels: &mut [[u8; 4]], size: usize, rgb: [u8; 4], rng: &mut ChaCha8Rng) {
    let count = rng.gen_range(10..=16);
    for _ in 0..count {
        let y = rng.gen_range(0.0..size as f32);
        let x0 = rng.gen_range(0.0..size as f32 * 0.75);
        let length = rng.gen_range(size as f32 / 8.0..size as f32 / 2.0);
        let slope = rng.gen_range(-0.08..0.08);
        let glow: f32 = rng.gen_range(2.0..4.5);

        let steps = length as usize;
        for i in 0..steps {
            let px = x0 + i as f32;
            let py = y + i as f32 * slope;
            if px >= size as f32 {
                break;
            }
            // Bright core with a soft vertical falloff around it.
            let reach = glow.ceil() as i32;
            for dy in -reach..=reach {
                let falloff = 1.0 - (dy as f32).abs() / (glow + 1.0);
                if falloff <= 0.0 {
                    continue;
                }
                let alpha = (255.0 * falloff * falloff) as u8;
                let yy = py + dy as f32;
                if yy >= 0.0 {
                    blend_max(pixels, size, px as usize, yy as usize, rgb, alpha);
                }
            }
        }
    }
}

/// Regular line grid.
fn grid(pixels: &mut [[u8; 4]], size: usize, rgb: [u8; 4]) {
    let spacing = (size / 12).max(2);
    for y in 0..size {
        for x in 0..size {
            if x % spacing == 0 || y % spacing == 0 {
                pixels[y * size + x] = [rgb[0], rgb[1], rgb[2], 200];
            }
        }
    }
}
