//! Built-in procedural skybox generator.
//!
//! Stands in for a remote image service: given a territory descriptor it
//! synthesizes an equirectangular panorama on a background task. The whole
//! image is a pure function of the descriptor text, so repeated generations
//! for the same territory are pixel-identical.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use fastnoise_lite::{FastNoiseLite, FractalType, NoiseType};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use scene::generator::{GenerationFuture, SkyboxGenerator, SkyboxPixels};

const PANORAMA_WIDTH: u32 = 1024;
const PANORAMA_HEIGHT: u32 = 512;

pub struct ProceduralSkyboxGenerator;

impl SkyboxGenerator for ProceduralSkyboxGenerator {
    fn generate(&self, descriptor: &str) -> GenerationFuture {
        let descriptor = descriptor.trim().to_string();
        Box::pin(async move {
            if descriptor.is_empty() {
                return None;
            }
            Some(render_panorama(&descriptor))
        })
    }
}

fn descriptor_seed(descriptor: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    descriptor.hash(&mut hasher);
    hasher.finish()
}

/// Sky palette derived from the seed: a hue wheel position plus lightness
/// ramps for horizon, mid sky and zenith.
fn palette(seed: u64) -> [[f32; 3]; 3] {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let hue = rng.gen_range(0.0..360.0);
    [
        hsl_to_rgb(hue, 0.45, 0.12),
        hsl_to_rgb((hue + rng.gen_range(10.0..40.0)) % 360.0, 0.5, 0.32),
        hsl_to_rgb((hue + rng.gen_range(40.0..90.0)) % 360.0, 0.55, 0.55),
    ]
}

fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [f32; 3] {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = h / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    [r + m, g + m, b + m]
}

fn lerp3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

fn render_panorama(descriptor: &str) -> SkyboxPixels {
    let seed = descriptor_seed(descriptor);
    let [zenith, mid, horizon] = palette(seed);

    let mut noise = FastNoiseLite::with_seed(seed as i32);
    noise.set_noise_type(Some(NoiseType::OpenSimplex2));
    noise.set_fractal_type(Some(FractalType::FBm));
    noise.set_fractal_octaves(Some(4));
    noise.set_frequency(Some(0.006));

    let mut star_rng = ChaCha8Rng::seed_from_u64(seed ^ 0x5354_4152);

    let mut pixels: Vec<[u8; 4]> =
        Vec::with_capacity((PANORAMA_WIDTH * PANORAMA_HEIGHT) as usize);
    for y in 0..PANORAMA_HEIGHT {
        // 0 at the zenith row, 1 at the bottom edge.
        let v = y as f32 / (PANORAMA_HEIGHT - 1) as f32;
        let base = if v < 0.5 {
            lerp3(zenith, mid, v * 2.0)
        } else {
            lerp3(mid, horizon, (v - 0.5) * 2.0)
        };
        for x in 0..PANORAMA_WIDTH {
            // Sample on a cylinder so the left and right edges of the
            // equirect image meet without a seam.
            let angle = x as f32 / PANORAMA_WIDTH as f32 * std::f32::consts::TAU;
            let nx = angle.cos() * 160.0;
            let nz = angle.sin() * 160.0;
            let cloud = noise.get_noise_3d(nx, y as f32, nz) * 0.5 + 0.5;
            let cloudiness = (cloud - 0.55).max(0.0) * 1.8 * (1.0 - v * 0.6);

            let mut rgb = lerp3(base, [0.92, 0.93, 0.96], cloudiness.min(1.0));

            // Sparse stars in the upper third.
            if v < 0.33 && star_rng.gen_ratio(1, 900) {
                let glint = star_rng.gen_range(0.6..1.0);
                rgb = [glint, glint, glint];
            }

            pixels.push([
                (rgb[0].clamp(0.0, 1.0) * 255.0) as u8,
                (rgb[1].clamp(0.0, 1.0) * 255.0) as u8,
                (rgb[2].clamp(0.0, 1.0) * 255.0) as u8,
                255,
            ]);
        }
    }

    SkyboxPixels::new(
        PANORAMA_WIDTH,
        PANORAMA_HEIGHT,
        pixels.into_iter().flatten().collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_lite::future;

    #[test]
    fn same_descriptor_yields_identical_pixels() {
        let a = render_panorama("hushed velvet lobby at dusk");
        let b = render_panorama("hushed velvet lobby at dusk");
        assert_eq!(a, b);
    }

    #[test]
    fn different_descriptors_diverge() {
        let a = render_panorama("sunlit terraced garden");
        let b = render_panorama("smoky juke joint");
        assert_ne!(a.data, b.data);
    }

    #[test]
    fn blank_descriptor_produces_nothing() {
        let generator = ProceduralSkyboxGenerator;
        assert!(future::block_on(generator.generate("   ")).is_none());
    }

    #[test]
    fn panorama_has_equirect_dimensions() {
        let pixels = render_panorama("editorial atrium");
        assert_eq!(pixels.width, 2 * pixels.height);
        assert_eq!(pixels.data.len(), (pixels.width * pixels.height * 4) as usize);
    }
}
