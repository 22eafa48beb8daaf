//! The skybox generation service boundary.
//!
//! The generator is an opaque external collaborator: it receives the assembled
//! territory descriptor and eventually produces an equirectangular RGBA buffer,
//! or nothing. The core never retries, never rate-limits, and never inspects
//! why a generation came back empty.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bevy::prelude::*;

/// CPU-side equirectangular RGBA8 buffer produced by a generator.
///
/// Opaque to everything except the panoramic renderer, which uploads it to a
/// GPU image when (and only when) the owning territory is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkyboxPixels {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8, `width * height * 4` bytes.
    pub data: Vec<u8>,
}

impl SkyboxPixels {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), (width * height * 4) as usize);
        Self {
            width,
            height,
            data,
        }
    }

    /// Single-color buffer, handy for tests and placeholder generators.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..width * height {
            data.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            data,
        }
    }
}

/// Future type returned by a generator. Resolving to `None` means "no image
/// produced" and is handled as a generation failure, never as a panic.
pub type GenerationFuture = Pin<Box<dyn Future<Output = Option<SkyboxPixels>> + Send + 'static>>;

/// External skybox generation service.
///
/// Implementations may take arbitrarily long; the cache polls the resulting
/// task without ever blocking a frame on it.
pub trait SkyboxGenerator: Send + Sync + 'static {
    fn generate(&self, descriptor: &str) -> GenerationFuture;
}

/// Injected generator handle. No ambient singleton: call sites receive the
/// service through the ECS, and tests swap in stubs.
#[derive(Resource, Clone)]
pub struct SkyboxService(pub Arc<dyn SkyboxGenerator>);

impl SkyboxService {
    pub fn new(generator: impl SkyboxGenerator) -> Self {
        Self(Arc::new(generator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_buffer_has_expected_size_and_content() {
        let pixels = SkyboxPixels::solid(4, 2, [10, 20, 30, 255]);
        assert_eq!(pixels.data.len(), 4 * 2 * 4);
        assert_eq!(&pixels.data[0..4], &[10, 20, 30, 255]);
        assert_eq!(&pixels.data[28..32], &[10, 20, 30, 255]);
    }
}
