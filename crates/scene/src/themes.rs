//! Territory definitions: the closed set of visual themes and their static styling.
//!
//! A territory bundles everything the render layer needs to dress a scene:
//! the 3-stop gradient palette used as the skybox fallback, the primary marker
//! color, the parallax layer stack, the particle field config, and the prose
//! fragments that are assembled into the skybox generation descriptor.

use bevy::prelude::*;

/// The visual theme the user is currently inside.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveTerritory(pub Territory);

impl Default for ActiveTerritory {
    fn default() -> Self {
        Self(Territory::Lobby)
    }
}

/// One of the fixed set of territories the user can enter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Territory {
    Lobby,
    Garden,
    JukeJoint,
    Editorial,
}

impl Territory {
    pub const ALL: [Territory; 4] = [
        Territory::Lobby,
        Territory::Garden,
        Territory::JukeJoint,
        Territory::Editorial,
    ];

    /// Stable small index, used for deterministic seeding of procedural art.
    pub fn index(self) -> usize {
        match self {
            Territory::Lobby => 0,
            Territory::Garden => 1,
            Territory::JukeJoint => 2,
            Territory::Editorial => 3,
        }
    }

    pub fn style(self) -> &'static TerritoryStyle {
        match self {
            Territory::Lobby => &LOBBY,
            Territory::Garden => &GARDEN,
            Territory::JukeJoint => &JUKE_JOINT,
            Territory::Editorial => &EDITORIAL,
        }
    }
}

/// Procedural texture family for a parallax plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    Starfield,
    Mist,
    Columns,
    Foliage,
    NeonStreaks,
    Grid,
}

/// One semi-transparent plane in the multiplane parallax stack.
///
/// Layers are listed far-to-near. `depth` is the distance in front of the
/// viewer along -Z; it is a cosmetic staging distance, not a camera-derived
/// value (the sway animation fakes parallax, see `rendering::parallax`).
#[derive(Debug, Clone, Copy)]
pub struct ParallaxLayerConfig {
    pub depth: f32,
    pub opacity: f32,
    pub color: Color,
    pub pattern: PatternKind,
    pub scale: f32,
    pub vertical_offset: f32,
}

/// Shape rendered for each ambient particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleShape {
    Circle,
    Square,
    Line,
}

/// Ambient particle field parameters for one territory.
#[derive(Debug, Clone, Copy)]
pub struct ParticleFieldConfig {
    pub count: usize,
    pub color: Color,
    /// Min/max particle radius in world units.
    pub size: (f32, f32),
    /// Min/max drift speed in world units per second.
    pub speed: (f32, f32),
    pub opacity: (f32, f32),
    pub shape: ParticleShape,
}

/// Everything static about one territory's look.
pub struct TerritoryStyle {
    pub name: &'static str,
    /// Overall ambience line fed into the generation descriptor.
    pub ambience: &'static str,
    /// Entity-backdrop line fed into the generation descriptor.
    pub backdrop: &'static str,
    /// Mood/lighting line fed into the generation descriptor.
    pub mood: &'static str,
    /// 3-stop vertical gradient used whenever no generated skybox is bound.
    pub sky_top: Color,
    pub sky_mid: Color,
    pub sky_bottom: Color,
    /// Default marker color (overridden by the urgent alert color).
    pub primary: Color,
    /// Parallax stack, ordered far-to-near.
    pub parallax: [ParallaxLayerConfig; 3],
    pub particles: ParticleFieldConfig,
}

impl TerritoryStyle {
    /// Assemble the prompt string handed opaquely to the skybox generator.
    pub fn descriptor(&self) -> String {
        format!("{} {} {}", self.ambience, self.backdrop, self.mood)
    }
}

static LOBBY: TerritoryStyle = TerritoryStyle {
    name: "Lobby",
    ambience: "A grand art-deco hotel lobby opening onto a dusk skyline,",
    backdrop: "brass fixtures and marble columns receding into warm haze,",
    mood: "amber lamplight, unhurried, quietly expensive.",
    sky_top: Color::srgb(0.10, 0.08, 0.16),
    sky_mid: Color::srgb(0.45, 0.26, 0.22),
    sky_bottom: Color::srgb(0.82, 0.58, 0.34),
    primary: Color::srgb(0.92, 0.76, 0.42),
    parallax: [
        ParallaxLayerConfig {
            depth: 42.0,
            opacity: 0.55,
            color: Color::srgb(0.95, 0.86, 0.62),
            pattern: PatternKind::Starfield,
            scale: 1.6,
            vertical_offset: 6.0,
        },
        ParallaxLayerConfig {
            depth: 32.0,
            opacity: 0.35,
            color: Color::srgb(0.55, 0.38, 0.28),
            pattern: PatternKind::Columns,
            scale: 1.2,
            vertical_offset: -1.0,
        },
        ParallaxLayerConfig {
            depth: 24.0,
            opacity: 0.28,
            color: Color::srgb(0.85, 0.62, 0.40),
            pattern: PatternKind::Mist,
            scale: 1.0,
            vertical_offset: -3.0,
        },
    ],
    particles: ParticleFieldConfig {
        count: 90,
        color: Color::srgb(0.98, 0.85, 0.55),
        size: (0.03, 0.09),
        speed: (0.05, 0.25),
        opacity: (0.2, 0.7),
        shape: ParticleShape::Circle,
    },
};

static GARDEN: TerritoryStyle = TerritoryStyle {
    name: "Garden",
    ambience: "A terraced night garden under a deep indigo sky,",
    backdrop: "lantern-lit hedges and flowering arbors framing each exhibit,",
    mood: "cool moonlight with pockets of firefly glow, serene.",
    sky_top: Color::srgb(0.04, 0.09, 0.16),
    sky_mid: Color::srgb(0.08, 0.26, 0.24),
    sky_bottom: Color::srgb(0.16, 0.42, 0.28),
    primary: Color::srgb(0.55, 0.88, 0.58),
    parallax: [
        ParallaxLayerConfig {
            depth: 42.0,
            opacity: 0.6,
            color: Color::srgb(0.80, 0.92, 0.85),
            pattern: PatternKind::Starfield,
            scale: 1.5,
            vertical_offset: 7.0,
        },
        ParallaxLayerConfig {
            depth: 30.0,
            opacity: 0.4,
            color: Color::srgb(0.12, 0.35, 0.20),
            pattern: PatternKind::Foliage,
            scale: 1.3,
            vertical_offset: -2.0,
        },
        ParallaxLayerConfig {
            depth: 22.0,
            opacity: 0.30,
            color: Color::srgb(0.30, 0.60, 0.42),
            pattern: PatternKind::Foliage,
            scale: 0.9,
            vertical_offset: -4.0,
        },
    ],
    particles: ParticleFieldConfig {
        count: 120,
        color: Color::srgb(0.75, 0.95, 0.55),
        size: (0.02, 0.07),
        speed: (0.08, 0.3),
        opacity: (0.25, 0.8),
        shape: ParticleShape::Circle,
    },
};

static JUKE_JOINT: TerritoryStyle = TerritoryStyle {
    name: "Juke Joint",
    ambience: "A neon-soaked roadhouse strip after midnight,",
    backdrop: "humming signage and rain-slick asphalt behind every stage,",
    mood: "electric magenta and cyan, loud, alive.",
    sky_top: Color::srgb(0.05, 0.02, 0.10),
    sky_mid: Color::srgb(0.28, 0.06, 0.30),
    sky_bottom: Color::srgb(0.60, 0.12, 0.36),
    primary: Color::srgb(0.98, 0.35, 0.75),
    parallax: [
        ParallaxLayerConfig {
            depth: 44.0,
            opacity: 0.5,
            color: Color::srgb(0.70, 0.85, 1.0),
            pattern: PatternKind::Starfield,
            scale: 1.7,
            vertical_offset: 5.0,
        },
        ParallaxLayerConfig {
            depth: 30.0,
            opacity: 0.45,
            color: Color::srgb(0.20, 0.85, 0.95),
            pattern: PatternKind::NeonStreaks,
            scale: 1.2,
            vertical_offset: 0.0,
        },
        ParallaxLayerConfig {
            depth: 21.0,
            opacity: 0.40,
            color: Color::srgb(1.0, 0.30, 0.70),
            pattern: PatternKind::NeonStreaks,
            scale: 0.8,
            vertical_offset: -2.0,
        },
    ],
    particles: ParticleFieldConfig {
        count: 140,
        color: Color::srgb(0.95, 0.45, 0.90),
        size: (0.02, 0.06),
        speed: (0.15, 0.5),
        opacity: (0.3, 0.9),
        shape: ParticleShape::Square,
    },
};

static EDITORIAL: TerritoryStyle = TerritoryStyle {
    name: "Editorial",
    ambience: "A stark white gallery loft at golden hour,",
    backdrop: "clean plinths and oversize typography on distant walls,",
    mood: "directional daylight, precise, architectural.",
    sky_top: Color::srgb(0.78, 0.82, 0.88),
    sky_mid: Color::srgb(0.92, 0.90, 0.86),
    sky_bottom: Color::srgb(0.97, 0.93, 0.84),
    primary: Color::srgb(0.20, 0.24, 0.30),
    parallax: [
        ParallaxLayerConfig {
            depth: 40.0,
            opacity: 0.30,
            color: Color::srgb(0.55, 0.60, 0.68),
            pattern: PatternKind::Grid,
            scale: 1.8,
            vertical_offset: 4.0,
        },
        ParallaxLayerConfig {
            depth: 30.0,
            opacity: 0.25,
            color: Color::srgb(0.40, 0.44, 0.52),
            pattern: PatternKind::Grid,
            scale: 1.1,
            vertical_offset: 0.0,
        },
        ParallaxLayerConfig {
            depth: 22.0,
            opacity: 0.20,
            color: Color::srgb(0.85, 0.80, 0.70),
            pattern: PatternKind::Mist,
            scale: 0.9,
            vertical_offset: -3.0,
        },
    ],
    particles: ParticleFieldConfig {
        count: 60,
        color: Color::srgb(0.75, 0.72, 0.65),
        size: (0.015, 0.05),
        speed: (0.03, 0.15),
        opacity: (0.15, 0.5),
        shape: ParticleShape::Line,
    },
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_territory_has_a_style() {
        for territory in Territory::ALL {
            let style = territory.style();
            assert!(!style.name.is_empty());
            assert_eq!(style.parallax.len(), 3);
            assert!(style.particles.count > 0);
        }
    }

    #[test]
    fn parallax_layers_are_ordered_far_to_near() {
        for territory in Territory::ALL {
            let layers = &territory.style().parallax;
            assert!(layers[0].depth > layers[1].depth);
            assert!(layers[1].depth > layers[2].depth);
        }
    }

    #[test]
    fn descriptor_combines_all_three_fragments() {
        for territory in Territory::ALL {
            let style = territory.style();
            let descriptor = style.descriptor();
            assert!(descriptor.contains(style.ambience));
            assert!(descriptor.contains(style.backdrop));
            assert!(descriptor.contains(style.mood));
        }
    }

    #[test]
    fn territory_indices_are_distinct() {
        for a in Territory::ALL {
            for b in Territory::ALL {
                if a != b {
                    assert_ne!(a.index(), b.index());
                }
            }
        }
    }
}
