//! Ambient rain and snow particles.
//!
//! Particles are plain descriptors (position, timing, size); drawing and
//! animating them belongs to whoever renders the page.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Condition labels that produce particles
pub const PRECIPITATING_CONDITIONS: [&str; 4] = ["rain", "drizzle", "thunderstorm", "snow"];

const DENSE_COUNT: usize = 100;
const LIGHT_COUNT: usize = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticleKind {
    Rain,
    Snow,
}

impl ParticleKind {
    /// Style class used by the page
    pub fn class_name(&self) -> &'static str {
        match self {
            Self::Rain => "rain-drop",
            Self::Snow => "snow-flake",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Index within the batch
    pub id: usize,
    /// Horizontal offset, percent of the container width, in [0, 100)
    pub left_percent: f64,
    /// Fall duration in seconds, in [1, 3)
    pub duration_secs: f64,
    /// Start delay in seconds, in [0, 2)
    pub delay_secs: f64,
    /// Width and height in pixels, in [4, 8); snow only
    pub size_px: Option<f64>,
    pub kind: ParticleKind,
}

/// Build a fresh batch of particles for `condition`.
///
/// Returns an empty batch for anything but rain, drizzle, thunderstorm or snow.
pub fn generate<R: Rng + ?Sized>(condition: Option<&str>, rng: &mut R) -> Vec<Particle> {
    let Some(condition) = condition else {
        return Vec::new();
    };
    if !PRECIPITATING_CONDITIONS.contains(&condition) {
        return Vec::new();
    }

    let count = if condition.contains("rain") || condition == "thunderstorm" {
        DENSE_COUNT
    } else {
        LIGHT_COUNT
    };
    let kind = if condition.contains("snow") {
        ParticleKind::Snow
    } else {
        ParticleKind::Rain
    };

    (0..count)
        .map(|id| {
            let left_percent = rng.gen_range(0.0..100.0);
            let duration_secs = rng.gen_range(1.0..3.0);
            let delay_secs = rng.gen_range(0.0..2.0);
            let size_px = match kind {
                ParticleKind::Snow => Some(rng.gen_range(4.0..8.0)),
                ParticleKind::Rain => None,
            };
            Particle {
                id,
                left_percent,
                duration_secs,
                delay_secs,
                size_px,
                kind,
            }
        })
        .collect()
}

/// Particle batch that follows the selected day's condition.
///
/// The batch is rebuilt only when the observed condition changes.
#[derive(Debug, Default)]
pub struct PrecipitationLayer {
    condition: Option<String>,
    particles: Vec<Particle>,
}

impl PrecipitationLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe the current condition; returns true when the batch was rebuilt.
    pub fn observe<R: Rng + ?Sized>(&mut self, condition: Option<&str>, rng: &mut R) -> bool {
        if self.condition.as_deref() == condition {
            return false;
        }
        self.condition = condition.map(str::to_string);
        self.particles = generate(condition, rng);
        tracing::debug!(
            "Precipitation for {:?}: {} particles",
            self.condition,
            self.particles.len()
        );
        true
    }

    pub fn condition(&self) -> Option<&str> {
        self.condition.as_deref()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Nothing to draw
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_no_condition_yields_nothing() {
        assert!(generate(None, &mut rng()).is_empty());
        assert!(generate(Some("clear"), &mut rng()).is_empty());
        assert!(generate(Some("clouds"), &mut rng()).is_empty());
        // Labels are matched exactly, already lower-cased by the selector
        assert!(generate(Some("Rain"), &mut rng()).is_empty());
        assert!(generate(Some("freezing rain"), &mut rng()).is_empty());
    }

    #[test]
    fn test_snow_batch() {
        let particles = generate(Some("snow"), &mut rng());
        assert_eq!(particles.len(), 70);
        for p in &particles {
            assert_eq!(p.kind, ParticleKind::Snow);
            let size = p.size_px.unwrap();
            assert!((4.0..8.0).contains(&size));
        }
    }

    #[test]
    fn test_rain_and_thunderstorm_batches() {
        for condition in ["rain", "thunderstorm"] {
            let particles = generate(Some(condition), &mut rng());
            assert_eq!(particles.len(), 100, "{}", condition);
            assert!(particles
                .iter()
                .all(|p| p.kind == ParticleKind::Rain && p.size_px.is_none()));
        }
    }

    #[test]
    fn test_drizzle_is_light_rain() {
        let particles = generate(Some("drizzle"), &mut rng());
        assert_eq!(particles.len(), 70);
        assert!(particles.iter().all(|p| p.kind == ParticleKind::Rain));
    }

    #[test]
    fn test_values_within_ranges() {
        for p in generate(Some("rain"), &mut rng()) {
            assert!((0.0..100.0).contains(&p.left_percent));
            assert!((1.0..3.0).contains(&p.duration_secs));
            assert!((0.0..2.0).contains(&p.delay_secs));
        }
    }

    #[test]
    fn test_ids_are_sequential() {
        let particles = generate(Some("snow"), &mut rng());
        for (i, p) in particles.iter().enumerate() {
            assert_eq!(p.id, i);
        }
    }

    #[test]
    fn test_regeneration_differs() {
        let mut shared = rng();
        let first = generate(Some("rain"), &mut shared);
        let second = generate(Some("rain"), &mut shared);
        assert_ne!(first, second);
    }

    #[test]
    fn test_same_seed_is_reproducible() {
        assert_eq!(
            generate(Some("snow"), &mut rng()),
            generate(Some("snow"), &mut rng())
        );
    }

    #[test]
    fn test_layer_rebuilds_only_on_change() {
        let mut r = rng();
        let mut layer = PrecipitationLayer::new();
        assert!(layer.is_empty());

        assert!(layer.observe(Some("rain"), &mut r));
        let batch = layer.particles().to_vec();
        assert_eq!(batch.len(), 100);

        assert!(!layer.observe(Some("rain"), &mut r));
        assert_eq!(layer.particles(), batch.as_slice());

        assert!(layer.observe(Some("snow"), &mut r));
        assert_eq!(layer.particles().len(), 70);
        assert_eq!(layer.condition(), Some("snow"));

        assert!(layer.observe(None, &mut r));
        assert!(layer.is_empty());
    }

    #[test]
    fn test_class_names() {
        assert_eq!(ParticleKind::Rain.class_name(), "rain-drop");
        assert_eq!(ParticleKind::Snow.class_name(), "snow-flake");
    }
}
