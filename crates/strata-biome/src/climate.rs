//! Climate field: maps a chunk position to a continuous (temperature, moisture) point.
//!
//! The base signal is a geographic pattern (axis gradients or a radial falloff)
//! built from triangle waves: values ramp across `[-boundary, +boundary]` and
//! then reverse direction, so the field stays continuous at the boundary
//! instead of clamping or jumping. Seeded simplex fBm is added on top, weighted
//! by `blob_coherence`, to break up straight iso-climate lines.

use glam::DVec2;
use noise::Simplex;
use strata_config::{Axis, ClimateGridSettings, ClimatePattern};

use crate::biome::BiomeRecord;
use crate::seed::{self, det_floor, det_sqrt, fbm_2d, salt};

/// Octaves of the climate noise.
const NOISE_OCTAVES: u32 = 2;

/// A (temperature, moisture) pair, both nominally in `[-1.0, 1.0]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClimatePoint {
    /// Cold (-1) to hot (+1).
    pub temperature: f64,
    /// Dry (-1) to wet (+1).
    pub moisture: f64,
}

impl ClimatePoint {
    /// Creates a climate point.
    pub const fn new(temperature: f64, moisture: f64) -> Self {
        Self {
            temperature,
            moisture,
        }
    }

    /// The climate coordinates of an indexed biome.
    pub fn of(record: &BiomeRecord) -> Self {
        Self::new(record.temperature, record.moisture)
    }

    /// Euclidean distance in climate space. Symmetric, zero for identical points.
    #[inline]
    pub fn distance(self, other: ClimatePoint) -> f64 {
        let dt = self.temperature - other.temperature;
        let dm = self.moisture - other.moisture;
        det_sqrt(dt * dt + dm * dm)
    }
}

/// Triangle wave with period 4: -1 at `u = -1`, +1 at `u = 1`, back to -1 at `u = 3`.
///
/// Continuous everywhere; the slope flips sign at odd integers.
#[inline]
pub fn triangle_wave(u: f64) -> f64 {
    let p = u + 1.0;
    let p = p - 4.0 * det_floor(p / 4.0);
    if p < 2.0 { p - 1.0 } else { 3.0 - p }
}

/// Stateless climate field for one dimension.
pub struct ClimateField {
    temperature_noise: Simplex,
    moisture_noise: Simplex,
    pattern: ClimatePattern,
    temperature_axis: Axis,
    boundary: f64,
    coherence: f64,
    noise_frequency: f64,
    temperature_sign: f64,
    moisture_sign: f64,
}

impl ClimateField {
    /// Create the field for `settings`, seeded from the world seed.
    ///
    /// Temperature and moisture noise use different derived seeds so the two
    /// channels are decorrelated.
    pub fn new(world_seed: u64, settings: &ClimateGridSettings) -> Self {
        let boundary = f64::from(settings.boundary_chunks.max(1));
        let blob = f64::from(settings.min_biome_size_chunks.max(1));
        // At least four blobs wide.
        let noise_scale = (boundary / 4.0).max(blob * 4.0);

        Self {
            temperature_noise: Simplex::new(seed::noise_seed(world_seed, salt::TEMPERATURE)),
            moisture_noise: Simplex::new(seed::noise_seed(world_seed, salt::MOISTURE)),
            pattern: settings.pattern,
            temperature_axis: settings.temperature_axis,
            boundary,
            coherence: settings.blob_coherence.clamp(0.0, 1.0),
            noise_frequency: 1.0 / noise_scale,
            temperature_sign: if settings.invert_temperature { -1.0 } else { 1.0 },
            moisture_sign: if settings.invert_moisture { -1.0 } else { 1.0 },
        }
    }

    /// Climate at a chunk position. Pure and deterministic.
    pub fn climate_at(&self, chunk_x: i32, chunk_z: i32) -> ClimatePoint {
        let p = DVec2::new(f64::from(chunk_x), f64::from(chunk_z));
        let base = self.base_at(p);

        let temperature = base.temperature
            + self.coherence * fbm_2d(&self.temperature_noise, p.x, p.y, self.noise_frequency, NOISE_OCTAVES);
        let moisture = base.moisture
            + self.coherence * fbm_2d(&self.moisture_noise, p.x, p.y, self.noise_frequency, NOISE_OCTAVES);

        ClimatePoint::new(temperature.clamp(-1.0, 1.0), moisture.clamp(-1.0, 1.0))
    }

    /// Noise-free geographic signal.
    pub fn base_at(&self, p: DVec2) -> ClimatePoint {
        let along = |axis: Axis| match axis {
            Axis::X => p.x,
            Axis::Z => p.y,
        };
        let moisture_coord = along(self.temperature_axis.orthogonal());
        let moisture = self.moisture_sign * triangle_wave(moisture_coord / self.boundary);

        let temperature = match self.pattern {
            ClimatePattern::Gradient => {
                triangle_wave(along(self.temperature_axis) / self.boundary)
            }
            // Hot core (+1 at the origin), cooling outward, reversing every 2 * boundary.
            ClimatePattern::Radial => {
                triangle_wave(1.0 - det_sqrt(p.length_squared()) / self.boundary)
            }
        };

        ClimatePoint::new(self.temperature_sign * temperature, moisture)
    }
}
