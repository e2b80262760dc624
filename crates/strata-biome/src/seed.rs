//! Deterministic seeded generation utilities.
//!
//! Provides stable seed mixing, per-coordinate RNG derivation from a world seed,
//! deterministic math via `libm`, and normalized fBm over `noise` functions.
//!
//! Derived seeds must never change for a given input: existing worlds depend on
//! them, so mixing is a fixed SplitMix64 finalizer rather than a std hasher.

use noise::NoiseFn;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Salts that decorrelate the independent random streams of one world.
pub mod salt {
    /// Weighted biome choice in the climate selector.
    pub const SELECT: u64 = 0x5E1E_C7B1_0E00_0001;
    /// Temperature noise field.
    pub const TEMPERATURE: u64 = 0x7E4D_E8A7_0000_0002;
    /// Moisture noise field.
    pub const MOISTURE: u64 = 0x4015_7E00_0000_0003;
    /// Blob boundary warp along X.
    pub const WARP_X: u64 = 0xB10B_0000_0000_0004;
    /// Blob boundary warp along Z.
    pub const WARP_Z: u64 = 0xB10B_0000_0000_0005;
    /// Layer list-mode index.
    pub const LAYER_LIST: u64 = 0x1A7E_0000_0000_0006;
    /// Layer cave sub-regions.
    pub const CAVE: u64 = 0xCAFE_BABE_0000_0007;
}

// ---------------------------------------------------------------------------
// Seed derivation
// ---------------------------------------------------------------------------

/// SplitMix64 finalizer: a bijective, well-distributed 64-bit mix.
#[inline]
pub fn mix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Derive a u64 seed for a 2D chunk coordinate.
#[inline]
pub fn derive_seed(world_seed: u64, salt: u64, x: i32, z: i32) -> u64 {
    let mut h = mix64(world_seed ^ salt);
    h = mix64(h ^ (x as u32 as u64));
    mix64(h ^ ((z as u32 as u64) << 32))
}

/// Derive a u64 seed for a 3D coordinate.
#[inline]
pub fn derive_seed_3d(world_seed: u64, salt: u64, x: i32, y: i32, z: i32) -> u64 {
    mix64(derive_seed(world_seed, salt, x, z) ^ (y as u32 as u64))
}

/// Seed for a `noise` generator, which takes 32 bits.
#[inline]
pub fn noise_seed(world_seed: u64, salt: u64) -> u32 {
    (mix64(world_seed ^ salt) >> 32) as u32
}

/// Derive a deterministic RNG for a chunk coordinate.
///
/// The returned RNG produces an identical sequence for the same
/// `(world_seed, salt, x, z)`, regardless of thread or platform.
pub fn coord_rng(world_seed: u64, salt: u64, x: i32, z: i32) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(derive_seed(world_seed, salt, x, z))
}

// ---------------------------------------------------------------------------
// Deterministic math (libm)
// ---------------------------------------------------------------------------

/// Deterministic sqrt using libm (not platform libc).
#[inline]
pub fn det_sqrt(x: f64) -> f64 {
    libm::sqrt(x)
}

/// Deterministic floor using libm.
#[inline]
pub fn det_floor(x: f64) -> f64 {
    libm::floor(x)
}

// ---------------------------------------------------------------------------
// Fractal noise
// ---------------------------------------------------------------------------

/// Normalized 2D fBm: each octave doubles frequency and halves amplitude.
///
/// Output stays within the range of the underlying noise (roughly `[-1, 1]`).
pub fn fbm_2d(noise: &impl NoiseFn<f64, 2>, x: f64, z: f64, frequency: f64, octaves: u32) -> f64 {
    let mut total = 0.0;
    let mut freq = frequency;
    let mut amplitude = 1.0;
    let mut max_amplitude = 0.0;

    for _ in 0..octaves.max(1) {
        total += noise.get([x * freq, z * freq]) * amplitude;
        max_amplitude += amplitude;
        freq *= 2.0;
        amplitude *= 0.5;
    }

    total / max_amplitude
}

/// Normalized 3D fBm, same octave scheme as [`fbm_2d`].
pub fn fbm_3d(noise: &impl NoiseFn<f64, 3>, p: [f64; 3], frequency: f64, octaves: u32) -> f64 {
    let mut total = 0.0;
    let mut freq = frequency;
    let mut amplitude = 1.0;
    let mut max_amplitude = 0.0;

    for _ in 0..octaves.max(1) {
        total += noise.get([p[0] * freq, p[1] * freq, p[2] * freq]) * amplitude;
        max_amplitude += amplitude;
        freq *= 2.0;
        amplitude *= 0.5;
    }

    total / max_amplitude
}
