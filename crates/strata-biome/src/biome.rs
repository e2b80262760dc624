//! Biome metadata: namespaced keys, normalized records, and the read-only index.

mod index;
mod key;
mod record;

pub use index::BiomeMetadataIndex;
pub use key::{BASE_NAMESPACE, BiomeKey, BiomeKeyError};
pub use record::{
    BiomeCategory, BiomeId, BiomeRecord, RAW_TEMPERATURE_MAX, RAW_TEMPERATURE_MIN,
    RegisteredBiome, normalize_downfall, normalize_temperature,
};
