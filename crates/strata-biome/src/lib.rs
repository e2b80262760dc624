//! Biome placement engine: metadata index, candidate pools, climate fields,
//! organic blob boundaries, climate selection, and vertical layers.

pub mod biome;
pub mod blob;
pub mod climate;
pub mod error;
pub mod layer;
pub mod pool;
pub mod region;
pub mod seed;
pub mod selector;
pub mod source;

pub use biome::{
    BASE_NAMESPACE, BiomeCategory, BiomeId, BiomeKey, BiomeKeyError, BiomeMetadataIndex,
    BiomeRecord, RegisteredBiome,
};
pub use blob::{BlobPartitioner, ChunkPos};
pub use climate::{ClimateField, ClimatePoint};
pub use error::{ConfigWarning, ContextError};
pub use layer::{Layer, LayerPartitioner, LayerZone};
pub use pool::{CandidatePool, PoolBuild, PoolEntry};
pub use region::{ClimateParameters, Parameter, RegionEntry};
pub use selector::{ClimateSelector, MAX_WIDEN_STEPS, WIDEN_FACTOR};
pub use source::{
    BiomeSource, ClimateGridSource, GenerationContext, RegionDistributor, RegionSource,
};
