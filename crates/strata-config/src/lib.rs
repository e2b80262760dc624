//! Configuration for Strata.
//!
//! Host settings and per-dimension descriptors persist to disk as RON files.
//! Supports CLI overrides via clap, hot-reload detection of host settings,
//! structural validation of dimension descriptors, and forward/backward
//! compatible serialization.

mod cli;
mod config;
mod dimension;
mod error;

pub use cli::CliArgs;
pub use config::{CONFIG_FILE_NAME, Config, DebugConfig, PreviewConfig, WorldConfig};
pub use dimension::{
    Axis, BiomeMode, ClimateGridSettings, ClimatePattern, DimensionConfig, LayerBiomes,
    LayerSpec, LayeredSettings, PoolRules, RegionSettings, WeightedBiome, load_dimensions,
};
pub use error::ConfigError;
