//! Configuration warnings and context construction errors.

use strata_config::ConfigError;

/// A non-fatal configuration problem. The offending entry is skipped and
/// processing continues.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigWarning {
    /// A source pattern matched no registered content source.
    #[error("source pattern `{pattern}` matched no loaded content source")]
    MissingSource {
        /// The unmatched pattern.
        pattern: String,
    },
    /// A referenced biome is not in the metadata index.
    #[error("unknown biome `{key}` referenced by {referenced_by}")]
    UnknownBiome {
        /// The missing key.
        key: String,
        /// Where the reference came from (e.g. "include", "layer `deep`").
        referenced_by: String,
    },
    /// A biome key failed to parse.
    #[error("invalid biome key `{key}`: {reason}")]
    InvalidKey {
        /// The raw key.
        key: String,
        /// Parse failure.
        reason: String,
    },
    /// A biome was registered more than once; the first registration wins.
    #[error("biome `{key}` registered twice; keeping the first registration")]
    DuplicateBiome {
        /// The duplicated key.
        key: String,
    },
    /// The index ran out of ids.
    #[error("biome index is full; `{key}` was not indexed")]
    IndexFull {
        /// The key that did not fit.
        key: String,
    },
    /// The candidate pool ended up empty; every query will use the fallback biome.
    #[error("candidate pool of dimension `{dimension}` is empty")]
    EmptyPool {
        /// Dimension id.
        dimension: String,
    },
}

/// Errors that prevent a dimension from being registered for generation.
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    /// The metadata index has not been built yet.
    #[error("biome metadata index has not been built")]
    IndexNotBuilt,
    /// The dimension descriptor failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Neither the configured fallback nor any other biome is available.
    #[error("dimension `{dimension}` has no usable fallback biome (index is empty)")]
    NoFallbackBiome {
        /// Dimension id.
        dimension: String,
    },
}
