//! Candidate pools: the ordered set of biomes one dimension may place.
//!
//! Rules apply in a fixed order: base content, source patterns, explicit
//! inclusions, then exclusions. Exclusion is final; nothing re-includes a
//! biome afterwards. Insertion order is preserved so iteration (and therefore
//! every seeded choice over the pool) is reproducible.

use hashbrown::HashSet;
use strata_config::PoolRules;
use tracing::{debug, warn};

use crate::biome::{BASE_NAMESPACE, BiomeId, BiomeKey, BiomeMetadataIndex};
use crate::error::ConfigWarning;

/// One pool member with its relative weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolEntry {
    /// Indexed biome.
    pub id: BiomeId,
    /// Relative weight used by weighted selection (at least 1).
    pub weight: u32,
}

/// Ordered, duplicate-free set of biomes eligible in one dimension.
#[derive(Clone, Debug, Default)]
pub struct CandidatePool {
    dimension: String,
    entries: Vec<PoolEntry>,
    members: HashSet<BiomeId>,
}

/// Result of [`CandidatePool::build`]: the pool plus every warning raised.
#[derive(Debug)]
pub struct PoolBuild {
    /// The constructed pool (possibly empty).
    pub pool: CandidatePool,
    /// Problems found while applying the rules.
    pub warnings: Vec<ConfigWarning>,
}

/// A parsed `include_sources` pattern.
#[derive(Debug, PartialEq, Eq)]
enum SourcePattern {
    /// `name`: exactly that source.
    Exact(String),
    /// `prefix:*` or `prefix*`: every source starting with `prefix` (`*` alone matches all).
    Prefix(String),
}

impl SourcePattern {
    fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if let Some(prefix) = raw.strip_suffix(":*").or_else(|| raw.strip_suffix('*')) {
            SourcePattern::Prefix(prefix.to_string())
        } else {
            SourcePattern::Exact(raw.to_string())
        }
    }

    fn matches(&self, source: &str) -> bool {
        match self {
            SourcePattern::Exact(name) => source == name,
            SourcePattern::Prefix(prefix) => source.starts_with(prefix.as_str()),
        }
    }
}

impl CandidatePool {
    /// Apply `rules` against `index` and build the dimension's pool.
    ///
    /// Never fails: unmatched patterns, unknown ids and an empty result are
    /// reported as warnings (and logged) so the caller can surface them before
    /// generation starts.
    pub fn build(dimension: &str, rules: &PoolRules, index: &BiomeMetadataIndex) -> PoolBuild {
        let mut pool = CandidatePool {
            dimension: dimension.to_string(),
            ..Default::default()
        };
        let mut warnings = Vec::new();

        // 1. Base content.
        if rules.include_base {
            for record in index.iter().filter(|r| r.key.namespace() == BASE_NAMESPACE) {
                pool.insert(record.id, 1);
            }
        }

        // 2. Source patterns.
        for raw in &rules.include_sources {
            let pattern = SourcePattern::parse(raw);
            let mut matched = 0usize;
            for record in index.iter().filter(|r| pattern.matches(&r.source)) {
                pool.insert(record.id, 1);
                matched += 1;
            }
            if matched == 0 {
                warnings.push(ConfigWarning::MissingSource {
                    pattern: raw.clone(),
                });
            }
        }

        // 3. Explicit inclusions.
        for raw in &rules.include {
            if let Some(id) = resolve(index, raw, "include", &mut warnings) {
                pool.insert(id, 1);
            }
        }

        // 4. Exclusions, always last.
        let mut excluded = HashSet::new();
        for raw in &rules.exclude {
            if let Some(id) = resolve(index, raw, "exclude", &mut warnings) {
                excluded.insert(id);
            }
        }
        if !excluded.is_empty() {
            pool.entries.retain(|entry| !excluded.contains(&entry.id));
            pool.members.retain(|id| !excluded.contains(id));
        }

        for (raw, weight) in &rules.weights {
            let Some(id) = resolve(index, raw, "weights", &mut warnings) else {
                continue;
            };
            match pool.entries.iter_mut().find(|entry| entry.id == id) {
                Some(entry) => entry.weight = (*weight).max(1),
                None => debug!(biome = %raw, "Weight given for a biome outside the pool"),
            }
        }

        if pool.is_empty() {
            warnings.push(ConfigWarning::EmptyPool {
                dimension: dimension.to_string(),
            });
        }

        for warning in &warnings {
            warn!(dimension, "{warning}");
        }
        debug!(dimension, biomes = pool.len(), "Candidate pool built");

        PoolBuild { pool, warnings }
    }

    /// Build a pool directly from ids, each with weight 1. Duplicates are ignored.
    pub fn from_ids(dimension: &str, ids: impl IntoIterator<Item = BiomeId>) -> Self {
        let mut pool = CandidatePool {
            dimension: dimension.to_string(),
            ..Default::default()
        };
        for id in ids {
            pool.insert(id, 1);
        }
        pool
    }

    /// Insert `id` unless already present. Returns `true` if it was added.
    fn insert(&mut self, id: BiomeId, weight: u32) -> bool {
        if !self.members.insert(id) {
            return false;
        }
        self.entries.push(PoolEntry {
            id,
            weight: weight.max(1),
        });
        true
    }

    /// Dimension this pool belongs to.
    pub fn dimension(&self) -> &str {
        &self.dimension
    }

    /// Members in insertion order.
    pub fn entries(&self) -> &[PoolEntry] {
        &self.entries
    }

    /// Member ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = BiomeId> + '_ {
        self.entries.iter().map(|entry| entry.id)
    }

    /// Returns `true` if `id` is in the pool.
    pub fn contains(&self, id: BiomeId) -> bool {
        self.members.contains(&id)
    }

    /// Returns the number of members.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the pool has no members.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn resolve(
    index: &BiomeMetadataIndex,
    raw: &str,
    referenced_by: &str,
    warnings: &mut Vec<ConfigWarning>,
) -> Option<BiomeId> {
    let key = match BiomeKey::parse(raw) {
        Ok(key) => key,
        Err(err) => {
            warnings.push(ConfigWarning::InvalidKey {
                key: raw.to_string(),
                reason: err.to_string(),
            });
            return None;
        }
    };
    match index.lookup(&key) {
        Some(record) => Some(record.id),
        None => {
            warnings.push(ConfigWarning::UnknownBiome {
                key: key.to_string(),
                referenced_by: referenced_by.to_string(),
            });
            None
        }
    }
}
