//! Command-line argument parsing for the Strata tools.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Strata command-line arguments.
///
/// CLI values override settings loaded from `strata.ron`.
#[derive(Parser, Debug)]
#[command(name = "strata", about = "Preview configurable biome placement")]
pub struct CliArgs {
    /// World seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory containing dimension descriptors.
    #[arg(long)]
    pub dimensions: Option<PathBuf>,

    /// RON biome catalog replacing the built-in one.
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Half-width of the preview map in chunks.
    #[arg(long)]
    pub radius: Option<u32>,

    /// Block Y level to sample.
    #[arg(long, allow_negative_numbers = true)]
    pub y: Option<i32>,

    /// Worker threads (0 = one per CPU).
    #[arg(long)]
    pub threads: Option<usize>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write region-mode climate parameters for every dimension into this directory.
    #[arg(long)]
    pub export_region: Option<PathBuf>,
}

impl CliArgs {
    /// Config directory: `--config`, else the platform config dir, else `./strata`.
    pub fn config_dir(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(|| {
            dirs::config_dir()
                .map(|dir| dir.join("strata"))
                .unwrap_or_else(|| PathBuf::from("strata"))
        })
    }
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.world.seed = seed;
        }
        if let Some(ref dir) = args.dimensions {
            self.world.dimensions_dir = dir.clone();
        }
        if let Some(ref catalog) = args.catalog {
            self.world.biome_catalog = Some(catalog.clone());
        }
        if let Some(radius) = args.radius {
            self.preview.radius_chunks = radius;
        }
        if let Some(y) = args.y {
            self.preview.y_level = y;
        }
        if let Some(threads) = args.threads {
            self.preview.threads = threads;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_args() -> CliArgs {
        CliArgs {
            seed: None,
            dimensions: None,
            catalog: None,
            radius: None,
            y: None,
            threads: None,
            log_level: None,
            config: None,
            export_region: None,
        }
    }

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            seed: Some(1234),
            y: Some(-32),
            ..empty_args()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.world.seed, 1234);
        assert_eq!(config.preview.y_level, -32);
        // Non-overridden fields retain defaults
        assert_eq!(config.preview.radius_chunks, 256);
        assert_eq!(config.debug.log_level, "info");
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&empty_args());
        assert_eq!(config, original);
    }

    #[test]
    fn test_parse_negative_y() {
        let args = CliArgs::try_parse_from(["strata", "--y", "-40", "--seed", "9"]).unwrap();
        assert_eq!(args.y, Some(-40));
        assert_eq!(args.seed, Some(9));
    }

    #[test]
    fn test_explicit_config_dir_wins() {
        let args = CliArgs {
            config: Some(PathBuf::from("/tmp/strata-test")),
            ..empty_args()
        };
        assert_eq!(args.config_dir(), PathBuf::from("/tmp/strata-test"));
    }
}
