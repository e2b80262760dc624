//! Preview binary: builds every configured dimension and prints an ASCII biome map.
//!
//! Configuration is loaded from `strata.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p strata-preview` to render the sample dimensions.
//! Run with `cargo run -p strata-preview -- --seed 7 --radius 128 --y -32` to override.

mod catalog;
mod render;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use strata_biome::{BiomeMetadataIndex, BiomeSource, GenerationContext, RegionEntry, region};
use strata_config::{
    Axis, BiomeMode, CliArgs, ClimateGridSettings, ClimatePattern, Config, DimensionConfig,
    LayerBiomes, LayerSpec, LayeredSettings, PoolRules, RegionSettings, WeightedBiome,
    load_dimensions,
};
use tracing::{error, info, warn};

use crate::render::MapSpec;

fn main() -> ExitCode {
    let args = CliArgs::parse();
    let config_dir = args.config_dir();

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config
        .debug
        .log_dir
        .clone()
        .unwrap_or_else(|| config_dir.join("logs"));
    strata_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    let registered = match &config.world.biome_catalog {
        Some(path) => {
            let path = resolve(&config_dir, path);
            match catalog::load(&path) {
                Ok(biomes) => {
                    info!("Loaded {} biomes from {}", biomes.len(), path.display());
                    biomes
                }
                Err(e) => {
                    error!("Catalog {}: {e}", path.display());
                    return ExitCode::FAILURE;
                }
            }
        }
        None => catalog::builtin(),
    };
    let (index, index_warnings) = BiomeMetadataIndex::from_registered(registered);
    for warning in &index_warnings {
        println!("warning: {warning}");
    }
    let index = Arc::new(index);

    let dimensions_dir = config.dimensions_path(&config_dir);
    if !dimensions_dir.exists() {
        match write_samples(&dimensions_dir) {
            Ok(count) => info!("Wrote {count} sample dimensions to {}", dimensions_dir.display()),
            Err(e) => warn!("Could not write sample dimensions: {e}"),
        }
    }

    let dimensions = match load_dimensions(&dimensions_dir) {
        Ok(dimensions) => dimensions,
        Err(e) => {
            error!("Dimensions directory {}: {e}", dimensions_dir.display());
            return ExitCode::FAILURE;
        }
    };
    if dimensions.is_empty() {
        warn!("No dimension descriptors in {}", dimensions_dir.display());
    }

    let mut failed = 0usize;
    for (path, loaded) in dimensions {
        let dimension = match loaded {
            Ok(dimension) => dimension,
            Err(e) => {
                println!("error: {}: {e}", path.display());
                failed += 1;
                continue;
            }
        };
        let (ctx, warnings) =
            match GenerationContext::from_config(&dimension, Arc::clone(&index), config.world.seed) {
                Ok(built) => built,
                Err(e) => {
                    println!("error: {}: {e}", dimension.id);
                    failed += 1;
                    continue;
                }
            };

        print_header(&dimension, &ctx);
        for warning in &warnings {
            println!("warning: {warning}");
        }
        preview(&ctx, &config);

        if let Some(dir) = &args.export_region {
            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("dimension");
            match export_region(&ctx, &dir.join(format!("{stem}.region.ron"))) {
                Ok(entries) => info!("Exported {entries} region entries for {}", ctx.dimension()),
                Err(e) => error!("Region export for {}: {e}", ctx.dimension()),
            }
        }
    }

    info!("Preview finished; {failed} dimension(s) rejected");
    if failed > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn resolve(config_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        config_dir.join(path)
    }
}

fn print_header(dimension: &DimensionConfig, ctx: &GenerationContext) {
    println!();
    println!("== {} ({}) ==", dimension.display_name, dimension.id);
    if !dimension.description.is_empty() {
        println!("{}", dimension.description);
    }
    let fallback = ctx
        .index()
        .get(ctx.fallback())
        .map(|r| r.key.to_string())
        .unwrap_or_default();
    println!(
        "mode: {}, pool: {} biomes, fallback: {fallback}",
        ctx.source().kind(),
        ctx.pool().len()
    );
}

fn preview(ctx: &GenerationContext, config: &Config) {
    match ctx.source() {
        BiomeSource::Region(source) => {
            println!(
                "{} region entries; placement is left to the host distributor",
                source.entries().len()
            );
            return;
        }
        BiomeSource::Layered(layers) => {
            for layer in layers.layers() {
                let keys: Vec<String> = layer
                    .biomes()
                    .into_iter()
                    .filter_map(|id| ctx.index().get(id).map(|r| r.key.to_string()))
                    .collect();
                let range = layer.y_range();
                let hollow = if layer.is_hollow() { " (hollow)" } else { "" };
                println!(
                    "  [{:>5}, {:>5}) {}{hollow}: {}",
                    range.start,
                    range.end,
                    layer.name(),
                    keys.join(", ")
                );
            }
        }
        BiomeSource::ClimateGrid(_) => {}
    }

    let spec = MapSpec {
        center_chunk_x: 0,
        center_chunk_z: 0,
        radius_chunks: config.preview.radius_chunks,
        chunks_per_cell: config.preview.chunks_per_cell,
        y: config.preview.y_level,
    };
    let map = render::render(ctx, &spec, config.preview.threads);
    let legend = map.legend(ctx.index());
    println!("y = {}, {} chunks per cell", spec.y, spec.chunks_per_cell.max(1));
    print!("{}", map.to_ascii(&legend));
    print!("{}", render::format_legend(&legend, map.cells().len()));
}

fn export_region(ctx: &GenerationContext, path: &Path) -> Result<usize, Box<dyn std::error::Error>> {
    let entries: Vec<RegionEntry> = match ctx.source() {
        BiomeSource::Region(source) => source.entries().to_vec(),
        _ => region::export(ctx.pool(), ctx.index(), 1),
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let pretty = ron::ser::PrettyConfig::new().depth_limit(3);
    std::fs::write(path, ron::ser::to_string_pretty(&entries, pretty)?)?;
    Ok(entries.len())
}

/// Descriptors written on first run so the preview has something to show.
fn samples() -> Vec<(&'static str, DimensionConfig)> {
    let verdant = DimensionConfig {
        id: "strata:verdant_expanse".into(),
        display_name: "Verdant Expanse".into(),
        description: "Wide climate bands, hot in the east, wet in the south.".into(),
        fallback_biome: "minecraft:plains".into(),
        biomes: PoolRules {
            exclude: vec!["minecraft:mushroom_fields".into(), "minecraft:river".into()],
            weights: [("minecraft:forest".to_string(), 3)].into_iter().collect(),
            ..Default::default()
        },
        mode: BiomeMode::ClimateGrid(ClimateGridSettings {
            boundary_chunks: 256,
            min_biome_size_chunks: 8,
            ..Default::default()
        }),
    };

    let ember = DimensionConfig {
        id: "strata:ember_isles".into(),
        display_name: "Ember Isles".into(),
        description: "A scorched core cooling toward frozen rims.".into(),
        fallback_biome: "minecraft:badlands".into(),
        biomes: PoolRules::default(),
        mode: BiomeMode::ClimateGrid(ClimateGridSettings {
            boundary_chunks: 192,
            min_biome_size_chunks: 6,
            blob_irregularity: 0.9,
            pattern: ClimatePattern::Radial,
            temperature_axis: Axis::Z,
            ..Default::default()
        }),
    };

    let layer = |name: &str, y_min: i32, y_max: i32, biomes: LayerBiomes| LayerSpec {
        name: name.into(),
        y_min,
        y_max,
        biomes,
        ..Default::default()
    };
    let underdeep = DimensionConfig {
        id: "strata:underdeep".into(),
        display_name: "Underdeep".into(),
        description: "Stacked caverns beneath a thin crust.".into(),
        fallback_biome: "minecraft:deep_dark".into(),
        biomes: PoolRules::default(),
        mode: BiomeMode::Layered(LayeredSettings {
            layers: vec![
                LayerSpec {
                    fill_percent: 0,
                    floor_thickness: 6,
                    ceiling_thickness: 10,
                    ..layer("abyss", -64, 0, LayerBiomes::Single("minecraft:deep_dark".into()))
                },
                LayerSpec {
                    cave_biome: Some("minecraft:lush_caves".into()),
                    cave_percent: 30,
                    patch_size_chunks: 6,
                    ..layer(
                        "galleries",
                        0,
                        128,
                        LayerBiomes::List(vec![
                            WeightedBiome {
                                biome: "minecraft:dripstone_caves".into(),
                                weight: 3,
                            },
                            WeightedBiome {
                                biome: "minecraft:lush_caves".into(),
                                weight: 1,
                            },
                        ]),
                    )
                },
                layer("crust", 128, 320, LayerBiomes::Single("minecraft:windswept_hills".into())),
            ],
            allow_gaps: false,
        }),
    };

    let frontier = DimensionConfig {
        id: "strata:frontier".into(),
        display_name: "Frontier".into(),
        description: "Vanilla-style regions with the cold biomes removed.".into(),
        fallback_biome: "minecraft:plains".into(),
        biomes: PoolRules {
            exclude: vec![
                "minecraft:snowy_plains".into(),
                "minecraft:ice_spikes".into(),
                "minecraft:snowy_taiga".into(),
                "minecraft:frozen_peaks".into(),
            ],
            ..Default::default()
        },
        mode: BiomeMode::Region(RegionSettings { weight: 10 }),
    };

    vec![
        ("verdant_expanse.ron", verdant),
        ("ember_isles.ron", ember),
        ("underdeep.ron", underdeep),
        ("frontier.ron", frontier),
    ]
}

fn write_samples(dir: &Path) -> Result<usize, strata_config::ConfigError> {
    let samples = samples();
    for (file, dimension) in &samples {
        dimension.save(&dir.join(file))?;
    }
    Ok(samples.len())
}
