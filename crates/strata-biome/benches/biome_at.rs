use std::sync::Arc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use strata_biome::*;
use strata_config::{
    BiomeMode, ClimateGridSettings, DimensionConfig, LayerBiomes, LayerSpec, LayeredSettings,
    WeightedBiome,
};

fn index() -> Arc<BiomeMetadataIndex> {
    let registered = (0..64).map(|i| {
        let t = -0.5 + 2.5 * f64::from(i % 8) / 7.0;
        let d = f64::from(i / 8) / 7.0;
        RegisteredBiome::new(&format!("minecraft:biome_{i}"), t, d, BiomeCategory::None)
    });
    let (index, _) = BiomeMetadataIndex::from_registered(registered);
    Arc::new(index)
}

fn grid_context() -> GenerationContext {
    let config = DimensionConfig {
        fallback_biome: "minecraft:biome_0".into(),
        mode: BiomeMode::ClimateGrid(ClimateGridSettings::default()),
        ..Default::default()
    };
    GenerationContext::from_config(&config, index(), 42).unwrap().0
}

fn layered_context() -> GenerationContext {
    let list = (0..8)
        .map(|i| WeightedBiome {
            biome: format!("minecraft:biome_{i}"),
            weight: i + 1,
        })
        .collect();
    let config = DimensionConfig {
        fallback_biome: "minecraft:biome_0".into(),
        mode: BiomeMode::Layered(LayeredSettings {
            layers: vec![
                LayerSpec {
                    name: "deep".into(),
                    y_min: -64,
                    y_max: 0,
                    biomes: LayerBiomes::List(list),
                    cave_biome: Some("minecraft:biome_9".into()),
                    cave_percent: 20,
                    ..Default::default()
                },
                LayerSpec {
                    name: "surface".into(),
                    y_min: 0,
                    y_max: 320,
                    biomes: LayerBiomes::Single("minecraft:biome_10".into()),
                    ..Default::default()
                },
            ],
            allow_gaps: false,
        }),
        ..Default::default()
    };
    GenerationContext::from_config(&config, index(), 42).unwrap().0
}

fn bench_climate_grid(c: &mut Criterion) {
    let ctx = grid_context();
    let mut x = 0i32;
    c.bench_function("climate_grid_biome_at", |bencher| {
        bencher.iter(|| {
            x = x.wrapping_add(97);
            black_box(ctx.biome_at(black_box(x), 64, black_box(x / 3)))
        })
    });
}

fn bench_climate_grid_chunk(c: &mut Criterion) {
    let ctx = grid_context();
    c.bench_function("climate_grid_full_chunk_quarts", |bencher| {
        bencher.iter(|| {
            for qx in 0..4 {
                for qz in 0..4 {
                    for qy in -16..80 {
                        black_box(ctx.biome_at_quart(qx, qy, qz));
                    }
                }
            }
        })
    });
}

fn bench_layered(c: &mut Criterion) {
    let ctx = layered_context();
    let mut x = 0i32;
    c.bench_function("layered_biome_at", |bencher| {
        bencher.iter(|| {
            x = x.wrapping_add(31);
            black_box(ctx.biome_at(black_box(x), black_box(-(x & 63)), 17))
        })
    });
}

criterion_group!(benches, bench_climate_grid, bench_climate_grid_chunk, bench_layered);
criterion_main!(benches);
