//! Benchmarks for geometry building and dungeon assembly.

use criterion::{criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use warren::dungeon::{generate_module, DungeonAssembler, DungeonConfig, ModuleKind};
use warren::geom::{Path, Polygon, RoadParams};
use warren::mesh::{Material, MeshBuilder};

fn bench_room_build(c: &mut Criterion) {
    c.bench_function("build_room_16_walls", |b| {
        let mut rng = StdRng::seed_from_u64(42);
        // A fixed irregular ground plan, regenerated builders per iteration.
        let plan = Polygon::random(&mut rng);
        b.iter(|| {
            let mut builder = MeshBuilder::new();
            builder
                .build_room(
                    &plan,
                    3.0,
                    Material::new("floor"),
                    Material::new("wall"),
                    Material::new("ceiling"),
                    0.1,
                    0.2,
                )
                .unwrap();
            builder.apply().unwrap()
        });
    });
}

fn bench_sphere_build(c: &mut Criterion) {
    c.bench_function("build_sphere_32x32", |b| {
        b.iter(|| {
            let mut builder = MeshBuilder::new();
            let submesh = builder.add_submesh(Material::new("stone"));
            builder
                .build_sphere(submesh, nalgebra::Point3::new(0.0, 0.0, 0.0), 5.0, 5.0, 32, 32)
                .unwrap();
            builder.apply().unwrap()
        });
    });
}

fn bench_module_generation(c: &mut Criterion) {
    let config = DungeonConfig::default();
    c.bench_function("generate_corridor", |b| {
        let mut rng = StdRng::seed_from_u64(7);
        b.iter(|| generate_module(ModuleKind::Corridor, &config, &mut rng).unwrap());
    });
    c.bench_function("generate_hall", |b| {
        let mut rng = StdRng::seed_from_u64(7);
        b.iter(|| generate_module(ModuleKind::Hall, &config, &mut rng).unwrap());
    });
}

fn bench_dungeon_assembly(c: &mut Criterion) {
    c.bench_function("assemble_dungeon_25_modules", |b| {
        let config = DungeonConfig { max_modules: 25, ..DungeonConfig::default() };
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(42);
            let mut assembler = DungeonAssembler::new(config.clone());
            assembler.run(&mut rng).unwrap();
            assembler.into_layout()
        });
    });
}

fn bench_road_build(c: &mut Criterion) {
    c.bench_function("build_road_1000_segments", |b| {
        let params = RoadParams::default();
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(13);
            let path = Path::random_walk(&mut rng, &params);
            let mut builder = MeshBuilder::new();
            let submesh = builder.add_submesh(Material::new("asphalt"));
            builder.build_path(submesh, &path, 0.1).unwrap();
            builder.apply().unwrap()
        });
    });
}

criterion_group!(
    benches,
    bench_room_build,
    bench_sphere_build,
    bench_module_generation,
    bench_dungeon_assembly,
    bench_road_build
);
criterion_main!(benches);
