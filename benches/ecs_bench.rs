#![allow(dead_code)]
//! Benchmarks for core ECS operations
//!
//! Run with: cargo bench
//!
//! This benchmark suite measures:
//! - Entity spawning
//! - Query maintenance on add/remove
//! - collect() with delta tracking
//! - get_mutable with mutation observers

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gadget_ecs::prelude::*;

#[derive(Debug, Copy, Clone)]
struct Position {
    x: f32,
    y: f32,
    z: f32,
}

#[derive(Debug, Copy, Clone)]
struct Velocity {
    x: f32,
    y: f32,
    z: f32,
}

#[derive(Debug, Copy, Clone)]
struct Health(u32);

struct Components {
    position: ComponentDeclaration<Position>,
    velocity: ComponentDeclaration<Velocity>,
    health: ComponentDeclaration<Health>,
}

fn components() -> Components {
    let mut registry = ComponentRegistry::new();
    Components {
        position: registry
            .declare(Identity::Named("position"), || Position {
                x: 0.0,
                y: 0.0,
                z: 0.0,
            })
            .unwrap(),
        velocity: registry
            .declare(Identity::Named("velocity"), || Velocity {
                x: 1.0,
                y: 0.0,
                z: 0.0,
            })
            .unwrap(),
        health: registry
            .declare(Identity::Named("health"), || Health(100))
            .unwrap(),
    }
}

// Bench: Spawning entities with different component counts
fn bench_spawn(c: &mut Criterion) {
    let k = components();
    let mut group = c.benchmark_group("spawn");

    group.bench_function("spawn_1k_single_component", |b| {
        b.iter(|| {
            let mut world = World::new();
            for _ in 0..1_000 {
                let _ = world.spawn(&k.position);
            }
        });
    });

    group.bench_function("spawn_1k_three_components", |b| {
        b.iter(|| {
            let mut world = World::new();
            for _ in 0..1_000 {
                let _ = world.spawn((&k.position, &k.velocity, &k.health));
            }
        });
    });

    group.finish();
}

// Bench: add/remove cost grows with the number of queries
fn bench_query_maintenance(c: &mut Criterion) {
    let k = components();
    let mut group = c.benchmark_group("query_maintenance");

    for queries in [1usize, 8, 32] {
        group.bench_with_input(
            BenchmarkId::new("add_remove_1k", queries),
            &queries,
            |b, &queries| {
                let mut world = World::new();
                for _ in 0..queries {
                    world
                        .create_query(
                            QueryDescriptor::new((&k.position, &k.velocity))
                                .track_added()
                                .track_removed(),
                        )
                        .unwrap();
                }
                let entities: Vec<Entity> = (0..1_000)
                    .map(|_| world.spawn(&k.position).unwrap())
                    .collect();

                b.iter(|| {
                    for &entity in &entities {
                        world.add(entity, &k.velocity).unwrap();
                        world.remove(entity, &k.velocity).unwrap();
                    }
                });
            },
        );
    }

    group.finish();
}

// Bench: collect() after a window of changes
fn bench_collect(c: &mut Criterion) {
    let k = components();
    let mut group = c.benchmark_group("collect");

    for count in [1_000usize, 10_000] {
        group.bench_with_input(BenchmarkId::new("collect", count), &count, |b, &count| {
            let mut world = World::new();
            let query = world
                .create_query(
                    QueryDescriptor::new((&k.position, &k.health))
                        .track_added()
                        .track_removed()
                        .track_mutated(&k.health),
                )
                .unwrap();
            let entities: Vec<Entity> = (0..count)
                .map(|_| world.spawn((&k.position, &k.health)).unwrap())
                .collect();

            b.iter(|| {
                for entity in entities.iter().step_by(10) {
                    if let Some(health) = world.get_mutable(*entity, &k.health).unwrap() {
                        health.0 = health.0.wrapping_sub(1);
                    }
                }
                black_box(world.collect(query).unwrap().len());
            });
        });
    }

    group.finish();
}

// Bench: get_mutable with and without observers
fn bench_get_mutable(c: &mut Criterion) {
    let k = components();
    let mut group = c.benchmark_group("get_mutable");

    group.bench_function("no_observers", |b| {
        let mut world = World::new();
        let entity = world.spawn(&k.position).unwrap();
        b.iter(|| {
            if let Some(position) = world.get_mutable(entity, &k.position).unwrap() {
                position.x += 1.0;
            }
        });
    });

    group.bench_function("four_observers", |b| {
        let mut world = World::new();
        let entity = world.spawn(&k.position).unwrap();
        for _ in 0..4 {
            let counter: std::rc::Rc<dyn MutationObserver> =
                std::rc::Rc::new(MutationCounter::new());
            let _ = world
                .add_mutation_observer(entity, &k.position, counter)
                .unwrap();
        }
        b.iter(|| {
            if let Some(position) = world.get_mutable(entity, &k.position).unwrap() {
                position.x += 1.0;
            }
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_spawn,
    bench_query_maintenance,
    bench_collect,
    bench_get_mutable
);
criterion_main!(benches);
