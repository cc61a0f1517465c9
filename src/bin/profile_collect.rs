#![allow(dead_code, unused_imports)]

use gadget_ecs::prelude::*;
use std::time::Instant;

#[derive(Debug, Clone)]
struct Position(f32, f32, f32);

#[derive(Debug, Clone)]
struct Velocity(f32, f32, f32);

#[derive(Debug, Clone)]
struct Health(u32);

#[cfg(feature = "profiling")]
struct Components {
    position: ComponentDeclaration<Position>,
    velocity: ComponentDeclaration<Velocity>,
    health: ComponentDeclaration<Health>,
}

#[cfg(feature = "profiling")]
#[tracing::instrument(skip(world, k, query))]
fn profile_ticks(world: &mut World, k: &Components, query: Query, ticks: usize) -> Result<()> {
    let entities: Vec<Entity> = world.entities().collect();
    for tick in 0..ticks {
        let _span = tracing::info_span!("tick", tick).entered();
        for entity in entities.iter().skip(tick % 7).step_by(7) {
            if let Some(position) = world.get_mutable(*entity, &k.position)? {
                position.0 += 1.0;
            }
        }
        let result = world.collect(query)?;
        tracing::info!(
            matching = result.len(),
            mutated = result.mutated().map_or(0, |m| m.len()),
            "collected"
        );
    }
    Ok(())
}

#[cfg(feature = "profiling")]
fn main() -> Result<()> {
    let _guard = gadget_ecs::profiling::init_file_tracing("trace.json")?;

    let mut registry = ComponentRegistry::new();
    let k = Components {
        position: registry.declare(Identity::Named("position"), || Position(1.0, 2.0, 3.0))?,
        velocity: registry.declare(Identity::Named("velocity"), || Velocity(1.0, 0.0, 0.0))?,
        health: registry.declare(Identity::Named("health"), || Health(100))?,
    };

    let mut world = World::named("profile");
    let query = world.create_query(
        QueryDescriptor::new((&k.position, &k.velocity))
            .track_added()
            .track_removed()
            .track_mutated(&k.position),
    )?;

    println!("Spawning...");
    {
        let _span = tracing::info_span!("spawn", count = 10_000).entered();
        for i in 0..10_000 {
            if i % 2 == 0 {
                world.spawn((&k.position, &k.velocity, &k.health))?;
            } else {
                world.spawn((&k.position, &k.health))?;
            }
        }
    }

    println!("Profiling 100 ticks of mutation + collect...");
    let start = Instant::now();
    profile_ticks(&mut world, &k, query, 100)?;
    println!("100 ticks complete in: {:?}", start.elapsed());

    world.destroy()
}

#[cfg(not(feature = "profiling"))]
fn main() {
    println!("profile_collect binary requires --features profiling");
}
