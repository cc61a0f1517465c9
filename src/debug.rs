use crate::entity::Entity;
use crate::query::Query;
use crate::world::World;

/// World inspector for debugging
pub struct WorldInspector;

impl WorldInspector {
    /// Get total entity count
    pub fn entity_count(world: &World) -> usize {
        world.entity_count()
    }

    /// Get query summary
    pub fn query_summary(world: &World) -> Vec<QueryInfo> {
        let mut infos = Vec::new();

        for query in world.queries() {
            let Ok(descriptor) = world.query_descriptor(query) else {
                continue;
            };

            infos.push(QueryInfo {
                query,
                required: descriptor
                    .required()
                    .iter()
                    .map(|id| id.to_string())
                    .collect(),
                tracked_mutations: descriptor.tracked_mutations().map_or(0, <[_]>::len),
                matching: world.matching_count(query).unwrap_or(0),
            });
        }

        infos
    }

    /// Print world summary to console
    pub fn print_summary(world: &World) {
        println!("=== World Summary ===");
        println!("World: {} ({})", world.id(), world.name().unwrap_or("unnamed"));
        println!("Entities: {}", Self::entity_count(world));
        println!("Queries: {}", world.query_count());

        println!("\n=== Queries ===");
        for info in Self::query_summary(world) {
            println!(
                "Query [{}]: {} matching, {} tracked mutations",
                info.required.join(", "),
                info.matching,
                info.tracked_mutations
            );
        }
    }

    /// Print entity details
    pub fn print_entity(world: &World, entity: Entity) {
        match world.component_ids(entity) {
            Ok(components) => {
                println!("=== Entity {entity} ===");
                println!("Components: {} types", components.len());
                for component in components {
                    println!("  {component}");
                }
            }
            Err(err) => println!("Entity {entity}: {err}"),
        }
    }
}

/// Query information for debugging
#[derive(Clone, Debug)]
pub struct QueryInfo {
    pub query: Query,
    pub required: Vec<String>,
    pub tracked_mutations: usize,
    pub matching: usize,
}
