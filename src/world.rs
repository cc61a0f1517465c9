// Copyright 2024 Saptak Santra
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! World: owner of entities and queries
//!
//! Every add/remove on an entity re-tests it against each query of its
//! world. Handles ([`Entity`], [`Query`]) are plain ids; the world holds all
//! state, and rejects handles minted by another world.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use ahash::AHashMap;
use slotmap::SlotMap;

#[cfg(feature = "profiling")]
use tracing::info_span;

use crate::component::{Component, ComponentDeclaration, ComponentId, Declarations};
use crate::entity::{Entity, EntityMut, EntityRecord};
use crate::error::{EcsError, Result};
use crate::monitor::{Monitor, NoopMonitor, ENTITY_MONITOR, QUERY_MONITOR};
use crate::observer::{MutationLock, MutationObserver, ObserverHandle, ObserverList, ObserverSlot};
use crate::query::{Query, QueryDescriptor, QueryKey, QueryResult, QueryState};

/// Process-unique world identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorldId(u64);

impl WorldId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        WorldId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn index(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "world#{}", self.0)
    }
}

/// World configuration
pub struct WorldBuilder {
    name: Option<String>,
    entity_capacity: usize,
    query_capacity: usize,
    monitor: Rc<dyn Monitor>,
}

impl Default for WorldBuilder {
    fn default() -> Self {
        Self {
            name: None,
            entity_capacity: 64,
            query_capacity: 8,
            monitor: Rc::new(NoopMonitor),
        }
    }
}

impl WorldBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Pre-allocate storage for this many entities
    pub fn entity_capacity(mut self, capacity: usize) -> Self {
        self.entity_capacity = capacity;
        self
    }

    /// Pre-allocate storage for this many queries
    pub fn query_capacity(mut self, capacity: usize) -> Self {
        self.query_capacity = capacity;
        self
    }

    /// Sink for entity/query population counters
    pub fn monitor(mut self, monitor: impl Monitor + 'static) -> Self {
        self.monitor = Rc::new(monitor);
        self
    }

    pub fn build(self) -> World {
        World {
            id: WorldId::next(),
            name: self.name,
            next_entity_id: 0,
            entities: AHashMap::with_capacity(self.entity_capacity),
            queries: SlotMap::with_capacity_and_key(self.query_capacity),
            mutation_lock: MutationLock::default(),
            monitor: self.monitor,
            destroyed: false,
        }
    }
}

/// Isolated container of entities and queries
///
/// A world is single-threaded: observers are reference counted and the
/// world is neither `Send` nor `Sync`.
pub struct World {
    id: WorldId,
    name: Option<String>,

    /// Next sequential entity id; ids are never reused
    next_entity_id: u64,

    /// Live entities keyed by their sequential id
    entities: AHashMap<u64, EntityRecord>,

    queries: SlotMap<QueryKey, QueryState>,

    /// (entity, component) pairs currently dispatching mutation observers
    mutation_lock: MutationLock,

    monitor: Rc<dyn Monitor>,
    destroyed: bool,
}

impl World {
    /// Create a new, empty, anonymous world.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a new, empty world with a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self::builder().name(name).build()
    }

    pub fn builder() -> WorldBuilder {
        WorldBuilder::default()
    }

    pub fn id(&self) -> WorldId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Number of live queries
    pub fn query_count(&self) -> usize {
        self.queries.len()
    }

    /// Handles of every live entity, in no particular order
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        let world = self.id;
        self.entities.keys().map(move |&id| Entity { world, id })
    }

    /// Returns whether [`World::destroy`] has been called.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn ensure_alive(&self) -> Result<()> {
        if self.destroyed {
            Err(EcsError::WorldDestroyed(self.id))
        } else {
            Ok(())
        }
    }

    fn check_world(&self, found: WorldId) -> Result<()> {
        if found != self.id {
            return Err(EcsError::WrongWorld {
                expected: self.id,
                found,
            });
        }
        self.ensure_alive()
    }

    fn record(&self, entity: Entity) -> Result<&EntityRecord> {
        self.check_world(entity.world)?;
        self.entities
            .get(&entity.id)
            .ok_or(EcsError::EntityDestroyed(entity))
    }

    fn record_mut(&mut self, entity: Entity) -> Result<&mut EntityRecord> {
        self.check_world(entity.world)?;
        self.entities
            .get_mut(&entity.id)
            .ok_or(EcsError::EntityDestroyed(entity))
    }

    // ========== Entity lifecycle ==========

    /// Spawn an entity carrying the default value of each declaration.
    pub fn spawn<D: Declarations>(&mut self, declarations: D) -> Result<Entity> {
        #[cfg(feature = "profiling")]
        let _span = info_span!("world.spawn", world = self.id.0).entered();

        let entity = self.register_entity()?;
        if declarations.declarations().is_empty() {
            self.update_queries(entity)?;
        } else {
            self.add(entity, declarations)?;
        }
        Ok(entity)
    }

    fn register_entity(&mut self) -> Result<Entity> {
        self.ensure_alive()?;

        let entity = Entity {
            world: self.id,
            id: self.next_entity_id,
        };
        self.next_entity_id += 1;
        self.entities.insert(entity.id, EntityRecord::default());
        self.monitor.increment(ENTITY_MONITOR, 1);
        Ok(entity)
    }

    fn unregister_entity(&mut self, entity: Entity) -> Result<()> {
        let mut record = self
            .entities
            .remove(&entity.id)
            .ok_or(EcsError::EntityDestroyed(entity))?;

        // Queries without required components still match a bare entity
        for (key, query) in self.queries.iter_mut() {
            if query.contains_live(entity) {
                query.remove_from_live(key, entity, Some(&mut record));
            }
        }

        self.monitor.decrement(ENTITY_MONITOR, 1);
        Ok(())
    }

    /// Destroy an entity: remove all of its components, drop it from every
    /// query and unregister it. Every later operation on it fails.
    pub fn destroy_entity(&mut self, entity: Entity) -> Result<()> {
        #[cfg(feature = "profiling")]
        let _span = info_span!("world.destroy_entity", entity = entity.id).entered();

        self.record_mut(entity)?.components.clear();
        self.update_queries(entity)?;
        self.unregister_entity(entity)
    }

    /// Returns whether `entity` is no longer alive in this world.
    ///
    /// Handles from other worlds are never alive here.
    pub fn is_entity_destroyed(&self, entity: Entity) -> bool {
        entity.world != self.id || !self.entities.contains_key(&entity.id)
    }

    /// Mutable view of one entity
    pub fn entity_mut(&mut self, entity: Entity) -> Result<EntityMut<'_>> {
        self.record(entity)?;
        Ok(EntityMut::new(self, entity))
    }

    // ========== Components ==========

    /// Add components with their default values.
    ///
    /// Components already present are left untouched.
    pub fn add<D: Declarations>(&mut self, entity: Entity, declarations: D) -> Result<()> {
        self.record(entity)?;
        for declaration in declarations.declarations() {
            self.insert_component(entity, declaration.id(), declaration.label(), || {
                declaration.make_default()
            })?;
        }
        Ok(())
    }

    /// Add a component with `value` as its initial value, or its default if
    /// `value` is `None`. A component already present is left untouched.
    pub fn add_with_value<T: Component>(
        &mut self,
        entity: Entity,
        declaration: &ComponentDeclaration<T>,
        value: Option<T>,
    ) -> Result<()> {
        self.insert_component(entity, declaration.id(), declaration.label(), move || {
            match value {
                Some(value) => Box::new(value) as Box<dyn Any>,
                None => Box::new(declaration.default_value()),
            }
        })
    }

    fn insert_component<F>(
        &mut self,
        entity: Entity,
        component: ComponentId,
        label: &str,
        value: F,
    ) -> Result<()>
    where
        F: FnOnce() -> Box<dyn Any>,
    {
        let record = self.record_mut(entity)?;
        if record.has(component) {
            diag_warn!("component \"{label}\" already exists on entity {entity}. This is a noop.");
            return Ok(());
        }

        record.components.insert(component, value());
        self.update_queries(entity)
    }

    /// Remove components. Absent components are skipped.
    pub fn remove<D: Declarations>(&mut self, entity: Entity, declarations: D) -> Result<()> {
        let record = self.record_mut(entity)?;
        for declaration in declarations.declarations() {
            if record.components.remove(&declaration.id()).is_none() {
                diag_warn!(
                    "removing component \"{}\" from entity {entity}, which is not present",
                    declaration.label()
                );
            }
        }
        self.update_queries(entity)
    }

    /// Whether the component is attached. `false` for destroyed entities.
    pub fn has<T: Component>(&self, entity: Entity, declaration: &ComponentDeclaration<T>) -> bool {
        self.has_component(entity, declaration.id())
    }

    /// Untyped form of [`World::has`]
    pub fn has_component(&self, entity: Entity, component: ComponentId) -> bool {
        self.record(entity)
            .map(|record| record.has(component))
            .unwrap_or(false)
    }

    /// Read-only access to a component value.
    ///
    /// The reference is live storage; the borrow checker keeps it read-only.
    pub fn get<T: Component>(
        &self,
        entity: Entity,
        declaration: &ComponentDeclaration<T>,
    ) -> Result<Option<&T>> {
        let component = declaration.id();
        match self.record(entity)?.components.get(&component) {
            None => Ok(None),
            Some(value) => value
                .downcast_ref::<T>()
                .map(Some)
                .ok_or(EcsError::ComponentTypeMismatch(component)),
        }
    }

    /// Mutable access to a component value.
    ///
    /// Fires every mutation observer registered for this component on this
    /// entity, in registration order, before returning, whether or not the
    /// caller goes on to write. Observers therefore see the old value.
    ///
    /// Calling `get_mutable` for the same (entity, component) from one of its
    /// observers fails with [`EcsError::InfiniteMutationLoop`] when the
    /// `checked` feature is enabled. Without it the recursion is not detected
    /// and overflows the stack.
    pub fn get_mutable<T: Component>(
        &mut self,
        entity: Entity,
        declaration: &ComponentDeclaration<T>,
    ) -> Result<Option<&mut T>> {
        let component = declaration.id();
        self.notify_mutation(entity, component)?;

        // Observers may have removed the component or destroyed the entity
        match self.record_mut(entity)?.components.get_mut(&component) {
            None => Ok(None),
            Some(value) => value
                .downcast_mut::<T>()
                .map(Some)
                .ok_or(EcsError::ComponentTypeMismatch(component)),
        }
    }

    fn notify_mutation(&mut self, entity: Entity, component: ComponentId) -> Result<()> {
        let observers = match self.record(entity)?.observers.get(&component) {
            Some(list) if !list.is_empty() => list.clone(),
            _ => return Ok(()),
        };

        self.mutation_lock.acquire(entity, component)?;
        let result = self.dispatch_mutation(entity, component, &observers);
        self.mutation_lock.release(entity, component);
        result
    }

    fn dispatch_mutation(
        &mut self,
        entity: Entity,
        component: ComponentId,
        observers: &ObserverList,
    ) -> Result<()> {
        for slot in observers.iter() {
            // Skip observers unregistered by an earlier one in this dispatch
            let registered = self
                .entities
                .get(&entity.id)
                .and_then(|record| record.observers.get(&component))
                .is_some_and(|list| list.contains(slot));
            if !registered {
                continue;
            }

            match slot {
                ObserverSlot::Query(key) => {
                    if let Some(query) = self.queries.get_mut(*key) {
                        query.flag_mutation(entity);
                    }
                }
                ObserverSlot::Callback(observer) => observer.on_mutation(self, entity)?,
            }
        }
        Ok(())
    }

    /// Identities of every attached component, sorted
    pub fn component_ids(&self, entity: Entity) -> Result<Vec<ComponentId>> {
        let mut ids: Vec<_> = self.record(entity)?.components.keys().copied().collect();
        ids.sort_unstable();
        Ok(ids)
    }

    // ========== Mutation observers ==========

    /// Register `observer` to run on every `get_mutable` of the component.
    ///
    /// The component does not need to be attached yet. Registering the same
    /// observer twice for the same component is a no-op.
    pub fn add_mutation_observer<T: Component>(
        &mut self,
        entity: Entity,
        declaration: &ComponentDeclaration<T>,
        observer: Rc<dyn MutationObserver>,
    ) -> Result<ObserverHandle> {
        let component = declaration.id();
        let record = self.record_mut(entity)?;
        let inserted = record
            .observers
            .entry(component)
            .or_default()
            .insert(ObserverSlot::Callback(observer.clone()));

        if !inserted {
            diag_warn!(
                "observer \"{}\" already registered for component \"{}\" on entity {entity}. This is a noop.",
                observer.name(),
                declaration.label()
            );
        }

        Ok(ObserverHandle::new(entity, component, observer))
    }

    /// Closure form of [`World::add_mutation_observer`]
    pub fn observe_mutations<T, F>(
        &mut self,
        entity: Entity,
        declaration: &ComponentDeclaration<T>,
        callback: F,
    ) -> Result<ObserverHandle>
    where
        T: Component,
        F: Fn(&mut World, Entity) -> Result<()> + 'static,
    {
        self.add_mutation_observer(entity, declaration, Rc::new(callback))
    }

    /// Unregister an observer. Unknown observers are ignored.
    pub fn remove_mutation_observer<T: Component>(
        &mut self,
        entity: Entity,
        declaration: &ComponentDeclaration<T>,
        observer: &Rc<dyn MutationObserver>,
    ) -> Result<()> {
        self.remove_observer_by_id(entity, declaration.id(), observer)
    }

    pub(crate) fn remove_observer_by_id(
        &mut self,
        entity: Entity,
        component: ComponentId,
        observer: &Rc<dyn MutationObserver>,
    ) -> Result<()> {
        let record = self.record_mut(entity)?;
        if let Some(list) = record.observers.get_mut(&component) {
            list.remove(&ObserverSlot::Callback(observer.clone()));
        }
        Ok(())
    }

    // ========== Queries ==========

    /// Register a query and test every existing entity against it.
    pub fn create_query(&mut self, descriptor: QueryDescriptor) -> Result<Query> {
        self.ensure_alive()?;
        descriptor.validate()?;

        let world = self.id;
        let key = self.queries.insert(QueryState::new(descriptor));
        if let Some(query) = self.queries.get_mut(key) {
            for (&id, record) in self.entities.iter_mut() {
                query.test(key, Entity { world, id }, record);
            }
        }

        self.monitor.increment(QUERY_MONITOR, 1);
        Ok(Query { world, key })
    }

    /// Re-test `entity` against every query of this world.
    ///
    /// Called after every add/remove; O(number of queries).
    pub fn update_queries(&mut self, entity: Entity) -> Result<()> {
        self.check_world(entity.world)?;
        let record = self
            .entities
            .get_mut(&entity.id)
            .ok_or(EcsError::EntityDestroyed(entity))?;

        for (key, query) in self.queries.iter_mut() {
            query.test(key, entity, record);
        }
        Ok(())
    }

    /// Snapshot the query and start a fresh tracking window.
    ///
    /// The returned result borrows the world, so it cannot outlive the next
    /// `collect()`.
    pub fn collect(&mut self, query: Query) -> Result<&QueryResult> {
        #[cfg(feature = "profiling")]
        let _span = info_span!("world.collect", world = self.id.0).entered();

        self.check_world(query.world)?;
        let state = self
            .queries
            .get_mut(query.key)
            .ok_or(EcsError::QueryDestroyed)?;
        Ok(state.collect())
    }

    /// Configuration the query was created with
    pub fn query_descriptor(&self, query: Query) -> Result<&QueryDescriptor> {
        self.check_world(query.world)?;
        self.queries
            .get(query.key)
            .map(QueryState::descriptor)
            .ok_or(EcsError::QueryDestroyed)
    }

    /// Handles of every live query
    pub fn queries(&self) -> impl Iterator<Item = Query> + '_ {
        let world = self.id;
        self.queries.keys().map(move |key| Query { world, key })
    }

    /// Number of entities currently matching, without starting a new window
    pub fn matching_count(&self, query: Query) -> Result<usize> {
        self.check_world(query.world)?;
        self.queries
            .get(query.key)
            .map(QueryState::live_len)
            .ok_or(EcsError::QueryDestroyed)
    }

    /// Destroy a query: clear its buffers and unregister it.
    pub fn destroy_query(&mut self, query: Query) -> Result<()> {
        self.check_world(query.world)?;
        let mut state = self
            .queries
            .remove(query.key)
            .ok_or(EcsError::QueryDestroyed)?;
        state.detach(query.key, &mut self.entities);

        self.monitor.decrement(QUERY_MONITOR, 1);
        Ok(())
    }

    /// Returns whether `query` is no longer registered with this world.
    pub fn is_query_destroyed(&self, query: Query) -> bool {
        query.world != self.id || !self.queries.contains_key(query.key)
    }

    // ========== Teardown ==========

    /// Destroy every query, then every entity. The world rejects all further
    /// registration and mutation.
    pub fn destroy(&mut self) -> Result<()> {
        #[cfg(feature = "profiling")]
        let _span = info_span!(
            "world.destroy",
            entities = self.entities.len(),
            queries = self.queries.len()
        )
        .entered();

        self.ensure_alive()?;
        let world = self.id;

        let keys: Vec<QueryKey> = self.queries.keys().collect();
        for key in keys {
            self.destroy_query(Query { world, key })?;
        }

        let mut ids: Vec<u64> = self.entities.keys().copied().collect();
        ids.sort_unstable();
        for id in ids {
            self.destroy_entity(Entity { world, id })?;
        }

        self.destroyed = true;
        Ok(())
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("entities", &self.entities.len())
            .field("queries", &self.queries.len())
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

thread_local! {
    static DEFAULT_WORLD: RefCell<World> = RefCell::new(World::named("default"));
}

/// Run `f` against this thread's default world.
///
/// Each thread has its own default world, since `World` is not `Send`.
/// Entities spawned here are invisible to the default world of any other
/// thread.
///
/// # Errors
/// [`EcsError::DefaultWorldBusy`] when called from inside another
/// `with_default_world` closure. Observers receive the world as an argument
/// and never need to nest.
pub fn with_default_world<R>(f: impl FnOnce(&mut World) -> R) -> Result<R> {
    DEFAULT_WORLD.with(|cell| {
        let mut world = cell.try_borrow_mut().map_err(|_| EcsError::DefaultWorldBusy)?;
        Ok(f(&mut world))
    })
}

/// Replace this thread's default world with a fresh one, destroying the old
/// one if it is still alive.
pub fn reset_default_world() -> Result<()> {
    DEFAULT_WORLD.with(|cell| {
        let mut world = cell.try_borrow_mut().map_err(|_| EcsError::DefaultWorldBusy)?;
        if !world.is_destroyed() {
            world.destroy()?;
        }
        *world = World::named("default");
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::CountingMonitor;
    use crate::registry::{ComponentRegistry, Identity};

    struct Components {
        a: ComponentDeclaration<u32>,
        b: ComponentDeclaration<String>,
    }

    fn components() -> Components {
        let mut registry = ComponentRegistry::new();
        Components {
            a: registry.declare(Identity::Named("a"), || 0u32).unwrap(),
            b: registry.declare(Identity::Named("b"), String::new).unwrap(),
        }
    }

    #[test]
    fn test_destroy_reports_destroyed() {
        let mut world = World::new();
        assert!(!world.is_destroyed());
        world.destroy().unwrap();
        assert!(world.is_destroyed());
        assert_eq!(world.destroy(), Err(EcsError::WorldDestroyed(world.id())));
    }

    #[test]
    fn test_destroy_cascades_to_entities_and_queries() {
        let c = components();
        let mut world = World::new();
        let e1 = world.spawn(&c.a).unwrap();
        let e2 = world.spawn(&c.b).unwrap();
        let q1 = world.create_query(QueryDescriptor::new((&c.a, &c.b))).unwrap();
        let q2 = world.create_query(QueryDescriptor::new(&c.a)).unwrap();

        world.destroy().unwrap();

        assert!(world.is_entity_destroyed(e1));
        assert!(world.is_entity_destroyed(e2));
        assert!(world.is_query_destroyed(q1));
        assert!(world.is_query_destroyed(q2));
        assert_eq!(world.entity_count(), 0);
        assert_eq!(world.query_count(), 0);
    }

    #[test]
    fn test_destroyed_world_rejects_registration() {
        let c = components();
        let mut world = World::new();
        world.destroy().unwrap();

        assert!(matches!(world.spawn(()), Err(EcsError::WorldDestroyed(_))));
        assert!(matches!(
            world.create_query(QueryDescriptor::new(&c.a)),
            Err(EcsError::WorldDestroyed(_))
        ));
    }

    #[test]
    fn test_foreign_handles_are_rejected() {
        let c = components();
        let mut first = World::new();
        let mut second = World::new();
        let entity = first.spawn(()).unwrap();
        let query = first.create_query(QueryDescriptor::new(&c.a)).unwrap();

        assert!(matches!(
            second.add(entity, &c.a),
            Err(EcsError::WrongWorld { .. })
        ));
        assert!(matches!(
            second.collect(query),
            Err(EcsError::WrongWorld { .. })
        ));
        assert!(!second.has(entity, &c.a));
    }

    #[test]
    fn test_query_sees_existing_entities() {
        let c = components();
        let mut world = World::new();
        let entity = world.spawn((&c.a, &c.b)).unwrap();
        let query = world.create_query(QueryDescriptor::new(&c.b)).unwrap();

        assert!(world.collect(query).unwrap().contains(entity));
    }

    #[test]
    fn test_monitor_tracks_population() {
        let monitor = CountingMonitor::new();
        let c = components();
        let mut world = World::builder()
            .name("monitored")
            .monitor(monitor.clone())
            .build();

        let e1 = world.spawn(&c.a).unwrap();
        world.spawn(()).unwrap();
        let query = world.create_query(QueryDescriptor::new(&c.a)).unwrap();
        assert_eq!(monitor.get(ENTITY_MONITOR), 2);
        assert_eq!(monitor.get(QUERY_MONITOR), 1);

        world.destroy_entity(e1).unwrap();
        world.destroy_query(query).unwrap();
        assert_eq!(monitor.get(ENTITY_MONITOR), 1);
        assert_eq!(monitor.get(QUERY_MONITOR), 0);

        world.destroy().unwrap();
        assert_eq!(monitor.get(ENTITY_MONITOR), 0);
        assert_eq!(world.name(), Some("monitored"));
    }

    #[test]
    fn test_empty_query_drops_destroyed_entities() {
        let mut world = World::new();
        let entity = world.spawn(()).unwrap();
        let query = world
            .create_query(QueryDescriptor::new(()).track_removed())
            .unwrap();

        assert!(world.collect(query).unwrap().contains(entity));

        world.destroy_entity(entity).unwrap();
        let result = world.collect(query).unwrap();
        assert!(!result.contains(entity));
        assert!(result.removed().unwrap().contains(&entity));
    }

    #[test]
    fn test_default_world() {
        let c = components();
        let entity = with_default_world(|world| world.spawn(&c.a)).unwrap().unwrap();

        let has = with_default_world(|world| world.has(entity, &c.a)).unwrap();
        assert!(has);

        let elsewhere = std::thread::spawn(move || {
            with_default_world(|world| world.is_entity_destroyed(entity)).unwrap()
        })
        .join()
        .unwrap();
        assert!(elsewhere);

        let nested = with_default_world(|_| with_default_world(|_| ())).unwrap();
        assert_eq!(nested, Err(EcsError::DefaultWorldBusy));

        reset_default_world().unwrap();
        let alive = with_default_world(|world| !world.is_entity_destroyed(entity)).unwrap();
        assert!(!alive);
    }
}
