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

//! Incremental queries
//!
//! A query is a live view over one world's entities that have every
//! component in its `has` set. Membership is maintained incrementally: the
//! world re-tests an entity after every add/remove instead of the query
//! rescanning all entities.
//!
//! Each query owns two [`QueryResult`] buffers. One is live and receives
//! updates, the other holds the snapshot handed out by the last `collect()`.
//! `collect()` swaps them, so a snapshot is only valid until the next call;
//! the borrow returned by [`World::collect`](crate::World::collect) enforces
//! this.

use ahash::{AHashMap, AHashSet};
use slotmap::new_key_type;
use smallvec::SmallVec;

use crate::component::{ComponentId, Declarations, MAX_DECLARATIONS};
use crate::entity::{Entity, EntityRecord};
use crate::error::{EcsError, Result};
use crate::observer::ObserverSlot;
use crate::world::WorldId;

new_key_type! {
    /// Slot of a query inside its world.
    pub struct QueryKey;
}

/// Handle to a query registered with a world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Query {
    pub(crate) world: WorldId,
    pub(crate) key: QueryKey,
}

impl Query {
    /// World the query belongs to
    pub fn world(&self) -> WorldId {
        self.world
    }
}

/// Query configuration, immutable once the query is created
#[derive(Debug, Clone, Default)]
pub struct QueryDescriptor {
    has: SmallVec<[ComponentId; MAX_DECLARATIONS]>,
    track_added: bool,
    track_removed: bool,
    track_mutated: Option<SmallVec<[ComponentId; MAX_DECLARATIONS]>>,
}

impl QueryDescriptor {
    /// Match entities that have every component in `has`.
    pub fn new<D: Declarations>(has: D) -> Self {
        let mut ids = has.component_ids();
        ids.sort_unstable();
        ids.dedup();
        Self {
            has: ids,
            ..Self::default()
        }
    }

    /// List entities that started matching since the last `collect()`.
    pub fn track_added(mut self) -> Self {
        self.track_added = true;
        self
    }

    /// List entities that stopped matching since the last `collect()`.
    pub fn track_removed(mut self) -> Self {
        self.track_removed = true;
        self
    }

    /// List matching entities whose listed components were borrowed mutably
    /// since the last `collect()`.
    pub fn track_mutated<D: Declarations>(mut self, components: D) -> Self {
        let tracked = self.track_mutated.get_or_insert_with(SmallVec::new);
        for id in components.component_ids() {
            if !tracked.contains(&id) {
                tracked.push(id);
            }
        }
        self
    }

    pub fn required(&self) -> &[ComponentId] {
        &self.has
    }

    pub fn tracked_mutations(&self) -> Option<&[ComponentId]> {
        self.track_mutated.as_deref()
    }

    /// Tracked-mutation components must be required components.
    pub(crate) fn validate(&self) -> Result<()> {
        if let Some(tracked) = &self.track_mutated {
            if let Some(stray) = tracked.iter().find(|id| !self.has.contains(id)) {
                return Err(EcsError::InvalidQuery(format!(
                    "tracked component {stray} is not in the `has` set"
                )));
            }
        }
        Ok(())
    }
}

/// Result of a `collect()`: the matching set plus the configured deltas.
///
/// `added`, `removed` and `mutated` are `None` unless the corresponding
/// tracking option was enabled.
#[derive(Debug, Clone, Default)]
pub struct QueryResult {
    entities: AHashSet<Entity>,
    added: Option<AHashSet<Entity>>,
    removed: Option<AHashSet<Entity>>,
    mutated: Option<AHashSet<Entity>>,
}

impl QueryResult {
    fn for_descriptor(descriptor: &QueryDescriptor) -> Self {
        Self {
            entities: AHashSet::new(),
            added: descriptor.track_added.then(AHashSet::new),
            removed: descriptor.track_removed.then(AHashSet::new),
            mutated: descriptor.track_mutated.as_ref().map(|_| AHashSet::new()),
        }
    }

    /// Every entity matching the query at collection time
    pub fn entities(&self) -> &AHashSet<Entity> {
        &self.entities
    }

    pub fn added(&self) -> Option<&AHashSet<Entity>> {
        self.added.as_ref()
    }

    pub fn removed(&self) -> Option<&AHashSet<Entity>> {
        self.removed.as_ref()
    }

    pub fn mutated(&self) -> Option<&AHashSet<Entity>> {
        self.mutated.as_ref()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains(&entity)
    }

    fn clear_deltas(&mut self) {
        for set in [&mut self.added, &mut self.removed, &mut self.mutated]
            .into_iter()
            .flatten()
        {
            set.clear();
        }
    }

    fn clear(&mut self) {
        self.entities.clear();
        self.clear_deltas();
    }
}

/// Incrementally maintained query state, owned by the world
pub(crate) struct QueryState {
    descriptor: QueryDescriptor,
    buffers: [QueryResult; 2],
    live: usize,
}

impl QueryState {
    pub(crate) fn new(descriptor: QueryDescriptor) -> Self {
        let buffers = [
            QueryResult::for_descriptor(&descriptor),
            QueryResult::for_descriptor(&descriptor),
        ];
        Self {
            descriptor,
            buffers,
            live: 0,
        }
    }

    pub(crate) fn descriptor(&self) -> &QueryDescriptor {
        &self.descriptor
    }

    fn live(&self) -> &QueryResult {
        &self.buffers[self.live]
    }

    fn snapshot(&self) -> &QueryResult {
        &self.buffers[self.live ^ 1]
    }

    fn live_mut(&mut self) -> &mut QueryResult {
        &mut self.buffers[self.live]
    }

    pub(crate) fn live_len(&self) -> usize {
        self.live().entities.len()
    }

    /// Whether `entity` is in the live matching set
    pub(crate) fn contains_live(&self, entity: Entity) -> bool {
        self.live().entities.contains(&entity)
    }

    /// Re-evaluate membership of `entity`.
    pub(crate) fn test(&mut self, key: QueryKey, entity: Entity, record: &mut EntityRecord) {
        if record.has_all(&self.descriptor.has) {
            self.add_to_live(key, entity, record);
        } else {
            self.remove_from_live(key, entity, Some(record));
        }
    }

    fn add_to_live(&mut self, key: QueryKey, entity: Entity, record: &mut EntityRecord) {
        let live = &mut self.buffers[self.live];

        if !live.entities.insert(entity) {
            return;
        }

        if let Some(added) = live.added.as_mut() {
            added.insert(entity);
        }

        if let Some(tracked) = &self.descriptor.track_mutated {
            for &component in tracked {
                record
                    .observers
                    .entry(component)
                    .or_default()
                    .insert(ObserverSlot::Query(key));
            }
        }
    }

    /// Drop `entity` from the live set.
    ///
    /// `record` is `None` once the entity's storage is already gone, in which
    /// case there are no observers left to unsubscribe.
    pub(crate) fn remove_from_live(
        &mut self,
        key: QueryKey,
        entity: Entity,
        record: Option<&mut EntityRecord>,
    ) {
        let was_collected = self.snapshot().entities.contains(&entity);
        let live = &mut self.buffers[self.live];

        if was_collected {
            if let Some(removed) = live.removed.as_mut() {
                removed.insert(entity);
            }
        } else if let Some(mutated) = live.mutated.as_mut() {
            // Qualified only transiently inside this window
            mutated.remove(&entity);
        }

        if let Some(added) = live.added.as_mut() {
            added.remove(&entity);
        }

        if let (Some(tracked), Some(record)) = (&self.descriptor.track_mutated, record) {
            for component in tracked {
                if let Some(list) = record.observers.get_mut(component) {
                    list.remove(&ObserverSlot::Query(key));
                }
            }
        }

        live.entities.remove(&entity);
    }

    /// Mark `entity` as mutated in the live buffer.
    pub(crate) fn flag_mutation(&mut self, entity: Entity) {
        let live = self.live_mut();
        if !live.entities.contains(&entity) {
            return;
        }
        if let Some(mutated) = live.mutated.as_mut() {
            mutated.insert(entity);
        }
    }

    /// Swap buffers and return the snapshot.
    pub(crate) fn collect(&mut self) -> &QueryResult {
        let snapshot = self.live;
        self.live ^= 1;

        let [first, second] = &mut self.buffers;
        let (frozen, next) = if snapshot == 0 {
            (&*first, second)
        } else {
            (&*second, first)
        };

        next.entities.clear();
        next.entities.extend(frozen.entities.iter().copied());
        next.clear_deltas();

        &self.buffers[snapshot]
    }

    /// Unsubscribe from every entity still matched and clear both buffers.
    pub(crate) fn detach(&mut self, key: QueryKey, records: &mut AHashMap<u64, EntityRecord>) {
        if let Some(tracked) = &self.descriptor.track_mutated {
            for entity in &self.buffers[self.live].entities {
                let Some(record) = records.get_mut(&entity.id) else {
                    continue;
                };
                for component in tracked {
                    if let Some(list) = record.observers.get_mut(component) {
                        list.remove(&ObserverSlot::Query(key));
                    }
                }
            }
        }

        for buffer in &mut self.buffers {
            buffer.clear();
        }
    }
}
