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

//! Mutation observers
//!
//! Observers fire on every `get_mutable` of the component they watch,
//! whether or not the caller ends up writing. They run synchronously and
//! before the caller's write, so an observer that needs the new value has to
//! read it on a later tick.

use std::cell::Cell;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::component::ComponentId;
use crate::entity::Entity;
use crate::error::Result;
use crate::query::QueryKey;
use crate::world::World;

/// Callback fired when a watched component is borrowed mutably
pub trait MutationObserver {
    /// Called for every `get_mutable` of the observed component.
    /// Return error to stop processing
    fn on_mutation(&self, world: &mut World, entity: Entity) -> Result<()>;

    /// Get name for debugging
    fn name(&self) -> &str {
        "MutationObserver"
    }
}

impl<F> MutationObserver for F
where
    F: Fn(&mut World, Entity) -> Result<()>,
{
    fn on_mutation(&self, world: &mut World, entity: Entity) -> Result<()> {
        self(world, entity)
    }
}

/// Counts mutation notifications
#[derive(Debug, Default)]
pub struct MutationCounter {
    count: Cell<usize>,
}

impl MutationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.count.get()
    }

    pub fn reset(&self) {
        self.count.set(0);
    }
}

impl MutationObserver for MutationCounter {
    fn on_mutation(&self, _world: &mut World, _entity: Entity) -> Result<()> {
        self.count.set(self.count.get() + 1);
        Ok(())
    }

    fn name(&self) -> &str {
        "MutationCounter"
    }
}

/// One registered observer on an (entity, component) pair
#[derive(Clone)]
pub(crate) enum ObserverSlot {
    /// A query flagging the entity as mutated
    Query(QueryKey),

    /// A user callback
    Callback(Rc<dyn MutationObserver>),
}

impl ObserverSlot {
    fn same_as(&self, other: &ObserverSlot) -> bool {
        match (self, other) {
            (ObserverSlot::Query(a), ObserverSlot::Query(b)) => a == b,
            (ObserverSlot::Callback(a), ObserverSlot::Callback(b)) => same_observer(a, b),
            _ => false,
        }
    }
}

/// Identity comparison on the observer allocation, ignoring vtables
pub(crate) fn same_observer(a: &Rc<dyn MutationObserver>, b: &Rc<dyn MutationObserver>) -> bool {
    std::ptr::eq(Rc::as_ptr(a) as *const (), Rc::as_ptr(b) as *const ())
}

/// Observers for one component, in registration order
#[derive(Clone, Default)]
pub(crate) struct ObserverList {
    slots: SmallVec<[ObserverSlot; 4]>,
}

impl ObserverList {
    /// Append `slot` unless already present. Returns false on duplicates.
    pub(crate) fn insert(&mut self, slot: ObserverSlot) -> bool {
        if self.contains(&slot) {
            return false;
        }
        self.slots.push(slot);
        true
    }

    /// Remove `slot` if present. Returns whether anything was removed.
    pub(crate) fn remove(&mut self, slot: &ObserverSlot) -> bool {
        match self.slots.iter().position(|s| s.same_as(slot)) {
            Some(index) => {
                self.slots.remove(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn contains(&self, slot: &ObserverSlot) -> bool {
        self.slots.iter().any(|s| s.same_as(slot))
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &ObserverSlot> {
        self.slots.iter()
    }
}

/// Registration returned by `add_mutation_observer`
///
/// Consuming it with [`ObserverHandle::remove`] is equivalent to calling
/// `remove_mutation_observer` with the same arguments.
#[must_use = "dropping the handle keeps the observer registered"]
pub struct ObserverHandle {
    entity: Entity,
    component: ComponentId,
    observer: Rc<dyn MutationObserver>,
}

impl ObserverHandle {
    pub(crate) fn new(entity: Entity, component: ComponentId, observer: Rc<dyn MutationObserver>) -> Self {
        Self {
            entity,
            component,
            observer,
        }
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    pub fn component(&self) -> ComponentId {
        self.component
    }

    /// Unregister the observer.
    pub fn remove(self, world: &mut World) -> Result<()> {
        world.remove_observer_by_id(self.entity, self.component, &self.observer)
    }
}

/// Per-(entity, component) guard around observer dispatch.
///
/// With `checked` enabled a reentrant `get_mutable` fails fast with
/// [`EcsError::InfiniteMutationLoop`](crate::EcsError::InfiniteMutationLoop).
/// Without it the guard compiles to nothing and reentrancy recurses until the
/// stack overflows; callers must not mutate a component from its own observer.
#[cfg(feature = "checked")]
#[derive(Debug, Default)]
pub(crate) struct MutationLock {
    held: ahash::AHashSet<(Entity, ComponentId)>,
}

#[cfg(feature = "checked")]
impl MutationLock {
    pub(crate) fn acquire(&mut self, entity: Entity, component: ComponentId) -> Result<()> {
        if self.held.insert((entity, component)) {
            Ok(())
        } else {
            Err(crate::error::EcsError::InfiniteMutationLoop { entity, component })
        }
    }

    pub(crate) fn release(&mut self, entity: Entity, component: ComponentId) {
        self.held.remove(&(entity, component));
    }
}

#[cfg(not(feature = "checked"))]
#[derive(Debug, Default)]
pub(crate) struct MutationLock;

#[cfg(not(feature = "checked"))]
impl MutationLock {
    #[inline(always)]
    pub(crate) fn acquire(&mut self, _entity: Entity, _component: ComponentId) -> Result<()> {
        Ok(())
    }

    #[inline(always)]
    pub(crate) fn release(&mut self, _entity: Entity, _component: ComponentId) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_world: &mut World, _entity: Entity) -> Result<()> {
        Ok(())
    }

    #[test]
    fn test_observer_list_deduplicates() {
        let observer: Rc<dyn MutationObserver> = Rc::new(noop);
        let mut list = ObserverList::default();

        assert!(list.insert(ObserverSlot::Callback(observer.clone())));
        assert!(!list.insert(ObserverSlot::Callback(observer.clone())));
        assert_eq!(list.len(), 1);

        assert!(list.remove(&ObserverSlot::Callback(observer.clone())));
        assert!(!list.remove(&ObserverSlot::Callback(observer)));
        assert!(list.is_empty());
    }

    #[test]
    fn test_distinct_allocations_are_distinct_observers() {
        let a: Rc<dyn MutationObserver> = Rc::new(MutationCounter::new());
        let b: Rc<dyn MutationObserver> = Rc::new(MutationCounter::new());
        assert!(!same_observer(&a, &b));
        assert!(same_observer(&a, &a.clone()));
    }

    #[cfg(feature = "checked")]
    #[test]
    fn test_mutation_lock_rejects_reentry() {
        let mut world = World::new();
        let entity = world.spawn(()).unwrap();
        let component = ComponentId::unique();
        let mut lock = MutationLock::default();

        lock.acquire(entity, component).unwrap();
        assert!(lock.acquire(entity, component).is_err());
        lock.release(entity, component);
        assert!(lock.acquire(entity, component).is_ok());
    }
}
