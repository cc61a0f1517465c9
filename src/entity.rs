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

//! Entity handles and per-entity storage.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use ahash::AHashMap;

use crate::component::{Component, ComponentDeclaration, ComponentId, Declarations};
use crate::error::Result;
use crate::observer::{MutationObserver, ObserverHandle, ObserverList};
use crate::world::{World, WorldId};

/// Entity identifier.
///
/// `id` is assigned sequentially by the owning world, starting at 0, and is
/// never reused. The handle is only meaningful together with its world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity {
    pub(crate) world: WorldId,
    pub(crate) id: u64,
}

impl Entity {
    /// Per-world sequential id
    pub fn id(&self) -> u64 {
        self.id
    }

    /// World the entity was spawned into
    pub fn world(&self) -> WorldId {
        self.world
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.id, self.world.index())
    }
}

/// Component values and mutation observers of a live entity
#[derive(Default)]
pub(crate) struct EntityRecord {
    pub(crate) components: AHashMap<ComponentId, Box<dyn Any>>,
    pub(crate) observers: AHashMap<ComponentId, ObserverList>,
}

impl EntityRecord {
    pub(crate) fn has(&self, component: ComponentId) -> bool {
        self.components.contains_key(&component)
    }

    /// Whether every component in `required` is attached
    pub(crate) fn has_all(&self, required: &[ComponentId]) -> bool {
        required.iter().all(|id| self.components.contains_key(id))
    }
}

/// Mutable view of one entity, borrowed from its world
///
/// Every method forwards to the [`World`] method of the same name.
pub struct EntityMut<'w> {
    world: &'w mut World,
    entity: Entity,
}

impl<'w> EntityMut<'w> {
    pub(crate) fn new(world: &'w mut World, entity: Entity) -> Self {
        Self { world, entity }
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    pub fn id(&self) -> u64 {
        self.entity.id
    }

    pub fn add<D: Declarations>(&mut self, declarations: D) -> Result<&mut Self> {
        self.world.add(self.entity, declarations)?;
        Ok(self)
    }

    pub fn add_with_value<T: Component>(
        &mut self,
        declaration: &ComponentDeclaration<T>,
        value: Option<T>,
    ) -> Result<&mut Self> {
        self.world.add_with_value(self.entity, declaration, value)?;
        Ok(self)
    }

    pub fn remove<D: Declarations>(&mut self, declarations: D) -> Result<&mut Self> {
        self.world.remove(self.entity, declarations)?;
        Ok(self)
    }

    pub fn has<T: Component>(&self, declaration: &ComponentDeclaration<T>) -> bool {
        self.world.has(self.entity, declaration)
    }

    pub fn get<T: Component>(&self, declaration: &ComponentDeclaration<T>) -> Result<Option<&T>> {
        self.world.get(self.entity, declaration)
    }

    /// See [`World::get_mutable`].
    pub fn get_mutable<T: Component>(
        &mut self,
        declaration: &ComponentDeclaration<T>,
    ) -> Result<Option<&mut T>> {
        self.world.get_mutable(self.entity, declaration)
    }

    pub fn add_mutation_observer<T: Component>(
        &mut self,
        declaration: &ComponentDeclaration<T>,
        observer: Rc<dyn MutationObserver>,
    ) -> Result<ObserverHandle> {
        self.world
            .add_mutation_observer(self.entity, declaration, observer)
    }

    pub fn remove_mutation_observer<T: Component>(
        &mut self,
        declaration: &ComponentDeclaration<T>,
        observer: &Rc<dyn MutationObserver>,
    ) -> Result<()> {
        self.world
            .remove_mutation_observer(self.entity, declaration, observer)
    }

    pub fn component_ids(&self) -> Result<Vec<ComponentId>> {
        self.world.component_ids(self.entity)
    }

    /// Destroy the entity, consuming the view.
    pub fn destroy(self) -> Result<()> {
        self.world.destroy_entity(self.entity)
    }
}
