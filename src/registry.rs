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

//! Component registry
//!
//! Interns component names and guards against redeclaration. The registry is
//! append-only: once an identity is declared it stays declared.
//!
//! A process-wide registry backs [`declare_component`],
//! [`declare_named_component`] and [`declare_component_with_id`]. Tests and
//! tools that want isolation can own a [`ComponentRegistry`] directly.

use std::sync::{Arc, OnceLock};

use ahash::{AHashMap, AHashSet};
use parking_lot::Mutex;

use crate::component::{Component, ComponentDeclaration, ComponentId};
use crate::error::{EcsError, Result};

/// How a declaration picks its identity
#[derive(Debug, Clone, Copy)]
pub enum Identity<'a> {
    /// Mint a fresh, unnamed identity
    Anonymous,

    /// Intern a name: the same string always maps to the same identity
    Named(&'a str),

    /// Use an explicit token as-is
    Token(ComponentId),
}

/// Registry of declared component identities
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    names: AHashMap<String, ComponentId>,
    labels: AHashMap<ComponentId, Arc<str>>,
    declared: AHashSet<ComponentId>,
    unnamed_count: usize,
}

impl ComponentRegistry {
    /// Create new registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a name to its identity, minting one on first use.
    ///
    /// Interning alone does not declare the component.
    pub fn intern(&mut self, name: &str) -> ComponentId {
        if let Some(&id) = self.names.get(name) {
            return id;
        }

        let id = ComponentId::unique();
        self.names.insert(name.to_string(), id);
        self.labels.insert(id, Arc::from(name));
        id
    }

    /// Identity previously interned for `name`
    pub fn lookup(&self, name: &str) -> Option<ComponentId> {
        self.names.get(name).copied()
    }

    /// Declare a component kind.
    ///
    /// # Errors
    /// [`EcsError::ComponentAlreadyDeclared`] if the identity was used before.
    pub fn declare<T, F>(&mut self, identity: Identity<'_>, factory: F) -> Result<ComponentDeclaration<T>>
    where
        T: Component,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let id = match identity {
            Identity::Anonymous => return Ok(self.declare_anonymous(factory)),
            Identity::Named(name) => self.intern(name),
            Identity::Token(id) => id,
        };

        let label = self
            .labels
            .entry(id)
            .or_insert_with(|| Arc::from(id.to_string()))
            .clone();

        if !self.declared.insert(id) {
            return Err(EcsError::ComponentAlreadyDeclared(label.to_string()));
        }

        Ok(ComponentDeclaration::new(id, label, Arc::new(factory)))
    }

    /// Declare a component under a fresh identity.
    ///
    /// Anonymous identities never collide, so this cannot fail.
    pub fn declare_anonymous<T, F>(&mut self, factory: F) -> ComponentDeclaration<T>
    where
        T: Component,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.unnamed_count += 1;
        let id = ComponentId::unique();
        let label: Arc<str> = Arc::from(format!("Unnamed Component {}", self.unnamed_count));
        self.labels.insert(id, label.clone());
        self.declared.insert(id);
        ComponentDeclaration::new(id, label, Arc::new(factory))
    }

    /// Whether `id` has been declared through this registry
    pub fn is_declared(&self, id: ComponentId) -> bool {
        self.declared.contains(&id)
    }

    /// Label recorded for `id`
    pub fn label(&self, id: ComponentId) -> Option<&str> {
        self.labels.get(&id).map(|label| &**label)
    }

    /// Number of declared components
    pub fn len(&self) -> usize {
        self.declared.len()
    }

    /// Check if no component has been declared
    pub fn is_empty(&self) -> bool {
        self.declared.is_empty()
    }
}

/// Process-wide registry
pub fn global_registry() -> &'static Mutex<ComponentRegistry> {
    static REGISTRY: OnceLock<Mutex<ComponentRegistry>> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(ComponentRegistry::new()))
}

/// Declare an anonymous component in the process-wide registry.
///
/// See [`ComponentRegistry::declare_anonymous`].
pub fn declare_component<T, F>(factory: F) -> ComponentDeclaration<T>
where
    T: Component,
    F: Fn() -> T + Send + Sync + 'static,
{
    global_registry().lock().declare_anonymous(factory)
}

/// Declare a component under an interned name in the process-wide registry.
///
/// Independent modules can agree on a component by name alone.
///
/// # Errors
/// [`EcsError::ComponentAlreadyDeclared`] if `name` was declared before.
pub fn declare_named_component<T, F>(name: &str, factory: F) -> Result<ComponentDeclaration<T>>
where
    T: Component,
    F: Fn() -> T + Send + Sync + 'static,
{
    global_registry().lock().declare(Identity::Named(name), factory)
}

/// Declare a component with an explicit identity token in the process-wide registry.
///
/// # Errors
/// [`EcsError::ComponentAlreadyDeclared`] if `id` was declared before.
pub fn declare_component_with_id<T, F>(id: ComponentId, factory: F) -> Result<ComponentDeclaration<T>>
where
    T: Component,
    F: Fn() -> T + Send + Sync + 'static,
{
    global_registry().lock().declare(Identity::Token(id), factory)
}

/// Identity interned for `name` in the process-wide registry
pub fn intern_component_name(name: &str) -> ComponentId {
    global_registry().lock().intern(name)
}
