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

//! Component identities and declarations
//!
//! A component kind is an opaque [`ComponentId`] paired with a factory for
//! its default value. Declarations are minted by a
//! [`ComponentRegistry`](crate::registry::ComponentRegistry).
//! [`Declarations`] groups several of them for spawning, adding and removing.

use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use smallvec::{smallvec, SmallVec};

/// Inline capacity for declaration lists before spilling to the heap
pub const MAX_DECLARATIONS: usize = 8;

/// Marker trait for components
///
/// Components must be 'static (no borrowed data)
pub trait Component: 'static {}

/// Automatically implement Component for all valid types
impl<T: 'static> Component for T {}

/// Opaque, process-unique component identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentId(u64);

impl ComponentId {
    /// Mint a fresh identity that has never been handed out before.
    pub fn unique() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        ComponentId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value, for diagnostics
    pub fn index(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

type Factory<T> = Arc<dyn Fn() -> T + Send + Sync>;

/// A declared component kind: identity plus default-value factory.
///
/// The factory runs every time the component is attached without an explicit
/// value, so entities never share default state.
pub struct ComponentDeclaration<T: Component> {
    id: ComponentId,
    label: Arc<str>,
    factory: Factory<T>,
}

impl<T: Component> ComponentDeclaration<T> {
    pub(crate) fn new(id: ComponentId, label: Arc<str>, factory: Factory<T>) -> Self {
        Self { id, label, factory }
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    /// Human-readable name used in diagnostics
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Build a fresh default value.
    pub fn default_value(&self) -> T {
        (self.factory)()
    }
}

impl<T: Component> Clone for ComponentDeclaration<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            label: Arc::clone(&self.label),
            factory: Arc::clone(&self.factory),
        }
    }
}

impl<T: Component> fmt::Debug for ComponentDeclaration<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDeclaration")
            .field("id", &self.id)
            .field("label", &self.label)
            .finish()
    }
}

/// Type-erased view of a [`ComponentDeclaration`]
pub trait AnyDeclaration {
    fn id(&self) -> ComponentId;

    fn label(&self) -> &str;

    /// Build a boxed default value
    fn make_default(&self) -> Box<dyn Any>;
}

impl<T: Component> AnyDeclaration for ComponentDeclaration<T> {
    fn id(&self) -> ComponentId {
        self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn make_default(&self) -> Box<dyn Any> {
        Box::new(self.default_value())
    }
}

/// A set of component declarations
///
/// Passed to spawn, add, remove and query construction.
pub trait Declarations {
    /// Borrow every declaration in the set, in order
    fn declarations(&self) -> SmallVec<[&dyn AnyDeclaration; MAX_DECLARATIONS]>;

    /// Identities of every declaration in the set, in order
    fn component_ids(&self) -> SmallVec<[ComponentId; MAX_DECLARATIONS]> {
        self.declarations().iter().map(|d| d.id()).collect()
    }
}

impl Declarations for () {
    fn declarations(&self) -> SmallVec<[&dyn AnyDeclaration; MAX_DECLARATIONS]> {
        SmallVec::new()
    }
}

impl<T: Component> Declarations for &ComponentDeclaration<T> {
    fn declarations(&self) -> SmallVec<[&dyn AnyDeclaration; MAX_DECLARATIONS]> {
        smallvec![*self as &dyn AnyDeclaration]
    }
}

impl<'d> Declarations for &[&'d dyn AnyDeclaration] {
    fn declarations(&self) -> SmallVec<[&dyn AnyDeclaration; MAX_DECLARATIONS]> {
        self.iter().map(|d| *d as &dyn AnyDeclaration).collect()
    }
}

// Tuples of declaration references, same shape as the bundle macro used for spawning
macro_rules! impl_declarations {
    ($($T:ident),*) => {
        impl<$($T: Component),*> Declarations for ($(&ComponentDeclaration<$T>,)*) {
            #[allow(non_snake_case)]
            fn declarations(&self) -> SmallVec<[&dyn AnyDeclaration; MAX_DECLARATIONS]> {
                let ($($T,)*) = self;
                smallvec![$(*$T as &dyn AnyDeclaration),*]
            }
        }
    };
}

impl_declarations!(A);
impl_declarations!(A, B);
impl_declarations!(A, B, C);
impl_declarations!(A, B, C, D);
impl_declarations!(A, B, C, D, E);
impl_declarations!(A, B, C, D, E, F);
impl_declarations!(A, B, C, D, E, F, G);
impl_declarations!(A, B, C, D, E, F, G, H);
