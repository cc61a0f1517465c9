//! Convenient re-exports of commonly used types.
//!
//! The prelude can be imported with:
//! ```
//! use gadget_ecs::prelude::*;
//! ```

pub use crate::component::{AnyDeclaration, Component, ComponentDeclaration, ComponentId, Declarations};
pub use crate::debug::WorldInspector;
pub use crate::entity::{Entity, EntityMut};
pub use crate::error::{EcsError, Result};
pub use crate::monitor::{CountingMonitor, Monitor, NoopMonitor};
pub use crate::observer::{MutationCounter, MutationObserver, ObserverHandle};
pub use crate::query::{Query, QueryDescriptor, QueryResult};
pub use crate::registry::{
    declare_component, declare_component_with_id, declare_named_component, ComponentRegistry,
    Identity,
};
pub use crate::world::{with_default_world, World, WorldBuilder, WorldId};
