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

//! Error types

use std::fmt;

use crate::component::ComponentId;
use crate::entity::Entity;
use crate::world::WorldId;

/// ECS error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// A component with this identity has already been declared
    ComponentAlreadyDeclared(String),

    /// Entity was destroyed and can no longer be used
    EntityDestroyed(Entity),

    /// World was destroyed and rejects all further registration and mutation
    WorldDestroyed(WorldId),

    /// Query was destroyed (or never belonged to this world's live set)
    QueryDestroyed,

    /// Handle belongs to a different world than the one it was passed to
    WrongWorld { expected: WorldId, found: WorldId },

    /// `get_mutable` was re-entered from one of its own mutation observers
    InfiniteMutationLoop { entity: Entity, component: ComponentId },

    /// Stored component value does not have the declared type
    ComponentTypeMismatch(ComponentId),

    /// Query configuration is inconsistent
    InvalidQuery(String),

    /// The thread's default world is already borrowed further up the stack
    DefaultWorldBusy,

    /// IO error (trace file creation, etc.)
    IoError(String),
}

impl fmt::Display for EcsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EcsError::ComponentAlreadyDeclared(label) => write!(
                f,
                "A component with the identifier \"{label}\" already exists and cannot be redeclared"
            ),
            EcsError::EntityDestroyed(entity) => {
                write!(f, "Trying to access destroyed entity {entity}")
            }
            EcsError::WorldDestroyed(world) => write!(f, "Trying to access destroyed world {world}"),
            EcsError::QueryDestroyed => write!(f, "Trying to access destroyed query"),
            EcsError::WrongWorld { expected, found } => {
                write!(f, "Handle belongs to world {found}, not {expected}")
            }
            EcsError::InfiniteMutationLoop { entity, component } => write!(
                f,
                "Mutation of component {component} on entity {entity} triggered by a mutation \
                 observer of the same component. This is an infinite loop"
            ),
            EcsError::ComponentTypeMismatch(component) => {
                write!(f, "Component {component} does not hold the declared type")
            }
            EcsError::InvalidQuery(msg) => write!(f, "Invalid query: {msg}"),
            EcsError::DefaultWorldBusy => write!(f, "Default world is already borrowed"),
            EcsError::IoError(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for EcsError {}

impl From<std::io::Error> for EcsError {
    fn from(err: std::io::Error) -> Self {
        EcsError::IoError(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, EcsError>;
