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

//! Gadget ECS - Entity Component System with delta-tracking queries
//!
//! Components are declared once, attached to entities inside a [`World`], and
//! observed through queries that report the matching set plus what was
//! added, removed or mutated since the previous `collect()`.
//!
//! ```
//! use gadget_ecs::prelude::*;
//!
//! let mut registry = ComponentRegistry::new();
//! let position = registry.declare(Identity::Named("position"), || (0.0f32, 0.0f32)).unwrap();
//! let velocity = registry.declare(Identity::Named("velocity"), || (1.0f32, 0.0f32)).unwrap();
//!
//! let mut world = World::new();
//! let query = world
//!     .create_query(QueryDescriptor::new((&position, &velocity)).track_added())
//!     .unwrap();
//!
//! let entity = world.spawn((&position, &velocity)).unwrap();
//! let result = world.collect(query).unwrap();
//! assert!(result.added().unwrap().contains(&entity));
//! ```

/// Warn about a redundant operation. Compiled out without `checked`.
macro_rules! diag_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "checked")]
        {
            tracing::warn!(target: "gadget_ecs", $($arg)*);
        }
        #[cfg(not(feature = "checked"))]
        {
            let _ = format_args!($($arg)*);
        }
    }};
}

pub mod component;
pub mod debug;
pub mod entity;
pub mod error;
pub mod monitor;
pub mod observer;
pub mod prelude;
pub mod profiling;
pub mod query;
pub mod registry;
pub mod world;


pub use component::*;
pub use entity::*;
pub use error::*;
pub use monitor::*;
pub use observer::*;
pub use query::*;
pub use registry::*;
pub use world::*;
