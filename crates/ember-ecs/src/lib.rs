//! Ember ECS - Entity Component System
//!
//! A small ECS tailored to the Ember engine. Entities are monotonically
//! increasing ids that are never reused; each component kind lives in its own
//! sparse set indexed by a recycled storage slot, so lookups are statically
//! dispatched and never hash a component name.

mod behavior;
mod component;
mod components;
mod entity;
mod system;
mod world;

pub use behavior::{run_behaviors, Behavior, Command, CommandQueue, Script, ScriptContext};
pub use component::{Component, SparseSet};
pub use components::{Animation, Camera, Collider, Physics, SourceRect, Sprite};
pub use entity::{Entity, EntityAllocator};
pub use system::{System, SystemSchedule};
pub use world::{Components, World};
