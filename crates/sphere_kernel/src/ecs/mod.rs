//! Entity-Component-System implementation
//!
//! Generational entity handles, sparse component tables, a world that keeps
//! them consistent, a command buffer for deferred structural changes, and
//! the per-tick systems.

pub mod commands;
pub mod component;
pub mod components;
pub mod entity;
pub mod storage;
pub mod systems;
pub mod world;

pub use commands::CommandBuffer;
pub use component::Component;
pub use entity::Entity;
pub use storage::ComponentStorage;
pub use world::World;
