//! Core kernel configuration
//!
//! Tunables for the physics pass and the scene tick driver, loadable from
//! TOML or RON through the [`Config`](crate::config::Config) trait.

pub mod config;

pub use config::{KernelConfig, PhysicsConfig, SceneConfig};
