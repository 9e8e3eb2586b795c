//! Deterministic physics core
//!
//! All simulation state lives here. This module must stay pure:
//! - Bodies are plain polygon + kinematic state, no rendering hooks
//! - Collision detection is a pure function over two shapes
//! - The scene reports side effects as events instead of performing them

pub mod body;
pub mod collision;
pub mod scene;

pub use body::{Body, BodyKind, Color};
pub use collision::{CollisionResult, find_collision, shapes_collide};
pub use scene::{BodyRef, CollisionResponse, Scene, TickEvent};
