//! Void Physics 2D - Rapier 2D Integration
//!
//! This crate provides planar rigid body simulation for the Void Engine
//! using Rapier 2D.
//!
//! # Features
//!
//! - Rigid body dynamics (static, dynamic)
//! - Convex polygon and circle colliders
//! - Sensors
//! - Category/mask/group collision filtering
//! - Physics materials (density, friction, restitution)
//! - Named bodies for lookup by editor name
//!
//! # Example
//!
//! ```ignore
//! use void_physics2d::prelude::*;
//!
//! let mut physics = PhysicsWorld::new(PhysicsConfig::default());
//!
//! let body = physics.create_named_body("crate", RigidBodyDesc::dynamic().with_position(0.0, 10.0));
//!
//! physics.create_collider(
//!     &ColliderDesc::new(ColliderShape::circle([0.0, 0.0], 0.5)),
//!     Some(body),
//! )?;
//!
//! physics.step(1.0 / 60.0);
//! ```

pub mod body;
pub mod collider;
pub mod config;
pub mod error;
pub mod filter;
pub mod material;
pub mod world;

pub mod prelude {
    //! Common imports for physics functionality
    pub use crate::body::{RigidBodyDesc, RigidBodyHandle, RigidBodyType};
    pub use crate::collider::{ColliderDesc, ColliderHandle, ColliderShape};
    pub use crate::config::PhysicsConfig;
    pub use crate::error::{PhysicsError, Result};
    pub use crate::filter::{CollisionFilter, GroupIndexHooks};
    pub use crate::material::PhysicsMaterial;
    pub use crate::world::PhysicsWorld;
}

pub use prelude::*;
