//! Rigid body types

use rapier2d::prelude as rapier;
use serde::{Deserialize, Serialize};

/// Handle to a rigid body in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RigidBodyHandle(pub(crate) rapier::RigidBodyHandle);

impl RigidBodyHandle {
    /// Create from raw Rapier handle
    pub fn from_raw(handle: rapier::RigidBodyHandle) -> Self {
        Self(handle)
    }

    /// Get the raw Rapier handle
    pub fn raw(&self) -> rapier::RigidBodyHandle {
        self.0
    }
}

/// Type of rigid body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RigidBodyType {
    /// Static body - never moves, infinite mass
    Static,
    /// Dynamic body - fully simulated
    #[default]
    Dynamic,
}

impl RigidBodyType {
    /// Dynamic when `dynamic` is set, static otherwise
    pub fn from_dynamic_flag(dynamic: bool) -> Self {
        if dynamic {
            Self::Dynamic
        } else {
            Self::Static
        }
    }

    /// Whether bodies of this type are simulated
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic)
    }
}

impl From<RigidBodyType> for rapier::RigidBodyType {
    fn from(t: RigidBodyType) -> Self {
        match t {
            RigidBodyType::Static => rapier::RigidBodyType::Fixed,
            RigidBodyType::Dynamic => rapier::RigidBodyType::Dynamic,
        }
    }
}

/// Description for creating a rigid body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RigidBodyDesc {
    /// Type of rigid body
    pub body_type: RigidBodyType,
    /// Initial position
    pub position: [f32; 2],
    /// Initial rotation in radians
    pub rotation: f32,
}

impl RigidBodyDesc {
    /// Create a description for the given body type
    pub fn new(body_type: RigidBodyType) -> Self {
        Self {
            body_type,
            ..Default::default()
        }
    }

    /// Create a static body description
    pub fn fixed() -> Self {
        Self::new(RigidBodyType::Static)
    }

    /// Create a dynamic body description
    pub fn dynamic() -> Self {
        Self::new(RigidBodyType::Dynamic)
    }

    /// Set position
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = [x, y];
        self
    }

    /// Set rotation (radians)
    pub fn with_rotation(mut self, angle: f32) -> Self {
        self.rotation = angle;
        self
    }

    /// Build a Rapier rigid body builder
    pub(crate) fn to_rapier_builder(&self) -> rapier::RigidBodyBuilder {
        rapier::RigidBodyBuilder::new(self.body_type.into())
            .translation(rapier::Vector::new(self.position[0], self.position[1]))
            .rotation(self.rotation)
    }
}
