//! Collider types

use crate::error::{PhysicsError, Result};
use crate::filter::CollisionFilter;
use crate::material::PhysicsMaterial;
use rapier2d::prelude as rapier;
use serde::{Deserialize, Serialize};

/// Handle to a collider in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderHandle(pub(crate) rapier::ColliderHandle);

impl ColliderHandle {
    /// Create from raw Rapier handle
    pub fn from_raw(handle: rapier::ColliderHandle) -> Self {
        Self(handle)
    }

    /// Get the raw Rapier handle
    pub fn raw(&self) -> rapier::ColliderHandle {
        self.0
    }
}

/// Collision shape type, in body-local physics units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColliderShape {
    /// Convex polygon; the engine uses the hull of the given points
    Polygon {
        vertices: Vec<[f32; 2]>,
    },
    /// Circle around a body-local center
    Circle {
        center: [f32; 2],
        radius: f32,
    },
}

impl ColliderShape {
    /// Create a polygon shape
    pub fn polygon(vertices: Vec<[f32; 2]>) -> Self {
        Self::Polygon { vertices }
    }

    /// Create a circle shape
    pub fn circle(center: [f32; 2], radius: f32) -> Self {
        Self::Circle { center, radius }
    }

    /// Offset of the shape from its parent body
    fn offset(&self) -> [f32; 2] {
        match self {
            Self::Polygon { .. } => [0.0, 0.0],
            Self::Circle { center, .. } => *center,
        }
    }

    /// Build a Rapier shared shape
    pub(crate) fn to_rapier(&self) -> Result<rapier::SharedShape> {
        match self {
            Self::Polygon { vertices } => {
                if vertices.len() < 3 {
                    return Err(PhysicsError::ShapeCreationFailed(format!(
                        "polygon needs at least 3 vertices, got {}",
                        vertices.len()
                    )));
                }
                if vertices.iter().flatten().any(|c| !c.is_finite()) {
                    return Err(PhysicsError::ShapeCreationFailed(
                        "polygon has non-finite vertices".to_string(),
                    ));
                }
                let points: Vec<_> = vertices
                    .iter()
                    .map(|v| rapier::Point::new(v[0], v[1]))
                    .collect();
                rapier::SharedShape::convex_hull(&points).ok_or_else(|| {
                    PhysicsError::ShapeCreationFailed(format!(
                        "degenerate polygon with {} vertices",
                        vertices.len()
                    ))
                })
            }
            Self::Circle { center, radius } => {
                if !center.iter().all(|c| c.is_finite()) {
                    return Err(PhysicsError::ShapeCreationFailed(
                        "circle center is not finite".to_string(),
                    ));
                }
                if !radius.is_finite() || *radius <= 0.0 {
                    return Err(PhysicsError::ShapeCreationFailed(format!(
                        "circle radius must be positive, got {radius}"
                    )));
                }
                Ok(rapier::SharedShape::ball(*radius))
            }
        }
    }
}

/// Description for creating a collider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColliderDesc {
    /// Collision shape
    pub shape: ColliderShape,
    /// Is this a sensor/trigger (no physical response)
    pub is_sensor: bool,
    /// Physics material
    pub material: PhysicsMaterial,
    /// Category/mask/group filter
    pub filter: CollisionFilter,
}

impl ColliderDesc {
    /// Create a new collider description with a shape
    pub fn new(shape: ColliderShape) -> Self {
        Self {
            shape,
            is_sensor: false,
            material: PhysicsMaterial::default(),
            filter: CollisionFilter::ALL,
        }
    }

    /// Set as sensor
    pub fn with_sensor(mut self, is_sensor: bool) -> Self {
        self.is_sensor = is_sensor;
        self
    }

    /// Set material
    pub fn with_material(mut self, material: PhysicsMaterial) -> Self {
        self.material = material;
        self
    }

    /// Set collision filter
    pub fn with_filter(mut self, filter: CollisionFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Build a Rapier collider builder.
    ///
    /// The filter is packed into the collider's user data so the group-index
    /// hooks can read it back.
    pub(crate) fn to_rapier_builder(&self) -> Result<rapier::ColliderBuilder> {
        let offset = self.shape.offset();
        let mut builder = rapier::ColliderBuilder::new(self.shape.to_rapier()?)
            .translation(rapier::Vector::new(offset[0], offset[1]))
            .sensor(self.is_sensor)
            .friction(self.material.friction)
            .restitution(self.material.restitution)
            .density(self.material.density)
            .collision_groups(self.filter.to_interaction_groups())
            .user_data(self.filter.to_user_data());

        if self.filter.needs_hooks() {
            builder = builder.active_hooks(
                rapier::ActiveHooks::FILTER_CONTACT_PAIRS
                    | rapier::ActiveHooks::FILTER_INTERSECTION_PAIR,
            );
        }

        Ok(builder)
    }
}
