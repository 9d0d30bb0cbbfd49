//! Physics world - main simulation container

use crate::body::{RigidBodyDesc, RigidBodyHandle, RigidBodyType};
use crate::collider::{ColliderDesc, ColliderHandle};
use crate::config::PhysicsConfig;
use crate::error::{PhysicsError, Result};
use crate::filter::{CollisionFilter, GroupIndexHooks};
use crate::material::PhysicsMaterial;
use rapier2d::prelude as rapier;
use std::collections::HashMap;
use std::num::NonZeroUsize;

/// The main physics world containing all simulation state
pub struct PhysicsWorld {
    /// Configuration
    config: PhysicsConfig,

    /// Rapier physics pipeline
    pipeline: rapier::PhysicsPipeline,

    /// Gravity
    gravity: rapier::Vector<f32>,

    /// Integration parameters
    integration_params: rapier::IntegrationParameters,

    /// Island manager
    islands: rapier::IslandManager,

    /// Broad phase
    broad_phase: rapier::DefaultBroadPhase,

    /// Narrow phase
    narrow_phase: rapier::NarrowPhase,

    /// Impulse joint set
    impulse_joints: rapier::ImpulseJointSet,

    /// Multibody joint set
    multibody_joints: rapier::MultibodyJointSet,

    /// CCD solver
    ccd_solver: rapier::CCDSolver,

    /// Rigid body set
    bodies: rapier::RigidBodySet,

    /// Collider set
    colliders: rapier::ColliderSet,

    /// Group-index filtering
    hooks: GroupIndexHooks,

    /// Names given to bodies at creation
    body_names: HashMap<RigidBodyHandle, String>,

    /// Accumulated time for fixed timestep
    accumulated_time: f32,
}

impl PhysicsWorld {
    /// Create a new physics world
    pub fn new(config: PhysicsConfig) -> Self {
        let gravity = rapier::Vector::new(config.gravity[0], config.gravity[1]);

        let mut integration_params = rapier::IntegrationParameters::default();
        integration_params.dt = config.timestep;
        integration_params.num_solver_iterations =
            NonZeroUsize::new(config.velocity_iterations).unwrap_or(NonZeroUsize::MIN);

        Self {
            config,
            pipeline: rapier::PhysicsPipeline::new(),
            gravity,
            integration_params,
            islands: rapier::IslandManager::new(),
            broad_phase: rapier::DefaultBroadPhase::new(),
            narrow_phase: rapier::NarrowPhase::new(),
            impulse_joints: rapier::ImpulseJointSet::new(),
            multibody_joints: rapier::MultibodyJointSet::new(),
            ccd_solver: rapier::CCDSolver::new(),
            bodies: rapier::RigidBodySet::new(),
            colliders: rapier::ColliderSet::new(),
            hooks: GroupIndexHooks,
            body_names: HashMap::new(),
            accumulated_time: 0.0,
        }
    }

    /// Get the physics configuration
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Get gravity
    pub fn gravity(&self) -> [f32; 2] {
        [self.gravity.x, self.gravity.y]
    }

    // ==================== Rigid Bodies ====================

    /// Create a rigid body
    pub fn create_rigid_body(&mut self, desc: RigidBodyDesc) -> RigidBodyHandle {
        let builder = desc
            .to_rapier_builder()
            .can_sleep(self.config.sleeping_enabled);
        let handle = self.bodies.insert(builder);
        RigidBodyHandle(handle)
    }

    /// Create a rigid body tagged with a name for later lookup
    pub fn create_named_body(&mut self, name: impl Into<String>, desc: RigidBodyDesc) -> RigidBodyHandle {
        let handle = self.create_rigid_body(desc);
        self.body_names.insert(handle, name.into());
        handle
    }

    /// Name a body was created with
    pub fn body_name(&self, handle: RigidBodyHandle) -> Option<&str> {
        self.body_names.get(&handle).map(String::as_str)
    }

    /// Find a body by its name
    pub fn find_body(&self, name: &str) -> Option<RigidBodyHandle> {
        self.body_names
            .iter()
            .find(|(_, n)| n.as_str() == name)
            .map(|(handle, _)| *handle)
    }

    /// Remove a rigid body and its colliders
    pub fn remove_rigid_body(&mut self, handle: RigidBodyHandle) {
        self.bodies.remove(
            handle.0,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true, // Remove attached colliders
        );
        self.body_names.remove(&handle);
    }

    /// Get rigid body type
    pub fn get_body_type(&self, handle: RigidBodyHandle) -> Result<RigidBodyType> {
        self.bodies
            .get(handle.0)
            .map(|b| {
                if b.is_dynamic() {
                    RigidBodyType::Dynamic
                } else {
                    RigidBodyType::Static
                }
            })
            .ok_or(PhysicsError::BodyNotFound(handle))
    }

    /// Get rigid body position
    pub fn get_body_position(&self, handle: RigidBodyHandle) -> Result<[f32; 2]> {
        self.bodies
            .get(handle.0)
            .map(|b| {
                let pos = b.translation();
                [pos.x, pos.y]
            })
            .ok_or(PhysicsError::BodyNotFound(handle))
    }

    /// Get rigid body rotation in radians
    pub fn get_body_rotation(&self, handle: RigidBodyHandle) -> Result<f32> {
        self.bodies
            .get(handle.0)
            .map(|b| b.rotation().angle())
            .ok_or(PhysicsError::BodyNotFound(handle))
    }

    /// Colliders attached to a body, in creation order
    pub fn body_colliders(&self, handle: RigidBodyHandle) -> Result<Vec<ColliderHandle>> {
        self.bodies
            .get(handle.0)
            .map(|b| b.colliders().iter().copied().map(ColliderHandle).collect())
            .ok_or(PhysicsError::BodyNotFound(handle))
    }

    // ==================== Colliders ====================

    /// Create a collider, optionally attached to a rigid body
    pub fn create_collider(&mut self, desc: &ColliderDesc, parent: Option<RigidBodyHandle>) -> Result<ColliderHandle> {
        let builder = desc.to_rapier_builder()?;
        let handle = match parent {
            Some(body) => {
                if !self.bodies.contains(body.0) {
                    return Err(PhysicsError::BodyNotFound(body));
                }
                self.colliders.insert_with_parent(builder, body.0, &mut self.bodies)
            }
            None => self.colliders.insert(builder),
        };
        Ok(ColliderHandle(handle))
    }

    /// Material a collider was created with
    pub fn collider_material(&self, handle: ColliderHandle) -> Result<PhysicsMaterial> {
        self.colliders
            .get(handle.0)
            .map(|c| PhysicsMaterial::new(c.density(), c.friction(), c.restitution()))
            .ok_or(PhysicsError::ColliderNotFound(handle))
    }

    /// Collision filter a collider was created with
    pub fn collider_filter(&self, handle: ColliderHandle) -> Result<CollisionFilter> {
        self.colliders
            .get(handle.0)
            .map(|c| CollisionFilter::from_user_data(c.user_data))
            .ok_or(PhysicsError::ColliderNotFound(handle))
    }

    /// Whether a collider is a sensor
    pub fn collider_is_sensor(&self, handle: ColliderHandle) -> Result<bool> {
        self.colliders
            .get(handle.0)
            .map(|c| c.is_sensor())
            .ok_or(PhysicsError::ColliderNotFound(handle))
    }

    // ==================== Simulation ====================

    /// Step the physics simulation with fixed timestep
    pub fn step(&mut self, delta_time: f32) {
        self.accumulated_time += delta_time;

        let mut steps = 0;
        while self.accumulated_time >= self.config.timestep && steps < self.config.max_substeps {
            self.step_internal();
            self.accumulated_time -= self.config.timestep;
            steps += 1;
        }
    }

    /// Internal fixed timestep
    fn step_internal(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.integration_params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &self.hooks,
            &(),
        );
    }

    // ==================== Debug ====================

    /// Get number of rigid bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Get number of colliders
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}
