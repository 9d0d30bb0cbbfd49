//! Physics scene: a world plus the links that keep visuals on their bodies

use crate::visual::SharedVisual;
use void_physics2d::{PhysicsConfig, PhysicsWorld, RigidBodyHandle};

/// Keeps a visual's transform following a body
pub struct PhysicsConnector {
    visual: SharedVisual,
    body: RigidBodyHandle,
    update_position: bool,
    update_rotation: bool,
    pixel_to_meter_ratio: f32,
}

impl PhysicsConnector {
    pub fn new(
        visual: SharedVisual,
        body: RigidBodyHandle,
        update_position: bool,
        update_rotation: bool,
        pixel_to_meter_ratio: f32,
    ) -> Self {
        Self {
            visual,
            body,
            update_position,
            update_rotation,
            pixel_to_meter_ratio,
        }
    }

    /// The linked body
    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    /// The linked visual
    pub fn visual(&self) -> &SharedVisual {
        &self.visual
    }

    /// Copy the body's transform onto the visual
    fn sync(&self, world: &PhysicsWorld) {
        if !self.update_position && !self.update_rotation {
            return;
        }
        let (Ok(position), Ok(angle)) = (
            world.get_body_position(self.body),
            world.get_body_rotation(self.body),
        ) else {
            return;
        };

        let mut visual = self.visual.write();
        if self.update_position {
            let ratio = self.pixel_to_meter_ratio;
            visual.set_scene_center([position[0] * ratio, position[1] * ratio]);
        }
        if self.update_rotation {
            visual.set_rotation(angle.to_degrees());
        }
    }
}

impl std::fmt::Debug for PhysicsConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhysicsConnector")
            .field("body", &self.body)
            .field("update_position", &self.update_position)
            .field("update_rotation", &self.update_rotation)
            .field("pixel_to_meter_ratio", &self.pixel_to_meter_ratio)
            .finish_non_exhaustive()
    }
}

/// A physics world together with its visual connectors
pub struct PhysicsScene {
    world: PhysicsWorld,
    connectors: Vec<PhysicsConnector>,
}

impl PhysicsScene {
    /// Create a scene with a fresh world
    pub fn new(config: PhysicsConfig) -> Self {
        Self::with_world(PhysicsWorld::new(config))
    }

    /// Wrap an existing world
    pub fn with_world(world: PhysicsWorld) -> Self {
        Self {
            world,
            connectors: Vec::new(),
        }
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }

    /// Add a visual-to-body link
    pub fn register_connector(&mut self, connector: PhysicsConnector) {
        self.connectors.push(connector);
    }

    /// All registered links
    pub fn connectors(&self) -> &[PhysicsConnector] {
        &self.connectors
    }

    /// Link for a body, if one was registered
    pub fn connector_for_body(&self, body: RigidBodyHandle) -> Option<&PhysicsConnector> {
        self.connectors.iter().find(|c| c.body == body)
    }

    /// Drop the links of a body and remove it from the world
    pub fn remove_body(&mut self, body: RigidBodyHandle) {
        self.connectors.retain(|c| c.body != body);
        self.world.remove_rigid_body(body);
    }

    /// Step the world, then move every linked visual
    pub fn step(&mut self, delta_time: f32) {
        self.world.step(delta_time);
        self.sync_connectors();
    }

    /// Copy body transforms onto linked visuals
    pub fn sync_connectors(&self) {
        for connector in &self.connectors {
            connector.sync(&self.world);
        }
    }
}

impl Default for PhysicsScene {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}
