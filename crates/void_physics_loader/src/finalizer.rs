//! Commits a parsed body into the physics scene

use crate::builder::PendingBody;
use crate::config::LoaderConfig;
use crate::debug::DebugObserver;
use crate::error::Result;
use crate::scene::{PhysicsConnector, PhysicsScene};
use crate::shape::{FixtureDescriptor, Shape};
use crate::visual::{BodyChangedListener, SharedVisual};
use void_physics2d::{ColliderHandle, RigidBodyDesc, RigidBodyHandle, RigidBodyType};

/// One collider created from a descriptor and a shape
#[derive(Debug, Clone, PartialEq)]
pub struct CommittedFixture {
    pub descriptor: FixtureDescriptor,
    pub shape: Shape,
    pub collider: ColliderHandle,
}

/// A body that made it into the physics world
pub struct BodyRecord {
    name: String,
    body_type: RigidBodyType,
    handle: RigidBodyHandle,
    fixtures: Vec<CommittedFixture>,
    visual: SharedVisual,
}

impl BodyRecord {
    /// Name from the document
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn body_type(&self) -> RigidBodyType {
        self.body_type
    }

    pub fn is_dynamic(&self) -> bool {
        self.body_type.is_dynamic()
    }

    /// Handle into the scene's world
    pub fn handle(&self) -> RigidBodyHandle {
        self.handle
    }

    /// Colliders in creation order
    pub fn fixtures(&self) -> &[CommittedFixture] {
        &self.fixtures
    }

    /// Visual linked to this body
    pub fn visual(&self) -> &SharedVisual {
        &self.visual
    }
}

impl std::fmt::Debug for BodyRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BodyRecord")
            .field("name", &self.name)
            .field("body_type", &self.body_type)
            .field("handle", &self.handle)
            .field("fixtures", &self.fixtures)
            .finish_non_exhaustive()
    }
}

/// Everything needed to turn pending bodies into physics objects during one load
pub struct Finalizer<'a> {
    scene: &'a mut PhysicsScene,
    config: &'a LoaderConfig,
    default_visual: SharedVisual,
    listener: Option<&'a mut dyn BodyChangedListener>,
    observer: Option<&'a mut dyn DebugObserver>,
    update_position: bool,
    update_rotation: bool,
}

impl<'a> Finalizer<'a> {
    pub fn new(scene: &'a mut PhysicsScene, config: &'a LoaderConfig, default_visual: SharedVisual) -> Self {
        Self {
            scene,
            config,
            default_visual,
            listener: None,
            observer: None,
            update_position: true,
            update_rotation: true,
        }
    }

    /// Ask `listener` for a visual before committing each body
    pub fn with_listener(mut self, listener: &'a mut dyn BodyChangedListener) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Report every created collider to `observer`
    pub fn with_observer(mut self, observer: &'a mut dyn DebugObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Which parts of the body transform the visual follows
    pub fn with_sync(mut self, update_position: bool, update_rotation: bool) -> Self {
        self.update_position = update_position;
        self.update_rotation = update_rotation;
        self
    }

    fn resolve_visual(&mut self, body_name: &str) -> SharedVisual {
        self.listener
            .as_mut()
            .and_then(|listener| listener.on_body_changed(body_name))
            .unwrap_or_else(|| self.default_visual.clone())
    }

    /// Create the body, its colliders and its visual link.
    ///
    /// Shape group `i` is paired with descriptor `i`; whatever the longer of
    /// the two lists has beyond the shorter one is dropped.
    pub fn commit(&mut self, mut body: PendingBody) -> Result<BodyRecord> {
        body.flush_shapes();
        let PendingBody {
            name,
            body_type,
            fixtures: descriptors,
            shape_groups,
            ..
        } = body;

        let visual = self.resolve_visual(&name);
        let center = visual.read().scene_center();
        let desc = RigidBodyDesc::new(body_type).with_position(
            self.config.to_physics(center[0]),
            self.config.to_physics(center[1]),
        );
        let handle = self.scene.world_mut().create_named_body(name.clone(), desc);

        if descriptors.len() != shape_groups.len() {
            log::debug!(
                "body '{}': {} fixtures but {} shape groups, using the first {}",
                name,
                descriptors.len(),
                shape_groups.len(),
                descriptors.len().min(shape_groups.len())
            );
        }

        let mut fixtures = Vec::new();
        for (descriptor, group) in descriptors.iter().zip(shape_groups) {
            for shape in group {
                let created = self
                    .scene
                    .world_mut()
                    .create_collider(&descriptor.collider_desc(&shape), Some(handle));
                let collider = match created {
                    Ok(collider) => collider,
                    Err(e) => {
                        self.scene.world_mut().remove_rigid_body(handle);
                        return Err(e.into());
                    }
                };

                if let Some(observer) = self.observer.as_mut() {
                    observer.on_fixture_created(&name, center, &shape, collider);
                }
                fixtures.push(CommittedFixture {
                    descriptor: *descriptor,
                    shape,
                    collider,
                });
            }
        }

        visual.write().set_z_index(0);
        self.scene.register_connector(PhysicsConnector::new(
            visual.clone(),
            handle,
            self.update_position,
            self.update_rotation,
            self.config.pixel_to_meter_ratio,
        ));

        log::info!(
            "Created {:?} body '{}' with {} fixtures",
            body_type,
            name,
            fixtures.len()
        );

        Ok(BodyRecord {
            name,
            body_type,
            handle,
            fixtures,
            visual,
        })
    }
}
