//! Scene builder: the state machine driven by dispatched elements
//!
//! Elements arrive without closing tags, so nesting is inferred from order:
//! a `fixture` closes the shapes collected since the previous `fixture`, a
//! `polygon` closes the previous polygon, and a `body` (or the end of the
//! document) commits everything collected for the previous body.

use crate::config::LoaderConfig;
use crate::document::{Element, ElementHandler};
use crate::error::{LoaderError, Result};
use crate::finalizer::{BodyRecord, Finalizer};
use crate::shape::{FixtureDescriptor, Shape, Vertex};
use crate::tags::{attr, Tag};
use void_physics2d::RigidBodyType;

/// Everything collected for the body currently being read
#[derive(Debug, Clone, PartialEq)]
pub struct PendingBody {
    pub(crate) name: String,
    pub(crate) body_type: RigidBodyType,
    pub(crate) fixtures: Vec<FixtureDescriptor>,
    pub(crate) shape_groups: Vec<Vec<Shape>>,
    pub(crate) current_group: Vec<Shape>,
    pub(crate) open_polygon: Option<Vec<Vertex>>,
}

impl PendingBody {
    pub fn new(name: impl Into<String>, body_type: RigidBodyType) -> Self {
        Self {
            name: name.into(),
            body_type,
            fixtures: Vec::new(),
            shape_groups: Vec::new(),
            current_group: Vec::new(),
            open_polygon: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn body_type(&self) -> RigidBodyType {
        self.body_type
    }

    /// Descriptors in declaration order
    pub fn fixtures(&self) -> &[FixtureDescriptor] {
        &self.fixtures
    }

    /// Shape groups closed so far
    pub fn shape_groups(&self) -> &[Vec<Shape>] {
        &self.shape_groups
    }

    /// Shapes collected since the last closed group
    pub fn current_group(&self) -> &[Shape] {
        &self.current_group
    }

    /// Vertices of the polygon being read, if one is open
    pub fn open_polygon(&self) -> Option<&[Vertex]> {
        self.open_polygon.as_deref()
    }

    pub fn has_fixtures(&self) -> bool {
        !self.fixtures.is_empty()
    }

    /// Move the open polygon, if any, into the current group
    fn flush_polygon(&mut self) {
        if let Some(vertices) = self.open_polygon.take() {
            if vertices.is_empty() {
                log::warn!("body '{}': polygon without vertices", self.name);
            }
            self.current_group.push(Shape::Polygon(vertices));
        }
    }

    /// Close the current group if it holds anything
    fn commit_group(&mut self) {
        if !self.current_group.is_empty() {
            self.shape_groups.push(std::mem::take(&mut self.current_group));
        }
    }

    /// Close the open polygon and the current group
    pub(crate) fn flush_shapes(&mut self) {
        self.flush_polygon();
        self.commit_group();
    }
}

/// Builder state between elements
#[derive(Debug, Clone, PartialEq, Default)]
enum BuildState {
    #[default]
    NoBodyPending,
    Accumulating(PendingBody),
}

/// Turns dispatched elements into committed bodies
#[derive(Debug)]
pub struct SceneBuilder {
    config: LoaderConfig,
    state: BuildState,
    bodies: Vec<BodyRecord>,
}

impl SceneBuilder {
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            config,
            state: BuildState::NoBodyPending,
            bodies: Vec::new(),
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Committed bodies in document order
    pub fn bodies(&self) -> &[BodyRecord] {
        &self.bodies
    }

    /// Committed body by its document name
    pub fn body(&self, name: &str) -> Option<&BodyRecord> {
        self.bodies.iter().find(|body| body.name() == name)
    }

    /// Body currently being read
    pub fn pending(&self) -> Option<&PendingBody> {
        match &self.state {
            BuildState::Accumulating(body) => Some(body),
            BuildState::NoBodyPending => None,
        }
    }

    /// Throw away a half-read body; returns whether there was one
    pub fn discard_pending(&mut self) -> bool {
        matches!(
            std::mem::take(&mut self.state),
            BuildState::Accumulating(_)
        )
    }

    /// Clear the pending body and every committed body
    pub fn reset(&mut self) {
        self.state = BuildState::NoBodyPending;
        self.bodies.clear();
    }

    /// React to one element
    pub fn handle_element(&mut self, element: &Element, finalizer: &mut Finalizer<'_>) -> Result<()> {
        match element.tag() {
            Some(Tag::Bodies) => {
                self.bodies.clear();
                Ok(())
            }
            Some(Tag::Body) => self.begin_body(element, finalizer),
            Some(Tag::Fixture) => self.add_fixture(element),
            Some(Tag::Polygon) => {
                let body = self.pending_mut(element)?;
                body.flush_polygon();
                body.open_polygon = Some(Vec::new());
                Ok(())
            }
            Some(Tag::Vertex) => self.add_vertex(element),
            Some(Tag::Circle) => self.add_circle(element),
            // descriptive metadata, nothing to build from it
            _ => Ok(()),
        }
    }

    /// End of document: commit whatever is pending
    pub fn finish(&mut self, finalizer: &mut Finalizer<'_>) -> Result<()> {
        self.finalize_pending(finalizer).map(|_| ())
    }

    /// Commit the pending body if it declared any fixture.
    ///
    /// Returns whether a body was created; calling it again without new
    /// fixtures in between does nothing.
    pub fn finalize_pending(&mut self, finalizer: &mut Finalizer<'_>) -> Result<bool> {
        match std::mem::take(&mut self.state) {
            BuildState::Accumulating(body) if body.has_fixtures() => {
                let record = finalizer.commit(body)?;
                self.bodies.push(record);
                Ok(true)
            }
            other => {
                self.state = other;
                Ok(false)
            }
        }
    }

    fn pending_mut(&mut self, element: &Element) -> Result<&mut PendingBody> {
        match &mut self.state {
            BuildState::Accumulating(body) => Ok(body),
            BuildState::NoBodyPending => Err(LoaderError::structural(element.name(), "no open <body>")),
        }
    }

    fn begin_body(&mut self, element: &Element, finalizer: &mut Finalizer<'_>) -> Result<()> {
        self.finalize_pending(finalizer)?;

        let name = element.required_str(attr::NAME)?;
        // PhysicsEditor has no kinematic flag
        let dynamic = element.required_bool(attr::DYNAMIC)?;

        if let BuildState::Accumulating(dropped) = &self.state {
            log::debug!("body '{}' declared no fixtures, skipping it", dropped.name);
        }
        self.state = BuildState::Accumulating(PendingBody::new(
            name,
            RigidBodyType::from_dynamic_flag(dynamic),
        ));
        Ok(())
    }

    fn add_fixture(&mut self, element: &Element) -> Result<()> {
        let descriptor = FixtureDescriptor {
            density: element.required_f32(attr::DENSITY)?,
            restitution: element.required_f32(attr::RESTITUTION)?,
            friction: element.required_f32(attr::FRICTION)?,
            is_sensor: element.required_bool(attr::IS_SENSOR)?,
            category_bits: element.required_filter_bits(attr::FILTER_CATEGORY_BITS)?,
            mask_bits: element.required_filter_bits(attr::FILTER_MASK_BITS)?,
            group_index: element.required_filter_bits(attr::FILTER_GROUP_INDEX)?,
        };

        if self.config.log_fixtures {
            log::debug!(
                "density = {}, restitution = {}, friction = {}, isSensor = {}, \
                 categoryBits = {}, maskBits = {}, groupIndex = {}",
                descriptor.density,
                descriptor.restitution,
                descriptor.friction,
                descriptor.is_sensor,
                descriptor.category_bits,
                descriptor.mask_bits,
                descriptor.group_index
            );
        }

        let body = self.pending_mut(element)?;
        body.flush_shapes();
        body.fixtures.push(descriptor);
        Ok(())
    }

    fn add_vertex(&mut self, element: &Element) -> Result<()> {
        let x = self.config.to_physics(element.required_f32(attr::X)?);
        let y = self.config.to_physics(element.required_f32(attr::Y)?);

        let polygon = self
            .pending_mut(element)?
            .open_polygon
            .as_mut()
            .ok_or_else(|| LoaderError::structural(element.name(), "no open <polygon>"))?;
        polygon.push(Vertex::new(x, y));
        Ok(())
    }

    fn add_circle(&mut self, element: &Element) -> Result<()> {
        let x = self.config.to_physics(element.required_f32(attr::X)?);
        let y = self.config.to_physics(element.required_f32(attr::Y)?);
        let radius = self.config.to_physics(element.required_f32(attr::R)?);

        self.pending_mut(element)?.current_group.push(Shape::Circle {
            center: Vertex::new(x, y),
            radius,
        });
        Ok(())
    }
}

/// Feeds dispatched elements to a builder for the duration of one load
pub struct BuildSession<'b, 'f> {
    builder: &'b mut SceneBuilder,
    finalizer: Finalizer<'f>,
}

impl<'b, 'f> BuildSession<'b, 'f> {
    pub fn new(builder: &'b mut SceneBuilder, finalizer: Finalizer<'f>) -> Self {
        Self { builder, finalizer }
    }
}

impl ElementHandler for BuildSession<'_, '_> {
    fn on_element(&mut self, element: &Element) -> Result<()> {
        self.builder.handle_element(element, &mut self.finalizer)
    }

    fn on_end_document(&mut self) -> Result<()> {
        self.builder.finish(&mut self.finalizer)
    }
}
