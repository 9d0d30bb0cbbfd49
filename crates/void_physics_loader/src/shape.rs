//! Parsed geometry and fixture descriptors, in physics units

use void_physics2d::{ColliderDesc, ColliderShape, CollisionFilter, PhysicsMaterial};

/// A polygon corner, already divided by the pixel-to-meter ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
}

impl Vertex {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A shape collected for a fixture
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Polygon from `<polygon>` and its `<vertex>` children
    Polygon(Vec<Vertex>),
    /// Circle from a `<circle>` element
    Circle { center: Vertex, radius: f32 },
}

impl Shape {
    /// Engine-side geometry for this shape
    pub fn to_collider_shape(&self) -> ColliderShape {
        match self {
            Shape::Polygon(vertices) => {
                ColliderShape::polygon(vertices.iter().map(|v| [v.x, v.y]).collect())
            }
            Shape::Circle { center, radius } => ColliderShape::circle([center.x, center.y], *radius),
        }
    }
}

/// Material and filter values of one `<fixture>`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixtureDescriptor {
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
    pub is_sensor: bool,
    pub category_bits: i16,
    pub mask_bits: i16,
    pub group_index: i16,
}

impl FixtureDescriptor {
    /// Surface properties
    pub fn material(&self) -> PhysicsMaterial {
        PhysicsMaterial::new(self.density, self.friction, self.restitution)
    }

    /// Collision filter
    pub fn filter(&self) -> CollisionFilter {
        CollisionFilter::from_signed(self.category_bits, self.mask_bits, self.group_index)
    }

    /// Collider description combining these values with one shape
    pub fn collider_desc(&self, shape: &Shape) -> ColliderDesc {
        ColliderDesc::new(shape.to_collider_shape())
            .with_material(self.material())
            .with_filter(self.filter())
            .with_sensor(self.is_sensor)
    }
}
