//! Visual shapes attached to loaded bodies

use parking_lot::RwLock;
use std::sync::Arc;

/// A renderable whose transform can follow a physics body.
///
/// Coordinates are scene pixels; rotation is in degrees.
pub trait VisualShape: Send + Sync {
    /// Center of the shape in scene coordinates
    fn scene_center(&self) -> [f32; 2];

    /// Move the shape so its center lands on `center`
    fn set_scene_center(&mut self, center: [f32; 2]);

    /// Set the rotation around the center
    fn set_rotation(&mut self, degrees: f32);

    /// Set the draw order
    fn set_z_index(&mut self, z_index: i32);
}

/// Visual shared between the caller, the loader and the scene's connectors
pub type SharedVisual = Arc<RwLock<dyn VisualShape>>;

/// Wrap a visual for sharing
pub fn share<V: VisualShape + 'static>(visual: V) -> SharedVisual {
    Arc::new(RwLock::new(visual))
}

/// Supplies a visual for each body as it is committed.
///
/// Returning `None` keeps the visual passed to `load`.
pub trait BodyChangedListener {
    fn on_body_changed(&mut self, body_name: &str) -> Option<SharedVisual>;
}

impl<F> BodyChangedListener for F
where
    F: FnMut(&str) -> Option<SharedVisual>,
{
    fn on_body_changed(&mut self, body_name: &str) -> Option<SharedVisual> {
        self(body_name)
    }
}

/// Axis-aligned sprite placed by its top-left corner
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub rotation: f32,
    pub z_index: i32,
}

impl Sprite {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            rotation: 0.0,
            z_index: 0,
        }
    }
}

impl VisualShape for Sprite {
    fn scene_center(&self) -> [f32; 2] {
        [self.x + self.width * 0.5, self.y + self.height * 0.5]
    }

    fn set_scene_center(&mut self, center: [f32; 2]) {
        self.x = center[0] - self.width * 0.5;
        self.y = center[1] - self.height * 0.5;
    }

    fn set_rotation(&mut self, degrees: f32) {
        self.rotation = degrees;
    }

    fn set_z_index(&mut self, z_index: i32) {
        self.z_index = z_index;
    }
}
