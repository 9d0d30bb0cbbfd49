//! Debug observers for `load_debug`

use crate::shape::Shape;
use void_physics2d::ColliderHandle;

/// Told about every collider the finalizer creates
pub trait DebugObserver {
    /// `body_center` is the body's initial position in scene pixels
    fn on_fixture_created(&mut self, body_name: &str, body_center: [f32; 2], shape: &Shape, collider: ColliderHandle);
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl DebugObserver for NoopObserver {
    fn on_fixture_created(&mut self, _: &str, _: [f32; 2], _: &Shape, _: ColliderHandle) {}
}

/// A line to draw, in scene pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlineSegment {
    pub from: [f32; 2],
    pub to: [f32; 2],
}

/// Records shape outlines as closed loops of line segments for debug drawing
#[derive(Debug, Clone)]
pub struct OutlineRecorder {
    pixel_to_meter_ratio: f32,
    circle_segments: usize,
    segments: Vec<(String, OutlineSegment)>,
}

impl OutlineRecorder {
    pub fn new(pixel_to_meter_ratio: f32) -> Self {
        Self {
            pixel_to_meter_ratio,
            circle_segments: 16,
            segments: Vec::new(),
        }
    }

    /// Number of segments used to approximate circles (at least 3)
    pub fn with_circle_segments(mut self, segments: usize) -> Self {
        self.circle_segments = segments.max(3);
        self
    }

    /// All recorded segments
    pub fn segments(&self) -> impl Iterator<Item = &OutlineSegment> {
        self.segments.iter().map(|(_, segment)| segment)
    }

    /// Segments recorded for one body
    pub fn segments_for<'a>(&'a self, body_name: &'a str) -> impl Iterator<Item = &'a OutlineSegment> + 'a {
        self.segments
            .iter()
            .filter(move |(name, _)| name == body_name)
            .map(|(_, segment)| segment)
    }

    fn push_loop(&mut self, body_name: &str, points: &[[f32; 2]]) {
        for (i, from) in points.iter().enumerate() {
            let to = points[(i + 1) % points.len()];
            self.segments.push((
                body_name.to_string(),
                OutlineSegment { from: *from, to },
            ));
        }
    }
}

impl DebugObserver for OutlineRecorder {
    fn on_fixture_created(&mut self, body_name: &str, body_center: [f32; 2], shape: &Shape, _: ColliderHandle) {
        let ratio = self.pixel_to_meter_ratio;
        let to_scene = |x: f32, y: f32| [body_center[0] + x * ratio, body_center[1] + y * ratio];

        let points: Vec<[f32; 2]> = match shape {
            Shape::Polygon(vertices) => vertices.iter().map(|v| to_scene(v.x, v.y)).collect(),
            Shape::Circle { center, radius } => (0..self.circle_segments)
                .map(|i| {
                    let angle = std::f32::consts::TAU * i as f32 / self.circle_segments as f32;
                    to_scene(center.x + radius * angle.cos(), center.y + radius * angle.sin())
                })
                .collect(),
        };

        if points.len() >= 2 {
            self.push_loop(body_name, &points);
        }
    }
}
