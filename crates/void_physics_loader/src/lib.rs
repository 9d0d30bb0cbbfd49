//! Void Physics Loader - PhysicsEditor body documents for Void Physics 2D
//!
//! Reads the XML exported by PhysicsEditor's AndEngine exporter and creates
//! the bodies and colliders it describes in a [`PhysicsScene`], linking each
//! body to a visual that follows it as the simulation runs.
//!
//! # Pipeline
//!
//! - [`document`] decodes the XML into a flat stream of opening elements
//! - [`builder`] infers the body/fixture/shape structure from element order
//! - [`finalizer`] creates the physics objects and visual links per body
//!
//! # Example
//!
//! ```ignore
//! use void_physics_loader::prelude::*;
//!
//! let mut scene = PhysicsScene::default();
//! let mut loader = PhysicsEditorLoader::new(LoaderConfig::default());
//! loader.set_asset_base_path("assets/physics");
//!
//! let sprite = share(Sprite::new(100.0, 50.0, 64.0, 64.0));
//! loader.load(DocumentSource::Asset("crate.xml"), &mut scene, sprite, true, true)?;
//!
//! let body = loader.body("crate").expect("crate body");
//! scene.step(1.0 / 60.0);
//! ```

pub mod builder;
pub mod config;
pub mod debug;
pub mod document;
pub mod error;
pub mod finalizer;
pub mod loader;
pub mod scene;
pub mod shape;
pub mod tags;
pub mod visual;

pub mod prelude {
    //! Common imports for loading bodies
    pub use crate::config::{LoaderConfig, PIXEL_TO_METER_RATIO_DEFAULT};
    pub use crate::debug::{DebugObserver, NoopObserver, OutlineRecorder, OutlineSegment};
    pub use crate::error::{LoaderError, Result};
    pub use crate::finalizer::{BodyRecord, CommittedFixture};
    pub use crate::loader::{DocumentSource, PhysicsEditorLoader};
    pub use crate::scene::{PhysicsConnector, PhysicsScene};
    pub use crate::shape::{FixtureDescriptor, Shape, Vertex};
    pub use crate::visual::{share, BodyChangedListener, SharedVisual, Sprite, VisualShape};
}

pub use prelude::*;
