//! PhysicsEditor loader
//!
//! Entry point tying the dispatcher, the scene builder and the finalizer
//! together. One loader can serve many documents; committed bodies accumulate
//! until a document's `<bodies>` element or [`PhysicsEditorLoader::reset`]
//! clears them.

use crate::builder::{BuildSession, SceneBuilder};
use crate::config::LoaderConfig;
use crate::debug::DebugObserver;
use crate::document::ElementDispatcher;
use crate::error::{LoaderError, Result};
use crate::finalizer::{BodyRecord, Finalizer};
use crate::scene::PhysicsScene;
use crate::tags::Tag;
use crate::visual::{BodyChangedListener, SharedVisual};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Where a document comes from
#[derive(Debug, Clone, Copy)]
pub enum DocumentSource<'a> {
    /// File name resolved against the loader's asset base path
    Asset(&'a str),
    /// Document text
    Text(&'a str),
    /// Raw document bytes
    Bytes(&'a [u8]),
}

impl DocumentSource<'_> {
    fn describe(&self) -> String {
        match self {
            DocumentSource::Asset(name) => format!("asset '{}'", name),
            DocumentSource::Text(text) => format!("text ({} bytes)", text.len()),
            DocumentSource::Bytes(bytes) => format!("bytes ({} bytes)", bytes.len()),
        }
    }
}

/// Loads PhysicsEditor body documents into a [`PhysicsScene`]
pub struct PhysicsEditorLoader {
    config: LoaderConfig,
    asset_base_path: PathBuf,
    dispatcher: ElementDispatcher,
    builder: SceneBuilder,
    listener: Option<Box<dyn BodyChangedListener>>,
}

impl PhysicsEditorLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            builder: SceneBuilder::new(config.clone()),
            config,
            asset_base_path: PathBuf::new(),
            dispatcher: ElementDispatcher::with_tags(Tag::HANDLED),
            listener: None,
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Directory that [`DocumentSource::Asset`] names are relative to
    pub fn set_asset_base_path(&mut self, path: impl Into<PathBuf>) {
        self.asset_base_path = path.into();
    }

    pub fn asset_base_path(&self) -> &Path {
        &self.asset_base_path
    }

    /// Ask `listener` for a visual each time a body is committed
    pub fn set_body_changed_listener(&mut self, listener: Box<dyn BodyChangedListener>) {
        self.listener = Some(listener);
    }

    pub fn clear_body_changed_listener(&mut self) {
        self.listener = None;
    }

    /// Load a document, creating its bodies in `scene`.
    ///
    /// Each body is positioned at the center of its visual (the listener's,
    /// or `visual` if there is no listener or it returns `None`), and the
    /// visual follows the body as selected by `update_position` and
    /// `update_rotation`. The first error aborts the load; bodies committed
    /// before it stay in the scene.
    pub fn load(
        &mut self,
        source: DocumentSource<'_>,
        scene: &mut PhysicsScene,
        visual: SharedVisual,
        update_position: bool,
        update_rotation: bool,
    ) -> Result<()> {
        self.load_with(source, scene, visual, update_position, update_rotation, None)
    }

    /// Like [`load`](Self::load), also reporting every created collider to `observer`
    pub fn load_debug(
        &mut self,
        source: DocumentSource<'_>,
        scene: &mut PhysicsScene,
        visual: SharedVisual,
        update_position: bool,
        update_rotation: bool,
        observer: &mut dyn DebugObserver,
    ) -> Result<()> {
        self.load_with(
            source,
            scene,
            visual,
            update_position,
            update_rotation,
            Some(observer),
        )
    }

    fn load_with(
        &mut self,
        source: DocumentSource<'_>,
        scene: &mut PhysicsScene,
        visual: SharedVisual,
        update_position: bool,
        update_rotation: bool,
        observer: Option<&mut dyn DebugObserver>,
    ) -> Result<()> {
        if let Err(e) = self.config.validate() {
            log::warn!("Refusing to load {}: {}", source.describe(), e);
            return Err(e);
        }

        if let Some(pending) = self.builder.pending() {
            log::warn!(
                "Discarding body '{}' left over from a failed load",
                pending.name()
            );
            self.builder.discard_pending();
        }

        let mut finalizer =
            Finalizer::new(scene, &self.config, visual).with_sync(update_position, update_rotation);
        if let Some(listener) = self.listener.as_mut() {
            finalizer = finalizer.with_listener(&mut **listener);
        }
        if let Some(observer) = observer {
            finalizer = finalizer.with_observer(observer);
        }

        let before = self.builder.bodies().len();
        let mut session = BuildSession::new(&mut self.builder, finalizer);
        let result = match source {
            DocumentSource::Asset(name) => {
                let path = self.asset_base_path.join(name);
                match File::open(&path) {
                    Ok(file) => self.dispatcher.dispatch_reader(BufReader::new(file), &mut session),
                    Err(source) => Err(LoaderError::Io {
                        path: path.display().to_string(),
                        source,
                    }),
                }
            }
            DocumentSource::Text(text) => self.dispatcher.dispatch_str(text, &mut session),
            DocumentSource::Bytes(bytes) => self.dispatcher.dispatch_reader(bytes, &mut session),
        };
        drop(session);

        match &result {
            Ok(()) => log::info!(
                "Loaded {} bodies from {}",
                self.builder.bodies().len().saturating_sub(before),
                source.describe()
            ),
            Err(e) => log::warn!("Failed to load bodies from {}: {}", source.describe(), e),
        }
        result
    }

    /// Bodies committed so far, in document order
    pub fn bodies(&self) -> &[BodyRecord] {
        self.builder.bodies()
    }

    /// Committed body by its document name
    pub fn body(&self, name: &str) -> Option<&BodyRecord> {
        self.builder.body(name)
    }

    /// Forget the pending body and every committed body.
    ///
    /// Bodies already created in a scene are left there.
    pub fn reset(&mut self) {
        self.builder.reset();
    }
}

impl Default for PhysicsEditorLoader {
    fn default() -> Self {
        Self::new(LoaderConfig::default())
    }
}

impl std::fmt::Debug for PhysicsEditorLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhysicsEditorLoader")
            .field("config", &self.config)
            .field("asset_base_path", &self.asset_base_path)
            .field("bodies", &self.builder.bodies().len())
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visual::{share, Sprite};

    const TWO_BODIES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<bodydef version="1.0">
  <bodies>
    <body name="left" dynamic="true">
      <fixtures>
        <fixture density="1" friction="0.5" restitution="0" isSensor="false"
                 filter_categoryBits="1" filter_maskBits="65535" filter_groupIndex="0">
          <circle x="0" y="0" r="16"/>
        </fixture>
      </fixtures>
    </body>
    <body name="right" dynamic="false">
      <fixtures>
        <fixture density="0" friction="0.2" restitution="0" isSensor="false"
                 filter_categoryBits="1" filter_maskBits="65535" filter_groupIndex="0">
          <polygons>
            <polygon>
              <vertex x="0" y="0"/><vertex x="64" y="0"/><vertex x="64" y="32"/>
            </polygon>
          </polygons>
        </fixture>
      </fixtures>
    </body>
  </bodies>
  <metadata><format>1</format><ptm_ratio>32</ptm_ratio></metadata>
</bodydef>"#;

    fn sprite() -> SharedVisual {
        share(Sprite::new(0.0, 0.0, 32.0, 32.0))
    }

    #[test]
    fn test_bodies_in_document_order() {
        let mut loader = PhysicsEditorLoader::default();
        let mut scene = PhysicsScene::default();

        loader
            .load(DocumentSource::Text(TWO_BODIES), &mut scene, sprite(), true, true)
            .unwrap();

        let names: Vec<_> = loader.bodies().iter().map(|b| b.name()).collect();
        assert_eq!(names, vec!["left", "right"]);
        assert!(loader.body("left").unwrap().is_dynamic());
        assert!(!loader.body("right").unwrap().is_dynamic());
        assert!(loader.body("missing").is_none());
        assert_eq!(scene.world().body_count(), 2);
        assert_eq!(scene.connectors().len(), 2);
    }

    #[test]
    fn test_bytes_source() {
        let mut loader = PhysicsEditorLoader::default();
        let mut scene = PhysicsScene::default();

        loader
            .load(DocumentSource::Bytes(TWO_BODIES.as_bytes()), &mut scene, sprite(), true, true)
            .unwrap();

        assert_eq!(loader.bodies().len(), 2);
    }

    #[test]
    fn test_missing_asset_is_io_error() {
        let mut loader = PhysicsEditorLoader::default();
        loader.set_asset_base_path("/nonexistent/physics");
        let mut scene = PhysicsScene::default();

        let err = loader
            .load(DocumentSource::Asset("bodies.xml"), &mut scene, sprite(), true, true)
            .unwrap_err();

        match err {
            LoaderError::Io { path, .. } => assert!(path.ends_with("bodies.xml")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_failed_load_leftovers_are_discarded() {
        let mut loader = PhysicsEditorLoader::default();
        let mut scene = PhysicsScene::default();
        let broken = r#"<bodies><body name="half" dynamic="true"><vertex x="1" y="1"/></body></bodies>"#;

        assert!(loader
            .load(DocumentSource::Text(broken), &mut scene, sprite(), true, true)
            .is_err());

        loader
            .load(DocumentSource::Text(TWO_BODIES), &mut scene, sprite(), true, true)
            .unwrap();

        assert!(loader.body("half").is_none());
        assert_eq!(loader.bodies().len(), 2);
    }

    #[test]
    fn test_zero_ratio_fails_before_reading() {
        let mut loader = PhysicsEditorLoader::new(LoaderConfig::default().with_ratio(0.0));
        let mut scene = PhysicsScene::default();

        let err = loader
            .load(DocumentSource::Text(TWO_BODIES), &mut scene, sprite(), true, true)
            .unwrap_err();

        assert!(matches!(err, LoaderError::InvalidConfig(_)));
        assert_eq!(scene.world().body_count(), 0);
    }

    #[test]
    fn test_reset_forgets_bodies() {
        let mut loader = PhysicsEditorLoader::default();
        let mut scene = PhysicsScene::default();
        loader
            .load(DocumentSource::Text(TWO_BODIES), &mut scene, sprite(), true, true)
            .unwrap();

        loader.reset();

        assert!(loader.bodies().is_empty());
        assert_eq!(scene.world().body_count(), 2);
    }
}
