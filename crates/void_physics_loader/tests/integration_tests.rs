//! Integration tests for void_physics_loader
//!
//! Loads complete documents through the public API and checks the resulting
//! physics scene.

use std::sync::Arc;

use approx::assert_relative_eq;
use parking_lot::RwLock;
use void_physics_loader::*;

const CRATE_DOCUMENT: &str = r#"<bodies><body name="crate" dynamic="true"><fixtures><fixture density="1" restitution="0.2" friction="0.5" isSensor="false" filter_categoryBits="1" filter_maskBits="65535" filter_groupIndex="0"><polygons><polygon><vertex x="0" y="0"/><vertex x="32" y="0"/><vertex x="32" y="32"/></polygon></polygons></fixture></fixtures></body></bodies>"#;

const VEHICLE_DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- created with PhysicsEditor -->
<bodydef version="1.0">
    <bodies>
        <body name="chassis" dynamic="true">
            <fixtures>
                <fixture density="2" friction="0.4" restitution="0.1" isSensor="false"
                         filter_categoryBits="2" filter_maskBits="65535" filter_groupIndex="-1">
                    <fixture_type>POLYGON</fixture_type>
                    <polygons>
                        <polygon>
                            <vertex x="-32" y="-8"/>
                            <vertex x="32" y="-8"/>
                            <vertex x="32" y="8"/>
                            <vertex x="-32" y="8"/>
                        </polygon>
                        <polygon>
                            <vertex x="-16" y="8"/>
                            <vertex x="16" y="8"/>
                            <vertex x="0" y="24"/>
                        </polygon>
                    </polygons>
                </fixture>
                <fixture density="0" friction="0" restitution="0" isSensor="true"
                         filter_categoryBits="4" filter_maskBits="1" filter_groupIndex="0">
                    <fixture_type>CIRCLE</fixture_type>
                    <circle x="0" y="32" r="8"/>
                </fixture>
            </fixtures>
        </body>
        <body name="wheel" dynamic="true">
            <fixtures>
                <fixture density="1" friction="0.9" restitution="0.3" isSensor="false"
                         filter_categoryBits="2" filter_maskBits="65535" filter_groupIndex="-1">
                    <circle x="0" y="0" r="16"/>
                </fixture>
            </fixtures>
        </body>
        <body name="ground" dynamic="false">
            <fixtures>
                <fixture density="0" friction="1" restitution="0" isSensor="false"
                         filter_categoryBits="1" filter_maskBits="65535" filter_groupIndex="0">
                    <polygons>
                        <polygon>
                            <vertex x="-320" y="-16"/>
                            <vertex x="320" y="-16"/>
                            <vertex x="320" y="0"/>
                            <vertex x="-320" y="0"/>
                        </polygon>
                    </polygons>
                </fixture>
            </fixtures>
        </body>
    </bodies>
    <metadata>
        <format>1</format>
        <ptm_ratio>32</ptm_ratio>
    </metadata>
</bodydef>
"#;

fn sprite_at(x: f32, y: f32) -> Arc<RwLock<Sprite>> {
    Arc::new(RwLock::new(Sprite::new(x, y, 32.0, 32.0)))
}

fn load(document: &str, scene: &mut PhysicsScene, visual: SharedVisual) -> (PhysicsEditorLoader, Result<()>) {
    let mut loader = PhysicsEditorLoader::new(LoaderConfig::default());
    let result = loader.load(DocumentSource::Text(document), scene, visual, true, true);
    (loader, result)
}

#[test]
fn test_crate_document_end_to_end() {
    let mut scene = PhysicsScene::default();
    let (loader, result) = load(CRATE_DOCUMENT, &mut scene, share(Sprite::new(0.0, 0.0, 32.0, 32.0)));
    result.unwrap();

    assert_eq!(loader.bodies().len(), 1);
    let body = loader.body("crate").unwrap();
    assert!(body.is_dynamic());
    assert_eq!(body.fixtures().len(), 1);

    let fixture = &body.fixtures()[0];
    assert_eq!(
        fixture.shape,
        Shape::Polygon(vec![
            Vertex::new(0.0, 0.0),
            Vertex::new(1.0, 0.0),
            Vertex::new(1.0, 1.0),
        ])
    );
    assert_relative_eq!(fixture.descriptor.density, 1.0);
    assert_relative_eq!(fixture.descriptor.restitution, 0.2);
    assert_relative_eq!(fixture.descriptor.friction, 0.5);
    assert_eq!(fixture.descriptor.mask_bits, -1);

    let world = scene.world();
    assert_eq!(world.find_body("crate"), Some(body.handle()));
    assert_eq!(world.body_colliders(body.handle()).unwrap(), vec![fixture.collider]);
    let material = world.collider_material(fixture.collider).unwrap();
    assert_relative_eq!(material.friction, 0.5);
    assert!(!world.collider_is_sensor(fixture.collider).unwrap());
}

#[test]
fn test_multi_body_document() {
    let mut scene = PhysicsScene::default();
    let (loader, result) = load(VEHICLE_DOCUMENT, &mut scene, share(Sprite::new(0.0, 0.0, 32.0, 32.0)));
    result.unwrap();

    let names: Vec<_> = loader.bodies().iter().map(|b| b.name()).collect();
    assert_eq!(names, vec!["chassis", "wheel", "ground"]);

    let chassis = loader.body("chassis").unwrap();
    assert_eq!(chassis.fixtures().len(), 3);
    assert!(chassis.fixtures()[2].descriptor.is_sensor);
    assert!(matches!(chassis.fixtures()[2].shape, Shape::Circle { radius, .. } if radius == 0.25));

    let filter = scene.world().collider_filter(chassis.fixtures()[0].collider).unwrap();
    assert_eq!(filter.category_bits, 2);
    assert_eq!(filter.group_index, -1);

    assert!(!loader.body("ground").unwrap().is_dynamic());
    assert!(loader.body("trailer").is_none());
    assert_eq!(scene.world().collider_count(), 5);
}

#[test]
fn test_listener_supplies_visuals_per_body() {
    let mut scene = PhysicsScene::default();
    let fallback = sprite_at(0.0, 0.0);
    let wheel_sprite = sprite_at(304.0, 48.0);

    let mut loader = PhysicsEditorLoader::default();
    let wheel_visual: SharedVisual = wheel_sprite.clone();
    loader.set_body_changed_listener(Box::new(move |name: &str| {
        (name == "wheel").then(|| wheel_visual.clone())
    }));
    loader
        .load(DocumentSource::Text(VEHICLE_DOCUMENT), &mut scene, fallback.clone(), true, true)
        .unwrap();

    let wheel = loader.body("wheel").unwrap();
    let position = scene.world().get_body_position(wheel.handle()).unwrap();
    assert_relative_eq!(position[0], 10.0);
    assert_relative_eq!(position[1], 2.0);

    let chassis = loader.body("chassis").unwrap();
    let position = scene.world().get_body_position(chassis.handle()).unwrap();
    assert_relative_eq!(position[0], 0.5);
    assert_relative_eq!(position[1], 0.5);

    loader.clear_body_changed_listener();
    loader.reset();
    loader
        .load(DocumentSource::Text(CRATE_DOCUMENT), &mut scene, fallback.clone(), true, true)
        .unwrap();
    let crate_body = loader.body("crate").unwrap();
    let fallback_visual: SharedVisual = fallback;
    assert!(Arc::ptr_eq(crate_body.visual(), &fallback_visual));
}

#[test]
fn test_connectors_follow_bodies_after_step() {
    let mut scene = PhysicsScene::default();
    let falling = sprite_at(0.0, 320.0);
    let (loader, result) = load(CRATE_DOCUMENT, &mut scene, falling.clone());
    result.unwrap();

    let start = falling.read().scene_center();
    for _ in 0..30 {
        scene.step(1.0 / 30.0);
    }
    let end = falling.read().scene_center();

    let body = loader.body("crate").unwrap();
    let position = scene.world().get_body_position(body.handle()).unwrap();
    assert!(end[1] < start[1]);
    assert_relative_eq!(end[0], position[0] * 32.0, epsilon = 1e-3);
    assert_relative_eq!(end[1], position[1] * 32.0, epsilon = 1e-3);
}

#[test]
fn test_filter_overflow_aborts_load() {
    let document = CRATE_DOCUMENT.replace(r#"filter_categoryBits="1""#, r#"filter_categoryBits="70000""#);
    let mut scene = PhysicsScene::default();
    let (loader, result) = load(&document, &mut scene, share(Sprite::new(0.0, 0.0, 32.0, 32.0)));

    let err = result.unwrap_err();
    assert!(err.is_bit_overflow());
    assert!(err.to_string().contains("too many bits"));
    assert!(loader.bodies().is_empty());
    assert_eq!(scene.world().body_count(), 0);
}

#[test]
fn test_non_finite_vertices_fail_without_creating_bodies() {
    let document = CRATE_DOCUMENT.replace(
        r#"<vertex x="0" y="0"/><vertex x="32" y="0"/><vertex x="32" y="32"/>"#,
        r#"<vertex x="NaN" y="NaN"/><vertex x="Infinity" y="NaN"/><vertex x="Infinity" y="Infinity"/>"#,
    );
    let mut scene = PhysicsScene::default();
    let (loader, result) = load(&document, &mut scene, share(Sprite::new(0.0, 0.0, 32.0, 32.0)));

    assert!(matches!(result, Err(LoaderError::MalformedNumber { .. })));
    assert!(loader.bodies().is_empty());
    assert_eq!(scene.world().body_count(), 0);
}

#[test]
fn test_zero_ratio_is_rejected() {
    let mut scene = PhysicsScene::default();
    let mut loader = PhysicsEditorLoader::new(LoaderConfig::default().with_ratio(0.0));

    let result = loader.load(
        DocumentSource::Text(CRATE_DOCUMENT),
        &mut scene,
        share(Sprite::new(0.0, 0.0, 32.0, 32.0)),
        true,
        true,
    );

    assert!(matches!(result, Err(LoaderError::InvalidConfig(_))));
    assert_eq!(scene.world().body_count(), 0);
}

#[test]
fn test_empty_polygon_fails_the_load() {
    let document = r#"<bodies>
        <body name="good" dynamic="false">
            <fixture density="1" friction="0" restitution="0" isSensor="false" filter_categoryBits="1" filter_maskBits="65535" filter_groupIndex="0">
                <circle x="0" y="0" r="16"/>
            </fixture>
        </body>
        <body name="hollow" dynamic="true">
            <fixture density="1" friction="0" restitution="0" isSensor="false" filter_categoryBits="1" filter_maskBits="65535" filter_groupIndex="0">
                <polygon></polygon>
            </fixture>
        </body>
    </bodies>"#;
    let mut scene = PhysicsScene::default();
    let (loader, result) = load(document, &mut scene, share(Sprite::new(0.0, 0.0, 32.0, 32.0)));

    assert!(matches!(result, Err(LoaderError::Physics(_))));
    assert!(loader.body("good").is_some());
    assert!(loader.body("hollow").is_none());
    assert_eq!(scene.world().body_count(), 1);
    assert_eq!(scene.connectors().len(), 1);
}

#[test]
fn test_fixture_count_mismatch_truncates() {
    let document = r#"<bodies><body name="odd" dynamic="true">
        <fixture density="1" friction="0" restitution="0" isSensor="false" filter_categoryBits="1" filter_maskBits="65535" filter_groupIndex="0">
            <circle x="0" y="0" r="16"/>
        </fixture>
        <fixture density="2" friction="0" restitution="0" isSensor="false" filter_categoryBits="1" filter_maskBits="65535" filter_groupIndex="0">
            <circle x="32" y="0" r="16"/>
        </fixture>
        <fixture density="3" friction="0" restitution="0" isSensor="false" filter_categoryBits="1" filter_maskBits="65535" filter_groupIndex="0">
        </fixture>
    </body></bodies>"#;
    let mut scene = PhysicsScene::default();
    let (loader, result) = load(document, &mut scene, share(Sprite::new(0.0, 0.0, 32.0, 32.0)));
    result.unwrap();

    let body = loader.body("odd").unwrap();
    assert_eq!(body.fixtures().len(), 2);
    assert_eq!(scene.world().collider_count(), 2);
}

#[test]
fn test_debug_load_records_outlines() {
    let mut scene = PhysicsScene::default();
    let mut loader = PhysicsEditorLoader::default();
    let mut outlines = OutlineRecorder::new(32.0);

    loader
        .load_debug(
            DocumentSource::Text(CRATE_DOCUMENT),
            &mut scene,
            share(Sprite::new(0.0, 0.0, 32.0, 32.0)),
            true,
            true,
            &mut outlines,
        )
        .unwrap();

    let segments: Vec<_> = outlines.segments_for("crate").copied().collect();
    assert_eq!(segments.len(), 3);
    assert_eq!(segments[0].from, [16.0, 16.0]);
    assert_eq!(segments[1].from, [48.0, 16.0]);
}

#[test]
fn test_asset_source_reads_from_base_path() {
    let dir = std::env::temp_dir().join(format!("void_physics_loader_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("crate.xml"), CRATE_DOCUMENT).unwrap();

    let mut scene = PhysicsScene::default();
    let mut loader = PhysicsEditorLoader::default();
    loader.set_asset_base_path(&dir);
    let result = loader.load(
        DocumentSource::Asset("crate.xml"),
        &mut scene,
        share(Sprite::new(0.0, 0.0, 32.0, 32.0)),
        true,
        true,
    );
    std::fs::remove_dir_all(&dir).ok();

    result.unwrap();
    assert!(loader.body("crate").is_some());
}

#[test]
fn test_config_from_json_changes_ratio() {
    let config = LoaderConfig::from_json(r#"{ "pixel_to_meter_ratio": 16.0, "log_fixtures": false }"#).unwrap();
    let mut scene = PhysicsScene::default();
    let mut loader = PhysicsEditorLoader::new(config);

    loader
        .load(
            DocumentSource::Text(CRATE_DOCUMENT),
            &mut scene,
            share(Sprite::new(0.0, 0.0, 32.0, 32.0)),
            true,
            true,
        )
        .unwrap();

    let fixture = &loader.body("crate").unwrap().fixtures()[0];
    assert_eq!(
        fixture.shape,
        Shape::Polygon(vec![
            Vertex::new(0.0, 0.0),
            Vertex::new(2.0, 0.0),
            Vertex::new(2.0, 2.0),
        ])
    );
}
