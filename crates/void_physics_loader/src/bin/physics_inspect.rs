//! Physics Inspect
//!
//! Loads a PhysicsEditor document into an empty scene and prints the bodies
//! it produced.
//!
//! Run with: cargo run -p void_physics_loader --bin physics-inspect -- <file.xml> [config.json]

use std::process::ExitCode;

use void_physics_loader::prelude::*;

fn main() -> ExitCode {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();

    let mut args = std::env::args().skip(1);
    let Some(document) = args.next() else {
        eprintln!("usage: physics-inspect <file.xml> [config.json]");
        return ExitCode::FAILURE;
    };

    let config = match args.next() {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| LoaderConfig::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to read config '{}': {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => LoaderConfig::default(),
    };
    if let Err(e) = config.validate() {
        log::error!("Invalid config: {}", e);
        return ExitCode::FAILURE;
    }

    let mut scene = PhysicsScene::default();
    let mut loader = PhysicsEditorLoader::new(config.clone());
    let mut outlines = OutlineRecorder::new(config.pixel_to_meter_ratio);
    let sprite = share(Sprite::new(0.0, 0.0, 0.0, 0.0));

    if let Err(e) = loader.load_debug(
        DocumentSource::Asset(&document),
        &mut scene,
        sprite,
        true,
        true,
        &mut outlines,
    ) {
        log::error!("{}", e);
        return ExitCode::FAILURE;
    }

    println!("{} bodies", loader.bodies().len());
    for body in loader.bodies() {
        println!(
            "  {} ({}) - {} fixtures, {} outline segments",
            body.name(),
            if body.is_dynamic() { "dynamic" } else { "static" },
            body.fixtures().len(),
            outlines.segments_for(body.name()).count()
        );
        for fixture in body.fixtures() {
            let d = &fixture.descriptor;
            let shape = match &fixture.shape {
                Shape::Polygon(vertices) => format!("polygon, {} vertices", vertices.len()),
                Shape::Circle { radius, .. } => format!("circle, r = {}", radius),
            };
            println!(
                "    {} | density {} friction {} restitution {} sensor {} | bits {}/{}/{}",
                shape,
                d.density,
                d.friction,
                d.restitution,
                d.is_sensor,
                d.category_bits,
                d.mask_bits,
                d.group_index
            );
        }
    }

    ExitCode::SUCCESS
}
