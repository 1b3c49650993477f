use std::{env, error::Error, path::Path, str::FromStr};

use hecs::{Entity, World};
use log::{info, warn};

use rs_narrowphase::{
    collision::PhysicsWorld,
    log_err,
    scene::{Name, SceneDescription, system_movement},
};

struct Options {
    scene_path: Option<String>,
    ticks: u32,
    dt: f32,
}

fn parse_value<T: FromStr>(value: Option<&String>, target: &mut T) -> Result<(), String> {
    let value = value.ok_or("Missing value")?;
    *target = value
        .parse()
        .map_err(|_| format!("Could not parse '{value}'"))?;
    Ok(())
}

fn parse_options() -> Options {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut options = Options {
        scene_path: None,
        ticks: 60,
        dt: 0.1,
    };
    let mut args = args.iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--ticks" | "-t" => log_err!(
                parse_value(args.next(), &mut options.ticks),
                "Invalid --ticks: {err}"
            ),
            "--dt" => log_err!(
                parse_value(args.next(), &mut options.dt),
                "Invalid --dt: {err}"
            ),
            path if options.scene_path.is_none() => options.scene_path = Some(path.to_string()),
            other => warn!("Ignoring argument {other}"),
        }
    }
    options
}

fn name(world: &World, entity: Entity) -> String {
    world
        .get::<&Name>(entity)
        .map(|name| name.0.clone())
        .unwrap_or_else(|_| format!("{entity:?}"))
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let options = parse_options();

    let description = match &options.scene_path {
        Some(path) => {
            info!("Loading scene {path}");
            SceneDescription::from_path(Path::new(path))?
        }
        None => {
            info!("No scene given, running approaching spheres demo");
            SceneDescription::approaching_spheres()
        }
    };

    let mut world = World::new();
    let entities = description.spawn(&mut world)?;
    info!("Spawned {} bodies", entities.len());

    let mut physics = PhysicsWorld::new(description.gjk);
    for tick in 0..options.ticks {
        system_movement(&mut world, options.dt);
        for event in physics.update(&world) {
            info!(
                "Tick {tick}: {:?} {} <-> {}",
                event.kind,
                name(&world, event.a),
                name(&world, event.b)
            );
        }
    }
    info!(
        "{} collision records after {} ticks, {} pairs tested in the last tick",
        physics.len(),
        options.ticks,
        physics.pairs_tested_last_tick()
    );
    Ok(())
}
