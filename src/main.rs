// Copyright 2020 TwoCookingMice

use dacquoise_distant::core::scene_loader::load_scene_with_settings;
use dacquoise_distant::integrators::path::{PathIntegrator, DEFAULT_MAX_DEPTH};
use dacquoise_distant::renderers::simple::{ SimpleRenderer, Renderer };

use std::env;
use std::process;

fn parse_flag<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> T {
    match value.and_then(|v| v.parse::<T>().ok()) {
        Some(v) => v,
        None => {
            eprintln!("Invalid or missing value for {}", flag);
            process::exit(1);
        }
    }
}

fn main() {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <scene.xml> [--spp N] [--max-depth N] [--seed N] [--sensor N]", args[0]);
        process::exit(1);
    }

    let input_path = &args[1];
    let mut spp_override: Option<u32> = None;
    let mut max_depth_override: Option<u32> = None;
    let mut seed: u64 = 0;
    let mut sensor_id: usize = 0;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--spp" => {
                i += 1;
                spp_override = Some(parse_flag("--spp", args.get(i)));
            }
            "--max-depth" => {
                i += 1;
                max_depth_override = Some(parse_flag("--max-depth", args.get(i)));
            }
            "--seed" => {
                i += 1;
                seed = parse_flag("--seed", args.get(i));
            }
            "--sensor" => {
                i += 1;
                sensor_id = parse_flag("--sensor", args.get(i));
            }
            other => log::warn!("Ignoring unknown argument {}", other),
        }
        i += 1;
    }

    let load_result = match load_scene_with_settings(input_path) {
        Ok(result) => result,
        Err(e) => {
            log::error!("Failed to load {}: {}", input_path, e);
            process::exit(1);
        }
    };

    let mut scene = load_result.scene;
    let spp = spp_override.or(load_result.samples_per_pixel).unwrap_or(1);
    let max_depth = max_depth_override.or(load_result.max_depth).unwrap_or(DEFAULT_MAX_DEPTH);
    let integrator = Box::new(PathIntegrator::new(max_depth, spp));

    let renderer: SimpleRenderer = SimpleRenderer::new(integrator, sensor_id, seed);
    let image = match renderer.render(&mut scene) {
        Ok(image) => image,
        Err(e) => {
            log::error!("{}", e);
            process::exit(1);
        }
    };

    for y in 0..image.height() {
        for x in 0..image.width() {
            let value = image[(x, y)];
            println!("{} {} {}", value.x, value.y, value.z);
        }
    }
}
