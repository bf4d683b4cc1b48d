// Copyright @yucwang 2021

pub mod bsdf;
pub mod computation_node;
pub mod emitter;
pub mod film;
pub mod integrator;
pub mod interaction;
pub mod rng;
pub mod scene;
pub mod scene_loader;
pub mod scene_node;
pub mod sensor;
pub mod shape;
