// Copyright @yucwang 2021

pub extern crate nalgebra as na;

pub mod core;
pub mod emitters;
pub mod integrators;
pub mod materials;
pub mod math;
pub mod renderers;
pub mod sensors;
pub mod shapes;
