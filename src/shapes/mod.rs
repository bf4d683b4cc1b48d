// Copyright @yucwang 2026

pub mod disk;
pub mod planar;
pub mod rectangle;
