// Copyright @yucwang 2021

use crate::core::scene::Scene;
use crate::math::bitmap::Bitmap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("scene has no sensor with index {0}")]
    MissingSensor(usize),
}

pub trait Renderer {
    fn render(&self, scene: &mut Scene) -> Result<Bitmap, RenderError>;
}
