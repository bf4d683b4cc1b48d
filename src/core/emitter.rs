// Copyright @yucwang 2026

use crate::core::computation_node::ComputationNode;
use crate::core::interaction::SurfaceIntersection;
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::spectrum::RGBSpectrum;

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EmitterFlag: u8 {
        const DIRECTION = 1 << 0;
        const DELTA = 1 << 1;
    }
}

/// Illumination arriving at a reference point.
pub struct EmitterSample {
    /// Unit direction from the reference point towards the emitter.
    pub wi: Vector3f,
    /// Irradiance (delta emitters) or radiance carried along `wi`.
    pub value: RGBSpectrum,
    pub pdf: Float,
    pub is_delta: bool,
}

pub trait Emitter: ComputationNode + Send + Sync {
    fn get_flag(&self) -> EmitterFlag;
    fn sample_direction(&self, u: &Vector2f, reference: &SurfaceIntersection) -> EmitterSample;
}
