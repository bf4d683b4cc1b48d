// Copyright @yucwang 2023

use crate::math::constants::{ Float, Vector2f, Vector3f };
use crate::math::spectrum::RGBSpectrum;

// Definitions of types used in BSDF sampling and eval
// processes. Directions are expressed in the local shading frame
// and both point away from the surface.
pub type BSDFValue = RGBSpectrum;

#[derive(Debug, PartialEq)]
pub struct BSDFSampleRecord {
    pub wi: Vector3f,
    pub wo: Vector3f,
    pub pdf: Float,
}

#[derive(Debug, PartialEq)]
pub struct BSDFEvalResult {
    pub value: BSDFValue,
    pub pdf: Float,
}

pub trait BSDF: Send + Sync {
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
    /// BSDF value (without the cosine foreshortening term) and the
    /// density `sample` would have produced `wi` with.
    fn eval(&self, sample_record: &BSDFSampleRecord) -> BSDFEvalResult;
    fn sample(&self, u: &Vector2f, wo: Vector3f) -> BSDFSampleRecord;
    fn sample_and_eval(&self, u: &Vector2f, wo: Vector3f) -> (BSDFSampleRecord, BSDFEvalResult) {
        let sample_record = self.sample(u, wo);
        let eval_result = self.eval(&sample_record);
        (sample_record, eval_result)
    }
}

impl Default for BSDFSampleRecord {
    fn default() -> Self {
        Self {
            wi: Vector3f::zeros(),
            wo: Vector3f::zeros(),
            pdf: 0.0,
        }
    }
}

impl BSDFSampleRecord {
    pub fn new(wi: Vector3f, wo: Vector3f, pdf: Float) -> Self {
        Self { wi, wo, pdf }
    }
}

impl Default for BSDFEvalResult {
    fn default() -> Self {
        Self {
            value: RGBSpectrum::default(),
            pdf: 0.0,
        }
    }
}
