// Copyright @yucwang 2023

use crate::core::bsdf::{BSDFSampleRecord, BSDFEvalResult, BSDF};
use crate::math::constants::{ INV_PI, Vector2f, Vector3f };
use crate::math::frame::Frame;
use crate::math::spectrum::RGBSpectrum;
use crate::math::warp::{ square_to_cosine_hemisphere, square_to_cosine_hemisphere_pdf };

/// One-sided Lambertian reflector: only the hemisphere around +z reflects.
pub struct LambertianDiffuseBSDF {
    reflectance: RGBSpectrum
}

impl BSDF for LambertianDiffuseBSDF {
    fn eval(&self, sample_record: &BSDFSampleRecord) -> BSDFEvalResult {
        let cos_theta_i = Frame::cos_theta(&sample_record.wi);
        let cos_theta_o = Frame::cos_theta(&sample_record.wo);
        if cos_theta_i <= 0.0 || cos_theta_o <= 0.0 {
            return BSDFEvalResult::default();
        }

        BSDFEvalResult {
            value: self.reflectance * INV_PI,
            pdf: square_to_cosine_hemisphere_pdf(&sample_record.wi),
        }
    }

    fn sample(&self, u: &Vector2f, wo: Vector3f) -> BSDFSampleRecord {
        if Frame::cos_theta(&wo) <= 0.0 {
            return BSDFSampleRecord::default();
        }

        let wi = square_to_cosine_hemisphere(u);
        let pdf = square_to_cosine_hemisphere_pdf(&wi);
        BSDFSampleRecord::new(wi, wo, pdf)
    }
}

impl LambertianDiffuseBSDF {
    pub fn new(reflectance: RGBSpectrum) -> Self {
        Self { reflectance }
    }

    pub fn reflectance(&self) -> RGBSpectrum {
        self.reflectance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_lambertian_eval() {
        let bsdf = LambertianDiffuseBSDF::new(RGBSpectrum::splat(1.0));
        let wo = Vector3f::new(0.0, 0.6, 0.8);
        let wi = Vector3f::new(0.0, 0.0, 1.0);
        let result = bsdf.eval(&BSDFSampleRecord::new(wi, wo, 0.0));
        assert_abs_diff_eq!(result.value[0], INV_PI, epsilon = 1e-6);
        assert_abs_diff_eq!(result.pdf, INV_PI, epsilon = 1e-6);

        // Below the surface nothing is reflected.
        let below = Vector3f::new(0.0, 0.0, -1.0);
        assert!(bsdf.eval(&BSDFSampleRecord::new(below, wo, 0.0)).value.is_black());
        assert!(bsdf.eval(&BSDFSampleRecord::new(wi, below, 0.0)).value.is_black());
    }

    #[test]
    fn test_lambertian_sample() {
        let bsdf = LambertianDiffuseBSDF::new(RGBSpectrum::splat(0.5));
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let (record, result) = bsdf.sample_and_eval(&Vector2f::new(0.25, 0.75), wo);
        assert!(record.wi.z > 0.0);
        assert!(record.pdf > 0.0);
        assert_abs_diff_eq!(result.pdf, record.pdf, epsilon = 1e-6);
        assert_abs_diff_eq!(result.value[1], 0.5 * INV_PI, epsilon = 1e-6);

        let record = bsdf.sample(&Vector2f::new(0.25, 0.75), Vector3f::new(0.0, 0.0, -1.0));
        assert_eq!(record.pdf, 0.0);
    }
}
