// Copyright @yucwang 2026

use crate::core::computation_node::ComputationNode;
use crate::core::film::Film;
use crate::math::aabb::AABB;
use crate::math::constants::{Float, Vector2f};
use crate::math::ray::{Ray3f, RayDifferential3f};
use crate::math::transform::Transform;

/// Measurement device driven by canonical samples from an external sampler.
///
/// `sample_ray` returns the ray together with its importance weight. A weight
/// of zero marks a sample that must contribute nothing; such rays may carry a
/// NaN origin and must not be traced.
pub trait Sensor: ComputationNode + Send + Sync {
    fn sample_ray(&self,
                  time: Float,
                  wavelength_sample: Float,
                  sample1: &Vector2f,
                  sample2: &Vector2f,
                  active: bool) -> (Ray3f, Float);

    fn sample_ray_differential(&self,
                               time: Float,
                               wavelength_sample: Float,
                               sample1: &Vector2f,
                               sample2: &Vector2f,
                               active: bool) -> (RayDifferential3f, Float) {
        let (ray, weight) = self.sample_ray(time, wavelength_sample, sample1, sample2, active);
        (RayDifferential3f::from(ray), weight)
    }

    /// Region of space occupied by the sensor. May be invalid.
    fn bbox(&self) -> AABB;
    fn world_transform(&self, time: Float) -> Transform;
    fn film(&self) -> &Film;
    fn film_mut(&mut self) -> &mut Film;
}
