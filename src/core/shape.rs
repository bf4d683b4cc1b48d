// Copyright @yucwang 2023

use crate::core::computation_node::ComputationNode;
use crate::core::interaction::{ SurfaceIntersection, SurfaceSampleRecord };
use crate::math::aabb::AABB;
use crate::math::constants::{ Float, Vector2f };
use crate::math::ray::Ray3f;

/// Geometry shared read-only between the scene and any sensor that targets it.
pub trait Shape: ComputationNode + Send + Sync {
    fn bounding_box(&self) -> AABB;
    /// Closest hit within the ray's `[min_t, max_t]` segment.
    fn ray_intersection(&self, ray: &Ray3f) -> Option<SurfaceIntersection>;
    fn ray_intersection_t(&self, ray: &Ray3f) -> bool;
    /// Point sampled with respect to surface area; the record's pdf is an area density.
    fn sample_position(&self, u: &Vector2f) -> SurfaceSampleRecord;
    fn surface_area(&self) -> Float;
}
