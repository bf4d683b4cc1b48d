// Copyright @yucwang 2026

use crate::core::computation_node::{generate_node_id, ComputationNode};
use crate::core::interaction::{SurfaceIntersection, SurfaceSampleRecord};
use crate::core::shape::Shape;
use crate::math::aabb::AABB;
use crate::math::constants::{Float, PI, Vector2f, Vector3f};
use crate::math::ray::Ray3f;
use crate::math::transform::Transform;
use crate::math::warp::square_to_uniform_disk_concentric;
use super::planar::PlaneFrame;

/// Unit disk centered at the origin of the local `z = 0` plane, facing +z.
pub struct Disk {
    id: String,
    to_world: Transform,
    frame: PlaneFrame,
    normal: Vector3f,
    area: Float,
    inv_area: Float,
}

impl Disk {
    pub fn new(to_world: Transform) -> Self {
        let frame = PlaneFrame::new(&to_world);
        // An affine map scales every area by the same factor, so uniform
        // samples in the local disk stay uniform in world space.
        let area = PI * frame.area_scale();
        let inv_area = if area > 0.0 { 1.0 / area } else { 0.0 };
        let normal = frame.normal();

        Self { id: generate_node_id("disk"), to_world, frame, normal, area, inv_area }
    }

    pub fn with_id(mut self, id: String) -> Self {
        self.id = id;
        self
    }

    fn world_hit(&self, ray: &Ray3f) -> Option<(Vector3f, Vector2f, Float)> {
        let (t, local) = self.frame.intersect(ray)?;
        let r2 = local.norm_squared();
        if r2 > 1.0 {
            return None;
        }

        let mut phi = local.y.atan2(local.x);
        if phi < 0.0 {
            phi += 2.0 * PI;
        }
        Some((self.frame.point(&local), Vector2f::new(r2.sqrt(), phi / (2.0 * PI)), t))
    }
}

impl ComputationNode for Disk {
    fn id(&self) -> &str {
        &self.id
    }

    fn to_string(&self) -> String {
        format!("Disk[id = {}, normal = {:?}, area = {}]", self.id, self.normal, self.area)
    }
}

impl Shape for Disk {
    fn bounding_box(&self) -> AABB {
        // Box of the transformed bounding square; tight for axis-aligned disks.
        let mut bbox = AABB::default();
        for (x, y) in [(-1.0, -1.0), (-1.0, 1.0), (1.0, -1.0), (1.0, 1.0)] {
            bbox.expand_by_point(&self.to_world.apply_point(Vector3f::new(x, y, 0.0)));
        }
        bbox
    }

    fn ray_intersection(&self, ray: &Ray3f) -> Option<SurfaceIntersection> {
        let (p_world, uv, t_world) = self.world_hit(ray)?;
        Some(SurfaceIntersection::new(p_world, self.normal, self.normal, uv, t_world))
    }

    fn ray_intersection_t(&self, ray: &Ray3f) -> bool {
        self.world_hit(ray).is_some()
    }

    fn sample_position(&self, u: &Vector2f) -> SurfaceSampleRecord {
        let p = square_to_uniform_disk_concentric(u);
        let p_world = self.to_world.apply_point(Vector3f::new(p.x, p.y, 0.0));
        let intersection = SurfaceIntersection::new(p_world, self.normal, self.normal, *u, 0.0);
        SurfaceSampleRecord::new(intersection, self.inv_area)
    }

    fn surface_area(&self) -> Float {
        self.area
    }
}
