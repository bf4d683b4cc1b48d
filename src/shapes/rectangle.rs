// Copyright @yucwang 2026

use crate::core::computation_node::{generate_node_id, ComputationNode};
use crate::core::interaction::{SurfaceIntersection, SurfaceSampleRecord};
use crate::core::shape::Shape;
use crate::math::aabb::AABB;
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::ray::Ray3f;
use crate::math::transform::Transform;
use super::planar::PlaneFrame;

/// The square `[-1, 1]^2` in the local `z = 0` plane, facing +z.
pub struct Rectangle {
    id: String,
    to_world: Transform,
    frame: PlaneFrame,
    normal: Vector3f,
    area: Float,
    inv_area: Float,
}

impl Rectangle {
    pub fn new(to_world: Transform) -> Self {
        let frame = PlaneFrame::new(&to_world);
        let area = 4.0 * frame.area_scale();
        let inv_area = if area > 0.0 { 1.0 / area } else { 0.0 };
        let normal = frame.normal();

        Self { id: generate_node_id("rectangle"), to_world, frame, normal, area, inv_area }
    }

    pub fn with_id(mut self, id: String) -> Self {
        self.id = id;
        self
    }

    fn world_hit(&self, ray: &Ray3f) -> Option<(Vector3f, Vector2f, Float)> {
        let (t, local) = self.frame.intersect(ray)?;
        if local.x.abs() > 1.0 || local.y.abs() > 1.0 {
            return None;
        }

        let uv = Vector2f::new(0.5 * (local.x + 1.0), 0.5 * (local.y + 1.0));
        Some((self.frame.point(&local), uv, t))
    }
}

impl ComputationNode for Rectangle {
    fn id(&self) -> &str {
        &self.id
    }

    fn to_string(&self) -> String {
        format!("Rectangle[id = {}, normal = {:?}, area = {}]", self.id, self.normal, self.area)
    }
}

impl Shape for Rectangle {
    fn bounding_box(&self) -> AABB {
        let mut bbox = AABB::default();
        let corners = [
            Vector3f::new(-1.0, -1.0, 0.0),
            Vector3f::new(-1.0,  1.0, 0.0),
            Vector3f::new( 1.0, -1.0, 0.0),
            Vector3f::new( 1.0,  1.0, 0.0),
        ];
        for corner in &corners {
            let p = self.to_world.apply_point(*corner);
            bbox.expand_by_point(&p);
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
        let p_local = Vector3f::new(2.0 * u.x - 1.0, 2.0 * u.y - 1.0, 0.0);
        let p_world = self.to_world.apply_point(p_local);
        let intersection = SurfaceIntersection::new(
            p_world,
            self.normal,
            self.normal,
            Vector2f::new(u.x, u.y),
            0.0,
        );
        SurfaceSampleRecord::new(intersection, self.inv_area)
    }

    fn surface_area(&self) -> Float {
        self.area
    }
}
