// Copyright @yucwang 2026

use crate::math::constants::{EPSILON, Float, Vector2f, Vector3f};
use crate::math::ray::Ray3f;
use crate::math::transform::Transform;

/// World-space image of the local `z = 0` plane under an affine `to_world`.
///
/// Hits are solved in the plane itself, so a `to_world` that flattens the
/// local z axis (e.g. a zero scale along z) still places points correctly.
#[derive(Debug, Copy, Clone)]
pub struct PlaneFrame {
    center: Vector3f,
    dp_du: Vector3f,
    dp_dv: Vector3f,
    normal: Vector3f,
    // Gram matrix of (dp_du, dp_dv) and its determinant.
    gram: (Float, Float, Float),
    det: Float,
}

impl PlaneFrame {
    pub fn new(to_world: &Transform) -> Self {
        let center = to_world.apply_point(Vector3f::zeros());
        let dp_du = to_world.apply_vector(Vector3f::new(1.0, 0.0, 0.0));
        let dp_dv = to_world.apply_vector(Vector3f::new(0.0, 1.0, 0.0));

        let mut normal = dp_du.cross(&dp_dv);
        if normal.norm() > 0.0 {
            normal = normal.normalize();
        }
        // Mirroring transforms flip the facing, as a transformed normal would.
        if to_world.matrix().fixed_slice::<3, 3>(0, 0).determinant() < 0.0 {
            normal = -normal;
        }

        let a = dp_du.dot(&dp_du);
        let b = dp_du.dot(&dp_dv);
        let c = dp_dv.dot(&dp_dv);
        Self { center, dp_du, dp_dv, normal, gram: (a, b, c), det: a * c - b * b }
    }

    pub fn normal(&self) -> Vector3f {
        self.normal
    }

    /// Area of the image of the local unit square.
    pub fn area_scale(&self) -> Float {
        self.dp_du.cross(&self.dp_dv).norm()
    }

    pub fn point(&self, local: &Vector2f) -> Vector3f {
        self.center + self.dp_du * local.x + self.dp_dv * local.y
    }

    /// Ray distance and local (x, y) of the hit with the whole plane.
    pub fn intersect(&self, ray: &Ray3f) -> Option<(Float, Vector2f)> {
        if !(self.det > 0.0) {
            return None;
        }
        let denom = self.normal.dot(&ray.dir());
        if denom.abs() < EPSILON {
            return None;
        }

        let t = self.normal.dot(&(self.center - ray.origin())) / denom;
        if !ray.test_segment(t) {
            return None;
        }

        let offset = ray.at(t) - self.center;
        let (a, b, c) = self.gram;
        let pu = offset.dot(&self.dp_du);
        let pv = offset.dot(&self.dp_dv);
        let x = (c * pu - b * pv) / self.det;
        let y = (a * pv - b * pu) / self.det;
        Some((t, Vector2f::new(x, y)))
    }
}
