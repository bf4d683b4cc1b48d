// Copyright 2020 @TwoCookingMice

use super::constants::{ Float, Vector3f, Vector4f, Matrix4f };

use nalgebra as na;
use std::ops;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    matrix: Matrix4f,
    inv_matrix: Matrix4f
}

impl Default for Transform {
    fn default() -> Self {
        Self { matrix: Matrix4f::identity(),
               inv_matrix: Matrix4f::identity() }
    }
}

impl ops::Mul for Transform {
    type Output = Transform;

    // `(a * b)` applies `b` first.
    fn mul(self, rhs: Transform) -> Transform {
        Transform { matrix: self.matrix * rhs.matrix,
                    inv_matrix: rhs.inv_matrix * self.inv_matrix }
    }
}

impl Transform {
    // Singular matrices keep an identity inverse. Planar shapes never need
    // one, since they intersect through their own plane frame.
    pub fn new(matrix: Matrix4f) -> Self {
        Self { matrix: matrix,
               inv_matrix: matrix.try_inverse().unwrap_or(Matrix4f::identity())}
    }

    pub fn translate(v: Vector3f) -> Self {
        Self::new(Matrix4f::new_translation(&v))
    }

    pub fn scale(v: Vector3f) -> Self {
        Self::new(Matrix4f::new_nonuniform_scaling(&v))
    }

    /// Rotation of `angle_deg` degrees around `axis`.
    pub fn rotate(axis: Vector3f, angle_deg: Float) -> Self {
        let axis = na::Unit::new_normalize(axis);
        let rotation = na::Rotation3::from_axis_angle(&axis, angle_deg.to_radians());
        Self::new(rotation.to_homogeneous())
    }

    /// Frame located at `origin` whose local +z axis points at `target`.
    /// Columns are (left, up, forward, origin).
    pub fn look_at(origin: Vector3f, target: Vector3f, up: Vector3f) -> Self {
        let dir = (target - origin).normalize();
        let left = up.cross(&dir).normalize();
        let new_up = dir.cross(&left);

        let matrix = Matrix4f::new(
            left.x, new_up.x, dir.x, origin.x,
            left.y, new_up.y, dir.y, origin.y,
            left.z, new_up.z, dir.z, origin.z,
            0.0,    0.0,      0.0,   1.0);
        Self::new(matrix)
    }

    pub fn matrix(&self) -> &Matrix4f {
        &self.matrix
    }

    pub fn inverse_matrix(&self) -> &Matrix4f {
        &self.inv_matrix
    }

    pub fn apply_point(&self, p: Vector3f) -> Vector3f {
        Self::project(&self.matrix, p)
    }

    pub fn apply_vector(&self, v: Vector3f) -> Vector3f {
        self.matrix.fixed_slice::<3, 3>(0, 0) * v
    }

    // Normal transformation is different from point transformation.
    // Before transformation, we have n^Tx = 0
    // After transformation, we have (Sn)^T(Mx) = 0
    // Then, we will get: S = (M^{-1})^T
    pub fn apply_normal(&self, n: Vector3f) -> Vector3f {
        self.inv_matrix.fixed_slice::<3, 3>(0, 0).transpose() * n
    }

    pub fn inv_apply_point(&self, p: Vector3f) -> Vector3f {
        Self::project(&self.inv_matrix, p)
    }

    fn project(m: &Matrix4f, p: Vector3f) -> Vector3f {
        let h = m * Vector4f::new(p.x, p.y, p.z, 1.0);
        Vector3f::new(h.x / h.w, h.y / h.w, h.z / h.w)
    }
}
