// Copyright @yucwang 2023

use crate::math::constants::{ Float, Vector3f };

/// Two unit vectors completing `n` to an orthonormal basis.
/// Branchless construction from Duff et al. 2017, deterministic for every `n`.
pub fn coordinate_system(n: &Vector3f) -> (Vector3f, Vector3f) {
    let sign = (1.0 as Float).copysign(n.z);
    let a = -1.0 / (sign + n.z);
    let b = n.x * n.y * a;

    (Vector3f::new(1.0 + sign * n.x * n.x * a, sign * b, -sign * n.x),
     Vector3f::new(b, sign + n.y * n.y * a, -n.y))
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    pub x: Vector3f,
    pub y: Vector3f,
    pub z: Vector3f
}

impl Default for Frame {
    fn default() -> Self {
        Frame {
            x: Vector3f::new(1.0, 0.0, 0.0),
            y: Vector3f::new(0.0, 1.0, 0.0),
            z: Vector3f::new(0.0, 0.0, 1.0)
        }
    }
}

impl Frame {
    pub fn new(new_x: Vector3f, new_y: Vector3f, new_z: Vector3f) -> Frame {
        Frame {
            x: new_x,
            y: new_y,
            z: new_z
        }
    }

    /// Shading frame around a (unit) normal.
    pub fn from_normal(n: &Vector3f) -> Frame {
        let (x, y) = coordinate_system(n);
        Frame { x, y, z: *n }
    }

    pub fn to_local(&self, v: &Vector3f) -> Vector3f {
        Vector3f::new(v.dot(&self.x), v.dot(&self.y), v.dot(&self.z))
    }

    pub fn from_local(&self, v: &Vector3f) -> Vector3f {
        v.x * self.x + v.y * self.y + v.z * self.z
    }

    pub fn cos_theta(v: &Vector3f) -> Float {
        v.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_coordinate_system_is_orthonormal() {
        let normals = [
            Vector3f::new(0.0, 0.0, 1.0),
            Vector3f::new(0.0, 0.0, -1.0),
            Vector3f::new(-1.0, -1.0, 0.0).normalize(),
            Vector3f::new(0.3, -0.5, 0.8).normalize(),
        ];
        for n in normals.iter() {
            let (s, t) = coordinate_system(n);
            assert_abs_diff_eq!(s.norm(), 1.0, epsilon = 1e-5);
            assert_abs_diff_eq!(t.norm(), 1.0, epsilon = 1e-5);
            assert_abs_diff_eq!(s.dot(&t), 0.0, epsilon = 1e-5);
            assert_abs_diff_eq!(s.dot(n), 0.0, epsilon = 1e-5);
            assert_abs_diff_eq!(t.dot(n), 0.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_frame_round_trip() {
        let frame = Frame::from_normal(&Vector3f::new(0.0, 1.0, 1.0).normalize());
        let v = Vector3f::new(0.2, -0.4, 0.7);
        let back = frame.from_local(&frame.to_local(&v));
        assert_abs_diff_eq!((back - v).norm(), 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(Frame::cos_theta(&frame.to_local(&frame.z)), 1.0, epsilon = 1e-5);
    }
}
