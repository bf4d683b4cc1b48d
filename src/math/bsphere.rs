// Copyright @yucwang 2026

use super::constants::{Float, Vector3f, RAY_EPSILON};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundingSphere {
    pub center: Vector3f,
    pub radius: Float,
}

impl Default for BoundingSphere {
    fn default() -> Self {
        Self { center: Vector3f::zeros(), radius: 0.0 }
    }
}

impl BoundingSphere {
    pub fn new(center: Vector3f, radius: Float) -> Self {
        Self { center, radius }
    }

    pub fn is_empty(&self) -> bool {
        self.radius <= 0.0
    }

    /// Slightly enlarged copy that never collapses to a zero radius, so
    /// points placed on it are guaranteed to clear the enclosed geometry.
    pub fn inflated(&self) -> Self {
        Self {
            center: self.center,
            radius: RAY_EPSILON.max(self.radius * (1.0 + RAY_EPSILON)),
        }
    }

    pub fn contains(&self, p: &Vector3f) -> bool {
        (p - self.center).norm_squared() <= self.radius * self.radius
    }
}
