// Copyright 2020 @TwoCookingMice

use super::constants::{Float, Vector3f};

#[derive(Debug, Copy, Clone)]
pub struct Ray3f {
    origin: Vector3f,
    dir: Vector3f,
    pub min_t: Float,
    pub max_t: Float,
    pub time: Float,
}

impl Ray3f {
    pub fn new(o: Vector3f, d: Vector3f,
               min_t: Option<Float>, max_t: Option<Float>) -> Self {
        Self { origin: o, dir: d.normalize(),
               min_t: min_t.unwrap_or(0.0),
               max_t: max_t.unwrap_or(std::f32::MAX),
               time: 0.0 }
    }

    pub fn with_time(mut self, time: Float) -> Self {
        self.time = time;
        self
    }

    pub fn origin(&self) -> Vector3f {
        self.origin
    }

    pub fn dir(&self) -> Vector3f {
        self.dir
    }

    pub fn at(&self, t: Float) -> Vector3f {
        self.origin + self.dir * t
    }

    /// A ray is usable for tracing only if its origin carries no NaN.
    pub fn is_valid(&self) -> bool {
        !self.origin.iter().any(|c| c.is_nan())
    }

    pub fn update(&mut self, t: Float) -> bool {
        if t < self.min_t || t > self.max_t {
            false
        } else {
            self.max_t = t;
            true
        }
    }

    pub fn test_segment(&self, t: Float) -> bool {
        t >= self.min_t && t <= self.max_t
    }
}

/// Ray with optional footprint information. Sensors without a lens model
/// leave `has_differentials` unset.
#[derive(Debug, Copy, Clone)]
pub struct RayDifferential3f {
    pub ray: Ray3f,
    pub has_differentials: bool,
}

impl From<Ray3f> for RayDifferential3f {
    fn from(ray: Ray3f) -> Self {
        Self { ray, has_differentials: false }
    }
}

/* Tests for Ray */
