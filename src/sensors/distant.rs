// Copyright @yucwang 2026

//! Distant directional sensor.
//!
//! Records light leaving the scene along a single direction, as seen from
//! infinitely far away. Rays are aimed at a target (the scene's bounding
//! sphere center, a fixed point, or points sampled on a shape) and launched
//! either from outside the scene's bounding sphere or from the first hit of
//! the backward line through the target with an origin shape.

use crate::core::computation_node::{generate_node_id, ComputationNode};
use crate::core::film::Film;
use crate::core::scene_node::SceneNode;
use crate::core::sensor::Sensor;
use crate::core::shape::Shape;
use crate::math::aabb::AABB;
use crate::math::bsphere::BoundingSphere;
use crate::math::constants::{Float, Vector2f, Vector3f, RAY_EPSILON};
use crate::math::frame::coordinate_system;
use crate::math::ray::Ray3f;
use crate::math::transform::Transform;

use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SensorError {
    #[error("this sensor only supports films of size 1x1 pixels, got {width}x{height}")]
    FilmSize { width: usize, height: usize },
    #[error("sensor direction must be a non-zero vector")]
    ZeroDirection,
    #[error("only one of the parameters 'direction' and 'to_world' can be specified at the same time")]
    DirectionAndTransform,
    #[error("invalid parameter ray_target, must be a point or a shape, got {0}")]
    InvalidRayTarget(String),
    #[error("invalid parameter ray_origin, must be a shape, got {0}")]
    InvalidRayOrigin(String),
    #[error("parameter {0} specified more than once")]
    DuplicateParameter(&'static str),
    #[error("ray_target shape '{0}' has zero surface area")]
    ZeroAreaTarget(String),
}

/// Where rays are aimed.
#[derive(Clone)]
pub enum RayTarget {
    /// Center of the scene's bounding sphere.
    None,
    Point(Vector3f),
    /// Points sampled uniformly on the shape's surface.
    Shape(Arc<dyn Shape>),
}

/// Where rays are launched from.
#[derive(Clone)]
pub enum RayOrigin {
    /// Outside the scene's bounding sphere, backwards along the direction.
    BoundingSphere,
    /// First hit of the backward ray from the target with the shape.
    Shape(Arc<dyn Shape>),
}

struct TargetSample {
    point: Vector3f,
    pdf: Float,
    // Cosine between the viewing direction and the target surface normal.
    projected_cosine: Float,
}

enum RaySample {
    Valid { origin: Vector3f, weight: Float },
    Invalid,
}

/// Maps the local +z axis onto `direction` with a deterministic roll.
pub fn direction_to_world(direction: &Vector3f) -> Result<Transform, SensorError> {
    let len = direction.norm();
    if !(len > 1e-6) {
        return Err(SensorError::ZeroDirection);
    }

    let direction = direction / len;
    let (up, _) = coordinate_system(&direction);
    Ok(Transform::look_at(Vector3f::zeros(), direction, up))
}

/// Collects the sensor's parameters; validation happens in `build`.
#[derive(Default)]
pub struct DistantSensorBuilder {
    id: Option<String>,
    film: Option<Film>,
    direction: Option<Vector3f>,
    to_world: Option<Transform>,
    targets: Vec<RayTarget>,
    origins: Vec<RayOrigin>,
}

impl DistantSensorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: String) -> Self {
        self.id = Some(id);
        self
    }

    pub fn film(mut self, film: Film) -> Self {
        self.film = Some(film);
        self
    }

    pub fn direction(mut self, direction: Vector3f) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn to_world(mut self, to_world: Transform) -> Self {
        self.to_world = Some(to_world);
        self
    }

    pub fn ray_target_point(mut self, point: Vector3f) -> Self {
        self.targets.push(RayTarget::Point(point));
        self
    }

    pub fn ray_target_shape(mut self, shape: Arc<dyn Shape>) -> Self {
        self.targets.push(RayTarget::Shape(shape));
        self
    }

    pub fn ray_origin_shape(mut self, shape: Arc<dyn Shape>) -> Self {
        self.origins.push(RayOrigin::Shape(shape));
        self
    }

    pub fn ray_target_node(self, node: SceneNode) -> Result<Self, SensorError> {
        match node {
            SceneNode::Point(p) => Ok(self.ray_target_point(p)),
            SceneNode::Shape(shape) => Ok(self.ray_target_shape(shape)),
            other => Err(SensorError::InvalidRayTarget(other.describe())),
        }
    }

    pub fn ray_origin_node(self, node: SceneNode) -> Result<Self, SensorError> {
        match node {
            SceneNode::Shape(shape) => Ok(self.ray_origin_shape(shape)),
            other => Err(SensorError::InvalidRayOrigin(other.describe())),
        }
    }

    /// Validates the configuration against the final scene bounds.
    pub fn build(mut self, scene_bounds: &AABB) -> Result<DistantSensor, SensorError> {
        let film = self.film.take().unwrap_or_else(|| Film::new(1, 1));
        let (width, height) = film.size();
        if (width, height) != (1, 1) {
            return Err(SensorError::FilmSize { width, height });
        }
        if film.filter().radius() > 0.5 + RAY_EPSILON {
            log::warn!("This sensor should be used with a reconstruction filter with a radius \
                        of 0.5 or lower (e.g. default box)");
        }

        let to_world = match (self.direction, self.to_world) {
            (Some(_), Some(_)) => return Err(SensorError::DirectionAndTransform),
            (Some(direction), None) => direction_to_world(&direction)?,
            (None, Some(to_world)) => to_world,
            (None, None) => Transform::default(),
        };
        let direction = to_world.apply_vector(Vector3f::new(0.0, 0.0, 1.0));
        if !(direction.norm() > 1e-6) {
            return Err(SensorError::ZeroDirection);
        }
        let direction = direction.normalize();

        if self.targets.len() > 1 {
            return Err(SensorError::DuplicateParameter("ray_target"));
        }
        if self.origins.len() > 1 {
            return Err(SensorError::DuplicateParameter("ray_origin"));
        }

        let target = self.targets.pop().unwrap_or(RayTarget::None);
        match &target {
            RayTarget::Shape(shape) => {
                if !(shape.surface_area() > 0.0) {
                    return Err(SensorError::ZeroAreaTarget(shape.id().to_string()));
                }
                log::debug!("Sampling ray targets on shape '{}'.", shape.id());
            }
            RayTarget::Point(p) => log::debug!("Targeting point {:?}.", p),
            RayTarget::None => log::debug!("No target specified."),
        }

        let origin = self.origins.pop().unwrap_or(RayOrigin::BoundingSphere);
        match &origin {
            RayOrigin::Shape(shape) => log::debug!("Projecting ray origins onto shape '{}'.", shape.id()),
            RayOrigin::BoundingSphere => log::debug!("Using bounding sphere for ray origins."),
        }

        Ok(DistantSensor {
            id: self.id.unwrap_or_else(|| generate_node_id("distant")),
            film,
            to_world,
            direction,
            target,
            origin,
            bsphere: scene_bounds.bounding_sphere().inflated(),
        })
    }
}

pub struct DistantSensor {
    id: String,
    film: Film,
    to_world: Transform,
    direction: Vector3f,
    target: RayTarget,
    origin: RayOrigin,
    bsphere: BoundingSphere,
}

impl DistantSensor {
    pub fn builder() -> DistantSensorBuilder {
        DistantSensorBuilder::new()
    }

    pub fn direction(&self) -> Vector3f {
        self.direction
    }

    pub fn ray_target(&self) -> &RayTarget {
        &self.target
    }

    pub fn ray_origin(&self) -> &RayOrigin {
        &self.origin
    }

    pub fn bounding_sphere(&self) -> &BoundingSphere {
        &self.bsphere
    }

    fn select_target(&self, sample1: &Vector2f) -> TargetSample {
        match &self.target {
            RayTarget::None => TargetSample {
                point: self.bsphere.center,
                pdf: 1.0,
                projected_cosine: 1.0,
            },
            // Point targets are treated as lying on a horizontal surface.
            RayTarget::Point(p) => TargetSample {
                point: *p,
                pdf: 1.0,
                projected_cosine: self.direction.z.abs(),
            },
            RayTarget::Shape(shape) => {
                let ps = shape.sample_position(sample1);
                TargetSample {
                    point: ps.p(),
                    pdf: ps.pdf(),
                    projected_cosine: self.direction.dot(&ps.n()).abs(),
                }
            }
        }
    }

    fn select_origin(&self, target: &Vector3f, time: Float) -> Option<Vector3f> {
        match &self.origin {
            RayOrigin::BoundingSphere => {
                // Targets off-center may sit anywhere inside the sphere.
                let distance = match self.target {
                    RayTarget::None => self.bsphere.radius,
                    _ => 2.0 * self.bsphere.radius,
                };
                Some(target - self.direction * distance)
            }
            RayOrigin::Shape(shape) => {
                let backward = Ray3f::new(*target, -self.direction, None, None).with_time(time);
                shape.ray_intersection(&backward).map(|si| si.p())
            }
        }
    }

    fn sample_ray_impl(&self, time: Float, sample1: &Vector2f) -> RaySample {
        let target = self.select_target(sample1);
        if !(target.pdf > 0.0) {
            return RaySample::Invalid;
        }

        match self.select_origin(&target.point, time) {
            Some(origin) => RaySample::Valid {
                origin,
                weight: target.projected_cosine / target.pdf,
            },
            None => RaySample::Invalid,
        }
    }
}

impl ComputationNode for DistantSensor {
    fn id(&self) -> &str {
        &self.id
    }

    fn to_string(&self) -> String {
        let target = match &self.target {
            RayTarget::None => String::from("none"),
            RayTarget::Point(p) => format!("{:?}", p),
            RayTarget::Shape(shape) => ComputationNode::to_string(shape.as_ref()),
        };
        let origin = match &self.origin {
            RayOrigin::BoundingSphere => String::from("bounding_sphere"),
            RayOrigin::Shape(shape) => ComputationNode::to_string(shape.as_ref()),
        };
        let (width, height) = self.film.size();

        format!("DistantSensor[\n  world_transform = {:?},\n  film = {}x{},\n  ray_target = {},\n  ray_origin = {}\n]",
                self.to_world.matrix(), width, height, target, origin)
    }
}

impl Sensor for DistantSensor {
    fn sample_ray(&self,
                  time: Float,
                  _wavelength_sample: Float,
                  sample1: &Vector2f,
                  _sample2: &Vector2f,
                  active: bool) -> (Ray3f, Float) {
        let ray_sample = if active {
            self.sample_ray_impl(time, sample1)
        } else {
            RaySample::Invalid
        };

        let (origin, weight) = match ray_sample {
            RaySample::Valid { origin, weight } => (origin, weight),
            RaySample::Invalid => (Vector3f::repeat(Float::NAN), 0.0),
        };
        (Ray3f::new(origin, self.direction, None, None).with_time(time), weight)
    }

    fn bbox(&self) -> AABB {
        AABB::default()
    }

    fn world_transform(&self, _time: Float) -> Transform {
        self.to_world
    }

    fn film(&self) -> &Film {
        &self.film
    }

    fn film_mut(&mut self) -> &mut Film {
        &mut self.film
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::film::ReconstructionFilter;
    use crate::math::constants::{Matrix4f, PI};
    use crate::shapes::disk::Disk;
    use crate::shapes::rectangle::Rectangle;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    const SAMPLES: [([Float; 2], [Float; 2]); 4] = [
        ([0.32, 0.87], [0.16, 0.44]),
        ([0.17, 0.44], [0.22, 0.81]),
        ([0.12, 0.82], [0.99, 0.42]),
        ([0.72, 0.40], [0.01, 0.61]),
    ];

    fn samples() -> impl Iterator<Item = (Vector2f, Vector2f)> {
        SAMPLES.iter().map(|(a, b)| (Vector2f::new(a[0], a[1]), Vector2f::new(b[0], b[1])))
    }

    // Bounds of the unit rectangle centered at the origin.
    fn unit_rectangle_bounds() -> AABB {
        Rectangle::new(Transform::default()).bounding_box()
    }

    fn offset_origin_shape(z: Float) -> Arc<dyn Shape> {
        Arc::new(Rectangle::new(Transform::translate(Vector3f::new(0.0, 0.0, z))
                                * Transform::scale(Vector3f::new(10.0, 10.0, 10.0))))
    }

    fn assert_matrix_eq(a: &Matrix4f, b: &Matrix4f) {
        for idx in 0..16 {
            assert_abs_diff_eq!(a[idx], b[idx], epsilon = 1e-6);
        }
    }

    #[test]
    fn test_construct() {
        let sensor = DistantSensor::builder().build(&AABB::default()).expect("default sensor");
        assert!(!sensor.bbox().is_valid());
        assert!(matches!(sensor.ray_target(), RayTarget::None));
        assert!(matches!(sensor.ray_origin(), RayOrigin::BoundingSphere));

        let err = DistantSensor::builder().film(Film::new(2, 2)).build(&AABB::default());
        assert!(matches!(err, Err(SensorError::FilmSize { width: 2, height: 2 })));

        let sensor = DistantSensor::builder()
            .ray_target_point(Vector3f::zeros())
            .build(&AABB::default());
        assert!(sensor.is_ok());

        let sensor = DistantSensor::builder()
            .ray_target_shape(Arc::new(Rectangle::new(Transform::default())))
            .ray_origin_shape(offset_origin_shape(1.0))
            .build(&AABB::default());
        assert!(sensor.is_ok());
    }

    #[test]
    fn test_construct_wide_filter_still_builds() {
        let film = Film::new(1, 1).with_filter(ReconstructionFilter::Gaussian { stddev: 0.5 });
        assert!(DistantSensor::builder().film(film).build(&AABB::default()).is_ok());
    }

    #[test]
    fn test_construct_rejects_invalid_parameters() {
        let bounds = unit_rectangle_bounds();

        let err = DistantSensor::builder().direction(Vector3f::zeros()).build(&bounds);
        assert!(matches!(err, Err(SensorError::ZeroDirection)));

        let err = DistantSensor::builder()
            .direction(Vector3f::new(0.0, 0.0, -1.0))
            .to_world(Transform::default())
            .build(&bounds);
        assert!(matches!(err, Err(SensorError::DirectionAndTransform)));

        let err = DistantSensor::builder()
            .ray_target_point(Vector3f::zeros())
            .ray_target_shape(Arc::new(Rectangle::new(Transform::default())))
            .build(&bounds);
        assert!(matches!(err, Err(SensorError::DuplicateParameter("ray_target"))));

        let flat = Transform::scale(Vector3f::new(1.0, 0.0, 1.0));
        let err = DistantSensor::builder()
            .ray_target_shape(Arc::new(Rectangle::new(flat)))
            .build(&bounds);
        assert!(matches!(err, Err(SensorError::ZeroAreaTarget(_))));

        let constant = SceneNode::Object { tag: "emitter".to_string(), plugin_type: "constant".to_string(), id: None };
        let err = DistantSensor::builder().ray_target_node(constant.clone());
        assert!(matches!(err, Err(SensorError::InvalidRayTarget(_))));
        let err = DistantSensor::builder().ray_origin_node(constant);
        assert!(matches!(err, Err(SensorError::InvalidRayOrigin(_))));
        let err = DistantSensor::builder().ray_origin_node(SceneNode::Point(Vector3f::zeros()));
        assert!(matches!(err, Err(SensorError::InvalidRayOrigin(_))));

        let builder = DistantSensor::builder()
            .ray_target_node(SceneNode::Point(Vector3f::new(0.0, 0.0, 1.0)))
            .expect("points are valid targets");
        assert!(builder.build(&bounds).is_ok());
    }

    #[test]
    fn test_world_transform_from_direction() {
        let reference = Matrix4f::new(
            0.0, 1.0, 0.0, 0.0,
            1.0, 0.0, 0.0, 0.0,
            0.0, 0.0, -1.0, 0.0,
            0.0, 0.0, 0.0, 1.0);

        for direction in [Vector3f::new(0.0, 0.0, -1.0), Vector3f::new(0.0, 0.0, -2.0)] {
            let sensor = DistantSensor::builder()
                .direction(direction)
                .build(&AABB::default())
                .expect("valid direction");
            assert_matrix_eq(sensor.world_transform(0.0).matrix(), &reference);
            assert_matrix_eq(sensor.world_transform(10.0).matrix(), &reference);
        }
    }

    #[test]
    fn test_world_transform_ignores_magnitude() {
        let directions = [
            Vector3f::new(0.0, 0.0, 1.0),
            Vector3f::new(-1.0, -1.0, 0.0),
            Vector3f::new(0.3, -0.2, 0.9),
            Vector3f::new(2.0, 0.0, 0.0),
        ];
        for direction in directions.iter() {
            let a = direction_to_world(direction).expect("valid direction");
            for k in [0.5 as Float, 3.0, 1000.0] {
                let b = direction_to_world(&(direction * k)).expect("valid direction");
                assert_matrix_eq(a.matrix(), b.matrix());
            }
        }
    }

    #[test]
    fn test_sample_ray_direction() {
        let directions = [
            Vector3f::new(0.0, 0.0, 1.0),
            Vector3f::new(-1.0, -1.0, 0.0),
            Vector3f::new(2.0, 0.0, 0.0),
        ];
        for direction in directions.iter() {
            let sensor = DistantSensor::builder()
                .direction(*direction)
                .build(&unit_rectangle_bounds())
                .expect("valid sensor");
            for (sample1, sample2) in samples() {
                let (ray, weight) = sensor.sample_ray(1.0, 1.0, &sample1, &sample2, true);
                assert_abs_diff_eq!((ray.dir() - direction.normalize()).norm(), 0.0, epsilon = 1e-6);
                assert_eq!(ray.time, 1.0);
                assert_eq!(weight, 1.0);
            }
        }
    }

    #[test]
    fn test_sample_ray_default_origin() {
        let bounds = unit_rectangle_bounds();
        let radius = bounds.bounding_sphere().radius;

        let sensor = DistantSensor::builder()
            .direction(Vector3f::new(0.0, 0.0, -1.0))
            .build(&bounds)
            .expect("valid sensor");
        for (sample1, sample2) in samples() {
            let (ray, _) = sensor.sample_ray(1.0, 1.0, &sample1, &sample2, true);
            assert_relative_eq!(ray.origin().z, radius, max_relative = 1e-3);

            let (ray, _) = sensor.sample_ray_differential(1.0, 1.0, &sample1, &sample2, true);
            assert!(!ray.has_differentials);
            assert_relative_eq!(ray.ray.origin().z, radius, max_relative = 1e-3);
        }

        // Placement holds for oblique directions as well.
        let direction = Vector3f::new(0.0, 1.0, -1.0).normalize();
        let sensor = DistantSensor::builder()
            .direction(direction)
            .build(&bounds)
            .expect("valid sensor");
        for (sample1, sample2) in samples() {
            let (ray, _) = sensor.sample_ray(0.0, 0.5, &sample1, &sample2, true);
            let offset = ray.origin() - bounds.center();
            assert_relative_eq!(offset.norm(), radius, max_relative = 1e-3);
            assert_abs_diff_eq!(offset.normalize().dot(&-direction), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_sample_ray_shape_origin() {
        let z_offset = 3.42;
        for direction in [Vector3f::new(0.0, 0.0, -1.0), Vector3f::new(0.0, -2.0, -1.0)] {
            let sensor = DistantSensor::builder()
                .direction(direction)
                .ray_origin_shape(offset_origin_shape(z_offset))
                .build(&unit_rectangle_bounds())
                .expect("valid sensor");
            for (sample1, sample2) in samples() {
                let (ray, weight) = sensor.sample_ray(1.0, 1.0, &sample1, &sample2, true);
                assert_abs_diff_eq!(ray.origin().z, z_offset, epsilon = 1e-4);
                assert_eq!(weight, 1.0);
            }
        }
    }

    #[test]
    fn test_sample_ray_flattened_origin_shape_off_center_target() {
        let z_offset = 3.42;
        let origin_shape: Arc<dyn Shape> = Arc::new(Rectangle::new(
            Transform::translate(Vector3f::new(0.0, 0.0, z_offset))
                * Transform::scale(Vector3f::new(10.0, 10.0, 0.0))));
        let target = Vector3f::new(0.5, 0.5, 0.0);

        for direction in [Vector3f::new(0.0, 0.0, -1.0), Vector3f::new(0.0, 1.0, -1.0)] {
            let d = direction.normalize();
            let sensor = DistantSensor::builder()
                .direction(direction)
                .ray_target_point(target)
                .ray_origin_shape(origin_shape.clone())
                .build(&unit_rectangle_bounds())
                .expect("valid sensor");
            let expected = target - d * (z_offset / d.z.abs());
            for (sample1, sample2) in samples() {
                let (ray, weight) = sensor.sample_ray(1.0, 1.0, &sample1, &sample2, true);
                assert_abs_diff_eq!((ray.origin() - expected).norm(), 0.0, epsilon = 1e-4);
                assert_abs_diff_eq!(ray.origin().z, z_offset, epsilon = 1e-4);
                assert_abs_diff_eq!(weight, d.z.abs(), epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_sample_ray_unreachable_origin() {
        let sensor = DistantSensor::builder()
            .direction(Vector3f::new(0.0, 0.0, -1.0))
            .ray_origin_shape(Arc::new(Rectangle::new(Transform::translate(Vector3f::new(0.0, 0.0, -1.0)))))
            .build(&unit_rectangle_bounds())
            .expect("valid sensor");
        for (sample1, sample2) in samples() {
            let (ray, weight) = sensor.sample_ray(1.0, 1.0, &sample1, &sample2, true);
            assert!(ray.origin().iter().all(|c| c.is_nan()));
            assert!(!ray.is_valid());
            assert_eq!(weight, 0.0);
        }
    }

    #[test]
    fn test_sample_ray_shape_target_weight() {
        let direction = Vector3f::new(0.0, 1.0, -1.0).normalize();
        let cos_theta_o = direction.z.abs();
        let bounds = unit_rectangle_bounds();

        let square = DistantSensor::builder()
            .direction(direction)
            .ray_target_shape(Arc::new(Rectangle::new(Transform::scale(Vector3f::new(0.5, 0.5, 0.5)))))
            .build(&bounds)
            .expect("valid sensor");
        let disk = DistantSensor::builder()
            .direction(direction)
            .ray_target_shape(Arc::new(Disk::new(Transform::default())))
            .build(&bounds)
            .expect("valid sensor");
        let point = DistantSensor::builder()
            .direction(direction)
            .ray_target_point(Vector3f::new(0.2, 0.1, 0.0))
            .build(&bounds)
            .expect("valid sensor");

        for (sample1, sample2) in samples() {
            let (ray, weight) = square.sample_ray(0.0, 0.5, &sample1, &sample2, true);
            assert_relative_eq!(weight, cos_theta_o * 1.0, max_relative = 1e-4);
            // The ray passes through the sampled target point on the plane.
            let t = -ray.origin().z / ray.dir().z;
            let hit = ray.at(t);
            assert_abs_diff_eq!(hit.x, 0.5 * (2.0 * sample1.x - 1.0), epsilon = 1e-4);
            assert!(hit.x.abs() <= 0.5 + 1e-4 && hit.y.abs() <= 0.5 + 1e-4);

            let (_, weight) = disk.sample_ray(0.0, 0.5, &sample1, &sample2, true);
            assert_relative_eq!(weight, cos_theta_o * PI, max_relative = 1e-4);

            let (ray, weight) = point.sample_ray(0.0, 0.5, &sample1, &sample2, true);
            assert_relative_eq!(weight, cos_theta_o, max_relative = 1e-5);
            let t = -ray.origin().z / ray.dir().z;
            assert_abs_diff_eq!((ray.at(t) - Vector3f::new(0.2, 0.1, 0.0)).norm(), 0.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_sample_ray_inactive_and_empty_scene() {
        let sensor = DistantSensor::builder()
            .direction(Vector3f::new(1.0, 0.0, 0.0))
            .build(&AABB::default())
            .expect("empty scenes are allowed");
        assert!(sensor.bounding_sphere().radius > 0.0);

        let (sample1, sample2) = (Vector2f::new(0.5, 0.5), Vector2f::new(0.5, 0.5));
        let (ray, weight) = sensor.sample_ray(0.0, 0.5, &sample1, &sample2, true);
        assert!(ray.is_valid());
        assert_eq!(weight, 1.0);
        assert!(ray.origin().norm() < 1e-3);

        let (ray, weight) = sensor.sample_ray(0.0, 0.5, &sample1, &sample2, false);
        assert!(!ray.is_valid());
        assert_eq!(weight, 0.0);
    }

    #[test]
    fn test_sample_ray_is_repeatable_across_threads() {
        let sensor = DistantSensor::builder()
            .direction(Vector3f::new(0.0, 1.0, -1.0))
            .ray_target_shape(Arc::new(Disk::new(Transform::default())))
            .ray_origin_shape(offset_origin_shape(3.42))
            .build(&unit_rectangle_bounds())
            .expect("valid sensor");

        let reference: Vec<(Vector3f, Float)> = samples()
            .map(|(s1, s2)| {
                let (ray, weight) = sensor.sample_ray(0.0, 0.5, &s1, &s2, true);
                (ray.origin(), weight)
            })
            .collect();

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for ((s1, s2), (origin, weight)) in samples().zip(reference.iter()) {
                        let (ray, w) = sensor.sample_ray(0.0, 0.5, &s1, &s2, true);
                        assert_eq!(ray.origin(), *origin);
                        assert_eq!(w, *weight);
                    }
                });
            }
        });
    }

    #[test]
    fn test_to_string_reports_strategies() {
        let sensor = DistantSensor::builder()
            .id(String::from("measure"))
            .ray_target_point(Vector3f::zeros())
            .build(&AABB::default())
            .expect("valid sensor");
        assert_eq!(sensor.id(), "measure");
        let description = ComputationNode::to_string(&sensor);
        assert!(description.contains("ray_origin = bounding_sphere"));
        assert!(description.contains("film = 1x1"));
    }
}
