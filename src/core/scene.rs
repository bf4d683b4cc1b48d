// Copyright @yucwang 2026

use crate::core::bsdf::BSDF;
use crate::core::emitter::Emitter;
use crate::core::interaction::SurfaceIntersection;
use crate::core::sensor::Sensor;
use crate::core::shape::Shape;
use crate::math::aabb::AABB;
use crate::math::ray::Ray3f;
use std::sync::Arc;

pub struct SceneObject {
    pub shape: Arc<dyn Shape>,
    pub material: Arc<dyn BSDF>,
    pub name: Option<String>,
}

impl SceneObject {
    pub fn new(shape: Arc<dyn Shape>, material: Arc<dyn BSDF>) -> Self {
        Self { shape, material, name: None }
    }

    pub fn with_name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    pub fn shape(&self) -> &Arc<dyn Shape> {
        &self.shape
    }
}

pub struct Scene {
    objects: Vec<SceneObject>,
    sensors: Vec<Box<dyn Sensor>>,
    emitters: Vec<Box<dyn Emitter>>,
    scene_bounds: AABB,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            sensors: Vec::new(),
            emitters: Vec::new(),
            scene_bounds: AABB::default(),
        }
    }

    pub fn add_object(&mut self, object: SceneObject) {
        self.scene_bounds.expand_by_aabb(&object.shape.bounding_box());
        self.objects.push(object);
    }

    pub fn objects(&self) -> &Vec<SceneObject> {
        &self.objects
    }

    pub fn sensors(&self) -> &Vec<Box<dyn Sensor>> {
        &self.sensors
    }

    pub fn add_sensor(&mut self, sensor: Box<dyn Sensor>) {
        self.sensors.push(sensor);
    }

    pub fn add_emitter(&mut self, emitter: Box<dyn Emitter>) {
        self.emitters.push(emitter);
    }

    pub fn emitters(&self) -> &Vec<Box<dyn Emitter>> {
        &self.emitters
    }

    /// Bounds of all shapes added so far. Invalid for an empty scene.
    pub fn bbox(&self) -> &AABB {
        &self.scene_bounds
    }

    pub fn take_sensor(&mut self, sensor_id: usize) -> Option<Box<dyn Sensor>> {
        if sensor_id < self.sensors.len() {
            Some(self.sensors.remove(sensor_id))
        } else {
            None
        }
    }

    pub fn insert_sensor(&mut self, sensor_id: usize, sensor: Box<dyn Sensor>) {
        if sensor_id <= self.sensors.len() {
            self.sensors.insert(sensor_id, sensor);
        } else {
            self.sensors.push(sensor);
        }
    }

    pub fn sensor(&self, sensor_id: usize) -> Option<&dyn Sensor> {
        self.sensors.get(sensor_id).map(|s| s.as_ref())
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Closest hit along `ray`, tagged with the hit object's material.
    pub fn ray_intersection(&self, ray: &Ray3f) -> Option<SurfaceIntersection> {
        let mut closest: Option<(usize, SurfaceIntersection)> = None;
        let mut ray = *ray;
        for (idx, object) in self.objects.iter().enumerate() {
            if let Some(hit) = object.shape.ray_intersection(&ray) {
                ray.max_t = hit.t();
                closest = Some((idx, hit));
            }
        }

        closest.map(|(idx, hit)| {
            hit.with_material(self.objects[idx].material.clone())
               .with_object_index(Some(idx))
        })
    }

    pub fn ray_intersection_t(&self, ray: &Ray3f) -> bool {
        self.objects.iter().any(|object| object.shape.ray_intersection_t(ray))
    }
}
