// Copyright @yucwang 2023

use crate::core::bsdf::BSDF;
use crate::math::constants::{ Float, Vector2f, Vector3f };
use std::sync::Arc;

#[derive(Clone)]
pub struct SurfaceIntersection {
    p: Vector3f,
    geo_normal: Vector3f,
    sh_normal:  Vector3f,
    uv: Vector2f,
    t: Float,
    material: Option<Arc<dyn BSDF>>,
    object_index: Option<usize>,
}

pub struct SurfaceSampleRecord {
    intersection: SurfaceIntersection,
    pdf: Float,
}

impl SurfaceIntersection {
    pub fn new(new_p: Vector3f,
               new_geo_normal: Vector3f,
               new_sh_normal: Vector3f,
               new_uv: Vector2f,
               new_t: Float) -> Self {
        Self { p: new_p, geo_normal: new_geo_normal, sh_normal: new_sh_normal,
               uv: new_uv, t: new_t, material: None, object_index: None }
    }

    pub fn t(&self) -> Float {
        self.t
    }

    pub fn p(&self) -> Vector3f {
        self.p
    }

    pub fn uv(&self) -> Vector2f {
        self.uv
    }

    pub fn geo_normal(&self) -> Vector3f {
        self.geo_normal
    }

    pub fn sh_normal(&self) -> Vector3f {
        self.sh_normal
    }

    pub fn material(&self) -> Option<&dyn BSDF> {
        self.material.as_deref()
    }

    pub fn with_material(self, new_material: Arc<dyn BSDF>) -> Self {
        Self { material: Some(new_material), ..self }
    }

    pub fn object_index(&self) -> Option<usize> {
        self.object_index
    }

    pub fn with_object_index(self, object_index: Option<usize>) -> Self {
        Self { object_index, ..self }
    }
}

impl SurfaceSampleRecord {
    pub fn new(new_intersection: SurfaceIntersection,
               new_pdf: Float) -> Self {
        Self { intersection: new_intersection, pdf: new_pdf }
    }

    pub fn intersection(&self) -> &SurfaceIntersection {
        &self.intersection
    }

    pub fn p(&self) -> Vector3f {
        self.intersection.p()
    }

    pub fn n(&self) -> Vector3f {
        self.intersection.geo_normal()
    }

    /// Density of the sample with respect to surface area.
    pub fn pdf(&self) -> Float {
        self.pdf
    }
}
