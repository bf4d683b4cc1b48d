// Copyright @yucwang 2026

use crate::core::computation_node::{generate_node_id, ComputationNode};
use crate::core::emitter::{Emitter, EmitterFlag, EmitterSample};
use crate::core::interaction::SurfaceIntersection;
use crate::math::constants::{Vector2f, Vector3f};
use crate::math::spectrum::RGBSpectrum;

/// Infinitely distant light delivering `irradiance` per unit area
/// perpendicular to its direction of travel.
pub struct DirectionalEmitter {
    id: String,
    direction: Vector3f,
    irradiance: RGBSpectrum,
}

impl DirectionalEmitter {
    pub fn new(direction: Vector3f, irradiance: RGBSpectrum) -> Self {
        let len = direction.norm();
        let direction = if len > 0.0 {
            direction / len
        } else {
            Vector3f::new(0.0, 0.0, -1.0)
        };
        Self { id: generate_node_id("directional"), direction, irradiance }
    }

    pub fn direction(&self) -> Vector3f {
        self.direction
    }

    pub fn irradiance(&self) -> RGBSpectrum {
        self.irradiance
    }
}

impl ComputationNode for DirectionalEmitter {
    fn id(&self) -> &str {
        &self.id
    }

    fn to_string(&self) -> String {
        format!("DirectionalEmitter[id = {}, direction = {:?}, irradiance = {:?}]",
                self.id, self.direction, self.irradiance)
    }
}

impl Emitter for DirectionalEmitter {
    fn get_flag(&self) -> EmitterFlag {
        EmitterFlag::DIRECTION | EmitterFlag::DELTA
    }

    fn sample_direction(&self, _u: &Vector2f, _reference: &SurfaceIntersection) -> EmitterSample {
        EmitterSample {
            wi: -self.direction,
            value: self.irradiance,
            pdf: 1.0,
            is_delta: true,
        }
    }
}
