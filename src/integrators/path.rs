// Copyright @yucwang 2026

use crate::core::bsdf::BSDFSampleRecord;
use crate::core::integrator::Integrator;
use crate::core::rng::LcgRng;
use crate::core::scene::Scene;
use crate::core::sensor::Sensor;
use crate::math::constants::{Float, Vector2f, Vector3f, RAY_EPSILON};
use crate::math::frame::Frame;
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

/// Depth used when the scene description does not set `max_depth`.
pub const DEFAULT_MAX_DEPTH: u32 = 16;

// Bounces before Russian roulette may end a path.
const RR_DEPTH: u32 = 5;

/// Unidirectional path tracer with next event estimation.
///
/// Delta emitters (e.g. directional lights) can only be reached through
/// emitter sampling, so every vertex connects to each emitter once.
/// Paths longer than a few bounces are ended by Russian roulette, so an
/// unbounded `max_depth` still terminates in closed, non-absorbing scenes.
pub struct PathIntegrator {
    pub max_depth: u32,
    pub samples_per_pixel: u32,
}

impl PathIntegrator {
    pub fn new(max_depth: u32, samples_per_pixel: u32) -> Self {
        Self { max_depth, samples_per_pixel }
    }

    fn trace_path(&self, scene: &Scene, mut ray: Ray3f, rng: &mut LcgRng) -> RGBSpectrum {
        let mut radiance = RGBSpectrum::default();
        let mut throughput = RGBSpectrum::splat(1.0);

        for depth in 0..self.max_depth {
            let intersection = match scene.ray_intersection(&ray) {
                Some(h) => h,
                None => break,
            };
            let material = match intersection.material() {
                Some(m) => m,
                None => break,
            };

            // Surfaces are one-sided: back faces get a frame whose wo.z < 0
            // and the BSDF rejects them.
            let n = intersection.sh_normal();
            let frame = Frame::from_normal(&n);
            let wo_local = frame.to_local(&-ray.dir());
            let p = intersection.p();

            for emitter in scene.emitters() {
                let emitter_sample = emitter.sample_direction(&rng.next_2d(), &intersection);
                if emitter_sample.value.is_black() || !(emitter_sample.pdf > 0.0) {
                    continue;
                }
                let wi_local = frame.to_local(&emitter_sample.wi);
                if Frame::cos_theta(&wi_local) <= 0.0 {
                    continue;
                }

                let shadow_ray = Ray3f::new(offset_origin(&p, &n, &emitter_sample.wi), emitter_sample.wi, None, None);
                if scene.ray_intersection_t(&shadow_ray) {
                    continue;
                }

                let eval = material.eval(&BSDFSampleRecord::new(wi_local, wo_local, 0.0));
                let weight = Frame::cos_theta(&wi_local) / emitter_sample.pdf;
                radiance += throughput * eval.value * emitter_sample.value * weight;
            }

            let (sample, eval) = material.sample_and_eval(&rng.next_2d(), wo_local);
            if !(sample.pdf > 0.0) {
                break;
            }
            throughput *= eval.value * (Frame::cos_theta(&sample.wi) / sample.pdf);
            if throughput.is_black() {
                break;
            }

            if depth >= RR_DEPTH {
                let q = (1.0 - throughput.max_value()).max(0.05);
                if rng.next_f32() < q {
                    break;
                }
                throughput = throughput * (1.0 / (1.0 - q));
            }

            let wi = frame.from_local(&sample.wi);
            ray = Ray3f::new(offset_origin(&p, &n, &wi), wi, None, None);
        }

        radiance
    }
}

// Pushes `p` off the surface towards the side `w` leaves through.
fn offset_origin(p: &Vector3f, n: &Vector3f, w: &Vector3f) -> Vector3f {
    let offset = n * (RAY_EPSILON * 10.0);
    if n.dot(w) >= 0.0 { p + offset } else { p - offset }
}

impl Integrator for PathIntegrator {
    fn trace_ray_forward(&self, scene: &Scene, sensor: &dyn Sensor, pixel: Vector2f, rng: &mut LcgRng) -> RGBSpectrum {
        let (width, height) = sensor.film().size();
        let jitter = rng.next_2d();
        let film_sample = Vector2f::new((pixel.x + jitter.x) / width as Float,
                                        (pixel.y + jitter.y) / height as Float);
        let wavelength_sample = rng.next_f32();
        let aperture_sample = rng.next_2d();

        let (ray, weight) = sensor.sample_ray(0.0, wavelength_sample, &film_sample, &aperture_sample, true);
        if weight == 0.0 {
            return RGBSpectrum::default();
        }

        self.trace_path(scene, ray, rng) * weight
    }

    fn samples_per_pixel(&self) -> u32 {
        self.samples_per_pixel
    }
}
