// Copyright @yucwang 2021

use crate::core::computation_node::ComputationNode;
use crate::core::integrator::Integrator;
use crate::core::rng::LcgRng;
use crate::core::scene::Scene;
use crate::core::sensor::Sensor;
use crate::math::bitmap::Bitmap;
use crate::math::constants::{Float, Vector2f, Vector3d, Vector3f};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

pub use super::renderer::{RenderError, Renderer};

// Samples of a pixel are split into this many independently seeded passes
// so that small films still spread over all threads.
const MAX_SAMPLE_PASSES: usize = 64;

pub struct SimpleRenderer {
    integrator: Box<dyn Integrator>,
    sensor_id: usize,
    seed: u64,
    show_progress: bool,
}

impl ComputationNode for SimpleRenderer {
    fn id(&self) -> &str {
        "simple_renderer"
    }

    fn to_string(&self) -> String {
        format!("SimpleRenderer[sensor = {}, spp = {}, seed = {}]",
                self.sensor_id, self.integrator.samples_per_pixel(), self.seed)
    }
}

impl Renderer for SimpleRenderer {
    fn render(&self, scene: &mut Scene) -> Result<Bitmap, RenderError> {
        let mut sensor = scene.take_sensor(self.sensor_id)
            .ok_or(RenderError::MissingSensor(self.sensor_id))?;

        let output = self.render_with(scene, sensor.as_ref());
        let (width, height) = sensor.film().size();
        let bitmap = sensor.film_mut().bitmap_mut();
        for y in 0..height {
            for x in 0..width {
                let c = output[x + width * y];
                bitmap[(x, y)] = Vector3f::new(c.x as Float, c.y as Float, c.z as Float);
            }
        }
        let bitmap = bitmap.clone();
        scene.insert_sensor(self.sensor_id, sensor);
        Ok(bitmap)
    }
}

impl SimpleRenderer {
    pub fn new(integrator: Box<dyn Integrator>, sensor_id: usize, seed: u64) -> Self {
        Self {
            integrator,
            sensor_id,
            seed,
            show_progress: true,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    fn render_with(&self, scene: &Scene, sensor: &dyn Sensor) -> Vec<Vector3d> {
        let (width, height) = sensor.film().size();
        if width == 0 || height == 0 {
            return Vec::new();
        }
        let spp = match self.integrator.samples_per_pixel() {
            0 => 1,
            v => v as usize,
        };
        let passes = spp.min(MAX_SAMPLE_PASSES);
        let inv_spp = 1.0 / (spp as f64);

        let block_size = 128usize;
        let blocks_x = (width + block_size - 1) / block_size;
        let blocks_y = (height + block_size - 1) / block_size;
        let total_blocks = blocks_x * blocks_y;
        let total_jobs = total_blocks * passes;
        let integrator_ref: &dyn Integrator = self.integrator.as_ref();

        let progress = if self.show_progress {
            ProgressBar::new(total_jobs as u64)
        } else {
            ProgressBar::hidden()
        };
        progress.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} jobs")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let next_job = Arc::new(AtomicUsize::new(0));
        let thread_count = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        log::debug!("Rendering {}x{} pixels at {} spp in {} jobs on {} threads.",
                    width, height, spp, total_jobs, thread_count);
        let (tx, rx) = mpsc::channel::<(usize, usize, usize, usize, Vec<Vector3d>)>();
        let mut output = vec![Vector3d::zeros(); width * height];

        thread::scope(|scope| {
            for _ in 0..thread_count {
                let next_job = Arc::clone(&next_job);
                let tx = tx.clone();
                scope.spawn(move || {
                    loop {
                        let job_index = next_job.fetch_add(1, Ordering::Relaxed);
                        if job_index >= total_jobs {
                            break;
                        }

                        let block_index = job_index / passes;
                        let pass = job_index % passes;
                        let pass_spp = spp / passes + usize::from(pass < spp % passes);

                        let bx = block_index % blocks_x;
                        let by = block_index / blocks_x;
                        let x0 = bx * block_size;
                        let y0 = by * block_size;
                        let x1 = (x0 + block_size).min(width);
                        let y1 = (y0 + block_size).min(height);

                        let mut block = vec![Vector3d::zeros(); (x1 - x0) * (y1 - y0)];
                        for y in y0..y1 {
                            for x in x0..x1 {
                                let mut color = Vector3d::zeros();
                                let pixel = Vector2f::new(x as Float, y as Float);
                                let seed = ((self.seed & 0xFFF) << 44)
                                    | (((pass as u64) & 0xFFF) << 32)
                                    | (((y as u64) & 0xFFFF) << 16)
                                    | ((x as u64) & 0xFFFF);
                                let mut rng = LcgRng::new(seed);
                                for _sample in 0..pass_spp {
                                    let rgb = integrator_ref.trace_ray_forward(scene, sensor, pixel, &mut rng);
                                    color += Vector3d::new(rgb[0] as f64, rgb[1] as f64, rgb[2] as f64);
                                }
                                block[(x - x0) + (x1 - x0) * (y - y0)] = color;
                            }
                        }
                        if tx.send((x0, y0, x1, y1, block)).is_err() {
                            break;
                        }
                    }
                });
            }

            drop(tx);
            for _ in 0..total_jobs {
                if let Ok((x0, y0, x1, y1, block)) = rx.recv() {
                    for y in y0..y1 {
                        for x in x0..x1 {
                            output[x + width * y] += block[(x - x0) + (x1 - x0) * (y - y0)];
                        }
                    }
                    progress.inc(1);
                }
            }
        });
        progress.finish_and_clear();

        for value in output.iter_mut() {
            *value *= inv_spp;
        }
        output
    }
}
