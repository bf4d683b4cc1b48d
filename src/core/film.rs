// Copyright @yucwang 2026

use crate::math::bitmap::Bitmap;
use crate::math::constants::Float;

/// Pixel reconstruction filter attached to a film.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ReconstructionFilter {
    Box,
    Gaussian { stddev: Float },
}

impl ReconstructionFilter {
    pub fn radius(&self) -> Float {
        match self {
            ReconstructionFilter::Box => 0.5,
            ReconstructionFilter::Gaussian { stddev } => 4.0 * stddev,
        }
    }
}

impl Default for ReconstructionFilter {
    fn default() -> Self {
        ReconstructionFilter::Box
    }
}

pub struct Film {
    bitmap: Bitmap,
    filter: ReconstructionFilter,
}

impl Film {
    pub fn new(width: usize, height: usize) -> Self {
        Self { bitmap: Bitmap::new(width, height), filter: ReconstructionFilter::default() }
    }

    pub fn with_filter(mut self, filter: ReconstructionFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn size(&self) -> (usize, usize) {
        (self.bitmap.width(), self.bitmap.height())
    }

    pub fn filter(&self) -> ReconstructionFilter {
        self.filter
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    pub fn bitmap_mut(&mut self) -> &mut Bitmap {
        &mut self.bitmap
    }
}
