//! 5×5 Gaussian smoothing of the height field.
//!
//! Smoothing is recomputed from the raw heights every frame; nothing carries
//! over between frames. The smoother keeps a second vertex buffer and swaps it
//! with the live one, so steady-state frames do not allocate.

use super::grid::Vertex;
use crate::params::EdgeMode;

/// Kernel radius in vertices (5×5 window)
pub const KERNEL_RADIUS: usize = 2;

/// Kernel edge length
pub const KERNEL_SIZE: usize = 2 * KERNEL_RADIUS + 1;

/// Standard deviation of the smoothing kernel (in vertices)
pub const KERNEL_SIGMA: f32 = 1.0;

/// Normalized 2D Gaussian weights, `w(dx, dy) = exp(-(dx² + dy²) / 2σ²)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianKernel {
    weights: [[f32; KERNEL_SIZE]; KERNEL_SIZE],
}

impl GaussianKernel {
    pub fn new(sigma: f32) -> Self {
        let radius = KERNEL_RADIUS as i32;
        let mut weights = [[0.0; KERNEL_SIZE]; KERNEL_SIZE];
        let mut sum = 0.0;

        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let weight = (-((dx * dx + dy * dy) as f32) / (2.0 * sigma * sigma)).exp();
                weights[(dy + radius) as usize][(dx + radius) as usize] = weight;
                sum += weight;
            }
        }

        for row in weights.iter_mut() {
            for weight in row.iter_mut() {
                *weight /= sum;
            }
        }

        Self { weights }
    }

    /// Weight at offset (dx, dy) from the centre, each in `-2..=2`
    pub fn weight(&self, dx: i32, dy: i32) -> f32 {
        let radius = KERNEL_RADIUS as i32;
        self.weights[(dy + radius) as usize][(dx + radius) as usize]
    }

    pub fn sum(&self) -> f32 {
        self.weights.iter().flatten().sum()
    }
}

impl Default for GaussianKernel {
    fn default() -> Self {
        Self::new(KERNEL_SIGMA)
    }
}

/// Gaussian blur over the height component of a vertex grid
#[derive(Debug, Clone, Default)]
pub struct SpatialSmoother {
    kernel: GaussianKernel,
    edge_mode: EdgeMode,
    back_buffer: Vec<Vertex>,
}

impl SpatialSmoother {
    pub fn new(edge_mode: EdgeMode) -> Self {
        Self {
            kernel: GaussianKernel::default(),
            edge_mode,
            back_buffer: Vec::new(),
        }
    }

    pub fn kernel(&self) -> &GaussianKernel {
        &self.kernel
    }

    pub fn edge_mode(&self) -> EdgeMode {
        self.edge_mode
    }

    /// Smooth the heights of an `(x_size+1)` × `(y_size+1)` vertex grid in place.
    ///
    /// With [`EdgeMode::Raw`] only interior vertices (`2 <= x < x_size-1`,
    /// `2 <= y < y_size-1`) are blurred and the 2-vertex border keeps its raw
    /// height. With [`EdgeMode::Clamped`] every vertex is blurred and samples
    /// past the edge repeat the nearest edge vertex. X, Z and UV pass through.
    pub fn smooth(&mut self, vertices: &mut Vec<Vertex>, x_size: usize, y_size: usize) {
        let row = x_size + 1;
        debug_assert_eq!(vertices.len(), row * (y_size + 1));

        self.back_buffer.clear();
        self.back_buffer.extend_from_slice(vertices);

        match self.edge_mode {
            EdgeMode::Raw => {
                for y in KERNEL_RADIUS..y_size.saturating_sub(1) {
                    for x in KERNEL_RADIUS..x_size.saturating_sub(1) {
                        let height = self.blur_at(vertices, row, x, y, |nx, ny| (nx, ny));
                        self.back_buffer[y * row + x].position[1] = height;
                    }
                }
            }
            EdgeMode::Clamped => {
                let (max_x, max_y) = (x_size as i32, y_size as i32);
                for y in 0..=y_size {
                    for x in 0..=x_size {
                        let height = self.blur_at(vertices, row, x, y, |nx, ny| {
                            (nx.clamp(0, max_x), ny.clamp(0, max_y))
                        });
                        self.back_buffer[y * row + x].position[1] = height;
                    }
                }
            }
        }

        std::mem::swap(vertices, &mut self.back_buffer);
    }

    /// Weighted height average around (x, y); `sample` maps neighbour
    /// coordinates onto valid grid coordinates
    fn blur_at(
        &self,
        vertices: &[Vertex],
        row: usize,
        x: usize,
        y: usize,
        sample: impl Fn(i32, i32) -> (i32, i32),
    ) -> f32 {
        let radius = KERNEL_RADIUS as i32;
        let mut sum = 0.0;
        let mut weight_sum = 0.0;

        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let (nx, ny) = sample(x as i32 + dx, y as i32 + dy);
                let weight = self.kernel.weight(dx, dy);
                sum += vertices[ny as usize * row + nx as usize].position[1] * weight;
                weight_sum += weight;
            }
        }

        sum / weight_sum
    }
}
