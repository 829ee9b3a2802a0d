//! Audio-reactive spectrum mesh: grid topology, height mapping and smoothing.

mod grid;
mod height;
mod smooth;
mod system;

// Re-export public types
pub use grid::{HeightFieldGrid, Vertex};
pub use height::{apply_spectrum, SpectralHeightMapper};
pub use smooth::{GaussianKernel, SpatialSmoother, KERNEL_RADIUS, KERNEL_SIGMA, KERNEL_SIZE};
pub use system::SpectrumMesh;
