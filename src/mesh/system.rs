//! Per-frame mesh pipeline: spectrum refresh, height mapping, smoothing.

use super::grid::HeightFieldGrid;
use super::height::SpectralHeightMapper;
use super::smooth::SpatialSmoother;
use crate::audio::SpectrumSource;
use crate::error::ConfigError;
use crate::params::MeshParams;

/// Spectrum-driven grid mesh with its (optional) audio source
pub struct SpectrumMesh<S> {
    pub grid: HeightFieldGrid,
    params: MeshParams,
    mapper: Option<SpectralHeightMapper<S>>,
    smoother: SpatialSmoother,
    /// Set by `resize` until the next `update` reports it
    resized: bool,
}

impl<S: SpectrumSource> SpectrumMesh<S> {
    /// Build the grid for `params`; no source is attached yet
    pub fn new(params: MeshParams) -> Result<Self, ConfigError> {
        params.validate()?;
        let grid = HeightFieldGrid::new(params.x_size, params.y_size)?;
        let smoother = SpatialSmoother::new(params.edge_mode);

        Ok(Self {
            grid,
            params,
            mapper: None,
            smoother,
            resized: false,
        })
    }

    /// Build the grid and attach `source` in one go
    pub fn with_source(params: MeshParams, source: S) -> Result<Self, ConfigError> {
        let mut mesh = Self::new(params)?;
        mesh.attach_source(source);
        Ok(mesh)
    }

    pub fn params(&self) -> &MeshParams {
        &self.params
    }

    pub fn has_source(&self) -> bool {
        self.mapper.is_some()
    }

    pub fn source(&self) -> Option<&S> {
        self.mapper.as_ref().map(SpectralHeightMapper::source)
    }

    pub fn source_mut(&mut self) -> Option<&mut S> {
        self.mapper.as_mut().map(SpectralHeightMapper::source_mut)
    }

    /// Attach (or replace) the spectrum source driving the heights
    pub fn attach_source(&mut self, source: S) {
        self.mapper = Some(SpectralHeightMapper::new(source, &self.params));
    }

    /// Detach and return the current source; later updates are skipped
    pub fn detach_source(&mut self) -> Option<S> {
        self.mapper.take().map(SpectralHeightMapper::into_source)
    }

    /// Rebuild the grid at a new resolution (UVs included).
    ///
    /// The next `update` reports the vertices as changed even without a
    /// source, so the render backend reallocates its buffers.
    pub fn resize(&mut self, x_size: usize, y_size: usize) -> Result<(), ConfigError> {
        self.grid.build(x_size, y_size)?;
        self.grid.set_uvs();
        self.params.x_size = x_size;
        self.params.y_size = y_size;
        self.resized = true;
        Ok(())
    }

    /// Run one frame of the pipeline: refresh → map heights → smooth.
    ///
    /// Returns whether the vertices changed since the last call. Without a
    /// source the heights are left untouched.
    pub fn update(&mut self) -> bool {
        let resized = std::mem::take(&mut self.resized);
        let Some(mapper) = self.mapper.as_mut() else {
            return resized;
        };

        mapper.write_heights(&mut self.grid.vertices);
        let (x_size, y_size) = (self.grid.x_size(), self.grid.y_size());
        self.smoother.smooth(&mut self.grid.vertices, x_size, y_size);
        true
    }
}
