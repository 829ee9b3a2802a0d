//! Parametric grid mesh: vertex layout, UVs and triangle indices.

use bytemuck::{Pod, Zeroable};

use crate::error::ConfigError;

/// Vertex data for the spectrum mesh (position + UV coordinates)
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    /// Y displacement written by the height mapper
    pub fn height(&self) -> f32 {
        self.position[1]
    }
}

/// (X+1)×(Y+1) vertex grid spanning [0, 1]² with a triangle index buffer
#[derive(Debug, Clone, Default)]
pub struct HeightFieldGrid {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    x_size: usize,
    y_size: usize,
}

impl HeightFieldGrid {
    /// Build a grid and assign its UVs
    pub fn new(x_size: usize, y_size: usize) -> Result<Self, ConfigError> {
        let mut grid = Self::default();
        grid.build(x_size, y_size)?;
        grid.set_uvs();
        Ok(grid)
    }

    pub fn x_size(&self) -> usize {
        self.x_size
    }

    pub fn y_size(&self) -> usize {
        self.y_size
    }

    /// Row-major vertex index for grid coordinate (x, y)
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * (self.x_size + 1) + x
    }

    /// (Re)allocate vertices and triangle indices for an `x_size` × `y_size` grid.
    ///
    /// Vertices sit at `(x / x_size, y / y_size, 0)` in row-major order. Each
    /// cell with bottom-left vertex `v` emits `v, v+X+1, v+1` and
    /// `v+1, v+X+1, v+X+2`.
    pub fn build(&mut self, x_size: usize, y_size: usize) -> Result<(), ConfigError> {
        if x_size == 0 || y_size == 0 {
            return Err(ConfigError::InvalidGridSize { x_size, y_size });
        }
        let vertex_count = (x_size + 1)
            .checked_mul(y_size + 1)
            .filter(|&count| count <= u32::MAX as usize)
            .ok_or(ConfigError::GridTooLarge { x_size, y_size })?;

        self.x_size = x_size;
        self.y_size = y_size;

        self.vertices.clear();
        self.vertices.reserve(vertex_count);
        for y in 0..=y_size {
            for x in 0..=x_size {
                self.vertices.push(Vertex {
                    position: [x as f32 / x_size as f32, y as f32 / y_size as f32, 0.0],
                    uv: [0.0, 0.0],
                });
            }
        }

        let row = (x_size + 1) as u32;
        self.indices.clear();
        self.indices.reserve(x_size * y_size * 6);
        for y in 0..y_size {
            for x in 0..x_size {
                let v = self.index(x, y) as u32;
                self.indices
                    .extend_from_slice(&[v, v + row, v + 1, v + 1, v + row, v + row + 1]);
            }
        }

        Ok(())
    }

    /// Assign UV = parametric grid position to every vertex
    pub fn set_uvs(&mut self) {
        let (x_size, y_size) = (self.x_size as f32, self.y_size as f32);
        let row = self.x_size + 1;
        for (i, vertex) in self.vertices.iter_mut().enumerate() {
            let (x, y) = (i % row, i / row);
            vertex.uv = [x as f32 / x_size, y as f32 / y_size];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_counts() {
        for (x_size, y_size) in [(1, 1), (2, 2), (10, 10), (7, 3), (64, 1)] {
            let grid = HeightFieldGrid::new(x_size, y_size).unwrap();
            let vertex_count = (x_size + 1) * (y_size + 1);

            assert_eq!(grid.vertices.len(), vertex_count);
            assert_eq!(grid.indices.len(), x_size * y_size * 6);
            assert!(grid
                .indices
                .iter()
                .all(|&i| (i as usize) < vertex_count));
        }
    }

    #[test]
    fn test_two_by_two_winding() {
        let grid = HeightFieldGrid::new(2, 2).unwrap();

        #[rustfmt::skip]
        let expected: Vec<u32> = vec![
            0, 3, 1,  1, 3, 4,   // cell (0, 0)
            1, 4, 2,  2, 4, 5,   // cell (1, 0)
            3, 6, 4,  4, 6, 7,   // cell (0, 1)
            4, 7, 5,  5, 7, 8,   // cell (1, 1)
        ];
        assert_eq!(grid.indices, expected);
    }

    #[test]
    fn test_parametric_layout() {
        let grid = HeightFieldGrid::new(4, 2).unwrap();

        assert_eq!(grid.vertices[0].position, [0.0, 0.0, 0.0]);
        assert_eq!(grid.vertices[grid.index(4, 0)].position, [1.0, 0.0, 0.0]);
        assert_eq!(grid.vertices[grid.index(2, 1)].position, [0.5, 0.5, 0.0]);
        assert_eq!(grid.vertices[grid.index(4, 2)].position, [1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_uvs_mirror_positions() {
        let mut grid = HeightFieldGrid::default();
        grid.build(3, 5).unwrap();
        assert!(grid.vertices.iter().all(|v| v.uv == [0.0, 0.0]));

        grid.set_uvs();
        for vertex in &grid.vertices {
            assert_eq!(vertex.uv, [vertex.position[0], vertex.position[1]]);
        }
    }

    #[test]
    fn test_rebuild_replaces_buffers() {
        let mut grid = HeightFieldGrid::new(8, 8).unwrap();
        grid.build(2, 3).unwrap();

        assert_eq!(grid.vertices.len(), 12);
        assert_eq!(grid.indices.len(), 36);
        assert_eq!((grid.x_size(), grid.y_size()), (2, 3));
    }

    #[test]
    fn test_rejects_zero_sized_grid() {
        assert_eq!(
            HeightFieldGrid::new(0, 4).unwrap_err(),
            ConfigError::InvalidGridSize {
                x_size: 0,
                y_size: 4
            }
        );
        assert!(HeightFieldGrid::new(4, 0).is_err());

        // A failed build leaves the previous grid intact
        let mut grid = HeightFieldGrid::new(2, 2).unwrap();
        assert!(grid.build(0, 0).is_err());
        assert_eq!(grid.vertices.len(), 9);
    }
}
