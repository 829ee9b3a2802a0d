//! Camera placement for viewing the spectrum mesh.

/// Fixed camera looking across the grid
///
/// The grid occupies x in [0, 1] and depth in [0, 1] with heights rising
/// along +Y, so the default eye sits in front of and above the near edge.
#[derive(Debug, Clone)]
pub struct FixedCamera {
    /// Camera position (world units)
    pub position: [f32; 3],

    /// Look-at target (world units)
    pub target: [f32; 3],
}

impl Default for FixedCamera {
    fn default() -> Self {
        Self {
            position: [0.5, 1.1, -0.8],
            target: [0.5, 0.2, 0.5],
        }
    }
}
