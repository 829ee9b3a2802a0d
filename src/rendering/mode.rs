//! Solid / wireframe presentation state.

use std::fmt;

/// How the mesh is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    Solid,
    Wireframe,
}

impl RenderMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Solid => Self::Wireframe,
            Self::Wireframe => Self::Solid,
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Solid => write!(f, "solid"),
            Self::Wireframe => write!(f, "wireframe"),
        }
    }
}

/// Interpretation of the shared index buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    /// Every 3 indices form a filled triangle
    Triangles,
    /// Every 2 indices form a line segment
    Lines,
}

/// Material bound for drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Material {
    /// Height-shaded, depth-writing fill
    Regular,
    /// Unlit, alpha-blended lines without depth writes or culling
    Wireframe,
}

/// Topology + material pair the renderer draws with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderBinding {
    pub topology: Topology,
    pub material: Material,
}

impl RenderBinding {
    pub fn for_mode(mode: RenderMode) -> Self {
        match mode {
            RenderMode::Solid => Self {
                topology: Topology::Triangles,
                material: Material::Regular,
            },
            RenderMode::Wireframe => Self {
                topology: Topology::Lines,
                material: Material::Wireframe,
            },
        }
    }
}

/// Two-state controller flipping between solid and wireframe on each trigger
#[derive(Debug, Clone)]
pub struct RenderModeController {
    mode: RenderMode,
    binding: RenderBinding,
}

impl Default for RenderModeController {
    fn default() -> Self {
        Self::new(RenderMode::Solid)
    }
}

impl RenderModeController {
    pub fn new(mode: RenderMode) -> Self {
        Self {
            mode,
            binding: RenderBinding::for_mode(mode),
        }
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Currently bound topology and material
    pub fn binding(&self) -> RenderBinding {
        self.binding
    }

    /// Flip the mode and rebind topology and material
    pub fn toggle(&mut self) -> RenderBinding {
        self.mode = self.mode.toggled();
        self.binding = RenderBinding::for_mode(self.mode);
        log::info!("Render mode: {}", self.mode);
        self.binding
    }
}
