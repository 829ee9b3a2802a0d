//! Rendering system with wgpu pipelines for both presentation materials.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use std::sync::Arc;
use wgpu::util::DeviceExt;

use super::mode::{Material, RenderBinding, RenderMode, Topology};
use crate::error::RenderError;
use crate::mesh::{HeightFieldGrid, Vertex};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Half-extent of the wave marker (world units)
const MARKER_RADIUS: f32 = 0.04;

/// Uniform buffer for the mesh shader
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Uniforms {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    /// Line color for the wireframe material
    pub color: [f32; 4],
    /// Height that maps to the top of the color gradient
    pub max_height: f32,
    /// How far `uv.y` pushes a vertex along +Z (1 for the grid, 0 for solids)
    pub uv_depth: f32,
    pub _padding: [f32; 2],
}

impl Default for Uniforms {
    fn default() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            model: Mat4::IDENTITY.to_cols_array_2d(),
            color: [1.0; 4],
            max_height: 1.0,
            uv_depth: 0.0,
            _padding: [0.0; 2],
        }
    }
}

impl From<Topology> for wgpu::PrimitiveTopology {
    fn from(topology: Topology) -> Self {
        match topology {
            Topology::Triangles => wgpu::PrimitiveTopology::TriangleList,
            Topology::Lines => wgpu::PrimitiveTopology::LineList,
        }
    }
}

/// Element counts a set of mesh buffers was allocated for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BufferLayout {
    vertices: usize,
    indices: usize,
}

impl BufferLayout {
    fn of(grid: &HeightFieldGrid) -> Self {
        Self {
            vertices: grid.vertices.len(),
            indices: grid.indices.len(),
        }
    }
}

/// Vertex and index buffers for one drawable
struct MeshBuffers {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    layout: BufferLayout,
}

impl MeshBuffers {
    fn new(device: &wgpu::Device, label: &str, vertices: &[Vertex], indices: &[u32]) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Index Buffer")),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            layout: BufferLayout {
                vertices: vertices.len(),
                indices: indices.len(),
            },
        }
    }
}

/// Uniform buffer plus the bind group exposing it
struct UniformSlot {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl UniformSlot {
    fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, label: &str) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Uniform Buffer")),
            contents: bytemuck::cast_slice(&[Uniforms::default()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label} Bind Group")),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self { buffer, bind_group }
    }
}

/// Rendering system managing wgpu device, pipelines, and buffers
pub struct RenderSystem {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    /// One pipeline per presentation binding, sharing the mesh buffers
    pipelines: [(RenderBinding, wgpu::RenderPipeline); 2],
    mesh: MeshBuffers,
    marker: MeshBuffers,
    mesh_uniforms: UniformSlot,
    marker_uniforms: UniformSlot,
}

impl RenderSystem {
    /// Create new rendering system
    pub async fn new(
        window: Arc<winit::window::Window>,
        grid: &HeightFieldGrid,
    ) -> Result<Self, RenderError> {
        let size = window.inner_size();

        // Create wgpu instance
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // Create surface (window must have 'static lifetime via Arc)
        let surface = instance.create_surface(window)?;

        // Request adapter
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::NoAdapter)?;

        // Request device
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        // Configure surface
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(RenderError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_view = create_depth_view(&device, config.width, config.height);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Spectrum Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("mesh.wgsl").into()),
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Uniform Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Render Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipelines = [RenderMode::Solid, RenderMode::Wireframe].map(|mode| {
            let binding = RenderBinding::for_mode(mode);
            let pipeline =
                create_pipeline(&device, &pipeline_layout, &shader, config.format, binding);
            (binding, pipeline)
        });

        let mesh = MeshBuffers::new(&device, "Mesh", &grid.vertices, &grid.indices);
        let (marker_vertices, marker_indices) = marker_geometry(MARKER_RADIUS);
        let marker = MeshBuffers::new(&device, "Marker", &marker_vertices, &marker_indices);

        let mesh_uniforms = UniformSlot::new(&device, &uniform_bind_group_layout, "Mesh");
        let marker_uniforms = UniformSlot::new(&device, &uniform_bind_group_layout, "Marker");

        log::info!(
            "Renderer: {} ({:?}), surface {:?} {}x{}",
            adapter.get_info().name,
            adapter.get_info().backend,
            config.format,
            config.width,
            config.height
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_view,
            pipelines,
            mesh,
            marker,
            mesh_uniforms,
            marker_uniforms,
        })
    }

    /// Reconfigure the surface and depth buffer for a new window size
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_view(&self.device, width, height);
    }

    /// Reconfigure with the current size (after a lost or outdated surface)
    pub fn reconfigure(&mut self) {
        self.resize(self.config.width, self.config.height);
    }

    /// Upload the grid's vertices, reallocating both buffers when the grid
    /// was rebuilt at a different resolution
    pub fn upload_mesh(&mut self, grid: &HeightFieldGrid) {
        if BufferLayout::of(grid) != self.mesh.layout {
            self.rebuild_mesh(grid);
            return;
        }
        self.queue.write_buffer(
            &self.mesh.vertex_buffer,
            0,
            bytemuck::cast_slice(&grid.vertices),
        );
    }

    /// Recreate the mesh vertex and index buffers for `grid`
    fn rebuild_mesh(&mut self, grid: &HeightFieldGrid) {
        log::info!(
            "Rebuilding mesh buffers: {} vertices, {} indices",
            grid.vertices.len(),
            grid.indices.len()
        );
        self.mesh = MeshBuffers::new(&self.device, "Mesh", &grid.vertices, &grid.indices);
    }

    /// Update per-draw uniforms for the mesh and the wave marker
    pub fn update_uniforms(&self, mesh: &Uniforms, marker_position: Vec3) {
        self.queue
            .write_buffer(&self.mesh_uniforms.buffer, 0, bytemuck::cast_slice(&[*mesh]));

        let marker = Uniforms {
            model: Mat4::from_translation(marker_position).to_cols_array_2d(),
            uv_depth: 0.0,
            ..*mesh
        };
        self.queue.write_buffer(
            &self.marker_uniforms.buffer,
            0,
            bytemuck::cast_slice(&[marker]),
        );
    }

    /// Render a frame with the given topology and material
    pub fn render(&self, binding: RenderBinding) -> Result<(), wgpu::SurfaceError> {
        let pipeline = self
            .pipelines
            .iter()
            .find(|(candidate, _)| *candidate == binding)
            .map(|(_, pipeline)| pipeline)
            .unwrap_or(&self.pipelines[0].1);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.02,
                            g: 0.02,
                            b: 0.04,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(pipeline);

            for (buffers, uniforms) in [
                (&self.mesh, &self.mesh_uniforms),
                (&self.marker, &self.marker_uniforms),
            ] {
                render_pass.set_bind_group(0, &uniforms.bind_group, &[]);
                render_pass.set_vertex_buffer(0, buffers.vertex_buffer.slice(..));
                render_pass
                    .set_index_buffer(buffers.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..buffers.index_count, 0, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

/// Build the pipeline for one topology + material pair
fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    binding: RenderBinding,
) -> wgpu::RenderPipeline {
    let (label, fragment_entry, blend, depth_write_enabled) = match binding.material {
        Material::Regular => ("Solid Pipeline", "fs_solid", None, true),
        Material::Wireframe => (
            "Wireframe Pipeline",
            "fs_wire",
            Some(wgpu::BlendState::ALPHA_BLENDING),
            false,
        ),
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[
                    wgpu::VertexAttribute {
                        offset: 0,
                        shader_location: 0,
                        format: wgpu::VertexFormat::Float32x3,
                    },
                    wgpu::VertexAttribute {
                        offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                        shader_location: 1,
                        format: wgpu::VertexFormat::Float32x2,
                    },
                ],
            }],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fragment_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: binding.topology.into(),
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

/// Octahedron centred on the origin, drawn at the wave marker position
fn marker_geometry(radius: f32) -> (Vec<Vertex>, Vec<u32>) {
    let r = radius;
    let positions = [
        [r, 0.0, 0.0],
        [-r, 0.0, 0.0],
        [0.0, r, 0.0],
        [0.0, -r, 0.0],
        [0.0, 0.0, r],
        [0.0, 0.0, -r],
    ];
    let vertices = positions
        .iter()
        .map(|&position| Vertex {
            position,
            uv: [0.0, 0.0],
        })
        .collect();

    #[rustfmt::skip]
    let indices = vec![
        0, 2, 4,  4, 2, 1,  1, 2, 5,  5, 2, 0,
        4, 3, 0,  1, 3, 4,  5, 3, 1,  0, 3, 5,
    ];

    (vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_layout_matches_wgsl() {
        // 2 × mat4x4 + vec4 + 2 × f32 + padding, 16-byte aligned
        assert_eq!(std::mem::size_of::<Uniforms>(), 160);
        assert_eq!(std::mem::size_of::<Uniforms>() % 16, 0);
    }

    #[test]
    fn test_vertex_layout() {
        assert_eq!(std::mem::size_of::<Vertex>(), 20);
    }

    #[test]
    fn test_topology_mapping() {
        assert_eq!(
            wgpu::PrimitiveTopology::from(Topology::Triangles),
            wgpu::PrimitiveTopology::TriangleList
        );
        assert_eq!(
            wgpu::PrimitiveTopology::from(Topology::Lines),
            wgpu::PrimitiveTopology::LineList
        );
    }

    #[test]
    fn test_marker_geometry_draws_as_both_topologies() {
        let (vertices, indices) = marker_geometry(1.0);
        assert_eq!(vertices.len(), 6);
        assert_eq!(indices.len() % 3, 0);
        assert_eq!(indices.len() % 2, 0);
        assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
    }

    #[test]
    fn test_buffer_layout_follows_grid_rebuild() {
        let mut grid = HeightFieldGrid::new(4, 4).unwrap();
        let allocated = BufferLayout::of(&grid);

        grid.build(4, 4).unwrap();
        assert_eq!(BufferLayout::of(&grid), allocated);

        grid.build(8, 2).unwrap();
        let resized = BufferLayout::of(&grid);
        assert_ne!(resized, allocated);
        assert_eq!(resized.vertices, 9 * 3);
        assert_eq!(resized.indices, 8 * 2 * 6);
    }

    #[test]
    fn test_grid_indices_draw_as_lines() {
        let grid = HeightFieldGrid::new(5, 3).unwrap();
        assert_eq!(grid.indices.len() % 2, 0);
    }
}
