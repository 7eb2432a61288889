use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::coords::Rect;
use crate::paint::Color;
use crate::render::RenderTarget;

use super::common::{clip_region, premul_alpha_blend, region_crop, scissor_rect};

/// Primitive assembly for an uploaded mesh.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Topology {
    /// Index pairs, drawn as 1 px lines (wireframes, paths).
    Lines,
    /// Index triples, drawn filled.
    Triangles,
}

/// CPU-side mesh handed to [`MeshRenderer::upload`].
#[derive(Debug, Copy, Clone)]
pub struct MeshData<'a> {
    pub positions: &'a [[f32; 3]],
    pub indices: &'a [u32],
    pub topology: Topology,
}

/// Mesh resident on the GPU.
///
/// Owned by whoever uploaded it; call [`GpuMesh::destroy`] to free the buffers
/// eagerly instead of waiting for the drop.
#[derive(Debug)]
pub struct GpuMesh {
    vbo: wgpu::Buffer,
    ibo: wgpu::Buffer,
    index_count: u32,
    topology: Topology,
}

impl GpuMesh {
    #[inline]
    pub fn topology(&self) -> Topology {
        self.topology
    }

    #[inline]
    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn destroy(&self) {
        self.vbo.destroy();
        self.ibo.destroy();
    }
}

/// One mesh drawn with a model transform and a premultiplied color.
#[derive(Debug, Copy, Clone)]
pub struct MeshInstance<'a> {
    pub mesh: &'a GpuMesh,
    pub model: Mat4,
    pub color: Color,
}

/// Renderer for line and triangle meshes confined to a screen region.
///
/// Holds its own clones of the device and queue, so it can be owned by a
/// component that outlives any single frame. Pipelines and buffers are created
/// lazily on first use and freed by [`MeshRenderer::release`].
pub struct MeshRenderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    format: wgpu::TextureFormat,

    line_pipeline: Option<wgpu::RenderPipeline>,
    fill_pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    globals_ubo: Option<wgpu::Buffer>,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,
}

impl MeshRenderer {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, format: wgpu::TextureFormat) -> Self {
        Self {
            device: device.clone(),
            queue: queue.clone(),
            format,
            line_pipeline: None,
            fill_pipeline: None,
            bind_group_layout: None,
            bind_group: None,
            globals_ubo: None,
            instance_vbo: None,
            instance_capacity: 0,
        }
    }

    /// Uploads mesh data. Empty meshes still produce valid (4-byte) buffers.
    pub fn upload(&self, data: MeshData<'_>) -> GpuMesh {
        let vbo = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("folio mesh vbo"),
            contents: non_empty_bytes(bytemuck::cast_slice(data.positions)),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let ibo = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("folio mesh ibo"),
            contents: non_empty_bytes(bytemuck::cast_slice(data.indices)),
            usage: wgpu::BufferUsages::INDEX,
        });

        GpuMesh {
            vbo,
            ibo,
            index_count: data.indices.len() as u32,
            topology: data.topology,
        }
    }

    /// Records one pass drawing `instances` into the part of `region` that is on screen.
    ///
    /// `view_proj` is laid out over the whole region; nothing is recorded when the
    /// region is off screen or there is nothing to draw.
    pub fn render(
        &mut self,
        target: &mut RenderTarget<'_>,
        region: Rect,
        view_proj: Mat4,
        instances: &[MeshInstance<'_>],
    ) {
        let instances: Vec<&MeshInstance<'_>> =
            instances.iter().filter(|i| i.mesh.index_count > 0).collect();
        if instances.is_empty() {
            return;
        }

        let Some(visible) = clip_region(region, target.extent) else { return };
        let Some((sx, sy, sw, sh)) = scissor_rect(visible, target.extent) else { return };

        self.ensure_pipelines();
        self.ensure_bindings();
        self.ensure_instance_capacity(instances.len());

        let srgb = self.format.is_srgb();
        let raw: Vec<MeshInstanceRaw> = instances
            .iter()
            .map(|i| {
                let color = if srgb { i.color.linearized() } else { i.color };
                MeshInstanceRaw {
                    model: i.model.to_cols_array_2d(),
                    color: color.to_array(),
                }
            })
            .collect();

        let Some(globals_ubo) = self.globals_ubo.as_ref() else { return };
        let Some(instance_vbo) = self.instance_vbo.as_ref() else { return };
        let Some(line_pipeline) = self.line_pipeline.as_ref() else { return };
        let Some(fill_pipeline) = self.fill_pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };

        let globals = Globals {
            view_proj: (region_crop(region, visible) * view_proj).to_cols_array_2d(),
        };
        self.queue.write_buffer(globals_ubo, 0, bytemuck::bytes_of(&globals));
        self.queue.write_buffer(instance_vbo, 0, bytemuck::cast_slice(&raw));

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("folio mesh pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_viewport(visible.x, visible.y, visible.width, visible.height, 0.0, 1.0);
        rpass.set_scissor_rect(sx, sy, sw, sh);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));

        let mut bound: Option<Topology> = None;
        for (i, inst) in instances.iter().enumerate() {
            let mesh = inst.mesh;
            if bound != Some(mesh.topology) {
                rpass.set_pipeline(match mesh.topology {
                    Topology::Lines => line_pipeline,
                    Topology::Triangles => fill_pipeline,
                });
                bound = Some(mesh.topology);
            }

            let i = i as u32;
            rpass.set_vertex_buffer(0, mesh.vbo.slice(..));
            rpass.set_index_buffer(mesh.ibo.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..mesh.index_count, 0, i..i + 1);
        }
    }

    /// Frees the renderer's own buffers. Pipelines are dropped with them.
    ///
    /// Meshes uploaded through this renderer are owned by the caller and freed separately.
    pub fn release(&mut self) {
        if let Some(ubo) = self.globals_ubo.take() {
            ubo.destroy();
        }
        if let Some(vbo) = self.instance_vbo.take() {
            vbo.destroy();
        }
        self.instance_capacity = 0;
        self.bind_group = None;
        self.bind_group_layout = None;
        self.line_pipeline = None;
        self.fill_pipeline = None;
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn ensure_pipelines(&mut self) {
        if self.line_pipeline.is_some() && self.fill_pipeline.is_some() {
            return;
        }

        let shader = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("folio mesh shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });

        let bind_group_layout =
            self.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("folio mesh bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<Globals>() as u64,
                        ),
                    },
                    count: None,
                }],
            });

        let pipeline_layout =
            self.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("folio mesh pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let make = |topology: wgpu::PrimitiveTopology, label: &str| {
            self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[vertex_layout(), MeshInstanceRaw::layout()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: self.format,
                        blend: Some(premul_alpha_blend()),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            })
        };

        self.line_pipeline = Some(make(wgpu::PrimitiveTopology::LineList, "folio mesh line pipeline"));
        self.fill_pipeline =
            Some(make(wgpu::PrimitiveTopology::TriangleList, "folio mesh fill pipeline"));
        self.bind_group_layout = Some(bind_group_layout);
        self.bind_group = None;
        self.globals_ubo = None;
    }

    fn ensure_bindings(&mut self) {
        if self.bind_group.is_some() && self.globals_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let globals_ubo = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("folio mesh globals ubo"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("folio mesh bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_ubo.as_entire_binding(),
            }],
        });

        self.globals_ubo = Some(globals_ubo);
        self.bind_group = Some(bind_group);
    }

    fn ensure_instance_capacity(&mut self, required: usize) {
        if required <= self.instance_capacity && self.instance_vbo.is_some() {
            return;
        }
        if let Some(old) = self.instance_vbo.take() {
            old.destroy();
        }
        let new_cap = required.next_power_of_two().max(16);
        let new_size = (new_cap * std::mem::size_of::<MeshInstanceRaw>()) as u64;
        self.instance_vbo = Some(self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("folio mesh instance vbo"),
            size: new_size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.instance_capacity = new_cap;
    }
}

/// wgpu rejects zero-sized initialized buffers.
fn non_empty_bytes(bytes: &[u8]) -> &[u8] {
    const PAD: [u8; 4] = [0; 4];
    if bytes.is_empty() { &PAD } else { bytes }
}

// ── GPU types ─────────────────────────────────────────────────────────────

const VERTEX_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 3]>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRS,
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
}

/// Instance data layout (80 bytes):
///
///  offset  0  model  [[f32; 4]; 4]  loc 1..=4 (columns)
///  offset 64  color  [f32; 4]       loc 5     (premultiplied)
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct MeshInstanceRaw {
    model: [[f32; 4]; 4],
    color: [f32; 4],
}

impl MeshInstanceRaw {
    const ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        1 => Float32x4, // model col 0
        2 => Float32x4, // model col 1
        3 => Float32x4, // model col 2
        4 => Float32x4, // model col 3
        5 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshInstanceRaw>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}
