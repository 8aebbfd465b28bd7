use crate::core::{FrameError, FrameSink, Scene};
use web_sys as web;
use wgpu::util::DeviceExt;

mod helpers;
mod mesh;

use helpers::{srgb3_to_linear, PipelineSpec};
use mesh::{GpuMesh, MeshVertex};

pub static MESH_WGSL: &str = concat!(
    include_str!("../shaders/common.wgsl"),
    include_str!("../shaders/mesh.wgsl")
);
pub static PARTICLES_WGSL: &str = concat!(
    include_str!("../shaders/common.wgsl"),
    include_str!("../shaders/particles.wgsl")
);

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct SceneUniforms {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    camera_right: [f32; 4],
    camera_up: [f32; 4],
    particle_scale: [f32; 4],
    particle_color: [f32; 4],
    ambient: [f32; 4],
    light_pos: [f32; 4],
    light_color: [f32; 4],
}

const _: () = assert!(std::mem::size_of::<SceneUniforms>() % 16 == 0);

impl SceneUniforms {
    fn from_scene(scene: &Scene) -> Self {
        let view = scene.camera.view_matrix();
        // Rows of the view rotation are the camera axes in world space.
        let right = view.row(0).truncate();
        let up = view.row(1).truncate();
        let p = &scene.particles;
        let ambient = srgb3_to_linear(scene.ambient.color).map(|c| c * scene.ambient.intensity);
        let light =
            srgb3_to_linear(scene.point_light.color).map(|c| c * scene.point_light.intensity);
        let lp = scene.point_light.position;
        Self {
            view_proj: scene.camera.view_proj().to_cols_array_2d(),
            model: scene.model_matrix().to_cols_array_2d(),
            camera_right: [right.x, right.y, right.z, p.size],
            camera_up: [up.x, up.y, up.z, p.opacity],
            particle_scale: [p.scale.x, p.scale.y, p.scale.z, 1.0],
            particle_color: with_w(srgb3_to_linear(p.color), 1.0),
            ambient: with_w(ambient, 1.0),
            light_pos: [lp.x, lp.y, lp.z, 1.0],
            light_color: with_w(light, 1.0),
        }
    }
}

#[inline]
fn with_w(v: [f32; 3], w: f32) -> [f32; 4] {
    [v[0], v[1], v[2], w]
}

pub struct GpuState {
    canvas: web::HtmlCanvasElement,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,

    mesh_pipeline: wgpu::RenderPipeline,
    model_meshes: Vec<GpuMesh>,
    model_generation: u64,

    particle_pipeline: wgpu::RenderPipeline,
    quad_vb: wgpu::Buffer,
    particle_vb: wgpu::Buffer,
    particle_count: u32,

    #[allow(dead_code)]
    depth_tex: wgpu::Texture,
    depth_view: wgpu::TextureView,
    #[allow(dead_code)]
    msaa_tex: wgpu::Texture,
    msaa_view: wgpu::TextureView,

    width: u32,
    height: u32,
}

impl GpuState {
    pub async fn new(canvas: &web::HtmlCanvasElement, scene: &Scene) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Use default limits on web to avoid passing unknown fields to older WebGPU impls
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scene_uniforms"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_bg"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pl"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });

        let mesh_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mesh_shader"),
            source: wgpu::ShaderSource::Wgsl(MESH_WGSL.into()),
        });
        let mesh_pipeline = helpers::make_scene_pipeline(
            &device,
            PipelineSpec {
                label: "mesh_pipeline",
                layout: &pipeline_layout,
                shader: &mesh_shader,
                buffers: &[MeshVertex::layout()],
                color_format: format,
                blend: Some(wgpu::BlendState::REPLACE),
                depth_write: true,
            },
        );

        let particle_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("particle_shader"),
            source: wgpu::ShaderSource::Wgsl(PARTICLES_WGSL.into()),
        });
        let particle_buffers = [
            // slot 0: quad corners
            wgpu::VertexBufferLayout {
                array_stride: (std::mem::size_of::<f32>() * 2) as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 0,
                    shader_location: 0,
                }],
            },
            // slot 1: particle centers
            wgpu::VertexBufferLayout {
                array_stride: (std::mem::size_of::<f32>() * 3) as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 1,
                }],
            },
        ];
        let particle_pipeline = helpers::make_scene_pipeline(
            &device,
            PipelineSpec {
                label: "particle_pipeline",
                layout: &pipeline_layout,
                shader: &particle_shader,
                buffers: &particle_buffers,
                color_format: format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                depth_write: false,
            },
        );

        // Quad vertices for two triangles
        let quad_vertices: [f32; 12] = [
            -0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, -0.5, 0.5, 0.5, -0.5, 0.5,
        ];
        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vb"),
            contents: bytemuck::cast_slice(&quad_vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        // Particle centers never move; the per-frame scale goes through uniforms.
        let centers: Vec<[f32; 3]> = scene
            .particles
            .positions
            .iter()
            .map(|p| p.to_array())
            .collect();
        let particle_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("particle_vb"),
            contents: bytemuck::cast_slice(&centers),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let (depth_tex, depth_view) = helpers::create_depth_texture(&device, width, height);
        let (msaa_tex, msaa_view) = helpers::create_msaa_target(&device, format, width, height);

        log::info!(
            "WebGPU ready: {:?} {}x{} ({}x MSAA), {} particles",
            format,
            width,
            height,
            helpers::MSAA_SAMPLES,
            centers.len()
        );

        Ok(Self {
            canvas: canvas.clone(),
            surface,
            device,
            queue,
            config,
            uniform_buffer,
            bind_group,
            mesh_pipeline,
            model_meshes: Vec::new(),
            model_generation: 0,
            particle_pipeline,
            quad_vb,
            particle_vb,
            particle_count: centers.len() as u32,
            depth_tex,
            depth_view,
            msaa_tex,
            msaa_view,
            width,
            height,
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            (self.depth_tex, self.depth_view) =
                helpers::create_depth_texture(&self.device, width, height);
            (self.msaa_tex, self.msaa_view) =
                helpers::create_msaa_target(&self.device, self.config.format, width, height);
        }
    }

    fn sync_model(&mut self, scene: &Scene) {
        let generation = scene.model.generation();
        if generation == self.model_generation {
            return;
        }
        self.model_generation = generation;
        self.model_meshes = match scene.model.get() {
            Some(model) => GpuMesh::upload_model(&self.device, &model),
            None => Vec::new(),
        };
        log::info!("uploaded {} model meshes", self.model_meshes.len());
    }

    fn render(&mut self, scene: &Scene) -> Result<(), wgpu::SurfaceError> {
        self.resize_if_needed(self.canvas.width(), self.canvas.height());
        self.sync_model(scene);

        let uniforms = SceneUniforms::from_scene(scene);
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let [r, g, b] = srgb3_to_linear(scene.background);
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.msaa_view,
                    resolve_target: Some(&view),
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        // only the resolved swapchain image is kept
                        store: wgpu::StoreOp::Discard,
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
            rpass.set_bind_group(0, &self.bind_group, &[]);

            // Opaque model first so particles depth-test against it.
            if !self.model_meshes.is_empty() {
                rpass.set_pipeline(&self.mesh_pipeline);
                for m in &self.model_meshes {
                    m.draw(&mut rpass);
                }
            }

            if self.particle_count > 0 {
                rpass.set_pipeline(&self.particle_pipeline);
                rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
                rpass.set_vertex_buffer(1, self.particle_vb.slice(..));
                rpass.draw(0..6, 0..self.particle_count);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

impl FrameSink for GpuState {
    fn submit(&mut self, scene: &Scene) -> Result<(), FrameError> {
        self.render(scene).map_err(|e| match e {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                self.surface.configure(&self.device, &self.config);
                FrameError::SurfaceLost
            }
            wgpu::SurfaceError::OutOfMemory => FrameError::OutOfMemory,
            wgpu::SurfaceError::Timeout => FrameError::Timeout,
            other => FrameError::Other(format!("{:?}", other)),
        })
    }
}
