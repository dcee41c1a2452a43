use crate::avatar_asset::AvatarMesh;
use crate::dom;
use glam::Mat4;
use viewer_core::constants::MAX_AVATAR_NODES;
use viewer_core::{ContainerSize, FrameSnapshot, LightRig, RenderSurface, SurfaceSize};
use web_sys as web;
use wgpu;
use wgpu::util::DeviceExt;

mod helpers;

// ===================== Uniform layouts (must match avatar.wgsl) =====================

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct SceneUniforms {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    ambient: [f32; 4],
    light_dir: [f32; 4],
    light_color: [f32; 4],
    point_pos: [f32; 4],
    point_color: [f32; 4],
}

impl SceneUniforms {
    fn new(view_proj: Mat4, model: Mat4, lights: &LightRig) -> Self {
        let a = lights.ambient.color * lights.ambient.intensity;
        let d = lights.directional.color * lights.directional.intensity;
        let p = lights.point.color * lights.point.intensity;
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            ambient: a.extend(1.0).to_array(),
            light_dir: lights.directional.direction.extend(0.0).to_array(),
            light_color: d.extend(1.0).to_array(),
            point_pos: lights.point.position.extend(lights.point.range).to_array(),
            point_color: p.extend(1.0).to_array(),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct NodeUniforms {
    world: [[[f32; 4]; 4]; MAX_AVATAR_NODES],
}

impl NodeUniforms {
    fn new(nodes: &[Mat4]) -> Self {
        let mut world = [Mat4::IDENTITY.to_cols_array_2d(); MAX_AVATAR_NODES];
        for (slot, m) in world.iter_mut().zip(nodes) {
            *slot = m.to_cols_array_2d();
        }
        Self { world }
    }
}

struct GpuMesh {
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
}

// ===================== WebGPU state =====================

/// Overlay canvas that draws the drone avatar above the splat layer.
pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    scene_buffer: wgpu::Buffer,
    node_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    #[allow(dead_code)]
    depth_tex: wgpu::Texture,
    depth_view: wgpu::TextureView,
    mesh: Option<GpuMesh>,
    width: u32,
    height: u32,
}

impl<'a> GpuState<'a> {
    pub async fn new(canvas: &'a web::HtmlCanvasElement) -> anyhow::Result<Self> {
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
        // The splat layer shows through wherever the avatar is not drawn.
        let alpha_mode = caps
            .alpha_modes
            .iter()
            .copied()
            .find(|m| *m == wgpu::CompositeAlphaMode::PreMultiplied)
            .or_else(|| caps.alpha_modes.first().copied())
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

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("avatar_shader"),
            source: wgpu::ShaderSource::Wgsl(viewer_core::AVATAR_WGSL.into()),
        });
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("avatar_bgl"),
            entries: &[
                helpers::uniform_entry(
                    0,
                    wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ),
                helpers::uniform_entry(1, wgpu::ShaderStages::VERTEX),
            ],
        });
        let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("avatar_pl"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });
        let pipeline = helpers::make_avatar_pipeline(&device, &pl, &shader, format);

        let scene_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scene_uniforms"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let node_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("node_uniforms"),
            size: std::mem::size_of::<NodeUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("avatar_bg"),
            layout: &bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: scene_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: node_buffer.as_entire_binding(),
                },
            ],
        });
        let (depth_tex, depth_view) = helpers::create_depth_texture(&device, width, height);

        log::info!("[gpu] surface {}x{} format {:?}", width, height, format);
        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            scene_buffer,
            node_buffer,
            bind_group,
            depth_tex,
            depth_view,
            mesh: None,
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
        }
    }

    fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    pub fn upload_mesh(&mut self, mesh: &AvatarMesh) {
        if mesh.indices.is_empty() {
            log::warn!("[avatar] asset has no drawable triangles");
            self.mesh = None;
            return;
        }
        let vertices = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("avatar_vertices"),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let indices = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("avatar_indices"),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        self.mesh = Some(GpuMesh {
            vertices,
            indices,
            index_count: mesh.indices.len() as u32,
        });
        log::info!(
            "[avatar] uploaded {} vertices, {} triangles",
            mesh.vertices.len(),
            mesh.indices.len() / 3
        );
    }

    pub fn render(&mut self, frame: &FrameSnapshot<'_>) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });

        let draw = match (&self.mesh, &frame.avatar) {
            (Some(mesh), Some(pose)) if pose.visible => {
                let view_proj = frame.camera.view_projection();
                let scene = SceneUniforms::new(view_proj, pose.model, frame.lights);
                self.queue
                    .write_buffer(&self.scene_buffer, 0, bytemuck::bytes_of(&scene));
                let nodes = NodeUniforms::new(&pose.nodes);
                self.queue
                    .write_buffer(&self.node_buffer, 0, bytemuck::bytes_of(&nodes));
                Some(mesh)
            }
            _ => None,
        };

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("avatar_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
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
            if let Some(mesh) = draw {
                rpass.set_pipeline(&self.pipeline);
                rpass.set_bind_group(0, &self.bind_group, &[]);
                rpass.set_vertex_buffer(0, mesh.vertices.slice(..));
                rpass.set_index_buffer(mesh.indices.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        self.queue.submit(Some(encoder.finish()));
        output.present();
        Ok(())
    }
}

// ===================== RenderSurface over the page =====================

/// The container element, its overlay canvas and (when WebGPU is available)
/// the GPU state drawing into it.
pub struct WebSurface {
    pub container: web::Element,
    pub canvas: web::HtmlCanvasElement,
    pub gpu: Option<GpuState<'static>>,
}

impl RenderSurface for WebSurface {
    fn container_size(&self) -> ContainerSize {
        dom::container_size(&self.container)
    }

    fn resize(&mut self, size: SurfaceSize) {
        dom::set_canvas_backing_size(&self.canvas, size.width, size.height);
        if let Some(g) = &mut self.gpu {
            g.resize_if_needed(size.width, size.height);
        }
    }

    fn draw(&mut self, frame: &FrameSnapshot<'_>) {
        let Some(g) = &mut self.gpu else {
            return;
        };
        match g.render(frame) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => g.reconfigure(),
            Err(e) => log::error!("render error: {:?}", e),
        }
    }
}
