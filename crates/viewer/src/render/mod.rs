mod camera;
mod surface;
mod vertex;

pub use camera::Camera;
pub use surface::WgpuSurface;

use std::sync::Arc;

use anyhow::{Context, Result};
use glam::{Mat4, Vec3};
use octa::{
    GpuSurface, NormalAveraging, OctahedronOptions, ProgramHandle, RegularOctahedron, Shading,
};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::assets::Assets;
use crate::config::ViewerConfig;
use camera::SceneUniform;

const SHADER_PATH: &str = "shaders/octahedron.wgsl";

/// MSAA sample count (4x anti-aliasing)
const MSAA_SAMPLE_COUNT: u32 = 4;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

pub struct Renderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    clear_color: wgpu::Color,
    light_direction: Vec3,
    // Scene uniform
    scene_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    // Mesh
    gpu: WgpuSurface,
    program: ProgramHandle,
    mesh: Option<RegularOctahedron>,
    // Other
    msaa_view: wgpu::TextureView,
    depth_view: wgpu::TextureView,
    pub size: winit::dpi::PhysicalSize<u32>,
}

impl Renderer {
    pub async fn new(
        window: Arc<Window>,
        viewer: &ViewerConfig,
        options: OctahedronOptions,
    ) -> Result<Self> {
        let size = window.inner_size();
        let instance = Self::create_instance();
        let surface = instance.create_surface(window)?;
        let adapter = Self::request_adapter(&instance, &surface).await?;
        let (device, queue) = Self::request_device(&adapter).await?;
        let config = Self::create_surface_config(&surface, &adapter, size);
        surface.configure(&device, &config);

        let scene_buffer = Self::create_scene_buffer(&device);
        let scene_bind_group_layout = Self::create_scene_bind_group_layout(&device);
        let scene_bind_group =
            Self::create_scene_bind_group(&device, &scene_bind_group_layout, &scene_buffer);

        let source = Assets::load_string(SHADER_PATH)
            .with_context(|| format!("missing shader asset {}", SHADER_PATH))?;
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Octahedron Shader"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });
        let pipeline =
            Self::create_mesh_pipeline(&device, &shader, &scene_bind_group_layout, &config);

        let mut gpu = WgpuSurface::new(device.clone(), queue.clone());
        let program = gpu.register_program(pipeline);
        let mesh = RegularOctahedron::new(&mut gpu, options)?;

        let msaa_view = Self::create_msaa_view(&device, &config);
        let depth_view = Self::create_depth_view(&device, &config);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            clear_color: viewer.clear_color,
            light_direction: viewer.light_direction,
            scene_buffer,
            scene_bind_group,
            gpu,
            program,
            mesh: Some(mesh),
            msaa_view,
            depth_view,
            size,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.size = new_size;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.msaa_view = Self::create_msaa_view(&self.device, &self.config);
        self.depth_view = Self::create_depth_view(&self.device, &self.config);
    }

    pub fn update_scene(&self, camera: &Camera, model: Mat4) {
        let uniform = SceneUniform::new(camera, model, self.light_direction);
        self.queue
            .write_buffer(&self.scene_buffer, 0, bytemuck::bytes_of(&uniform));
    }

    pub fn set_shading(&mut self, shading: Shading) -> Result<()> {
        if let Some(mesh) = &mut self.mesh {
            mesh.set_shading(shading, &mut self.gpu)?;
            log::info!("Shading: {:?}", shading);
        }
        Ok(())
    }

    pub fn toggle_normal_averaging(&mut self) -> Result<()> {
        if let Some(mesh) = &mut self.mesh {
            let averaging: NormalAveraging = mesh.averaging().toggled();
            mesh.set_normal_averaging(averaging, &mut self.gpu)?;
            log::info!("Vertex normal averaging: {:?}", averaging);
        }
        Ok(())
    }

    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output.texture.create_view(&Default::default());
        let mut encoder = self.device.create_command_encoder(&Default::default());

        if let Some(mesh) = &self.mesh {
            self.gpu.use_program(self.program);
            mesh.draw(&mut self.gpu);
        }

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Mesh Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.msaa_view,
                    resolve_target: Some(&view),
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
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
                multiview_mask: None,
            });

            self.gpu.replay(&mut pass, &self.scene_bind_group);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn create_instance() -> wgpu::Instance {
        wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        })
    }

    async fn request_adapter(
        instance: &wgpu::Instance,
        surface: &wgpu::Surface<'static>,
    ) -> Result<wgpu::Adapter> {
        Ok(instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(surface),
                force_fallback_adapter: false,
            })
            .await?)
    }

    async fn request_device(adapter: &wgpu::Adapter) -> Result<(wgpu::Device, wgpu::Queue)> {
        Ok(adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
                experimental_features: wgpu::ExperimentalFeatures::default(),
            })
            .await?)
    }

    fn create_surface_config(
        surface: &wgpu::Surface,
        adapter: &wgpu::Adapter,
        size: winit::dpi::PhysicalSize<u32>,
    ) -> wgpu::SurfaceConfiguration {
        let caps = surface.get_capabilities(adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(caps.formats[0]);

        wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        }
    }

    fn create_scene_buffer(device: &wgpu::Device) -> wgpu::Buffer {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Buffer"),
            contents: bytemuck::bytes_of(&SceneUniform::new(
                &Camera::new(1.0, 3.0),
                Mat4::IDENTITY,
                Vec3::NEG_Y,
            )),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        })
    }

    fn create_scene_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Bind Group Layout"),
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
        })
    }

    fn create_scene_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        })
    }

    fn create_mesh_pipeline(
        device: &wgpu::Device,
        shader: &wgpu::ShaderModule,
        scene_layout: &wgpu::BindGroupLayout,
        config: &wgpu::SurfaceConfiguration,
    ) -> wgpu::RenderPipeline {
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[scene_layout],
            immediate_size: 0,
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Mesh Render Pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &vertex::mesh_layouts(),
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            // Top and bottom halves are wound in opposite directions, so no culling.
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: MSAA_SAMPLE_COUNT,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview_mask: None,
            cache: None,
        })
    }

    fn create_msaa_view(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("MSAA Texture"),
            size: wgpu::Extent3d {
                width: config.width,
                height: config.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: MSAA_SAMPLE_COUNT,
            dimension: wgpu::TextureDimension::D2,
            format: config.format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }

    fn create_depth_view(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: config.width,
                height: config.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: MSAA_SAMPLE_COUNT,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        if let Some(mesh) = self.mesh.take() {
            mesh.destroy(&mut self.gpu);
        }
    }
}
