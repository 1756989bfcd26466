use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use bytemuck::{bytes_of, Pod, Zeroable};
use glam::Mat4;
use log::info;
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::{DepthBuffer, GpuMesh, Overlay, ShaderProgram};
use crate::frame::{DrawCall, FramePlan, ProgramKind};
use crate::lighting::LightUniforms;
use crate::material::ShaderVariant;
use crate::shapes::{self, Geometry, MeshId};

/// Remaps clip-space depth from OpenGL's [-1, 1] to wgpu's [0, 1].
#[rustfmt::skip]
const GL_TO_WGPU_DEPTH: Mat4 = Mat4::from_cols_array(&[
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
]);

/// wgpu renderer that executes [`FramePlan`]s.
pub struct Renderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth: DepthBuffer,
    global_buffer: wgpu::Buffer,
    light_buffer: wgpu::Buffer,
    global_bind_group: wgpu::BindGroup,
    object_layout: wgpu::BindGroupLayout,
    phong: ShaderProgram,
    gouraud: ShaderProgram,
    marker: ShaderProgram,
    meshes: HashMap<MeshId, GpuMesh>,
    fallback_mesh: GpuMesh,
    active_variant: Option<ShaderVariant>,
}

impl Renderer {
    /// Initializes the device, builds every program and uploads the built-in
    /// meshes plus the optional OBJ model.
    pub async fn new(window: Arc<Window>, model: Option<&Geometry>) -> Result<Self> {
        let size = window.inner_size();
        if size.width == 0 || size.height == 0 {
            return Err(anyhow!("window has zero area"));
        }

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::util::backend_bits_from_env().unwrap_or(wgpu::Backends::all()),
            ..Default::default()
        });
        let surface = instance.create_surface(Arc::clone(&window))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to acquire GPU adapter")?;
        info!("using adapter {}", adapter.get_info().name);

        let required_limits = if cfg!(target_arch = "wasm32") {
            wgpu::Limits::downlevel_webgl2_defaults().using_resolution(adapter.limits())
        } else {
            wgpu::Limits::default()
        };
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("renderer-device"),
                    required_features: wgpu::Features::empty(),
                    required_limits,
                },
                None,
            )
            .await
            .context("failed to create GPU device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|format| format.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no supported formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::AutoVsync,
            desired_maximum_frame_latency: 2,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let depth = DepthBuffer::create(&device, config.width, config.height);

        let global_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("global-bind-layout"),
            entries: &[
                uniform_entry(0, std::mem::size_of::<GlobalUniform>()),
                uniform_entry(1, std::mem::size_of::<LightUniforms>()),
            ],
        });
        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("object-bind-layout"),
            entries: &[uniform_entry(0, std::mem::size_of::<ObjectUniform>())],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("renderer-pipeline-layout"),
            bind_group_layouts: &[&global_layout, &object_layout],
            push_constant_ranges: &[],
        });

        let global_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("global-uniform"),
            size: std::mem::size_of::<GlobalUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let light_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("light-uniform"),
            size: std::mem::size_of::<LightUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let global_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("global-bind-group"),
            layout: &global_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: global_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: light_buffer.as_entire_binding(),
                },
            ],
        });

        let phong = ShaderProgram::build(
            &device,
            &pipeline_layout,
            surface_format,
            ProgramKind::Lit(ShaderVariant::Phong),
        )
        .await?;
        let gouraud = ShaderProgram::build(
            &device,
            &pipeline_layout,
            surface_format,
            ProgramKind::Lit(ShaderVariant::Gouraud),
        )
        .await?;
        let marker =
            ShaderProgram::build(&device, &pipeline_layout, surface_format, ProgramKind::Marker)
                .await?;

        let mut meshes = HashMap::new();
        for id in MeshId::BUILTIN {
            if let Some(geometry) = id.geometry() {
                meshes.insert(id, GpuMesh::init(&device, &geometry, id.label()));
            }
        }
        if let Some(geometry) = model {
            meshes.insert(MeshId::Model, GpuMesh::init(&device, geometry, "model"));
        }
        let fallback_mesh = GpuMesh::init(&device, &shapes::cube(), "fallback-cube");

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth,
            global_buffer,
            light_buffer,
            global_bind_group,
            object_layout,
            phong,
            gouraud,
            marker,
            meshes,
            fallback_mesh,
            active_variant: None,
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        PhysicalSize::new(self.config.width, self.config.height)
    }

    /// Resizes the swap chain to match the new dimensions.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth = DepthBuffer::create(&self.device, new_size.width, new_size.height);
    }

    /// Uploads the plan's uniforms and draws it, followed by the overlay.
    pub fn render(&mut self, plan: &FramePlan, overlay: &mut Overlay) -> Result<(), wgpu::SurfaceError> {
        self.note_variant(plan);
        self.queue
            .write_buffer(&self.global_buffer, 0, bytes_of(&GlobalUniform::new(plan)));
        self.queue
            .write_buffer(&self.light_buffer, 0, bytes_of(&plan.lights));

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("renderer-encoder"),
            });

        let bind_groups: Vec<_> = plan
            .draws
            .iter()
            .map(|draw| self.object_bind_group(draw))
            .collect();
        let screen = overlay.screen(self.config.width, self.config.height);
        let overlay_commands = overlay.prepare(&self.device, &self.queue, &mut encoder, &screen);

        {
            let [r, g, b, a] = plan.clear_color;
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_bind_group(0, &self.global_bind_group, &[]);
            for (draw, bind_group) in plan.draws.iter().zip(&bind_groups) {
                pass.set_pipeline(self.program(draw.program).pipeline(draw.topology));
                pass.set_bind_group(1, bind_group, &[]);
                self.mesh(draw.mesh).draw(&mut pass, draw.topology);
            }
            overlay.draw(&mut pass, &screen);
        }

        self.queue
            .submit(overlay_commands.into_iter().chain(std::iter::once(encoder.finish())));
        output.present();
        overlay.finish();
        Ok(())
    }

    fn program(&self, kind: ProgramKind) -> &ShaderProgram {
        match kind {
            ProgramKind::Lit(ShaderVariant::Phong) => &self.phong,
            ProgramKind::Lit(ShaderVariant::Gouraud) => &self.gouraud,
            ProgramKind::Marker => &self.marker,
        }
    }

    /// Falls back to a cube when no OBJ model was uploaded.
    fn mesh(&self, id: MeshId) -> &GpuMesh {
        self.meshes.get(&id).unwrap_or(&self.fallback_mesh)
    }

    fn note_variant(&mut self, plan: &FramePlan) {
        let Some(variant) = plan.draws.iter().find_map(|draw| match draw.program {
            ProgramKind::Lit(variant) => Some(variant),
            ProgramKind::Marker => None,
        }) else {
            return;
        };
        if self.active_variant != Some(variant) {
            info!("binding the {} program", variant.label());
            self.active_variant = Some(variant);
        }
    }

    fn object_bind_group(&self, draw: &DrawCall) -> wgpu::BindGroup {
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("object-uniform"),
                contents: bytes_of(&ObjectUniform::new(draw)),
                usage: wgpu::BufferUsages::UNIFORM,
            });
        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("object-bind-group"),
            layout: &self.object_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        })
    }
}

fn uniform_entry(binding: u32, size: usize) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: wgpu::BufferSize::new(size as u64),
        },
        count: None,
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct GlobalUniform {
    projection: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    view_normals: [[f32; 4]; 4],
    flags: [u32; 4],
}

impl GlobalUniform {
    fn new(plan: &FramePlan) -> Self {
        Self {
            projection: (GL_TO_WGPU_DEPTH * plan.projection).to_cols_array_2d(),
            view: plan.view.to_cols_array_2d(),
            view_normals: plan.view_normals.to_cols_array_2d(),
            flags: [u32::from(plan.use_normals), 0, 0, 0],
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct ObjectUniform {
    model_view: [[f32; 4]; 4],
    normals: [[f32; 4]; 4],
    ka: [f32; 4],
    kd: [f32; 4],
    ks: [f32; 4],
    color: [f32; 4],
}

impl ObjectUniform {
    fn new(draw: &DrawCall) -> Self {
        let [ka, kd, ks] = draw.material;
        Self {
            model_view: draw.model_view.to_cols_array_2d(),
            normals: draw.normals.to_cols_array_2d(),
            ka: ka.into(),
            kd: kd.into(),
            ks: ks.into(),
            color: draw.color.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec4;

    use super::*;
    use crate::frame::plan_frame;
    use crate::scene::SceneState;

    #[test]
    fn depth_correction_maps_gl_range_to_unit_range() {
        let near = GL_TO_WGPU_DEPTH * Vec4::new(0.0, 0.0, -1.0, 1.0);
        let far = GL_TO_WGPU_DEPTH * Vec4::new(0.0, 0.0, 1.0, 1.0);
        assert_eq!(near.z, 0.0);
        assert_eq!(far.z, 1.0);
    }

    #[test]
    fn uniform_layouts_match_wgsl() {
        assert_eq!(std::mem::size_of::<GlobalUniform>(), 3 * 64 + 16);
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 2 * 64 + 4 * 16);
    }

    #[test]
    fn object_uniform_carries_shininess_in_specular_w() {
        let plan = plan_frame(&SceneState::default());
        let object = ObjectUniform::new(&plan.draws[1]);
        assert_eq!(object.ks[3], 100.0);
        assert_eq!(object.color, [1.0; 4]);
    }

    #[test]
    fn normals_flag_is_packed() {
        let mut scene = SceneState::default();
        scene.options.normals = true;
        assert_eq!(GlobalUniform::new(&plan_frame(&scene)).flags[0], 1);
    }
}
