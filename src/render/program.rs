use thiserror::Error;

use super::shaders;
use super::DepthBuffer;
use crate::frame::{ProgramKind, Topology};
use crate::shapes::VERTEX_STRIDE;

/// Raised when a program fails WGSL validation or pipeline creation.
#[derive(Debug, Error)]
#[error("failed to build the {program} program: {message}")]
pub struct ShaderError {
    pub program: &'static str,
    pub message: String,
}

/// A compiled program with one pipeline per primitive topology.
pub struct ShaderProgram {
    triangles: wgpu::RenderPipeline,
    lines: wgpu::RenderPipeline,
}

impl ShaderProgram {
    /// Compiles the program for `kind` and validates it. Validation errors are
    /// captured in an error scope and returned instead of reaching the
    /// device's uncaptured-error handler.
    pub async fn build(
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        format: wgpu::TextureFormat,
        kind: ProgramKind,
    ) -> Result<Self, ShaderError> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let label = kind.label();
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(shaders::source(kind).into()),
        });
        let triangles = create_pipeline(device, layout, format, &module, label, Topology::Triangles);
        let lines = create_pipeline(device, layout, format, &module, label, Topology::Lines);

        if let Some(error) = device.pop_error_scope().await {
            return Err(ShaderError {
                program: label,
                message: error.to_string(),
            });
        }
        Ok(Self {
            triangles,
            lines,
        })
    }

    pub fn pipeline(&self, topology: Topology) -> &wgpu::RenderPipeline {
        match topology {
            Topology::Triangles => &self.triangles,
            Topology::Lines => &self.lines,
        }
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    format: wgpu::TextureFormat,
    module: &wgpu::ShaderModule,
    label: &str,
    topology: Topology,
) -> wgpu::RenderPipeline {
    let primitive_topology = match topology {
        Topology::Triangles => wgpu::PrimitiveTopology::TriangleList,
        Topology::Lines => wgpu::PrimitiveTopology::LineList,
    };
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("{label}-{}", topology.label())),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module,
            entry_point: "vs_main",
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: (VERTEX_STRIDE * std::mem::size_of::<f32>()) as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x3,
                        offset: 0,
                        shader_location: 0,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x3,
                        offset: (3 * std::mem::size_of::<f32>()) as u64,
                        shader_location: 1,
                    },
                ],
            }],
        },
        primitive: wgpu::PrimitiveState {
            topology: primitive_topology,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DepthBuffer::FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module,
            entry_point: "fs_main",
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        multiview: None,
    })
}
