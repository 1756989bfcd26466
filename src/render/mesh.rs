use wgpu::util::DeviceExt;

use crate::frame::Topology;
use crate::shapes::Geometry;

/// Vertex data plus two index buffers: triangles for shaded drawing and
/// unique edges for wireframe.
pub struct GpuMesh {
    vertex: wgpu::Buffer,
    triangles: wgpu::Buffer,
    edges: wgpu::Buffer,
    triangle_count: u32,
    edge_count: u32,
}

impl GpuMesh {
    pub fn init(device: &wgpu::Device, geometry: &Geometry, label: &str) -> Self {
        let edge_indices = geometry.edges();
        let vertex = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-vertices")),
            contents: bytemuck::cast_slice(&geometry.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let triangles = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-triangles")),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let edges = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-edges")),
            contents: bytemuck::cast_slice(&edge_indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex,
            triangles,
            edges,
            triangle_count: geometry.indices.len() as u32,
            edge_count: edge_indices.len() as u32,
        }
    }

    pub fn draw<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>, topology: Topology) {
        let (indices, count) = match topology {
            Topology::Triangles => (&self.triangles, self.triangle_count),
            Topology::Lines => (&self.edges, self.edge_count),
        };
        pass.set_vertex_buffer(0, self.vertex.slice(..));
        pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..count, 0, 0..1);
    }
}
