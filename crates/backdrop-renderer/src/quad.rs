//! Full-screen quad mesh
//!
//! A fixed quad in clip space with interleaved position + texture
//! coordinate, drawn as two indexed triangles. Uploaded once at
//! initialization and never mutated.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

/// One quad vertex: clip-space position followed by texture coordinate.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct QuadVertex {
    pub pos: [f32; 2],
    pub coord: [f32; 2],
}

/// Bytes between consecutive vertices.
pub const STRIDE: wgpu::BufferAddress = std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress;
/// Byte offset of the position within a vertex.
pub const POSITION_OFFSET: wgpu::BufferAddress = 0;
/// Byte offset of the texture coordinate within a vertex.
pub const COORD_OFFSET: wgpu::BufferAddress = 8;

pub const VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [1.0, 1.0], coord: [1.0, 1.0] },   // top right
    QuadVertex { pos: [1.0, -1.0], coord: [1.0, 0.0] },  // bottom right
    QuadVertex { pos: [-1.0, -1.0], coord: [0.0, 0.0] }, // bottom left
    QuadVertex { pos: [-1.0, 1.0], coord: [0.0, 1.0] },  // top left
];

pub const INDICES: [u16; 6] = [0, 1, 3, 1, 2, 3];

/// Vertex attributes for the quad, placed at the shader locations the
/// linked program reports for its position and coordinate inputs.
pub fn vertex_attributes(position_location: u32, coord_location: u32) -> [wgpu::VertexAttribute; 2] {
    [
        wgpu::VertexAttribute {
            offset: POSITION_OFFSET,
            shader_location: position_location,
            format: wgpu::VertexFormat::Float32x2,
        },
        wgpu::VertexAttribute {
            offset: COORD_OFFSET,
            shader_location: coord_location,
            format: wgpu::VertexFormat::Float32x2,
        },
    ]
}

/// The uploaded quad: one vertex buffer, one 16-bit index buffer.
pub struct QuadMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
}

impl QuadMesh {
    pub fn new(device: &wgpu::Device) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Quad Vertex Buffer"),
            contents: bytemuck::cast_slice(&VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Quad Index Buffer"),
            contents: bytemuck::cast_slice(&INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
        }
    }

    /// Bind the quad buffers and issue the indexed draw of both triangles.
    pub fn draw<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        render_pass.draw_indexed(0..INDICES.len() as u32, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_layout_is_tightly_packed() {
        assert_eq!(STRIDE, 16);
        assert_eq!(POSITION_OFFSET, 0);
        assert_eq!(COORD_OFFSET, 8);
    }

    #[test]
    fn indices_form_two_triangles_over_four_vertices() {
        assert_eq!(VERTICES.len(), 4);
        assert_eq!(INDICES.len(), 6);
        assert!(INDICES.iter().all(|&i| (i as usize) < VERTICES.len()));
    }

    #[test]
    fn attributes_use_the_requested_shader_locations() {
        let attributes = vertex_attributes(3, 7);
        assert_eq!(attributes[0].shader_location, 3);
        assert_eq!(attributes[0].offset, POSITION_OFFSET);
        assert_eq!(attributes[1].shader_location, 7);
        assert_eq!(attributes[1].offset, COORD_OFFSET);
    }
}
