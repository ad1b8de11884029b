//! Backdrop pipeline
//!
//! GPU form of a linked shader program: render pipeline, uniform color
//! buffer, and the static quad. Created once after the surface is ready and
//! immutable thereafter; wgpu handles are released on drop.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::program::ShaderProgram;
use crate::quad::{self, QuadMesh};

/// Default fill: opaque red.
pub const DEFAULT_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct ColorUniform {
    color: [f32; 4],
}

/// The drawable backdrop: pipeline + uniform color + quad.
pub struct BackdropPipeline {
    pipeline: wgpu::RenderPipeline,
    color_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    quad: QuadMesh,
}

impl BackdropPipeline {
    pub fn new(device: &wgpu::Device, target_format: wgpu::TextureFormat, program: &ShaderProgram) -> Self {
        let vertex_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Backdrop Vertex Shader"),
            source: wgpu::ShaderSource::Wgsl(program.vertex_stage().source().into()),
        });

        let fragment_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Backdrop Fragment Shader"),
            source: wgpu::ShaderSource::Wgsl(program.fragment_stage().source().into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Backdrop Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: program.color_binding(),
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Backdrop Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let vertex_attributes =
            quad::vertex_attributes(program.position_location(), program.coord_location());

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Backdrop Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_shader,
                entry_point: Some(program.vertex_entry()),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: quad::STRIDE,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &vertex_attributes,
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &fragment_shader,
                entry_point: Some(program.fragment_entry()),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let color_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Backdrop Color Buffer"),
            contents: bytemuck::cast_slice(&[ColorUniform { color: DEFAULT_COLOR }]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Backdrop Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: program.color_binding(),
                resource: color_buffer.as_entire_binding(),
            }],
        });

        let quad = QuadMesh::new(device);

        Self {
            pipeline,
            color_buffer,
            bind_group,
            quad,
        }
    }

    /// Update the uniform fill color.
    pub fn set_color(&self, queue: &wgpu::Queue, color: [f32; 4]) {
        queue.write_buffer(
            &self.color_buffer,
            0,
            bytemuck::cast_slice(&[ColorUniform { color }]),
        );
    }

    /// Bind the pipeline and draw the quad.
    pub fn draw<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        self.quad.draw(render_pass);
    }
}
