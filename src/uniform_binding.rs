//! # Uniform Binding
//!
//! Owns the GPU side of a renderable's uniform block: the `wgpu::Buffer` holding a
//! [`UniformBuffer`], the bind group layout describing it to the pipeline, and the bind
//! group that attaches it during a render pass.
//!
//! Every snow program declares its uniforms at `@group(0) @binding(0)`; both the vertex
//! and the fragment stage may read it (the fragment stages use `time` and `resolution`).

use crate::uniform_buffer::UniformBuffer;

/// GPU resources backing one renderable's uniform block.
pub struct UniformBinding {
    /// The uniform buffer, rewritten once per frame through [`UniformBinding::update_buffer`].
    pub buffer: wgpu::Buffer,
    /// Bind group attaching `buffer` at binding 0.
    pub bind_group: wgpu::BindGroup,
    /// Layout of `bind_group`, referenced by the pipeline layout.
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl UniformBinding {
    /// Allocates the uniform buffer (initialized with [`UniformBuffer::default`]) and builds
    /// its bind group. `label` prefixes the debug labels of every created resource.
    pub fn new(device: &wgpu::Device, label: &str) -> Self {
        let buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Uniform Buffer")),
                contents: bytemuck::cast_slice(&[UniformBuffer::default()]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            },
        );

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
            label: Some(&format!("{label} uniform_bind_group_layout")),
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some(&format!("{label} uniform_bind_group")),
        });

        Self {
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    /// Writes `uniform_buffer` to the start of the GPU buffer. The write becomes visible to
    /// the next submitted command buffer.
    pub fn update_buffer(&self, queue: &wgpu::Queue, uniform_buffer: &UniformBuffer) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(uniform_buffer))
    }
}
