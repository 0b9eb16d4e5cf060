//! # Renderable
//!
//! The interface the renderer drives every frame, and the pipeline builder both snow
//! programs share.
//!
//! A frame for one renderable is: push uniforms ([`Renderable::set_uniforms`]), copy them
//! to the GPU ([`Renderable::upload`]), then record the draw ([`Renderable::render`]).
//! Recording binds the renderable's pipeline and buffers on the shared render pass, so
//! whatever is drawn next starts from that state.

use std::borrow::Cow;

use crate::renderer::Renderer;
use crate::shaders::{FRAGMENT_ENTRY, VERTEX_ENTRY};
use crate::uniform_binding::UniformBinding;
use crate::uniforms::Uniform;

pub trait Renderable {
    /// Stores `uniform` if this renderable reads it. Returns whether it was stored;
    /// values for names the renderable does not read are ignored.
    fn set_uniform(&mut self, uniform: &Uniform) -> bool;

    /// Stores every value of `uniforms` this renderable reads.
    fn set_uniforms<I>(&mut self, uniforms: I) -> &mut Self
    where
        I: IntoIterator<Item = Uniform>,
        Self: Sized,
    {
        for uniform in uniforms {
            self.set_uniform(&uniform);
        }
        self
    }

    /// Writes the stored uniform block to the GPU.
    fn upload(&self, queue: &wgpu::Queue);

    /// Records this renderable's draw call into `renderpass`.
    fn render<'rpass>(&'rpass self, renderpass: &mut wgpu::RenderPass<'rpass>);
}

/// What distinguishes one snow pipeline from the other.
pub struct PipelineSpec<'a> {
    pub label: &'a str,
    pub shader_source: &'a str,
    pub buffers: &'a [wgpu::VertexBufferLayout<'a>],
    pub topology: wgpu::PrimitiveTopology,
    pub depth_write_enabled: bool,
}

/// Builds an alpha-blended, depth-tested pipeline with the uniform block at group 0.
pub fn create_pipeline(
    device: &wgpu::Device,
    surface_format: wgpu::TextureFormat,
    uniform: &UniformBinding,
    spec: &PipelineSpec<'_>,
) -> wgpu::RenderPipeline {
    let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(spec.label),
        source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(spec.shader_source)),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(spec.label),
        bind_group_layouts: &[&uniform.bind_group_layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(spec.label),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader_module,
            entry_point: Some(VERTEX_ENTRY),
            buffers: spec.buffers,
            compilation_options: Default::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: spec.topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
            unclipped_depth: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: Renderer::DEPTH_FORMAT,
            depth_write_enabled: spec.depth_write_enabled,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader_module,
            entry_point: Some(FRAGMENT_ENTRY),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                // SRC_ALPHA, ONE_MINUS_SRC_ALPHA
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        multiview: None,
        cache: None,
    })
}
