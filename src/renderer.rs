//! # Renderer
//!
//! Owns the [`Gpu`], the depth buffer and the two snow renderables, and turns one frame of
//! scene state into one submitted command buffer.
//!
//! ## Frame Structure
//!
//! [`Renderer::render_frame`] performs, in order:
//!
//! 1. push the shared uniforms into the [`Snowstorm`] and upload them;
//! 2. push the shared uniforms and this frame's model matrix into the [`Snowflake`] and
//!    upload them;
//! 3. acquire the surface texture and record a single render pass that clears color and
//!    depth, draws the snowstorm, then draws the snowflake;
//! 4. submit and present.
//!
//! Both renderables share the pass, so the snowflake draw starts from the pipeline and
//! buffer bindings the snowstorm left behind and rebinds everything it uses.

use std::sync::Arc;

use winit::window::Window;

use crate::error::SnowError;
use crate::geometry::PointList;
use crate::gpu::Gpu;
use crate::math::Random;
use crate::renderable::Renderable;
use crate::scene::FrameUpdate;
use crate::settings::Settings;
use crate::snowflake::{Snowflake, SnowflakeMesh};
use crate::snowstorm::{ParticleField, Snowstorm};
use crate::uniforms::{Uniform, UniformBag};

pub struct Renderer {
    gpu: Gpu,
    depth_texture_view: wgpu::TextureView,
    snowstorm: Snowstorm,
    snowflake: Snowflake,
    clear_color: wgpu::Color,
}

impl Renderer {
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Acquires the graphics context and builds both renderables.
    ///
    /// Particle and color data are drawn from one generator, seeded from
    /// [`Settings::seed`] when set.
    pub async fn new(
        window: Arc<Window>,
        width: u32,
        height: u32,
        settings: &Settings,
        geometry: &PointList,
    ) -> Result<Self, SnowError> {
        let gpu = Gpu::new_async(window, width, height).await?;
        let depth_texture_view = gpu.create_depth_texture(width, height);

        let mut random = Random::from_seed_or_entropy(settings.seed);
        let field = ParticleField::generate(settings.particle_count, &mut random);
        let mesh = SnowflakeMesh::build(geometry, &mut random);

        let snowstorm = Snowstorm::new(&gpu.device, gpu.surface_format, &field)?;
        let snowflake = Snowflake::new(&gpu.device, gpu.surface_format, &mesh)?;
        log::info!(
            "Scene ready: {} snowstorm particles, {} snowflake points",
            snowstorm.particle_count(),
            geometry.len()
        );

        Ok(Self {
            gpu,
            depth_texture_view,
            snowstorm,
            snowflake,
            clear_color: settings.clear_color,
        })
    }

    /// Resizes the surface and the depth buffer to `width` x `height` device pixels.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
        self.depth_texture_view = self.gpu.create_depth_texture(width, height);
    }

    /// Reconfigures the surface at its current size.
    pub fn reconfigure(&mut self) {
        self.gpu.reconfigure();
    }

    /// Draws one frame from the shared uniforms and this frame's scene update.
    pub fn render_frame(
        &mut self,
        uniforms: &UniformBag,
        update: &FrameUpdate,
    ) -> Result<(), wgpu::SurfaceError> {
        self.snowstorm.set_uniforms(uniforms.iter());
        self.snowstorm.upload(&self.gpu.queue);

        self.snowflake
            .set_uniforms(uniforms.iter())
            .set_uniform(&Uniform::Model(update.snowflake_model));
        self.snowflake.upload(&self.gpu.queue);

        let surface_texture = self.gpu.surface.get_current_texture()?;
        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor {
                format: Some(self.gpu.surface_format),
                ..Default::default()
            });

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        encoder.insert_debug_marker("Render snow");

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Snow Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.snowstorm.render(&mut render_pass);
            self.snowflake.render(&mut render_pass);
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }
}
