//! # Snowstorm
//!
//! The particle cloud: a few thousand independent flakes that fall and sway in a loop.
//!
//! All per-particle data is generated once by [`ParticleField::generate`] and uploaded to
//! three parallel buffers (position, phase offset, size) when the [`Snowstorm`] is created.
//! The buffers are never rewritten; the vertex shader animates every particle from
//! `u_time` and its phase offset.
//!
//! Particles start on a horizontal slab: `x ∈ [-20, 20)`, `y = -50`, `z ∈ [-50, 0)`. The
//! model matrix lifts the whole slab by 25 units and never changes afterwards.

use wgpu::util::DeviceExt;

use crate::error::SnowError;
use crate::math::{fill, Random};
use crate::renderable::{create_pipeline, PipelineSpec, Renderable};
use crate::shaders;
use crate::uniform_binding::UniformBinding;
use crate::uniforms::{ProgramUniforms, Uniform, UniformName};
use crate::vertex::ParticleAttributes;

/// Particle count used when nothing else is configured.
pub const DEFAULT_PARTICLE_COUNT: usize = 6000;

/// Spawn height shared by every particle.
pub const SPAWN_Y: f32 = -50.0;

/// Uniforms the snowstorm program reads. The model matrix is fixed and written by the
/// renderable itself.
const ACCEPTED: &[UniformName] = &[
    UniformName::Time,
    UniformName::View,
    UniformName::Projection,
    UniformName::Resolution,
];

/// Per-particle data of the snowstorm, one entry per particle in every vector.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleField {
    pub positions: Vec<[f32; 3]>,
    /// Animation phase in `[0, 1)`.
    pub offsets: Vec<f32>,
    /// Sprite size in logical pixels, in `[1, 6)`.
    pub sizes: Vec<f32>,
}

impl ParticleField {
    pub fn generate<R: rand::Rng>(count: usize, random: &mut Random<R>) -> Self {
        let positions = fill(count, |_| {
            let x = random.range(-20.0, 20.0);
            let z = random.range(-50.0, 0.0);
            [x, SPAWN_Y, z]
        });
        let offsets = fill(count, |_| random.unit());
        let sizes = fill(count, |_| random.range(1.0, 6.0));
        Self {
            positions,
            offsets,
            sizes,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of sprite instances the field draws as.
    pub fn instance_count(&self) -> Result<u32, SnowError> {
        u32::try_from(self.len()).map_err(|_| SnowError::TooManyParticles(self.len()))
    }

    /// Positions as the flat `x, y, z` float sequence uploaded to the GPU.
    pub fn position_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }
}

/// The particle-cloud renderable.
pub struct Snowstorm {
    pub model: nalgebra_glm::Mat4,
    uniforms: ProgramUniforms,
    binding: UniformBinding,
    position_buffer: wgpu::Buffer,
    offset_buffer: wgpu::Buffer,
    size_buffer: wgpu::Buffer,
    count: u32,
    pipeline: wgpu::RenderPipeline,
}

impl Snowstorm {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        field: &ParticleField,
    ) -> Result<Self, SnowError> {
        let count = field.instance_count()?;
        let shader_source = shaders::compose(shaders::SNOWSTORM_VERT, shaders::SNOWSTORM_FRAG)?;

        let position_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Snowstorm Position Buffer"),
            contents: bytemuck::cast_slice(field.position_floats()),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let offset_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Snowstorm Offset Buffer"),
            contents: bytemuck::cast_slice(&field.offsets),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let size_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Snowstorm Size Buffer"),
            contents: bytemuck::cast_slice(&field.sizes),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let binding = UniformBinding::new(device, "Snowstorm");
        let pipeline = create_pipeline(
            device,
            surface_format,
            &binding,
            &PipelineSpec {
                label: "Snowstorm Pipeline",
                shader_source: &shader_source,
                buffers: &ParticleAttributes::descriptions(),
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                depth_write_enabled: true,
            },
        );

        log::debug!("Snowstorm uploaded {} particles", field.len());

        Ok(Self {
            model: nalgebra_glm::translation(&nalgebra_glm::vec3(0.0, 25.0, 0.0)),
            uniforms: ProgramUniforms::new(ACCEPTED),
            binding,
            position_buffer,
            offset_buffer,
            size_buffer,
            count,
            pipeline,
        })
    }

    pub fn particle_count(&self) -> u32 {
        self.count
    }
}

impl Renderable for Snowstorm {
    fn set_uniform(&mut self, uniform: &Uniform) -> bool {
        self.uniforms.apply(uniform)
    }

    fn upload(&self, queue: &wgpu::Queue) {
        let mut data = *self.uniforms.data();
        data.model = self.model;
        self.binding.update_buffer(queue, &data);
    }

    fn render<'rpass>(&'rpass self, renderpass: &mut wgpu::RenderPass<'rpass>) {
        // Empty buffers cannot be sliced.
        if self.count == 0 {
            return;
        }
        renderpass.set_pipeline(&self.pipeline);
        renderpass.set_bind_group(0, &self.binding.bind_group, &[]);
        renderpass.set_vertex_buffer(0, self.position_buffer.slice(..));
        renderpass.set_vertex_buffer(1, self.offset_buffer.slice(..));
        renderpass.set_vertex_buffer(2, self.size_buffer.slice(..));
        // One four-corner sprite per particle.
        renderpass.draw(0..4, 0..self.count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_in_ranges(field: &ParticleField) {
        for [x, y, z] in &field.positions {
            assert!((-20.0..20.0).contains(x), "x = {x}");
            assert_eq!(*y, SPAWN_Y);
            assert!((-50.0..0.0).contains(z), "z = {z}");
        }
        assert!(field.offsets.iter().all(|o| (0.0..1.0).contains(o)));
        assert!(field.sizes.iter().all(|s| (1.0..6.0).contains(s)));
    }

    #[test]
    fn generates_exactly_the_requested_particles() {
        let mut random = Random::seeded(11);
        for count in [0, 1, 17, DEFAULT_PARTICLE_COUNT] {
            let field = ParticleField::generate(count, &mut random);
            assert_eq!(field.len(), count);
            assert_eq!(field.offsets.len(), count);
            assert_eq!(field.sizes.len(), count);
            assert_in_ranges(&field);
        }
    }

    #[test]
    fn empty_field_draws_no_instances() {
        let field = ParticleField::generate(0, &mut Random::seeded(3));
        assert!(field.is_empty());
        assert!(field.position_floats().is_empty());
        assert_eq!(field.instance_count().unwrap(), 0);
    }

    #[test]
    fn instance_count_matches_field_size() {
        let field = ParticleField::generate(250, &mut Random::seeded(4));
        assert_eq!(field.instance_count().unwrap(), 250);
    }

    #[test]
    fn seeded_fields_are_identical_and_flatten_to_triples() {
        let first = ParticleField::generate(500, &mut Random::seeded(2024));
        let second = ParticleField::generate(500, &mut Random::seeded(2024));
        assert_eq!(first.position_floats().len(), 3 * 500);
        assert_eq!(second.position_floats().len(), 3 * 500);
        assert_eq!(first, second);
        for triple in first.position_floats().chunks_exact(3) {
            assert!((-20.0..20.0).contains(&triple[0]));
            assert_eq!(triple[1], -50.0);
            assert!((-50.0..0.0).contains(&triple[2]));
        }
    }

    #[test]
    fn accepts_only_its_uniforms() {
        let mut uniforms = ProgramUniforms::new(ACCEPTED);
        assert!(uniforms.apply(&Uniform::Resolution(nalgebra_glm::vec2(800.0, 600.0))));
        assert!(!uniforms.apply(&Uniform::Mouse(nalgebra_glm::vec2(0.5, 0.5))));
        assert!(!uniforms.apply(&Uniform::Model(nalgebra_glm::Mat4::identity())));
    }
}
