//! # Snowflake
//!
//! The point mesh: a static snowflake triangle soup drawn as translucent, shimmering
//! triangles that overlap into a glow.
//!
//! [`SnowflakeMesh::build`] turns the geometry points into GPU-ready data:
//!
//! - one [`SnowflakeVertex`] per point, carrying the index of its triangle (`face`, the
//!   `(i, i, i)` triple of each triangle) and a color;
//! - one random translucent white per triangle (alpha in `[0.1, 0.6)`), repeated on its
//!   three vertices;
//! - an element buffer listing every point exactly once, in order, so consecutive triples
//!   form the triangles.
//!
//! A trailing partial triangle is kept in the vertex data but not drawn.
//!
//! Unlike the snowstorm, the model matrix is driven from outside: the frame loop rebuilds
//! it from the pointer-smoothed rotation every frame and passes it as `u_model`.

use wgpu::util::DeviceExt;

use crate::error::SnowError;
use crate::geometry::PointList;
use crate::math::{fill, Random};
use crate::renderable::{create_pipeline, PipelineSpec, Renderable};
use crate::shaders;
use crate::uniform_binding::UniformBinding;
use crate::uniforms::{ProgramUniforms, Uniform, UniformName};
use crate::vertex::SnowflakeVertex;

const ACCEPTED: &[UniformName] = &[
    UniformName::Time,
    UniformName::View,
    UniformName::Projection,
    UniformName::Mouse,
    UniformName::Model,
];

/// CPU-side vertex and element data of the snowflake.
#[derive(Debug, Clone, PartialEq)]
pub struct SnowflakeMesh {
    pub vertices: Vec<SnowflakeVertex>,
    pub indices: Vec<u32>,
}

impl SnowflakeMesh {
    pub fn build<R: rand::Rng>(points: &PointList, random: &mut Random<R>) -> Self {
        let faces = points.len().div_ceil(3);
        let colors = fill(faces, |_| [1.0, 1.0, 1.0, 0.1 + random.unit() * 0.5]);

        let vertices = points
            .points()
            .iter()
            .enumerate()
            .map(|(i, position)| SnowflakeVertex {
                position: *position,
                face: (i / 3) as f32,
                color: colors[i / 3],
            })
            .collect();
        let indices = fill(points.len(), |i| i as u32);

        Self { vertices, indices }
    }

    /// Number of indices the draw call consumes: whole triangles only.
    pub fn draw_count(&self) -> u32 {
        (self.indices.len() - self.indices.len() % 3) as u32
    }
}

/// The point-mesh renderable.
pub struct Snowflake {
    uniforms: ProgramUniforms,
    binding: UniformBinding,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    draw_count: u32,
    pipeline: wgpu::RenderPipeline,
}

impl Snowflake {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        mesh: &SnowflakeMesh,
    ) -> Result<Self, SnowError> {
        let shader_source = shaders::compose(shaders::SNOWFLAKE_VERT, shaders::SNOWFLAKE_FRAG)?;

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Snowflake Vertex Buffer"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Snowflake Index Buffer"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let binding = UniformBinding::new(device, "Snowflake");
        let pipeline = create_pipeline(
            device,
            surface_format,
            &binding,
            &PipelineSpec {
                label: "Snowflake Pipeline",
                shader_source: &shader_source,
                buffers: &[SnowflakeVertex::description()],
                topology: wgpu::PrimitiveTopology::TriangleList,
                // Translucent overlapping triangles must not hide each other.
                depth_write_enabled: false,
            },
        );

        log::debug!(
            "Snowflake uploaded {} vertices ({} triangles)",
            mesh.vertices.len(),
            mesh.draw_count() / 3
        );

        Ok(Self {
            uniforms: ProgramUniforms::new(ACCEPTED),
            binding,
            vertex_buffer,
            index_buffer,
            draw_count: mesh.draw_count(),
            pipeline,
        })
    }
}

impl Renderable for Snowflake {
    fn set_uniform(&mut self, uniform: &Uniform) -> bool {
        self.uniforms.apply(uniform)
    }

    fn upload(&self, queue: &wgpu::Queue) {
        self.binding.update_buffer(queue, self.uniforms.data());
    }

    fn render<'rpass>(&'rpass self, renderpass: &mut wgpu::RenderPass<'rpass>) {
        renderpass.set_pipeline(&self.pipeline);
        renderpass.set_bind_group(0, &self.binding.bind_group, &[]);
        renderpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        renderpass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        renderpass.draw_indexed(0..self.draw_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn soup(points: usize) -> PointList {
        PointList::new(fill(points, |i| [i as f32, 0.0, 0.0])).unwrap()
    }

    #[test]
    fn every_attribute_has_one_entry_per_point() {
        let mesh = SnowflakeMesh::build(&soup(12), &mut Random::seeded(5));
        assert_eq!(mesh.vertices.len(), 12);
        assert_eq!(mesh.indices, (0..12).collect::<Vec<u32>>());
        assert_eq!(mesh.vertices[7].position, [7.0, 0.0, 0.0]);
    }

    #[test]
    fn triangles_share_face_index_and_color() {
        let mesh = SnowflakeMesh::build(&soup(9), &mut Random::seeded(6));
        for (face, triangle) in mesh.vertices.chunks_exact(3).enumerate() {
            assert!(triangle.iter().all(|v| v.face == face as f32));
            assert!(triangle.iter().all(|v| v.color == triangle[0].color));
            let [r, g, b, a] = triangle[0].color;
            assert_eq!([r, g, b], [1.0, 1.0, 1.0]);
            assert!((0.1..0.6).contains(&a), "alpha = {a}");
        }
    }

    #[test]
    fn partial_trailing_triangle_is_not_drawn() {
        let mesh = SnowflakeMesh::build(&soup(8), &mut Random::seeded(7));
        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(mesh.draw_count(), 6);
        assert_eq!(mesh.vertices[7].face, 2.0);
    }

    #[test]
    fn accepts_model_and_mouse_but_not_resolution() {
        let mut uniforms = ProgramUniforms::new(ACCEPTED);
        let model = nalgebra_glm::rotation(0.5, &nalgebra_glm::Vec3::y());
        assert!(uniforms.apply(&Uniform::Model(model)));
        assert!(uniforms.apply(&Uniform::Mouse(nalgebra_glm::vec2(0.1, 0.2))));
        assert!(!uniforms.apply(&Uniform::Resolution(nalgebra_glm::vec2(640.0, 480.0))));
        assert_eq!(uniforms.data().model, model);
    }
}
