//! # Vertex Module
//!
//! Vertex data layouts for the two snow renderables.
//!
//! ## Snowstorm
//!
//! The particle cloud keeps its per-particle data in three parallel buffers, one per
//! attribute, so each buffer has its own single-attribute layout:
//!
//! | buffer     | location | format      |
//! |------------|----------|-------------|
//! | `position` | 0        | `Float32x3` |
//! | `offset`   | 1        | `Float32`   |
//! | `size`     | 2        | `Float32`   |
//!
//! The buffers advance once per instance: every particle is one instanced quad (a point
//! sprite), and the quad corners come from `@builtin(vertex_index)`.
//!
//! ## Snowflake
//!
//! The point mesh uses a single interleaved buffer of [`SnowflakeVertex`], which advances
//! per vertex.

/// Per-instance attribute layouts of the snowstorm's three buffers.
pub struct ParticleAttributes;

impl ParticleAttributes {
    pub const POSITION: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
    pub const OFFSET: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32];
    pub const SIZE: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32];

    /// Buffer layouts in slot order: position, offset, size.
    pub fn descriptions() -> [wgpu::VertexBufferLayout<'static>; 3] {
        [
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &Self::POSITION,
            },
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<f32>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &Self::OFFSET,
            },
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<f32>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &Self::SIZE,
            },
        ]
    }
}

/// One vertex of the snowflake soup.
///
/// `face` is the index of the triangle the vertex belongs to (`vertex / 3`); the vertex
/// shader uses it to desynchronize the shimmer of neighbouring triangles.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SnowflakeVertex {
    pub position: [f32; 3],
    pub face: f32,
    pub color: [f32; 4],
}

impl SnowflakeVertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32, 2 => Float32x4];

    /// Returns the vertex buffer layout for the `SnowflakeVertex` struct.
    pub fn description() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SnowflakeVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snowflake_vertex_offsets_match_attributes() {
        assert_eq!(std::mem::size_of::<SnowflakeVertex>(), 32);
        let offsets: Vec<u64> = SnowflakeVertex::ATTRIBUTES
            .iter()
            .map(|attribute| attribute.offset)
            .collect();
        assert_eq!(offsets, vec![0, 12, 16]);
    }

    #[test]
    fn particle_buffers_step_per_instance() {
        let layouts = ParticleAttributes::descriptions();
        assert!(layouts
            .iter()
            .all(|layout| layout.step_mode == wgpu::VertexStepMode::Instance));
        assert_eq!(layouts[0].array_stride, 12);
        assert_eq!(layouts[1].array_stride, 4);
        assert_eq!(layouts[2].array_stride, 4);
    }
}
