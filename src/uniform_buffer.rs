//! # Uniform Buffer
//!
//! This module defines the `UniformBuffer` struct, the CPU-side copy of the uniform block
//! that both snow programs read. It mirrors the `Uniforms` struct declared in the WGSL
//! prelude (`shaders/prelude.wgsl`) field for field.
//!
//! ## Memory Layout
//!
//! | field        | WGSL type       | offset | size |
//! |--------------|-----------------|--------|------|
//! | `model`      | `mat4x4<f32>`   | 0      | 64   |
//! | `view`       | `mat4x4<f32>`   | 64     | 64   |
//! | `projection` | `mat4x4<f32>`   | 128    | 64   |
//! | `resolution` | `vec2<f32>`     | 192    | 8    |
//! | `mouse`      | `vec2<f32>`     | 200    | 8    |
//! | `time`       | `f32`           | 208    | 4    |
//! | padding      |                 | 212    | 12   |
//!
//! WGSL rounds the struct size up to its 16 byte alignment, hence the trailing padding.
//! `#[repr(C)]` together with `bytemuck::Pod` lets the struct be written straight into a
//! `wgpu` buffer with `bytemuck::bytes_of`.

/// CPU-side copy of the uniform block shared by the snowstorm and snowflake programs.
///
/// Each renderable owns one of these (through
/// [`ProgramUniforms`](crate::uniforms::ProgramUniforms)) and uploads it once per frame.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct UniformBuffer {
    /// Object-to-world transform of the renderable.
    pub model: nalgebra_glm::Mat4,
    /// World-to-camera transform.
    pub view: nalgebra_glm::Mat4,
    /// Camera-to-clip transform.
    pub projection: nalgebra_glm::Mat4,
    /// Logical size of the window, in CSS/logical pixels.
    pub resolution: nalgebra_glm::Vec2,
    /// Pointer position normalized to `[-1, 1]` on both axes, Y pointing up.
    pub mouse: nalgebra_glm::Vec2,
    /// Milliseconds since the frame loop started.
    pub time: f32,
    pub _padding: [f32; 3],
}

impl Default for UniformBuffer {
    fn default() -> Self {
        Self {
            model: nalgebra_glm::Mat4::identity(),
            view: nalgebra_glm::Mat4::identity(),
            projection: nalgebra_glm::Mat4::identity(),
            resolution: nalgebra_glm::Vec2::zeros(),
            mouse: nalgebra_glm::Vec2::zeros(),
            time: 0.0,
            _padding: [0.0; 3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_wgsl_block_size() {
        assert_eq!(std::mem::size_of::<UniformBuffer>(), 224);
        assert_eq!(bytemuck::bytes_of(&UniformBuffer::default()).len(), 224);
    }

    #[test]
    fn default_matrices_are_identity() {
        let uniforms = UniformBuffer::default();
        assert_eq!(uniforms.model, nalgebra_glm::Mat4::identity());
        assert_eq!(uniforms.view, nalgebra_glm::Mat4::identity());
        assert_eq!(uniforms.projection, nalgebra_glm::Mat4::identity());
    }
}
