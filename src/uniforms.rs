//! # Uniforms
//!
//! The per-frame values pushed into the snow programs, and the routing that decides which
//! program consumes which value.
//!
//! - [`UniformName`] is the closed set of uniform names any program understands.
//! - [`Uniform`] pairs a name with a value of the right type.
//! - [`UniformBag`] is the shared set of values the frame loop and the input handlers keep
//!   up to date. It is a superset of what any single program reads.
//! - [`ProgramUniforms`] is a renderable's view of the bag: the names it accepts and the
//!   CPU copy of its uniform block. Values for names it does not accept are ignored.

use nalgebra_glm::{Mat4, Vec2};

use crate::uniform_buffer::UniformBuffer;

/// Every uniform name a snow program can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformName {
    Time,
    View,
    Projection,
    Mouse,
    Resolution,
    Model,
}

/// A uniform name together with a value of the type that name requires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Uniform {
    Time(f32),
    View(Mat4),
    Projection(Mat4),
    Mouse(Vec2),
    Resolution(Vec2),
    Model(Mat4),
}

impl Uniform {
    pub fn name(&self) -> UniformName {
        match self {
            Uniform::Time(_) => UniformName::Time,
            Uniform::View(_) => UniformName::View,
            Uniform::Projection(_) => UniformName::Projection,
            Uniform::Mouse(_) => UniformName::Mouse,
            Uniform::Resolution(_) => UniformName::Resolution,
            Uniform::Model(_) => UniformName::Model,
        }
    }
}

/// The shared per-frame values.
///
/// Written by the frame loop (time, view) and the input handlers (projection, mouse,
/// resolution); read by each renderable once per frame through [`UniformBag::iter`].
#[derive(Debug, Clone, PartialEq)]
pub struct UniformBag {
    pub time: f32,
    pub view: Mat4,
    pub projection: Mat4,
    pub mouse: Vec2,
    pub resolution: Vec2,
}

impl Default for UniformBag {
    fn default() -> Self {
        Self {
            time: 0.0,
            view: Mat4::identity(),
            projection: Mat4::identity(),
            mouse: Vec2::zeros(),
            resolution: Vec2::zeros(),
        }
    }
}

impl UniformBag {
    /// Snapshot of every value in the bag.
    pub fn iter(&self) -> impl Iterator<Item = Uniform> {
        [
            Uniform::Time(self.time),
            Uniform::View(self.view),
            Uniform::Projection(self.projection),
            Uniform::Mouse(self.mouse),
            Uniform::Resolution(self.resolution),
        ]
        .into_iter()
    }
}

/// A renderable's accepted uniform names plus the CPU copy of its uniform block.
#[derive(Debug, Clone)]
pub struct ProgramUniforms {
    accepted: &'static [UniformName],
    data: UniformBuffer,
}

impl ProgramUniforms {
    pub fn new(accepted: &'static [UniformName]) -> Self {
        Self {
            accepted,
            data: UniformBuffer::default(),
        }
    }

    pub fn accepts(&self, name: UniformName) -> bool {
        self.accepted.contains(&name)
    }

    /// Stores `uniform` if this program accepts its name. Returns whether it was stored.
    pub fn apply(&mut self, uniform: &Uniform) -> bool {
        if !self.accepts(uniform.name()) {
            return false;
        }
        match *uniform {
            Uniform::Time(time) => self.data.time = time,
            Uniform::View(view) => self.data.view = view,
            Uniform::Projection(projection) => self.data.projection = projection,
            Uniform::Mouse(mouse) => self.data.mouse = mouse,
            Uniform::Resolution(resolution) => self.data.resolution = resolution,
            Uniform::Model(model) => self.data.model = model,
        }
        true
    }

    pub fn data(&self) -> &UniformBuffer {
        &self.data
    }
}
