//! # Scene
//!
//! The mutable state of the snow scene, kept free of GPU resources so the per-frame update
//! and the input handlers can be exercised in isolation.
//!
//! ## Overview
//!
//! [`SceneState`] owns three things:
//!
//! - the [`Camera`] (eye, target, up), fixed after startup;
//! - the [`UniformBag`] pushed into both renderables every frame;
//! - the snowflake [`Transform`], a rotation pair that eases towards the pointer.
//!
//! The input handlers write the bag:
//!
//! - [`SceneState::resize`] recomputes the canvas pixel size, the `u_resolution` value and
//!   the projection (45° vertical field of view, near 0.01, far 100 by default);
//! - [`SceneState::pointer_moved`] stores the pointer normalized to `[-1, 1]`, Y up;
//! - [`SceneState::touch_ended`] recenters the pointer.
//!
//! [`SceneState::advance`] is the per-frame update: it records the timestamp, rebuilds the
//! view matrix, eases the rotation and returns the snowflake's new model matrix.
//!
//! ## Example Usage
//!
//! ```rust
//! use snowglobe::scene::{SceneState, Viewport};
//! use snowglobe::Settings;
//!
//! let mut scene = SceneState::new(&Settings::default());
//! let canvas = scene.resize(Viewport { width: 800.0, height: 600.0, scale: 2.0 });
//! assert_eq!((canvas.width, canvas.height), (1600, 1200));
//!
//! scene.pointer_moved(600.0, 150.0);
//! let update = scene.advance(16.0);
//! assert_eq!(scene.uniforms.time, 16.0);
//! # let _ = update;
//! ```

use nalgebra_glm::{Mat4, Vec2, Vec3};
use winit::dpi::PhysicalSize;

use crate::settings::Settings;
use crate::uniforms::UniformBag;

/// Eye, target and up vector of the look-at camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: nalgebra_glm::vec3(0.0, 0.0, 5.0),
            target: nalgebra_glm::vec3(0.0, 0.0, 0.0),
            up: Vec3::y(),
        }
    }
}

impl Camera {
    pub fn view_matrix(&self) -> Mat4 {
        nalgebra_glm::look_at_rh(&self.eye, &self.target, &self.up)
    }
}

/// Perspective parameters of the projection rebuilt on every resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    /// Right-handed perspective with a `[0, 1]` depth range.
    pub fn matrix(&self, aspect_ratio: f32) -> Mat4 {
        nalgebra_glm::perspective_rh_zo(aspect_ratio, self.fov_y, self.near, self.far)
    }
}

/// Rotation of the snowflake, eased towards a pointer-derived target.
///
/// `rotation.x` is the angle about the Y axis, `rotation.y` the angle about the X axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub rotation: Vec2,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            rotation: Vec2::zeros(),
        }
    }
}

impl Transform {
    /// Moves the rotation `factor` of the way towards `(-mouse.x, mouse.y)`.
    ///
    /// The step is per frame, not per second, so the easing speed follows the refresh rate.
    pub fn ease_towards(&mut self, mouse: Vec2, factor: f32) {
        self.rotation.x += (-mouse.x - self.rotation.x) * factor;
        self.rotation.y += (mouse.y - self.rotation.y) * factor;
    }

    /// Identity, rotated about X by `rotation.y`, then about Y by `rotation.x`.
    pub fn model_matrix(&self) -> Mat4 {
        let model = Mat4::identity();
        let model = nalgebra_glm::rotate_x(&model, self.rotation.y);
        nalgebra_glm::rotate_y(&model, self.rotation.x)
    }
}

/// Window size in logical pixels plus the device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scale: f64,
}

impl Viewport {
    /// Canvas size in device pixels: the logical size times the scale.
    pub fn canvas_size(&self) -> PhysicalSize<u32> {
        PhysicalSize::new(
            (self.width * self.scale).round() as u32,
            (self.height * self.scale).round() as u32,
        )
    }

    pub fn aspect_ratio(&self) -> f32 {
        (self.width / self.height.max(1.0)) as f32
    }
}

/// Maps a position in logical window pixels to `[-1, 1]` on both axes, Y pointing up.
pub fn normalize_pointer(x: f64, y: f64, width: f64, height: f64) -> Vec2 {
    let width = width.max(1.0);
    let height = height.max(1.0);
    nalgebra_glm::vec2(
        ((x / width) * 2.0 - 1.0) as f32,
        ((y / height) * -2.0 + 1.0) as f32,
    )
}

/// Result of one [`SceneState::advance`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUpdate {
    /// Model matrix the snowflake is drawn with this frame.
    pub snowflake_model: Mat4,
}

/// Camera, shared uniforms and snowflake rotation.
#[derive(Debug, Clone)]
pub struct SceneState {
    pub camera: Camera,
    pub projection: Projection,
    pub uniforms: UniformBag,
    pub transform: Transform,
    /// Last viewport passed to [`SceneState::resize`].
    pub viewport: Viewport,
    smoothing: f32,
}

impl SceneState {
    pub fn new(settings: &Settings) -> Self {
        Self {
            camera: settings.camera,
            projection: settings.projection,
            uniforms: UniformBag::default(),
            transform: Transform::default(),
            viewport: Viewport {
                width: 1.0,
                height: 1.0,
                scale: 1.0,
            },
            smoothing: settings.smoothing,
        }
    }

    /// Applies a new window size. Returns the canvas size in device pixels.
    pub fn resize(&mut self, viewport: Viewport) -> PhysicalSize<u32> {
        self.viewport = viewport;
        self.uniforms.resolution =
            nalgebra_glm::vec2(viewport.width as f32, viewport.height as f32);
        self.uniforms.projection = self.projection.matrix(viewport.aspect_ratio());
        viewport.canvas_size()
    }

    /// Stores the pointer at logical window position `(x, y)` as the mouse uniform.
    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        self.uniforms.mouse = normalize_pointer(x, y, self.viewport.width, self.viewport.height);
    }

    pub fn touch_ended(&mut self) {
        self.uniforms.mouse = Vec2::zeros();
    }

    /// Per-frame update for the timestamp `time_ms`.
    pub fn advance(&mut self, time_ms: f32) -> FrameUpdate {
        self.uniforms.time = time_ms;
        self.uniforms.view = self.camera.view_matrix();

        let mouse = self.uniforms.mouse;
        self.transform.ease_towards(mouse, self.smoothing);

        FrameUpdate {
            snowflake_model: self.transform.model_matrix(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> SceneState {
        let mut scene = SceneState::new(&Settings::default());
        scene.resize(Viewport {
            width: 1000.0,
            height: 500.0,
            scale: 1.0,
        });
        scene
    }

    #[test]
    fn rotation_stays_at_rest_without_pointer() {
        let mut scene = scene();
        for frame in 0..240 {
            scene.advance(frame as f32 * 16.0);
        }
        assert_eq!(scene.transform.rotation, Vec2::zeros());
        assert_eq!(scene.transform.model_matrix(), Mat4::identity());
    }

    #[test]
    fn rotation_converges_without_overshoot() {
        let mut transform = Transform::default();
        let mouse = nalgebra_glm::vec2(0.8, -0.4);
        let target = nalgebra_glm::vec2(-0.8, -0.4);
        let mut previous = (transform.rotation - target).abs();
        for _ in 0..100 {
            transform.ease_towards(mouse, 0.1);
            let distance = (transform.rotation - target).abs();
            assert!(distance.x < previous.x && distance.y < previous.y);
            assert!((distance.x - previous.x * 0.9).abs() < 1e-6);
            // Never crosses the target.
            assert!(transform.rotation.x >= target.x && transform.rotation.y >= target.y);
            previous = distance;
        }
    }

    #[test]
    fn model_rotates_about_x_before_y() {
        let transform = Transform {
            rotation: nalgebra_glm::vec2(0.7, 0.3),
        };
        let about_x = nalgebra_glm::rotation(0.3, &Vec3::x());
        let about_y = nalgebra_glm::rotation(0.7, &Vec3::y());
        let expected = about_x * about_y;
        let reversed = about_y * about_x;
        let model = transform.model_matrix();
        assert!((model - expected).amax() < 1e-6);
        assert!((model - reversed).amax() > 1e-3);
    }

    #[test]
    fn resize_scales_canvas_and_sets_aspect() {
        let mut scene = SceneState::new(&Settings::default());
        let canvas = scene.resize(Viewport {
            width: 640.0,
            height: 480.0,
            scale: 1.5,
        });
        assert_eq!(canvas, PhysicalSize::new(960, 720));
        assert_eq!(scene.uniforms.resolution, nalgebra_glm::vec2(640.0, 480.0));
        let expected = nalgebra_glm::perspective_rh_zo(
            640.0 / 480.0,
            std::f32::consts::FRAC_PI_4,
            0.01,
            100.0,
        );
        assert!((scene.uniforms.projection - expected).amax() < 1e-6);
    }

    #[test]
    fn pointer_is_normalized_with_y_up() {
        let mut scene = scene();
        scene.pointer_moved(250.0, 125.0);
        assert_eq!(scene.uniforms.mouse, nalgebra_glm::vec2(-0.5, 0.5));
        scene.pointer_moved(1000.0, 500.0);
        assert_eq!(scene.uniforms.mouse, nalgebra_glm::vec2(1.0, -1.0));
        scene.touch_ended();
        assert_eq!(scene.uniforms.mouse, Vec2::zeros());
    }

    #[test]
    fn normalize_pointer_matches_formula() {
        let (x, y, w, h) = (320.0, 90.0, 1280.0, 720.0);
        let mouse = normalize_pointer(x, y, w, h);
        assert!((mouse.x - (2.0 * x / w - 1.0) as f32).abs() < 1e-6);
        assert!((mouse.y - (-2.0 * y / h + 1.0) as f32).abs() < 1e-6);
    }

    #[test]
    fn advance_records_time_and_rebuilds_view() {
        let mut scene = scene();
        scene.uniforms.view = Mat4::zeros();
        let update = scene.advance(1234.5);
        assert_eq!(scene.uniforms.time, 1234.5);
        assert_eq!(scene.uniforms.view, scene.camera.view_matrix());
        assert_eq!(update.snowflake_model, scene.transform.model_matrix());
    }
}
