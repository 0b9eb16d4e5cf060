//! # Snowglobe
//!
//! A snow globe rendered with `wgpu`: a field of falling snow particles behind a
//! translucent snowflake mesh that turns to follow the pointer. Runs as a native window or
//! in the browser from the same code.
//!
//! ## Modules
//!
//! - [`scene`]: camera, projection and the per-frame scene update, free of GPU state.
//! - [`frame`]: the frame loop and the clock and scheduler it runs against.
//! - [`uniforms`]: named uniform values and per-program uniform filtering.
//! - [`snowstorm`] / [`snowflake`]: the two renderables and the data they are built from.
//! - [`geometry`]: snowflake point lists, loaded from JSON.
//! - [`shaders`]: WGSL stage registry and program composition.
//! - [`math`]: seedable random values and small sequence helpers.
//! - [`settings`]: startup configuration and its environment overrides.
//! - `app`, `gpu` and `renderer`: window, graphics context and frame submission.
//!
//! ## Running
//!
//! Natively, call [`run`]; it blocks until the window closes. `RUST_LOG` controls log
//! output and the [`settings`] module lists the other environment variables read at
//! startup.
//!
//! In the browser, build with `wasm-pack build --target web` and call the exported `start`
//! (or `startWithGeometry`) from the page; see `web/index.html`.

pub mod error;
pub mod frame;
pub mod geometry;
pub mod math;
pub mod renderable;
pub mod scene;
pub mod settings;
pub mod shaders;
pub mod snowflake;
pub mod snowstorm;
pub mod uniform_binding;
pub mod uniform_buffer;
pub mod uniforms;
pub mod vertex;

mod app;
mod gpu;
mod renderer;
#[cfg(target_arch = "wasm32")]
mod web;

pub use crate::app::App;
pub use crate::error::SnowError;
pub use crate::geometry::PointList;
pub use crate::gpu::Gpu;
pub use crate::renderer::Renderer;
pub use crate::scene::SceneState;
pub use crate::settings::Settings;
pub use crate::uniform_binding::UniformBinding;
pub use crate::uniform_buffer::UniformBuffer;

/// Opens the snow globe window and runs until it is closed.
///
/// A failure that stopped the app, such as a missing graphics context, is returned once the
/// window has closed.
#[cfg(not(target_arch = "wasm32"))]
pub fn run() -> Result<(), SnowError> {
    env_logger::init();

    let settings = Settings::from_env();
    let geometry = PointList::embedded()?;
    let event_loop = winit::event_loop::EventLoop::new()?;
    let mut app = App::new(settings, geometry);
    event_loop.run_app(&mut app)?;
    match app.take_fatal() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
