//! # Application Core (`app.rs`)
//!
//! The `App` struct connects `winit` to the snow scene: it creates the window, builds the
//! [`Renderer`] (synchronously on desktop, asynchronously in the browser), routes window
//! events to the scene's input handlers, and runs the [`FrameLoop`] on every redraw.
//!
//! ## Event Routing
//!
//! | `winit` event                      | scene handler                       |
//! |------------------------------------|-------------------------------------|
//! | `Resized`, `ScaleFactorChanged`    | [`SceneState::resize`]              |
//! | `CursorMoved`, touch moved         | [`SceneState::pointer_moved`]       |
//! | touch ended or cancelled           | [`SceneState::touch_ended`]         |
//! | `RedrawRequested`                  | [`FrameLoop::tick`]                 |
//!
//! ## Platform-Specific Notes
//!
//! - **Desktop**:
//!   - The renderer is created with `pollster::block_on` as soon as the window exists.
//!
//! - **WebAssembly**:
//!   - The canvas is appended to the page body; [`crate::web`] keeps it the size of the
//!     browser window and suppresses the context menu.
//!   - Renderer creation runs in `wasm_bindgen_futures::spawn_local` and the result is
//!     handed back over a `oneshot` channel, polled on every window event until it
//!     arrives.
//!
//! Failing to acquire a graphics context is fatal: the error is reported, kept for
//! [`App::take_fatal`], and the event loop exits.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{TouchPhase, WindowEvent},
    window::Window,
};

use crate::error::SnowError;
use crate::frame::{FrameLoop, LoopState, WebClock};
use crate::geometry::PointList;
use crate::renderer::Renderer;
use crate::scene::{SceneState, Viewport};
use crate::settings::Settings;

pub struct App {
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    #[cfg(target_arch = "wasm32")]
    renderer_receiver: Option<futures::channel::oneshot::Receiver<Result<Renderer, SnowError>>>,
    scene: SceneState,
    frame_loop: FrameLoop<WebClock>,
    settings: Settings,
    geometry: PointList,
    fatal: Option<SnowError>,
}

impl App {
    pub fn new(settings: Settings, geometry: PointList) -> Self {
        Self {
            window: None,
            renderer: None,
            #[cfg(target_arch = "wasm32")]
            renderer_receiver: None,
            scene: SceneState::new(&settings),
            frame_loop: FrameLoop::new(WebClock::new()),
            settings,
            geometry,
            fatal: None,
        }
    }

    /// The error that stopped the app, if any. Native callers check it once the event loop
    /// has returned.
    pub fn take_fatal(&mut self) -> Option<SnowError> {
        self.fatal.take()
    }

    /// Reports `err` and keeps it unless an earlier failure is already recorded. The caller
    /// exits the event loop.
    fn fail(&mut self, err: SnowError) {
        log::error!("{err}");
        #[cfg(target_arch = "wasm32")]
        crate::web::alert(&err.to_string());
        self.fatal.get_or_insert(err);
    }

    /// Applies a window size in device pixels to the scene and, once it exists, the
    /// renderer.
    fn resize(&mut self, size: PhysicalSize<u32>, scale: f64) {
        let logical = size.to_logical::<f64>(scale);
        let canvas = self.scene.resize(Viewport {
            width: logical.width,
            height: logical.height,
            scale,
        });
        if let Some(renderer) = self.renderer.as_mut() {
            log::info!("Resizing renderer surface to: ({}, {})", canvas.width, canvas.height);
            renderer.resize(canvas.width, canvas.height);
        }
    }

    /// Installs a freshly created renderer: initial resize, then the loop starts.
    fn renderer_ready(&mut self, renderer: Renderer) {
        self.renderer = Some(renderer);
        let Some(window) = self.window.clone() else {
            return;
        };
        self.resize(window.inner_size(), window.scale_factor());
        if self.frame_loop.start() {
            window.request_redraw();
        }
    }

    fn redraw(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        let (Some(renderer), Some(window)) = (self.renderer.as_mut(), self.window.as_ref()) else {
            return;
        };

        let mut outcome = Ok(());
        self.frame_loop
            .tick(&mut self.scene, &**window, |scene, update| {
                outcome = renderer.render_frame(&scene.uniforms, update);
            });

        match outcome {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated; reconfiguring");
                renderer.reconfigure();
            }
            Err(err @ wgpu::SurfaceError::OutOfMemory) => {
                self.fail(err.into());
                event_loop.exit();
            }
            Err(err) => log::warn!("Skipping frame: {err}"),
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn poll_renderer(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        let Some(receiver) = self.renderer_receiver.as_mut() else {
            return;
        };
        match receiver.try_recv() {
            Ok(Some(Ok(renderer))) => {
                self.renderer_receiver = None;
                self.renderer_ready(renderer);
            }
            Ok(Some(Err(err))) => {
                self.renderer_receiver = None;
                self.fail(err);
                event_loop.exit();
            }
            Ok(None) => {}
            Err(_) => {
                self.renderer_receiver = None;
                self.fail(SnowError::RendererCancelled);
                event_loop.exit();
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        #[allow(unused_mut)]
        let mut attributes = Window::default_attributes().with_title("Snowglobe");

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::WindowAttributesExtWebSys;
            attributes = attributes.with_append(true).with_prevent_default(true);
        }

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                self.fail(err.into());
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        #[cfg(target_arch = "wasm32")]
        crate::web::install_listeners(window.clone());

        let PhysicalSize { width, height } = window.inner_size();
        log::info!("Window dimensions: ({width} x {height})");

        #[cfg(not(target_arch = "wasm32"))]
        {
            let settings = self.settings.clone();
            let geometry = self.geometry.clone();
            let renderer = pollster::block_on(async move {
                Renderer::new(window, width, height, &settings, &geometry).await
            });
            match renderer {
                Ok(renderer) => self.renderer_ready(renderer),
                Err(err) => {
                    self.fail(err);
                    event_loop.exit();
                }
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let (sender, receiver) = futures::channel::oneshot::channel();
            self.renderer_receiver = Some(receiver);
            let settings = self.settings.clone();
            let geometry = self.geometry.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let renderer = Renderer::new(window, width, height, &settings, &geometry).await;
                if sender.send(renderer).is_err() {
                    log::error!("Failed to send renderer!");
                }
            });
        }
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        #[cfg(target_arch = "wasm32")]
        self.poll_renderer(event_loop);

        let Some(window) = self.window.clone() else {
            return;
        };

        match event {
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key:
                            winit::keyboard::PhysicalKey::Code(winit::keyboard::KeyCode::Escape),
                        ..
                    },
                ..
            } => {
                #[cfg(not(target_arch = "wasm32"))]
                event_loop.exit();
            }
            WindowEvent::CloseRequested => {
                log::info!("Close requested. Exiting...");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => self.resize(size, window.scale_factor()),
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.resize(window.inner_size(), scale_factor)
            }
            WindowEvent::CursorMoved { position, .. } => {
                let position = position.to_logical::<f64>(window.scale_factor());
                self.scene.pointer_moved(position.x, position.y);
            }
            WindowEvent::Touch(touch) => match touch.phase {
                TouchPhase::Moved => {
                    let location = touch.location.to_logical::<f64>(window.scale_factor());
                    self.scene.pointer_moved(location.x, location.y);
                }
                TouchPhase::Ended | TouchPhase::Cancelled => self.scene.touch_ended(),
                TouchPhase::Started => {}
            },
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => (),
        }

        // Keep events flowing until the renderer arrives and the loop takes over.
        if self.frame_loop.state() == LoopState::Uninitialized {
            window.request_redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(Settings::default(), PointList::embedded().unwrap())
    }

    #[test]
    fn no_failure_is_recorded_at_start() {
        assert!(app().take_fatal().is_none());
    }

    #[test]
    fn first_failure_is_kept_and_taken_once() {
        let mut app = app();
        app.fail(SnowError::GraphicsUnavailable);
        app.fail(SnowError::RendererCancelled);

        assert!(matches!(app.take_fatal(), Some(SnowError::GraphicsUnavailable)));
        assert!(app.take_fatal().is_none());
    }

    #[test]
    fn out_of_memory_becomes_a_surface_failure() {
        let mut app = app();
        app.fail(wgpu::SurfaceError::OutOfMemory.into());
        assert!(matches!(
            app.take_fatal(),
            Some(SnowError::Surface(wgpu::SurfaceError::OutOfMemory))
        ));
    }
}
