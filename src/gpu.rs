//! # GPU Management Module
//!
//! The `gpu` module acquires the graphics context the snow scene renders with and keeps the
//! presentation surface in step with the window size.
//!
//! ## Context Acquisition
//!
//! [`Gpu::new_async`] walks an ordered list of backend sets and keeps the first one that
//! yields an adapter able to present to the window:
//!
//! 1. `wgpu::Backends::PRIMARY`: Vulkan, Metal, DX12, or WebGPU in the browser.
//! 2. `wgpu::Backends::GL`: OpenGL / WebGL2, the legacy context.
//!
//! When neither works the function fails with [`SnowError::GraphicsUnavailable`]. There is
//! no retry and no degraded mode; the caller reports the failure and stops.
//!
//! ## Features
//!
//! - **Surface Resizing**: [`Gpu::resize`] reconfigures the surface for a new canvas size.
//! - **Depth Texture Creation**: [`Gpu::create_depth_texture`] for the depth-tested passes.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use snowglobe::Gpu;
//!
//! async fn create_gpu(window: Arc<winit::window::Window>) -> Result<Gpu, snowglobe::SnowError> {
//!     let size = window.inner_size();
//!     Gpu::new_async(window, size.width, size.height).await
//! }
//! ```

use std::sync::Arc;

use winit::window::Window;

use crate::error::SnowError;

/// Backend sets tried in order, with the name logged for each attempt.
const BACKEND_PREFERENCE: [(&str, wgpu::Backends); 2] = [
    ("primary", wgpu::Backends::PRIMARY),
    ("legacy GL", wgpu::Backends::GL),
];

/// The GPU resources the renderer draws with.
///
/// # Fields
/// - `surface`: presentation target bound to the window (or canvas).
/// - `device`: creates buffers, textures and pipelines.
/// - `queue`: receives buffer writes and command buffers.
/// - `surface_config`: current surface configuration; its size follows the window.
/// - `surface_format`: color format the pipelines render into.
pub struct Gpu {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface_config: wgpu::SurfaceConfiguration,
    pub surface_format: wgpu::TextureFormat,
}

impl Gpu {
    /// Reconfigures the surface for a canvas of `width` x `height` device pixels.
    ///
    /// Zero dimensions (a minimized window) are clamped to one pixel, as the surface
    /// cannot be configured empty.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface_config.width = width.max(1);
        self.surface_config.height = height.max(1);
        self.surface.configure(&self.device, &self.surface_config);
    }

    /// Reapplies the current configuration, used after the surface was lost or outdated.
    pub fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.surface_config);
    }

    /// Creates a depth texture view matching the given size, in
    /// [`Renderer::DEPTH_FORMAT`](crate::Renderer::DEPTH_FORMAT).
    pub fn create_depth_texture(&self, width: u32, height: u32) -> wgpu::TextureView {
        let texture = self.device.create_texture(
            &(wgpu::TextureDescriptor {
                label: Some("Depth Texture"),
                size: wgpu::Extent3d {
                    width: width.max(1),
                    height: height.max(1),
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: crate::Renderer::DEPTH_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            }),
        );
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Acquires a graphics context for `window`, falling back from the primary backends to
    /// GL, and configures the surface at `width` x `height`.
    pub async fn new_async(window: Arc<Window>, width: u32, height: u32) -> Result<Self, SnowError> {
        for (name, backends) in BACKEND_PREFERENCE {
            match Self::try_backends(window.clone(), backends, width, height).await {
                Ok(Some(gpu)) => {
                    log::info!("Using {name} graphics backends");
                    return Ok(gpu);
                }
                Ok(None) => log::warn!("No adapter from the {name} graphics backends"),
                Err(err) => return Err(err),
            }
        }
        Err(SnowError::GraphicsUnavailable)
    }

    /// One acquisition attempt. `Ok(None)` means this backend set has no usable adapter.
    async fn try_backends(
        window: Arc<Window>,
        backends: wgpu::Backends,
        width: u32,
        height: u32,
    ) -> Result<Option<Self>, SnowError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends,
            ..Default::default()
        });

        let surface = match instance.create_surface(window) {
            Ok(surface) => surface,
            Err(err) => {
                log::warn!("Failed to create a surface: {err}");
                return Ok(None);
            }
        };

        let Some(adapter) = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        else {
            return Ok(None);
        };

        let info = adapter.get_info();
        log::info!("WGPU Adapter: {} ({:?})", info.name, info.backend);

        let required_limits = if info.backend == wgpu::Backend::Gl {
            wgpu::Limits::downlevel_webgl2_defaults().using_resolution(adapter.limits())
        } else {
            wgpu::Limits::default().using_resolution(adapter.limits())
        };

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("WGPU Device"),
                    memory_hints: wgpu::MemoryHints::default(),
                    required_features: wgpu::Features::default(),
                    required_limits,
                },
                None,
            )
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let Some(surface_format) = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|format| format.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
        else {
            return Ok(None);
        };

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: width.max(1),
            height: height.max(1),
            present_mode: surface_capabilities.present_modes[0],
            alpha_mode: surface_capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        Ok(Some(Self {
            surface,
            device,
            queue,
            surface_config,
            surface_format,
        }))
    }
}
