//! GPU context and device management.
//!
//! [`GpuContext`] owns the wgpu surface, device, queue, and surface
//! configuration, and is passed by reference to everything that touches the
//! GPU. Unlike most construction in this crate, GPU bring-up can genuinely
//! fail (no adapter, device request rejected, unconfigurable surface), so
//! [`GpuContext::new`] returns a [`GpuError`] instead of panicking; the
//! host decides whether that is fatal.

use std::sync::Arc;
use winit::window::Window;

/// GPU resource acquisition failures. Construction-time failures are fatal
/// to the object being built and are never retried here.
#[derive(Debug)]
pub enum GpuError {
    /// Adapter, device, surface, or swapchain acquisition failed.
    ResourceCreationFailed(String),
}

impl std::fmt::Display for GpuError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GpuError::ResourceCreationFailed(msg) => {
                write!(f, "GPU resource creation failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for GpuError {}

/// Core GPU context holding wgpu resources.
///
/// Created once at startup from a winit [`Window`]; all fields are public
/// so render passes can reach the raw wgpu API directly.
pub struct GpuContext {
    /// The surface presenting rendered frames to the window.
    pub surface: wgpu::Surface<'static>,
    /// The logical device for creating resources and pipelines.
    pub device: wgpu::Device,
    /// The command queue for submitting work.
    pub queue: wgpu::Queue,
    /// Current surface configuration (format, size, present mode).
    pub config: wgpu::SurfaceConfiguration,
}

impl GpuContext {
    /// Performs all wgpu bring-up: instance, surface, adapter, device and
    /// queue, then configures the surface with an sRGB format and Fifo
    /// present mode (which also provides the 60 Hz frame pacing the demos
    /// rely on).
    pub fn new(window: Arc<Window>) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(|e| GpuError::ResourceCreationFailed(format!("surface: {}", e)))?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .map_err(|e| GpuError::ResourceCreationFailed(format!("no suitable adapter: {}", e)))?;

        let info = adapter.get_info();
        println!("[gpu] adapter: {} ({:?})", info.name, info.backend);

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("Esfera Device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            memory_hints: Default::default(),
            trace: Default::default(),
            experimental_features: Default::default(),
        }))
        .map_err(|e| GpuError::ResourceCreationFailed(format!("device: {}", e)))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        Ok(Self {
            surface,
            device,
            queue,
            config,
        })
    }

    /// Acquires the next swapchain frame.
    pub fn current_frame(&self) -> Result<wgpu::SurfaceTexture, GpuError> {
        self.surface
            .get_current_texture()
            .map_err(|e| GpuError::ResourceCreationFailed(format!("surface frame: {}", e)))
    }

    /// Resizes the surface. Zero-sized dimensions are ignored to avoid
    /// validation errors during window minimize.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Current surface width in pixels.
    pub fn width(&self) -> u32 {
        self.config.width
    }

    /// Current surface height in pixels.
    pub fn height(&self) -> u32 {
        self.config.height
    }

    /// Current aspect ratio (width / height).
    pub fn aspect(&self) -> f32 {
        self.config.width as f32 / self.config.height as f32
    }
}
