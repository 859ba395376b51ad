//! Single-window demo runner.
//!
//! [`run`] opens a window, brings up the GPU, builds one sphere mesh, and
//! drives the frame loop: poll input, update the camera, render, present.
//! Escape releases the pointer grab (the camera goes inert), Space grabs it
//! again. The three demo binaries differ only in the [`DemoConfig`] they
//! pass in.

use std::error::Error;
use std::sync::Arc;
use std::time::Instant;

use glam::{Mat4, Vec3};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{DeviceEvent, DeviceId, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::KeyCode;
use winit::window::{CursorGrabMode, Window, WindowId};

use crate::camera::FlyCamera;
use crate::gpu::GpuContext;
use crate::input::Input;
use crate::material::Material;
use crate::mesh::{Mesh, SphereGeometry};
use crate::sphere_pass::{DrawCall, SpherePass};
use crate::transform::{Axis, rotate, translate};

/// Scene settings for one demo window.
#[derive(Clone, Debug)]
pub struct DemoConfig {
    pub title: String,
    pub material: Material,
    pub radius: f32,
    pub slices: u32,
    pub stacks: u32,
    /// World position of the sphere.
    pub location: Vec3,
    /// Model spin about its local Y axis, in degrees per second.
    pub spin_speed: f32,
}

impl DemoConfig {
    /// A centered unit sphere at the original demos' tessellation
    /// (128 slices, 64 stacks), slowly spinning.
    pub fn new(title: impl Into<String>, material: Material) -> Self {
        Self {
            title: title.into(),
            material,
            radius: 1.0,
            slices: 128,
            stacks: 64,
            location: Vec3::ZERO,
            spin_speed: 30.0,
        }
    }

    pub fn radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn tessellation(mut self, slices: u32, stacks: u32) -> Self {
        self.slices = slices;
        self.stacks = stacks;
        self
    }

    pub fn location(mut self, location: Vec3) -> Self {
        self.location = location;
        self
    }

    pub fn spin_speed(mut self, degrees_per_second: f32) -> Self {
        self.spin_speed = degrees_per_second;
        self
    }
}

struct DemoApp {
    config: DemoConfig,
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    pass: Option<SpherePass>,
    mesh: Option<Mesh>,
    camera: Option<FlyCamera>,
    input: Input,
    look_active: bool,
    spin_angle: f32,
    start_time: Instant,
    last_frame: Instant,
}

impl DemoApp {
    fn new(config: DemoConfig) -> Self {
        Self {
            config,
            window: None,
            gpu: None,
            pass: None,
            mesh: None,
            camera: None,
            input: Input::new(),
            look_active: false,
            spin_angle: 0.0,
            start_time: Instant::now(),
            last_frame: Instant::now(),
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), Box<dyn Error>> {
        let window = Arc::new(
            event_loop.create_window(
                Window::default_attributes()
                    .with_title(&self.config.title)
                    .with_inner_size(LogicalSize::new(1000, 800)),
            )?,
        );

        let gpu = GpuContext::new(window.clone())?;
        let pass = SpherePass::new(&gpu);

        let geometry =
            SphereGeometry::generate(self.config.radius, self.config.slices, self.config.stacks)?;
        let mesh = Mesh::new(&gpu, &geometry);

        let camera = FlyCamera::new(gpu.aspect());

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.pass = Some(pass);
        self.mesh = Some(mesh);
        self.camera = Some(camera);

        self.set_capture(true);
        self.start_time = Instant::now();
        self.last_frame = Instant::now();
        Ok(())
    }

    /// Grabs or releases the pointer. Locked grab fails on some platforms,
    /// so fall back to confining the cursor to the window.
    fn set_capture(&mut self, active: bool) {
        let Some(window) = &self.window else { return };
        if active {
            window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))
                .ok();
        } else {
            window.set_cursor_grab(CursorGrabMode::None).ok();
        }
        window.set_cursor_visible(!active);
        self.look_active = active;
    }

    fn redraw(&mut self) {
        if self.input.key_pressed(KeyCode::Escape) {
            self.set_capture(false);
        } else if self.input.key_pressed(KeyCode::Space) {
            self.set_capture(true);
        }

        let (Some(window), Some(gpu), Some(pass), Some(mesh), Some(camera)) = (
            self.window.as_ref(),
            self.gpu.as_ref(),
            self.pass.as_mut(),
            self.mesh.as_ref(),
            self.camera.as_mut(),
        ) else {
            return;
        };

        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        let time = self.start_time.elapsed().as_secs_f32();

        camera.update(&self.input.camera_input(self.look_active));
        self.input.end_frame();

        self.spin_angle = (self.spin_angle + self.config.spin_speed * dt) % 360.0;
        let mut model = rotate(Mat4::IDENTITY, self.spin_angle, Axis::Y, true);
        model = translate(
            model,
            self.config.location.x,
            self.config.location.y,
            self.config.location.z,
        );

        pass.ensure_depth_size(gpu);

        let frame = match gpu.current_frame() {
            Ok(frame) => frame,
            Err(e) => {
                eprintln!("[demo] dropped frame: {}", e);
                window.request_redraw();
                return;
            }
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: None,
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.config.material.clear_color()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &pass.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.render(
                gpu,
                &mut render_pass,
                camera,
                time,
                self.config.material.light_position(),
                &[DrawCall {
                    mesh,
                    model,
                    material: self.config.material,
                }],
            );
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        frame.present();

        window.request_redraw();
    }
}

impl ApplicationHandler for DemoApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let Err(e) = self.init(event_loop) {
            eprintln!("[demo] startup failed: {}", e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(size.width, size.height);
                    if let Some(camera) = &mut self.camera {
                        camera.set_aspect(gpu.aspect());
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            other => {
                self.input.handle_window_event(&other);
            }
        }
    }

    fn device_event(&mut self, _loop: &ActiveEventLoop, _id: DeviceId, event: DeviceEvent) {
        self.input.handle_device_event(&event);
    }
}

/// Opens a window and runs a demo scene to completion.
pub fn run(config: DemoConfig) -> Result<(), Box<dyn Error>> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = DemoApp::new(config);
    event_loop.run_app(&mut app)?;
    Ok(())
}
