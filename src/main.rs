//! Animated shader backdrop
//!
//! Opens a window, builds the backdrop shader program once, then redraws
//! every display frame: reconcile the surface size, clear, draw the quad.

mod config;
mod gpu;
mod render;
mod window;

use std::sync::Arc;

use backdrop_renderer::{BackdropPipeline, ExtentTracker, SizeObservation, build_program};
use backdrop_renderer::shaders::builtin;
use config::Config;
use gpu::{SharedGpuState, WindowGpuState};
use render::render_frame;
use window::WindowState;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

struct App {
    state: Option<WindowState>,
    shared_gpu: Option<SharedGpuState>,
    config: Config,
}

impl App {
    fn new() -> Self {
        Self {
            state: None,
            shared_gpu: None,
            config: Config::load(),
        }
    }

    fn init_shared_gpu(&mut self) {
        if self.shared_gpu.is_none() {
            match SharedGpuState::new() {
                Ok(shared) => self.shared_gpu = Some(shared),
                Err(e) => log::warn!("GPU unavailable, backdrop stays inert: {:#}", e),
            }
        }
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) {
        self.init_shared_gpu();
        let Some(shared) = self.shared_gpu.as_ref() else {
            return;
        };

        let window_attrs = Window::default_attributes()
            .with_title(&self.config.window.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        let window = match event_loop.create_window(window_attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                return;
            }
        };
        let size = window.inner_size();

        let surface = match shared.instance.create_surface(window.clone()) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("Failed to create surface, backdrop stays inert: {}", e);
                return;
            }
        };
        let caps = surface.get_capabilities(&shared.adapter);
        let format = caps.formats[0];

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&shared.device, &surface_config);

        let mut extent = ExtentTracker::new();
        extent.observe(&SizeObservation::from_device_pixels(size.width, size.height));

        // Build the shader program once. On failure the window stays empty
        // and the redraw loop is never started; diagnostics are in the log.
        let backdrop = match build_program(builtin::VERTEX, builtin::FRAGMENT) {
            Ok(program) => Some(BackdropPipeline::new(&shared.device, format, &program)),
            Err(e) => {
                log::warn!("Backdrop disabled: {}", e);
                None
            }
        };

        let start_loop = backdrop.is_some();
        self.state = Some(WindowState {
            window: window.clone(),
            gpu: WindowGpuState {
                surface,
                config: surface_config,
            },
            extent,
            backdrop,
            running: true,
            frame_count: 0,
        });

        if start_loop {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_none() {
            self.create_window(event_loop);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                state.running = false;
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                // winit reports device pixels, the authoritative metric.
                // The surface itself is only touched by the frame step.
                state
                    .extent
                    .observe(&SizeObservation::from_device_pixels(size.width, size.height));
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let size = state.window.inner_size();
                state
                    .extent
                    .observe(&SizeObservation::from_device_pixels(size.width, size.height));
            }

            WindowEvent::RedrawRequested => {
                if let Some(shared) = self.shared_gpu.as_ref() {
                    render_frame(state, shared, &self.config.backdrop);
                }
                // The loop only continues because it is re-requested here
                if state.running && state.backdrop.is_some() {
                    state.window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn,backdrop=info"))
        .init();
    log::info!("Backdrop starting");

    let event_loop = EventLoop::new().unwrap();
    event_loop.set_control_flow(ControlFlow::Wait);
    event_loop.run_app(&mut App::new()).unwrap();
}
