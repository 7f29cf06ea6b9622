use std::sync::Arc;
use std::time::Instant;

use glam::Mat4;
use octa::{OctahedronOptions, Shading};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Fullscreen, Window, WindowId};

use crate::config::ViewerConfig;
use crate::render::{Camera, Renderer};

/// Model rotation about the Y axis.
#[derive(Debug, Default)]
struct Spin {
    angle: f32,
    paused: bool,
    last_frame_time: Option<Instant>,
}

impl Spin {
    fn update(&mut self, speed: f32) -> Mat4 {
        let now = Instant::now();
        let dt = self
            .last_frame_time
            .map(|t| now.duration_since(t).as_secs_f32())
            .unwrap_or(0.0)
            .min(0.1);
        self.last_frame_time = Some(now);

        if !self.paused {
            self.angle += speed * dt;
        }
        Mat4::from_rotation_y(self.angle)
    }
}

pub struct App {
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    camera: Option<Camera>,
    config: ViewerConfig,
    options: OctahedronOptions,
    spin: Spin,
    fullscreen: bool,
}

impl App {
    pub fn new(config: ViewerConfig, options: OctahedronOptions) -> Self {
        Self {
            window: None,
            renderer: None,
            camera: None,
            config,
            options,
            spin: Spin::default(),
            fullscreen: false,
        }
    }

    fn toggle_fullscreen(&mut self) {
        let Some(window) = &self.window else { return };

        self.fullscreen = !self.fullscreen;
        window.set_fullscreen(self.fullscreen.then(|| Fullscreen::Borderless(None)));
    }

    fn handle_key_pressed(&mut self, key: KeyCode, event_loop: &ActiveEventLoop) {
        let step = self.config.orbit_step;

        let result = match key {
            KeyCode::Escape => {
                event_loop.exit();
                Ok(())
            }
            KeyCode::F11 => {
                self.toggle_fullscreen();
                Ok(())
            }
            KeyCode::KeyF => self.with_renderer(|r| r.set_shading(Shading::Flat)),
            KeyCode::KeyV => self.with_renderer(|r| r.set_shading(Shading::Smooth)),
            KeyCode::KeyN => self.with_renderer(Renderer::toggle_normal_averaging),
            KeyCode::Space => {
                self.spin.paused = !self.spin.paused;
                Ok(())
            }
            KeyCode::ArrowLeft => self.orbit(-step, 0.0),
            KeyCode::ArrowRight => self.orbit(step, 0.0),
            KeyCode::ArrowUp => self.orbit(0.0, step),
            KeyCode::ArrowDown => self.orbit(0.0, -step),
            _ => Ok(()),
        };

        if let Err(e) = result {
            log::error!("Failed to update mesh: {}", e);
            event_loop.exit();
        }
    }

    fn with_renderer(
        &mut self,
        f: impl FnOnce(&mut Renderer) -> anyhow::Result<()>,
    ) -> anyhow::Result<()> {
        match &mut self.renderer {
            Some(renderer) => f(renderer),
            None => Ok(()),
        }
    }

    fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) -> anyhow::Result<()> {
        if let Some(camera) = &mut self.camera {
            camera.rotate(delta_yaw, delta_pitch);
        }
        Ok(())
    }

    fn handle_resize(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        if let Some(renderer) = &mut self.renderer {
            renderer.resize(size);
        }
        if let Some(camera) = &mut self.camera {
            if size.height > 0 {
                camera.aspect = size.width as f32 / size.height as f32;
            }
        }
    }

    fn handle_redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(renderer), Some(camera)) = (&mut self.renderer, &self.camera) else {
            return;
        };

        let model = self.spin.update(self.config.spin_speed);
        renderer.update_scene(camera, model);

        match renderer.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost) => renderer.resize(renderer.size),
            Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
            Err(e) => log::error!("Render error: {:?}", e),
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.width,
                self.config.height,
            ));

        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        let renderer = tokio::runtime::Runtime::new()
            .map_err(anyhow::Error::from)
            .and_then(|rt| {
                rt.block_on(Renderer::new(window, &self.config, self.options.clone()))
            });
        let renderer = match renderer {
            Ok(renderer) => renderer,
            Err(e) => {
                log::error!("Failed to initialize renderer: {:#}", e);
                event_loop.exit();
                return;
            }
        };

        let aspect = renderer.size.width as f32 / renderer.size.height.max(1) as f32;
        self.camera = Some(Camera::new(aspect, self.config.camera_distance));
        self.renderer = Some(renderer);
        log::info!("Keys: F flat, V smooth, N averaging, Space pause, arrows orbit, Esc quit");
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => self.handle_resize(size),
            WindowEvent::KeyboardInput { event, .. } => {
                if let (PhysicalKey::Code(key), ElementState::Pressed) =
                    (event.physical_key, event.state)
                {
                    self.handle_key_pressed(key, event_loop);
                }
            }
            WindowEvent::RedrawRequested => self.handle_redraw(event_loop),
            _ => {}
        }
    }
}
