use anyhow::{Context, Result};
use ouroboros::self_referencing;

use gloom_fx::render::{Canvas, SoftwareCanvas};
use gloom_fx::{EffectsConfig, FrameOrchestrator};
use gloom_settings::SettingsStore;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use crate::canvas::WindowCanvas;
use crate::controls::{self, Action, Steering};
use crate::gpu::{Gpu, GpuInit};
use crate::scene::DemoScene;

/// Frames between debug timing lines.
const REPORT_EVERY: u64 = 600;

/// Window configuration.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    /// Initial frame cap; `<= 0` runs uncapped.
    pub target_fps: i32,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            title: "gloom studio".to_string(),
            initial_size: LogicalSize::new(960.0, 544.0),
            target_fps: controls::CAPPED_FPS,
        }
    }
}

/// Entry point for the preview window.
pub struct Studio;

impl Studio {
    pub fn run(config: StudioConfig, gpu_init: GpuInit, store: SettingsStore) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = StudioState::new(config, gpu_init, store);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.fatal.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    canvas: SoftwareCanvas,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct StudioState {
    config: StudioConfig,
    gpu_init: GpuInit,
    store: SettingsStore,
    fx: FrameOrchestrator,
    scene: DemoScene,
    steering: Steering,

    window: Option<WindowEntry>,
    exit_requested: bool,
    fatal: Option<anyhow::Error>,
}

impl StudioState {
    fn new(config: StudioConfig, gpu_init: GpuInit, store: SettingsStore) -> Self {
        let mut fx = FrameOrchestrator::new();
        fx.set_target_fps(config.target_fps);
        Self {
            config,
            gpu_init,
            store,
            fx,
            scene: DemoScene::default(),
            steering: Steering::default(),
            window: None,
            exit_requested: false,
            fatal: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.fatal = Some(err);
        self.exit_requested = true;
        event_loop.exit();
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop.create_window(attrs).context("failed to create window")?;
        let size = window.inner_size();
        let gpu_init = self.gpu_init.clone();

        let mut entry = WindowEntryTryBuilder {
            canvas: SoftwareCanvas::new(size.width, size.height),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed for window")?;

        let fx = &mut self.fx;
        entry
            .with_canvas_mut(|canvas| fx.init(canvas, size.width, size.height))
            .context("frame effects failed to initialize")?;

        entry.with_window(|w| w.request_redraw());
        self.window = Some(entry);
        Ok(())
    }

    fn destroy_window_entry(&mut self) {
        if let Some(mut entry) = self.window.take() {
            let fx = &mut self.fx;
            entry.with_canvas_mut(|canvas| fx.shutdown(canvas));
        }
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        let (fx, Some(entry)) = (&mut self.fx, self.window.as_mut()) else {
            return;
        };

        entry.with_mut(|fields| {
            fields.gpu.resize(new_size);
            if new_size.width == 0 || new_size.height == 0 {
                return;
            }
            fields.canvas.resize(new_size.width, new_size.height);
            if let Err(e) = fx.resize(fields.canvas, new_size.width, new_size.height) {
                log::warn!("effects resize failed: {e}");
            }
            fields.window.request_redraw();
        });
    }

    fn redraw(&mut self) -> bool {
        let Self {
            store,
            fx,
            scene,
            window,
            ..
        } = self;
        let Some(entry) = window.as_mut() else {
            return true;
        };
        if entry.with_gpu(|gpu| gpu.size().width == 0 || gpu.size().height == 0) {
            return true;
        }

        let frame = fx.begin_frame(&*store);
        scene.step(frame.dt, fx.camera_motion());

        entry.with_mut(|fields| {
            let size = fields.canvas.output_size();
            scene.draw(fields.canvas.back_buffer_mut(), size);
            fx.mark_world_frame();

            let mut canvas = WindowCanvas::new(fields.canvas, fields.gpu);
            let report = fx.end_frame_present(&mut canvas);

            if frame.frame_index % REPORT_EVERY == 0 {
                log::debug!(
                    "frame {} dt {:.2}ms dust {} paced {:.2}ms",
                    frame.frame_index,
                    frame.dt * 1000.0,
                    report.dust_drawn,
                    report.paced.as_secs_f32() * 1000.0
                );
            }
            !canvas.is_fatal()
        })
    }

    fn key(&mut self, event: &KeyEvent) {
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        let pressed = event.state == ElementState::Pressed;

        if self.steering.key(code, pressed) {
            let m = self.steering.motion();
            self.fx.set_camera_motion(m.lateral, m.forward, m.yaw_rate);
            return;
        }
        if !pressed || event.repeat {
            return;
        }
        if let Some(action) = controls::action_for(code) {
            self.apply(action);
        }
    }

    fn apply(&mut self, action: Action) {
        let (fx, store) = (&mut self.fx, &mut self.store);
        match action {
            Action::VignetteLevel(level) => {
                fx.set_vignette_level(store, level);
                log::info!("vignette level {level}");
            }
            Action::CycleGrain => {
                let current = if store.film_grain() { store.film_grain_intensity() } else { 0 };
                let level = controls::next_level(current);
                fx.set_film_grain_level(store, level);
                log::info!("film grain level {level}");
            }
            Action::CycleScanlines => {
                let current = if store.scanlines() { store.scanline_intensity() } else { 0 };
                let level = controls::next_level(current);
                fx.set_scanline_level(store, level);
                log::info!("scanline level {level}");
            }
            Action::ToggleDust => {
                let on = !store.particle_dust();
                fx.set_particle_dust_enabled(store, on);
                log::info!("dust {}", if on { "on" } else { "off" });
            }
            Action::ToggleFpsCap => {
                let fps = if fx.target_fps() > 0 { 0 } else { controls::CAPPED_FPS };
                fx.set_target_fps(fps);
                log::info!("frame cap {}", if fps > 0 { "60 fps" } else { "off" });
            }
            Action::Exit => self.exit_requested = true,
        }
    }
}

impl ApplicationHandler for StudioState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.create_window_entry(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Continuous redraw; the orchestrator paces the loop.
        event_loop.set_control_flow(ControlFlow::Poll);
        if let Some(entry) = &self.window {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        match &event {
            WindowEvent::CloseRequested => self.exit_requested = true,

            WindowEvent::Resized(new_size) => self.resize(*new_size),

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(size) = self.window.as_ref().map(|e| e.with_window(|w| w.inner_size())) {
                    self.resize(size);
                }
            }

            WindowEvent::Focused(false) => {
                self.steering.release_all();
                self.fx.set_camera_motion(0.0, 0.0, 0.0);
            }

            WindowEvent::KeyboardInput { event, .. } => self.key(event),

            WindowEvent::RedrawRequested => {
                if !self.redraw() {
                    self.fail(event_loop, anyhow::anyhow!("surface is out of memory"));
                    return;
                }
            }

            _ => {}
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.destroy_window_entry();
        if let Err(e) = self.store.save() {
            log::warn!("{e}");
        }
    }
}
