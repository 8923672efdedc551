//! wgpu surface that shows the software canvas.
//!
//! Each present uploads the RGBA8 front buffer into a sampled texture and
//! blits it over the surface texture. No custom pipeline is involved.

use anyhow::{Context, Result};
use wgpu::SurfaceError;
use wgpu::util::TextureBlitter;
use winit::dpi::PhysicalSize;
use winit::window::Window;

/// Initialization parameters for the GPU layer.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,

    /// Frame pacing is done on the CPU, so the default never waits on vblank.
    pub present_mode: wgpu::PresentMode,

    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::AutoNoVsync,
            desired_maximum_frame_latency: 2,
        }
    }
}

/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM); terminate gracefully.
    Fatal,
}

/// Texture the canvas front buffer is streamed into.
struct Upload {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    size: PhysicalSize<u32>,
}

/// Owns the wgpu device, the window surface and the upload texture.
pub struct Gpu<'w> {
    /// Surface lifetime is tied to the window through `'w`.
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    blitter: TextureBlitter,
    upload: Option<Upload>,
}

impl<'w> Gpu<'w> {
    /// Creates a GPU context bound to `window`.
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(size.width > 0 && size.height > 0, "window has zero size");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("gloom-studio device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let caps = surface.get_capabilities(&adapter);
        let format = choose_surface_format(&caps, init.prefer_srgb).context("no supported surface formats")?;
        let present_mode = if caps.present_modes.contains(&init.present_mode) {
            init.present_mode
        } else {
            wgpu::PresentMode::Fifo
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode,
            alpha_mode: caps.alpha_modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        };
        surface.configure(&device, &config);

        let blitter = TextureBlitter::new(&device, format);
        log::info!(
            "surface {}x{} {:?} {:?} on {}",
            size.width,
            size.height,
            format,
            present_mode,
            adapter.get_info().name
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            blitter,
            upload: None,
        })
    }

    #[inline]
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    /// Reconfigures the surface. A zero-sized window defers configuration.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.size = new_size;
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Uploads `rgba` (tightly packed, `width x height`) and presents it.
    pub fn present_rgba(&mut self, rgba: &[u8], width: u32, height: u32) -> Result<(), SurfaceError> {
        if width == 0 || height == 0 || rgba.len() < width as usize * height as usize * 4 {
            return Ok(());
        }

        let frame = self.surface.get_current_texture()?;
        let target = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

        self.ensure_upload(PhysicalSize::new(width, height));
        let Some(upload) = self.upload.as_ref() else {
            return Ok(());
        };
        let extent = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &upload.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            extent,
        );

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("gloom present encoder"),
        });
        self.blitter.copy(&self.device, &mut encoder, &upload.view, &target);
        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }

    /// Converts a `SurfaceError` into a higher-level action.
    pub fn handle_surface_error(&mut self, err: SurfaceError) -> SurfaceErrorAction {
        match err {
            SurfaceError::Lost | SurfaceError::Outdated => {
                if self.size.width > 0 && self.size.height > 0 {
                    self.surface.configure(&self.device, &self.config);
                }
                SurfaceErrorAction::Reconfigured
            }
            SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
            SurfaceError::Timeout | SurfaceError::Other => SurfaceErrorAction::SkipFrame,
        }
    }

    /// Upload texture matching `size`, recreated when the canvas size changes.
    fn ensure_upload(&mut self, size: PhysicalSize<u32>) {
        if self.upload.as_ref().is_some_and(|u| u.size == size) {
            return;
        }
        self.upload = Some({
            log::debug!("upload texture {}x{}", size.width, size.height);
            let texture = self.device.create_texture(&wgpu::TextureDescriptor {
                label: Some("gloom canvas upload"),
                size: wgpu::Extent3d {
                    width: size.width,
                    height: size.height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            });
            let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
            Upload { texture, view, size }
        });
    }
}

fn choose_surface_format(caps: &wgpu::SurfaceCapabilities, prefer_srgb: bool) -> Option<wgpu::TextureFormat> {
    if prefer_srgb {
        let preferred = [wgpu::TextureFormat::Bgra8UnormSrgb, wgpu::TextureFormat::Rgba8UnormSrgb];
        if let Some(f) = preferred.into_iter().find(|f| caps.formats.contains(f)) {
            return Some(f);
        }
    }
    caps.formats.first().copied()
}
