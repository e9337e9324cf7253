use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use glam::Vec2;
use reveal_assets::TextureStore;
use reveal_common::Viewport;
use reveal_input::{Action, InputMapper, Key, WheelDelta};
use reveal_render_wgpu::PlaneRenderer;
use reveal_scene::{FrameLoop, GalleryLayout, SceneConfig, SceneSync, SystemClock};
use reveal_tools::SceneInspector;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

const INITIAL_SIZE: PhysicalSize<u32> = PhysicalSize::new(1280, 720);

#[derive(Parser)]
#[command(name = "reveal-desktop", about = "Scroll-synchronised image planes")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory of PNG/JPEG images for the gallery
    #[arg(long)]
    images: Option<PathBuf>,

    /// Scene config (YAML or JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of placeholder images when no directory is given
    #[arg(long, default_value = "12")]
    count: usize,
}

/// Application state.
struct AppState {
    scene: SceneSync<GalleryLayout>,
    frames: FrameLoop<SystemClock>,
    mapper: InputMapper,
    textures: TextureStore,
    show_inspector: bool,
}

impl AppState {
    fn new(config: SceneConfig, textures: TextureStore) -> Result<Self> {
        let layout = GalleryLayout::new(config.gallery, textures.aspects());
        let viewport = Viewport::from_pixels(INITIAL_SIZE.width, INITIAL_SIZE.height)?;
        let scene = SceneSync::new(config, layout, viewport)?;
        Ok(Self {
            scene,
            frames: FrameLoop::new(SystemClock::new()),
            mapper: InputMapper::default(),
            textures,
            show_inspector: true,
        })
    }

    fn apply(&mut self, action: Action) {
        if action == Action::ToggleInspector {
            self.show_inspector = !self.show_inspector;
            return;
        }
        action.apply(&mut self.scene);
    }

    fn handle_key(&mut self, key: KeyCode) {
        let key = match key {
            KeyCode::ArrowLeft => Key::ArrowLeft,
            KeyCode::ArrowRight => Key::ArrowRight,
            KeyCode::ArrowUp => Key::ArrowUp,
            KeyCode::ArrowDown => Key::ArrowDown,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            KeyCode::F1 | KeyCode::Tab => Key::Tab,
            _ => Key::Other,
        };
        let page = self.scene.viewport().width;
        let action = self.mapper.key(key, page, self.scene.scroll_limit());
        self.apply(action);
    }

    fn handle_wheel(&mut self, delta: MouseScrollDelta) {
        let delta = match delta {
            MouseScrollDelta::LineDelta(x, y) => WheelDelta::Lines(Vec2::new(x, y)),
            MouseScrollDelta::PixelDelta(p) => {
                WheelDelta::Pixels(Vec2::new(p.x as f32, p.y as f32))
            }
        };
        let action = self.mapper.wheel(delta);
        self.apply(action);
    }

    fn resize(&mut self, width: u32, height: u32) {
        let result = Viewport::from_pixels(width, height)
            .map_err(anyhow::Error::from)
            .and_then(|v| self.scene.resize(v).map_err(anyhow::Error::from));
        // Minimised windows report zero sizes; keep the last good layout.
        if let Err(e) = result {
            tracing::debug!("resize skipped: {e}");
        }
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.show_inspector {
            return;
        }

        let summary = SceneInspector::summary(&self.scene);
        let visible = SceneInspector::visible_bindings(&self.scene);

        egui::SidePanel::right("inspector")
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.heading("Reveal");
                ui.separator();

                let mut progress = self.scene.progress();
                if ui
                    .add(
                        egui::Slider::new(&mut progress, 0.0..=1.0)
                            .step_by(0.001)
                            .text("progress"),
                    )
                    .changed()
                {
                    self.scene.set_progress(progress);
                }
                ui.label(format!(
                    "Corners: {:.3} {:.3} {:.3} {:.3}",
                    summary.corners[0], summary.corners[1], summary.corners[2], summary.corners[3]
                ));
                ui.separator();

                ui.label(format!("Frame: {}  Time: {:.2}", summary.frame, summary.time));
                ui.label(format!(
                    "Viewport: {}x{}  FOV: {:.2}",
                    summary.viewport[0], summary.viewport[1], summary.fov_degrees
                ));
                ui.label(format!(
                    "Scroll: {:.1} -> {:.1} / {:.1}",
                    summary.scroll, summary.scroll_target, summary.scroll_limit
                ));
                ui.label(format!("FPS: {:.0}", self.frames.timer().fps()));
                ui.separator();

                ui.heading("Images");
                ui.label(format!(
                    "{} planes, {} unique textures, {} visible",
                    summary.bindings,
                    self.textures.unique_count(),
                    visible.len()
                ));
                for i in visible {
                    if let Some(info) = SceneInspector::inspect_binding(&self.scene, i) {
                        let name = self
                            .textures
                            .info(info.element)
                            .map(|t| t.name.as_str())
                            .unwrap_or("?");
                        ui.small(format!("{name}: {info}"));
                    }
                }

                ui.separator();
                ui.small("Wheel/Arrows: Scroll | Up/Down: Progress | F1: Toggle Panel");
            });
    }
}

/// Window and GPU resources, created once the event loop is live.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: PlaneRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(
        event_loop: &ActiveEventLoop,
        egui_ctx: &EguiContext,
        textures: &TextureStore,
    ) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title("Reveal")
            .with_inner_size(INITIAL_SIZE);
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("find adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("reveal_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface has no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let mut renderer =
            PlaneRenderer::new(&device, &queue, surface_format, config.width, config.height);
        renderer.upload_textures(&device, &queue, textures);

        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
    }
}

struct GpuApp {
    state: AppState,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl GpuApp {
    fn new(state: AppState) -> Self {
        Self {
            state,
            gpu: None,
            egui_ctx: EguiContext::default(),
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let renderer = &gpu.renderer;
        let (device, queue) = (&gpu.device, &gpu.queue);
        let running = self.state.frames.step(&mut self.state.scene, |frame| {
            renderer.render(device, queue, &view, frame);
            std::ops::ControlFlow::Continue(())
        });
        if !running {
            event_loop.exit();
            return;
        }

        let raw_input = gpu.egui_winit.take_egui_input(&gpu.window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            self.state.draw_ui(ctx);
        });

        gpu.egui_winit
            .handle_platform_output(&gpu.window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            gpu.egui_renderer
                .update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        gpu.egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            gpu.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            gpu.egui_renderer.free_texture(id);
        }

        output.present();
        gpu.window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }

        match Gpu::new(event_loop, &self.egui_ctx, &self.state.textures) {
            Ok(gpu) => {
                let size = gpu.window.inner_size();
                self.state.resize(size.width, size.height);
                self.gpu = Some(gpu);
            }
            Err(e) => {
                tracing::error!("failed to initialise GPU: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(gpu) = &mut self.gpu {
            let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                self.state.frames.stop();
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                }
                self.state.resize(new_size.width, new_size.height);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                self.state.handle_key(key);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.state.handle_wheel(delta);
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn load_textures(cli: &Cli) -> Result<TextureStore> {
    match &cli.images {
        Some(dir) => TextureStore::load_dir(dir)
            .with_context(|| format!("load images from {}", dir.display())),
        None => Ok(TextureStore::placeholders(cli.count.max(1), 256)),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("reveal-desktop starting");

    let config = match &cli.config {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => SceneConfig::default(),
    };
    let textures = load_textures(&cli)?;
    let state = AppState::new(config, textures)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(state);
    event_loop.run_app(&mut app)?;

    let frames = app.state.scene.shutdown();
    tracing::info!(frames, "reveal-desktop exiting");
    Ok(())
}
