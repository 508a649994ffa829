use anyhow::{Context, Result};
use clap::Parser;
use cubeview_common::{ViewerConfig, Viewport};
use cubeview_input::{Action, PickHit, PointerButton, PointerController};
use cubeview_kernel::{LayerTurn, PuzzleEvent};
use cubeview_mesh::Face;
use cubeview_render::Scene;
use cubeview_render_wgpu::WgpuRenderer;
use egui::Context as EguiContext;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "cubeview-desktop", about = "Interactive 3x3x3 puzzle viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML viewer config (window, camera, controls)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Application state.
struct AppState {
    scene: Scene,
    controller: PointerController,
    title: String,
    shift_held: bool,
    show_panel: bool,
    last_pick: Option<PickHit>,
    moves: Vec<String>,
}

impl AppState {
    fn new(config: &ViewerConfig) -> Result<Self> {
        let scene = Scene::from_config(config).context("invalid camera configuration")?;
        Ok(Self {
            scene,
            controller: PointerController::new(&config.controls),
            title: config.window.title.clone(),
            shift_held: false,
            show_panel: true,
            last_pick: None,
            moves: Vec::new(),
        })
    }

    fn apply(&mut self, action: Action) {
        if let Action::Pick(hit) = &action {
            self.last_pick = Some(*hit);
        }
        if let Err(e) = action.apply(&mut self.scene.puzzle) {
            tracing::warn!(error = %e, ?action, "action rejected");
        }
        for event in self.scene.puzzle.drain_events() {
            match event {
                PuzzleEvent::LayerTurned { turn } => {
                    let name = turn
                        .to_notation()
                        .unwrap_or_else(|| format!("{}{}", turn.layer.axis, turn.layer.depth));
                    self.moves.push(name);
                }
                PuzzleEvent::Reset => self.moves.clear(),
                PuzzleEvent::Orbited { .. } => {}
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        if matches!(key, KeyCode::ShiftLeft | KeyCode::ShiftRight) {
            self.shift_held = pressed;
        }
        if !pressed {
            return;
        }

        let face = match key {
            KeyCode::KeyU => Some(Face::Up),
            KeyCode::KeyD => Some(Face::Down),
            KeyCode::KeyR => Some(Face::Right),
            KeyCode::KeyL => Some(Face::Left),
            KeyCode::KeyF => Some(Face::Front),
            KeyCode::KeyB => Some(Face::Back),
            _ => None,
        };
        if let Some(face) = face {
            let quarters = if self.shift_held { -1 } else { 1 };
            self.apply(Action::TurnLayer(LayerTurn::face_turn(face, quarters)));
            return;
        }

        match key {
            KeyCode::Backspace => self.apply(Action::Reset),
            KeyCode::F1 => self.show_panel = !self.show_panel,
            _ => {}
        }
    }

    fn handle_button(&mut self, button: MouseButton, pressed: bool) {
        let button = match button {
            MouseButton::Left => PointerButton::Primary,
            MouseButton::Right => PointerButton::Secondary,
            _ => return,
        };
        let action = self.controller.on_pointer_button(button, pressed, &self.scene);
        self.apply(action);
    }

    fn handle_cursor(&mut self, x: f32, y: f32) {
        let action = self.controller.on_cursor_moved(x, y, &self.scene);
        self.apply(action);
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.show_panel {
            return;
        }

        egui::SidePanel::left("puzzle_panel")
            .default_width(240.0)
            .show(ctx, |ui| {
                ui.heading(self.title.as_str());
                ui.separator();

                let q = self.scene.puzzle.orientation();
                let cam = self.scene.camera.position();
                ui.label(format!(
                    "Orientation: ({:.2}, {:.2}, {:.2}; {:.2})",
                    q.x, q.y, q.z, q.s
                ));
                ui.label(format!(
                    "Camera: ({:.1}, {:.1}, {:.1})",
                    cam.x, cam.y, cam.z
                ));
                ui.label(format!(
                    "Viewport: {}x{}",
                    self.scene.viewport.width, self.scene.viewport.height
                ));
                match &self.last_pick {
                    Some(hit) => ui.label(format!(
                        "Last pick: cubie {} {:?} at {:.2}",
                        hit.cubie + 1,
                        hit.face,
                        hit.distance
                    )),
                    None => ui.label("Last pick: none"),
                };
                ui.separator();

                ui.heading("Moves");
                for prime in [false, true] {
                    ui.horizontal(|ui| {
                        for face in Face::ALL {
                            let label = if prime {
                                format!("{}'", face.letter())
                            } else {
                                face.letter().to_string()
                            };
                            if ui.button(label).clicked() {
                                let quarters = if prime { -1 } else { 1 };
                                self.apply(Action::TurnLayer(LayerTurn::face_turn(face, quarters)));
                            }
                        }
                    });
                }
                if ui.button("Reset (Backspace)").clicked() {
                    self.apply(Action::Reset);
                }
                ui.label(if self.scene.puzzle.is_home() {
                    "State: solved"
                } else {
                    "State: scrambled"
                });

                ui.separator();
                ui.label(format!("History ({})", self.moves.len()));
                egui::ScrollArea::vertical().max_height(160.0).show(ui, |ui| {
                    ui.label(self.moves.join(" "));
                });

                ui.separator();
                ui.small("LMB: grab face / orbit | RMB: orbit");
                ui.small("U D R L F B: turn (Shift: prime) | F1: panel");
            });
    }
}

struct GpuApp {
    state: AppState,
    initial_size: PhysicalSize<u32>,
    startup_error: Option<anyhow::Error>,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    device: Option<wgpu::Device>,
    queue: Option<wgpu::Queue>,
    config: Option<wgpu::SurfaceConfiguration>,
    renderer: Option<WgpuRenderer>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
}

impl GpuApp {
    fn new(state: AppState, initial_size: PhysicalSize<u32>) -> Self {
        Self {
            state,
            initial_size,
            startup_error: None,
            window: None,
            surface: None,
            device: None,
            queue: None,
            config: None,
            renderer: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
        }
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.state.title.clone())
            .with_inner_size(self.initial_size);
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("failed to create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no suitable GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("cubeview_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("failed to create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        self.state
            .scene
            .resize(Viewport::new(size.width, size.height));

        let renderer = WgpuRenderer::new(
            &device,
            surface_format,
            &self.state.scene.mesh,
            size.width,
            size.height,
        );

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
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

        self.window = Some(window);
        self.surface = Some(surface);
        self.device = Some(device);
        self.queue = Some(queue);
        self.config = Some(config);
        self.renderer = Some(renderer);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);
        Ok(())
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.state
            .scene
            .resize(Viewport::new(new_size.width, new_size.height));
        if let (Some(surface), Some(device), Some(config)) =
            (&self.surface, &self.device, &mut self.config)
        {
            config.width = new_size.width.max(1);
            config.height = new_size.height.max(1);
            surface.configure(device, config);
            if let Some(renderer) = &mut self.renderer {
                renderer.resize(device, config.width, config.height);
            }
        }
    }

    fn redraw(&mut self) {
        let (
            Some(window),
            Some(surface),
            Some(device),
            Some(queue),
            Some(config),
            Some(renderer),
            Some(egui_winit),
            Some(egui_renderer),
        ) = (
            &self.window,
            &self.surface,
            &self.device,
            &self.queue,
            &self.config,
            &self.renderer,
            &mut self.egui_winit,
            &mut self.egui_renderer,
        )
        else {
            return;
        };

        let output = match surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                surface.configure(device, config);
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

        match self.state.scene.frame_matrices() {
            Ok(frame) => renderer.render(device, queue, &view, &frame),
            Err(e) => tracing::debug!(error = %e, "skipping puzzle draw"),
        }

        let raw_input = egui_winit.take_egui_input(window);
        let state = &mut self.state;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            state.draw_ui(ctx);
        });
        egui_winit.handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [config.width, config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            egui_renderer.update_texture(device, queue, *id, image_delta);
        }
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("egui_encoder"),
        });
        egui_renderer.update_buffers(device, queue, &mut encoder, &paint_jobs, &screen_descriptor);
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
            egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            egui_renderer.free_texture(id);
        }

        output.present();
        window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init_gpu(event_loop) {
            tracing::error!("startup failed: {e:#}");
            self.startup_error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(egui_winit), Some(window)) = (&mut self.egui_winit, &self.window) {
            let response = egui_winit.on_window_event(window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                self.resize(new_size);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                self.state
                    .handle_key(key, key_state == ElementState::Pressed);
            }
            WindowEvent::MouseInput {
                button,
                state: btn_state,
                ..
            } => {
                self.state
                    .handle_button(button, btn_state == ElementState::Pressed);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.state
                    .handle_cursor(position.x as f32, position.y as f32);
            }
            WindowEvent::CursorLeft { .. } => {
                self.state.controller.on_cursor_left();
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("cubeview-desktop starting");

    let config = ViewerConfig::load(cli.config.as_deref()).context("failed to load config")?;
    let size = PhysicalSize::new(config.window.width, config.window.height);
    let state = AppState::new(&config)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(state, size);
    event_loop.run_app(&mut app)?;

    match app.startup_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
