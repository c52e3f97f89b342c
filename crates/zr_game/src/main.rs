//! Zombie Rampage -- main loop and application entry point.
//!
//! Architecture: winit drives the event loop via `ApplicationHandler`. All simulation
//! runs inside `RedrawRequested` using a **fixed-timestep** model (see `TimeState`):
//!
//!   1. `begin_frame()` -- measure wall-clock delta, feed accumulator
//!   2. Application toggles (pause, acknowledge, debug panel) read key edges once
//!   3. `while should_step()` -- one `Game::step` per 1/60 s slice, unless a modal is open
//!   4. Rebuild the billboard mesh from the world
//!   5. Draw horizon, billboards and gun in one pass, then composite the egui HUD
//!
//! Hot reload: the tuning JSON is watched via mtime polling and applied at frame
//! boundaries (between fixed steps).

mod collision;
mod config;
mod controller;
mod generators;
mod mesh;
mod modal;
#[cfg(test)]
mod replay;
mod sim;
mod sprites;
mod world;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use config::{load_config_from_path, load_config_or_default, FileWatcher};
use controller::ControllerInput;
use mesh::{
    build_billboard_mesh, count_texture_binds, gun_sprite, gun_vertices, horizon_vertices,
    DrawCall, GUN_INDICES, HORIZON_VERTEX_COUNT,
};
use modal::ModalState;
use sim::{Game, StepOutcome};
use sprites::{read_sprite_sources, SpriteClass, TEXTURE_DIR};
use zr_core::input::{InputState, Key};
use zr_core::time::TimeState;
use zr_hud::{DebugStats, Hud, HudView, ModalView};
use zr_platform::window::PlatformConfig;
use zr_render::{
    BillboardPipeline, BillboardVertex, GpuContext, HorizonPipeline, PerspectiveCamera, Texture,
};

const CONFIG_PATH: &str = "assets/config/tuning.json";

struct GpuSpriteTexture {
    texture: Texture,
    bind_group: wgpu::BindGroup,
}

/// All mutable engine state lives here. Constructed lazily in `ApplicationHandler::resumed`
/// once the window and GPU surface are available.
///
/// Ownership is split into three conceptual groups:
///  - **Core systems** (time, input, camera, HUD) -- updated every frame
///  - **Game** (simulation, modal flow, tuning file) -- stepped at the fixed rate
///  - **GPU resources** (textures, buffers, draw calls) -- textures load once, mesh rebuilt per frame
struct EngineState {
    window: Arc<Window>,
    gpu: GpuContext,
    time: TimeState,
    input: InputState,
    camera: PerspectiveCamera,
    billboard_pipeline: BillboardPipeline,
    horizon_pipeline: HorizonPipeline,
    hud: Hud,

    // --- Game -------------------------------------------------------------------
    game: Game,
    modals: ModalState,
    config_path: PathBuf,
    config_watcher: FileWatcher,

    /// Indexed by `SpriteClass::index()`.
    textures: Vec<GpuSpriteTexture>,

    // --- Per-frame GPU mesh state -----------------------------------------------
    // The billboard mesh is rebuilt on the CPU each frame, then streamed into these
    // GPU buffers. Buffers grow (power-of-two) but never shrink.
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    horizon_buffer: wgpu::Buffer,
    gun_vertex_buffer: wgpu::Buffer,
    gun_index_buffer: wgpu::Buffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    mesh_vertex_capacity: usize,
    mesh_index_capacity: usize,
    mesh_dirty: bool,
    draw_calls: Vec<DrawCall>,
    billboard_count: usize,
}

impl EngineState {
    fn new(window: Arc<Window>) -> Self {
        let gpu = GpuContext::new(window.clone());
        let time = TimeState::new();
        let input = InputState::new();
        let billboard_pipeline = BillboardPipeline::new(&gpu.device, gpu.surface_format);
        let horizon_pipeline = HorizonPipeline::new(&gpu.device, gpu.surface_format);
        let hud = Hud::new(&gpu.device, gpu.surface_format, &window);

        let config_path = PathBuf::from(CONFIG_PATH);
        let config_watcher = FileWatcher::new(config_path.clone());
        let config = load_config_or_default(&config_path).unwrap_or_else(|err| {
            panic!(
                "Failed to load tuning config '{}': {}",
                config_path.display(),
                err
            );
        });
        log::info!("Tuning loaded (seed: {:?})", config.seed);

        let textures = load_sprite_textures(
            &gpu.device,
            &gpu.queue,
            &billboard_pipeline,
            Path::new(TEXTURE_DIR),
        )
        .unwrap_or_else(|err| {
            log::error!("{err}");
            panic!("Sprite textures failed to load: {}", err);
        });

        let camera = PerspectiveCamera::new(config.fov_degrees, gpu.size.0, gpu.size.1);
        let game = Game::new(config);

        let camera_uniform = camera.build_uniform();
        let camera_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform Buffer"),
                contents: bytemuck::cast_slice(&[camera_uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group =
            billboard_pipeline.create_camera_bind_group(&gpu.device, &camera_buffer);
        let vertex_buffer = create_vertex_buffer(&gpu.device, 1);
        let index_buffer = create_index_buffer(&gpu.device, 1);
        let horizon_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Horizon Vertex Buffer"),
                contents: bytemuck::cast_slice(&horizon_vertices(game.intensity)),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            });
        let gun_vertex_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Gun Vertex Buffer"),
                contents: bytemuck::cast_slice(&gun_vertices()),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let gun_index_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Gun Index Buffer"),
                contents: bytemuck::cast_slice(&GUN_INDICES),
                usage: wgpu::BufferUsages::INDEX,
            });

        let mut state = Self {
            window,
            gpu,
            time,
            input,
            camera,
            billboard_pipeline,
            horizon_pipeline,
            hud,
            game,
            modals: ModalState::new(),
            config_path,
            config_watcher,
            textures,
            vertex_buffer,
            index_buffer,
            horizon_buffer,
            gun_vertex_buffer,
            gun_index_buffer,
            camera_buffer,
            camera_bind_group,
            mesh_vertex_capacity: 0,
            mesh_index_capacity: 0,
            mesh_dirty: true,
            draw_calls: Vec::new(),
            billboard_count: 0,
        };

        state.ensure_mesh_capacity(4, 6);
        state.rebuild_billboard_mesh();
        state
    }

    fn reload_config(&mut self, reason: &str) {
        match load_config_from_path(&self.config_path) {
            Ok(config) => {
                log::info!(
                    "Reloaded tuning '{}' ({})",
                    self.config_path.display(),
                    reason
                );
                self.camera.fov_degrees = config.fov_degrees;
                self.game.apply_config(config);
            }
            Err(err) => {
                log::error!("Tuning reload failed, keeping previous values: {}", err);
            }
        }
    }

    /// Any modal opening or closing drops held keys and banked time, so nothing
    /// carries across the dialog.
    fn on_modal_transition(&mut self) {
        self.input.release_all();
        self.time.discard_backlog();
    }

    fn handle_app_keys(&mut self, event_loop: &ActiveEventLoop) {
        if self.input.is_just_pressed(Key::Escape) {
            event_loop.exit();
            return;
        }
        if self.input.is_just_pressed(Key::F3) {
            self.hud.toggle_debug();
        }
        if self.input.is_just_pressed(Key::P) && self.modals.toggle_pause(self.game.score) {
            self.on_modal_transition();
        } else if self.input.is_just_pressed(Key::Enter) && self.modals.acknowledge() {
            self.on_modal_transition();
        }
    }

    fn run_fixed_steps(&mut self) {
        while self.time.should_step() {
            if self.modals.is_open() {
                continue;
            }
            if self.config_watcher.should_reload() {
                self.reload_config("file watcher");
            }

            let intent = ControllerInput::from_input(&self.input);
            if let StepOutcome::PlayerDied { final_score } = self.game.step(&intent) {
                self.modals.player_died(final_score);
                self.on_modal_transition();
                self.mesh_dirty = true;
                break;
            }
        }
    }

    fn rebuild_billboard_mesh(&mut self) {
        let mesh = build_billboard_mesh(&self.game.world);
        self.ensure_mesh_capacity(mesh.vertices.len(), mesh.indices.len());
        self.billboard_count = mesh.quad_count();
        self.draw_calls = mesh.draw_calls;
        self.mesh_dirty = false;

        if !mesh.vertices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&mesh.vertices));
        }
        if !mesh.indices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&mesh.indices));
        }
    }

    fn ensure_mesh_capacity(&mut self, vertex_count: usize, index_count: usize) {
        let needed_vertices = vertex_count.max(1);
        if needed_vertices > self.mesh_vertex_capacity {
            self.mesh_vertex_capacity = needed_vertices.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.gpu.device, self.mesh_vertex_capacity);
        }

        let needed_indices = index_count.max(1);
        if needed_indices > self.mesh_index_capacity {
            self.mesh_index_capacity = needed_indices.next_power_of_two();
            self.index_buffer = create_index_buffer(&self.gpu.device, self.mesh_index_capacity);
        }
    }

    fn estimate_texture_memory_mb(&self) -> f32 {
        // Width * height * 4 bytes per pixel, no mips.
        let bytes: u64 = self
            .textures
            .iter()
            .map(|tex| tex.texture.size.0 as u64 * tex.texture.size.1 as u64 * 4)
            .sum();
        bytes as f32 / (1024.0 * 1024.0)
    }

    fn debug_stats(&self) -> DebugStats {
        DebugStats {
            zombies: self.game.world.zombies.len() as u32,
            bullets: self.game.world.bullets.len() as u32,
            billboards: self.billboard_count as u32,
            spawn_wait: self.game.spawn_wait,
            intensity: self.game.intensity,
            day: self.game.day,
            draw_calls: self.draw_calls.len() as u32 + 2,
            texture_binds: count_texture_binds(&self.draw_calls) as u32 + 1,
            lives: self.game.lives,
            texture_memory_mb: self.estimate_texture_memory_mb(),
        }
    }

    fn render(&mut self) {
        // Render phase reads finalized simulation state from this frame.
        let camera_uniform = self.camera.build_uniform();
        self.gpu
            .queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[camera_uniform]));
        self.gpu.queue.write_buffer(
            &self.horizon_buffer,
            0,
            bytemuck::cast_slice(&horizon_vertices(self.game.intensity)),
        );
        let gun = gun_sprite(self.game.take_muzzle_flash());

        let Some((output, view)) = self.gpu.begin_frame() else {
            return;
        };

        let stats = self.debug_stats();
        let modal = self.modals.current();
        let modal_body = modal.map(|m| m.body());
        let hud_view = HudView {
            score: self.game.score,
            ammo: self.game.ammo,
            modal: modal.zip(modal_body.as_deref()).map(|(m, body)| ModalView {
                title: m.title(),
                body,
                button: m.button_label(),
            }),
        };
        let (egui_primitives, egui_textures_delta, hud_actions) =
            self.hud
                .prepare(&self.window, &hud_view, &self.time, &stats);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.gpu.size.0, self.gpu.size.1],
            pixels_per_point: self.window.scale_factor() as f32,
        };

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.gpu.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            render_pass.set_pipeline(&self.horizon_pipeline.render_pipeline);
            render_pass.set_vertex_buffer(0, self.horizon_buffer.slice(..));
            render_pass.draw(0..HORIZON_VERTEX_COUNT as u32, 0..1);

            render_pass.set_pipeline(&self.billboard_pipeline.world_pipeline);
            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

            let mut last_bound: Option<SpriteClass> = None;
            for draw in &self.draw_calls {
                if last_bound != Some(draw.sprite) {
                    let texture = &self.textures[draw.sprite.index()];
                    render_pass.set_bind_group(1, &texture.bind_group, &[]);
                    last_bound = Some(draw.sprite);
                }
                render_pass.draw_indexed(
                    draw.index_start..(draw.index_start + draw.index_count),
                    0,
                    0..1,
                );
            }

            render_pass.set_pipeline(&self.billboard_pipeline.overlay_pipeline);
            render_pass.set_bind_group(1, &self.textures[gun.index()].bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.gun_vertex_buffer.slice(..));
            render_pass
                .set_index_buffer(self.gun_index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..GUN_INDICES.len() as u32, 0, 0..1);
        }

        self.hud.upload(
            &self.gpu.device,
            &self.gpu.queue,
            &mut encoder,
            &egui_primitives,
            &egui_textures_delta,
            &screen_descriptor,
        );

        {
            let mut egui_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui Render Pass"),
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

            self.hud
                .paint(&mut egui_pass, &egui_primitives, &screen_descriptor);
        }

        self.hud.cleanup(&egui_textures_delta);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        if hud_actions.acknowledge && self.modals.acknowledge() {
            self.on_modal_transition();
        }
    }
}

struct App {
    config: PlatformConfig,
    state: Option<EngineState>,
}

impl App {
    fn new() -> Self {
        Self {
            config: PlatformConfig::default(),
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window = zr_platform::window::create_window(event_loop, &self.config);
        log::info!(
            "Window created: {}x{}",
            self.config.width,
            self.config.height
        );
        self.state = Some(EngineState::new(window));
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        let egui_consumed = state.hud.handle_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    state.gpu.resize(w, h);
                    state.camera.viewport = (w, h);
                    log::info!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::Focused(false) => {
                // Key-up events go to whichever window has focus now.
                state.input.release_all();
            }

            WindowEvent::KeyboardInput { event, .. } if !egui_consumed => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(game_key) = map_key(key_code) {
                        match event.state {
                            ElementState::Pressed => state.input.key_down(game_key),
                            ElementState::Released => state.input.key_up(game_key),
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if state.gpu.size.0 == 0 || state.gpu.size.1 == 0 {
                    return;
                }

                state.time.begin_frame();
                state.handle_app_keys(event_loop);
                state.run_fixed_steps();

                if state.mesh_dirty || state.time.steps_this_frame > 0 {
                    state.rebuild_billboard_mesh();
                }

                state.render();

                // Edges were read by the application toggles above; the
                // simulation only looks at held keys.
                state.input.end_frame();
            }

            _ => {}
        }
    }
}

fn load_sprite_textures(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    pipeline: &BillboardPipeline,
    dir: &Path,
) -> Result<Vec<GpuSpriteTexture>, String> {
    let sources = read_sprite_sources(dir)?;
    let mut textures = Vec::with_capacity(sources.len());
    for source in sources {
        let label = source.path.display().to_string();
        let texture = Texture::from_bytes(device, queue, &source.bytes, &label)?;
        log::info!(
            "Loaded sprite '{}' ({}x{})",
            source.class.asset_name(),
            texture.size.0,
            texture.size.1
        );
        let bind_group = pipeline.create_texture_bind_group(device, &texture);
        textures.push(GpuSpriteTexture {
            texture,
            bind_group,
        });
    }
    Ok(textures)
}

fn create_vertex_buffer(device: &wgpu::Device, vertex_capacity: usize) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<BillboardVertex>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Billboard Vertex Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, index_capacity: usize) -> wgpu::Buffer {
    let byte_len = (index_capacity * std::mem::size_of::<u32>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Billboard Index Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::ArrowDown => Some(Key::Down),
        KeyCode::KeyW => Some(Key::W),
        KeyCode::KeyA => Some(Key::A),
        KeyCode::KeyS => Some(Key::S),
        KeyCode::KeyD => Some(Key::D),
        KeyCode::KeyQ => Some(Key::Q),
        KeyCode::KeyE => Some(Key::E),
        KeyCode::KeyN => Some(Key::N),
        KeyCode::KeyM => Some(Key::M),
        KeyCode::Space => Some(Key::Space),
        KeyCode::KeyP => Some(Key::P),
        KeyCode::Enter | KeyCode::NumpadEnter => Some(Key::Enter),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::F3 => Some(Key::F3),
        _ => None,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Zombie Rampage starting...");

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app).expect("Event loop error");
}
