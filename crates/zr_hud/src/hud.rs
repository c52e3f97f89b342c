//! In-game HUD rendered via egui on top of the scene.
//!
//! egui needs a three-phase render split because `egui_wgpu::Renderer::render()`
//! takes a `RenderPass<'static>` while `begin_render_pass` borrows the encoder:
//!
//!   1. `prepare()` -- run UI logic, produce tessellated primitives
//!   2. `upload()`  -- upload textures and update GPU buffers (borrows encoder mutably)
//!   3. `paint()`   -- render into a new render pass with `forget_lifetime()`
//!   4. `cleanup()` -- free textures egui no longer references
//!
//! The score/ammo readout is always drawn. A modal dialog is drawn when the
//! game supplies one, and the debug panel when toggled with F3.

use zr_core::time::TimeState;
use winit::window::Window;

/// Text for a blocking dialog.
#[derive(Debug, Clone, Copy)]
pub struct ModalView<'a> {
    pub title: &'a str,
    pub body: &'a str,
    pub button: &'a str,
}

#[derive(Debug, Clone, Copy)]
pub struct HudView<'a> {
    pub score: u32,
    pub ammo: u32,
    pub modal: Option<ModalView<'a>>,
}

#[derive(Debug, Clone, Default)]
pub struct DebugStats {
    pub zombies: u32,
    pub bullets: u32,
    pub billboards: u32,
    pub spawn_wait: u64,
    pub intensity: f32,
    pub day: bool,
    pub draw_calls: u32,
    pub texture_binds: u32,
    pub lives: u32,
    pub texture_memory_mb: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HudActions {
    /// The modal's button was clicked.
    pub acknowledge: bool,
}

pub struct Hud {
    pub egui_ctx: egui::Context,
    pub egui_winit_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,
    pub debug_visible: bool,
}

impl Hud {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        window: &Window,
    ) -> Self {
        let egui_ctx = egui::Context::default();
        let egui_winit_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);

        Self {
            egui_ctx,
            egui_winit_state,
            egui_renderer,
            debug_visible: false,
        }
    }

    pub fn handle_window_event(
        &mut self,
        window: &Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        let response = self.egui_winit_state.on_window_event(window, event);
        response.consumed
    }

    pub fn toggle_debug(&mut self) {
        self.debug_visible = !self.debug_visible;
        log::info!(
            "Debug panel: {}",
            if self.debug_visible { "ON" } else { "OFF" }
        );
    }

    pub fn prepare(
        &mut self,
        window: &Window,
        view: &HudView<'_>,
        time: &TimeState,
        stats: &DebugStats,
    ) -> (Vec<egui::ClippedPrimitive>, egui::TexturesDelta, HudActions) {
        let raw_input = self.egui_winit_state.take_egui_input(window);
        let debug_visible = self.debug_visible;
        let mut actions = HudActions::default();
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            actions = draw_hud(ctx, view, debug_visible.then_some((time, stats)));
        });

        self.egui_winit_state
            .handle_platform_output(window, full_output.platform_output);

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        (primitives, full_output.textures_delta, actions)
    }

    /// Upload textures and update buffers. Call before creating the egui render pass.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        primitives: &[egui::ClippedPrimitive],
        textures_delta: &egui::TexturesDelta,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, primitives, screen_descriptor);
    }

    /// Render into an existing render pass. Call after `upload()`.
    pub fn paint(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        primitives: &[egui::ClippedPrimitive],
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        self.egui_renderer
            .render(render_pass, primitives, screen_descriptor);
    }

    /// Free textures that egui no longer needs. Call after rendering.
    pub fn cleanup(&mut self, textures_delta: &egui::TexturesDelta) {
        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

/// All HUD widgets for one frame. Split from `Hud` so it can run against a
/// bare `egui::Context` without a window.
fn draw_hud(
    ctx: &egui::Context,
    view: &HudView<'_>,
    debug: Option<(&TimeState, &DebugStats)>,
) -> HudActions {
    let mut actions = HudActions::default();

    egui::Area::new(egui::Id::new("score_ammo"))
        .anchor(egui::Align2::LEFT_TOP, [12.0, 12.0])
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.label(
                    egui::RichText::new(format!("Score: {}", view.score))
                        .size(20.0)
                        .strong(),
                );
                ui.label(egui::RichText::new(format!("Ammo: {}", view.ammo)).size(20.0));
            });
        });

    if let Some(modal) = view.modal {
        egui::Window::new(modal.title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(modal.body);
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button(modal.button).clicked() {
                        actions.acknowledge = true;
                    }
                });
            });
    }

    if let Some((time, stats)) = debug {
        egui::Window::new("Debug")
            .default_pos([10.0, 90.0])
            .show(ctx, |ui| {
                ui.label(format!("FPS: {:.1}", time.smoothed_fps));
                ui.label(format!("Frame time: {:.2} ms", time.smoothed_frame_time_ms));
                ui.label(format!("Steps this frame: {}", time.steps_this_frame));
                ui.label(format!("Total steps: {}", time.fixed_step_count));
                ui.separator();
                ui.label(format!("Zombies: {}", stats.zombies));
                ui.label(format!("Bullets: {}", stats.bullets));
                ui.label(format!("Billboards: {}", stats.billboards));
                ui.label(format!("Spawn every: {} frames", stats.spawn_wait));
                ui.label(format!(
                    "Light: {:.2} ({})",
                    stats.intensity,
                    if stats.day { "day" } else { "night" }
                ));
                ui.label(format!("Life: {}", stats.lives));
                ui.separator();
                ui.label(format!("Draw calls: {}", stats.draw_calls));
                ui.label(format!("Texture binds: {}", stats.texture_binds));
                ui.label(format!("Texture memory: {:.1} MB", stats.texture_memory_mb));
            });
    }

    actions
}
