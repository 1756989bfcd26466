//! egui integration for the debug panel.
//!
//! The overlay is drawn on top of the scene in the same render pass. Input
//! is offered to egui first; events it consumes never reach the camera.

use egui::ViewportId;
use egui_wgpu::ScreenDescriptor;
use winit::event::WindowEvent;
use winit::window::Window;

use super::DepthBuffer;

pub struct Overlay {
    ctx: egui::Context,
    winit_state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
    paint_jobs: Vec<egui::ClippedPrimitive>,
    textures_delta: egui::TexturesDelta,
    pixels_per_point: f32,
}

impl Overlay {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, window: &Window) -> Self {
        let ctx = egui::Context::default();
        let winit_state = egui_winit::State::new(
            ctx.clone(),
            ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            Some(device.limits().max_texture_dimension_2d as usize),
        );
        let renderer = egui_wgpu::Renderer::new(device, format, Some(DepthBuffer::FORMAT), 1);
        Self {
            ctx,
            winit_state,
            renderer,
            paint_jobs: Vec::new(),
            textures_delta: egui::TexturesDelta::default(),
            pixels_per_point: window.scale_factor() as f32,
        }
    }

    /// Returns `true` when egui consumed the event.
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.winit_state.on_window_event(window, event).consumed
    }

    pub fn wants_pointer_input(&self) -> bool {
        self.ctx.wants_pointer_input()
    }

    pub fn wants_keyboard_input(&self) -> bool {
        self.ctx.wants_keyboard_input()
    }

    /// Runs one UI pass and tessellates its output for the next paint.
    pub fn run(&mut self, window: &Window, mut ui: impl FnMut(&egui::Context)) {
        let raw_input = self.winit_state.take_egui_input(window);
        self.ctx.begin_frame(raw_input);
        ui(&self.ctx);
        let output = self.ctx.end_frame();

        self.winit_state
            .handle_platform_output(window, output.platform_output);
        self.pixels_per_point = output.pixels_per_point;
        self.paint_jobs = self.ctx.tessellate(output.shapes, output.pixels_per_point);
        self.textures_delta.append(output.textures_delta);
    }

    pub(crate) fn screen(&self, width: u32, height: u32) -> ScreenDescriptor {
        ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: self.pixels_per_point,
        }
    }

    /// Uploads textures and vertex data. The returned command buffers must be
    /// submitted before the encoder that draws the overlay.
    pub(crate) fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        screen: &ScreenDescriptor,
    ) -> Vec<wgpu::CommandBuffer> {
        for (id, delta) in &self.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, delta);
        }
        self.textures_delta.set.clear();
        self.renderer
            .update_buffers(device, queue, encoder, &self.paint_jobs, screen)
    }

    pub(crate) fn draw<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>, screen: &ScreenDescriptor) {
        self.renderer.render(pass, &self.paint_jobs, screen);
    }

    /// Releases textures egui no longer needs. Call after submission.
    pub(crate) fn finish(&mut self) {
        for id in self.textures_delta.free.drain(..) {
            self.renderer.free_texture(&id);
        }
    }
}
