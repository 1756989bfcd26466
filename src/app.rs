//! Windowed viewer shared by the native binary and the web entry point.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use glam::Vec2;
use log::{debug, info, warn};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::EventLoopWindowTarget;
use winit::keyboard::PhysicalKey;
use winit::window::Window;

use crate::clock::FrameClock;
use crate::frame::plan_frame;
use crate::input::{apply_shortcut, modifiers_from, shortcut_for, wheel_delta_y, Shortcut};
use crate::orbit::{Modifiers, OrbitController};
use crate::panel;
use crate::render::{Overlay, Renderer};
use crate::scene::SceneState;
use crate::shapes::Geometry;

pub struct App {
    window: Arc<Window>,
    renderer: Renderer,
    overlay: Overlay,
    scene: SceneState,
    orbit: OrbitController,
    modifiers: Modifiers,
    cursor: Vec2,
    clock: FrameClock,
}

impl App {
    pub async fn new(window: Arc<Window>, mut scene: SceneState, model: Option<&Geometry>) -> Result<Self> {
        let renderer = Renderer::new(Arc::clone(&window), model).await?;
        let overlay = Overlay::new(renderer.device(), renderer.format(), &window);
        let size = renderer.size();
        scene.camera.set_viewport(size.width, size.height);
        info!("viewer ready at {}x{}", size.width, size.height);
        Ok(Self {
            window,
            renderer,
            overlay,
            scene,
            orbit: OrbitController::new(),
            modifiers: Modifiers::default(),
            cursor: Vec2::ZERO,
            clock: FrameClock::new(),
        })
    }

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    pub fn handle_event(&mut self, event: &Event<()>, elwt: &EventLoopWindowTarget<()>) -> Result<()> {
        match event {
            Event::WindowEvent { event, window_id } if *window_id == self.window.id() => {
                self.handle_window_event(event, elwt)?;
            }
            Event::AboutToWait => self.window.request_redraw(),
            _ => {}
        }
        Ok(())
    }

    fn handle_window_event(&mut self, event: &WindowEvent, elwt: &EventLoopWindowTarget<()>) -> Result<()> {
        if let WindowEvent::RedrawRequested = event {
            return self.redraw();
        }
        if let WindowEvent::CursorMoved { position, .. } = event {
            self.cursor = Vec2::new(position.x as f32, position.y as f32);
        }

        let consumed = self.overlay.on_window_event(&self.window, event);
        match event {
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::Resized(size) => self.resize(*size),
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers_from(modifiers.state());
            }
            WindowEvent::MouseInput {
                state: ElementState::Released,
                button: MouseButton::Left,
                ..
            } => {
                self.orbit.pointer_up();
                self.scene.dragging = false;
            }
            _ if consumed => {}
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event, elwt),
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } if !self.overlay.wants_pointer_input() => {
                self.orbit.pointer_down(self.cursor);
                self.scene.dragging = true;
            }
            WindowEvent::CursorMoved { .. } => {
                self.orbit.pointer_moved(self.cursor, &mut self.scene.camera);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.orbit
                    .wheel(wheel_delta_y(*delta), self.modifiers, &mut self.scene.camera);
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_key(&mut self, event: &KeyEvent, elwt: &EventLoopWindowTarget<()>) {
        if event.state != ElementState::Pressed || event.repeat || self.overlay.wants_keyboard_input() {
            return;
        }
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        match shortcut_for(code) {
            Some(Shortcut::Quit) => {
                if cfg!(not(target_arch = "wasm32")) {
                    info!("quit requested");
                    elwt.exit();
                }
            }
            Some(shortcut) => {
                debug!("shortcut {shortcut:?}");
                apply_shortcut(shortcut, &mut self.scene);
            }
            None => {}
        }
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.renderer.resize(size);
        self.scene.camera.set_viewport(size.width, size.height);
    }

    fn redraw(&mut self) -> Result<()> {
        self.scene.advance(self.clock.tick());

        let scene = &mut self.scene;
        self.overlay.run(&self.window, |ctx| panel::show(ctx, scene));

        let plan = plan_frame(&self.scene);
        match self.renderer.render(&plan, &mut self.overlay) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.resize(self.window.inner_size());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(anyhow!("GPU is out of memory")),
            Err(err) => warn!("surface error: {err}; retrying next frame"),
        }
        Ok(())
    }
}
