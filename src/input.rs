//! Translation of window-system input into scene edits.

use log::debug;
use winit::event::MouseScrollDelta;
use winit::keyboard::{KeyCode, ModifiersState};

use crate::orbit::Modifiers;
use crate::scene::SceneState;
use crate::shapes::MeshId;

/// Browser-style pixels per wheel notch.
const PIXELS_PER_LINE: f32 = 100.0;

/// Keyboard shortcuts mirroring the debug panel toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    ToggleWireframe,
    ToggleNormals,
    ToggleLights,
    ToggleAnimation,
    ToggleShader,
    Select(MeshId),
    Quit,
}

pub fn shortcut_for(key: KeyCode) -> Option<Shortcut> {
    let select = |index: usize| Some(Shortcut::Select(MeshId::SELECTABLE[index]));
    match key {
        KeyCode::KeyW => Some(Shortcut::ToggleWireframe),
        KeyCode::KeyN => Some(Shortcut::ToggleNormals),
        KeyCode::KeyL => Some(Shortcut::ToggleLights),
        KeyCode::Space => Some(Shortcut::ToggleAnimation),
        KeyCode::KeyG => Some(Shortcut::ToggleShader),
        KeyCode::Escape => Some(Shortcut::Quit),
        KeyCode::Digit1 => select(0),
        KeyCode::Digit2 => select(1),
        KeyCode::Digit3 => select(2),
        KeyCode::Digit4 => select(3),
        KeyCode::Digit5 => select(4),
        KeyCode::Digit6 => select(5),
        KeyCode::Digit7 => select(6),
        KeyCode::Digit8 => select(7),
        _ => None,
    }
}

/// Applies a shortcut to the scene. `Quit` is left to the caller.
pub fn apply_shortcut(shortcut: Shortcut, scene: &mut SceneState) {
    let options = &mut scene.options;
    match shortcut {
        Shortcut::ToggleWireframe => options.wireframe = !options.wireframe,
        Shortcut::ToggleNormals => options.normals = !options.normals,
        Shortcut::ToggleLights => options.show_lights = !options.show_lights,
        Shortcut::ToggleAnimation => options.animate = !options.animate,
        Shortcut::ToggleShader => scene.material.shader = scene.material.shader.toggled(),
        Shortcut::Select(id) => {
            if !scene.select(id) {
                debug!("no model loaded; ignoring selection of {}", id.label());
            }
        }
        Shortcut::Quit => {}
    }
}

/// Converts a winit wheel delta into browser-style `deltaY`.
pub fn wheel_delta_y(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, lines) => -lines * PIXELS_PER_LINE,
        MouseScrollDelta::PixelDelta(position) => -position.y as f32,
    }
}

pub fn modifiers_from(state: ModifiersState) -> Modifiers {
    Modifiers {
        ctrl: state.control_key(),
        alt: state.alt_key(),
        meta: state.super_key(),
    }
}

#[cfg(test)]
mod tests {
    use winit::dpi::PhysicalPosition;

    use super::*;
    use crate::material::ShaderVariant;

    #[test]
    fn wheel_deltas_follow_browser_convention() {
        assert_eq!(wheel_delta_y(MouseScrollDelta::LineDelta(0.0, 1.0)), -100.0);
        assert_eq!(wheel_delta_y(MouseScrollDelta::LineDelta(0.0, -2.0)), 200.0);
        let pixels = MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -35.0));
        assert_eq!(wheel_delta_y(pixels), 35.0);
    }

    #[test]
    fn modifiers_are_mapped() {
        let modifiers = modifiers_from(ModifiersState::CONTROL | ModifiersState::SUPER);
        assert!(modifiers.ctrl && modifiers.meta && !modifiers.alt);
    }

    #[test]
    fn digits_select_primitives() {
        assert_eq!(
            shortcut_for(KeyCode::Digit2),
            Some(Shortcut::Select(MeshId::Sphere))
        );
        assert_eq!(shortcut_for(KeyCode::KeyQ), None);
    }

    #[test]
    fn shortcuts_toggle_scene_options() {
        let mut scene = SceneState::default();
        apply_shortcut(Shortcut::ToggleWireframe, &mut scene);
        apply_shortcut(Shortcut::ToggleShader, &mut scene);
        apply_shortcut(Shortcut::Select(MeshId::Torus), &mut scene);
        apply_shortcut(Shortcut::Select(MeshId::Model), &mut scene);
        assert!(scene.options.wireframe);
        assert_eq!(scene.material.shader, ShaderVariant::Gouraud);
        assert_eq!(scene.options.primitive, MeshId::Torus);
    }
}
