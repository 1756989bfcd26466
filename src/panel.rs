//! Debug panel drawn with egui.
//!
//! The panel pulls values out of the scene each frame and writes edits back
//! through the same setters the rest of the crate uses, so clamping rules
//! apply no matter where an edit comes from.

use egui::{CollapsingHeader, ComboBox, DragValue, Slider, Ui};
use glam::Vec3;
use log::debug;

use crate::camera::{Camera, MAX_FOVY, MIN_FOVY};
use crate::lighting::{Light, LightKind};
use crate::material::{Material, ShaderVariant, MAX_SHININESS, MIN_SHININESS};
use crate::scene::{SceneState, MAX_AUTHORED_LIGHTS};

/// Range offered by the near and far sliders.
const DEPTH_SLIDER: std::ops::RangeInclusive<f32> = 0.1..=20.0;

pub fn show(ctx: &egui::Context, scene: &mut SceneState) {
    egui::Window::new("debug")
        .default_width(260.0)
        .resizable(false)
        .show(ctx, |ui| {
            CollapsingHeader::new("options")
                .default_open(true)
                .show(ui, |ui| options(ui, scene));
            CollapsingHeader::new("camera").show(ui, |ui| camera(ui, &mut scene.camera));
            CollapsingHeader::new("material").show(ui, |ui| material(ui, &mut scene.material));
            CollapsingHeader::new("lights").show(ui, |ui| lights(ui, scene));
        });
}

fn options(ui: &mut Ui, scene: &mut SceneState) {
    let options = &mut scene.options;
    ui.checkbox(&mut options.wireframe, "wireframe");
    ui.checkbox(&mut options.normals, "normals");
    ui.checkbox(&mut options.animate, "animate");
    ui.checkbox(&mut options.show_lights, "lights");

    let current = scene.options.primitive;
    let choices: Vec<_> = scene.selectable_meshes().collect();
    let mut picked = None;
    ComboBox::from_label("primitive")
        .selected_text(current.label())
        .show_ui(ui, |ui| {
            for id in choices {
                if ui.selectable_label(id == current, id.label()).clicked() {
                    picked = Some(id);
                }
            }
        });
    if let Some(id) = picked {
        if scene.select(id) {
            debug!("primitive set to {}", id.label());
        }
    }
}

fn camera(ui: &mut Ui, camera: &mut Camera) {
    let mut fovy = camera.fovy();
    if ui
        .add(Slider::new(&mut fovy, MIN_FOVY..=MAX_FOVY).text("fovy"))
        .changed()
    {
        camera.set_fovy(fovy);
    }
    ui.label(format!("aspect {:.3}", camera.aspect()));

    let mut near = camera.near();
    if ui.add(Slider::new(&mut near, DEPTH_SLIDER).text("near")).changed() {
        camera.set_near(near);
        debug!("near plane set to {:.2}", camera.near());
    }
    let mut far = camera.far();
    if ui.add(Slider::new(&mut far, DEPTH_SLIDER).text("far")).changed() {
        camera.set_far(far);
        debug!("far plane set to {:.2}", camera.far());
    }

    vector_label(ui, "eye", camera.eye);
    vector_label(ui, "at", camera.at);
    vector_label(ui, "up", camera.up);
}

fn material(ui: &mut Ui, material: &mut Material) {
    ComboBox::from_label("shader")
        .selected_text(material.shader.label())
        .show_ui(ui, |ui| {
            for variant in ShaderVariant::ALL {
                ui.selectable_value(&mut material.shader, variant, variant.label());
            }
        });
    color_row(ui, "Ka", &mut material.ambient);
    color_row(ui, "Kd", &mut material.diffuse);
    color_row(ui, "Ks", &mut material.specular);

    let mut shininess = material.shininess();
    if ui
        .add(
            Slider::new(&mut shininess, MIN_SHININESS..=MAX_SHININESS)
                .logarithmic(true)
                .text("shininess"),
        )
        .changed()
    {
        material.set_shininess(shininess);
    }
}

fn lights(ui: &mut Ui, scene: &mut SceneState) {
    for (index, light) in scene.lights.iter_mut().enumerate() {
        ui.push_id(index, |ui| {
            CollapsingHeader::new(format!("light {}", index + 1)).show(ui, |ui| light_editor(ui, light));
        });
    }
    let can_add = scene.lights.len() < MAX_AUTHORED_LIGHTS;
    if ui.add_enabled(can_add, egui::Button::new("add light")).clicked() && scene.add_light() {
        debug!("added light {}", scene.lights.len());
    }
}

fn light_editor(ui: &mut Ui, light: &mut Light) {
    ui.horizontal(|ui| {
        ui.checkbox(&mut light.active, "active");
        ui.checkbox(&mut light.directional, "directional");
    });
    ComboBox::from_label("space")
        .selected_text(light.kind.label())
        .show_ui(ui, |ui| {
            for kind in LightKind::ALL {
                ui.selectable_value(&mut light.kind, kind, kind.label());
            }
        });
    ui.horizontal(|ui| {
        ui.label(if light.directional { "direction" } else { "position" });
        ui.add(DragValue::new(&mut light.position.x).speed(0.05));
        ui.add(DragValue::new(&mut light.position.y).speed(0.05));
        ui.add(DragValue::new(&mut light.position.z).speed(0.05));
    });
    color_row(ui, "ambient", &mut light.ambient);
    color_row(ui, "diffuse", &mut light.diffuse);
    color_row(ui, "specular", &mut light.specular);
}

fn color_row(ui: &mut Ui, label: &str, color: &mut [u8; 3]) {
    ui.horizontal(|ui| {
        ui.color_edit_button_srgb(color);
        ui.label(label);
    });
}

fn vector_label(ui: &mut Ui, label: &str, value: Vec3) {
    ui.label(format!("{label} ({:.2}, {:.2}, {:.2})", value.x, value.y, value.z));
}
