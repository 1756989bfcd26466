//! Plain-text description of a scene and its planned frame, printed by the
//! headless mode and when the interactive viewer exits.

use std::fmt::Write;

use glam::Vec3;

use crate::frame::FramePlan;
use crate::scene::SceneState;

pub fn describe(scene: &SceneState, plan: &FramePlan) -> String {
    let mut out = String::new();
    let options = &scene.options;
    let _ = writeln!(
        out,
        "Scene: primitive {}, shader {}, wireframe {}, normals {}",
        options.primitive.label(),
        scene.material.shader.label(),
        on_off(options.wireframe),
        on_off(options.normals),
    );
    out.push_str(&describe_camera(scene));
    let _ = writeln!(
        out,
        "Lights: {} of {} active ({} uploaded)",
        scene.active_lights(),
        scene.lights.len(),
        plan.lights.count,
    );
    for (index, light) in scene.lights.iter().enumerate() {
        let _ = writeln!(
            out,
            " - light {}: {} {} {} {}",
            index + 1,
            light.kind.label(),
            if light.directional { "directional" } else { "point" },
            vector(light.position),
            if light.active { "on" } else { "off" },
        );
    }
    let _ = writeln!(out, "Draws: {}", plan.draws.len());
    for draw in &plan.draws {
        let _ = writeln!(
            out,
            " - {} {} {}",
            draw.mesh.label(),
            draw.program.label(),
            draw.topology.label(),
        );
    }
    out
}

pub fn describe_camera(scene: &SceneState) -> String {
    let camera = &scene.camera;
    format!(
        "Camera: eye {} at {} up {} fovy {:.1} aspect {:.3} near {:.2} far {:.2}\n",
        vector(camera.eye),
        vector(camera.at),
        vector(camera.up),
        camera.fovy(),
        camera.aspect(),
        camera.near(),
        camera.far(),
    )
}

fn vector(v: Vec3) -> String {
    format!("({:.2}, {:.2}, {:.2})", v.x, v.y, v.z)
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::plan_frame;

    #[test]
    fn default_scene_summary() {
        let scene = SceneState::default();
        let text = describe(&scene, &plan_frame(&scene));
        assert!(text.starts_with("Scene: primitive sphere, shader phong, wireframe off"));
        assert!(text.contains("Camera: eye (0.00, 0.00, 5.00) at (0.00, 0.00, 0.00)"));
        assert!(text.contains("Lights: 1 of 3 active (1 uploaded)"));
        assert!(text.contains(" - light 3: object directional (1.00, 1.00, 0.00) off"));
        assert!(text.contains("Draws: 3\n - plane phong triangles\n - sphere phong triangles\n - sphere marker triangles"));
    }
}
