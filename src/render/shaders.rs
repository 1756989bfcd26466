//! WGSL sources for the lighting and marker programs.
//!
//! Each program is `COMMON` followed by its own entry points. Lighting is
//! computed in camera space; light positions arrive already transformed.

use crate::frame::ProgramKind;
use crate::material::ShaderVariant;

const COMMON: &str = r#"
struct Globals {
    projection: mat4x4<f32>,
    view: mat4x4<f32>,
    view_normals: mat4x4<f32>,
    flags: vec4<u32>,
}

struct Light {
    position: vec4<f32>,
    ambient: vec4<f32>,
    diffuse: vec4<f32>,
    specular: vec4<f32>,
}

struct Lights {
    count: u32,
    items: array<Light, 8>,
}

struct Object {
    model_view: mat4x4<f32>,
    normals: mat4x4<f32>,
    ka: vec4<f32>,
    kd: vec4<f32>,
    ks: vec4<f32>,
    color: vec4<f32>,
}

@group(0) @binding(0)
var<uniform> globals: Globals;

@group(0) @binding(1)
var<uniform> lights: Lights;

@group(1) @binding(0)
var<uniform> object: Object;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
}

fn eye_position(input: VertexInput) -> vec4<f32> {
    return object.model_view * vec4<f32>(input.position, 1.0);
}

fn eye_normal(input: VertexInput) -> vec3<f32> {
    return (object.normals * vec4<f32>(input.normal, 0.0)).xyz;
}

fn shade(position: vec3<f32>, normal: vec3<f32>) -> vec3<f32> {
    let n = normalize(normal);
    if (globals.flags.x != 0u) {
        return 0.5 * n + vec3<f32>(0.5);
    }
    let v = normalize(-position);
    var color = vec3<f32>(0.0);
    for (var i = 0u; i < lights.count; i = i + 1u) {
        let light = lights.items[i];
        var l: vec3<f32>;
        if (light.position.w == 0.0) {
            l = normalize(light.position.xyz);
        } else {
            l = normalize(light.position.xyz - position);
        }
        let h = normalize(l + v);
        let lambert = dot(l, n);
        let diffuse = max(lambert, 0.0);
        var specular = pow(max(dot(n, h), 0.0), object.ks.w);
        if (lambert < 0.0) {
            specular = 0.0;
        }
        color += light.ambient.rgb * object.ka.rgb
            + diffuse * light.diffuse.rgb * object.kd.rgb
            + specular * light.specular.rgb * object.ks.rgb;
    }
    return color;
}
"#;

const PHONG: &str = r#"
struct VertexOutput {
    @builtin(position) clip: vec4<f32>,
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
}

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let position = eye_position(input);
    out.clip = globals.projection * position;
    out.position = position.xyz;
    out.normal = eye_normal(input);
    return out;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(shade(input.position, input.normal), 1.0);
}
"#;

const GOURAUD: &str = r#"
struct VertexOutput {
    @builtin(position) clip: vec4<f32>,
    @location(0) color: vec3<f32>,
}

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let position = eye_position(input);
    out.clip = globals.projection * position;
    out.color = shade(position.xyz, eye_normal(input));
    return out;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(input.color, 1.0);
}
"#;

const MARKER: &str = r#"
@vertex
fn vs_main(input: VertexInput) -> @builtin(position) vec4<f32> {
    return globals.projection * eye_position(input);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return object.color;
}
"#;

/// Full WGSL source for a program.
pub fn source(program: ProgramKind) -> String {
    let body = match program {
        ProgramKind::Lit(ShaderVariant::Phong) => PHONG,
        ProgramKind::Lit(ShaderVariant::Gouraud) => GOURAUD,
        ProgramKind::Marker => MARKER,
    };
    format!("{COMMON}{body}")
}
