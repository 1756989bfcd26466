//! Interactive lighting laboratory.
//!
//! A single animated primitive (or a loaded OBJ model) sits above a ground
//! plane, lit by up to eight configurable lights and viewed through an
//! orbiting camera. Scene state, camera math, light packing and frame
//! planning are plain data and functions so they can be tested without a
//! GPU; the `render` and `app` modules put them on screen through wgpu and
//! winit, natively or in a browser canvas.

pub mod app;
pub mod camera;
pub mod clock;
pub mod frame;
pub mod input;
pub mod lighting;
pub mod material;
pub mod obj;
pub mod orbit;
pub mod panel;
pub mod render;
pub mod scene;
pub mod shapes;
pub mod stack;
pub mod summary;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use app::App;
pub use camera::Camera;
pub use frame::{plan_frame, DrawCall, FramePlan, ProgramKind, Topology};
pub use lighting::{Light, LightKind, LightUniforms, MAX_LIGHTS};
pub use material::{Material, ShaderVariant};
pub use obj::{load_obj, parse_obj, ObjError};
pub use orbit::{Modifiers, OrbitController};
pub use render::{Renderer, ShaderError};
pub use scene::{Options, SceneState};
pub use shapes::{Geometry, MeshId};
pub use stack::MatrixStack;
