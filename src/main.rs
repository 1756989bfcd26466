use std::any::Any;
use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use log::{error, info};
use thiserror::Error;

use orbit_lab::{frame::plan_frame, obj, summary, Geometry, SceneState, ShaderVariant};

const USAGE: &str =
    "Usage: orbit-lab [--mesh <file.obj>] [--shader phong|gouraud] [--wireframe] [--summary-only]";

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
fn run() -> Result<()> {
    let options = CliOptions::parse_from(env::args().skip(1))?;
    let model = options.mesh.as_ref().and_then(|path| match obj::load_obj(path) {
        Ok(geometry) => {
            info!(
                "loaded {} ({} vertices)",
                path.display(),
                geometry.vertex_count()
            );
            Some(geometry)
        }
        Err(err) => {
            error!("{err:?}; the model slot falls back to a cube");
            None
        }
    });
    let scene = options.scene();

    if options.summary_only {
        return run_headless(&scene, model.as_ref());
    }
    match run_interactive(scene.clone(), model.as_ref()) {
        Ok(()) => Ok(()),
        Err(err) if err.downcast_ref::<WindowInitError>().is_some() => {
            eprintln!(
                "{err}. Falling back to --summary-only mode (set DISPLAY or WAYLAND_DISPLAY to enable rendering)."
            );
            run_headless(&scene, model.as_ref())
        }
        Err(err) => Err(err),
    }
}

fn run_headless(scene: &SceneState, model: Option<&Geometry>) -> Result<()> {
    match model {
        Some(geometry) => println!("Model: {} vertices", geometry.vertex_count()),
        None if scene.model_loaded => println!("Model: cube fallback"),
        None => {}
    }
    print!("{}", summary::describe(scene, &plan_frame(scene)));
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn run_interactive(scene: SceneState, model: Option<&Geometry>) -> Result<()> {
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::Arc;

    use anyhow::Context;
    use orbit_lab::App;
    use pollster::block_on;
    use winit::dpi::LogicalSize;
    use winit::event_loop::{ControlFlow, EventLoop};
    use winit::platform::run_on_demand::EventLoopExtRunOnDemand;
    use winit::window::WindowBuilder;

    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let event_loop = panic::catch_unwind(AssertUnwindSafe(EventLoop::new));
    panic::set_hook(default_hook);
    let mut event_loop = event_loop
        .map_err(|panic| WindowInitError::from_panic("event loop", panic))?
        .map_err(|err| WindowInitError::new("event loop", err))?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("orbit-lab")
            .with_inner_size(LogicalSize::new(1280.0, 720.0))
            .build(&event_loop)
            .map_err(|err| WindowInitError::new("window", err))?,
    );

    let mut app = block_on(App::new(Arc::clone(&window), scene, model))?;
    let mut last_error = None;
    event_loop
        .run_on_demand(|event, elwt| {
            elwt.set_control_flow(ControlFlow::Poll);
            if let Err(err) = app.handle_event(&event, elwt) {
                last_error = Some(err);
                elwt.exit();
            }
        })
        .context("event loop terminated abnormally")?;

    print!("{}", summary::describe_camera(app.scene()));
    match last_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// No display or window could be created; triggers the headless fallback.
#[derive(Debug, Error)]
#[error("failed to initialize {stage}: {message}")]
struct WindowInitError {
    stage: &'static str,
    message: String,
}

impl WindowInitError {
    fn new(stage: &'static str, err: impl std::fmt::Display) -> Self {
        Self {
            stage,
            message: err.to_string(),
        }
    }

    fn from_panic(stage: &'static str, panic: Box<dyn Any + Send>) -> Self {
        Self {
            stage,
            message: panic_message(panic),
        }
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    match panic.downcast::<String>() {
        Ok(msg) => *msg,
        Err(panic) => match panic.downcast::<&'static str>() {
            Ok(msg) => (*msg).to_string(),
            Err(_) => "unknown panic".into(),
        },
    }
}

#[derive(Debug, PartialEq)]
struct CliOptions {
    mesh: Option<PathBuf>,
    shader: ShaderVariant,
    wireframe: bool,
    summary_only: bool,
}

impl CliOptions {
    fn parse_from(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut options = Self {
            mesh: None,
            shader: ShaderVariant::default(),
            wireframe: false,
            summary_only: false,
        };
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--mesh" => {
                    let path = args
                        .next()
                        .ok_or_else(|| anyhow!("--mesh expects a file path\n{USAGE}"))?;
                    options.mesh = Some(PathBuf::from(path));
                }
                "--shader" => {
                    let name = args
                        .next()
                        .ok_or_else(|| anyhow!("--shader expects a name\n{USAGE}"))?;
                    options.shader = ShaderVariant::from_name(&name)
                        .ok_or_else(|| anyhow!("Unknown shader: {name}\n{USAGE}"))?;
                }
                "--wireframe" => options.wireframe = true,
                "--summary-only" => options.summary_only = true,
                other => return Err(anyhow!("Unknown argument: {other}\n{USAGE}")),
            }
        }
        Ok(options)
    }

    /// Default scene with the command-line overrides applied. A requested
    /// model becomes the selected primitive even if loading failed, in which
    /// case it renders as a cube.
    fn scene(&self) -> SceneState {
        let mut scene = SceneState::default();
        scene.material.shader = self.shader;
        scene.options.wireframe = self.wireframe;
        if self.mesh.is_some() {
            scene.model_loaded = true;
            scene.select(orbit_lab::MeshId::Model);
        }
        scene
    }
}
