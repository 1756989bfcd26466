#![cfg(target_arch = "wasm32")]

use std::sync::Arc;

use log::{error, info};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use winit::dpi::LogicalSize;
use winit::event_loop::{ControlFlow, EventLoop};
use winit::platform::web::{EventLoopExtWebSys, WindowBuilderExtWebSys};
use winit::window::WindowBuilder;

use crate::app::App;
use crate::scene::SceneState;

/// Attaches the viewer to the canvas with id `canvas_id` and starts the
/// render loop. Returns once the first frame has been scheduled.
#[wasm_bindgen]
pub async fn run(canvas_id: String) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&JsValue::from_str(&format!("logger already set: {err}")));
    }

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("missing document"))?;
    let element = document
        .get_element_by_id(&canvas_id)
        .ok_or_else(|| JsValue::from_str("canvas element not found"))?;
    let canvas: web_sys::HtmlCanvasElement = element
        .dyn_into()
        .map_err(|_| JsValue::from_str("element is not a canvas"))?;

    let event_loop = EventLoop::new()
        .map_err(|err| JsValue::from_str(&format!("failed to create event loop: {err}")))?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_canvas(Some(canvas))
            .with_title("orbit-lab")
            .with_inner_size(LogicalSize::new(1280.0, 720.0))
            .build(&event_loop)
            .map_err(|err| JsValue::from_str(&format!("window error: {err}")))?,
    );

    let mut app = App::new(Arc::clone(&window), SceneState::default(), None)
        .await
        .map_err(|err| JsValue::from_str(&format!("renderer error: {err:?}")))?;
    info!("attached to canvas #{canvas_id}");

    event_loop.spawn(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);
        if let Err(err) = app.handle_event(&event, elwt) {
            error!("{err:?}");
            elwt.exit();
        }
    });

    Ok(())
}
