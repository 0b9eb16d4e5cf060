#![cfg(target_arch = "wasm32")]

//! Browser entry points and the page-level listeners `winit` does not cover.

use std::sync::Arc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use winit::dpi::LogicalSize;
use winit::event_loop::EventLoop;
use winit::platform::web::EventLoopExtWebSys;
use winit::window::Window;

use crate::app::App;
use crate::geometry::PointList;
use crate::settings::Settings;

/// Starts the scene with the built-in snowflake.
#[wasm_bindgen]
pub fn start() -> Result<(), JsValue> {
    init_logging();
    launch(PointList::embedded().map_err(to_js)?)
}

/// Starts the scene with snowflake geometry supplied by the page, either a JSON list of
/// `[x, y, z]` points or `{ "positions": [...] }`.
#[wasm_bindgen(js_name = startWithGeometry)]
pub fn start_with_geometry(json: &str) -> Result<(), JsValue> {
    init_logging();
    launch(PointList::from_json(json).map_err(to_js)?)
}

fn init_logging() {
    console_error_panic_hook::set_once();
    // A second start on the same page finds the logger already installed.
    let _ = console_log::init_with_level(log::Level::Info);
}

fn launch(geometry: PointList) -> Result<(), JsValue> {
    let event_loop = EventLoop::new().map_err(to_js)?;
    event_loop.spawn_app(App::new(Settings::default(), geometry));
    Ok(())
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Keeps the canvas the size of the browser window and suppresses the context menu.
///
/// The listeners live as long as the page.
pub(crate) fn install_listeners(window: Arc<Window>) {
    let Some(browser) = web_sys::window() else {
        log::warn!("No browser window; the canvas keeps its initial size");
        return;
    };
    fit_to_browser(&window, &browser);

    let on_resize = Closure::<dyn FnMut()>::new(move || {
        if let Some(browser) = web_sys::window() {
            fit_to_browser(&window, &browser);
        }
    });
    if let Err(err) =
        browser.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
    {
        log::warn!("Failed to listen for browser resizes: {err:?}");
    }
    on_resize.forget();

    let on_context_menu =
        Closure::<dyn FnMut(web_sys::Event)>::new(|event: web_sys::Event| event.prevent_default());
    if let Err(err) = browser
        .add_event_listener_with_callback("contextmenu", on_context_menu.as_ref().unchecked_ref())
    {
        log::warn!("Failed to suppress the context menu: {err:?}");
    }
    on_context_menu.forget();
}

fn fit_to_browser(window: &Window, browser: &web_sys::Window) {
    let width = browser.inner_width().ok().and_then(|value| value.as_f64());
    let height = browser.inner_height().ok().and_then(|value| value.as_f64());
    if let (Some(width), Some(height)) = (width, height) {
        // The resulting `Resized` event carries the new size to the scene.
        let _ = window.request_inner_size(LogicalSize::new(width, height));
    }
}

pub(crate) fn alert(message: &str) {
    if let Some(browser) = web_sys::window() {
        if browser.alert_with_message(message).is_err() {
            log::error!("Failed to show alert: {message}");
        }
    }
}
