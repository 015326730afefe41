//! JavaScript-facing API.
//!
//! ```text
//! const viewer = initialize("triangle");
//! viewer.draw_triangle(new Float32Array([0, 1, 0, 1]));
//! ```

use crate::input::{parse_config, resolve_color};
use crate::surface::DocumentHost;
use std::cell::RefCell;
use std::fmt::Display;
use triangle_viewer_core::render::GlBackend;
use triangle_viewer_core::{draw_triangle, Context, Initializer};
use wasm_bindgen::prelude::*;

thread_local! {
    /// Per-surface lifecycle for this page. Contexts themselves are owned
    /// by the `TriangleViewer` handed to JavaScript.
    static INITIALIZER: RefCell<Initializer<DocumentHost>> =
        RefCell::new(Initializer::new(DocumentHost));
}

fn to_js(e: impl Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Entry point, called when the module loads.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
}

/// A ready graphics context bound to one canvas.
#[wasm_bindgen]
pub struct TriangleViewer {
    context: Context<GlBackend>,
}

#[wasm_bindgen]
impl TriangleViewer {
    /// Draws the triangle in `color` (four channels in [0, 1]), or in the
    /// configured initial color when `color` is omitted.
    pub fn draw_triangle(&self, color: Option<Vec<f32>>) -> Result<(), JsValue> {
        let color =
            resolve_color(color.as_deref(), self.context.default_color()).map_err(to_js)?;
        draw_triangle(&self.context, color).map_err(to_js)
    }

    /// The canvas id this viewer draws to.
    #[wasm_bindgen(getter)]
    pub fn surface_id(&self) -> String {
        self.context.surface_id().to_owned()
    }
}

/// Initializes the canvas with element id `canvas_id`.
///
/// `config` is optional `ViewerConfig` JSON. A canvas can be initialized
/// once; later calls fail, as do calls for a canvas whose first
/// initialization failed.
#[wasm_bindgen]
pub fn initialize(canvas_id: &str, config: Option<String>) -> Result<TriangleViewer, JsValue> {
    let config = parse_config(config.as_deref()).map_err(to_js)?;
    INITIALIZER
        .with(|init| init.borrow_mut().initialize_with_config(canvas_id, config))
        .map(|context| TriangleViewer { context })
        .map_err(to_js)
}

/// Lifecycle state of a canvas: `"uninitialized"`, `"ready"` or `"failed"`.
#[wasm_bindgen]
pub fn surface_state(canvas_id: &str) -> String {
    INITIALIZER.with(|init| init.borrow().state(canvas_id).name().to_owned())
}

/// Normalizes a 0-255 form field value to a channel in [0, 1], rounded to
/// two decimals. Non-numeric input gives 0.
#[wasm_bindgen]
pub fn normalize_channel(value: &str) -> f32 {
    triangle_viewer_core::normalize_channel(value)
}
