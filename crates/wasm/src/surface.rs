//! Surface lookup in the browser document.

use triangle_viewer_core::render::{GlBackend, SurfaceWatch};
use triangle_viewer_core::{InitError, SurfaceHost};
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, WebGl2RenderingContext};

/// Reads the canvas size and the context-lost flag straight from the page.
struct CanvasWatch {
    canvas: HtmlCanvasElement,
    webgl2: WebGl2RenderingContext,
}

impl SurfaceWatch for CanvasWatch {
    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn is_lost(&self) -> bool {
        self.webgl2.is_context_lost()
    }
}

/// Resolves surface identifiers to `<canvas>` elements by element id and
/// binds a WebGL2 context to them.
pub struct DocumentHost;

impl SurfaceHost for DocumentHost {
    type Backend = GlBackend;

    fn create_backend(&self, surface_id: &str) -> Result<GlBackend, InitError> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| InitError::ContextCreationError("no document available".into()))?;

        let element = document
            .get_element_by_id(surface_id)
            .ok_or_else(|| InitError::SurfaceNotFound(surface_id.to_owned()))?;

        let canvas: HtmlCanvasElement = element.dyn_into().map_err(|_| {
            log::warn!("element '{surface_id}' is not a canvas");
            InitError::SurfaceNotFound(surface_id.to_owned())
        })?;

        let context = canvas
            .get_context("webgl2")
            .map_err(|e| InitError::ContextCreationError(format!("{e:?}")))?
            .ok_or_else(|| InitError::ContextCreationError("WebGL2 is not supported".into()))?;

        let webgl2: WebGl2RenderingContext = context.dyn_into().map_err(|_| {
            InitError::ContextCreationError("context is not a WebGL2 rendering context".into())
        })?;

        let gl = glow::Context::from_webgl2_context(webgl2.clone());
        let (width, height) = (canvas.width(), canvas.height());
        Ok(GlBackend::new(gl, width, height).with_watch(CanvasWatch { canvas, webgl2 }))
    }
}
