//! Scroll-driven 3D glyph scene.
//!
//! Five extruded letters fly in from below the viewport and settle into a
//! layout as the page scrolls, shaded with a glass-like multi-light model.
//!
//! Everything outside `wasm` is platform-agnostic and tested on the host. The
//! `wasm` module binds it to a canvas through WebGL2.

pub mod camera;
pub mod config;
pub mod error;
pub mod glyph;
pub mod scene;
pub mod scroll;
pub mod shading;
pub mod stage;

pub use config::DreamConfig;
pub use error::SceneError;
pub use stage::{Backend, Stage, TeardownReport};

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use std::cell::RefCell;

    use wasm_bindgen::prelude::*;

    mod listener;
    mod render;
    mod webgl;

    pub use listener::EventListener;
    pub use render::{mount, Mount};
    pub use webgl::WebGlBackend;

    thread_local! {
        static MOUNTED: RefCell<Option<Mount>> = const { RefCell::new(None) };
    }

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        let config = crate::DreamConfig::default();
        let window = web_sys::window().ok_or_else(|| crate::SceneError::dom("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| crate::SceneError::dom("no document"))?;
        let canvas = document
            .get_element_by_id(&config.renderer.canvas_id)
            .and_then(|el| el.dyn_into::<web_sys::HtmlCanvasElement>().ok());

        if let Some(mount) = render::mount(canvas, config)? {
            MOUNTED.with(|m| {
                if let Some(previous) = m.borrow_mut().replace(mount) {
                    previous.unmount();
                }
            });
        }
        Ok(())
    }

    /// Tear the scene down: remove listeners, stop the loop, free GPU
    /// resources. Does nothing if nothing is mounted.
    #[wasm_bindgen]
    pub fn unmount() {
        if let Some(mount) = MOUNTED.with(|m| m.borrow_mut().take()) {
            let report = mount.unmount();
            log::debug!("{report:?}");
        }
    }
}
