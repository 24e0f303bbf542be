use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{window, EventTarget, HtmlCanvasElement, WebGl2RenderingContext as GL, Window};

use super::listener::EventListener;
use super::webgl::WebGlBackend;
use crate::config::DreamConfig;
use crate::error::SceneError;
use crate::scroll::scroll_fraction;
use crate::stage::{Stage, TeardownReport};

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Window size in CSS pixels and the pixel ratio used for the backing store.
struct Viewport {
    width: f64,
    height: f64,
    pixel_ratio: f64,
}

impl Viewport {
    fn read(window: &Window, max_pixel_ratio: f64) -> Self {
        let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        Self {
            width: dim(window.inner_width()),
            height: dim(window.inner_height()),
            pixel_ratio: window.device_pixel_ratio().min(max_pixel_ratio),
        }
    }

    fn device_size(&self) -> (u32, u32) {
        (
            (self.width * self.pixel_ratio).round() as u32,
            (self.height * self.pixel_ratio).round() as u32,
        )
    }
}

/// `scrollY / (scrollHeight - innerHeight)` of the hosting document.
fn document_scroll(window: &Window) -> f32 {
    let scroll_y = window.scroll_y().unwrap_or(0.0);
    let viewport_height = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    let scroll_height = window
        .document()
        .and_then(|d| d.document_element())
        .map(|el| el.scroll_height() as f64)
        .unwrap_or(0.0);
    scroll_fraction(scroll_y, scroll_height, viewport_height)
}

fn schedule(window: &Window, frame: &FrameCallback) -> Result<Option<i32>, JsValue> {
    match frame.borrow().as_ref() {
        Some(cb) => window
            .request_animation_frame(cb.as_ref().unchecked_ref())
            .map(Some),
        None => Ok(None),
    }
}

/// The frame closure holds a handle to itself. If the loop never starts,
/// dropping it here is what lets the stage inside be disposed.
fn release_on_error<T>(frame: &FrameCallback, result: Result<T, JsValue>) -> Result<T, JsValue> {
    if result.is_err() {
        frame.borrow_mut().take();
    }
    result
}

/// A live scene on a canvas. Dropping it tears the scene down.
pub struct Mount {
    window: Window,
    running: Rc<Cell<bool>>,
    stage: Rc<RefCell<Option<Stage<WebGlBackend>>>>,
    listeners: Vec<EventListener>,
    frame: FrameCallback,
    pending_frame: Rc<Cell<Option<i32>>>,
}

/// Build the scene on `canvas`, register the scroll and resize listeners and
/// start the frame loop.
///
/// A missing canvas is not an error: nothing is built and `Ok(None)` is
/// returned.
pub fn mount(canvas: Option<HtmlCanvasElement>, config: DreamConfig) -> Result<Option<Mount>, JsValue> {
    let Some(canvas) = canvas else {
        log::warn!(
            "canvas #{} is not mounted, scene disabled",
            config.renderer.canvas_id
        );
        return Ok(None);
    };

    let window = window().ok_or_else(|| SceneError::dom("no window"))?;
    let performance = window
        .performance()
        .ok_or_else(|| SceneError::dom("no performance clock"))?;
    let gl: GL = canvas
        .get_context("webgl2")?
        .ok_or_else(|| SceneError::context("WebGL2 not supported"))?
        .dyn_into()?;

    let max_pixel_ratio = config.renderer.max_pixel_ratio;
    let (width, height) = Viewport::read(&window, max_pixel_ratio).device_size();
    canvas.set_width(width);
    canvas.set_height(height);

    let initial_scroll = document_scroll(&window);
    let backend = WebGlBackend::new(gl, config.renderer.clear_color);
    let mut rng = fastrand::Rng::new();
    let stage = Stage::new(config, backend, &mut rng, width, height, initial_scroll)?;
    let stage = Rc::new(RefCell::new(Some(stage)));

    // Listeners only write these cells; the frame callback is the sole reader.
    let scroll_target = Rc::new(Cell::new(initial_scroll));
    let pending_resize: Rc<Cell<Option<(u32, u32)>>> = Rc::new(Cell::new(None));

    let target: &EventTarget = window.as_ref();
    let scroll_listener = {
        let window = window.clone();
        let scroll_target = scroll_target.clone();
        EventListener::new(target, "scroll", true, move || {
            scroll_target.set(document_scroll(&window));
        })?
    };

    let resize_listener = {
        let window = window.clone();
        let scroll_target = scroll_target.clone();
        let pending_resize = pending_resize.clone();
        EventListener::new(target, "resize", false, move || {
            pending_resize.set(Some(Viewport::read(&window, max_pixel_ratio).device_size()));
            scroll_target.set(document_scroll(&window));
        })?
    };

    // Animation loop
    // `frame` holds the animation-frame closure so that it can keep calling
    // `request_animation_frame` on itself. The loop stops as soon as
    // `running` is cleared, and `Mount::teardown` releases the closure.
    let running = Rc::new(Cell::new(true));
    let pending_frame: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
    let frame: FrameCallback = Rc::new(RefCell::new(None));
    let start = performance.now();

    *frame.borrow_mut() = Some({
        let window = window.clone();
        let handle = frame.clone();
        let running = running.clone();
        let stage = stage.clone();
        let pending_frame = pending_frame.clone();

        Closure::wrap(Box::new(move || {
            pending_frame.set(None);
            if !running.get() {
                return;
            }
            let elapsed = ((performance.now() - start) / 1000.0) as f32;

            {
                let mut guard = stage.borrow_mut();
                let Some(stage) = guard.as_mut() else {
                    return;
                };
                if let Some((w, h)) = pending_resize.take() {
                    canvas.set_width(w);
                    canvas.set_height(h);
                    stage.resize(w, h);
                }
                stage.set_scroll_target(scroll_target.get());
                if stage.frame(elapsed).is_none() {
                    return;
                }
            }

            // schedule next
            match schedule(&window, &handle) {
                Ok(id) => pending_frame.set(id),
                Err(e) => log::error!("request_animation_frame failed: {:?}", e),
            }
        }) as Box<dyn FnMut()>)
    });

    let first = schedule(&window, &frame);
    pending_frame.set(release_on_error(&frame, first)?);

    Ok(Some(Mount {
        window,
        running,
        stage,
        listeners: vec![scroll_listener, resize_listener],
        frame,
        pending_frame,
    }))
}

impl Mount {
    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Kinds of the listeners currently registered.
    pub fn listeners(&self) -> Vec<&'static str> {
        self.listeners.iter().map(EventListener::kind).collect()
    }

    /// Seconds on the scene clock as of the last drawn frame.
    pub fn elapsed(&self) -> Option<f32> {
        self.stage.borrow().as_ref().map(Stage::elapsed)
    }

    /// Remove listeners, stop the loop and dispose every GPU resource.
    pub fn unmount(mut self) -> TeardownReport {
        self.teardown()
    }

    fn teardown(&mut self) -> TeardownReport {
        self.running.set(false);
        if let Some(id) = self.pending_frame.take() {
            if let Err(e) = self.window.cancel_animation_frame(id) {
                log::error!("cancel_animation_frame failed: {:?}", e);
            }
        }

        let listeners_removed = self
            .listeners
            .drain(..)
            .map(|listener| {
                let kind = listener.kind();
                listener
                    .remove()
                    .map_err(|e| log::error!("failed to remove {kind} listener: {e:?}"))
                    .is_ok()
            })
            .filter(|removed| *removed)
            .count();

        let mut report = match self.stage.borrow_mut().take() {
            Some(mut stage) => stage.dispose(),
            None => TeardownReport::default(),
        };
        report.listeners_removed = listeners_removed;

        self.frame.borrow_mut().take();

        if listeners_removed > 0 {
            log::info!("scene unmounted: {report:?}");
        }
        report
    }
}

impl Drop for Mount {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn failed_start_breaks_the_frame_cycle() {
        let held = Rc::new(());
        let frame: FrameCallback = Rc::new(RefCell::new(None));
        *frame.borrow_mut() = Some({
            let handle = frame.clone();
            let held = held.clone();
            Closure::wrap(Box::new(move || {
                let _ = (&handle, &held);
            }) as Box<dyn FnMut()>)
        });
        assert_eq!(Rc::strong_count(&held), 2);

        let result: Result<i32, JsValue> = Err(JsValue::from_str("no frame"));
        assert!(release_on_error(&frame, result).is_err());
        assert!(frame.borrow().is_none());
        assert_eq!(Rc::strong_count(&held), 1);
        assert_eq!(Rc::strong_count(&frame), 1);
    }

    #[wasm_bindgen_test]
    fn successful_start_keeps_the_loop() {
        let frame: FrameCallback = Rc::new(RefCell::new(None));
        *frame.borrow_mut() = Some(Closure::wrap(Box::new(|| {}) as Box<dyn FnMut()>));
        assert_eq!(release_on_error(&frame, Ok(7)).ok(), Some(7));
        assert!(frame.borrow().is_some());
    }
}
