use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{AddEventListenerOptions, EventTarget};

/// A registered DOM event listener.
///
/// [`EventListener::remove`] unregisters it and reports failure. Dropping a
/// listener that is still attached removes it as well, logging any error.
pub struct EventListener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut()>,
    attached: bool,
}

impl EventListener {
    pub fn new(
        target: &EventTarget,
        kind: &'static str,
        passive: bool,
        callback: impl FnMut() + 'static,
    ) -> Result<Self, JsValue> {
        let callback = Closure::wrap(Box::new(callback) as Box<dyn FnMut()>);
        let options = AddEventListenerOptions::new();
        options.set_passive(passive);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            kind,
            callback.as_ref().unchecked_ref(),
            &options,
        )?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
            attached: true,
        })
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn remove(mut self) -> Result<(), JsValue> {
        self.attached = false;
        self.detach()
    }

    fn detach(&self) -> Result<(), JsValue> {
        self.target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref())
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        if !self.attached {
            return;
        }
        if let Err(e) = self.detach() {
            log::error!("failed to remove {} listener: {:?}", self.kind, e);
        }
    }
}
