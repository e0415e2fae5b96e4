//! Keyboard shortcuts.
//!
//! Recognized keys form a closed set ([`EditorKey`]); everything else falls
//! through to a no-op. Listening is scoped to a [`KeyboardSubscription`]
//! that the owner disposes explicitly.

use gloo_events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{EventTarget, HtmlInputElement, KeyboardEvent};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorKey {
    /// Delete or Backspace: remove the current selection
    Delete,
}

impl EditorKey {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Delete" | "Backspace" => Some(EditorKey::Delete),
            _ => None,
        }
    }
}

/// Handler per recognized key. A handler returns whether it acted, which
/// decides if the browser default is suppressed.
pub struct KeyBindings {
    on_delete: Box<dyn Fn() -> bool>,
}

impl KeyBindings {
    pub fn new(on_delete: impl Fn() -> bool + 'static) -> Self {
        Self {
            on_delete: Box::new(on_delete),
        }
    }

    /// Dispatch a `KeyboardEvent.key` value. Unrecognized keys do nothing.
    pub fn handle(&self, key: &str) -> bool {
        match EditorKey::from_key(key) {
            Some(EditorKey::Delete) => (self.on_delete)(),
            None => false,
        }
    }
}

/// Live `keydown` listener. Dropping it also detaches; `dispose` makes the
/// teardown explicit at the call site.
pub struct KeyboardSubscription {
    listener: Option<EventListener>,
}

impl KeyboardSubscription {
    pub fn attach(target: &EventTarget, bindings: KeyBindings) -> Self {
        let listener = EventListener::new(target, "keydown", move |event| {
            let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            // Backspace inside the rename field edits text, not the drawing
            if is_text_input(event) {
                return;
            }
            if bindings.handle(&event.key()) {
                event.prevent_default();
            }
        });

        Self {
            listener: Some(listener),
        }
    }

    pub fn is_active(&self) -> bool {
        self.listener.is_some()
    }

    pub fn dispose(mut self) {
        if self.listener.take().is_some() {
            log::debug!("keyboard subscription disposed");
        }
    }
}

fn is_text_input(event: &KeyboardEvent) -> bool {
    event
        .target()
        .map(|target| target.dyn_into::<HtmlInputElement>().is_ok())
        .unwrap_or(false)
}
