//! Browser implementations of the page traits.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Document, Element, HtmlElement, HtmlMediaElement, HtmlScriptElement, KeyboardEvent};
use yew::{Callback, NodeRef};

use super::guard::{KeyHandler, KeyPress, ListenerId, Page};
use super::preview::PreviewCommand;
use super::script_loader::{OnSettled, ScriptError, ScriptHost};

const FOCUSABLE: &str = "button, [href], input, select, textarea, iframe, [tabindex]:not([tabindex=\"-1\"])";
const OPEN_DIALOG: &str = "[aria-modal=\"true\"]";

fn document() -> Option<Document> {
    web_sys::window().and_then(|w| w.document())
}

#[derive(Default)]
pub struct DomPage {
    listeners: RefCell<HashMap<u32, Closure<dyn FnMut(KeyboardEvent)>>>,
    next_id: Cell<u32>,
}

impl DomPage {
    pub fn new() -> Self {
        Self::default()
    }

    fn focusables(&self) -> Vec<HtmlElement> {
        let Some(dialog) = document().and_then(|d| d.query_selector(OPEN_DIALOG).ok().flatten()) else {
            return Vec::new();
        };
        let Ok(nodes) = dialog.query_selector_all(FOCUSABLE) else {
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
            .collect()
    }
}

impl Page for DomPage {
    fn body_overflow(&self) -> String {
        document()
            .and_then(|d| d.body())
            .and_then(|body| body.style().get_property_value("overflow").ok())
            .unwrap_or_default()
    }

    fn set_body_overflow(&self, value: &str) {
        if let Some(body) = document().and_then(|d| d.body()) {
            let style = body.style();
            let result = if value.is_empty() {
                style.remove_property("overflow").map(|_| ())
            } else {
                style.set_property("overflow", value)
            };
            if let Err(e) = result {
                log::warn!("Failed to set body overflow: {:?}", e);
            }
        }
    }

    fn add_key_listener(&self, handler: KeyHandler) -> ListenerId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let callback = Closure::wrap(Box::new(move |e: KeyboardEvent| {
            let press = KeyPress {
                key: e.key(),
                shift: e.shift_key(),
            };
            if handler(&press) {
                e.prevent_default();
            }
        }) as Box<dyn FnMut(KeyboardEvent)>);

        if let Some(document) = document() {
            if let Err(e) = document.add_event_listener_with_callback("keydown", callback.as_ref().unchecked_ref()) {
                log::error!("Failed to attach keydown listener: {:?}", e);
            }
        }
        self.listeners.borrow_mut().insert(id, callback);
        ListenerId(id)
    }

    fn remove_key_listener(&self, id: ListenerId) {
        let Some(callback) = self.listeners.borrow_mut().remove(&id.0) else {
            return;
        };
        if let Some(document) = document() {
            let _ = document.remove_event_listener_with_callback("keydown", callback.as_ref().unchecked_ref());
        }
        // Escape can close the dialog from inside this very closure; free it on the next tick.
        Timeout::new(0, move || drop(callback)).forget();
    }

    fn focusable_count(&self) -> usize {
        self.focusables().len()
    }

    fn focused_index(&self) -> Option<usize> {
        let active: Element = document()?.active_element()?;
        let active: &web_sys::Node = active.as_ref();
        self.focusables()
            .iter()
            .position(|el| el.is_same_node(Some(active)))
    }

    fn focus(&self, index: usize) {
        if let Some(el) = self.focusables().get(index) {
            let _ = el.focus();
        }
    }
}

pub struct DomScriptHost;

impl DomScriptHost {
    fn find(document: &Document, src: &str) -> Option<Element> {
        document
            .query_selector(&format!("script[src=\"{}\"]", src))
            .ok()
            .flatten()
    }
}

impl ScriptHost for DomScriptHost {
    fn is_present(&self, src: &str) -> bool {
        document().map(|d| Self::find(&d, src).is_some()).unwrap_or(false)
    }

    fn inject(&self, src: &str, on_settled: OnSettled) {
        let Some(document) = document() else {
            on_settled(Err(ScriptError::NoDocument));
            return;
        };
        let script = match document
            .create_element("script")
            .map_err(|e| format!("{:?}", e))
            .and_then(|el| el.dyn_into::<HtmlScriptElement>().map_err(|_| "not a script element".to_string()))
        {
            Ok(script) => script,
            Err(e) => {
                log::error!("Failed to create script element: {}", e);
                on_settled(Err(ScriptError::LoadFailed(src.to_string())));
                return;
            }
        };
        script.set_src(src);
        script.set_async(true);

        // onload and onerror race for the same one-shot callback.
        let slot = Rc::new(RefCell::new(Some(on_settled)));
        let load_slot = slot.clone();
        let failed_slot = slot.clone();
        let onload = Closure::once(move || {
            if let Some(settle) = load_slot.borrow_mut().take() {
                settle(Ok(()));
            }
        });
        let error_src = src.to_string();
        let onerror = Closure::once(move || {
            if let Some(settle) = slot.borrow_mut().take() {
                settle(Err(ScriptError::LoadFailed(error_src)));
            }
        });
        script.set_onload(Some(onload.as_ref().unchecked_ref()));
        script.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onload.forget();
        onerror.forget();

        let appended = document
            .body()
            .map(|body| body.append_child(&script).is_ok())
            .unwrap_or(false);
        if !appended {
            log::error!("Failed to append script {}", src);
            if let Some(settle) = failed_slot.borrow_mut().take() {
                settle(Err(ScriptError::LoadFailed(src.to_string())));
            }
        }
    }

    fn remove(&self, src: &str) {
        if let Some(existing) = document().and_then(|d| Self::find(&d, src)) {
            existing.remove();
        }
    }
}

/// Applies one preview command to the tile's `<video>` element. Failed play
/// promises are reported through `on_failed`.
pub fn apply_preview_command(refs: &HashMap<String, NodeRef>, command: &PreviewCommand, on_failed: Callback<String>) {
    let (id, play) = match command {
        PreviewCommand::Play(id) => (id, true),
        PreviewCommand::Pause(id) => (id, false),
    };
    let Some(video) = refs.get(id).and_then(|r| r.cast::<HtmlMediaElement>()) else {
        log::debug!("No video element for preview {}", id);
        if play {
            on_failed.emit(id.clone());
        }
        return;
    };

    if !play {
        if let Err(e) = video.pause() {
            log::warn!("Failed to pause preview {}: {:?}", id, e);
        }
        return;
    }

    match video.play() {
        Ok(promise) => {
            let id = id.clone();
            spawn_local(async move {
                if let Err(e) = JsFuture::from(promise).await {
                    log::warn!("Preview {} refused to play: {:?}", id, e);
                    on_failed.emit(id);
                }
            });
        }
        Err(e) => {
            log::warn!("Failed to start preview {}: {:?}", id, e);
            on_failed.emit(id.clone());
        }
    }
}
