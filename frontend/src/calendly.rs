use std::rc::Rc;

use url::Url;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::{Function, Object, Reflect};
use web_sys::HtmlElement;

use crate::media::guard::{DialogGuard, Page};
use crate::media::script_loader::ScriptResult;

pub const SCRIPT_ERROR_MESSAGE: &str = "Failed to load scheduling widget.";
pub const WIDGET_ERROR_MESSAGE: &str = "Unable to load scheduling widget.";

/// Last path segment of a scheduling link, e.g. `.../creador/sponsor` -> `sponsor`.
pub fn meeting_type(calendly_url: &str) -> String {
    match Url::parse(calendly_url) {
        Ok(url) => url
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            .unwrap_or("unknown")
            .to_string(),
        Err(e) => {
            log::error!("Failed to parse Calendly URL {}: {}", calendly_url, e);
            "unknown".to_string()
        }
    }
}

/// Calls `window.Calendly.initInlineWidget` on the loaded widget script.
pub fn init_inline_widget(url: &str, parent: &HtmlElement) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let calendly = Reflect::get(&window, &JsValue::from_str("Calendly"))?;
    if calendly.is_undefined() {
        return Err(JsValue::from_str("Calendly is not loaded"));
    }
    let init: Function = Reflect::get(&calendly, &JsValue::from_str("initInlineWidget"))?.dyn_into()?;

    let options = Object::new();
    Reflect::set(&options, &JsValue::from_str("url"), &JsValue::from_str(url))?;
    Reflect::set(&options, &JsValue::from_str("parentElement"), parent)?;
    Reflect::set(&options, &JsValue::from_str("prefill"), &Object::new())?;
    init.call1(&calendly, &options)?;
    Ok(())
}

/// Marks one opening of the scheduling dialog. Script and timer results
/// carry it and are ignored once the dialog has closed or reopened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Generation(u64);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    Closed,
    Loading,
    /// Script is in, waiting for the container to render before init.
    Initializing,
    Ready,
    Error(String),
}

struct SchedulerSession {
    generation: Generation,
    state: SchedulerState,
    focused: bool,
    guard: DialogGuard,
}

/// Open/close bookkeeping for the scheduling dialog. Shares the dialog guard
/// with the video modal so scroll lock and focus trapping behave the same.
pub struct SchedulerDialog {
    page: Rc<dyn Page>,
    on_escape: Rc<dyn Fn()>,
    next: u64,
    session: Option<SchedulerSession>,
}

impl SchedulerDialog {
    pub fn new(page: Rc<dyn Page>, on_escape: Rc<dyn Fn()>) -> Self {
        Self {
            page,
            on_escape,
            next: 0,
            session: None,
        }
    }

    /// Starts loading. The caller awaits the script and reports back with the
    /// returned generation.
    pub fn open(&mut self) -> Generation {
        self.close();
        self.next += 1;
        let generation = Generation(self.next);
        self.session = Some(SchedulerSession {
            generation,
            state: SchedulerState::Loading,
            focused: false,
            guard: DialogGuard::install(self.page.clone(), self.on_escape.clone()),
        });
        generation
    }

    pub fn close(&mut self) {
        self.session = None;
    }

    pub fn script_settled(&mut self, generation: Generation, result: ScriptResult) -> bool {
        let Some(session) = self.live(generation) else {
            return false;
        };
        if session.state != SchedulerState::Loading {
            return false;
        }
        session.state = match result {
            Ok(()) => SchedulerState::Initializing,
            Err(e) => {
                log::error!("Failed to load Calendly script: {}", e);
                SchedulerState::Error(SCRIPT_ERROR_MESSAGE.to_string())
            }
        };
        true
    }

    pub fn widget_initialized(&mut self, generation: Generation, result: Result<(), String>) -> bool {
        let Some(session) = self.live(generation) else {
            return false;
        };
        if session.state != SchedulerState::Initializing {
            return false;
        }
        session.state = match result {
            Ok(()) => SchedulerState::Ready,
            Err(e) => {
                log::error!("Failed to initialize Calendly widget: {}", e);
                SchedulerState::Error(WIDGET_ERROR_MESSAGE.to_string())
            }
        };
        true
    }

    pub fn focus_dialog(&mut self) {
        if let Some(session) = self.session.as_mut() {
            if !session.focused {
                session.guard.focus_first();
                session.focused = true;
            }
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.session
            .as_ref()
            .map(|s| s.state.clone())
            .unwrap_or(SchedulerState::Closed)
    }

    pub fn generation(&self) -> Option<Generation> {
        self.session.as_ref().map(|s| s.generation)
    }

    fn live(&mut self, generation: Generation) -> Option<&mut SchedulerSession> {
        self.session.as_mut().filter(|s| s.generation == generation)
    }
}
