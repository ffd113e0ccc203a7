use std::rc::Rc;

use super::dom::{DomPage, DomScriptHost};
use super::guard::Page;
use super::script_loader::{ScriptHost, ScriptLoader};
use crate::config;

/// Page-lifetime state shared by every dialog and player: the document
/// access layer and one loader per third-party script. Created once in
/// `App` and handed down through a `ContextProvider`.
#[derive(Clone)]
pub struct PageServices {
    pub page: Rc<dyn Page>,
    pub vimeo: ScriptLoader,
    pub calendly: ScriptLoader,
}

impl PartialEq for PageServices {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.page, &other.page) && self.vimeo == other.vimeo && self.calendly == other.calendly
    }
}

impl PageServices {
    pub fn new(page: Rc<dyn Page>, host: Rc<dyn ScriptHost>) -> Self {
        Self {
            page,
            vimeo: ScriptLoader::new(host.clone(), config::VIMEO_SCRIPT_URL),
            calendly: ScriptLoader::new(host, config::CALENDLY_SCRIPT_URL),
        }
    }

    pub fn browser() -> Self {
        Self::new(Rc::new(DomPage::new()), Rc::new(DomScriptHost))
    }
}
