//! Accessibility contract for open dialogs: the page does not scroll, keyboard
//! focus stays inside the dialog and Escape closes it.

use std::rc::Rc;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyPress {
    pub key: String,
    pub shift: bool,
}

impl KeyPress {
    pub fn new(key: &str, shift: bool) -> Self {
        Self { key: key.to_string(), shift }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u32);

/// Returns true when the browser default for the key should be suppressed.
pub type KeyHandler = Rc<dyn Fn(&KeyPress) -> bool>;

/// Page-level state a dialog touches. The browser implementation lives in
/// `media::dom`; tests use an in-memory page.
pub trait Page {
    fn body_overflow(&self) -> String;
    fn set_body_overflow(&self, value: &str);
    fn add_key_listener(&self, handler: KeyHandler) -> ListenerId;
    fn remove_key_listener(&self, id: ListenerId);
    /// Number of focusable elements inside the open dialog.
    fn focusable_count(&self) -> usize;
    /// Index of the focused element among the dialog's focusables.
    fn focused_index(&self) -> Option<usize>;
    fn focus(&self, index: usize);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    Ignored,
    Wrapped,
    Escape,
}

pub fn handle_key(page: &dyn Page, key: &KeyPress) -> KeyOutcome {
    match key.key.as_str() {
        "Escape" | "Esc" => KeyOutcome::Escape,
        "Tab" => {
            let count = page.focusable_count();
            if count == 0 {
                return KeyOutcome::Ignored;
            }
            let last = count - 1;
            match (key.shift, page.focused_index()) {
                (true, Some(0)) => {
                    page.focus(last);
                    KeyOutcome::Wrapped
                }
                (false, Some(i)) if i == last => {
                    page.focus(0);
                    KeyOutcome::Wrapped
                }
                // Focus is outside the dialog, pull it back in.
                (shift, None) => {
                    page.focus(if shift { last } else { 0 });
                    KeyOutcome::Wrapped
                }
                _ => KeyOutcome::Ignored,
            }
        }
        _ => KeyOutcome::Ignored,
    }
}

/// Held for as long as a dialog is open. Dropping it restores the body's
/// overflow style and detaches the key listener, whatever closed the dialog.
pub struct DialogGuard {
    page: Rc<dyn Page>,
    prior_overflow: String,
    listener: Option<ListenerId>,
}

impl DialogGuard {
    pub fn install(page: Rc<dyn Page>, on_escape: Rc<dyn Fn()>) -> Self {
        let prior_overflow = page.body_overflow();
        page.set_body_overflow("hidden");

        let weak = Rc::downgrade(&page);
        let handler: KeyHandler = Rc::new(move |key: &KeyPress| {
            let Some(page) = weak.upgrade() else {
                return false;
            };
            match handle_key(page.as_ref(), key) {
                KeyOutcome::Wrapped => true,
                KeyOutcome::Escape => {
                    on_escape();
                    false
                }
                KeyOutcome::Ignored => false,
            }
        });
        let listener = Some(page.add_key_listener(handler));

        Self { page, prior_overflow, listener }
    }

    pub fn focus_first(&self) {
        if self.page.focusable_count() > 0 {
            self.page.focus(0);
        }
    }
}

impl Drop for DialogGuard {
    fn drop(&mut self) {
        if let Some(id) = self.listener.take() {
            self.page.remove_key_listener(id);
        }
        self.page.set_body_overflow(&self.prior_overflow);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::{Cell, RefCell};

    /// In-memory page with a dialog of `focusables` elements.
    pub struct FakePage {
        pub overflow: RefCell<String>,
        pub listeners: RefCell<Vec<(ListenerId, KeyHandler)>>,
        pub focusables: Cell<usize>,
        pub focused: Cell<Option<usize>>,
        next_id: Cell<u32>,
    }

    impl FakePage {
        pub fn new(overflow: &str, focusables: usize) -> Rc<Self> {
            Rc::new(Self {
                overflow: RefCell::new(overflow.to_string()),
                listeners: RefCell::new(Vec::new()),
                focusables: Cell::new(focusables),
                focused: Cell::new(None),
                next_id: Cell::new(0),
            })
        }

        /// Dispatches a keydown to every listener; returns whether any prevented the default.
        pub fn press(&self, key: &str, shift: bool) -> bool {
            let handlers: Vec<KeyHandler> =
                self.listeners.borrow().iter().map(|(_, h)| h.clone()).collect();
            let press = KeyPress::new(key, shift);
            handlers.iter().fold(false, |prevented, h| h(&press) || prevented)
        }

        pub fn listener_count(&self) -> usize {
            self.listeners.borrow().len()
        }

        pub fn overflow(&self) -> String {
            self.overflow.borrow().clone()
        }
    }

    impl Page for FakePage {
        fn body_overflow(&self) -> String {
            self.overflow.borrow().clone()
        }

        fn set_body_overflow(&self, value: &str) {
            *self.overflow.borrow_mut() = value.to_string();
        }

        fn add_key_listener(&self, handler: KeyHandler) -> ListenerId {
            let id = ListenerId(self.next_id.get());
            self.next_id.set(id.0 + 1);
            self.listeners.borrow_mut().push((id, handler));
            id
        }

        fn remove_key_listener(&self, id: ListenerId) {
            self.listeners.borrow_mut().retain(|(existing, _)| *existing != id);
        }

        fn focusable_count(&self) -> usize {
            self.focusables.get()
        }

        fn focused_index(&self) -> Option<usize> {
            self.focused.get()
        }

        fn focus(&self, index: usize) {
            self.focused.set(Some(index));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakePage;
    use super::*;
    use std::cell::Cell;

    fn noop() -> Rc<dyn Fn()> {
        Rc::new(|| ())
    }

    #[test]
    fn install_locks_scroll_and_drop_restores_prior_value() {
        let page = FakePage::new("auto", 3);
        let guard = DialogGuard::install(page.clone(), noop());
        assert_eq!(page.overflow(), "hidden");
        assert_eq!(page.listener_count(), 1);
        drop(guard);
        assert_eq!(page.overflow(), "auto");
        assert_eq!(page.listener_count(), 0);
    }

    #[test]
    fn tab_wraps_from_last_to_first_and_back() {
        let page = FakePage::new("", 3);
        let guard = DialogGuard::install(page.clone(), noop());
        guard.focus_first();
        assert_eq!(page.focused.get(), Some(0));

        assert!(page.press("Tab", true));
        assert_eq!(page.focused.get(), Some(2));

        assert!(page.press("Tab", false));
        assert_eq!(page.focused.get(), Some(0));

        page.focused.set(Some(1));
        assert!(!page.press("Tab", false), "middle elements tab normally");
        assert_eq!(page.focused.get(), Some(1));
    }

    #[test]
    fn focus_outside_dialog_is_pulled_back() {
        let page = FakePage::new("", 2);
        let _guard = DialogGuard::install(page.clone(), noop());
        assert!(page.press("Tab", false));
        assert_eq!(page.focused.get(), Some(0));
    }

    #[test]
    fn escape_invokes_callback_and_other_keys_pass() {
        let page = FakePage::new("", 2);
        let escaped = Rc::new(Cell::new(0));
        let counter = escaped.clone();
        let _guard = DialogGuard::install(page.clone(), Rc::new(move || counter.set(counter.get() + 1)));

        assert!(!page.press("Enter", false));
        assert_eq!(escaped.get(), 0);
        assert!(!page.press("Escape", false));
        assert_eq!(escaped.get(), 1);
    }

    #[test]
    fn empty_dialog_ignores_tab() {
        let page = FakePage::new("", 0);
        assert_eq!(handle_key(page.as_ref(), &KeyPress::new("Tab", false)), KeyOutcome::Ignored);
    }

    #[test]
    fn listener_is_inert_after_drop() {
        let page = FakePage::new("scroll", 2);
        let escaped = Rc::new(Cell::new(false));
        let flag = escaped.clone();
        drop(DialogGuard::install(page.clone(), Rc::new(move || flag.set(true))));
        page.press("Escape", false);
        assert!(!escaped.get());
        assert_eq!(page.overflow(), "scroll");
    }
}
