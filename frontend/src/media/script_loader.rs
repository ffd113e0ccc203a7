//! Third-party scripts (the Vimeo player API, the Calendly widget) are requested
//! at most once per page. Every caller waits on the same shared future.

use futures::channel::oneshot;
use futures::future::{self, FutureExt, LocalBoxFuture, Shared};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    #[error("failed to load script {0}")]
    LoadFailed(String),
    #[error("document is not available")]
    NoDocument,
    #[error("script load was abandoned")]
    Abandoned,
}

pub type ScriptResult = Result<(), ScriptError>;
pub type ScriptLoad = Shared<LocalBoxFuture<'static, ScriptResult>>;
pub type OnSettled = Box<dyn FnOnce(ScriptResult)>;

/// Where script tags go. `DomScriptHost` appends real `<script>` elements.
pub trait ScriptHost {
    /// True when a tag for `src` is already in the document.
    fn is_present(&self, src: &str) -> bool;
    /// Adds a tag for `src` and calls `on_settled` once it loads or fails.
    fn inject(&self, src: &str, on_settled: OnSettled);
    fn remove(&self, src: &str);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScriptStatus {
    NotLoaded,
    Loading,
    Loaded,
}

enum ScriptLoadState {
    NotLoaded,
    /// Tagged with the attempt number so a late cancellation only resets its own attempt.
    Loading(u64, ScriptLoad),
    Loaded,
}

struct Inner {
    host: Rc<dyn ScriptHost>,
    src: String,
    state: RefCell<ScriptLoadState>,
    attempts: Cell<u64>,
}

impl Inner {
    /// The host dropped the settle callback without calling it.
    fn abandon(&self, attempt: u64) {
        let current = matches!(&*self.state.borrow(), ScriptLoadState::Loading(id, _) if *id == attempt);
        if !current {
            return;
        }
        log::warn!("Script {} load was abandoned, resetting", self.src);
        let previous = std::mem::replace(&mut *self.state.borrow_mut(), ScriptLoadState::NotLoaded);
        drop(previous);
        self.host.remove(&self.src);
    }
}

#[derive(Clone)]
pub struct ScriptLoader {
    inner: Rc<Inner>,
}

impl PartialEq for ScriptLoader {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

fn settled(result: ScriptResult) -> ScriptLoad {
    future::ready(result).boxed_local().shared()
}

impl ScriptLoader {
    pub fn new(host: Rc<dyn ScriptHost>, src: &str) -> Self {
        Self {
            inner: Rc::new(Inner {
                host,
                src: src.to_string(),
                state: RefCell::new(ScriptLoadState::NotLoaded),
                attempts: Cell::new(0),
            }),
        }
    }

    pub fn src(&self) -> &str {
        &self.inner.src
    }

    pub fn status(&self) -> ScriptStatus {
        match &*self.inner.state.borrow() {
            ScriptLoadState::NotLoaded => ScriptStatus::NotLoaded,
            ScriptLoadState::Loading(..) => ScriptStatus::Loading,
            ScriptLoadState::Loaded => ScriptStatus::Loaded,
        }
    }

    /// Resolves once the script is available. A failed load resets the loader
    /// so the next call injects a fresh tag.
    pub fn load(&self) -> ScriptLoad {
        let mut state = self.inner.state.borrow_mut();
        match &*state {
            ScriptLoadState::Loaded => return settled(Ok(())),
            ScriptLoadState::Loading(_, pending) => return pending.clone(),
            ScriptLoadState::NotLoaded => {}
        }

        if self.inner.host.is_present(&self.inner.src) {
            log::debug!("{} already present in document", self.inner.src);
            *state = ScriptLoadState::Loaded;
            return settled(Ok(()));
        }

        let attempt = self.inner.attempts.get() + 1;
        self.inner.attempts.set(attempt);
        let (tx, rx) = oneshot::channel::<ScriptResult>();
        let owner = Rc::downgrade(&self.inner);
        let pending = async move {
            match rx.await {
                Ok(result) => result,
                Err(oneshot::Canceled) => {
                    if let Some(inner) = owner.upgrade() {
                        inner.abandon(attempt);
                    }
                    Err(ScriptError::Abandoned)
                }
            }
        }
        .boxed_local()
        .shared();
        *state = ScriptLoadState::Loading(attempt, pending.clone());
        // The host may settle synchronously, which re-borrows the state.
        drop(state);

        log::info!("Loading script {}", self.inner.src);
        let weak = Rc::downgrade(&self.inner);
        self.inner.host.inject(
            &self.inner.src,
            Box::new(move |result: ScriptResult| {
                if let Some(inner) = weak.upgrade() {
                    let next = match &result {
                        Ok(()) => {
                            log::info!("Script {} loaded", inner.src);
                            ScriptLoadState::Loaded
                        }
                        Err(e) => {
                            log::error!("Script {} failed: {}", inner.src, e);
                            inner.host.remove(&inner.src);
                            ScriptLoadState::NotLoaded
                        }
                    };
                    *inner.state.borrow_mut() = next;
                }
                let _ = tx.send(result);
            }),
        );
        pending
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Records injections and lets the test decide when each one settles.
    #[derive(Default)]
    pub struct FakeHost {
        pub tags: RefCell<Vec<String>>,
        pub pending: RefCell<Vec<OnSettled>>,
        pub injected: RefCell<usize>,
    }

    impl FakeHost {
        pub fn new() -> Rc<Self> {
            Rc::new(Self::default())
        }

        pub fn settle_next(&self, result: ScriptResult) {
            let callback = self.pending.borrow_mut().remove(0);
            callback(result);
        }

        pub fn tag_count(&self) -> usize {
            self.tags.borrow().len()
        }
    }

    impl ScriptHost for FakeHost {
        fn is_present(&self, src: &str) -> bool {
            self.tags.borrow().iter().any(|t| t == src)
        }

        fn inject(&self, src: &str, on_settled: OnSettled) {
            *self.injected.borrow_mut() += 1;
            self.tags.borrow_mut().push(src.to_string());
            self.pending.borrow_mut().push(on_settled);
        }

        fn remove(&self, src: &str) {
            self.tags.borrow_mut().retain(|t| t != src);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeHost;
    use super::*;
    use futures::executor::block_on;

    const SRC: &str = "https://player.vimeo.com/api/player.js";

    #[test]
    fn concurrent_callers_share_one_tag_and_one_result() {
        let host = FakeHost::new();
        let loader = ScriptLoader::new(host.clone(), SRC);

        let first = loader.load();
        let second = loader.load();
        assert_eq!(host.tag_count(), 1);
        assert_eq!(*host.injected.borrow(), 1);
        assert_eq!(loader.status(), ScriptStatus::Loading);
        assert!(first.clone().now_or_never().is_none());

        host.settle_next(Ok(()));
        assert_eq!(block_on(first), Ok(()));
        assert_eq!(block_on(second), Ok(()));
        assert_eq!(loader.status(), ScriptStatus::Loaded);
    }

    #[test]
    fn cached_success_resolves_immediately() {
        let host = FakeHost::new();
        let loader = ScriptLoader::new(host.clone(), SRC);
        let _ = loader.load();
        host.settle_next(Ok(()));

        assert_eq!(loader.load().now_or_never(), Some(Ok(())));
        assert_eq!(*host.injected.borrow(), 1);
    }

    #[test]
    fn failure_reaches_every_waiter_and_allows_retry() {
        let host = FakeHost::new();
        let loader = ScriptLoader::new(host.clone(), SRC);
        let a = loader.load();
        let b = loader.load();

        host.settle_next(Err(ScriptError::LoadFailed(SRC.to_string())));
        assert!(block_on(a).is_err());
        assert!(block_on(b).is_err());
        assert_eq!(loader.status(), ScriptStatus::NotLoaded);
        assert_eq!(host.tag_count(), 0, "failed tag is removed");

        let retry = loader.load();
        assert_eq!(*host.injected.borrow(), 2);
        host.settle_next(Ok(()));
        assert_eq!(block_on(retry), Ok(()));
    }

    #[test]
    fn existing_tag_counts_as_loaded() {
        let host = FakeHost::new();
        host.tags.borrow_mut().push(SRC.to_string());
        let loader = ScriptLoader::new(host.clone(), SRC);
        assert_eq!(loader.load().now_or_never(), Some(Ok(())));
        assert_eq!(*host.injected.borrow(), 0);
    }

    #[test]
    fn dropped_callback_reports_abandoned() {
        let host = FakeHost::new();
        let loader = ScriptLoader::new(host.clone(), SRC);
        let pending = loader.load();
        host.pending.borrow_mut().clear();
        assert_eq!(block_on(pending), Err(ScriptError::Abandoned));
    }

    #[test]
    fn abandoned_load_is_retried_with_a_fresh_tag() {
        let host = FakeHost::new();
        let loader = ScriptLoader::new(host.clone(), SRC);
        let first = loader.load();
        let waiter = loader.load();
        host.pending.borrow_mut().clear();

        assert_eq!(block_on(first), Err(ScriptError::Abandoned));
        assert_eq!(block_on(waiter), Err(ScriptError::Abandoned));
        assert_eq!(loader.status(), ScriptStatus::NotLoaded);
        assert_eq!(host.tag_count(), 0);

        let retry = loader.load();
        assert_eq!(*host.injected.borrow(), 2);
        assert!(retry.clone().now_or_never().is_none());
        host.settle_next(Ok(()));
        assert_eq!(block_on(retry), Ok(()));
        assert_eq!(loader.status(), ScriptStatus::Loaded);
    }

    #[test]
    fn stale_abandon_does_not_reset_a_newer_load() {
        let host = FakeHost::new();
        let loader = ScriptLoader::new(host.clone(), SRC);
        let first = loader.load();
        host.settle_next(Err(ScriptError::LoadFailed(SRC.to_string())));
        assert!(block_on(first).is_err());

        let second = loader.load();
        loader.inner.abandon(1);
        assert_eq!(loader.status(), ScriptStatus::Loading);
        host.settle_next(Ok(()));
        assert_eq!(block_on(second), Ok(()));
    }
}
