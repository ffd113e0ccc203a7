//! Full-screen playback for one gallery item at a time, plus the controller
//! that keeps inline previews and the modal from playing together.

use std::rc::Rc;

use super::gallery::GalleryItem;
use super::guard::{DialogGuard, Page};
use super::preview::{PreviewCommand, PreviewPlayer};
use super::script_loader::ScriptResult;

pub const SCRIPT_ERROR_MESSAGE: &str = "Failed to load the video player.";
pub const MEDIA_ERROR_MESSAGE: &str = "Sorry, the video cannot be played.";

/// Identifies one modal session. Async results carry the token they were
/// issued for and are dropped once it is no longer current.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionToken(u64);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalState {
    Closed,
    Opening,
    Playing,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Phase {
    Opening,
    Playing,
    Error(String),
}

struct ModalSession {
    token: SessionToken,
    item: GalleryItem,
    phase: Phase,
    focused: bool,
    guard: DialogGuard,
}

pub struct ModalController {
    page: Rc<dyn Page>,
    on_escape: Rc<dyn Fn()>,
    next_token: u64,
    session: Option<ModalSession>,
}

impl ModalController {
    pub fn new(page: Rc<dyn Page>, on_escape: Rc<dyn Fn()>) -> Self {
        Self {
            page,
            on_escape,
            next_token: 0,
            session: None,
        }
    }

    /// Starts a session for `item`, closing whatever was open before. Returns
    /// the token to settle once the player script loads, when one is needed.
    pub fn open(&mut self, item: &GalleryItem) -> Option<SessionToken> {
        if !item.opens_modal() {
            log::warn!("Item {} has no full-length video, not opening modal", item.id);
            return None;
        }
        self.close();

        self.next_token += 1;
        let token = SessionToken(self.next_token);
        let guard = DialogGuard::install(self.page.clone(), self.on_escape.clone());
        let (phase, pending) = if item.needs_player_script() {
            (Phase::Opening, Some(token))
        } else {
            (Phase::Playing, None)
        };
        log::info!("Opening modal for {} ({:?})", item.id, token);

        self.session = Some(ModalSession {
            token,
            item: item.clone(),
            phase,
            focused: false,
            guard,
        });
        pending
    }

    /// Dropping the session releases its dialog guard. Safe to call repeatedly.
    pub fn close(&mut self) {
        if let Some(session) = self.session.take() {
            log::info!("Closing modal for {}", session.item.id);
        }
    }

    pub fn script_settled(&mut self, token: SessionToken, result: ScriptResult) -> bool {
        let Some(session) = self.live_session(token) else {
            log::debug!("Ignoring script result for stale session {:?}", token);
            return false;
        };
        if session.phase != Phase::Opening {
            return false;
        }
        session.phase = match result {
            Ok(()) => Phase::Playing,
            Err(e) => {
                log::warn!("Player script failed for {}: {}", session.item.id, e);
                Phase::Error(SCRIPT_ERROR_MESSAGE.to_string())
            }
        };
        true
    }

    pub fn report_error(&mut self, token: SessionToken, message: &str) -> bool {
        let Some(session) = self.live_session(token) else {
            return false;
        };
        match session.phase {
            Phase::Opening | Phase::Playing => {
                log::warn!("Playback error for {}: {}", session.item.id, message);
                session.phase = Phase::Error(message.to_string());
                true
            }
            Phase::Error(_) => false,
        }
    }

    /// Reopens the errored item under a fresh session.
    pub fn retry(&mut self) -> Option<SessionToken> {
        let item = match &self.session {
            Some(session) if matches!(session.phase, Phase::Error(_)) => session.item.clone(),
            _ => return None,
        };
        self.open(&item)
    }

    /// Moves focus into the dialog the first time it is rendered.
    pub fn focus_dialog(&mut self) {
        if let Some(session) = self.session.as_mut() {
            if !session.focused {
                session.guard.focus_first();
                session.focused = true;
            }
        }
    }

    pub fn state(&self) -> ModalState {
        match self.session.as_ref().map(|s| &s.phase) {
            None => ModalState::Closed,
            Some(Phase::Opening) => ModalState::Opening,
            Some(Phase::Playing) => ModalState::Playing,
            Some(Phase::Error(_)) => ModalState::Error,
        }
    }

    pub fn current(&self) -> Option<&GalleryItem> {
        self.session.as_ref().map(|s| &s.item)
    }

    pub fn token(&self) -> Option<SessionToken> {
        self.session.as_ref().map(|s| s.token)
    }

    pub fn is_loading(&self) -> bool {
        self.state() == ModalState::Opening
    }

    pub fn error(&self) -> Option<&str> {
        match self.session.as_ref().map(|s| &s.phase) {
            Some(Phase::Error(message)) => Some(message.as_str()),
            _ => None,
        }
    }

    /// True while `id` is loading or playing (not errored).
    pub fn is_showing(&self, id: &str) -> bool {
        matches!(
            &self.session,
            Some(session) if session.item.id == id && !matches!(session.phase, Phase::Error(_))
        )
    }

    fn live_session(&mut self, token: SessionToken) -> Option<&mut ModalSession> {
        self.session.as_mut().filter(|s| s.token == token)
    }
}

/// Side effects for the view layer, in the order they must be applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlaybackCommand {
    Preview(PreviewCommand),
    LoadScript(SessionToken),
}

pub struct PlaybackController {
    previews: PreviewPlayer,
    modal: ModalController,
}

impl PlaybackController {
    pub fn new(page: Rc<dyn Page>, on_escape: Rc<dyn Fn()>) -> Self {
        Self {
            previews: PreviewPlayer::new(),
            modal: ModalController::new(page, on_escape),
        }
    }

    /// A tile was clicked: full-length media goes to the modal, a bare preview
    /// clip toggles inline, anything else is ignored.
    pub fn select_card(&mut self, item: &GalleryItem) -> Vec<PlaybackCommand> {
        if item.opens_modal() {
            self.open(item)
        } else if item.preview_video.is_some() {
            self.toggle_preview(item)
        } else {
            Vec::new()
        }
    }

    pub fn toggle_preview(&mut self, item: &GalleryItem) -> Vec<PlaybackCommand> {
        self.previews
            .select(&item.id)
            .into_iter()
            .map(PlaybackCommand::Preview)
            .collect()
    }

    pub fn open(&mut self, item: &GalleryItem) -> Vec<PlaybackCommand> {
        let mut commands = Vec::new();
        if self.modal.is_showing(&item.id) {
            return commands;
        }
        if let Some(pause) = self.previews.pause_active() {
            commands.push(PlaybackCommand::Preview(pause));
        }
        if let Some(token) = self.modal.open(item) {
            commands.push(PlaybackCommand::LoadScript(token));
        }
        commands
    }

    pub fn retry(&mut self) -> Vec<PlaybackCommand> {
        self.modal
            .retry()
            .map(PlaybackCommand::LoadScript)
            .into_iter()
            .collect()
    }

    pub fn close(&mut self) {
        self.modal.close();
    }

    pub fn script_settled(&mut self, token: SessionToken, result: ScriptResult) -> bool {
        self.modal.script_settled(token, result)
    }

    pub fn report_error(&mut self, token: SessionToken) -> bool {
        self.modal.report_error(token, MEDIA_ERROR_MESSAGE)
    }

    pub fn preview_failed(&mut self, id: &str) {
        self.previews.media_failed(id);
    }

    pub fn preview_ended(&mut self, id: &str) {
        self.previews.ended(id);
    }

    pub fn focus_dialog(&mut self) {
        self.modal.focus_dialog();
    }

    pub fn modal(&self) -> &ModalController {
        &self.modal
    }

    pub fn previews(&self) -> &PreviewPlayer {
        &self.previews
    }
}
