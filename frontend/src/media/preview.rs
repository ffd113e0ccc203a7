/// A media instruction for one tile's preview element, applied in emission order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PreviewCommand {
    Play(String),
    Pause(String),
}

/// Tracks the single inline preview that may be playing.
#[derive(Debug, Default)]
pub struct PreviewPlayer {
    active: Option<String>,
    playing: bool,
}

impl PreviewPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles the tile's preview. Any other playing preview is paused first.
    pub fn select(&mut self, id: &str) -> Vec<PreviewCommand> {
        let mut commands = Vec::new();
        if self.active.as_deref() == Some(id) {
            self.playing = !self.playing;
            commands.push(if self.playing {
                PreviewCommand::Play(id.to_string())
            } else {
                PreviewCommand::Pause(id.to_string())
            });
            return commands;
        }

        commands.extend(self.pause_active());
        self.active = Some(id.to_string());
        self.playing = true;
        commands.push(PreviewCommand::Play(id.to_string()));
        commands
    }

    pub fn pause_active(&mut self) -> Option<PreviewCommand> {
        if !self.playing {
            return None;
        }
        self.playing = false;
        self.active.clone().map(PreviewCommand::Pause)
    }

    /// Previews are decorative: a failure only resets the tile.
    pub fn media_failed(&mut self, id: &str) {
        if self.active.as_deref() == Some(id) {
            log::warn!("Preview for {} failed to play, reverting", id);
            self.playing = false;
        }
    }

    pub fn ended(&mut self, id: &str) {
        if self.active.as_deref() == Some(id) {
            self.playing = false;
            self.active = None;
        }
    }

    pub fn playing(&self) -> Option<&str> {
        if self.playing {
            self.active.as_deref()
        } else {
            None
        }
    }

    pub fn is_playing(&self, id: &str) -> bool {
        self.playing() == Some(id)
    }
}
