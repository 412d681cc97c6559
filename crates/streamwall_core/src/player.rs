use crate::Effect;

pub type PlayerId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackCommand {
    Play,
    Pause,
    Mute,
    Unmute,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlayerStatus {
    /// Waiting for the decoder to parse the manifest.
    #[default]
    Loading,
    Playing,
    Paused,
    /// No decoder can play this address; shown inline in the card.
    Unsupported,
    Failed(String),
}

/// Core-side record of one playback wrapper, keyed by its address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSlot {
    pub id: PlayerId,
    pub url: String,
    pub status: PlayerStatus,
    pub muted: bool,
    pub media_sequence: Option<u64>,
    pub segments: Option<usize>,
}

impl PlayerSlot {
    pub(crate) fn new(id: PlayerId, url: String) -> Self {
        Self {
            id,
            url,
            status: PlayerStatus::Loading,
            muted: true,
            media_sequence: None,
            segments: None,
        }
    }

    /// True once the decoder has a media element to control.
    pub fn is_attached(&self) -> bool {
        matches!(self.status, PlayerStatus::Playing | PlayerStatus::Paused)
    }

    /// Applies a playback command and returns the effect forwarding it to the
    /// engine. Slots without an attached media element ignore the command.
    pub(crate) fn apply(&mut self, command: PlaybackCommand) -> Option<Effect> {
        if !self.is_attached() {
            return None;
        }
        match command {
            PlaybackCommand::Play => self.status = PlayerStatus::Playing,
            PlaybackCommand::Pause => self.status = PlayerStatus::Paused,
            PlaybackCommand::Mute => self.muted = true,
            PlaybackCommand::Unmute => self.muted = false,
        }
        Some(Effect::Playback {
            player_id: self.id,
            command,
        })
    }

    pub(crate) fn toggle_mute(&mut self) -> Option<Effect> {
        let command = if self.muted {
            PlaybackCommand::Unmute
        } else {
            PlaybackCommand::Mute
        };
        self.apply(command)
    }
}
