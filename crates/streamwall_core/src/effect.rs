use std::path::PathBuf;
use std::time::Duration;

use crate::{PlaybackCommand, PlayerId};

/// Side effects requested by `update`; executed by the platform layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start a decoder session for a newly rendered card.
    AttachPlayer { player_id: PlayerId, url: String },
    /// Release the decoder session of a removed card.
    DestroyPlayer { player_id: PlayerId },
    Playback {
        player_id: PlayerId,
        command: PlaybackCommand,
    },
    /// Overwrite the persisted snapshot with the given list.
    PersistUrls(Vec<String>),
    /// Delete the persisted snapshot entirely.
    ClearPersisted,
    ScheduleToastHide { after: Duration },
    /// Write an export document for the given list.
    ExportUrls(Vec<String>),
    /// Read the selected import file as text.
    ReadImportFile(PathBuf),
}
