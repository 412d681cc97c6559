use std::path::PathBuf;

use crate::PlayerId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the address input.
    InputChanged(String),
    /// User submitted the current address input (add button or Enter).
    AddSubmitted,
    /// User clicked a card's remove control.
    RemoveClicked(String),
    /// User clicked a card's mute toggle.
    ToggleMuteClicked(String),
    ClearAllClicked,
    PlayAllClicked,
    PauseAllClicked,
    MuteAllClicked,
    UnmuteAllClicked,
    /// User picked a grid column count.
    GridColumnsChanged(usize),
    ExportClicked,
    /// Export write completed with the written path, or an error description.
    ExportFinished(Result<String, String>),
    /// User picked (or cancelled picking) an import file.
    ImportFileSelected(Option<PathBuf>),
    /// Import file read completed with its text, or an error description.
    ImportFileRead(Result<String, String>),
    /// Restore the active list from the persisted snapshot at startup.
    RestoreUrls(Vec<String>),
    /// A notification hide timer fired.
    ToastExpired,
    /// Decoder parsed the manifest and playback started.
    PlayerReady { player_id: PlayerId },
    /// Live playlist refresh for a playing stream.
    PlayerProgress {
        player_id: PlayerId,
        media_sequence: u64,
        segments: usize,
    },
    /// No decoder can play the address.
    PlayerUnsupported { player_id: PlayerId },
    PlayerFailed { player_id: PlayerId, reason: String },
    /// Fallback for placeholder wiring.
    NoOp,
}
