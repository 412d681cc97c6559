//! Stream wall core: pure state machine and view-model helpers.
mod effect;
mod msg;
mod player;
mod state;
mod toast;
mod transfer;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use player::{PlaybackCommand, PlayerId, PlayerSlot, PlayerStatus};
pub use state::{is_stream_address, AppState, WallSettings, STREAM_SUFFIX};
pub use toast::{Toast, DEFAULT_TOAST_DURATION};
pub use transfer::{parse_import, ExportDocument, ImportError, EXPORT_VERSION};
pub use update::update;
pub use view_model::{AppViewModel, CardView};
