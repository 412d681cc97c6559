//! Stream wall engine: decoder sessions, persistence and file IO.
mod decoder;
mod engine;
mod persist;
mod player;
mod playlist;
mod sink;
mod store;
mod types;

pub use decoder::{Decoder, DecoderSet, FetchSettings, FileDecoder, HttpDecoder};
pub use engine::{EngineHandle, EngineSettings};
pub use persist::{ensure_dir, AtomicFileWriter, PersistError};
pub use player::{MediaElement, MediaState, PlayerContext, PlayerSettings, StreamPlayer};
pub use playlist::{
    parse_playlist, MasterPlaylist, MediaPlaylist, Playlist, PlaylistError, Segment, Variant,
};
pub use sink::{ChannelEventSink, EventSink};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError, UrlSnapshot};
pub use types::{DecodeError, EngineEvent, FailureKind, PlaybackControl, PlayerEvent, PlayerId};
