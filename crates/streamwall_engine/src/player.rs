use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::{watch, Semaphore};
use tokio_util::sync::CancellationToken;
use wall_logging::{wall_debug, wall_info, wall_warn};

use crate::decoder::{Decoder, DecoderSet};
use crate::playlist::{MediaPlaylist, Playlist};
use crate::{
    DecodeError, EngineEvent, EventSink, FailureKind, PlaybackControl, PlayerEvent, PlayerId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaState {
    /// Set once the decoder has a playlist to play; controls are ignored
    /// before that.
    pub attached: bool,
    pub muted: bool,
    pub paused: bool,
}

impl Default for MediaState {
    fn default() -> Self {
        Self {
            attached: false,
            muted: true,
            paused: true,
        }
    }
}

/// Playback state shared between a player handle and its session task.
#[derive(Debug, Clone)]
pub struct MediaElement {
    state: Arc<watch::Sender<MediaState>>,
}

impl Default for MediaElement {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaElement {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(MediaState::default());
        Self { state: Arc::new(tx) }
    }

    pub fn state(&self) -> MediaState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<MediaState> {
        self.state.subscribe()
    }

    /// Attaches muted and starts playing.
    pub(crate) fn attach(&self) {
        self.state.send_modify(|state| {
            state.attached = true;
            state.muted = true;
            state.paused = false;
        });
    }

    /// Applies a control; a no-op while detached. Returns whether the state
    /// changed.
    pub fn apply(&self, control: PlaybackControl) -> bool {
        self.state.send_if_modified(|state| {
            if !state.attached {
                return false;
            }
            let before = *state;
            match control {
                PlaybackControl::Play => state.paused = false,
                PlaybackControl::Pause => state.paused = true,
                PlaybackControl::Mute => state.muted = true,
                PlaybackControl::Unmute => state.muted = false,
            }
            *state != before
        })
    }
}

#[derive(Debug, Clone)]
pub struct PlayerSettings {
    /// Lower bound on the live playlist reload interval.
    pub min_refresh: Duration,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            min_refresh: Duration::from_secs(1),
        }
    }
}

/// Shared resources every player session needs.
#[derive(Clone)]
pub struct PlayerContext {
    pub runtime: Handle,
    pub decoders: DecoderSet,
    /// Caps the number of manifest loads in flight.
    pub limiter: Arc<Semaphore>,
    pub settings: PlayerSettings,
    pub sink: Arc<dyn EventSink>,
}

/// Playback wrapper for one stream address. Holds the media element handle
/// from construction on; every control after `destroy` is a no-op.
pub struct StreamPlayer {
    id: PlayerId,
    address: String,
    media: MediaElement,
    cancel: CancellationToken,
    released: bool,
}

impl StreamPlayer {
    pub fn spawn(ctx: &PlayerContext, id: PlayerId, address: impl Into<String>) -> Self {
        let address = address.into();
        let media = MediaElement::new();
        let cancel = CancellationToken::new();

        match ctx.decoders.select(&address) {
            Some(decoder) => {
                wall_info!("Player {} attaching {} via {}", id, address, decoder.name());
                let session = Session {
                    id,
                    address: address.clone(),
                    decoder,
                    media: media.clone(),
                    cancel: cancel.clone(),
                    limiter: ctx.limiter.clone(),
                    settings: ctx.settings.clone(),
                    sink: ctx.sink.clone(),
                };
                ctx.runtime.spawn(session.run());
            }
            None => {
                wall_warn!("Player {}: no decoder can play {}", id, address);
                ctx.sink
                    .emit(EngineEvent::Player(PlayerEvent::Unsupported { player_id: id }));
            }
        }

        Self {
            id,
            address,
            media,
            cancel,
            released: false,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn media(&self) -> &MediaElement {
        &self.media
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub fn control(&self, control: PlaybackControl) {
        if self.released {
            return;
        }
        if self.media.apply(control) {
            wall_debug!("Player {} {:?}", self.id, control);
        }
    }

    pub fn play(&self) {
        self.control(PlaybackControl::Play);
    }

    pub fn pause(&self) {
        self.control(PlaybackControl::Pause);
    }

    pub fn mute(&self) {
        self.control(PlaybackControl::Mute);
    }

    pub fn unmute(&self) {
        self.control(PlaybackControl::Unmute);
    }

    /// Cancels the session. Safe to call more than once.
    pub fn destroy(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.cancel.cancel();
        wall_info!("Player {} released {}", self.id, self.address);
    }
}

impl Drop for StreamPlayer {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

struct Session {
    id: PlayerId,
    address: String,
    decoder: Arc<dyn Decoder>,
    media: MediaElement,
    cancel: CancellationToken,
    limiter: Arc<Semaphore>,
    settings: PlayerSettings,
    sink: Arc<dyn EventSink>,
}

impl Session {
    async fn run(self) {
        let loaded = tokio::select! {
            _ = self.cancel.cancelled() => return,
            loaded = self.load_media_playlist() => loaded,
        };
        let (media_address, mut playlist) = match loaded {
            Ok(loaded) => loaded,
            Err(error) => return self.fail(error),
        };

        self.media.attach();
        self.emit(PlayerEvent::ManifestParsed { player_id: self.id });
        self.report_progress(&playlist);

        let mut control = self.media.subscribe();
        while playlist.is_live() {
            if control.borrow_and_update().paused {
                tokio::select! {
                    _ = self.cancel.cancelled() => return,
                    changed = control.changed() => {
                        if changed.is_err() {
                            return;
                        }
                        continue;
                    }
                }
            }

            let wait = playlist.refresh_interval(self.settings.min_refresh);
            tokio::select! {
                _ = self.cancel.cancelled() => return,
                _ = tokio::time::sleep(wait) => {}
                changed = control.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    continue;
                }
            }

            let reloaded = tokio::select! {
                _ = self.cancel.cancelled() => return,
                reloaded = self.decoder.load(&media_address) => reloaded,
            };
            match reloaded {
                Ok(Playlist::Media(next)) => {
                    playlist = next;
                    self.report_progress(&playlist);
                }
                Ok(Playlist::Master(_)) => {
                    return self.fail(DecodeError::new(
                        FailureKind::Playlist,
                        "media playlist turned into a master playlist",
                    ));
                }
                Err(error) => return self.fail(error),
            }
        }
        wall_debug!("Player {} reached end of playlist", self.id);
    }

    /// Loads the address and, for a master playlist, its first variant.
    async fn load_media_playlist(&self) -> Result<(String, MediaPlaylist), DecodeError> {
        let _permit = self
            .limiter
            .acquire()
            .await
            .map_err(|_| DecodeError::new(FailureKind::Cancelled, "engine shutting down"))?;

        match self.decoder.load(&self.address).await? {
            Playlist::Media(media) => Ok((self.address.clone(), media)),
            Playlist::Master(master) => {
                let variant = master.variants.first().ok_or_else(|| {
                    DecodeError::new(FailureKind::Playlist, "master playlist without variants")
                })?;
                let variant_address = self.decoder.resolve(&self.address, &variant.uri)?;
                wall_debug!("Player {} selected variant {}", self.id, variant_address);
                match self.decoder.load(&variant_address).await? {
                    Playlist::Media(media) => Ok((variant_address, media)),
                    Playlist::Master(_) => Err(DecodeError::new(
                        FailureKind::Playlist,
                        "nested master playlist",
                    )),
                }
            }
        }
    }

    fn report_progress(&self, playlist: &MediaPlaylist) {
        self.emit(PlayerEvent::Progress {
            player_id: self.id,
            media_sequence: playlist.media_sequence,
            segments: playlist.segments.len(),
        });
    }

    fn fail(&self, error: DecodeError) {
        if self.cancel.is_cancelled() {
            return;
        }
        wall_warn!("Player {} failed on {}: {}", self.id, self.address, error);
        self.emit(PlayerEvent::Failed {
            player_id: self.id,
            error,
        });
    }

    fn emit(&self, event: PlayerEvent) {
        if !self.cancel.is_cancelled() {
            self.sink.emit(EngineEvent::Player(event));
        }
    }
}
