use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use streamwall_engine::{
    parse_playlist, DecodeError, Decoder, DecoderSet, EngineEvent, EventSink, FailureKind,
    MediaState, PlayerContext, PlayerEvent, PlayerSettings, Playlist, StreamPlayer,
};
use tokio::sync::{mpsc, Notify, Semaphore};

const MASTER: &str = "#EXTM3U\n#EXT-X-STREAM-INF:BANDWIDTH=1000\nhd.m3u8\n";
const LIVE: &str = "#EXTM3U\n#EXT-X-TARGETDURATION:1\n#EXT-X-MEDIA-SEQUENCE:10\n#EXTINF:1.0,\na.ts\n";
const VOD: &str = "#EXTM3U\n#EXT-X-TARGETDURATION:1\n#EXTINF:1.0,\na.ts\n#EXT-X-ENDLIST\n";

struct TestSink {
    tx: mpsc::UnboundedSender<EngineEvent>,
}

impl EventSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Serves canned playlists by address, optionally holding every load until
/// the gate is opened.
#[derive(Default)]
struct ScriptedDecoder {
    playlists: HashMap<String, String>,
    gate: Option<Arc<Notify>>,
    loads: AtomicUsize,
}

impl ScriptedDecoder {
    fn with(entries: &[(&str, &str)]) -> Self {
        Self {
            playlists: entries
                .iter()
                .map(|(address, text)| (address.to_string(), text.to_string()))
                .collect(),
            ..Self::default()
        }
    }
}

#[async_trait::async_trait]
impl Decoder for ScriptedDecoder {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn can_play(&self, address: &str) -> bool {
        address.starts_with("test://")
    }

    async fn load(&self, address: &str) -> Result<Playlist, DecodeError> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.loads.fetch_add(1, Ordering::SeqCst);
        let text = self
            .playlists
            .get(address)
            .ok_or_else(|| DecodeError::new(FailureKind::HttpStatus(404), address))?;
        parse_playlist(text).map_err(|err| DecodeError::new(FailureKind::Playlist, err.to_string()))
    }

    fn resolve(&self, base: &str, reference: &str) -> Result<String, DecodeError> {
        let dir = base.rsplit_once('/').map(|(dir, _)| dir).unwrap_or(base);
        Ok(format!("{dir}/{reference}"))
    }
}

fn context(decoder: Arc<ScriptedDecoder>) -> (PlayerContext, mpsc::UnboundedReceiver<EngineEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let decoder: Arc<dyn Decoder> = decoder;
    let ctx = PlayerContext {
        runtime: tokio::runtime::Handle::current(),
        decoders: DecoderSet::new(vec![decoder]),
        limiter: Arc::new(Semaphore::new(8)),
        settings: PlayerSettings {
            min_refresh: Duration::from_millis(20),
        },
        sink: Arc::new(TestSink { tx }),
    };
    (ctx, rx)
}

async fn next_event(rx: &mut mpsc::UnboundedReceiver<EngineEvent>) -> EngineEvent {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("event before timeout")
        .expect("sink open")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn manifest_parsed_attaches_muted_and_playing() {
    let decoder = Arc::new(ScriptedDecoder::with(&[("test://cdn/vod.m3u8", VOD)]));
    let (ctx, mut rx) = context(decoder);

    let player = StreamPlayer::spawn(&ctx, 1, "test://cdn/vod.m3u8");
    assert_eq!(player.id(), 1);
    assert_eq!(player.address(), "test://cdn/vod.m3u8");

    assert_eq!(
        next_event(&mut rx).await,
        EngineEvent::Player(PlayerEvent::ManifestParsed { player_id: 1 })
    );
    assert_eq!(
        player.media().state(),
        MediaState {
            attached: true,
            muted: true,
            paused: false,
        }
    );
    assert_eq!(
        next_event(&mut rx).await,
        EngineEvent::Player(PlayerEvent::Progress {
            player_id: 1,
            media_sequence: 0,
            segments: 1,
        })
    );

    player.unmute();
    player.pause();
    assert_eq!(
        player.media().state(),
        MediaState {
            attached: true,
            muted: false,
            paused: true,
        }
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn master_playlist_follows_first_variant() {
    let decoder = Arc::new(ScriptedDecoder::with(&[
        ("test://cdn/master.m3u8", MASTER),
        ("test://cdn/hd.m3u8", LIVE),
    ]));
    let (ctx, mut rx) = context(decoder);

    let mut player = StreamPlayer::spawn(&ctx, 3, "test://cdn/master.m3u8");

    assert_eq!(
        next_event(&mut rx).await,
        EngineEvent::Player(PlayerEvent::ManifestParsed { player_id: 3 })
    );
    assert_eq!(
        next_event(&mut rx).await,
        EngineEvent::Player(PlayerEvent::Progress {
            player_id: 3,
            media_sequence: 10,
            segments: 1,
        })
    );
    player.destroy();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn live_playlist_is_refreshed_until_paused() {
    let decoder = Arc::new(ScriptedDecoder::with(&[("test://cdn/live.m3u8", LIVE)]));
    let (ctx, mut rx) = context(decoder.clone());

    let mut player = StreamPlayer::spawn(&ctx, 4, "test://cdn/live.m3u8");
    let _ready = next_event(&mut rx).await;
    let _first = next_event(&mut rx).await;

    // Target duration is one second; the refresh arrives after it.
    assert!(matches!(
        next_event(&mut rx).await,
        EngineEvent::Player(PlayerEvent::Progress { player_id: 4, .. })
    ));

    player.pause();
    let loads = decoder.loads.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(decoder.loads.load(Ordering::SeqCst), loads);

    player.destroy();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unsupported_address_reports_inline() {
    let decoder = Arc::new(ScriptedDecoder::default());
    let (ctx, mut rx) = context(decoder);

    let player = StreamPlayer::spawn(&ctx, 5, "https://x/y.m3u8");

    assert_eq!(
        next_event(&mut rx).await,
        EngineEvent::Player(PlayerEvent::Unsupported { player_id: 5 })
    );
    player.play();
    assert_eq!(player.media().state(), MediaState::default());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn load_failure_reports_error() {
    let decoder = Arc::new(ScriptedDecoder::default());
    let (ctx, mut rx) = context(decoder);

    let _player = StreamPlayer::spawn(&ctx, 6, "test://cdn/missing.m3u8");

    match next_event(&mut rx).await {
        EngineEvent::Player(PlayerEvent::Failed { player_id, error }) => {
            assert_eq!(player_id, 6);
            assert_eq!(error.kind, FailureKind::HttpStatus(404));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn controls_before_attach_and_after_destroy_are_noops() {
    let gate = Arc::new(Notify::new());
    let decoder = Arc::new(ScriptedDecoder {
        gate: Some(gate.clone()),
        ..ScriptedDecoder::with(&[("test://cdn/vod.m3u8", VOD)])
    });
    let (ctx, mut rx) = context(decoder.clone());

    let mut player = StreamPlayer::spawn(&ctx, 7, "test://cdn/vod.m3u8");
    player.unmute();
    player.play();
    assert_eq!(player.media().state(), MediaState::default());

    // Destroy while the manifest load is still pending.
    player.destroy();
    player.destroy();
    assert!(player.is_released());
    gate.notify_waiters();

    let late = tokio::time::timeout(Duration::from_millis(300), rx.recv()).await;
    assert!(late.is_err(), "no event after destroy, got {late:?}");
    player.unmute();
    assert!(player.media().state().muted);
}
