use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use tokio::sync::Semaphore;
use wall_logging::{wall_debug, wall_info};

use crate::decoder::{DecoderSet, FetchSettings};
use crate::persist::AtomicFileWriter;
use crate::player::{PlayerContext, PlayerSettings, StreamPlayer};
use crate::{EngineEvent, EventSink, PlaybackControl, PlayerId};

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub fetch: FetchSettings,
    pub player: PlayerSettings,
    pub max_concurrent_players: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            fetch: FetchSettings::default(),
            player: PlayerSettings::default(),
            max_concurrent_players: 8,
        }
    }
}

enum EngineCommand {
    Attach { player_id: PlayerId, address: String },
    Destroy { player_id: PlayerId },
    Control {
        player_id: PlayerId,
        control: PlaybackControl,
    },
    ReadText { path: PathBuf },
    WriteFile {
        dir: PathBuf,
        filename: String,
        contents: String,
    },
}

/// Handle to the engine thread. Dropping every handle stops the thread and
/// releases all players.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(settings: EngineSettings, sink: Arc<dyn EventSink>) -> io::Result<Self> {
        let decoders = DecoderSet::standard(settings.fetch.clone());
        Self::with_decoders(settings, decoders, sink)
    }

    pub fn with_decoders(
        settings: EngineSettings,
        decoders: DecoderSet,
        sink: Arc<dyn EventSink>,
    ) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("streamwall-engine")
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();

        let ctx = PlayerContext {
            runtime: runtime.handle().clone(),
            decoders,
            limiter: Arc::new(Semaphore::new(settings.max_concurrent_players.max(1))),
            settings: settings.player,
            sink,
        };

        thread::Builder::new()
            .name("streamwall-engine-cmd".to_string())
            .spawn(move || {
                let mut players: HashMap<PlayerId, StreamPlayer> = HashMap::new();
                while let Ok(command) = cmd_rx.recv() {
                    handle_command(&ctx, &mut players, command);
                }
                for player in players.values_mut() {
                    player.destroy();
                }
                drop(players);
                ctx.limiter.close();
                runtime.shutdown_timeout(Duration::from_secs(1));
                wall_info!("Engine stopped");
            })?;

        Ok(Self { cmd_tx })
    }

    pub fn attach(&self, player_id: PlayerId, address: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Attach {
            player_id,
            address: address.into(),
        });
    }

    pub fn destroy(&self, player_id: PlayerId) {
        let _ = self.cmd_tx.send(EngineCommand::Destroy { player_id });
    }

    pub fn control(&self, player_id: PlayerId, control: PlaybackControl) {
        let _ = self
            .cmd_tx
            .send(EngineCommand::Control { player_id, control });
    }

    /// Reads a file as UTF-8 text; completion arrives as `EngineEvent::ImportRead`.
    pub fn read_text(&self, path: impl Into<PathBuf>) {
        let _ = self.cmd_tx.send(EngineCommand::ReadText { path: path.into() });
    }

    /// Writes a file atomically; completion arrives as `EngineEvent::ExportWritten`.
    pub fn write_file(
        &self,
        dir: impl Into<PathBuf>,
        filename: impl Into<String>,
        contents: impl Into<String>,
    ) {
        let _ = self.cmd_tx.send(EngineCommand::WriteFile {
            dir: dir.into(),
            filename: filename.into(),
            contents: contents.into(),
        });
    }
}

fn handle_command(
    ctx: &PlayerContext,
    players: &mut HashMap<PlayerId, StreamPlayer>,
    command: EngineCommand,
) {
    match command {
        EngineCommand::Attach { player_id, address } => {
            let player = StreamPlayer::spawn(ctx, player_id, address);
            if let Some(mut previous) = players.insert(player_id, player) {
                previous.destroy();
            }
        }
        EngineCommand::Destroy { player_id } => match players.remove(&player_id) {
            Some(mut player) => player.destroy(),
            None => wall_debug!("Destroy for unknown player {}", player_id),
        },
        EngineCommand::Control { player_id, control } => {
            if let Some(player) = players.get(&player_id) {
                player.control(control);
            }
        }
        EngineCommand::ReadText { path } => {
            let sink = ctx.sink.clone();
            ctx.runtime.spawn(async move {
                let result = tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|err| err.to_string());
                sink.emit(EngineEvent::ImportRead { path, result });
            });
        }
        EngineCommand::WriteFile {
            dir,
            filename,
            contents,
        } => {
            let sink = ctx.sink.clone();
            ctx.runtime.spawn_blocking(move || {
                let result = AtomicFileWriter::new(dir)
                    .write(&filename, &contents)
                    .map_err(|err| err.to_string());
                sink.emit(EngineEvent::ExportWritten { result });
            });
        }
    }
}
