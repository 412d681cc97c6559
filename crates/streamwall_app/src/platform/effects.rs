use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use chrono::Utc;
use streamwall_core::{Effect, ExportDocument, Msg, PlaybackCommand};
use streamwall_engine::{
    EngineEvent, EngineHandle, EventSink, PlaybackControl, PlayerEvent, UrlSnapshot,
};
use wall_logging::{wall_debug, wall_error, wall_info};

use super::app::AppEvent;

/// Forwards engine events to the app loop as core messages.
pub struct MsgSink {
    tx: mpsc::Sender<AppEvent>,
}

impl MsgSink {
    pub fn new(tx: mpsc::Sender<AppEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(AppEvent::Msg(map_event(event)));
    }
}

pub struct EffectRunner {
    engine: EngineHandle,
    snapshot: UrlSnapshot,
    export_dir: PathBuf,
    event_tx: mpsc::Sender<AppEvent>,
}

impl EffectRunner {
    pub fn new(
        engine: EngineHandle,
        snapshot: UrlSnapshot,
        export_dir: PathBuf,
        event_tx: mpsc::Sender<AppEvent>,
    ) -> Self {
        Self {
            engine,
            snapshot,
            export_dir,
            event_tx,
        }
    }

    pub fn load_snapshot(&self) -> Vec<String> {
        self.snapshot.load()
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::AttachPlayer { player_id, url } => {
                    self.engine.attach(player_id, url);
                }
                Effect::DestroyPlayer { player_id } => {
                    self.engine.destroy(player_id);
                }
                Effect::Playback { player_id, command } => {
                    self.engine.control(player_id, map_command(command));
                }
                Effect::PersistUrls(urls) => {
                    if let Err(err) = self.snapshot.save(&urls) {
                        wall_error!("Failed to persist {:?}: {}", self.snapshot.key(), err);
                    }
                }
                Effect::ClearPersisted => {
                    if let Err(err) = self.snapshot.clear() {
                        wall_error!("Failed to clear {:?}: {}", self.snapshot.key(), err);
                    }
                }
                Effect::ScheduleToastHide { after } => {
                    let tx = self.event_tx.clone();
                    thread::spawn(move || {
                        thread::sleep(after);
                        let _ = tx.send(AppEvent::Msg(Msg::ToastExpired));
                    });
                }
                Effect::ExportUrls(urls) => self.export(urls),
                Effect::ReadImportFile(path) => {
                    wall_info!("Importing {:?}", path);
                    self.engine.read_text(path);
                }
            }
        }
    }

    fn export(&self, urls: Vec<String>) {
        let document = ExportDocument::new(urls, Utc::now());
        match document.to_json_pretty() {
            Ok(text) => {
                wall_debug!("Exporting {} streams", document.urls.len());
                self.engine
                    .write_file(&self.export_dir, document.filename(), text);
            }
            Err(err) => {
                let _ = self
                    .event_tx
                    .send(AppEvent::Msg(Msg::ExportFinished(Err(err.to_string()))));
            }
        }
    }
}

fn map_command(command: PlaybackCommand) -> PlaybackControl {
    match command {
        PlaybackCommand::Play => PlaybackControl::Play,
        PlaybackCommand::Pause => PlaybackControl::Pause,
        PlaybackCommand::Mute => PlaybackControl::Mute,
        PlaybackCommand::Unmute => PlaybackControl::Unmute,
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Player(PlayerEvent::ManifestParsed { player_id }) => {
            Msg::PlayerReady { player_id }
        }
        EngineEvent::Player(PlayerEvent::Progress {
            player_id,
            media_sequence,
            segments,
        }) => Msg::PlayerProgress {
            player_id,
            media_sequence,
            segments,
        },
        EngineEvent::Player(PlayerEvent::Unsupported { player_id }) => {
            Msg::PlayerUnsupported { player_id }
        }
        EngineEvent::Player(PlayerEvent::Failed { player_id, error }) => Msg::PlayerFailed {
            player_id,
            reason: error.to_string(),
        },
        EngineEvent::ImportRead { result, .. } => Msg::ImportFileRead(result),
        EngineEvent::ExportWritten { result } => {
            Msg::ExportFinished(result.map(|path| path.display().to_string()))
        }
    }
}
