use wall_logging::{wall_debug, wall_info, wall_warn};

use crate::{
    is_stream_address, parse_import, AppState, Effect, ImportError, Msg, PlaybackCommand, PlayerId,
    PlayerSlot, PlayerStatus,
};

const MSG_INVALID_ADDRESS: &str = "Enter valid m3u8 URL";
const MSG_DUPLICATE_ADDRESS: &str = "Already added";
const MSG_EXPORTED: &str = "Exported successfully";
const MSG_EXPORT_FAILED: &str = "Export failed";
const MSG_IMPORT_FORMAT: &str = "Invalid JSON format";
const MSG_IMPORT_READ: &str = "Error reading file";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::AddSubmitted => add_from_input(&mut state),
        Msg::RemoveClicked(url) => remove_url(&mut state, &url),
        Msg::ToggleMuteClicked(url) => state.toggle_mute(&url).into_iter().collect(),
        Msg::ClearAllClicked => clear_all(&mut state),
        Msg::PlayAllClicked => state.broadcast(PlaybackCommand::Play),
        Msg::PauseAllClicked => state.broadcast(PlaybackCommand::Pause),
        Msg::MuteAllClicked => state.broadcast(PlaybackCommand::Mute),
        Msg::UnmuteAllClicked => state.broadcast(PlaybackCommand::Unmute),
        Msg::GridColumnsChanged(columns) => {
            state.set_columns(columns);
            Vec::new()
        }
        Msg::ExportClicked => vec![Effect::ExportUrls(state.urls().to_vec())],
        Msg::ExportFinished(result) => {
            let message = match result {
                Ok(path) => {
                    wall_info!("Exported {} streams to {}", state.urls().len(), path);
                    MSG_EXPORTED
                }
                Err(err) => {
                    wall_warn!("Export failed: {}", err);
                    MSG_EXPORT_FAILED
                }
            };
            vec![state.notify(message)]
        }
        // A cancelled picker selects nothing. The path is not retained, so
        // picking the same file again triggers a fresh read.
        Msg::ImportFileSelected(None) => Vec::new(),
        Msg::ImportFileSelected(Some(path)) => vec![Effect::ReadImportFile(path)],
        Msg::ImportFileRead(result) => import(&mut state, result),
        Msg::RestoreUrls(urls) => {
            wall_info!("Restoring {} persisted streams", urls.len());
            state.replace_urls(urls);
            state.reconcile()
        }
        Msg::ToastExpired => {
            state.hide_toast();
            Vec::new()
        }
        Msg::PlayerReady { player_id } => {
            player_event(&mut state, player_id, |slot| {
                slot.status = PlayerStatus::Playing;
            });
            Vec::new()
        }
        Msg::PlayerProgress {
            player_id,
            media_sequence,
            segments,
        } => {
            player_event(&mut state, player_id, |slot| {
                slot.media_sequence = Some(media_sequence);
                slot.segments = Some(segments);
            });
            Vec::new()
        }
        Msg::PlayerUnsupported { player_id } => {
            player_event(&mut state, player_id, |slot| {
                slot.status = PlayerStatus::Unsupported;
            });
            Vec::new()
        }
        Msg::PlayerFailed { player_id, reason } => {
            player_event(&mut state, player_id, |slot| {
                slot.status = PlayerStatus::Failed(reason);
            });
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn add_from_input(state: &mut AppState) -> Vec<Effect> {
    let url = state.input().trim().to_string();
    if !is_stream_address(&url) {
        return vec![state.notify(MSG_INVALID_ADDRESS)];
    }
    if state.contains(&url) {
        return vec![state.notify(MSG_DUPLICATE_ADDRESS)];
    }

    wall_info!("Adding stream {}", url);
    state.push_url(url);
    state.clear_input();
    let mut effects = state.reconcile();
    effects.extend(state.persist_effect());
    effects
}

fn remove_url(state: &mut AppState, url: &str) -> Vec<Effect> {
    if !state.remove_url(url) {
        wall_debug!("Remove ignored for unknown stream {}", url);
        return Vec::new();
    }
    wall_info!("Removed stream {}", url);
    let mut effects = state.reconcile();
    effects.extend(state.persist_effect());
    effects
}

fn clear_all(state: &mut AppState) -> Vec<Effect> {
    state.replace_urls(Vec::new());
    let mut effects = state.reconcile();
    effects.push(Effect::ClearPersisted);
    effects
}

fn import(state: &mut AppState, result: Result<String, String>) -> Vec<Effect> {
    let text = match result {
        Ok(text) => text,
        Err(err) => {
            wall_warn!("Import read failed: {}", err);
            return vec![state.notify(MSG_IMPORT_READ)];
        }
    };

    let urls = match parse_import(&text) {
        Ok(urls) => urls,
        Err(ImportError::MissingUrls) => {
            return vec![state.notify(MSG_IMPORT_FORMAT)];
        }
        Err(err @ ImportError::Parse(_)) => {
            wall_warn!("Import parse failed: {}", err);
            return vec![state.notify(MSG_IMPORT_READ)];
        }
    };

    let count = urls.len();
    state.replace_urls(urls);
    let mut effects = state.reconcile();
    effects.extend(state.persist_effect());
    effects.push(state.notify(format!("Imported {count} streams")));
    effects
}

fn player_event(
    state: &mut AppState,
    player_id: PlayerId,
    apply: impl FnOnce(&mut PlayerSlot),
) {
    if !state.apply_player_event(player_id, apply) {
        wall_debug!("Ignoring event for released player {}", player_id);
    }
}
