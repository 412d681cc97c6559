use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

use crate::view_model::{AppViewModel, CardView};
use crate::{Effect, PlaybackCommand, PlayerId, PlayerSlot, Toast, DEFAULT_TOAST_DURATION};

/// Every accepted stream address ends with this marker.
pub const STREAM_SUFFIX: &str = ".m3u8";

pub fn is_stream_address(candidate: &str) -> bool {
    candidate.ends_with(STREAM_SUFFIX)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WallSettings {
    /// Persist the active list after every mutation.
    pub auto_save: bool,
    pub toast_duration: Duration,
    pub columns: usize,
}

impl Default for WallSettings {
    fn default() -> Self {
        Self {
            auto_save: true,
            toast_duration: DEFAULT_TOAST_DURATION,
            columns: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    settings: WallSettings,
    input: String,
    urls: Vec<String>,
    players: BTreeMap<String, PlayerSlot>,
    next_player_id: PlayerId,
    columns: usize,
    toast: Toast,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::with_settings(WallSettings::default())
    }

    pub fn with_settings(settings: WallSettings) -> Self {
        Self {
            columns: settings.columns.max(1),
            settings,
            input: String::new(),
            urls: Vec::new(),
            players: BTreeMap::new(),
            next_player_id: 1,
            toast: Toast::default(),
            dirty: false,
        }
    }

    pub fn view(&self) -> AppViewModel {
        let cards = self
            .urls
            .iter()
            .enumerate()
            .filter_map(|(idx, url)| {
                self.players.get(url).map(|slot| CardView {
                    index: idx + 1,
                    url: url.clone(),
                    status: slot.status.clone(),
                    muted: slot.muted,
                    media_sequence: slot.media_sequence,
                    segments: slot.segments,
                })
            })
            .collect();

        AppViewModel {
            input: self.input.clone(),
            columns: self.columns,
            cards,
            toast: self.toast.visible_message().map(ToOwned::to_owned),
            dirty: self.dirty,
        }
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn player(&self, url: &str) -> Option<&PlayerSlot> {
        self.players.get(url)
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_input(&mut self, text: String) {
        if self.input != text {
            self.input = text;
            self.mark_dirty();
        }
    }

    pub(crate) fn clear_input(&mut self) {
        self.set_input(String::new());
    }

    pub(crate) fn contains(&self, url: &str) -> bool {
        self.urls.iter().any(|existing| existing == url)
    }

    pub(crate) fn push_url(&mut self, url: String) {
        self.urls.push(url);
        self.mark_dirty();
    }

    pub(crate) fn remove_url(&mut self, url: &str) -> bool {
        let before = self.urls.len();
        self.urls.retain(|existing| existing != url);
        let removed = self.urls.len() != before;
        if removed {
            self.mark_dirty();
        }
        removed
    }

    /// Replaces the active list wholesale, dropping repeated addresses.
    pub(crate) fn replace_urls(&mut self, urls: Vec<String>) {
        self.urls = dedupe_preserving_order(urls);
        self.mark_dirty();
    }

    pub(crate) fn set_columns(&mut self, columns: usize) {
        if columns > 0 && columns != self.columns {
            self.columns = columns;
            self.mark_dirty();
        }
    }

    pub(crate) fn notify(&mut self, message: impl Into<String>) -> Effect {
        self.mark_dirty();
        self.toast.show(message, self.settings.toast_duration)
    }

    pub(crate) fn hide_toast(&mut self) {
        if self.toast.visible_message().is_some() {
            self.toast.hide();
            self.mark_dirty();
        }
    }

    pub(crate) fn persist_effect(&self) -> Option<Effect> {
        self.settings
            .auto_save
            .then(|| Effect::PersistUrls(self.urls.clone()))
    }

    /// Brings the player slots in line with the active list: slots whose
    /// address left the list are destroyed, new addresses get a fresh slot.
    /// Afterwards the slot keys equal the list contents.
    pub(crate) fn reconcile(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();

        let active: HashSet<&str> = self.urls.iter().map(String::as_str).collect();
        let stale: Vec<String> = self
            .players
            .keys()
            .filter(|url| !active.contains(url.as_str()))
            .cloned()
            .collect();
        for url in stale {
            if let Some(slot) = self.players.remove(&url) {
                effects.push(Effect::DestroyPlayer { player_id: slot.id });
            }
        }

        for url in &self.urls {
            if self.players.contains_key(url) {
                continue;
            }
            let player_id = self.next_player_id;
            self.next_player_id += 1;
            self.players
                .insert(url.clone(), PlayerSlot::new(player_id, url.clone()));
            effects.push(Effect::AttachPlayer {
                player_id,
                url: url.clone(),
            });
        }

        if !effects.is_empty() {
            self.mark_dirty();
        }
        effects
    }

    pub(crate) fn broadcast(&mut self, command: PlaybackCommand) -> Vec<Effect> {
        let effects: Vec<Effect> = self
            .players
            .values_mut()
            .filter_map(|slot| slot.apply(command))
            .collect();
        if !effects.is_empty() {
            self.mark_dirty();
        }
        effects
    }

    pub(crate) fn toggle_mute(&mut self, url: &str) -> Option<Effect> {
        let effect = self.players.get_mut(url)?.toggle_mute();
        if effect.is_some() {
            self.mark_dirty();
        }
        effect
    }

    /// Applies an engine report to the slot with `player_id`. Reports for
    /// players that no longer exist are ignored.
    pub(crate) fn apply_player_event(
        &mut self,
        player_id: PlayerId,
        apply: impl FnOnce(&mut PlayerSlot),
    ) -> bool {
        let Some(slot) = self.players.values_mut().find(|slot| slot.id == player_id) else {
            return false;
        };
        apply(slot);
        self.mark_dirty();
        true
    }
}

pub(crate) fn dedupe_preserving_order(urls: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.into_iter()
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_check_is_exact() {
        assert!(is_stream_address("https://x/y.m3u8"));
        assert!(!is_stream_address("https://x/y.m3u8?token=1"));
        assert!(!is_stream_address("https://x/y.M3U8"));
        assert!(!is_stream_address(""));
    }

    #[test]
    fn dedupe_keeps_first_occurrence() {
        let urls = vec!["b".to_string(), "a".to_string(), "b".to_string()];
        assert_eq!(dedupe_preserving_order(urls), vec!["b", "a"]);
    }

    #[test]
    fn reconcile_reuses_existing_slots() {
        let mut state = AppState::new();
        state.push_url("a.m3u8".to_string());
        let first = state.reconcile();
        assert_eq!(first.len(), 1);

        state.push_url("b.m3u8".to_string());
        let second = state.reconcile();
        assert_eq!(
            second,
            vec![Effect::AttachPlayer {
                player_id: 2,
                url: "b.m3u8".to_string()
            }]
        );
        assert_eq!(state.player("a.m3u8").map(|slot| slot.id), Some(1));
    }
}
