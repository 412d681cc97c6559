use crate::PlayerStatus;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub input: String,
    pub columns: usize,
    /// One card per active address, in display order.
    pub cards: Vec<CardView>,
    pub toast: Option<String>,
    pub dirty: bool,
}

impl AppViewModel {
    /// The grid shows its empty-state placeholder instead of cards.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    /// 1-based position, used by per-card commands.
    pub index: usize,
    pub url: String,
    pub status: PlayerStatus,
    pub muted: bool,
    pub media_sequence: Option<u64>,
    pub segments: Option<usize>,
}
