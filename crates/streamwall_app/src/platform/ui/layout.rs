//! Text grid geometry.

use super::constants::{CARD_GAP, ELLIPSIS, MIN_CARD_WIDTH};

/// Columns that fit in `screen_width` without squeezing a card below
/// `MIN_CARD_WIDTH`. Never less than one.
pub fn fitted_columns(screen_width: usize, requested: usize) -> usize {
    let fit = (screen_width + CARD_GAP) / (MIN_CARD_WIDTH + CARD_GAP);
    requested.min(fit).max(1)
}

pub fn card_width(screen_width: usize, columns: usize) -> usize {
    let columns = columns.max(1);
    let gaps = CARD_GAP * (columns - 1);
    (screen_width.saturating_sub(gaps) / columns).max(MIN_CARD_WIDTH)
}

/// Shortens `text` to `width` characters, marking the cut with an ellipsis.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(width - 1).collect();
    out.push(ELLIPSIS);
    out
}

pub fn pad(text: &str, width: usize) -> String {
    let truncated = truncate(text, width);
    let fill = width - truncated.chars().count();
    format!("{truncated}{}", " ".repeat(fill))
}
