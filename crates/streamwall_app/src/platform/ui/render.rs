use streamwall_core::{AppViewModel, CardView, PlayerStatus};

use super::constants::*;
use super::layout::{card_width, fitted_columns, pad, truncate};

/// Renders the whole screen: header, notification, grid and prompt.
pub fn render(view: &AppViewModel, screen_width: usize, notice: Option<&str>) -> String {
    let mut out = String::from(CLEAR_SCREEN);

    out.push_str(&header(view));
    out.push('\n');
    out.push_str(&"─".repeat(screen_width));
    out.push('\n');

    if let Some(toast) = &view.toast {
        out.push_str(&format!("» {toast}\n"));
    }
    if let Some(notice) = notice {
        out.push_str(notice);
        out.push('\n');
    }
    out.push('\n');

    if view.is_empty() {
        out.push_str(EMPTY_STATE);
        out.push('\n');
    } else {
        render_grid(&mut out, view, screen_width);
    }

    out.push('\n');
    out.push_str(PROMPT);
    out
}

fn header(view: &AppViewModel) -> String {
    let noun = if view.cards.len() == 1 { "stream" } else { "streams" };
    format!(
        "{TITLE} | {} {noun} | {} columns | type help for commands",
        view.cards.len(),
        view.columns
    )
}

fn render_grid(out: &mut String, view: &AppViewModel, screen_width: usize) {
    let columns = fitted_columns(screen_width, view.columns);
    let width = card_width(screen_width, columns);
    let gap = " ".repeat(CARD_GAP);

    for row in view.cards.chunks(columns) {
        let cards: Vec<[String; 3]> = row.iter().map(|card| card_lines(card, width)).collect();
        for line in 0..3 {
            let joined = cards
                .iter()
                .map(|lines| lines[line].as_str())
                .collect::<Vec<_>>()
                .join(&gap);
            out.push_str(joined.trim_end());
            out.push('\n');
        }
        out.push('\n');
    }
}

fn card_lines(card: &CardView, width: usize) -> [String; 3] {
    let title = format!("{}. {}", card.index, card.url);
    let mute = if card.muted { LABEL_MUTED } else { LABEL_UNMUTED };
    let controls = format!("{mute} mute {0} | remove {0}", card.index);
    [
        pad(&title, width),
        pad(&status_text(card), width),
        pad(&truncate(&controls, width), width),
    ]
}

fn status_text(card: &CardView) -> String {
    match &card.status {
        PlayerStatus::Loading => "loading…".to_string(),
        PlayerStatus::Playing => match (card.media_sequence, card.segments) {
            (Some(sequence), Some(segments)) => {
                format!("playing, sequence {sequence}, {segments} segments")
            }
            _ => "playing".to_string(),
        },
        PlayerStatus::Paused => "paused".to_string(),
        PlayerStatus::Unsupported => UNSUPPORTED_TEXT.to_string(),
        PlayerStatus::Failed(reason) => format!("error: {reason}"),
    }
}
