//! Plain-text rendering of tracker cards.

use std::fmt::Write;

use waveplates_core::{DeltaButton, TrackerCard};

pub const EMPTY_STATE: &str =
    "No trackers yet. Add one with: waveplates add <name> --stamina <n> --next <mm:ss>";

pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn buttons(sign: char, buttons: &[DeltaButton]) -> String {
    buttons
        .iter()
        .map(|b| {
            if b.enabled {
                format!("{sign}{}", b.amount)
            } else {
                format!("({sign}{})", b.amount)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn card(card: &TrackerCard) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}  [{}]", card.name(), short_id(card.id()));
    match card {
        TrackerCard::Live {
            snapshot,
            spend,
            gain,
            ..
        } => {
            let _ = writeln!(out, "  {} / {}", snapshot.current, snapshot.max);
            let _ = writeln!(out, "  full in {}", snapshot.full_in);
            let _ = writeln!(out, "  next stamina in {}", snapshot.next_in);
            if !spend.is_empty() {
                let _ = writeln!(out, "  spend: {}", buttons('-', spend));
            }
            if !gain.is_empty() {
                let _ = writeln!(out, "  gain:  {}", buttons('+', gain));
            }
        }
        TrackerCard::Stale {
            current,
            max,
            message,
            ..
        } => {
            let _ = writeln!(out, "  {current} / {max}");
            let _ = writeln!(out, "  {message}");
        }
    }
    out
}

pub fn cards(cards: &[TrackerCard]) -> String {
    if cards.is_empty() {
        return format!("{EMPTY_STATE}\n");
    }
    cards.iter().map(card).collect::<Vec<_>>().join("\n")
}
