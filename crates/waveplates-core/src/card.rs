//! Render-ready view of a tracker at one instant.
//!
//! A card is rebuilt on every display tick and never written back. A stale
//! tracker gets a card without delta controls; deletion is the only action.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::stamina::{snapshot, StaminaSnapshot, Tracker};
use crate::storage::DeltasConfig;

pub const STALE_MESSAGE: &str = "Data no longer accurate. Please delete and re-add.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeltaButton {
    pub amount: u32,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum TrackerCard {
    Live {
        id: String,
        name: String,
        #[serde(flatten)]
        snapshot: StaminaSnapshot,
        spend: Vec<DeltaButton>,
        gain: Vec<DeltaButton>,
    },
    Stale {
        id: String,
        name: String,
        current: i64,
        max: u32,
        message: &'static str,
    },
}

impl TrackerCard {
    pub fn build(tracker: &Tracker, now: DateTime<Utc>, deltas: &DeltasConfig) -> Self {
        let snapshot = snapshot(tracker, now);
        if snapshot.stale {
            return TrackerCard::Stale {
                id: tracker.id.clone(),
                name: tracker.name.clone(),
                current: snapshot.current,
                max: snapshot.max,
                message: STALE_MESSAGE,
            };
        }

        let current = snapshot.current;
        let max = i64::from(snapshot.max);
        let spend = deltas
            .spend
            .iter()
            .map(|&amount| DeltaButton {
                amount,
                enabled: current >= i64::from(amount),
            })
            .collect();
        let gain = deltas
            .gain
            .iter()
            .map(|&amount| DeltaButton {
                amount,
                enabled: current + i64::from(amount) <= max,
            })
            .collect();

        TrackerCard::Live {
            id: tracker.id.clone(),
            name: tracker.name.clone(),
            snapshot,
            spend,
            gain,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            TrackerCard::Live { id, .. } | TrackerCard::Stale { id, .. } => id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            TrackerCard::Live { name, .. } | TrackerCard::Stale { name, .. } => name,
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, TrackerCard::Stale { .. })
    }
}
