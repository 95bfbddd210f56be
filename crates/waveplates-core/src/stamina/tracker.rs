//! Tracker records.
//!
//! A tracker stores a single instant, the cap time, instead of a stamina
//! count. Everything the user sees is derived from it and the wall clock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::arithmetic::{compute_cap_time, validate_rates};
use crate::error::ValidationError;

pub(crate) const MS_PER_MINUTE: i64 = 60_000;

/// One tracked account/game configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tracker {
    pub id: String,
    pub name: String,
    /// Instant at which the resource reaches `max_capacity`.
    pub cap_time: DateTime<Utc>,
    pub max_capacity: u32,
    /// Minutes needed to regenerate one unit.
    pub minutes_per_unit: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tracker {
    /// Length of one regeneration unit in milliseconds.
    pub fn unit_ms(&self) -> i64 {
        i64::from(self.minutes_per_unit) * MS_PER_MINUTE
    }

    /// Reject trackers whose capacity or rate is zero.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_rates(self.max_capacity, self.minutes_per_unit)
    }
}

/// A tracker that has not been stored yet and so has no id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTracker {
    pub name: String,
    pub cap_time: DateTime<Utc>,
    pub max_capacity: u32,
    pub minutes_per_unit: u32,
}

impl NewTracker {
    /// Build a tracker from what the user reads off the game screen at `now`:
    /// the current amount and the `mm:ss` countdown to the next unit.
    pub fn from_observation(
        name: &str,
        current_amount: u32,
        time_to_next: &str,
        max_capacity: u32,
        minutes_per_unit: u32,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::invalid("name", "must not be empty"));
        }
        let cap_time = compute_cap_time(
            current_amount,
            time_to_next,
            max_capacity,
            minutes_per_unit,
            now,
        )?;
        Ok(Self {
            name: name.to_string(),
            cap_time,
            max_capacity,
            minutes_per_unit,
        })
    }

    pub fn into_tracker(self, id: String, now: DateTime<Utc>) -> Tracker {
        Tracker {
            id,
            name: self.name,
            cap_time: self.cap_time,
            max_capacity: self.max_capacity,
            minutes_per_unit: self.minutes_per_unit,
            created_at: now,
            updated_at: now,
        }
    }
}
