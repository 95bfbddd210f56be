//! Conversions between the stored cap time and displayed stamina values.
//!
//! All arithmetic runs on whole milliseconds. The displayed amount only
//! increments at exact unit boundaries: a partially elapsed unit has not
//! regenerated yet.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::distance::format_distance;
use super::tracker::Tracker;
use crate::error::ValidationError;

/// Parse a `mm:ss` countdown into seconds.
///
/// Accepts exactly `^[0-5]?[0-9]:[0-5][0-9]$` after trimming whitespace.
pub fn parse_time_to_next(text: &str) -> Result<u32, ValidationError> {
    let text = text.trim();
    let invalid = || ValidationError::invalid("time_to_next", format!("expected mm:ss, got '{text}'"));

    let (min, sec) = text.split_once(':').ok_or_else(invalid)?;
    let min_ok = match min.as_bytes() {
        [d] => d.is_ascii_digit(),
        [t, d] => (b'0'..=b'5').contains(t) && d.is_ascii_digit(),
        _ => false,
    };
    let sec_ok = match sec.as_bytes() {
        [t, d] => (b'0'..=b'5').contains(t) && d.is_ascii_digit(),
        _ => false,
    };
    if !min_ok || !sec_ok {
        return Err(invalid());
    }

    let min: u32 = min.parse().map_err(|_| invalid())?;
    let sec: u32 = sec.parse().map_err(|_| invalid())?;
    Ok(min * 60 + sec)
}

pub(super) fn validate_rates(max_capacity: u32, minutes_per_unit: u32) -> Result<(), ValidationError> {
    if max_capacity == 0 {
        return Err(ValidationError::invalid("max_capacity", "must be at least 1"));
    }
    if minutes_per_unit == 0 {
        return Err(ValidationError::invalid("minutes_per_unit", "must be at least 1"));
    }
    Ok(())
}

/// Compute the instant at which a resource observed at `now` will be capped.
///
/// A countdown of `00:00` is read as a full unit still ahead, the same
/// instant [`time_to_next_unit`] renders as `{rate}:00`.
pub fn compute_cap_time(
    current_amount: u32,
    time_to_next: &str,
    max_capacity: u32,
    minutes_per_unit: u32,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, ValidationError> {
    validate_rates(max_capacity, minutes_per_unit)?;
    if current_amount > max_capacity {
        return Err(ValidationError::invalid(
            "stamina",
            format!("{current_amount} exceeds maximum of {max_capacity}"),
        ));
    }

    let unit_secs = i64::from(minutes_per_unit) * 60;
    let mut next_secs = i64::from(parse_time_to_next(time_to_next)?);
    if next_secs > unit_secs {
        return Err(ValidationError::invalid(
            "time_to_next",
            format!("longer than one unit ({minutes_per_unit} minutes)"),
        ));
    }
    if next_secs == 0 {
        next_secs = unit_secs;
    }

    let remaining_units = i64::from(max_capacity) - i64::from(current_amount) - 1;
    remaining_units
        .checked_mul(unit_secs)
        .and_then(|secs| secs.checked_add(next_secs))
        .and_then(Duration::try_seconds)
        .and_then(|until_cap| now.checked_add_signed(until_cap))
        .ok_or_else(|| cap_time_out_of_range(max_capacity, minutes_per_unit))
}

/// Names the larger of the two settings as the cause.
fn cap_time_out_of_range(max_capacity: u32, minutes_per_unit: u32) -> ValidationError {
    let field = if max_capacity > minutes_per_unit {
        "max_capacity"
    } else {
        "minutes_per_unit"
    };
    ValidationError::invalid(field, "cap time out of range")
}

fn millis_until_cap(tracker: &Tracker, now: DateTime<Utc>) -> i64 {
    (tracker.cap_time - now).num_milliseconds()
}

fn ceil_div(n: i64, d: i64) -> i64 {
    let q = n / d;
    if n % d > 0 {
        q + 1
    } else {
        q
    }
}

/// Current amount at `now`. Exceeds `max_capacity` once the cap time has passed.
///
/// # Panics
/// Panics if `minutes_per_unit` is zero. Trackers read from a store or built
/// through [`NewTracker::from_observation`](super::NewTracker::from_observation)
/// never are; see [`Tracker::validate`].
pub fn current_amount(tracker: &Tracker, now: DateTime<Utc>) -> i64 {
    let units_until_full = ceil_div(millis_until_cap(tracker, now), tracker.unit_ms());
    i64::from(tracker.max_capacity) - units_until_full
}

/// Whether the tracker has reached its cap and should only offer deletion.
pub fn is_stale(tracker: &Tracker, now: DateTime<Utc>) -> bool {
    current_amount(tracker, now) >= i64::from(tracker.max_capacity)
}

/// Human-readable distance to the cap time, e.g. `about 2 hours`.
pub fn time_to_full(tracker: &Tracker, now: DateTime<Utc>) -> String {
    format_distance(tracker.cap_time, now)
}

/// Countdown to the next unit as zero-padded `mm:ss`.
pub fn time_to_next_unit(tracker: &Tracker, now: DateTime<Utc>) -> String {
    let diff = millis_until_cap(tracker, now);
    if diff <= 0 {
        return "00:00".to_string();
    }
    let unit = tracker.unit_ms();
    let remainder = match diff % unit {
        0 => unit,
        r => r,
    };
    let secs = remainder / 1000;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Apply a stamina delta: positive gains, negative spends.
///
/// Gaining moves the cap time earlier by `delta` units, spending moves it
/// later. The result must stay within `0..=max_capacity`.
pub fn apply_delta(tracker: &Tracker, delta: i32, now: DateTime<Utc>) -> Result<Tracker, ValidationError> {
    tracker.validate()?;
    let current = current_amount(tracker, now);
    let max = i64::from(tracker.max_capacity);
    if current >= max {
        return Err(ValidationError::StaleTracker {
            name: tracker.name.clone(),
        });
    }

    let delta = i64::from(delta);
    if current + delta < 0 {
        return Err(ValidationError::InsufficientStamina {
            requested: delta.unsigned_abs() as u32,
            available: current,
        });
    }
    if current + delta > max {
        return Err(ValidationError::ExceedsCapacity {
            requested: delta as u32,
            current,
            max: tracker.max_capacity,
        });
    }

    let cap_time = delta
        .checked_mul(tracker.unit_ms())
        .and_then(Duration::try_milliseconds)
        .and_then(|shift| tracker.cap_time.checked_sub_signed(shift))
        .ok_or_else(|| cap_time_out_of_range(tracker.max_capacity, tracker.minutes_per_unit))?;

    let mut next = tracker.clone();
    next.cap_time = cap_time;
    Ok(next)
}

/// All derived values of a tracker at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaminaSnapshot {
    pub current: i64,
    pub max: u32,
    pub full_in: String,
    pub next_in: String,
    pub stale: bool,
    pub at: DateTime<Utc>,
}

pub fn snapshot(tracker: &Tracker, now: DateTime<Utc>) -> StaminaSnapshot {
    let current = current_amount(tracker, now);
    StaminaSnapshot {
        current,
        max: tracker.max_capacity,
        full_in: time_to_full(tracker, now),
        next_in: time_to_next_unit(tracker, now),
        stale: current >= i64::from(tracker.max_capacity),
        at: now,
    }
}
