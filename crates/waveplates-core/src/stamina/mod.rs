//! Stamina model.
//!
//! Maps between the single persisted value of a tracker (its cap time) and
//! the values a user reads: current amount, time until full and the
//! countdown to the next unit.

mod arithmetic;
mod distance;
mod tracker;

pub use arithmetic::{
    apply_delta, compute_cap_time, current_amount, is_stale, parse_time_to_next, snapshot,
    time_to_full, time_to_next_unit, StaminaSnapshot,
};
pub use distance::format_distance;
pub use tracker::{NewTracker, Tracker};
