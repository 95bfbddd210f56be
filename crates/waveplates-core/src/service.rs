//! Tracker service.
//!
//! Ties the store, the configuration and the stamina arithmetic together.
//! There is no cached tracker list: every mutation goes straight to the
//! store, and callers re-fetch (`list` / `cards`) to refresh their views.

use std::cell::Cell;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::card::TrackerCard;
use crate::error::{CoreError, Result, ValidationError};
use crate::stamina::{apply_delta, NewTracker, Tracker};
use crate::storage::{Config, TrackerStore};

/// Source of the current instant.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for tests and replays.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Cell<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: Cell::new(now) }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

/// User input for a new tracker. Missing capacity/rate fall back to config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddTracker {
    pub name: String,
    pub stamina: u32,
    /// Countdown to the next unit as `mm:ss`.
    pub time_to_next: String,
    pub max_capacity: Option<u32>,
    pub minutes_per_unit: Option<u32>,
}

pub struct TrackerService<S, C = SystemClock> {
    store: S,
    config: Config,
    clock: C,
}

impl<S: TrackerStore> TrackerService<S, SystemClock> {
    pub fn new(store: S, config: Config) -> Self {
        Self::with_clock(store, config, SystemClock)
    }
}

impl<S: TrackerStore, C: Clock> TrackerService<S, C> {
    pub fn with_clock(store: S, config: Config, clock: C) -> Self {
        Self {
            store,
            config,
            clock,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn list(&self) -> Result<Vec<Tracker>> {
        self.store.list_trackers()
    }

    /// Look a tracker up by full id or unique id prefix.
    pub fn find(&self, id: &str) -> Result<Tracker> {
        let id = self.store.resolve_id(id)?;
        self.store
            .get_tracker(&id)?
            .ok_or(CoreError::NotFound { id })
    }

    pub fn cards(&self) -> Result<Vec<TrackerCard>> {
        let now = self.now();
        Ok(self
            .list()?
            .iter()
            .map(|t| TrackerCard::build(t, now, &self.config.deltas))
            .collect())
    }

    pub fn card(&self, id: &str) -> Result<TrackerCard> {
        let tracker = self.find(id)?;
        Ok(TrackerCard::build(&tracker, self.now(), &self.config.deltas))
    }

    pub fn add(&self, input: AddTracker) -> Result<Tracker> {
        let max_capacity = input
            .max_capacity
            .unwrap_or(self.config.defaults.max_capacity);
        let minutes_per_unit = input
            .minutes_per_unit
            .unwrap_or(self.config.defaults.minutes_per_unit);
        let new = NewTracker::from_observation(
            &input.name,
            input.stamina,
            &input.time_to_next,
            max_capacity,
            minutes_per_unit,
            self.now(),
        )?;
        self.store.insert_tracker(new)
    }

    /// Apply a signed delta: positive gains, negative spends.
    pub fn apply(&self, id: &str, delta: i32) -> Result<Tracker> {
        let tracker = self.find(id)?;
        let updated = apply_delta(&tracker, delta, self.now()).map_err(|e| {
            tracing::warn!(id = %tracker.id, delta, error = %e, "rejected stamina delta");
            e
        })?;
        if updated.cap_time == tracker.cap_time {
            return Ok(tracker);
        }
        self.store.update_tracker(&updated)
    }

    pub fn spend(&self, id: &str, amount: u32) -> Result<Tracker> {
        self.apply(id, -delta_from(amount)?)
    }

    pub fn gain(&self, id: &str, amount: u32) -> Result<Tracker> {
        self.apply(id, delta_from(amount)?)
    }

    /// Delete a tracker, returning what was removed.
    pub fn delete(&self, id: &str) -> Result<Tracker> {
        let tracker = self.find(id)?;
        self.store.delete_tracker(&tracker.id)?;
        Ok(tracker)
    }
}

fn delta_from(amount: u32) -> Result<i32, ValidationError> {
    i32::try_from(amount).map_err(|_| ValidationError::invalid("amount", "too large"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::TrackerDb;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn service() -> TrackerService<TrackerDb, FixedClock> {
        TrackerService::with_clock(
            TrackerDb::open_memory().unwrap(),
            Config::default(),
            FixedClock::new(t0()),
        )
    }

    fn add(svc: &TrackerService<TrackerDb, FixedClock>, name: &str, stamina: u32) -> Tracker {
        svc.add(AddTracker {
            name: name.to_string(),
            stamina,
            time_to_next: "03:45".to_string(),
            max_capacity: None,
            minutes_per_unit: None,
        })
        .unwrap()
    }

    fn current(svc: &TrackerService<TrackerDb, FixedClock>, id: &str) -> i64 {
        match svc.card(id).unwrap() {
            TrackerCard::Live { snapshot, .. } => snapshot.current,
            TrackerCard::Stale { current, .. } => current,
        }
    }

    #[test]
    fn add_uses_config_defaults() {
        let svc = service();
        let tracker = add(&svc, "Main", 100);
        assert_eq!(tracker.max_capacity, 240);
        assert_eq!(tracker.minutes_per_unit, 6);
        assert_eq!(current(&svc, &tracker.id), 100);
    }

    #[test]
    fn add_rejects_invalid_countdown() {
        let svc = service();
        let err = svc
            .add(AddTracker {
                name: "Main".into(),
                stamina: 10,
                time_to_next: "7:61".into(),
                max_capacity: Some(200),
                minutes_per_unit: Some(8),
            })
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(svc.list().unwrap().is_empty());
    }

    #[test]
    fn ticking_clock_moves_the_card() {
        let svc = service();
        let tracker = add(&svc, "Main", 100);
        svc.clock().advance(Duration::seconds(225));
        let TrackerCard::Live { snapshot, .. } = svc.card(&tracker.id).unwrap() else {
            panic!("expected live card");
        };
        assert_eq!(snapshot.current, 101);
        assert_eq!(snapshot.next_in, "06:00");
    }

    #[test]
    fn spend_and_gain_persist() {
        let svc = service();
        let tracker = add(&svc, "Main", 100);

        svc.spend(&tracker.id, 40).unwrap();
        assert_eq!(current(&svc, &tracker.id), 60);

        svc.gain(&tracker.id[..6], 40).unwrap();
        assert_eq!(current(&svc, &tracker.id), 100);
        assert_eq!(svc.find(&tracker.id).unwrap().cap_time, tracker.cap_time);
    }

    #[test]
    fn rejected_delta_leaves_store_untouched() {
        let svc = service();
        let tracker = add(&svc, "Main", 5);
        let err = svc.spend(&tracker.id, 10).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::InsufficientStamina { .. })
        ));
        assert_eq!(svc.find(&tracker.id).unwrap(), tracker);
    }

    #[test]
    fn stale_tracker_only_offers_deletion() {
        let svc = service();
        let tracker = add(&svc, "Main", 239);
        svc.clock().set(tracker.cap_time);

        assert!(svc.card(&tracker.id).unwrap().is_stale());
        assert!(matches!(
            svc.gain(&tracker.id, 10),
            Err(CoreError::Validation(ValidationError::StaleTracker { .. }))
        ));

        let removed = svc.delete(&tracker.id).unwrap();
        assert_eq!(removed.id, tracker.id);
        assert!(svc.cards().unwrap().is_empty());
    }

    #[test]
    fn cards_follow_name_order() {
        let svc = service();
        add(&svc, "zeta", 1);
        add(&svc, "Alpha", 2);
        let names: Vec<String> = svc
            .cards()
            .unwrap()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(names, vec!["Alpha", "zeta"]);
    }

    #[test]
    fn unknown_id_is_not_found() {
        let svc = service();
        assert!(matches!(svc.delete("nope"), Err(CoreError::NotFound { .. })));
        assert!(matches!(svc.spend("nope", 1), Err(CoreError::NotFound { .. })));
    }
}
