//! # Waveplates Core Library
//!
//! Core logic for tracking regenerating stamina in gacha games. All
//! operations are exposed through the standalone `waveplates` CLI; any other
//! front end is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Stamina model**: pure functions between a tracker's stored cap time and
//!   the displayed amount, time until full and next-unit countdown
//! - **Storage**: SQLite-based tracker storage and TOML-based configuration
//! - **Cards**: per-tick, render-ready views with enabled/disabled delta actions
//! - **Service**: store + clock + config, re-fetch-on-write
//!
//! ## Key Components
//!
//! - [`Tracker`]: one tracked account
//! - [`TrackerDb`]: tracker persistence
//! - [`TrackerService`]: add / spend / gain / delete and card building
//! - [`Config`]: application configuration management

pub mod card;
pub mod error;
pub mod presets;
pub mod service;
pub mod stamina;
pub mod storage;

pub use card::{DeltaButton, TrackerCard, STALE_MESSAGE};
pub use error::{ConfigError, CoreError, DatabaseError, Result, ValidationError};
pub use presets::{find_preset, presets, GamePreset};
pub use service::{AddTracker, Clock, FixedClock, SystemClock, TrackerService};
pub use stamina::{NewTracker, StaminaSnapshot, Tracker};
pub use storage::{Config, TrackerDb, TrackerStore};
