pub mod config;
pub mod presets;
pub mod tracker;
pub mod watch;
