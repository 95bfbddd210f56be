//! Live view: re-derive and redraw every card on each tick. Never writes.

use std::time::Duration;

use clap::Args;
use tokio::time::MissedTickBehavior;
use waveplates_core::{Config, TrackerDb, TrackerService};

use crate::render;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

#[derive(Args)]
pub struct WatchArgs {
    /// Seconds between redraws (defaults to display.refresh_interval_secs)
    #[arg(long)]
    pub interval_secs: Option<u64>,
    /// Stop after this many redraws
    #[arg(long)]
    pub ticks: Option<u64>,
    /// Append frames instead of clearing the screen
    #[arg(long)]
    pub no_clear: bool,
}

pub fn run(args: WatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let secs = args
        .interval_secs
        .unwrap_or(config.display.refresh_interval_secs)
        .max(1);
    let svc = TrackerService::new(TrackerDb::open()?, config);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let mut ticker = tokio::time::interval(Duration::from_secs(secs));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        let mut drawn = 0u64;
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let cards = svc.cards()?;
                    if !args.no_clear {
                        print!("{CLEAR_SCREEN}");
                    }
                    print!("{}", render::cards(&cards));
                    if args.no_clear {
                        println!();
                    }
                    drawn += 1;
                    if args.ticks.is_some_and(|limit| drawn >= limit) {
                        break;
                    }
                }
                _ = &mut ctrl_c => {
                    tracing::debug!(frames = drawn, "watch interrupted");
                    break;
                }
            }
        }
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}
