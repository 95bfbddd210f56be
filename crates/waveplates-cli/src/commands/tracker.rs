//! Tracker commands for CLI.

use clap::Args;
use waveplates_core::{
    find_preset, AddTracker, Config, TrackerCard, TrackerDb, TrackerService, ValidationError,
};

use crate::render;

#[derive(Args)]
pub struct AddArgs {
    /// Name for identification, e.g. "Wuwa main account"
    pub name: String,
    /// Current stamina count
    #[arg(long, short = 's')]
    pub stamina: u32,
    /// Time till next stamina (mm:ss)
    #[arg(long, short = 'n', value_name = "MM:SS")]
    pub next: String,
    /// Maximum stamina count (defaults to the preset or config)
    #[arg(long)]
    pub max: Option<u32>,
    /// Minutes per stamina gained (defaults to the preset or config)
    #[arg(long)]
    pub rate: Option<u32>,
    /// Game preset supplying max and rate (see `waveplates presets`)
    #[arg(long)]
    pub preset: Option<String>,
    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

fn open_service() -> Result<TrackerService<TrackerDb>, Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = TrackerDb::open()?;
    Ok(TrackerService::new(db, config))
}

fn print_card(card: &TrackerCard, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(card)?);
    } else {
        print!("{}", render::card(card));
    }
    Ok(())
}

pub fn add(args: AddArgs) -> Result<(), Box<dyn std::error::Error>> {
    let preset = match args.preset.as_deref() {
        Some(key) => Some(find_preset(key).ok_or_else(|| {
            ValidationError::invalid("preset", format!("unknown preset '{key}'"))
        })?),
        None => None,
    };

    let svc = open_service()?;
    let tracker = svc.add(AddTracker {
        name: args.name,
        stamina: args.stamina,
        time_to_next: args.next,
        max_capacity: args.max.or(preset.map(|p| p.max_capacity)),
        minutes_per_unit: args.rate.or(preset.map(|p| p.minutes_per_unit)),
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&tracker)?);
    } else {
        println!("Tracker created: {}", tracker.id);
        print!("{}", render::card(&svc.card(&tracker.id)?));
    }
    Ok(())
}

pub fn list(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let svc = open_service()?;
    let cards = svc.cards()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&cards)?);
    } else {
        print!("{}", render::cards(&cards));
    }
    Ok(())
}

pub fn show(id: &str, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let svc = open_service()?;
    print_card(&svc.card(id)?, json)
}

pub fn spend(id: &str, amount: u32, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let svc = open_service()?;
    let tracker = svc.spend(id, amount)?;
    print_card(&svc.card(&tracker.id)?, json)
}

pub fn gain(id: &str, amount: u32, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let svc = open_service()?;
    let tracker = svc.gain(id, amount)?;
    print_card(&svc.card(&tracker.id)?, json)
}

pub fn delete(id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let svc = open_service()?;
    let removed = svc.delete(id)?;
    println!("Tracker deleted: {} ({})", removed.id, removed.name);
    Ok(())
}
