use waveplates_core::presets;

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(presets())?);
        return Ok(());
    }
    for p in presets() {
        println!(
            "{:<8} {:<18} {:<17} max {:>3}, {} min per unit",
            p.key, p.name, p.resource, p.max_capacity, p.minutes_per_unit
        );
    }
    Ok(())
}
