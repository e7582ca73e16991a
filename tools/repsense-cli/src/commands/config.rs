//! Show or save the effective configuration.

use repsense_common::config::AppConfig;

pub fn run(write: bool) -> anyhow::Result<()> {
    let config = AppConfig::load();
    println!("{}", serde_json::to_string_pretty(&config)?);

    if write {
        let path = config
            .save()
            .map_err(|e| anyhow::anyhow!("Failed to save config: {e}"))?;
        println!("\nConfig saved to: {}", path.display());
    }

    Ok(())
}
