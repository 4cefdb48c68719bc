//! Bank generator CLI: renders the 21-note flute bank into the current
//! directory (`low/`, `mid/`, `high/`, each with `1.wav`..`7.wav`).

use anyhow::{Result, bail};
use flutebank::{BankConfig, generate_bank};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("flutebank {} - generating 21-note bank", flutebank::VERSION);

    let report = generate_bank(".", BankConfig::default())?;

    log::info!("{} of 21 notes written", report.written.len());
    if !report.is_complete() {
        for failure in &report.failures {
            log::error!("{failure}");
        }
        bail!("{} note(s) failed to render or export", report.failures.len());
    }
    Ok(())
}
