//! List command - show cached toolchain versions and their status

use anyhow::Result;
use colored::Colorize;
use gopin_toolchain::{CacheStatus, CacheStore};

/// Execute `gopin list`.
pub fn execute(json: bool, verbose: bool) -> Result<()> {
    let store = CacheStore::open_default()?;
    let entries = store.entries()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No toolchain versions installed.");
        return Ok(());
    }

    for entry in entries {
        match entry.status {
            CacheStatus::Ready => println!("{} {}", "✓".green(), entry.version),
            _ => println!("{} {} (incomplete)", "✗".red(), entry.version),
        }
        if verbose {
            println!("    {}", entry.install_dir.display());
        }
    }

    Ok(())
}
