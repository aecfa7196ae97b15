//! Download command - fetch and install a pinned toolchain version

use anyhow::Result;
use colored::Colorize;
use gopin_toolchain::{Acquirer, CacheStatus, CacheStore, VersionId};

/// Execute `gopin download <version>`.
pub fn execute(version: &str, verbose: bool) -> Result<()> {
    let version = VersionId::parse(version)?;
    let store = CacheStore::open_default()?;

    if store.lookup(&version).status == CacheStatus::Ready {
        println!("{} {} is already installed", "✓".green(), version);
        return Ok(());
    }

    println!("Downloading {version}...");
    let acquirer = Acquirer::new(store).with_progress(progress_callback);
    let entry = acquirer.acquire(&version)?;

    if verbose {
        println!("{} Installed to: {}", "✓".green(), entry.install_dir.display());
    }
    println!("Success. You may now run '{version}'");

    Ok(())
}

/// Progress callback for download
fn progress_callback(downloaded: u64, total: u64) {
    if total > 0 {
        let percent = (downloaded as f64 / total as f64 * 100.0) as u8;
        let mb_downloaded = downloaded as f64 / 1_048_576.0;
        let mb_total = total as f64 / 1_048_576.0;
        print!("\r  Downloaded {mb_downloaded:.1} / {mb_total:.1} MB ({percent}%)");
        let _ = std::io::Write::flush(&mut std::io::stdout());

        if downloaded == total {
            println!();
        }
    }
}
