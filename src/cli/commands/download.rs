//! Download command implementation

use anyhow::Result;

use super::version::print_version_summary;
use crate::config::AppConfig;
use crate::remote::GhCli;
use crate::services::{DownloadOutcome, FirmwareFetcher};
use crate::utils::timestamp;

pub async fn execute_download_command(config: &AppConfig, force: bool) -> Result<()> {
    println!(
        "{} - 📥 Downloading the latest firmware from GitHub Actions...",
        timestamp()
    );

    let fetcher = FirmwareFetcher::new(GhCli::new(), config);
    let remote = fetcher.fetch_remote_descriptor().await?;

    println!("✅ Found run: {}", remote.run_id);
    println!("   Version: {}", remote.tag_display());
    println!(
        "   Commit:  {} ({})",
        remote.commit_short, remote.commit_message
    );
    println!("   Branch:  {}", remote.branch);
    println!("   Date:    {}", remote.build_date);
    println!();

    match fetcher.download_run(remote, force).await? {
        DownloadOutcome::UpToDate { local, .. } => {
            println!("ℹ️  This version is already downloaded!");
            println!();
            println!("💾 Local version:");
            println!("   Version: {}", local.tag_display());
            println!("   Commit:  {}", local.commit_short);
            println!("   Build:   {}", local.build_date);
            println!();
            println!("✅ Firmware is up to date, no download needed");
            println!();
            println!("💡 To force a download use: sofle-flash download --force");
        }
        DownloadOutcome::Downloaded { descriptor, files } => {
            println!(
                "✅ Firmware downloaded to {}:",
                config.paths.download_dir.display()
            );
            for file in &files {
                if let Some(name) = file.file_name() {
                    println!("   {}", name.to_string_lossy());
                }
            }
            println!();
            print_version_summary(&descriptor);
        }
    }

    println!("{} - ✅ Done", timestamp());
    Ok(())
}
