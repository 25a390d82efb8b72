//! Version command implementation

use anyhow::Result;

use crate::config::AppConfig;
use crate::models::VersionDescriptor;

/// Print the descriptor of the downloaded firmware
pub fn print_version_summary(info: &VersionDescriptor) {
    println!("📋 Firmware version:");
    println!("   Version: {}", info.tag_display());
    println!("   Commit:  {} ({})", info.commit_short, info.commit_message);
    println!("   Branch:  {}", info.branch);
    println!("   Build:   {}", info.build_date);
    println!("   Run ID:  {}", info.run_id);
    if let Some(downloaded) = info.download_date {
        println!("   Fetched: {}", downloaded.format("%Y-%m-%d %H:%M:%S"));
    }
}

/// Show the downloaded firmware version. A missing descriptor is reported, not an error.
pub fn execute_version_command(config: &AppConfig) -> Result<()> {
    match VersionDescriptor::load(&config.version_file())? {
        Some(info) => print_version_summary(&info),
        None => {
            println!("❌ No firmware version found. Download first: sofle-flash download");
        }
    }
    Ok(())
}
