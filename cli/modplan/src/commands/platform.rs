//! `modplan platforms` — platform listing.

use anyhow::Result;
use modplan_targets::TargetPlatform;

/// List every supported platform, marking the host.
pub fn list() -> Result<()> {
    let host = TargetPlatform::host();
    println!("Supported platforms:");
    println!();
    for platform in TargetPlatform::ALL {
        let marker = if Some(platform) == host { " (host)" } else { "" };
        println!(
            "  {:<8} static libraries: *.{}{marker}",
            platform.as_str(),
            platform.static_lib_extension()
        );
    }
    Ok(())
}
