//! Show-config command - list modes or print one mode's configuration.

use anyhow::{Context, Result};
use clap::Args;
use pixelguard_core::config::{DetectionConfig, DetectionMode, EnvSnapshot, ENV_PREFIX};

/// Arguments for `pixelguard show-config`.
#[derive(Args, Clone, Debug)]
pub struct ShowConfigArgs {
    /// Mode to print; lists the available modes when omitted
    pub mode: Option<String>,
}

/// Run the show-config command.
pub fn run(args: &ShowConfigArgs) -> Result<()> {
    let Some(ref name) = args.mode else {
        println!("{}", mode_listing());
        return Ok(());
    };

    let mode: DetectionMode = name.parse()?;
    let env = if mode == DetectionMode::Custom {
        EnvSnapshot::from_process()
    } else {
        EnvSnapshot::default()
    };
    let config = DetectionConfig::from_mode(mode, &env);
    let json = serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
    println!("{json}");
    Ok(())
}

fn mode_listing() -> String {
    let mut text = String::from("Available modes:\n");
    for mode in DetectionMode::ALL {
        text.push_str(&format!("  {:<9} {}\n", mode.as_str(), mode.description()));
    }
    text.push_str(&format!(
        "\nFor custom mode, set environment variables with the {ENV_PREFIX} prefix.\n"
    ));
    text.push_str("Example: PXG_BORDER_FILL_BLACK_FILL_THRESHOLD=0.03");
    text
}
