//! Show-env-vars command - document the custom-mode variables.

use anyhow::Result;
use clap::Args;
use pixelguard_core::config::EnvVar;

/// Arguments for `pixelguard show-env-vars`.
#[derive(Args, Clone, Debug)]
pub struct EnvVarsArgs {
    /// Print the variables as a JSON array
    #[arg(long)]
    pub json: bool,
}

const SECTIONS: &[(&str, &str)] = &[
    ("Detector Enable/Disable", "PXG_DETECTOR_"),
    ("Border Fill Detection", "PXG_BORDER_FILL_"),
    ("Uniform Color Detection", "PXG_UNIFORM_COLOR_"),
    ("Background Detection", "PXG_BACKGROUND_"),
    ("Ratio Detection", "PXG_RATIO_"),
];

/// Run the show-env-vars command.
pub fn run(args: &EnvVarsArgs) -> Result<()> {
    let vars = EnvVar::documented();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&vars)?);
    } else {
        println!("{}", listing(&vars));
    }
    Ok(())
}

fn listing(vars: &[EnvVar]) -> String {
    let mut text = String::from("PixelGuard Custom Configuration Environment Variables\n");
    text.push_str(&"=".repeat(60));
    text.push('\n');

    for (title, prefix) in SECTIONS {
        text.push_str(&format!("\n{title}:\n"));
        for var in vars.iter().filter(|v| v.name.starts_with(prefix)) {
            text.push_str(&format!("  {}={}\n", var.name, var.default));
            text.push_str(&format!("      {}\n", var.description));
        }
    }

    text.push_str("\nUsage:\n");
    text.push_str("  export PXG_DETECTOR_RATIO_ENABLED=false\n");
    text.push_str("  pixelguard batch /path/to/images --mode custom");
    text
}
