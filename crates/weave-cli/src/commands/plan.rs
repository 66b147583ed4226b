//! Plan command
//!
//! Usage: weave plan <MANIFEST> [--format text|json|markdown] [--output <FILE>]

use clap::{Args, ValueEnum};
use std::path::PathBuf;

use weave_core::render::{render_plan_markdown, render_plan_text};
use weave_core::Plan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlanFormat {
    Text,
    Json,
    Markdown,
}

#[derive(Debug, Args)]
pub struct PlanArgs {
    /// Manifest file (TOML)
    pub manifest: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = PlanFormat::Text)]
    pub format: PlanFormat,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute plan command
pub fn execute(args: PlanArgs) -> Result<(), Box<dyn std::error::Error>> {
    let nexus = super::build_manifest(&args.manifest)?;
    let plan = Plan::from_nexus(&nexus);

    tracing::debug!(
        manifest = %args.manifest.display(),
        order_digest = %plan.order_digest,
        "plan resolved"
    );

    let rendered = match args.format {
        PlanFormat::Text => render_plan_text(&plan),
        PlanFormat::Json => {
            let mut json = plan.to_json_pretty()?;
            json.push('\n');
            json
        }
        PlanFormat::Markdown => render_plan_markdown(&plan),
    };

    if let Some(output_path) = args.output {
        std::fs::write(&output_path, rendered)?;
        println!("✓ Plan written to {}", output_path.display());
    } else {
        print!("{}", rendered);
    }

    Ok(())
}
