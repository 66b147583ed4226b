//! Check command
//!
//! Usage: weave check <MANIFEST>

use clap::Args;
use std::path::PathBuf;

use weave_core::Plan;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Manifest file (TOML)
    pub manifest: PathBuf,
}

/// Execute check command
pub fn execute(args: CheckArgs) -> Result<(), Box<dyn std::error::Error>> {
    let nexus = super::build_manifest(&args.manifest)?;
    let plan = Plan::from_nexus(&nexus);

    for diagnostic in &plan.diagnostics {
        eprintln!("warning[{}]: {}", diagnostic.code, diagnostic.message);
    }

    let actions: usize = plan.extension_points.iter().map(|s| s.actions.len()).sum();
    println!(
        "✓ {}: {} extension points, {} actions, {} interrupts",
        args.manifest.display(),
        plan.extension_points.len(),
        actions,
        plan.interrupts.len()
    );

    Ok(())
}
