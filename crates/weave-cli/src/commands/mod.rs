pub mod check;
pub mod plan;

use std::path::Path;

use weave_core::{BodyTable, Manifest, Nexus};

/// Parse, bind no-op bodies and build
///
/// The CLI never runs actions, so every name gets the default body.
pub fn build_manifest(path: &Path) -> weave_core::Result<Nexus> {
    Manifest::from_file(path)?
        .into_assembly(&BodyTable::new())?
        .build()
}
