//! Artifact info command

use std::path::PathBuf;

use anyhow::{anyhow, Result};

use crate::artifact;
use crate::schema::FeatureKind;

/// Show information about the exported artifact
pub async fn info(model_dir: Option<PathBuf>) -> Result<()> {
    let dir = super::serve::resolve_model_dir(model_dir, None);

    let bundle = artifact::load(&dir).map_err(|e| anyhow!(e.reason))?;

    println!("Artifact: {}\n", dir.display());
    println!("Model version: {}", bundle.version());
    println!("Run id:        {}", bundle.run_id());

    println!("\nFeature schema ({} features):", bundle.schema().len());
    for spec in bundle.schema() {
        let kind = match spec.kind {
            FeatureKind::Numeric => "numeric",
            FeatureKind::Categorical => "categorical",
        };
        let required = if spec.required { "required" } else { "optional" };
        println!("  {:<12} {:<12} {}", spec.name, kind, required);
    }

    Ok(())
}
