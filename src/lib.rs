pub mod matrix;

use crate::matrix::{compute_matrix, write_csv};
use anyhow::Context;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct CliOptions {
    pub sims_per_policy: usize,
    pub seed: u64,
    pub output_path: PathBuf,
    pub json_path: Option<PathBuf>,
    pub policies: Vec<String>,
}

pub fn run(opts: CliOptions) -> anyhow::Result<()> {
    if opts.sims_per_policy == 0 {
        anyhow::bail!("--sims-per-policy must be > 0");
    }
    if opts.policies.is_empty() {
        anyhow::bail!("--policies must name at least one policy");
    }
    let rows = compute_matrix(&opts.policies, opts.sims_per_policy, opts.seed)?;
    write_csv(&rows, &opts.output_path)?;
    if let Some(json_path) = &opts.json_path {
        let raw = serde_json::to_string_pretty(&rows)?;
        std::fs::write(json_path, raw + "\n")
            .with_context(|| format!("Failed to write stats to {}", json_path.display()))?;
    }
    println!(
        "Wrote {} policy rows to {}",
        rows.len(),
        opts.output_path.display()
    );
    Ok(())
}
