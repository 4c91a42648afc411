//! Batch evaluation of battle policies over many seeded encounters.

use anyhow::Result;
use dragon_trials_core::battle::encounter::Encounter;
use dragon_trials_core::battle::policy::{drive, policy_named, DriveLimits, DriveOutcome};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PolicyStats {
    pub policy: String,
    pub sims: usize,
    pub wins: usize,
    pub stalls: usize,
    pub resets: u64,
    pub pp_exhausted: usize,
    pub mean_turns: f64,
    pub mean_clock_ms: f64,
}

fn simulate_policy(name: &str, sims: usize, cell_seed: u64) -> Result<PolicyStats> {
    let mut cell_rng = SmallRng::seed_from_u64(cell_seed);
    let mut wins = 0usize;
    let mut stalls = 0usize;
    let mut resets = 0u64;
    let mut pp_exhausted = 0usize;
    let mut total_turns = 0u64;
    let mut total_clock_ms = 0u64;
    for _ in 0..sims {
        let encounter_seed: u64 = cell_rng.gen();
        let mut policy = policy_named(name, cell_rng.gen())?;
        let mut encounter = Encounter::new(encounter_seed);
        let report = drive(&mut encounter, policy.as_mut(), DriveLimits::default());
        match report.outcome {
            DriveOutcome::Victory => wins += 1,
            DriveOutcome::OutOfActions => stalls += 1,
        }
        resets += u64::from(report.resets);
        total_turns += report.turns as u64;
        total_clock_ms += report.clock_ms;
        if !encounter.state().pp.any_attack_left() {
            pp_exhausted += 1;
        }
    }
    let denom = sims.max(1) as f64;
    Ok(PolicyStats {
        policy: name.to_string(),
        sims,
        wins,
        stalls,
        resets,
        pp_exhausted,
        mean_turns: total_turns as f64 / denom,
        mean_clock_ms: total_clock_ms as f64 / denom,
    })
}

/// One row per policy. Cells are independent, so the rows come back in
/// input order even though they run in parallel.
pub fn compute_matrix(policies: &[String], sims: usize, seed: u64) -> Result<Vec<PolicyStats>> {
    policies
        .par_iter()
        .enumerate()
        .map(|(cell, name)| simulate_policy(name, sims, seed ^ ((cell as u64) << 32)))
        .collect()
}

pub fn write_csv(rows: &[PolicyStats], path: &Path) -> Result<()> {
    let mut out =
        String::from("policy,sims,wins,stalls,resets,pp_exhausted,mean_turns,mean_clock_ms\n");
    for row in rows {
        out.push_str(&format!(
            "{},{},{},{},{},{},{:.2},{:.2}\n",
            row.policy,
            row.sims,
            row.wins,
            row.stalls,
            row.resets,
            row.pp_exhausted,
            row.mean_turns,
            row.mean_clock_ms
        ));
    }
    std::fs::write(path, out)?;
    Ok(())
}
