use dragon_trials_core::battle::policy::POLICY_NAMES;
use dragon_trials_matrix::{run, CliOptions};
use std::env;
use std::path::PathBuf;

fn usage() -> ! {
    eprintln!(
        "Usage: cargo run --release -- [--sims-per-policy N] [--seed SEED] [--output balance.csv] \
[--json balance.json] [--policies random,aggressive,cautious]"
    );
    std::process::exit(1);
}

fn parse_args() -> anyhow::Result<CliOptions> {
    let mut sims_per_policy = 200usize;
    let mut seed = 0u64;
    let mut output_path = PathBuf::from("balance.csv");
    let mut json_path = None;
    let mut policies: Vec<String> = POLICY_NAMES.iter().map(|name| name.to_string()).collect();

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--sims-per-policy" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--sims-per-policy requires a number"))?;
                sims_per_policy = val.parse()?;
            }
            "--seed" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--seed requires a number"))?;
                seed = val.parse()?;
            }
            "--output" => {
                output_path = args.next().map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("--output requires a path (e.g. --output balance.csv)")
                })?;
            }
            "--json" => {
                json_path = Some(args.next().map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("--json requires a path (e.g. --json balance.json)")
                })?);
            }
            "--policies" => {
                let val = args.next().ok_or_else(|| {
                    anyhow::anyhow!("--policies requires a comma list (e.g. random,cautious)")
                })?;
                policies = val
                    .split(',')
                    .map(|name| name.trim().to_string())
                    .filter(|name| !name.is_empty())
                    .collect();
            }
            "--help" | "-h" => usage(),
            other => return Err(anyhow::anyhow!("Unknown argument {other}")),
        }
    }

    Ok(CliOptions {
        sims_per_policy,
        seed,
        output_path,
        json_path,
        policies,
    })
}

fn main() -> anyhow::Result<()> {
    let opts = parse_args()?;
    run(opts)
}
