use anyhow::anyhow;
use sitesel::*;
use tracing::{info, warn};

/// Replays both curation policies over a range of buffer sizes, checking their invariants
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Buffer sizes go from 2^1 up to 2^(this)
    #[arg(short = 's', long, default_value_t = 8)]
    #[arg(value_parser = clap::value_parser!(u32).range(1..=24))]
    max_log_size:   u32,

    /// Logical times replayed per buffer (capped by the policy's horizon)
    #[arg(short = 'n', long, default_value_t = 1 << 14)]
    #[arg(value_parser = clap::value_parser!(u64))]
    steps:          u64,
}

type Outcome = Result<AuditReport, AuditError>;

fn main() -> anyhow::Result<()> {
    init_logging("info");
    let cli = Args::parse();
    let total = Instant::now();

    let work: Vec<(Policy, u32)> = Policy::ALL
        .into_iter()
        .cartesian_product(1..=cli.max_log_size)
        .collect();
    info!(audits = work.len(), steps = cli.steps, "sweeping");
    let outcomes: IndexMap<(Policy, u32), Outcome> = work
        .into_par_iter()
        .map(|(policy, s)| ((policy, s), audit::<DefaultUint>(policy, 1 << s, cli.steps)))
        .collect::<Vec<_>>()
        .into_iter()
        .collect();

    println!(
        "{:<16}{:>10}{:>10}{:>10}{:>11}{:>10}",
        "policy", "S", "steps", "placed", "discarded", "retained"
    );
    for ((policy, s), outcome) in &outcomes {
        let size: DefaultUint = 1 << s;
        match outcome {
            Ok(r)   => println!(
                "{:<16}{:>10}{:>10}{:>10}{:>11}{:>10}",
                policy.algo_name(), size, r.steps, r.placed, r.discarded, r.retained
            ),
            Err(e)  => {
                warn!(%policy, size, "audit failed");
                println!("{:<16}{:>10}    FAILED: {e}", policy.algo_name(), size);
            },
        }
    }

    println!("Total sweep time: {} ms", total.elapsed().as_millis());
    let failures = outcomes.values().filter(|o| o.is_err()).count();
    if failures > 0 {
        return Err(anyhow!("{failures} of {} audits failed", outcomes.len()));
    }

    Ok(())
}
