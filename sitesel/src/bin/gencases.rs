use std::io::BufWriter;

use rand::{rngs::StdRng, Rng, SeedableRng};
use sitesel::*;
use tracing::info;

/// Prints the "S T" battery used to cross-check site selection implementations
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Seed for the randomly drawn logical times
    #[arg(long, default_value_t = 1)]
    #[arg(value_parser = clap::value_parser!(u64))]
    seed:           u64,

    /// Buffer sizes go from 2^0 up to 2^(this)
    #[arg(short = 's', long, default_value_t = 20)]
    #[arg(value_parser = clap::value_parser!(u32).range(..64))]
    max_log_size:   u32,

    /// Every logical time below this is listed for each buffer size
    #[arg(short = 't', long, default_value_t = 4096)]
    #[arg(value_parser = clap::value_parser!(u64))]
    max_time:       u64,
}

fn main() -> anyhow::Result<()> {
    init_logging("warn");
    let cli = Args::parse();
    let mut rng = StdRng::seed_from_u64(cli.seed);
    let mut out = BufWriter::new(std::io::stdout().lock());
    let mut lines = 0u64;

    for s in 0..=cli.max_log_size {
        let size: DefaultUint = 1 << s;
        // Keeps the random times meaningful for stretched curation.
        let capacity_bound: DefaultUint = 1 << size.min(32);
        for time in 0..cli.max_time {
            writeln!(out, "{size} {time}")?;
            lines += 1;
            if time < 100 {
                writeln!(out, "{size} {}", rng.gen_range(0..capacity_bound))?;
                writeln!(out, "{size} {}", rng.gen_range(0..1u64 << 32))?;
                lines += 2;
            }
        }
    }
    out.flush()?;
    info!(lines, seed = cli.seed, "battery written");

    Ok(())
}
