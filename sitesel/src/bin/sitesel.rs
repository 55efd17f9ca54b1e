use std::io::BufWriter;

use anyhow::{anyhow, Context};
use sitesel::*;
use tracing::{debug, info};

/// Answers site selection queries, one "S T" pair per line of stdin
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Function to evaluate
    #[arg(value_enum)]
    target: Target,

    /// Unsigned integer width to compute with
    #[arg(short, long, value_enum, default_value = "u64")]
    width:  Width,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum Target {
    #[value(name = "steady_algo.assign_storage_site")]
    SteadyAssignStorageSite,
    #[value(name = "steady_algo.has_ingest_capacity")]
    SteadyHasIngestCapacity,
    #[value(name = "steady_algo.get_ingest_capacity")]
    SteadyGetIngestCapacity,
    #[value(name = "steady_algo.lookup_ingest_times")]
    SteadyLookupIngestTimes,
    #[value(name = "stretched_algo.assign_storage_site")]
    StretchedAssignStorageSite,
    #[value(name = "stretched_algo.has_ingest_capacity")]
    StretchedHasIngestCapacity,
    #[value(name = "stretched_algo.get_ingest_capacity")]
    StretchedGetIngestCapacity,
    #[value(name = "stretched_algo.lookup_ingest_times")]
    StretchedLookupIngestTimes,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum Width {
    U8,
    U16,
    U32,
    U64,
    U128,
}

impl Target {
    fn policy(self) -> Policy {
        match self {
            Target::SteadyAssignStorageSite
            | Target::SteadyHasIngestCapacity
            | Target::SteadyGetIngestCapacity
            | Target::SteadyLookupIngestTimes       => Policy::Steady,
            Target::StretchedAssignStorageSite
            | Target::StretchedHasIngestCapacity
            | Target::StretchedGetIngestCapacity
            | Target::StretchedLookupIngestTimes    => Policy::Stretched,
        }
    }

    /// One output line, in the encoding the reference tooling
    /// compares against. Lookups print the held ingestion times separated
    /// by spaces. Stretched capacities past `U::MAX` print `U::MAX`.
    fn answer<U: Uint>(self, size: U, time: U) -> String {
        let policy = self.policy();
        match self {
            Target::SteadyAssignStorageSite
            | Target::StretchedAssignStorageSite    => {
                if policy.has_ingest_capacity(size, time) {
                    show(policy.assign_storage_site(size, time))
                } else { show::<U>(None) }
            },
            Target::SteadyHasIngestCapacity
            | Target::StretchedHasIngestCapacity    => {
                if policy.has_ingest_capacity(size, time) { "True".into() }
                else { "False".into() }
            },
            Target::SteadyGetIngestCapacity
            | Target::StretchedGetIngestCapacity    => show(policy.get_ingest_capacity(size)),
            Target::SteadyLookupIngestTimes
            | Target::StretchedLookupIngestTimes    => match policy.lookup_ingest_times(size, time) {
                Ok(mut held) => held.join(" "),
                Err(_)       => show::<U>(None),
            },
        }
    }
}

fn show<U: Uint>(v: Option<U>) -> String {
    match v {
        Some(x) => x.to_string(),
        None    => String::from("None"),
    }
}

fn parse<U: Uint>(field: &str, what: &str, line_no: usize) -> anyhow::Result<U> {
    field.parse()
        .map_err(|_| anyhow!("line {line_no}: bad {what} {field:?}"))
}

/// Reads "S T" lines, writes one answer per line. Lines holding only
/// `S` are read as `T = 0`; blank lines are skipped.
fn run<U: Uint>(target: Target, input: impl BufRead, mut output: impl Write) -> anyhow::Result<usize> {
    let mut answered = 0;
    for (idx, line) in input.lines().enumerate() {
        let line = line.context("reading stdin")?;
        let mut fields = line.split_whitespace();
        let Some(size) = fields.next() else { continue; };
        let size: U = parse(size, "buffer size", idx + 1)?;
        let time: U = match fields.next() {
            Some(t) => parse(t, "logical time", idx + 1)?,
            None    => U::ZERO,
        };
        writeln!(output, "{}", target.answer(size, time))?;
        answered += 1;
    }
    output.flush()?;

    Ok(answered)
}

fn main() -> anyhow::Result<()> {
    init_logging("warn");
    let cli = Args::parse();
    debug!(query = ?cli.target, width = ?cli.width, "answering queries");
    let start = Instant::now();
    let input = std::io::stdin().lock();
    let output = BufWriter::new(std::io::stdout().lock());
    let answered = match cli.width {
        Width::U8   => run::<u8>(cli.target, input, output),
        Width::U16  => run::<u16>(cli.target, input, output),
        Width::U32  => run::<u32>(cli.target, input, output),
        Width::U64  => run::<u64>(cli.target, input, output),
        Width::U128 => run::<u128>(cli.target, input, output),
    }?;
    info!(answered, elapsed_us = start.elapsed().as_micros() as u64, "done");

    Ok(())
}
