use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use kitchensink_doubles::generators::{DoubleGen, DoublesConfig, GeneratedValue, Interval, SplitMix64};
use kitchensink_doubles::replay::ReplayRecord;

#[derive(Debug, Parser)]
#[command(name = "doubles-probe")]
#[command(about = "Sample, shrink, and replay interval-bounded doubles")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate values from a seeded source.
    Sample {
        #[command(flatten)]
        bounds: Bounds,
        #[command(flatten)]
        tuning: Tuning,
        /// Seed for the splitmix64 source.
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Number of values to generate.
        #[arg(long, default_value_t = 10)]
        count: usize,
        /// Emit JSON output with sampling provenance.
        #[arg(long)]
        json: bool,
    },
    /// Print the shrink sequence of a failing value.
    Shrink {
        #[command(flatten)]
        bounds: Bounds,
        #[command(flatten)]
        tuning: Tuning,
        /// Failing value to shrink.
        #[arg(long, allow_hyphen_values = true)]
        value: f64,
        /// Emit JSON output.
        #[arg(long)]
        json: bool,
    },
    /// Generate one value and write its replay record.
    Record {
        #[command(flatten)]
        bounds: Bounds,
        #[command(flatten)]
        tuning: Tuning,
        /// Seed for the splitmix64 source.
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Destination file for the JSON record.
        #[arg(long)]
        out: PathBuf,
    },
    /// Regenerate a recorded value and verify it matches.
    Replay {
        /// JSON record written by `record`.
        path: PathBuf,
    },
}

#[derive(Debug, Args)]
struct Bounds {
    /// Inclusive lower bound; `-inf` for unbounded.
    #[arg(long, allow_hyphen_values = true, default_value = "-inf")]
    min: f64,
    /// Inclusive upper bound; `inf` for unbounded.
    #[arg(long, allow_hyphen_values = true, default_value = "inf")]
    max: f64,
}

#[derive(Debug, Args)]
struct Tuning {
    /// Selector width for special values.
    #[arg(long)]
    special_value_bits: Option<u32>,
    /// Significant digits tried by truncation.
    #[arg(long)]
    truncate_digits: Option<u32>,
    /// Real-space halvings before ordinal halving.
    #[arg(long)]
    max_bisections: Option<u32>,
}

fn make_generator(bounds: &Bounds, tuning: &Tuning) -> Result<DoubleGen> {
    let interval = Interval::new(bounds.min, bounds.max)
        .with_context(|| format!("invalid interval [{}, {}]", bounds.min, bounds.max))?;

    let mut config = DoublesConfig::default();
    if let Some(bits) = tuning.special_value_bits {
        config = config.with_special_value_bits(bits);
    }
    if let Some(digits) = tuning.truncate_digits {
        config = config.with_truncate_digits(digits);
    }
    if let Some(bisections) = tuning.max_bisections {
        config = config.with_max_bisections(bisections);
    }
    Ok(DoubleGen::for_interval(interval).with_config(config))
}

fn cmd_sample(generator: &DoubleGen, seed: u64, count: usize, json: bool) -> Result<()> {
    let mut source = SplitMix64::new(seed);
    let values: Vec<GeneratedValue> = (0..count).map(|_| generator.generate(&mut source)).collect();
    if json {
        println!("{}", serde_json::to_string_pretty(&values)?);
    } else {
        for generated in &values {
            println!("{}", generated.value());
        }
    }
    Ok(())
}

fn cmd_shrink(generator: &DoubleGen, value: f64, json: bool) -> Result<()> {
    let interval = generator.interval();
    if !interval.contains(value) {
        bail!(
            "value {value} lies outside [{}, {}]",
            interval.min(),
            interval.max()
        );
    }
    let candidates: Vec<f64> = generator.shrink(value).into_iter().collect();
    info!(value, candidates = candidates.len(), "shrink sequence computed");
    if json {
        println!("{}", serde_json::to_string_pretty(&candidates)?);
    } else {
        for candidate in &candidates {
            println!("{candidate}");
        }
    }
    Ok(())
}

fn cmd_record(generator: &DoubleGen, seed: u64, out: &Path) -> Result<()> {
    let record = ReplayRecord::capture(generator, &mut SplitMix64::new(seed));
    fs::write(out, record.to_json()?)
        .with_context(|| format!("failed to write replay record {}", out.display()))?;
    println!("{}", record.value);
    Ok(())
}

fn cmd_replay(path: &Path) -> Result<()> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read replay record {}", path.display()))?;
    let record = ReplayRecord::from_json(&json)?;
    let generated = record.replay()?;
    println!("{}", generated.value());
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Sample {
            bounds,
            tuning,
            seed,
            count,
            json,
        } => cmd_sample(&make_generator(&bounds, &tuning)?, seed, count, json),
        Command::Shrink {
            bounds,
            tuning,
            value,
            json,
        } => cmd_shrink(&make_generator(&bounds, &tuning)?, value, json),
        Command::Record {
            bounds,
            tuning,
            seed,
            out,
        } => cmd_record(&make_generator(&bounds, &tuning)?, seed, &out),
        Command::Replay { path } => cmd_replay(&path),
    }
}
