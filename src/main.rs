//! Domain Radar - domain availability checking from the command line
//!
//! Resolves candidate names through the provider cascade and prints them
//! grouped by outcome, or as JSON.

use anyhow::{bail, Context};
use clap::Parser;
use domain_radar::{AvailabilityEngine, AvailabilityResult, EngineConfig};
use std::io::{self, BufRead};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "domain-radar")]
#[command(version, about = "Check domain availability across RDAP, WHOIS and status APIs", long_about = None)]
struct Args {
    /// Candidate names, with or without the extension
    #[arg(value_parser = non_blank, required_unless_present = "stdin")]
    candidates: Vec<String>,

    /// Read candidates from stdin, one per line
    #[arg(long)]
    stdin: bool,

    /// Output results in JSON format
    #[arg(short, long)]
    json: bool,

    /// Extension appended to every candidate
    #[arg(short, long, value_name = "EXT")]
    extension: Option<String>,

    /// Domains resolved concurrently per group
    #[arg(short, long, value_name = "N")]
    batch_size: Option<usize>,

    /// Pause between groups in milliseconds
    #[arg(short, long, value_name = "MS")]
    pacing_ms: Option<u64>,
}

fn non_blank(raw: &str) -> Result<String, String> {
    if raw.trim().is_empty() {
        Err("candidate names cannot be blank".to_string())
    } else {
        Ok(raw.trim().to_string())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    domain_radar::init()?;
    let args = Args::parse();

    let mut config = EngineConfig::from_env().context("Invalid configuration")?;
    if let Some(extension) = args.extension.as_deref() {
        config = config.with_extension(extension);
    }
    if let Some(batch_size) = args.batch_size {
        config = config.with_batch_size(batch_size);
    }
    if let Some(pacing) = args.pacing_ms {
        config = config.with_batch_pacing(Duration::from_millis(pacing));
    }

    let candidates = collect_candidates(&args)?;
    let engine = AvailabilityEngine::new(config).context("Failed to build availability engine")?;

    for candidate in &candidates {
        if !engine.normalizer().normalize(candidate).has_label() {
            bail!("'{}' contains no usable domain characters", candidate);
        }
    }

    let started = Instant::now();
    let results = engine.resolve_all(&candidates).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_results(&results, started.elapsed());
    }

    Ok(())
}

fn collect_candidates(args: &Args) -> anyhow::Result<Vec<String>> {
    let mut candidates = args.candidates.clone();

    if args.stdin {
        for line in io::stdin().lock().lines() {
            let line = line.context("Failed to read stdin")?;
            let line = line.trim();
            if !line.is_empty() {
                candidates.push(line.to_string());
            }
        }
    }

    if candidates.is_empty() {
        bail!("No candidate names given");
    }
    Ok(candidates)
}

fn print_results(results: &[AvailabilityResult], elapsed: Duration) {
    let (errors, answered): (Vec<_>, Vec<_>) = results.iter().partition(|r| r.is_error());
    let (available, taken): (Vec<_>, Vec<_>) = answered.into_iter().partition(|r| r.available);

    if !available.is_empty() {
        println!("🎉 Available Domains ({}):", available.len());
        println!("─────────────────────────");
        for result in &available {
            println!("✅ {} - AVAILABLE{}", result.domain, via(result));
        }
        println!();
    }

    if !taken.is_empty() {
        println!("❌ Taken Domains ({}):", taken.len());
        println!("─────────────────────");
        for result in &taken {
            println!("❌ {} - TAKEN{}", result.domain, via(result));
        }
        println!();
    }

    if !errors.is_empty() {
        println!("⚠️  Checking Issues ({}):", errors.len());
        println!("───────────────────────");
        for result in &errors {
            println!(
                "⚠️  {} - {}",
                result.domain,
                result.error.as_deref().unwrap_or("Check Error")
            );
        }
        println!();
    }

    println!("📈 Summary:");
    println!("   ✅ Available: {}", available.len());
    println!("   ❌ Taken: {}", taken.len());
    if !errors.is_empty() {
        println!("   ⚠️  Issues: {}", errors.len());
    }
    println!("   📊 Total checked: {}", results.len());
    println!("   ⏱️  Total time: {:.2}s", elapsed.as_secs_f32());
}

fn via(result: &AvailabilityResult) -> String {
    result
        .provider
        .map(|provider| format!(" ({})", provider))
        .unwrap_or_default()
}
