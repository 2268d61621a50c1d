// src/main.rs - Orchestration CLI: load a batch and the ledger, run one
// detection pass, and report duplicates plus the resulting send plan.

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

use outreach_lib::ingest::{load_ledger, load_requests};
use outreach_lib::matching::engine::{find_duplicates, DetectionConfig};
use outreach_lib::messaging::dispatch::{plan_sends, SendDecision, SendPlan};
use outreach_lib::utils::progress::ProgressCallback;

#[derive(Parser, Debug)]
#[command(name = "outreach", version, about = "Duplicate detection and send planning for free-book outreach")]
struct Cli {
    /// Incoming batch CSV with Name, Phone, Address and optional Book, Language columns.
    #[arg(long)]
    batch: PathBuf,

    /// Sent-records ledger CSV; a missing file means no historical data.
    #[arg(long, default_value = "All_Sent_Records.csv")]
    ledger: PathBuf,

    /// Detection worker count; defaults to the available cores (capped).
    #[arg(long)]
    workers: Option<usize>,

    /// Minimum address similarity treated as duplicate evidence.
    #[arg(long)]
    threshold: Option<f64>,

    /// Emit machine-readable JSON instead of the human summary.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();
    let cli = Cli::parse();

    let run_id = Uuid::new_v4().to_string();
    let started_at = chrono::Local::now();
    info!(
        "Starting detection run {} at {}",
        run_id,
        started_at.format("%Y-%m-%d %H:%M:%S")
    );

    let requests = load_requests(&cli.batch)?;
    let ledger = load_ledger(&cli.ledger);
    info!(
        "Loaded {} batch requests and {} ledger rows",
        requests.len(),
        ledger.len()
    );

    let mut config = DetectionConfig::default();
    if let Some(workers) = cli.workers.or_else(workers_from_env) {
        config.workers = workers.max(1);
    }
    if let Some(threshold) = cli.threshold {
        config.similarity_threshold = threshold;
    }

    let progress_bar = ProgressBar::new(requests.len() as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("  [{elapsed_precise}] {bar:30.cyan/blue} {pos}/{len} Checking for duplicates...")
            .unwrap()
            .progress_chars("█▉▊▋▌▍▎▏  "),
    );
    let bar_for_callback = progress_bar.clone();
    let callback: ProgressCallback = Arc::new(move |processed, _total| {
        bar_for_callback.set_position(processed as u64);
    });

    let requests = Arc::new(requests);
    let ledger = Arc::new(ledger);
    let result = find_duplicates(
        Arc::clone(&requests),
        Arc::clone(&ledger),
        config,
        Some(callback),
    )
    .await;
    progress_bar.finish_with_message(format!(
        "Detection complete: {} duplicates",
        result.duplicates.len()
    ));

    if result.stats.chunk_failures > 0 {
        warn!(
            "{} detection chunk(s) failed; results may be incomplete",
            result.stats.chunk_failures
        );
    }

    let plans = plan_sends(&requests, &result.duplicates, &ledger);

    if cli.json {
        let report = serde_json::json!({
            "run_id": run_id,
            "started_at": started_at.to_rfc3339(),
            "stats": result.stats,
            "summary": result.summary(),
            "duplicates": result.duplicates,
            "send_plans": plans,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let summary = result.summary();
    println!("Detection run {}", run_id);
    println!(
        "  processed: {}  matched: {}  skipped (no phone/address): {}",
        result.stats.requests_processed, result.stats.requests_matched, result.stats.requests_skipped
    );
    println!(
        "  duplicates: {} total ({} by phone, {} by address, {} by both)",
        summary.total_duplicates,
        summary.phone_duplicates,
        summary.address_duplicates,
        summary.both_duplicates
    );

    for duplicate in &result.duplicates {
        println!(
            "  DUP  {} ({}) - {} phone / {} address match(es)",
            duplicate.name,
            duplicate.phone,
            duplicate.phone_matches.len(),
            duplicate.address_matches.len()
        );
    }

    println!("Send plan:");
    for plan in &plans {
        print_plan(plan);
    }
    Ok(())
}

fn print_plan(plan: &SendPlan) {
    match &plan.decision {
        SendDecision::Skip(reason) => {
            println!("  SKIP {} - {}", plan.name, reason.as_str());
        }
        SendDecision::Send { template, .. } => {
            println!("  SEND {} - {:?} template", plan.name, template);
        }
    }
}

fn workers_from_env() -> Option<usize> {
    std::env::var("OUTREACH_WORKERS")
        .ok()
        .and_then(|value| value.parse().ok())
}
