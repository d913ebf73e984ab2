//! Simulator binary
//!
//! Usage:
//!   agentic-economy-sim demo [--budget-eth 0.01] [--prompt ...] [--export-json path]
//!   agentic-economy-sim select [--feed path] [--budget 0.0002]
//!   agentic-economy-sim deployment <record.json>

use agentic_economy::deployment::DeploymentRecord;
use agentic_economy::showcase::{compute_selection, DemoFeed, SelectionForm};
use agentic_economy::utils::units::{format_ether, parse_ether};
use agentic_economy_sim::cli::{Cli, Command, DemoArgs, DeploymentArgs, SelectArgs};
use agentic_economy_sim::demo::tx_display;
use agentic_economy_sim::{run_demo, DemoConfig, MockWorker};
use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    init_tracing();

    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn run() -> Result<()> {
    match Cli::parse().command {
        Command::Demo(args) => demo(args),
        Command::Select(args) => select(args),
        Command::Deployment(args) => deployment(args),
    }
}

fn demo(args: DemoArgs) -> Result<()> {
    let config = DemoConfig::from_args(args).context("invalid demo configuration")?;
    let worker = MockWorker::new(config.worker_delay.0, config.worker_delay.1)?;
    let mut rng = match config.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let run = run_demo(&config, &worker, &mut rng).context("demo run failed")?;

    println!("Network: {} (chain {})", config.network.name, run.feed.network.chain_id);
    println!("Contract: {}", run.feed.network.contract_address);
    println!("Seeded agents: {}", run.seeded.len());
    println!("Category: {}", run.category);
    println!(
        "Budget: {} ether, {} affordable candidates",
        format_ether(config.budget_wei, 6),
        run.selection.affordable.len()
    );
    for (rank, entry) in run.selection.affordable.iter().enumerate() {
        println!(
            "  {}. {} fee {} wei, reputation {}",
            rank + 1,
            entry.address,
            entry.base_fee,
            entry.reputation
        );
    }
    println!("{}", run.selection_proof.reason);
    println!("Worker output: {} (confidence {:.2})", run.work.summary, run.work.confidence);
    println!();

    let explorer = run.feed.network.explorer_tx_base.as_deref();
    for step in &run.feed.workflow.steps {
        println!("{}: {}", step.label, tx_display(step, explorer));
    }
    println!(
        "Paid {} wei to {}, fee {} wei",
        run.settlement.payout, run.settlement.worker, run.settlement.fee
    );
    println!("Feedback: {}", run.feedback_note);
    println!();
    println!("{}", serde_json::to_string_pretty(&run.final_state)?);

    if let Some(path) = &config.export_json {
        println!("Feed written to {}", path.display());
    }
    Ok(())
}

fn select(args: SelectArgs) -> Result<()> {
    let feed = DemoFeed::load_or_fallback(args.feed.as_deref()).context("no usable feed")?;

    let mut form = SelectionForm::from_task(&feed.task);
    if let Some(prompt) = args.prompt {
        form.prompt = prompt;
    }
    if let Some(category) = args.category {
        form.category = category;
    }
    if let Some(budget) = args.budget {
        parse_ether(&budget).with_context(|| format!("invalid budget {budget:?}"))?;
        form.budget = budget;
    }

    let result = compute_selection(&feed, &form, args.policy)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn deployment(args: DeploymentArgs) -> Result<()> {
    let record = DeploymentRecord::load(&args.path)
        .with_context(|| format!("failed to load {}", args.path.display()))?;

    println!("Network: {} (chain {})", record.network, record.chain_id);
    println!("Contract: {} ({})", record.contract_address, record.contract_version);
    println!("Version: {}", record.version());
    println!("Deployed at: {}", record.deployed_at.to_rfc3339());
    println!("Entry points:");
    for entry_point in record.entry_points() {
        println!("  {}", entry_point.name());
    }
    Ok(())
}
