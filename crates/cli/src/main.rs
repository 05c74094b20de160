use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

use symgen::api::{catalogue, generate, GenerateCfg, OrderingStrategy, TranslationPruning};

mod batch;
mod provenance;

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Minimal generating sets for the built-in space groups")]
struct Cmd {
    /// Log pipeline stages (DEBUG level)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Generate every catalogue group of one dimension and print a summary
    Run {
        #[arg(long, default_value_t = 3)]
        dim: usize,
        /// Worker threads (0 = one per core)
        #[arg(long, default_value_t = 0)]
        threads: usize,
        /// Per-group wall-clock budget; slower groups count as failures
        #[arg(long)]
        budget_ms: Option<u64>,
        #[arg(long, value_enum, default_value_t = OrderingArg::Priority)]
        ordering: OrderingArg,
        /// Seed for `--ordering shuffled`
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Keep translations that later became redundant
        #[arg(long)]
        skip_translation_pruning: bool,
        /// Per-group table (.csv or .parquet) plus a provenance sidecar
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the generators of one group
    Show {
        #[arg(long)]
        dim: usize,
        #[arg(long)]
        name: String,
        /// Coordinate triplets instead of rows
        #[arg(long)]
        symbols: bool,
    },
    /// List catalogue names
    List {
        #[arg(long)]
        dim: usize,
    },
    /// Print a small provenance JSON block
    Report,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OrderingArg {
    Priority,
    Legacy,
    Shuffled,
}

impl OrderingArg {
    fn strategy(self, seed: u64) -> OrderingStrategy {
        match self {
            OrderingArg::Priority => OrderingStrategy::Priority,
            OrderingArg::Legacy => OrderingStrategy::Legacy,
            OrderingArg::Shuffled => OrderingStrategy::Shuffled { seed },
        }
    }
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose { Level::DEBUG } else { Level::INFO };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    match cmd.action {
        Action::Run {
            dim,
            threads,
            budget_ms,
            ordering,
            seed,
            skip_translation_pruning,
            out,
        } => {
            let cfg = GenerateCfg {
                ordering: ordering.strategy(seed),
                pruning: if skip_translation_pruning {
                    TranslationPruning::Skip
                } else {
                    TranslationPruning::Fixpoint
                },
                ..GenerateCfg::default()
            };
            let params = serde_json::json!({
                "dim": dim,
                "threads": threads,
                "budget_ms": budget_ms,
                "ordering": format!("{:?}", cfg.ordering),
                "translation_passes": cfg.translation_passes,
                "pruning": format!("{:?}", cfg.pruning),
            });
            run(dim, &cfg, budget_ms.map(Duration::from_millis), threads, out, params)
        }
        Action::Show { dim, name, symbols } => show(dim, &name, symbols),
        Action::List { dim } => list(dim),
        Action::Report => report(),
    }
}

fn run(
    dim: usize,
    cfg: &GenerateCfg,
    budget: Option<Duration>,
    threads: usize,
    out: Option<PathBuf>,
    params: serde_json::Value,
) -> Result<()> {
    let start = Instant::now();
    let outcomes = batch::run_catalogue(dim, cfg, budget, threads)?;
    let wall = start.elapsed();

    for outcome in &outcomes {
        if let Some(set) = outcome.generators() {
            println!("{}", outcome.name);
            for op in set.operators() {
                println!("    {op}");
            }
        }
    }

    let summary = batch::Summary::of(&outcomes);
    println!();
    println!("printed {} groups", summary.printed);
    if !summary.failures.is_empty() {
        println!("failed: {}", summary.failures.join(", "));
    }
    if let (Some(min), Some(max), Some(avg)) = (summary.min, summary.max, summary.average) {
        println!("generators per group: min {min}, max {max}, average {avg:.2}");
    }
    println!("wall time: {:.1} ms", wall.as_secs_f64() * 1e3);
    tracing::info!(
        printed = summary.printed,
        failed = summary.failures.len(),
        wall_ms = wall.as_millis() as u64,
        "run finished"
    );

    if let Some(path) = out {
        let mut df = batch::to_frame(&outcomes).context("building result table")?;
        batch::write_frame(&mut df, &path)?;
        let payload = provenance::Payload {
            params,
            summary: serde_json::to_value(&summary)?,
        };
        let sidecar = provenance::write_sidecar(&path, &payload)?;
        tracing::info!(table = %path.display(), sidecar = %sidecar.display(), "wrote outputs");
    }
    Ok(())
}

fn show(dim: usize, name: &str, symbols: bool) -> Result<()> {
    let group = catalogue::lookup(dim, name)?;
    let set = generate(&group, &GenerateCfg::default())?;
    tracing::info!(
        name,
        order = group.order(),
        points = set.points.len(),
        translations = set.translations.len(),
        "generated"
    );
    println!("{name}");
    for op in set.operators() {
        if symbols {
            println!("    {}", op.symbol());
        } else {
            println!("    {op}");
        }
    }
    Ok(())
}

fn list(dim: usize) -> Result<()> {
    let names = catalogue::names(dim);
    anyhow::ensure!(!names.is_empty(), "no catalogue groups in dimension {dim}");
    for name in names {
        println!("{name}");
    }
    Ok(())
}

fn report() -> Result<()> {
    let payload = provenance::Payload {
        params: serde_json::json!({}),
        summary: serde_json::Value::Null,
    };
    let doc = provenance::document(&payload, &[]);
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}
