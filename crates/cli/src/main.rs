//! U-Cutstock command-line runner.

mod config;
mod generate;
mod plan_file;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use u_cutstock::d1::CuttingRequest1D;
use u_cutstock::d2::CuttingRequest2D;
use u_cutstock::worker::{PoolConfig, TaskType};
use u_cutstock::{packing_pool, OptimizationEngine};

use crate::config::CliConfig;
use crate::plan_file::PlanFile;

#[derive(Parser)]
#[command(name = "cutstock")]
#[command(about = "Cutting-stock optimizer for bars and sheets")]
#[command(version)]
struct Cli {
    /// TOML file with [pool] and [engine] settings
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a 1D cutting request (JSON) and print the plan
    #[command(name = "solve-1d")]
    Solve1d {
        /// Path to the request file
        file: PathBuf,

        /// Run on the worker pool instead of in-process
        #[arg(long)]
        pool: bool,

        /// Output file for the plan (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Solve a 2D cutting request (JSON) and print the plan
    #[command(name = "solve-2d")]
    Solve2d {
        /// Path to the request file
        file: PathBuf,

        /// Run on the worker pool instead of in-process
        #[arg(long)]
        pool: bool,

        /// Output file for the plan (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the optimization engine on a job file with items and stock
    Plan {
        /// Path to the job file
        file: PathBuf,

        /// Pack in-process only
        #[arg(long)]
        no_pool: bool,

        /// Output file for the outcome (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate a synthetic cutting request
    Generate {
        /// Request dimension
        #[arg(short, long, value_enum, default_value = "1d")]
        dimension: Dimension,

        /// Number of demand lines
        #[arg(short, long, default_value = "25")]
        lines: usize,

        /// Random seed for reproducibility
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Output file (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Dimension {
    /// Bars
    #[value(name = "1d")]
    Linear,
    /// Sheets
    #[value(name = "2d")]
    Sheet,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = CliConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Solve1d { file, pool, output } => {
            let request: CuttingRequest1D = read_json(&file)?;
            let plan = if pool {
                solve_on_pool(&config.pool, TaskType::Linear, &request).await?
            } else {
                serde_json::to_value(u_cutstock::d1::solve_request(&request))?
            };
            write_json(&plan, output.as_deref())?;
        }

        Commands::Solve2d { file, pool, output } => {
            let request: CuttingRequest2D = read_json(&file)?;
            let plan = if pool {
                solve_on_pool(&config.pool, TaskType::Sheet, &request).await?
            } else {
                serde_json::to_value(u_cutstock::d2::solve_request(&request))?
            };
            write_json(&plan, output.as_deref())?;
        }

        Commands::Plan {
            file,
            no_pool,
            output,
        } => {
            let job: PlanFile = read_json(&file)?;
            let request = job.request();
            let (jobs, stock) = job.into_lookups();
            let mut engine =
                OptimizationEngine::new(jobs, stock).with_config(config.engine.clone());

            let pool = if no_pool || !config.engine.use_pool {
                None
            } else {
                let pool = Arc::new(packing_pool(config.pool.clone())?);
                pool.initialize()?;
                engine = engine.with_pool(Arc::clone(&pool));
                Some(pool)
            };

            let outcome = engine.run_optimization(&request).await;
            if let Some(stats) = engine.pool_stats() {
                log::info!(
                    "pool: {} workers ({} busy, {} idle), {} queued",
                    stats.total_workers,
                    stats.busy_workers,
                    stats.idle_workers,
                    stats.queued_tasks
                );
            }
            if let Some(pool) = pool {
                pool.shutdown().await;
            }

            let outcome = outcome?;
            if !outcome.success {
                log::warn!(
                    "optimization unsuccessful: {}",
                    outcome.error.as_deref().unwrap_or("unknown error")
                );
            }
            write_json(&outcome, output.as_deref())?;
        }

        Commands::Generate {
            dimension,
            lines,
            seed,
            output,
        } => {
            log::info!("generating {} lines with seed {}", lines, seed);
            match dimension {
                Dimension::Linear => {
                    write_json(&generate::linear_demand(lines, seed), output.as_deref())?;
                }
                Dimension::Sheet => {
                    write_json(&generate::sheet_demand(lines, seed), output.as_deref())?;
                }
            }
        }
    }

    Ok(())
}

/// Runs one request on a short-lived worker pool.
async fn solve_on_pool<T: Serialize>(
    config: &PoolConfig,
    task_type: TaskType,
    request: &T,
) -> anyhow::Result<Value> {
    let pool = packing_pool(config.clone())?;
    pool.initialize()?;
    let result = pool
        .execute(task_type, serde_json::to_value(request)?)
        .await;
    pool.shutdown().await;
    Ok(result?)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            eprintln!("Written to: {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
