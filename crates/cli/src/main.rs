//! Cut-list nesting CLI

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use u_cutlist_cli::NestingJob;

#[derive(Parser)]
#[command(name = "cutlist")]
#[command(about = "Guillotine nesting of cabinet parts onto stock boards")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Nest a job and write layouts plus a utilization report
    Nest {
        /// Path to the JSON job file
        job: PathBuf,

        /// Output file (JSON); printed to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Worker threads for material groups (0 = all cores)
        #[arg(short, long)]
        threads: Option<usize>,

        /// Write compact instead of pretty JSON
        #[arg(long)]
        compact: bool,
    },

    /// Validate boards and resolve pieces without nesting
    Check {
        /// Path to the JSON job file
        job: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Nest {
            job,
            output,
            threads,
            compact,
        } => {
            let mut nesting_job = NestingJob::load(&job)?;
            if let Some(threads) = threads {
                nesting_job = nesting_job.with_threads(threads);
            }

            let result = nesting_job.run()?;
            let json = if compact {
                serde_json::to_string(&result)?
            } else {
                serde_json::to_string_pretty(&result)?
            };

            match output {
                Some(path) => {
                    fs::write(&path, json)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Results saved to: {}", path.display());
                }
                None => println!("{}", json),
            }

            let report = &result.report;
            eprintln!(
                "{} piece(s) on {} board(s), efficiency {}, {} unplaced, {} rejected",
                report.placed_count,
                report.boards_used,
                report.efficiency_percent(),
                report.unplaced_count,
                report.rejected_count
            );
        }

        Commands::Check { job } => {
            let report = NestingJob::load(&job)?.check()?;
            println!(
                "{} piece(s), {:.0} mm² total cut area",
                report.piece_count, report.total_area
            );
            for rejected in &report.rejected {
                println!(
                    "  rejected {}/{} (x{}): {}",
                    rejected.module, rejected.name, rejected.quantity, rejected.reason
                );
            }
            for material in &report.missing_materials {
                println!("  no board template for material '{}'", material);
            }
            if !report.is_ok() {
                bail!("job has problems");
            }
            println!("Job OK");
        }
    }

    Ok(())
}
