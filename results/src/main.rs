#[macro_use]
extern crate log;

use anyhow::{anyhow, Context};
use bench_result_model::ResultFileNamePattern;
use bench_results::{
    cleanup_report_table, cleanup_results, list_results, list_scenario_modules,
    listed_rows_table, BatchStatus, CleanupOptions, Dirs, FileConfig, ListOptions,
    ResultFormatter, TableFormatter,
};
use clap::Parser as _;

use crate::cli::{CliArgs, Command};

mod cli;

const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
const CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = CliArgs::parse();
    debug!("{CRATE_NAME} {CRATE_VERSION}");

    let file_config = match &args.config {
        Some(path) => FileConfig::from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => FileConfig::default(),
    };
    let dirs = Dirs::resolve(args.result_dir, args.scenarios_dir, file_config);

    match args.command {
        Command::List {
            include_scenarios,
            exclude_scenarios,
            module_startup,
            latest,
            detail,
            format,
            json,
            query,
        } => {
            debug!("Listing results in {}", dirs.result_dir.display());
            let options = ListOptions::default()
                .include_scenarios(include_scenarios)
                .exclude_scenarios(exclude_scenarios)
                .module_startup(module_startup)
                .latest(latest)
                .query(query)
                .with_result(format);
            let rows = list_results(&dirs.result_dir, &ResultFileNamePattern::default(), &options)
                .context("Failed to list results")?;

            if json {
                if detail {
                    println!("{}", serde_json::to_string_pretty(&rows)?);
                } else {
                    let filenames = rows.iter().map(|row| &row.filename).collect::<Vec<_>>();
                    println!("{}", serde_json::to_string_pretty(&filenames)?);
                }
            } else if detail {
                println!("{}", listed_rows_table(&rows));
            } else {
                let formatter = TableFormatter;
                for row in &rows {
                    println!("{}", row.filename);
                    if let Some(record) = &row.result {
                        println!("{}\n", formatter.format(record));
                    }
                }
            }
        }
        Command::Cleanup {
            num_keep,
            dry_run,
            json,
            query,
        } => {
            info!(
                "Cleaning up results in {}, keeping {} per group{}",
                dirs.result_dir.display(),
                num_keep + 1,
                if dry_run { " (dry run)" } else { "" }
            );
            let report = cleanup_results(
                &dirs.result_dir,
                &ResultFileNamePattern::default(),
                &CleanupOptions {
                    num_keep,
                    query,
                    dry_run,
                },
            )
            .context("Failed to clean up results")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else if report.outcomes.is_empty() {
                println!("Nothing to clean up");
            } else {
                println!("{}", cleanup_report_table(&report));
            }

            if report.status() != BatchStatus::Ok {
                return Err(anyhow!(
                    "{} out of {} deletions failed",
                    report.failures().count(),
                    report.outcomes.len()
                ));
            }
        }
        Command::ListScenarios { query } => {
            debug!(
                "Listing scenario modules in {}",
                dirs.scenarios_dir.display()
            );
            let modules = list_scenario_modules(&dirs.scenarios_dir, &query)
                .context("Failed to list scenario modules")?;
            for module in modules {
                println!("{module}");
            }
        }
    }

    Ok(())
}
