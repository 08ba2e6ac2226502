use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(about, long_about = None)]
pub struct CliArgs {
    /// Directory holding the benchmark result files.
    #[arg(long, global = true, env = "BENCH_RESULT_DIR")]
    pub result_dir: Option<PathBuf>,

    /// Directory holding the scenario modules.
    #[arg(long, global = true, env = "BENCH_SCENARIOS_DIR")]
    pub scenarios_dir: Option<PathBuf>,

    /// Path to a TOML config file providing `result_dir` and `scenarios_dir`.
    #[arg(long, global = true, env = "BENCH_RESULTS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List benchmark results.
    List {
        /// Only list results for this scenario. Can be given multiple times.
        ///
        /// Scenarios can be written as `a::b`, `a/b` or `a-b`.
        #[arg(long = "include-scenario")]
        include_scenarios: Vec<String>,

        /// Do not list results for this scenario. Ignored if any scenario is included.
        #[arg(long = "exclude-scenario")]
        exclude_scenarios: Vec<String>,

        /// Only list module startup results (`true`) or ordinary results (`false`).
        #[arg(long)]
        module_startup: Option<bool>,

        /// Only list the latest result per scenario, module startup flag and CPU (`true`), or
        /// only results that have been superseded (`false`).
        #[arg(long)]
        latest: Option<bool>,

        /// Show a table of scenario, module startup, time, CPU and file name.
        #[arg(long, default_value = "false")]
        detail: bool,

        /// Print each result below its file name.
        #[arg(long, default_value = "false", conflicts_with_all = ["json", "detail"])]
        format: bool,

        /// Print the listing as JSON.
        #[arg(long, default_value = "false")]
        json: bool,

        /// Words that must each appear in the CPU, file name or scenario, ignoring case.
        query: Vec<String>,
    },

    /// Delete old results, keeping the newest `num-keep + 1` of each group.
    ///
    /// Results are grouped by scenario, CPU, module startup flag and module versions.
    Cleanup {
        /// Number of older results to keep per group in addition to the newest.
        #[arg(long, default_value = "0")]
        num_keep: usize,

        /// Show what would be deleted without deleting anything.
        #[arg(long, default_value = "false")]
        dry_run: bool,

        /// Print the outcome of each deletion as JSON.
        #[arg(long, default_value = "false")]
        json: bool,

        /// Only clean up results whose CPU, file name or scenario contain every word.
        query: Vec<String>,
    },

    /// List the available scenario modules.
    ListScenarios {
        /// Words that must each appear in the scenario name, ignoring case.
        query: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        use clap::CommandFactory;
        CliArgs::command().debug_assert();
    }

    #[test]
    fn parse_list_args() {
        let args = CliArgs::try_parse_from([
            "bench-results",
            "list",
            "--include-scenario",
            "sort/quick",
            "--latest",
            "true",
            "--detail",
            "xeon",
        ])
        .unwrap();

        let Command::List {
            include_scenarios,
            latest,
            detail,
            query,
            ..
        } = args.command
        else {
            panic!("Expected list command");
        };
        assert_eq!(include_scenarios, vec!["sort/quick"]);
        assert_eq!(latest, Some(true));
        assert!(detail);
        assert_eq!(query, vec!["xeon"]);
    }

    #[test]
    fn parse_cleanup_args() {
        let args = CliArgs::try_parse_from([
            "bench-results",
            "cleanup",
            "--num-keep",
            "2",
            "--dry-run",
            "--result-dir",
            "/tmp/results",
        ])
        .unwrap();

        assert_eq!(args.result_dir, Some(PathBuf::from("/tmp/results")));
        let Command::Cleanup {
            num_keep, dry_run, ..
        } = args.command
        else {
            panic!("Expected cleanup command");
        };
        assert_eq!(num_keep, 2);
        assert!(dry_run);
    }

    #[test]
    fn format_conflicts_with_detail() {
        let result = CliArgs::try_parse_from(["bench-results", "list", "--detail", "--format"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_cleanup_json() {
        let args = CliArgs::try_parse_from(["bench-results", "cleanup", "--json"]).unwrap();

        let Command::Cleanup { json, dry_run, .. } = args.command else {
            panic!("Expected cleanup command");
        };
        assert!(json);
        assert!(!dry_run);
    }
}
