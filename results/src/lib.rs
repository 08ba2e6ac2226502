//! Manage benchmark result files and discover benchmark scenarios.
//!
//! - [list_results] lists the result files in a directory, with filters.
//! - [cleanup_results] deletes superseded results.
//! - [list_scenario_modules] finds the scenario modules in a scenarios directory.

mod cleanup;
mod config;
mod error;
mod format;
mod list;
mod scenario;

#[cfg(test)]
mod test_support;

pub use cleanup::{
    cleanup_results, BatchStatus, CleanupOptions, CleanupReport, DeletionOutcome,
    DeletionStatus,
};
pub use config::{ConfigError, Dirs, FileConfig, DEFAULT_RESULT_DIR, DEFAULT_SCENARIOS_DIR};
pub use error::{ResultsError, ResultsResult};
pub use format::{cleanup_report_table, listed_rows_table, ResultFormatter, TableFormatter};
pub use list::{list_results, ListOptions, ListedRow};
pub use scenario::list_scenario_modules;
