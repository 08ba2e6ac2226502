use crate::error::ResultsResult;
use crate::list::{list_results, ListOptions, ListedRow};
use bench_result_model::{load_result_record, ResultFileNamePattern};
use itertools::Itertools;
use serde::Serialize;
use std::path::Path;

/// Options for [cleanup_results].
#[derive(Debug, Clone, Default)]
pub struct CleanupOptions {
    /// How many results to keep per group on top of the newest one.
    pub num_keep: usize,
    /// Only consider results matching all of these words, see [ListOptions::query].
    pub query: Vec<String>,
    /// Report what would be deleted without deleting anything.
    pub dry_run: bool,
}

/// Results that are only comparable with each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct RetentionKey {
    scenario: String,
    cpu: String,
    module_startup: u8,
    module_versions: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "error")]
pub enum DeletionStatus {
    Deleted,
    WouldDelete,
    Failed(String),
}

impl DeletionStatus {
    pub fn is_success(&self) -> bool {
        !matches!(self, DeletionStatus::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionOutcome {
    pub filename: String,
    #[serde(flatten)]
    pub status: DeletionStatus,
}

/// Overall status of a cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    /// Every deletion succeeded, or there was nothing to delete
    Ok,
    /// Some deletions failed
    Partial,
    /// Every deletion failed
    Failed,
}

/// The per-file outcomes of a cleanup.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleanupReport {
    pub outcomes: Vec<DeletionOutcome>,
}

impl CleanupReport {
    pub fn status(&self) -> BatchStatus {
        let failed = self.failures().count();
        if failed == 0 {
            BatchStatus::Ok
        } else if failed == self.outcomes.len() {
            BatchStatus::Failed
        } else {
            BatchStatus::Partial
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &DeletionOutcome> {
        self.outcomes.iter().filter(|o| !o.status.is_success())
    }
}

/// Delete old results in `dir`, keeping the newest `num_keep + 1` of each group.
///
/// Results are grouped by scenario, CPU, module startup flag and module versions. Failing to
/// list the directory is an error, failing to delete a file is recorded in the report and does
/// not stop the remaining deletions.
pub fn cleanup_results(
    dir: &Path,
    pattern: &ResultFileNamePattern,
    options: &CleanupOptions,
) -> ResultsResult<CleanupReport> {
    let candidates = select_deletions(dir, pattern, options)?;
    Ok(delete_candidates(dir, candidates, options.dry_run))
}

/// Pick the file names to delete, oldest first within each group.
fn select_deletions(
    dir: &Path,
    pattern: &ResultFileNamePattern,
    options: &CleanupOptions,
) -> ResultsResult<Vec<String>> {
    let rows = list_results(
        dir,
        pattern,
        &ListOptions::default()
            .query(options.query.clone())
            .with_result(true),
    )?;

    let mut keyed = Vec::with_capacity(rows.len());
    for row in rows {
        let key = retention_key(dir, &row)?;
        keyed.push((key, row.filename));
    }

    let groups = keyed.into_iter().into_group_map();

    let mut candidates = Vec::new();
    for (key, filenames) in groups.into_iter().sorted_by(|(a, _), (b, _)| a.cmp(b)) {
        let filenames = filenames.into_iter().sorted().collect::<Vec<_>>();
        let excess = filenames.len().saturating_sub(options.num_keep + 1);
        log::debug!(
            "Group {key:?} has {} results, removing {excess}",
            filenames.len()
        );
        candidates.extend(filenames.into_iter().take(excess));
    }

    Ok(candidates)
}

/// Delete each candidate in turn, recording the outcome of every file.
fn delete_candidates(dir: &Path, candidates: Vec<String>, dry_run: bool) -> CleanupReport {
    CleanupReport {
        outcomes: candidates
            .into_iter()
            .map(|filename| delete_result_file(dir, filename, dry_run))
            .collect(),
    }
}

fn retention_key(dir: &Path, row: &ListedRow) -> ResultsResult<RetentionKey> {
    let meta = match &row.result {
        Some(record) => record.meta(),
        None => load_result_record(dir.join(&row.filename))?.meta(),
    };

    Ok(RetentionKey {
        scenario: row.scenario.clone(),
        cpu: row.cpu.clone().unwrap_or_default(),
        module_startup: u8::from(row.module_startup),
        module_versions: meta.module_versions_key(),
    })
}

fn delete_result_file(dir: &Path, filename: String, dry_run: bool) -> DeletionOutcome {
    if dry_run {
        log::info!("[DRY RUN] Would delete {filename}");
        return DeletionOutcome {
            filename,
            status: DeletionStatus::WouldDelete,
        };
    }

    log::info!("Deleting {filename}");
    let status = match std::fs::remove_file(dir.join(&filename)) {
        Ok(()) => DeletionStatus::Deleted,
        Err(e) => {
            log::warn!("Failed to delete {filename}: {e}");
            DeletionStatus::Failed(e.to_string())
        }
    };

    DeletionOutcome { filename, status }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{write_result, ResultSpec};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn remaining(dir: &Path) -> Vec<String> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .sorted()
            .collect()
    }

    fn cleanup(dir: &Path, num_keep: usize, dry_run: bool) -> CleanupReport {
        cleanup_results(
            dir,
            &ResultFileNamePattern::default(),
            &CleanupOptions {
                num_keep,
                query: vec![],
                dry_run,
            },
        )
        .unwrap()
    }

    fn write_series(dir: &Path, count: u32) {
        for day in 1..=count {
            write_result(
                dir,
                ResultSpec::new("foo", &format!("2023-01-{day:02}T00-00-00")).cpu("x"),
            );
        }
    }

    #[test]
    fn cleanup_deletes_oldest_beyond_keep() {
        let dir = tempfile::tempdir().unwrap();
        write_series(dir.path(), 5);

        let report = cleanup(dir.path(), 1, false);

        assert_eq!(
            report.outcomes,
            vec![
                DeletionOutcome {
                    filename: "foo.2023-01-01T00-00-00.json".to_string(),
                    status: DeletionStatus::Deleted,
                },
                DeletionOutcome {
                    filename: "foo.2023-01-02T00-00-00.json".to_string(),
                    status: DeletionStatus::Deleted,
                },
                DeletionOutcome {
                    filename: "foo.2023-01-03T00-00-00.json".to_string(),
                    status: DeletionStatus::Deleted,
                },
            ]
        );
        assert_eq!(report.status(), BatchStatus::Ok);
        assert_eq!(
            remaining(dir.path()),
            vec!["foo.2023-01-04T00-00-00.json", "foo.2023-01-05T00-00-00.json"]
        );
    }

    #[test]
    fn cleanup_keeps_small_groups() {
        let dir = tempfile::tempdir().unwrap();
        write_series(dir.path(), 3);

        let report = cleanup(dir.path(), 2, false);

        assert!(report.outcomes.is_empty());
        assert_eq!(report.status(), BatchStatus::Ok);
        assert_eq!(remaining(dir.path()).len(), 3);
    }

    #[test]
    fn dry_run_reports_without_deleting() {
        let dir = tempfile::tempdir().unwrap();
        write_series(dir.path(), 4);

        let dry = cleanup(dir.path(), 0, true);
        assert_eq!(remaining(dir.path()).len(), 4);
        assert!(dry
            .outcomes
            .iter()
            .all(|o| o.status == DeletionStatus::WouldDelete));

        let real = cleanup(dir.path(), 0, false);
        assert_eq!(
            dry.outcomes.iter().map(|o| &o.filename).collect::<Vec<_>>(),
            real.outcomes.iter().map(|o| &o.filename).collect::<Vec<_>>(),
        );
        assert_eq!(remaining(dir.path()), vec!["foo.2023-01-04T00-00-00.json"]);
    }

    #[test]
    fn groups_split_by_cpu_startup_and_versions() {
        let dir = tempfile::tempdir().unwrap();
        write_result(dir.path(), ResultSpec::new("foo", "2023-01-01T00-00-00").cpu("x"));
        write_result(dir.path(), ResultSpec::new("foo", "2023-01-02T00-00-00").cpu("y"));
        write_result(
            dir.path(),
            ResultSpec::new("foo", "2023-01-03T00-00-00")
                .cpu("x")
                .module_startup(),
        );
        write_result(
            dir.path(),
            ResultSpec::new("foo", "2023-01-04T00-00-00")
                .cpu("x")
                .module_versions(json!({"serde": "1.0"})),
        );

        let report = cleanup(dir.path(), 0, false);

        assert!(report.outcomes.is_empty());
        assert_eq!(remaining(dir.path()).len(), 4);
    }

    #[test]
    fn version_order_does_not_split_groups() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("foo.2023-01-01T00-00-00.json"),
            r#"[200, "OK", [], {"func.module_versions": {"a": "1", "b": "2"}}]"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("foo.2023-01-02T00-00-00.json"),
            r#"[200, "OK", [], {"func.module_versions": {"b": "2", "a": "1"}}]"#,
        )
        .unwrap();

        let report = cleanup(dir.path(), 0, false);

        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(report.outcomes[0].filename, "foo.2023-01-01T00-00-00.json");
    }

    #[test]
    fn query_limits_cleanup() {
        let dir = tempfile::tempdir().unwrap();
        write_series(dir.path(), 2);
        write_result(dir.path(), ResultSpec::new("bar", "2023-01-01T00-00-00"));
        write_result(dir.path(), ResultSpec::new("bar", "2023-01-02T00-00-00"));

        let report = cleanup_results(
            dir.path(),
            &ResultFileNamePattern::default(),
            &CleanupOptions {
                num_keep: 0,
                query: vec!["BAR".to_string()],
                dry_run: false,
            },
        )
        .unwrap();

        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(report.outcomes[0].filename, "bar.2023-01-01T00-00-00.json");
        assert_eq!(remaining(dir.path()).len(), 3);
    }

    #[test]
    fn failed_deletion_does_not_stop_batch() {
        let dir = tempfile::tempdir().unwrap();
        write_series(dir.path(), 2);

        let report = delete_candidates(
            dir.path(),
            vec![
                "foo.2023-01-01T00-00-00.json".to_string(),
                "gone.2023-01-01T00-00-00.json".to_string(),
                "foo.2023-01-02T00-00-00.json".to_string(),
            ],
            false,
        );

        let statuses = report
            .outcomes
            .iter()
            .map(|o| &o.status)
            .collect::<Vec<_>>();
        assert_eq!(statuses[0], &DeletionStatus::Deleted);
        assert!(matches!(statuses[1], DeletionStatus::Failed(_)));
        assert_eq!(statuses[2], &DeletionStatus::Deleted);
        assert_eq!(report.status(), BatchStatus::Partial);
        assert_eq!(report.failures().count(), 1);
        assert!(remaining(dir.path()).is_empty());
    }

    #[test]
    fn all_failed_deletions_fail_batch() {
        let dir = tempfile::tempdir().unwrap();

        let report = delete_candidates(dir.path(), vec!["gone.json".to_string()], false);

        assert_eq!(report.status(), BatchStatus::Failed);
    }

    #[test]
    fn outcome_serializes_status() {
        let outcome = DeletionOutcome {
            filename: "foo.json".to_string(),
            status: DeletionStatus::Failed("denied".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"filename": "foo.json", "status": "failed", "error": "denied"})
        );
    }
}
