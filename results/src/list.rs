use crate::error::{ResultsError, ResultsResult};
use bench_result_model::{
    load_result_record, ResultFileNamePattern, ResultRecord, FILE_NAME_SEPARATOR,
    NAMESPACE_SEPARATOR,
};
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::Path;

/// Filters applied by [list_results].
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Only list these scenarios. Takes precedence over `exclude_scenarios`.
    pub include_scenarios: Vec<String>,
    /// Do not list these scenarios.
    pub exclude_scenarios: Vec<String>,
    /// Only list module startup results (`true`) or only ordinary results (`false`).
    pub module_startup: Option<bool>,
    /// Words that must each appear in the CPU, file name or scenario of a listed result.
    pub query: Vec<String>,
    /// Only list the latest result of each group (`true`) or everything but the latest (`false`).
    pub latest: Option<bool>,
    /// Keep the loaded [ResultRecord] on each row.
    pub with_result: bool,
}

impl ListOptions {
    /// Builds [`ListOptions`] with the specified scenarios to include.
    pub fn include_scenarios(mut self, scenarios: Vec<String>) -> Self {
        self.include_scenarios = scenarios;
        self
    }

    /// Builds [`ListOptions`] with the specified scenarios to exclude.
    pub fn exclude_scenarios(mut self, scenarios: Vec<String>) -> Self {
        self.exclude_scenarios = scenarios;
        self
    }

    /// Builds [`ListOptions`] with the specified module startup filter.
    pub fn module_startup(mut self, module_startup: Option<bool>) -> Self {
        self.module_startup = module_startup;
        self
    }

    /// Builds [`ListOptions`] with the specified query words.
    pub fn query(mut self, query: Vec<String>) -> Self {
        self.query = query;
        self
    }

    /// Builds [`ListOptions`] with the specified latest filter.
    pub fn latest(mut self, latest: Option<bool>) -> Self {
        self.latest = latest;
        self
    }

    /// Builds [`ListOptions`] that keeps the loaded records.
    pub fn with_result(mut self, with_result: bool) -> Self {
        self.with_result = with_result;
        self
    }
}

/// A result file found by [list_results].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListedRow {
    pub filename: String,
    pub scenario: String,
    /// The file name flag, overridden to `true` if the record says so
    pub module_startup: bool,
    pub time: String,
    pub cpu: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ResultRecord>,
}

impl ListedRow {
    /// Key of the group this row competes with for "latest".
    ///
    /// Module startup results are encoded as `0` and ordinary results as `1`.
    pub fn group_key(&self) -> String {
        format!(
            "{}.{}.{}",
            self.scenario,
            if self.module_startup { "0" } else { "1" },
            self.cpu.as_deref().unwrap_or_default()
        )
    }

    /// Check that every (lowercased) word appears in the CPU, file name or scenario.
    fn matches_query(&self, words: &[String]) -> bool {
        let cpu = self.cpu.as_deref().unwrap_or_default().to_lowercase();
        let filename = self.filename.to_lowercase();
        let scenario = self.scenario.to_lowercase();

        words.iter().all(|word| {
            cpu.contains(word.as_str())
                || filename.contains(word.as_str())
                || scenario.contains(word.as_str())
        })
    }
}

/// List the result files in `dir`.
///
/// Files whose names are not result file names are skipped. Every other selected file is loaded
/// and a file that cannot be read or parsed fails the whole listing.
///
/// Rows are returned in file name order.
pub fn list_results(
    dir: &Path,
    pattern: &ResultFileNamePattern,
    options: &ListOptions,
) -> ResultsResult<Vec<ListedRow>> {
    let file_names = read_sorted_file_names(dir)?;
    log::debug!(
        "Found {} entries in result directory {}",
        file_names.len(),
        dir.display()
    );

    let include_scenarios = normalize_scenarios(&options.include_scenarios);
    let exclude_scenarios = normalize_scenarios(&options.exclude_scenarios);
    let query = options
        .query
        .iter()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    let mut latest_by_group: HashMap<String, String> = HashMap::new();

    for filename in file_names {
        let Some(parsed) = pattern.parse(&filename) else {
            log::trace!("Skipping non-result file: {filename}");
            continue;
        };

        if !include_scenarios.is_empty() {
            if !include_scenarios.contains(&parsed.scenario) {
                continue;
            }
        } else if exclude_scenarios.contains(&parsed.scenario) {
            continue;
        }

        let record = load_result_record(dir.join(&filename))?;
        let meta = record.meta();

        let module_startup = parsed.module_startup || meta.module_startup;
        if options
            .module_startup
            .is_some_and(|wanted| wanted != module_startup)
        {
            continue;
        }

        let row = ListedRow {
            filename,
            scenario: parsed.scenario,
            module_startup,
            time: parsed.timestamp,
            cpu: meta.cpu,
            result: options.with_result.then_some(record),
        };
        let group_key = row.group_key();

        if !query.is_empty() && !row.matches_query(&query) {
            continue;
        }

        match latest_by_group.entry(group_key.clone()) {
            Entry::Vacant(entry) => {
                entry.insert(row.time.clone());
            }
            Entry::Occupied(mut entry) => {
                if row.time > *entry.get() {
                    entry.insert(row.time.clone());
                }
            }
        }

        rows.push((group_key, row));
    }

    if let Some(latest) = options.latest {
        rows.retain(|(group_key, row)| {
            let is_latest = latest_by_group.get(group_key) == Some(&row.time);
            is_latest == latest
        });
    }

    log::debug!("Listed {} results", rows.len());

    Ok(rows.into_iter().map(|(_, row)| row).collect())
}

/// Accept scenario names typed either as paths (`a/b`), file names (`a-b`) or namespaces (`a::b`).
fn normalize_scenarios(scenarios: &[String]) -> Vec<String> {
    scenarios
        .iter()
        .map(|scenario| {
            scenario
                .replace('/', NAMESPACE_SEPARATOR)
                .replace(FILE_NAME_SEPARATOR, NAMESPACE_SEPARATOR)
        })
        .collect()
}

fn read_sorted_file_names(dir: &Path) -> ResultsResult<Vec<String>> {
    let dir_error = |source| ResultsError::ResultDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut file_names = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(dir_error)? {
        let entry = entry.map_err(dir_error)?;
        // Follows symlinks, so a link to a directory is skipped too
        if entry.path().is_dir() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => file_names.push(name),
            Err(name) => log::trace!("Skipping non UTF-8 file name: {name:?}"),
        }
    }
    file_names.sort();

    Ok(file_names)
}
