use crate::error::{ResultsError, ResultsResult};
use bench_result_model::NAMESPACE_SEPARATOR;
use itertools::Itertools;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// A directory holding this file is a scenario module.
const SCENARIO_MANIFEST: &str = "Cargo.toml";

/// List the scenario modules below `root`.
///
/// Any directory under `root` that contains a `Cargo.toml` is a scenario module, named by its
/// path relative to `root` with `::` between components. Hidden directories and `target`
/// directories are not searched.
///
/// When `query` is not empty, only modules whose name contains every query word (ignoring case)
/// are returned.
pub fn list_scenario_modules(root: &Path, query: &[String]) -> ResultsResult<Vec<String>> {
    let metadata = std::fs::metadata(root).map_err(|source| ResultsError::ScenariosDir {
        path: root.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(ResultsError::ScenariosDir {
            path: root.to_path_buf(),
            source: std::io::Error::other("not a directory"),
        });
    }

    let query = query.iter().map(|word| word.to_lowercase()).collect::<Vec<_>>();

    let mut modules = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_entry(is_searchable)
    {
        let entry = entry.map_err(|source| ResultsError::ScanScenarios {
            path: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_dir() || !entry.path().join(SCENARIO_MANIFEST).is_file() {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .join(NAMESPACE_SEPARATOR);

        let lower = name.to_lowercase();
        if query.iter().all(|word| lower.contains(word.as_str())) {
            log::trace!("Found scenario module {name}");
            modules.push(name);
        }
    }
    modules.sort();

    Ok(modules)
}

fn is_searchable(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return true;
    }
    let name = entry.file_name().to_string_lossy();
    !(name.starts_with('.') || name == "target")
}
