use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const STATUS_INDEX: usize = 0;
const MESSAGE_INDEX: usize = 1;
const PAYLOAD_INDEX: usize = 2;
const META_INDEX: usize = 3;

const CPU_INFO_KEY: &str = "func.cpu_info";
const MODULE_STARTUP_KEY: &str = "func.module_startup";
const MODULE_VERSIONS_KEY: &str = "func.module_versions";

/// A benchmark result as stored in a result file.
///
/// The document is kept as-is. By convention it is a JSON array of
/// `[status, message, payload, metadata]`, but nothing here fails if it is not. Accessors return
/// `None` or defaults for anything that is missing or has an unexpected shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultRecord(Value);

impl ResultRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// The numeric status of the benchmark run
    pub fn status(&self) -> Option<u64> {
        self.field(STATUS_INDEX).and_then(Value::as_u64)
    }

    /// The status message of the benchmark run
    pub fn message(&self) -> Option<&str> {
        self.field(MESSAGE_INDEX).and_then(Value::as_str)
    }

    /// The benchmark output, usually an array of row objects
    pub fn payload(&self) -> Option<&Value> {
        self.field(PAYLOAD_INDEX)
    }

    /// Extract the metadata used to group results.
    pub fn meta(&self) -> ResultMeta {
        let Some(meta) = self.field(META_INDEX).and_then(Value::as_object) else {
            return ResultMeta::default();
        };

        let cpu = meta
            .get(CPU_INFO_KEY)
            .and_then(Value::as_array)
            .and_then(|cpus| cpus.first())
            .and_then(|cpu| cpu.get("name"))
            .and_then(Value::as_str)
            .map(str::to_string);

        let module_startup = meta.get(MODULE_STARTUP_KEY).is_some_and(is_truthy);

        let module_versions = meta
            .get(MODULE_VERSIONS_KEY)
            .and_then(Value::as_object)
            .map(|versions| {
                versions
                    .iter()
                    .map(|(module, version)| (module.clone(), version.clone()))
                    .collect()
            });

        ResultMeta {
            cpu,
            module_startup,
            module_versions,
        }
    }

    fn field(&self, index: usize) -> Option<&Value> {
        self.0.as_array().and_then(|fields| fields.get(index))
    }
}

/// Metadata extracted from a [ResultRecord].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultMeta {
    /// Name of the first CPU the benchmark ran on
    pub cpu: Option<String>,
    /// Set when the record itself says it measured module startup
    pub module_startup: bool,
    /// Versions of the modules that took part in the benchmark
    pub module_versions: Option<BTreeMap<String, Value>>,
}

impl ResultMeta {
    /// A stable string for the module versions, suitable for use in a grouping key.
    ///
    /// Two records with the same versions produce the same key no matter what order the versions
    /// were written in. Records without versions produce `null`.
    pub fn module_versions_key(&self) -> String {
        match &self.module_versions {
            Some(versions) => canonical_json(&Value::Object(
                versions
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            )),
            None => Value::Null.to_string(),
        }
    }
}

/// Serialize a JSON value with object keys sorted at every level.
pub fn canonical_json(value: &Value) -> String {
    sort_keys(value).to_string()
}

fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(object) => {
            let sorted: BTreeMap<&String, &Value> = object.iter().collect();
            let mut out = Map::with_capacity(sorted.len());
            for (key, value) in sorted {
                out.insert(key.clone(), sort_keys(value));
            }
            Value::Object(out)
        }
        Value::Array(values) => Value::Array(values.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        _ => false,
    }
}

/// Error loading a result file.
#[derive(Debug, thiserror::Error)]
pub enum ResultFileError {
    #[error("IO error reading result file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid JSON in result file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Load a result record from a file
pub fn load_result_record(path: impl AsRef<Path>) -> Result<ResultRecord, ResultFileError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| ResultFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = std::io::BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| ResultFileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
