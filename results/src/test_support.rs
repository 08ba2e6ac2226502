use bench_result_model::ResultFileName;
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};

/// Describes a result file to write for a test.
pub struct ResultSpec {
    name: ResultFileName,
    cpu: Option<String>,
    meta_module_startup: bool,
    module_versions: Option<Value>,
}

impl ResultSpec {
    /// `scenario` is in file name form (`a-b`), `timestamp` as `YYYY-MM-DDTHH-MM-SS`.
    pub fn new(scenario: &str, timestamp: &str) -> Self {
        Self {
            name: ResultFileName {
                scenario: scenario.replace('-', "::"),
                module_startup: false,
                timestamp: timestamp.replace('-', ":").replacen(':', "-", 2),
            },
            cpu: None,
            meta_module_startup: false,
            module_versions: None,
        }
    }

    pub fn module_startup(mut self) -> Self {
        self.name.module_startup = true;
        self
    }

    pub fn meta_module_startup(mut self) -> Self {
        self.meta_module_startup = true;
        self
    }

    pub fn cpu(mut self, cpu: &str) -> Self {
        self.cpu = Some(cpu.to_string());
        self
    }

    pub fn module_versions(mut self, versions: Value) -> Self {
        self.module_versions = Some(versions);
        self
    }
}

/// Write a result file and return its path.
pub fn write_result(dir: &Path, spec: ResultSpec) -> PathBuf {
    let mut meta = Map::new();
    if let Some(cpu) = spec.cpu {
        meta.insert("func.cpu_info".to_string(), json!([{ "name": cpu }]));
    }
    if spec.meta_module_startup {
        meta.insert("func.module_startup".to_string(), json!(true));
    }
    if let Some(versions) = spec.module_versions {
        meta.insert("func.module_versions".to_string(), versions);
    }

    let record = json!([200, "OK", [{ "participant": "baseline", "rate": 100 }], meta]);
    let path = dir.join(spec.name.to_file_name());
    std::fs::write(&path, record.to_string()).expect("failed to write result file");
    path
}
