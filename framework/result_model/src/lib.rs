//! Model for benchmark result files.
//!
//! Result files live in a flat directory and are named
//! `<scenario-with-dashes>[.module_startup].<YYYY>-<MM>-<DD>T<HH>-<MM>-<SS>.json`. Each file holds a
//! single [ResultRecord], a JSON array whose fourth element carries metadata about the run.

mod file_name;
mod record;

pub use file_name::{ResultFileName, ResultFileNamePattern, FILE_NAME_SEPARATOR, NAMESPACE_SEPARATOR};
pub use record::{canonical_json, load_result_record, ResultFileError, ResultMeta, ResultRecord};
