use bench_result_model::ResultFileError;
use std::path::PathBuf;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(Debug, thiserror::Error)]
pub enum ResultsError {
    #[error("Cannot read result directory {}: {source}", .path.display())]
    ResultDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    ResultFile(#[from] ResultFileError),
    #[error("Cannot read scenarios directory {}: {source}", .path.display())]
    ScenariosDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to scan scenarios directory {}: {source}", .path.display())]
    ScanScenarios {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}
