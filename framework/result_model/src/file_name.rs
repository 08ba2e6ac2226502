use regex::{Captures, Regex};

/// Separator between the parts of a scenario name, e.g. `sorting::quick`.
pub const NAMESPACE_SEPARATOR: &str = "::";

/// Separator that stands in for [NAMESPACE_SEPARATOR] in result file names.
pub const FILE_NAME_SEPARATOR: char = '-';

const MODULE_STARTUP_SEGMENT: &str = ".module_startup";

const RESULT_FILE_NAME_PATTERN: &str = r"^(\w+(?:-\w+)*)(\.module_startup)?\.(\d{4})-(\d{2})-(\d{2})T(\d{2})-(\d{2})-(\d{2})\.json$";

/// The information encoded in the name of a result file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultFileName {
    /// The scenario name, using [NAMESPACE_SEPARATOR] between its parts
    pub scenario: String,
    /// Whether the file holds a module startup result
    pub module_startup: bool,
    /// The time the result was recorded, as `YYYY-MM-DDTHH:MM:SS`
    ///
    /// This format is fixed width and zero padded so it sorts lexically in time order.
    pub timestamp: String,
}

impl ResultFileName {
    /// Render this name back into the form used on disk.
    pub fn to_file_name(&self) -> String {
        format!(
            "{}{}.{}.json",
            self.scenario
                .replace(NAMESPACE_SEPARATOR, &FILE_NAME_SEPARATOR.to_string()),
            if self.module_startup {
                MODULE_STARTUP_SEGMENT
            } else {
                ""
            },
            self.timestamp.replace(':', "-"),
        )
    }
}

/// The compiled result file name pattern.
///
/// Build one per run and hand it to whatever needs to recognise result files.
#[derive(Debug, Clone)]
pub struct ResultFileNamePattern {
    regex: Regex,
}

impl Default for ResultFileNamePattern {
    fn default() -> Self {
        Self {
            regex: Regex::new(RESULT_FILE_NAME_PATTERN)
                .expect("result file name pattern is a valid regex"),
        }
    }
}

impl ResultFileNamePattern {
    /// Parse a file name, returning `None` if it is not the name of a result file.
    pub fn parse(&self, file_name: &str) -> Option<ResultFileName> {
        let caps = self.regex.captures(file_name)?;

        let scenario = caps
            .get(1)?
            .as_str()
            .replace(FILE_NAME_SEPARATOR, NAMESPACE_SEPARATOR);
        let module_startup = caps.get(2).is_some();
        let timestamp = format!(
            "{}-{}-{}T{}:{}:{}",
            group(&caps, 3)?,
            group(&caps, 4)?,
            group(&caps, 5)?,
            group(&caps, 6)?,
            group(&caps, 7)?,
            group(&caps, 8)?,
        );

        Some(ResultFileName {
            scenario,
            module_startup,
            timestamp,
        })
    }
}

fn group<'a>(caps: &Captures<'a>, index: usize) -> Option<&'a str> {
    caps.get(index).map(|m| m.as_str())
}
