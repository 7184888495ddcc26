//! Loading a dataset split across several segment files.
//!
//! Archives are typically exported as numbered segments
//! (`IpawsArchivedAlerts_2025_001.jsonl`, `IpawsArchivedAlerts_2025_002.jsonl`, ...).

use std::io;
use std::path::PathBuf;

use crate::error::{LoadError, LoadResult};
use crate::types::AlertTable;

use super::observability::{LoadContext, Segment};
use super::unified::{load_observed, report, LoadOptions};

/// Load every file matching the glob `pattern` and concatenate them in sorted path order.
///
/// Each file is loaded like [`super::unified::load_from_path`], so observers see one event per
/// file with [`super::observability::LoadContext::segment`] set. The first failing file fails the
/// whole load. A pattern that matches nothing fails with [`LoadError::NotFound`], and an invalid
/// pattern with [`LoadError::InvalidOptions`]; both are reported to the observer with the
/// pattern as the context path.
///
/// ```no_run
/// use alert_dataset::loader::{load_glob, LoadOptions};
///
/// # fn main() -> Result<(), alert_dataset::LoadError> {
/// let year = load_glob("data/IpawsArchivedAlerts_2025_*.jsonl", &LoadOptions::default())?;
/// println!("records={}", year.len());
/// # Ok(())
/// # }
/// ```
pub fn load_glob(pattern: &str, options: &LoadOptions) -> LoadResult<AlertTable> {
    let paths = match expand(pattern) {
        Ok(paths) => paths,
        Err(e) => {
            // Nothing was loaded yet; report the pattern itself as the failed input.
            let ctx = LoadContext {
                path: PathBuf::from(pattern),
                format: None,
                segment: None,
            };
            let result = Err(e);
            report(options, &ctx, &result);
            return result;
        }
    };

    let total = paths.len();
    let mut tables = Vec::with_capacity(total);
    for (i, path) in paths.iter().enumerate() {
        let segment = Segment { index: i + 1, total };
        tables.push(load_observed(path, options, Some(segment))?);
    }
    Ok(AlertTable::concat(tables))
}

/// Expand `pattern` into existing files, sorted by path.
fn expand(pattern: &str) -> LoadResult<Vec<PathBuf>> {
    let entries = glob::glob(pattern).map_err(|e| {
        LoadError::invalid_options(format!("invalid glob pattern '{pattern}': {e}"))
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| {
            let path = e.path().to_path_buf();
            LoadError::not_found(path, e.into_error())
        })?;
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    if paths.is_empty() {
        return Err(LoadError::not_found(
            pattern,
            io::Error::new(io::ErrorKind::NotFound, "no files match pattern"),
        ));
    }
    Ok(paths)
}
