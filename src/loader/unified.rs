//! Unified load entrypoint.
//!
//! Most callers should use [`load_from_path`] or a [`DatasetLoader`], which load a file into an
//! in-memory [`crate::types::AlertTable`].
//!
//! - If [`LoadOptions::format`] is `None`, the format is inferred from the file extension.
//! - If [`LoadOptions::compression`] is `None`, a trailing `.zst` or `.xz` selects stream
//!   decoding.
//! - If a [`super::observability::LoadObserver`] is provided, success/failure/alerts are
//!   reported to it.

use std::error::Error as StdError;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{LoadError, LoadResult};
use crate::types::AlertTable;

use super::compression::Compression;
use super::observability::{LoadContext, LoadObserver, LoadSeverity, LoadStats, Segment};
use super::{jsonl, multi_file, parquet};

/// Supported on-disk encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    /// One JSON object per line.
    JsonLines,
    /// Apache Parquet.
    Parquet,
}

impl DatasetFormat {
    /// Parse a format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jsonl" | "ndjson" | "json" => Some(Self::JsonLines),
            "parquet" | "pq" => Some(Self::Parquet),
            _ => None,
        }
    }

    /// Infer format and compression from a path.
    ///
    /// A trailing compression extension is peeled off first, so `alerts.jsonl.zst` is
    /// line-delimited JSON compressed with zstd.
    pub fn infer(path: &Path) -> LoadResult<(Self, Compression)> {
        let ext = extension_of(path).ok_or_else(|| {
            LoadError::invalid_options(format!(
                "cannot infer format: path has no extension ({})",
                path.display()
            ))
        })?;

        let (ext, compression) = match Compression::from_extension(ext) {
            Some(c) => {
                let inner = path
                    .file_stem()
                    .map(Path::new)
                    .and_then(extension_of)
                    .ok_or_else(|| {
                        LoadError::invalid_options(format!(
                            "cannot infer format: compressed path has no inner extension ({})",
                            path.display()
                        ))
                    })?;
                (inner, c)
            }
            None => (ext, Compression::None),
        };

        let format = Self::from_extension(ext).ok_or_else(|| {
            LoadError::invalid_options(format!(
                "cannot infer format from extension '{ext}' for path ({})",
                path.display()
            ))
        })?;
        Ok((format, compression))
    }

    /// Short lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::JsonLines => "jsonl",
            Self::Parquet => "parquet",
        }
    }
}

impl fmt::Display for DatasetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn extension_of(path: &Path) -> Option<&str> {
    path.extension().and_then(|s| s.to_str())
}

/// Options controlling how a path is loaded.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct LoadOptions {
    /// If `None`, infer the format from the file extension.
    pub format: Option<DatasetFormat>,
    /// If `None`, infer compression from a trailing `.zst`/`.xz` (or `.zstd`/`.lzma`) extension.
    pub compression: Option<Compression>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn LoadObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: LoadSeverity,
}

impl fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("format", &self.format)
            .field("compression", &self.compression)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            format: None,
            compression: None,
            observer: None,
            alert_at_or_above: LoadSeverity::Critical,
        }
    }
}

/// Load a dataset from `path` using `options`.
///
/// When an observer is configured, this function reports:
///
/// - `on_success` on success, with record/column counts
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// # Examples
///
/// ```no_run
/// use alert_dataset::loader::{load_from_path, LoadOptions};
///
/// # fn main() -> Result<(), alert_dataset::LoadError> {
/// // `.jsonl` selects the line-delimited JSON loader.
/// let table = load_from_path("data/IpawsArchivedAlerts_2025_001.jsonl", &LoadOptions::default())?;
/// println!("records={}", table.len());
/// # Ok(())
/// # }
/// ```
///
/// Force a format for a file without a telling extension:
///
/// ```no_run
/// use alert_dataset::loader::{load_from_path, DatasetFormat, LoadOptions};
///
/// # fn main() -> Result<(), alert_dataset::LoadError> {
/// let opts = LoadOptions {
///     format: Some(DatasetFormat::Parquet),
///     ..Default::default()
/// };
/// let table = load_from_path("alerts_export", &opts)?;
/// println!("columns={:?}", table.field_names());
/// # Ok(())
/// # }
/// ```
pub fn load_from_path(path: impl AsRef<Path>, options: &LoadOptions) -> LoadResult<AlertTable> {
    load_observed(path.as_ref(), options, None)
}

/// [`load_from_path`], reporting `segment` in the observer context.
pub(crate) fn load_observed(
    path: &Path,
    options: &LoadOptions,
    segment: Option<Segment>,
) -> LoadResult<AlertTable> {
    let resolved = resolve(path, options);

    let ctx = LoadContext {
        path: path.to_path_buf(),
        format: resolved.as_ref().ok().map(|(f, _)| *f),
        segment,
    };

    #[cfg(feature = "tracing")]
    tracing::debug!(path = %path.display(), format = ctx.format_label(), "loading alert dataset");

    let result = resolved.and_then(|(format, compression)| match format {
        DatasetFormat::JsonLines => jsonl::load_jsonlines_compressed(path, compression),
        DatasetFormat::Parquet => parquet::load_parquet(path),
    });

    report(options, &ctx, &result);
    result
}

fn resolve(path: &Path, options: &LoadOptions) -> LoadResult<(DatasetFormat, Compression)> {
    let (format, compression) = match (options.format, options.compression) {
        (Some(f), Some(c)) => (f, c),
        (Some(f), None) => (f, Compression::from_path(path)),
        (None, declared) => {
            let (f, inferred) = DatasetFormat::infer(path)?;
            (f, declared.unwrap_or(inferred))
        }
    };

    if format == DatasetFormat::Parquet && compression != Compression::None {
        return Err(LoadError::invalid_options(format!(
            "parquet files cannot be wrapped in {compression} compression ({})",
            path.display()
        )));
    }
    Ok((format, compression))
}

pub(crate) fn report(options: &LoadOptions, ctx: &LoadContext, result: &LoadResult<AlertTable>) {
    let Some(obs) = options.observer.as_ref() else {
        return;
    };

    match result {
        Ok(table) => obs.on_success(
            ctx,
            LoadStats {
                records: table.len(),
                columns: table.field_names().len(),
            },
        ),
        Err(e) => {
            let sev = severity_for_error(e);
            obs.on_failure(ctx, sev, e);
            if sev >= options.alert_at_or_above {
                obs.on_alert(ctx, sev, e);
            }
        }
    }
}

pub(crate) fn severity_for_error(e: &LoadError) -> LoadSeverity {
    match e {
        LoadError::NotFound { .. } | LoadError::Io(_) => LoadSeverity::Critical,
        LoadError::Parquet(err) => {
            // Parquet wraps I/O failures without a dedicated variant; look through the chain.
            if error_chain_contains_io(err) {
                LoadSeverity::Critical
            } else {
                LoadSeverity::Error
            }
        }
        LoadError::Parse { .. } | LoadError::Format { .. } | LoadError::InvalidOptions { .. } => {
            LoadSeverity::Error
        }
    }
}

fn error_chain_contains_io(e: &(dyn StdError + 'static)) -> bool {
    let mut cur: Option<&(dyn StdError + 'static)> = Some(e);
    while let Some(err) = cur {
        if err.is::<std::io::Error>() {
            return true;
        }
        cur = err.source();
    }
    false
}

/// Reusable loader bound to a set of [`LoadOptions`].
///
/// Every method routes through [`load_from_path`], so the configured observer sees each load.
///
/// ```no_run
/// use std::sync::Arc;
///
/// use alert_dataset::loader::{DatasetLoader, LoadOptions, StdErrObserver};
///
/// # fn main() -> Result<(), alert_dataset::LoadError> {
/// let loader = DatasetLoader::new(LoadOptions {
///     observer: Some(Arc::new(StdErrObserver)),
///     ..Default::default()
/// });
/// let from_json = loader.load_jsonlines("data/alerts.jsonl")?;
/// let from_parquet = loader.load_parquet("data/alerts.parquet")?;
/// assert_eq!(from_json.len(), from_parquet.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct DatasetLoader {
    options: LoadOptions,
}

impl DatasetLoader {
    pub fn new(options: LoadOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Load using the configured (or inferred) format.
    pub fn load(&self, path: impl AsRef<Path>) -> LoadResult<AlertTable> {
        load_from_path(path, &self.options)
    }

    /// Load `path` as line-delimited JSON regardless of its extension.
    pub fn load_jsonlines(&self, path: impl AsRef<Path>) -> LoadResult<AlertTable> {
        self.load_as(path, DatasetFormat::JsonLines)
    }

    /// Load `path` as Parquet regardless of its extension.
    pub fn load_parquet(&self, path: impl AsRef<Path>) -> LoadResult<AlertTable> {
        self.load_as(path, DatasetFormat::Parquet)
    }

    /// Load every file matching `pattern`; see [`multi_file::load_glob`].
    pub fn load_glob(&self, pattern: &str) -> LoadResult<AlertTable> {
        multi_file::load_glob(pattern, &self.options)
    }

    fn load_as(&self, path: impl AsRef<Path>, format: DatasetFormat) -> LoadResult<AlertTable> {
        let options = LoadOptions {
            format: Some(format),
            ..self.options.clone()
        };
        load_from_path(path, &options)
    }
}
