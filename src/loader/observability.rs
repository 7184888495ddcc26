//! Load outcome reporting.
//!
//! [`super::unified::load_from_path`] reports every load to the [`LoadObserver`] configured in
//! [`super::unified::LoadOptions`]. Glob loads report once per segment, with the segment's
//! position in [`LoadContext::segment`], plus one failure event when the pattern itself cannot
//! be expanded.
//!
//! The text observers ([`StdErrObserver`], [`FileObserver`]) share one line layout, produced by
//! [`LoadEvent::render`].

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::LoadError;

use super::unified::DatasetFormat;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoadSeverity {
    Info,
    Warning,
    /// The input was rejected (parse errors, corrupt files, bad options).
    Error,
    /// The input could not be reached at all (missing paths, I/O failures).
    Critical,
}

impl LoadSeverity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for LoadSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position of one file within a multi-file (glob) load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// 1-based index in sorted path order.
    pub index: usize,
    /// Number of files the pattern matched.
    pub total: usize,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.index, self.total)
    }
}

/// What was being loaded when an event fired.
#[derive(Debug, Clone)]
pub struct LoadContext {
    /// The input path, or the glob pattern when the pattern itself failed to expand.
    pub path: PathBuf,
    /// Resolved format; `None` when the format could not be determined.
    pub format: Option<DatasetFormat>,
    /// Set when the file is one segment of a glob load.
    pub segment: Option<Segment>,
}

impl LoadContext {
    /// Short label for the format, for log lines.
    pub fn format_label(&self) -> &'static str {
        self.format.map_or("unknown", DatasetFormat::as_str)
    }
}

/// Counts reported on a successful load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    pub records: usize,
    /// Distinct columns: the declared schema, or the union of record keys.
    pub columns: usize,
}

/// Observer interface for load outcomes.
///
/// Every method defaults to a no-op, except [`Self::on_alert`] which forwards to
/// [`Self::on_failure`].
pub trait LoadObserver: Send + Sync {
    fn on_success(&self, _ctx: &LoadContext, _stats: LoadStats) {}

    fn on_failure(&self, _ctx: &LoadContext, _severity: LoadSeverity, _error: &LoadError) {}

    /// Called after [`Self::on_failure`] when the severity meets
    /// [`super::unified::LoadOptions::alert_at_or_above`].
    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadError) {
        self.on_failure(ctx, severity, error)
    }
}

/// One observer callback, as a value.
#[derive(Debug, Clone, Copy)]
pub enum LoadEvent<'a> {
    Loaded(LoadStats),
    Failed {
        severity: LoadSeverity,
        error: &'a LoadError,
    },
    Alert {
        severity: LoadSeverity,
        error: &'a LoadError,
    },
}

impl LoadEvent<'_> {
    /// Render the event as a single `key=value` log line.
    ///
    /// ```
    /// use alert_dataset::loader::{LoadContext, LoadEvent, LoadStats, Segment};
    /// use alert_dataset::loader::DatasetFormat;
    ///
    /// let ctx = LoadContext {
    ///     path: "IpawsArchivedAlerts_002.jsonl".into(),
    ///     format: Some(DatasetFormat::JsonLines),
    ///     segment: Some(Segment { index: 2, total: 5 }),
    /// };
    /// let line = LoadEvent::Loaded(LoadStats { records: 10, columns: 4 }).render(&ctx);
    /// assert_eq!(
    ///     line,
    ///     "ok format=jsonl path=IpawsArchivedAlerts_002.jsonl segment=2/5 records=10 columns=4"
    /// );
    /// ```
    pub fn render(&self, ctx: &LoadContext) -> String {
        let (tag, severity, error) = match self {
            Self::Loaded(_) => ("ok", None, None),
            Self::Failed { severity, error } => ("fail", Some(*severity), Some(*error)),
            Self::Alert { severity, error } => ("ALERT", Some(*severity), Some(*error)),
        };

        let mut line = String::from(tag);
        if let Some(severity) = severity {
            line.push_str(&format!(" severity={severity}"));
        }
        line.push_str(&format!(" format={} path={}", ctx.format_label(), ctx.path.display()));
        if let Some(segment) = ctx.segment {
            line.push_str(&format!(" segment={segment}"));
        }
        match (self, error) {
            (Self::Loaded(stats), _) => {
                line.push_str(&format!(" records={} columns={}", stats.records, stats.columns));
            }
            (_, Some(error)) => {
                line.push_str(&format!(" kind={:?} err={error}", error.kind()));
            }
            _ => {}
        }
        line
    }
}

/// Fans every callback out to a list of observers, in order.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn LoadObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn LoadObserver>>) -> Self {
        Self { observers }
    }

    /// Append another observer.
    pub fn push(&mut self, observer: Arc<dyn LoadObserver>) {
        self.observers.push(observer);
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl LoadObserver for CompositeObserver {
    fn on_success(&self, ctx: &LoadContext, stats: LoadStats) {
        self.observers.iter().for_each(|o| o.on_success(ctx, stats));
    }

    fn on_failure(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadError) {
        self.observers.iter().for_each(|o| o.on_failure(ctx, severity, error));
    }

    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadError) {
        self.observers.iter().for_each(|o| o.on_alert(ctx, severity, error));
    }
}

/// Writes one rendered line per event to stderr, prefixed with `[alert-dataset]`.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl StdErrObserver {
    fn emit(&self, ctx: &LoadContext, event: LoadEvent<'_>) {
        eprintln!("[alert-dataset] {}", event.render(ctx));
    }
}

impl LoadObserver for StdErrObserver {
    fn on_success(&self, ctx: &LoadContext, stats: LoadStats) {
        self.emit(ctx, LoadEvent::Loaded(stats));
    }

    fn on_failure(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadError) {
        self.emit(ctx, LoadEvent::Failed { severity, error });
    }

    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadError) {
        self.emit(ctx, LoadEvent::Alert { severity, error });
    }
}

/// Appends rendered events, prefixed with a unix timestamp, to a log file.
///
/// The file is opened on the first event and kept open. Logging is best-effort: open and write
/// failures are dropped so they never turn a successful load into a failed one.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl FileObserver {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            file: Mutex::new(None),
        }
    }

    /// Log file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn emit(&self, ctx: &LoadContext, event: LoadEvent<'_>) {
        let Ok(mut slot) = self.file.lock() else {
            return;
        };
        if slot.is_none() {
            *slot = OpenOptions::new().create(true).append(true).open(&self.path).ok();
        }
        if let Some(f) = slot.as_mut() {
            let _ = writeln!(f, "{} {}", unix_ts(), event.render(ctx));
        }
    }
}

impl LoadObserver for FileObserver {
    fn on_success(&self, ctx: &LoadContext, stats: LoadStats) {
        self.emit(ctx, LoadEvent::Loaded(stats));
    }

    fn on_failure(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadError) {
        self.emit(ctx, LoadEvent::Failed { severity, error });
    }

    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadError) {
        self.emit(ctx, LoadEvent::Alert { severity, error });
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Reports load events as `tracing` events (requires the `tracing` cargo feature).
///
/// Successes are emitted at `INFO`; failures at `ERROR` (or `WARN` below
/// [`LoadSeverity::Error`]); alerts at `ERROR` with `alert = true`.
#[cfg(feature = "tracing")]
#[derive(Debug, Default)]
pub struct TracingObserver;

#[cfg(feature = "tracing")]
impl LoadObserver for TracingObserver {
    fn on_success(&self, ctx: &LoadContext, stats: LoadStats) {
        tracing::info!(
            format = ctx.format_label(),
            path = %ctx.path.display(),
            segment = ?ctx.segment,
            records = stats.records,
            columns = stats.columns,
            "alert dataset loaded"
        );
    }

    fn on_failure(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadError) {
        if severity >= LoadSeverity::Error {
            tracing::error!(
                severity = severity.as_str(),
                kind = ?error.kind(),
                format = ctx.format_label(),
                path = %ctx.path.display(),
                segment = ?ctx.segment,
                error = %error,
                "alert dataset load failed"
            );
        } else {
            tracing::warn!(
                severity = severity.as_str(),
                kind = ?error.kind(),
                format = ctx.format_label(),
                path = %ctx.path.display(),
                segment = ?ctx.segment,
                error = %error,
                "alert dataset load failed"
            );
        }
    }

    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadError) {
        tracing::error!(
            alert = true,
            severity = severity.as_str(),
            kind = ?error.kind(),
            format = ctx.format_label(),
            path = %ctx.path.display(),
            error = %error,
            "alert dataset load alert"
        );
    }
}
