//! Load entrypoints and implementations.
//!
//! Most callers should use [`load_from_path`] or a [`DatasetLoader`] (from [`unified`]) which:
//!
//! - infer the format (and compression) from the file extension, or honor [`LoadOptions`]
//! - load the file into an in-memory [`crate::types::AlertTable`]
//! - optionally report success/failure/alerts to a [`LoadObserver`]
//!
//! Format-specific functions are also available under:
//! - [`jsonl`]
//! - [`parquet`]
//!
//! and [`load_glob`] loads a dataset split across several segment files.

pub mod compression;
pub mod jsonl;
pub mod multi_file;
pub mod observability;
pub mod parquet;
pub mod unified;

pub use compression::Compression;
pub use jsonl::{
    load_jsonlines, load_jsonlines_compressed, load_jsonlines_from_reader, load_jsonlines_from_str,
};
pub use multi_file::load_glob;
#[cfg(feature = "tracing")]
pub use observability::TracingObserver;
pub use observability::{
    CompositeObserver, FileObserver, LoadContext, LoadEvent, LoadObserver, LoadSeverity, LoadStats,
    Segment, StdErrObserver,
};
pub use self::parquet::load_parquet;
pub use unified::{load_from_path, DatasetFormat, DatasetLoader, LoadOptions};
