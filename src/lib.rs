//! `alert-dataset` loads emergency-alert datasets (for example the IPAWS archived CAP alerts
//! export) into an in-memory [`types::AlertTable`].
//!
//! Two on-disk encodings of the same records are supported, and both decode into the same
//! table shape:
//!
//! - **Line-delimited JSON**: `.jsonl`, `.ndjson`, `.json` (one JSON object per line), optionally
//!   compressed (`.jsonl.xz` with the Cargo feature `xz`, `.jsonl.zst` with the feature `zstd`)
//! - **Parquet**: `.parquet`, `.pq`
//!
//! Records are schema-less: each [`types::AlertRecord`] maps field names to
//! [`types::AlertValue`] trees holding whatever the source file contains. Parquet loads also
//! carry the file's declared column types as a [`types::Schema`].
//!
//! ## Quick examples
//!
//! ```no_run
//! use alert_dataset::loader::{load_jsonlines, load_parquet};
//!
//! # fn main() -> Result<(), alert_dataset::LoadError> {
//! let from_json = load_jsonlines("data/alerts.jsonl")?;
//! let from_parquet = load_parquet("data/alerts.parquet")?;
//! println!("json={} parquet={}", from_json.len(), from_parquet.len());
//! # Ok(())
//! # }
//! ```
//!
//! Nested values can be reached with dot paths:
//!
//! ```rust
//! use alert_dataset::loader::load_jsonlines_from_str;
//! use alert_dataset::types::AlertValue;
//!
//! let table = load_jsonlines_from_str(
//!     "{\"id\":\"A1\",\"info\":{\"severity\":\"Extreme\"}}\n\
//!      {\"id\":\"A2\",\"info\":{\"severity\":\"Moderate\"}}\n",
//! )
//! .unwrap();
//!
//! assert_eq!(table.len(), 2);
//! assert_eq!(
//!     table.records()[1].get_path("info.severity"),
//!     Some(&AlertValue::Utf8("Moderate".to_string()))
//! );
//! ```
//!
//! ## Errors
//!
//! Every loader returns [`LoadError`]; [`LoadError::kind`] groups failures into
//! [`LoadErrorKind::NotFound`] (missing or unreadable path), [`LoadErrorKind::Parse`] (a JSON
//! line that is not a JSON object; loads are fail-fast), [`LoadErrorKind::Format`] (corrupt or
//! unsupported Parquet / compressed stream), [`LoadErrorKind::Io`] and
//! [`LoadErrorKind::InvalidOptions`].
//!
//! ## Modules
//!
//! - [`loader`]: unified load entrypoints and format-specific implementations
//! - [`types`]: record, value, table and schema types
//! - [`error`]: error types used across loaders

pub mod error;
pub mod loader;
pub mod types;

pub use error::{LoadError, LoadErrorKind, LoadResult};
pub use loader::{
    load_from_path, load_jsonlines, load_parquet, DatasetFormat, DatasetLoader, LoadOptions,
};
pub use types::{AlertRecord, AlertTable, AlertValue};
