//! Stream compression applied to line-delimited JSON archives.

use std::fmt;
use std::path::Path;

/// Compression wrapped around a line-delimited JSON file.
///
/// Parquet files compress their pages internally and are always read as [`Compression::None`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compression {
    /// Plain text.
    #[default]
    None,
    /// Zstandard frame(s) (`.zst`). Decoding requires the `zstd` cargo feature.
    Zstd,
    /// xz or legacy lzma stream (`.xz`, `.lzma`), as published in the IPAWS archive.
    /// Decoding requires the `xz` cargo feature.
    Xz,
}

impl Compression {
    /// Parse a compression from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "zst" | "zstd" => Some(Self::Zstd),
            "xz" | "lzma" => Some(Self::Xz),
            _ => None,
        }
    }

    /// Compression implied by the last extension of `path`; [`Compression::None`] otherwise.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|s| s.to_str())
            .and_then(Self::from_extension)
            .unwrap_or(Self::None)
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Zstd => f.write_str("zstd"),
            Self::Xz => f.write_str("xz"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::Compression;

    #[test]
    fn detects_compression_suffix() {
        assert_eq!(
            Compression::from_path(Path::new("data/IpawsArchivedAlerts_2025_001.jsonl.ZST")),
            Compression::Zstd
        );
        assert_eq!(
            Compression::from_path(Path::new("IpawsArchivedAlerts_2025_001.jsonl.xz")),
            Compression::Xz
        );
        assert_eq!(Compression::from_path(Path::new("alerts.jsonl.lzma")), Compression::Xz);
        assert_eq!(Compression::from_path(Path::new("alerts.jsonl")), Compression::None);
        assert_eq!(Compression::from_path(Path::new("alerts")), Compression::None);
    }
}
