//! Line-delimited JSON loading.
//!
//! Each non-blank line must hold one JSON object. Loading is fail-fast: the first line that does
//! not parse aborts the whole load with [`LoadError::Parse`], and no table is returned.
//!
//! Blank lines (empty or whitespace-only) are skipped but still counted, so line numbers in
//! errors match what an editor shows. `\r\n` endings and a leading UTF-8 BOM are accepted.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::error::{LoadError, LoadResult};
use crate::types::{AlertRecord, AlertTable};

use super::compression::Compression;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Load an uncompressed line-delimited JSON file into an [`AlertTable`].
///
/// Fails with [`LoadError::NotFound`] if the file cannot be opened or read, and with
/// [`LoadError::Parse`] on the first line that is not a JSON object.
pub fn load_jsonlines(path: impl AsRef<Path>) -> LoadResult<AlertTable> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| LoadError::not_found(path, e))?;
    read_records(BufReader::new(file), |e| LoadError::not_found(path, e))
}

/// Load a line-delimited JSON file stored with the given [`Compression`].
///
/// Decoder failures (corrupt or truncated streams) surface as [`LoadError::Format`]. A codec
/// whose cargo feature is disabled fails with [`LoadError::InvalidOptions`].
pub fn load_jsonlines_compressed(
    path: impl AsRef<Path>,
    compression: Compression,
) -> LoadResult<AlertTable> {
    match compression {
        Compression::None => load_jsonlines(path),
        Compression::Zstd => load_zstd(path.as_ref()),
        Compression::Xz => load_xz(path.as_ref()),
    }
}

/// Load line-delimited JSON from any buffered reader.
///
/// Read failures surface as [`LoadError::Io`].
pub fn load_jsonlines_from_reader<R: BufRead>(reader: R) -> LoadResult<AlertTable> {
    read_records(reader, LoadError::Io)
}

/// Load line-delimited JSON from an in-memory string.
pub fn load_jsonlines_from_str(input: &str) -> LoadResult<AlertTable> {
    read_records(input.as_bytes(), LoadError::Io)
}

#[cfg(feature = "zstd")]
fn load_zstd(path: &Path) -> LoadResult<AlertTable> {
    let file = File::open(path).map_err(|e| LoadError::not_found(path, e))?;
    let decoder = zstd::stream::read::Decoder::new(file).map_err(|e| stream_error("zstd", e))?;
    read_records(BufReader::new(decoder), |e| stream_error("zstd", e))
}

#[cfg(feature = "xz")]
fn load_xz(path: &Path) -> LoadResult<AlertTable> {
    use xz2::stream::{Stream, CONCATENATED};

    let file = File::open(path).map_err(|e| LoadError::not_found(path, e))?;
    // The auto decoder accepts both .xz containers and legacy .lzma streams.
    let stream = Stream::new_auto_decoder(u64::MAX, CONCATENATED)
        .map_err(|e| stream_error("xz", io::Error::from(e)))?;
    let decoder = xz2::read::XzDecoder::new_stream(file, stream);
    read_records(BufReader::new(decoder), |e| stream_error("xz", e))
}

#[cfg(not(feature = "zstd"))]
fn load_zstd(path: &Path) -> LoadResult<AlertTable> {
    Err(codec_disabled("zstd", path))
}

#[cfg(not(feature = "xz"))]
fn load_xz(path: &Path) -> LoadResult<AlertTable> {
    Err(codec_disabled("xz", path))
}

#[cfg(any(feature = "zstd", feature = "xz"))]
fn stream_error(codec: &str, e: io::Error) -> LoadError {
    LoadError::Format {
        message: format!("{codec}: {e}"),
    }
}

#[cfg(not(all(feature = "zstd", feature = "xz")))]
fn codec_disabled(codec: &str, path: &Path) -> LoadError {
    LoadError::invalid_options(format!(
        "{codec} decompression not enabled (enable cargo feature '{codec}') for path ({})",
        path.display()
    ))
}

fn read_records<R, E>(mut reader: R, on_read_error: E) -> LoadResult<AlertTable>
where
    R: BufRead,
    E: Fn(io::Error) -> LoadError,
{
    let mut records = Vec::new();
    let mut buf = Vec::new();
    let mut line_num = 0usize;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).map_err(&on_read_error)? == 0 {
            break;
        }
        line_num += 1;

        let mut line = buf.as_slice();
        if line_num == 1 {
            line = line.strip_prefix(UTF8_BOM).unwrap_or(line);
        }
        let line = line.trim_ascii();
        if line.is_empty() {
            continue;
        }
        records.push(parse_line(line_num, line)?);
    }

    Ok(AlertTable::new(records))
}

fn parse_line(line_num: usize, line: &[u8]) -> LoadResult<AlertRecord> {
    serde_json::from_slice::<serde_json::Map<String, serde_json::Value>>(line)
        .map(AlertRecord::from)
        .map_err(|e| LoadError::Parse {
            line: line_num,
            message: e.to_string(),
        })
}
