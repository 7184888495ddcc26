//! Parquet loading.

use std::fs::File;
use std::io;
use std::path::Path;

use parquet::basic::{ConvertedType, Repetition, Type as PhysicalType};
use parquet::file::reader::{ChunkReader, FileReader};
use parquet::file::serialized_reader::SerializedFileReader;
use parquet::record::{Field as ParquetField, Row};
use parquet::schema::types::Type as SchemaType;

use crate::error::{LoadError, LoadResult};
use crate::types::{AlertRecord, AlertTable, AlertValue, DataType, Field, Schema};

/// Load a Parquet file into an [`AlertTable`].
///
/// Notes:
/// - One record per row; every top-level column appears in every record (nulls as
///   [`AlertValue::Null`])
/// - The table's schema lists the file's top-level columns with their declared types
/// - Uses the Parquet record API (`RowIter`), which decodes nested groups, lists and maps
pub fn load_parquet(path: impl AsRef<Path>) -> LoadResult<AlertTable> {
    let path = path.as_ref();
    let file = open_regular_file(path)?;
    let reader = SerializedFileReader::new(file)?;

    let schema = declared_schema(&reader);
    let num_rows = reader.metadata().file_metadata().num_rows();

    let mut records = Vec::with_capacity(usize::try_from(num_rows).unwrap_or(0));
    for row in reader.into_iter() {
        records.push(convert_row(&row?));
    }

    Ok(AlertTable::with_schema(schema, records))
}

/// Open `path`, rejecting directories and other non-files up front.
///
/// `File::open` succeeds on a directory on unix; without this check the failure would only
/// surface from inside the Parquet reader as a format error.
fn open_regular_file(path: &Path) -> LoadResult<File> {
    let file = File::open(path).map_err(|e| LoadError::not_found(path, e))?;
    let meta = file.metadata().map_err(|e| LoadError::not_found(path, e))?;
    if !meta.is_file() {
        return Err(LoadError::not_found(
            path,
            io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
        ));
    }
    Ok(file)
}

fn declared_schema<R: ChunkReader + 'static>(reader: &SerializedFileReader<R>) -> Schema {
    let root = reader.metadata().file_metadata().schema_descr().root_schema();
    Schema::new(root.get_fields().iter().map(|t| declared_field(t)).collect())
}

fn declared_field(t: &SchemaType) -> Field {
    let info = t.get_basic_info();
    let repetition = info.has_repetition().then(|| info.repetition());

    // A bare REPEATED column is a legacy one-level list.
    let data_type = if repetition == Some(Repetition::REPEATED) {
        DataType::List
    } else {
        declared_type(t)
    };

    Field::new(t.name(), data_type, repetition == Some(Repetition::OPTIONAL))
}

fn declared_type(t: &SchemaType) -> DataType {
    let converted = t.get_basic_info().converted_type();

    if t.is_group() {
        return match converted {
            ConvertedType::LIST => DataType::List,
            ConvertedType::MAP | ConvertedType::MAP_KEY_VALUE => DataType::Map,
            _ => DataType::Struct,
        };
    }

    match (t.get_physical_type(), converted) {
        (_, ConvertedType::UTF8 | ConvertedType::ENUM | ConvertedType::JSON) => DataType::Utf8,
        (_, ConvertedType::DECIMAL) => DataType::Decimal {
            precision: t.get_precision(),
            scale: t.get_scale(),
        },
        (_, ConvertedType::DATE) => DataType::Date,
        (_, ConvertedType::TIME_MILLIS | ConvertedType::TIME_MICROS) => DataType::Time,
        (_, ConvertedType::TIMESTAMP_MILLIS | ConvertedType::TIMESTAMP_MICROS) => {
            DataType::Timestamp
        }
        (_, ConvertedType::UINT_64) => DataType::UInt64,
        (PhysicalType::BOOLEAN, _) => DataType::Bool,
        (PhysicalType::INT32 | PhysicalType::INT64, _) => DataType::Int64,
        (PhysicalType::INT96, _) => DataType::Timestamp,
        (PhysicalType::FLOAT | PhysicalType::DOUBLE, _) => DataType::Float64,
        (PhysicalType::BYTE_ARRAY | PhysicalType::FIXED_LEN_BYTE_ARRAY, _) => DataType::Binary,
    }
}

fn convert_row(row: &Row) -> AlertRecord {
    let mut record = AlertRecord::new();
    for (name, field) in row.get_column_iter() {
        record.insert(name.as_str(), convert_field(field));
    }
    record
}

fn convert_field(f: &ParquetField) -> AlertValue {
    match f {
        ParquetField::Null => AlertValue::Null,
        ParquetField::Bool(b) => AlertValue::Bool(*b),
        ParquetField::Byte(v) => AlertValue::Int64(i64::from(*v)),
        ParquetField::Short(v) => AlertValue::Int64(i64::from(*v)),
        ParquetField::Int(v) => AlertValue::Int64(i64::from(*v)),
        ParquetField::Long(v) => AlertValue::Int64(*v),
        ParquetField::UByte(v) => AlertValue::Int64(i64::from(*v)),
        ParquetField::UShort(v) => AlertValue::Int64(i64::from(*v)),
        ParquetField::UInt(v) => AlertValue::Int64(i64::from(*v)),
        ParquetField::ULong(v) => {
            i64::try_from(*v).map_or(AlertValue::UInt64(*v), AlertValue::Int64)
        }
        ParquetField::Float(v) => AlertValue::Float64(f64::from(*v)),
        ParquetField::Double(v) => AlertValue::Float64(*v),
        ParquetField::Str(s) => AlertValue::Utf8(s.clone()),
        ParquetField::Bytes(b) => AlertValue::Binary(b.data().to_vec()),
        ParquetField::Date(days) => AlertValue::Date(*days),
        ParquetField::TimestampMillis(ms) => AlertValue::Timestamp(ms.saturating_mul(1_000)),
        ParquetField::TimestampMicros(us) => AlertValue::Timestamp(*us),
        ParquetField::Group(row) => AlertValue::Map(convert_row(row)),
        ParquetField::ListInternal(list) => {
            AlertValue::List(list.elements().iter().map(convert_field).collect())
        }
        ParquetField::MapInternal(map) => AlertValue::Map(
            map.entries()
                .iter()
                .map(|(k, v)| (map_key(k), convert_field(v)))
                .collect(),
        ),
        // Decimals, half floats and times of day keep the reader's textual rendering.
        other => AlertValue::Utf8(other.to_string()),
    }
}

fn map_key(k: &ParquetField) -> String {
    match k {
        ParquetField::Str(s) => s.clone(),
        other => other.to_string(),
    }
}
