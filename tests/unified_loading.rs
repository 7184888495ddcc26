use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use parquet::column::writer::ColumnWriter;
use parquet::data_type::ByteArray;
use parquet::file::properties::WriterProperties;
use parquet::file::writer::SerializedFileWriter;
use parquet::schema::parser::parse_message_type;

use alert_dataset::loader::{load_from_path, DatasetFormat, DatasetLoader, LoadOptions};
use alert_dataset::types::AlertRecord;
use alert_dataset::LoadErrorKind;

fn tmp_file(ext: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("alert-dataset-unified-{nanos}.{ext}"))
}

fn expected_records() -> Vec<AlertRecord> {
    vec![
        AlertRecord::from_iter([("id", "A1"), ("severity", "Extreme")]),
        AlertRecord::from_iter([("id", "A2"), ("severity", "Moderate")]),
    ]
}

fn write_alerts_jsonl(path: &PathBuf) {
    fs::write(
        path,
        "{\"id\":\"A1\",\"severity\":\"Extreme\"}\n{\"id\":\"A2\",\"severity\":\"Moderate\"}\n",
    )
    .unwrap();
}

fn write_alerts_parquet(path: &PathBuf) {
    let schema_str = r#"
    message alert {
      REQUIRED BINARY id (UTF8);
      REQUIRED BINARY severity (UTF8);
    }
    "#;

    let schema = Arc::new(parse_message_type(schema_str).unwrap());
    let props = Arc::new(WriterProperties::builder().build());
    let file = File::create(path).unwrap();
    let mut writer = SerializedFileWriter::new(file, schema, props).unwrap();

    let mut rg = writer.next_row_group().unwrap();
    let mut col_idx: usize = 0;
    while let Some(mut col) = rg.next_column().unwrap() {
        match col.untyped() {
            ColumnWriter::ByteArrayColumnWriter(w) => {
                let values = if col_idx == 0 {
                    ["A1", "A2"].map(ByteArray::from)
                } else {
                    ["Extreme", "Moderate"].map(ByteArray::from)
                };
                w.write_batch(&values, None, None).unwrap();
            }
            _ => panic!("unexpected column writer in test"),
        }
        col.close().unwrap();
        col_idx += 1;
    }
    rg.close().unwrap();
    writer.close().unwrap();
}

#[test]
fn load_from_path_infers_jsonl() {
    let path = tmp_file("jsonl");
    write_alerts_jsonl(&path);

    let table = load_from_path(&path, &LoadOptions::default()).unwrap();
    assert_eq!(table.records(), expected_records().as_slice());

    let _ = fs::remove_file(&path);
}

#[test]
fn load_from_path_infers_parquet() {
    let path = tmp_file("parquet");
    write_alerts_parquet(&path);

    let table = load_from_path(&path, &LoadOptions::default()).unwrap();
    assert_eq!(table.records(), expected_records().as_slice());
    assert!(table.schema().is_some());

    let _ = fs::remove_file(&path);
}

#[test]
fn both_encodings_of_the_same_alerts_decode_to_equal_records() {
    let json_path = tmp_file("jsonl");
    let parquet_path = tmp_file("pq");
    write_alerts_jsonl(&json_path);
    write_alerts_parquet(&parquet_path);

    let loader = DatasetLoader::default();
    let from_json = loader.load(&json_path).unwrap();
    let from_parquet = loader.load(&parquet_path).unwrap();

    assert_eq!(from_json.records(), from_parquet.records());
    assert_eq!(from_json.field_names(), from_parquet.field_names());

    let _ = fs::remove_file(&json_path);
    let _ = fs::remove_file(&parquet_path);
}

#[test]
fn declared_format_overrides_extension() {
    let path = tmp_file("export");
    write_alerts_parquet(&path);

    let loader = DatasetLoader::default();
    let table = loader.load_parquet(&path).unwrap();
    assert_eq!(table.len(), 2);

    // The same bytes read as JSON lines do not parse.
    let err = loader.load_jsonlines(&path).unwrap_err();
    assert_eq!(err.kind(), LoadErrorKind::Parse);

    let opts = LoadOptions {
        format: Some(DatasetFormat::Parquet),
        ..Default::default()
    };
    assert_eq!(load_from_path(&path, &opts).unwrap(), table);

    let _ = fs::remove_file(&path);
}

#[test]
fn unknown_extension_is_invalid_options() {
    let path = tmp_file("csv");
    fs::write(&path, "id,severity\nA1,Extreme\n").unwrap();

    let err = load_from_path(&path, &LoadOptions::default()).unwrap_err();
    assert_eq!(err.kind(), LoadErrorKind::InvalidOptions);
    assert!(err.to_string().contains("cannot infer format"));

    let _ = fs::remove_file(&path);
}

#[test]
fn missing_files_are_not_found_for_both_formats() {
    let loader = DatasetLoader::default();
    for path in ["tests/fixtures/nope.jsonl", "tests/fixtures/nope.parquet"] {
        let err = loader.load(path).unwrap_err();
        assert_eq!(err.kind(), LoadErrorKind::NotFound, "{path}");
    }
}

#[cfg(not(feature = "zstd"))]
#[test]
fn zstd_input_without_feature_is_invalid_options() {
    let err =
        load_from_path("tests/fixtures/alerts.jsonl.zst", &LoadOptions::default()).unwrap_err();
    assert_eq!(err.kind(), LoadErrorKind::InvalidOptions);
    assert!(err.to_string().contains("zstd"));
}

#[cfg(feature = "zstd")]
#[test]
fn zstd_suffix_is_decoded_transparently() {
    let plain = fs::read("tests/fixtures/alerts.jsonl").unwrap();
    let path = tmp_file("jsonl.zst");
    fs::write(&path, zstd::stream::encode_all(plain.as_slice(), 0).unwrap()).unwrap();

    let table = load_from_path(&path, &LoadOptions::default()).unwrap();
    assert_eq!(table.len(), 3);

    let _ = fs::remove_file(&path);
}

#[cfg(not(feature = "xz"))]
#[test]
fn xz_input_without_feature_is_invalid_options() {
    let err =
        load_from_path("tests/fixtures/alerts.jsonl.xz", &LoadOptions::default()).unwrap_err();
    assert_eq!(err.kind(), LoadErrorKind::InvalidOptions);
    assert!(err.to_string().contains("'xz'"));
}

#[cfg(feature = "xz")]
#[test]
fn xz_suffix_is_decoded_transparently() {
    use std::io::Write;

    let plain = fs::read("tests/fixtures/alerts.jsonl").unwrap();
    let mut encoder = xz2::write::XzEncoder::new(Vec::new(), 6);
    encoder.write_all(&plain).unwrap();
    let path = tmp_file("jsonl.xz");
    fs::write(&path, encoder.finish().unwrap()).unwrap();

    let table = load_from_path(&path, &LoadOptions::default()).unwrap();
    assert_eq!(table.len(), 3);

    let _ = fs::remove_file(&path);
}
