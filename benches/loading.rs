use std::fs::{self, File};
use std::hint::black_box;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};
use parquet::column::writer::ColumnWriter;
use parquet::data_type::ByteArray;
use parquet::file::properties::WriterProperties;
use parquet::file::writer::SerializedFileWriter;
use parquet::schema::parser::parse_message_type;

use alert_dataset::loader::{load_jsonlines, load_jsonlines_from_str, load_parquet};

const ROWS: usize = 10_000;
const SEVERITIES: [&str; 4] = ["Extreme", "Severe", "Moderate", "Minor"];

fn bench_path(ext: &str) -> PathBuf {
    std::env::temp_dir().join(format!("alert-dataset-bench-{}.{ext}", std::process::id()))
}

fn make_jsonl(rows: usize) -> String {
    let mut out = String::with_capacity(rows * 160);
    for i in 0..rows {
        let alert = serde_json::json!({
            "identifier": format!("A{i}"),
            "status": "Actual",
            "cogId": 200_000 + i % 500,
            "info": [{
                "severity": SEVERITIES[i % SEVERITIES.len()],
                "area": [{ "areaDesc": format!("Zone {}", i % 97) }],
            }],
        });
        out.push_str(&alert.to_string());
        out.push('\n');
    }
    out
}

fn write_parquet(path: &Path, rows: usize) {
    let schema = Arc::new(
        parse_message_type(
            "message alert {
               REQUIRED BINARY identifier (UTF8);
               REQUIRED BINARY severity (UTF8);
               REQUIRED INT64 cogId;
             }",
        )
        .unwrap(),
    );
    let props = Arc::new(WriterProperties::builder().build());
    let mut writer = SerializedFileWriter::new(File::create(path).unwrap(), schema, props).unwrap();

    let ids: Vec<ByteArray> = (0..rows)
        .map(|i| ByteArray::from(format!("A{i}").as_str()))
        .collect();
    let severities: Vec<ByteArray> = (0..rows)
        .map(|i| ByteArray::from(SEVERITIES[i % SEVERITIES.len()]))
        .collect();
    let cog_ids: Vec<i64> = (0..rows as i64).map(|i| 200_000 + i % 500).collect();

    let mut rg = writer.next_row_group().unwrap();
    let mut col_idx: usize = 0;
    while let Some(mut col) = rg.next_column().unwrap() {
        match col.untyped() {
            ColumnWriter::ByteArrayColumnWriter(w) if col_idx == 0 => {
                w.write_batch(&ids, None, None).unwrap();
            }
            ColumnWriter::ByteArrayColumnWriter(w) => {
                w.write_batch(&severities, None, None).unwrap();
            }
            ColumnWriter::Int64ColumnWriter(w) => {
                w.write_batch(&cog_ids, None, None).unwrap();
            }
            _ => panic!("unexpected column writer in bench"),
        }
        col.close().unwrap();
        col_idx += 1;
    }
    rg.close().unwrap();
    writer.close().unwrap();
}

fn bench_jsonlines(c: &mut Criterion) {
    let text = make_jsonl(ROWS);
    let path = bench_path("jsonl");
    fs::write(&path, &text).unwrap();

    c.bench_function("jsonl_from_str_10k", |b| {
        b.iter(|| load_jsonlines_from_str(black_box(&text)).unwrap())
    });
    c.bench_function("jsonl_from_file_10k", |b| {
        b.iter(|| load_jsonlines(black_box(&path)).unwrap())
    });

    let _ = fs::remove_file(&path);
}

fn bench_parquet(c: &mut Criterion) {
    let path = bench_path("parquet");
    write_parquet(&path, ROWS);

    c.bench_function("parquet_from_file_10k", |b| {
        b.iter(|| load_parquet(black_box(&path)).unwrap())
    });

    let _ = fs::remove_file(&path);
}

criterion_group!(loading, bench_jsonlines, bench_parquet);
criterion_main!(loading);
