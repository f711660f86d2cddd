//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zi.
//! The Zi project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

use std::fs;
#[cfg(feature = "compression")]
use std::fs::File;
#[cfg(feature = "compression")]
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[cfg(feature = "compression")]
use flate2::read::{DeflateDecoder, GzDecoder};
use serde_json::json;
use tempfile::TempDir;
use zi_onecsv::{
    ZiBackendWriteRequest, ZiCompression, ZiDataFrame, ZiError, ZiLocalBackendConfig,
    ZiLocalCsvBackend, ZiLogger, ZiMemorySink, ZiWriteBackend, ZiWriteMode, ZiWriteOptions,
    SUCCESS_MARKER,
};

fn request(num_partitions: usize) -> ZiBackendWriteRequest {
    ZiBackendWriteRequest {
        num_partitions,
        mode: Some(ZiWriteMode::Overwrite),
        compression: ZiCompression::None,
        header: true,
        options: ZiWriteOptions::new(),
    }
}

fn part_files(dir: &Path) -> Vec<PathBuf> {
    let mut parts: Vec<PathBuf> = fs::read_dir(dir)
        .expect("read dir")
        .map(|entry| entry.expect("entry").path())
        .filter(|path| {
            path.file_name()
                .map(|n| n.to_string_lossy().starts_with("part-"))
                .unwrap_or(false)
        })
        .collect();
    parts.sort();
    parts
}

fn small_frame() -> ZiDataFrame {
    ZiDataFrame::from_rows(
        vec!["name".into(), "note".into(), "score".into()],
        vec![
            vec![json!("alice"), json!("likes, commas"), json!(1.5)],
            vec![json!("bob"), json!(null), json!(true)],
        ],
        1,
    )
    .expect("frame")
}

#[test]
fn writes_one_file_per_partition_and_success_marker() {
    let dir = TempDir::new().expect("tmp");
    let out = dir.path().join("job");
    let frame = ZiDataFrame::sample(100, 2, 9).expect("sample");

    ZiLocalCsvBackend::new()
        .write_csv(&frame, &out, &request(4))
        .expect("write");

    let parts = part_files(&out);
    assert_eq!(parts.len(), 4);
    assert!(out.join(SUCCESS_MARKER).exists());

    let rows: usize = parts
        .iter()
        .map(|p| {
            let text = fs::read_to_string(p).expect("read");
            assert!(text.starts_with("ID,COLUMN_ONE,COLUMN_TWO,COLUMN_THREE\n"));
            text.lines().count() - 1
        })
        .sum();
    assert_eq!(rows, 100);
}

#[test]
fn single_partition_request_collapses_all_rows() {
    let dir = TempDir::new().expect("tmp");
    let out = dir.path().join("job");
    let frame = ZiDataFrame::sample(57, 6, 1).expect("sample");

    ZiLocalCsvBackend::new()
        .write_csv(&frame, &out, &request(1))
        .expect("write");

    let parts = part_files(&out);
    assert_eq!(parts.len(), 1);
    let text = fs::read_to_string(&parts[0]).expect("read");
    assert_eq!(text.lines().count(), 58);
}

#[test]
fn fixed_job_id_names_partition_files() {
    let dir = TempDir::new().expect("tmp");
    let out = dir.path().join("job");
    let backend = ZiLocalCsvBackend::new().with_config(ZiLocalBackendConfig {
        job_id: Some("job42".into()),
        write_success_marker: false,
        ..Default::default()
    });

    backend
        .write_csv(&small_frame(), &out, &request(1))
        .expect("write");

    assert!(out.join("part-00000-job42-c000.csv").exists());
    assert!(!out.join(SUCCESS_MARKER).exists());
}

#[test]
fn empty_frame_still_produces_a_header_only_file() {
    let dir = TempDir::new().expect("tmp");
    let out = dir.path().join("job");
    let frame = ZiDataFrame::from_rows(vec!["a".into(), "b".into()], vec![], 3).expect("frame");

    ZiLocalCsvBackend::new()
        .write_csv(&frame, &out, &request(1))
        .expect("write");

    let parts = part_files(&out);
    assert_eq!(parts.len(), 1);
    assert_eq!(fs::read_to_string(&parts[0]).expect("read"), "a,b\n");
}

#[test]
fn cells_render_with_quoting_and_null_value() {
    let dir = TempDir::new().expect("tmp");
    let out = dir.path().join("job");
    let mut req = request(1);
    req.options.insert("nullValue".into(), json!("NULL"));

    ZiLocalCsvBackend::new()
        .write_csv(&small_frame(), &out, &req)
        .expect("write");

    let text = fs::read_to_string(&part_files(&out)[0]).expect("read");
    assert_eq!(
        text,
        "name,note,score\nalice,\"likes, commas\",1.5\nbob,NULL,true\n"
    );
}

#[test]
fn quote_all_and_separator_options_apply() {
    let dir = TempDir::new().expect("tmp");
    let out = dir.path().join("job");
    let mut req = request(1);
    req.header = false;
    req.options.insert("sep".into(), json!("|"));
    req.options.insert("quoteAll".into(), json!(true));

    ZiLocalCsvBackend::new()
        .write_csv(&small_frame(), &out, &req)
        .expect("write");

    let text = fs::read_to_string(&part_files(&out)[0]).expect("read");
    assert_eq!(
        text.lines().next(),
        Some("\"alice\"|\"likes, commas\"|\"1.5\"")
    );
}

#[test]
fn invalid_option_value_is_rejected_before_writing() {
    let dir = TempDir::new().expect("tmp");
    let out = dir.path().join("job");
    let mut req = request(1);
    req.options.insert("lineSep".into(), json!(";"));

    let err = ZiLocalCsvBackend::new()
        .write_csv(&small_frame(), &out, &req)
        .unwrap_err();

    assert!(matches!(err, ZiError::Validation { .. }));
    assert!(!out.exists());
}

#[test]
fn unknown_options_are_logged_and_ignored() {
    let dir = TempDir::new().expect("tmp");
    let out = dir.path().join("job");
    let sink = Arc::new(ZiMemorySink::new());
    let mut req = request(1);
    req.options.insert("dateFormat".into(), json!("yyyy-MM-dd"));

    ZiLocalCsvBackend::new()
        .with_logger(ZiLogger::new(sink.clone()))
        .write_csv(&small_frame(), &out, &req)
        .expect("write");

    let record = sink.find("backend.option_ignored").expect("ignored option event");
    assert_eq!(record.field("option"), Some(&json!("dateFormat")));
    assert!(sink.find("backend.partition_written").is_some());
}

#[test]
fn directory_modes_follow_engine_semantics() {
    let dir = TempDir::new().expect("tmp");
    let out = dir.path().join("job");
    let backend = ZiLocalCsvBackend::new();
    let frame = small_frame();

    backend.write_csv(&frame, &out, &request(1)).expect("first");

    let mut req = request(1);
    req.mode = Some(ZiWriteMode::Append);
    backend.write_csv(&frame, &out, &req).expect("append");
    assert_eq!(part_files(&out).len(), 2);

    req.mode = Some(ZiWriteMode::Ignore);
    backend.write_csv(&frame, &out, &req).expect("ignore");
    assert_eq!(part_files(&out).len(), 2);

    req.mode = None;
    let err = backend.write_csv(&frame, &out, &req).unwrap_err();
    assert!(matches!(err, ZiError::AlreadyExists { ref path } if path == &out));

    req.mode = Some(ZiWriteMode::Overwrite);
    backend.write_csv(&frame, &out, &req).expect("overwrite");
    assert_eq!(part_files(&out).len(), 1);
}

#[cfg(feature = "compression")]
#[test]
fn compressed_partitions_decode_to_the_same_rows() {
    let frame = small_frame();
    let expected = "name,note,score\nalice,\"likes, commas\",1.5\nbob,,true\n";

    for compression in [ZiCompression::Gzip, ZiCompression::Deflate, ZiCompression::Zstd] {
        let dir = TempDir::new().expect("tmp");
        let out = dir.path().join("job");
        let mut req = request(1);
        req.compression = compression;

        ZiLocalCsvBackend::new()
            .write_csv(&frame, &out, &req)
            .expect("write");

        let part = part_files(&out).remove(0);
        let name = part.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.ends_with(&format!(".csv{}", compression.extension())));

        let file = File::open(&part).expect("open");
        let mut text = String::new();
        match compression {
            ZiCompression::Gzip => {
                GzDecoder::new(file).read_to_string(&mut text).expect("gunzip");
            }
            ZiCompression::Deflate => {
                DeflateDecoder::new(file).read_to_string(&mut text).expect("inflate");
            }
            ZiCompression::Zstd => {
                let bytes = zstd::stream::decode_all(file).expect("unzstd");
                text = String::from_utf8(bytes).expect("utf8");
            }
            ZiCompression::None => unreachable!(),
        }
        assert_eq!(text, expected, "codec {}", compression);
    }
}

#[test]
fn zero_partition_request_is_rejected() {
    let dir = TempDir::new().expect("tmp");
    let err = ZiLocalCsvBackend::new()
        .write_csv(&small_frame(), &dir.path().join("job"), &request(0))
        .unwrap_err();
    assert!(matches!(err, ZiError::Validation { .. }));
}

#[test]
fn frame_without_columns_is_rejected() {
    let dir = TempDir::new().expect("tmp");
    let out = dir.path().join("job");

    let err = ZiLocalCsvBackend::new()
        .write_csv(&ZiDataFrame::default(), &out, &request(1))
        .unwrap_err();

    assert!(matches!(err, ZiError::Validation { ref message } if message.contains("no columns")));
    assert!(!out.exists());
}
