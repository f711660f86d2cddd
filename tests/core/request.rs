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

use std::path::Path;

use serde_json::json;
use zi_onecsv::{ZiCompression, ZiError, ZiWriteMode, ZiWriteRequest};

#[test]
fn modes_parse_case_insensitively() {
    assert_eq!("Overwrite".parse::<ZiWriteMode>().unwrap(), ZiWriteMode::Overwrite);
    assert_eq!("APPEND".parse::<ZiWriteMode>().unwrap(), ZiWriteMode::Append);
    assert_eq!(" ignore ".parse::<ZiWriteMode>().unwrap(), ZiWriteMode::Ignore);
    assert_eq!("error".parse::<ZiWriteMode>().unwrap(), ZiWriteMode::ErrorIfExists);
    assert_eq!("ErrorIfExists".parse::<ZiWriteMode>().unwrap(), ZiWriteMode::ErrorIfExists);
}

#[test]
fn unknown_mode_is_a_validation_error() {
    let err = "upsert".parse::<ZiWriteMode>().unwrap_err();
    assert!(matches!(err, ZiError::Validation { ref message } if message.contains("upsert")));
}

#[test]
fn codecs_parse_and_map_to_extensions() {
    let cases = [
        ("gzip", ZiCompression::Gzip, ".gz"),
        ("GZ", ZiCompression::Gzip, ".gz"),
        ("deflate", ZiCompression::Deflate, ".deflate"),
        ("zstd", ZiCompression::Zstd, ".zst"),
        ("none", ZiCompression::None, ""),
        ("uncompressed", ZiCompression::None, ""),
    ];
    for (name, codec, ext) in cases {
        let parsed: ZiCompression = name.parse().unwrap();
        assert_eq!(parsed, codec, "{}", name);
        assert_eq!(parsed.extension(), ext);
    }
    assert!("lz4".parse::<ZiCompression>().is_err());
}

#[test]
fn json_request_fills_defaults() {
    let request = ZiWriteRequest::from_json_str(r#"{"path": "/data/out.csv.gz"}"#).unwrap();
    assert_eq!(request.path(), Path::new("/data/out.csv.gz"));
    assert_eq!(request.mode, Some(ZiWriteMode::Overwrite));
    assert_eq!(request.compression, ZiCompression::Gzip);
    assert!(request.header);
    assert!(request.options.is_empty());
}

#[test]
fn yaml_request_with_null_mode_behaves_like_error() {
    let request = ZiWriteRequest::from_yaml_str(
        "path: out.csv\nmode: null\ncompression: none\nheader: false\noptions:\n  sep: \";\"\n  quoteAll: true\n",
    )
    .unwrap();
    assert_eq!(request.mode, None);
    assert_eq!(request.effective_mode(), ZiWriteMode::ErrorIfExists);
    assert_eq!(request.compression, ZiCompression::None);
    assert!(!request.header);
    assert_eq!(request.options.get("sep"), Some(&json!(";")));
    assert_eq!(request.options.get("quoteAll"), Some(&json!(true)));
}

#[test]
fn null_codec_loads_as_uncompressed() {
    let request =
        ZiWriteRequest::from_json_str(r#"{"path": "x.csv", "compression": null}"#).unwrap();
    assert_eq!(request.compression, ZiCompression::None);

    let request = ZiWriteRequest::from_yaml_str("path: x.csv\ncompression: ~\n").unwrap();
    assert_eq!(request.compression, ZiCompression::None);
    assert_eq!(request.compression.extension(), "");

    let request = ZiWriteRequest::from_yaml_str("path: x.csv\n").unwrap();
    assert_eq!(request.compression, ZiCompression::Gzip);
}

#[test]
fn serde_accepts_errorifexists_alias() {
    let request =
        ZiWriteRequest::from_json_str(r#"{"path": "x.csv", "mode": "errorifexists"}"#).unwrap();
    assert_eq!(request.mode, Some(ZiWriteMode::ErrorIfExists));

    let text = serde_json::to_value(&request).unwrap();
    assert_eq!(text["mode"], json!("error"));
    assert_eq!(text["compression"], json!("gzip"));
}

#[test]
fn malformed_documents_surface_serde_errors() {
    let err = ZiWriteRequest::from_json_str(r#"{"path": 3"#).unwrap_err();
    assert!(matches!(err, ZiError::Serde(_)));
    let err = ZiWriteRequest::from_json_str(r#"{"path": "x", "mode": "merge"}"#).unwrap_err();
    assert!(matches!(err, ZiError::Serde(_)));
}
