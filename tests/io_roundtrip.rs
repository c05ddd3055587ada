//! Input parsing and output record generation against real files.

use std::fs;
use std::io::Write;

use commitmap::engine::ClusterEngine;
use commitmap::filter;
use commitmap::io::{read_commits, read_summaries, visualization_records, write_records_to_path};

const SUMMARIES_JSON: &str = r#"[
  {
    "id": "a1",
    "message": "add frame reader",
    "summaries": ["introduces the frame reader"],
    "commit_summary": "Add frame reader",
    "definitions": ["read_frame", "FrameHeader", "the", "x"],
    "key_points": ["framing"]
  },
  {
    "id": "a2",
    "message": "extend frame reader",
    "summaries": ["checksum support"],
    "commit_summary": "Frame checksums",
    "definitions": ["read_frame", "verify_checksum"],
    "key_points": []
  },
  {
    "id": "a3",
    "message": "writer side",
    "summaries": ["adds the writer"],
    "commit_summary": "Frame writer",
    "definitions": ["write_frame", "FlushGuard"],
    "key_points": []
  }
]"#;

const COMMITS_JSON: &str = r#"[
  {
    "id": "a1",
    "message": "add frame reader",
    "hunks": [
      {"file": "reader.rs", "file_status": "added", "old_start": 0, "old_lines": 0, "new_start": 1, "new_lines": 40, "old_text": "", "new_text": "fn read_frame() {}"}
    ]
  },
  {
    "id": "a2",
    "message": "extend frame reader",
    "hunks": [
      {"file": "reader.rs", "file_status": "modified", "old_start": 12, "old_lines": 3, "new_start": 12, "new_lines": 9, "old_text": "", "new_text": ""}
    ]
  },
  {
    "id": "a3",
    "message": "writer side",
    "hunks": [
      {"file": "writer.rs", "file_status": "added", "old_start": 0, "old_lines": 0, "new_start": 1, "new_lines": 25, "old_text": "", "new_text": ""}
    ]
  }
]"#;

fn write_temp(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

#[test]
fn parse_cluster_and_emit() {
    let dir = tempfile::tempdir().unwrap();
    let summaries_path = write_temp(&dir, "summaries.json", SUMMARIES_JSON);
    let commits_path = write_temp(&dir, "commits.json", COMMITS_JSON);

    let mut summaries = read_summaries(&summaries_path).unwrap();
    assert_eq!(summaries.len(), 3);
    let commits = read_commits(&commits_path).unwrap();
    assert_eq!(commits.len(), 3);

    filter::filter_summaries(&mut summaries);
    // Stop words and short tokens are gone before ingestion
    assert_eq!(summaries[0].ctag_definitions, ["read_frame", "FrameHeader"]);

    let mut engine = ClusterEngine::new();
    engine.process_summaries(summaries);
    engine.process_commits(commits);
    engine.cluster();

    assert_eq!(engine.files().len(), 2);
    assert!(engine.definition("read_frame").is_some());

    let records = visualization_records(&engine, false);
    assert!(!records.is_empty());

    let out_path = dir.path().join("clusters.json");
    write_records_to_path(&out_path, &records).unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out_path).unwrap()).unwrap();
    let array = written.as_array().unwrap();
    assert_eq!(array.len(), records.len());
    for record in array {
        assert!(record.get("type").is_some());
        assert_eq!(record["vector"].as_array().unwrap().len(), 4);
    }
}

#[test]
fn malformed_json_is_an_input_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp(&dir, "bad.json", "{ not json ");
    assert!(read_summaries(&path).is_err());
}

#[test]
fn non_array_top_level_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp(&dir, "object.json", r#"{"id": "a1"}"#);
    let err = read_summaries(&path).unwrap_err();
    assert!(err.to_string().contains("not an array"));
}

#[test]
fn missing_file_is_an_io_error() {
    let missing = std::path::Path::new("/nonexistent/commitmap/summaries.json");
    assert!(read_summaries(missing).is_err());
}
