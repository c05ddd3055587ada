//! Input layer: summary and commit record parsing.
//!
//! The wire records come from the upstream summarizer as JSON arrays in
//! chronological order, oldest first. Parsing preserves that order; the
//! position in the array becomes the summary's time index.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::core::{ChangeKind, Commit, Error, Hunk, Result, Summary};

#[derive(Debug, Deserialize)]
pub struct SummaryRecord {
    pub id: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub summaries: Vec<String>,
    #[serde(default)]
    pub commit_summary: String,
    #[serde(default)]
    pub definitions: Vec<String>,
    #[serde(default)]
    pub key_points: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommitRecord {
    pub id: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub hunks: Vec<HunkRecord>,
}

#[derive(Debug, Deserialize)]
pub struct HunkRecord {
    pub file: String,
    #[serde(default)]
    pub file_status: String,
    #[serde(default)]
    pub old_start: i64,
    #[serde(default)]
    pub old_lines: i64,
    #[serde(default)]
    pub new_start: i64,
    #[serde(default)]
    pub new_lines: i64,
    #[serde(default)]
    pub old_text: String,
    #[serde(default)]
    pub new_text: String,
}

impl From<SummaryRecord> for Summary {
    fn from(record: SummaryRecord) -> Self {
        Self {
            id: record.id,
            original_message: record.message,
            generated_message: record.commit_summary,
            hunk_summaries: record.summaries,
            ctag_definitions: record.definitions,
            regex_definitions: record.key_points,
            time_index: 0, // assigned by ingestion
        }
    }
}

impl From<CommitRecord> for Commit {
    fn from(record: CommitRecord) -> Self {
        Self {
            id: record.id,
            message: record.message,
            hunks: record.hunks.into_iter().map(Hunk::from).collect(),
            summary_index: None,
        }
    }
}

impl From<HunkRecord> for Hunk {
    fn from(record: HunkRecord) -> Self {
        Self {
            change: ChangeKind::from_status(&record.file_status),
            file: record.file,
            old_start: record.old_start,
            old_lines: record.old_lines,
            new_start: record.new_start,
            new_lines: record.new_lines,
            old_text: record.old_text,
            new_text: record.new_text,
        }
    }
}

/// Parse a chronological summary stream from a JSON array file
pub fn read_summaries(path: &Path) -> Result<Vec<Summary>> {
    let records: Vec<SummaryRecord> = read_array(path)?;
    Ok(records.into_iter().map(Summary::from).collect())
}

/// Parse a commit stream from a JSON array file
pub fn read_commits(path: &Path) -> Result<Vec<Commit>> {
    let records: Vec<CommitRecord> = read_array(path)?;
    Ok(records.into_iter().map(Commit::from).collect())
}

fn read_array<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>> {
    let content = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .map_err(|e| Error::invalid_input(path, e.to_string()))?;
    if !value.is_array() {
        return Err(Error::invalid_input(path, "top level is not an array"));
    }
    serde_json::from_value(value).map_err(|e| Error::invalid_input(path, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_record_conversion() {
        let json = r#"[{
            "id": "abc123",
            "message": "fix parser",
            "summaries": ["rewrote the tokenizer loop"],
            "commit_summary": "Parser rewrite",
            "definitions": ["tokenize", "Parser"],
            "key_points": ["lexer"]
        }]"#;
        let records: Vec<SummaryRecord> = serde_json::from_str(json).unwrap();
        let summary = Summary::from(records.into_iter().next().unwrap());

        assert_eq!(summary.id, "abc123");
        assert_eq!(summary.original_message, "fix parser");
        assert_eq!(summary.generated_message, "Parser rewrite");
        assert_eq!(summary.ctag_definitions, ["tokenize", "Parser"]);
        assert_eq!(summary.regex_definitions, ["lexer"]);
    }

    #[test]
    fn test_commit_record_conversion() {
        let json = r#"[{
            "id": "abc123",
            "message": "fix parser",
            "hunks": [{
                "file": "src/parser.rs",
                "file_status": "modified",
                "old_start": 10,
                "old_lines": 4,
                "new_start": 10,
                "new_lines": 7,
                "old_text": "old",
                "new_text": "new"
            }]
        }]"#;
        let records: Vec<CommitRecord> = serde_json::from_str(json).unwrap();
        let commit = Commit::from(records.into_iter().next().unwrap());

        assert_eq!(commit.id, "abc123");
        assert_eq!(commit.hunks.len(), 1);
        assert_eq!(commit.hunks[0].change, ChangeKind::Modified);
        assert_eq!(commit.hunks[0].old_signature(), (10, 4));
        assert!(commit.summary_index.is_none());
    }

    #[test]
    fn test_unknown_file_status_reads_as_modified() {
        let json = r#"[{"id": "x", "hunks": [{"file": "a.rs", "file_status": "copied"}]}]"#;
        let records: Vec<CommitRecord> = serde_json::from_str(json).unwrap();
        let commit = Commit::from(records.into_iter().next().unwrap());
        assert_eq!(commit.hunks[0].change, ChangeKind::Modified);
    }
}
