//! Redaction of crawled page records.
//!
//! The crawler emits one JSON object per line:
//!
//! ```json
//! {"url": "https://example.com/a", "title": "Page title", "body": "..."}
//! ```
//!
//! Titles and bodies are redacted before anything downstream sees them.
//! Records are spread over worker threads that share a single engine;
//! output order matches input order.

use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use tracing::{debug, info};

use crate::error::{RedactorError, RedactorResult};
use crate::redaction::RedactionEngine;

/// One crawled page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    pub body: String,
}

/// A page after redaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactedRecord {
    pub url: String,
    pub title: Option<String>,
    pub body: String,
    /// Title and body redactions combined.
    pub redactions: usize,
}

/// Parses JSON Lines, skipping blank lines. Line numbers in errors are 1-based.
pub fn parse_records(input: &str) -> RedactorResult<Vec<PageRecord>> {
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line).map_err(|e| RedactorError::InvalidRecord {
                line: idx + 1,
                reason: e.to_string(),
            })
        })
        .collect()
}

/// Redacts one record.
pub fn redact_record(
    engine: &RedactionEngine,
    record: &PageRecord,
) -> RedactorResult<RedactedRecord> {
    let body = engine.redact(&record.body)?;
    let (title, title_count) = match &record.title {
        Some(title) => {
            let result = engine.redact(title)?;
            (Some(result.redacted_text), result.redaction_count)
        }
        None => (None, 0),
    };

    Ok(RedactedRecord {
        url: record.url.clone(),
        title,
        body: body.redacted_text,
        redactions: body.redaction_count + title_count,
    })
}

/// Redacts `records` on up to `jobs` threads.
///
/// The first failure aborts the batch; partial output is never returned.
pub fn redact_records(
    engine: &RedactionEngine,
    records: &[PageRecord],
    jobs: usize,
) -> RedactorResult<Vec<RedactedRecord>> {
    if records.is_empty() {
        return Ok(Vec::new());
    }

    // Load once up front rather than racing the workers into it.
    engine.warm_up()?;

    let jobs = jobs.clamp(1, records.len());
    let chunk_size = records.len().div_ceil(jobs);
    debug!(records = records.len(), jobs, "Redacting records");

    let chunks: Vec<RedactorResult<Vec<RedactedRecord>>> = std::thread::scope(|s| {
        let workers: Vec<_> = records
            .chunks(chunk_size)
            .map(|chunk| {
                s.spawn(move || {
                    chunk
                        .iter()
                        .map(|record| redact_record(engine, record))
                        .collect::<RedactorResult<Vec<_>>>()
                })
            })
            .collect();

        workers
            .into_iter()
            .map(|worker| match worker.join() {
                Ok(result) => result,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    });

    let mut redacted = Vec::with_capacity(records.len());
    for chunk in chunks {
        redacted.extend(chunk?);
    }

    let total: usize = redacted.iter().map(|r| r.redactions).sum();
    info!(records = redacted.len(), redactions = total, "Records redacted");
    Ok(redacted)
}

/// Writes records as JSON Lines.
pub fn write_records<W: Write>(records: &[RedactedRecord], mut writer: W) -> io::Result<()> {
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_blank_lines() {
        let input = "{\"url\":\"u1\",\"title\":\"t\",\"body\":\"b\"}\n\n{\"url\":\"u2\",\"body\":\"b2\"}\n";
        let records = parse_records(input).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].title, None);
    }

    #[test]
    fn test_parse_reports_line() {
        let input = "{\"url\":\"u1\",\"body\":\"b\"}\nnot json\n";
        let err = parse_records(input).unwrap_err();
        assert!(matches!(err, RedactorError::InvalidRecord { line: 2, .. }));
    }

    #[test]
    fn test_write_jsonl() {
        let records = vec![RedactedRecord {
            url: "u".to_string(),
            title: None,
            body: "[REDACTED_SSN]".to_string(),
            redactions: 1,
        }];
        let mut out = Vec::new();
        write_records(&records, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"url\":\"u\",\"title\":null,\"body\":\"[REDACTED_SSN]\",\"redactions\":1}\n"
        );
    }
}
