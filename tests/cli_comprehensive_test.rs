//! Comprehensive CLI integration tests.
//!
//! These run the actual binary against gazetteer fixtures so the full
//! user-facing path is covered without a model service.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

mod common;
use common::*;

/// Creates a test Command for the redactor binary.
fn redactor_cmd() -> Command {
    assert_cmd::cargo::cargo_bin_cmd!("pii-redactor")
}

/// Temp dir holding the sample gazetteer.
fn gazetteer_dir() -> (TempDir, String) {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(dir.path(), "entities.txt", SAMPLE_GAZETTEER).unwrap();
    let path = path.display().to_string();
    (dir, path)
}

mod argument_parsing {
    use super::*;

    #[test]
    fn test_help_flag() {
        redactor_cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("redact"))
            .stdout(predicate::str::contains("records"))
            .stdout(predicate::str::contains("rules"));
    }

    #[test]
    fn test_version_flag() {
        redactor_cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("pii-redactor"));
    }

    #[test]
    fn test_endpoint_without_model() {
        redactor_cmd()
            .args(["redact", "--endpoint", "http://localhost:8000"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("--model"));
    }

    #[test]
    fn test_invalid_mode() {
        redactor_cmd()
            .args(["redact", "--patterns-only", "--mode", "fuzzy"])
            .assert()
            .failure();
    }
}

mod redact_command {
    use super::*;

    #[test]
    fn test_stdin_to_stdout() {
        let (_dir, gazetteer) = gazetteer_dir();
        redactor_cmd()
            .args(["redact", "--gazetteer", &gazetteer])
            .write_stdin("John Smith's SSN is 123-45-6789, email john@bank.com")
            .assert()
            .success()
            .stdout("[REDACTED_Person]'s SSN is [REDACTED_SSN], email [REDACTED_EMAIL]");
    }

    #[test]
    fn test_json_output() {
        let (_dir, gazetteer) = gazetteer_dir();
        let output = redactor_cmd()
            .args(["redact", "--json", "--gazetteer", &gazetteer])
            .write_stdin("Jane Doe, 4111111111111111")
            .output()
            .unwrap();
        assert!(output.status.success());

        let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(
            value["redacted_text"],
            "[REDACTED_Person], [REDACTED_ACCOUNT]"
        );
        assert_eq!(value["redaction_count"], 2);
        assert_eq!(value["complete"], true);
    }

    #[test]
    fn test_file_to_file() {
        let (dir, gazetteer) = gazetteer_dir();
        let input = write_fixture(
            dir.path(),
            "in.txt",
            "Jane Doe signed. Witness: Jane Doe. SSN 123-45-6789",
        )
        .unwrap();
        let output = dir.path().join("out.txt");

        redactor_cmd()
            .arg("redact")
            .arg("-i")
            .arg(&input)
            .arg("-o")
            .arg(&output)
            .args(["--gazetteer", &gazetteer, "--mode", "literal"])
            .assert()
            .success();

        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "[REDACTED_Person] signed. Witness: [REDACTED_Person]. SSN [REDACTED_SSN]"
        );
    }

    #[test]
    fn test_no_recognizer_fails_loudly() {
        redactor_cmd()
            .arg("redact")
            .write_stdin("Jane Doe 123-45-6789")
            .assert()
            .failure()
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("unavailable"));
    }

    #[test]
    fn test_missing_gazetteer_fails_loudly() {
        redactor_cmd()
            .args(["redact", "--gazetteer", "/nonexistent/entities.txt"])
            .write_stdin("Jane Doe 123-45-6789")
            .assert()
            .failure()
            .stdout(predicate::str::is_empty());
    }

    #[test]
    fn test_patterns_only_is_marked_incomplete() {
        let output = redactor_cmd()
            .args(["redact", "--patterns-only", "--json"])
            .write_stdin("Jane Doe 123-45-6789")
            .output()
            .unwrap();
        assert!(output.status.success());

        let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(value["redacted_text"], "Jane Doe [REDACTED_SSN]");
        assert_eq!(value["complete"], false);
    }

    #[test]
    fn test_missing_input_file() {
        redactor_cmd()
            .args(["redact", "--patterns-only", "-i", "/nonexistent/in.txt"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to read"));
    }
}

mod detect_command {
    use super::*;

    #[test]
    fn test_reports_spans_from_both_passes() {
        let (_dir, gazetteer) = gazetteer_dir();
        let output = redactor_cmd()
            .args(["detect", "--gazetteer", &gazetteer])
            .write_stdin("Jane Doe 123-45-6789")
            .output()
            .unwrap();
        assert!(output.status.success());

        let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(value["result"]["redaction_count"], 2);
        assert_eq!(value["pattern_spans"][0]["category"], "SSN");
        assert_eq!(value["pattern_spans"][0]["source"], "pattern");
        assert_eq!(value["entity_spans"][0]["category"], "Person");
        assert_eq!(value["entity_spans"][0]["matched_text"], "Jane Doe");
    }
}

mod records_command {
    use super::*;

    #[test]
    fn test_jsonl_round_trip() {
        let (dir, gazetteer) = gazetteer_dir();
        let input = write_fixture(
            dir.path(),
            "raw_pages.jl",
            concat!(
                r#"{"url": "https://example.com/1", "title": "Jane Doe", "body": "Call about 1234567890"}"#,
                "\n",
                r#"{"url": "https://example.com/2", "title": null, "body": "Minneapolis office"}"#,
                "\n",
            ),
        )
        .unwrap();
        let output = dir.path().join("redacted.jl");

        redactor_cmd()
            .arg("records")
            .arg("-i")
            .arg(&input)
            .arg("-o")
            .arg(&output)
            .args(["--gazetteer", &gazetteer, "--jobs", "2"])
            .assert()
            .success();

        let lines: Vec<serde_json::Value> = fs::read_to_string(&output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["title"], "[REDACTED_Person]");
        assert_eq!(lines[0]["body"], "Call about [REDACTED_ACCOUNT]");
        assert_eq!(lines[0]["redactions"], 2);
        assert_eq!(lines[1]["title"], serde_json::Value::Null);
        assert_eq!(lines[1]["body"], "[REDACTED_Place] office");
    }

    #[test]
    fn test_malformed_record() {
        let (_dir, gazetteer) = gazetteer_dir();
        redactor_cmd()
            .args(["records", "--gazetteer", &gazetteer])
            .write_stdin("{\"url\": \"u\"}\n")
            .assert()
            .failure()
            .stderr(predicate::str::contains("line 1"));
    }
}

mod rules_command {
    use super::*;

    #[test]
    fn test_lists_default_rules_in_order() {
        let output = redactor_cmd().arg("rules").output().unwrap();
        assert!(output.status.success());

        let stdout = String::from_utf8(output.stdout).unwrap();
        let lines: Vec<_> = stdout.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("1. Account"));
        assert!(lines[1].contains("[REDACTED_SSN]"));
        assert!(lines[4].starts_with("5. Email"));
    }

    #[test]
    fn test_config_rules() {
        let dir = TempDir::new().unwrap();
        let config = write_fixture(
            dir.path(),
            "redactor.toml",
            "[[rules]]\ncategory = \"Money\"\npattern = '\\$\\d+'\n",
        )
        .unwrap();

        redactor_cmd()
            .arg("rules")
            .arg("--config")
            .arg(&config)
            .assert()
            .success()
            .stdout(predicate::str::contains("1. Money"))
            .stdout(predicate::str::contains("[REDACTED_Money]"));
    }
}
