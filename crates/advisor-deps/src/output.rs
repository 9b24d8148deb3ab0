//! Parsing of npm's `--json` output
//!
//! npm occasionally prints banners, update notices or `npm WARN` lines on
//! stdout around the JSON document. Those lines are dropped before parsing.

use crate::error::{CollectError, Result};
use advisor_core::OutdatedPackage;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Keep only the lines spanning the JSON document
///
/// Everything before the first line opening an object/array and after the
/// last line closing one is discarded.
pub fn filter_json_lines(raw: &str) -> String {
    let lines: Vec<&str> = raw.lines().collect();

    let start = lines.iter().position(|line| {
        let line = line.trim_start();
        line.starts_with('{') || line.starts_with('[')
    });
    let end = lines.iter().rposition(|line| {
        let line = line.trim_end();
        line.ends_with('}') || line.ends_with(']')
    });

    match (start, end) {
        (Some(start), Some(end)) if start <= end => lines[start..=end].join("\n"),
        _ => String::new(),
    }
}

/// Parse command stdout as JSON
///
/// Blank output is an empty object: `npm outdated` prints nothing when
/// everything is current.
pub fn parse_json_output(command: &str, raw: &str) -> Result<Value> {
    if raw.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }

    serde_json::from_str(&filter_json_lines(raw)).map_err(|source| CollectError::Parse {
        command: command.to_string(),
        source,
        raw: raw.to_string(),
    })
}

/// Fail if `value` is npm's `{"error": {...}}` document
///
/// A package literally named `error` in `npm outdated` output carries
/// version fields and is let through.
pub fn check_npm_error(command: &str, value: &Value) -> Result<()> {
    let Some(error) = value.get("error").and_then(Value::as_object) else {
        return Ok(());
    };
    if !(error.contains_key("code") || error.contains_key("summary"))
        || error.contains_key("latest")
    {
        return Ok(());
    }

    let summary = match (field(error, "summary"), field(error, "detail")) {
        ("", "") => "unknown error",
        ("", detail) => detail,
        (summary, _) => summary,
    };
    Err(CollectError::Reported {
        command: command.to_string(),
        code: match field(error, "code") {
            "" => "UNKNOWN".to_string(),
            code => code.to_string(),
        },
        summary: summary.to_string(),
    })
}

fn field<'a>(object: &'a Map<String, Value>, key: &str) -> &'a str {
    object.get(key).and_then(Value::as_str).unwrap_or("").trim()
}

/// Convert `npm outdated --json` into typed entries
///
/// In workspaces npm reports a package installed at several locations as an
/// array; the first location is kept.
pub fn parse_outdated(command: &str, value: Value) -> Result<BTreeMap<String, OutdatedPackage>> {
    check_npm_error(command, &value)?;
    let raw = value.to_string();
    let entries = match value {
        Value::Object(entries) => entries,
        Value::Null => return Ok(BTreeMap::new()),
        other => {
            return Err(CollectError::Parse {
                command: command.to_string(),
                source: serde::de::Error::custom(format!(
                    "expected an object of packages, got {}",
                    other
                )),
                raw,
            })
        }
    };

    let mut outdated = BTreeMap::new();
    for (name, entry) in entries {
        let entry = match entry {
            Value::Array(mut locations) if !locations.is_empty() => locations.swap_remove(0),
            other => other,
        };
        let package: OutdatedPackage =
            serde_json::from_value(entry).map_err(|source| CollectError::Parse {
                command: command.to_string(),
                source,
                raw: raw.clone(),
            })?;
        outdated.insert(name, package);
    }
    Ok(outdated)
}
