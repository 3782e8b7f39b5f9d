//! Seed prompt defaults from an existing manifest file
//!
//! Re-running the scaffolder in a directory that already has a
//! `package.json` offers the stored values back as defaults, so a
//! re-run only asks for what changed.

use crate::error::ScaffoldError;
use crate::manifest::Author;
use crate::session::keys;
use semver::Version;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Load prompt defaults from `path` if a manifest exists there.
/// Absent file: empty defaults. Unreadable or unparseable file: the
/// error is returned alongside empty defaults for the caller to log -
/// a broken manifest never fails the pipeline.
pub fn load_defaults(path: &Path) -> (BTreeMap<String, String>, Option<ScaffoldError>) {
    if !path.exists() {
        return (BTreeMap::new(), None);
    }

    let parse_error = |message: String| ScaffoldError::ConfigParse {
        path: path.to_path_buf(),
        message,
    };

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => return (BTreeMap::new(), Some(parse_error(e.to_string()))),
    };

    let json: Value = match serde_json::from_str(&content) {
        Ok(json) => json,
        Err(e) => return (BTreeMap::new(), Some(parse_error(e.to_string()))),
    };

    let mut defaults = BTreeMap::new();
    for key in [
        keys::NAME,
        keys::DESCRIPTION,
        keys::VERSION,
        keys::AUTHOR,
        keys::REPOSITORY,
    ] {
        if let Some(value) = json.get(key) {
            if let Some(flat) = flatten(key, value) {
                defaults.insert(key.to_string(), flat);
            }
        }
    }

    (defaults, None)
}

/// Flatten a stored value to the display form a prompt can offer.
/// Structured authors become `"name <email>"` and structured
/// repositories become their url, so both round-trip through the
/// manifest builder's own parsing. A stored version that is not valid
/// semver would be rejected again at the prompt, so it is not offered.
fn flatten(key: &str, value: &Value) -> Option<String> {
    match value {
        Value::String(s) if key == keys::VERSION => {
            Version::parse(s).ok().map(|_| s.clone())
        }
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(_) if key == keys::AUTHOR => {
            let author: Author = serde_json::from_value(value.clone()).ok()?;
            Some(author.display_form())
        }
        Value::Object(map) if key == keys::REPOSITORY => {
            map.get("url").and_then(Value::as_str).map(str::to_string)
        }
        _ => None,
    }
}
