//! Manifest schema types and serialization

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Project author. Parsed once at the manifest-build boundary from the
/// raw answer; never re-parsed downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Author {
    /// `"Name <email>"` input, split into parts
    NameEmail { name: String, email: String },
    /// Anything without a `<`
    Plain(String),
}

impl Author {
    /// Parse the raw author answer. A `<` marks the start of an email
    /// part; the trailing `>` is optional in the input.
    pub fn parse(raw: &str) -> Self {
        match raw.split_once('<') {
            Some((name, rest)) => {
                let email = rest.trim().strip_suffix('>').unwrap_or(rest.trim());
                Author::NameEmail {
                    name: name.trim().to_string(),
                    email: email.trim().to_string(),
                }
            }
            None => Author::Plain(raw.to_string()),
        }
    }

    /// Display form, the inverse of `parse` for structured authors.
    /// Used to offer stored authors back as prompt defaults.
    pub fn display_form(&self) -> String {
        match self {
            Author::NameEmail { name, email } => format!("{} <{}>", name, email),
            Author::Plain(name) => name.clone(),
        }
    }
}

/// Repository reference. Only git is recognized; serialized as
/// `{"type": "git", "url": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Repository {
    Git { url: String },
}

/// The fixed dependency/build-script block contributed by the
/// scaffolder itself. Policy, not user data: always present in every
/// generated manifest unless a product overrides it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageDefaults {
    pub dependencies: BTreeMap<String, String>,
    #[serde(rename = "devDependencies")]
    pub dev_dependencies: BTreeMap<String, String>,
    pub scripts: BTreeMap<String, String>,
}

/// The structured project record persisted as `package.json`.
/// `name` is always present; every other user field is omitted when
/// absent, never emitted as null or empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectManifest {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<Repository>,

    pub dependencies: BTreeMap<String, String>,

    #[serde(rename = "devDependencies")]
    pub dev_dependencies: BTreeMap<String, String>,

    pub scripts: BTreeMap<String, String>,
}

impl ProjectManifest {
    /// Serialize with tab indentation and stable key order, so
    /// successive runs produce diff-friendly output.
    pub fn to_json_string(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)
            .context("Failed to serialize manifest")?;
        String::from_utf8(buf).context("Manifest serialized to invalid UTF-8")
    }

    /// The human-facing fields shown at the review step, rendered in
    /// the same tab-indented style as the persisted manifest.
    pub fn review_summary(&self) -> Result<String> {
        #[derive(Serialize)]
        struct Review<'a> {
            name: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            description: &'a Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            version: &'a Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            author: &'a Option<Author>,
            #[serde(skip_serializing_if = "Option::is_none")]
            repository: &'a Option<Repository>,
        }

        let review = Review {
            name: &self.name,
            description: &self.description,
            version: &self.version,
            author: &self.author,
            repository: &self.repository,
        };

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        review
            .serialize(&mut ser)
            .context("Failed to render manifest summary")?;
        String::from_utf8(buf).context("Summary rendered to invalid UTF-8")
    }
}
