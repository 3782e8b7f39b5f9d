//! `{{key}}` placeholder substitution
//!
//! Deliberately not a template language: no conditionals, no loops,
//! no escaping. A placeholder whose key has no value renders as an
//! empty string - explicit policy, never an error.

use std::collections::BTreeMap;

/// Substitute every `{{key}}` in `input` with `vars[key]`.
/// An unterminated `{{` is passed through verbatim.
pub fn render(input: &str, vars: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = after[..end].trim();
                if let Some(value) = vars.get(key) {
                    out.push_str(value);
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}
