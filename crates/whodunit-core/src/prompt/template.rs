//! `${name}` placeholder substitution.
//!
//! Rendering is a single left-to-right scan over the template: each
//! `${key}` whose key is present in the variable map is replaced, all
//! occurrences, and the substituted value is never re-scanned. Unknown
//! placeholders are left verbatim. Substitution is therefore
//! order-independent and idempotent even when a value itself contains
//! `${...}`-shaped text.

use std::collections::HashMap;

/// Variables available to a render pass.
pub type VarMap = HashMap<String, String>;

/// A prompt template loaded once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    text: String,
}

impl PromptTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The raw template text, placeholders intact.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Substitute every known `${key}` occurrence.
    pub fn render(&self, vars: &VarMap) -> String {
        render_str(&self.text, vars)
    }
}

/// Substitute `${key}` placeholders in an arbitrary string.
///
/// Exposed separately for the passthrough endpoint, which renders
/// caller-supplied prompt text rather than a preloaded template.
pub fn render_str(template: &str, vars: &VarMap) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let key = &after[..end];
                match vars.get(key) {
                    Some(value) => out.push_str(value),
                    // Unknown placeholder: keep the token as-is.
                    None => out.push_str(&rest[start..start + 2 + end + 1]),
                }
                rest = &after[end + 1..];
            }
            // Unterminated `${`: nothing left to substitute.
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}
