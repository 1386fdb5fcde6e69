//! Built-in asset mappings for well-known packages that ship no
//! `assets-files` configuration of their own.
use crate::config::FileSpec;
use regex::Regex;
use std::collections::BTreeMap;

/// A version pattern paired with the files it selects.
#[derive(Debug, Clone)]
struct VersionRule {
    pattern: String,
    matcher: Option<Regex>,
    files: FileSpec,
}

impl VersionRule {
    fn new(pattern: &str, files: FileSpec) -> Self {
        let matcher = if matches_any(pattern) {
            None
        } else {
            // Escaping leaves `*` as the only metacharacter we reintroduce.
            let source = format!("(?i)^{}$", regex::escape(pattern).replace(r"\*", ".*"));
            Regex::new(&source).ok()
        };
        Self {
            pattern: pattern.to_string(),
            matcher,
            files,
        }
    }

    fn matches(&self, version: &str) -> bool {
        if matches_any(&self.pattern) {
            return true;
        }
        self.matcher
            .as_ref()
            .is_some_and(|matcher| matcher.is_match(version))
    }
}

fn matches_any(pattern: &str) -> bool {
    pattern.is_empty() || pattern == "*"
}

/// Package name -> ordered version rules. The first matching rule wins.
#[derive(Debug, Clone, Default)]
pub struct MappingResolver {
    rules: BTreeMap<String, Vec<VersionRule>>,
}

impl MappingResolver {
    /// An empty table; nothing resolves.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The table shipped with the tool.
    pub fn builtin() -> Self {
        Self::empty()
            .with_rule("components/jquery", "*", list(&["jquery.js"]))
            .with_rule("nette/forms", "*", list(&["src/assets/netteForms.js"]))
            .with_rule("o5/grido", "*", list(&["assets/dist"]))
    }

    /// Append a rule after any existing rules for `package`.
    pub fn with_rule(mut self, package: &str, pattern: &str, files: FileSpec) -> Self {
        self.rules
            .entry(package.to_string())
            .or_default()
            .push(VersionRule::new(pattern, files));
        self
    }

    pub fn resolve(&self, package: &str, version: &str) -> Option<&FileSpec> {
        self.rules
            .get(package)?
            .iter()
            .find(|rule| rule.matches(version))
            .map(|rule| &rule.files)
    }
}

fn list(entries: &[&str]) -> FileSpec {
    FileSpec::ExplicitList(entries.iter().map(|entry| entry.to_string()).collect())
}

#[cfg(test)]
#[path = "mapping_tests.rs"]
mod tests;
