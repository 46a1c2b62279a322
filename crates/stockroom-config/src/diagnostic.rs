// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Miette diagnostics for configuration problems.
//!
//! Figment reports what went wrong but not where. [`ConfigSources`] keeps the
//! raw TOML text of every file that fed the merge so a diagnostic can point
//! at the offending line, and [`suggest_key`] proposes the closest valid key
//! for typos such as `api_kye`.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use std::path::Path;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler score before a key is offered as a correction.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// Prefix shared by every environment override.
const ENV_PREFIX: &str = "STOCKROOM_";

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(stockroom::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        /// Closest valid key, if any is close enough.
        suggestion: Option<String>,
        /// Comma-separated keys accepted by the section.
        valid_keys: String,
        #[label("not a recognized key")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("invalid type for `{key}`: {detail}")]
    #[diagnostic(code(stockroom::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        /// Dotted path, e.g. `inventory.low_stock_threshold`.
        key: String,
        detail: String,
        expected: String,
        #[label("wrong type")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(stockroom::config::missing_key),
        help("set `{key}` in stockroom.toml or export {env_var}")
    )]
    MissingKey { key: String, env_var: String },

    /// Parsed fine but breaks a semantic rule (see `validation`).
    #[error("validation error: {message}")]
    #[diagnostic(code(stockroom::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(stockroom::config::other))]
    Other(String),
}

impl ConfigError {
    /// Splits one figment error (which may wrap several) into diagnostics,
    /// resolving spans against `sources` where possible.
    pub fn from_figment(err: figment::Error, sources: &ConfigSources) -> Vec<ConfigError> {
        use figment::error::Kind;

        err.into_iter()
            .map(|error| {
                let section: Vec<String> = error.path.iter().map(ToString::to_string).collect();
                let origin = origin_path(&error);
                match &error.kind {
                    Kind::UnknownField(field, expected) => {
                        let (span, src) = sources.locate(origin.as_deref(), &section, field);
                        ConfigError::UnknownKey {
                            key: field.clone(),
                            suggestion: suggest_key(field, expected),
                            valid_keys: expected.join(", "),
                            span,
                            src,
                        }
                    }
                    Kind::MissingField(field) => {
                        let key = dotted(&section, field);
                        ConfigError::MissingKey {
                            env_var: env_var_for(&key),
                            key,
                        }
                    }
                    Kind::InvalidType(actual, expected) => {
                        // For type errors the path already ends with the field.
                        let (parent, field) = match section.split_last() {
                            Some((field, parent)) => (parent, field.as_str()),
                            None => (&section[..], ""),
                        };
                        let (span, src) = sources.locate(origin.as_deref(), parent, field);
                        ConfigError::InvalidType {
                            key: section.join("."),
                            detail: format!("found {actual}, expected {expected}"),
                            expected: expected.to_string(),
                            span,
                            src,
                        }
                    }
                    _ => ConfigError::Other(error.to_string()),
                }
            })
            .collect()
    }
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

fn origin_path(error: &figment::Error) -> Option<String> {
    match error.metadata.as_ref()?.source.as_ref()? {
        figment::Source::File(path) => Some(path.display().to_string()),
        _ => None,
    }
}

fn dotted(section: &[String], field: &str) -> String {
    section
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(field))
        .collect::<Vec<_>>()
        .join(".")
}

/// `store.api_key` -> `STOCKROOM_STORE_API_KEY`.
fn env_var_for(key: &str) -> String {
    format!("{ENV_PREFIX}{}", key.replace('.', "_").to_ascii_uppercase())
}

/// Raw TOML text of the files that took part in a load, keyed by display path.
#[derive(Debug, Default, Clone)]
pub struct ConfigSources {
    files: Vec<(String, String)>,
}

impl ConfigSources {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single in-memory document.
    pub fn inline(content: &str) -> Self {
        let mut sources = Self::new();
        sources.add("<inline>", content);
        sources
    }

    pub fn add(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.files.push((name.into(), content.into()));
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Span of `field` under `[section]` in the file named `origin`.
    ///
    /// Figment reports absolute paths, so a relative name matches by suffix.
    /// Errors without a file origin (inline strings) resolve against the only
    /// source when exactly one is loaded.
    fn locate(
        &self,
        origin: Option<&str>,
        section: &[String],
        field: &str,
    ) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
        let file = match origin {
            Some(path) => self
                .files
                .iter()
                .find(|(name, _)| name == path || Path::new(path).ends_with(name)),
            None if self.files.len() == 1 => self.files.first(),
            None => None,
        };
        let Some((name, content)) = file else {
            return (None, None);
        };
        match find_key_offset(content, section, field) {
            Some(offset) => (
                Some(SourceSpan::new(offset.into(), field.len())),
                Some(NamedSource::new(name, content.clone())),
            ),
            None => (None, None),
        }
    }
}

/// Byte offset of `field` inside the table named by `section`.
///
/// Only lines belonging to that table are searched, so a key of the same name
/// in a later table never matches. An empty `section` means the root table.
pub fn find_key_offset(content: &str, section: &[String], field: &str) -> Option<usize> {
    let wanted = section.join(".");
    let mut current = String::new();
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if let Some(header) = trimmed
            .strip_prefix('[')
            .and_then(|rest| rest.split(']').next())
        {
            current = header.trim().to_string();
        } else if current == wanted {
            let is_key = trimmed
                .strip_prefix(field)
                .is_some_and(|after| after.trim_start().starts_with('='));
            if is_key {
                return Some(offset + (line.len() - trimmed.len()));
            }
        }
        offset += line.len();
    }

    None
}

/// Closest entry of `valid_keys` to `unknown` by Jaro-Winkler similarity.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// All diagnostics rendered by miette's graphical handler.
pub fn render_errors_to_string(errors: &[ConfigError]) -> String {
    let handler = miette::GraphicalReportHandler::new();
    errors
        .iter()
        .map(|error| {
            let mut buf = String::new();
            match handler.render_report(&mut buf, error as &dyn Diagnostic) {
                Ok(()) => buf,
                Err(_) => format!("Error: {error}\n"),
            }
        })
        .collect()
}

pub fn render_errors(errors: &[ConfigError]) {
    eprint!("{}", render_errors_to_string(errors));
}
