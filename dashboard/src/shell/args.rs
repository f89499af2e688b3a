//! Command line parsing
//!
//! `relboard <word> <word> --key=value --flag`. Words are positional,
//! `--key=value` pairs and bare `--flag`s may appear anywhere.

use std::collections::HashMap;

use crate::errors::DashboardError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    words: Vec<String>,
    flags: HashMap<String, String>,
}

impl CliArgs {
    /// Parse arguments, program name excluded
    pub fn parse<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut parsed = Self::default();

        for arg in args {
            let arg = arg.into();
            if arg.starts_with('-') {
                if let Some((key, value)) = arg.split_once('=') {
                    // Handle --key=value format
                    let clean_key = key.trim_start_matches('-');
                    parsed.flags.insert(clean_key.to_string(), value.to_string());
                } else {
                    // Handle standalone flags like --help
                    let clean_key = arg.trim_start_matches('-');
                    parsed.flags.insert(clean_key.to_string(), "true".to_string());
                }
            } else {
                parsed.words.push(arg);
            }
        }

        parsed
    }

    pub fn word(&self, index: usize) -> Option<&str> {
        self.words.get(index).map(String::as_str)
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn flag(&self, key: &str) -> Option<&str> {
        self.flags.get(key).map(String::as_str)
    }

    pub fn has(&self, key: &str) -> bool {
        self.flags.contains_key(key)
    }

    /// A flag that must be present and non-blank
    pub fn require(&self, key: &str) -> Result<&str, DashboardError> {
        match self.flag(key) {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(DashboardError::ValidationError(format!(
                "--{}=<value> is required",
                key
            ))),
        }
    }

    /// Comma separated list flag, blanks dropped
    pub fn list(&self, key: &str) -> Option<Vec<String>> {
        self.flag(key).map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
    }
}
