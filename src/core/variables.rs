// src/core/variables.rs

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use thiserror::Error;

lazy_static! {
    /// `$$` (escaped dollar), `${name}` (reference) or a dangling `${`.
    static ref REFERENCE_RE: Regex =
        Regex::new(r"\$\$|\$\{([^}]*)\}|\$\{").expect("static regex is valid");
    static ref NAME_RE: Regex =
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_.\-]*$").expect("static regex is valid");
}

/// Errors raised while setting or substituting script variables.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VariableError {
    /// A reference names a variable that was never set.
    #[error("Variable '{0}' is not defined.")]
    Unresolved(String),
    /// The name does not match `[A-Za-z_][A-Za-z0-9_.-]*`.
    #[error("Invalid variable name '{0}'.")]
    InvalidName(String),
    /// A `${` without its closing brace.
    #[error("Unterminated variable reference in '{0}'.")]
    Unterminated(String),
}

/// The variables of one script run. Last write wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableStore {
    values: BTreeMap<String, String>,
}

impl VariableStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`, replacing any previous value.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<(), VariableError> {
        validate_variable_name(name)?;
        self.values.insert(name.to_string(), value.into());
        Ok(())
    }

    /// The current value of `name`, if set.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Whether `name` has been set.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of variables set.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no variable has been set yet.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over all variables, ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Replaces every `${name}` in `template` with the variable's value.
    ///
    /// `$$` yields a literal `$`; a `$` followed by anything else is kept as is.
    /// References to undefined variables are an error, never passed through.
    pub fn expand(&self, template: &str) -> Result<String, VariableError> {
        if !template.contains('$') {
            return Ok(template.to_string());
        }

        let mut failure = None;
        let expanded = REFERENCE_RE.replace_all(template, |caps: &Captures<'_>| {
            let whole = caps.get(0).map_or("", |m| m.as_str());
            if whole == "$$" {
                return "$".to_string();
            }
            let Some(name) = caps.get(1).map(|m| m.as_str()) else {
                failure.get_or_insert(VariableError::Unterminated(template.to_string()));
                return String::new();
            };
            if !NAME_RE.is_match(name) {
                failure.get_or_insert(VariableError::InvalidName(name.to_string()));
                return String::new();
            }
            match self.values.get(name) {
                Some(value) => value.clone(),
                None => {
                    failure.get_or_insert(VariableError::Unresolved(name.to_string()));
                    String::new()
                }
            }
        });

        match failure {
            Some(e) => Err(e),
            None => Ok(expanded.into_owned()),
        }
    }

    /// Expands every token, stopping at the first failing one.
    pub fn expand_all(&self, tokens: &[String]) -> Result<Vec<String>, VariableError> {
        tokens.iter().map(|token| self.expand(token)).collect()
    }
}

/// Checks a variable name against `[A-Za-z_][A-Za-z0-9_.-]*`.
pub fn validate_variable_name(name: &str) -> Result<(), VariableError> {
    if NAME_RE.is_match(name) {
        Ok(())
    } else {
        Err(VariableError::InvalidName(name.to_string()))
    }
}

/// Splits `KEY=VALUE` into its parts. The value may be empty and may contain `=`.
pub fn parse_assignment(raw: &str) -> Option<(&str, &str)> {
    let (key, value) = raw.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        None
    } else {
        Some((key, value))
    }
}
