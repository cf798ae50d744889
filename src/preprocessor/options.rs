//! Caller-supplied options and engine configuration

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// A scalar value substituted for `#(name)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Constant {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Bool(v) => write!(f, "{}", v),
            Constant::Int(v) => write!(f, "{}", v),
            // always carries a decimal point, e.g. `1.0`
            Constant::Float(v) => write!(f, "{:?}", v),
            Constant::Str(v) => f.write_str(v),
        }
    }
}

impl From<bool> for Constant {
    fn from(value: bool) -> Self {
        Constant::Bool(value)
    }
}

impl From<i32> for Constant {
    fn from(value: i32) -> Self {
        Constant::Int(i64::from(value))
    }
}

impl From<u32> for Constant {
    fn from(value: u32) -> Self {
        Constant::Int(i64::from(value))
    }
}

impl From<i64> for Constant {
    fn from(value: i64) -> Self {
        Constant::Int(value)
    }
}

impl From<f64> for Constant {
    fn from(value: f64) -> Self {
        Constant::Float(value)
    }
}

impl From<&str> for Constant {
    fn from(value: &str) -> Self {
        Constant::Str(value.to_string())
    }
}

impl From<String> for Constant {
    fn from(value: String) -> Self {
        Constant::Str(value)
    }
}

impl std::str::FromStr for Constant {
    type Err = std::convert::Infallible;

    /// Parses `true`/`false`, then integers, then floats; anything else is a string
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(v) = s.parse::<bool>() {
            return Ok(Constant::Bool(v));
        }
        if let Ok(v) = s.parse::<i64>() {
            return Ok(Constant::Int(v));
        }
        if let Ok(v) = s.parse::<f64>() {
            return Ok(Constant::Float(v));
        }
        Ok(Constant::Str(s.to_string()))
    }
}

/// Named conditions and constants for one `process` call
///
/// Passed unchanged to every imported file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Options {
    #[serde(default)]
    pub conditions: HashMap<String, bool>,
    #[serde(default)]
    pub constants: HashMap<String, Constant>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn condition(mut self, name: impl Into<String>, value: bool) -> Self {
        self.conditions.insert(name.into(), value);
        self
    }

    pub fn constant(mut self, name: impl Into<String>, value: impl Into<Constant>) -> Self {
        self.constants.insert(name.into(), value.into());
        self
    }

    pub fn condition_value(&self, name: &str) -> Option<bool> {
        self.conditions.get(name).copied()
    }

    pub fn constant_value(&self, name: &str) -> Option<&Constant> {
        self.constants.get(name)
    }

    /// Load options from a JSON file of the form
    /// `{"conditions": {"name": true}, "constants": {"name": 8}}`
    pub fn load_from_file(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let options = serde_json::from_reader(reader)?;
        Ok(options)
    }
}

/// Engine-wide limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessorConfig {
    /// Maximum nesting of imports below the top-level file
    pub max_import_depth: usize,
    /// Maximum length in bytes of a content line after constant substitution
    pub max_line_length: usize,
}

impl Default for PreprocessorConfig {
    fn default() -> Self {
        Self {
            max_import_depth: 64,
            max_line_length: 4096,
        }
    }
}

impl PreprocessorConfig {
    pub fn load_from_file(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config = serde_json::from_reader(reader)?;
        Ok(config)
    }
}
