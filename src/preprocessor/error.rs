//! Error types for the preprocessor

use std::fmt;
use std::path::PathBuf;

/// Result type for preprocessor operations
pub type PreprocessorResult<T> = Result<T, PreprocessorError>;

/// Classification of a [`PreprocessorError`] without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidPath,
    InvalidFile,
    InvalidImport,
    CyclicImport,
    InvalidCondition,
    InvalidConstant,
    SyntaxError,
    MismatchedIf,
    CacheError,
    RecursionLimit,
}

/// Errors that can occur during preprocessing
#[derive(Debug, Clone, PartialEq)]
pub enum PreprocessorError {
    /// The top-level path handed to `process` is unusable
    InvalidPath { path: String },

    /// A file could not be canonicalized, read or decoded
    InvalidFile { path: PathBuf, message: String },

    /// Malformed or unresolvable `#import` target
    InvalidImport { path: String, message: String },

    /// A file imports itself or one of its ancestors
    CyclicImport { path: PathBuf, chain: Vec<PathBuf> },

    /// `#if` names a condition missing from the options
    InvalidCondition { name: String },

    /// `#(name)` names a constant missing from the options
    InvalidConstant { name: String },

    /// Malformed directive or constant reference
    SyntaxError { message: String },

    /// Unbalanced `#if` / `#else` / `#endif`
    MismatchedIf { message: String },

    /// A finished result could not be stored in the cache
    CacheError { path: PathBuf },

    /// The import tree is deeper than the configured limit
    RecursionLimit { path: PathBuf, depth: usize },
}

impl PreprocessorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PreprocessorError::InvalidPath { .. } => ErrorKind::InvalidPath,
            PreprocessorError::InvalidFile { .. } => ErrorKind::InvalidFile,
            PreprocessorError::InvalidImport { .. } => ErrorKind::InvalidImport,
            PreprocessorError::CyclicImport { .. } => ErrorKind::CyclicImport,
            PreprocessorError::InvalidCondition { .. } => ErrorKind::InvalidCondition,
            PreprocessorError::InvalidConstant { .. } => ErrorKind::InvalidConstant,
            PreprocessorError::SyntaxError { .. } => ErrorKind::SyntaxError,
            PreprocessorError::MismatchedIf { .. } => ErrorKind::MismatchedIf,
            PreprocessorError::CacheError { .. } => ErrorKind::CacheError,
            PreprocessorError::RecursionLimit { .. } => ErrorKind::RecursionLimit,
        }
    }

    pub(crate) fn syntax(message: impl Into<String>) -> Self {
        PreprocessorError::SyntaxError {
            message: message.into(),
        }
    }

    pub(crate) fn mismatched_if(message: impl Into<String>) -> Self {
        PreprocessorError::MismatchedIf {
            message: message.into(),
        }
    }
}

impl fmt::Display for PreprocessorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreprocessorError::InvalidPath { path } => {
                write!(f, "Invalid path '{}'", path)
            }
            PreprocessorError::InvalidFile { path, message } => {
                write!(f, "Invalid file '{}': {}", path.display(), message)
            }
            PreprocessorError::InvalidImport { path, message } => {
                write!(f, "Invalid import '{}': {}", path, message)
            }
            PreprocessorError::CyclicImport { path, chain } => {
                let chain: Vec<String> = chain.iter().map(|p| p.display().to_string()).collect();
                write!(
                    f,
                    "Cyclic import detected: {} -> {}",
                    chain.join(" -> "),
                    path.display()
                )
            }
            PreprocessorError::InvalidCondition { name } => {
                write!(f, "Unknown condition '{}'", name)
            }
            PreprocessorError::InvalidConstant { name } => {
                write!(f, "Unknown constant '{}'", name)
            }
            PreprocessorError::SyntaxError { message } => {
                write!(f, "Syntax error: {}", message)
            }
            PreprocessorError::MismatchedIf { message } => {
                write!(f, "Mismatched #if: {}", message)
            }
            PreprocessorError::CacheError { path } => {
                write!(f, "Result for '{}' is already cached", path.display())
            }
            PreprocessorError::RecursionLimit { path, depth } => {
                write!(
                    f,
                    "Import depth limit of {} exceeded at '{}'",
                    depth,
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for PreprocessorError {}
