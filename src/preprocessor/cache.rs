//! Processed output per canonical path

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::preprocessor::error::{PreprocessorError, PreprocessorResult};

/// Append-only map from canonical path to fully processed text
///
/// Entries live as long as the cache and are never replaced.
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: HashMap<PathBuf, String>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &Path) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    pub fn insert(&mut self, path: PathBuf, output: String) -> PreprocessorResult<()> {
        match self.entries.entry(path) {
            Entry::Occupied(entry) => Err(PreprocessorError::CacheError {
                path: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(output);
                Ok(())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
