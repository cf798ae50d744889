//! Preprocessor implementation

use std::path::{Path, PathBuf};

use crate::preprocessor::cache::ResultCache;
use crate::preprocessor::conditions::ConditionStack;
use crate::preprocessor::constants::substitute_constant;
use crate::preprocessor::diagnostics::{Diagnostic, DiagnosticSink, LogSink};
use crate::preprocessor::error::{PreprocessorError, PreprocessorResult};
use crate::preprocessor::file_access::{FileAccess, OsFileSystem};
use crate::preprocessor::options::{Options, PreprocessorConfig};
use crate::preprocessor::parser::{line_kind, parse_directive, Directive, LineKind};

/// A preprocessor that flattens `#import` trees and evaluates
/// `#if`/`#else`/`#endif` and `#(name)` against caller options
///
/// Finished files are cached by canonical path for the lifetime of the
/// preprocessor and reused for every later import of the same file, whatever
/// options that later call passes. The import chain used for cycle detection
/// and the `#if` stack are local to a single file of a single call.
///
/// Not meant to be shared across threads; use one instance per thread.
pub struct Preprocessor<F = OsFileSystem, S = LogSink> {
    file_access: F,
    diagnostics: S,
    config: PreprocessorConfig,
    cache: ResultCache,
}

impl Preprocessor {
    /// Create a preprocessor reading from the real filesystem and logging through `log`
    pub fn new() -> Self {
        Self::with_file_access(OsFileSystem)
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FileAccess> Preprocessor<F, LogSink> {
    pub fn with_file_access(file_access: F) -> Self {
        Self {
            file_access,
            diagnostics: LogSink,
            config: PreprocessorConfig::default(),
            cache: ResultCache::new(),
        }
    }
}

impl<F: FileAccess, S: DiagnosticSink> Preprocessor<F, S> {
    /// Replace the diagnostics sink
    pub fn with_diagnostics<T: DiagnosticSink>(self, diagnostics: T) -> Preprocessor<F, T> {
        Preprocessor {
            file_access: self.file_access,
            diagnostics,
            config: self.config,
            cache: self.cache,
        }
    }

    pub fn with_config(mut self, config: PreprocessorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &PreprocessorConfig {
        &self.config
    }

    pub fn diagnostics(&self) -> &S {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut S {
        &mut self.diagnostics
    }

    pub fn file_access(&self) -> &F {
        &self.file_access
    }

    /// Cached output for an already canonical path
    pub fn cached(&self, canonical_path: &Path) -> Option<&str> {
        self.cache.get(canonical_path)
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Process the file at `path` and everything it imports
    pub fn process(&mut self, path: impl AsRef<Path>, options: &Options) -> PreprocessorResult<String> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            let error = PreprocessorError::InvalidPath {
                path: String::new(),
            };
            self.report(&error, path, None);
            return Err(error);
        }

        let canonical = match self.file_access.canonicalize(path) {
            Ok(canonical) => canonical,
            Err(e) => {
                let error = PreprocessorError::InvalidFile {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                };
                self.report(&error, path, None);
                return Err(error);
            }
        };

        if let Some(cached) = self.cache.get(&canonical) {
            log::trace!("cache hit for {}", canonical.display());
            return Ok(cached.to_string());
        }

        let mut chain = Vec::new();
        self.process_file(&canonical, options, &mut chain)
    }

    /// Process one canonical file and store the result in the cache
    fn process_file(
        &mut self,
        path: &Path,
        options: &Options,
        chain: &mut Vec<PathBuf>,
    ) -> PreprocessorResult<String> {
        log::debug!("processing {}", path.display());

        chain.push(path.to_path_buf());
        let result = self.process_lines(path, options, chain);
        chain.pop();
        let output = result?;

        if let Err(error) = self.cache.insert(path.to_path_buf(), output.clone()) {
            self.report(&error, path, None);
            return Err(error);
        }
        Ok(output)
    }

    fn process_lines(
        &mut self,
        path: &Path,
        options: &Options,
        chain: &mut Vec<PathBuf>,
    ) -> PreprocessorResult<String> {
        let source = match self.file_access.read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                let error = PreprocessorError::InvalidFile {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                };
                self.report(&error, path, None);
                return Err(error);
            }
        };

        let lines: Vec<&str> = source.split('\n').collect();
        let last = lines.len() - 1;
        let mut output = String::with_capacity(source.len());
        let mut conditions = ConditionStack::new();

        for (index, line) in lines.iter().enumerate() {
            let line_number = index + 1;
            match self.process_line(path, line, line_number, options, chain, &mut conditions) {
                Ok(Some(emitted)) => {
                    output.push_str(&emitted);
                    if index != last {
                        output.push('\n');
                    }
                }
                Ok(None) => {}
                Err(error) => {
                    self.report(&error, path, Some((line_number, *line)));
                    return Err(error);
                }
            }
        }

        if let Err(line_number) = conditions.finish() {
            let error = PreprocessorError::mismatched_if("#if without matching #endif");
            self.report(&error, path, Some((line_number, lines[line_number - 1])));
            return Err(error);
        }

        Ok(output)
    }

    /// Returns the text to emit for `line`, or `None` when nothing is emitted
    fn process_line(
        &mut self,
        path: &Path,
        line: &str,
        line_number: usize,
        options: &Options,
        chain: &mut Vec<PathBuf>,
        conditions: &mut ConditionStack,
    ) -> PreprocessorResult<Option<String>> {
        let trimmed = line.trim_start_matches(|c: char| c == ' ' || c == '\t');

        match line_kind(trimmed) {
            LineKind::Conditional => {
                let (_, directive) = parse_directive(trimmed).map_err(|_| {
                    PreprocessorError::syntax(format!(
                        "malformed conditional directive '{}'",
                        trimmed.trim_end()
                    ))
                })?;
                conditions.apply(&directive, line_number, options)?;
                Ok(None)
            }
            _ if !conditions.is_visible() => Ok(None),
            LineKind::Import => self.resolve_import(path, trimmed, options, chain).map(Some),
            LineKind::Unknown => Err(PreprocessorError::syntax(format!(
                "unknown directive '{}'",
                trimmed.trim_end()
            ))),
            LineKind::Content => {
                substitute_constant(line, options, self.config.max_line_length).map(Some)
            }
        }
    }

    /// Resolve an `#import` line of `requesting` to the processed text of its target
    fn resolve_import(
        &mut self,
        requesting: &Path,
        directive: &str,
        options: &Options,
        chain: &mut Vec<PathBuf>,
    ) -> PreprocessorResult<String> {
        let import = match parse_directive(directive) {
            Ok((_, Directive::Import { path })) => path,
            _ => {
                return Err(PreprocessorError::InvalidImport {
                    path: directive.trim_end().to_string(),
                    message: "expected #import \"path/to/file.wgsl\"".to_string(),
                });
            }
        };

        let import_path = Path::new(&import);
        let target = if import_path.is_absolute() {
            import_path.to_path_buf()
        } else {
            match requesting.parent() {
                Some(dir) => dir.join(import_path),
                None => import_path.to_path_buf(),
            }
        };

        let canonical = self.file_access.canonicalize(&target).map_err(|e| {
            PreprocessorError::InvalidImport {
                path: import.clone(),
                message: e.to_string(),
            }
        })?;

        if canonical.as_path() == requesting || chain.contains(&canonical) {
            return Err(PreprocessorError::CyclicImport {
                path: canonical,
                chain: chain.clone(),
            });
        }

        if let Some(cached) = self.cache.get(&canonical) {
            log::trace!("cache hit for {}", canonical.display());
            return Ok(cached.to_string());
        }

        if chain.len() > self.config.max_import_depth {
            return Err(PreprocessorError::RecursionLimit {
                path: canonical,
                depth: self.config.max_import_depth,
            });
        }

        log::debug!(
            "resolving import '{}' of {} to {}",
            import,
            requesting.display(),
            canonical.display()
        );
        self.process_file(&canonical, options, chain)
    }

    fn report(&mut self, error: &PreprocessorError, path: &Path, line: Option<(usize, &str)>) {
        let diagnostic = Diagnostic {
            severity: log::Level::Error,
            message: error.to_string(),
            path: path.to_path_buf(),
            line: line.map(|(number, text)| (number, text.to_string())),
        };
        self.diagnostics.report(&diagnostic);
    }
}
