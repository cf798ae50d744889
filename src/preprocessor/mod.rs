//! WGSL Preprocessor
//!
//! A directive preprocessor for WGSL shader sources that handles:
//! - `#import "path.wgsl"` to flatten a tree of shader files, with cycle detection
//!   and a per-path result cache
//! - `#if NAME` / `#else` / `#endif` against caller-supplied booleans
//! - `#(NAME)` inline substitution of caller-supplied constants

mod cache;
mod conditions;
mod constants;
mod diagnostics;
mod error;
mod file_access;
mod options;
mod parser;
mod processor;

pub use diagnostics::{Diagnostic, DiagnosticSink, LogSink};
pub use error::{ErrorKind, PreprocessorError, PreprocessorResult};
pub use file_access::{FileAccess, MemoryFileSystem, OsFileSystem};
pub use options::{Constant, Options, PreprocessorConfig};
pub use parser::{import_path, parse_directive, Directive, MAX_PATH_SEGMENTS};
pub use processor::Preprocessor;
