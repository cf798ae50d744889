//! Directive preprocessor for WGSL shader sources.
//!
//! ```no_run
//! use wgsl_directives::{Options, Preprocessor};
//!
//! let mut preprocessor = Preprocessor::new();
//! let options = Options::new()
//!     .condition("USE_SHADOWS", true)
//!     .constant("workgroup_x", 8);
//! let source = preprocessor.process("shaders/main.wgsl", &options)?;
//! # Ok::<(), wgsl_directives::PreprocessorError>(())
//! ```

pub mod preprocessor;

pub use preprocessor::{
    Constant, Diagnostic, DiagnosticSink, ErrorKind, FileAccess, LogSink, MemoryFileSystem,
    Options, OsFileSystem, Preprocessor, PreprocessorConfig, PreprocessorError,
    PreprocessorResult,
};
