//! File access used by the preprocessor
//!
//! The engine only ever reads files and canonicalizes paths; both go through
//! [`FileAccess`] so shader trees can come from disk or from memory.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use include_dir::Dir;

pub trait FileAccess {
    /// Read a whole file as UTF-8 text
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Resolve `path` to the absolute path used as its identity
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;
}

impl<T: FileAccess + ?Sized> FileAccess for &T {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        (**self).read_to_string(path)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        (**self).canonicalize(path)
    }
}

/// The real filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileAccess for OsFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        fs::canonicalize(path)
    }
}

/// Shader files held in memory, keyed by normalized absolute path
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    files: HashMap<PathBuf, String>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file; relative paths are taken relative to `/`
    pub fn insert(&mut self, path: impl AsRef<Path>, contents: impl Into<String>) {
        self.files.insert(normalize(path.as_ref()), contents.into());
    }

    pub fn with_file(mut self, path: impl AsRef<Path>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }

    /// Build a tree from a directory embedded with `include_dir!`, mounted at `root`
    pub fn from_embedded(dir: &Dir, root: impl AsRef<Path>) -> io::Result<Self> {
        let mut memory = Self::new();
        memory.mount_embedded(dir, root.as_ref())?;
        Ok(memory)
    }

    fn mount_embedded(&mut self, dir: &Dir, root: &Path) -> io::Result<()> {
        for file in dir.files() {
            let contents = file.contents_utf8().ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("{} is not valid UTF-8", file.path().display()),
                )
            })?;
            self.insert(root.join(file.path()), contents);
        }

        for subdir in dir.dirs() {
            self.mount_embedded(subdir, root)?;
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FileAccess for MemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(&normalize(path))
            .cloned()
            .ok_or_else(|| not_found(path))
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        let normalized = normalize(path);
        if self.files.contains_key(&normalized) {
            Ok(normalized)
        } else {
            Err(not_found(path))
        }
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{} not found", path.display()),
    )
}

/// Lexically resolve `.` and `..`; `..` never climbs above the root
fn normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::from("/");
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => result = PathBuf::from(prefix.as_os_str()),
            Component::RootDir => result.push(Component::RootDir),
            Component::CurDir => {}
            Component::ParentDir => {
                result.pop();
            }
            Component::Normal(name) => result.push(name),
        }
    }
    result
}
