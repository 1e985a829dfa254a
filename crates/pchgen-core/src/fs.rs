//! File-system access
//!
//! Every read, existence probe, write and delete performed by the scanner
//! and the emitter goes through [`FileSystem`]. The real implementation is
//! [`OsFileSystem`]; [`MemoryFileSystem`] backs unit tests and
//! [`DryRunFileSystem`] layers pending changes over another file system
//! without touching it.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// File-system operations used by pchgen
pub trait FileSystem {
    /// Whether a file exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Read a whole file
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Replace a whole file, creating it if needed
    fn write(&self, path: &Path, contents: &str) -> Result<()>;

    /// Delete a file
    fn remove_file(&self, path: &Path) -> Result<()>;

    /// Directory that relative paths are resolved against
    fn current_dir(&self) -> Result<PathBuf>;

    /// `path` made absolute against [`FileSystem::current_dir`] and
    /// normalized, so `..` segments refer to real parent directories
    fn absolute(&self, path: &Path) -> Result<PathBuf> {
        if path.is_absolute() {
            Ok(normalize(path))
        } else {
            Ok(normalize(&self.current_dir()?.join(path)))
        }
    }
}

/// The real file system, paths relative to the working directory
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.display().to_string()));
        }
        Ok(fs::read_to_string(path)?)
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        debug!("Writing {}", path.display());
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        debug!("Removing {}", path.display());
        fs::remove_file(path)?;
        Ok(())
    }

    fn current_dir(&self) -> Result<PathBuf> {
        Ok(std::env::current_dir()?)
    }
}

/// Lexically normalize a path: drop `.` segments and fold `dir/..` pairs.
///
/// `..` directly below the root is dropped.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Path from directory `from` to `to`, both absolute and normalized,
/// with `/` separators as used in include directives
pub fn relative_path(from: &Path, to: &Path) -> String {
    let from: Vec<Component> = from.components().collect();
    let to: Vec<Component> = to.components().collect();
    let common = from
        .iter()
        .zip(&to)
        .take_while(|(a, b)| a == b)
        .count();

    let mut segments: Vec<String> = vec!["..".to_string(); from.len() - common];
    segments.extend(
        to[common..]
            .iter()
            .map(|component| component.as_os_str().to_string_lossy().into_owned()),
    );
    segments.join("/")
}

/// Working directory of a fresh [`MemoryFileSystem`]
const MEMORY_CWD: &str = "/work";

/// In-memory file system.
///
/// Relative paths resolve against a virtual working directory, so `..`
/// segments that climb above it still address distinct files.
#[derive(Debug)]
pub struct MemoryFileSystem {
    cwd: PathBuf,
    files: RefCell<BTreeMap<PathBuf, String>>,
    writes: Cell<usize>,
    removals: Cell<usize>,
}

impl Default for MemoryFileSystem {
    fn default() -> Self {
        Self {
            cwd: PathBuf::from(MEMORY_CWD),
            files: RefCell::new(BTreeMap::new()),
            writes: Cell::new(0),
            removals: Cell::new(0),
        }
    }
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style change of the virtual working directory
    pub fn with_current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = normalize(&Path::new("/").join(dir.as_ref()));
        self
    }

    fn key(&self, path: &Path) -> PathBuf {
        normalize(&self.cwd.join(path))
    }

    /// Builder-style insert that does not count as a write
    pub fn with_file(self, path: impl AsRef<Path>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }

    /// Insert a file without counting it as a write
    pub fn insert(&self, path: impl AsRef<Path>, contents: impl Into<String>) {
        self.files
            .borrow_mut()
            .insert(self.key(path.as_ref()), contents.into());
    }

    /// Current contents of a file
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.borrow().get(&self.key(path.as_ref())).cloned()
    }

    /// All stored paths in sorted order, relative to the working directory
    /// where possible
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files
            .borrow()
            .keys()
            .map(|key| {
                key.strip_prefix(&self.cwd)
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|_| key.clone())
            })
            .collect()
    }

    /// Number of writes performed through [`FileSystem::write`]
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    /// Number of deletes performed through [`FileSystem::remove_file`]
    pub fn remove_count(&self) -> usize {
        self.removals.get()
    }
}

impl FileSystem for MemoryFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(&self.key(path))
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.contents(path)
            .ok_or_else(|| Error::FileNotFound(path.display().to_string()))
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        self.writes.set(self.writes.get() + 1);
        self.insert(path, contents);
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        match self.files.borrow_mut().remove(&self.key(path)) {
            Some(_) => {
                self.removals.set(self.removals.get() + 1);
                Ok(())
            }
            None => Err(Error::FileNotFound(path.display().to_string())),
        }
    }

    fn current_dir(&self) -> Result<PathBuf> {
        Ok(self.cwd.clone())
    }
}

/// Reads through to an inner file system and keeps writes and deletes in
/// an overlay, so later steps of a run observe the pending changes.
#[derive(Debug)]
pub struct DryRunFileSystem<F: FileSystem> {
    inner: F,
    overlay: RefCell<BTreeMap<PathBuf, Option<String>>>,
}

impl<F: FileSystem> DryRunFileSystem<F> {
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            overlay: RefCell::new(BTreeMap::new()),
        }
    }

    /// Paths that would be written (`true`) or deleted (`false`)
    pub fn pending_changes(&self) -> Vec<(PathBuf, bool)> {
        self.overlay
            .borrow()
            .iter()
            .map(|(path, contents)| (path.clone(), contents.is_some()))
            .collect()
    }
}

impl<F: FileSystem> FileSystem for DryRunFileSystem<F> {
    fn exists(&self, path: &Path) -> bool {
        match self.overlay.borrow().get(&normalize(path)) {
            Some(entry) => entry.is_some(),
            None => self.inner.exists(path),
        }
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        match self.overlay.borrow().get(&normalize(path)) {
            Some(Some(contents)) => Ok(contents.clone()),
            Some(None) => Err(Error::FileNotFound(path.display().to_string())),
            None => self.inner.read_to_string(path),
        }
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        info!("[dry-run] would write {}", path.display());
        self.overlay
            .borrow_mut()
            .insert(normalize(path), Some(contents.to_string()));
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        if !self.exists(path) {
            return Err(Error::FileNotFound(path.display().to_string()));
        }
        info!("[dry-run] would remove {}", path.display());
        self.overlay.borrow_mut().insert(normalize(path), None);
        Ok(())
    }

    fn current_dir(&self) -> Result<PathBuf> {
        self.inner.current_dir()
    }
}
