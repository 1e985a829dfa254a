//! Module file list loading

use pchgen_core::{FileReference, FileSystem, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// The files belonging to one module, in list order
#[derive(Debug, Clone, Default)]
pub struct ModuleFileList {
    files: Vec<FileReference>,
}

impl ModuleFileList {
    /// Load a newline-delimited list; blank lines are dropped.
    ///
    /// Fails with `FileNotFound` when the list itself is missing.
    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        let content = fs.read_to_string(path)?;
        let list = Self::parse(&content);
        debug!("Loaded {} module files from {}", list.len(), path.display());
        Ok(list)
    }

    /// Parse list contents
    pub fn parse(content: &str) -> Self {
        Self::from_paths(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty()),
        )
    }

    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            files: paths.into_iter().map(FileReference::new).collect(),
        }
    }

    /// Whether some module file has exactly this basename
    pub fn contains_name(&self, name: &str) -> bool {
        self.files.iter().any(|file| file.name == name)
    }

    /// Distinct directories of the listed files, in first-seen order.
    ///
    /// Bare file names map to the empty (working) directory.
    pub fn directories(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = Vec::new();
        for file in &self.files {
            let dir = PathBuf::from(file.dir());
            if !dirs.contains(&dir) {
                dirs.push(dir);
            }
        }
        dirs
    }

    pub fn iter(&self) -> impl Iterator<Item = &FileReference> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pchgen_core::{Error, MemoryFileSystem};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load_trims_and_skips_blank_lines() {
        let fs = MemoryFileSystem::new().with_file(
            "hud.files",
            "src/modules/hud/WMHud.h\r\n\n  src/modules/hud/WMHud.cpp  \nWHudShared.h\n",
        );
        let list = ModuleFileList::load(&fs, Path::new("hud.files")).unwrap();

        let paths: Vec<&str> = list.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["src/modules/hud/WMHud.h", "src/modules/hud/WMHud.cpp", "WHudShared.h"]
        );
        assert!(list.contains_name("WMHud.cpp"));
        assert!(!list.contains_name("wmhud.cpp"));
    }

    #[test]
    fn test_missing_list_file() {
        let fs = MemoryFileSystem::new();
        let err = ModuleFileList::load(&fs, Path::new("missing.files")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));
    }

    #[test]
    fn test_directories_are_distinct() {
        let list = ModuleFileList::from_paths([
            "src/hud/WMHud.h",
            "src/hud/WMHud.cpp",
            "src/hud/gl/WGLHud.cpp",
            "main.cpp",
        ]);
        assert_eq!(
            list.directories(),
            vec![PathBuf::from("src/hud"), PathBuf::from("src/hud/gl"), PathBuf::new()]
        );
    }
}
