//! Include Path Resolver
//!
//! The umbrella header lives in a different directory than most module
//! files, so an include that only resolves next to the including file has
//! to be rewritten before it is relocated.

use pchgen_core::{FileReference, FileSystem, IncludeRecord};
use std::path::Path;
use tracing::debug;

/// Rewrites include targets so they resolve from the working directory
pub struct PathResolver<'a> {
    fs: &'a dyn FileSystem,
}

impl<'a> PathResolver<'a> {
    pub fn new(fs: &'a dyn FileSystem) -> Self {
        Self { fs }
    }

    /// Resolve `record` as included from `including`.
    ///
    /// - Without `..` segments: if the target exists next to the including
    ///   file, the directive is rewritten to that path.
    /// - With `..` segments: kept when it exists as written, otherwise
    ///   leading `../` segments are stripped one at a time and the first
    ///   existing candidate wins.
    ///
    /// The record is returned unchanged when nothing matches.
    pub fn resolve(&self, including: &FileReference, record: IncludeRecord) -> IncludeRecord {
        let target = record.target.path.as_str();

        if !has_parent_segment(target) {
            let dir = including.dir();
            if dir.is_empty() {
                return record;
            }
            let candidate = format!("{}/{}", dir.trim_end_matches(['/', '\\']), target);
            if self.fs.exists(Path::new(&candidate)) {
                debug!("Resolved {} relative to {}", target, including.path);
                return record.with_target(&candidate);
            }
            return record;
        }

        if self.fs.exists(Path::new(target)) {
            return record;
        }

        let mut candidate = target;
        while let Some(rest) = candidate.strip_prefix("../") {
            candidate = rest;
            if self.fs.exists(Path::new(candidate)) {
                debug!("Resolved {} as {}", target, candidate);
                return record.with_target(candidate);
            }
        }

        debug!("Leaving unresolved include {} from {}", target, including.path);
        record
    }
}

fn has_parent_segment(path: &str) -> bool {
    path.split(['/', '\\']).any(|segment| segment == "..")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pchgen_core::{Delimiter, MemoryFileSystem};
    use pretty_assertions::assert_eq;

    fn include(line: &str) -> IncludeRecord {
        IncludeRecord::parse(line).unwrap()
    }

    #[test]
    fn test_rewrites_sibling_path() {
        let fs = MemoryFileSystem::new().with_file("src/dataHandler/io/WReaderEEG.h", "");
        let resolver = PathResolver::new(&fs);
        let including = FileReference::new("src/dataHandler/WDataHandler.h");

        let resolved = resolver.resolve(&including, include("#include \"io/WReaderEEG.h\""));
        assert_eq!(resolved.directive, "#include \"src/dataHandler/io/WReaderEEG.h\"");
        assert_eq!(resolved.delimiter, Delimiter::Quote);
    }

    #[test]
    fn test_keeps_system_include() {
        let fs = MemoryFileSystem::new();
        let resolver = PathResolver::new(&fs);
        let including = FileReference::new("src/dataHandler/WDataHandler.h");

        let resolved = resolver.resolve(&including, include("#include <vector>"));
        assert_eq!(resolved.directive, "#include <vector>");
    }

    #[test]
    fn test_bare_including_file_is_left_alone() {
        let fs = MemoryFileSystem::new().with_file("b.h", "");
        let resolver = PathResolver::new(&fs);

        let resolved = resolver.resolve(&FileReference::new("a.h"), include("#include \"b.h\""));
        assert_eq!(resolved.directive, "#include \"b.h\"");
    }

    #[test]
    fn test_parent_path_existing_as_written() {
        let fs = MemoryFileSystem::new().with_file("../ext/nifti/nifti1.h", "");
        let resolver = PathResolver::new(&fs);
        let including = FileReference::new("src/io/WReaderNIfTI.h");

        let resolved = resolver.resolve(&including, include("#include \"../ext/nifti/nifti1.h\""));
        assert_eq!(resolved.directive, "#include \"../ext/nifti/nifti1.h\"");
    }

    #[test]
    fn test_parent_path_strips_leading_segments() {
        let fs = MemoryFileSystem::new().with_file("ext/nifti/nifti1.h", "");
        let resolver = PathResolver::new(&fs);
        let including = FileReference::new("src/io/WReaderNIfTI.h");

        let resolved =
            resolver.resolve(&including, include("#include <../../ext/nifti/nifti1.h>"));
        assert_eq!(resolved.directive, "#include <ext/nifti/nifti1.h>");
        assert_eq!(resolved.target.path, "ext/nifti/nifti1.h");
    }

    #[test]
    fn test_parent_path_without_match() {
        let fs = MemoryFileSystem::new();
        let resolver = PathResolver::new(&fs);
        let including = FileReference::new("src/io/WReaderNIfTI.h");

        let resolved = resolver.resolve(&including, include("#include \"../common/WLogger.h\""));
        assert_eq!(resolved.directive, "#include \"../common/WLogger.h\"");
    }
}
