//! Per-directory forwarding headers
//!
//! Implementation files include the umbrella header by its bare name. In
//! any other directory that name is satisfied by a one-line forwarding
//! header that includes the real umbrella header by its relative path.

use pchgen_core::fs::relative_path;
use pchgen_core::{Error, FileReference, FileSystem, ModuleNaming, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::sync::{write_if_changed, WriteOutcome};

/// What `ForwardingHeaders::ensure` found or did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardingOutcome {
    /// The umbrella header lives in the file's directory
    Local,
    /// A forwarding header was written at this path
    Created(PathBuf),
    /// The forwarding header at this path is already current
    Unchanged(PathBuf),
}

pub struct ForwardingHeaders<'a> {
    fs: &'a dyn FileSystem,
    naming: &'a ModuleNaming,
    umbrella: &'a Path,
}

impl<'a> ForwardingHeaders<'a> {
    /// `umbrella` is the path of the generated umbrella header
    pub fn new(fs: &'a dyn FileSystem, naming: &'a ModuleNaming, umbrella: &'a Path) -> Self {
        Self {
            fs,
            naming,
            umbrella,
        }
    }

    /// Make the umbrella name resolvable from `file`'s directory.
    ///
    /// Both locations are resolved against the working directory before
    /// the relative include is computed, so `../` list entries and output
    /// directories outside the module tree get a working path.
    pub fn ensure(&self, file: &FileReference) -> Result<ForwardingOutcome> {
        if !self.fs.exists(self.umbrella) {
            return Err(Error::Resolve {
                header: self.umbrella.display().to_string(),
                from: file.path.clone(),
            });
        }

        let dir = Path::new(&file.path).parent().unwrap_or_else(|| Path::new(""));
        let from = self.fs.absolute(dir)?;
        let umbrella = self.fs.absolute(self.umbrella)?;
        if umbrella.parent() == Some(from.as_path()) {
            return Ok(ForwardingOutcome::Local);
        }

        let path = dir.join(self.naming.umbrella_header());
        let line = format!("#include \"{}\"", relative_path(&from, &umbrella));
        match write_if_changed(self.fs, &path, &[line])? {
            WriteOutcome::Unchanged => Ok(ForwardingOutcome::Unchanged(path)),
            _ => {
                info!("Wrote forwarding header {}", path.display());
                Ok(ForwardingOutcome::Created(path))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pchgen_core::MemoryFileSystem;
    use pretty_assertions::assert_eq;

    fn naming() -> ModuleNaming {
        ModuleNaming::new("hud", "_PCH")
    }

    #[test]
    fn test_creates_forwarding_header_in_subdirectory() {
        let fs = MemoryFileSystem::new().with_file("hud_PCH.h", "#ifndef hud_PCH_H\n");
        let naming = naming();
        let forwarding = ForwardingHeaders::new(&fs, &naming, Path::new("./hud_PCH.h"));

        let outcome = forwarding
            .ensure(&FileReference::new("modules/hud/WMHud.cpp"))
            .unwrap();

        assert_eq!(
            outcome,
            ForwardingOutcome::Created(PathBuf::from("modules/hud/hud_PCH.h"))
        );
        assert_eq!(
            fs.contents("modules/hud/hud_PCH.h").unwrap(),
            "#include \"../../hud_PCH.h\"\n"
        );
    }

    #[test]
    fn test_parent_relative_entry_reaches_umbrella() {
        let fs = MemoryFileSystem::new()
            .with_current_dir("/ow/build")
            .with_file("hud_PCH.h", "");
        let naming = naming();
        let forwarding = ForwardingHeaders::new(&fs, &naming, Path::new("hud_PCH.h"));

        let outcome = forwarding
            .ensure(&FileReference::new("../src/WMHud.cpp"))
            .unwrap();

        assert_eq!(
            outcome,
            ForwardingOutcome::Created(PathBuf::from("../src/hud_PCH.h"))
        );
        assert_eq!(
            fs.contents("../src/hud_PCH.h").unwrap(),
            "#include \"../build/hud_PCH.h\"\n"
        );
        assert!(fs.exists(&Path::new("../src").join("../build/hud_PCH.h")));
    }

    #[test]
    fn test_umbrella_in_separate_output_dir() {
        let fs = MemoryFileSystem::new().with_file("build/pch/hud_PCH.h", "");
        let naming = naming();
        let forwarding = ForwardingHeaders::new(&fs, &naming, Path::new("build/pch/hud_PCH.h"));

        forwarding
            .ensure(&FileReference::new("src/hud/WMHud.cpp"))
            .unwrap();
        let outcome = forwarding.ensure(&FileReference::new("WMMain.cpp")).unwrap();

        assert_eq!(
            fs.contents("src/hud/hud_PCH.h").unwrap(),
            "#include \"../../build/pch/hud_PCH.h\"\n"
        );
        assert_eq!(outcome, ForwardingOutcome::Created(PathBuf::from("hud_PCH.h")));
        assert_eq!(
            fs.contents("hud_PCH.h").unwrap(),
            "#include \"build/pch/hud_PCH.h\"\n"
        );
    }

    #[test]
    fn test_existing_forwarding_header_is_kept_or_repaired() {
        let fs = MemoryFileSystem::new()
            .with_file("hud_PCH.h", "")
            .with_file("modules/hud/hud_PCH.h", "#include \"../../hud_PCH.h\"\n")
            .with_file("modules/hud/gl/hud_PCH.h", "#include \"../hud_PCH.h\"\n");
        let naming = naming();
        let forwarding = ForwardingHeaders::new(&fs, &naming, Path::new("hud_PCH.h"));

        let current = forwarding
            .ensure(&FileReference::new("modules/hud/WMHud.cpp"))
            .unwrap();
        let stale = forwarding
            .ensure(&FileReference::new("modules/hud/gl/WGLHud.cpp"))
            .unwrap();

        assert_eq!(
            current,
            ForwardingOutcome::Unchanged(PathBuf::from("modules/hud/hud_PCH.h"))
        );
        assert_eq!(
            stale,
            ForwardingOutcome::Created(PathBuf::from("modules/hud/gl/hud_PCH.h"))
        );
        assert_eq!(
            fs.contents("modules/hud/gl/hud_PCH.h").unwrap(),
            "#include \"../../../hud_PCH.h\"\n"
        );
        assert_eq!(fs.write_count(), 1);
    }

    #[test]
    fn test_local_umbrella_needs_no_forwarding() {
        let fs = MemoryFileSystem::new().with_file("hud_PCH.h", "");
        let naming = naming();
        let forwarding = ForwardingHeaders::new(&fs, &naming, Path::new("hud_PCH.h"));

        let outcome = forwarding.ensure(&FileReference::new("WMHud.cpp")).unwrap();
        assert_eq!(outcome, ForwardingOutcome::Local);
        assert_eq!(fs.write_count(), 0);
    }

    #[test]
    fn test_missing_umbrella_is_an_error() {
        let fs = MemoryFileSystem::new();
        let naming = naming();
        let forwarding = ForwardingHeaders::new(&fs, &naming, Path::new("hud_PCH.h"));

        let err = forwarding
            .ensure(&FileReference::new("modules/hud/WMHud.cpp"))
            .unwrap_err();
        assert!(matches!(err, Error::Resolve { .. }));
    }
}
