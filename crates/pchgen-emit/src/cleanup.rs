//! Removal of generated umbrella files

use pchgen_core::{FileSystem, ModuleNaming};
use std::path::PathBuf;
use tracing::{info, warn};

/// Delete `<module>_PCH.h` and `<module>_PCH.cpp` from every directory.
///
/// Absent files are skipped silently and failed deletes are logged, so the
/// returned list holds only the files actually removed.
pub fn remove_generated<I>(fs: &dyn FileSystem, naming: &ModuleNaming, dirs: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = PathBuf>,
{
    let names = [naming.umbrella_header(), naming.umbrella_source()];
    let mut removed = Vec::new();

    for dir in dirs {
        for name in &names {
            let path = dir.join(name);
            if !fs.exists(&path) {
                continue;
            }
            match fs.remove_file(&path) {
                Ok(()) => {
                    info!("Removed {}", path.display());
                    removed.push(path);
                }
                Err(e) => warn!("Failed to remove {}: {}", path.display(), e),
            }
        }
    }

    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use pchgen_core::MemoryFileSystem;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_removes_generated_pairs_only() {
        let fs = MemoryFileSystem::new()
            .with_file("hud_PCH.h", "")
            .with_file("hud_PCH.cpp", "")
            .with_file("modules/hud/hud_PCH.h", "#include \"../../hud_PCH.h\"\n")
            .with_file("modules/hud/WMHud.cpp", "");
        let naming = ModuleNaming::new("hud", "_PCH");

        let removed = remove_generated(
            &fs,
            &naming,
            [PathBuf::new(), PathBuf::from("modules/hud"), PathBuf::from("missing")],
        );

        assert_eq!(
            removed,
            vec![
                PathBuf::from("hud_PCH.h"),
                PathBuf::from("hud_PCH.cpp"),
                PathBuf::from("modules/hud/hud_PCH.h"),
            ]
        );
        assert_eq!(fs.paths(), vec![PathBuf::from("modules/hud/WMHud.cpp")]);
    }
}
