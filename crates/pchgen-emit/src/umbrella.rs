//! Umbrella header writer

use pchgen_core::{Aggregate, FileSystem, ModuleNaming, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::sync::{write_if_changed, WriteOutcome};

/// Outcome of writing the umbrella pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UmbrellaOutcome {
    pub header: WriteOutcome,
    pub companion: WriteOutcome,
}

/// Lines of the umbrella header
pub fn header_lines(naming: &ModuleNaming, aggregate: &Aggregate) -> Vec<String> {
    let guard = naming.guard_macro();
    let mut out = vec![
        format!("#ifndef {}", guard),
        format!("#define {}", guard),
        String::new(),
    ];
    for record in aggregate.iter() {
        out.extend(record.emitted_lines().map(str::to_string));
    }
    out.push(String::new());
    out.push(format!("#endif // {}", guard));
    out
}

/// Lines of the companion source that gives the header a translation unit
pub fn companion_lines(naming: &ModuleNaming, marker: &str) -> Vec<String> {
    vec![
        marker.to_string(),
        format!("#include \"{}\"", naming.umbrella_header()),
    ]
}

/// Writes `<module>_PCH.h` and `<module>_PCH.cpp` into the output directory
pub struct UmbrellaWriter<'a> {
    fs: &'a dyn FileSystem,
    naming: &'a ModuleNaming,
    output_dir: &'a Path,
    marker: &'a str,
}

impl<'a> UmbrellaWriter<'a> {
    pub fn new(
        fs: &'a dyn FileSystem,
        naming: &'a ModuleNaming,
        output_dir: &'a Path,
        marker: &'a str,
    ) -> Self {
        Self {
            fs,
            naming,
            output_dir,
            marker,
        }
    }

    pub fn header_path(&self) -> PathBuf {
        self.output_dir.join(self.naming.umbrella_header())
    }

    pub fn companion_path(&self) -> PathBuf {
        self.output_dir.join(self.naming.umbrella_source())
    }

    /// Write both files, leaving unchanged ones untouched
    pub fn write(&self, aggregate: &Aggregate) -> Result<UmbrellaOutcome> {
        let header_path = self.header_path();
        let header = write_if_changed(
            self.fs,
            &header_path,
            &header_lines(self.naming, aggregate),
        )?;

        let companion_path = self.companion_path();
        let companion = write_if_changed(
            self.fs,
            &companion_path,
            &companion_lines(self.naming, self.marker),
        )?;

        if header.touched_disk() {
            info!(
                "Wrote {} with {} includes",
                header_path.display(),
                aggregate.len()
            );
        }
        if companion.touched_disk() {
            info!("Wrote {}", companion_path.display());
        }

        Ok(UmbrellaOutcome { header, companion })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pchgen_core::{IncludeRecord, MemoryFileSystem};
    use pretty_assertions::assert_eq;

    fn aggregate() -> Aggregate {
        let mut aggregate = Aggregate::new();
        aggregate.push(IncludeRecord::parse("#include <vector>").unwrap());
        let mut guarded = IncludeRecord::parse("#include <windows.h>").unwrap();
        guarded.pre_lines = vec!["#ifdef _WIN32".into()];
        guarded.post_lines = vec!["#endif".into()];
        aggregate.push(guarded);
        aggregate
    }

    #[test]
    fn test_header_lines() {
        let naming = ModuleNaming::new("hud", "_PCH");
        assert_eq!(
            header_lines(&naming, &aggregate()),
            vec![
                "#ifndef hud_PCH_H",
                "#define hud_PCH_H",
                "",
                "#include <vector>",
                "#ifdef _WIN32",
                "#include <windows.h>",
                "#endif",
                "",
                "#endif // hud_PCH_H",
            ]
        );
    }

    #[test]
    fn test_write_is_idempotent() {
        let fs = MemoryFileSystem::new();
        let naming = ModuleNaming::new("hud", "_PCH");
        let writer = UmbrellaWriter::new(&fs, &naming, Path::new("."), "// generated");

        let first = writer.write(&aggregate()).unwrap();
        assert_eq!(first.header, WriteOutcome::Created);
        assert_eq!(first.companion, WriteOutcome::Created);
        assert_eq!(
            fs.contents("hud_PCH.cpp").unwrap(),
            "// generated\n#include \"hud_PCH.h\"\n"
        );

        let second = writer.write(&aggregate()).unwrap();
        assert_eq!(second.header, WriteOutcome::Unchanged);
        assert_eq!(second.companion, WriteOutcome::Unchanged);
        assert_eq!(fs.write_count(), 2);
    }
}
