//! Write-if-changed for generated files

use pchgen_core::{FileSystem, Result, SourceText};
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// What happened to a generated file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteOutcome {
    Created,
    Updated,
    Unchanged,
}

impl WriteOutcome {
    pub fn touched_disk(self) -> bool {
        !matches!(self, WriteOutcome::Unchanged)
    }
}

/// Whether freshly generated lines match what is on disk.
///
/// Line counts must agree and every fresh line must contain its on-disk
/// counterpart, which tolerates line-ending normalization.
pub fn lines_match(fresh: &[String], existing: &[String]) -> bool {
    fresh.len() == existing.len()
        && fresh
            .iter()
            .zip(existing)
            .all(|(new, old)| new.contains(old.as_str()))
}

/// Write `lines` to `path` unless the file already holds them
pub fn write_if_changed(fs: &dyn FileSystem, path: &Path, lines: &[String]) -> Result<WriteOutcome> {
    let outcome = if fs.exists(path) {
        let existing = SourceText::parse(&fs.read_to_string(path)?);
        if lines_match(lines, existing.lines()) {
            debug!("{} is up to date", path.display());
            return Ok(WriteOutcome::Unchanged);
        }
        WriteOutcome::Updated
    } else {
        WriteOutcome::Created
    };

    fs.write(path, &SourceText::from_lines(lines.to_vec()).render())?;
    Ok(outcome)
}
