//! Implementation File Patcher
//!
//! Inserts or strips the two-line generated include block that follows the
//! leading copyright banner of every implementation file in the module.

use pchgen_core::config::PatchConfig;
use pchgen_core::{FileReference, FileSystem, ModuleNaming, Result, SourceText};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::forwarding::{ForwardingHeaders, ForwardingOutcome};

/// Whether the generated block should be present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchAction {
    Insert,
    Remove,
}

/// What happened to one implementation file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchOutcome {
    /// Block inserted after the banner
    Inserted,
    /// Marker present, include line rewritten
    Repaired,
    /// Block removed
    Removed,
    /// Nothing to do
    Unchanged,
    /// The file has no complete copyright banner
    NoBanner,
}

impl PatchOutcome {
    pub fn modified(self) -> bool {
        matches!(
            self,
            PatchOutcome::Inserted | PatchOutcome::Repaired | PatchOutcome::Removed
        )
    }
}

/// Result of patching one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePatch {
    pub outcome: PatchOutcome,
    pub forwarding_created: Option<PathBuf>,
}

/// Index of the first line after the copyright banner: the line following
/// the `count`-th line that contains `token`.
pub fn find_boundary(lines: &[String], token: &str, count: usize) -> Option<usize> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.contains(token))
        .nth(count.checked_sub(1)?)
        .map(|(index, _)| index + 1)
}

pub struct ImplementationPatcher<'a> {
    fs: &'a dyn FileSystem,
    config: &'a PatchConfig,
    forwarding: ForwardingHeaders<'a>,
    include_line: String,
}

impl<'a> ImplementationPatcher<'a> {
    /// `umbrella` is the path of the generated umbrella header
    pub fn new(
        fs: &'a dyn FileSystem,
        config: &'a PatchConfig,
        naming: &'a ModuleNaming,
        umbrella: &'a Path,
    ) -> Self {
        Self {
            fs,
            config,
            forwarding: ForwardingHeaders::new(fs, naming, umbrella),
            include_line: format!("#include \"{}\"", naming.umbrella_header()),
        }
    }

    /// Patch one file on disk, writing it back only when it changed.
    ///
    /// On insert the forwarding header for the file's directory is ensured
    /// first; a file whose umbrella header cannot be located is left as is
    /// and the error returned.
    pub fn patch_file(&self, file: &FileReference, action: PatchAction) -> Result<FilePatch> {
        let path = Path::new(&file.path);
        let mut text = SourceText::parse(&self.fs.read_to_string(path)?);

        if find_boundary(text.lines(), &self.config.banner_token, self.config.banner_count)
            .is_none()
        {
            debug!("{} has no copyright banner, leaving it alone", file.path);
            return Ok(FilePatch {
                outcome: PatchOutcome::NoBanner,
                forwarding_created: None,
            });
        }

        let forwarding_created = match action {
            PatchAction::Insert => match self.forwarding.ensure(file)? {
                ForwardingOutcome::Created(path) => Some(path),
                ForwardingOutcome::Local | ForwardingOutcome::Unchanged(_) => None,
            },
            PatchAction::Remove => None,
        };

        let outcome = self.patch_text(&mut text, action);
        if outcome.modified() {
            self.fs.write(path, &text.render())?;
            info!("{:?} generated include block in {}", outcome, file.path);
        }

        Ok(FilePatch {
            outcome,
            forwarding_created,
        })
    }

    /// Apply `action` to the text of a file
    pub fn patch_text(&self, text: &mut SourceText, action: PatchAction) -> PatchOutcome {
        let Some(boundary) =
            find_boundary(text.lines(), &self.config.banner_token, self.config.banner_count)
        else {
            return PatchOutcome::NoBanner;
        };
        let has_block = text
            .lines()
            .get(boundary)
            .is_some_and(|line| line.contains(self.config.marker.as_str()));

        match (action, has_block) {
            (PatchAction::Insert, false) => {
                text.insert(boundary, self.config.marker.clone());
                text.insert(boundary + 1, self.include_line.clone());
                PatchOutcome::Inserted
            }
            (PatchAction::Insert, true) => self.repair_include(text, boundary + 1),
            (PatchAction::Remove, true) => {
                text.remove(boundary..boundary + 2);
                PatchOutcome::Removed
            }
            (PatchAction::Remove, false) => PatchOutcome::Unchanged,
        }
    }

    fn repair_include(&self, text: &mut SourceText, index: usize) -> PatchOutcome {
        match text.lines().get(index) {
            Some(line) if line.trim() == self.include_line => PatchOutcome::Unchanged,
            Some(line) if line.trim_start().starts_with("#include") => {
                text.replace(index, self.include_line.clone());
                PatchOutcome::Repaired
            }
            _ => {
                text.insert(index, self.include_line.clone());
                PatchOutcome::Repaired
            }
        }
    }
}
