//! Pipeline driver
//!
//! Runs one module regeneration: load the file list, scan for external
//! includes, write the umbrella pair, patch implementation files and, when
//! disabled, remove the generated files again.

use pchgen_core::{Aggregate, Config, FileSystem, ModuleNaming, Result};
use pchgen_scanner::{IncludeScanner, ModuleFileList};
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

use crate::cleanup::remove_generated;
use crate::patcher::{ImplementationPatcher, PatchAction};
use crate::umbrella::{UmbrellaOutcome, UmbrellaWriter};

/// Whether the precompiled header is generated or removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PchMode {
    Enabled,
    Disabled,
}

impl PchMode {
    /// `0` disables; any other value, or none, enables
    pub fn from_flag(flag: Option<&str>) -> Self {
        match flag.map(str::trim) {
            Some("0") => PchMode::Disabled,
            _ => PchMode::Enabled,
        }
    }
}

/// Summary of one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub module: String,
    pub mode: PchMode,
    /// Files that were scanned for includes
    pub scanned: Vec<String>,
    /// Listed files that could not be read
    pub skipped: Vec<String>,
    /// Number of includes in the umbrella header
    pub includes: usize,
    pub umbrella: Option<UmbrellaOutcome>,
    /// Implementation files rewritten
    pub patched: Vec<String>,
    pub forwarding_created: Vec<String>,
    pub removed: Vec<String>,
    /// Implementation files that could not be patched
    pub failed: Vec<String>,
}

impl PipelineReport {
    fn new(module: &str, mode: PchMode) -> Self {
        Self {
            module: module.to_string(),
            mode,
            scanned: Vec::new(),
            skipped: Vec::new(),
            includes: 0,
            umbrella: None,
            patched: Vec::new(),
            forwarding_created: Vec::new(),
            removed: Vec::new(),
            failed: Vec::new(),
        }
    }
}

pub struct Pipeline<'a> {
    fs: &'a dyn FileSystem,
    config: &'a Config,
    naming: ModuleNaming,
}

impl<'a> Pipeline<'a> {
    pub fn new(fs: &'a dyn FileSystem, config: &'a Config, module: &str) -> Self {
        Self {
            fs,
            config,
            naming: ModuleNaming::new(module, config.output.umbrella_suffix.as_str()),
        }
    }

    /// Run the pipeline for the module listed in `list_path`.
    ///
    /// Only a missing list file or a failed umbrella write aborts the run;
    /// problems with individual module files are logged and reported.
    pub fn run(&self, list_path: &Path, mode: PchMode) -> Result<PipelineReport> {
        let files = ModuleFileList::load(self.fs, list_path)?;
        let mut report = PipelineReport::new(self.naming.module(), mode);

        if mode == PchMode::Enabled {
            let mut aggregate = Aggregate::new();
            let scanner = IncludeScanner::new(self.fs, &self.config.scan, &self.naming);
            let summary = scanner.scan_module(&files, &mut aggregate);
            report.scanned = summary.scanned;
            report.skipped = summary.skipped;
            report.includes = aggregate.len();

            report.umbrella = Some(self.umbrella_writer().write(&aggregate)?);
        }

        self.patch_implementation_files(&files, mode, &mut report);

        if mode == PchMode::Disabled {
            let mut dirs = files.directories();
            dirs.push(self.config.output.output_dir.clone());
            report.removed = remove_generated(self.fs, &self.naming, dirs)
                .into_iter()
                .map(|path| path.display().to_string())
                .collect();
        }

        info!(
            "Module {}: {} includes, {} files patched, {} removed",
            report.module,
            report.includes,
            report.patched.len(),
            report.removed.len()
        );
        Ok(report)
    }

    fn umbrella_writer(&self) -> UmbrellaWriter<'_> {
        UmbrellaWriter::new(
            self.fs,
            &self.naming,
            &self.config.output.output_dir,
            &self.config.patch.marker,
        )
    }

    fn patch_implementation_files(
        &self,
        files: &ModuleFileList,
        mode: PchMode,
        report: &mut PipelineReport,
    ) {
        let action = match mode {
            PchMode::Enabled => PatchAction::Insert,
            PchMode::Disabled => PatchAction::Remove,
        };
        let umbrella = self.umbrella_writer().header_path();
        let patcher =
            ImplementationPatcher::new(self.fs, &self.config.patch, &self.naming, &umbrella);

        for file in files
            .iter()
            .filter(|file| self.config.patch.is_implementation_file(&file.path))
        {
            if file.has_name_ignore_case(&self.naming.umbrella_source()) {
                continue;
            }
            match patcher.patch_file(file, action) {
                Ok(patch) => {
                    if patch.outcome.modified() {
                        report.patched.push(file.path.clone());
                    }
                    if let Some(path) = patch.forwarding_created {
                        report.forwarding_created.push(path.display().to_string());
                    }
                }
                Err(e) => {
                    warn!("Cannot patch {}: {}", file.path, e);
                    report.failed.push(file.path.clone());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pchgen_core::MemoryFileSystem;
    use pretty_assertions::assert_eq;

    const BANNER: &str = "//---------------------------------------------------------------------------\n// Copyright\n//---------------------------------------------------------------------------\n";

    fn module_fs() -> MemoryFileSystem {
        MemoryFileSystem::new()
            .with_file("hud.files", "src/hud/WMHud.h\nsrc/hud/WMHud.cpp\n")
            .with_file(
                "src/hud/WMHud.h",
                "#ifndef WMHUD_H\n#define WMHUD_H\n#include <string>\n#include <osg/Geode>\nclass WMHud;\n#endif\n",
            )
            .with_file(
                "src/hud/WMHud.cpp",
                format!("{}\n#include \"WMHud.h\"\n", BANNER),
            )
    }

    #[test]
    fn test_pch_mode_from_flag() {
        assert_eq!(PchMode::from_flag(None), PchMode::Enabled);
        assert_eq!(PchMode::from_flag(Some("1")), PchMode::Enabled);
        assert_eq!(PchMode::from_flag(Some("yes")), PchMode::Enabled);
        assert_eq!(PchMode::from_flag(Some("0")), PchMode::Disabled);
    }

    #[test]
    fn test_second_enabled_run_writes_nothing() {
        let fs = module_fs();
        let config = Config::default();
        let pipeline = Pipeline::new(&fs, &config, "hud");

        let first = pipeline.run(Path::new("hud.files"), PchMode::Enabled).unwrap();
        assert_eq!(first.includes, 2);
        assert_eq!(first.patched, vec!["src/hud/WMHud.cpp"]);
        assert_eq!(first.forwarding_created, vec!["src/hud/hud_PCH.h"]);
        let writes = fs.write_count();

        let second = pipeline.run(Path::new("hud.files"), PchMode::Enabled).unwrap();
        assert!(second.patched.is_empty());
        assert!(second.forwarding_created.is_empty());
        assert_eq!(fs.write_count(), writes);
    }

    #[test]
    fn test_disable_restores_sources() {
        let fs = module_fs();
        let original = fs.contents("src/hud/WMHud.cpp").unwrap();
        let config = Config::default();
        let pipeline = Pipeline::new(&fs, &config, "hud");

        pipeline.run(Path::new("hud.files"), PchMode::Enabled).unwrap();
        let report = pipeline.run(Path::new("hud.files"), PchMode::Disabled).unwrap();

        assert_eq!(report.patched, vec!["src/hud/WMHud.cpp"]);
        assert_eq!(fs.contents("src/hud/WMHud.cpp").unwrap(), original);
        assert!(!fs.exists(Path::new("hud_PCH.h")));
        assert!(!fs.exists(Path::new("hud_PCH.cpp")));
        assert!(!fs.exists(Path::new("src/hud/hud_PCH.h")));
    }

    #[test]
    fn test_output_dir_outside_module_tree() {
        let fs = module_fs();
        let mut config = Config::default();
        config.output.output_dir = "build/pch".into();
        let pipeline = Pipeline::new(&fs, &config, "hud");

        let report = pipeline.run(Path::new("hud.files"), PchMode::Enabled).unwrap();

        assert!(fs.exists(Path::new("build/pch/hud_PCH.h")));
        assert!(report.failed.is_empty());
        assert_eq!(report.patched, vec!["src/hud/WMHud.cpp"]);
        assert_eq!(
            fs.contents("src/hud/hud_PCH.h").unwrap(),
            "#include \"../../build/pch/hud_PCH.h\"\n"
        );

        pipeline.run(Path::new("hud.files"), PchMode::Disabled).unwrap();
        assert!(!fs.exists(Path::new("build/pch/hud_PCH.h")));
        assert!(!fs.exists(Path::new("src/hud/hud_PCH.h")));
    }

    #[test]
    fn test_missing_list_file_is_fatal() {
        let fs = MemoryFileSystem::new();
        let config = Config::default();
        let pipeline = Pipeline::new(&fs, &config, "hud");
        assert!(pipeline.run(Path::new("hud.files"), PchMode::Enabled).is_err());
        assert_eq!(fs.write_count(), 0);
    }
}
