//! Include Scanner
//!
//! Walks every module file line by line and records the include directives
//! that are not satisfied by the module itself, together with the
//! conditional-compilation lines that guard them.

use pchgen_core::config::ScanConfig;
use pchgen_core::{
    Aggregate, FileReference, FileSystem, IncludeRecord, Location, ModuleNaming, Result,
    SourceText,
};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::conditional::ConditionalStack;
use crate::directive::{Directive, DirectiveClassifier};
use crate::module_list::ModuleFileList;
use crate::resolver::PathResolver;

/// Outcome of scanning a whole module
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanSummary {
    /// Files that were read and scanned
    pub scanned: Vec<String>,
    /// Listed files that do not exist
    pub skipped: Vec<String>,
    /// Records added to the aggregate
    pub added: usize,
}

/// Scans module files for external includes
pub struct IncludeScanner<'a> {
    fs: &'a dyn FileSystem,
    config: &'a ScanConfig,
    naming: &'a ModuleNaming,
    classifier: DirectiveClassifier,
    resolver: PathResolver<'a>,
}

impl<'a> IncludeScanner<'a> {
    pub fn new(fs: &'a dyn FileSystem, config: &'a ScanConfig, naming: &'a ModuleNaming) -> Self {
        Self {
            fs,
            config,
            naming,
            classifier: DirectiveClassifier::new(),
            resolver: PathResolver::new(fs),
        }
    }

    /// Scan every listed file in list order.
    ///
    /// Missing files are skipped with a warning; the umbrella header itself
    /// is never scanned.
    pub fn scan_module(&self, files: &ModuleFileList, aggregate: &mut Aggregate) -> ScanSummary {
        let mut summary = ScanSummary::default();

        for file in files.iter() {
            if self.naming.is_umbrella_name(&file.name) {
                debug!("Skipping umbrella header {}", file.path);
                continue;
            }
            if !self.fs.exists(Path::new(&file.path)) {
                warn!("File {} doesn't exist, skipping", file.path);
                summary.skipped.push(file.path.clone());
                continue;
            }
            match self.scan_file(file, files, aggregate) {
                Ok(added) => {
                    summary.added += added;
                    summary.scanned.push(file.path.clone());
                }
                Err(e) => {
                    warn!("Failed to scan {}: {}", file.path, e);
                    summary.skipped.push(file.path.clone());
                }
            }
        }

        info!(
            "Scanned {} files, {} external includes",
            summary.scanned.len(),
            aggregate.len()
        );
        summary
    }

    /// Read and scan one file, returning the number of records added
    pub fn scan_file(
        &self,
        file: &FileReference,
        members: &ModuleFileList,
        aggregate: &mut Aggregate,
    ) -> Result<usize> {
        let contents = self.fs.read_to_string(Path::new(&file.path))?;
        let text = SourceText::parse(&contents);
        Ok(self.scan_lines(file, text.lines(), members, aggregate))
    }

    /// Scan the lines of one file
    pub fn scan_lines(
        &self,
        file: &FileReference,
        lines: &[String],
        members: &ModuleFileList,
        aggregate: &mut Aggregate,
    ) -> usize {
        let mut stack = ConditionalStack::new();
        let mut guard_pending = self.config.is_header_name(&file.name);
        let mut added = 0;

        for (index, line) in lines.iter().enumerate() {
            match self.classifier.classify(line) {
                Some(Directive::Open) if guard_pending => {
                    guard_pending = false;
                    debug!("{}: treating '{}' as include guard", file.path, line.trim());
                }
                Some(Directive::Open) => {
                    stack.open(line);
                }
                Some(Directive::Branch) => {
                    guard_pending = false;
                    if !stack.branch(line) {
                        debug!("{}:{}: stray '{}'", file.path, index + 1, line.trim());
                    }
                }
                Some(Directive::Close) => {
                    guard_pending = false;
                    stack.close(line, aggregate);
                }
                Some(Directive::PragmaOnce) if self.config.pragma_once_disables_guard => {
                    guard_pending = false;
                }
                Some(Directive::Include) => {
                    let origin = Location::new(&file.path, line_number(index));
                    if self.record_include(file, line, origin, members, &mut stack, aggregate) {
                        added += 1;
                    }
                }
                Some(Directive::PragmaOnce) | Some(Directive::Other) | None => {}
            }

            if self.classifier.is_body_start(line) {
                if !stack.is_empty() {
                    debug!(
                        "{}:{}: body starts with {} open conditional blocks",
                        file.path,
                        index + 1,
                        stack.depth()
                    );
                    stack.close_all(aggregate);
                }
                break;
            }
        }

        added
    }

    fn record_include(
        &self,
        file: &FileReference,
        line: &str,
        origin: Location,
        members: &ModuleFileList,
        stack: &mut ConditionalStack,
        aggregate: &mut Aggregate,
    ) -> bool {
        let Some(record) = IncludeRecord::parse(line) else {
            debug!("{}: skipping malformed include '{}'", origin, line.trim());
            return false;
        };

        let name = record.target.name.as_str();
        if self.config.has_foreign_extension(name) {
            debug!("{}: skipping non-header include {}", origin, name);
            return false;
        }
        if aggregate.contains_name(name)
            || self.naming.is_umbrella_name(name)
            || members.contains_name(name)
        {
            return false;
        }

        let mut record = self.resolver.resolve(file, record);
        record.pre_lines = stack.guard_lines();
        record.origin = Some(origin);

        match aggregate.push(record) {
            Some(index) => {
                stack.register(index);
                true
            }
            None => false,
        }
    }
}

fn line_number(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}
