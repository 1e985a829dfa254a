//! Core type definitions

use serde::Serialize;
use std::collections::HashSet;

use crate::location::Location;

/// A file path together with its basename
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FileReference {
    /// Path as written in the module list or include directive
    pub path: String,
    /// Basename (path stripped)
    pub name: String,
}

impl FileReference {
    /// Create a reference from a path string
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let name = match path.rfind(['/', '\\']) {
            Some(pos) => path[pos + 1..].to_string(),
            None => path.clone(),
        };
        Self { path, name }
    }

    /// Directory part of the path without the trailing separator.
    ///
    /// Empty for bare file names.
    pub fn dir(&self) -> &str {
        match self.path.rfind(['/', '\\']) {
            Some(0) => &self.path[..1],
            Some(pos) => &self.path[..pos],
            None => "",
        }
    }

    /// Case-insensitive basename comparison
    pub fn has_name_ignore_case(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Include delimiter style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Delimiter {
    /// `#include <...>`
    Angle,
    /// `#include "..."`
    Quote,
}

impl Delimiter {
    /// Closing delimiter character
    pub fn close(self) -> char {
        match self {
            Delimiter::Angle => '>',
            Delimiter::Quote => '"',
        }
    }
}

/// One external include directive and the guard lines that must wrap it
/// when it is relocated into the umbrella header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncludeRecord {
    /// Literal directive line
    pub directive: String,
    /// Included file
    pub target: FileReference,
    /// Delimiter style of the directive
    pub delimiter: Delimiter,
    /// Conditional directives emitted before the directive
    pub pre_lines: Vec<String>,
    /// Closing directives emitted after the directive
    pub post_lines: Vec<String>,
    /// Where the directive was first seen
    pub origin: Option<Location>,
}

impl IncludeRecord {
    /// Parse an `#include` line.
    ///
    /// Returns `None` when the target is not delimited by `<...>` or `"..."`
    /// (computed includes, missing closing delimiter, empty target).
    pub fn parse(line: &str) -> Option<Self> {
        let (delimiter, start, end) = locate_target(line)?;
        Some(Self {
            directive: line.trim_end().to_string(),
            target: FileReference::new(&line[start + 1..end]),
            delimiter,
            pre_lines: Vec::new(),
            post_lines: Vec::new(),
            origin: None,
        })
    }

    /// Build a new record whose directive points at `target`, keeping the
    /// delimiter style and the rest of the line.
    pub fn with_target(&self, target: &str) -> Self {
        let directive = match locate_target(&self.directive) {
            Some((_, start, end)) => format!(
                "{}{}{}",
                &self.directive[..=start],
                target,
                &self.directive[end..]
            ),
            None => self.directive.clone(),
        };
        Self {
            directive,
            target: FileReference::new(target),
            delimiter: self.delimiter,
            pre_lines: Vec::new(),
            post_lines: Vec::new(),
            origin: self.origin.clone(),
        }
    }

    /// Whether the directive is wrapped in conditional directives
    pub fn is_guarded(&self) -> bool {
        !self.pre_lines.is_empty()
    }

    /// Pre-lines, directive, post-lines in emission order
    pub fn emitted_lines(&self) -> impl Iterator<Item = &str> {
        self.pre_lines
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.directive.as_str()))
            .chain(self.post_lines.iter().map(String::as_str))
    }
}

/// Byte offsets of the opening and closing delimiters of an include target
fn locate_target(line: &str) -> Option<(Delimiter, usize, usize)> {
    let hash = line.find('#')?;
    let after_hash = &line[hash + 1..];
    let keyword = after_hash.trim_start();
    let rest = keyword.strip_prefix("include")?;
    let rest_offset = line.len() - rest.len();
    let trimmed = rest.trim_start();
    let start = rest_offset + (rest.len() - trimmed.len());

    let delimiter = match trimmed.chars().next()? {
        '<' => Delimiter::Angle,
        '"' => Delimiter::Quote,
        _ => return None,
    };
    let end = start + 1 + line[start + 1..].find(delimiter.close())?;
    if end == start + 1 {
        return None;
    }
    Some((delimiter, start, end))
}

/// Names derived from the module name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleNaming {
    module: String,
    suffix: String,
}

impl ModuleNaming {
    pub fn new(module: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            suffix: suffix.into(),
        }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    /// `<module>_PCH`
    pub fn stem(&self) -> String {
        format!("{}{}", self.module, self.suffix)
    }

    /// `<module>_PCH.h`
    pub fn umbrella_header(&self) -> String {
        format!("{}.h", self.stem())
    }

    /// `<module>_PCH.cpp`
    pub fn umbrella_source(&self) -> String {
        format!("{}.cpp", self.stem())
    }

    /// `<module>_PCH_H`
    pub fn guard_macro(&self) -> String {
        format!("{}_H", self.stem())
    }

    /// Whether `name` is the umbrella header name, ignoring case
    pub fn is_umbrella_name(&self, name: &str) -> bool {
        self.umbrella_header().eq_ignore_ascii_case(name)
    }
}

/// Ordered, basename-deduplicated collection of external include records
#[derive(Debug, Clone, Default)]
pub struct Aggregate {
    records: Vec<IncludeRecord>,
    names: HashSet<String>,
}

impl Aggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a record with this basename (case-insensitive) exists
    pub fn contains_name(&self, name: &str) -> bool {
        self.names.contains(&name.to_lowercase())
    }

    /// Append a record unless its basename is already present.
    ///
    /// Returns the index of the new record.
    pub fn push(&mut self, record: IncludeRecord) -> Option<usize> {
        if !self.names.insert(record.target.name.to_lowercase()) {
            return None;
        }
        self.records.push(record);
        Some(self.records.len() - 1)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut IncludeRecord> {
        self.records.get_mut(index)
    }

    pub fn records(&self) -> &[IncludeRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &IncludeRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
