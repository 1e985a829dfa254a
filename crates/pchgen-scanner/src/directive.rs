//! Preprocessor line classification

use regex::Regex;

/// Kind of preprocessor line relevant to include scanning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// `#if`, `#ifdef`, `#ifndef`
    Open,
    /// `#else`, `#elif`, `#elifdef`, `#elifndef`
    Branch,
    /// `#endif`
    Close,
    /// `#include`
    Include,
    /// `#pragma once`
    PragmaOnce,
    /// Any other directive
    Other,
}

/// Classifies source lines for the include scanner
pub struct DirectiveClassifier {
    directive: Regex,
    pragma_once: Regex,
    body_start: Regex,
}

impl DirectiveClassifier {
    pub fn new() -> Self {
        Self {
            directive: Regex::new(r"^\s*#\s*([A-Za-z_]+)").expect("valid directive pattern"),
            pragma_once: Regex::new(r"^\s*#\s*pragma\s+once\b").expect("valid pragma pattern"),
            body_start: Regex::new(r"\bclass\b|\{").expect("valid body pattern"),
        }
    }

    /// Classify a line, `None` when it is not a preprocessor directive
    pub fn classify(&self, line: &str) -> Option<Directive> {
        let keyword = self.directive.captures(line)?.get(1)?.as_str();
        let directive = match keyword {
            "if" | "ifdef" | "ifndef" => Directive::Open,
            "else" | "elif" | "elifdef" | "elifndef" => Directive::Branch,
            "endif" => Directive::Close,
            "include" => Directive::Include,
            "pragma" if self.pragma_once.is_match(line) => Directive::PragmaOnce,
            _ => Directive::Other,
        };
        Some(directive)
    }

    /// Whether the line starts a class or block body.
    ///
    /// Includes past this point are treated as implementation detail and the
    /// scan of the file stops. Comment lines never match.
    pub fn is_body_start(&self, line: &str) -> bool {
        let trimmed = line.trim_start();
        if trimmed.starts_with("//") || trimmed.starts_with("/*") || trimmed.starts_with('*') {
            return false;
        }
        self.body_start.is_match(line)
    }
}

impl Default for DirectiveClassifier {
    fn default() -> Self {
        Self::new()
    }
}
