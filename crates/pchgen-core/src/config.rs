//! Configuration types

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// pchgen configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Include scanner configuration
    pub scan: ScanConfig,

    /// Umbrella header output configuration
    pub output: OutputConfig,

    /// Implementation file patching configuration
    pub patch: PatchConfig,
}

impl Config {
    /// Parse a configuration from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    fn validate(&self) -> Result<()> {
        if self.scan.header_extensions.is_empty() {
            return Err(Error::Config("scan.header_extensions must not be empty".into()));
        }
        if self.patch.banner_token.is_empty() {
            return Err(Error::Config("patch.banner_token must not be empty".into()));
        }
        if self.patch.marker.trim().is_empty() {
            return Err(Error::Config("patch.marker must not be empty".into()));
        }
        Ok(())
    }
}

/// Include scanner configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Extensions (without the dot) that mark an include target as a header.
    /// Compared case-insensitively.
    pub header_extensions: Vec<String>,

    /// Whether `#pragma once` before the first conditional means the
    /// header has no include guard
    pub pragma_once_disables_guard: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            header_extensions: vec![
                "h".into(),
                "hh".into(),
                "hpp".into(),
                "hxx".into(),
                "h++".into(),
            ],
            pragma_once_disables_guard: false,
        }
    }
}

impl ScanConfig {
    /// Whether `name` ends in one of the configured header extensions
    pub fn is_header_name(&self, name: &str) -> bool {
        extension_of(name).is_some_and(|ext| self.is_header_extension(ext))
    }

    /// Whether `name` has an extension that is not a header extension.
    ///
    /// Extensionless names such as `vector` are not foreign.
    pub fn has_foreign_extension(&self, name: &str) -> bool {
        extension_of(name).is_some_and(|ext| !self.is_header_extension(ext))
    }

    fn is_header_extension(&self, ext: &str) -> bool {
        self.header_extensions
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext))
    }
}

/// Umbrella header output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving the umbrella header and its companion source
    pub output_dir: PathBuf,

    /// Appended to the module name to form the umbrella file stem
    pub umbrella_suffix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            umbrella_suffix: "_PCH".into(),
        }
    }
}

/// Implementation file patching configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchConfig {
    /// Extensions (without the dot) of files that receive the include block
    pub implementation_extensions: Vec<String>,

    /// Token whose lines delimit the leading copyright banner
    pub banner_token: String,

    /// Number of banner lines that close the copyright block
    pub banner_count: usize,

    /// Comment line marking a generated include block
    pub marker: String,
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            implementation_extensions: vec!["cpp".into()],
            banner_token: "//--".into(),
            banner_count: 2,
            marker: "// these lines were created by pchgen, do not edit".into(),
        }
    }
}

impl PatchConfig {
    /// Whether `path` names an implementation file
    pub fn is_implementation_file(&self, path: &str) -> bool {
        extension_of(path).is_some_and(|ext| {
            self.implementation_extensions
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
    }
}

/// Extension of the last path segment, without the dot
pub fn extension_of(name: &str) -> Option<&str> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    base.rsplit_once('.').map(|(_, ext)| ext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_header_extensions() {
        let scan = ScanConfig::default();
        assert!(scan.is_header_name("WMFoo.h"));
        assert!(scan.is_header_name("boost/shared_ptr.hpp"));
        assert!(scan.is_header_name("Legacy.H"));
        assert!(!scan.is_header_name("vector"));
        assert!(scan.has_foreign_extension("WMFoo.xpm"));
        assert!(scan.has_foreign_extension("shader.inl"));
        assert!(!scan.has_foreign_extension("QtGui"));
        assert!(!scan.has_foreign_extension("v1.2/QtGui"));
    }

    #[test]
    fn test_implementation_file() {
        let patch = PatchConfig::default();
        assert!(patch.is_implementation_file("src/modules/hud/WMHud.cpp"));
        assert!(!patch.is_implementation_file("src/modules/hud/WMHud.h"));
        assert!(!patch.is_implementation_file("src/cpp/README"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml_str(
            r#"
scan:
  header_extensions: [h, hpp, inl]
output:
  output_dir: build/pch
"#,
        )
        .unwrap();

        assert_eq!(config.scan.header_extensions, vec!["h", "hpp", "inl"]);
        assert!(!config.scan.pragma_once_disables_guard);
        assert_eq!(config.output.output_dir, PathBuf::from("build/pch"));
        assert_eq!(config.output.umbrella_suffix, "_PCH");
        assert_eq!(config.patch, PatchConfig::default());
    }

    #[test]
    fn test_empty_header_extensions_rejected() {
        let err = Config::from_yaml_str("scan:\n  header_extensions: []\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_missing_config_file() {
        let err = Config::from_yaml_file(Path::new("/nonexistent/pchgen.yaml")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));
    }
}
