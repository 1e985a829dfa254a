//! pchgen Scanner
//!
//! Line-oriented scanning of a module's headers and sources for include
//! directives that the module does not satisfy itself.
//!
//! ## Modules
//!
//! - `module_list` - Loading the module's newline-delimited file list
//! - `directive` - Classification of preprocessor lines
//! - `conditional` - Nested conditional-compilation tracking
//! - `resolver` - Rewriting include targets relative to the including file
//! - `scanner` - The per-file include scan

pub mod conditional;
pub mod directive;
pub mod module_list;
pub mod resolver;
pub mod scanner;

pub use conditional::ConditionalStack;
pub use directive::{Directive, DirectiveClassifier};
pub use module_list::ModuleFileList;
pub use resolver::PathResolver;
pub use scanner::{IncludeScanner, ScanSummary};
