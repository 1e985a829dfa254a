//! pchgen Core
//!
//! Core types and interfaces shared by the include scanner and the
//! generated-file emitter.

pub mod config;
pub mod error;
pub mod fs;
pub mod location;
pub mod text;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use fs::{DryRunFileSystem, FileSystem, MemoryFileSystem, OsFileSystem};
pub use location::Location;
pub use text::SourceText;
pub use types::*;
