//! pchgen Emit
//!
//! Everything that writes to disk: the umbrella header and its companion
//! source, per-directory forwarding headers, the include block patched into
//! implementation files, and removal of generated files.

pub mod cleanup;
pub mod forwarding;
pub mod patcher;
pub mod pipeline;
pub mod sync;
pub mod umbrella;

pub use cleanup::remove_generated;
pub use forwarding::{ForwardingHeaders, ForwardingOutcome};
pub use patcher::{FilePatch, ImplementationPatcher, PatchAction, PatchOutcome};
pub use pipeline::{PchMode, Pipeline, PipelineReport};
pub use sync::{write_if_changed, WriteOutcome};
pub use umbrella::{UmbrellaOutcome, UmbrellaWriter};
