//! Configuration for the `gst` application.

use crate::constants::DEFAULT_STORE_FILE_NAME;

/// Explicit configuration for a single `gst` invocation.
///
/// Resolved once at startup from the CLI surface (flags and environment) and
/// passed into [StContext] at construction; no module-level state.
///
/// [StContext]: crate::ctx::StContext
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct StConfig {
    /// Name of the stack state file, relative to the repository workdir root.
    pub store_file: String,
}

impl Default for StConfig {
    fn default() -> Self {
        Self {
            store_file: DEFAULT_STORE_FILE_NAME.to_string(),
        }
    }
}
