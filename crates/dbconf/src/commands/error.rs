//! Error types for command execution

use thiserror::Error;

/// Command execution errors
#[derive(Debug, Error)]
pub enum CommandError {
    /// The resolved configuration has problems
    #[error("configuration check found {count} issue(s)")]
    CheckFailed { count: usize },
}
