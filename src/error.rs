//! Error types shared by the host query and control operations.

use std::io;
use thiserror::Error;

/// Errors surfaced by host queries and administrative commands.
///
/// Nothing in this crate retries or swallows these; every failure reaches the caller.
#[derive(Error, Debug)]
pub enum HostError {
    #[error("failed to launch '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to read output of '{program}': {source}")]
    OutputRead {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("unexpected nvidia-smi output: {reason} (element <{element}>)")]
    Parse {
        element: &'static str,
        reason: String,
    },

    #[error("platform inventory query failed: {0}")]
    Query(String),

    #[error("invalid {name} '{value}': {reason}")]
    InvalidArgument {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl HostError {
    pub(crate) fn missing(element: &'static str) -> Self {
        HostError::Parse {
            element,
            reason: "element not found".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HostError>;
