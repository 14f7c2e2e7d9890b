//! Crate-wide error type.
//!
//! Every fallible operation in the crate returns [`Result`]. The variants
//! follow the layer that detected the problem:
//!
//! - [`Error::Structure`]: an inconsistent semantic graph (duplicate EP id,
//!   missing label, a connectivity query on an empty graph, ...).
//! - [`Error::Syntax`]: malformed SimpleMRS text.
//! - [`Error::Protocol`]: a malformed or truncated response from the engine.
//! - [`Error::Process`], [`Error::Spawn`], [`Error::MissingGrammar`]: engine
//!   process lifecycle failures. A missing grammar is reported before any
//!   process is started.
//! - [`Error::Io`], [`Error::Json`]: wrapped lower-level failures.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid MRS structure: {0}")]
    Structure(String),

    #[error("invalid SimpleMRS at token {position}: {message}")]
    Syntax { position: usize, message: String },

    #[error("malformed engine response: {0}")]
    Protocol(String),

    #[error("engine process error: {0}")]
    Process(String),

    #[error("failed to start engine `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("grammar file {} does not exist", .0.display())]
    MissingGrammar(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn structure(message: impl Into<String>) -> Self {
        Error::Structure(message.into())
    }

    pub(crate) fn syntax(position: usize, message: impl Into<String>) -> Self {
        Error::Syntax { position, message: message.into() }
    }

    pub(crate) fn protocol(message: impl Into<String>) -> Self {
        Error::Protocol(message.into())
    }
}
