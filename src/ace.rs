//! Client for the ACE parser/generator.
//!
//! ACE runs as a long-lived child process. Each request is one line on its
//! stdin; the reply is a block of lines on its (merged) stdout and stderr:
//!
//! ```text
//!  send("the dog barks")           parse reply                  generate reply
//!  ──────────────────────►         SENT: the dog barks          the dog barks.
//!                                  [ LTOP: h0 ... ] ; (deriv)   WARNING: ...
//!                                  NOTE: 1 readings             NOTE: ... [1 results]
//!                                  <blank>
//!                                  <blank>
//! ```
//!
//! ## Responsibilities by module
//!
//! - `process.rs`: [`AceProcess`], the child's lifecycle (spawn, send,
//!   receive, close) generic over a [`Mode`].
//! - `framing.rs`: the two modes and how each one decides where a reply ends.
//!
//! A process closes itself when dropped; call [`AceProcess::close`] to see
//! the exit code.

#[path = "ace/framing.rs"]
mod framing;
#[path = "ace/process.rs"]
mod process;

pub use framing::{GenerateMode, GenerateResponse, ParseMode, ParseResponse, ParseResult};
pub use process::{AceProcess, Mode};

pub type AceParser = AceProcess<ParseMode>;
pub type AceGenerator = AceProcess<GenerateMode>;
