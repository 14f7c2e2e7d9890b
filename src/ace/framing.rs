//! Response framing for parse and generate mode.
//!
//! Neither mode has an explicit length prefix, so each one knows its own
//! terminator:
//!
//! - parse: two consecutive blank lines;
//! - generate: the first line starting with `NOTE: `.
//!
//! Running out of output before the terminator is a protocol error.

use super::process::Mode;
use crate::{Error, Mrs, Result, codec};
use serde::Serialize;
use std::io::BufRead;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    /// SimpleMRS text.
    pub mrs: String,
    pub derivation: String,
}

impl ParseResult {
    pub fn decode(&self) -> Result<Mrs> {
        codec::loads_one(&self.mrs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseResponse {
    /// The input as echoed by the engine (`SENT:` or `SKIP:`).
    pub sentence: Option<String>,
    pub notes: Vec<String>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub results: Vec<ParseResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerateResponse {
    pub notes: Vec<String>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    /// Realized sentences.
    pub results: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ParseMode;

#[derive(Debug, Clone, Copy, Default)]
pub struct GenerateMode;

impl Mode for ParseMode {
    type Response = ParseResponse;

    const DEFAULT_ARGS: &'static [&'static str] = &[];

    fn receive<R: BufRead>(reader: &mut R) -> Result<ParseResponse> {
        let mut response = ParseResponse::default();
        let mut blanks = 0;
        loop {
            let Some(line) = next_line(reader)? else {
                return Err(Error::protocol("engine output ended inside a parse response"));
            };
            if line.trim().is_empty() {
                blanks += 1;
                if blanks == 2 {
                    return Ok(response);
                }
                continue;
            }
            blanks = 0;

            if let Some(sentence) = line.strip_prefix("SENT: ").or_else(|| line.strip_prefix("SKIP: ")) {
                response.sentence = Some(sentence.to_string());
            } else if let Some((level, message)) = diagnostic(&line) {
                let bucket = match level {
                    Level::Note => &mut response.notes,
                    Level::Warning => &mut response.warnings,
                    Level::Error => &mut response.errors,
                };
                bucket.push(message.to_string());
            } else if let Some((mrs, derivation)) = line.split_once(" ; ") {
                response
                    .results
                    .push(ParseResult { mrs: mrs.trim().to_string(), derivation: derivation.trim().to_string() });
            } else {
                return Err(Error::protocol(format!("unexpected line in parse response: {line}")));
            }
        }
    }
}

impl Mode for GenerateMode {
    type Response = GenerateResponse;

    const DEFAULT_ARGS: &'static [&'static str] = &["-e"];

    fn receive<R: BufRead>(reader: &mut R) -> Result<GenerateResponse> {
        let mut response = GenerateResponse::default();
        let mut raw: Vec<String> = Vec::new();
        loop {
            let Some(line) = next_line(reader)? else {
                return Err(Error::protocol("engine output ended inside a generate response"));
            };
            if let Some(note) = line.strip_prefix("NOTE: ") {
                // unprefixed error text comes back as if it were a result
                if line.ends_with("[0 results]") && !raw.is_empty() {
                    response.errors.push(raw.join("\n"));
                    raw.clear();
                }
                response.notes.push(note.to_string());
                response.results = raw;
                return Ok(response);
            }
            if line.trim().is_empty() {
                continue;
            }
            match diagnostic(&line).map(|(level, message)| (level, message.to_string())) {
                Some((Level::Warning, message)) => response.warnings.push(message),
                Some((Level::Error, message)) => response.errors.push(message),
                _ => raw.push(line),
            }
        }
    }
}

enum Level {
    Note,
    Warning,
    Error,
}

/// `NOTE: ...`, `WARNING: ...`, `ERROR: ...` (also `WARNING [x]: ...`).
fn diagnostic(line: &str) -> Option<(Level, &str)> {
    let level = if line.starts_with("NOTE:") {
        Level::Note
    } else if line.starts_with("WARNING") {
        Level::Warning
    } else if line.starts_with("ERROR") {
        Level::Error
    } else {
        return None;
    };
    let message = line.split_once(": ").map(|(_, message)| message).unwrap_or(line);
    Some((level, message))
}

/// The next line with trailing whitespace removed; `None` at end of output.
fn next_line<R: BufRead>(reader: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    line.truncate(line.trim_end().len());
    Ok(Some(line))
}
