use crate::ace::{AceGenerator, AceParser, AceProcess, GenerateResponse, Mode, ParseResponse};
use crate::dmrs::Dmrs;
use crate::{Error, Result};
use indexmap::IndexMap;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// How to start the engine.
///
/// Values are taken as given; validating them is the caller's job.
#[derive(Debug, Clone)]
pub struct AceOptions {
    /// Program to run. Default: `ace`, looked up on `PATH`.
    pub executable: PathBuf,
    /// Extra arguments after the mode defaults.
    pub cmdargs: Vec<String>,
    /// Replaces the inherited environment when set.
    pub env: Option<IndexMap<String, String>>,
}

impl Default for AceOptions {
    fn default() -> Self {
        Self { executable: PathBuf::from("ace"), cmdargs: Vec::new(), env: None }
    }
}

/// Parse one sentence with a fresh engine.
///
/// # Example
/// ```no_run
/// use demophin::{AceOptions, parse};
///
/// let response = parse("erg.dat", "the dog barks", &AceOptions::default()).unwrap();
/// for result in &response.results {
///     println!("{}", result.mrs);
/// }
/// ```
pub fn parse(grammar: impl AsRef<Path>, datum: &str, options: &AceOptions) -> Result<ParseResponse> {
    single(parse_from_iterable(grammar, [datum], options)?)
}

/// Parse every sentence of `data` with one engine, in order.
pub fn parse_from_iterable<I>(grammar: impl AsRef<Path>, data: I, options: &AceOptions) -> Result<Vec<ParseResponse>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    interact_all(AceParser::open(grammar, options)?, data)
}

/// Realize one SimpleMRS string with a fresh engine.
pub fn generate(grammar: impl AsRef<Path>, datum: &str, options: &AceOptions) -> Result<GenerateResponse> {
    single(generate_from_iterable(grammar, [datum], options)?)
}

pub fn generate_from_iterable<I>(
    grammar: impl AsRef<Path>,
    data: I,
    options: &AceOptions,
) -> Result<Vec<GenerateResponse>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    interact_all(AceGenerator::open(grammar, options)?, data)
}

fn interact_all<M, I>(mut process: AceProcess<M>, data: I) -> Result<Vec<M::Response>>
where
    M: Mode,
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let responses = data.into_iter().map(|datum| process.interact(datum.as_ref())).collect::<Result<Vec<_>>>()?;
    // the responses are already complete; a bad exit is only worth a warning
    match process.close() {
        Ok(0) => {}
        Ok(code) => {
            tracing::warn!(grammar = %process.grammar().display(), code, "engine exited with non-zero status")
        }
        Err(err) => tracing::warn!(grammar = %process.grammar().display(), error = %err, "failed to close engine"),
    }
    Ok(responses)
}

fn single<T>(responses: Vec<T>) -> Result<T> {
    responses.into_iter().next().ok_or_else(|| Error::protocol("engine produced no response"))
}

// --- sentence pipeline ----------------------------------------------------------

/// Turns a raw sentence into the engine's input format (e.g. a pre-tokenized
/// lattice). `None` means the preprocessor is unavailable for this input and
/// the sentence is sent as is.
pub trait InputPreprocessor {
    fn engine_input(&self, sentence: &str) -> Option<String>;
}

impl<F> InputPreprocessor for F
where
    F: Fn(&str) -> Option<String>,
{
    fn engine_input(&self, sentence: &str) -> Option<String> {
        self(sentence)
    }
}

/// One parsed sentence with every reading converted to its DMRS view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedSentence {
    pub sentence: String,
    pub notes: Vec<String>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub results: Vec<Dmrs>,
}

/// Parse `sentence` and derive a DMRS view for every result.
///
/// Returns `Ok(None)` when there is no input (empty or blank sentence);
/// the engine is not started in that case.
pub fn parse_sentence(
    sentence: &str,
    grammar: impl AsRef<Path>,
    options: &AceOptions,
    preprocessor: Option<&dyn InputPreprocessor>,
) -> Result<Option<ParsedSentence>> {
    if sentence.trim().is_empty() {
        return Ok(None);
    }
    let input = preprocessor.and_then(|p| p.engine_input(sentence)).unwrap_or_else(|| sentence.to_string());
    let response = parse(grammar, &input, options)?;

    let results = response
        .results
        .iter()
        .map(|result| result.decode().map(|m| Dmrs::from_mrs(&m)))
        .collect::<Result<Vec<_>>>()?;
    Ok(Some(ParsedSentence {
        sentence: sentence.to_string(),
        notes: response.notes,
        warnings: response.warnings,
        errors: response.errors,
        results,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_run_ace_from_path() {
        let options = AceOptions::default();
        assert_eq!(options.executable, PathBuf::from("ace"));
        assert!(options.cmdargs.is_empty());
        assert!(options.env.is_none());
    }

    #[test]
    fn blank_sentence_is_no_input() {
        // the grammar does not exist, so reaching the engine would be an error
        let out = parse_sentence("  \n", "/nonexistent/grammar.dat", &AceOptions::default(), None).unwrap();
        assert!(out.is_none());
        assert!(parse_sentence("", "/nonexistent/grammar.dat", &AceOptions::default(), None).unwrap().is_none());
    }

    #[test]
    fn missing_grammar_is_reported_before_spawning() {
        let options = AceOptions { executable: PathBuf::from("/nonexistent/ace"), ..AceOptions::default() };
        let err = parse("/nonexistent/grammar.dat", "the dog barks", &options).unwrap_err();
        assert!(matches!(err, Error::MissingGrammar(_)), "{err}");
    }

    #[test]
    fn closures_are_preprocessors() {
        let upper = |s: &str| Some(s.to_uppercase());
        assert_eq!(upper.engine_input("kim"), Some("KIM".to_string()));
        let unavailable = |_: &str| -> Option<String> { None };
        assert_eq!(InputPreprocessor::engine_input(&unavailable, "kim"), None);
    }
}
