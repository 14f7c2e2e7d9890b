//! Predicate values.
//!
//! A predicate names the relation of an elementary predication. Three kinds
//! exist and differ only in how they were written:
//!
//! ```text
//! Grammar   udef_q_rel            bare symbol defined by the grammar
//! String    "_dog_n_1_rel"        quoted (or bare, underscore-initial) lemma form
//! Real      _dog_n_1_rel          built from explicit lemma/pos/sense
//! ```
//!
//! The structured fields (`lemma`, `pos`, `sense`) are recovered from the
//! string with a fixed suffix-stripping pattern. Two predicates are equal when
//! their quote-stripped string forms are equal, regardless of kind.

use crate::QUANTIFIER_POS;
use serde::{Serialize, Serializer};
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredKind {
    Grammar,
    Real,
    String,
}

#[derive(Debug, Clone)]
pub struct Pred {
    pub kind: PredKind,
    pub lemma: String,
    pub pos: Option<String>,
    pub sense: Option<String>,
    /// The predicate exactly as written, quotes included.
    pub string: String,
}

impl Pred {
    /// Read a predicate token, choosing [`PredKind::String`] for
    /// underscore-initial names and [`PredKind::Grammar`] otherwise.
    pub fn string_or_grammar(predstr: &str) -> Pred {
        if strip_quotes(predstr).starts_with('_') { Pred::string(predstr) } else { Pred::grammar(predstr) }
    }

    pub fn string(predstr: &str) -> Pred {
        Pred::with_kind(PredKind::String, predstr)
    }

    pub fn grammar(predstr: &str) -> Pred {
        Pred::with_kind(PredKind::Grammar, predstr)
    }

    /// Build `_lemma_pos[_sense]_rel` from its parts.
    pub fn real(lemma: &str, pos: &str, sense: Option<&str>) -> Pred {
        let mut string = format!("_{lemma}_{pos}");
        if let Some(sense) = sense {
            string.push('_');
            string.push_str(sense);
        }
        string.push_str("_rel");
        Pred {
            kind: PredKind::Real,
            lemma: lemma.to_string(),
            pos: Some(pos.to_string()),
            sense: sense.map(str::to_string),
            string,
        }
    }

    fn with_kind(kind: PredKind, predstr: &str) -> Pred {
        let parts = split_pred_string(strip_quotes(predstr));
        Pred { kind, lemma: parts.lemma, pos: parts.pos, sense: parts.sense, string: predstr.to_string() }
    }

    /// The string form without quotes; this is what equality compares.
    pub fn normalized(&self) -> &str {
        strip_quotes(&self.string)
    }

    /// The predicate without quotes and without its final `_rel` segment,
    /// e.g. `"_dog_n_1_rel"` -> `_dog_n_1`.
    pub fn short_form(&self) -> &str {
        let s = self.string.trim_matches('"').trim_start_matches('\'');
        s.rsplit_once('_').map(|(head, _)| head).unwrap_or(s)
    }

    pub fn is_quantifier(&self) -> bool {
        self.pos.as_deref() == Some(QUANTIFIER_POS)
    }
}

impl PartialEq for Pred {
    fn eq(&self, other: &Self) -> bool {
        self.normalized() == other.normalized()
    }
}

impl Eq for Pred {}

impl Hash for Pred {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized().hash(state);
    }
}

impl PartialEq<str> for Pred {
    fn eq(&self, other: &str) -> bool {
        self.normalized() == strip_quotes(other)
    }
}

impl PartialEq<&str> for Pred {
    fn eq(&self, other: &&str) -> bool {
        <Pred as PartialEq<str>>::eq(self, other)
    }
}

impl std::fmt::Display for Pred {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.string)
    }
}

impl Serialize for Pred {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.string)
    }
}

struct PredParts {
    lemma: String,
    pos: Option<String>,
    sense: Option<String>,
}

fn strip_quotes(s: &str) -> &str {
    s.trim_matches(|c| c == '"' || c == '\'')
}

/// `_lemma_pos(_sense)?_rel`; the sense may contain escaped underscores.
fn split_pred_string(predstr: &str) -> PredParts {
    let re = regex!(
        r"(?i)_?(?P<lemma>.*?)_((?P<pos>[a-z])_)?((?P<sense>([^_\\]|(?:\\.))+)_)?(?P<end>rel(ation)?)$"
    );
    match re.captures(predstr) {
        Some(caps) => PredParts {
            lemma: caps.name("lemma").map(|m| m.as_str().to_string()).unwrap_or_default(),
            pos: caps.name("pos").map(|m| m.as_str().to_string()),
            sense: caps.name("sense").map(|m| m.as_str().to_string()),
        },
        None => PredParts { lemma: predstr.to_string(), pos: None, sense: None },
    }
}
