//! Minimal Recursion Semantics toolkit.
//!
//! - [`Mrs`]: the semantic graph (variables, elementary predications, handle
//!   and individual constraints).
//! - [`codec`]: the SimpleMRS tokenizer, reader and writer.
//! - [`dmrs`]: the DMRS node/link view derived from an [`Mrs`].
//! - [`ace`]: a client for the ACE parser/generator running as a subprocess.
//!
//! ```
//! use demophin::{codec, dmrs};
//!
//! let m = codec::loads_one(
//!     r#"[ LTOP: h1 INDEX: e2 RELS: < [ "_dog_n_1_rel" LBL: h3 ARG0: x4 ]
//!        [ "_bark_v_1_rel" LBL: h1 ARG0: e2 ARG1: x4 ] > HCONS: < h1 qeq h1 > ]"#,
//! )
//! .unwrap();
//! assert_eq!(m.eps().len(), 2);
//! assert!(dmrs::links(&m).iter().any(|l| l.role.as_deref() == Some("ARG1")));
//! ```

#[macro_use]
mod macros;
pub mod ace;
mod api;
pub mod codec;
pub mod dmrs;
mod error;
mod mrs;
mod pred;

pub use api::{
    AceOptions, InputPreprocessor, ParsedSentence, generate, generate_from_iterable, parse, parse_from_iterable,
    parse_sentence,
};
pub use error::{Error, Result};
pub use mrs::{Ep, HandleConstraint, HandleRef, IndividualConstraint, Mrs, MrsParts, Properties, VarRecord};
pub use pred::{Pred, PredKind};

use serde::Serialize;

/// Role of an EP's intrinsic (identifying) argument.
pub const IVARG_ROLE: &str = "ARG0";
/// Role holding constant values such as names and numbers.
pub const CONSTARG_ROLE: &str = "CARG";
/// Pseudo-role under which a variable records the EPs it labels.
pub const LABEL_ROLE: &str = "LBL";
/// Part-of-speech marking quantifier predicates.
pub const QUANTIFIER_POS: &str = "q";
/// Id given to the first EP read from SimpleMRS; later EPs count up from it.
pub const FIRST_NODE_ID: NodeId = 10000;

/// EP identifier. `0` is reserved for the virtual DMRS top node.
pub type NodeId = u32;

/// Character span `<cfrom:cto>` into the source sentence.
///
/// Offsets are signed because engines emit `<-1:-1>` for unknown spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Lnk {
    pub cfrom: i32,
    pub cto: i32,
}

impl Lnk {
    pub fn new(cfrom: i32, cto: i32) -> Self {
        Lnk { cfrom, cto }
    }
}

impl std::fmt::Display for Lnk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}:{}>", self.cfrom, self.cto)
    }
}

/// Split a variable name into its sort and index, e.g. `x12` -> `("x", "12")`.
///
/// Returns `None` for strings that are not variable names (constants, quoted
/// strings, predicate-like tokens).
pub fn split_var(name: &str) -> Option<(&str, &str)> {
    let caps = regex!(r"^(\w*\D)(\d+)$").captures(name)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

/// True if `name` looks like a variable (letters followed by digits).
pub fn is_variable(name: &str) -> bool {
    split_var(name).is_some()
}

/// The sort of a variable (`"x"` for `x4`), if `name` is a variable.
pub fn var_sort(name: &str) -> Option<&str> {
    split_var(name).map(|(sort, _)| sort)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variable_names_split_into_sort_and_index() {
        assert_eq!(split_var("x4"), Some(("x", "4")));
        assert_eq!(split_var("e12"), Some(("e", "12")));
        assert_eq!(split_var("h0"), Some(("h", "0")));
        assert_eq!(var_sort("u105"), Some("u"));
    }

    #[test]
    fn constants_are_not_variables() {
        assert!(!is_variable("\"Kim\""));
        assert!(!is_variable("qeq"));
        assert!(!is_variable("42"));
        assert!(!is_variable(""));
    }
}
