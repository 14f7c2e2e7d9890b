//! SimpleMRS reader.
//!
//! Recursive descent over the token stream, one graph per call:
//!
//! ```text
//! mrs   := "[" lnk? surface? ((TOP|LTOP) ":" var props?)? (INDEX ":" var props?)?
//!          RELS ":" "<" ep* ">" (HCONS ":" "<" cons* ">")? (ICONS ":" "<" cons* ">")? "]"
//! ep    := "[" pred lnk? surface? LBL ":" var (role ":" value props?)* "]"
//! props := "[" sort (key ":" value)* "]"
//! lnk   := "<" int ":" int ">" | "<" ">"
//! cons  := var relation var
//! ```
//!
//! Property blocks attach to the variable they follow and accumulate across
//! occurrences. EP ids count up from [`FIRST_NODE_ID`] in reading order.

use super::tokenizer::TokenStream;
use crate::{
    CONSTARG_ROLE, Ep, Error, FIRST_NODE_ID, HandleConstraint, IndividualConstraint, Lnk, Mrs, MrsParts, NodeId, Pred,
    Result, is_variable,
};
use indexmap::IndexMap;
use std::io::Read;

type VarProps = IndexMap<String, Vec<(String, String)>>;

/// Read every graph in `input`.
pub fn loads(input: &str) -> Result<Vec<Mrs>> {
    let mut tokens = TokenStream::new(input);
    let mut graphs = Vec::new();
    while !tokens.is_exhausted() {
        graphs.push(read_mrs(&mut tokens)?);
    }
    Ok(graphs)
}

/// Read the first graph in `input`; trailing graphs are ignored.
pub fn loads_one(input: &str) -> Result<Mrs> {
    read_mrs(&mut TokenStream::new(input))
}

/// Read every graph from `reader`.
pub fn load<R: Read>(mut reader: R) -> Result<Vec<Mrs>> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    loads(&input)
}

fn read_mrs(tokens: &mut TokenStream<'_>) -> Result<Mrs> {
    tokens.expect("[")?;
    let mut vars = VarProps::new();
    let mut parts = MrsParts { lnk: read_lnk(tokens)?, ..MrsParts::default() };

    if tokens.peek()?.starts_with('"') {
        parts.surface = Some(unquote(tokens.pop()?).to_string());
    }
    if matches!(tokens.peek()?, "TOP" | "LTOP") {
        tokens.pop()?;
        tokens.expect(":")?;
        let top = tokens.pop()?;
        let props = read_props(tokens)?;
        vars.entry(top.to_string()).or_default().extend(props);
        parts.top = Some(top.to_string());
    }
    if tokens.accept("INDEX") {
        tokens.expect(":")?;
        let index = tokens.pop()?;
        let props = read_props(tokens)?;
        vars.entry(index.to_string()).or_default().extend(props);
        parts.index = Some(index.to_string());
    }

    parts.eps = read_rels(tokens, &mut vars)?;
    parts.hcons = read_cons(tokens, "HCONS", &mut vars, |hi, rel, lo| HandleConstraint::new(hi, rel, lo))?;
    parts.icons = read_cons(tokens, "ICONS", &mut vars, |l, rel, r| IndividualConstraint::new(l, rel, r))?;
    tokens.expect("]")?;

    parts.vars = vars;
    Mrs::from_parts(parts)
}

fn read_props(tokens: &mut TokenStream<'_>) -> Result<Vec<(String, String)>> {
    let mut props = Vec::new();
    if !tokens.accept("[") {
        return Ok(props);
    }
    if tokens.accept("]") {
        return Ok(props);
    }
    tokens.pop()?; // variable sort, implied by the name
    while tokens.peek()? != "]" {
        let key = tokens.pop()?;
        tokens.expect(":")?;
        let value = tokens.pop()?;
        props.push((key.to_string(), value.to_string()));
    }
    tokens.expect("]")?;
    Ok(props)
}

fn read_rels(tokens: &mut TokenStream<'_>, vars: &mut VarProps) -> Result<Vec<Ep>> {
    tokens.expect("RELS")?;
    tokens.expect(":")?;
    tokens.expect("<")?;
    let mut eps = Vec::new();
    let mut nid = FIRST_NODE_ID;
    while tokens.peek()? != ">" {
        eps.push(read_ep(tokens, nid, vars)?);
        nid += 1;
    }
    tokens.expect(">")?;
    Ok(eps)
}

fn read_ep(tokens: &mut TokenStream<'_>, nid: NodeId, vars: &mut VarProps) -> Result<Ep> {
    tokens.expect("[")?;
    let pred = Pred::string_or_grammar(tokens.pop()?);
    let lnk = read_lnk(tokens)?;
    let surface = if tokens.peek()?.starts_with('"') { Some(unquote(tokens.pop()?).to_string()) } else { None };

    let mut label = None;
    if tokens.accept("LBL") {
        tokens.expect(":")?;
        let lbl = tokens.pop()?;
        vars.entry(lbl.to_string()).or_default();
        label = Some(lbl);
    }

    let mut args = IndexMap::new();
    while tokens.peek()? != "]" {
        let role = tokens.pop()?;
        tokens.expect(":")?;
        let value = tokens.pop()?;
        if is_variable(value) && !role.eq_ignore_ascii_case(CONSTARG_ROLE) {
            let props = read_props(tokens)?;
            vars.entry(value.to_string()).or_default().extend(props);
        }
        args.insert(role.to_string(), value.to_string());
    }
    tokens.expect("]")?;

    let Some(label) = label else {
        return Err(Error::structure(format!("EP {nid} ({pred}) has no label")));
    };
    Ok(Ep { id: nid, pred, label: label.to_string(), args, lnk, surface, base: None })
}

fn read_cons<T>(
    tokens: &mut TokenStream<'_>,
    section: &str,
    vars: &mut VarProps,
    make: impl Fn(&str, &str, &str) -> T,
) -> Result<Vec<T>> {
    let mut cons = Vec::new();
    if !tokens.accept(section) {
        return Ok(cons);
    }
    tokens.expect(":")?;
    tokens.expect("<")?;
    while tokens.peek()? != ">" {
        let left = tokens.pop()?;
        let relation = tokens.pop()?;
        let right = tokens.pop()?;
        vars.entry(left.to_string()).or_default();
        vars.entry(right.to_string()).or_default();
        cons.push(make(left, relation, right));
    }
    tokens.expect(">")?;
    Ok(cons)
}

/// `<from:to>`; an empty `<>` is the same as no lnk.
fn read_lnk(tokens: &mut TokenStream<'_>) -> Result<Option<Lnk>> {
    if !tokens.accept("<") || tokens.accept(">") {
        return Ok(None);
    }
    let position = tokens.position();
    let cfrom = tokens.pop()?;
    tokens.expect(":")?;
    let cto = tokens.pop()?;
    tokens.expect(">")?;
    let offset = |s: &str| s.parse::<i32>().map_err(|_| Error::syntax(position, format!("invalid lnk offset `{s}`")));
    Ok(Some(Lnk::new(offset(cfrom)?, offset(cto)?)))
}

fn unquote(token: &str) -> &str {
    token.strip_prefix('"').and_then(|t| t.strip_suffix('"')).unwrap_or(token)
}
