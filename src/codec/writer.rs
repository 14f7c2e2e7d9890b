//! SimpleMRS writer.
//!
//! Output layout (version 1.1, compact):
//!
//! ```text
//! [ <0:10> "Kim barks." TOP: h0 INDEX: e2 [ e TENSE: pres ] RELS: < [ ... ] [ ... ] > HCONS: < h0 qeq h1 > ]
//! ```
//!
//! Property blocks are written once per variable, at its first occurrence in
//! the fixed traversal `TOP`, `INDEX`, then EPs by id with their arguments in
//! [`role_sort_key`] order. The graph itself is never touched; an explicit
//! set tracks what has been printed.

use crate::{CONSTARG_ROLE, Ep, LABEL_ROLE, Mrs, Result, var_sort};
use std::collections::HashSet;
use std::io::Write;

bitflags::bitflags! {
    /// What a SimpleMRS version can express.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Features: u8 {
        /// `TOP:` instead of `LTOP:`.
        const TOP_ROLE   = 1 << 0;
        /// Graph-level lnk and surface string.
        const HEADER     = 1 << 1;
        const EP_SURFACE = 1 << 2;
        const ICONS      = 1 << 3;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Version {
    V1_0,
    #[default]
    V1_1,
}

impl Version {
    pub fn features(self) -> Features {
        match self {
            Version::V1_0 => Features::empty(),
            Version::V1_1 => Features::all(),
        }
    }
}

impl std::str::FromStr for Version {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "1.0" => Ok(Version::V1_0),
            "1.1" => Ok(Version::V1_1),
            other => Err(format!("unsupported SimpleMRS version `{other}` (expected 1.0 or 1.1)")),
        }
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Version::V1_0 => "1.0",
            Version::V1_1 => "1.1",
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    pub version: Version,
    /// One top-level field per line, EPs aligned under `RELS`.
    pub pretty_print: bool,
}

/// Sort key for EP roles: `LBL`, ordinary roles, `*HNDL` roles, then `BODY`
/// and `CARG`; ties are alphabetical ignoring case.
pub fn role_sort_key(role: &str) -> (bool, bool, bool, String) {
    let upper = role.to_ascii_uppercase();
    (upper != LABEL_ROLE, upper == "BODY" || upper == CONSTARG_ROLE, upper.ends_with("HNDL"), upper)
}

/// Serialize one graph.
pub fn dumps_one(m: &Mrs, options: &WriteOptions) -> String {
    GraphWriter::new(m, options).write()
}

/// Serialize several graphs, one per line (or block, when pretty printing).
pub fn dumps<'a>(graphs: impl IntoIterator<Item = &'a Mrs>, options: &WriteOptions) -> String {
    graphs.into_iter().map(|m| dumps_one(m, options)).collect::<Vec<_>>().join("\n")
}

/// Serialize graphs into `writer`.
pub fn dump<'a, W: Write>(
    mut writer: W,
    graphs: impl IntoIterator<Item = &'a Mrs>,
    options: &WriteOptions,
) -> Result<()> {
    writer.write_all(dumps(graphs, options).as_bytes())?;
    writer.flush()?;
    Ok(())
}

struct GraphWriter<'a> {
    m: &'a Mrs,
    features: Features,
    pretty: bool,
    printed: HashSet<&'a str>,
}

impl<'a> GraphWriter<'a> {
    fn new(m: &'a Mrs, options: &WriteOptions) -> Self {
        GraphWriter { m, features: options.version.features(), pretty: options.pretty_print, printed: HashSet::new() }
    }

    fn write(mut self) -> String {
        let m = self.m;
        let mut fields: Vec<String> = Vec::new();

        if self.features.contains(Features::HEADER) {
            let header: Vec<String> = [m.lnk.map(|l| l.to_string()), m.surface.as_ref().map(|s| format!("\"{s}\""))]
                .into_iter()
                .flatten()
                .collect();
            if !header.is_empty() {
                fields.push(header.join(" "));
            }
        }
        if let Some(top) = m.top() {
            let role = if self.features.contains(Features::TOP_ROLE) { "TOP" } else { "LTOP" };
            fields.push(format!("{role}: {}", self.var(top)));
        }
        if let Some(index) = m.index() {
            fields.push(format!("INDEX: {}", self.var(index)));
        }

        let mut eps = m.eps();
        eps.sort_by_key(|ep| ep.id);
        let rels: Vec<String> = eps.into_iter().map(|ep| self.ep(ep)).collect();
        let ep_delim = if self.pretty { "\n          " } else { " " };
        fields.push(Self::bracketed("RELS", &rels, ep_delim));

        let hcons: Vec<String> = m.hcons().iter().map(|hc| format!("{} {} {}", hc.hi, hc.relation, hc.lo)).collect();
        fields.push(Self::bracketed("HCONS", &hcons, " "));

        let icons = m.icons();
        if self.features.contains(Features::ICONS) && !icons.is_empty() {
            let icons: Vec<String> =
                icons.iter().map(|ic| format!("{} {} {}", ic.left, ic.relation, ic.right)).collect();
            fields.push(Self::bracketed("ICONS", &icons, " "));
        }

        let delim = if self.pretty { "\n  " } else { " " };
        format!("[ {} ]", fields.join(delim))
    }

    fn ep(&mut self, ep: &'a Ep) -> String {
        let mut out = ep.pred.to_string();
        if let Some(lnk) = ep.lnk {
            out.push_str(&lnk.to_string());
        }
        if let Some(surface) = ep.surface.as_ref().filter(|_| self.features.contains(Features::EP_SURFACE)) {
            out.push_str(&format!(" \"{surface}\""));
        }
        out.push_str(&format!(" {LABEL_ROLE}: {}", ep.label));

        let mut roles: Vec<(&'a String, &'a String)> = ep.args.iter().collect();
        roles.sort_by_cached_key(|(role, _)| role_sort_key(role));
        for (role, value) in roles {
            let value = if role.eq_ignore_ascii_case(CONSTARG_ROLE) { value.clone() } else { self.var(value) };
            out.push_str(&format!(" {role}: {value}"));
        }
        format!("[ {out} ]")
    }

    /// `name`, followed by its property block the first time it is seen.
    fn var(&mut self, name: &'a str) -> String {
        if !self.printed.insert(name) {
            return name.to_string();
        }
        let props = self.m.properties(name).unwrap_or_default();
        if props.is_empty() {
            return name.to_string();
        }
        let sort = var_sort(name).unwrap_or("u");
        let body: Vec<String> = props.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        format!("{name} [ {sort} {} ]", body.join(" "))
    }

    fn bracketed(name: &str, items: &[String], delim: &str) -> String {
        if items.is_empty() { format!("{name}: < >") } else { format!("{name}: < {} >", items.join(delim)) }
    }
}
