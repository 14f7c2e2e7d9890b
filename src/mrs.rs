//! The semantic graph.
//!
//! An [`Mrs`] is built once, by bulk insertion of elementary predications and
//! constraints, and is read-only afterwards. Every insertion also maintains a
//! variable table that records, for each variable, which EPs refer to it and
//! under which role:
//!
//! ```text
//! [ _dog_n_1_rel LBL: h3 ARG0: x4 ]            vars["h3"].refs["LBL"]  = [10000]
//! [ _bark_v_1_rel LBL: h1 ARG0: e2 ARG1: x4 ]  vars["x4"].refs["ARG0"] = [10000]
//!                                              vars["x4"].refs["ARG1"] = [10001]
//! HCONS: < h0 qeq h1 >                         vars["h1"].hcrefs       = [refs of h0]
//! ```
//!
//! These back-references are what the DMRS derivation and the connectivity
//! check traverse. Variables are created on first reference through a single
//! get-or-create accessor and live as long as the graph.

use crate::{Error, IVARG_ROLE, LABEL_ROLE, Lnk, NodeId, Pred, Result, is_variable};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};

/// Resolved variable properties (`PERS` -> `3`, ...), in first-seen order.
pub type Properties = IndexMap<String, String>;

/// One elementary predication.
#[derive(Debug, Clone, PartialEq)]
pub struct Ep {
    pub id: NodeId,
    pub pred: Pred,
    /// Scope handle; shared by EPs in the same labelset.
    pub label: String,
    /// Role -> value. Values are variable names or constants (`CARG`).
    pub args: IndexMap<String, String>,
    pub lnk: Option<Lnk>,
    pub surface: Option<String>,
    pub base: Option<String>,
}

impl Ep {
    pub fn new(id: NodeId, pred: Pred, label: impl Into<String>) -> Self {
        Ep { id, pred, label: label.into(), args: IndexMap::new(), lnk: None, surface: None, base: None }
    }

    /// Builder-style argument insertion; a repeated role replaces the earlier value.
    pub fn arg(mut self, role: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.insert(role.into(), value.into());
        self
    }

    pub fn with_lnk(mut self, lnk: Lnk) -> Self {
        self.lnk = Some(lnk);
        self
    }

    pub fn with_surface(mut self, surface: impl Into<String>) -> Self {
        self.surface = Some(surface.into());
        self
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// The value of the intrinsic argument (`ARG0`), if any.
    pub fn intrinsic_variable(&self) -> Option<&str> {
        self.args.get(IVARG_ROLE).map(String::as_str)
    }

    /// The constant argument (`CARG`), if any.
    pub fn carg(&self) -> Option<&str> {
        self.args.get(crate::CONSTARG_ROLE).map(String::as_str)
    }
}

/// `hi relation lo`, conventionally `h0 qeq h1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleConstraint {
    pub hi: String,
    pub relation: String,
    pub lo: String,
}

impl HandleConstraint {
    pub fn new(hi: impl Into<String>, relation: impl Into<String>, lo: impl Into<String>) -> Self {
        HandleConstraint { hi: hi.into(), relation: relation.into(), lo: lo.into() }
    }

    pub fn qeq(hi: impl Into<String>, lo: impl Into<String>) -> Self {
        HandleConstraint::new(hi, "qeq", lo)
    }
}

/// `left relation right`; several may share the same `left`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndividualConstraint {
    pub left: String,
    pub relation: String,
    pub right: String,
}

impl IndividualConstraint {
    pub fn new(left: impl Into<String>, relation: impl Into<String>, right: impl Into<String>) -> Self {
        IndividualConstraint { left: left.into(), relation: relation.into(), right: right.into() }
    }
}

/// An argument that reaches a label through a handle constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandleRef {
    pub node: NodeId,
    pub role: String,
    pub hi: String,
}

/// Everything the graph knows about one variable.
#[derive(Debug, Clone, Default)]
pub struct VarRecord {
    /// Property list as read, duplicates included.
    pub props: Vec<(String, String)>,
    /// Role -> ids of the EPs using this variable under that role.
    pub refs: IndexMap<String, Vec<NodeId>>,
    /// Filled when the variable is the `lo` of a handle constraint.
    pub hcrefs: Vec<HandleRef>,
    /// Individual constraints whose `right` is this variable.
    pub icrefs: Vec<IndividualConstraint>,
}

/// Input for [`Mrs::from_parts`].
#[derive(Debug, Clone, Default)]
pub struct MrsParts {
    pub top: Option<String>,
    pub index: Option<String>,
    pub xarg: Option<String>,
    pub eps: Vec<Ep>,
    pub hcons: Vec<HandleConstraint>,
    pub icons: Vec<IndividualConstraint>,
    /// Initial property lists, keyed by variable.
    pub vars: IndexMap<String, Vec<(String, String)>>,
    pub lnk: Option<Lnk>,
    pub surface: Option<String>,
    pub identifier: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Mrs {
    top: Option<String>,
    index: Option<String>,
    xarg: Option<String>,
    /// Span of the whole input.
    pub lnk: Option<Lnk>,
    pub surface: Option<String>,
    /// Associates the graph with an utterance.
    pub identifier: Option<String>,
    nodeids: Vec<NodeId>,
    eps: HashMap<NodeId, Ep>,
    hcons: IndexMap<String, HandleConstraint>,
    icons: IndexMap<String, Vec<IndividualConstraint>>,
    vars: IndexMap<String, VarRecord>,
}

impl Mrs {
    /// An empty graph.
    pub fn new() -> Self {
        Mrs::default()
    }

    /// Build a graph from its parts.
    ///
    /// Fails with [`Error::Structure`] on duplicate EP ids or duplicate
    /// handle-constraint `hi` values.
    pub fn from_parts(parts: MrsParts) -> Result<Mrs> {
        let MrsParts { top, index, xarg, eps, hcons, icons, vars, lnk, surface, identifier } = parts;
        let mut m = Mrs { top, index, xarg, lnk, surface, identifier, ..Mrs::default() };

        let anchors: Vec<String> = [&m.top, &m.index, &m.xarg].into_iter().flatten().cloned().collect();
        for var in anchors {
            m.var_entry(&var);
        }
        for (var, props) in vars {
            m.var_entry(&var).props = props;
        }
        m.add_eps(eps)?;
        m.add_hcons(hcons)?;
        m.add_icons(icons);
        Ok(m)
    }

    /// Get-or-create the record for `var`.
    fn var_entry(&mut self, var: &str) -> &mut VarRecord {
        self.vars.entry(var.to_string()).or_default()
    }

    pub fn add_eps(&mut self, eps: impl IntoIterator<Item = Ep>) -> Result<()> {
        for ep in eps {
            if self.eps.contains_key(&ep.id) {
                return Err(Error::structure(format!("EP already exists: {} ({})", ep.id, ep.pred)));
            }
            if ep.label.is_empty() {
                return Err(Error::structure(format!("EP {} ({}) has no label", ep.id, ep.pred)));
            }
            self.var_entry(&ep.label).refs.entry(LABEL_ROLE.to_string()).or_default().push(ep.id);
            for (role, value) in &ep.args {
                // unseen values may still be variables; check the name pattern
                if self.vars.contains_key(value) || is_variable(value) {
                    self.var_entry(value).refs.entry(role.clone()).or_default().push(ep.id);
                }
            }
            self.nodeids.push(ep.id);
            self.eps.insert(ep.id, ep);
        }
        Ok(())
    }

    pub fn add_hcons(&mut self, hcons: impl IntoIterator<Item = HandleConstraint>) -> Result<()> {
        for hc in hcons {
            if self.hcons.contains_key(&hc.hi) {
                return Err(Error::structure(format!("handle constraint already exists for hole {}", hc.hi)));
            }
            self.var_entry(&hc.hi);
            let hi = hc.hi.as_str();
            let referrers: Vec<HandleRef> = self.vars[hi]
                .refs
                .iter()
                .flat_map(|(role, ids)| {
                    ids.iter().map(move |&node| HandleRef { node, role: role.clone(), hi: hi.to_string() })
                })
                .collect();
            self.var_entry(&hc.lo).hcrefs.extend(referrers);
            self.hcons.insert(hc.hi.clone(), hc);
        }
        Ok(())
    }

    pub fn add_icons(&mut self, icons: impl IntoIterator<Item = IndividualConstraint>) {
        for ic in icons {
            self.var_entry(&ic.left);
            self.var_entry(&ic.right).icrefs.push(ic.clone());
            self.icons.entry(ic.left.clone()).or_default().push(ic);
        }
    }

    // --- basic access ---------------------------------------------------------

    pub fn top(&self) -> Option<&str> {
        self.top.as_deref()
    }

    pub fn index(&self) -> Option<&str> {
        self.index.as_deref()
    }

    pub fn xarg(&self) -> Option<&str> {
        self.xarg.as_deref()
    }

    /// EP ids in insertion (surface) order.
    pub fn nodeids(&self) -> &[NodeId] {
        &self.nodeids
    }

    pub fn len(&self) -> usize {
        self.nodeids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodeids.is_empty()
    }

    pub fn ep(&self, id: NodeId) -> Option<&Ep> {
        self.eps.get(&id)
    }

    pub fn contains_ep(&self, id: NodeId) -> bool {
        self.eps.contains_key(&id)
    }

    /// All EPs in insertion order.
    pub fn eps(&self) -> Vec<&Ep> {
        self.nodeids.iter().filter_map(|id| self.eps.get(id)).collect()
    }

    /// The EPs for `ids`, in the requested order.
    pub fn eps_for(&self, ids: &[NodeId]) -> Result<Vec<&Ep>> {
        ids.iter().map(|id| self.eps.get(id).ok_or_else(|| Error::structure(format!("no EP with id {id}")))).collect()
    }

    pub fn pred(&self, id: NodeId) -> Option<&Pred> {
        self.ep(id).map(|ep| &ep.pred)
    }

    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.ep(id).map(|ep| ep.label.as_str())
    }

    pub fn args(&self, id: NodeId) -> Option<&IndexMap<String, String>> {
        self.ep(id).map(|ep| &ep.args)
    }

    pub fn hcon(&self, hi: &str) -> Option<&HandleConstraint> {
        self.hcons.get(hi)
    }

    pub fn hcons(&self) -> Vec<&HandleConstraint> {
        self.hcons.values().collect()
    }

    pub fn icons(&self) -> Vec<&IndividualConstraint> {
        self.icons.values().flatten().collect()
    }

    pub fn icons_for(&self, left: &str) -> &[IndividualConstraint] {
        self.icons.get(left).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Variable names in first-reference order.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    pub fn var(&self, name: &str) -> Option<&VarRecord> {
        self.vars.get(name)
    }

    pub fn contains_var(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    // --- computed sub-structures ------------------------------------------------

    /// Properties of a variable; later duplicates of a key win.
    pub fn properties(&self, var: &str) -> Option<Properties> {
        self.vars.get(var).map(|vd| vd.props.iter().cloned().collect())
    }

    /// Properties of an EP's intrinsic variable (empty without one).
    pub fn ep_properties(&self, id: NodeId) -> Option<Properties> {
        let ep = self.ep(id)?;
        Some(ep.intrinsic_variable().and_then(|iv| self.properties(iv)).unwrap_or_default())
    }

    /// Ids of the EPs labelled by `label`.
    pub fn labelset(&self, label: &str) -> &[NodeId] {
        self.vars.get(label).and_then(|vd| vd.refs.get(LABEL_ROLE)).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The members of a labelset ordered by how "heady" they are; the first
    /// element is the head.
    ///
    /// With more than one member, only EPs with at most one argument pointing
    /// at an intrinsic variable of the labelset (their own `ARG0` counts) are
    /// candidates. Candidates are ranked by:
    ///
    /// 1. fewer outgoing arguments into the labelset,
    /// 2. more incoming references from the labelset,
    /// 3. quantifiers first (compound quantifiers such as "nearly all"),
    /// 4. lower id.
    pub fn labelset_heads(&self, label: &str) -> Vec<NodeId> {
        let members = self.labelset(label);
        if members.len() <= 1 {
            return members.to_vec();
        }
        let member_set: HashSet<NodeId> = members.iter().copied().collect();
        let ivs: HashSet<&str> =
            members.iter().filter_map(|id| self.eps.get(id)).filter_map(Ep::intrinsic_variable).collect();

        // (out-degree, in-degree, quantifier, id)
        let mut candidates: Vec<(usize, usize, bool, NodeId)> = Vec::new();
        for ep in members.iter().filter_map(|id| self.eps.get(id)) {
            let out = ep.args.values().filter(|value| ivs.contains(value.as_str())).count();
            if out > 1 {
                continue;
            }
            let incoming = ep
                .intrinsic_variable()
                .and_then(|iv| self.vars.get(iv))
                .map(|vd| vd.refs.values().flatten().filter(|id| member_set.contains(id)).count())
                .unwrap_or(0);
            candidates.push((out, incoming, ep.pred.is_quantifier(), ep.id));
        }
        candidates.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)).then(b.2.cmp(&a.2)).then(a.3.cmp(&b.3)));
        candidates.into_iter().map(|(_, _, _, id)| id).collect()
    }

    /// A new, independent graph restricted to `ids`.
    ///
    /// `top` survives if it labels a kept EP or its handle constraint reaches
    /// one; `index` survives if it is still referenced; `xarg` always survives.
    /// Constraints are kept when both of their ends are still present.
    pub fn subgraph(&self, ids: &[NodeId]) -> Result<Mrs> {
        let eps: Vec<Ep> = self.eps_for(ids)?.into_iter().cloned().collect();
        let labels: HashSet<String> = eps.iter().map(|ep| ep.label.clone()).collect();
        let mut hcons: Vec<HandleConstraint> = Vec::new();
        let mut icons: Vec<IndividualConstraint> = Vec::new();
        let mut subvars: IndexMap<String, Vec<(String, String)>> = IndexMap::new();

        let mut top = None;
        if let Some(t) = &self.top {
            if labels.contains(t) {
                subvars.insert(t.clone(), Vec::new());
                top = Some(t.clone());
            } else if let Some(hc) = self.hcons.get(t).filter(|hc| labels.contains(&hc.lo)) {
                subvars.insert(t.clone(), Vec::new());
                hcons.push(hc.clone());
                top = Some(t.clone());
            }
        }
        if let Some(x) = &self.xarg {
            subvars.insert(x.clone(), self.props_of(x));
        }
        for ep in &eps {
            subvars.insert(ep.label.clone(), Vec::new());
        }
        for ep in &eps {
            for value in ep.args.values() {
                if self.vars.contains_key(value) {
                    subvars.insert(value.clone(), self.props_of(value));
                }
            }
        }
        let index = self.index.clone().filter(|i| subvars.contains_key(i));

        for var in subvars.keys() {
            if let Some(hc) = self.hcons.get(var) {
                if labels.contains(&hc.lo) && !hcons.contains(hc) {
                    hcons.push(hc.clone());
                }
            }
            for ic in self.icons_for(var) {
                if subvars.contains_key(&ic.left) && subvars.contains_key(&ic.right) {
                    icons.push(ic.clone());
                }
            }
        }

        Mrs::from_parts(MrsParts {
            top,
            index,
            xarg: self.xarg.clone(),
            eps,
            hcons,
            icons,
            vars: subvars,
            lnk: self.lnk,
            surface: self.surface.clone(),
            identifier: self.identifier.clone(),
        })
    }

    fn props_of(&self, var: &str) -> Vec<(String, String)> {
        self.vars.get(var).map(|vd| vd.props.clone()).unwrap_or_default()
    }

    /// True if every EP is reachable from every other one through shared
    /// labels, handle constraints or intrinsic-argument coreference.
    ///
    /// Individual constraints do not connect EPs. Fails on an empty graph.
    pub fn is_connected(&self) -> Result<bool> {
        let Some(&start) = self.nodeids.first() else {
            return Err(Error::structure("cannot compute connectedness of an empty MRS"));
        };
        let mut seen: HashSet<NodeId> = HashSet::from([start]);
        let mut agenda = vec![start];

        while let Some(current) = agenda.pop() {
            let Some(ep) = self.eps.get(&current) else { continue };
            let mut conns: Vec<NodeId> = Vec::new();

            // EPs sharing the label, using it as an argument, or reaching it via HCONS
            if let Some(vd) = self.vars.get(&ep.label) {
                conns.extend(vd.refs.values().flatten());
                conns.extend(vd.hcrefs.iter().map(|r| r.node));
            }
            for value in ep.args.values() {
                let Some(vd) = self.vars.get(value) else { continue };
                if vd.refs.contains_key(IVARG_ROLE) {
                    conns.extend(vd.refs.values().flatten());
                }
                if let Some(hc) = self.hcons.get(value) {
                    conns.extend(self.labelset(&hc.lo));
                }
                if let Some(ids) = vd.refs.get(LABEL_ROLE) {
                    conns.extend(ids);
                }
            }

            for conn in conns {
                if seen.insert(conn) {
                    agenda.push(conn);
                }
            }
        }

        Ok(self.nodeids.iter().all(|id| seen.contains(id)))
    }

    /// Connected, every label known, and every handle constraint's `lo`
    /// labels at least one EP.
    pub fn is_well_formed(&self) -> Result<bool> {
        Ok(self.is_connected()?
            && self.eps.values().all(|ep| self.vars.contains_key(&ep.label))
            && self.hcons.values().all(|hc| !self.labelset(&hc.lo).is_empty()))
    }
}

/// Structural equality: same top/index/xarg, same EPs (ids included), same
/// constraints. Two graphs that differ only by variable names are not equal.
impl PartialEq for Mrs {
    fn eq(&self, other: &Self) -> bool {
        if (&self.top, &self.index, &self.xarg) != (&other.top, &other.index, &other.xarg) {
            return false;
        }
        let mut a: Vec<&Ep> = self.eps.values().collect();
        let mut b: Vec<&Ep> = other.eps.values().collect();
        a.sort_by_key(|ep| ep.id);
        b.sort_by_key(|ep| ep.id);
        if a != b {
            return false;
        }
        let mut a = self.hcons();
        let mut b = other.hcons();
        a.sort();
        b.sort();
        if a != b {
            return false;
        }
        let mut a = self.icons();
        let mut b = other.icons();
        a.sort();
        b.sort();
        a == b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ep(id: NodeId, pred: &str, label: &str) -> Ep {
        Ep::new(id, Pred::string_or_grammar(pred), label)
    }

    fn dog_barks() -> Mrs {
        Mrs::from_parts(MrsParts {
            top: Some("h0".into()),
            index: Some("e2".into()),
            eps: vec![
                ep(10000, "_the_q_rel", "h4").arg("ARG0", "x3").arg("RSTR", "h5").arg("BODY", "h6"),
                ep(10001, "_dog_n_1_rel", "h7").arg("ARG0", "x3"),
                ep(10002, "_bark_v_1_rel", "h1").arg("ARG0", "e2").arg("ARG1", "x3"),
            ],
            hcons: vec![HandleConstraint::qeq("h0", "h1"), HandleConstraint::qeq("h5", "h7")],
            vars: IndexMap::from([
                ("x3".to_string(), vec![("PERS".to_string(), "3".to_string()), ("NUM".to_string(), "sg".to_string())]),
                ("e2".to_string(), vec![("TENSE".to_string(), "pres".to_string())]),
            ]),
            ..MrsParts::default()
        })
        .unwrap()
    }

    #[test]
    fn variable_table_records_references() {
        let m = dog_barks();
        let x3 = m.var("x3").unwrap();
        assert_eq!(x3.refs["ARG0"], vec![10000, 10001]);
        assert_eq!(x3.refs["ARG1"], vec![10002]);
        assert_eq!(m.labelset("h1"), &[10002]);
        assert!(m.labelset("h99").is_empty());

        // h5's referrer is reachable from its lo
        let h7 = m.var("h7").unwrap();
        assert_eq!(h7.hcrefs, vec![HandleRef { node: 10000, role: "RSTR".into(), hi: "h5".into() }]);
    }

    #[test]
    fn properties_for_variables_and_eps() {
        let m = dog_barks();
        let props = m.properties("x3").unwrap();
        assert_eq!(props.get("PERS").map(String::as_str), Some("3"));
        assert_eq!(m.ep_properties(10002).unwrap().get("TENSE").map(String::as_str), Some("pres"));
        assert_eq!(m.ep_properties(10001).unwrap(), m.properties("x3").unwrap());
        assert!(m.ep_properties(4).is_none());
        assert!(m.properties("x99").is_none());
    }

    #[test]
    fn eps_for_preserves_requested_order() {
        let m = dog_barks();
        let ids: Vec<NodeId> = m.eps_for(&[10002, 10000]).unwrap().iter().map(|ep| ep.id).collect();
        assert_eq!(ids, vec![10002, 10000]);
        assert!(matches!(m.eps_for(&[1]), Err(Error::Structure(_))));
    }

    #[test]
    fn duplicate_ep_id_is_rejected() {
        let mut m = Mrs::new();
        m.add_eps([ep(1, "_a_q_rel", "h1")]).unwrap();
        let err = m.add_eps([ep(1, "_b_n_rel", "h2")]).unwrap_err();
        assert!(matches!(err, Error::Structure(_)));
    }

    #[test]
    fn unlabelled_ep_is_rejected() {
        let mut m = Mrs::new();
        assert!(matches!(m.add_eps([ep(1, "_a_n_rel", "")]), Err(Error::Structure(_))));
    }

    #[test]
    fn duplicate_hcons_hi_is_rejected() {
        let mut m = Mrs::new();
        m.add_hcons([HandleConstraint::qeq("h0", "h1")]).unwrap();
        let err = m.add_hcons([HandleConstraint::qeq("h0", "h2")]).unwrap_err();
        assert!(matches!(err, Error::Structure(_)));
    }

    #[test]
    fn icons_share_left_variable() {
        let mut m = Mrs::new();
        m.add_icons([IndividualConstraint::new("e2", "topic", "x3"), IndividualConstraint::new("e2", "focus", "x5")]);
        assert_eq!(m.icons_for("e2").len(), 2);
        assert_eq!(m.var("x5").unwrap().icrefs.len(), 1);
        assert!(m.contains_var("e2"));
    }

    #[test]
    fn empty_graph_connectivity_is_an_error() {
        let m = Mrs::new();
        assert!(matches!(m.is_connected(), Err(Error::Structure(_))));
        assert!(matches!(m.is_well_formed(), Err(Error::Structure(_))));
    }

    #[test]
    fn disjoint_eps_are_not_connected() {
        let m = Mrs::from_parts(MrsParts {
            eps: vec![ep(1, "_dog_n_1_rel", "h1").arg("ARG0", "x1"), ep(2, "_cat_n_1_rel", "h2").arg("ARG0", "x2")],
            ..MrsParts::default()
        })
        .unwrap();
        assert!(!m.is_connected().unwrap());
        assert!(!m.is_well_formed().unwrap());
    }

    #[test]
    fn connectivity_follows_hcons_from_either_side() {
        let m = dog_barks();
        assert!(m.is_connected().unwrap());
        assert!(m.is_well_formed().unwrap());

        // only the qeq links the verb's scope to the embedded one
        let m = Mrs::from_parts(MrsParts {
            eps: vec![
                ep(2, "_dog_n_1_rel", "h7").arg("ARG0", "x3"),
                ep(1, "_think_v_1_rel", "h1").arg("ARG0", "e2").arg("ARG2", "h5"),
            ],
            hcons: vec![HandleConstraint::qeq("h5", "h7")],
            ..MrsParts::default()
        })
        .unwrap();
        assert_eq!(m.nodeids(), &[2, 1]);
        assert!(m.is_connected().unwrap());
    }

    #[test]
    fn dangling_hcons_is_not_well_formed() {
        let m = Mrs::from_parts(MrsParts {
            eps: vec![ep(1, "_rain_v_1_rel", "h1").arg("ARG0", "e2")],
            hcons: vec![HandleConstraint::qeq("h0", "h9")],
            ..MrsParts::default()
        })
        .unwrap();
        assert!(m.is_connected().unwrap());
        assert!(!m.is_well_formed().unwrap());
    }

    #[test]
    fn labelset_heads_prefers_quantifier_on_tied_in_degree() {
        // "almost every thing": three EPs in one scope
        let m = Mrs::from_parts(MrsParts {
            eps: vec![
                ep(1, "_thing_n_1_rel", "h1").arg("ARG0", "x3"),
                ep(2, "_almost_a_1_rel", "h1").arg("ARG0", "e2").arg("ARG1", "x1").arg("ARG2", "x3"),
                ep(3, "_every_q_rel", "h1").arg("ARG0", "x1"),
            ],
            ..MrsParts::default()
        })
        .unwrap();
        // 2 points at two other members and is not a candidate; 1 and 3 both
        // have in-degree 2, and the quantifier wins despite its higher id
        assert_eq!(m.labelset_heads("h1"), vec![3, 1]);
    }

    #[test]
    fn labelset_heads_falls_back_to_lowest_id() {
        let m = Mrs::from_parts(MrsParts {
            eps: vec![ep(7, "_big_a_1_rel", "h1").arg("ARG0", "e7"), ep(5, "_red_a_1_rel", "h1").arg("ARG0", "e5")],
            ..MrsParts::default()
        })
        .unwrap();
        assert_eq!(m.labelset_heads("h1"), vec![5, 7]);
        assert_eq!(m.labelset_heads("h1"), m.labelset_heads("h1"));
    }

    #[test]
    fn labelset_heads_prefers_more_incoming() {
        let m = Mrs::from_parts(MrsParts {
            eps: vec![
                ep(1, "_dog_n_1_rel", "h1").arg("ARG0", "x1"),
                ep(2, "_cat_n_1_rel", "h1").arg("ARG0", "x2"),
                ep(3, "poss_rel", "h1").arg("ARG1", "x2"),
            ],
            ..MrsParts::default()
        })
        .unwrap();
        assert_eq!(m.labelset_heads("h1"), vec![2, 1, 3]);
    }

    #[test]
    fn labelset_heads_drops_members_pointing_into_the_labelset() {
        let m = Mrs::from_parts(MrsParts {
            eps: vec![
                ep(1, "_big_a_1_rel", "h1").arg("ARG0", "e1").arg("ARG1", "x2"),
                ep(2, "_dog_n_1_rel", "h1").arg("ARG0", "x2"),
            ],
            ..MrsParts::default()
        })
        .unwrap();
        assert_eq!(m.labelset_heads("h1"), vec![2]);
    }

    #[test]
    fn subgraph_keeps_surviving_structure() {
        let m = dog_barks();
        let sub = m.subgraph(&[10002]).unwrap();
        assert_eq!(sub.len(), 1);
        assert_eq!(sub.top(), Some("h0"));
        assert_eq!(sub.index(), Some("e2"));
        assert_eq!(sub.hcons(), vec![&HandleConstraint::qeq("h0", "h1")]);
        assert_eq!(sub.properties("x3").unwrap().get("NUM").map(String::as_str), Some("sg"));

        let sub = m.subgraph(&[10000, 10001]).unwrap();
        assert_eq!(sub.top(), None);
        assert_eq!(sub.index(), None);
        assert_eq!(sub.hcons(), vec![&HandleConstraint::qeq("h5", "h7")]);
        assert!(sub.is_connected().unwrap());

        assert!(matches!(m.subgraph(&[42]), Err(Error::Structure(_))));
    }

    #[test]
    fn subgraph_keeps_individual_constraints_between_survivors() {
        let m = Mrs::from_parts(MrsParts {
            top: Some("h0".into()),
            xarg: Some("e9".into()),
            eps: vec![
                ep(10000, "_dog_n_1_rel", "h7").arg("ARG0", "x3"),
                ep(10001, "_bark_v_1_rel", "h1").arg("ARG0", "e2").arg("ARG1", "x3"),
                ep(10002, "_loud_a_1_rel", "h1").arg("ARG0", "e8").arg("ARG1", "e2"),
            ],
            hcons: vec![HandleConstraint::qeq("h0", "h1")],
            icons: vec![
                IndividualConstraint::new("e2", "topic", "x3"),
                IndividualConstraint::new("e2", "focus", "e8"),
                IndividualConstraint::new("e8", "topic", "x3"),
            ],
            ..MrsParts::default()
        })
        .unwrap();

        let sub = m.subgraph(&[10001]).unwrap();
        assert_eq!(sub.icons(), vec![&IndividualConstraint::new("e2", "topic", "x3")]);
        assert_eq!(sub.xarg(), Some("e9"));
        assert!(!sub.contains_var("e8"));

        let sub = m.subgraph(&[10000]).unwrap();
        assert!(sub.icons().is_empty());
        assert_eq!(sub.xarg(), Some("e9"));
        assert_eq!(m.icons().len(), 3);
    }

    #[test]
    fn structural_equality_is_not_isomorphism() {
        let a = dog_barks();
        let b = dog_barks();
        assert_eq!(a, b);

        let renamed = Mrs::from_parts(MrsParts {
            eps: vec![ep(1, "_rain_v_1_rel", "h2").arg("ARG0", "e3")],
            ..MrsParts::default()
        })
        .unwrap();
        let original = Mrs::from_parts(MrsParts {
            eps: vec![ep(1, "_rain_v_1_rel", "h1").arg("ARG0", "e2")],
            ..MrsParts::default()
        })
        .unwrap();
        assert_ne!(renamed, original);
    }
}
