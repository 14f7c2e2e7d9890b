//! DMRS view of a semantic graph.
//!
//! DMRS replaces variables with direct links between EPs. Each non-`ARG0`
//! argument that holds a known variable becomes (at most) one link, resolved
//! in this order:
//!
//! ```text
//! value is the ARG0 of a non-quantifier EP   -> that EP (lowest id)     EQ / NEQ
//! value is the hi of a handle constraint     -> head of lo's labelset   H
//! value is a label                           -> head of its labelset    HEQ
//! anything else (constants)                  -> no link
//! ```
//!
//! `EQ` vs `NEQ` records whether both ends share a label. A virtual node `0`
//! links to `TOP`, and labelsets with several heads get role-less `EQ` links
//! from the first head to the others.

use crate::{IVARG_ROLE, LABEL_ROLE, Lnk, Mrs, NodeId, Pred, Properties, Result, var_sort};
use indexmap::IndexMap;
use serde::Serialize;

/// Id of the virtual node that links to the graph's top.
pub const TOP_NODE_ID: NodeId = 0;

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub pred: Pred,
    /// Properties of the intrinsic variable plus `cvarsort`; `None` without `ARG0`.
    pub sortinfo: Option<Properties>,
    pub lnk: Option<Lnk>,
    pub surface: Option<String>,
    pub base: Option<String>,
    pub carg: Option<String>,
}

/// Link label. The derived order (`EQ < H < HEQ < NEQ`) is the order links sort in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Post {
    Eq,
    H,
    Heq,
    Neq,
}

impl std::fmt::Display for Post {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Post::Eq => "EQ",
            Post::H => "H",
            Post::Heq => "HEQ",
            Post::Neq => "NEQ",
        })
    }
}

/// A directed link; sorts by `(start, end, role, post)` with role-less links first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Link {
    pub start: NodeId,
    pub end: NodeId,
    pub role: Option<String>,
    pub post: Post,
}

/// One node per EP, in id order.
pub fn nodes(m: &Mrs) -> Vec<Node> {
    let mut eps = m.eps();
    eps.sort_by_key(|ep| ep.id);
    eps.into_iter()
        .map(|ep| {
            let sortinfo = ep.intrinsic_variable().map(|iv| {
                let mut props = m.properties(iv).unwrap_or_default();
                if let Some(sort) = var_sort(iv) {
                    props.insert("cvarsort".to_string(), sort.to_string());
                }
                props
            });
            Node {
                id: ep.id,
                pred: ep.pred.clone(),
                sortinfo,
                lnk: ep.lnk,
                surface: ep.surface.clone(),
                base: ep.base.clone(),
                carg: ep.carg().map(str::to_string),
            }
        })
        .collect()
}

/// All links of `m`, sorted. Repeated calls on the same graph return the same list.
pub fn links(m: &Mrs) -> Vec<Link> {
    let heads: IndexMap<&str, Vec<NodeId>> =
        m.variables().filter(|v| !m.labelset(v).is_empty()).map(|v| (v, m.labelset_heads(v))).collect();
    let head_of = |label: &str| heads.get(label).and_then(|h| h.first()).copied();

    // (start, start label, role, value)
    let mut sources: Vec<(NodeId, &str, Option<&str>, &str)> = Vec::new();
    if let Some(top) = m.top() {
        sources.push((TOP_NODE_ID, top, None, top));
    }
    let mut eps = m.eps();
    eps.sort_by_key(|ep| ep.id);
    for ep in eps {
        for (role, value) in &ep.args {
            if role != IVARG_ROLE && m.contains_var(value) {
                sources.push((ep.id, ep.label.as_str(), Some(role.as_str()), value.as_str()));
            }
        }
    }

    let mut links = Vec::new();
    for (start, start_label, role, value) in sources {
        let Some(vd) = m.var(value) else { continue };
        let target = if let Some(ids) = vd.refs.get(IVARG_ROLE) {
            // a variable bound only by quantifiers has nothing to point at
            ids.iter().copied().filter(|&id| m.pred(id).is_some_and(|p| !p.is_quantifier())).min().map(|end| {
                let post = if m.label(end) == Some(start_label) { Post::Eq } else { Post::Neq };
                (end, post)
            })
        } else if let Some(hc) = m.hcon(value) {
            head_of(hc.lo.as_str()).map(|end| (end, Post::H))
        } else if vd.refs.contains_key(LABEL_ROLE) {
            head_of(value).map(|end| (end, Post::Heq))
        } else {
            None
        };
        if let Some((end, post)) = target {
            links.push(Link { start, end, role: role.map(str::to_string), post });
        }
    }

    for label_heads in heads.values() {
        if let [first, rest @ ..] = label_heads.as_slice() {
            links.extend(rest.iter().map(|&other| Link { start: *first, end: other, role: None, post: Post::Eq }));
        }
    }

    links.sort();
    links
}

// --- serializable view --------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DmrsNode {
    pub id: NodeId,
    /// Predicate short form (`_dog_n_1`).
    pub pred: String,
    /// `-1` when the EP has no lnk.
    pub cfrom: i32,
    pub cto: i32,
    pub cvarsort: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DmrsLink {
    pub start: NodeId,
    pub end: NodeId,
    /// Empty for role-less links.
    pub rargname: String,
    pub post: Post,
}

/// Flat node/link lists, as consumed by graph visualizers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dmrs {
    pub nodes: Vec<DmrsNode>,
    pub links: Vec<DmrsLink>,
}

impl Dmrs {
    pub fn from_mrs(m: &Mrs) -> Self {
        let nodes = nodes(m)
            .into_iter()
            .map(|node| {
                let (cfrom, cto) = node.lnk.map(|l| (l.cfrom, l.cto)).unwrap_or((-1, -1));
                DmrsNode {
                    id: node.id,
                    pred: node.pred.short_form().to_string(),
                    cfrom,
                    cto,
                    cvarsort: node.sortinfo.and_then(|mut s| s.swap_remove("cvarsort")),
                }
            })
            .collect();
        let links = links(m)
            .into_iter()
            .map(|l| DmrsLink { start: l.start, end: l.end, rargname: l.role.unwrap_or_default(), post: l.post })
            .collect();
        Dmrs { nodes, links }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::loads_one;

    fn link(start: NodeId, end: NodeId, role: Option<&str>, post: Post) -> Link {
        Link { start, end, role: role.map(str::to_string), post }
    }

    #[test]
    fn dog_barks_links() {
        let m = loads_one(
            r#"[ LTOP: h1 INDEX: e2 RELS: < [ "_dog_n_1_rel" LBL: h3 ARG0: x4 ]
                 [ "_bark_v_1_rel" LBL: h1 ARG0: e2 ARG1: x4 ] > HCONS: < h1 qeq h1 > ]"#,
        )
        .unwrap();
        let links = links(&m);
        assert_eq!(links, vec![link(0, 10001, None, Post::H), link(10001, 10000, Some("ARG1"), Post::Neq)]);
        assert_eq!(links.iter().filter(|l| l.start == 10001 && l.end == 10000).count(), 1);
    }

    #[test]
    fn quantified_noun_phrase() {
        let m = loads_one(
            "[ TOP: h0 INDEX: e2 RELS: < [ _the_q_rel<0:3> LBL: h4 ARG0: x3 [ x PERS: 3 NUM: sg ] RSTR: h5 BODY: h6 ]
               [ _dog_n_1_rel<4:7> LBL: h7 ARG0: x3 ] [ _bark_v_1_rel<8:14> LBL: h1 ARG0: e2 [ e TENSE: pres ] ARG1: x3 ] >
               HCONS: < h0 qeq h1 h5 qeq h7 > ]",
        )
        .unwrap();
        // BODY h6 is unconstrained and labels nothing
        assert_eq!(
            links(&m),
            vec![
                link(0, 10002, None, Post::H),
                link(10000, 10001, Some("RSTR"), Post::H),
                link(10002, 10001, Some("ARG1"), Post::Neq),
            ]
        );

        let nodes = nodes(&m);
        assert_eq!(nodes.len(), 3);
        let dog = &nodes[1];
        assert_eq!(dog.lnk, Some(Lnk::new(4, 7)));
        let sortinfo = dog.sortinfo.as_ref().unwrap();
        assert_eq!(sortinfo.get("cvarsort").map(String::as_str), Some("x"));
        assert_eq!(sortinfo.get("NUM").map(String::as_str), Some("sg"));
    }

    #[test]
    fn same_label_gives_eq_and_co_heads_are_linked() {
        let m = loads_one(
            "[ RELS: < [ _big_a_1_rel LBL: h1 ARG0: e1 ARG1: x2 ] [ _dog_n_1_rel LBL: h1 ARG0: x2 ]
                       [ _red_a_1_rel LBL: h9 ARG0: e5 ] [ _old_a_1_rel LBL: h9 ARG0: e6 ] > ]",
        )
        .unwrap();
        assert_eq!(
            links(&m),
            vec![link(10000, 10001, Some("ARG1"), Post::Eq), link(10002, 10003, None, Post::Eq)]
        );
    }

    #[test]
    fn label_argument_without_constraint_is_heq() {
        let m = loads_one(
            "[ RELS: < [ _dog_n_1_rel LBL: h7 ARG0: x3 ] [ _because_x_rel LBL: h1 ARG0: e2 ARG1: h7 ARG2: h8 ] > ]",
        )
        .unwrap();
        // h8 is a variable that labels nothing and has no constraint
        assert_eq!(links(&m), vec![link(10001, 10000, Some("ARG1"), Post::Heq)]);
    }

    #[test]
    fn lonely_quantifier_and_constants_are_skipped() {
        let m = loads_one(
            r#"[ RELS: < [ _every_q_rel LBL: h4 ARG0: x3 RSTR: h5 ] [ named_rel LBL: h1 ARG0: e2 ARG1: x3 CARG: "Kim" ] > ]"#,
        )
        .unwrap();
        assert!(links(&m).is_empty());
        assert_eq!(nodes(&m)[1].carg.as_deref(), Some("\"Kim\""));
    }

    #[test]
    fn lowest_id_wins_among_several_intrinsic_owners() {
        let m = Mrs::from_parts(crate::MrsParts {
            eps: vec![
                crate::Ep::new(30, Pred::string("_bark_v_1_rel"), "h1").arg("ARG0", "e1").arg("ARG1", "x2"),
                crate::Ep::new(20, Pred::string("_dog_n_1_rel"), "h2").arg("ARG0", "x2"),
                crate::Ep::new(10, Pred::string("_hound_n_1_rel"), "h3").arg("ARG0", "x2"),
            ],
            ..Default::default()
        })
        .unwrap();
        assert_eq!(links(&m), vec![link(30, 10, Some("ARG1"), Post::Neq)]);
    }

    #[test]
    fn link_ordering_puts_roleless_first() {
        let mut ls = vec![
            link(1, 2, Some("ARG1"), Post::Neq),
            link(1, 2, None, Post::Eq),
            link(1, 2, Some("ARG1"), Post::Eq),
            link(0, 5, None, Post::H),
        ];
        ls.sort();
        assert_eq!(ls[0].start, 0);
        assert_eq!(ls[1].role, None);
        assert_eq!(ls[2].post, Post::Eq);
        assert_eq!(ls[3].post, Post::Neq);
    }

    #[test]
    fn json_view() {
        let m = loads_one(
            r#"[ LTOP: h1 INDEX: e2 RELS: < [ "_dog_n_1_rel"<0:3> LBL: h3 ARG0: x4 ]
                 [ "_bark_v_1_rel" LBL: h1 ARG0: e2 ARG1: x4 ] > HCONS: < h1 qeq h1 > ]"#,
        )
        .unwrap();
        let view = Dmrs::from_mrs(&m);
        assert_eq!(
            view.nodes[0],
            DmrsNode { id: 10000, pred: "_dog_n_1".into(), cfrom: 0, cto: 3, cvarsort: Some("x".into()) }
        );
        assert_eq!((view.nodes[1].cfrom, view.nodes[1].cto), (-1, -1));
        assert_eq!(view.links[0].rargname, "");

        let json: serde_json::Value = serde_json::from_str(&view.to_json().unwrap()).unwrap();
        assert_eq!(json["links"][1]["post"], "NEQ");
        assert_eq!(json["links"][1]["rargname"], "ARG1");
        assert_eq!(json["nodes"][1]["pred"], "_bark_v_1");
        assert_eq!(json["nodes"][1]["cvarsort"], "e");
    }

    #[test]
    fn derivation_is_deterministic() {
        let m = loads_one(
            "[ TOP: h0 RELS: < [ _almost_a_1_rel LBL: h1 ARG0: e2 ARG1: x1 ARG2: x3 ] [ _every_q_rel LBL: h1 ARG0: x1 ]
               [ _thing_n_1_rel LBL: h1 ARG0: x3 ] > HCONS: < h0 qeq h1 > ]",
        )
        .unwrap();
        let first = links(&m);
        assert_eq!(first, links(&m));
        assert_eq!(m.labelset_heads("h1"), m.labelset_heads("h1"));
        // the quantifier heads the scope
        assert!(first.contains(&link(0, 10001, None, Post::H)));
        assert_eq!(Dmrs::from_mrs(&m), Dmrs::from_mrs(&m));
    }
}
