//! Hover highlighting.
//!
//! Two states: nothing focused, or exactly one leaf focused. Entering a leaf
//! always replaces the current focus, leaving always clears it. The tag set
//! for a focus is recomputed from the link list every time, so the same
//! focus always yields the same tags.

use serde::Serialize;

use crate::data::{Hierarchy, Link, NodeId};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "leaf", rename_all = "snake_case")]
pub enum FocusState {
    #[default]
    Idle,
    Focused(NodeId),
}

#[derive(Debug, Clone, Default)]
pub struct Highlighter {
    state: FocusState,
}

impl Highlighter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> FocusState {
        self.state
    }

    pub fn focused(&self) -> Option<NodeId> {
        match self.state {
            FocusState::Idle => None,
            FocusState::Focused(nid) => Some(nid),
        }
    }

    /// Pointer entered a leaf. Anything that is not a leaf clears the focus.
    pub fn enter(&mut self, hierarchy: &Hierarchy, nid: NodeId) {
        self.state = match hierarchy.nodes.get(nid.0) {
            Some(node) if node.is_leaf() => FocusState::Focused(nid),
            _ => FocusState::Idle,
        };
    }

    pub fn leave(&mut self) {
        self.state = FocusState::Idle;
    }
}

/// Per-link tags for the focused leaf.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize)]
pub struct LinkMark {
    /// Link points at the focused leaf.
    pub incoming: bool,
    /// Link leaves from the focused leaf.
    pub outgoing: bool,
}

impl LinkMark {
    pub fn is_highlighted(&self) -> bool {
        self.incoming || self.outgoing
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Highlight {
    pub focused: Option<NodeId>,
    /// Sources of links into the focused leaf, first-seen order.
    pub upstream: Vec<NodeId>,
    /// Targets of links out of the focused leaf, first-seen order.
    pub downstream: Vec<NodeId>,
    /// Parallel to the link list.
    pub marks: Vec<LinkMark>,
    /// Link indices in paint order: highlighted links last, on top.
    pub draw_order: Vec<usize>,
}

impl Highlight {
    pub fn is_upstream(&self, nid: NodeId) -> bool {
        self.upstream.contains(&nid)
    }

    pub fn is_downstream(&self, nid: NodeId) -> bool {
        self.downstream.contains(&nid)
    }
}

pub fn compute_highlight(links: &[Link], focused: Option<NodeId>) -> Highlight {
    let Some(leaf) = focused else {
        return Highlight {
            focused: None,
            upstream: Vec::new(),
            downstream: Vec::new(),
            marks: vec![LinkMark::default(); links.len()],
            draw_order: (0..links.len()).collect(),
        };
    };

    let mut upstream = Vec::new();
    let mut downstream = Vec::new();
    let marks: Vec<LinkMark> = links
        .iter()
        .map(|link| {
            let mark = LinkMark {
                incoming: link.target == leaf,
                outgoing: link.source == leaf,
            };
            if mark.incoming && !upstream.contains(&link.source) {
                upstream.push(link.source);
            }
            if mark.outgoing && !downstream.contains(&link.target) {
                downstream.push(link.target);
            }
            mark
        })
        .collect();

    let (lit, rest): (Vec<usize>, Vec<usize>) = (0..links.len()).partition(|&i| marks[i].is_highlighted());
    let mut draw_order = rest;
    draw_order.extend(lit);

    Highlight {
        focused: Some(leaf),
        upstream,
        downstream,
        marks,
        draw_order,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::resolve_links;
    use crate::fixtures::{make_hierarchy, make_records, make_schema};

    fn make_links(h: &Hierarchy) -> Vec<Link> {
        resolve_links(h, &make_records(), &make_schema()).links
    }

    #[test]
    fn test_enter_leave_transitions() {
        let h = make_hierarchy();
        let mut hl = Highlighter::new();
        assert_eq!(hl.state(), FocusState::Idle);

        let a1 = h.leaf("a1").unwrap();
        let b1 = h.leaf("b1").unwrap();
        hl.enter(&h, a1);
        assert_eq!(hl.state(), FocusState::Focused(a1));

        // straight to another leaf, no idle in between
        hl.enter(&h, b1);
        assert_eq!(hl.focused(), Some(b1));

        hl.leave();
        assert_eq!(hl.state(), FocusState::Idle);

        // categories and unknown slots are not focusable
        hl.enter(&h, h.node(a1).parent.unwrap());
        assert_eq!(hl.state(), FocusState::Idle);
        hl.enter(&h, NodeId(10_000));
        assert_eq!(hl.state(), FocusState::Idle);
    }

    #[test]
    fn test_upstream_and_downstream() {
        let h = make_hierarchy();
        let links = make_links(&h);
        let c1 = h.leaf("c1").unwrap();
        let a2 = h.leaf("a2").unwrap();
        let b3 = h.leaf("b3").unwrap();

        let hl = compute_highlight(&links, Some(c1));
        assert!(hl.upstream.is_empty());
        assert_eq!(hl.downstream, vec![a2, b3]);

        let hl = compute_highlight(&links, Some(a2));
        assert_eq!(hl.upstream, vec![c1]);
        assert!(hl.downstream.is_empty());
        assert!(hl.is_upstream(c1));
    }

    #[test]
    fn test_highlighted_links_drawn_last() {
        let h = make_hierarchy();
        let links = make_links(&h);
        // links: a1->b1, c1->a2, c1->b3
        let a1 = h.leaf("a1").unwrap();
        let hl = compute_highlight(&links, Some(a1));
        assert_eq!(hl.draw_order, vec![1, 2, 0]);
        assert!(hl.marks[0].outgoing && !hl.marks[0].incoming);
        assert!(!hl.marks[1].is_highlighted());
    }

    #[test]
    fn test_idle_clears_everything() {
        let h = make_hierarchy();
        let links = make_links(&h);
        let hl = compute_highlight(&links, None);
        assert!(hl.marks.iter().all(|m| !m.is_highlighted()));
        assert_eq!(hl.draw_order, vec![0, 1, 2]);
    }

    #[test]
    fn test_refocus_is_idempotent() {
        let h = make_hierarchy();
        let links = make_links(&h);
        let c1 = h.leaf("c1").unwrap();
        let first = compute_highlight(&links, Some(c1));
        let _ = compute_highlight(&links, None);
        assert_eq!(first, compute_highlight(&links, Some(c1)));
    }

    #[test]
    fn test_self_link_is_both_ways() {
        let links = vec![Link { source: NodeId(3), target: NodeId(3), field: "Link 1".to_string() }];
        let hl = compute_highlight(&links, Some(NodeId(3)));
        assert_eq!(hl.marks[0], LinkMark { incoming: true, outgoing: true });
        assert_eq!(hl.upstream, vec![NodeId(3)]);
        assert_eq!(hl.downstream, vec![NodeId(3)]);
    }
}
