//
// Compile step: flat records -> Hierarchy (layout-friendly 3-level tree)
//
// What this does:
// - Creates a synthetic root node
// - Creates one category node per distinct category label, first-seen order
// - Creates one leaf per record under its category, in input order
// - Builds the identifier -> leaf table used to resolve references
//
// Recoveries (never errors):
// - blank category      -> "unspecified"
// - blank display name  -> identifier, else ""
// - duplicate identifier -> first leaf keeps the identifier in the table

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::data::{Record, RecordSchema};

/// Category assigned to records without one.
pub const UNSPECIFIED_CATEGORY: &str = "unspecified";

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodeId(pub usize);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Root,
    Category,
    Leaf,
}

#[derive(Debug, Clone, Serialize)]
pub struct TreeNode {
    pub nid: NodeId,
    pub kind: NodeKind,
    /// Display label (category name or leaf name).
    pub key: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub depth: usize,
    /// Angular weight; only meaningful for leaves.
    pub size: f64,
    /// Leaf identifier from the record, if it had one.
    pub ident: Option<String>,
    /// Index of the source record (leaves only).
    pub record: Option<usize>,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.kind == NodeKind::Leaf
    }
}

#[derive(Debug, Clone)]
pub struct Hierarchy {
    pub root: NodeId,
    pub nodes: Vec<TreeNode>,
    /// Identifier -> leaf, built once and never mutated afterwards.
    pub leaf_by_ident: HashMap<String, NodeId>,
}

impl Hierarchy {
    pub fn node(&self, nid: NodeId) -> &TreeNode {
        &self.nodes[nid.0]
    }

    pub fn categories(&self) -> &[NodeId] {
        &self.nodes[self.root.0].children
    }

    /// Leaves in left-to-right tree order.
    pub fn leaves(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.categories()
            .iter()
            .flat_map(move |&c| self.nodes[c.0].children.iter().copied())
    }

    pub fn leaf_count(&self) -> usize {
        self.categories().iter().map(|&c| self.nodes[c.0].children.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categories().is_empty()
    }

    pub fn leaf(&self, ident: &str) -> Option<NodeId> {
        self.leaf_by_ident.get(ident).copied()
    }

    /// Node followed by its ancestors up to and including the root.
    pub fn ancestry(&self, nid: NodeId) -> Vec<NodeId> {
        let mut out = vec![nid];
        let mut cur = nid;
        while let Some(parent) = self.nodes[cur.0].parent {
            out.push(parent);
            cur = parent;
        }
        out
    }

    pub fn lowest_common_ancestor(&self, a: NodeId, b: NodeId) -> NodeId {
        let a_path = self.ancestry(a);
        let b_path = self.ancestry(b);
        // Both chains end at the root; walk back from it while they agree.
        let mut lca = self.root;
        for (x, y) in a_path.iter().rev().zip(b_path.iter().rev()) {
            if x != y {
                break;
            }
            lca = *x;
        }
        lca
    }
}

#[instrument(level = "debug", skip_all, fields(records = records.len()))]
pub fn build_hierarchy(records: &[Record], schema: &RecordSchema) -> Hierarchy {
    let mut ctx = CompileCtx::new();
    let root = ctx.new_node(NodeKind::Root, String::new(), None, 1.0, None, None);

    for (index, record) in records.iter().enumerate() {
        ctx.compile_record(root, index, record, schema);
    }

    let hierarchy = ctx.finish(root);
    debug!(
        categories = hierarchy.categories().len(),
        leaves = hierarchy.leaf_count(),
        "built hierarchy"
    );
    hierarchy
}

struct CompileCtx {
    nodes: Vec<TreeNode>,
    category_by_key: HashMap<String, NodeId>,
    leaf_by_ident: HashMap<String, NodeId>,
}

impl CompileCtx {
    fn new() -> Self {
        Self {
            nodes: Vec::new(),
            category_by_key: HashMap::new(),
            leaf_by_ident: HashMap::new(),
        }
    }

    fn finish(self, root: NodeId) -> Hierarchy {
        Hierarchy {
            root,
            nodes: self.nodes,
            leaf_by_ident: self.leaf_by_ident,
        }
    }

    fn new_node(
        &mut self,
        kind: NodeKind,
        key: String,
        parent: Option<NodeId>,
        size: f64,
        ident: Option<String>,
        record: Option<usize>,
    ) -> NodeId {
        let nid = NodeId(self.nodes.len());
        let depth = parent.map(|p| self.nodes[p.0].depth + 1).unwrap_or(0);
        self.nodes.push(TreeNode {
            nid,
            kind,
            key,
            parent,
            children: Vec::new(),
            depth,
            size,
            ident,
            record,
        });
        if let Some(p) = parent {
            self.nodes[p.0].children.push(nid);
        }
        nid
    }

    fn category(&mut self, root: NodeId, label: &str) -> NodeId {
        if let Some(&gid) = self.category_by_key.get(label) {
            return gid;
        }
        let gid = self.new_node(NodeKind::Category, label.to_string(), Some(root), 1.0, None, None);
        self.category_by_key.insert(label.to_string(), gid);
        gid
    }

    fn compile_record(&mut self, root: NodeId, index: usize, record: &Record, schema: &RecordSchema) {
        let label = record
            .non_blank(&schema.category_field)
            .unwrap_or(UNSPECIFIED_CATEGORY);
        let gid = self.category(root, label);

        let ident = record.non_blank(&schema.id_field).map(str::to_string);
        let key = record
            .non_blank(&schema.name_field)
            .or(ident.as_deref())
            .unwrap_or_default()
            .to_string();
        let size = schema
            .size_field
            .as_deref()
            .and_then(|f| record.non_blank(f))
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|w| w.is_finite() && *w > 0.0)
            .unwrap_or(1.0);

        let nid = self.new_node(NodeKind::Leaf, key, Some(gid), size, ident.clone(), Some(index));

        if let Some(ident) = ident {
            if self.leaf_by_ident.contains_key(&ident) {
                debug!(%ident, record = index, "duplicate identifier, keeping first leaf");
            } else {
                self.leaf_by_ident.insert(ident, nid);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str, name: &str, category: &str) -> Record {
        Record::from_pairs([("Page ID", id), ("Page Name", name), ("Page Type", category)])
    }

    fn make_records() -> Vec<Record> {
        vec![
            rec("1", "Home", "A"),
            rec("2", "About", "B"),
            rec("3", "Team", "A"),
            rec("4", "Jobs", "C"),
            rec("5", "Press", "B"),
        ]
    }

    #[test]
    fn test_categories_in_first_seen_order() {
        let h = build_hierarchy(&make_records(), &RecordSchema::default());
        let keys: Vec<&str> = h.categories().iter().map(|&c| h.node(c).key.as_str()).collect();
        assert_eq!(keys, vec!["A", "B", "C"]);

        let leaves: Vec<&str> = h.leaves().map(|l| h.node(l).key.as_str()).collect();
        assert_eq!(leaves, vec!["Home", "Team", "About", "Press", "Jobs"]);
    }

    #[test]
    fn test_every_leaf_reaches_root_in_two_steps() {
        let h = build_hierarchy(&make_records(), &RecordSchema::default());
        for leaf in h.leaves() {
            let node = h.node(leaf);
            assert_eq!(node.depth, 2);
            assert!(node.is_leaf());
            let chain = h.ancestry(leaf);
            assert_eq!(chain.len(), 3);
            assert_eq!(*chain.last().unwrap(), h.root);
        }
        for &c in h.categories() {
            assert_eq!(h.node(c).depth, 1);
            assert!(!h.node(c).children.is_empty());
        }
    }

    #[test]
    fn test_missing_fields_fall_back() {
        let records = vec![
            Record::from_pairs([("Page ID", "9"), ("Page Type", " ")]),
            Record::from_pairs([("Page Name", "Orphan")]),
        ];
        let h = build_hierarchy(&records, &RecordSchema::default());
        assert_eq!(h.categories().len(), 1);
        let cat = h.node(h.categories()[0]);
        assert_eq!(cat.key, UNSPECIFIED_CATEGORY);

        let leaves: Vec<&TreeNode> = h.leaves().map(|l| h.node(l)).collect();
        assert_eq!(leaves[0].key, "9");
        assert_eq!(leaves[1].key, "Orphan");
        assert_eq!(leaves[1].ident, None);
        assert_eq!(h.leaf_by_ident.len(), 1);
    }

    #[test]
    fn test_empty_input_yields_bare_root() {
        let h = build_hierarchy(&[], &RecordSchema::default());
        assert!(h.is_empty());
        assert_eq!(h.nodes.len(), 1);
        assert_eq!(h.leaf_count(), 0);
    }

    #[test]
    fn test_duplicate_identifier_keeps_first() {
        let records = vec![rec("1", "First", "A"), rec("1", "Second", "A")];
        let h = build_hierarchy(&records, &RecordSchema::default());
        assert_eq!(h.leaf_count(), 2);
        assert_eq!(h.node(h.leaf("1").unwrap()).key, "First");
    }

    #[test]
    fn test_size_field_parsed_with_fallback() {
        let schema = RecordSchema { size_field: Some("Weight".to_string()), ..RecordSchema::default() };
        let records = vec![
            Record::from_pairs([("Page ID", "1"), ("Weight", "3")]),
            Record::from_pairs([("Page ID", "2"), ("Weight", "-1")]),
            Record::from_pairs([("Page ID", "3"), ("Weight", "lots")]),
        ];
        let h = build_hierarchy(&records, &schema);
        let sizes: Vec<f64> = h.leaves().map(|l| h.node(l).size).collect();
        assert_eq!(sizes, vec![3.0, 1.0, 1.0]);
    }

    #[test]
    fn test_lowest_common_ancestor() {
        let h = build_hierarchy(&make_records(), &RecordSchema::default());
        let home = h.leaf("1").unwrap();
        let team = h.leaf("3").unwrap();
        let about = h.leaf("2").unwrap();
        assert_eq!(h.lowest_common_ancestor(home, team), h.node(home).parent.unwrap());
        assert_eq!(h.lowest_common_ancestor(home, about), h.root);
        assert_eq!(h.lowest_common_ancestor(home, home), home);
    }
}
