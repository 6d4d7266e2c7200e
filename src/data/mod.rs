mod types;
pub mod compile;
mod links;
mod imports;

pub use types::*;
pub use compile::{build_hierarchy, Hierarchy, NodeId, NodeKind, TreeNode, UNSPECIFIED_CATEGORY};
pub use links::{resolve_links, Link, LinkResolution, UnresolvedReference};
pub use imports::{imports_to_records, parse_imports, ImportsEntry};
