mod client;
mod relation;

pub use client::{ClientOptions, FetchError, HierarchyClient, graph_page_path};
pub use relation::{HierarchyDocument, RelationNode, extract_direct_relations};
