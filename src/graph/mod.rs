use std::collections::HashMap;

use serde::Deserialize;

mod build;

pub use build::{BuildConfig, RelationData, build_graph};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ViewMode {
    AncestorsOnly,
    DescendantsOnly,
    #[default]
    FullHierarchy,
}

impl ViewMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::AncestorsOnly => "Parents",
            Self::DescendantsOnly => "Children",
            Self::FullHierarchy => "Hierarchy",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Root,
    Ancestor,
    Descendant,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Self::Root => "current",
            Self::Ancestor => "parent",
            Self::Descendant => "child",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    ParentChild,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
    pub id: String,
    pub name: String,
    pub sambandsnummer: String,
    pub role: Role,
    pub depth: u32,
    pub x: f32,
    pub y: f32,
    pub fx: f32,
    pub fy: f32,
}

impl GraphNode {
    pub(crate) fn unplaced(
        id: String,
        name: String,
        sambandsnummer: String,
        role: Role,
        depth: u32,
    ) -> Self {
        Self {
            id,
            name,
            sambandsnummer,
            role,
            depth,
            x: f32::NAN,
            y: f32::NAN,
            fx: f32::NAN,
            fy: f32::NAN,
        }
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
        self.fx = x;
        self.fy = y;
    }

    pub fn is_root(&self) -> bool {
        self.role == Role::Root
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RelationGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    index_by_id: HashMap<String, usize>,
}

impl RelationGraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.index_of(id).map(|index| &self.nodes[index])
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut GraphNode> {
        self.index_of(id).map(|index| &mut self.nodes[index])
    }

    pub fn contains_edge(&self, source: &str, target: &str) -> bool {
        self.edges
            .iter()
            .any(|edge| edge.source == source && edge.target == target)
    }

    pub fn edge_indices(&self) -> Vec<(usize, usize)> {
        self.edges
            .iter()
            .filter_map(|edge| Some((self.index_of(&edge.source)?, self.index_of(&edge.target)?)))
            .collect()
    }

    /// Returns false when a node with the same id already exists.
    pub(crate) fn insert_node(&mut self, node: GraphNode) -> bool {
        if self.index_by_id.contains_key(&node.id) {
            return false;
        }

        self.index_by_id.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        true
    }

    /// Returns false when the same (source, target) pair is already linked.
    pub(crate) fn insert_edge(&mut self, source: &str, target: &str) -> bool {
        if self.contains_edge(source, target) {
            return false;
        }

        self.edges.push(GraphEdge {
            source: source.to_owned(),
            target: target.to_owned(),
            kind: EdgeKind::ParentChild,
        });
        true
    }
}
