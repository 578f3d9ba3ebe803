use std::collections::HashSet;

mod paths;

use self::paths::shortest_root_path;

pub(super) struct Adjacency {
    pub(super) outgoing: Vec<Vec<usize>>,
    pub(super) incoming: Vec<Vec<usize>>,
}

impl Adjacency {
    pub(super) fn new(node_count: usize, edges: &[(usize, usize)]) -> Self {
        let mut outgoing = vec![Vec::new(); node_count];
        let mut incoming = vec![Vec::new(); node_count];
        for &(source, target) in edges {
            if source < node_count && target < node_count {
                outgoing[source].push(target);
                incoming[target].push(source);
            }
        }
        Self { outgoing, incoming }
    }
}

pub(super) struct HighlightState {
    pub(super) related_nodes: HashSet<usize>,
    pub(super) outgoing_edges: HashSet<(usize, usize)>,
    pub(super) incoming_edges: HashSet<(usize, usize)>,
    pub(super) root_path_nodes: HashSet<usize>,
    pub(super) root_path_edges: HashSet<(usize, usize)>,
}

pub(super) fn build_highlight_state(
    adjacency: &Adjacency,
    root_index: Option<usize>,
    hovered_index: usize,
) -> HighlightState {
    let mut related_nodes = HashSet::from([hovered_index]);
    let mut outgoing_edges = HashSet::new();
    let mut incoming_edges = HashSet::new();

    if let Some(targets) = adjacency.outgoing.get(hovered_index) {
        for &target in targets {
            related_nodes.insert(target);
            outgoing_edges.insert((hovered_index, target));
        }
    }
    if let Some(sources) = adjacency.incoming.get(hovered_index) {
        for &source in sources {
            related_nodes.insert(source);
            incoming_edges.insert((source, hovered_index));
        }
    }

    let (root_path_nodes, root_path_edges) = match root_index {
        Some(root_index) => shortest_root_path(adjacency, root_index, hovered_index),
        None => (HashSet::new(), HashSet::new()),
    };

    HighlightState {
        related_nodes,
        outgoing_edges,
        incoming_edges,
        root_path_nodes,
        root_path_edges,
    }
}
