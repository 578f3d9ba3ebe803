use std::collections::{HashSet, VecDeque};

use super::Adjacency;

/// Shortest chain of links between the root and `target_index`, walking edges
/// regardless of direction. Edges are reported with their real orientation.
pub(super) fn shortest_root_path(
    adjacency: &Adjacency,
    root_index: usize,
    target_index: usize,
) -> (HashSet<usize>, HashSet<(usize, usize)>) {
    let node_count = adjacency.outgoing.len();
    if root_index >= node_count || target_index >= node_count {
        return (HashSet::new(), HashSet::new());
    }

    let mut path_nodes = HashSet::new();
    let mut path_edges = HashSet::new();

    if root_index == target_index {
        path_nodes.insert(root_index);
        return (path_nodes, path_edges);
    }

    let mut queue = VecDeque::from([root_index]);
    let mut visited = vec![false; node_count];
    let mut parent: Vec<Option<(usize, (usize, usize))>> = vec![None; node_count];
    visited[root_index] = true;

    while let Some(node) = queue.pop_front() {
        if node == target_index {
            break;
        }

        let forward = adjacency.outgoing[node].iter().map(|&next| (next, (node, next)));
        let backward = adjacency.incoming[node].iter().map(|&next| (next, (next, node)));
        for (next, edge) in forward.chain(backward) {
            if !visited[next] {
                visited[next] = true;
                parent[next] = Some((node, edge));
                queue.push_back(next);
            }
        }
    }

    if !visited[target_index] {
        return (path_nodes, path_edges);
    }

    let mut cursor = target_index;
    path_nodes.insert(cursor);
    while let Some((previous, edge)) = parent[cursor] {
        path_edges.insert(edge);
        path_nodes.insert(previous);
        cursor = previous;
    }

    (path_nodes, path_edges)
}
