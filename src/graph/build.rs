use tracing::{debug, warn};

use crate::samband::{HierarchyDocument, RelationNode};

use super::{GraphNode, RelationGraph, Role, ViewMode};

#[derive(Clone, Debug, PartialEq)]
pub struct BuildConfig {
    pub root_id: String,
    pub root_name: String,
    pub root_ref: String,
    pub max_depth: u32,
}

#[derive(Clone, Copy, Debug)]
pub enum RelationData<'a> {
    Direct(&'a [RelationNode]),
    Hierarchy(&'a HierarchyDocument),
}

#[derive(Clone, Copy)]
struct Walk {
    ancestors: bool,
    max_level: Option<u32>,
}

pub fn build_graph(data: RelationData<'_>, mode: ViewMode, config: &BuildConfig) -> RelationGraph {
    let mut graph = RelationGraph::default();
    graph.insert_node(GraphNode::unplaced(
        config.root_id.clone(),
        config.root_name.clone(),
        config.root_ref.clone(),
        Role::Root,
        0,
    ));

    let mut skipped = 0usize;

    match (mode, data) {
        (ViewMode::AncestorsOnly, RelationData::Direct(relations)) => {
            let walk = Walk {
                ancestors: true,
                max_level: None,
            };
            collect_relations(&mut graph, relations, &config.root_id, walk, 0, &mut skipped);
        }
        (ViewMode::DescendantsOnly, RelationData::Direct(relations)) => {
            let walk = Walk {
                ancestors: false,
                max_level: None,
            };
            collect_relations(&mut graph, relations, &config.root_id, walk, 0, &mut skipped);
        }
        (ViewMode::FullHierarchy, RelationData::Hierarchy(document)) => {
            if config.max_depth > 0 {
                let max_level = Some(config.max_depth - 1);
                collect_relations(
                    &mut graph,
                    &document.parent_tree,
                    &config.root_id,
                    Walk {
                        ancestors: true,
                        max_level,
                    },
                    0,
                    &mut skipped,
                );
                collect_relations(
                    &mut graph,
                    &document.child_tree,
                    &config.root_id,
                    Walk {
                        ancestors: false,
                        max_level,
                    },
                    0,
                    &mut skipped,
                );
            }
        }
        (mode, _) => {
            debug!(?mode, "relation data does not match view mode; graph holds the root only");
        }
    }

    if skipped > 0 {
        warn!(skipped, root = %config.root_id, "skipped relations without an id");
    }

    graph
}

fn collect_relations(
    graph: &mut RelationGraph,
    relations: &[RelationNode],
    connected_id: &str,
    walk: Walk,
    level: u32,
    skipped: &mut usize,
) {
    let role = if walk.ancestors {
        Role::Ancestor
    } else {
        Role::Descendant
    };

    for relation in relations {
        let Some(id) = relation.id.as_deref() else {
            *skipped += 1;
            continue;
        };

        graph.insert_node(GraphNode::unplaced(
            id.to_owned(),
            relation
                .name
                .clone()
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| "Unknown".to_owned()),
            relation.sambandsnummer.clone().unwrap_or_default(),
            role,
            relation.depth.unwrap_or(level + 1),
        ));

        if walk.ancestors {
            graph.insert_edge(id, connected_id);
        } else {
            graph.insert_edge(connected_id, id);
        }

        if walk.max_level.is_none_or(|max_level| level < max_level) {
            collect_relations(
                graph,
                relation.next_relations(walk.ancestors),
                id,
                walk,
                level + 1,
                skipped,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet, VecDeque};

    use serde_json::json;

    use super::*;
    use crate::samband::extract_direct_relations;

    fn config(max_depth: u32) -> BuildConfig {
        BuildConfig {
            root_id: "R".to_owned(),
            root_name: "Root".to_owned(),
            root_ref: "SB-0".to_owned(),
            max_depth,
        }
    }

    fn relations(value: serde_json::Value) -> Vec<RelationNode> {
        serde_json::from_value(value).unwrap()
    }

    fn document(value: serde_json::Value) -> HierarchyDocument {
        serde_json::from_value(value).unwrap()
    }

    fn ids(graph: &RelationGraph) -> Vec<&str> {
        graph.nodes.iter().map(|node| node.id.as_str()).collect()
    }

    fn distances_from_root(graph: &RelationGraph) -> HashMap<String, usize> {
        let mut neighbors: HashMap<&str, Vec<&str>> = HashMap::new();
        for edge in &graph.edges {
            neighbors.entry(&edge.source).or_default().push(&edge.target);
            neighbors.entry(&edge.target).or_default().push(&edge.source);
        }

        let mut distances = HashMap::from([("R".to_owned(), 0usize)]);
        let mut queue = VecDeque::from(["R"]);
        while let Some(id) = queue.pop_front() {
            let distance = distances[id];
            for next in neighbors.get(id).into_iter().flatten() {
                if !distances.contains_key(*next) {
                    distances.insert((*next).to_owned(), distance + 1);
                    queue.push_back(*next);
                }
            }
        }
        distances
    }

    #[test]
    fn ancestors_only_links_direct_parents_into_root() {
        let parents = relations(json!([
            {"id": "P1", "name": "Parent1"},
            {"id": "P2", "name": "Parent2"}
        ]));

        let graph = build_graph(RelationData::Direct(&parents), ViewMode::AncestorsOnly, &config(2));

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.edges.iter().all(|edge| edge.target == "R"));
        assert_eq!(graph.node("P1").unwrap().role, Role::Ancestor);
        assert_eq!(graph.nodes[0].role, Role::Root);
    }

    #[test]
    fn descendants_only_points_edges_away_from_root() {
        let children = relations(json!([{"id": "C1"}, {"id": "C2"}]));

        let graph =
            build_graph(RelationData::Direct(&children), ViewMode::DescendantsOnly, &config(2));

        assert_eq!(ids(&graph), ["R", "C1", "C2"]);
        assert!(graph.edges.iter().all(|edge| edge.source == "R"));
        assert!(graph
            .nodes
            .iter()
            .skip(1)
            .all(|node| node.role == Role::Descendant));
    }

    #[test]
    fn single_direction_modes_recurse_without_a_depth_limit() {
        let parents = relations(json!([
            {"id": "P1", "parents": [{"id": "GP1", "parents": [{"id": "GGP1"}]}]}
        ]));

        let graph = build_graph(RelationData::Direct(&parents), ViewMode::AncestorsOnly, &config(1));

        assert_eq!(ids(&graph), ["R", "P1", "GP1", "GGP1"]);
        assert!(graph.contains_edge("GGP1", "GP1"));
        assert!(graph.contains_edge("GP1", "P1"));
    }

    #[test]
    fn direct_slice_keeps_only_first_level() {
        let tree = relations(json!([
            {"id": "P1", "parents": [{"id": "GP1"}]}
        ]));
        let direct = extract_direct_relations(&tree);

        let graph = build_graph(RelationData::Direct(&direct), ViewMode::AncestorsOnly, &config(3));

        assert_eq!(ids(&graph), ["R", "P1"]);
    }

    #[test]
    fn full_hierarchy_stops_at_depth_budget() {
        let hierarchy = document(json!({
            "parent_tree": [{"id": "P1", "parents": [{"id": "GP1"}]}],
            "child_tree": []
        }));

        let graph =
            build_graph(RelationData::Hierarchy(&hierarchy), ViewMode::FullHierarchy, &config(1));

        assert_eq!(ids(&graph), ["R", "P1"]);
        assert!(graph.node("GP1").is_none());
    }

    #[test]
    fn full_hierarchy_includes_both_trees_within_budget() {
        let hierarchy = document(json!({
            "parent_tree": [{"id": "P1", "parents": [{"id": "GP1", "parents": [{"id": "GGP1"}]}]}],
            "child_tree": [{"id": "C1", "children": [{"id": "GC1"}]}]
        }));

        let graph =
            build_graph(RelationData::Hierarchy(&hierarchy), ViewMode::FullHierarchy, &config(2));

        assert_eq!(ids(&graph), ["R", "P1", "GP1", "C1", "GC1"]);
        assert!(graph.contains_edge("GP1", "P1"));
        assert!(graph.contains_edge("P1", "R"));
        assert!(graph.contains_edge("R", "C1"));
        assert!(graph.contains_edge("C1", "GC1"));
        assert_eq!(graph.node("GP1").unwrap().depth, 2);
        assert_eq!(graph.node("GC1").unwrap().role, Role::Descendant);
    }

    #[test]
    fn zero_depth_yields_root_only() {
        let hierarchy = document(json!({"parent_tree": [{"id": "P1"}], "child_tree": [{"id": "C1"}]}));

        let graph =
            build_graph(RelationData::Hierarchy(&hierarchy), ViewMode::FullHierarchy, &config(0));

        assert_eq!(ids(&graph), ["R"]);
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn relations_without_id_are_dropped_with_their_edge() {
        let parents = relations(json!([
            {"name": "Nameless"},
            {"id": "P2", "name": "Parent2"}
        ]));

        let graph = build_graph(RelationData::Direct(&parents), ViewMode::AncestorsOnly, &config(2));

        assert_eq!(ids(&graph), ["R", "P2"]);
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.nodes.iter().all(|node| node.name != "Nameless"));
    }

    #[test]
    fn missing_name_and_reference_get_defaults() {
        let parents = relations(json!([{"id": "P1"}]));

        let graph = build_graph(RelationData::Direct(&parents), ViewMode::AncestorsOnly, &config(2));
        let node = graph.node("P1").unwrap();

        assert_eq!(node.name, "Unknown");
        assert_eq!(node.sambandsnummer, "");
    }

    #[test]
    fn convergent_paths_collapse_into_first_occurrence() {
        let hierarchy = document(json!({
            "parent_tree": [
                {"id": "P1", "parents": [{"id": "GP"}]},
                {"id": "P2", "parents": [{"id": "GP"}]}
            ],
            "child_tree": [{"id": "GP", "name": "Also a child"}]
        }));

        let graph =
            build_graph(RelationData::Hierarchy(&hierarchy), ViewMode::FullHierarchy, &config(3));

        let unique: HashSet<&str> = ids(&graph).into_iter().collect();
        assert_eq!(unique.len(), graph.node_count());
        assert_eq!(graph.node("GP").unwrap().role, Role::Ancestor);
        assert!(graph.contains_edge("GP", "P1"));
        assert!(graph.contains_edge("GP", "P2"));
        assert!(graph.contains_edge("R", "GP"));
    }

    #[test]
    fn repeated_relations_never_double_an_edge() {
        let parents = relations(json!([
            {"id": "P1", "parents": [{"id": "GP1"}, {"id": "GP1"}]},
            {"id": "P1", "parents": [{"id": "GP1"}]}
        ]));

        let graph = build_graph(RelationData::Direct(&parents), ViewMode::AncestorsOnly, &config(2));

        assert_eq!(graph.edge_count(), 2);
        let unique: HashSet<(&str, &str)> = graph
            .edges
            .iter()
            .map(|edge| (edge.source.as_str(), edge.target.as_str()))
            .collect();
        assert_eq!(unique.len(), graph.edge_count());
    }

    #[test]
    fn no_node_is_further_from_root_than_the_depth_budget() {
        let hierarchy = document(json!({
            "parent_tree": [
                {"id": "A1", "parents": [{"id": "A2", "parents": [{"id": "A3", "parents": [{"id": "A4"}]}]}]},
                {"id": "B1", "parents": [{"id": "B2"}]}
            ],
            "child_tree": [
                {"id": "C1", "children": [{"id": "C2", "children": [{"id": "C3", "children": [{"id": "C4"}]}]}]}
            ]
        }));

        for max_depth in 1..=4u32 {
            let graph = build_graph(
                RelationData::Hierarchy(&hierarchy),
                ViewMode::FullHierarchy,
                &config(max_depth),
            );
            let distances = distances_from_root(&graph);

            for node in &graph.nodes {
                let distance = distances[&node.id];
                assert!(
                    distance <= max_depth as usize,
                    "{} is {distance} edges from root with max depth {max_depth}",
                    node.id
                );
            }
        }
    }

    #[test]
    fn mismatched_input_holds_only_the_root() {
        let hierarchy = document(json!({"parent_tree": [{"id": "P1"}]}));

        let graph =
            build_graph(RelationData::Hierarchy(&hierarchy), ViewMode::AncestorsOnly, &config(2));

        assert_eq!(ids(&graph), ["R"]);
    }

    #[test]
    fn explicit_relation_depth_is_kept() {
        let parents = relations(json!([{"id": "P1", "depth": 4}]));

        let graph = build_graph(RelationData::Direct(&parents), ViewMode::AncestorsOnly, &config(2));

        assert_eq!(graph.node("P1").unwrap().depth, 4);
    }
}
