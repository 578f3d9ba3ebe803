use std::collections::HashSet;
use std::f32::consts::PI;

use rand::Rng;
use tracing::debug;

use crate::graph::{GraphNode, RelationGraph, Role, ViewMode};

pub const PADDING: f32 = 30.0;
const INNER_RADIUS_FACTOR: f32 = 0.3;
const SINGLE_ARC_RADIUS_FACTOR: f32 = 0.35;
const FALLBACK_JITTER: f32 = 50.0;

const UPPER_ARC: (f32, f32) = (PI, 0.0);
const LOWER_ARC: (f32, f32) = (2.0 * PI, PI);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }

    fn min_side(self) -> f32 {
        self.width.min(self.height)
    }
}

/// Place every node of `graph` deterministically around the root.
///
/// Returns false, leaving positions untouched, when there is nothing to lay out.
pub fn apply_layout(
    graph: &mut RelationGraph,
    root_id: &str,
    mode: ViewMode,
    viewport: Viewport,
) -> bool {
    if graph.nodes.is_empty() || graph.edges.is_empty() {
        return false;
    }

    let (center_x, center_y) = viewport.center();
    let Some(root) = graph.node_mut(root_id) else {
        debug!(root_id, "root missing from graph; skipping layout");
        return false;
    };
    root.set_position(center_x, center_y);

    match mode {
        ViewMode::FullHierarchy => layout_hierarchy(graph, root_id, viewport),
        ViewMode::AncestorsOnly => layout_single_arc(graph, Role::Ancestor, viewport, UPPER_ARC),
        ViewMode::DescendantsOnly => {
            layout_single_arc(graph, Role::Descendant, viewport, LOWER_ARC)
        }
    }

    finalize_positions(&mut graph.nodes, viewport, &mut rand::thread_rng());
    true
}

fn layout_hierarchy(graph: &mut RelationGraph, root_id: &str, viewport: Viewport) {
    let mut direct_ancestors = HashSet::new();
    let mut direct_descendants = HashSet::new();
    for edge in &graph.edges {
        if edge.target == root_id {
            direct_ancestors.insert(edge.source.clone());
        } else if edge.source == root_id {
            direct_descendants.insert(edge.target.clone());
        }
    }

    let inner_radius = viewport.min_side() * INNER_RADIUS_FACTOR;
    let outer_radius = inner_radius * 2.0;

    let arcs = [
        (Role::Ancestor, true, inner_radius, UPPER_ARC),
        (Role::Ancestor, false, outer_radius, UPPER_ARC),
        (Role::Descendant, true, inner_radius, LOWER_ARC),
        (Role::Descendant, false, outer_radius, LOWER_ARC),
    ];

    for (role, direct, radius, arc) in arcs {
        let direct_ids = match role {
            Role::Ancestor => &direct_ancestors,
            _ => &direct_descendants,
        };
        let members = graph
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.role == role && direct_ids.contains(&node.id) == direct)
            .map(|(index, _)| index)
            .collect::<Vec<_>>();

        position_in_arc(&mut graph.nodes, &members, viewport.center(), radius, arc);
    }
}

fn layout_single_arc(graph: &mut RelationGraph, role: Role, viewport: Viewport, arc: (f32, f32)) {
    let members = graph
        .nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| node.role == role)
        .map(|(index, _)| index)
        .collect::<Vec<_>>();

    let radius = viewport.min_side() * SINGLE_ARC_RADIUS_FACTOR;
    position_in_arc(&mut graph.nodes, &members, viewport.center(), radius, arc);
}

pub fn arc_angle(index: usize, count: usize, (start, end): (f32, f32)) -> f32 {
    start + (end - start) * (index + 1) as f32 / (count + 1) as f32
}

fn position_in_arc(
    nodes: &mut [GraphNode],
    members: &[usize],
    (center_x, center_y): (f32, f32),
    radius: f32,
    arc: (f32, f32),
) {
    for (slot, &index) in members.iter().enumerate() {
        let angle = arc_angle(slot, members.len(), arc);
        nodes[index].set_position(
            center_x + radius * angle.cos(),
            center_y - radius * angle.sin(),
        );
    }
}

fn finalize_positions(nodes: &mut [GraphNode], viewport: Viewport, rng: &mut impl Rng) {
    let (center_x, center_y) = viewport.center();

    for node in nodes {
        if !node.x.is_finite() || !node.y.is_finite() {
            node.x = center_x + rng.gen_range(-FALLBACK_JITTER..FALLBACK_JITTER);
            node.y = center_y + rng.gen_range(-FALLBACK_JITTER..FALLBACK_JITTER);
        }

        // max/min rather than clamp: a viewport narrower than twice the padding
        // would make clamp panic.
        let x = node.x.min(viewport.width - PADDING).max(PADDING);
        let y = node.y.min(viewport.height - PADDING).max(PADDING);
        node.set_position(x, y);
    }
}
