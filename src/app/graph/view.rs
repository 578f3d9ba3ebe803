use std::collections::HashSet;
use std::sync::Arc;

use eframe::egui::text::LayoutJob;
use eframe::egui::{
    self, Align2, Color32, FontId, Painter, Pos2, Rect, Sense, Stroke, TextFormat, Ui, Vec2, vec2,
};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::graph::{GraphNode, RelationGraph, Role};
use crate::layout::Viewport;
use crate::util::{display_reference, wrap_label};

use super::super::highlight::{Adjacency, HighlightState, build_highlight_state};
use super::super::render_utils::{
    INCOMING_LINK_COLOR, OUTGOING_LINK_COLOR, arrow_head, blend_color, dim_color, draw_background,
    node_radius, role_color, trimmed_segment, world_to_screen,
};
use super::super::{SearchMatchCache, ViewModel};

const ROOT_PATH_COLOR: Color32 = Color32::from_rgb(246, 206, 104);
const SEARCH_COLOR: Color32 = Color32::from_rgb(103, 196, 255);
const EDGE_COLOR: Color32 = Color32::from_rgba_premultiplied(120, 120, 120, 200);

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

fn label_metrics(role: Role) -> (f32, f32) {
    if role == Role::Root {
        (140.0, 12.0)
    } else {
        (120.0, 10.0)
    }
}

impl ViewModel {
    fn cached_search_matches(
        &mut self,
        graph: &RelationGraph,
        revision: u64,
    ) -> Option<Arc<HashSet<usize>>> {
        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }

        if let Some(cached) = &self.search_match_cache
            && cached.revision == revision
            && cached.query == query
        {
            return Some(Arc::clone(&cached.matches));
        }

        let matcher = SkimMatcherV2::default();
        let matches = graph
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| {
                fuzzy_match_score(&matcher, &node.name, query).is_some()
                    || (!node.sambandsnummer.is_empty()
                        && fuzzy_match_score(&matcher, &node.sambandsnummer, query).is_some())
            })
            .map(|(index, _)| index)
            .collect::<HashSet<_>>();
        let matches = Arc::new(matches);

        self.search_match_cache = Some(SearchMatchCache {
            query: query.to_owned(),
            revision,
            matches: Arc::clone(&matches),
        });

        Some(matches)
    }

    pub(in crate::app) fn draw_graph(
        &mut self,
        ui: &mut Ui,
        graph: &RelationGraph,
        root_id: &str,
        viewport: Viewport,
        revision: u64,
    ) -> Option<String> {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect, self.pan, self.zoom);

        self.handle_graph_zoom(ui, rect, viewport, &response);
        self.handle_graph_pan(&response);

        let search_matches = self.cached_search_matches(graph, revision);
        let search_active = search_matches
            .as_ref()
            .is_some_and(|matches| !matches.is_empty());

        let scale = self.zoom.sqrt().clamp(0.5, 2.0);
        let screen_positions: Vec<Pos2> = graph
            .nodes
            .iter()
            .map(|node| world_to_screen(rect, viewport, self.pan, self.zoom, vec2(node.x, node.y)))
            .collect();
        let screen_radii: Vec<f32> = graph
            .nodes
            .iter()
            .map(|node| node_radius(node.role) * scale)
            .collect();

        let pointer = response.hover_pos();
        let visible = Self::visible_indices(rect, &screen_positions, &screen_radii);
        let hovered =
            Self::hovered_index(pointer, rect, &visible, &screen_positions, &screen_radii);
        self.hovered = hovered.and_then(|index| graph.nodes.get(index).map(|node| node.id.clone()));
        let clicked = response.clicked_by(egui::PointerButton::Primary);
        self.track_selection(clicked);
        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        let edges = graph.edge_indices();
        let highlight = hovered.map(|index| {
            let adjacency = Adjacency::new(graph.node_count(), &edges);
            build_highlight_state(&adjacency, graph.index_of(root_id), index)
        });

        for &(source, target) in &edges {
            let (Some(&start), Some(&end)) =
                (screen_positions.get(source), screen_positions.get(target))
            else {
                continue;
            };
            let Some((start, end)) =
                trimmed_segment(start, end, screen_radii[source], screen_radii[target])
            else {
                continue;
            };

            let (width, color) = edge_style(highlight.as_ref(), source, target);
            painter.line_segment([start, end], Stroke::new(width * scale, color));
            painter.add(arrow_head(end, start, 8.0 * scale, color));
        }

        for &index in &visible {
            let node = &graph.nodes[index];
            let position = screen_positions[index];
            let radius = screen_radii[index];

            let is_hovered = hovered == Some(index);
            let is_root_path = highlight
                .as_ref()
                .is_some_and(|state| state.root_path_nodes.contains(&index));
            let is_related = highlight
                .as_ref()
                .is_some_and(|state| state.related_nodes.contains(&index));
            let is_search_match = search_matches
                .as_ref()
                .is_some_and(|matches| matches.contains(&index));

            let base_color = role_color(node.role);
            let color = if is_hovered {
                blend_color(base_color, Color32::WHITE, 0.25)
            } else if is_related || is_root_path {
                base_color
            } else if is_search_match {
                blend_color(base_color, SEARCH_COLOR, 0.55)
            } else if highlight.is_some() {
                dim_color(base_color, 0.45)
            } else if search_active {
                dim_color(base_color, 0.38)
            } else {
                base_color
            };

            painter.circle_filled(position, radius, color);
            let stroke = if is_root_path {
                Stroke::new(2.2, ROOT_PATH_COLOR)
            } else if is_search_match {
                Stroke::new(2.0, SEARCH_COLOR)
            } else {
                Stroke::new(1.5, Color32::WHITE)
            };
            painter.circle_stroke(position, radius, stroke);

            self.draw_node_label(&painter, node, position, radius, scale);
        }

        if let Some(index) = hovered
            && let Some(node) = graph.nodes.get(index)
            && let Some(pointer) = pointer
        {
            draw_tooltip(&painter, rect, pointer, node);
        }

        if clicked {
            return self.hovered.clone();
        }
        None
    }

    fn draw_node_label(
        &self,
        painter: &Painter,
        node: &GraphNode,
        position: Pos2,
        radius: f32,
        scale: f32,
    ) {
        let (_, font_size) = label_metrics(node.role);
        let font_size = font_size * scale;
        let line_height = font_size * 1.2;

        let mut cursor = position + vec2(0.0, radius + 4.0);
        for line in label_lines(node) {
            painter.text(
                cursor,
                Align2::CENTER_TOP,
                line,
                FontId::proportional(font_size),
                Color32::from_gray(238),
            );
            cursor.y += line_height;
        }

        if self.show_references && !node.sambandsnummer.is_empty() {
            let job = LayoutJob::single_section(
                node.sambandsnummer.clone(),
                TextFormat {
                    font_id: FontId::proportional(font_size * 0.9),
                    color: Color32::from_gray(150),
                    italics: true,
                    ..Default::default()
                },
            );
            let galley = painter.layout_job(job);
            let origin = cursor - vec2(galley.size().x * 0.5, 0.0);
            painter.galley(origin, galley, Color32::from_gray(150));
        }
    }
}

fn label_lines(node: &GraphNode) -> Vec<String> {
    let (width, font_size) = label_metrics(node.role);
    wrap_label(&node.name, width, font_size)
}

fn edge_style(highlight: Option<&HighlightState>, source: usize, target: usize) -> (f32, Color32) {
    let Some(state) = highlight else {
        return (1.5, EDGE_COLOR);
    };

    let edge = (source, target);
    if state.outgoing_edges.contains(&edge) {
        (2.5, OUTGOING_LINK_COLOR)
    } else if state.incoming_edges.contains(&edge) {
        (2.5, INCOMING_LINK_COLOR)
    } else if state.root_path_edges.contains(&edge) {
        (2.2, ROOT_PATH_COLOR)
    } else {
        (1.0, dim_color(EDGE_COLOR, 0.4))
    }
}

fn draw_tooltip(painter: &Painter, clip: Rect, pointer: Pos2, node: &GraphNode) {
    let text = format!(
        "{}\nSB-num: {}",
        node.name,
        display_reference(&node.sambandsnummer)
    );
    let galley = painter.layout_no_wrap(text, FontId::proportional(13.0), Color32::from_gray(240));

    let padding = Vec2::splat(6.0);
    let mut origin = pointer + vec2(14.0, 14.0);
    let size = galley.size() + padding * 2.0;
    if origin.x + size.x > clip.right() {
        origin.x = pointer.x - size.x - 8.0;
    }
    if origin.y + size.y > clip.bottom() {
        origin.y = pointer.y - size.y - 8.0;
    }

    let frame = Rect::from_min_size(origin, size);
    painter.rect_filled(frame, 4.0, Color32::from_rgba_unmultiplied(24, 28, 34, 235));
    painter.rect_stroke(
        frame,
        4.0,
        Stroke::new(1.0, Color32::from_gray(90)),
        egui::StrokeKind::Inside,
    );
    painter.galley(origin + padding, galley, Color32::from_gray(240));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_labels_are_larger() {
        assert_eq!(label_metrics(Role::Root), (140.0, 12.0));
        assert_eq!(label_metrics(Role::Descendant), (120.0, 10.0));
    }

    #[test]
    fn label_wrapping_uses_the_unzoomed_budget() {
        let mut node = GraphNode::unplaced(
            "C1".to_owned(),
            "Fibre link Bergen to Oslo".to_owned(),
            String::new(),
            Role::Descendant,
            1,
        );
        assert_eq!(label_lines(&node), ["Fibre link Bergen to", "Oslo"]);

        node.role = Role::Root;
        assert_eq!(label_lines(&node), ["Fibre link Bergen", "to Oslo"]);
    }

    #[test]
    fn hovered_node_links_are_colored_by_direction() {
        let adjacency = Adjacency::new(3, &[(1, 0), (0, 2)]);
        let state = build_highlight_state(&adjacency, Some(0), 0);

        assert_eq!(edge_style(Some(&state), 0, 2).1, OUTGOING_LINK_COLOR);
        assert_eq!(edge_style(Some(&state), 1, 0).1, INCOMING_LINK_COLOR);
        assert_eq!(edge_style(None, 0, 2), (1.5, EDGE_COLOR));
    }

    #[test]
    fn search_matches_name_case_insensitively() {
        let matcher = SkimMatcherV2::default();
        assert!(fuzzy_match_score(&matcher, "Oslo Core", "oslo").is_some());
        assert!(fuzzy_match_score(&matcher, "Bergen", "xyz").is_none());
    }
}
