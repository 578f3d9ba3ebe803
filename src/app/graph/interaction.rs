use eframe::egui::{self, Pos2, Rect, Ui};

use crate::layout::Viewport;

use super::super::ViewModel;
use super::super::render_utils::{circle_visible, screen_to_world};

const MIN_ZOOM: f32 = 0.1;
const MAX_ZOOM: f32 = 4.0;

impl ViewModel {
    pub(in crate::app) fn handle_graph_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        viewport: Viewport,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = response.hover_pos().unwrap_or_else(|| rect.center());
        let world_before = screen_to_world(rect, viewport, self.pan, self.zoom, pointer);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.zoom = (self.zoom * zoom_factor).clamp(MIN_ZOOM, MAX_ZOOM);

        let (center_x, center_y) = viewport.center();
        let offset = world_before - egui::vec2(center_x, center_y);
        self.pan = pointer - rect.center() - (offset * self.zoom);
    }

    pub(in crate::app) fn handle_graph_pan(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.pan += response.drag_delta();
        }
    }

    pub(in crate::app) fn visible_indices(
        rect: Rect,
        screen_positions: &[Pos2],
        screen_radii: &[f32],
    ) -> Vec<usize> {
        (0..screen_positions.len())
            .filter(|&index| circle_visible(rect, screen_positions[index], screen_radii[index]))
            .collect()
    }

    pub(in crate::app) fn hovered_index(
        pointer: Option<Pos2>,
        rect: Rect,
        visible_indices: &[usize],
        screen_positions: &[Pos2],
        screen_radii: &[f32],
    ) -> Option<usize> {
        let pointer = pointer.filter(|pointer| rect.contains(*pointer))?;
        visible_indices
            .iter()
            .filter_map(|&index| {
                let distance = screen_positions[index].distance(pointer);
                (distance <= screen_radii[index]).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    /// The details panel follows the last hovered node until the empty canvas
    /// is clicked.
    pub(in crate::app) fn track_selection(&mut self, background_clicked: bool) {
        if self.hovered.is_some() {
            self.selected = self.hovered.clone();
        } else if background_clicked {
            self.selected = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;

    fn canvas() -> Rect {
        Rect::from_min_size(pos2(300.0, 0.0), vec2(400.0, 400.0))
    }

    #[test]
    fn pointer_outside_canvas_hovers_nothing() {
        let positions = [pos2(295.0, 100.0)];
        let radii = [14.0];
        let visible = ViewModel::visible_indices(canvas(), &positions, &radii);
        assert_eq!(visible, [0]);

        let hovered =
            ViewModel::hovered_index(Some(pos2(290.0, 100.0)), canvas(), &visible, &positions, &radii);
        assert_eq!(hovered, None);
    }

    #[test]
    fn nodes_panned_out_of_the_canvas_cannot_be_hovered() {
        let positions = [pos2(100.0, 100.0), pos2(500.0, 200.0)];
        let radii = [14.0, 14.0];
        let visible = ViewModel::visible_indices(canvas(), &positions, &radii);
        assert_eq!(visible, [1]);

        let hovered =
            ViewModel::hovered_index(Some(pos2(100.0, 100.0)), canvas(), &visible, &positions, &radii);
        assert_eq!(hovered, None);
    }

    #[test]
    fn closest_node_under_pointer_wins() {
        let positions = [pos2(500.0, 200.0), pos2(510.0, 200.0)];
        let radii = [14.0, 14.0];
        let visible = ViewModel::visible_indices(canvas(), &positions, &radii);

        let hovered =
            ViewModel::hovered_index(Some(pos2(508.0, 200.0)), canvas(), &visible, &positions, &radii);
        assert_eq!(hovered, Some(1));
    }

    #[test]
    fn selection_survives_leaving_the_canvas() {
        let mut view = ViewModel::new();
        view.hovered = Some("C1".to_owned());
        view.track_selection(false);

        view.hovered = None;
        view.track_selection(false);
        assert_eq!(view.selected.as_deref(), Some("C1"));

        view.track_selection(true);
        assert_eq!(view.selected, None);
    }
}
