use eframe::egui::{RichText, Ui};

use crate::samband::graph_page_path;
use crate::util::display_reference;

use super::super::controller::Container;
use super::super::{SambandGraphApp, ViewActions};

impl SambandGraphApp {
    pub(in crate::app) fn draw_details(&self, ui: &mut Ui, actions: &mut ViewActions) {
        ui.heading("Details");
        ui.add_space(6.0);

        let Container::Graph(graph) = self.controller.container() else {
            ui.label("Details appear once the graph has loaded.");
            return;
        };

        let root_id = &self.controller.root().id;
        let Some(node) = self
            .view
            .selected
            .as_deref()
            .and_then(|id| graph.node(id))
            .or_else(|| graph.node(root_id))
        else {
            ui.label("The current samband is missing from the graph.");
            return;
        };

        ui.label(RichText::new(&node.name).strong());
        ui.small(node.id.as_str());
        ui.add_space(6.0);

        ui.label(format!("SB-num: {}", display_reference(&node.sambandsnummer)));
        ui.label(format!("Role: {}", node.role.label()));
        ui.label(format!("Depth: {}", node.depth));

        let incoming = graph
            .edges
            .iter()
            .filter(|edge| edge.target == node.id)
            .count();
        let outgoing = graph
            .edges
            .iter()
            .filter(|edge| edge.source == node.id)
            .count();
        ui.label(format!("Parents in view: {incoming}"));
        ui.label(format!("Children in view: {outgoing}"));
        ui.small(graph_page_path(&node.id));

        if !node.is_root() {
            ui.add_space(6.0);
            if ui.button("Open graph view").clicked() {
                actions.clicked = Some(node.id.clone());
            }
        }

        ui.separator();
        ui.label(RichText::new("Direct relations").strong());
        let mut any = false;
        for edge in &graph.edges {
            let other = if edge.target == node.id {
                &edge.source
            } else if edge.source == node.id {
                &edge.target
            } else {
                continue;
            };
            if let Some(other) = graph.node(other) {
                any = true;
                ui.label(format!("{} ({})", other.name, other.role.label()));
            }
        }
        if !any {
            ui.label("No relations in view.");
        }
    }
}
