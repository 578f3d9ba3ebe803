use eframe::egui::{self, Color32, RichText, Ui};

use crate::graph::{Role, ViewMode};

use super::super::render_utils::{INCOMING_LINK_COLOR, OUTGOING_LINK_COLOR, role_color};
use super::super::{SambandGraphApp, ViewActions};

const MODES: [ViewMode; 3] = [
    ViewMode::AncestorsOnly,
    ViewMode::DescendantsOnly,
    ViewMode::FullHierarchy,
];

impl SambandGraphApp {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui, actions: &mut ViewActions) {
        ui.heading("Graph Controls");
        ui.separator();
        ui.add_space(4.0);

        let state = self.controller.state();
        let current_mode = state.mode;
        let current_depth = state.max_depth;

        ui.label("View");
        ui.horizontal_wrapped(|ui| {
            for mode in MODES {
                let button = ui
                    .selectable_label(current_mode == mode, mode.label())
                    .on_hover_text(mode_hint(mode));
                if button.clicked() {
                    actions.mode = Some(mode);
                }
            }
        });

        if current_mode == ViewMode::FullHierarchy {
            ui.add_space(6.0);
            ui.label("Depth");
            ui.horizontal_wrapped(|ui| {
                for &depth in &self.settings.view.depth_choices {
                    let button = ui
                        .selectable_label(current_depth == depth, depth.to_string())
                        .on_hover_text(format!("Fetch relations up to {depth} levels away."));
                    if button.clicked() {
                        actions.depth = Some(depth);
                    }
                }
            });
        }

        ui.separator();

        ui.label("Search (name or sambandsnummer)")
            .on_hover_text("Fuzzy-highlight matching nodes without changing the graph.");
        ui.text_edit_singleline(&mut self.view.search);

        ui.add_space(4.0);
        ui.checkbox(&mut self.view.show_references, "Show sambandsnummer");

        ui.separator();
        ui.label(RichText::new("Legend").strong());
        for (role, text) in [
            (Role::Root, "Current samband"),
            (Role::Ancestor, "Parent"),
            (Role::Descendant, "Child"),
        ] {
            legend_row(ui, role_color(role), text);
        }
        legend_row(ui, OUTGOING_LINK_COLOR, "Outgoing link of hovered node");
        legend_row(ui, INCOMING_LINK_COLOR, "Incoming link of hovered node");

        ui.add_space(6.0);
        ui.small("Scroll to zoom, right-drag to pan. Click a node to open its graph.");
    }
}

fn mode_hint(mode: ViewMode) -> &'static str {
    match mode {
        ViewMode::AncestorsOnly => "Show the direct parents of this samband.",
        ViewMode::DescendantsOnly => "Show the direct children of this samband.",
        ViewMode::FullHierarchy => "Show parent and child trees up to the selected depth.",
    }
}

fn legend_row(ui: &mut Ui, color: Color32, text: &str) {
    ui.horizontal(|ui| {
        let (rect, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
        ui.painter().circle_filled(rect.center(), 6.0, color);
        ui.label(text);
    });
}
