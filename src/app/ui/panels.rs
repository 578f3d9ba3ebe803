use eframe::egui::{self, Align, Color32, Context, Layout, RichText};

use crate::layout::Viewport;

use super::super::controller::Container;
use super::super::{SambandGraphApp, ViewActions};

impl SambandGraphApp {
    pub(in crate::app) fn show(&mut self, ctx: &Context, actions: &mut ViewActions) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let back_button =
                        ui.add_enabled(!self.history.is_empty(), egui::Button::new("Back"));
                    if back_button.clicked() {
                        actions.back = true;
                    }
                    ui.heading("samband-graph");
                    ui.separator();

                    let root = self.controller.root();
                    ui.label(RichText::new(&root.name).strong());
                    if !root.sambandsnummer.is_empty() {
                        ui.label(RichText::new(&root.sambandsnummer).italics());
                    }
                    ui.label(format!("api: {}", self.client.base_url()));

                    if ui.button("Reload").clicked() {
                        actions.reload = true;
                    }
                    ui.weak(self.controller.phase().label());

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(summary) = self.visible_graph_text() {
                            ui.label(summary);
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| self.draw_controls(ui, actions));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_details(ui, actions));

        egui::CentralPanel::default().show(ctx, |ui| {
            let size = ui.available_size();
            self.controller.resize(Viewport::new(size.x, size.y));

            let viewport = self.controller.viewport();
            let revision = self.controller.revision();
            let root_id = self.controller.root().id.clone();

            match self.controller.container() {
                Container::Blank => {}
                Container::Spinner => {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.spinner();
                        ui.add_space(8.0);
                        ui.label("Loading graph view...");
                    });
                }
                Container::Info(message) => {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.label(RichText::new(message).color(Color32::from_rgb(120, 180, 230)));
                    });
                }
                Container::Error(message) => {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.label(RichText::new(message).color(Color32::from_rgb(231, 76, 60)));
                    });
                }
                Container::Graph(graph) => {
                    if let Some(clicked) =
                        self.view
                            .draw_graph(ui, graph, &root_id, viewport, revision)
                    {
                        actions.clicked = Some(clicked);
                    }
                }
            }
        });
    }

    fn visible_graph_text(&self) -> Option<String> {
        match self.controller.container() {
            Container::Graph(graph) => Some(format!(
                "{}  |  nodes {}  |  edges {}",
                self.controller.state().mode.label(),
                graph.node_count(),
                graph.edge_count()
            )),
            _ => None,
        }
    }
}
