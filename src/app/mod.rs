use std::collections::HashSet;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use eframe::egui::{Context, Vec2};
use tracing::info;

use crate::config::Settings;
use crate::graph::ViewMode;
use crate::layout::Viewport;
use crate::samband::{FetchError, HierarchyClient, HierarchyDocument};

mod controller;
mod graph;
mod highlight;
mod render_utils;
mod ui;

pub use controller::RootSpec;
use controller::{FetchTicket, Navigation, ViewController};

const INITIAL_VIEWPORT: Viewport = Viewport {
    width: 960.0,
    height: 640.0,
};

pub struct SambandGraphApp {
    client: HierarchyClient,
    settings: Settings,
    controller: ViewController,
    view: ViewModel,
    history: Vec<RootSpec>,
    view_serial: u64,
    fetch_tx: Sender<FetchOutcome>,
    fetch_rx: Receiver<FetchOutcome>,
}

struct FetchOutcome {
    ticket: FetchTicket,
    result: Result<HierarchyDocument, FetchError>,
}

struct ViewModel {
    pan: Vec2,
    zoom: f32,
    search: String,
    show_references: bool,
    hovered: Option<String>,
    selected: Option<String>,
    search_match_cache: Option<SearchMatchCache>,
}

struct SearchMatchCache {
    query: String,
    revision: u64,
    matches: Arc<HashSet<usize>>,
}

#[derive(Default)]
struct ViewActions {
    mode: Option<ViewMode>,
    depth: Option<u32>,
    reload: bool,
    clicked: Option<String>,
    back: bool,
}

impl ViewModel {
    fn new() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
            search: String::new(),
            show_references: true,
            hovered: None,
            selected: None,
            search_match_cache: None,
        }
    }
}

impl SambandGraphApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        client: HierarchyClient,
        settings: Settings,
        root: RootSpec,
    ) -> Self {
        let (fetch_tx, fetch_rx) = mpsc::channel();
        let controller = Self::new_controller(&settings, root, 0);

        let mut app = Self {
            client,
            settings,
            controller,
            view: ViewModel::new(),
            history: Vec::new(),
            view_serial: 0,
            fetch_tx,
            fetch_rx,
        };

        let ticket = app.controller.start();
        app.spawn_fetch(&cc.egui_ctx, ticket);
        app
    }

    fn new_controller(settings: &Settings, root: RootSpec, view_serial: u64) -> ViewController {
        ViewController::new(
            root,
            settings.view.default_mode,
            settings.view.default_depth,
            INITIAL_VIEWPORT,
            view_serial,
        )
    }

    fn spawn_fetch(&self, ctx: &Context, ticket: FetchTicket) {
        let client = self.client.clone();
        let tx = self.fetch_tx.clone();
        let ctx = ctx.clone();

        thread::spawn(move || {
            let result = client.fetch_hierarchy(&ticket.root_id, ticket.depth);
            let _ = tx.send(FetchOutcome { ticket, result });
            ctx.request_repaint();
        });
    }

    fn drain_fetch_results(&mut self) {
        while let Ok(outcome) = self.fetch_rx.try_recv() {
            self.controller.resolve(&outcome.ticket, outcome.result);
        }
    }

    fn open_view(&mut self, ctx: &Context, root: RootSpec) {
        info!(root = %root.id, name = %root.name, "opening samband view");
        self.view_serial = self.view_serial.wrapping_add(1);
        let viewport = self.controller.viewport();
        self.controller = Self::new_controller(&self.settings, root, self.view_serial);
        self.controller.resize(viewport);
        self.view = ViewModel::new();

        let ticket = self.controller.start();
        self.spawn_fetch(ctx, ticket);
    }

    fn apply_actions(&mut self, ctx: &Context, actions: ViewActions) {
        if let Some(mode) = actions.mode {
            self.controller.select_mode(mode);
        }

        if let Some(depth) = actions.depth {
            let ticket = self.controller.select_depth(depth);
            self.spawn_fetch(ctx, ticket);
        } else if actions.reload {
            let depth = self.controller.state().max_depth;
            let ticket = self.controller.select_depth(depth);
            self.spawn_fetch(ctx, ticket);
        }

        if let Some(node_id) = actions.clicked
            && let Some(Navigation { root, path }) = self.controller.navigate(&node_id)
        {
            info!(%path, "navigating to samband graph");
            self.history.push(self.controller.root().clone());
            self.open_view(ctx, root);
            return;
        }

        if actions.back
            && let Some(previous) = self.history.pop()
        {
            self.open_view(ctx, previous);
        }
    }
}

impl eframe::App for SambandGraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.drain_fetch_results();

        let mut actions = ViewActions::default();
        self.show(ctx, &mut actions);
        self.controller.settle();

        self.apply_actions(ctx, actions);
    }
}
