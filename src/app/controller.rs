use tracing::{debug, info, warn};

use crate::graph::{BuildConfig, RelationData, RelationGraph, ViewMode, build_graph};
use crate::layout::{Viewport, apply_layout};
use crate::samband::{FetchError, HierarchyDocument, extract_direct_relations, graph_page_path};

pub const EMPTY_GRAPH_MESSAGE: &str = "Not enough connections to build a view.";

#[derive(Clone, Debug, PartialEq)]
pub struct RootSpec {
    pub id: String,
    pub name: String,
    pub sambandsnummer: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewState {
    pub mode: ViewMode,
    pub max_depth: u32,
    pub cached_tree: Option<HierarchyDocument>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Rendering,
    Error,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Loading => "loading",
            Phase::Rendering => "ready",
            Phase::Error => "failed",
        }
    }
}

#[derive(Clone, Debug)]
pub enum Container {
    Blank,
    Spinner,
    Info(String),
    Error(String),
    Graph(RelationGraph),
}

/// A hierarchy request the caller must execute and report back through
/// [`ViewController::resolve`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    pub epoch: u64,
    pub generation: u64,
    pub root_id: String,
    pub depth: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Navigation {
    pub root: RootSpec,
    pub path: String,
}

pub struct ViewController {
    root: RootSpec,
    state: ViewState,
    phase: Phase,
    container: Container,
    viewport: Viewport,
    epoch: u64,
    generation: u64,
    revision: u64,
}

impl ViewController {
    /// `epoch` identifies this view among all views opened by the app, so that
    /// responses requested by an earlier view can never land in this one.
    pub fn new(
        root: RootSpec,
        mode: ViewMode,
        max_depth: u32,
        viewport: Viewport,
        epoch: u64,
    ) -> Self {
        Self {
            root,
            state: ViewState {
                mode,
                max_depth,
                cached_tree: None,
            },
            phase: Phase::Idle,
            container: Container::Blank,
            viewport,
            epoch,
            generation: 0,
            revision: 0,
        }
    }

    pub fn root(&self) -> &RootSpec {
        &self.root
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn start(&mut self) -> FetchTicket {
        self.begin_fetch()
    }

    pub fn select_mode(&mut self, mode: ViewMode) {
        self.state.mode = mode;

        if self.state.cached_tree.is_some() {
            self.render();
        } else if self.phase == Phase::Loading {
            debug!(?mode, "mode changed while loading; rendering once data arrives");
        } else {
            warn!(?mode, root = %self.root.id, "no hierarchy data available to render");
        }
    }

    /// Depth changes reshape the server-side tree, so the cache is always dropped.
    pub fn select_depth(&mut self, depth: u32) -> FetchTicket {
        self.state.max_depth = depth;
        self.state.cached_tree = None;
        self.begin_fetch()
    }

    pub fn resolve(
        &mut self,
        ticket: &FetchTicket,
        result: Result<HierarchyDocument, FetchError>,
    ) {
        if ticket.epoch != self.epoch {
            debug!(
                epoch = ticket.epoch,
                current = self.epoch,
                "dropping response for a view that was left"
            );
            return;
        }
        if ticket.generation != self.generation {
            debug!(
                generation = ticket.generation,
                current = self.generation,
                "dropping response from a superseded request"
            );
            return;
        }

        match result {
            Ok(document) => {
                info!(
                    root = %self.root.id,
                    depth = self.state.max_depth,
                    relations = document.relation_count(),
                    "hierarchy loaded"
                );
                self.state.cached_tree = Some(document);
                self.render();
            }
            Err(error) => {
                warn!(root = %self.root.id, %error, "failed to load hierarchy");
                self.phase = Phase::Error;
                self.container = Container::Error(format!("Error loading graph data: {error}"));
            }
        }
    }

    /// Called once an error has been put on screen; the message stays, the
    /// controller goes back to waiting for input.
    pub fn settle(&mut self) {
        if self.phase == Phase::Error {
            self.phase = Phase::Idle;
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        if self.viewport == viewport {
            return;
        }
        self.viewport = viewport;

        if let Container::Graph(graph) = &mut self.container {
            apply_layout(graph, &self.root.id, self.state.mode, viewport);
            self.revision = self.revision.wrapping_add(1);
        }
    }

    pub fn navigate(&self, node_id: &str) -> Option<Navigation> {
        if node_id == self.root.id {
            return None;
        }

        let Container::Graph(graph) = &self.container else {
            return None;
        };
        let node = graph.node(node_id)?;

        Some(Navigation {
            root: RootSpec {
                id: node.id.clone(),
                name: node.name.clone(),
                sambandsnummer: node.sambandsnummer.clone(),
            },
            path: graph_page_path(&node.id),
        })
    }

    fn begin_fetch(&mut self) -> FetchTicket {
        self.generation = self.generation.wrapping_add(1);
        self.phase = Phase::Loading;
        self.container = Container::Spinner;

        info!(
            root = %self.root.id,
            depth = self.state.max_depth,
            generation = self.generation,
            "requesting hierarchy"
        );

        FetchTicket {
            epoch: self.epoch,
            generation: self.generation,
            root_id: self.root.id.clone(),
            depth: self.state.max_depth,
        }
    }

    fn render(&mut self) {
        let Some(document) = self.state.cached_tree.as_ref() else {
            return;
        };

        let config = BuildConfig {
            root_id: self.root.id.clone(),
            root_name: self.root.name.clone(),
            root_ref: self.root.sambandsnummer.clone(),
            max_depth: self.state.max_depth,
        };

        self.revision = self.revision.wrapping_add(1);
        let mode = self.state.mode;
        let mut graph = match mode {
            ViewMode::AncestorsOnly => {
                let direct = extract_direct_relations(&document.parent_tree);
                build_graph(RelationData::Direct(&direct), mode, &config)
            }
            ViewMode::DescendantsOnly => {
                let direct = extract_direct_relations(&document.child_tree);
                build_graph(RelationData::Direct(&direct), mode, &config)
            }
            ViewMode::FullHierarchy => {
                build_graph(RelationData::Hierarchy(document), mode, &config)
            }
        };

        self.phase = Phase::Rendering;
        if graph.node_count() < 2 || !apply_layout(&mut graph, &self.root.id, mode, self.viewport)
        {
            self.container = Container::Info(EMPTY_GRAPH_MESSAGE.to_owned());
            return;
        }

        debug!(
            ?mode,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "graph rendered"
        );
        self.container = Container::Graph(graph);
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use serde_json::json;

    use super::*;
    use crate::graph::Role;

    fn controller() -> ViewController {
        ViewController::new(
            RootSpec {
                id: "R".to_owned(),
                name: "Root".to_owned(),
                sambandsnummer: "SB-0".to_owned(),
            },
            ViewMode::FullHierarchy,
            2,
            Viewport::new(1000.0, 800.0),
            1,
        )
    }

    fn document() -> HierarchyDocument {
        serde_json::from_value(json!({
            "parent_tree": [{"id": "P1", "name": "Parent", "parents": [{"id": "GP1"}]}],
            "child_tree": [{"id": "C1", "name": "Child"}, {"id": "C2"}]
        }))
        .unwrap()
    }

    fn status_error() -> FetchError {
        FetchError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            url: "http://localhost/".to_owned(),
        }
    }

    fn graph(controller: &ViewController) -> &RelationGraph {
        match controller.container() {
            Container::Graph(graph) => graph,
            other => panic!("expected a graph, got {other:?}"),
        }
    }

    #[test]
    fn starts_idle_with_defaults() {
        let controller = controller();
        assert_eq!(controller.phase(), Phase::Idle);
        assert_eq!(controller.state().mode, ViewMode::FullHierarchy);
        assert_eq!(controller.state().max_depth, 2);
        assert!(controller.state().cached_tree.is_none());
    }

    #[test]
    fn start_shows_spinner_and_requests_current_depth() {
        let mut controller = controller();
        let ticket = controller.start();

        assert_eq!(ticket.root_id, "R");
        assert_eq!(ticket.depth, 2);
        assert_eq!(controller.phase(), Phase::Loading);
        assert!(matches!(controller.container(), Container::Spinner));
    }

    #[test]
    fn successful_fetch_caches_and_renders() {
        let mut controller = controller();
        let ticket = controller.start();
        controller.resolve(&ticket, Ok(document()));

        assert_eq!(controller.phase(), Phase::Rendering);
        assert!(controller.state().cached_tree.is_some());
        let graph = graph(&controller);
        assert_eq!(graph.node_count(), 5);
        assert_eq!(graph.node("R").unwrap().x, 500.0);
    }

    #[test]
    fn failed_fetch_shows_inline_error_and_returns_to_idle() {
        let mut controller = controller();
        let ticket = controller.start();
        controller.resolve(&ticket, Err(status_error()));
        assert_eq!(controller.phase(), Phase::Error);

        controller.settle();
        assert_eq!(controller.phase(), Phase::Idle);
        match controller.container() {
            Container::Error(message) => {
                assert_eq!(message, "Error loading graph data: HTTP error! Status: 500");
            }
            other => panic!("expected an error, got {other:?}"),
        }
    }

    #[test]
    fn mode_switch_reuses_cache_without_fetching() {
        let mut controller = controller();
        let ticket = controller.start();
        controller.resolve(&ticket, Ok(document()));

        controller.select_mode(ViewMode::AncestorsOnly);
        let ancestors = graph(&controller);
        assert_eq!(ancestors.node_count(), 2);
        assert!(ancestors.node("GP1").is_none());
        assert!(ancestors.nodes.iter().skip(1).all(|node| node.role == Role::Ancestor));

        controller.select_mode(ViewMode::DescendantsOnly);
        assert_eq!(graph(&controller).node_count(), 3);
        assert_eq!(controller.phase(), Phase::Rendering);
    }

    #[test]
    fn mode_switch_while_loading_applies_on_arrival() {
        let mut controller = controller();
        let ticket = controller.start();
        controller.select_mode(ViewMode::DescendantsOnly);
        assert!(matches!(controller.container(), Container::Spinner));

        controller.resolve(&ticket, Ok(document()));
        let graph = graph(&controller);
        assert!(graph.node("C1").is_some());
        assert!(graph.node("P1").is_none());
    }

    #[test]
    fn mode_switch_after_failed_load_does_not_fetch() {
        let mut controller = controller();
        let ticket = controller.start();
        controller.resolve(&ticket, Err(status_error()));
        controller.settle();

        controller.select_mode(ViewMode::AncestorsOnly);
        assert_eq!(controller.phase(), Phase::Idle);
        assert!(matches!(controller.container(), Container::Error(_)));
    }

    #[test]
    fn depth_switch_always_refetches() {
        let mut controller = controller();
        let first = controller.start();
        controller.resolve(&first, Ok(document()));

        let second = controller.select_depth(3);
        assert_eq!(second.depth, 3);
        assert_ne!(second.generation, first.generation);
        assert!(controller.state().cached_tree.is_none());
        assert_eq!(controller.phase(), Phase::Loading);
    }

    #[test]
    fn superseded_responses_are_ignored() {
        let mut controller = controller();
        let first = controller.start();
        let second = controller.select_depth(1);

        controller.resolve(&second, Ok(document()));
        controller.resolve(&first, Err(status_error()));

        assert_eq!(controller.phase(), Phase::Rendering);
        assert!(matches!(controller.container(), Container::Graph(_)));
    }

    #[test]
    fn root_only_result_shows_info_message() {
        let mut controller = controller();
        let ticket = controller.start();
        controller.resolve(&ticket, Ok(HierarchyDocument::default()));

        match controller.container() {
            Container::Info(message) => assert_eq!(message, EMPTY_GRAPH_MESSAGE),
            other => panic!("expected info, got {other:?}"),
        }
    }

    #[test]
    fn resize_relayouts_the_visible_graph() {
        let mut controller = controller();
        let ticket = controller.start();
        controller.resolve(&ticket, Ok(document()));

        controller.resize(Viewport::new(600.0, 400.0));
        let root = graph(&controller).node("R").unwrap();
        assert_eq!((root.x, root.y), (300.0, 200.0));
    }

    #[test]
    fn clicking_root_is_a_no_op() {
        let mut controller = controller();
        let ticket = controller.start();
        controller.resolve(&ticket, Ok(document()));

        assert_eq!(controller.navigate("R"), None);
    }

    #[test]
    fn clicking_other_node_navigates_to_its_graph() {
        let mut controller = controller();
        let ticket = controller.start();
        controller.resolve(&ticket, Ok(document()));

        let navigation = controller.navigate("C1").unwrap();
        assert_eq!(navigation.root.id, "C1");
        assert_eq!(navigation.root.name, "Child");
        assert_eq!(navigation.path, "/plugins/praksis-nhn-nautobot/samband/C1/graph/");
    }

    #[test]
    fn responses_for_a_previous_view_are_ignored() {
        let mut previous = controller();
        let stale = previous.start();

        let mut current = ViewController::new(
            RootSpec {
                id: "C1".to_owned(),
                name: "Child".to_owned(),
                sambandsnummer: String::new(),
            },
            ViewMode::FullHierarchy,
            2,
            Viewport::new(1000.0, 800.0),
            2,
        );
        let ticket = current.start();
        assert_eq!(stale.generation, ticket.generation);

        current.resolve(&stale, Ok(document()));
        assert_eq!(current.phase(), Phase::Loading);
        assert!(matches!(current.container(), Container::Spinner));
        assert!(current.state().cached_tree.is_none());

        current.resolve(&ticket, Ok(HierarchyDocument::default()));
        assert!(matches!(current.container(), Container::Info(_)));
    }
}
