/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Input handling for the workflow canvas.
//!
//! The controller turns pointer/keyboard/wheel events from the
//! presentation layer into graph mutations, viewport updates, and history
//! records. All coordinates arrive in screen space and are converted
//! through the viewport. Rendering is a pull-based collaborator: it reads
//! the graph and viewport after each event runs to completion.

use euclid::default::Point2D;
use log::debug;
use uuid::Uuid;

use crate::graph::{AgentField, ConnectionKind, FlowGraph};
use crate::history::{ConnectionAction, History};
use crate::viewport::Viewport;

/// Pointer button reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Middle,
    Right,
}

/// User-facing notice sink, injected at construction.
///
/// Expected rejections (self-connection, duplicate connection) surface
/// here; they are not errors and never panic. Hosts route notices to
/// their toast/status UI.
pub trait Notifier {
    fn notify(&mut self, message: &str);
}

/// Default notifier: forwards notices to the log.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, message: &str) {
        log::info!("{message}");
    }
}

/// Selection change events for collaborators (status panel, inspector).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    AgentSelected { id: Uuid },
    AgentDeselected { id: Uuid },
}

/// Tunables for pointer interaction and zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorConfig {
    /// Hit-test radius around an agent, in model units.
    pub hit_radius: f32,
    /// Wheel factor for a positive delta (zoom out).
    pub wheel_zoom_out: f32,
    /// Wheel factor for a negative delta (zoom in).
    pub wheel_zoom_in: f32,
    /// Keyboard zoom step, anchored at the viewport center.
    pub key_zoom_step: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            hit_radius: 40.0,
            wheel_zoom_out: 0.9,
            wheel_zoom_in: 1.1,
            key_zoom_step: 1.1,
        }
    }
}

/// Pointer interaction state.
///
/// Selecting is transient: a node-hit pointer-down resolves immediately
/// to a selection plus `Dragging`. `ConnectPending` survives pointer-up
/// and waits for the next pointer-down.
#[derive(Debug, Clone, Copy, PartialEq)]
enum InteractionState {
    Idle,
    Dragging { agent: Uuid },
    Panning { last: Point2D<f32> },
    ConnectPending { source: Uuid },
}

/// The interaction state machine composing graph, viewport, and history.
pub struct InteractionController {
    graph: FlowGraph,
    viewport: Viewport,
    history: History,
    config: EditorConfig,
    state: InteractionState,
    selected: Option<Uuid>,
    notifier: Box<dyn Notifier>,
    session_events: Vec<SessionEvent>,
}

impl InteractionController {
    pub fn new(notifier: Box<dyn Notifier>) -> Self {
        Self::with_config(notifier, EditorConfig::default())
    }

    pub fn with_config(notifier: Box<dyn Notifier>, config: EditorConfig) -> Self {
        Self {
            graph: FlowGraph::new(),
            viewport: Viewport::default(),
            history: History::new(),
            config,
            state: InteractionState::Idle,
            selected: None,
            notifier,
            session_events: Vec::new(),
        }
    }

    // --- Input contract -------------------------------------------------

    pub fn pointer_down(&mut self, x: f32, y: f32, button: PointerButton) {
        let point = Point2D::new(x, y);

        if let InteractionState::ConnectPending { source } = self.state {
            match self.hit_test(point) {
                Some(target) => self.complete_connection(source, target),
                None => {
                    debug!("Pending connection cancelled by background click");
                    self.state = InteractionState::Idle;
                },
            }
            return;
        }

        match self.hit_test(point) {
            Some(agent) => {
                if button == PointerButton::Left {
                    self.select(agent);
                    self.state = InteractionState::Dragging { agent };
                }
            },
            None => {
                self.deselect();
                self.state = InteractionState::Panning { last: point };
            },
        }
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        let point = Point2D::new(x, y);
        match self.state {
            InteractionState::Dragging { agent } => {
                // Live drag: the position tracks every move event.
                let model = self.viewport.screen_to_model(point);
                self.graph.update_agent(agent, AgentField::Position(model));
            },
            InteractionState::Panning { last } => {
                self.viewport.pan(point.x - last.x, point.y - last.y);
                self.state = InteractionState::Panning { last: point };
            },
            _ => {},
        }
    }

    /// Releasing always commits the last drag position; there is no
    /// cancel-drag. Pending connections survive the release.
    pub fn pointer_up(&mut self) {
        if matches!(
            self.state,
            InteractionState::Dragging { .. } | InteractionState::Panning { .. }
        ) {
            self.state = InteractionState::Idle;
        }
    }

    /// Wheel zoom anchored at the wheel position: positive delta shrinks,
    /// negative grows.
    pub fn wheel(&mut self, delta_y: f32, x: f32, y: f32) {
        let factor = if delta_y > 0.0 {
            self.config.wheel_zoom_out
        } else {
            self.config.wheel_zoom_in
        };
        self.viewport.zoom_at(x, y, factor);
    }

    pub fn key(&mut self, code: &str) {
        match code {
            "Delete" | "Backspace" => {
                if let Some(id) = self.selected {
                    self.graph.remove_agent(id);
                    self.deselect();
                }
            },
            "Escape" => {
                self.deselect();
                if matches!(self.state, InteractionState::ConnectPending { .. }) {
                    self.state = InteractionState::Idle;
                }
            },
            "Equal" | "Plus" => {
                let center = self.viewport.center();
                self.viewport
                    .zoom_at(center.x, center.y, self.config.key_zoom_step);
            },
            "Minus" => {
                let center = self.viewport.center();
                self.viewport
                    .zoom_at(center.x, center.y, 1.0 / self.config.key_zoom_step);
            },
            "Digit0" => self.viewport.reset(),
            _ => {},
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport.resize(width, height);
    }

    // Single-touch input maps 1:1 onto the pointer contract.

    pub fn touch_start(&mut self, x: f32, y: f32) {
        self.pointer_down(x, y, PointerButton::Left);
    }

    pub fn touch_move(&mut self, x: f32, y: f32) {
        self.pointer_move(x, y);
    }

    pub fn touch_end(&mut self) {
        self.pointer_up();
    }

    // --- Connection workflow --------------------------------------------

    /// Choose a connection source; the next node click becomes the target.
    /// Unknown ids are a no-op.
    pub fn begin_connection(&mut self, source: Uuid) {
        if self.graph.agent(source).is_none() {
            debug!("Ignoring connection start from unknown agent {source}");
            return;
        }
        self.state = InteractionState::ConnectPending { source };
    }

    /// Create a connection, recording it for undo. Rejections surface as
    /// notices and return false.
    pub fn create_connection(&mut self, source: Uuid, target: Uuid, kind: ConnectionKind) -> bool {
        match self.graph.connect(source, target, kind) {
            Ok(id) => {
                if let Some(record) = self.graph.connection(id).cloned() {
                    self.history.record(ConnectionAction::Created(record));
                }
                true
            },
            Err(reject) => {
                debug!("Connection rejected: {reject}");
                self.notifier.notify(&reject.to_string());
                false
            },
        }
    }

    /// Remove a connection, recording it for undo. Unknown ids are a no-op.
    pub fn remove_connection(&mut self, id: Uuid) {
        let Some(record) = self.graph.connection(id).cloned() else {
            return;
        };
        self.graph.disconnect(id);
        self.history.record(ConnectionAction::Removed(record));
    }

    fn complete_connection(&mut self, source: Uuid, target: Uuid) {
        self.create_connection(source, target, ConnectionKind::Data);
        self.state = InteractionState::Idle;
    }

    // --- History --------------------------------------------------------

    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.graph)
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.graph)
    }

    // --- Selection ------------------------------------------------------

    fn select(&mut self, id: Uuid) {
        if self.selected == Some(id) {
            return;
        }
        self.deselect();
        self.selected = Some(id);
        self.session_events.push(SessionEvent::AgentSelected { id });
    }

    fn deselect(&mut self) {
        if let Some(id) = self.selected.take() {
            self.session_events
                .push(SessionEvent::AgentDeselected { id });
        }
    }

    // --- Hit testing ----------------------------------------------------

    /// Nearest agent within the configured radius of a screen point.
    /// Distance ties keep the first match in graph iteration order.
    fn hit_test(&self, screen: Point2D<f32>) -> Option<Uuid> {
        let model = self.viewport.screen_to_model(screen);
        let radius_sq = self.config.hit_radius * self.config.hit_radius;

        let mut best: Option<(Uuid, f32)> = None;
        for agent in self.graph.agents() {
            let dx = agent.position.x - model.x;
            let dy = agent.position.y - model.y;
            let dist_sq = dx * dx + dy * dy;
            if dist_sq <= radius_sq && best.is_none_or(|(_, d)| dist_sq < d) {
                best = Some((agent.id, dist_sq));
            }
        }
        best.map(|(id, _)| id)
    }

    // --- Accessors ------------------------------------------------------

    pub fn graph(&self) -> &FlowGraph {
        &self.graph
    }

    /// Mutable model access for programmatic edits, status feeds, and
    /// import. Structural edits made here bypass history by design.
    pub fn graph_mut(&mut self) -> &mut FlowGraph {
        &mut self.graph
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn selected(&self) -> Option<Uuid> {
        self.selected
    }

    pub fn pending_source(&self) -> Option<Uuid> {
        match self.state {
            InteractionState::ConnectPending { source } => Some(source),
            _ => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, InteractionState::Dragging { .. })
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.state, InteractionState::Panning { .. })
    }

    /// Drain pending selection events.
    pub fn take_session_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.session_events)
    }
}
