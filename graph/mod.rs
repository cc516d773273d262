/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Graph data structures for the agent-workflow canvas.
//!
//! Core structures:
//! - `FlowGraph`: Main graph container backed by petgraph::StableGraph
//! - `Agent`: Workflow node with role, position, status, and capabilities
//! - `Connection`: Directed edge between two agents, tagged data or control
//!
//! The graph is the arena: agents and connections are addressed by stable
//! `Uuid`s, and connections hold endpoint ids rather than references, so
//! ownership stays acyclic even when the workflow itself has cycles.

use euclid::default::Point2D;
use petgraph::Directed;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::roles;

/// Stable node handle (petgraph NodeIndex — survives other deletions)
pub type NodeKey = NodeIndex;

/// Stable edge handle (petgraph EdgeIndex)
pub type EdgeKey = EdgeIndex;

/// Runtime status of an agent, pushed by an external status feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgentStatus {
    #[default]
    Idle,
    Active,
    Error,
}

/// Type of connection between agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionKind {
    /// Payload flows from source to target.
    Data,
    /// Source steers target without carrying payload.
    Control,
}

/// A workflow agent node.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    /// Stable agent identity.
    pub id: Uuid,

    /// Open role string ("planner", "executor", ...). Policy data, not
    /// hardcoded behavior; see `roles` for profile resolution.
    pub role: String,

    /// Display name.
    pub name: String,

    /// Position in model space.
    pub position: Point2D<f32>,

    /// Last pushed runtime status.
    pub status: AgentStatus,

    /// Ordered capability tags, descriptive only.
    pub capabilities: Vec<String>,

    /// Creation timestamp, epoch milliseconds.
    pub created_at_ms: u64,
}

/// A directed connection between two agents.
///
/// Endpoints are ids, never node references. At most one connection may
/// exist per ordered (source, target) pair, regardless of kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub id: Uuid,
    pub source: Uuid,
    pub target: Uuid,
    pub kind: ConnectionKind,
    pub created_at_ms: u64,
}

/// Tagged property setter for [`FlowGraph::update_agent`].
#[derive(Debug, Clone, PartialEq)]
pub enum AgentField {
    Name(String),
    Role(String),
    Position(Point2D<f32>),
    Status(AgentStatus),
    Capabilities(Vec<String>),
}

/// Structured change event emitted by every mutating graph operation.
///
/// Collaborators (render layer, metrics, notifiers) drain these via
/// [`FlowGraph::take_events`]; the graph itself holds no subscriber logic.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphEvent {
    AgentCreated { agent: Agent },
    AgentRemoved { agent: Agent },
    AgentUpdated { id: Uuid, field: AgentField },
    ConnectionCreated { connection: Connection },
    ConnectionRemoved { connection: Connection },
}

/// Rejection reasons for [`FlowGraph::connect`].
///
/// These are expected outcomes surfaced to the user, never panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectReject {
    SelfConnection,
    UnknownEndpoint,
    DuplicateConnection,
}

impl std::fmt::Display for ConnectReject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectReject::SelfConnection => write!(f, "An agent cannot connect to itself"),
            ConnectReject::UnknownEndpoint => write!(f, "Connection endpoint no longer exists"),
            ConnectReject::DuplicateConnection => {
                write!(f, "These agents are already connected")
            },
        }
    }
}

/// Current time as epoch milliseconds.
pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Main graph structure backed by petgraph::StableGraph.
#[derive(Clone, Default)]
pub struct FlowGraph {
    /// The underlying petgraph stable graph.
    inner: StableGraph<Agent, Connection, Directed>,

    /// Stable UUID to node mapping.
    id_to_node: HashMap<Uuid, NodeKey>,

    /// Stable UUID to edge mapping.
    id_to_edge: HashMap<Uuid, EdgeKey>,

    /// Change events awaiting collection by collaborators.
    pending_events: Vec<GraphEvent>,
}

impl FlowGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new agent with a derived display name.
    pub fn add_agent(&mut self, role: &str, x: f32, y: f32) -> Uuid {
        self.add_agent_named(role, x, y, None)
    }

    /// Add a new agent, optionally with an explicit display name.
    ///
    /// Always succeeds. The name defaults to the role profile's display
    /// name and capabilities seed from the profile's default set.
    pub fn add_agent_named(&mut self, role: &str, x: f32, y: f32, name: Option<String>) -> Uuid {
        let profile = roles::profile_for(role);
        let agent = Agent {
            id: Uuid::new_v4(),
            role: role.to_string(),
            name: name.unwrap_or_else(|| roles::default_name(role)),
            position: Point2D::new(x, y),
            status: AgentStatus::Idle,
            capabilities: profile
                .default_capabilities
                .iter()
                .map(|cap| cap.to_string())
                .collect(),
            created_at_ms: now_ms(),
        };
        let id = agent.id;
        self.insert_agent(agent);
        id
    }

    /// Insert a fully-formed agent, preserving its id.
    ///
    /// Used by import and duplication. Returns false (and leaves the graph
    /// untouched) if the id is already live.
    pub fn insert_agent(&mut self, agent: Agent) -> bool {
        if self.id_to_node.contains_key(&agent.id) {
            log::warn!("Ignoring agent insert with duplicate id {}", agent.id);
            return false;
        }
        let id = agent.id;
        let event_agent = agent.clone();
        let key = self.inner.add_node(agent);
        self.id_to_node.insert(id, key);
        self.pending_events
            .push(GraphEvent::AgentCreated { agent: event_agent });
        true
    }

    /// Remove an agent and cascade-remove every incident connection.
    ///
    /// No-op on an unknown id. No dangling connection survives this call.
    pub fn remove_agent(&mut self, id: Uuid) {
        let Some(&key) = self.id_to_node.get(&id) else {
            return;
        };

        let incident: Vec<Connection> = self
            .inner
            .edges_directed(key, petgraph::Direction::Outgoing)
            .chain(self.inner.edges_directed(key, petgraph::Direction::Incoming))
            .map(|edge| edge.weight().clone())
            .collect();

        for connection in &incident {
            self.id_to_edge.remove(&connection.id);
            self.pending_events.push(GraphEvent::ConnectionRemoved {
                connection: connection.clone(),
            });
        }

        if let Some(agent) = self.inner.remove_node(key) {
            self.id_to_node.remove(&agent.id);
            self.pending_events.push(GraphEvent::AgentRemoved { agent });
        }
    }

    /// Duplicate an agent: same role, status, and capabilities, offset
    /// position, suffixed name. Connections are intentionally not copied.
    ///
    /// Returns the new agent's id, or None if the source id is unknown.
    pub fn duplicate_agent(&mut self, id: Uuid) -> Option<Uuid> {
        const DUPLICATE_OFFSET: f32 = 50.0;

        let source = self.agent(id)?.clone();
        let copy = Agent {
            id: Uuid::new_v4(),
            role: source.role.clone(),
            name: format!("{} (copy)", source.name),
            position: Point2D::new(
                source.position.x + DUPLICATE_OFFSET,
                source.position.y + DUPLICATE_OFFSET,
            ),
            status: source.status,
            capabilities: source.capabilities.clone(),
            created_at_ms: now_ms(),
        };
        let copy_id = copy.id;
        self.insert_agent(copy);
        Some(copy_id)
    }

    /// Create a connection from `source` to `target`.
    ///
    /// Rejected on self-connection, unknown endpoints, or when the ordered
    /// pair is already connected; the duplicate check ignores `kind`.
    pub fn connect(
        &mut self,
        source: Uuid,
        target: Uuid,
        kind: ConnectionKind,
    ) -> Result<Uuid, ConnectReject> {
        if source == target {
            return Err(ConnectReject::SelfConnection);
        }
        let (&source_key, &target_key) =
            match (self.id_to_node.get(&source), self.id_to_node.get(&target)) {
                (Some(s), Some(t)) => (s, t),
                _ => return Err(ConnectReject::UnknownEndpoint),
            };
        if self.inner.find_edge(source_key, target_key).is_some() {
            return Err(ConnectReject::DuplicateConnection);
        }

        let connection = Connection {
            id: Uuid::new_v4(),
            source,
            target,
            kind,
            created_at_ms: now_ms(),
        };
        let id = connection.id;
        let event_connection = connection.clone();
        let edge_key = self.inner.add_edge(source_key, target_key, connection);
        self.id_to_edge.insert(id, edge_key);
        self.pending_events.push(GraphEvent::ConnectionCreated {
            connection: event_connection,
        });
        Ok(id)
    }

    /// Remove a connection by id. No-op on an unknown id.
    pub fn disconnect(&mut self, id: Uuid) {
        let Some(key) = self.id_to_edge.remove(&id) else {
            return;
        };
        if let Some(connection) = self.inner.remove_edge(key) {
            self.pending_events
                .push(GraphEvent::ConnectionRemoved { connection });
        }
    }

    /// Re-insert a previously removed connection, preserving its original
    /// id and timestamp.
    ///
    /// Used by undo/redo and import. Fails silently (returns false) if an
    /// endpoint is gone, the pair is already connected, or the id is live;
    /// a stale history entry is not an error.
    pub fn restore_connection(&mut self, record: Connection) -> bool {
        if record.source == record.target || self.id_to_edge.contains_key(&record.id) {
            return false;
        }
        let (Some(&source_key), Some(&target_key)) = (
            self.id_to_node.get(&record.source),
            self.id_to_node.get(&record.target),
        ) else {
            return false;
        };
        if self.inner.find_edge(source_key, target_key).is_some() {
            return false;
        }

        let id = record.id;
        let event_connection = record.clone();
        let edge_key = self.inner.add_edge(source_key, target_key, record);
        self.id_to_edge.insert(id, edge_key);
        self.pending_events.push(GraphEvent::ConnectionCreated {
            connection: event_connection,
        });
        true
    }

    /// Set one property on an agent. No-op on an unknown id.
    pub fn update_agent(&mut self, id: Uuid, field: AgentField) {
        let Some(&key) = self.id_to_node.get(&id) else {
            return;
        };
        let Some(agent) = self.inner.node_weight_mut(key) else {
            return;
        };
        match &field {
            AgentField::Name(name) => agent.name = name.clone(),
            AgentField::Role(role) => agent.role = role.clone(),
            AgentField::Position(position) => agent.position = *position,
            AgentField::Status(status) => agent.status = *status,
            AgentField::Capabilities(capabilities) => {
                agent.capabilities = capabilities.clone();
            },
        }
        self.pending_events
            .push(GraphEvent::AgentUpdated { id, field });
    }

    /// External status feed entry point. Unknown ids are silently ignored.
    pub fn set_status(&mut self, id: Uuid, status: AgentStatus) {
        self.update_agent(id, AgentField::Status(status));
    }

    /// Remove every connection, then every agent, emitting events for each.
    pub fn clear(&mut self) {
        let connection_ids: Vec<Uuid> = self.connections().map(|c| c.id).collect();
        for id in connection_ids {
            self.disconnect(id);
        }
        let agent_ids: Vec<Uuid> = self.agents().map(|a| a.id).collect();
        for id in agent_ids {
            self.remove_agent(id);
        }
    }

    /// Get an agent by id.
    pub fn agent(&self, id: Uuid) -> Option<&Agent> {
        let key = *self.id_to_node.get(&id)?;
        self.inner.node_weight(key)
    }

    /// Iterate all agents in arena order.
    ///
    /// This order is the tie-break order for hit testing and the node
    /// order of exported snapshots.
    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.inner
            .node_indices()
            .filter_map(|key| self.inner.node_weight(key))
    }

    /// Get a connection by id.
    pub fn connection(&self, id: Uuid) -> Option<&Connection> {
        let key = *self.id_to_edge.get(&id)?;
        self.inner.edge_weight(key)
    }

    /// Iterate all connections in arena order.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.inner
            .edge_indices()
            .filter_map(|key| self.inner.edge_weight(key))
    }

    /// Find the connection for an ordered (source, target) pair, if any.
    pub fn find_connection(&self, source: Uuid, target: Uuid) -> Option<&Connection> {
        let &source_key = self.id_to_node.get(&source)?;
        let &target_key = self.id_to_node.get(&target)?;
        let edge_key = self.inner.find_edge(source_key, target_key)?;
        self.inner.edge_weight(edge_key)
    }

    /// Count of incident connections, incoming and outgoing.
    pub fn degree(&self, id: Uuid) -> usize {
        let Some(&key) = self.id_to_node.get(&id) else {
            return 0;
        };
        self.inner
            .edges_directed(key, petgraph::Direction::Outgoing)
            .count()
            + self
                .inner
                .edges_directed(key, petgraph::Direction::Incoming)
                .count()
    }

    /// Ids of agents reachable over one outgoing connection.
    pub fn outgoing(&self, id: Uuid) -> Vec<Uuid> {
        let Some(&key) = self.id_to_node.get(&id) else {
            return Vec::new();
        };
        self.inner
            .edges_directed(key, petgraph::Direction::Outgoing)
            .map(|edge| edge.weight().target)
            .collect()
    }

    /// Count of live agents.
    pub fn agent_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Count of live connections.
    pub fn connection_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Drain the pending change events.
    pub fn take_events(&mut self) -> Vec<GraphEvent> {
        std::mem::take(&mut self.pending_events)
    }
}
