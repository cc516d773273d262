/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Portable structural snapshots of a workflow graph.
//!
//! The snapshot is the only durable representation: a flat,
//! order-preserving record of every agent and connection, versioned, with
//! ids carried as strings. Viewport, selection, and drag state are
//! deliberately excluded. JSON is the interchange encoding.

use euclid::default::Point2D;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::graph::{Agent, AgentStatus, Connection, ConnectionKind, FlowGraph};

/// Snapshot format version written by [`export`].
pub const SNAPSHOT_VERSION: &str = "1.0";

/// Agent status on the wire.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PersistedStatus {
    Idle,
    Active,
    Error,
}

impl From<AgentStatus> for PersistedStatus {
    fn from(status: AgentStatus) -> Self {
        match status {
            AgentStatus::Idle => Self::Idle,
            AgentStatus::Active => Self::Active,
            AgentStatus::Error => Self::Error,
        }
    }
}

impl From<PersistedStatus> for AgentStatus {
    fn from(status: PersistedStatus) -> Self {
        match status {
            PersistedStatus::Idle => Self::Idle,
            PersistedStatus::Active => Self::Active,
            PersistedStatus::Error => Self::Error,
        }
    }
}

/// Connection kind on the wire.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PersistedKind {
    Data,
    Control,
}

impl From<ConnectionKind> for PersistedKind {
    fn from(kind: ConnectionKind) -> Self {
        match kind {
            ConnectionKind::Data => Self::Data,
            ConnectionKind::Control => Self::Control,
        }
    }
}

impl From<PersistedKind> for ConnectionKind {
    fn from(kind: PersistedKind) -> Self {
        match kind {
            PersistedKind::Data => Self::Data,
            PersistedKind::Control => Self::Control,
        }
    }
}

/// Persisted agent.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PersistedAgent {
    /// Stable agent identity.
    pub id: String,
    #[serde(rename = "roleType")]
    pub role_type: String,
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub status: PersistedStatus,
    pub capabilities: Vec<String>,
    #[serde(rename = "createdAt")]
    pub created_at: u64,
}

/// Persisted connection.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PersistedConnection {
    pub id: String,
    #[serde(rename = "sourceId")]
    pub source_id: String,
    #[serde(rename = "targetId")]
    pub target_id: String,
    pub kind: PersistedKind,
    #[serde(rename = "createdAt")]
    pub created_at: u64,
}

/// Full structural record of a workflow graph.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FlowSnapshot {
    pub nodes: Vec<PersistedAgent>,
    pub edges: Vec<PersistedConnection>,
    pub version: String,
}

/// Errors from the snapshot codec.
#[derive(Debug)]
pub enum SnapshotError {
    Encode(String),
    Decode(String),
    UnsupportedVersion(String),
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotError::Encode(e) => write!(f, "Snapshot encode error: {e}"),
            SnapshotError::Decode(e) => write!(f, "Snapshot decode error: {e}"),
            SnapshotError::UnsupportedVersion(v) => {
                write!(f, "Unsupported snapshot version: {v}")
            },
        }
    }
}

/// Export the full node/edge set in arena order.
pub fn export(graph: &FlowGraph) -> FlowSnapshot {
    let nodes = graph
        .agents()
        .map(|agent| PersistedAgent {
            id: agent.id.to_string(),
            role_type: agent.role.clone(),
            name: agent.name.clone(),
            x: agent.position.x,
            y: agent.position.y,
            status: agent.status.into(),
            capabilities: agent.capabilities.clone(),
            created_at: agent.created_at_ms,
        })
        .collect();

    let edges = graph
        .connections()
        .map(|connection| PersistedConnection {
            id: connection.id.to_string(),
            source_id: connection.source.to_string(),
            target_id: connection.target.to_string(),
            kind: connection.kind.into(),
            created_at: connection.created_at_ms,
        })
        .collect();

    FlowSnapshot {
        nodes,
        edges,
        version: SNAPSHOT_VERSION.to_string(),
    }
}

/// Rebuild a graph from a snapshot, preserving original ids.
///
/// The model's current contents are cleared first. Entities with
/// unparseable ids, and edges whose endpoints are missing, are dropped
/// with a warning rather than failing the whole import.
pub fn import(snapshot: &FlowSnapshot, graph: &mut FlowGraph) -> Result<(), SnapshotError> {
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(SnapshotError::UnsupportedVersion(snapshot.version.clone()));
    }

    graph.clear();

    for node in &snapshot.nodes {
        let Ok(id) = Uuid::parse_str(&node.id) else {
            log::warn!("Dropping snapshot node with invalid id '{}'", node.id);
            continue;
        };
        graph.insert_agent(Agent {
            id,
            role: node.role_type.clone(),
            name: node.name.clone(),
            position: Point2D::new(node.x, node.y),
            status: node.status.into(),
            capabilities: node.capabilities.clone(),
            created_at_ms: node.created_at,
        });
    }

    for edge in &snapshot.edges {
        let ids = (
            Uuid::parse_str(&edge.id),
            Uuid::parse_str(&edge.source_id),
            Uuid::parse_str(&edge.target_id),
        );
        let (Ok(id), Ok(source), Ok(target)) = ids else {
            log::warn!("Dropping snapshot edge with invalid id '{}'", edge.id);
            continue;
        };
        let restored = graph.restore_connection(Connection {
            id,
            source,
            target,
            kind: edge.kind.into(),
            created_at_ms: edge.created_at,
        });
        if !restored {
            log::warn!("Dropping snapshot edge '{id}' with missing or conflicting endpoints");
        }
    }

    Ok(())
}

/// Encode a snapshot as JSON.
pub fn to_json(snapshot: &FlowSnapshot) -> Result<String, SnapshotError> {
    serde_json::to_string_pretty(snapshot).map_err(|e| SnapshotError::Encode(e.to_string()))
}

/// Decode a snapshot from JSON.
pub fn from_json(json: &str) -> Result<FlowSnapshot, SnapshotError> {
    serde_json::from_str(json).map_err(|e| SnapshotError::Decode(e.to_string()))
}
