/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Framework-agnostic core of an agent-workflow canvas editor.
//!
//! The crate owns the data model and interaction logic only; rendering is
//! a pull-based collaborator that reads the graph and viewport after each
//! input event completes.
//!
//! - [`graph`]: agents, connections, and the arena that owns them
//! - [`viewport`]: pan/zoom mapping between screen and model space
//! - [`input`]: the pointer/keyboard/wheel interaction state machine
//! - [`validate`]: cycle, connectivity, and role-coverage analysis
//! - [`history`]: undo/redo over connection operations
//! - [`snapshot`]: versioned structural import/export
//! - [`roles`]: role profile table and coverage policy

pub mod graph;
pub mod history;
pub mod input;
pub mod roles;
pub mod snapshot;
pub mod validate;
pub mod viewport;

pub use graph::{
    Agent, AgentField, AgentStatus, ConnectReject, Connection, ConnectionKind, FlowGraph,
    GraphEvent,
};
pub use history::{ConnectionAction, History};
pub use input::{
    EditorConfig, InteractionController, LogNotifier, Notifier, PointerButton, SessionEvent,
};
pub use roles::{RoleKind, RolePolicy, RoleProfile};
pub use snapshot::{FlowSnapshot, SnapshotError};
pub use validate::{ValidationError, ValidationReport, ValidationWarning, validate_flow};
pub use viewport::Viewport;
