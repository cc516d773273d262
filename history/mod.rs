/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Undo/redo history for connection operations.
//!
//! Only connection creation and removal are tracked; agent operations are
//! not reversible. Each entry is an immutable record of the full
//! connection, sufficient to remove it again or re-insert it with its
//! original id.

use crate::graph::{Connection, FlowGraph};

const MAX_UNDO_STEPS: usize = 128;

/// A reversible connection operation.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionAction {
    Created(Connection),
    Removed(Connection),
}

/// Undo/redo stacks over [`ConnectionAction`]s.
#[derive(Debug, Clone, Default)]
pub struct History {
    undo_stack: Vec<ConnectionAction>,
    redo_stack: Vec<ConnectionAction>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed action. Any new action invalidates previously
    /// undone redo history.
    pub fn record(&mut self, action: ConnectionAction) {
        self.undo_stack.push(action);
        self.redo_stack.clear();

        if self.undo_stack.len() > MAX_UNDO_STEPS {
            let excess = self.undo_stack.len() - MAX_UNDO_STEPS;
            self.undo_stack.drain(0..excess);
        }
    }

    /// Reverse the most recent action. No-op on an empty stack.
    ///
    /// Returns whether an action was popped. A stale entry (its endpoints
    /// have since been deleted) still pops; the graph application is a
    /// silent no-op in that case.
    pub fn undo(&mut self, graph: &mut FlowGraph) -> bool {
        let Some(action) = self.undo_stack.pop() else {
            return false;
        };
        match &action {
            ConnectionAction::Created(record) => graph.disconnect(record.id),
            ConnectionAction::Removed(record) => {
                graph.restore_connection(record.clone());
            },
        }
        self.redo_stack.push(action);
        true
    }

    /// Re-apply the most recently undone action. No-op on an empty stack.
    pub fn redo(&mut self, graph: &mut FlowGraph) -> bool {
        let Some(action) = self.redo_stack.pop() else {
            return false;
        };
        match &action {
            ConnectionAction::Created(record) => {
                graph.restore_connection(record.clone());
            },
            ConnectionAction::Removed(record) => graph.disconnect(record.id),
        }
        self.undo_stack.push(action);
        true
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }
}
