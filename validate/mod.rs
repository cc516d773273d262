/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Read-only structural validation of a workflow graph.
//!
//! Produces a report of errors (cycles, unmet role coverage) and warnings
//! (disconnected agents). Warnings never affect validity. The role policy
//! is externally supplied data; the validator has no role knowledge of
//! its own.

use std::collections::HashSet;
use uuid::Uuid;

use crate::graph::FlowGraph;
use crate::roles::RolePolicy;

/// A validation failure. The flow is invalid while any of these hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The directed graph contains at least one cycle.
    CycleDetected,
    /// Fewer agents carry `role` than the policy requires.
    MissingRole {
        role: String,
        required: usize,
        actual: usize,
    },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::CycleDetected => write!(f, "Flow contains a cycle"),
            ValidationError::MissingRole { role, .. } => write!(f, "Missing {role}"),
        }
    }
}

/// A validation advisory. Never affects validity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    /// The named agent has no incoming or outgoing connections.
    Disconnected { name: String },
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationWarning::Disconnected { name } => {
                write!(f, "Agent {name} is not connected")
            },
        }
    }
}

/// Result of [`validate_flow`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

/// Validate a graph snapshot against a role policy.
pub fn validate_flow(graph: &FlowGraph, policy: &RolePolicy) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for agent in graph.agents() {
        if graph.degree(agent.id) == 0 {
            warnings.push(ValidationWarning::Disconnected {
                name: agent.name.clone(),
            });
        }
    }

    if has_cycle(graph) {
        errors.push(ValidationError::CycleDetected);
    }

    for (role, required) in policy.entries() {
        let actual = graph
            .agents()
            .filter(|agent| agent.role.trim().eq_ignore_ascii_case(role))
            .count();
        if actual < required {
            errors.push(ValidationError::MissingRole {
                role: role.to_string(),
                required,
                actual,
            });
        }
    }

    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
        warnings,
    }
}

/// Depth-first cycle check over the whole graph.
///
/// Classic visited + recursion-stack traversal, started once per
/// unvisited agent. The helper returns a bool consumed by its caller so a
/// back-edge verdict short-circuits all the way out.
fn has_cycle(graph: &FlowGraph) -> bool {
    let mut visited: HashSet<Uuid> = HashSet::new();
    let mut stack: HashSet<Uuid> = HashSet::new();

    for agent in graph.agents() {
        if !visited.contains(&agent.id) && visit(graph, agent.id, &mut visited, &mut stack) {
            return true;
        }
    }
    false
}

fn visit(
    graph: &FlowGraph,
    id: Uuid,
    visited: &mut HashSet<Uuid>,
    stack: &mut HashSet<Uuid>,
) -> bool {
    visited.insert(id);
    stack.insert(id);

    for next in graph.outgoing(id) {
        if stack.contains(&next) {
            return true;
        }
        if !visited.contains(&next) && visit(graph, next, visited, stack) {
            return true;
        }
    }

    stack.remove(&id);
    false
}
