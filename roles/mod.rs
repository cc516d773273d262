/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Role profiles and coverage policy for workflow agents.
//!
//! Roles are open policy strings on the wire ("planner", "executor", ...).
//! Known roles resolve to a [`RoleKind`] so presentation data (icon, color,
//! default capabilities) is dispatched through an exhaustive match instead
//! of stringly-typed lookups. Unknown roles keep working with a generic
//! profile; the role set is data, not behavior.

use std::collections::HashMap;

/// Resolved role classification for profile lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleKind {
    Planner,
    Executor,
    Evaluator,
    Coordinator,
    Other,
}

impl RoleKind {
    /// Resolve an open role string to a known kind.
    ///
    /// Matching is case-insensitive and trims whitespace; anything
    /// unrecognized maps to [`RoleKind::Other`] rather than failing.
    pub fn parse(role: &str) -> Self {
        match role.trim().to_ascii_lowercase().as_str() {
            "planner" => Self::Planner,
            "executor" => Self::Executor,
            "evaluator" => Self::Evaluator,
            "coordinator" => Self::Coordinator,
            _ => Self::Other,
        }
    }
}

/// Presentation and seeding data for one role.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleProfile {
    pub display_name: &'static str,
    pub icon: &'static str,
    pub color_rgb: (u8, u8, u8),
    pub default_capabilities: &'static [&'static str],
}

/// Look up the profile row for a role string.
pub fn profile_for(role: &str) -> RoleProfile {
    match RoleKind::parse(role) {
        RoleKind::Planner => RoleProfile {
            display_name: "Planner",
            icon: "\u{1f9e0}",
            color_rgb: (110, 170, 255),
            default_capabilities: &["task-decomposition", "goal-tracking"],
        },
        RoleKind::Executor => RoleProfile {
            display_name: "Executor",
            icon: "\u{2699}",
            color_rgb: (80, 220, 160),
            default_capabilities: &["tool-invocation", "code-execution"],
        },
        RoleKind::Evaluator => RoleProfile {
            display_name: "Evaluator",
            icon: "\u{1f50d}",
            color_rgb: (255, 180, 80),
            default_capabilities: &["output-scoring", "feedback"],
        },
        RoleKind::Coordinator => RoleProfile {
            display_name: "Coordinator",
            icon: "\u{1f517}",
            color_rgb: (220, 120, 255),
            default_capabilities: &["routing", "delegation"],
        },
        RoleKind::Other => RoleProfile {
            display_name: "Agent",
            icon: "\u{25cf}",
            color_rgb: (160, 160, 170),
            default_capabilities: &[],
        },
    }
}

/// Derive a display name for an agent created without one.
///
/// Known roles use the profile's display name; unknown roles are
/// title-cased from the raw string so custom roles still read well.
pub fn default_name(role: &str) -> String {
    match RoleKind::parse(role) {
        RoleKind::Other => {
            let trimmed = role.trim();
            let mut chars = trimmed.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => "Agent".to_string(),
            }
        },
        _ => profile_for(role).display_name.to_string(),
    }
}

/// Minimum-count requirements per role, consumed by the validator.
///
/// The validator is policy-agnostic; this map is externally supplied data.
/// Role keys are compared case-insensitively against agent role strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePolicy {
    minimums: HashMap<String, usize>,
}

impl RolePolicy {
    /// An empty policy: no coverage requirements.
    pub fn empty() -> Self {
        Self {
            minimums: HashMap::new(),
        }
    }

    /// Require at least `count` agents with the given role.
    pub fn require(mut self, role: &str, count: usize) -> Self {
        self.minimums
            .insert(role.trim().to_ascii_lowercase(), count);
        self
    }

    /// Iterate (role, minimum) entries in a stable order.
    pub fn entries(&self) -> Vec<(&str, usize)> {
        let mut entries: Vec<(&str, usize)> = self
            .minimums
            .iter()
            .map(|(role, count)| (role.as_str(), *count))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl Default for RolePolicy {
    /// The demo policy: at least one planner and one executor.
    fn default() -> Self {
        Self::empty().require("planner", 1).require("executor", 1)
    }
}
