/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! End-to-end scenarios over the public editor surface.

use flowcanvas::{
    AgentStatus, ConnectionKind, InteractionController, Notifier, PointerButton, RolePolicy,
    snapshot, validate_flow,
};

/// Notifier that drops notices; scenarios assert on state, not toasts.
struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&mut self, _message: &str) {}
}

fn editor_with_demo_flow() -> (
    InteractionController,
    uuid::Uuid,
    uuid::Uuid,
    uuid::Uuid,
) {
    let mut editor = InteractionController::new(Box::new(SilentNotifier));
    let planner = editor
        .graph_mut()
        .add_agent_named("planner", 150.0, 150.0, Some("P1".to_string()));
    let executor = editor
        .graph_mut()
        .add_agent_named("executor", 350.0, 150.0, Some("E1".to_string()));
    let evaluator = editor
        .graph_mut()
        .add_agent_named("evaluator", 250.0, 300.0, Some("V1".to_string()));
    (editor, planner, executor, evaluator)
}

#[test]
fn fresh_demo_flow_warns_about_all_three_agents_scenario() {
    let (editor, _, _, _) = editor_with_demo_flow();

    let report = validate_flow(editor.graph(), &RolePolicy::default());

    assert!(report.is_valid);
    assert!(report.errors.is_empty());
    let warnings: Vec<String> = report.warnings.iter().map(|w| w.to_string()).collect();
    assert_eq!(warnings.len(), 3);
    for name in ["P1", "E1", "V1"] {
        assert!(warnings.contains(&format!("Agent {name} is not connected")));
    }
}

#[test]
fn connecting_planner_to_executor_narrows_warnings_scenario() {
    let (mut editor, planner, _, _) = editor_with_demo_flow();

    // Connect through the interaction surface: choose a source, click the
    // target.
    editor.begin_connection(planner);
    editor.pointer_down(350.0, 150.0, PointerButton::Left);

    let report = validate_flow(editor.graph(), &RolePolicy::default());

    assert!(report.is_valid);
    assert!(report.errors.is_empty());
    let warnings: Vec<String> = report.warnings.iter().map(|w| w.to_string()).collect();
    assert_eq!(warnings, vec!["Agent V1 is not connected".to_string()]);
}

#[test]
fn removing_planner_and_executor_breaks_role_coverage_scenario() {
    let (mut editor, planner, executor, _) = editor_with_demo_flow();

    editor.graph_mut().remove_agent(planner);
    editor.graph_mut().remove_agent(executor);

    let report = validate_flow(editor.graph(), &RolePolicy::default());

    assert!(!report.is_valid);
    let errors: Vec<String> = report.errors.iter().map(|e| e.to_string()).collect();
    assert!(errors.contains(&"Missing planner".to_string()));
    assert!(errors.contains(&"Missing executor".to_string()));
}

#[test]
fn cycle_appears_and_disappears_with_closing_edge_scenario() {
    let (mut editor, planner, executor, evaluator) = editor_with_demo_flow();

    editor.create_connection(planner, executor, ConnectionKind::Data);
    editor.create_connection(executor, evaluator, ConnectionKind::Data);
    editor.create_connection(evaluator, planner, ConnectionKind::Data);

    let report = validate_flow(editor.graph(), &RolePolicy::default());
    assert!(!report.is_valid);
    assert!(
        report
            .errors
            .iter()
            .any(|e| e.to_string() == "Flow contains a cycle")
    );

    let closing = editor
        .graph()
        .find_connection(evaluator, planner)
        .unwrap()
        .id;
    editor.remove_connection(closing);

    let report = validate_flow(editor.graph(), &RolePolicy::default());
    assert!(report.is_valid);
    assert!(report.errors.is_empty());
}

#[test]
fn full_editing_session_scenario() {
    let mut editor = InteractionController::new(Box::new(SilentNotifier));

    // Build a small flow by hand.
    let planner = editor.graph_mut().add_agent("planner", 100.0, 100.0);
    let executor = editor.graph_mut().add_agent("executor", 400.0, 100.0);
    editor.create_connection(planner, executor, ConnectionKind::Data);

    // Drag the executor somewhere else.
    editor.pointer_down(400.0, 100.0, PointerButton::Left);
    editor.pointer_move(420.0, 240.0);
    editor.pointer_up();
    assert_eq!(
        editor.graph().agent(executor).unwrap().position.y,
        240.0
    );

    // Pan and zoom the view; the model is untouched.
    editor.pointer_down(700.0, 500.0, PointerButton::Left);
    editor.pointer_move(650.0, 480.0);
    editor.pointer_up();
    editor.wheel(-1.0, 300.0, 200.0);
    assert_eq!(editor.graph().agent_count(), 2);

    // A status feed marks the executor active.
    editor.graph_mut().set_status(executor, AgentStatus::Active);

    // Undo the connection, then bring it back.
    let connection_id = editor.graph().find_connection(planner, executor).unwrap().id;
    assert!(editor.undo());
    assert!(editor.graph().connection(connection_id).is_none());
    assert!(editor.redo());
    assert_eq!(
        editor.graph().connection(connection_id).unwrap().source,
        planner
    );

    // Export, wipe, re-import: structure and ids survive; the executor is
    // still where the drag left it and still active.
    let json = snapshot::to_json(&snapshot::export(editor.graph())).unwrap();
    let decoded = snapshot::from_json(&json).unwrap();
    snapshot::import(&decoded, editor.graph_mut()).unwrap();

    let restored = editor.graph().agent(executor).unwrap();
    assert_eq!(restored.position.y, 240.0);
    assert_eq!(restored.status, AgentStatus::Active);
    assert!(editor.graph().connection(connection_id).is_some());
}

#[test]
fn duplicate_agent_keeps_flow_valid_scenario() {
    let (mut editor, planner, executor, _) = editor_with_demo_flow();
    editor.create_connection(planner, executor, ConnectionKind::Data);

    let copy = editor.graph_mut().duplicate_agent(executor).unwrap();

    // The copy arrives disconnected and offset; validation only gains one
    // warning for it.
    let report = validate_flow(editor.graph(), &RolePolicy::default());
    assert!(report.is_valid);
    let copy_agent = editor.graph().agent(copy).unwrap();
    assert_eq!(copy_agent.name, "E1 (copy)");
    assert!(
        report
            .warnings
            .iter()
            .any(|w| w.to_string() == "Agent E1 (copy) is not connected")
    );
}
