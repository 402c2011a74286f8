// ABOUTME: Tests for run state types - terminality, display, and the
// ABOUTME: serde wire shapes.

use super::*;

#[test]
fn test_terminal_states() {
    assert!(!RunState::Created.is_terminal());
    assert!(!RunState::Queued.is_terminal());
    assert!(!RunState::InProgress.is_terminal());
    assert!(!RunState::RequiresAction { calls: vec![] }.is_terminal());
    assert!(RunState::Completed.is_terminal());
    assert!(RunState::Failed {
        message: "boom".into()
    }
    .is_terminal());
    assert!(RunState::Cancelled.is_terminal());
    assert!(RunState::TimedOut.is_terminal());
}

#[test]
fn test_run_state_serde_tagging() {
    let state: RunState = serde_json::from_value(serde_json::json!({
        "status": "requires_action",
        "calls": [
            {"id": "call_1", "name": "health_check", "arguments": {}}
        ]
    }))
    .unwrap();

    match state {
        RunState::RequiresAction { calls } => {
            assert_eq!(calls.len(), 1);
            assert_eq!(calls[0].name, "health_check");
        }
        other => panic!("expected requires_action, got {other}"),
    }

    let json = serde_json::to_value(RunState::Failed {
        message: "model overloaded".into(),
    })
    .unwrap();
    assert_eq!(json["status"], "failed");
    assert_eq!(json["message"], "model overloaded");
}

#[test]
fn test_tool_call_arguments_default_to_null() {
    let call: ToolCallRequest =
        serde_json::from_value(serde_json::json!({"id": "c1", "name": "noop"})).unwrap();
    assert!(call.arguments.is_null());
}

#[test]
fn test_tool_output_error_shape() {
    let output = ToolOutput::error("call_9", "no handler for tool lookup");
    assert_eq!(output.call_id, "call_9");
    assert_eq!(
        output.output,
        serde_json::json!({ "error": "no handler for tool lookup" })
    );
}

#[test]
fn test_thread_message_constructors() {
    let m = ThreadMessage::assistant("healthy");
    assert_eq!(m.role, Role::Assistant);
    assert_eq!(m.content, "healthy");
    assert_eq!(ThreadMessage::user("hi").role, Role::User);
}

#[test]
fn test_display_mentions_call_count() {
    let state = RunState::RequiresAction {
        calls: vec![
            ToolCallRequest {
                id: "a".into(),
                name: "x".into(),
                arguments: serde_json::Value::Null,
            },
            ToolCallRequest {
                id: "b".into(),
                name: "y".into(),
                arguments: serde_json::Value::Null,
            },
        ],
    };
    assert_eq!(state.to_string(), "requires_action (2 calls)");
}
