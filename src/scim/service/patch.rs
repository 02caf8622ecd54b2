//! SCIM patch interpreter
//!
//! Classifies each `{op, path, value}` into an explicit effect, then folds
//! the effects in array order into one merged update set. Unrecognized
//! combinations are a visible `Ignored` branch, not an error.

use crate::domain::scim::ScimPatchOperation;
use crate::domain::UserChanges;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
enum PatchEffect {
    SetActive(bool),
    SetUserName(String),
    SetName(String),
    SetEmail(String),
    /// `remove` on `active` forces deactivation; it does not toggle.
    ClearActive,
    /// Recognized-but-unsupported operation, applied as a no-op. This covers
    /// `add` (pass-through) and every unknown `(op, path)` pair.
    Ignored,
}

fn classify(operation: &ScimPatchOperation) -> PatchEffect {
    let value = operation.value.as_ref();
    match (
        operation.op.to_lowercase().as_str(),
        operation.path.as_deref(),
    ) {
        ("replace", Some("active")) => value
            .and_then(as_bool_lenient)
            .map(PatchEffect::SetActive)
            .unwrap_or(PatchEffect::Ignored),
        ("replace", Some("userName")) => value
            .and_then(Value::as_str)
            .map(|s| PatchEffect::SetUserName(s.to_string()))
            .unwrap_or(PatchEffect::Ignored),
        ("replace", Some("name.formatted")) => value
            .and_then(Value::as_str)
            .map(|s| PatchEffect::SetName(s.to_string()))
            .unwrap_or(PatchEffect::Ignored),
        ("replace", Some("emails[0].value")) => value
            .and_then(Value::as_str)
            .map(|s| PatchEffect::SetEmail(s.to_string()))
            .unwrap_or(PatchEffect::Ignored),
        ("remove", Some("active")) => PatchEffect::ClearActive,
        _ => PatchEffect::Ignored,
    }
}

/// Booleans arrive as `"True"`/`"False"` strings from some IdPs.
fn as_bool_lenient(value: &Value) -> Option<bool> {
    value.as_bool().or_else(|| {
        value
            .as_str()
            .and_then(|s| match s.to_ascii_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            })
    })
}

/// Fold an ordered operation list into one update set; later operations on
/// the same path win.
pub fn interpret(operations: &[ScimPatchOperation]) -> UserChanges {
    let mut changes = UserChanges::default();
    for operation in operations {
        match classify(operation) {
            PatchEffect::SetActive(active) => changes.active = Some(active),
            PatchEffect::SetUserName(user_name) => changes.user_name = Some(user_name),
            PatchEffect::SetName(name) => changes.name = Some(name),
            PatchEffect::SetEmail(email) => changes.email = Some(email),
            PatchEffect::ClearActive => changes.active = Some(false),
            PatchEffect::Ignored => {}
        }
    }
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn op(op: &str, path: Option<&str>, value: Option<serde_json::Value>) -> ScimPatchOperation {
        ScimPatchOperation {
            op: op.to_string(),
            path: path.map(str::to_string),
            value,
        }
    }

    #[test]
    fn test_replace_active() {
        let changes = interpret(&[op("replace", Some("active"), Some(serde_json::json!(false)))]);
        assert_eq!(changes.active, Some(false));
        assert!(changes.user_name.is_none());
    }

    #[test]
    fn test_replace_active_string_boolean() {
        let changes = interpret(&[op("replace", Some("active"), Some(serde_json::json!("False")))]);
        assert_eq!(changes.active, Some(false));

        let changes = interpret(&[op("replace", Some("active"), Some(serde_json::json!("True")))]);
        assert_eq!(changes.active, Some(true));
    }

    #[test]
    fn test_replace_op_case_insensitive() {
        let changes = interpret(&[op("Replace", Some("userName"), Some(serde_json::json!("new@example.com")))]);
        assert_eq!(changes.user_name.as_deref(), Some("new@example.com"));
    }

    #[test]
    fn test_replace_name_formatted_maps_to_name() {
        let changes = interpret(&[op(
            "replace",
            Some("name.formatted"),
            Some(serde_json::json!("New Name")),
        )]);
        assert_eq!(changes.name.as_deref(), Some("New Name"));
    }

    #[test]
    fn test_replace_first_email_maps_to_email() {
        let changes = interpret(&[op(
            "replace",
            Some("emails[0].value"),
            Some(serde_json::json!("fresh@example.com")),
        )]);
        assert_eq!(changes.email.as_deref(), Some("fresh@example.com"));
    }

    #[test]
    fn test_remove_active_forces_false() {
        let changes = interpret(&[op("remove", Some("active"), None)]);
        assert_eq!(changes.active, Some(false));
    }

    #[test]
    fn test_add_is_a_no_op() {
        let changes = interpret(&[op(
            "add",
            Some("userName"),
            Some(serde_json::json!("added@example.com")),
        )]);
        assert_eq!(changes, UserChanges::default());
    }

    #[test]
    fn test_unknown_path_ignored() {
        let changes = interpret(&[
            op("replace", Some("displayName"), Some(serde_json::json!("X"))),
            op("remove", Some("userName"), None),
            op("replace", None, Some(serde_json::json!({"active": false}))),
        ]);
        assert_eq!(changes, UserChanges::default());
    }

    #[test]
    fn test_wrong_value_type_ignored() {
        let changes = interpret(&[
            op("replace", Some("userName"), Some(serde_json::json!(42))),
            op("replace", Some("active"), Some(serde_json::json!("maybe"))),
            op("replace", Some("active"), None),
        ]);
        assert_eq!(changes, UserChanges::default());
    }

    #[test]
    fn test_later_operation_wins() {
        let changes = interpret(&[
            op("replace", Some("active"), Some(serde_json::json!(true))),
            op("replace", Some("active"), Some(serde_json::json!(false))),
        ]);
        assert_eq!(changes.active, Some(false));
    }

    #[test]
    fn test_operations_merge_into_one_change_set() {
        let changes = interpret(&[
            op("replace", Some("userName"), Some(serde_json::json!("merged@example.com"))),
            op("replace", Some("name.formatted"), Some(serde_json::json!("Merged User"))),
            op("add", Some("emails"), Some(serde_json::json!([{"value": "x"}]))),
            op("remove", Some("active"), None),
        ]);
        assert_eq!(
            changes,
            UserChanges {
                user_name: Some("merged@example.com".to_string()),
                name: Some("Merged User".to_string()),
                email: None,
                active: Some(false),
                external_id: None,
                keycloak_id: None,
            }
        );
    }
}
