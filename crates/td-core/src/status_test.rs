use super::*;

#[test]
fn test_codes_are_stable() {
    assert_eq!(TaskStatus::NeedsAction.code(), 0);
    assert_eq!(TaskStatus::InProcess.code(), 1);
    assert_eq!(TaskStatus::Completed.code(), 2);
    assert_eq!(TaskStatus::Cancelled.code(), 3);
}

#[test]
fn test_from_code_roundtrips_known_codes() {
    for status in TaskStatus::ALL {
        assert_eq!(TaskStatus::from_code(status.code()).unwrap(), status);
    }
}

#[test]
fn test_from_code_rejects_unknown() {
    let err = TaskStatus::from_code(9).unwrap_err();
    assert!(err.to_string().contains("C005"));
}

#[test]
fn test_derived_flags() {
    assert!(TaskStatus::NeedsAction.is_new());
    assert!(!TaskStatus::NeedsAction.is_closed());

    assert!(!TaskStatus::InProcess.is_new());
    assert!(!TaskStatus::InProcess.is_closed());

    assert!(!TaskStatus::Completed.is_new());
    assert!(TaskStatus::Completed.is_closed());

    assert!(!TaskStatus::Cancelled.is_new());
    assert!(TaskStatus::Cancelled.is_closed());
}

#[test]
fn test_default_is_needs_action() {
    assert_eq!(TaskStatus::default(), TaskStatus::NeedsAction);
}

#[test]
fn test_serde_names() {
    let yaml = serde_yaml::to_string(&TaskStatus::InProcess).unwrap();
    assert_eq!(yaml.trim(), "IN_PROCESS");
    let parsed: TaskStatus = serde_yaml::from_str("CANCELLED").unwrap();
    assert_eq!(parsed, TaskStatus::Cancelled);
}
