// Workflow-stage ordering for issue lists

use log::warn;

use crate::config::Stage;
use crate::tracker::types::Issue;

/// Display order for a remote status name.
///
/// With no stages configured every status is order 1 (configuration-free
/// installs keep the tracker's own ordering). A status absent from the
/// configured stages takes order -1 and is logged once per lookup.
pub fn status_order(stages: &[Stage], status: &str) -> i64 {
    if stages.is_empty() {
        return 1;
    }

    for stage in stages {
        if stage.name == status {
            return stage.order;
        }
    }

    warn!("unknown workflow stage: {}", status);
    -1
}

/// True when a configured stage hides its issues from the plain list.
pub fn is_hidden(stages: &[Stage], status: &str) -> bool {
    stages.iter().any(|s| s.name == status && s.order == -1)
}

/// Sort issues by their stage's display order. Unrecognized statuses sort
/// after every recognized one; ties keep the tracker's order (stable sort).
pub fn sort_by_stage(issues: Vec<Issue>, stages: &[Stage]) -> Vec<Issue> {
    let mut keyed: Vec<(i64, Issue)> = issues
        .into_iter()
        .map(|issue| {
            let order = status_order(stages, &issue.fields.status.name);
            (order, issue)
        })
        .collect();

    keyed.sort_by_key(|entry| (entry.0 < 0, entry.0));

    keyed.into_iter().map(|(_, issue)| issue).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::types::test_issue;

    fn stages() -> Vec<Stage> {
        vec![
            Stage {
                name: "Open".to_string(),
                order: 1,
                kanban_order: 0,
                template: None,
            },
            Stage {
                name: "In Progress".to_string(),
                order: 2,
                kanban_order: 0,
                template: None,
            },
            Stage {
                name: "Backlog".to_string(),
                order: -1,
                kanban_order: 0,
                template: None,
            },
        ]
    }

    #[test]
    fn test_status_order() {
        let stages = stages();
        assert_eq!(status_order(&stages, "Open"), 1);
        assert_eq!(status_order(&stages, "In Progress"), 2);
        assert_eq!(status_order(&stages, "Reviewing"), -1);
    }

    #[test]
    fn test_status_order_without_configuration() {
        assert_eq!(status_order(&[], "Anything"), 1);
    }

    #[test]
    fn test_unknown_statuses_sort_last() {
        let stages = stages();
        let issues = vec![
            test_issue("PROJ-1", "Reviewing", "", ""),
            test_issue("PROJ-2", "In Progress", "", ""),
            test_issue("PROJ-3", "Open", "", ""),
        ];

        let sorted = sort_by_stage(issues, &stages);
        let keys: Vec<&str> = sorted.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["PROJ-3", "PROJ-2", "PROJ-1"]);
    }

    #[test]
    fn test_sort_is_stable_within_a_stage() {
        let stages = stages();
        let issues = vec![
            test_issue("PROJ-1", "Open", "", ""),
            test_issue("PROJ-2", "Open", "", ""),
            test_issue("PROJ-3", "Open", "", ""),
        ];

        let sorted = sort_by_stage(issues, &stages);
        let keys: Vec<&str> = sorted.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["PROJ-1", "PROJ-2", "PROJ-3"]);
    }

    #[test]
    fn test_hidden_stage() {
        let stages = stages();
        assert!(is_hidden(&stages, "Backlog"));
        assert!(!is_hidden(&stages, "Open"));
        // Unknown statuses are flagged, not hidden.
        assert!(!is_hidden(&stages, "Reviewing"));
    }
}
