// Wire types for the tracker's REST API

use serde::Deserialize;

/// One issue, as returned by the search and issue endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub key: String,
    #[serde(default)]
    pub fields: Fields,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Fields {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub assignee: Option<Assignee>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Status {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Assignee {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "displayName")]
    pub display_name: String,
}

impl Issue {
    /// Assignee username, empty for unassigned issues.
    pub fn assignee_name(&self) -> &str {
        self.fields.assignee.as_ref().map_or("", |a| a.name.as_str())
    }

    /// Assignee display name, empty for unassigned issues.
    pub fn assignee_display_name(&self) -> &str {
        self.fields
            .assignee
            .as_ref()
            .map_or("", |a| a.display_name.as_str())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub issues: Vec<Issue>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TransitionList {
    #[serde(default)]
    pub transitions: Vec<Transition>,
}

/// A workflow transition the issue can take from its current status.
#[derive(Debug, Clone, Deserialize)]
pub struct Transition {
    pub id: String,
    pub to: TransitionTarget,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransitionTarget {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CommentList {
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    pub id: String,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub updated: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Author {
    #[serde(default, rename = "displayName")]
    pub display_name: String,
}

impl Comment {
    pub fn author_display_name(&self) -> &str {
        self.author.as_ref().map_or("", |a| a.display_name.as_str())
    }
}

/// The authenticated user, from the myself endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub name: String,
    #[serde(default, rename = "displayName")]
    pub display_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub key: String,
    #[serde(default)]
    pub name: String,
}

/// Reply to issue creation; only the assigned key matters here.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedIssue {
    pub key: String,
}

/// Build an issue without going through the wire, for rendering tests.
#[cfg(test)]
pub fn test_issue(key: &str, status: &str, summary: &str, assignee: &str) -> Issue {
    Issue {
        key: key.to_string(),
        fields: Fields {
            summary: summary.to_string(),
            status: Status {
                name: status.to_string(),
            },
            assignee: if assignee.is_empty() {
                None
            } else {
                Some(Assignee {
                    name: assignee.to_string(),
                    display_name: format!("{} Display", assignee),
                })
            },
            description: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_search_results() {
        let json = r#"{
            "startAt": 0,
            "maxResults": 10,
            "total": 2,
            "issues": [
                {
                    "key": "PROJ-1",
                    "fields": {
                        "summary": "Fix the frobnicator",
                        "status": {"name": "Open"},
                        "assignee": {"name": "jdoe", "displayName": "Jane Doe"}
                    }
                },
                {
                    "key": "PROJ-2",
                    "fields": {
                        "summary": "Unassigned work",
                        "status": {"name": "In Progress"},
                        "assignee": null
                    }
                }
            ]
        }"#;

        let results: SearchResults = serde_json::from_str(json).unwrap();
        assert_eq!(results.issues.len(), 2);

        let first = &results.issues[0];
        assert_eq!(first.key, "PROJ-1");
        assert_eq!(first.fields.status.name, "Open");
        assert_eq!(first.assignee_name(), "jdoe");
        assert_eq!(first.assignee_display_name(), "Jane Doe");

        assert_eq!(results.issues[1].assignee_name(), "");
    }

    #[test]
    fn test_deserialize_transitions_and_comments() {
        let transitions: TransitionList = serde_json::from_str(
            r#"{"transitions": [{"id": "21", "to": {"name": "Done"}}]}"#,
        )
        .unwrap();
        assert_eq!(transitions.transitions[0].id, "21");
        assert_eq!(transitions.transitions[0].to.name, "Done");

        let comments: CommentList = serde_json::from_str(
            r#"{"comments": [{
                "id": "10045",
                "author": {"displayName": "Jane Doe"},
                "updated": "2026-07-01T10:00:00.000+0000",
                "body": "looks good"
            }]}"#,
        )
        .unwrap();
        assert_eq!(comments.comments[0].author_display_name(), "Jane Doe");
        assert_eq!(comments.comments[0].body, "looks good");
    }

    #[test]
    fn test_deserialize_issue_without_description() {
        let issue: Issue = serde_json::from_str(
            r#"{"key": "PROJ-9", "fields": {"summary": "s", "status": {"name": "Open"}}}"#,
        )
        .unwrap();
        assert!(issue.fields.description.is_none());
    }
}
