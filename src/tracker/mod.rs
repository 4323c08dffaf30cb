//! Blocking client for the tracker's REST API (Jira API v2).
//!
//! Every operation is one synchronous request; failures surface immediately
//! as `Error::Tracker` and nothing is retried.

pub mod types;

pub use types::{Comment, CreatedIssue, Issue, Project, Transition, User};

use log::debug;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::config::Config;
use crate::error::{Error, Result};

/// Fields requested for list views; keeps search replies small.
const SEARCH_FIELDS: &str = "key,summary,status,assignee";

/// How much of an error body to quote back to the user.
const ERROR_BODY_LIMIT: usize = 300;

pub struct TrackerClient {
    http: Client,
    base_url: String,
    username: String,
    password: String,
}

impl TrackerClient {
    pub fn new(config: &Config) -> Result<TrackerClient> {
        let http = Client::builder()
            .build()
            .map_err(|e| Error::Tracker(format!("unable to build HTTP client: {}", e)))?;

        Ok(TrackerClient {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    /// Search issues with a raw JQL expression.
    pub fn search(&self, jql: &str, limit: u32) -> Result<Vec<Issue>> {
        let url = self.search_url(jql, limit);
        let results: types::SearchResults = self.get_json(&url)?;
        Ok(results.issues)
    }

    /// Issues in `project` assigned to `assignee`, most recently updated
    /// first.
    pub fn search_assigned(&self, project: &str, assignee: &str, limit: u32) -> Result<Vec<Issue>> {
        let jql = format!(
            "project = {} AND assignee = {} ORDER BY updated DESC",
            project, assignee
        );
        self.search(&jql, limit)
    }

    /// Issues matched by a saved filter.
    pub fn search_filter(&self, filter_id: u64, limit: u32) -> Result<Vec<Issue>> {
        self.search(&format!("filter = {}", filter_id), limit)
    }

    pub fn issue(&self, key: &str) -> Result<Issue> {
        self.get_json(&self.url(&format!("issue/{}", key)))
    }

    pub fn transitions(&self, key: &str) -> Result<Vec<Transition>> {
        let list: types::TransitionList =
            self.get_json(&self.url(&format!("issue/{}/transitions", key)))?;
        Ok(list.transitions)
    }

    pub fn transition(&self, key: &str, transition_id: &str) -> Result<()> {
        let body = json!({"transition": {"id": transition_id}});
        self.send(
            self.http
                .post(self.url(&format!("issue/{}/transitions", key)))
                .json(&body),
        )?;
        Ok(())
    }

    pub fn comments(&self, key: &str) -> Result<Vec<Comment>> {
        let list: types::CommentList =
            self.get_json(&self.url(&format!("issue/{}/comment", key)))?;
        Ok(list.comments)
    }

    pub fn add_comment(&self, key: &str, body: &str) -> Result<()> {
        let payload = json!({"body": body});
        self.send(
            self.http
                .post(self.url(&format!("issue/{}/comment", key)))
                .json(&payload),
        )?;
        Ok(())
    }

    pub fn delete_comment(&self, key: &str, comment_id: u64) -> Result<()> {
        self.send(
            self.http
                .delete(self.url(&format!("issue/{}/comment/{}", key, comment_id))),
        )?;
        Ok(())
    }

    pub fn assign(&self, key: &str, username: &str) -> Result<()> {
        let body = json!({"name": username});
        self.send(
            self.http
                .put(self.url(&format!("issue/{}/assignee", key)))
                .json(&body),
        )?;
        Ok(())
    }

    pub fn set_summary(&self, key: &str, summary: &str) -> Result<()> {
        let body = json!({"fields": {"summary": summary}});
        self.send(
            self.http
                .put(self.url(&format!("issue/{}", key)))
                .json(&body),
        )?;
        Ok(())
    }

    pub fn delete_issue(&self, key: &str) -> Result<()> {
        self.send(self.http.delete(self.url(&format!("issue/{}", key))))?;
        Ok(())
    }

    /// Record time worked on an issue. `time_spent` uses the tracker's
    /// duration format ("2h 5m"); the comment may be empty.
    pub fn add_worklog(&self, key: &str, time_spent: &str, comment: &str) -> Result<()> {
        let body = json!({"timeSpent": time_spent, "comment": comment});
        self.send(
            self.http
                .post(self.url(&format!("issue/{}/worklog", key)))
                .json(&body),
        )?;
        Ok(())
    }

    /// The authenticated user.
    pub fn myself(&self) -> Result<User> {
        self.get_json(&self.url("myself"))
    }

    /// Projects visible to the authenticated user.
    pub fn projects(&self) -> Result<Vec<Project>> {
        self.get_json(&self.url("project"))
    }

    /// Create an issue from a prebuilt fields object.
    pub fn create_issue(&self, fields: serde_json::Value) -> Result<CreatedIssue> {
        let body = json!({"fields": fields});
        let response = self.send(self.http.post(self.url("issue")).json(&body))?;
        response.json().map_err(Error::from)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/rest/api/2/{}", self.base_url, path)
    }

    fn search_url(&self, jql: &str, limit: u32) -> String {
        format!(
            "{}?jql={}&fields={}&maxResults={}",
            self.url("search"),
            urlencoding::encode(jql),
            SEARCH_FIELDS,
            limit
        )
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.send(self.http.get(url))?;
        response.json().map_err(Error::from)
    }

    fn send(&self, request: RequestBuilder) -> Result<Response> {
        let request = request
            .basic_auth(&self.username, Some(&self.password))
            .build()?;
        debug!("{} {}", request.method(), request.url());

        let response = self.http.execute(request)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let mut body = response.text().unwrap_or_default();
        if body.len() > ERROR_BODY_LIMIT {
            let cut = (0..=ERROR_BODY_LIMIT)
                .rev()
                .find(|&i| body.is_char_boundary(i))
                .unwrap_or(0);
            body.truncate(cut);
            body.push_str("...");
        }
        let body = body.trim();

        Err(Error::Tracker(if body.is_empty() {
            format!("request failed with {}", status)
        } else {
            format!("request failed with {}: {}", status, body)
        }))
    }
}
