// Text rendering for issue lists, details, transitions and comments

use minijinja::{context, Environment};

use crate::config::Workflow;
use crate::error::{Error, Result};
use crate::tracker::types::{Comment, Issue, Transition};
use crate::workflow;

/// Row template used when a stage does not configure its own.
const DEFAULT_ROW_TEMPLATE: &str = "{{ mark }}{{ key }}\t{{ stage }}\t{{ name }}\t{{ summary }}";

const DEFAULT_TEMPLATE_NAME: &str = "default";

/// Render issues as aligned rows, one per issue.
///
/// The active issue is marked with `*`. Issues in a configured stage with
/// order -1 are dropped. A stage's own template (when configured) replaces
/// the default row for its issues; rows are tab-separated and aligned into
/// columns afterwards.
pub fn format_issue_list(
    issues: &[Issue],
    workflow_config: &Workflow,
    active_key: Option<&str>,
    show_username: bool,
) -> Result<String> {
    let mut env = Environment::new();
    env.add_template(DEFAULT_TEMPLATE_NAME, DEFAULT_ROW_TEMPLATE)
        .map_err(|e| Error::Config(format!("invalid default row template: {}", e)))?;
    for stage in &workflow_config.stages {
        if let Some(template) = &stage.template {
            env.add_template_owned(stage.name.clone(), template.clone())
                .map_err(|e| {
                    Error::Config(format!(
                        "invalid template for stage '{}': {}",
                        stage.name, e
                    ))
                })?;
        }
    }

    let mut rows = Vec::new();
    for issue in issues {
        let status = issue.fields.status.name.as_str();
        if workflow::is_hidden(&workflow_config.stages, status) {
            continue;
        }

        let is_active = active_key == Some(issue.key.as_str());
        let mark = if is_active { "* " } else { "" };
        let name = if show_username {
            issue.assignee_name()
        } else {
            issue.assignee_display_name()
        };

        let template_name = workflow_config
            .stage(status)
            .filter(|stage| stage.template.is_some())
            .map_or(DEFAULT_TEMPLATE_NAME, |stage| stage.name.as_str());
        let template = env.get_template(template_name).map_err(|e| {
            Error::Config(format!("unable to load template '{}': {}", template_name, e))
        })?;

        let row = template
            .render(context! {
                is_active => is_active,
                mark => mark,
                key => issue.key,
                stage => status,
                name => name,
                assignee_name => issue.assignee_name(),
                assignee_display_name => issue.assignee_display_name(),
                summary => issue.fields.summary,
            })
            .map_err(|e| {
                Error::Config(format!(
                    "unable to render template '{}': {}",
                    template_name, e
                ))
            })?;
        rows.push(row);
    }

    Ok(align_columns(&rows))
}

/// Align tab-separated rows into padded columns with a two-space gutter.
fn align_columns(rows: &[String]) -> String {
    let split: Vec<Vec<&str>> = rows.iter().map(|row| row.split('\t').collect()).collect();

    let columns = split.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for row in &split {
        for (index, cell) in row.iter().enumerate() {
            widths[index] = widths[index].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for row in &split {
        let mut line = String::new();
        for (index, cell) in row.iter().enumerate() {
            line.push_str(cell);
            if index + 1 < row.len() {
                let padding = widths[index].saturating_sub(cell.chars().count()) + 2;
                line.extend(std::iter::repeat(' ').take(padding));
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Single-issue detail view.
pub fn format_issue_detail(issue: &Issue) -> String {
    let description = issue
        .fields
        .description
        .as_deref()
        .filter(|d| !d.is_empty())
        .unwrap_or("<no description>");

    format!(
        "Issue:    {}\nAssignee: {}\nStatus:   {}\nSummary:  {}\n\n{}\n",
        issue.key,
        issue.assignee_display_name(),
        issue.fields.status.name,
        issue.fields.summary,
        description
    )
}

pub fn format_transitions(transitions: &[Transition]) -> String {
    let mut out = String::new();
    for transition in transitions {
        out.push_str(&format!("{:>3} {}\n", transition.id, transition.to.name));
    }
    out
}

pub fn format_comments(comments: &[Comment]) -> String {
    let mut out = String::new();
    for comment in comments {
        out.push_str("\n################\n");
        out.push_str(&format!("ID:      {}\n", comment.id));
        out.push_str(&format!("Author:  {}\n", comment.author_display_name()));
        out.push_str(&format!("Updated: {}\n", comment.updated));
        out.push_str(&format!("Comment:\n{}\n", comment.body));
    }
    out
}

/// Terminal width for list truncation, with the COLUMNS fallback most
/// shells export and a reasonable default.
pub fn terminal_width() -> usize {
    if let Some((terminal_size::Width(w), _)) = terminal_size::terminal_size() {
        if w > 0 {
            return w as usize;
        }
    }

    if let Ok(columns) = std::env::var("COLUMNS") {
        if let Ok(width) = columns.parse::<usize>() {
            if width > 0 && width < 10000 {
                return width;
            }
        }
    }

    120
}

/// Truncate each line of `text` to `width` characters.
pub fn fit_to_width(text: &str, width: usize) -> String {
    let mut out = String::new();
    for line in text.lines() {
        out.extend(line.chars().take(width));
        out.push('\n');
    }
    out
}
