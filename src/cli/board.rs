// Kanban board rendering

use std::collections::HashMap;

use comfy_table::presets;
use comfy_table::Table;

use crate::config::Stage;
use crate::error::{Error, Result};
use crate::tracker::types::Issue;

#[derive(Debug, Clone, Copy, Default)]
pub struct BoardOptions {
    /// Append issue summaries to the cells.
    pub show_summary: bool,
    /// Append assignee usernames to the cells.
    pub show_username: bool,
}

/// Column-major kanban data: one column per boarded stage, filled top-down.
///
/// The row count equals the largest number of issues sharing a single
/// stage; shorter columns pad with blank cells. Issues whose status has no
/// boarded stage do not appear.
#[derive(Debug)]
pub struct KanbanBoard {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl KanbanBoard {
    /// Build the board. Stages with `kanban_order == 0` stay off the board;
    /// the rest become columns ordered by `kanban_order`.
    pub fn build(
        issues: &[Issue],
        stages: &[Stage],
        active_key: Option<&str>,
        options: BoardOptions,
    ) -> Result<KanbanBoard> {
        let mut columns: Vec<&Stage> = stages.iter().filter(|s| s.kanban_order != 0).collect();
        if columns.is_empty() {
            return Err(Error::Config("kanban stages are not defined".to_string()));
        }
        columns.sort_by_key(|s| s.kanban_order);

        let mut buckets: HashMap<&str, Vec<&Issue>> = HashMap::new();
        for issue in issues {
            buckets
                .entry(issue.fields.status.name.as_str())
                .or_default()
                .push(issue);
        }

        let depth = columns
            .iter()
            .map(|stage| buckets.get(stage.name.as_str()).map_or(0, Vec::len))
            .max()
            .unwrap_or(0);

        let mut rows = Vec::with_capacity(depth);
        for row_index in 0..depth {
            let row = columns
                .iter()
                .map(|stage| {
                    buckets
                        .get(stage.name.as_str())
                        .and_then(|bucket| bucket.get(row_index))
                        .map(|issue| format_cell(issue, active_key, options))
                        .unwrap_or_default()
                })
                .collect();
            rows.push(row);
        }

        Ok(KanbanBoard {
            headers: columns.iter().map(|s| s.name.clone()).collect(),
            rows,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Render the board as an ASCII table.
    pub fn render(&self) -> String {
        let mut table = Table::new();
        table.load_preset(presets::ASCII_FULL);
        table.set_header(self.headers.clone());
        for row in &self.rows {
            table.add_row(row.clone());
        }
        table.to_string()
    }
}

fn format_cell(issue: &Issue, active_key: Option<&str>, options: BoardOptions) -> String {
    let mut cell = issue.key.clone();
    if active_key == Some(issue.key.as_str()) {
        cell.insert(0, '*');
    }
    if options.show_summary {
        cell.push(' ');
        cell.push_str(&issue.fields.summary);
    }
    if options.show_username {
        cell.push_str(&format!(" ({})", issue.assignee_name()));
    }
    cell
}
