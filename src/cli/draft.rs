// Parsing editor-composed issue drafts

use serde_json::{json, Value};

/// A new issue composed in the editor: the first paragraph is the summary,
/// the rest is the description, and a trailing block of `$path: value`
/// lines overrides arbitrary creation fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueDraft {
    pub summary: String,
    pub description: String,
    pub fields: Vec<(String, String)>,
}

/// Split edited text into a draft. Returns `None` when nothing was written
/// (the user abandoned the draft).
pub fn parse_issue_draft(contents: &str) -> Option<IssueDraft> {
    let lines: Vec<&str> = contents.lines().collect();

    // Peel trailing "$path: value" overrides off the end first.
    let mut fields = Vec::new();
    let mut end = lines.len();
    while end > 0 {
        let line = lines[end - 1].trim();
        if line.is_empty() {
            end -= 1;
            continue;
        }
        match parse_field_line(line) {
            Some(field) => {
                fields.push(field);
                end -= 1;
            }
            None => break,
        }
    }
    fields.reverse();

    // The first paragraph is the summary; everything after the first blank
    // line is the description, blank lines and all.
    let body = &lines[..end];
    let start = body
        .iter()
        .position(|line| !line.trim().is_empty())
        .unwrap_or(body.len());
    let body = &body[start..];

    let (summary_lines, description_lines) =
        match body.iter().position(|line| line.trim().is_empty()) {
            Some(index) => (&body[..index], &body[index + 1..]),
            None => (body, &[][..]),
        };
    let summary = summary_lines.join("\n").trim().to_string();
    let description = description_lines.join("\n").trim().to_string();

    if summary.is_empty() && description.is_empty() && fields.is_empty() {
        return None;
    }

    Some(IssueDraft {
        summary,
        description,
        fields,
    })
}

fn parse_field_line(line: &str) -> Option<(String, String)> {
    let rest = line.strip_prefix('$')?;
    let (path, value) = rest.split_once(':')?;
    let path = path.trim();
    if path.is_empty() {
        return None;
    }
    Some((path.to_string(), value.trim().to_string()))
}

impl IssueDraft {
    /// Build the creation fields object for the tracker. Override paths use
    /// dots for nesting (`$issuetype.name: Bug`).
    pub fn into_fields(self, project: &str, kind: &str) -> Value {
        let mut fields = json!({
            "project": {"key": project},
            "summary": self.summary,
            "description": self.description,
            "issuetype": {"name": kind},
        });

        for (path, value) in &self.fields {
            set_path(&mut fields, path, value);
        }

        fields
    }
}

/// Set a dotted path inside a JSON object, creating intermediate objects.
fn set_path(value: &mut Value, path: &str, leaf: &str) {
    let mut current = value;
    let mut parts = path.split('.').peekable();
    while let Some(part) = parts.next() {
        let map = match current.as_object_mut() {
            Some(map) => map,
            None => return,
        };
        if parts.peek().is_none() {
            map.insert(part.to_string(), Value::String(leaf.to_string()));
            return;
        }
        current = map
            .entry(part.to_string())
            .or_insert_with(|| json!({}));
    }
}
