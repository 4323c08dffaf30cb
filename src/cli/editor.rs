// Composing free text in the user's editor

use std::env;
use std::fs;
use std::process::Command;

use crate::error::{Error, Result};

/// Open `$EDITOR` (falling back to vi) on a scratch file seeded with
/// `preface`, and return the edited contents with comment lines (leading
/// `#`) stripped.
pub fn edit_text(preface: &str, suffix: &str) -> Result<String> {
    let file = tempfile::Builder::new()
        .prefix("jita-")
        .suffix(suffix)
        .tempfile()
        .map_err(|e| Error::Input(format!("unable to create scratch file: {}", e)))?;

    if !preface.is_empty() {
        fs::write(file.path(), preface)
            .map_err(|e| Error::Input(format!("unable to seed scratch file: {}", e)))?;
    }

    let editor = env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
    let status = Command::new(&editor)
        .arg(file.path())
        .status()
        .map_err(|e| Error::Input(format!("unable to launch editor '{}': {}", editor, e)))?;
    if !status.success() {
        return Err(Error::Input(format!(
            "editor '{}' exited with {}",
            editor, status
        )));
    }

    let contents = fs::read_to_string(file.path())
        .map_err(|e| Error::Input(format!("unable to read scratch file: {}", e)))?;

    Ok(strip_comment_lines(&contents))
}

fn strip_comment_lines(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n")
}
