use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::cli::board::{BoardOptions, KanbanBoard};
use crate::cli::{draft, editor, output};
use crate::config::{Config, Workflow};
use crate::error::Error;
use crate::session::{HookRunner, MarkerStore, SessionTracker, StopOutcome};
use crate::tracker::TrackerClient;
use crate::workflow;

const CREATE_PREFACE: &str = "\n\n\
# Write a summary & description for this issue.\n\
# The first line of text is the summary and the rest is description.\n\
# Trailing lines of the form `$field.path: value` override creation fields.\n";

#[derive(Parser)]
#[command(name = "jita")]
#[command(about = "Jira Issue and Time Assistant - work with tracker issues and time from the terminal")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Path to the configuration file (defaults to ~/.jita/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Project key, overriding the configured one
    #[arg(short = 'p', long, global = true, value_name = "KEY")]
    pub project: Option<String>,

    /// Replace the configured workflow with one loaded from this TOML file
    #[arg(long, global = true, value_name = "PATH")]
    pub workflow: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List issues, or show one issue in detail
    List {
        /// Issue key to show in detail
        key: Option<String>,
        /// Render the list as a kanban board
        #[arg(short = 'k', long)]
        kanban: bool,
        /// Limit the number of issues fetched
        #[arg(short = 'c', long, default_value_t = 10)]
        count: u32,
        /// Search with a saved filter instead of the default assignee query
        #[arg(short = 'f', long, value_name = "ID")]
        filter: Option<u64>,
        /// Show assignee usernames instead of display names
        #[arg(short = 'w', long)]
        names: bool,
        /// Include issue summaries in kanban cells
        #[arg(long)]
        summary: bool,
    },
    /// Start tracking time on an issue
    Start {
        /// Issue key (bare numbers take the configured project prefix)
        key: String,
    },
    /// Stop tracking the active issue and log the time worked
    #[command(visible_alias = "terminate")]
    Stop,
    /// Apply a transition, or list the available ones
    Move {
        key: String,
        /// Transition id; omit to list what is available
        transition: Option<String>,
    },
    /// Assign an issue to the configured user
    Assign { key: String },
    /// Work with issue comments
    Comment {
        #[command(subcommand)]
        subcommand: CommentCommands,
    },
    /// Change an issue summary
    Rename {
        key: String,
        /// New title; `s/pattern/replacement/` rewrites the current one
        title: String,
    },
    /// Delete an issue
    Delete { key: String },
    /// Create an issue, composing summary and description in $EDITOR
    Create {
        /// Issue type
        #[arg(long, default_value = "Task")]
        kind: String,
    },
    /// List projects visible to the configured user
    Projects,
}

#[derive(Subcommand)]
pub enum CommentCommands {
    /// Compose a comment in $EDITOR and add it
    Add { key: String },
    /// List comments
    List { key: String },
    /// Delete a comment by id
    Delete { key: String, comment_id: String },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::default_path()?,
    };
    let mut config = Config::load(&config_path)?;

    if let Some(project) = &cli.project {
        config.project = project.clone();
    }
    if let Some(path) = &cli.workflow {
        config.workflow = Workflow::load(path)?;
    }

    handle_command(cli.command, &config)
}

fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::List {
            key,
            kanban,
            count,
            filter,
            names,
            summary,
        } => handle_list(config, key, kanban, count, filter, names, summary),
        Commands::Start { key } => handle_start(config, &key),
        Commands::Stop => handle_stop(config),
        Commands::Move { key, transition } => handle_move(config, &key, transition),
        Commands::Assign { key } => handle_assign(config, &key),
        Commands::Comment { subcommand } => handle_comment(config, subcommand),
        Commands::Rename { key, title } => handle_rename(config, &key, &title),
        Commands::Delete { key } => handle_delete(config, &key),
        Commands::Create { kind } => handle_create(config, &kind),
        Commands::Projects => handle_projects(config),
    }
}

fn session_tracker(config: &Config) -> Result<SessionTracker> {
    let marker = MarkerStore::open(MarkerStore::default_dir()?)?;
    Ok(SessionTracker::new(marker, HookRunner::new(config)))
}

/// Qualify a bare issue number with the configured project key.
fn qualified_key(config: &Config, key: &str) -> Result<String, Error> {
    if key.contains('-') {
        return Ok(key.to_string());
    }
    if config.project.is_empty() {
        return Err(Error::Input(format!(
            "issue '{}' has no project prefix; set project in the config or pass -p",
            key
        )));
    }
    Ok(format!("{}-{}", config.project, key))
}

fn require_project(config: &Config) -> Result<&str, Error> {
    if config.project.is_empty() {
        return Err(Error::Input(
            "project name is empty; set it in the config or pass -p".to_string(),
        ));
    }
    Ok(&config.project)
}

fn handle_list(
    config: &Config,
    key: Option<String>,
    kanban: bool,
    count: u32,
    filter: Option<u64>,
    names: bool,
    summary: bool,
) -> Result<()> {
    let client = TrackerClient::new(config)?;

    if let Some(key) = key {
        let issue = client.issue(&qualified_key(config, &key)?)?;
        print!("{}", output::format_issue_detail(&issue));
        return Ok(());
    }

    let marker = MarkerStore::open(MarkerStore::default_dir()?)?;
    let active_key = marker.active()?.map(|session| session.key);

    let issues = match filter.or(config.filter_id) {
        Some(filter_id) => client.search_filter(filter_id, count)?,
        None => {
            let project = require_project(config)?;
            let me = client.myself()?;
            client.search_assigned(project, &me.name, count)?
        }
    };

    if kanban {
        let board = KanbanBoard::build(
            &issues,
            &config.workflow.stages,
            active_key.as_deref(),
            BoardOptions {
                show_summary: summary,
                show_username: names,
            },
        )?;
        println!("{}", board.render());
        return Ok(());
    }

    let sorted = workflow::sort_by_stage(issues, &config.workflow.stages);
    let text =
        output::format_issue_list(&sorted, &config.workflow, active_key.as_deref(), names)?;
    if io::stdout().is_terminal() {
        print!("{}", output::fit_to_width(&text, output::terminal_width()));
    } else {
        print!("{}", text);
    }
    Ok(())
}

fn handle_start(config: &Config, key: &str) -> Result<()> {
    let key = qualified_key(config, key)?;
    session_tracker(config)?.start(&key)?;
    println!("Issue {} started", key);
    Ok(())
}

fn handle_stop(config: &Config) -> Result<()> {
    let client = TrackerClient::new(config)?;
    let session = session_tracker(config)?;

    let stdin = io::stdin();
    let outcome = session.stop(
        stdin.lock(),
        io::stdout(),
        |key| editor::edit_text("", &format!("-{}-worklog.txt", key)),
        |key, entry| client.add_worklog(key, &entry.duration, &entry.comment),
    )?;

    match outcome {
        StopOutcome::Logged { key, .. } => println!("Issue {} stopped", key),
        StopOutcome::Skipped { key, .. } => {
            println!("Issue {} stopped without logging", key)
        }
        StopOutcome::Aborted => println!("Aborted"),
    }
    Ok(())
}

fn handle_move(config: &Config, key: &str, transition: Option<String>) -> Result<()> {
    let key = qualified_key(config, key)?;
    let client = TrackerClient::new(config)?;

    match transition {
        None => {
            let transitions = client.transitions(&key)?;
            print!("{}", output::format_transitions(&transitions));
        }
        Some(transition_id) => {
            client.transition(&key, &transition_id)?;
            println!("Issue {} moved", key);
        }
    }
    Ok(())
}

fn handle_assign(config: &Config, key: &str) -> Result<()> {
    let key = qualified_key(config, key)?;
    let client = TrackerClient::new(config)?;
    client.assign(&key, &config.username)?;
    println!(
        "Issue {} successfully assigned to '{}'",
        key, config.username
    );
    Ok(())
}

fn handle_comment(config: &Config, command: CommentCommands) -> Result<()> {
    match command {
        CommentCommands::Add { key } => {
            let key = qualified_key(config, &key)?;
            let body = editor::edit_text("", &format!("-{}-comment.txt", key))?;
            if body.trim().is_empty() {
                println!("Aborted");
                return Ok(());
            }
            let client = TrackerClient::new(config)?;
            client.add_comment(&key, &body)?;
            println!("Issue {} successfully commented", key);
        }
        CommentCommands::List { key } => {
            let key = qualified_key(config, &key)?;
            let client = TrackerClient::new(config)?;
            let comments = client.comments(&key)?;
            print!("{}", output::format_comments(&comments));
        }
        CommentCommands::Delete { key, comment_id } => {
            let key = qualified_key(config, &key)?;
            let comment_id: u64 = comment_id.parse().map_err(|_| {
                Error::Input(format!(
                    "invalid comment id '{}': must be a number",
                    comment_id
                ))
            })?;
            let client = TrackerClient::new(config)?;
            client.delete_comment(&key, comment_id)?;
            println!("Comment #{} of issue {} deleted", comment_id, key);
        }
    }
    Ok(())
}

fn handle_rename(config: &Config, key: &str, title: &str) -> Result<()> {
    let key = qualified_key(config, key)?;
    let client = TrackerClient::new(config)?;

    let title = if title.starts_with("s/") {
        let issue = client.issue(&key)?;
        apply_substitution(title, &issue.fields.summary)?
    } else {
        title.to_string()
    };

    client.set_summary(&key, &title)?;
    println!("Issue {} successfully renamed to: {}", key, title);
    Ok(())
}

fn handle_delete(config: &Config, key: &str) -> Result<()> {
    let key = qualified_key(config, key)?;
    let client = TrackerClient::new(config)?;
    client.delete_issue(&key)?;
    println!("Issue {} deleted", key);
    Ok(())
}

fn handle_create(config: &Config, kind: &str) -> Result<()> {
    let project = require_project(config)?.to_string();

    let contents = editor::edit_text(CREATE_PREFACE, ".md")?;
    let draft = match draft::parse_issue_draft(&contents) {
        Some(draft) => draft,
        None => {
            println!("Aborted");
            return Ok(());
        }
    };

    let client = TrackerClient::new(config)?;
    let created = client.create_issue(draft.into_fields(&project, kind))?;
    println!("{}", created.key);
    Ok(())
}

fn handle_projects(config: &Config) -> Result<()> {
    let client = TrackerClient::new(config)?;
    for project in client.projects()? {
        println!("{:<12} {}", project.key, project.name);
    }
    Ok(())
}

/// Apply an `s/pattern/replacement/[flags]` expression to `input`.
/// Supported flags: `g` (replace all), `i` (case-insensitive). Slashes in
/// the pattern or replacement can be escaped with a backslash.
fn apply_substitution(expression: &str, input: &str) -> Result<String, Error> {
    let rest = expression.strip_prefix("s/").ok_or_else(|| {
        Error::Input(format!("malformed substitution '{}'", expression))
    })?;

    let parts = split_unescaped(rest, '/');
    if parts.len() < 2 {
        return Err(Error::Input(format!(
            "malformed substitution '{}': expected s/pattern/replacement/",
            expression
        )));
    }
    let pattern = &parts[0];
    let replacement = &parts[1];
    let flags = parts.get(2).map(String::as_str).unwrap_or("");

    let regex = regex::RegexBuilder::new(pattern)
        .case_insensitive(flags.contains('i'))
        .build()
        .map_err(|e| Error::Input(format!("invalid pattern '{}': {}", pattern, e)))?;

    let result = if flags.contains('g') {
        regex.replace_all(input, replacement.as_str())
    } else {
        regex.replace(input, replacement.as_str())
    };
    Ok(result.into_owned())
}

/// Split on `separator`, honoring backslash escapes.
fn split_unescaped(text: &str, separator: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next) if next == separator => current.push(next),
                Some(next) => {
                    current.push(c);
                    current.push(next);
                }
                None => current.push(c),
            }
        } else if c == separator {
            parts.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    parts.push(current);
    parts
}
