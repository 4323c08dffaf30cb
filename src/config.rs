// Configuration loading and validation
//
// All settings live in one TOML file. The loaded `Config` is passed into
// component constructors explicitly; nothing reads it through globals.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Separator for the credential string handed to hooks (ASCII unit
/// separator). The three fields are opaque to jita; hooks split on this.
pub const CREDENTIAL_SEPARATOR: char = '\x1f';

/// Process-wide configuration, loaded once at startup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub filter_id: Option<u64>,
    #[serde(default)]
    pub workflow: Workflow,
    #[serde(default)]
    pub hooks: Hooks,
}

/// Ordered workflow stages mapping remote status names to display behavior.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Workflow {
    #[serde(default, rename = "stage")]
    pub stages: Vec<Stage>,
}

/// One configured workflow stage.
///
/// `order` controls plain-list sorting; an order of -1 hides the stage's
/// issues from the plain list entirely. `kanban_order` places the stage on
/// the board (0 = not on the board). `template` overrides the row template
/// for issues in this stage.
#[derive(Debug, Clone, Deserialize)]
pub struct Stage {
    pub name: String,
    pub order: i64,
    #[serde(default)]
    pub kanban_order: i64,
    #[serde(default)]
    pub template: Option<String>,
}

/// Executable lists per session lifecycle stage, run in configured order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Hooks {
    #[serde(default)]
    pub pre_start: Vec<PathBuf>,
    #[serde(default)]
    pub post_start: Vec<PathBuf>,
    #[serde(default)]
    pub pre_stop: Vec<PathBuf>,
    #[serde(default)]
    pub post_stop: Vec<PathBuf>,
}

impl Config {
    /// Default configuration file path (~/.jita/config.toml).
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("unable to determine home directory".to_string()))?;
        Ok(home.join(".jita").join("config.toml"))
    }

    /// Load and validate the configuration file at `path`.
    pub fn load(path: &Path) -> Result<Config> {
        let contents = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("unable to read {}: {}", path.display(), e))
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            Error::Config(format!("unable to parse {}: {}", path.display(), e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Check that every required field is present. The project may be empty
    /// here; commands that need one enforce it when no issue key supplies it.
    pub fn validate(&self) -> Result<()> {
        if self.username.is_empty() {
            return Err(Error::Config("username is empty".to_string()));
        }
        if self.password.is_empty() {
            return Err(Error::Config("password is empty".to_string()));
        }
        if self.base_url.is_empty() {
            return Err(Error::Config("base_url is empty".to_string()));
        }
        Ok(())
    }

    /// The opaque three-field credential record passed to hooks as their
    /// second argument. Not a security boundary: visible in process listings.
    pub fn hook_credentials(&self) -> String {
        format!(
            "{}{sep}{}{sep}{}",
            self.username,
            self.password,
            self.base_url,
            sep = CREDENTIAL_SEPARATOR
        )
    }
}

impl Workflow {
    /// Load a workflow from a standalone TOML file (the `--workflow`
    /// override), replacing the configured one wholesale.
    pub fn load(path: &Path) -> Result<Workflow> {
        let contents = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("unable to read {}: {}", path.display(), e))
        })?;

        // Accept either bare [[stage]] tables or a [workflow] wrapper, so the
        // same file works standalone and pasted into the main config.
        #[derive(Deserialize)]
        struct Wrapper {
            #[serde(default)]
            workflow: Option<Workflow>,
            #[serde(default, rename = "stage")]
            stages: Vec<Stage>,
        }

        let wrapper: Wrapper = toml::from_str(&contents).map_err(|e| {
            Error::Config(format!("unable to parse {}: {}", path.display(), e))
        })?;

        match wrapper.workflow {
            Some(workflow) if !workflow.stages.is_empty() => Ok(workflow),
            _ => Ok(Workflow {
                stages: wrapper.stages,
            }),
        }
    }

    /// Find the configured stage for a remote status name.
    pub fn stage(&self, status: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.name == status)
    }
}
