// Lifecycle hook execution

use std::path::PathBuf;
use std::process::Command;

use log::debug;

use crate::config::{Config, Hooks};
use crate::error::{Error, Result};

/// Lifecycle points at which user-configured executables run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStage {
    PreStart,
    PostStart,
    PreStop,
    PostStop,
}

impl HookStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            HookStage::PreStart => "pre_start",
            HookStage::PostStart => "post_start",
            HookStage::PreStop => "pre_stop",
            HookStage::PostStop => "post_stop",
        }
    }
}

/// Runs the executables registered for a lifecycle stage, sequentially and
/// in configured order.
///
/// Each hook is invoked as `<hook> <issueKey> <credentialString>`. The first
/// spawn failure or non-zero exit aborts the stage: remaining hooks do not
/// run and the error propagates to the caller. This policy is uniform across
/// all four stages.
pub struct HookRunner {
    hooks: Hooks,
    credentials: String,
}

impl HookRunner {
    pub fn new(config: &Config) -> HookRunner {
        HookRunner {
            hooks: config.hooks.clone(),
            credentials: config.hook_credentials(),
        }
    }

    pub fn run(&self, stage: HookStage, issue_key: &str) -> Result<()> {
        for hook in self.executables(stage) {
            debug!("running {} hook {}", stage.as_str(), hook.display());

            let status = Command::new(hook)
                .arg(issue_key)
                .arg(&self.credentials)
                .status()
                .map_err(|e| Error::Hook {
                    hook: hook.display().to_string(),
                    message: e.to_string(),
                })?;

            if !status.success() {
                return Err(Error::Hook {
                    hook: hook.display().to_string(),
                    message: format!("exited with {}", status),
                });
            }
        }

        Ok(())
    }

    fn executables(&self, stage: HookStage) -> &[PathBuf] {
        match stage {
            HookStage::PreStart => &self.hooks.pre_start,
            HookStage::PostStart => &self.hooks.post_start,
            HookStage::PreStop => &self.hooks.pre_stop,
            HookStage::PostStop => &self.hooks.post_stop,
        }
    }
}
