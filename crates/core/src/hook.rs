//! Completion hook run after every camera session.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex_lite::{Captures, Regex};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::{info, warn};

use crate::session::SessionReport;

/// Called once per camera session, whatever its outcome.
#[async_trait]
pub trait SessionHook: Send + Sync {
    fn name(&self) -> &str;

    /// Must not fail the caller; problems are logged.
    async fn on_session_finished(&self, report: &SessionReport);
}

/// Does nothing.
#[derive(Debug, Clone, Default)]
pub struct NoopHook;

#[async_trait]
impl SessionHook for NoopHook {
    fn name(&self) -> &str {
        "noop"
    }

    async fn on_session_finished(&self, _report: &SessionReport) {}
}

static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$(?:(\$)|\{([_a-zA-Z][_a-zA-Z0-9]*)\}|([_a-zA-Z][_a-zA-Z0-9]*))")
        .expect("placeholder pattern is valid")
});

/// Substitutes `$name` and `${name}` placeholders.
///
/// `$$` renders a literal `$`. Unknown placeholders are left as written.
pub fn render_template(template: &str, values: &HashMap<&str, String>) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures<'_>| {
            if caps.get(1).is_some() {
                return "$".to_string();
            }
            let name = caps.get(2).or_else(|| caps.get(3)).map(|m| m.as_str());
            match name.and_then(|n| values.get(n)) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Runs a shell command with `${camera}`, `${n}` and `${total}` filled in.
#[derive(Debug, Clone)]
pub struct CommandHook {
    template: String,
    shell: PathBuf,
}

impl CommandHook {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            shell: PathBuf::from("sh"),
        }
    }

    pub fn with_shell(mut self, shell: impl Into<PathBuf>) -> Self {
        self.shell = shell.into();
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// The command line for `report`.
    pub fn render(&self, report: &SessionReport) -> String {
        let values = HashMap::from([
            ("camera", report.camera_name.clone()),
            ("n", report.downloaded.to_string()),
            ("total", report.total_items_display()),
        ]);
        render_template(&self.template, &values)
    }
}

#[async_trait]
impl SessionHook for CommandHook {
    fn name(&self) -> &str {
        "command"
    }

    async fn on_session_finished(&self, report: &SessionReport) {
        let command = self.render(report);
        info!("Running a command after a finished download: {}", command);

        match Command::new(&self.shell).arg("-c").arg(&command).status().await {
            Ok(status) if status.success() => {}
            Ok(status) => warn!(status = %status, "Command after finish exited unsuccessfully"),
            Err(e) => warn!(error = %e, "Failed to run command after finish"),
        }
    }
}
