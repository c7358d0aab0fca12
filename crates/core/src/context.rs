//! Everything a camera session needs, passed explicitly.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Config;
use crate::download::{Downloader, WhatToDownload};
use crate::hook::{CommandHook, NoopHook, SessionHook};
use crate::verify::VerifierSet;

/// Shared state for all camera sessions of a process.
#[derive(Clone)]
pub struct ExecutionContext {
    output_dir: PathBuf,
    what_to_download: WhatToDownload,
    downloader: Downloader,
    verifiers: VerifierSet,
    hook: Arc<dyn SessionHook>,
}

impl ExecutionContext {
    pub fn new(
        output_dir: impl Into<PathBuf>,
        downloader: Downloader,
        verifiers: VerifierSet,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            what_to_download: WhatToDownload::default(),
            downloader,
            verifiers,
            hook: Arc::new(NoopHook),
        }
    }

    /// Builds the production context from a validated config.
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let downloader = Downloader::new(config.downloader.clone())?;
        let verifiers = VerifierSet::from_config(&config.verifier);
        let hook: Arc<dyn SessionHook> = match &config.command_after_finish {
            Some(command) => Arc::new(CommandHook::new(command.clone())),
            None => Arc::new(NoopHook),
        };

        Ok(Self::new(&config.output_dir, downloader, verifiers)
            .with_what_to_download(config.what_to_download)
            .with_hook(hook))
    }

    pub fn with_what_to_download(mut self, what: WhatToDownload) -> Self {
        self.what_to_download = what;
        self
    }

    pub fn with_hook(mut self, hook: Arc<dyn SessionHook>) -> Self {
        self.hook = hook;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn what_to_download(&self) -> WhatToDownload {
        self.what_to_download
    }

    pub fn downloader(&self) -> &Downloader {
        &self.downloader
    }

    pub fn verifiers(&self) -> &VerifierSet {
        &self.verifiers
    }

    pub fn hook(&self) -> &dyn SessionHook {
        self.hook.as_ref()
    }
}

impl std::fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("output_dir", &self.output_dir)
            .field("what_to_download", &self.what_to_download)
            .field("verifiers", &self.verifiers)
            .field("hook", &self.hook.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_str;

    #[test]
    fn test_from_config() {
        let config = load_config_from_str(
            r#"
            output_dir = "/srv/photos"
            command_after_finish = "echo ${n}"
            what_to_download = "raw"
            "#,
        )
        .unwrap();

        let context = ExecutionContext::from_config(&config).unwrap();
        assert_eq!(context.output_dir(), Path::new("/srv/photos"));
        assert_eq!(context.what_to_download(), WhatToDownload::JustRaw);
        assert_eq!(context.hook().name(), "command");
        assert_eq!(context.verifiers().video.name(), "video");
    }

    #[test]
    fn test_without_command_uses_noop_hook() {
        let config = load_config_from_str(r#"output_dir = "/srv/photos""#).unwrap();
        let context = ExecutionContext::from_config(&config).unwrap();
        assert_eq!(context.hook().name(), "noop");
        assert_eq!(context.what_to_download(), WhatToDownload::Both);
    }
}
