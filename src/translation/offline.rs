//! Offline translation through the Argos Translate command-line client.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

use super::{Provider, ProviderError, TranslationRequest};

pub const DEFAULT_COMMAND: &str = "argos-translate-cli";

#[derive(Debug, Clone)]
pub struct ArgosProvider {
    command: String,
}

impl ArgosProvider {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Checks once that the client can be launched at all.
    ///
    /// A missing executable or a failing `--help` means the local model
    /// package is not installed and the provider stays out of the chain.
    pub async fn probe(command: &str) -> Result<Self, ProviderError> {
        let output = Command::new(command)
            .arg("--help")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ProviderError::Spawn {
                command: command.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(ProviderError::ExitStatus {
                command: command.to_string(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(Self::new(command))
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    fn build_command(&self, request: &TranslationRequest) -> Command {
        let mut command = Command::new(&self.command);
        command
            .args([
                "--from-lang",
                request.source_language.code(),
                "--to-lang",
                request.target_language.code(),
            ])
            .arg(&request.source_text)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Dropping the future on timeout must not leave the process behind.
            .kill_on_drop(true);
        command
    }
}

#[async_trait]
impl Provider for ArgosProvider {
    fn name(&self) -> &str {
        "argos"
    }

    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        let output = self
            .build_command(request)
            .output()
            .await
            .map_err(|source| ProviderError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ProviderError::ExitStatus {
                command: self.command.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            return Err(ProviderError::Empty);
        }

        Ok(text)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const MISSING: &str = "simplify-test-no-such-translator";

    #[tokio::test]
    async fn test_probe_missing_command_fails() {
        let result = ArgosProvider::probe(MISSING).await;
        assert!(matches!(result, Err(ProviderError::Spawn { .. })));
    }

    #[tokio::test]
    async fn test_translate_missing_command_fails() {
        let provider = ArgosProvider::new(MISSING);
        let result = provider.translate(&TranslationRequest::new("Hello")).await;
        assert!(matches!(result, Err(ProviderError::Spawn { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_translate_passes_language_flags_then_text() {
        // `echo` prints its arguments back, standing in for the real client.
        let provider = ArgosProvider::new("echo");
        let text = provider
            .translate(&TranslationRequest::new("Hello world"))
            .await
            .unwrap();
        assert_eq!(text, "--from-lang en --to-lang zh Hello world");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_translate_nonzero_exit_is_an_error() {
        let provider = ArgosProvider::new("false");
        let result = provider.translate(&TranslationRequest::new("Hello")).await;
        assert!(matches!(result, Err(ProviderError::ExitStatus { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_probe_accepts_launchable_command() {
        let provider = ArgosProvider::probe("true").await.unwrap();
        assert_eq!(provider.command(), "true");
        assert_eq!(provider.name(), "argos");
    }
}
