//! Octopus version detection
//!
//! Detection is best effort. Every failure (missing executable, timeout,
//! unreadable file, no match) means "no signal" and yields `None`.

use async_trait::async_trait;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Upper bound for `octopus --version`
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Files looked at, in order, in every workspace root
pub const WORKSPACE_VERSION_FILES: &[&str] =
    &["octopus.conf", "config.inp", "version.txt", ".octopus-version"];

static VERSION_OUTPUT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)octopus\s+(\d+\.\d+)").expect("version output pattern is valid")
});

static VERSION_COMMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:#|%)\s*octopus\s+version?\s*[:\-]?\s*(\d+\.\d+)")
        .expect("version comment pattern is valid")
});

/// A source of the installed Octopus version
#[async_trait]
pub trait VersionProbe: Send + Sync {
    async fn probe(&self) -> Option<String>;
}

/// Runs `octopus --version` on the host
#[derive(Debug, Clone)]
pub struct SystemProbe {
    pub program: PathBuf,
    pub timeout: Duration,
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self {
            program: PathBuf::from("octopus"),
            timeout: PROBE_TIMEOUT,
        }
    }
}

#[async_trait]
impl VersionProbe for SystemProbe {
    async fn probe(&self) -> Option<String> {
        let mut command = Command::new(&self.program);
        command.arg("--version").kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                debug!("Unable to execute {} --version: {}", self.program.display(), e);
                return None;
            }
            Err(_) => {
                warn!(
                    "{} --version did not finish within {:?}",
                    self.program.display(),
                    self.timeout
                );
                return None;
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        match parse_version_output(&stdout) {
            Some(version) => {
                info!("Detected Octopus {} through system command", version);
                Some(version)
            }
            None => {
                warn!("Unable to parse version number from: {}", stdout.trim());
                None
            }
        }
    }
}

/// A probe that always answers the same thing
#[derive(Debug, Clone, Default)]
pub struct FixedProbe(pub Option<String>);

#[async_trait]
impl VersionProbe for FixedProbe {
    async fn probe(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Extract the version from `octopus --version` output, e.g.
/// `octopus 16.2 (git commit 28271023a8)`
pub fn parse_version_output(output: &str) -> Option<String> {
    VERSION_OUTPUT
        .captures(output)
        .map(|caps| caps[1].to_string())
}

/// Look for a `# octopus version: 16.2` style marker in file content
pub fn detect_from_content(content: &str) -> Option<String> {
    VERSION_COMMENT
        .captures(content)
        .map(|caps| caps[1].to_string())
}

/// Check the well-known version files in each workspace root
pub fn detect_from_workspace<P: AsRef<Path>>(roots: &[P]) -> Option<String> {
    for root in roots {
        for file in WORKSPACE_VERSION_FILES {
            let path = root.as_ref().join(file);
            let Ok(content) = std::fs::read_to_string(&path) else {
                continue;
            };
            if let Some(version) = detect_from_content(&content) {
                debug!("Found Octopus {} marker in {}", version, path.display());
                return Some(version);
            }
        }
    }
    None
}

/// System probe first, then the active document, then workspace files
pub async fn auto_detect<P: AsRef<Path>>(
    probe: &dyn VersionProbe,
    active_document: Option<&str>,
    roots: &[P],
) -> Option<String> {
    if let Some(version) = probe.probe().await {
        return Some(version);
    }
    if let Some(version) = active_document.and_then(detect_from_content) {
        return Some(version);
    }
    detect_from_workspace(roots)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version_output() {
        assert_eq!(
            parse_version_output("octopus 16.2 (git commit 28271023a8)").as_deref(),
            Some("16.2")
        );
        assert_eq!(parse_version_output("Octopus  14.1").as_deref(), Some("14.1"));
        assert_eq!(parse_version_output("command not found"), None);
    }

    #[test]
    fn test_detect_from_content() {
        assert_eq!(
            detect_from_content("# octopus version: 16.2\nvariable = value").as_deref(),
            Some("16.2")
        );
        assert_eq!(
            detect_from_content("% octopus version 14.1\nvariable = value").as_deref(),
            Some("14.1")
        );
        assert_eq!(
            detect_from_content("# octopus version-16.2").as_deref(),
            Some("16.2")
        );
        assert_eq!(detect_from_content("variable = value\nother = data"), None);
    }

    #[tokio::test]
    async fn test_missing_executable_is_no_signal() {
        let probe = SystemProbe {
            program: PathBuf::from("definitely-not-an-octopus-binary"),
            timeout: Duration::from_millis(500),
        };
        assert_eq!(probe.probe().await, None);
    }

    #[tokio::test]
    async fn test_auto_detect_prefers_probe() {
        let roots: [&Path; 0] = [];
        let probe = FixedProbe(Some("16.2".to_string()));
        let detected = auto_detect(&probe, Some("# octopus version 14.1"), &roots).await;
        assert_eq!(detected.as_deref(), Some("16.2"));

        let silent = FixedProbe(None);
        let detected = auto_detect(&silent, Some("# octopus version 14.1"), &roots).await;
        assert_eq!(detected.as_deref(), Some("14.1"));
        assert_eq!(auto_detect(&silent, None, &roots).await, None);
    }
}
