//! Record publishing through an external announcer.
//!
//! The pipeline only sees the [`Announcer`] trait. [`CommandAnnouncer`]
//! shells out to a `go-avahi-cname` style tool, one process per record:
//!
//! ```text
//! <program> cname --fqdn <fqdn> <value>
//! ```
//!
//! Only the exit status of the direct child counts. Its stderr goes to our
//! own stderr, so a background process left behind by the tool cannot hold
//! the pipeline up.

use std::process::Stdio;

use async_trait::async_trait;
use log::debug;
use tokio::process::Command;

use crate::error::{BridgeError, Result};
use crate::types::PublishRequest;

#[async_trait]
pub trait Announcer: Send + Sync {
    async fn publish(&self, request: &PublishRequest) -> Result<()>;
}

pub struct CommandAnnouncer {
    program: String,
}

impl CommandAnnouncer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, request: &PublishRequest) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("cname")
            .arg("--fqdn")
            .arg(&request.fqdn)
            .arg(&request.value)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit());
        cmd
    }
}

#[async_trait]
impl Announcer for CommandAnnouncer {
    async fn publish(&self, request: &PublishRequest) -> Result<()> {
        let failure = |reason: String| BridgeError::Publish {
            fqdn: request.fqdn.clone(),
            value: request.value.clone(),
            reason,
        };

        debug!("Running {} for {}", self.program, request);
        let status = self
            .command(request)
            .status()
            .await
            .map_err(|e| failure(format!("failed to start {}: {}", self.program, e)))?;

        if status.success() {
            Ok(())
        } else {
            Err(failure(format!("{} exited with {}", self.program, status)))
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn request() -> PublishRequest {
        PublishRequest::new("container-web1.local", "10.0.0.5")
    }

    #[tokio::test]
    async fn zero_exit_is_success() {
        CommandAnnouncer::new("true").publish(&request()).await.unwrap();
    }

    #[tokio::test]
    async fn non_zero_exit_is_publish_error() {
        let err = CommandAnnouncer::new("false")
            .publish(&request())
            .await
            .unwrap_err();
        match err {
            BridgeError::Publish { fqdn, value, .. } => {
                assert_eq!(fqdn, "container-web1.local");
                assert_eq!(value, "10.0.0.5");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_program_is_publish_error() {
        let err = CommandAnnouncer::new("/nonexistent/announcer-binary")
            .publish(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::Publish { .. }));
        assert!(err.to_string().contains("failed to start"));
    }

    #[tokio::test]
    async fn lingering_background_process_does_not_block() {
        use std::os::unix::fs::PermissionsExt;
        use std::time::Duration;

        let script = std::env::temp_dir().join(format!(
            "mdns-bridge-announcer-{}.sh",
            std::process::id()
        ));
        std::fs::write(&script, "#!/bin/sh\nsleep 30 &\nexit 0\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let announcer = CommandAnnouncer::new(script.to_string_lossy());
        let result =
            tokio::time::timeout(Duration::from_secs(10), announcer.publish(&request())).await;
        let _ = std::fs::remove_file(&script);

        result.expect("announcer blocked on a background process").unwrap();
    }

    #[test]
    fn passes_fqdn_and_value_positionally() {
        let cmd = CommandAnnouncer::new("go-avahi-cname").command(&request());
        let args: Vec<_> = cmd
            .as_std()
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(args, ["cname", "--fqdn", "container-web1.local", "10.0.0.5"]);
    }
}
