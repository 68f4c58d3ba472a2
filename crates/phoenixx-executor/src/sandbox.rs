//! Docker sandbox for running candidate solutions.
//!
//! Each test case gets a fresh container: the solution and case input are
//! staged in a work directory, bind-mounted read-only, and run with the
//! case input on stdin. Networking is disabled inside the container.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use bollard::container::{
    Config as BollardConfig, CreateContainerOptions as BollardCreateOptions, LogOutput,
    LogsOptions, RemoveContainerOptions, WaitContainerOptions,
};
use bollard::models::{HostConfig, Mount as BollardMount, MountTypeEnum};
use bollard::Docker;
use futures::StreamExt;
use tracing::{debug, instrument, warn};

use phoenixx_engine::{Execution, ExecutionError, ExecutionErrorKind};

use crate::{ExecutorError, Language};

/// Mount point of the staged work directory inside the container.
const SANDBOX_MOUNT: &str = "/sandbox";

/// Case input file name inside the work directory.
const INPUT_FILE_NAME: &str = "input.txt";

/// Monotonic counter for unique container names.
static CASE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Docker-backed executor for candidate solutions.
///
/// Sandbox lifecycle failures surface as [`ExecutorError`] from
/// construction and health checks; failures while running a single case
/// are folded into the engine's [`ExecutionError`] so evaluation can
/// continue with the remaining cases.
#[derive(Debug)]
pub struct SandboxExecutor {
    docker: Docker,
    image: String,
    language: Language,
    work_dir: PathBuf,
}

impl SandboxExecutor {
    /// Creates a sandbox executor connected to the local Docker daemon.
    ///
    /// The work directory is created if missing and must be mountable
    /// into containers (an absolute host path).
    ///
    /// # Errors
    ///
    /// Returns [`ExecutorError::DockerUnavailable`] if the daemon
    /// connection fails and [`ExecutorError::WorkDir`] if the work
    /// directory cannot be prepared.
    pub fn new(
        image: impl Into<String>,
        language: Language,
        work_dir: impl Into<PathBuf>,
    ) -> Result<Self, ExecutorError> {
        let docker = Docker::connect_with_local_defaults()
            .map_err(|e| ExecutorError::DockerUnavailable(e.to_string()))?;
        debug!("Connected to Docker daemon");

        let work_dir = work_dir.into();
        std::fs::create_dir_all(&work_dir).map_err(|e| ExecutorError::WorkDir {
            path: work_dir.display().to_string(),
            message: e.to_string(),
        })?;
        let work_dir = work_dir.canonicalize().map_err(|e| ExecutorError::WorkDir {
            path: work_dir.display().to_string(),
            message: format!("failed to resolve: {e}"),
        })?;

        Ok(Self {
            docker,
            image: image.into(),
            language,
            work_dir,
        })
    }

    /// Checks that the Docker daemon is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutorError::DockerApi`] if the ping fails.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), ExecutorError> {
        self.docker.ping().await?;
        debug!("Docker daemon health check passed");
        Ok(())
    }

    /// Runs the solution against one test input inside a fresh container.
    ///
    /// The time limit covers the container's execution; exceeding it
    /// yields a `Timeout` error for this case only and the container is
    /// force-removed.
    ///
    /// # Errors
    ///
    /// Returns an [`ExecutionError`] scoped to this case: `Timeout` on
    /// limit overrun, `CompileError` when the interpreter rejects the
    /// source, `RuntimeError` for crashes, non-zero exits, and sandbox
    /// infrastructure failures.
    #[instrument(skip(self, code, input), fields(language = %self.language))]
    pub async fn run_case(
        &self,
        code: &str,
        input: &str,
        time_limit: Duration,
    ) -> Result<Execution, ExecutionError> {
        self.stage_files(code, input).await?;

        let container_name = next_container_name();
        let id = self.create_case_container(&container_name).await?;

        let started = Instant::now();
        if let Err(e) = self.docker.start_container::<String>(&id, None).await {
            self.remove(&id).await;
            return Err(infra_failure(&e));
        }

        let mut wait = self
            .docker
            .wait_container(&id, None::<WaitContainerOptions<String>>);

        let status_code = match tokio::time::timeout(time_limit, wait.next()).await {
            Err(_) => {
                debug!(container = %container_name, "Case exceeded time limit");
                self.remove(&id).await;
                return Err(ExecutionError::timeout(time_limit));
            }
            Ok(None) => 0,
            Ok(Some(Ok(response))) => response.status_code,
            // bollard reports non-zero exits through the wait stream error
            Ok(Some(Err(bollard::errors::Error::DockerContainerWaitError { code, .. }))) => code,
            Ok(Some(Err(e))) => {
                self.remove(&id).await;
                return Err(infra_failure(&e));
            }
        };
        let elapsed = started.elapsed();

        let (stdout, stderr) = self.collect_logs(&id).await;
        self.remove(&id).await;

        if status_code != 0 {
            return Err(classify_failure(status_code, &stderr));
        }

        debug!(
            container = %container_name,
            elapsed_ms = elapsed.as_millis() as u64,
            "Case completed"
        );
        Ok(Execution {
            output: stdout,
            elapsed: Some(elapsed),
        })
    }

    /// Writes the solution and case input into the work directory.
    async fn stage_files(&self, code: &str, input: &str) -> Result<(), ExecutionError> {
        let solution_path = self.work_dir.join(self.language.solution_file_name());
        let input_path = self.work_dir.join(INPUT_FILE_NAME);

        tokio::fs::write(&solution_path, code)
            .await
            .map_err(|e| staging_failure(&solution_path, &e))?;
        tokio::fs::write(&input_path, input)
            .await
            .map_err(|e| staging_failure(&input_path, &e))?;
        Ok(())
    }

    /// Creates the per-case container and returns its id.
    async fn create_case_container(&self, name: &str) -> Result<String, ExecutionError> {
        let command = format!(
            "{} {SANDBOX_MOUNT}/{} < {SANDBOX_MOUNT}/{INPUT_FILE_NAME}",
            self.language.interpreter(),
            self.language.solution_file_name(),
        );

        let mount = BollardMount {
            target: Some(SANDBOX_MOUNT.to_string()),
            source: Some(self.work_dir.to_string_lossy().into_owned()),
            typ: Some(MountTypeEnum::BIND),
            read_only: Some(true),
            ..Default::default()
        };

        let host_config = HostConfig {
            mounts: Some(vec![mount]),
            ..Default::default()
        };

        let config = BollardConfig {
            image: Some(self.image.clone()),
            cmd: Some(vec!["sh".to_string(), "-c".to_string(), command]),
            network_disabled: Some(true),
            host_config: Some(host_config),
            ..Default::default()
        };

        let create_options = BollardCreateOptions {
            name,
            platform: None,
        };

        let response = self
            .docker
            .create_container(Some(create_options), config)
            .await
            .map_err(|e| infra_failure(&e))?;

        for warning in &response.warnings {
            warn!(container_id = %response.id, warning = %warning, "Docker warning during container creation");
        }

        Ok(response.id)
    }

    /// Collects stdout and stderr from a finished container.
    async fn collect_logs(&self, id: &str) -> (String, String) {
        let options = LogsOptions::<String> {
            stdout: true,
            stderr: true,
            ..Default::default()
        };

        let mut stdout = String::new();
        let mut stderr = String::new();
        let mut stream = self.docker.logs(id, Some(options));
        while let Some(chunk) = stream.next().await {
            match chunk {
                Ok(LogOutput::StdOut { message }) => {
                    stdout.push_str(&String::from_utf8_lossy(&message));
                }
                Ok(LogOutput::StdErr { message }) => {
                    stderr.push_str(&String::from_utf8_lossy(&message));
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(container_id = %id, error = %e, "Failed to read container logs");
                    break;
                }
            }
        }
        (stdout, stderr)
    }

    /// Force-removes a case container, logging failures.
    async fn remove(&self, id: &str) {
        let options = RemoveContainerOptions {
            force: true,
            ..Default::default()
        };
        if let Err(e) = self.docker.remove_container(id, Some(options)).await {
            warn!(container_id = %id, error = %e, "Failed to remove case container");
        }
    }
}

/// Generates a unique per-case container name.
fn next_container_name() -> String {
    let counter = CASE_COUNTER.fetch_add(1, Ordering::Relaxed);
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("phoenixx-case-{timestamp:x}-{counter}")
}

/// Maps a sandbox infrastructure failure into a per-case error.
fn infra_failure(error: &dyn std::fmt::Display) -> ExecutionError {
    ExecutionError::new(
        ExecutionErrorKind::RuntimeError,
        format!("sandbox failure: {error}"),
    )
}

/// Maps a file staging failure into a per-case error.
fn staging_failure(path: &Path, error: &dyn std::fmt::Display) -> ExecutionError {
    ExecutionError::new(
        ExecutionErrorKind::RuntimeError,
        format!("failed to stage '{}': {error}", path.display()),
    )
}

/// Classifies a non-zero exit using the interpreter's stderr.
fn classify_failure(status_code: i64, stderr: &str) -> ExecutionError {
    let kind = if stderr.contains("SyntaxError") {
        ExecutionErrorKind::CompileError
    } else {
        ExecutionErrorKind::RuntimeError
    };
    let detail = if stderr.trim().is_empty() {
        format!("exited with status {status_code}")
    } else {
        stderr.trim().to_string()
    };
    ExecutionError::new(kind, detail)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_container_names_are_unique() {
        let a = next_container_name();
        let b = next_container_name();
        assert_ne!(a, b);
        assert!(a.starts_with("phoenixx-case-"));
    }

    #[test]
    fn test_classify_failure_syntax_error() {
        let err = classify_failure(1, "  File \"solution.py\", line 1\nSyntaxError: invalid syntax");
        assert_eq!(err.kind, ExecutionErrorKind::CompileError);
        assert!(err.detail.contains("SyntaxError"));
    }

    #[test]
    fn test_classify_failure_runtime_error() {
        let err = classify_failure(1, "Traceback (most recent call last):\nZeroDivisionError");
        assert_eq!(err.kind, ExecutionErrorKind::RuntimeError);
    }

    #[test]
    fn test_classify_failure_silent_exit() {
        let err = classify_failure(137, "");
        assert_eq!(err.kind, ExecutionErrorKind::RuntimeError);
        assert!(err.detail.contains("137"));
    }

    /// Note: the tests below require a running Docker daemon and the
    /// sandbox image; they are skipped in normal runs.
    #[tokio::test]
    #[ignore = "requires running Docker daemon"]
    async fn sandbox_health_check() {
        let work_dir = std::env::temp_dir().join("phoenixx-sandbox-test");
        let sandbox = SandboxExecutor::new("python:3-alpine", Language::Python, work_dir)
            .expect("Failed to create sandbox");
        sandbox.health_check().await.expect("Docker not healthy");
    }

    #[tokio::test]
    #[ignore = "requires running Docker daemon"]
    async fn sandbox_runs_python_case() {
        let work_dir = std::env::temp_dir().join("phoenixx-sandbox-test-run");
        let sandbox = SandboxExecutor::new("python:3-alpine", Language::Python, work_dir)
            .expect("Failed to create sandbox");

        let execution = sandbox
            .run_case(
                "print(sum(int(x) for x in input().split()))",
                "1 2 3",
                Duration::from_secs(10),
            )
            .await
            .expect("Case failed");

        assert_eq!(execution.output.trim(), "6");
        assert!(execution.elapsed.is_some());
    }

    #[tokio::test]
    #[ignore = "requires running Docker daemon"]
    async fn sandbox_reports_timeout() {
        let work_dir = std::env::temp_dir().join("phoenixx-sandbox-test-timeout");
        let sandbox = SandboxExecutor::new("python:3-alpine", Language::Python, work_dir)
            .expect("Failed to create sandbox");

        let err = sandbox
            .run_case("while True: pass", "", Duration::from_millis(500))
            .await
            .expect_err("Expected timeout");
        assert_eq!(err.kind, ExecutionErrorKind::Timeout);
    }
}
