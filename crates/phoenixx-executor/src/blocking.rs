//! Synchronous adapter over the async Docker sandbox.
//!
//! The engine's scoring loop is synchronous; this adapter owns a
//! dedicated single-threaded runtime and drives [`SandboxExecutor`]
//! to completion for each case.

use std::path::PathBuf;
use std::time::Duration;

use phoenixx_engine::{Execution, ExecutionError, Executor};

use crate::{ExecutorError, Language, SandboxExecutor};

/// Blocking wrapper implementing the engine's [`Executor`] contract.
///
/// Must not be constructed or used from inside an async runtime: each
/// call blocks the current thread until the container finishes.
#[derive(Debug)]
pub struct BlockingSandbox {
    runtime: tokio::runtime::Runtime,
    sandbox: SandboxExecutor,
}

impl BlockingSandbox {
    /// Creates a blocking sandbox around a fresh Docker connection.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutorError::Runtime`] if the internal runtime cannot
    /// be built, plus any [`SandboxExecutor::new`] failure.
    pub fn new(
        image: impl Into<String>,
        language: Language,
        work_dir: impl Into<PathBuf>,
    ) -> Result<Self, ExecutorError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let sandbox = SandboxExecutor::new(image, language, work_dir)?;
        Ok(Self { runtime, sandbox })
    }

    /// Checks that the Docker daemon is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutorError::DockerApi`] if the ping fails.
    pub fn health_check(&self) -> Result<(), ExecutorError> {
        self.runtime.block_on(self.sandbox.health_check())
    }
}

impl Executor for BlockingSandbox {
    fn run(
        &mut self,
        code: &str,
        input: &str,
        time_limit: Duration,
    ) -> Result<Execution, ExecutionError> {
        self.runtime
            .block_on(self.sandbox.run_case(code, input, time_limit))
    }
}
