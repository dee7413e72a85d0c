//! Interface to the process runner that executes a compiled command line.
//!
//! Spawning and monitoring processes is left to the host; this crate only hands it an
//! argv, a working directory and an environment.

use crate::error::RunnerError;
use ahash::AHashMap;
use std::path::Path;

/// A launched tool invocation.
pub trait RunningTool: Send {
    /// Blocks until the process exits and returns its exit code.
    fn wait_until_finished(&mut self) -> Result<i32, RunnerError>;

    /// Requests termination of the process.
    fn kill(&mut self) -> Result<(), RunnerError>;
}

/// Launches command lines produced by the compiler.
pub trait ToolRunner {
    type Handle: RunningTool;

    /// Starts `argv` asynchronously. `argv[0]` is the executable.
    fn launch(
        &self,
        argv: &[String],
        working_dir: &Path,
        environment: &AHashMap<String, String>,
    ) -> Result<Self::Handle, RunnerError>;
}
