use crate::compiler::CommandLineCompiler;
use crate::error::NodeError;
use crate::model::{NodeConfiguration, Value};
use crate::parser::CtdParser;
use crate::runner::ToolRunner;
use crate::validator::Validator;
use crate::values::ValueStore;
use ahash::AHashMap;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};

/// A command-line tool wrapped as a workflow node.
///
/// Owns one validated configuration. Value edits and command-line compilation are
/// serialized through a single lock, so a node can be shared between a settings
/// editor and the executing workflow.
pub struct ToolNode {
    config: Mutex<NodeConfiguration>,
}

impl ToolNode {
    /// Validates an already parsed configuration.
    pub fn new(config: NodeConfiguration) -> Result<Self, NodeError> {
        Validator::new(&config).validate()?;
        Ok(Self {
            config: Mutex::new(config),
        })
    }

    /// Parses and validates a CTD document.
    pub fn from_ctd(parser: &CtdParser, bytes: &[u8]) -> Result<Self, NodeError> {
        Self::new(parser.parse(bytes)?)
    }

    pub fn from_file(parser: &CtdParser, path: impl AsRef<Path>) -> Result<Self, NodeError> {
        Self::new(parser.parse_file(path)?)
    }

    /// A copy of the current configuration, values included.
    pub fn snapshot(&self) -> NodeConfiguration {
        self.config.lock().clone()
    }

    pub fn set_value(&self, key: &str, value: Value) -> Result<(), NodeError> {
        self.config.lock().set_value(key, value)?;
        Ok(())
    }

    pub fn clear_value(&self, key: &str) -> Result<(), NodeError> {
        self.config.lock().clear_value(key)?;
        Ok(())
    }

    pub fn apply_values(&self, store: &ValueStore) -> Result<(), NodeError> {
        self.config.lock().apply_values(store)?;
        Ok(())
    }

    /// Resolves the executable: an explicit override, else the configured executable
    /// path, else the bare executable name (looked up on `PATH` by the runner).
    pub fn executable(&self, executable_override: Option<&Path>) -> Result<PathBuf, NodeError> {
        if let Some(path) = executable_override {
            return Ok(path.to_path_buf());
        }
        let config = self.config.lock();
        let metadata = config.metadata();
        match (metadata.executable_path.as_str(), metadata.executable_name.as_str()) {
            ("", "") => Err(NodeError::MissingExecutable),
            ("", name) => Ok(PathBuf::from(name)),
            (path, _) => Ok(PathBuf::from(path)),
        }
    }

    /// Compiles the argv for the current values.
    pub fn command_line(&self, executable_override: Option<&Path>) -> Result<Vec<String>, NodeError> {
        let executable = self.executable(executable_override)?;
        let config = self.config.lock();
        let argv = CommandLineCompiler::new(&config)
            .compile(&*config, &executable.to_string_lossy())?;
        Ok(argv)
    }

    /// Compiles the current command line and hands it to `runner`.
    ///
    /// Compilation errors surface before anything is launched.
    pub fn execute<R: ToolRunner>(
        &self,
        runner: &R,
        working_dir: &Path,
        environment: &AHashMap<String, String>,
        executable_override: Option<&Path>,
    ) -> Result<R::Handle, NodeError> {
        let argv = self.command_line(executable_override)?;
        tracing::info!(
            executable = %argv[0],
            arguments = argv.len() - 1,
            working_dir = %working_dir.display(),
            "Launching tool"
        );
        Ok(runner.launch(&argv, working_dir, environment)?)
    }
}
