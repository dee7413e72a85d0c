//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the ctdkit crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use ctdkit::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let node = ToolNode::from_file(&CtdParser::default(), "path/to/tool.ctd")?;
//! node.set_value("tool.1.threads", Value::Int(4))?;
//! let argv = node.command_line(None)?;
//! println!("{}", display_command_line(&argv));
//! # Ok(())
//! # }
//! ```

// Pipeline stages
pub use crate::compiler::{CommandLineCompiler, display_command_line};
pub use crate::node::ToolNode;
pub use crate::parser::{CtdParser, ParserOptions};
pub use crate::validator::Validator;
pub use crate::writer::CtdWriter;

// Model types
pub use crate::model::{
    Bounds, CliElement, CliMapping, ConfigurationBuilder, NodeConfiguration, OutputConverter,
    Parameter, ParameterKind, Port, PortDirection, Relocator, ToolMetadata, Value,
};
pub use crate::values::{ValueSource, ValueStore};

// Collaborator interfaces
pub use crate::runner::{RunningTool, ToolRunner};

// Error types
pub use crate::error::{
    CompileError, NodeError, ParseError, RunnerError, ValidationError, ValueError, WriteError,
};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
