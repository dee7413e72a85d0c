//! # ctdkit - Common Tool Descriptor configuration pipeline
//!
//! **ctdkit** turns a command-line tool described by a CTD (Common Tool Descriptor) XML
//! file into a strongly-typed configuration, checks it, and compiles it together with the
//! current parameter values into the argument vector used to run the tool.
//!
//! ## Core Workflow
//!
//! 1.  **Parse**: [`CtdParser`](parser::CtdParser) reads the CTD in a single forward pass
//!     into a [`NodeConfiguration`](model::NodeConfiguration): typed parameters, input and
//!     output ports, CLI elements, relocators and output converters.
//! 2.  **Validate**: [`Validator`](validator::Validator) cross-checks the references inside
//!     the configuration (CLI mappings, port bindings, relocators). This runs once, right
//!     after parsing.
//! 3.  **Configure**: parameter values change through
//!     [`NodeConfiguration::set_value`](model::NodeConfiguration::set_value), which
//!     type-checks every assignment. Nothing else about the configuration changes.
//! 4.  **Compile**: [`CommandLineCompiler`](compiler::CommandLineCompiler) expands the CLI
//!     elements against the current values into an argv, once per execution.
//!
//! [`ToolNode`](node::ToolNode) bundles these steps behind one lock and hands the result to
//! a [`ToolRunner`](runner::ToolRunner) supplied by the host.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ctdkit::prelude::*;
//!
//! fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let xml = std::fs::read("FileFilter.ctd")?;
//!
//!     // 1. Parse and 2. validate.
//!     let parser = CtdParser::default();
//!     let mut config = parser.parse(&xml)?;
//!     Validator::new(&config).validate()?;
//!
//!     // 3. Assign values.
//!     config.set_value("FileFilter.1.in", Value::Str("input.mzML".to_string()))?;
//!     config.set_value("FileFilter.1.out", Value::Str("output.mzML".to_string()))?;
//!
//!     // 4. Compile the command line.
//!     let argv = CommandLineCompiler::new(&config).compile(&config, "/usr/bin/FileFilter")?;
//!     println!("{}", display_command_line(&argv));
//!     Ok(())
//! }
//! ```

pub mod compiler;
pub mod error;
pub mod model;
pub mod node;
pub mod parser;
pub mod prelude;
pub mod runner;
pub mod validator;
pub mod values;
pub mod writer;
