//! Compiles a validated configuration plus current values into a process argument vector.
//!
//! Elements are expanded in declaration order:
//!
//! - an element without mappings emits its literal text;
//! - an element mapped to a single boolean emits its literal text iff the value is `true`;
//! - otherwise the literal is followed by the mapped values. When the mapped values are
//!   lists of length `N`, the literal and the `i`-th entry of every mapping are emitted
//!   `N` times, so `-i <files>` becomes `-i a -i b ...`.
//!
//! Unset optional mappings contribute nothing, and an element whose mappings are all unset
//! is skipped entirely. Unset mandatory mappings, and required elements left without any
//! value, are errors.

use crate::error::CompileError;
use crate::model::NodeConfiguration;
use crate::values::ValueSource;
use itertools::Itertools;

mod element;

use element::ElementExpander;

/// Turns a configuration into command lines. Holds no state besides the borrowed
/// configuration, so it can be reused for every execution.
pub struct CommandLineCompiler<'a> {
    config: &'a NodeConfiguration,
}

impl<'a> CommandLineCompiler<'a> {
    pub fn new(config: &'a NodeConfiguration) -> Self {
        Self { config }
    }

    /// Builds the full argv, with `executable` as token 0.
    pub fn compile<V: ValueSource + ?Sized>(
        &self,
        values: &V,
        executable: &str,
    ) -> Result<Vec<String>, CompileError> {
        let mut argv = vec![executable.to_string()];
        argv.extend(self.arguments(values)?);
        Ok(argv)
    }

    /// Builds the arguments following the executable.
    pub fn arguments<V: ValueSource + ?Sized>(&self, values: &V) -> Result<Vec<String>, CompileError> {
        let expander = ElementExpander {
            config: self.config,
            values,
        };
        let mut arguments = Vec::new();
        for (index, element) in self.config.cli_elements().iter().enumerate() {
            expander.expand(index, element, &mut arguments)?;
        }
        tracing::debug!(
            tool = %self.config.metadata().name,
            arguments = arguments.len(),
            "Compiled command line"
        );
        Ok(arguments)
    }
}

/// Shorthand for `CommandLineCompiler::new(config).compile(values, executable)`.
pub fn compile<V: ValueSource + ?Sized>(
    config: &NodeConfiguration,
    values: &V,
    executable: &str,
) -> Result<Vec<String>, CompileError> {
    CommandLineCompiler::new(config).compile(values, executable)
}

/// Renders an argv for display, single-quoting tokens that contain whitespace or quotes.
pub fn display_command_line(argv: &[String]) -> String {
    argv.iter()
        .map(|token| {
            if token.is_empty() || token.chars().any(|c| c.is_whitespace() || c == '\'' || c == '"') {
                format!("'{}'", token.replace('\'', "'\\''"))
            } else {
                token.clone()
            }
        })
        .join(" ")
}
