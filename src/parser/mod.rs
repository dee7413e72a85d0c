//! Streaming CTD parser.
//!
//! The parser walks the fixed CTD grammar in one forward pass. The root scope reads
//! tool metadata and, on reaching a registered section tag (`PARAMETERS`, `cli`,
//! `outputConverters`, `relocators`), hands the cursor to that section's
//! [`SectionParser`], which consumes the subtree up to and including its closing tag.

use crate::error::ParseError;
use crate::model::{ConfigurationBuilder, NodeConfiguration};
use ahash::AHashMap;
use std::fs;
use std::path::Path;

mod cli;
mod converters;
pub mod cursor;
mod literal;
mod options;
mod parameters;
mod root;

pub use cli::CliSection;
pub use converters::{ConvertersSection, RelocatorsSection};
pub use cursor::{Attributes, XmlCursor, XmlEvent};
pub use options::{DEFAULT_IGNORED_NAMES, DEFAULT_SKIPPED_ELEMENTS, ParserOptions};
pub use parameters::ParametersSection;

use root::RootScope;

/// Parses one top-level CTD section into the configuration under construction.
pub trait SectionParser: Send + Sync {
    /// The element name this parser takes over.
    fn tag(&self) -> &str;

    /// Called just after the section's start tag was read. Must consume events up to
    /// and including the matching end tag.
    fn parse(
        &self,
        cursor: &mut XmlCursor<'_>,
        attributes: &Attributes,
        builder: &mut ConfigurationBuilder,
    ) -> Result<(), ParseError>;
}

/// Reads CTD documents into [`NodeConfiguration`]s.
///
/// A parser holds no per-document state, so one instance can serve any number of
/// `parse` calls, including concurrent ones.
pub struct CtdParser {
    options: ParserOptions,
    sections: AHashMap<String, Box<dyn SectionParser>>,
}

impl Default for CtdParser {
    fn default() -> Self {
        Self::new(ParserOptions::default())
    }
}

impl CtdParser {
    pub fn new(options: ParserOptions) -> Self {
        let mut parser = Self {
            sections: AHashMap::new(),
            options,
        };
        let parameters = ParametersSection::new(parser.options.ignored_names.iter().cloned());
        parser.register(Box::new(parameters));
        parser.register(Box::new(CliSection));
        parser.register(Box::new(ConvertersSection));
        parser.register(Box::new(RelocatorsSection));
        parser
    }

    fn register(&mut self, section: Box<dyn SectionParser>) {
        self.sections.insert(section.tag().to_string(), section);
    }

    /// Replaces or adds the parser for one root-level section.
    pub fn with_section_parser(mut self, section: Box<dyn SectionParser>) -> Self {
        self.register(section);
        self
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parses a CTD document. No partial configuration is returned on failure.
    pub fn parse(&self, bytes: &[u8]) -> Result<NodeConfiguration, ParseError> {
        let mut cursor = XmlCursor::new(bytes);
        let mut builder = ConfigurationBuilder::new();
        let root = RootScope {
            sections: &self.sections,
            skipped: &self.options.skipped_elements,
        };
        root.parse(&mut cursor, &mut builder)?;
        cursor.expect_eof()?;

        let configuration = builder.build();
        tracing::info!(
            tool = %configuration.metadata().name,
            parameters = configuration.parameters().len(),
            inputs = configuration.input_ports().len(),
            outputs = configuration.output_ports().len(),
            cli_elements = configuration.cli_elements().len(),
            "Parsed tool descriptor"
        );
        Ok(configuration)
    }

    pub fn parse_str(&self, xml: &str) -> Result<NodeConfiguration, ParseError> {
        self.parse(xml.as_bytes())
    }

    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<NodeConfiguration, ParseError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| ParseError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        self.parse(&bytes)
    }
}
