//! Serializes a configuration back into CTD.
//!
//! The output parses back into an equal configuration: same keys in the same order,
//! kinds, bounds, values, ports and MIME lists, CLI structure, relocators, converters
//! and metadata. Parameters are regrouped into nested `NODE`s from their section paths.

use crate::error::WriteError;
use crate::model::{CliElement, NodeConfiguration, Parameter, ParameterKind, Port};
use ahash::AHashSet;
use itertools::Itertools;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::fs;
use std::path::Path;

/// Writes [`NodeConfiguration`]s as CTD documents.
#[derive(Debug, Clone)]
pub struct CtdWriter {
    indent: usize,
}

impl Default for CtdWriter {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

impl CtdWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn write(&self, config: &NodeConfiguration) -> Result<String, WriteError> {
        let mut document = Document {
            writer: Writer::new_with_indent(Vec::new(), b' ', self.indent),
            config,
        };
        document.write()?;
        String::from_utf8(document.writer.into_inner()).map_err(|e| WriteError::Encoding(e.to_string()))
    }

    pub fn write_file(&self, config: &NodeConfiguration, path: impl AsRef<Path>) -> Result<(), WriteError> {
        let path = path.as_ref();
        let xml = self.write(config)?;
        fs::write(path, xml).map_err(|e| WriteError::Xml(format!("'{}': {}", path.display(), e)))
    }
}

struct Document<'a> {
    writer: Writer<Vec<u8>>,
    config: &'a NodeConfiguration,
}

impl Document<'_> {
    fn emit(&mut self, event: Event<'_>) -> Result<(), WriteError> {
        self.writer
            .write_event(event)
            .map_err(|e| WriteError::Xml(e.to_string()))
    }

    fn start(&mut self, start: BytesStart<'_>) -> Result<(), WriteError> {
        self.emit(Event::Start(start))
    }

    fn end(&mut self, name: &str) -> Result<(), WriteError> {
        self.emit(Event::End(BytesEnd::new(name)))
    }

    fn text_element(&mut self, name: &str, text: &str) -> Result<(), WriteError> {
        if text.is_empty() {
            return Ok(());
        }
        self.start(BytesStart::new(name))?;
        self.emit(Event::Text(BytesText::new(text)))?;
        self.end(name)
    }

    fn write(&mut self) -> Result<(), WriteError> {
        self.emit(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let config = self.config;
        let metadata = config.metadata();
        let mut tool = BytesStart::new("tool");
        for (name, value) in [
            ("name", &metadata.name),
            ("version", &metadata.version),
            ("docurl", &metadata.docurl),
            ("category", &metadata.category),
        ] {
            if !value.is_empty() {
                tool.push_attribute((name, value.as_str()));
            }
        }
        self.start(tool)?;
        self.text_element("description", &metadata.description)?;
        self.text_element("manual", &metadata.manual)?;
        self.text_element("executableName", &metadata.executable_name)?;
        self.text_element("executablePath", &metadata.executable_path)?;

        self.write_parameters()?;
        self.write_cli()?;
        self.write_converters()?;
        self.write_relocators()?;
        self.end("tool")
    }

    fn write_parameters(&mut self) -> Result<(), WriteError> {
        let config = self.config;
        let mut start = BytesStart::new("PARAMETERS");
        start.push_attribute(("version", "1.7.0"));
        self.start(start)?;

        let mut sections = SectionStack::default();
        for parameter in config.parameters() {
            sections.enter(self, &parameter.section)?;
            self.write_parameter(parameter)?;
        }
        let undescribed: Vec<&String> = config
            .section_descriptions()
            .keys()
            .filter(|path| !sections.emitted.contains(path.as_str()))
            .sorted()
            .collect();
        for path in undescribed {
            sections.enter(self, path)?;
        }
        sections.enter(self, "")?;
        self.end("PARAMETERS")
    }

    fn write_parameter(&mut self, parameter: &Parameter) -> Result<(), WriteError> {
        let config = self.config;
        let port = parameter.kind.port().and_then(|name| config.port(name));
        let is_list = parameter.kind.is_list();
        let element = if is_list { "ITEMLIST" } else { "ITEM" };

        let mut start = BytesStart::new(element);
        start.push_attribute(("name", parameter.local_name()));
        if !is_list {
            let value = match &parameter.value {
                Some(value) => value.tokens().into_iter().next().unwrap_or_default(),
                None => String::new(),
            };
            start.push_attribute(("value", value.as_str()));
        }
        start.push_attribute(("type", type_attribute(&parameter.kind)));
        start.push_attribute(("description", parameter.description.as_str()));

        let mut tags = Vec::new();
        if let Some((_, direction)) = port {
            tags.push(direction.tag());
        }
        if parameter.advanced {
            tags.push("advanced");
        }
        if !parameter.optional {
            tags.push("required");
        }
        if !tags.is_empty() {
            start.push_attribute(("tags", tags.join(",").as_str()));
        }

        if let Some(restrictions) = restrictions(&parameter.kind) {
            start.push_attribute(("restrictions", restrictions.as_str()));
        }
        if let Some((port, _)) = port {
            start.push_attribute(("supported_formats", supported_formats(port).as_str()));
        }

        if !is_list {
            return self.emit(Event::Empty(start));
        }

        self.start(start)?;
        if let Some(value) = &parameter.value {
            for token in value.tokens() {
                let mut item = BytesStart::new("LISTITEM");
                item.push_attribute(("value", token.as_str()));
                self.emit(Event::Empty(item))?;
            }
        }
        self.end(element)
    }

    fn write_cli(&mut self) -> Result<(), WriteError> {
        let config = self.config;
        self.start(BytesStart::new("cli"))?;
        for element in config.cli_elements() {
            self.write_cli_element(element)?;
        }
        self.end("cli")
    }

    fn write_cli_element(&mut self, element: &CliElement) -> Result<(), WriteError> {
        let mut start = BytesStart::new("clielement");
        start.push_attribute(("optionIdentifier", element.option_identifier.as_str()));
        start.push_attribute(("isList", bool_attribute(element.is_list)));
        start.push_attribute(("isRequired", bool_attribute(element.is_required)));
        if let Some(sequence) = element.sequence {
            start.push_attribute(("sequenceNumber", sequence.to_string().as_str()));
        }
        if element.mappings.is_empty() {
            return self.emit(Event::Empty(start));
        }

        self.start(start)?;
        for mapping in &element.mappings {
            let mut item = BytesStart::new("mapping");
            item.push_attribute(("referenceName", mapping.reference_name.as_str()));
            self.emit(Event::Empty(item))?;
        }
        self.end("clielement")
    }

    fn write_converters(&mut self) -> Result<(), WriteError> {
        let config = self.config;
        if config.output_converters().is_empty() {
            return Ok(());
        }
        self.start(BytesStart::new("outputConverters"))?;
        for converter in config.output_converters() {
            let mut start = BytesStart::new("converter");
            start.push_attribute(("class", converter.class.as_str()));
            start.push_attribute(("ref", converter.reference.as_str()));
            self.start(start)?;
            for (name, value) in &converter.properties {
                let mut property = BytesStart::new("converterProperty");
                property.push_attribute(("name", name.as_str()));
                property.push_attribute(("value", value.as_str()));
                self.emit(Event::Empty(property))?;
            }
            self.end("converter")?;
        }
        self.end("outputConverters")
    }

    fn write_relocators(&mut self) -> Result<(), WriteError> {
        let config = self.config;
        if config.relocators().is_empty() {
            return Ok(());
        }
        self.start(BytesStart::new("relocators"))?;
        for relocator in config.relocators() {
            let mut start = BytesStart::new("relocator");
            start.push_attribute(("reference", relocator.reference.as_str()));
            start.push_attribute(("pattern", relocator.pattern.as_str()));
            self.emit(Event::Empty(start))?;
        }
        self.end("relocators")
    }
}

/// Tracks the currently open `NODE` chain while parameters are written in order.
#[derive(Default)]
struct SectionStack {
    open: Vec<String>,
    emitted: AHashSet<String>,
}

impl SectionStack {
    /// Closes and opens `NODE`s until exactly the nodes of `section` are open.
    fn enter(&mut self, document: &mut Document<'_>, section: &str) -> Result<(), WriteError> {
        let target: Vec<&str> = if section.is_empty() {
            Vec::new()
        } else {
            section.split('.').collect()
        };
        let common = self
            .open
            .iter()
            .zip(&target)
            .take_while(|(open, wanted)| open.as_str() == **wanted)
            .count();

        while self.open.len() > common {
            self.open.pop();
            document.end("NODE")?;
        }
        for segment in &target[common..] {
            self.open.push(segment.to_string());
            let path = self.open.join(".");
            let mut start = BytesStart::new("NODE");
            start.push_attribute(("name", *segment));
            if let Some(description) = document.config.section_description(&path) {
                start.push_attribute(("description", description));
            }
            document.start(start)?;
            self.emitted.insert(path);
        }
        Ok(())
    }
}

fn type_attribute(kind: &ParameterKind) -> &'static str {
    match kind {
        ParameterKind::Int(_) | ParameterKind::IntList(_) => "int",
        ParameterKind::Double(_) | ParameterKind::DoubleList(_) => "double",
        ParameterKind::String
        | ParameterKind::Bool
        | ParameterKind::StringChoice(_)
        | ParameterKind::StringList
        | ParameterKind::File { .. }
        | ParameterKind::FileList { .. } => "string",
    }
}

fn restrictions(kind: &ParameterKind) -> Option<String> {
    match kind {
        ParameterKind::Int(bounds) | ParameterKind::IntList(bounds) if !bounds.is_unbounded() => {
            Some(bounds.to_restriction())
        }
        ParameterKind::Double(bounds) | ParameterKind::DoubleList(bounds)
            if !bounds.is_unbounded() =>
        {
            Some(bounds.to_restriction())
        }
        ParameterKind::Bool => Some("true,false".to_string()),
        ParameterKind::StringChoice(allowed) => Some(allowed.join(",")),
        _ => None,
    }
}

fn supported_formats(port: &Port) -> String {
    port.mime_types.iter().map(|m| format!("*.{}", m)).join(",")
}

fn bool_attribute(flag: bool) -> &'static str {
    if flag { "true" } else { "false" }
}
