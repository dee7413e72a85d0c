use super::cli::{CliElement, OutputConverter, Relocator};
use super::parameter::Parameter;
use super::port::{Port, PortDirection};
use super::value::Value;
use crate::error::ValueError;
use ahash::AHashMap;

/// Descriptive metadata of the wrapped tool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolMetadata {
    pub name: String,
    pub version: String,
    pub description: String,
    pub manual: String,
    pub docurl: String,
    pub category: String,
    pub executable_name: String,
    pub executable_path: String,
}

/// What a CLI mapping's reference name resolved to.
#[derive(Debug, Clone, Copy)]
pub enum MappingTarget<'a> {
    Parameter(&'a Parameter),
    Port(&'a Port, PortDirection),
}

/// The typed configuration of one tool, as declared by its CTD.
///
/// Structure is fixed once built; only parameter values change afterwards,
/// through [`NodeConfiguration::set_value`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeConfiguration {
    metadata: ToolMetadata,
    parameters: Vec<Parameter>,
    index: AHashMap<String, usize>,
    input_ports: Vec<Port>,
    output_ports: Vec<Port>,
    cli_elements: Vec<CliElement>,
    relocators: Vec<Relocator>,
    output_converters: Vec<OutputConverter>,
    section_descriptions: AHashMap<String, String>,
}

impl NodeConfiguration {
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::default()
    }

    pub fn metadata(&self) -> &ToolMetadata {
        &self.metadata
    }

    /// All parameters in declaration order.
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn parameter(&self, key: &str) -> Option<&Parameter> {
        self.index.get(key).map(|&i| &self.parameters[i])
    }

    pub fn input_ports(&self) -> &[Port] {
        &self.input_ports
    }

    pub fn output_ports(&self) -> &[Port] {
        &self.output_ports
    }

    pub fn input_port(&self, name: &str) -> Option<&Port> {
        self.input_ports.iter().find(|p| p.name == name)
    }

    pub fn output_port(&self, name: &str) -> Option<&Port> {
        self.output_ports.iter().find(|p| p.name == name)
    }

    /// Looks a port up in both lists, inputs first.
    pub fn port(&self, name: &str) -> Option<(&Port, PortDirection)> {
        self.input_port(name)
            .map(|p| (p, PortDirection::Input))
            .or_else(|| self.output_port(name).map(|p| (p, PortDirection::Output)))
    }

    pub fn cli_elements(&self) -> &[CliElement] {
        &self.cli_elements
    }

    pub fn relocators(&self) -> &[Relocator] {
        &self.relocators
    }

    pub fn output_converters(&self) -> &[OutputConverter] {
        &self.output_converters
    }

    pub fn section_descriptions(&self) -> &AHashMap<String, String> {
        &self.section_descriptions
    }

    pub fn section_description(&self, path: &str) -> Option<&str> {
        self.section_descriptions.get(path).map(String::as_str)
    }

    /// Resolves a CLI reference against parameter keys first, then port names.
    pub fn resolve(&self, reference: &str) -> Option<MappingTarget<'_>> {
        self.parameter(reference)
            .map(MappingTarget::Parameter)
            .or_else(|| {
                self.port(reference)
                    .map(|(port, direction)| MappingTarget::Port(port, direction))
            })
    }

    /// Type-checks and assigns the current value of a parameter.
    pub fn set_value(&mut self, key: &str, value: Value) -> Result<(), ValueError> {
        let index = *self
            .index
            .get(key)
            .ok_or_else(|| ValueError::UnknownParameter(key.to_string()))?;
        self.parameters[index].set_value(value)
    }

    /// Unsets the current value of a parameter.
    pub fn clear_value(&mut self, key: &str) -> Result<(), ValueError> {
        let index = *self
            .index
            .get(key)
            .ok_or_else(|| ValueError::UnknownParameter(key.to_string()))?;
        self.parameters[index].clear_value();
        Ok(())
    }
}

/// Assembles a [`NodeConfiguration`] in declaration order.
///
/// Duplicate parameter keys are kept so the validator can report them; lookups
/// by key return the first declaration.
#[derive(Debug, Default)]
pub struct ConfigurationBuilder {
    metadata: ToolMetadata,
    parameters: Vec<Parameter>,
    input_ports: Vec<Port>,
    output_ports: Vec<Port>,
    cli_elements: Vec<CliElement>,
    relocators: Vec<Relocator>,
    output_converters: Vec<OutputConverter>,
    section_descriptions: AHashMap<String, String>,
}

impl ConfigurationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metadata_mut(&mut self) -> &mut ToolMetadata {
        &mut self.metadata
    }

    pub fn with_metadata(&mut self, metadata: ToolMetadata) -> &mut Self {
        self.metadata = metadata;
        self
    }

    pub fn add_parameter(&mut self, parameter: Parameter) -> &mut Self {
        self.parameters.push(parameter);
        self
    }

    pub fn add_port(&mut self, direction: PortDirection, port: Port) -> &mut Self {
        match direction {
            PortDirection::Input => self.input_ports.push(port),
            PortDirection::Output => self.output_ports.push(port),
        }
        self
    }

    pub fn add_cli_element(&mut self, element: CliElement) -> &mut Self {
        self.cli_elements.push(element);
        self
    }

    pub fn add_relocator(&mut self, relocator: Relocator) -> &mut Self {
        self.relocators.push(relocator);
        self
    }

    pub fn add_output_converter(&mut self, converter: OutputConverter) -> &mut Self {
        self.output_converters.push(converter);
        self
    }

    pub fn add_section_description(
        &mut self,
        path: impl Into<String>,
        description: impl Into<String>,
    ) -> &mut Self {
        self.section_descriptions
            .insert(path.into(), description.into());
        self
    }

    pub fn build(self) -> NodeConfiguration {
        let mut index = AHashMap::with_capacity(self.parameters.len());
        for (i, parameter) in self.parameters.iter().enumerate() {
            index.entry(parameter.key.clone()).or_insert(i);
        }
        NodeConfiguration {
            metadata: self.metadata,
            parameters: self.parameters,
            index,
            input_ports: self.input_ports,
            output_ports: self.output_ports,
            cli_elements: self.cli_elements,
            relocators: self.relocators,
            output_converters: self.output_converters,
            section_descriptions: self.section_descriptions,
        }
    }
}
