use crate::error::ValidationError;
use crate::model::{MappingTarget, NodeConfiguration, Port};
use ahash::AHashSet;
use itertools::Itertools;

/// Cross-checks the internal references of a freshly parsed configuration.
///
/// Runs once, right after parsing and before the configuration is used.
pub struct Validator<'a> {
    config: &'a NodeConfiguration,
}

impl<'a> Validator<'a> {
    pub fn new(config: &'a NodeConfiguration) -> Self {
        Self { config }
    }

    /// Fails with the first structural error found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.check_unique_keys()?;
        self.check_unique_ports()?;
        self.check_ports()?;
        self.check_cli_elements()?;
        self.check_relocators()?;
        tracing::debug!(tool = %self.config.metadata().name, "Configuration validated");
        Ok(())
    }

    /// Runs every check and reports all structural errors instead of the first.
    pub fn collect_errors(&self) -> Vec<ValidationError> {
        let checks: [fn(&Self) -> Result<(), ValidationError>; 5] = [
            Self::check_unique_keys,
            Self::check_unique_ports,
            Self::check_ports,
            Self::check_cli_elements,
            Self::check_relocators,
        ];
        checks.iter().filter_map(|check| check(self).err()).collect()
    }

    fn check_unique_keys(&self) -> Result<(), ValidationError> {
        let mut seen = AHashSet::new();
        for parameter in self.config.parameters() {
            if !seen.insert(parameter.key.as_str()) {
                return Err(ValidationError::DuplicateParameter(parameter.key.clone()));
            }
        }
        Ok(())
    }

    fn check_unique_ports(&self) -> Result<(), ValidationError> {
        let mut seen = AHashSet::new();
        let ports = self.config.input_ports().iter().chain(self.config.output_ports());
        for port in ports {
            if !seen.insert(port.name.as_str()) {
                return Err(ValidationError::DuplicatePort(port.name.clone()));
            }
        }
        Ok(())
    }

    /// Every port needs a file parameter of the same name and cardinality, and at
    /// least one MIME type.
    fn check_ports(&self) -> Result<(), ValidationError> {
        let ports = self.config.input_ports().iter().chain(self.config.output_ports());
        for port in ports {
            self.check_port(port)?;
        }
        Ok(())
    }

    fn check_port(&self, port: &Port) -> Result<(), ValidationError> {
        let parameter = self
            .config
            .parameter(&port.name)
            .ok_or_else(|| ValidationError::PortWithoutParameter(port.name.clone()))?;
        if parameter.kind.port().is_none() {
            return Err(ValidationError::PortNotFile {
                port: port.name.clone(),
                key: parameter.key.clone(),
            });
        }
        if parameter.kind.is_list() != port.multi_file {
            return Err(ValidationError::CardinalityMismatch {
                port: port.name.clone(),
                multi_file: port.multi_file,
            });
        }
        if port.mime_types.is_empty() {
            return Err(ValidationError::MissingMimeTypes(port.name.clone()));
        }
        Ok(())
    }

    fn check_cli_elements(&self) -> Result<(), ValidationError> {
        for (index, element) in self.config.cli_elements().iter().enumerate() {
            let mut targets = Vec::with_capacity(element.mappings.len());
            for mapping in &element.mappings {
                let target = self.config.resolve(&mapping.reference_name).ok_or_else(|| {
                    ValidationError::UnknownReference {
                        element: index,
                        reference: mapping.reference_name.clone(),
                    }
                })?;
                targets.push(target);
            }

            if targets.len() > 1 {
                let boolean = targets.iter().find_map(|t| match t {
                    MappingTarget::Parameter(p) if p.kind.is_bool() => Some(p.key.clone()),
                    _ => None,
                });
                if let Some(key) = boolean {
                    return Err(ValidationError::BoolInMultiMapping {
                        element: index,
                        mappings: targets.len(),
                        key,
                    });
                }
            }

            let is_list = |t: &MappingTarget<'_>| match t {
                MappingTarget::Parameter(p) => p.kind.is_list(),
                MappingTarget::Port(port, _) => port.multi_file,
            };
            if !targets.iter().map(is_list).all_equal() {
                return Err(ValidationError::MixedCardinality { element: index });
            }

            self.check_list_lengths(index, &targets)?;
        }
        Ok(())
    }

    /// Mapped lists in one element must currently share a length.
    fn check_list_lengths(&self, index: usize, targets: &[MappingTarget<'_>]) -> Result<(), ValidationError> {
        let mut expected = None;
        for target in targets {
            let MappingTarget::Parameter(parameter) = target else {
                continue;
            };
            let Some(found) = parameter.value.as_ref().and_then(|v| v.list_len()) else {
                continue;
            };
            match expected {
                None => expected = Some(found),
                Some(expected) if expected != found => {
                    return Err(ValidationError::ListLengthMismatch {
                        element: index,
                        key: parameter.key.clone(),
                        expected,
                        found,
                    });
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    fn check_relocators(&self) -> Result<(), ValidationError> {
        for relocator in self.config.relocators() {
            if self.config.output_port(&relocator.reference).is_none() {
                return Err(ValidationError::UnknownRelocatorPort(relocator.reference.clone()));
            }
        }
        Ok(())
    }
}
