use crate::error::CompileError;
use crate::model::{CliElement, MappingTarget, NodeConfiguration, Value};
use crate::values::ValueSource;

/// One mapping of an element, resolved against the configuration and the value source.
struct ResolvedMapping<'v> {
    key: String,
    optional: bool,
    is_bool: bool,
    value: Option<&'v Value>,
}

/// Expands a single CLI element into command-line tokens.
pub(super) struct ElementExpander<'a, 'v, V: ValueSource + ?Sized> {
    pub(super) config: &'a NodeConfiguration,
    pub(super) values: &'v V,
}

impl<'v, V: ValueSource + ?Sized> ElementExpander<'_, 'v, V> {
    pub(super) fn expand(
        &self,
        index: usize,
        element: &CliElement,
        out: &mut Vec<String>,
    ) -> Result<(), CompileError> {
        let literal = element.option_identifier.as_str();

        if element.mappings.is_empty() {
            if !literal.is_empty() {
                out.push(literal.to_string());
            }
            return Ok(());
        }

        let mappings = element
            .mappings
            .iter()
            .map(|m| self.resolve(index, &m.reference_name))
            .collect::<Result<Vec<_>, _>>()?;

        if let [mapping] = mappings.as_slice() {
            if mapping.is_bool {
                if matches!(mapping.value, Some(Value::Bool(true))) && !literal.is_empty() {
                    out.push(literal.to_string());
                }
                return Ok(());
            }
        }
        if let Some(mapping) = mappings.iter().find(|m| m.is_bool) {
            return Err(CompileError::BoolInMultiMapping {
                element: index,
                key: mapping.key.clone(),
            });
        }

        let mut present: Vec<(&str, &Value)> = Vec::with_capacity(mappings.len());
        for mapping in &mappings {
            match mapping.value {
                Some(value) => present.push((mapping.key.as_str(), value)),
                None if mapping.optional => {
                    tracing::trace!(element = index, key = %mapping.key, "Skipping unset optional mapping");
                }
                None => {
                    return Err(CompileError::MissingValue {
                        element: index,
                        key: mapping.key.clone(),
                    });
                }
            }
        }

        if present.is_empty() {
            if element.is_required {
                return Err(CompileError::MissingValue {
                    element: index,
                    key: mappings[0].key.clone(),
                });
            }
            return Ok(());
        }

        let list_count = present.iter().filter(|(_, v)| v.is_list()).count();
        if list_count == 0 {
            if !literal.is_empty() {
                out.push(literal.to_string());
            }
            for (_, value) in &present {
                out.extend(value.tokens());
            }
            return Ok(());
        }
        if list_count != present.len() {
            return Err(CompileError::MixedCardinality { element: index });
        }

        let expected = present[0].1.list_len().unwrap_or_default();
        for (key, value) in &present[1..] {
            let found = value.list_len().unwrap_or_default();
            if found != expected {
                return Err(CompileError::ListLengthMismatch {
                    element: index,
                    key: key.to_string(),
                    expected,
                    found,
                });
            }
        }

        for i in 0..expected {
            if !literal.is_empty() {
                out.push(literal.to_string());
            }
            out.extend(present.iter().filter_map(|(_, value)| value.token_at(i)));
        }
        Ok(())
    }

    fn resolve(&self, index: usize, reference: &str) -> Result<ResolvedMapping<'v>, CompileError> {
        let (key, optional, is_bool) = match self.config.resolve(reference) {
            Some(MappingTarget::Parameter(p)) => (p.key.clone(), p.optional, p.kind.is_bool()),
            Some(MappingTarget::Port(port, _)) => (port.name.clone(), port.optional, false),
            None => {
                return Err(CompileError::UnresolvedReference {
                    element: index,
                    reference: reference.to_string(),
                });
            }
        };
        let value = self.values.value_of(&key);
        Ok(ResolvedMapping {
            key,
            optional,
            is_bool,
            value,
        })
    }
}
