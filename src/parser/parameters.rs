use super::SectionParser;
use super::cursor::{Attributes, XmlCursor, XmlEvent};
use super::literal;
use crate::error::ParseError;
use crate::model::{ConfigurationBuilder, Parameter, ParameterKind, Port, PortDirection, Value};
use ahash::AHashSet;

const NODE: &str = "NODE";
const ITEM: &str = "ITEM";
const ITEMLIST: &str = "ITEMLIST";
const LISTITEM: &str = "LISTITEM";

/// Parses the `<PARAMETERS>` tree into parameters, ports and section descriptions.
pub struct ParametersSection {
    ignored: AHashSet<String>,
}

impl ParametersSection {
    pub fn new<I, S>(ignored_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ignored: ignored_names.into_iter().map(Into::into).collect(),
        }
    }
}

impl SectionParser for ParametersSection {
    fn tag(&self) -> &str {
        "PARAMETERS"
    }

    fn parse(
        &self,
        cursor: &mut XmlCursor<'_>,
        _attributes: &Attributes,
        builder: &mut ConfigurationBuilder,
    ) -> Result<(), ParseError> {
        let mut scope = ParameterScope {
            prefix: String::new(),
            depth: 0,
            ignored: &self.ignored,
            builder,
        };

        loop {
            match cursor.next()? {
                XmlEvent::Start { name, attributes } => match name.as_str() {
                    NODE => scope.open_node(&attributes)?,
                    ITEM => scope.item(cursor, &attributes)?,
                    ITEMLIST => scope.item_list(cursor, &attributes)?,
                    _ => {
                        return Err(ParseError::UnexpectedElement {
                            element: name,
                            scope: scope.current_scope().to_string(),
                        });
                    }
                },
                XmlEvent::End { .. } if scope.depth > 0 => scope.close_node(),
                XmlEvent::End { .. } => return Ok(()),
                XmlEvent::Text(_) => {}
                XmlEvent::Eof => {
                    return Err(ParseError::UnexpectedEof {
                        scope: self.tag().to_string(),
                    });
                }
            }
        }
    }
}

/// Everything read from an `ITEM`/`ITEMLIST` start tag.
struct ItemDeclaration {
    name: String,
    key: String,
    type_name: String,
    value: Option<String>,
    description: String,
    restrictions: Option<String>,
    supported_formats: Option<String>,
    port: Option<PortDirection>,
    advanced: bool,
    optional: bool,
}

impl ItemDeclaration {
    fn to_port(&self, direction: PortDirection, multi_file: bool) -> (PortDirection, Port) {
        let mime_types = literal::mime_types(
            self.supported_formats.as_deref(),
            self.restrictions.as_deref(),
        );
        let port = Port::new(&self.key, multi_file)
            .with_mime_types(mime_types)
            .with_description(&self.description)
            .optional(self.optional);
        (direction, port)
    }

    fn parameter(&self, section: &str, kind: ParameterKind, value: Option<Value>) -> Parameter {
        Parameter {
            key: self.key.clone(),
            kind,
            value,
            description: self.description.clone(),
            section: section.to_string(),
            advanced: self.advanced,
            optional: self.optional,
        }
    }
}

/// Mutable state of one `<PARAMETERS>` pass: the `NODE` path prefix and the target builder.
struct ParameterScope<'a> {
    /// Dotted path of the open `NODE`s, with a trailing separator when non-empty.
    prefix: String,
    depth: usize,
    ignored: &'a AHashSet<String>,
    builder: &'a mut ConfigurationBuilder,
}

impl ParameterScope<'_> {
    fn current_scope(&self) -> &'static str {
        if self.depth == 0 { "PARAMETERS" } else { NODE }
    }

    fn section(&self) -> &str {
        self.prefix.strip_suffix('.').unwrap_or(&self.prefix)
    }

    fn open_node(&mut self, attributes: &Attributes) -> Result<(), ParseError> {
        let name = attributes.require(NODE, "name")?;
        self.prefix.push_str(name);
        if let Some(description) = attributes.get("description") {
            let path = self.prefix.clone();
            self.builder.add_section_description(path, description);
        }
        self.prefix.push('.');
        self.depth += 1;
        tracing::trace!(section = self.section(), "Entered parameter section");
        Ok(())
    }

    fn close_node(&mut self) {
        let trimmed = self.prefix.strip_suffix('.').unwrap_or(&self.prefix);
        let keep = trimmed.rfind('.').map(|i| i + 1).unwrap_or(0);
        self.prefix.truncate(keep);
        self.depth -= 1;
    }

    fn declaration(&self, element: &str, attributes: &Attributes) -> Result<ItemDeclaration, ParseError> {
        let name = attributes.require(element, "name")?.to_string();
        let key = format!("{}{}", self.prefix, name);
        let type_name = attributes.require(element, "type")?.trim().to_ascii_lowercase();
        let tags = literal::parse_tags(attributes.get("tags"));

        let port = if tags.contains(PortDirection::Input.tag()) || type_name == "input-file" {
            Some(PortDirection::Input)
        } else if tags.contains(PortDirection::Output.tag()) || type_name == "output-file" {
            Some(PortDirection::Output)
        } else {
            None
        };
        let advanced = tags.contains("advanced")
            || literal::parse_flag(element, "advanced", attributes.get("advanced"))?;
        let mandatory = tags.contains("mandatory")
            || tags.contains("required")
            || literal::parse_flag(element, "required", attributes.get("required"))?;

        Ok(ItemDeclaration {
            name,
            key,
            type_name,
            value: attributes.get("value").map(str::to_string),
            description: attributes.get("description").unwrap_or_default().to_string(),
            restrictions: attributes.non_blank("restrictions").map(str::to_string),
            supported_formats: attributes.non_blank("supported_formats").map(str::to_string),
            port,
            advanced,
            optional: !mandatory,
        })
    }

    fn is_ignored(&self, declaration: &ItemDeclaration) -> bool {
        if self.ignored.contains(&declaration.name) {
            tracing::debug!(key = %declaration.key, "Ignoring housekeeping item");
            return true;
        }
        false
    }

    fn item(&mut self, cursor: &mut XmlCursor<'_>, attributes: &Attributes) -> Result<(), ParseError> {
        let decl = self.declaration(ITEM, attributes)?;
        cursor.expect_end(ITEM)?;
        if self.is_ignored(&decl) {
            return Ok(());
        }

        let raw_value = decl.value.as_deref().filter(|v| !v.is_empty());
        let parameter = match decl.port {
            Some(direction) => {
                let (direction, port) = decl.to_port(direction, false);
                self.builder.add_port(direction, port);
                let kind = ParameterKind::File {
                    port: decl.key.clone(),
                };
                decl.parameter(self.section(), kind, raw_value.map(|v| Value::Str(v.to_string())))
            }
            None => {
                let (kind, ty) =
                    literal::scalar_kind(&decl.key, &decl.type_name, decl.restrictions.as_deref())?;
                let value = raw_value
                    .map(|v| literal::parse_scalar(&decl.key, ty, v))
                    .transpose()?;
                if let ParameterKind::StringChoice(allowed) = &kind {
                    check_choice(&decl.key, allowed, value.as_ref())?;
                }
                let parameter = decl.parameter(self.section(), kind, value);
                warn_out_of_bounds(&parameter);
                parameter
            }
        };
        self.builder.add_parameter(parameter);
        Ok(())
    }

    fn item_list(&mut self, cursor: &mut XmlCursor<'_>, attributes: &Attributes) -> Result<(), ParseError> {
        let decl = self.declaration(ITEMLIST, attributes)?;
        let entries = read_list_items(cursor)?;
        if self.is_ignored(&decl) {
            return Ok(());
        }

        let parameter = match decl.port {
            Some(direction) => {
                let (direction, port) = decl.to_port(direction, true);
                self.builder.add_port(direction, port);
                let kind = ParameterKind::FileList {
                    port: decl.key.clone(),
                };
                decl.parameter(self.section(), kind, Some(Value::StrList(entries)))
            }
            None => {
                let (kind, ty) =
                    literal::list_kind(&decl.key, &decl.type_name, decl.restrictions.as_deref())?;
                let value = literal::parse_list(&decl.key, ty, &entries)?;
                let parameter = decl.parameter(self.section(), kind, Some(value));
                warn_out_of_bounds(&parameter);
                parameter
            }
        };
        self.builder.add_parameter(parameter);
        Ok(())
    }
}

/// Buffers the `value` of every `LISTITEM` up to the closing `ITEMLIST` tag.
fn read_list_items(cursor: &mut XmlCursor<'_>) -> Result<Vec<String>, ParseError> {
    let mut entries = Vec::new();
    loop {
        match cursor.next()? {
            XmlEvent::Start { name, attributes } if name == LISTITEM => {
                entries.push(attributes.get("value").unwrap_or_default().to_string());
                cursor.expect_end(LISTITEM)?;
            }
            XmlEvent::Start { name, .. } => {
                return Err(ParseError::UnexpectedElement {
                    element: name,
                    scope: ITEMLIST.to_string(),
                });
            }
            XmlEvent::End { .. } => return Ok(entries),
            XmlEvent::Text(_) => {}
            XmlEvent::Eof => {
                return Err(ParseError::UnexpectedEof {
                    scope: ITEMLIST.to_string(),
                });
            }
        }
    }
}

fn check_choice(key: &str, allowed: &[String], value: Option<&Value>) -> Result<(), ParseError> {
    match value {
        Some(Value::Str(s)) if !allowed.contains(s) => Err(ParseError::InvalidChoice {
            key: key.to_string(),
            value: s.clone(),
            allowed: allowed.join(","),
        }),
        _ => Ok(()),
    }
}

/// Logs a default that violates its own constraints. The value is kept as declared.
fn warn_out_of_bounds(parameter: &Parameter) {
    let Some(value) = parameter.value.clone() else {
        return;
    };
    if let Err(e) = parameter.kind.coerce(&parameter.key, value) {
        tracing::warn!("Default value kept despite constraint violation: {}", e);
    }
}
