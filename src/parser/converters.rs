use super::SectionParser;
use super::cursor::{Attributes, XmlCursor, XmlEvent};
use crate::error::ParseError;
use crate::model::{ConfigurationBuilder, OutputConverter, Relocator};

const CONVERTER: &str = "converter";
const CONVERTER_PROPERTY: &str = "converterProperty";
const RELOCATOR: &str = "relocator";

fn unexpected(element: String, scope: &str) -> ParseError {
    ParseError::UnexpectedElement {
        element,
        scope: scope.to_string(),
    }
}

fn eof(scope: &str) -> ParseError {
    ParseError::UnexpectedEof {
        scope: scope.to_string(),
    }
}

/// Parses `<outputConverters>`.
pub struct ConvertersSection;

impl SectionParser for ConvertersSection {
    fn tag(&self) -> &str {
        "outputConverters"
    }

    fn parse(
        &self,
        cursor: &mut XmlCursor<'_>,
        _attributes: &Attributes,
        builder: &mut ConfigurationBuilder,
    ) -> Result<(), ParseError> {
        loop {
            match cursor.next()? {
                XmlEvent::Start { name, attributes } if name == CONVERTER => {
                    let mut converter = OutputConverter {
                        class: attributes.require(CONVERTER, "class")?.to_string(),
                        reference: attributes.require(CONVERTER, "ref")?.to_string(),
                        properties: Vec::new(),
                    };
                    read_properties(cursor, &mut converter)?;
                    builder.add_output_converter(converter);
                }
                XmlEvent::Start { name, .. } => return Err(unexpected(name, self.tag())),
                XmlEvent::End { .. } => return Ok(()),
                XmlEvent::Text(_) => {}
                XmlEvent::Eof => return Err(eof(self.tag())),
            }
        }
    }
}

fn read_properties(cursor: &mut XmlCursor<'_>, converter: &mut OutputConverter) -> Result<(), ParseError> {
    loop {
        match cursor.next()? {
            XmlEvent::Start { name, attributes } if name == CONVERTER_PROPERTY => {
                let key = attributes.require(CONVERTER_PROPERTY, "name")?.to_string();
                let value = attributes.get("value").unwrap_or_default().to_string();
                converter.properties.push((key, value));
                cursor.expect_end(CONVERTER_PROPERTY)?;
            }
            XmlEvent::Start { name, .. } => return Err(unexpected(name, CONVERTER)),
            XmlEvent::End { .. } => return Ok(()),
            XmlEvent::Text(_) => {}
            XmlEvent::Eof => return Err(eof(CONVERTER)),
        }
    }
}

/// Parses `<relocators>`, at the document root or inside `<cli>`.
pub struct RelocatorsSection;

impl SectionParser for RelocatorsSection {
    fn tag(&self) -> &str {
        "relocators"
    }

    fn parse(
        &self,
        cursor: &mut XmlCursor<'_>,
        _attributes: &Attributes,
        builder: &mut ConfigurationBuilder,
    ) -> Result<(), ParseError> {
        loop {
            match cursor.next()? {
                XmlEvent::Start { name, attributes } if name == RELOCATOR => {
                    builder.add_relocator(Relocator {
                        reference: attributes.require(RELOCATOR, "reference")?.to_string(),
                        pattern: attributes.require(RELOCATOR, "pattern")?.to_string(),
                    });
                    cursor.expect_end(RELOCATOR)?;
                }
                XmlEvent::Start { name, .. } => return Err(unexpected(name, self.tag())),
                XmlEvent::End { .. } => return Ok(()),
                XmlEvent::Text(_) => {}
                XmlEvent::Eof => return Err(eof(self.tag())),
            }
        }
    }
}
