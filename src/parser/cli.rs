use super::SectionParser;
use super::converters::RelocatorsSection;
use super::cursor::{Attributes, XmlCursor, XmlEvent};
use super::literal;
use crate::error::ParseError;
use crate::model::{CliElement, CliMapping, ConfigurationBuilder};

const CLI_ELEMENT: &str = "clielement";
const MAPPING: &str = "mapping";

/// Parses `<cli>` into the ordered list of command-line elements.
pub struct CliSection;

impl SectionParser for CliSection {
    fn tag(&self) -> &str {
        "cli"
    }

    fn parse(
        &self,
        cursor: &mut XmlCursor<'_>,
        _attributes: &Attributes,
        builder: &mut ConfigurationBuilder,
    ) -> Result<(), ParseError> {
        loop {
            match cursor.next()? {
                XmlEvent::Start { name, attributes } if name == CLI_ELEMENT => {
                    let element = parse_element(cursor, &attributes)?;
                    builder.add_cli_element(element);
                }
                XmlEvent::Start { name, attributes } if name == RelocatorsSection.tag() => {
                    RelocatorsSection.parse(cursor, &attributes, builder)?;
                }
                XmlEvent::Start { name, .. } => {
                    return Err(ParseError::UnexpectedElement {
                        element: name,
                        scope: self.tag().to_string(),
                    });
                }
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

fn parse_element(cursor: &mut XmlCursor<'_>, attributes: &Attributes) -> Result<CliElement, ParseError> {
    let sequence = attributes
        .non_blank("sequenceNumber")
        .map(|raw| {
            raw.trim().parse::<u32>().map_err(|_| ParseError::InvalidNumber {
                key: format!("{}.sequenceNumber", CLI_ELEMENT),
                literal: raw.to_string(),
            })
        })
        .transpose()?;

    let mut element = CliElement {
        option_identifier: attributes.get("optionIdentifier").unwrap_or_default().to_string(),
        mappings: Vec::new(),
        is_list: literal::parse_flag(CLI_ELEMENT, "isList", attributes.get("isList"))?,
        is_required: literal::parse_flag(CLI_ELEMENT, "isRequired", attributes.get("isRequired"))?,
        sequence,
    };

    loop {
        match cursor.next()? {
            XmlEvent::Start { name, attributes } if name == MAPPING => {
                let reference = attributes
                    .get("referenceName")
                    .or_else(|| attributes.get("reference"))
                    .ok_or_else(|| ParseError::MissingAttribute {
                        element: MAPPING.to_string(),
                        attribute: "referenceName".to_string(),
                    })?;
                element.mappings.push(CliMapping::new(reference));
                cursor.expect_end(MAPPING)?;
            }
            XmlEvent::Start { name, .. } => {
                return Err(ParseError::UnexpectedElement {
                    element: name,
                    scope: CLI_ELEMENT.to_string(),
                });
            }
            XmlEvent::End { .. } => return Ok(element),
            XmlEvent::Text(_) => {}
            XmlEvent::Eof => {
                return Err(ParseError::UnexpectedEof {
                    scope: CLI_ELEMENT.to_string(),
                });
            }
        }
    }
}
