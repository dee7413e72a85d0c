use super::SectionParser;
use super::cursor::{Attributes, XmlCursor, XmlEvent};
use crate::error::ParseError;
use crate::model::{ConfigurationBuilder, ToolMetadata};
use ahash::AHashMap;

/// Root scope: reads tool metadata and hands registered sections to their parsers.
pub(super) struct RootScope<'a> {
    pub(super) sections: &'a AHashMap<String, Box<dyn SectionParser>>,
    pub(super) skipped: &'a [String],
}

impl RootScope<'_> {
    pub(super) fn parse(
        &self,
        cursor: &mut XmlCursor<'_>,
        builder: &mut ConfigurationBuilder,
    ) -> Result<(), ParseError> {
        let (root, attributes) = loop {
            match cursor.next()? {
                XmlEvent::Start { name, attributes } => break (name, attributes),
                XmlEvent::Eof => return Err(ParseError::MissingRoot),
                _ => {}
            }
        };
        read_root_attributes(&attributes, builder.metadata_mut());

        loop {
            match cursor.next()? {
                XmlEvent::Start { name, attributes } => {
                    if let Some(field) = metadata_field(builder.metadata_mut(), &name) {
                        *field = cursor.read_text(&name)?.trim().to_string();
                    } else if let Some(section) = self.sections.get(&name) {
                        tracing::debug!(section = %name, "Handing off to section parser");
                        section.parse(cursor, &attributes, builder)?;
                    } else if self.skipped.contains(&name) {
                        tracing::debug!(element = %name, "Skipping element");
                        cursor.skip_element(&name)?;
                    } else {
                        return Err(ParseError::UnexpectedElement {
                            element: name,
                            scope: root,
                        });
                    }
                }
                XmlEvent::End { .. } => return Ok(()),
                XmlEvent::Text(_) => {}
                XmlEvent::Eof => return Err(ParseError::UnexpectedEof { scope: root }),
            }
        }
    }
}

fn read_root_attributes(attributes: &Attributes, metadata: &mut ToolMetadata) {
    for name in ["name", "version", "docurl", "category", "description"] {
        if let (Some(value), Some(field)) = (attributes.get(name), metadata_field(metadata, name)) {
            *field = value.to_string();
        }
    }
}

fn metadata_field<'m>(metadata: &'m mut ToolMetadata, element: &str) -> Option<&'m mut String> {
    match element {
        "name" => Some(&mut metadata.name),
        "version" => Some(&mut metadata.version),
        "description" => Some(&mut metadata.description),
        "manual" => Some(&mut metadata.manual),
        "docurl" => Some(&mut metadata.docurl),
        "category" => Some(&mut metadata.category),
        "executableName" => Some(&mut metadata.executable_name),
        "executablePath" => Some(&mut metadata.executable_path),
        _ => None,
    }
}
