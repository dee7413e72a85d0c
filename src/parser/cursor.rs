use crate::error::ParseError;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Attributes of an element, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns the attribute, or a `MissingAttribute` error naming `element`.
    pub fn require(&self, element: &str, name: &str) -> Result<&str, ParseError> {
        self.get(name).ok_or_else(|| ParseError::MissingAttribute {
            element: element.to_string(),
            attribute: name.to_string(),
        })
    }

    /// Returns the attribute unless it is absent or blank.
    pub fn non_blank(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|v| !v.trim().is_empty())
    }
}

/// An owned XML event, detached from the reader's buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlEvent {
    Start { name: String, attributes: Attributes },
    End { name: String },
    Text(String),
    Eof,
}

/// Forward-only pull cursor over a CTD document.
///
/// Empty elements are expanded into a start/end pair and whitespace-only text is
/// dropped, so every scope sees the same event shape.
pub struct XmlCursor<'a> {
    reader: Reader<&'a [u8]>,
}

impl<'a> XmlCursor<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        let mut reader = Reader::from_reader(bytes);
        let config = reader.config_mut();
        config.trim_text(true);
        config.expand_empty_elements = true;
        Self { reader }
    }

    fn xml_error(&self, message: impl ToString) -> ParseError {
        ParseError::Xml {
            position: self.reader.buffer_position() as u64,
            message: message.to_string(),
        }
    }

    fn attributes(&self, start: &BytesStart<'_>) -> Result<Attributes, ParseError> {
        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(|e| self.xml_error(e))?;
            let key = String::from_utf8_lossy(attribute.key.local_name().as_ref()).into_owned();
            let value = attribute
                .unescape_value()
                .map_err(|e| self.xml_error(e))?
                .into_owned();
            attributes.push((key, value));
        }
        Ok(Attributes(attributes))
    }

    /// Advances to the next structural event, skipping declarations, comments,
    /// processing instructions and doctypes.
    pub fn next(&mut self) -> Result<XmlEvent, ParseError> {
        loop {
            let event = self.reader.read_event().map_err(|e| self.xml_error(e))?;
            return match event {
                Event::Start(start) => {
                    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
                    let attributes = self.attributes(&start)?;
                    Ok(XmlEvent::Start { name, attributes })
                }
                Event::End(end) => Ok(XmlEvent::End {
                    name: String::from_utf8_lossy(end.local_name().as_ref()).into_owned(),
                }),
                Event::Text(text) => {
                    let text = text.unescape().map_err(|e| self.xml_error(e))?;
                    Ok(XmlEvent::Text(text.into_owned()))
                }
                Event::CData(data) => Ok(XmlEvent::Text(String::from_utf8_lossy(&data).into_owned())),
                Event::Eof => Ok(XmlEvent::Eof),
                _ => continue,
            };
        }
    }

    /// Collects the text content of `element` up to its closing tag.
    pub fn read_text(&mut self, element: &str) -> Result<String, ParseError> {
        let mut content = String::new();
        loop {
            match self.next()? {
                XmlEvent::Text(text) => content.push_str(&text),
                XmlEvent::End { .. } => return Ok(content),
                XmlEvent::Start { name, .. } => {
                    return Err(ParseError::UnexpectedElement {
                        element: name,
                        scope: element.to_string(),
                    });
                }
                XmlEvent::Eof => {
                    return Err(ParseError::UnexpectedEof {
                        scope: element.to_string(),
                    });
                }
            }
        }
    }

    /// Consumes the closing tag of a leaf `element`, rejecting child elements.
    pub fn expect_end(&mut self, element: &str) -> Result<(), ParseError> {
        self.read_text(element).map(|_| ())
    }

    /// Consumes the rest of the document after the root element has closed.
    ///
    /// Only comments, processing instructions and whitespace may follow the root.
    pub fn expect_eof(&mut self) -> Result<(), ParseError> {
        match self.next()? {
            XmlEvent::Eof => Ok(()),
            XmlEvent::Start { name, .. } => Err(ParseError::UnexpectedElement {
                element: name,
                scope: "document".to_string(),
            }),
            XmlEvent::End { name } => Err(self.xml_error(format!("unmatched closing tag </{}>", name))),
            XmlEvent::Text(text) => Err(self.xml_error(format!("text after the root element: '{}'", text))),
        }
    }

    /// Skips the remainder of `element`, including any nested children.
    pub fn skip_element(&mut self, element: &str) -> Result<(), ParseError> {
        let mut depth = 0usize;
        loop {
            match self.next()? {
                XmlEvent::Start { .. } => depth += 1,
                XmlEvent::End { .. } if depth == 0 => return Ok(()),
                XmlEvent::End { .. } => depth -= 1,
                XmlEvent::Text(_) => {}
                XmlEvent::Eof => {
                    return Err(ParseError::UnexpectedEof {
                        scope: element.to_string(),
                    });
                }
            }
        }
    }
}
