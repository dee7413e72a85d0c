/// Direction of a data-flow endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortDirection {
    Input,
    Output,
}

impl PortDirection {
    /// The CTD tag token that classifies an item as a port of this direction.
    pub fn tag(&self) -> &'static str {
        match self {
            PortDirection::Input => "input file",
            PortDirection::Output => "output file",
        }
    }
}

/// A named data-flow endpoint, bound one-to-one to a file-valued parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Port {
    /// Equals the key of the parameter carrying this port's files.
    pub name: String,
    pub multi_file: bool,
    /// File extensions accepted by the port, in declaration order.
    pub mime_types: Vec<String>,
    pub optional: bool,
    pub description: String,
}

impl Port {
    pub fn new(name: impl Into<String>, multi_file: bool) -> Self {
        Self {
            name: name.into(),
            multi_file,
            mime_types: Vec::new(),
            optional: true,
            description: String::new(),
        }
    }

    pub fn with_mime_types<I, S>(mut self, mime_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mime_types = mime_types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }
}
