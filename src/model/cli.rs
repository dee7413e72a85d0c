/// A reference from a CLI element to the parameter or port supplying its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliMapping {
    /// Resolved against parameter keys first, then port names.
    pub reference_name: String,
}

impl CliMapping {
    pub fn new(reference_name: impl Into<String>) -> Self {
        Self {
            reference_name: reference_name.into(),
        }
    }
}

/// One unit of the generated command line: a literal token plus zero or more mappings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CliElement {
    /// Literal text emitted before the mapped values. May be empty.
    pub option_identifier: String,
    pub mappings: Vec<CliMapping>,
    pub is_list: bool,
    pub is_required: bool,
    pub sequence: Option<u32>,
}

impl CliElement {
    /// A literal-only element with no mappings.
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            option_identifier: text.into(),
            ..Default::default()
        }
    }

    /// An element with `text` followed by the values of `references`.
    pub fn mapped<I, S>(text: impl Into<String>, references: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            option_identifier: text.into(),
            mappings: references.into_iter().map(CliMapping::new).collect(),
            ..Default::default()
        }
    }

    pub fn required(mut self, is_required: bool) -> Self {
        self.is_required = is_required;
        self
    }
}

/// Associates an output port with a post-execution file-naming pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relocator {
    /// Must name an output port.
    pub reference: String,
    pub pattern: String,
}

/// A converter applied to an output port's files after execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConverter {
    pub class: String,
    pub reference: String,
    /// Name/value properties in declaration order.
    pub properties: Vec<(String, String)>,
}
