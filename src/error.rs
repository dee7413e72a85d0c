use thiserror::Error;

/// Errors that can occur while reading a CTD document into a `NodeConfiguration`.
///
/// Parsing never yields a partial model: any of these aborts the whole pass.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Malformed XML near byte {position}: {message}")]
    Xml { position: u64, message: String },

    #[error("Could not read descriptor '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Document has no root element")]
    MissingRoot,

    #[error("Unexpected element <{element}> inside <{scope}>")]
    UnexpectedElement { element: String, scope: String },

    #[error("Document ended before <{scope}> was closed")]
    UnexpectedEof { scope: String },

    #[error("Element <{element}> is missing the required attribute '{attribute}'")]
    MissingAttribute { element: String, attribute: String },

    #[error("Parameter '{key}' declares an unsupported type '{type_name}'")]
    UnknownType { key: String, type_name: String },

    #[error("Parameter '{key}' has an invalid numeric literal '{literal}'")]
    InvalidNumber { key: String, literal: String },

    #[error("Parameter '{key}' has an invalid bound restriction '{restriction}'")]
    InvalidBound { key: String, restriction: String },

    #[error("Parameter '{key}' has an invalid boolean literal '{literal}'")]
    InvalidBoolean { key: String, literal: String },

    #[error("Parameter '{key}' has value '{value}', which is not one of [{allowed}]")]
    InvalidChoice {
        key: String,
        value: String,
        allowed: String,
    },

    #[error("Attribute '{attribute}' on <{element}> has invalid flag value '{literal}'")]
    InvalidFlag {
        element: String,
        attribute: String,
        literal: String,
    },

    #[error("Could not load parser options: {0}")]
    Options(String),
}

/// Structural errors found by the validator after parsing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Parameter key '{0}' is declared more than once")]
    DuplicateParameter(String),

    #[error("Port '{0}' is declared more than once")]
    DuplicatePort(String),

    #[error("CLI element #{element} references unknown parameter/port '{reference}'")]
    UnknownReference { element: usize, reference: String },

    #[error(
        "CLI element #{element} has {mappings} mappings but references boolean parameter '{key}'"
    )]
    BoolInMultiMapping {
        element: usize,
        mappings: usize,
        key: String,
    },

    #[error("Port '{0}' has no parameter of the same name")]
    PortWithoutParameter(String),

    #[error("Port '{port}' is bound to parameter '{key}', which does not hold files")]
    PortNotFile { port: String, key: String },

    #[error(
        "Port '{port}' is {} but its parameter holds {}",
        port_cardinality(.multi_file),
        parameter_cardinality(.multi_file)
    )]
    CardinalityMismatch { port: String, multi_file: bool },

    #[error("Port '{0}' declares no MIME types")]
    MissingMimeTypes(String),

    #[error("Relocator references output port '{0}', which does not exist")]
    UnknownRelocatorPort(String),

    #[error("CLI element #{element} mixes list-valued and scalar mappings")]
    MixedCardinality { element: usize },

    #[error(
        "CLI element #{element} maps lists of unequal length: '{key}' has {found} entries, expected {expected}"
    )]
    ListLengthMismatch {
        element: usize,
        key: String,
        expected: usize,
        found: usize,
    },
}

fn port_cardinality(multi_file: &bool) -> &'static str {
    if *multi_file { "multi-file" } else { "single-file" }
}

fn parameter_cardinality(multi_file: &bool) -> &'static str {
    if *multi_file { "a single file" } else { "a file list" }
}

/// Errors raised while compiling a configuration into a command line.
///
/// These surface before any process is launched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("CLI element #{element} references '{reference}', which is neither a parameter nor a port")]
    UnresolvedReference { element: usize, reference: String },

    #[error("CLI element #{element} requires a value for '{key}', but none is set")]
    MissingValue { element: usize, key: String },

    #[error("CLI element #{element} mixes list-valued and scalar values")]
    MixedCardinality { element: usize },

    #[error(
        "CLI element #{element} maps lists of unequal length: '{key}' has {found} entries, expected {expected}"
    )]
    ListLengthMismatch {
        element: usize,
        key: String,
        expected: usize,
        found: usize,
    },

    #[error("CLI element #{element} maps boolean parameter '{key}' alongside other mappings")]
    BoolInMultiMapping { element: usize, key: String },
}

/// Errors raised when assigning a value to a parameter.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    #[error("Unknown parameter '{0}'")]
    UnknownParameter(String),

    #[error("Parameter '{key}' expects {expected}, but received {found}")]
    TypeMismatch {
        key: String,
        expected: String,
        found: String,
    },

    #[error("Value {value} for parameter '{key}' lies outside [{lower}, {upper}]")]
    OutOfBounds {
        key: String,
        value: String,
        lower: String,
        upper: String,
    },

    #[error("Value '{value}' is not allowed for parameter '{key}'")]
    NotAllowed { key: String, value: String },

    #[error("Failed to read values: {0}")]
    Load(String),
}

/// Errors raised while serializing a configuration back to CTD.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WriteError {
    #[error("Failed to write CTD: {0}")]
    Xml(String),

    #[error("Serialized CTD is not valid UTF-8: {0}")]
    Encoding(String),
}

/// Errors reported by an external process runner.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RunnerError {
    #[error("Failed to launch '{program}': {message}")]
    Launch { program: String, message: String },

    #[error("Tool execution failed: {0}")]
    Execution(String),

    #[error("Tool was killed before it finished")]
    Killed,
}

/// Umbrella error for the full load-configure-execute cycle of a tool node.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NodeError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Value(#[from] ValueError),

    #[error(transparent)]
    Runner(#[from] RunnerError),

    #[error("Tool has no executable name or path, and none was supplied")]
    MissingExecutable,
}
