//! Tests for the structural cross-checks run after parsing.
mod common;
use common::*;
use ctdkit::prelude::*;

#[test]
fn test_fixture_is_valid() {
    let config = parse_file_filter();
    Validator::new(&config).validate().expect("Fixture should validate");
    assert!(Validator::new(&config).collect_errors().is_empty());
}

#[test]
fn test_bool_in_multi_mapping_element_fails() {
    let mut builder = NodeConfiguration::builder();
    builder
        .add_parameter(Parameter::new("flag", ParameterKind::Bool))
        .add_parameter(Parameter::new("level", ParameterKind::Int(Bounds::default())))
        .add_cli_element(CliElement::mapped("-x", ["level", "flag"]));
    let config = builder.build();

    assert_eq!(
        Validator::new(&config).validate(),
        Err(ValidationError::BoolInMultiMapping {
            element: 0,
            mappings: 2,
            key: "flag".to_string(),
        })
    );
}

#[test]
fn test_single_bool_mapping_is_valid() {
    let config = create_flag_tool();
    assert!(Validator::new(&config).validate().is_ok());
}

#[test]
fn test_unknown_reference_fails() {
    let mut builder = NodeConfiguration::builder();
    builder
        .add_parameter(Parameter::new("known", ParameterKind::String))
        .add_cli_element(CliElement::mapped("-k", ["known"]))
        .add_cli_element(CliElement::mapped("-u", ["unknown"]));
    let config = builder.build();

    assert_eq!(
        Validator::new(&config).validate(),
        Err(ValidationError::UnknownReference {
            element: 1,
            reference: "unknown".to_string(),
        })
    );
}

#[test]
fn test_relocator_must_name_an_output_port() {
    let mut builder = NodeConfiguration::builder();
    add_file_port(&mut builder, PortDirection::Input, "in", "txt");
    add_file_port(&mut builder, PortDirection::Output, "out", "txt");
    builder.add_relocator(Relocator {
        reference: "missing".to_string(),
        pattern: "x.txt".to_string(),
    });
    let config = builder.build();
    assert_eq!(
        Validator::new(&config).validate(),
        Err(ValidationError::UnknownRelocatorPort("missing".to_string()))
    );

    let mut builder = NodeConfiguration::builder();
    add_file_port(&mut builder, PortDirection::Input, "in", "txt");
    builder.add_relocator(Relocator {
        reference: "in".to_string(),
        pattern: "x.txt".to_string(),
    });
    let config = builder.build();
    assert_eq!(
        Validator::new(&config).validate(),
        Err(ValidationError::UnknownRelocatorPort("in".to_string()))
    );
}

#[test]
fn test_port_cardinality_must_match_parameter() {
    let mut builder = NodeConfiguration::builder();
    builder
        .add_parameter(Parameter::new("in", ParameterKind::File { port: "in".to_string() }))
        .add_port(PortDirection::Input, Port::new("in", true).with_mime_types(["txt"]));
    let config = builder.build();

    let error = Validator::new(&config).validate().unwrap_err();
    assert_eq!(
        error,
        ValidationError::CardinalityMismatch {
            port: "in".to_string(),
            multi_file: true,
        }
    );
    assert_eq!(
        error.to_string(),
        "Port 'in' is multi-file but its parameter holds a single file"
    );
}

#[test]
fn test_port_needs_mime_types() {
    let mut builder = NodeConfiguration::builder();
    builder
        .add_parameter(Parameter::new("out", ParameterKind::File { port: "out".to_string() }))
        .add_port(PortDirection::Output, Port::new("out", false));
    let config = builder.build();

    assert_eq!(
        Validator::new(&config).validate(),
        Err(ValidationError::MissingMimeTypes("out".to_string()))
    );
}

#[test]
fn test_port_needs_a_file_parameter() {
    let mut builder = NodeConfiguration::builder();
    builder.add_port(PortDirection::Input, Port::new("orphan", false).with_mime_types(["txt"]));
    let config = builder.build();
    assert_eq!(
        Validator::new(&config).validate(),
        Err(ValidationError::PortWithoutParameter("orphan".to_string()))
    );

    let mut builder = NodeConfiguration::builder();
    builder
        .add_parameter(Parameter::new("in", ParameterKind::String))
        .add_port(PortDirection::Input, Port::new("in", false).with_mime_types(["txt"]));
    let config = builder.build();
    assert_eq!(
        Validator::new(&config).validate(),
        Err(ValidationError::PortNotFile {
            port: "in".to_string(),
            key: "in".to_string(),
        })
    );
}

#[test]
fn test_duplicate_keys_and_ports_fail() {
    let mut builder = NodeConfiguration::builder();
    builder
        .add_parameter(Parameter::new("a.x", ParameterKind::String))
        .add_parameter(Parameter::new("a.x", ParameterKind::Int(Bounds::default())));
    let config = builder.build();
    assert_eq!(
        Validator::new(&config).validate(),
        Err(ValidationError::DuplicateParameter("a.x".to_string()))
    );
    assert_eq!(config.parameter("a.x").unwrap().kind, ParameterKind::String);

    let mut builder = NodeConfiguration::builder();
    add_file_port(&mut builder, PortDirection::Input, "f", "txt");
    builder.add_port(PortDirection::Output, Port::new("f", false).with_mime_types(["txt"]));
    let config = builder.build();
    assert_eq!(
        Validator::new(&config).validate(),
        Err(ValidationError::DuplicatePort("f".to_string()))
    );
}

#[test]
fn test_mixed_cardinality_and_list_lengths() {
    let mut builder = NodeConfiguration::builder();
    add_file_list_port(&mut builder, "in", "txt");
    builder
        .add_parameter(Parameter::new("label", ParameterKind::String))
        .add_cli_element(CliElement::mapped("-i", ["in", "label"]));
    let config = builder.build();
    assert_eq!(
        Validator::new(&config).validate(),
        Err(ValidationError::MixedCardinality { element: 0 })
    );

    let mut builder = NodeConfiguration::builder();
    add_file_list_port(&mut builder, "in", "txt");
    builder
        .add_parameter(
            Parameter::new("labels", ParameterKind::StringList)
                .with_value(Value::StrList(vec!["A".into()])),
        )
        .add_cli_element(CliElement::mapped("-i", ["in", "labels"]));
    let mut config = builder.build();
    assert!(Validator::new(&config).validate().is_ok(), "Unset lists are not compared");

    config
        .set_value("in", Value::StrList(vec!["a.txt".into(), "b.txt".into()]))
        .unwrap();
    assert_eq!(
        Validator::new(&config).validate(),
        Err(ValidationError::ListLengthMismatch {
            element: 0,
            key: "labels".to_string(),
            expected: 2,
            found: 1,
        })
    );
}

#[test]
fn test_collect_errors_reports_every_check() {
    let mut builder = NodeConfiguration::builder();
    builder
        .add_parameter(Parameter::new("dup", ParameterKind::String))
        .add_parameter(Parameter::new("dup", ParameterKind::String))
        .add_port(PortDirection::Input, Port::new("orphan", false))
        .add_cli_element(CliElement::mapped("-u", ["unknown"]))
        .add_relocator(Relocator {
            reference: "nowhere".to_string(),
            pattern: "x".to_string(),
        });
    let config = builder.build();

    let errors = Validator::new(&config).collect_errors();
    assert_eq!(
        errors,
        vec![
            ValidationError::DuplicateParameter("dup".to_string()),
            ValidationError::PortWithoutParameter("orphan".to_string()),
            ValidationError::UnknownReference {
                element: 0,
                reference: "unknown".to_string(),
            },
            ValidationError::UnknownRelocatorPort("nowhere".to_string()),
        ]
    );
}
