//! Tests for serializing configurations back to CTD.
mod common;
use common::*;
use ctdkit::prelude::*;
use pretty_assertions::assert_eq;

#[test]
fn test_written_fixture_parses_back_to_equal_configuration() {
    let config = parse_file_filter();

    let xml = CtdWriter::new().write(&config).expect("Failed to write");
    let reparsed = CtdParser::default().parse_str(&xml).expect("Failed to reparse");

    assert_eq!(reparsed, config);
}

#[test]
fn test_current_values_are_written() {
    let mut config = parse_file_filter();
    config.set_value("FileFilter.1.in", Value::Str("a.mzML".into())).unwrap();
    config.set_value("FileFilter.1.threads", Value::Int(8)).unwrap();
    config
        .set_value("FileFilter.1.algorithm.labels", Value::StrList(vec!["x".into(), "y & z".into()]))
        .unwrap();

    let xml = CtdWriter::new().write(&config).expect("Failed to write");
    let reparsed = CtdParser::default().parse_str(&xml).expect("Failed to reparse");

    assert_eq!(reparsed, config);
    assert_eq!(
        reparsed.parameter("FileFilter.1.algorithm.labels").unwrap().value,
        Some(Value::StrList(vec!["x".into(), "y & z".into()]))
    );
}

#[test]
fn test_cleared_string_round_trips_as_unset() {
    let mut config = parse_file_filter();
    config.set_value("FileFilter.version", Value::Str(String::new())).unwrap();

    let xml = CtdWriter::new().write(&config).expect("Failed to write");
    let reparsed = CtdParser::default().parse_str(&xml).expect("Failed to reparse");

    assert_eq!(reparsed.parameter("FileFilter.version").unwrap().value, None);
    assert_eq!(reparsed, config);
}

#[test]
fn test_built_configuration_round_trips() {
    let mut builder = NodeConfiguration::builder();
    builder.metadata_mut().name = "Builder".to_string();
    builder.metadata_mut().version = "0.3".to_string();
    builder.metadata_mut().executable_path = "/usr/local/bin/builder".to_string();
    add_file_list_port(&mut builder, "tool.in", "fasta");
    add_file_port(&mut builder, PortDirection::Output, "tool.out", "csv");
    builder
        .add_section_description("tool", "Tool section")
        .add_section_description("tool.empty", "Section without items")
        .add_parameter(
            Parameter::new("tool.ratio", ParameterKind::Double(Bounds::new(None, Some(2.5))))
                .with_value(Value::Double(1.25))
                .with_description("Mixing ratio")
                .advanced(true),
        )
        .add_parameter(
            Parameter::new(
                "tool.mode",
                ParameterKind::StringChoice(vec!["a".into(), "b".into()]),
            )
            .with_value(Value::Str("b".into()))
            .optional(false),
        )
        .add_parameter(
            Parameter::new("top", ParameterKind::IntList(Bounds::new(Some(0), None)))
                .with_value(Value::IntList(vec![3, 1, 2])),
        )
        .add_cli_element(CliElement {
            sequence: Some(1),
            ..CliElement::mapped("-in", ["tool.in"]).required(true)
        })
        .add_cli_element(CliElement::literal("--quiet"))
        .add_relocator(Relocator {
            reference: "tool.out".to_string(),
            pattern: "out.csv".to_string(),
        });
    let mut config = builder.build();
    config
        .set_value("tool.in", Value::StrList(vec!["a.fasta".into(), "b.fasta".into()]))
        .unwrap();
    Validator::new(&config).validate().expect("Built configuration should validate");

    let xml = CtdWriter::new().with_indent(4).write(&config).expect("Failed to write");
    let reparsed = CtdParser::default().parse_str(&xml).expect("Failed to reparse");

    assert_eq!(reparsed, config);
}

#[test]
fn test_writer_output_shape() {
    let config = parse_file_filter();
    let xml = CtdWriter::new().write(&config).expect("Failed to write");

    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(xml.contains(r#"<tool name="FileFilter" version="2.6.0""#));
    assert!(xml.contains(r#"<NODE name="algorithm" description="Algorithm parameters">"#));
    assert!(xml.contains(r#"supported_formats="*.mzML,*.featureXML""#));
    assert!(xml.contains(r#"restrictions="true,false""#));
    assert!(!xml.contains("write_ini"));
    assert!(!xml.contains("citations"));
}

#[test]
fn test_write_file_then_parse_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("normalized.ctd");
    let config = parse_file_filter();

    CtdWriter::new()
        .write_file(&config, &path)
        .expect("Failed to write file");
    let reparsed = CtdParser::default().parse_file(&path).expect("Failed to parse file");

    assert_eq!(reparsed, config);
}
