//! Tests for expanding CLI elements into command lines.
mod common;
use common::*;
use ctdkit::compiler;
use ctdkit::prelude::*;
use pretty_assertions::assert_eq;

fn strings(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}

#[test]
fn test_compiles_fixture_command_line() {
    let mut config = parse_file_filter();
    config.set_value("FileFilter.1.in", Value::Str("a.mzML".into())).unwrap();
    config.set_value("FileFilter.1.out", Value::Str("b.mzML".into())).unwrap();

    let argv = CommandLineCompiler::new(&config)
        .compile(&config, "/opt/bin/FileFilter")
        .expect("Failed to compile");

    assert_eq!(
        argv,
        strings(&[
            "/opt/bin/FileFilter",
            "-in", "a.mzML",
            "-out", "b.mzML",
            "-threads", "1",
            "-mz", "0.5",
            "-mode", "fast",
            "-rt", "10.0",
            "-rt", "200.5",
            "-charge", "2",
            "-no_progress",
        ])
    );
}

#[test]
fn test_list_mappings_expand_pairwise() {
    let mut builder = NodeConfiguration::builder();
    add_file_list_port(&mut builder, "in", "txt");
    builder
        .add_parameter(Parameter::new("labels", ParameterKind::StringList))
        .add_cli_element(CliElement::mapped("-i", ["in", "labels"]));
    let mut config = builder.build();
    config
        .set_value("in", Value::StrList(vec!["a.txt".into(), "b.txt".into()]))
        .unwrap();
    config
        .set_value("labels", Value::StrList(vec!["A".into(), "B".into()]))
        .unwrap();

    let arguments = CommandLineCompiler::new(&config)
        .arguments(&config)
        .expect("Failed to compile");
    assert_eq!(arguments, strings(&["-i", "a.txt", "A", "-i", "b.txt", "B"]));
}

#[test]
fn test_boolean_flag_follows_its_value() {
    let mut config = create_flag_tool();
    config.set_value("name", Value::Str("run".into())).unwrap();

    let compiler = CommandLineCompiler::new(&config);
    assert_eq!(compiler.arguments(&config).unwrap(), strings(&["-name", "run"]));

    config.set_value("verbose", Value::Bool(true)).unwrap();
    let compiler = CommandLineCompiler::new(&config);
    assert_eq!(
        compiler.arguments(&config).unwrap(),
        strings(&["-v", "-name", "run"])
    );

    config.clear_value("verbose").unwrap();
    let compiler = CommandLineCompiler::new(&config);
    assert_eq!(compiler.arguments(&config).unwrap(), strings(&["-name", "run"]));
}

#[test]
fn test_unset_mandatory_mapping_fails() {
    let config = create_flag_tool();

    assert_eq!(
        CommandLineCompiler::new(&config).arguments(&config),
        Err(CompileError::MissingValue {
            element: 2,
            key: "name".to_string(),
        })
    );
}

#[test]
fn test_unset_optional_mappings_are_skipped() {
    let mut builder = NodeConfiguration::builder();
    builder
        .add_parameter(Parameter::new("lo", ParameterKind::Int(Bounds::default())).with_value(Value::Int(1)))
        .add_parameter(Parameter::new("hi", ParameterKind::Int(Bounds::default())))
        .add_parameter(Parameter::new("tag", ParameterKind::String))
        .add_cli_element(CliElement::mapped("-range", ["lo", "hi"]))
        .add_cli_element(CliElement::mapped("-tag", ["tag"]));
    let config = builder.build();

    assert_eq!(
        CommandLineCompiler::new(&config).arguments(&config).unwrap(),
        strings(&["-range", "1"])
    );
}

#[test]
fn test_required_element_without_values_fails() {
    let mut builder = NodeConfiguration::builder();
    builder
        .add_parameter(Parameter::new("tag", ParameterKind::String))
        .add_cli_element(CliElement::mapped("-tag", ["tag"]).required(true));
    let config = builder.build();

    assert_eq!(
        CommandLineCompiler::new(&config).arguments(&config),
        Err(CompileError::MissingValue {
            element: 0,
            key: "tag".to_string(),
        })
    );
}

#[test]
fn test_empty_literal_emits_only_values() {
    let mut builder = NodeConfiguration::builder();
    add_file_port(&mut builder, PortDirection::Input, "in", "txt");
    builder.add_cli_element(CliElement::mapped("", ["in"]));
    let mut config = builder.build();
    config.set_value("in", Value::Str("data file.txt".into())).unwrap();

    let argv = compiler::compile(&config, &config, "tool").unwrap();
    assert_eq!(argv, strings(&["tool", "data file.txt"]));
    assert_eq!(display_command_line(&argv), "tool 'data file.txt'");
}

#[test]
fn test_empty_list_emits_nothing() {
    let mut builder = NodeConfiguration::builder();
    builder
        .add_parameter(
            Parameter::new("ids", ParameterKind::IntList(Bounds::default()))
                .with_value(Value::IntList(Vec::new())),
        )
        .add_cli_element(CliElement::mapped("-id", ["ids"]));
    let config = builder.build();

    assert!(CommandLineCompiler::new(&config).arguments(&config).unwrap().is_empty());
}

#[test]
fn test_list_length_mismatch_fails() {
    let mut builder = NodeConfiguration::builder();
    builder
        .add_parameter(
            Parameter::new("a", ParameterKind::IntList(Bounds::default()))
                .with_value(Value::IntList(vec![1, 2, 3])),
        )
        .add_parameter(
            Parameter::new("b", ParameterKind::StringList)
                .with_value(Value::StrList(vec!["x".into()])),
        )
        .add_cli_element(CliElement::mapped("-p", ["a", "b"]));
    let config = builder.build();

    assert_eq!(
        CommandLineCompiler::new(&config).arguments(&config),
        Err(CompileError::ListLengthMismatch {
            element: 0,
            key: "b".to_string(),
            expected: 3,
            found: 1,
        })
    );
}

#[test]
fn test_mixed_cardinality_fails() {
    let mut builder = NodeConfiguration::builder();
    builder
        .add_parameter(
            Parameter::new("a", ParameterKind::IntList(Bounds::default()))
                .with_value(Value::IntList(vec![1])),
        )
        .add_parameter(Parameter::new("b", ParameterKind::String).with_value(Value::Str("x".into())))
        .add_cli_element(CliElement::mapped("-p", ["a", "b"]));
    let config = builder.build();

    assert_eq!(
        CommandLineCompiler::new(&config).arguments(&config),
        Err(CompileError::MixedCardinality { element: 0 })
    );
}

#[test]
fn test_bool_in_multi_mapping_fails_at_compile_time() {
    let mut builder = NodeConfiguration::builder();
    builder
        .add_parameter(Parameter::new("flag", ParameterKind::Bool).with_value(Value::Bool(true)))
        .add_parameter(Parameter::new("n", ParameterKind::Int(Bounds::default())).with_value(Value::Int(1)))
        .add_cli_element(CliElement::mapped("-x", ["n", "flag"]));
    let config = builder.build();

    assert_eq!(
        CommandLineCompiler::new(&config).arguments(&config),
        Err(CompileError::BoolInMultiMapping {
            element: 0,
            key: "flag".to_string(),
        })
    );
}

#[test]
fn test_unresolved_reference_fails() {
    let mut builder = NodeConfiguration::builder();
    builder.add_cli_element(CliElement::mapped("-x", ["ghost"]));
    let config = builder.build();

    assert_eq!(
        CommandLineCompiler::new(&config).arguments(&config),
        Err(CompileError::UnresolvedReference {
            element: 0,
            reference: "ghost".to_string(),
        })
    );
}

#[test]
fn test_value_store_overrides_configuration_values() {
    let config = create_flag_tool();
    let mut store = ValueStore::new();
    store.set("verbose", Value::Bool(true));
    store.set("count", Value::Int(7));
    store.set("name", Value::Str("job".into()));

    let argv = CommandLineCompiler::new(&config).compile(&store, "flags").unwrap();
    assert_eq!(argv, strings(&["flags", "-v", "-n", "7", "-name", "job"]));
}

#[test]
fn test_compilation_is_repeatable() {
    let mut config = parse_file_filter();
    config.set_value("FileFilter.1.in", Value::Str("a.mzML".into())).unwrap();
    config.set_value("FileFilter.1.out", Value::Str("b.mzML".into())).unwrap();
    let compiler = CommandLineCompiler::new(&config);

    let first = compiler.compile(&config, "FileFilter").unwrap();
    let second = compiler.compile(&config, "FileFilter").unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_display_command_line_quotes_tokens() {
    let argv = strings(&["tool", "plain", "two words", "it's", ""]);
    assert_eq!(
        display_command_line(&argv),
        r#"tool plain 'two words' 'it'\''s' ''"#
    );
}
