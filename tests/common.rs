//! Common test utilities: CTD fixtures and hand-built configurations.
use ctdkit::prelude::*;

/// A complete descriptor exercising every section the parser understands.
///
/// Contains one ignored housekeeping item (`write_ini`) and a skipped `citations` block.
#[allow(dead_code)]
pub const FILE_FILTER_CTD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<tool name="FileFilter" version="2.6.0" docurl="http://example.org/FileFilter" category="File Handling">
  <description>Extracts portions of data from peak files.</description>
  <manual>Filters spectra by retention time and charge.</manual>
  <executableName>FileFilter</executableName>
  <citations>
    <citation doi="10.1038/nmeth.3959" url=""/>
  </citations>
  <PARAMETERS version="1.7.0">
    <NODE name="FileFilter" description="Extracts portions of data">
      <ITEM name="version" value="2.6.0" type="string" description="Version of the tool"/>
      <NODE name="1" description="Instance '1' section">
        <ITEM name="in" value="" type="string" description="Input file" tags="input file,required" supported_formats="*.mzML,*.featureXML"/>
        <ITEM name="out" value="" type="string" description="Output file" tags="output file,required" supported_formats="*.mzML"/>
        <ITEM name="threads" value="1" type="int" description="Worker threads" restrictions="1:"/>
        <ITEM name="write_ini" value="" type="string" description="Writes the default configuration file"/>
        <ITEM name="mz" value="0.5" type="double" description="m/z tolerance" restrictions="0:1"/>
        <ITEM name="sort" value="false" type="string" description="Sort output by position" restrictions="true,false"/>
        <ITEM name="mode" value="fast" type="string" description="Filter mode" restrictions="fast,slow"/>
        <ITEMLIST name="rt" type="double" description="Retention time window">
          <LISTITEM value="10.0"/>
          <LISTITEM value="200.5"/>
        </ITEMLIST>
        <NODE name="algorithm" description="Algorithm parameters">
          <ITEM name="charge" value="2" type="int" description="Charge state" tags="advanced"/>
          <ITEMLIST name="labels" type="string" description="Label names"/>
        </NODE>
      </NODE>
    </NODE>
  </PARAMETERS>
  <cli>
    <clielement optionIdentifier="-in" isList="false">
      <mapping referenceName="FileFilter.1.in"/>
    </clielement>
    <clielement optionIdentifier="-out" isList="false">
      <mapping referenceName="FileFilter.1.out"/>
    </clielement>
    <clielement optionIdentifier="-threads" isList="false">
      <mapping referenceName="FileFilter.1.threads"/>
    </clielement>
    <clielement optionIdentifier="-mz" isList="false">
      <mapping referenceName="FileFilter.1.mz"/>
    </clielement>
    <clielement optionIdentifier="-sort" isList="false">
      <mapping referenceName="FileFilter.1.sort"/>
    </clielement>
    <clielement optionIdentifier="-mode" isList="false">
      <mapping referenceName="FileFilter.1.mode"/>
    </clielement>
    <clielement optionIdentifier="-rt" isList="true">
      <mapping referenceName="FileFilter.1.rt"/>
    </clielement>
    <clielement optionIdentifier="-charge" isList="false">
      <mapping referenceName="FileFilter.1.algorithm.charge"/>
    </clielement>
    <clielement optionIdentifier="-labels" isList="true">
      <mapping referenceName="FileFilter.1.algorithm.labels"/>
    </clielement>
    <clielement optionIdentifier="-no_progress" isList="false"/>
  </cli>
  <outputConverters>
    <converter class="MzMLConverter" ref="FileFilter.1.out">
      <converterProperty name="compression" value="zlib"/>
    </converter>
  </outputConverters>
  <relocators>
    <relocator reference="FileFilter.1.out" pattern="[FileFilter.1.in]_filtered.mzML"/>
  </relocators>
</tool>
"#;

/// Wraps a `<PARAMETERS>` body and an optional `<cli>` body into a minimal descriptor.
#[allow(dead_code)]
pub fn ctd_with(parameters: &str, cli: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<tool name="Probe" version="1.0">
  <executableName>probe</executableName>
  <PARAMETERS version="1.7.0">{}</PARAMETERS>
  <cli>{}</cli>
</tool>"#,
        parameters, cli
    )
}

/// Parses [`FILE_FILTER_CTD`] with the default options.
#[allow(dead_code)]
pub fn parse_file_filter() -> NodeConfiguration {
    CtdParser::default()
        .parse_str(FILE_FILTER_CTD)
        .expect("FileFilter fixture should parse")
}

/// Adds a multi-file input port together with its file-list parameter.
#[allow(dead_code)]
pub fn add_file_list_port(builder: &mut ConfigurationBuilder, key: &str, extension: &str) {
    builder
        .add_parameter(Parameter::new(key, ParameterKind::FileList { port: key.to_string() }))
        .add_port(
            PortDirection::Input,
            Port::new(key, true).with_mime_types([extension]),
        );
}

/// Adds a single-file port of `direction` together with its file parameter.
#[allow(dead_code)]
pub fn add_file_port(
    builder: &mut ConfigurationBuilder,
    direction: PortDirection,
    key: &str,
    extension: &str,
) {
    builder
        .add_parameter(Parameter::new(key, ParameterKind::File { port: key.to_string() }))
        .add_port(direction, Port::new(key, false).with_mime_types([extension]));
}

/// A tool with a boolean flag, an optional int and a mandatory string, each with one element.
///
/// Elements: `#0 -v -> verbose`, `#1 -n -> count`, `#2 -name -> name`.
#[allow(dead_code)]
pub fn create_flag_tool() -> NodeConfiguration {
    let mut builder = NodeConfiguration::builder();
    builder.metadata_mut().name = "Flags".to_string();
    builder.metadata_mut().executable_name = "flags".to_string();
    builder
        .add_parameter(Parameter::new("verbose", ParameterKind::Bool).with_value(Value::Bool(false)))
        .add_parameter(Parameter::new("count", ParameterKind::Int(Bounds::new(Some(0), Some(100)))))
        .add_parameter(Parameter::new("name", ParameterKind::String).optional(false))
        .add_cli_element(CliElement::mapped("-v", ["verbose"]))
        .add_cli_element(CliElement::mapped("-n", ["count"]))
        .add_cli_element(CliElement::mapped("-name", ["name"]));
    builder.build()
}
