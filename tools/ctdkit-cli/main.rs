use clap::{Args, Parser, Subcommand};
use ctdkit::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Inspect, validate and compile Common Tool Descriptor files
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Optional JSON file with parser options (ignored names, skipped elements)
    #[arg(long, global = true)]
    options: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the parameters, ports and CLI elements of a descriptor
    Inspect(DescriptorArgs),
    /// Report every structural problem of a descriptor
    Validate(DescriptorArgs),
    /// Compile the command line for a descriptor and a set of values
    Command(CommandArgs),
    /// Re-serialize a descriptor in canonical form
    Normalize(NormalizeArgs),
}

#[derive(Args, Debug)]
struct DescriptorArgs {
    /// Path to the CTD file
    ctd_path: PathBuf,
}

#[derive(Args, Debug)]
struct CommandArgs {
    /// Path to the CTD file
    ctd_path: PathBuf,
    /// JSON file mapping parameter keys to values
    #[arg(long)]
    values: Option<PathBuf>,
    /// Individual assignments as KEY=VALUE; VALUE is read as JSON, falling back to a string
    #[arg(long = "set", value_name = "KEY=VALUE")]
    assignments: Vec<String>,
    /// Executable to place at argv[0] instead of the descriptor's
    #[arg(long)]
    executable: Option<PathBuf>,
    /// Print one token per line instead of a shell-style line
    #[arg(long)]
    tokens: bool,
}

#[derive(Args, Debug)]
struct NormalizeArgs {
    /// Path to the CTD file
    ctd_path: PathBuf,
    /// Output path; prints to stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let options = match &cli.options {
        Some(path) => ParserOptions::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load parser options: {}", e))),
        None => ParserOptions::default(),
    };
    let parser = CtdParser::new(options);

    match cli.command {
        Command::Inspect(args) => run_inspect(&parser, &args.ctd_path),
        Command::Validate(args) => run_validate(&parser, &args.ctd_path),
        Command::Command(args) => run_command(&parser, args),
        Command::Normalize(args) => run_normalize(&parser, args),
    }
}

fn load(parser: &CtdParser, path: &Path) -> NodeConfiguration {
    parser
        .parse_file(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse '{}': {}", path.display(), e)))
}

fn run_inspect(parser: &CtdParser, path: &Path) {
    let config = load(parser, path);
    let metadata = config.metadata();

    println!("{} {}", metadata.name, metadata.version);
    if !metadata.description.is_empty() {
        println!("  {}", metadata.description);
    }
    if !metadata.category.is_empty() {
        println!("  Category:   {}", metadata.category);
    }
    println!(
        "  Executable: {}",
        if metadata.executable_path.is_empty() { &metadata.executable_name } else { &metadata.executable_path }
    );

    println!("\n--- Parameters ({}) ---", config.parameters().len());
    for parameter in config.parameters() {
        let value = parameter
            .value
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_else(|| "<unset>".to_string());
        let mut flags = Vec::new();
        if parameter.advanced {
            flags.push("advanced");
        }
        if !parameter.optional {
            flags.push("required");
        }
        println!(
            "  {} : {} = {}{}",
            parameter.key,
            parameter.kind.type_name(),
            value,
            if flags.is_empty() { String::new() } else { format!(" [{}]", flags.join(", ")) }
        );
    }

    println!("\n--- Ports ---");
    for (label, ports) in [("in ", config.input_ports()), ("out", config.output_ports())] {
        for port in ports {
            println!(
                "  {} {}{} ({})",
                label,
                port.name,
                if port.multi_file { "[]" } else { "" },
                port.mime_types.join(", ")
            );
        }
    }

    println!("\n--- CLI Elements ({}) ---", config.cli_elements().len());
    for (index, element) in config.cli_elements().iter().enumerate() {
        let references: Vec<&str> = element
            .mappings
            .iter()
            .map(|m| m.reference_name.as_str())
            .collect();
        println!(
            "  #{:<3} {:<20} -> {}",
            index,
            format!("'{}'", element.option_identifier),
            references.join(", ")
        );
    }
}

fn run_validate(parser: &CtdParser, path: &Path) {
    let config = load(parser, path);
    let errors = Validator::new(&config).collect_errors();
    if errors.is_empty() {
        println!("'{}' is valid.", path.display());
        return;
    }
    for error in &errors {
        eprintln!("  - {}", error);
    }
    exit_with_error(&format!("'{}' has {} problem(s).", path.display(), errors.len()));
}

fn parse_assignment(raw: &str) -> (String, Value) {
    let Some((key, literal)) = raw.split_once('=') else {
        exit_with_error(&format!("Assignment '{}' is not of the form KEY=VALUE", raw));
    };
    let value = serde_json::from_str::<Value>(literal).unwrap_or_else(|_| Value::Str(literal.to_string()));
    (key.trim().to_string(), value)
}

fn run_command(parser: &CtdParser, args: CommandArgs) {
    let start = Instant::now();
    let node = ToolNode::new(load(parser, &args.ctd_path))
        .unwrap_or_else(|e| exit_with_error(&format!("Invalid descriptor: {}", e)));

    if let Some(values_path) = &args.values {
        let store = ValueStore::from_file(values_path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load values: {}", e)));
        node.apply_values(&store)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to apply values: {}", e)));
    }
    for raw in &args.assignments {
        let (key, value) = parse_assignment(raw);
        node.set_value(&key, value)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to set '{}': {}", key, e)));
    }

    let argv = node
        .command_line(args.executable.as_deref())
        .unwrap_or_else(|e| exit_with_error(&format!("Command-line compilation failed: {}", e)));
    tracing::info!("Compiled {} tokens in {:?}", argv.len(), start.elapsed());

    if args.tokens {
        for token in &argv {
            println!("{}", token);
        }
    } else {
        println!("{}", display_command_line(&argv));
    }
}

fn run_normalize(parser: &CtdParser, args: NormalizeArgs) {
    let config = load(parser, &args.ctd_path);
    let writer = CtdWriter::new();
    match args.output {
        Some(output) => {
            writer
                .write_file(&config, &output)
                .unwrap_or_else(|e| exit_with_error(&e.to_string()));
            println!("Wrote '{}'", output.display());
        }
        None => {
            let xml = writer
                .write(&config)
                .unwrap_or_else(|e| exit_with_error(&e.to_string()));
            println!("{}", xml);
        }
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
