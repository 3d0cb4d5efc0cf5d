use clap::{Parser, Subcommand};
use erdsql::{DdlEmitter, DiagramFormat, EmitOptions, Schema, SchemaError};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{EnvFilter, prelude::*};

#[derive(Debug, Parser)]
#[command(name = "erdsql", version, about = "Compile schema JSON to PostgreSQL DDL and ERD notation")]
struct Cli {
    /// Show debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Emit PostgreSQL DDL for a schema
    Sql {
        /// Schema JSON file, or - for stdin
        input: String,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Omit the generated-by banner
        #[arg(long)]
        no_header: bool,
        /// Double single quotes in CHECK constraint values
        #[arg(long)]
        escape_check_values: bool,
    },
    /// List table names created by a SQL script
    Tables {
        /// SQL file, or - for stdin
        input: String,
    },
    /// Render a schema as a diagram
    Diagram {
        /// Schema JSON file, or - for stdin
        input: String,
        /// Diagram notation: mermaid, erd
        #[arg(short, long, default_value = "mermaid", value_parser = parse_format)]
        format: DiagramFormat,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check that a SQL script creates every table of a schema
    Verify {
        /// Schema JSON file
        schema: String,
        /// SQL file
        sql: String,
    },
    /// Report structural problems in a schema
    Lint {
        /// Schema JSON file, or - for stdin
        input: String,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("Failed to read {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("Failed to write {path}: {source}")]
    Write { path: String, source: io::Error },
    #[error("{path}: {source}")]
    Schema { path: String, source: SchemaError },
}

fn parse_format(s: &str) -> Result<DiagramFormat, String> {
    DiagramFormat::from_str(s).ok_or_else(|| format!("Invalid diagram format: {}", s))
}

fn init_logging(verbose: bool) {
    let default = if verbose { "erdsql=debug" } else { "erdsql=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .without_time()
        .with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

fn read_input(path: &str) -> Result<String, CliError> {
    let result = if path == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).map(|_| buf)
    } else {
        fs::read_to_string(path)
    };
    result.map_err(|source| CliError::Read {
        path: path.to_string(),
        source,
    })
}

fn load_schema(path: &str) -> Result<Schema, CliError> {
    let text = read_input(path)?;
    let schema = Schema::from_json(&text).map_err(|source| CliError::Schema {
        path: path.to_string(),
        source,
    })?;
    for warning in schema.warnings() {
        tracing::warn!("{}", warning);
    }
    Ok(schema)
}

fn write_output(output: Option<PathBuf>, text: &str) -> Result<(), CliError> {
    match output {
        Some(path) => fs::write(&path, text).map_err(|source| CliError::Write {
            path: path.display().to_string(),
            source,
        }),
        None => {
            print!("{}", text);
            Ok(())
        }
    }
}

fn run(command: Command) -> Result<i32, CliError> {
    match command {
        Command::Sql {
            input,
            output,
            no_header,
            escape_check_values,
        } => {
            let schema = load_schema(&input)?;
            let options = EmitOptions::default()
                .header(!no_header)
                .escape_check_values(escape_check_values);
            write_output(output, &DdlEmitter::new(options).emit(&schema))?;
        }
        Command::Tables { input } => {
            let sql = read_input(&input)?;
            for name in erdsql::extract_table_names(&sql) {
                println!("{}", name);
            }
        }
        Command::Diagram {
            input,
            format,
            output,
        } => {
            let schema = load_schema(&input)?;
            let mut text = format.render(&schema);
            if !text.ends_with('\n') {
                text.push('\n');
            }
            write_output(output, &text)?;
        }
        Command::Verify { schema, sql } => {
            let schema = load_schema(&schema)?;
            let sql = read_input(&sql)?;
            let report = erdsql::verify(&schema, &sql);

            println!(
                "{} of {} tables created",
                report.expected.len() - report.missing.len(),
                report.expected.len()
            );
            for name in &report.missing {
                println!("missing: {}", name);
            }
            for name in &report.unexpected {
                println!("unexpected: {}", name);
            }
            if !report.is_complete() {
                return Ok(1);
            }
        }
        Command::Lint { input } => {
            let text = read_input(&input)?;
            let schema = Schema::from_json(&text).map_err(|source| CliError::Schema {
                path: input.clone(),
                source,
            })?;
            let warnings = schema.warnings();
            if warnings.is_empty() {
                println!("{}: no problems found", input);
            }
            for warning in warnings {
                println!("{}: {}", input, warning);
            }
        }
    }
    Ok(0)
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}
