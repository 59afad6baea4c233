//! BCL CLI tool
//!
//! Examples:
//!   bcl format server.bcl              - print the formatted file
//!   bcl format server.bcl --in-place   - rewrite the file
//!   bcl format - < server.bcl          - read standard input
//!   bcl validate server.bcl            - check syntax only

use std::io::{self, Read, Write};
use std::path::Path;
use std::process;

use bcl_format::{FormatOptions, format_document};
use bcl_parse::ParseError;
use bcl_tree::Document;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

// ============================================================================
// Exit codes
// ============================================================================

const EXIT_SUCCESS: i32 = 0;
const EXIT_SYNTAX_ERROR: i32 = 1;
const EXIT_USAGE_ERROR: i32 = 2;
const EXIT_IO_ERROR: i32 = 3;

const STDIN_LABEL: &str = "<stdin>";

// ============================================================================
// CLI argument structures
// ============================================================================

/// Command-line tool for BCL configuration files.
#[derive(Parser, Debug)]
#[command(name = "bcl", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a file and print it in canonical form
    Format {
        /// Input file, "-" or nothing for standard input
        path: Option<String>,

        /// Write the output to this file ("-" for standard output)
        #[arg(short, long)]
        output: Option<String>,

        /// Rewrite the input file
        #[arg(long, conflicts_with = "output")]
        in_place: bool,

        /// Indent with tabs instead of four spaces
        #[arg(long)]
        tabs: bool,
    },

    /// Parse a file and report syntax errors
    Validate {
        /// Input file, "-" or nothing for standard input
        path: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("BCL_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() {
                EXIT_USAGE_ERROR
            } else {
                EXIT_SUCCESS
            };
            let _ = e.print();
            process::exit(code);
        }
    };

    match run(cli.command) {
        Ok(()) => process::exit(EXIT_SUCCESS),
        Err(e) => {
            match &e {
                CliError::Parse { error, text } => {
                    error.write_report(text, io::stderr());
                }
                _ => eprintln!("error: {e}"),
            }
            process::exit(e.exit_code());
        }
    }
}

fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Format {
            path,
            output,
            in_place,
            tabs,
        } => {
            let options = if tabs {
                FormatOptions::new().tabs()
            } else {
                FormatOptions::new()
            };
            run_format(path.as_deref(), output.as_deref(), in_place, &options)
        }
        Command::Validate { path } => run_validate(path.as_deref()),
    }
}

// ============================================================================
// Subcommand implementations
// ============================================================================

fn run_format(
    path: Option<&str>,
    output: Option<&str>,
    in_place: bool,
    options: &FormatOptions,
) -> Result<(), CliError> {
    let from_stdin = matches!(path, None | Some("-"));
    if in_place && from_stdin {
        return Err(CliError::Usage(
            "--in-place cannot be used with standard input".into(),
        ));
    }
    if let (Some(path), Some(output)) = (path, output)
        && !from_stdin
        && output != "-"
        && is_same_file(path, output)
    {
        return Err(CliError::Usage(
            "input and output are the same file\nhint: use --in-place to modify in place".into(),
        ));
    }

    let input = Input::read(path)?;
    let document = input.parse()?;
    let formatted = format_document(&document, options);

    if in_place {
        std::fs::write(&input.label, &formatted)?;
    } else {
        write_output(output.unwrap_or("-"), &formatted)?;
    }
    Ok(())
}

fn run_validate(path: Option<&str>) -> Result<(), CliError> {
    let input = Input::read(path)?;
    let document = input.parse()?;
    debug!(
        "{} is valid ({} top-level elements)",
        document.source,
        document.elements().len()
    );
    Ok(())
}

// ============================================================================
// Error handling
// ============================================================================

#[derive(Debug)]
enum CliError {
    Io(io::Error),
    Parse { error: ParseError, text: String },
    Usage(String),
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            CliError::Io(_) => EXIT_IO_ERROR,
            CliError::Parse { .. } => EXIT_SYNTAX_ERROR,
            CliError::Usage(_) => EXIT_USAGE_ERROR,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "{e}"),
            CliError::Parse { error, .. } => write!(f, "{error}"),
            CliError::Usage(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

// ============================================================================
// I/O helpers
// ============================================================================

/// Raw input bytes with the label used in diagnostics.
struct Input {
    label: String,
    data: Vec<u8>,
}

impl Input {
    fn read(path: Option<&str>) -> Result<Self, CliError> {
        match path {
            Some("-") | None => {
                let mut data = Vec::new();
                io::stdin().read_to_end(&mut data)?;
                Ok(Self::new(STDIN_LABEL, data))
            }
            Some(path) => {
                let data = std::fs::read(path)
                    .map_err(|e| io::Error::new(e.kind(), format!("{path}: {e}")))?;
                Ok(Self::new(path, data))
            }
        }
    }

    fn new(label: &str, data: Vec<u8>) -> Self {
        debug!("Read {} bytes from {label}", data.len());
        Self {
            label: label.to_string(),
            data,
        }
    }

    fn parse(&self) -> Result<Document, CliError> {
        bcl_parse::parse(&self.data, &self.label).map_err(|error| CliError::Parse {
            error,
            text: String::from_utf8_lossy(&self.data).into_owned(),
        })
    }
}

fn write_output(path: &str, content: &str) -> Result<(), io::Error> {
    if path == "-" {
        let mut stdout = io::stdout().lock();
        stdout.write_all(content.as_bytes())?;
        stdout.flush()
    } else {
        std::fs::write(path, content)
    }
}

fn is_same_file(a: &str, b: &str) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => Path::new(a) == Path::new(b),
    }
}
