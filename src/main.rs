use clap::{Parser as ClapParser, Subcommand};
use sqldoc::cli::{self, CliError, CompileRequest, ServeOptions};
use std::io::{self, Read};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "sqldoc")]
#[command(about = "sqldoc - Compile documentation annotations in SQL files to JSON")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile annotated SQL into a JSON array of documents
    Compile {
        /// SQL file (reads from stdin if not provided)
        file: Option<PathBuf>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Reject @param/@column arguments of the wrong kind
        #[arg(long)]
        strict: bool,
    },

    /// Print the token stream the scanner produces
    Tokens {
        /// SQL file (reads from stdin if not provided)
        file: Option<PathBuf>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Show the annotation reference
    Syntax {
        /// Annotation name, e.g. `param` (lists all annotations if omitted)
        annotation: Option<String>,
    },

    /// Serve `POST /compile` over HTTP
    Serve {
        /// Address to bind
        #[arg(long, env = "SQLDOC_HOST", default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value_t = cli::DEFAULT_PORT)]
        port: u16,

        /// Reject @param/@column arguments of the wrong kind
        #[arg(long)]
        strict: bool,

        /// Largest accepted request body in bytes
        #[arg(long, default_value_t = cli::DEFAULT_MAX_BODY)]
        max_body: usize,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compile {
            file,
            pretty,
            strict,
        } => run_compile(file, pretty, strict, false),
        Commands::Tokens { file, pretty } => run_compile(file, pretty, false, true),
        Commands::Syntax { annotation: None } => {
            print!("{}", cli::get_syntax_overview());
            Ok(())
        }
        Commands::Syntax {
            annotation: Some(name),
        } => cli::get_annotation_doc(&name).map(|content| print!("{}", content)),
        Commands::Serve {
            host,
            port,
            strict,
            max_body,
        } => run_serve(ServeOptions {
            host,
            port,
            strict,
            max_body,
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

/// Non-UTF-8 bytes are replaced rather than rejected, as the scanner does.
fn read_input(file: Option<PathBuf>) -> Result<Option<String>, CliError> {
    let bytes = match file {
        Some(path) => std::fs::read(path)?,
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = Vec::new();
            io::stdin().read_to_end(&mut buffer)?;
            buffer
        }
        None => return Ok(None),
    };
    Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
}

fn run_compile(
    file: Option<PathBuf>,
    pretty: bool,
    strict: bool,
    tokens_only: bool,
) -> Result<(), CliError> {
    let request = CompileRequest {
        input: read_input(file)?,
        pretty,
        strict,
        tokens_only,
    };

    let output = cli::execute_compile(&request)?;
    println!("{}", output.to_json(request.pretty)?);
    Ok(())
}

fn run_serve(options: ServeOptions) -> Result<(), CliError> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(cli::serve(options))
}
