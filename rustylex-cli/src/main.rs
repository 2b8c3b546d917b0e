//! rustylex - dump the token stream of XML/HTML documents
//!
//! One token per line as `line:column Kind("text")`.

use clap::Parser;
use rustylex::{decode_input, lex_parallel, LexerOptions, Token};
use std::borrow::Cow;
use std::fmt;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "rustylex", about = "Streaming, tolerant XML/HTML lexer", version)]
struct Cli {
    /// Input files ("-" reads standard input)
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,

    /// Lex as HTML (void elements, raw script/style content)
    #[arg(long)]
    html: bool,

    /// Keep entity references undecoded
    #[arg(long)]
    raw: bool,

    /// Print the byte span of each token
    #[arg(long)]
    spans: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = LexerOptions::xml()
        .with_html(cli.html)
        .with_entity_decoding(!cli.raw);

    // Read everything up front; lexing borrows the buffers
    let mut failed = false;
    let mut buffers = Vec::with_capacity(cli.files.len());
    for path in &cli.files {
        match read_input(path) {
            Ok(bytes) => buffers.push((path, bytes)),
            Err(e) => {
                report(path, format_args!("cannot read: {e}"));
                failed = true;
            }
        }
    }

    let mut documents: Vec<(&Path, Cow<'_, str>)> = Vec::with_capacity(buffers.len());
    for (path, bytes) in &buffers {
        match decode_input(bytes) {
            Ok(text) => documents.push((path.as_path(), text)),
            Err(e) => {
                report(path, format_args!("{e}"));
                failed = true;
            }
        }
    }

    let inputs: Vec<&str> = documents.iter().map(|(_, text)| text.as_ref()).collect();
    debug!(documents = inputs.len(), "lexing");
    let results = lex_parallel(&inputs, options);

    let show_names = cli.files.len() > 1;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for ((path, _), tokens) in documents.iter().zip(&results) {
        if let Err(e) = print_tokens(&mut out, path, tokens, show_names, cli.spans) {
            // Broken pipe and friends: nothing more to write
            debug!("stopping output: {e}");
            break;
        }
    }
    if out.flush().is_err() {
        failed = true;
    }

    if failed {
        process::exit(1);
    }
}

/// Install a fmt subscriber; RUST_LOG wins over -v
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Per-file failures go to stderr; the run continues with the other files
fn report(path: &Path, message: fmt::Arguments<'_>) {
    eprintln!("Error: '{}': {}", path.display(), message);
}

fn read_input(path: &Path) -> io::Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut bytes = Vec::new();
        io::stdin().lock().read_to_end(&mut bytes)?;
        Ok(bytes)
    } else {
        std::fs::read(path)
    }
}

fn print_tokens<W: Write>(
    out: &mut W,
    path: &Path,
    tokens: &[Token<'_>],
    show_name: bool,
    spans: bool,
) -> io::Result<()> {
    if show_name {
        writeln!(out, "==> {} <==", path.display())?;
    }
    for token in tokens {
        write!(out, "{}:{} {}", token.line, token.column, token)?;
        if spans {
            write!(out, " {}..{}", token.span.start, token.span.end)?;
        }
        writeln!(out)?;
    }
    Ok(())
}
