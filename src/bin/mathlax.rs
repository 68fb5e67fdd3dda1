//! Mathlax CLI - parse LaTeX math and print the document tree

#[cfg(feature = "cli")]
use clap::{Parser, ValueEnum};
#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::io::{self, Read, Write};
#[cfg(feature = "cli")]
use mathlax::{to_json, IncrementalParser, LatexParser, Node, ParserOptions};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "mathlax")]
#[command(version)]
#[command(about = "Mathlax - fault-tolerant, incremental LaTeX math parser", long_about = None)]
struct Cli {
    /// Formula to parse (reads --input or stdin if not provided)
    formula: Option<String>,

    /// Read the formula from this file
    #[arg(short, long)]
    input: Option<String>,

    /// Output file path (writes to stdout if not provided)
    #[arg(short, long)]
    output: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Tree)]
    format: Format,

    /// Pretty print JSON output
    #[arg(short, long)]
    pretty: bool,

    /// Feed the input through the incremental parser in chunks
    #[arg(long)]
    incremental: bool,

    /// Chunk size in characters for --incremental
    #[arg(long, default_value_t = 8)]
    chunk: usize,

    /// Maximum nesting depth
    #[arg(long)]
    max_depth: Option<usize>,

    /// Log parser decisions (same as RUST_LOG=debug)
    #[arg(short, long)]
    verbose: bool,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Indented tree
    Tree,
    /// JSON (serde)
    Json,
    /// Rust debug representation
    Debug,
}

#[cfg(feature = "cli")]
fn main() -> io::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    // Read input
    let input = match (&cli.formula, &cli.input) {
        (Some(formula), _) => formula.clone(),
        (None, Some(path)) => fs::read_to_string(path)?,
        (None, None) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    let input = input.trim_end_matches(['\n', '\r']);

    let mut options = ParserOptions::new();
    if let Some(depth) = cli.max_depth {
        options = options.with_max_depth(depth);
    }
    let parser = LatexParser::with_options(options);

    let mut output = String::new();
    let mut failed = false;

    if cli.incremental {
        let mut incremental = IncrementalParser::with_parser(parser);
        let chars: Vec<char> = input.chars().collect();
        for chunk in chars.chunks(cli.chunk.max(1)) {
            let text: String = chunk.iter().collect();
            incremental.append(&text);
            output.push_str(&format!(
                "+ {:?}: {:.0}% parsed, unparsed {:?}\n",
                text,
                incremental.progress() * 100.0,
                incremental.unparsed_content()
            ));
        }
        if let Some(err) = incremental.last_error() {
            output.push_str(&format!("last error: {}\n", err));
        }
        output.push_str(&render(incremental.current_document(), &cli)?);
    } else {
        let mut parser = parser;
        match parser.parse(input) {
            Ok(document) => output.push_str(&render(&document, &cli)?),
            Err(err) => {
                eprintln!("error: {}", err);
                failed = true;
            }
        }
    }

    // Write output
    match cli.output {
        Some(ref path) => fs::write(path, &output)?,
        None => io::stdout().write_all(output.as_bytes())?,
    }

    if failed {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn render(document: &Node, cli: &Cli) -> io::Result<String> {
    let mut out = match cli.format {
        Format::Tree => document.to_tree_string(),
        Format::Json => {
            to_json(document, cli.pretty).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?
        }
        Format::Debug => format!("{:#?}", document),
    };
    if !out.ends_with('\n') {
        out.push('\n');
    }
    Ok(out)
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  cargo install mathlax --features cli");
    eprintln!("  mathlax [OPTIONS] [FORMULA]");
}
