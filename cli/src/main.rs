//! undoc CLI - document text extraction tool

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use colored::Colorize;

use undoc::{
    extract_with_options, BlankLines, Error, ExtractOptions, HtmlOptions, MediaType,
};

#[derive(Parser)]
#[command(name = "undoc")]
#[command(version)]
#[command(about = "Extract plain text and HTML previews from PDF, DOCX, and TXT files", long_about = None)]
struct Cli {
    /// Input document
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Declared media type (inferred from the file extension if omitted)
    #[arg(short = 't', long, value_name = "MIME")]
    media_type: Option<String>,

    /// Output to produce
    #[arg(short, long, value_enum, default_value = "text")]
    format: Format,

    /// Output file (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Heading length cap for HTML rendering
    #[arg(long, default_value = "30")]
    heading_max: usize,

    /// Render blank lines as spacers instead of dropping them
    #[arg(long)]
    spacers: bool,

    /// Disable parallel page processing
    #[arg(long)]
    sequential: bool,

    /// Maximum input size in bytes (0 = unlimited)
    #[arg(long, default_value_t = undoc::convert::DEFAULT_MAX_INPUT_BYTES)]
    max_size: usize,
}

/// Output produced by the CLI.
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Extracted plain text
    Text,
    /// HTML preview fragment
    Html,
    /// Both, as a JSON object
    Json,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(err) = run(&cli) {
        eprintln!("{} {}", "error:".red().bold(), err);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> undoc::Result<()> {
    let media_type = match &cli.media_type {
        Some(mime) => MediaType::from_mime(mime)?,
        None => MediaType::from_path(&cli.input)?,
    };

    let html = HtmlOptions::default()
        .with_heading_max_len(cli.heading_max)
        .with_blank_lines(if cli.spacers {
            BlankLines::Spacer
        } else {
            BlankLines::Skip
        });
    let mut options = ExtractOptions::new()
        .with_max_input_bytes(cli.max_size)
        .with_html(html.clone());
    if cli.sequential {
        options = options.sequential();
    }

    log::info!("extracting {} as {}", cli.input.display(), media_type);
    let data = fs::read(&cli.input)?;
    let extraction = extract_with_options(&data, media_type.mime(), &options)?;

    let output = match cli.format {
        Format::Text => extraction.text,
        Format::Html => {
            // PDF carries no stored preview; re-render it from the text the
            // same way a document viewer would.
            if extraction.preview_html.is_empty() {
                undoc::render_html(&extraction.text, &html)
            } else {
                extraction.preview_html
            }
        }
        Format::Json => serde_json::to_string_pretty(&extraction)
            .map_err(|e| Error::Other(e.to_string()))?,
    };

    match &cli.output {
        Some(path) => {
            fs::write(path, output)?;
            eprintln!("{} wrote {}", "ok:".green().bold(), path.display());
        }
        None => println!("{output}"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parses() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_format_defaults_to_text() {
        let cli = Cli::parse_from(["undoc", "input.pdf"]);
        assert!(cli.format == Format::Text);
        assert!(cli.media_type.is_none());
        assert!(!cli.sequential);
    }

    #[test]
    fn test_media_type_override() {
        let cli = Cli::parse_from(["undoc", "blob.bin", "-t", "text/plain", "--format", "json"]);
        assert_eq!(cli.media_type.as_deref(), Some("text/plain"));
        assert!(cli.format == Format::Json);
    }
}
