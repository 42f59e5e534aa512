use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use notion_md::Config;

#[derive(Parser)]
#[command(name = "notion-md")]
#[command(about = "Convert a saved Notion page to Markdown")]
struct Cli {
    /// Input HTML snapshot ("-" reads stdin)
    input: PathBuf,

    /// Output Markdown file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML config overriding the built-in markers and rendering settings
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        None => Config::compiled_default(),
    };

    // Read input snapshot
    let html = match read_input(&cli.input) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading {}: {}", cli.input.display(), e);
            std::process::exit(1);
        }
    };

    let markdown = notion_md::html_to_markdown_with_config(&html, &config);
    info!(bytes = markdown.len(), "converted page");

    match &cli.output {
        Some(output) => {
            if let Err(e) = fs::write(output, &markdown) {
                eprintln!("Error writing {}: {}", output.display(), e);
                std::process::exit(1);
            }
            eprintln!("Created {}", output.display());
        }
        None => print!("{}", markdown),
    }
}

fn read_input(path: &Path) -> io::Result<String> {
    if path == Path::new("-") {
        let mut html = String::new();
        io::stdin().read_to_string(&mut html)?;
        return Ok(html);
    }
    fs::read_to_string(path)
}
