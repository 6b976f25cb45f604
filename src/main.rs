use std::fs;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use mdrtf::{Config, Rgb};

#[derive(Parser)]
#[command(name = "mdrtf")]
#[command(about = "Convert Markdown files to RTF")]
struct Cli {
    /// Input Markdown file
    input: PathBuf,

    /// Output RTF file (defaults to input name with .rtf extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Body font size in half-points (overrides config)
    #[arg(long)]
    base_size: Option<u32>,

    /// Default text color as #RRGGBB (overrides config)
    #[arg(long)]
    default_color: Option<Rgb>,

    /// Log conversion details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> mdrtf::Result<PathBuf> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path),
        None => Config::compiled_default(),
    };
    if let Some(size) = cli.base_size {
        config.font.base_size = size;
    }
    if let Some(color) = cli.default_color {
        config.colors.default = Some(color.to_string());
    }

    let markdown = fs::read_to_string(&cli.input)?;
    let rtf = mdrtf::convert_with_config(&markdown, &config)?;

    let output = cli
        .output
        .unwrap_or_else(|| cli.input.with_extension("rtf"));
    fs::write(&output, rtf)?;
    Ok(output)
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let input = cli.input.clone();
    match run(cli) {
        Ok(output) => println!("Created {}", output.display()),
        Err(e) => {
            eprintln!("Error converting {}: {}", input.display(), e);
            std::process::exit(1);
        }
    }
}
