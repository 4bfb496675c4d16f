// file: src/main.rs
// description: commandline application entry point
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, CommandFactory, Parser};
use mistral_ocr::config::DEFAULT_CONFIG_PATH;
use mistral_ocr::utils::logging::{self, LOG_LEVEL_ENV, format_error};
use mistral_ocr::{Config, OcrProcessor, RequestSpinner, Validator};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, error, info, warn};

const EXAMPLES: &str = "\
Examples:
  mistral-ocr document.pdf                    # Output to stdout
  mistral-ocr document.pdf -o output.md       # Save to file
  mistral-ocr document.pdf --verbose          # Show progress";

#[derive(Parser, Debug)]
#[command(name = "mistral-ocr")]
#[command(version)]
#[command(about = "Convert PDF documents to Markdown using Mistral AI OCR", long_about = None)]
#[command(after_help = EXAMPLES)]
struct Cli {
    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Output file path (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Mistral API key (default: MISTRAL_API_KEY env var)
    #[arg(long, value_name = "KEY")]
    api_key: Option<String>,

    /// Include images as base64 in markdown (default: true)
    #[arg(long, value_name = "BOOL", num_args = 0..=1, require_equals = true, default_missing_value = "true", action = ArgAction::Set)]
    include_images: Option<bool>,

    /// Print the raw OCR response with file metadata as JSON instead of markdown
    #[arg(long)]
    raw_json: bool,

    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    /// Input PDF file for OCR processing
    pdf_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let env_level = std::env::var(LOG_LEVEL_ENV).ok();
    let level = logging::resolve_level(cli.debug, cli.verbose, env_level.as_deref());
    colored::control::set_override(cli.color);
    logging::init_logger(cli.color, &level);

    if cli.verbose {
        info!("Mistral OCR v{}", mistral_ocr::VERSION);
    }

    let Some(pdf_path) = cli.pdf_file.as_deref() else {
        let _ = Cli::command().print_help();
        return ExitCode::FAILURE;
    };

    if !pdf_path.exists() {
        error!("PDF file not found: {}", pdf_path.display());
        return ExitCode::FAILURE;
    }

    if Validator::validate_pdf_extension(pdf_path).is_err() {
        error!("Input file must be a PDF: {}", pdf_path.display());
        return ExitCode::FAILURE;
    }

    match run(&cli, pdf_path).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Error: {:#}", e);
            if cli.debug {
                eprintln!("{}", format_error(&format!("{:?}", e)));
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, pdf_path: &Path) -> Result<()> {
    let config = load_config(&cli.config)?;
    let include_images = cli.include_images.unwrap_or(config.output.include_images);

    info!("Initializing OCR processor...");
    let processor = OcrProcessor::new(config, cli.api_key.as_deref())
        .context("Failed to initialize OCR processor")?;

    info!("Processing PDF: {}", pdf_path.display());

    let spinner = RequestSpinner::new(cli.verbose, cli.color);
    spinner.set_message(format!("Running OCR on {}", pdf_path.display()));

    let content = if cli.raw_json {
        let info = processor.get_ocr_response_info(pdf_path).await?;
        serde_json::to_string_pretty(&info).context("Failed to serialize OCR response")?
    } else {
        processor.process_pdf(pdf_path, include_images).await?
    };

    spinner.finish();

    match &cli.output {
        Some(output) => {
            fs::write(output, &content)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            if cli.raw_json {
                info!("OCR response saved to: {}", output.display());
            } else {
                info!("Markdown saved to: {}", output.display());
            }
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(content.as_bytes())
                .and_then(|_| stdout.flush())
                .context("Failed to write to stdout")?;
        }
    }

    info!("Processing completed successfully");

    Ok(())
}

fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        debug!("Loading configuration from: {}", path.display());
        return Config::load(Some(path)).context("Failed to load configuration");
    }

    if path != Path::new(DEFAULT_CONFIG_PATH) {
        warn!(
            "Config file {} not found, using default configuration",
            path.display()
        );
    }

    Ok(Config::load(None).unwrap_or_else(|e| {
        warn!("Falling back to built-in defaults: {}", e);
        Config::default_with_env()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["mistral-ocr", "scan.pdf"]).unwrap();

        assert_eq!(cli.pdf_file, Some(PathBuf::from("scan.pdf")));
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert_eq!(cli.include_images, None);
        assert!(cli.color);
        assert!(!cli.debug && !cli.verbose && !cli.raw_json);
    }

    #[test]
    fn test_cli_all_flags() {
        let cli = Cli::try_parse_from([
            "mistral-ocr",
            "--debug",
            "-v",
            "-o",
            "out.md",
            "--api-key",
            "sk-test",
            "--include-images=false",
            "--raw-json",
            "scan.pdf",
        ])
        .unwrap();

        assert!(cli.debug);
        assert!(cli.verbose);
        assert!(cli.raw_json);
        assert_eq!(cli.output, Some(PathBuf::from("out.md")));
        assert_eq!(cli.api_key.as_deref(), Some("sk-test"));
        assert_eq!(cli.include_images, Some(false));
    }

    #[test]
    fn test_cli_bare_include_images_means_true() {
        let cli = Cli::try_parse_from(["mistral-ocr", "--include-images", "scan.pdf"]).unwrap();
        assert_eq!(cli.include_images, Some(true));
        assert_eq!(cli.pdf_file, Some(PathBuf::from("scan.pdf")));
    }

    #[test]
    fn test_cli_file_is_optional() {
        let cli = Cli::try_parse_from(["mistral-ocr"]).unwrap();
        assert!(cli.pdf_file.is_none());
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }
}
