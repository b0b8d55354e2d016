use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ocr_overlay::config::{ClientConfig, DEFAULT_API_BASE_URL};
use ocr_overlay::languages::{
    DEFAULT_SOURCE_LANGUAGE, DEFAULT_TARGET_LANGUAGE, SOURCE_LANGUAGES, TARGET_LANGUAGES,
};
use ocr_overlay::output::save_png;
use ocr_overlay::render::resolve_font;
use ocr_overlay::{ControlState, InferClient, LegacyClient, OverlayView, SourceImage, TextMode};

#[derive(Parser, Debug)]
#[command(name = "ocr-overlay")]
#[command(about = "Send images to an OCR + translation service and render an overlay")]
#[command(version)]
pub struct Args {
    /// Base URL of the inference service
    #[arg(long, env = "OCR_API_BASE_URL", default_value = DEFAULT_API_BASE_URL, global = true)]
    pub api_base_url: String,

    /// Full URL of the legacy photo endpoint (default: <api-base-url>/ocr-translate)
    #[arg(long, env = "OCR_LEGACY_ENDPOINT", global = true)]
    pub legacy_endpoint: Option<String>,

    /// Request timeout in seconds (no timeout if unset)
    #[arg(long, env = "OCR_TIMEOUT_SECS", global = true)]
    pub timeout_secs: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract and translate text, then write the overlay image
    Infer {
        /// Image file to upload
        image: PathBuf,

        /// Language of the text in the image
        #[arg(short = 'l', long, default_value = DEFAULT_SOURCE_LANGUAGE)]
        source_language: String,

        /// Language to translate into
        #[arg(short = 't', long, default_value = DEFAULT_TARGET_LANGUAGE)]
        target_language: String,

        /// Draw the original text instead of the translation
        #[arg(long)]
        original: bool,

        /// Where to write the overlay PNG
        #[arg(short, long, default_value = "overlay.png")]
        output: PathBuf,

        /// TrueType/OpenType font for overlay text
        #[arg(long, env = "OCR_OVERLAY_FONT")]
        font: Option<PathBuf>,

        /// System font family for overlay text when --font is not given (default: sans-serif)
        #[arg(long, env = "OCR_OVERLAY_FONT_FAMILY")]
        font_family: Option<String>,
    },

    /// Upload a photo to the legacy multipart endpoint
    Capture {
        /// Photo to upload (re-encoded as JPEG)
        image: PathBuf,
    },

    /// Check that the service is reachable
    Health,

    /// List the supported language codes
    Languages,
}

impl From<&Args> for ClientConfig {
    fn from(args: &Args) -> Self {
        Self {
            api_base_url: args.api_base_url.clone(),
            legacy_endpoint: args.legacy_endpoint.clone(),
            timeout: args.timeout_secs.map(Duration::from_secs),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    // Initialize tracing; stdout is reserved for results
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ClientConfig::from(&args);
    tracing::debug!("ocr-overlay v{} using {}", env!("CARGO_PKG_VERSION"), config.base_url());

    match args.command {
        Command::Infer {
            image,
            source_language,
            target_language,
            original,
            output,
            font,
            font_family,
        } => {
            let mut state = ControlState::new();
            state.set_source_language(&source_language)?;
            state.set_target_language(&target_language)?;
            state.set_mode(TextMode::from_show_translation(!original));
            tracing::info!(
                "Translating {} to {}",
                state.source_language().name,
                state.target_language().name
            );

            let source = SourceImage::open(&image).await?;
            match source.preview().await {
                Ok(preview) => tracing::info!(
                    "Selected {} ({}x{}, {} bytes)",
                    preview.name,
                    preview.width,
                    preview.height,
                    preview.size_bytes
                ),
                Err(e) => tracing::warn!("Could not preview {}: {}", source.name(), e),
            }
            state.select(source);

            let client = InferClient::new(&config)?;
            let notify = |message: &str| eprintln!("{}", message);
            if state.submit(&client, &notify).await.is_err() {
                return Ok(ExitCode::FAILURE);
            }

            if let Some(summary) = state.summary() {
                println!("{}", summary);
            }
            let mode = state.mode();
            if let Some(text) = state.visible_text() {
                println!();
                println!("{} text:", mode.label());
                println!("{}", text);
            }

            match state.overlay_props() {
                Some(props) => {
                    let font = resolve_font(font.as_deref(), font_family.as_deref())?;
                    let mut view = OverlayView::new(font);
                    view.update(&props).await?;
                    if let Some(surface) = view.surface() {
                        save_png(surface, &output)?;
                        println!();
                        println!(
                            "Overlay ({}, {}x{}) written to {}",
                            mode.label(),
                            props.size.width,
                            props.size.height,
                            output.display()
                        );
                    }
                }
                None => {
                    println!();
                    println!("No lines detected, no overlay written");
                }
            }
        }

        Command::Capture { image } => {
            let photo = SourceImage::open(&image).await?;
            let client = LegacyClient::new(&config)?;
            match client.ocr_translate(&photo).await {
                Ok(result) => {
                    println!("OCR: {}", result.ocr_text);
                    println!("Translated: {}", result.translated_text);
                }
                Err(e) => {
                    eprintln!("{}", e.notification());
                    return Ok(ExitCode::FAILURE);
                }
            }
        }

        Command::Health => {
            let client = InferClient::new(&config)?;
            match client.health().await {
                Ok(health) => println!("{}: {}", config.base_url(), health.status),
                Err(e) => {
                    eprintln!("{}: {}", config.base_url(), e);
                    return Ok(ExitCode::FAILURE);
                }
            }
        }

        Command::Languages => {
            println!("Source languages:");
            for language in SOURCE_LANGUAGES {
                println!("  {:<10} {}", language.code, language.name);
            }
            println!("Target languages:");
            for language in TARGET_LANGUAGES {
                println!("  {:<10} {}", language.code, language.name);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
