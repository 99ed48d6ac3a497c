use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use bitbrush::api;
use bitbrush::models::{AppConfig, Credentials};
use bitbrush::rendering::{render_preview_png, ExportSize};
use bitbrush::server;
use bitbrush::services::{
    copy_grid, http_client, title_for_download, wait_for_result, FileClipboard,
    GenerationRequest, ImageGenerator, OpenAiClient, ReplicateClient, VARIANT_COUNT,
};
use pixel_grid::{
    instructions, rasterize, BackgroundThreshold, Session, SourceBitmap, TransformState,
    DEFAULT_DESCRIPTION, DEFAULT_TITLE,
};

#[derive(Parser)]
#[command(name = "bitbrush")]
#[command(about = "BitBrush - 16x16 pixel-art editor server and tools")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Convert an image file into a 16x16 grid
    Convert {
        /// Source image (PNG, JPEG, WebP, GIF or BMP)
        image: PathBuf,

        /// Horizontal pan in surface units (the surface is 320 wide)
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        offset_x: f32,

        /// Vertical pan in surface units
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        offset_y: f32,

        /// Scale factor (default: fit the longer side to the surface)
        #[arg(long)]
        scale: Option<f32>,

        /// Clockwise rotation in degrees (multiples of 90)
        #[arg(long, default_value_t = 0)]
        rotate: u16,

        /// Background threshold 0-255; 128 keeps everything
        #[arg(short, long)]
        threshold: Option<u8>,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Write instruction text here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write a PNG of the result
        #[arg(long)]
        png: Option<PathBuf>,

        /// PNG size: 16, 32, 64, 96, 128 or 256
        #[arg(long, default_value_t = 256)]
        size: u32,

        /// Ask OpenAI for a title and description when no --title is given
        #[arg(long)]
        describe: bool,
    },
    /// Render instruction text to a PNG file
    Render {
        /// Instruction text file
        instructions: PathBuf,

        /// Output PNG file path
        #[arg(short, long)]
        output: PathBuf,

        /// PNG size: 16, 32, 64, 96, 128 or 256
        #[arg(short, long, default_value_t = 256)]
        size: u32,

        /// Render the light/dark preview tile
        #[arg(long)]
        preview: bool,
    },
    /// Generate images for a title and print their URLs
    Generate {
        title: String,

        #[arg(short, long, default_value = "")]
        description: String,

        /// How many variants to generate (1-4)
        #[arg(short, long, default_value_t = 1)]
        variants: u32,
    },
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "BitBrush API",
        description = "16x16 pixel-art editor: image conversion, AI naming and generation, artwork storage",
        version = "0.1.0",
        license(name = "MIT")
    ),
    paths(
        api::handle_generate_images,
        api::handle_prediction,
        api::handle_proxy_image,
        api::handle_check_env,
        api::handle_rasterize,
        api::handle_describe,
        api::handle_list_artworks,
        api::handle_save_artwork,
        api::handle_get_artwork,
        api::handle_artwork_png,
    ),
    components(schemas(
        api::GenerateRequest,
        api::GenerateResponse,
        api::PredictionResponse,
        api::CheckEnvResponse,
        api::RasterizeRequest,
        api::RasterizeResponse,
        api::DescribeRequest,
        bitbrush::models::ArtworkRecord,
        bitbrush::models::SavedArtwork,
        bitbrush::services::TitleDescription,
    )),
    tags(
        (name = "Generation", description = "AI image generation and result proxying"),
        (name = "Editor", description = "Image conversion and naming"),
        (name = "Artworks", description = "Saved artworks and PNG export")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve) => run_server().await,
        Some(Commands::Convert {
            image,
            offset_x,
            offset_y,
            scale,
            rotate,
            threshold,
            title,
            description,
            output,
            png,
            size,
            describe,
        }) => {
            init_cli_tracing();
            let transform = |source: &SourceBitmap| TransformState {
                offset_x,
                offset_y,
                scale: scale
                    .unwrap_or_else(|| TransformState::fitted(source.width(), source.height()).scale),
                rotation_degrees: rotate,
            };
            run_convert_command(
                &image,
                transform,
                threshold,
                title.as_deref().unwrap_or(DEFAULT_TITLE),
                description.as_deref().unwrap_or(DEFAULT_DESCRIPTION),
                output.as_deref(),
                png.as_deref(),
                size,
                describe,
            )
            .await
        }
        Some(Commands::Render {
            instructions,
            output,
            size,
            preview,
        }) => {
            init_cli_tracing();
            run_render_command(&instructions, &output, size, preview)
        }
        Some(Commands::Generate {
            title,
            description,
            variants,
        }) => {
            init_cli_tracing();
            run_generate_command(title, description, variants).await
        }
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// Minimal logging for one-shot commands
fn init_cli_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bitbrush=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

/// Convert an image file into instruction text and optionally a PNG
#[allow(clippy::too_many_arguments)]
async fn run_convert_command(
    image: &Path,
    transform: impl Fn(&SourceBitmap) -> TransformState,
    threshold: Option<u8>,
    title: &str,
    description: &str,
    output: Option<&Path>,
    png: Option<&Path>,
    size: u32,
    describe: bool,
) -> anyhow::Result<()> {
    let size = ExportSize::new(size)?;
    let config = AppConfig::from_env();
    let threshold = threshold
        .map(BackgroundThreshold)
        .unwrap_or(config.editor.background_threshold);

    let bytes = std::fs::read(image)?;
    let source = SourceBitmap::decode(&bytes)?;
    let state = transform(&source);
    let grid = rasterize(&source, &state, threshold);
    tracing::info!(
        width = source.width(),
        height = source.height(),
        scale = state.scale,
        threshold = threshold.value(),
        "Converted image"
    );

    let mut session = Session::with_threshold(threshold);
    session.load_artwork(title, description, grid);
    if describe {
        let describer = OpenAiClient::new(
            http_client()?,
            config.openai.clone(),
            Credentials::from_env().openai_key,
        );
        let title = title_for_download(&describer, &mut session).await;
        tracing::info!(%title, "Named artwork");
    }

    let text = session.export_instructions();
    match output {
        Some(path) => {
            std::fs::write(path, &text)?;
            println!("Wrote instructions to {}", path.display());
        }
        None => println!("{text}"),
    }

    if let Some(path) = png {
        copy_grid(&FileClipboard::new(path), session.grid(), size)?;
        println!("Rendered {} ({}x{})", path.display(), size.pixels(), size.pixels());
    }
    Ok(())
}

/// Render instruction text to a PNG file (no server needed)
fn run_render_command(
    instructions_path: &Path,
    output: &Path,
    size: u32,
    preview: bool,
) -> anyhow::Result<()> {
    let size = ExportSize::new(size)?;
    let text = std::fs::read_to_string(instructions_path)?;
    let decoded = instructions::decode(&text);
    for warning in &decoded.warnings {
        tracing::warn!(%warning, "Instruction text problem");
    }

    if preview {
        let png = render_preview_png(&decoded.grid, size)?;
        std::fs::write(output, &png)?;
        println!("Rendered preview {} ({} bytes)", output.display(), png.len());
    } else {
        copy_grid(&FileClipboard::new(output), &decoded.grid, size)?;
        println!("Rendered {} ({}x{})", output.display(), size.pixels(), size.pixels());
    }
    Ok(())
}

/// Start image generation for a title and wait for the results
async fn run_generate_command(
    title: String,
    description: String,
    variants: u32,
) -> anyhow::Result<()> {
    if !(1..=VARIANT_COUNT).contains(&variants) {
        anyhow::bail!("--variants must be between 1 and {VARIANT_COUNT}");
    }
    let config = AppConfig::from_env();
    let credentials = Credentials::from_env();
    let client = ReplicateClient::new(
        http_client()?,
        config.replicate.clone(),
        credentials.replicate_token,
    );
    if !client.is_configured() {
        anyhow::bail!("Replicate API key is missing (set REPLICATE_API_TOKEN)");
    }

    let client = Arc::new(client);
    let interval = Duration::from_millis(config.replicate.poll_interval_ms);
    let max_polls = config.replicate.max_polls;
    let mut jobs = tokio::task::JoinSet::new();
    for index in 0..variants {
        let request = GenerationRequest {
            title: title.clone(),
            description: description.clone(),
            index,
        };
        let client = client.clone();
        jobs.spawn(async move {
            let result = match client.start(&request).await {
                Ok(id) => wait_for_result(client.as_ref(), &id, interval, max_polls).await,
                Err(e) => Err(e),
            };
            (index, result)
        });
    }

    let mut results = Vec::new();
    while let Some(joined) = jobs.join_next().await {
        results.push(joined?);
    }
    results.sort_by_key(|(index, _)| *index);

    let mut failures = 0;
    for (index, result) in results {
        match result {
            Ok(urls) => {
                for url in urls {
                    println!("{}: {url}", index + 1);
                }
            }
            Err(e) => {
                failures += 1;
                eprintln!("{}: failed: {e}", index + 1);
            }
        }
    }
    if failures == variants {
        anyhow::bail!("All image generations failed");
    }
    Ok(())
}

/// Display status and configuration information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let bind_addr = std::env::var("BIND_ADDR").ok();
    let config_file = std::env::var("CONFIG_FILE").ok();
    let data_dir = std::env::var("DATA_DIR").ok();
    let openai_model = std::env::var("OPENAI_MODEL").ok();
    let credentials = Credentials::from_env();

    println!("BitBrush v{VERSION}");
    println!("16x16 pixel-art editor server and tools\n");

    println!("Environment Variables:");
    println!(
        "  BIND_ADDR           = {}",
        bind_addr.as_deref().unwrap_or("0.0.0.0:3001 (default)")
    );
    println!(
        "  CONFIG_FILE         = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  DATA_DIR            = {}",
        data_dir.as_deref().unwrap_or("(not set, in-memory store)")
    );
    println!(
        "  OPENAI_MODEL        = {}",
        openai_model.as_deref().unwrap_or("(not set)")
    );

    fn presence(set: bool) -> &'static str {
        if set {
            "set"
        } else {
            "missing"
        }
    }

    println!("\nCredentials:");
    println!(
        "  REPLICATE_API_TOKEN = {}",
        presence(credentials.replicate_token.is_some())
    );
    println!(
        "  OPENAI_API_KEY      = {}",
        presence(credentials.openai_key.is_some())
    );

    println!("\nCommands:");
    println!("  bitbrush serve      Start the HTTP server");
    println!("  bitbrush convert    Convert an image to a 16x16 grid");
    println!("  bitbrush render     Render instruction text to PNG");
    println!("  bitbrush generate   Generate images for a title");
    println!("\nRun 'bitbrush --help' for more details.");
}

/// Run the HTTP server
async fn run_server() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bitbrush=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3001".to_string());
    let config = AppConfig::from_env();
    let credentials = Credentials::from_env();

    tracing::info!(
        replicate = credentials.replicate_token.is_some(),
        openai = credentials.openai_key.is_some(),
        data_dir = ?config.storage.data_dir,
        "Provider credentials"
    );

    let state = server::create_app_state(config, credentials).await?;

    let app = server::build_router(state)
        // OpenAPI documentation (production only)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "BitBrush server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
