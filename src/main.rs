use std::path::{Path, PathBuf};

use clap::Parser;
use time::{UtcOffset, macros::format_description};

use wastelens::{
    AppConfig, AppState, Completion, DetectionClient, HistoryStore, Renderer, UploadedImage,
    logging, summarize,
};

#[derive(Parser)]
#[command(name = "wastelens")]
#[command(about = "Detect and classify waste in images using a remote detection API")]
struct Cli {
    /// Image files to process, in order
    #[arg(value_name = "IMAGE", required = true)]
    images: Vec<PathBuf>,

    /// Detection API endpoint (overrides WASTELENS_API_URL)
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Use canned results instead of calling the API
    #[arg(long)]
    mock: bool,

    /// Write annotated images to this directory
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// TrueType font for box labels (overrides WASTELENS_FONT)
    #[arg(long, value_name = "PATH")]
    font: Option<PathBuf>,

    /// Print summaries as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let mut config = AppConfig::from_env()?;
    logging::init_tracing(&config.log_level, args.verbose.then_some("debug"));

    if let Some(endpoint) = &args.endpoint {
        config.detector.endpoint = endpoint.clone();
    }
    if args.mock {
        config.detector.use_mock = true;
    }
    if args.font.is_some() {
        config.font_path = args.font.clone();
    }
    if let Some(dir) = &args.out_dir {
        tokio::fs::create_dir_all(dir).await?;
    }

    let client = DetectionClient::from_config(&config.detector)?;
    let renderer = Renderer::from_font_path(config.font_path.as_deref())?;
    let mut state = AppState::new(config.detector.clone());

    if args.verbose {
        println!(
            "Endpoint: {}{}",
            state.settings().endpoint,
            if state.settings().use_mock { " (mock mode)" } else { "" }
        );
    }

    let mut processed = 0;
    for path in &args.images {
        match process_image(&mut state, &client, &renderer, path, &args).await {
            Ok(true) => processed += 1,
            Ok(false) => {}
            Err(e) => eprintln!("{}: {:#}", path.display(), e),
        }
    }

    if !args.json {
        print_history(state.history());
    }

    if processed == 0 {
        anyhow::bail!("no image could be processed");
    }
    Ok(())
}

/// Select, detect, render and summarize one image.
///
/// Returns `Ok(false)` when the detect action failed; the reason has already been printed.
async fn process_image(
    state: &mut AppState,
    client: &DetectionClient,
    renderer: &Renderer,
    path: &Path,
    args: &Cli,
) -> anyhow::Result<bool> {
    let image = match UploadedImage::load(path).await {
        Ok(image) => image,
        Err(e) => {
            eprintln!("{}: {}", path.display(), e);
            return Ok(false);
        }
    };

    if args.verbose {
        let (width, height) = image.dimensions();
        println!("Loaded {} ({}x{})", path.display(), width, height);
    }

    state.select_image(image);
    match state.process_image(client).await {
        Some(Completion::Applied) => {}
        Some(Completion::Failed(message)) => {
            eprintln!("{}: {}", path.display(), message);
            return Ok(false);
        }
        Some(Completion::Stale) | None => return Ok(false),
    }

    let (Some(image), Some(results)) = (state.current_image(), state.results()) else {
        return Ok(false);
    };

    let annotated = renderer.render(image, &results.detections)?;
    let summary = summarize(results);

    if args.json {
        let report = serde_json::json!({
            "image": path.display().to_string(),
            "summary": summary,
            "detections": results.detections,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("\n=== {} ===", path.display());
        println!("{}", summary);
    }

    if let Some(dir) = &args.out_dir {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("image");
        let out_path = dir.join(format!("{}.annotated.png", stem));
        annotated.save(&out_path)?;
        if !args.json {
            println!("Annotated image: {}", out_path.display());
        }
    }

    Ok(true)
}

fn print_history(history: &HistoryStore) {
    println!("\n=== Detection History ===");
    if history.is_empty() {
        println!("No detection history yet");
        return;
    }

    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

    for record in history.list() {
        let when = record
            .timestamp()
            .to_offset(offset)
            .format(format)
            .unwrap_or_else(|_| record.timestamp().to_string());
        let results = record.results();
        println!(
            "{}  {}  {} objects detected  ({:.2}s)",
            when,
            record.image().name().unwrap_or("image"),
            results.object_count(),
            results.processing_time
        );
        for detection in &results.detections {
            let [x, y, w, h] = detection.bbox.rounded();
            println!(
                "    {} {}%  Box: [{}, {}, {}, {}]",
                detection.class_name,
                detection.confidence_percent(),
                x,
                y,
                w,
                h
            );
        }
    }
}
