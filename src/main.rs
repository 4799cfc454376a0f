use clap::{Parser, Subcommand};
use podcast_studio::controllers::podcast::PodcastController;
use podcast_studio::controllers::progress::{describe_summary, ConsoleProgressObserver};
use podcast_studio::domain::audio::{AudioCombiner, CombineOptions};
use podcast_studio::domain::pipeline::PipelineOrchestrator;
use podcast_studio::domain::progress::StageSummary;
use podcast_studio::domain::synthesis::{BatchClipSynthesizer, BatchConfig};
use podcast_studio::error::{AppError, AppResult};
use podcast_studio::infrastructure::config::{Config, LogFormat, TtsProvider};
use podcast_studio::infrastructure::repositories::{
    OpenAiContentRepository, OpenAiTtsRepository, PollyTtsRepository, TtsRepository,
};
use podcast_studio::infrastructure::storage::RunStore;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "podcast-studio")]
#[command(
    about = "Turn a content brief and voice assignments into a multi-speaker podcast",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline from a brief file
    Generate {
        /// Path to the brief JSON file
        #[arg(short, long)]
        brief: PathBuf,

        /// Quality preset (quick, standard, high); overrides the brief
        #[arg(short, long)]
        quality: Option<String>,

        /// Root directory for run artifacts; overrides OUTPUT_DIR
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// Combine an existing directory of clip_<index>_<speaker>.wav files
    Combine {
        /// Directory containing the clips
        #[arg(short, long)]
        clips_dir: PathBuf,

        /// Destination WAV file
        #[arg(short, long)]
        output: PathBuf,

        /// Silence between clips in milliseconds; overrides INTER_CLIP_SILENCE_MS
        #[arg(long)]
        silence_ms: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(e.exit_code());
        }
    };

    init_logging(&config);

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let report = e.to_report();
            tracing::error!(error = %e, exit_code = report.exit_code, "Command failed");
            eprintln!("error: {}", report.message);
            ExitCode::from(report.exit_code)
        }
    }
}

async fn run(cli: Cli, mut config: Config) -> AppResult<()> {
    match cli.command {
        Commands::Generate {
            brief,
            quality,
            output_dir,
        } => {
            if let Some(output_dir) = output_dir {
                config.output_dir = output_dir;
            }
            let controller = build_controller(&config).await?;
            let observer = ConsoleProgressObserver::new();

            let artifacts = controller
                .generate(&brief, quality.as_deref(), &observer)
                .await?;

            println!();
            println!("Run {} finished", artifacts.run_id);
            println!("  outline:    {}", artifacts.outline_path.display());
            println!("  transcript: {}", artifacts.transcript_path.display());
            println!(
                "  clips:      {} ok of {}",
                artifacts.clip_paths.len(),
                artifacts.clips.len()
            );
            for clip in artifacts.clips.clips().iter().filter(|c| !c.is_success()) {
                println!(
                    "    line {} ({}) failed: {}",
                    clip.dialogue_index,
                    clip.speaker,
                    clip.error.as_deref().unwrap_or("unknown error")
                );
            }
            println!("  podcast:    {}", artifacts.combined_audio_path.display());
        }
        Commands::Combine {
            clips_dir,
            output,
            silence_ms,
        } => {
            let silence = Duration::from_millis(silence_ms.unwrap_or(config.inter_clip_silence_ms));
            let combined = PodcastController::combine(&clips_dir, &output, Some(silence))?;
            println!(
                "{}",
                describe_summary(&StageSummary::Combined {
                    output_path: combined.output_path,
                    duration_secs: combined.duration_secs,
                    source_clip_count: combined.source_clip_count,
                })
            );
        }
    }

    Ok(())
}

async fn build_controller(config: &Config) -> AppResult<PodcastController> {
    tracing::info!(
        output_dir = %config.output_dir.display(),
        content_model = %config.content_model,
        tts_provider = ?config.tts_provider,
        max_concurrent = config.synthesis_max_concurrent,
        "Starting podcast studio"
    );

    if std::env::var("OPENAI_API_KEY").is_err() {
        return Err(AppError::Config(
            "OPENAI_API_KEY is required for content generation".to_string(),
        ));
    }
    let openai_client = Arc::new(async_openai::Client::new());

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Repositories
    let content_repo = Arc::new(OpenAiContentRepository::new(
        openai_client.clone(),
        config.content_model.clone(),
    ));
    let tts_repo: Arc<dyn TtsRepository> = match config.tts_provider {
        TtsProvider::OpenAi => Arc::new(OpenAiTtsRepository::new(
            openai_client.clone(),
            config.openai_tts_model.clone(),
        )),
        TtsProvider::Polly => {
            let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
                .region(aws_config::Region::new(config.aws_region.clone()))
                .load()
                .await;
            tracing::info!(region = ?aws_config.region(), "AWS configuration loaded");
            Arc::new(PollyTtsRepository::new(Arc::new(aws_sdk_polly::Client::new(
                &aws_config,
            ))))
        }
    };

    // 2. Services
    let synthesizer = Arc::new(BatchClipSynthesizer::new(
        tts_repo,
        BatchConfig {
            max_concurrent: config.synthesis_max_concurrent,
            request_timeout: config.synthesis_timeout(),
            retry_attempts: config.synthesis_retry_attempts,
        },
    ));
    let orchestrator = Arc::new(PipelineOrchestrator::new(
        content_repo,
        synthesizer,
        AudioCombiner::new(CombineOptions {
            inter_clip_silence: config.inter_clip_silence(),
        }),
        RunStore::new(config.output_dir.clone()),
    ));

    // 3. Controller
    Ok(PodcastController::new(orchestrator))
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "podcast_studio=info".into());

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .init();
    }
}
