use std::path::PathBuf;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tts_cache::domain::tts::{CacheStore, SynthesisRequest, TtsService};
use tts_cache::error::{AppError, AppResult};
use tts_cache::infrastructure::config::{Config, LogFormat};
use tts_cache::infrastructure::providers::create_provider;

#[tokio::main]
async fn main() {
    match run().await {
        // The one line of stdout is the contract: callers read the path.
        Ok(path) => println!("{}", path.display()),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

async fn run() -> AppResult<PathBuf> {
    let request = parse_args(std::env::args().skip(1).collect())?;
    let config = Config::from_env()?;
    init_logging(&config);

    tracing::info!(
        provider = config.provider.as_str(),
        cache_dir = %config.cache_dir.display(),
        "starting TTS request"
    );

    std::fs::create_dir_all(&config.cache_dir).map_err(|e| {
        AppError::Config(format!(
            "Could not create directory {}: {e}",
            config.cache_dir.display()
        ))
    })?;
    let cache_dir = std::fs::canonicalize(&config.cache_dir)?;

    let provider = create_provider(&config).await;
    let service = TtsService::new(provider, CacheStore::new(cache_dir));
    service.speak(&request).await
}

/// Positional arguments: `<language> [voice] <text>`.
fn parse_args(args: Vec<String>) -> Result<SynthesisRequest, AppError> {
    let mut args = args;
    let request = match args.len() {
        2 => {
            let text = args.pop().unwrap_or_default();
            let language = args.pop().unwrap_or_default();
            SynthesisRequest::new(language, None, text)
        }
        3 => {
            let text = args.pop().unwrap_or_default();
            let voice = args.pop().unwrap_or_default();
            let language = args.pop().unwrap_or_default();
            SynthesisRequest::new(language, Some(voice), text)
        }
        _ => {
            return Err(AppError::Config(
                "Wrong parameter count. Usage: tts-cache <language> [voice] <text>".to_string(),
            ))
        }
    };
    if request.text.trim().is_empty() {
        return Err(AppError::Config("Text must not be empty".to_string()));
    }
    Ok(request)
}

fn init_logging(config: &Config) {
    // Logs go to stderr; stdout carries exactly the resolved path.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tts_cache=info".into());
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
