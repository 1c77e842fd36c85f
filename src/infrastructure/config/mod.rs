//! Process configuration, read once from the environment at startup.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::domain::tts::ProviderKind;
use crate::error::AppError;
use crate::infrastructure::providers::easytts;

#[derive(Debug, Clone)]
pub struct Config {
    pub provider: ProviderKind,
    pub cache_dir: PathBuf,
    /// Endpoint of the custom gateway; overridable for self-hosted setups.
    pub gateway_url: String,
    pub aws_region: String,
    pub log_format: LogFormat,
    pub credentials: ProviderCredentials,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Credentials for the selected backend, loaded before any cache or network
/// work. A missing pair is fatal and names both expected settings.
#[derive(Debug, Clone)]
pub enum ProviderCredentials {
    EasyGateway { key: String, username: String },
    Ivona { access_key: String, secret_key: String },
    /// The SDK's own provider chain consumes the keys; only their presence
    /// is verified here.
    Polly,
    Espeak,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let provider = match env::var("TTS_PROVIDER") {
            Ok(value) => ProviderKind::from_str(&value).map_err(AppError::Config)?,
            Err(_) => ProviderKind::Espeak,
        };

        let credentials = match provider {
            ProviderKind::EasyGateway => {
                let (key, username) = credential_pair("TTS_KEY", "TTS_USERNAME")?;
                ProviderCredentials::EasyGateway { key, username }
            }
            ProviderKind::Ivona => {
                let (access_key, secret_key) =
                    credential_pair("IVONA_ACCESS_KEY", "IVONA_SECRET_KEY")?;
                ProviderCredentials::Ivona {
                    access_key,
                    secret_key,
                }
            }
            ProviderKind::Polly => {
                credential_pair("AWS_ACCESS_KEY_ID", "AWS_SECRET_ACCESS_KEY")?;
                ProviderCredentials::Polly
            }
            ProviderKind::Espeak => ProviderCredentials::Espeak,
        };

        Ok(Config {
            provider,
            cache_dir: env::var("TTS_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| env::temp_dir().join("tts-cache")),
            gateway_url: env::var("TTS_GATEWAY_URL")
                .unwrap_or_else(|_| easytts::GATEWAY_URL.to_string()),
            aws_region: env::var("AWS_REGION").unwrap_or_else(|_| "eu-central-1".to_string()),
            log_format: match env::var("LOG_FORMAT").as_deref() {
                Ok("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            credentials,
        })
    }
}

/// Both settings of a credential pair must be present and non-empty; the
/// error names both so a half-configured setup is diagnosed in one go.
fn credential_pair(first: &str, second: &str) -> Result<(String, String), AppError> {
    match (env::var(first), env::var(second)) {
        (Ok(a), Ok(b)) if !a.is_empty() && !b.is_empty() => Ok((a, b)),
        _ => Err(AppError::Config(format!(
            "Please set \"{first}\" and \"{second}\" in the environment"
        ))),
    }
}
