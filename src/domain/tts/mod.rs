pub mod cache;
pub mod cache_key;
pub mod error;
pub mod service;
pub mod voice;

pub use cache::{CacheStore, MIN_VALID_BYTES};
pub use error::SynthesisError;
pub use service::TtsService;
pub use voice::{catalog_for, NormalizedVoice, VoiceCatalog};

use std::fmt;
use std::str::FromStr;

/// One utterance to synthesize. Constructed once from the invocation
/// arguments and immutable afterwards.
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub text: String,
    /// Requested language tag, normalized per provider before use.
    pub language: String,
    /// Requested voice, if the caller named one.
    pub voice: Option<String>,
    pub rate: String,
    pub volume: String,
}

impl SynthesisRequest {
    pub fn new(language: String, voice: Option<String>, text: String) -> Self {
        Self {
            text,
            language,
            voice,
            rate: "default".to_string(),
            volume: "default".to_string(),
        }
    }
}

/// The interchangeable TTS backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// meine-homematic.de gateway in front of a MARY installation.
    EasyGateway,
    /// Ivona CreateSpeech API (SigV4-signed requests).
    Ivona,
    /// AWS Polly via the official SDK.
    Polly,
    /// Local espeak piped into lame.
    Espeak,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::EasyGateway => "easytts",
            ProviderKind::Ivona => "ivona",
            ProviderKind::Polly => "polly",
            ProviderKind::Espeak => "espeak",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easytts" => Ok(ProviderKind::EasyGateway),
            "ivona" => Ok(ProviderKind::Ivona),
            "polly" => Ok(ProviderKind::Polly),
            "espeak" => Ok(ProviderKind::Espeak),
            other => Err(format!(
                "Unsupported TTS provider: {other}. Supported providers: easytts, ivona, polly, espeak"
            )),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
