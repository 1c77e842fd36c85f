//! TTS backend adapters.
//!
//! Each adapter builds its provider-specific request shape and parses the
//! response into raw audio bytes. None of them touch the cache; the size
//! threshold upstream is the only integrity gate on what they return.

pub mod easytts;
pub mod espeak;
pub mod ivona;
pub mod polly;

pub use easytts::EasyGatewayProvider;
pub use espeak::EspeakProvider;
pub use ivona::IvonaProvider;
pub use polly::PollyProvider;

use async_trait::async_trait;

use crate::domain::tts::{NormalizedVoice, SynthesisError, SynthesisRequest, VoiceCatalog};
use crate::infrastructure::config::{Config, ProviderCredentials};

/// A TTS backend.
#[async_trait]
pub trait TtsProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// The language/voice whitelist this backend accepts.
    fn catalog(&self) -> &'static VoiceCatalog;

    /// Extension of the audio files this backend produces.
    fn file_extension(&self) -> &'static str;

    /// Synthesize one utterance into raw audio bytes.
    async fn synthesize(
        &self,
        request: &SynthesisRequest,
        voice: &NormalizedVoice,
    ) -> Result<Vec<u8>, SynthesisError>;
}

/// Construct the adapter selected by `config`. Credentials were already
/// validated when the configuration was loaded.
pub async fn create_provider(config: &Config) -> Box<dyn TtsProvider> {
    match &config.credentials {
        ProviderCredentials::EasyGateway { key, username } => Box::new(EasyGatewayProvider::new(
            config.gateway_url.clone(),
            key.clone(),
            username.clone(),
        )),
        ProviderCredentials::Ivona {
            access_key,
            secret_key,
        } => Box::new(IvonaProvider::new(access_key.clone(), secret_key.clone())),
        ProviderCredentials::Polly => {
            let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
                .region(aws_config::Region::new(config.aws_region.clone()))
                .load()
                .await;
            Box::new(PollyProvider::new(aws_sdk_polly::Client::new(&aws_config)))
        }
        ProviderCredentials::Espeak => Box::new(EspeakProvider::new()),
    }
}
