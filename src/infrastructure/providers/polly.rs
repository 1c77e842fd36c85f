//! AWS Polly adapter, using the official SDK.

use async_trait::async_trait;
use aws_sdk_polly::types::{Engine, LanguageCode, OutputFormat, VoiceId};
use aws_sdk_polly::Client as PollyClient;
use tracing::{error, info};

use super::TtsProvider;
use crate::domain::tts::{
    catalog_for, NormalizedVoice, ProviderKind, SynthesisError, SynthesisRequest, VoiceCatalog,
};

pub struct PollyProvider {
    client: PollyClient,
}

impl PollyProvider {
    pub fn new(client: PollyClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TtsProvider for PollyProvider {
    fn name(&self) -> &'static str {
        "polly"
    }

    fn catalog(&self) -> &'static VoiceCatalog {
        catalog_for(ProviderKind::Polly)
    }

    fn file_extension(&self) -> &'static str {
        "mp3"
    }

    async fn synthesize(
        &self,
        request: &SynthesisRequest,
        voice: &NormalizedVoice,
    ) -> Result<Vec<u8>, SynthesisError> {
        let voice_name = voice.voice.unwrap_or("Vicki");

        info!(
            provider = "polly",
            language = voice.language,
            voice = voice_name,
            text_length = request.text.len(),
            "calling Polly synthesize_speech"
        );

        let result = self
            .client
            .synthesize_speech()
            .text(&request.text)
            .voice_id(VoiceId::from(voice_name))
            .language_code(LanguageCode::from(voice.language))
            .output_format(OutputFormat::Mp3)
            .engine(Engine::Neural)
            .send()
            .await
            .map_err(|e| {
                error!(
                    error = ?e,
                    language = voice.language,
                    voice = voice_name,
                    "Polly synthesize_speech failed"
                );
                SynthesisError::Provider(format!("AWS Polly error: {e}"))
            })?;

        let audio_stream = result.audio_stream.collect().await.map_err(|e| {
            error!(error = %e, "failed to collect audio stream from Polly response");
            SynthesisError::Provider(format!("failed to read audio stream: {e}"))
        })?;

        Ok(audio_stream.into_bytes().to_vec())
    }
}
