//! Adapter for the meine-homematic.de TTS gateway (MARY engine behind it).

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use super::TtsProvider;
use crate::domain::tts::{
    catalog_for, NormalizedVoice, ProviderKind, SynthesisError, SynthesisRequest, VoiceCatalog,
};

/// Default gateway endpoint.
pub const GATEWAY_URL: &str = "https://www.meine-homematic.de/tts.php";

pub struct EasyGatewayProvider {
    client: reqwest::Client,
    endpoint: String,
    key: String,
    username: String,
}

impl EasyGatewayProvider {
    pub fn new(endpoint: String, key: String, username: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            key,
            username,
        }
    }

    /// MARY voice installed behind the gateway for each canonical voice.
    fn engine_voice(voice: &NormalizedVoice) -> &'static str {
        match voice.voice {
            Some("Hans") => "bits3-hsmm",
            _ => "bits1-hsmm",
        }
    }

    /// The gateway wants the bare MARY locale, not the region-tagged form.
    fn engine_locale(language: &str) -> &str {
        language.split('-').next().unwrap_or(language)
    }

    // The gateway takes all parameters, text included, as a percent-encoded
    // query string; there is no request body.
    fn build_url(&self, text: &str, voice: &NormalizedVoice) -> String {
        format!(
            "{}?id={}&username={}&engine=mary&locale={}&voice={}&text={}",
            self.endpoint,
            urlencoding::encode(&self.key),
            urlencoding::encode(&self.username),
            Self::engine_locale(voice.language),
            Self::engine_voice(voice),
            urlencoding::encode(text),
        )
    }
}

#[async_trait]
impl TtsProvider for EasyGatewayProvider {
    fn name(&self) -> &'static str {
        "easytts"
    }

    fn catalog(&self) -> &'static VoiceCatalog {
        catalog_for(ProviderKind::EasyGateway)
    }

    fn file_extension(&self) -> &'static str {
        "wav"
    }

    async fn synthesize(
        &self,
        request: &SynthesisRequest,
        voice: &NormalizedVoice,
    ) -> Result<Vec<u8>, SynthesisError> {
        let url = self.build_url(&request.text, voice);
        debug!(
            provider = "easytts",
            locale = Self::engine_locale(voice.language),
            voice = Self::engine_voice(voice),
            text_length = request.text.len(),
            "requesting gateway synthesis"
        );

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(SynthesisError::Auth(format!(
                "gateway rejected credentials ({status})"
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SynthesisError::Provider(format!(
                "gateway returned {status}: {}",
                body.trim()
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }
}
