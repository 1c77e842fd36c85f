//! Adapter for the Ivona CreateSpeech API.
//!
//! Requests are JSON-bodied POSTs signed per the SigV4-style scheme; see
//! `infrastructure::signing`.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::StatusCode;
use serde::Serialize;
use tracing::debug;

use super::TtsProvider;
use crate::domain::tts::{
    catalog_for, NormalizedVoice, ProviderKind, SynthesisError, SynthesisRequest, VoiceCatalog,
};
use crate::infrastructure::signing::{sign_request, SignRequestParams};

pub const IVONA_HOST: &str = "tts.eu-west-1.ivonacloud.com";
pub const IVONA_REGION: &str = "eu-west-1";
pub const IVONA_SERVICE: &str = "tts";

const CREATE_SPEECH_PATH: &str = "/CreateSpeech";

/// Request body for the CreateSpeech endpoint, PascalCase per the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct CreateSpeechRequest<'a> {
    input: Input<'a>,
    parameters: Parameters<'a>,
    voice: Voice<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct Input<'a> {
    data: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct Parameters<'a> {
    rate: &'a str,
    volume: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct Voice<'a> {
    name: &'a str,
    language: &'a str,
}

pub struct IvonaProvider {
    client: reqwest::Client,
    access_key: String,
    secret_key: String,
}

impl IvonaProvider {
    pub fn new(access_key: String, secret_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            access_key,
            secret_key,
        }
    }

    fn build_payload(
        request: &SynthesisRequest,
        voice: &NormalizedVoice,
    ) -> Result<Vec<u8>, SynthesisError> {
        serde_json::to_vec(&CreateSpeechRequest {
            input: Input {
                data: &request.text,
            },
            parameters: Parameters {
                rate: &request.rate,
                volume: &request.volume,
            },
            voice: Voice {
                name: voice.voice.unwrap_or("Marlene"),
                language: voice.language,
            },
        })
        .map_err(|e| SynthesisError::Provider(format!("failed to encode request body: {e}")))
    }
}

#[async_trait]
impl TtsProvider for IvonaProvider {
    fn name(&self) -> &'static str {
        "ivona"
    }

    fn catalog(&self) -> &'static VoiceCatalog {
        catalog_for(ProviderKind::Ivona)
    }

    fn file_extension(&self) -> &'static str {
        "mp3"
    }

    async fn synthesize(
        &self,
        request: &SynthesisRequest,
        voice: &NormalizedVoice,
    ) -> Result<Vec<u8>, SynthesisError> {
        let payload = Self::build_payload(request, voice)?;

        let headers = vec![
            ("content-type".to_string(), "application/json".to_string()),
            ("host".to_string(), IVONA_HOST.to_string()),
        ];
        let signed = sign_request(&SignRequestParams {
            method: "POST",
            path: CREATE_SPEECH_PATH,
            query: "",
            headers: &headers,
            payload: &payload,
            access_key: &self.access_key,
            secret_key: &self.secret_key,
            region: IVONA_REGION,
            service: IVONA_SERVICE,
            timestamp: Utc::now(),
        });

        debug!(
            provider = "ivona",
            language = voice.language,
            voice = voice.voice.unwrap_or("-"),
            payload_bytes = payload.len(),
            "requesting signed synthesis"
        );

        let url = format!("https://{IVONA_HOST}{CREATE_SPEECH_PATH}");
        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("X-Amz-Date", &signed.amz_date)
            .header("X-Amz-Content-Sha256", &signed.content_sha256)
            .header("Authorization", &signed.authorization)
            .body(payload)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(SynthesisError::Auth(format!(
                "signature rejected ({status}): {}",
                body.trim()
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SynthesisError::Provider(format!(
                "CreateSpeech returned {status}: {}",
                body.trim()
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn payload_matches_the_wire_format() {
        let request = SynthesisRequest::new(
            "de".to_string(),
            Some("marlene".to_string()),
            "Hallo Welt".to_string(),
        );
        let voice = NormalizedVoice {
            language: "de-DE",
            voice: Some("Marlene"),
        };
        let payload = IvonaProvider::build_payload(&request, &voice).unwrap();
        assert_eq!(
            String::from_utf8(payload).unwrap(),
            r#"{"Input":{"Data":"Hallo Welt"},"Parameters":{"Rate":"default","Volume":"default"},"Voice":{"Name":"Marlene","Language":"de-DE"}}"#
        );
    }

    #[test]
    fn unicode_text_survives_json_encoding() {
        let request = SynthesisRequest::new(
            "de".to_string(),
            None,
            "Grüße, Welt".to_string(),
        );
        let voice = NormalizedVoice {
            language: "de-DE",
            voice: Some("Hans"),
        };
        let payload = IvonaProvider::build_payload(&request, &voice).unwrap();
        let text = String::from_utf8(payload).unwrap();
        assert!(text.contains("Grüße, Welt"));
        assert!(text.contains(r#""Name":"Hans""#));
    }
}
