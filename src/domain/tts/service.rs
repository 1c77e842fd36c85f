//! The synthesis pipeline: normalize, address, check the cache, dispatch.

use std::path::PathBuf;
use std::time::Instant;

use tracing::info;

use super::cache::CacheStore;
use super::cache_key;
use super::SynthesisRequest;
use crate::error::AppResult;
use crate::infrastructure::providers::TtsProvider;

pub struct TtsService {
    provider: Box<dyn TtsProvider>,
    cache: CacheStore,
}

impl TtsService {
    pub fn new(provider: Box<dyn TtsProvider>, cache: CacheStore) -> Self {
        Self { provider, cache }
    }

    /// Resolve `request` to a playable audio file, synthesizing only when no
    /// valid cached artifact exists.
    pub async fn speak(&self, request: &SynthesisRequest) -> AppResult<PathBuf> {
        let started = Instant::now();

        let voice = self
            .provider
            .catalog()
            .normalize(&request.language, request.voice.as_deref());
        let key = cache_key::derive_key(&request.text, &voice);
        let path = cache_key::key_to_path(self.cache.root(), &key, self.provider.file_extension());

        info!(
            provider = self.provider.name(),
            language = voice.language,
            voice = voice.voice.unwrap_or("-"),
            text_length = request.text.len(),
            path = %path.display(),
            "TTS request"
        );

        let path = self
            .cache
            .lookup_or_synthesize(&path, || self.provider.synthesize(request, &voice))
            .await?;

        info!(
            provider = self.provider.name(),
            latency_ms = started.elapsed().as_millis() as u64,
            path = %path.display(),
            "TTS request resolved"
        );
        Ok(path)
    }
}
