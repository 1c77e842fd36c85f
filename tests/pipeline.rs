//! End-to-end pipeline scenarios against a stub backend: the full
//! normalize → cache-key → cache → dispatch path, without any network.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use tts_cache::domain::tts::{
    catalog_for, CacheStore, NormalizedVoice, ProviderKind, SynthesisError, SynthesisRequest,
    TtsService, VoiceCatalog, MIN_VALID_BYTES,
};
use tts_cache::infrastructure::providers::TtsProvider;

struct StubProvider {
    calls: Arc<AtomicUsize>,
    audio: Result<Vec<u8>, String>,
    kind: ProviderKind,
    extension: &'static str,
}

#[async_trait]
impl TtsProvider for StubProvider {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn catalog(&self) -> &'static VoiceCatalog {
        catalog_for(self.kind)
    }

    fn file_extension(&self) -> &'static str {
        self.extension
    }

    async fn synthesize(
        &self,
        _request: &SynthesisRequest,
        _voice: &NormalizedVoice,
    ) -> Result<Vec<u8>, SynthesisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.audio
            .clone()
            .map_err(SynthesisError::Provider)
    }
}

fn gateway_service(dir: &Path) -> (TtsService, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let provider = StubProvider {
        calls: calls.clone(),
        audio: Ok(vec![7u8; 4096]),
        kind: ProviderKind::EasyGateway,
        extension: "wav",
    };
    (
        TtsService::new(Box::new(provider), CacheStore::new(dir.to_path_buf())),
        calls,
    )
}

fn hallo_welt() -> SynthesisRequest {
    SynthesisRequest::new(
        "de".to_string(),
        Some("hans".to_string()),
        "Hallo Welt".to_string(),
    )
}

#[tokio::test]
async fn first_request_synthesizes_and_writes_the_artifact() {
    let dir = TempDir::new().unwrap();
    let (service, calls) = gateway_service(dir.path());

    let path = service.speak(&hallo_welt()).await.unwrap();

    // The requested "hans" is case-corrected and the language region-tagged.
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "9a677247aaf5a946cf76f9951a7e4bf6-de-DE-Hans.wav"
    );
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(std::fs::read(&path).unwrap().len(), 4096);
}

#[tokio::test]
async fn repeat_request_is_served_from_the_cache() {
    let dir = TempDir::new().unwrap();
    let (service, calls) = gateway_service(dir.path());

    let first = service.speak(&hallo_welt()).await.unwrap();

    // Age the artifact so the hit's mtime refresh is observable.
    let file = std::fs::OpenOptions::new()
        .append(true)
        .open(&first)
        .unwrap();
    file.set_modified(SystemTime::now() - Duration::from_secs(3600))
        .unwrap();
    let stale_mtime = std::fs::metadata(&first).unwrap().modified().unwrap();

    let second = service.speak(&hallo_welt()).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(calls.load(Ordering::SeqCst), 1, "no second synthesis");
    let fresh_mtime = std::fs::metadata(&second).unwrap().modified().unwrap();
    assert!(fresh_mtime > stale_mtime);
}

#[tokio::test]
async fn unknown_voice_is_silently_replaced_by_the_default() {
    let dir = TempDir::new().unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let provider = StubProvider {
        calls: calls.clone(),
        audio: Ok(vec![7u8; 4096]),
        kind: ProviderKind::Polly,
        extension: "mp3",
    };
    let service = TtsService::new(Box::new(provider), CacheStore::new(dir.path().to_path_buf()));

    let request = SynthesisRequest::new(
        "en-US".to_string(),
        Some("Bogus".to_string()),
        "Hello world".to_string(),
    );
    let path = service.speak(&request).await.unwrap();

    let name = path.file_name().unwrap().to_str().unwrap();
    assert!(name.ends_with("-en-US-Justin.mp3"), "got: {name}");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn distinct_voices_never_share_an_artifact() {
    let dir = TempDir::new().unwrap();
    let (service, _) = gateway_service(dir.path());

    let hans = service.speak(&hallo_welt()).await.unwrap();
    let marlene = service
        .speak(&SynthesisRequest::new(
            "de".to_string(),
            Some("Marlene".to_string()),
            "Hallo Welt".to_string(),
        ))
        .await
        .unwrap();

    assert_ne!(hans, marlene);
}

#[tokio::test]
async fn undersized_artifact_is_regenerated() {
    let dir = TempDir::new().unwrap();
    let (service, calls) = gateway_service(dir.path());

    let truncated = dir
        .path()
        .join("9a677247aaf5a946cf76f9951a7e4bf6-de-DE-Hans.wav");
    std::fs::write(&truncated, vec![0u8; MIN_VALID_BYTES as usize - 1]).unwrap();

    let path = service.speak(&hallo_welt()).await.unwrap();

    assert_eq!(path, truncated);
    assert_eq!(calls.load(Ordering::SeqCst), 1, "regeneration ran");
    assert_eq!(std::fs::metadata(&path).unwrap().len(), 4096);
}

#[tokio::test]
async fn backend_failure_surfaces_and_leaves_no_artifact() {
    let dir = TempDir::new().unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let provider = StubProvider {
        calls: calls.clone(),
        audio: Err("backend unavailable".to_string()),
        kind: ProviderKind::EasyGateway,
        extension: "wav",
    };
    let service = TtsService::new(Box::new(provider), CacheStore::new(dir.path().to_path_buf()));

    let result = service.speak(&hallo_welt()).await;

    assert!(result.is_err());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
