/// Failures a backend can surface while synthesizing one utterance.
#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    /// Network or HTTP layer failure before a usable response arrived.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend rejected our credentials or signature.
    #[error("authentication rejected: {0}")]
    Auth(String),

    /// Non-2xx response, malformed response body, or a failed engine process.
    #[error("provider error: {0}")]
    Provider(String),
}
