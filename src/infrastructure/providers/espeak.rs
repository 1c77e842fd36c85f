//! Local synthesis: espeak piped into lame.
//!
//! espeak writes WAV to stdout, lame encodes it to MP3 on the fly. Both are
//! spawned with argument vectors, so the utterance never passes through a
//! shell.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::debug;

use super::TtsProvider;
use crate::domain::tts::{
    catalog_for, NormalizedVoice, ProviderKind, SynthesisError, SynthesisRequest, VoiceCatalog,
};

// espeak gain/speed/pitch used by the speaker scripts this replaces.
const SPEED_WPM: u32 = 175;
const PITCH: u32 = 50;
const AMPLITUDE: u32 = 100;

pub struct EspeakProvider;

impl EspeakProvider {
    pub fn new() -> Self {
        Self
    }

    fn espeak_args(language: &str, text: &str) -> Vec<String> {
        vec![
            "-s".to_string(),
            SPEED_WPM.to_string(),
            "-p".to_string(),
            PITCH.to_string(),
            "-a".to_string(),
            AMPLITUDE.to_string(),
            "-v".to_string(),
            language.to_string(),
            "--stdout".to_string(),
            text.to_string(),
        ]
    }

    fn lame_args() -> [&'static str; 7] {
        // Read WAV from stdin, write MP3 to stdout.
        ["--preset", "voice", "-q", "9", "--vbr-new", "-", "-"]
    }
}

impl Default for EspeakProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TtsProvider for EspeakProvider {
    fn name(&self) -> &'static str {
        "espeak"
    }

    fn catalog(&self) -> &'static VoiceCatalog {
        catalog_for(ProviderKind::Espeak)
    }

    fn file_extension(&self) -> &'static str {
        "mp3"
    }

    async fn synthesize(
        &self,
        request: &SynthesisRequest,
        voice: &NormalizedVoice,
    ) -> Result<Vec<u8>, SynthesisError> {
        debug!(
            provider = "espeak",
            language = voice.language,
            text_length = request.text.len(),
            "spawning espeak | lame pipeline"
        );

        let mut espeak = Command::new("espeak")
            .args(Self::espeak_args(voice.language, &request.text))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| SynthesisError::Provider(format!("failed to spawn espeak: {e}")))?;

        let espeak_stdout = espeak
            .stdout
            .take()
            .ok_or_else(|| SynthesisError::Provider("espeak stdout unavailable".to_string()))?;
        let lame_stdin: Stdio = espeak_stdout
            .try_into()
            .map_err(|_| SynthesisError::Provider("failed to wire espeak into lame".to_string()))?;

        let lame = Command::new("lame")
            .args(Self::lame_args())
            .stdin(lame_stdin)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| SynthesisError::Provider(format!("failed to spawn lame: {e}")))?;

        // Drain the encoder first; it in turn drains espeak, so waiting in
        // this order cannot deadlock on a full pipe.
        let output = lame
            .wait_with_output()
            .await
            .map_err(|e| SynthesisError::Provider(format!("lame did not run: {e}")))?;

        let mut espeak_stderr = espeak.stderr.take();
        let espeak_status = espeak
            .wait()
            .await
            .map_err(|e| SynthesisError::Provider(format!("espeak did not run: {e}")))?;

        if !espeak_status.success() {
            let mut detail = Vec::new();
            if let Some(mut pipe) = espeak_stderr.take() {
                let _ = pipe.read_to_end(&mut detail).await;
            }
            return Err(SynthesisError::Provider(format!(
                "espeak exited with {espeak_status}: {}",
                String::from_utf8_lossy(&detail).trim()
            )));
        }
        if !output.status.success() {
            return Err(SynthesisError::Provider(format!(
                "lame exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        if output.stdout.is_empty() {
            return Err(SynthesisError::Provider(
                "encoder produced no audio".to_string(),
            ));
        }

        Ok(output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn espeak_args_are_a_fixed_vector() {
        let args = EspeakProvider::espeak_args("de", "Hallo Welt");
        assert_eq!(
            args,
            vec!["-s", "175", "-p", "50", "-a", "100", "-v", "de", "--stdout", "Hallo Welt"]
        );
    }

    #[test]
    fn utterance_is_one_argument_even_with_shell_metacharacters() {
        let text = "Hallo; rm -rf / && echo $(pwd) `id`";
        let args = EspeakProvider::espeak_args("en", text);
        assert_eq!(args.last().map(String::as_str), Some(text));
    }

    #[test]
    fn lame_reads_stdin_and_writes_stdout() {
        let args = EspeakProvider::lame_args();
        assert_eq!(&args[args.len() - 2..], &["-", "-"]);
    }
}
