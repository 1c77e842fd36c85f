//! Content-addressed cache keys.

use std::path::{Path, PathBuf};

use md5::{Digest, Md5};

use super::voice::NormalizedVoice;

/// Derive the cache filename stem for a normalized request.
///
/// The digest covers the exact text bytes plus canonical language and voice,
/// NUL-separated so field boundaries stay unambiguous. Language and voice
/// are appended in clear to keep the cache directory readable.
pub fn derive_key(text: &str, voice: &NormalizedVoice) -> String {
    let mut hasher = Md5::new();
    hasher.update(text.as_bytes());
    hasher.update([0u8]);
    hasher.update(voice.language.as_bytes());
    if let Some(name) = voice.voice {
        hasher.update([0u8]);
        hasher.update(name.as_bytes());
    }
    let digest = hex::encode(hasher.finalize());
    match voice.voice {
        Some(name) => format!("{digest}-{}-{name}", voice.language),
        None => format!("{digest}-{}", voice.language),
    }
}

pub fn key_to_path(root: &Path, key: &str, extension: &str) -> PathBuf {
    root.join(format!("{key}.{extension}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const HANS: NormalizedVoice = NormalizedVoice {
        language: "de-DE",
        voice: Some("Hans"),
    };

    #[test]
    fn key_matches_reference_value() {
        assert_eq!(
            derive_key("Hallo Welt", &HANS),
            "9a677247aaf5a946cf76f9951a7e4bf6-de-DE-Hans"
        );
    }

    #[test]
    fn key_without_voice_omits_the_component() {
        let voice = NormalizedVoice {
            language: "de",
            voice: None,
        };
        assert_eq!(
            derive_key("Hallo Welt", &voice),
            "272c8cd9a8b6dcf4ece2e89025046813-de"
        );
    }

    #[test]
    fn identical_triples_yield_identical_keys() {
        assert_eq!(derive_key("Hallo Welt", &HANS), derive_key("Hallo Welt", &HANS));
    }

    #[test]
    fn any_field_change_changes_the_key() {
        let base = derive_key("Hallo Welt", &HANS);
        assert_ne!(base, derive_key("Hallo Welt!", &HANS));
        assert_ne!(
            base,
            derive_key(
                "Hallo Welt",
                &NormalizedVoice {
                    language: "en-US",
                    voice: Some("Hans"),
                }
            )
        );
        assert_ne!(
            base,
            derive_key(
                "Hallo Welt",
                &NormalizedVoice {
                    language: "de-DE",
                    voice: Some("Marlene"),
                }
            )
        );
    }

    #[test]
    fn unicode_text_is_hashed_by_its_utf8_bytes() {
        let a = derive_key("Grüße aus Köln", &HANS);
        let b = derive_key("Grusse aus Koln", &HANS);
        assert_ne!(a, b);
        // Stem layout stays fixed-width hash, then the clear components.
        assert_eq!(a.len(), 32 + "-de-DE-Hans".len());
    }

    #[test]
    fn key_to_path_appends_extension_under_root() {
        let path = key_to_path(Path::new("/var/cache/tts"), "abc-de-DE-Hans", "wav");
        assert_eq!(path, Path::new("/var/cache/tts/abc-de-DE-Hans.wav"));
    }
}
