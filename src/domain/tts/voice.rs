//! Language and voice normalization for each backend.
//!
//! Every backend declares which languages it accepts and which voices exist
//! per language. Requests never fail validation: an unknown language falls
//! back to the provider default locale, an unknown voice to the language's
//! default voice. Synthesis must always be able to proceed when the backend
//! is reachable; voice correctness is advisory.

use super::ProviderKind;

/// The canonical (language, voice) pair a request resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedVoice {
    pub language: &'static str,
    /// `None` for backends without a voice concept.
    pub voice: Option<&'static str>,
}

/// Voices available for one canonical language. The first entry is the
/// default for that language.
struct LanguageEntry {
    language: &'static str,
    voices: &'static [&'static str],
}

/// Per-provider whitelist of languages and voices. The first language entry
/// is the provider default locale.
pub struct VoiceCatalog {
    /// Requested tag -> canonical tag, consulted after separator and case
    /// folding.
    aliases: &'static [(&'static str, &'static str)],
    entries: &'static [LanguageEntry],
    /// Whether this backend addresses voices at all.
    voiced: bool,
}

impl VoiceCatalog {
    /// Resolve a requested (language, voice) pair to a canonical one.
    ///
    /// Total over its input domain: any input resolves to a defined
    /// canonical pair, never an error.
    pub fn normalize(&self, language: &str, voice: Option<&str>) -> NormalizedVoice {
        let entry = self.entry_for(language);
        if !self.voiced {
            return NormalizedVoice {
                language: entry.language,
                voice: None,
            };
        }
        let resolved = voice
            .map(str::trim)
            .filter(|requested| !requested.is_empty())
            .and_then(|requested| {
                entry
                    .voices
                    .iter()
                    .find(|known| known.eq_ignore_ascii_case(requested))
            })
            .or_else(|| entry.voices.first())
            .copied();
        NormalizedVoice {
            language: entry.language,
            voice: resolved,
        }
    }

    fn entry_for(&self, requested: &str) -> &'static LanguageEntry {
        // Underscore-separated region tags are equivalent to hyphenated ones.
        let folded = requested.trim().replace('_', "-");
        let canonical = self
            .aliases
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(&folded))
            .map(|(_, canonical)| *canonical);
        if let Some(name) = canonical {
            if let Some(entry) = self.lookup(name) {
                return entry;
            }
        }
        if let Some(entry) = self.lookup(&folded) {
            return entry;
        }
        &self.entries[0]
    }

    fn lookup(&self, name: &str) -> Option<&'static LanguageEntry> {
        self.entries
            .iter()
            .find(|entry| entry.language.eq_ignore_ascii_case(name))
    }
}

/// The MARY installation behind the gateway is German-only; every request
/// resolves to de-DE.
static EASY_GATEWAY: VoiceCatalog = VoiceCatalog {
    aliases: &[],
    entries: &[LanguageEntry {
        language: "de-DE",
        voices: &["Marlene", "Hans"],
    }],
    voiced: true,
};

static IVONA: VoiceCatalog = VoiceCatalog {
    aliases: &[("de", "de-DE"), ("en", "en-US"), ("fr", "fr-FR")],
    entries: &[
        LanguageEntry {
            language: "de-DE",
            voices: &["Marlene", "Hans"],
        },
        LanguageEntry {
            language: "en-US",
            voices: &["Salli", "Joey", "Justin", "Kimberly"],
        },
        LanguageEntry {
            language: "en-GB",
            voices: &["Amy", "Brian", "Emma"],
        },
        LanguageEntry {
            language: "fr-FR",
            voices: &["Celine", "Mathieu"],
        },
    ],
    voiced: true,
};

static POLLY: VoiceCatalog = VoiceCatalog {
    aliases: &[("de", "de-DE"), ("en", "en-US"), ("fr", "fr-FR")],
    entries: &[
        LanguageEntry {
            language: "de-DE",
            voices: &["Vicki", "Marlene", "Hans"],
        },
        LanguageEntry {
            language: "en-US",
            voices: &[
                "Justin", "Salli", "Joey", "Kimberly", "Kendra", "Ivy", "Matthew", "Joanna",
            ],
        },
        LanguageEntry {
            language: "en-GB",
            voices: &["Amy", "Brian", "Emma"],
        },
        LanguageEntry {
            language: "fr-FR",
            voices: &["Celine", "Mathieu", "Lea"],
        },
    ],
    voiced: true,
};

/// espeak takes bare language codes and has no per-language voice set.
static ESPEAK: VoiceCatalog = VoiceCatalog {
    aliases: &[
        ("de-DE", "de"),
        ("en-US", "en"),
        ("en-GB", "en"),
        ("fr-FR", "fr"),
        ("es-ES", "es"),
    ],
    entries: &[
        LanguageEntry {
            language: "de",
            voices: &[],
        },
        LanguageEntry {
            language: "en",
            voices: &[],
        },
        LanguageEntry {
            language: "fr",
            voices: &[],
        },
        LanguageEntry {
            language: "es",
            voices: &[],
        },
    ],
    voiced: false,
};

pub fn catalog_for(kind: ProviderKind) -> &'static VoiceCatalog {
    match kind {
        ProviderKind::EasyGateway => &EASY_GATEWAY,
        ProviderKind::Ivona => &IVONA,
        ProviderKind::Polly => &POLLY,
        ProviderKind::Espeak => &ESPEAK,
    }
}
