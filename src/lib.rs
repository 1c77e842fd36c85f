//! Cached text-to-speech: resolves an utterance to a playable audio file,
//! synthesizing through one of several interchangeable backends only when no
//! valid cached artifact exists.

pub mod domain;
pub mod error;
pub mod infrastructure;
