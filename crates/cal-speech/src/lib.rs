//! Text-to-speech preparation for the Cal bot.
//!
//! Turns an arbitrary chat message into short, speakable text for an
//! external TTS backend: half-width kana are folded to full width, the
//! speak-request marker, URLs and custom emoji markup are removed, trailing
//! `w` laughter is read as `ワラ`, and the result is cut to the backend's
//! 200 character limit. The language is chosen from the raw message before
//! normalization.
//!
//! The backend itself is not part of this crate; [`tts_url`] only builds
//! the request URL the caller hands to it.

pub mod error;
pub mod kana;
pub mod normalize;
pub mod tts;

pub use error::SpeechError;
pub use normalize::{normalize, SpeechNormalizer, Utterance, DEFAULT_SPEAK_MARKER, MAX_SPEECH_CHARS};
pub use tts::{tts_url, DEFAULT_TTS_ENDPOINT};
