//! Request URLs for the external TTS backend.

use crate::error::SpeechError;
use crate::normalize::MAX_SPEECH_CHARS;
use cal_types::Language;
use url::Url;

/// Endpoint used when the configuration does not name one.
pub const DEFAULT_TTS_ENDPOINT: &str = "https://translate.google.com/translate_tts";

/// Builds the GET URL that returns synthesized audio for `text`.
///
/// `text` should already be normalized; empty or over-long text is refused
/// rather than silently truncated again.
pub fn tts_url(endpoint: &str, text: &str, language: Language) -> Result<Url, SpeechError> {
    if text.trim().is_empty() {
        return Err(SpeechError::Empty);
    }
    let len = text.chars().count();
    if len > MAX_SPEECH_CHARS {
        return Err(SpeechError::TooLong {
            len,
            limit: MAX_SPEECH_CHARS,
        });
    }

    let url = Url::parse_with_params(
        endpoint,
        &[
            ("ie", "UTF-8"),
            ("q", text),
            ("tl", language.tag()),
            ("client", "tw-ob"),
        ],
    )?;
    Ok(url)
}
