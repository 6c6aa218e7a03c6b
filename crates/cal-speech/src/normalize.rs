//! Chat text to speakable text.
//!
//! The stages run in a fixed order and each feeds the next:
//!
//! 1. fold half-width kana to full width
//! 2. remove the speak-request marker, trim
//! 3. remove a leading `en` language prefix
//! 4. remove `http(s)://` URLs
//! 5. per line, read a trailing run of `w`/`W` as `ワラ`, then join lines
//! 6. re-mark custom emoji `<:name:id>` as `<>name<id>`
//! 7. delete every `<...>` span
//! 8. cut to [`MAX_SPEECH_CHARS`]
//!
//! Stages 6 and 7 are deliberately lossy: any literal `<...>` span the user
//! typed is deleted too, and an unterminated `<:` keeps rewriting the next
//! colons it finds.

use crate::kana::fold_half_width;
use cal_types::Language;
use regex::Regex;
use serde::Serialize;
use std::borrow::Cow;
use std::sync::LazyLock;

/// Hard character limit of the TTS backend.
pub const MAX_SPEECH_CHARS: usize = 200;

/// Marker a member puts in a message to have it read aloud.
pub const DEFAULT_SPEAK_MARKER: &str = "/speak";

const ENGLISH_PREFIX: &str = "en";
const LAUGH_WORD: &str = "ワラ";

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("static URL pattern must compile"));

static BRACKET_SPAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^<>]*>").expect("static bracket pattern must compile"));

/// Normalized text paired with the voice chosen for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Utterance {
    pub text: String,
    pub language: Language,
}

/// Prepares chat messages for text-to-speech.
#[derive(Debug, Clone)]
pub struct SpeechNormalizer {
    marker: String,
}

impl Default for SpeechNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_SPEAK_MARKER)
    }
}

impl SpeechNormalizer {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    /// Whether the message explicitly asks to be read aloud.
    pub fn is_speak_request(&self, raw: &str) -> bool {
        !self.marker.is_empty() && raw.contains(&self.marker)
    }

    /// Picks the voice for a raw message: English when the text, once the
    /// marker is removed, starts with `en`; Japanese otherwise.
    pub fn language(&self, raw: &str) -> Language {
        if self.strip_marker(raw).starts_with(ENGLISH_PREFIX) {
            Language::English
        } else {
            Language::Japanese
        }
    }

    /// Runs the full pipeline. An empty result means "say nothing".
    pub fn normalize(&self, raw: &str) -> String {
        let text = fold_half_width(raw);
        let text = self.strip_marker(&text);
        let text = text
            .strip_prefix(ENGLISH_PREFIX)
            .map(str::trim_start)
            .unwrap_or(&text);
        let text = URL_RE.replace_all(text, "");
        let text = collapse_laughter(&text);
        let text = mark_custom_emoji(&text);
        let text = BRACKET_SPAN_RE.replace_all(&text, "");
        text.chars().take(MAX_SPEECH_CHARS).collect()
    }

    /// Language plus normalized text, or `None` when nothing is left to say.
    pub fn prepare(&self, raw: &str) -> Option<Utterance> {
        let language = self.language(raw);
        let text = self.normalize(raw);
        if text.trim().is_empty() {
            return None;
        }
        Some(Utterance { text, language })
    }

    fn strip_marker<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.marker.is_empty() || !text.contains(&self.marker) {
            return Cow::Borrowed(text.trim());
        }
        Cow::Owned(text.replacen(&self.marker, "", 1).trim().to_string())
    }
}

/// Normalizes with the default speak marker.
pub fn normalize(raw: &str) -> String {
    SpeechNormalizer::default().normalize(raw)
}

/// Replaces the maximal trailing `w`/`W` run of every line with `ワラ` and
/// joins the lines without separators.
fn collapse_laughter(text: &str) -> String {
    text.lines()
        .map(|line| {
            let kept = line.trim_end_matches(|c: char| c == 'w' || c == 'W');
            if kept.len() == line.len() {
                line.to_string()
            } else {
                format!("{kept}{LAUGH_WORD}")
            }
        })
        .collect()
}

/// Turns the two colons of a `<:name:id>` emoji into `>` and `<`, leaving
/// `<>name<id>` for the bracket-span stage to reduce to `name`.
///
/// The toggle starts at a `<:` pair and consumes the next two colons
/// wherever they are; it is never reset.
fn mark_custom_emoji(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending = 0u8;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if pending == 0 && c == '<' && chars.peek() == Some(&':') {
            pending = 2;
            out.push(c);
            continue;
        }
        if pending > 0 && c == ':' {
            out.push(if pending == 2 { '>' } else { '<' });
            pending -= 1;
            continue;
        }
        out.push(c);
    }

    out
}
