use cal_speech::{normalize, SpeechNormalizer, MAX_SPEECH_CHARS};
use cal_types::Language;

#[test]
fn trailing_laughter() {
    assert_eq!(normalize("こんにちはwww"), "こんにちはワラ");
}

#[test]
fn url_removed_and_laughter_collapsed() {
    assert_eq!(normalize("見てhttps://example.com/x すごいwww"), "見て すごいワラ");
}

#[test]
fn english_prefix_stripped() {
    assert_eq!(normalize("en hello world"), "hello world");
}

#[test]
fn empty_input() {
    assert_eq!(normalize(""), "");
}

#[test]
fn long_input_truncated() {
    let raw = "あ".repeat(300);
    let out = normalize(&raw);
    assert_eq!(out.chars().count(), MAX_SPEECH_CHARS);
}

#[test]
fn truncation_counts_characters_after_cleanup() {
    let raw = format!("https://example.com {}", "x".repeat(250));
    let out = normalize(&raw);
    assert_eq!(out.chars().count(), MAX_SPEECH_CHARS);
    assert!(out.starts_with(' '));
}

#[test]
fn whole_line_of_laughter() {
    assert_eq!(normalize("www"), "ワラ");
    assert_eq!(normalize("WwW"), "ワラ");
}

#[test]
fn interior_laughter_untouched() {
    assert_eq!(normalize("wwwすごい"), "wwwすごい");
}

#[test]
fn lines_joined_without_breaks() {
    assert_eq!(normalize("おはようw\nこんにちは\nwww"), "おはようワラこんにちはワラ");
}

#[test]
fn custom_emoji_read_by_name() {
    assert_eq!(normalize("やった<:pog:123456789>"), "やったpog");
    assert_eq!(normalize("<a:dance:42>おどる"), "おどる");
}

#[test]
fn literal_angle_spans_are_dropped() {
    assert_eq!(normalize("a <b> c"), "a  c");
    assert_eq!(normalize("1 < 2 and 3 > 2"), "1  2");
    assert_eq!(normalize("<a<b>c>"), "<ac>");
}

#[test]
fn half_width_kana_folded() {
    assert_eq!(normalize("ｶﾞｯｺｳ"), "ガッコウ");
}

#[test]
fn marker_removed() {
    let normalizer = SpeechNormalizer::new("/speak");
    assert_eq!(normalizer.normalize("/speak やばいwww"), "やばいワラ");
    assert!(normalizer.is_speak_request("/speak やばい"));
    assert!(!normalizer.is_speak_request("やばい"));
}

#[test]
fn marker_then_english_prefix() {
    let normalizer = SpeechNormalizer::new("/speak");
    let utterance = normalizer.prepare("/speak en good morning").unwrap();
    assert_eq!(utterance.text, "good morning");
    assert_eq!(utterance.language, Language::English);
}

#[test]
fn idempotent_on_clean_text() {
    for s in ["こんにちは", "hello world", "今日はいい天気ですね。", "a b c", "ガッコウ"] {
        let once = normalize(s);
        assert_eq!(normalize(&once), once, "{s}");
    }
}
