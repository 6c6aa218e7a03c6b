//! Half-width to full-width katakana folding.
//!
//! Covers the halfwidth katakana block (U+FF61..=U+FF9F). A following
//! half-width voiced mark (`ﾞ`) or semi-voiced mark (`ﾟ`) is merged into
//! the preceding kana when a composed form exists (`ｶﾞ` → `ガ`,
//! `ﾊﾟ` → `パ`); otherwise the mark is folded on its own.

const HALF_WIDTH_START: u32 = 0xFF61;

/// Full-width forms of U+FF61..=U+FF9F, in code point order.
const FULL_WIDTH: &str = "。「」、・ヲァィゥェォャュョッーアイウエオカキクケコサシスセソタチツテトナニヌネノハヒフヘホマミムメモヤユヨラリルレロワン゛゜";

const VOICED_MARK: char = '\u{FF9E}';
const SEMI_VOICED_MARK: char = '\u{FF9F}';

fn widen(c: char) -> Option<char> {
    let offset = (c as u32).checked_sub(HALF_WIDTH_START)?;
    FULL_WIDTH.chars().nth(offset as usize)
}

fn voiced(base: char) -> Option<char> {
    match base {
        'ウ' => Some('ヴ'),
        'ワ' => Some('ヷ'),
        'ヲ' => Some('ヺ'),
        'カ' | 'キ' | 'ク' | 'ケ' | 'コ' | 'サ' | 'シ' | 'ス' | 'セ' | 'ソ' | 'タ' | 'チ' | 'ツ'
        | 'テ' | 'ト' | 'ハ' | 'ヒ' | 'フ' | 'ヘ' | 'ホ' => char::from_u32(base as u32 + 1),
        _ => None,
    }
}

fn semi_voiced(base: char) -> Option<char> {
    match base {
        'ハ' | 'ヒ' | 'フ' | 'ヘ' | 'ホ' => char::from_u32(base as u32 + 2),
        _ => None,
    }
}

/// Folds half-width katakana in `text` to full width. Other characters pass
/// through untouched.
pub fn fold_half_width(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        let Some(wide) = widen(c) else {
            out.push(c);
            continue;
        };

        let composed = match chars.peek() {
            Some(&VOICED_MARK) => voiced(wide),
            Some(&SEMI_VOICED_MARK) => semi_voiced(wide),
            _ => None,
        };

        match composed {
            Some(composed) => {
                chars.next();
                out.push(composed);
            }
            None => out.push(wide),
        }
    }

    out
}
