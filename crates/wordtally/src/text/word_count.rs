use std::ops::RangeInclusive;

/// CJK Unified Ideographs (U+4E00-U+9FFF).
///
/// Covers common Chinese characters and Japanese Kanji. Hiragana, Katakana and
/// Hangul fall outside the block and are counted as ordinary whitespace-delimited
/// text.
pub const CJK_UNIFIED_IDEOGRAPHS: RangeInclusive<u32> = 0x4E00..=0x9FFF;

#[inline]
pub fn is_cjk_char(c: char) -> bool {
    CJK_UNIFIED_IDEOGRAPHS.contains(&(c as u32))
}

/// Counts words using the mixed CJK/Latin rule.
///
/// Every CJK ideograph counts as one word. Ideographs are then cut out of the
/// text (each replaced by a space) and every maximal run of non-whitespace
/// characters in what remains counts as one more word, so `"你好hello"` is 3.
pub fn count_words(text: &str) -> u64 {
    if text.is_empty() {
        return 0;
    }

    let mut cjk = 0u64;
    let mut tokens = 0u64;
    let mut in_token = false;

    for c in text.chars() {
        if is_cjk_char(c) {
            cjk += 1;
            in_token = false;
        } else if c.is_whitespace() {
            in_token = false;
        } else if !in_token {
            tokens += 1;
            in_token = true;
        }
    }

    cjk + tokens
}
