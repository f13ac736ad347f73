//! Code-point decoding and character classification for Japanese text.

/// Text decoded into Unicode scalar values, with each character's byte
/// offset in the source string.
///
/// `offsets` has one extra trailing entry holding the total byte length, so
/// `offsets[i]..offsets[j]` is always the byte range of `chars[i..j]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub chars: Vec<char>,
    pub offsets: Vec<usize>,
}

impl DecodedText {
    pub fn new(text: &str) -> Self {
        let mut chars = Vec::with_capacity(text.len());
        let mut offsets = Vec::with_capacity(text.len() + 1);
        for (offset, c) in text.char_indices() {
            chars.push(c);
            offsets.push(offset);
        }
        offsets.push(text.len());
        Self { chars, offsets }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Byte offset of the character at `pos` (or the text length at the end).
    pub fn byte_offset(&self, pos: usize) -> usize {
        self.offsets[pos]
    }

    /// Re-encode `chars[start..end]` as a `String`.
    pub fn slice(&self, start: usize, end: usize) -> String {
        self.chars[start..end].iter().collect()
    }
}

/// Check the full Hiragana block (U+3040..U+309F).
pub fn is_hiragana(c: char) -> bool {
    ('\u{3040}'..='\u{309F}').contains(&c)
}

/// Check the full Katakana block (U+30A0..U+30FF), including ー.
pub fn is_katakana(c: char) -> bool {
    ('\u{30A0}'..='\u{30FF}').contains(&c)
}

pub fn is_kana(c: char) -> bool {
    is_hiragana(c) || is_katakana(c)
}

pub fn is_kanji(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)
        || ('\u{3400}'..='\u{4DBF}').contains(&c)
        || ('\u{F900}'..='\u{FAFF}').contains(&c)
        || ('\u{20000}'..='\u{2A6DF}').contains(&c)
}

/// Characters that end a word when scanning backward from a reading hint.
///
/// Full-width sentence punctuation, closing brackets, ASCII punctuation and
/// any whitespace (including the ideographic space U+3000).
pub fn is_word_boundary(c: char) -> bool {
    c.is_whitespace()
        || matches!(
            c,
            '」' | '』' | '、' | '。' | '！' | '？' | '）' | '］' | '，' | '．' | '・' | '…'
        )
        || matches!(
            c,
            '.' | ','
                | '!'
                | '?'
                | ';'
                | ':'
                | '('
                | ')'
                | '['
                | ']'
                | '{'
                | '}'
                | '"'
                | '\''
                | '-'
                | '/'
                | '\\'
                | '|'
        )
}
