//! Inline reading hints: `健太「けんた」` gives 健太 the reading けんた.
//!
//! `FuriganaResolver::parse_segments` splits raw text into `Normal` text and
//! `FuriganaHint` segments. Before emitting a hint it checks whether the
//! hinted stem plus the text after the closing bracket forms a dictionary
//! word (見「み」る → 見る); if so the reading is spliced into a plain
//! segment instead, so the word keeps its dictionary pronunciation.
//!
//! Malformed markup is never an error: an unclosed bracket is kept as text
//! and an empty reading drops the brackets and keeps the base text.

use tracing::{debug, debug_span};

use crate::dict::Vocabulary;
use crate::unicode::{is_kana, is_kanji, is_word_boundary, DecodedText};

pub const OPEN_BRACKET: char = '「';
pub const CLOSE_BRACKET: char = '」';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSegment {
    Normal {
        text: String,
        origin_pos: usize,
    },
    FuriganaHint {
        kanji: String,
        reading: String,
        origin_pos: usize,
    },
}

impl TextSegment {
    pub fn normal(text: impl Into<String>, origin_pos: usize) -> Self {
        TextSegment::Normal {
            text: text.into(),
            origin_pos,
        }
    }

    pub fn hint(kanji: impl Into<String>, reading: impl Into<String>, origin_pos: usize) -> Self {
        TextSegment::FuriganaHint {
            kanji: kanji.into(),
            reading: reading.into(),
            origin_pos,
        }
    }

    /// The text that gets pronounced: the reading for hints.
    pub fn effective_text(&self) -> &str {
        match self {
            TextSegment::Normal { text, .. } => text,
            TextSegment::FuriganaHint { reading, .. } => reading,
        }
    }

    /// Byte offset in the original input where this segment starts.
    pub fn origin_pos(&self) -> usize {
        match self {
            TextSegment::Normal { origin_pos, .. } | TextSegment::FuriganaHint { origin_pos, .. } => {
                *origin_pos
            }
        }
    }
}

/// A segment plus the original byte offset of each of its characters, when
/// its text was taken verbatim from the input.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedSegment {
    pub segment: TextSegment,
    pub origins: Option<Vec<usize>>,
}

/// Plain text accumulated between hints; flushed as one `Normal` segment.
#[derive(Default)]
struct PendingText {
    text: String,
    origins: Vec<usize>,
}

impl PendingText {
    fn push(&mut self, decoded: &DecodedText, start: usize, end: usize) {
        for pos in start..end {
            self.text.push(decoded.chars[pos]);
            self.origins.push(decoded.offsets[pos]);
        }
    }

    fn flush(&mut self, out: &mut Vec<ResolvedSegment>) {
        if self.origins.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.text);
        let origins = std::mem::take(&mut self.origins);
        out.push(ResolvedSegment {
            segment: TextSegment::normal(text, origins[0]),
            origins: Some(origins),
        });
    }
}

#[derive(Default, Clone, Copy)]
pub struct FuriganaResolver<'a> {
    words: Option<&'a dyn Vocabulary>,
    fallback: Option<&'a dyn Vocabulary>,
}

impl<'a> FuriganaResolver<'a> {
    /// A resolver without compound detection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `words` for compound detection.
    pub fn with_vocabulary(mut self, words: &'a dyn Vocabulary) -> Self {
        self.words = Some(words);
        self
    }

    /// Also try `fallback` when `words` finds no compound.
    pub fn with_fallback(mut self, fallback: &'a dyn Vocabulary) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn parse_segments(&self, text: &str) -> Vec<TextSegment> {
        self.resolve(text).into_iter().map(|r| r.segment).collect()
    }

    pub(crate) fn resolve(&self, text: &str) -> Vec<ResolvedSegment> {
        let _span = debug_span!("parse_segments", bytes = text.len()).entered();
        let decoded = DecodedText::new(text);
        let chars = &decoded.chars;
        let mut out = Vec::new();
        let mut pending = PendingText::default();
        let mut pos = 0;

        while pos < chars.len() {
            let Some(open) = find(chars, pos, OPEN_BRACKET) else {
                pending.push(&decoded, pos, chars.len());
                break;
            };
            let Some(close) = find(chars, open + 1, CLOSE_BRACKET) else {
                pending.push(&decoded, pos, chars.len());
                break;
            };

            let start = word_start(chars, pos, open);
            pending.push(&decoded, pos, start);

            let reading = decoded.slice(open + 1, close);
            let reading = reading.trim();
            if reading.is_empty() {
                pending.push(&decoded, start, open);
                pos = close + 1;
                continue;
            }

            let tail = close + 1;
            pending.flush(&mut out);
            match self.compound_len(&chars[start..open], &chars[tail..]) {
                Some(len) => {
                    let compound = format!("{reading}{}", decoded.slice(tail, tail + len));
                    debug!(%compound, "hint merged into dictionary compound");
                    out.push(ResolvedSegment {
                        segment: TextSegment::normal(compound, decoded.offsets[start]),
                        origins: None,
                    });
                    pos = tail + len;
                }
                None => {
                    out.push(ResolvedSegment {
                        segment: TextSegment::hint(
                            decoded.slice(start, open),
                            reading,
                            decoded.offsets[start],
                        ),
                        origins: None,
                    });
                    pos = tail;
                }
            }
        }

        pending.flush(&mut out);
        out
    }

    fn compound_len(&self, stem: &[char], tail: &[char]) -> Option<usize> {
        if stem.is_empty() || tail.is_empty() {
            return None;
        }
        self.words
            .and_then(|w| w.compound_len(stem, tail))
            .or_else(|| self.fallback.and_then(|f| f.compound_len(stem, tail)))
    }
}

fn find(chars: &[char], from: usize, target: char) -> Option<usize> {
    chars[from..]
        .iter()
        .position(|&c| c == target)
        .map(|p| from + p)
}

/// Walk backward from the opening bracket at `open` to find where the
/// hinted word begins, never going before `floor`.
///
/// Kana directly before the bracket always belong to the word. If that run
/// is not preceded by a kanji, the run is the whole word (リンゴ「りんご」).
/// Otherwise the walk continues through the kanji: punctuation and
/// whitespace end the word, and a kana is part of it only if some kanji
/// precedes it within `floor..`. An unsandwiched kana is a standalone prefix
/// (a particle such as は) and the word starts right after it.
fn word_start(chars: &[char], floor: usize, open: usize) -> usize {
    let mut start = open;
    while start > floor && is_kana(chars[start - 1]) {
        start -= 1;
    }
    if start < open && (start == floor || !is_kanji(chars[start - 1])) {
        return start;
    }

    let first_kanji = chars[floor..start]
        .iter()
        .position(|&c| is_kanji(c))
        .map(|p| floor + p);

    while start > floor {
        let c = chars[start - 1];
        if is_word_boundary(c) {
            break;
        }
        if is_kana(c) && first_kanji.map_or(true, |k| k >= start - 1) {
            break;
        }
        start -= 1;
    }
    start
}
