//! Longest-match word segmentation with grammar-run fallback.
//!
//! Known words are matched greedily. Anything between two known words
//! (particles, conjugation endings) is collected into a single "grammar run"
//! token, e.g. 私はリンゴが好きです → 私 | は | リンゴ | が | 好き | です.

use tracing::{debug, debug_span};

use crate::dict::Vocabulary;
use crate::furigana::{ResolvedSegment, TextSegment};
use crate::unicode::DecodedText;

/// A token with its position in the original input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub text: String,
    pub origin_pos: usize,
    /// Original byte offset of each character, when `text` is verbatim input.
    pub origins: Option<Vec<usize>>,
}

enum State {
    Seeking,
    InGrammarRun { start: usize },
}

#[derive(Clone, Copy)]
pub struct Segmenter<'a> {
    words: &'a dyn Vocabulary,
    fallback: Option<&'a dyn Vocabulary>,
}

impl<'a> Segmenter<'a> {
    pub fn new(words: &'a dyn Vocabulary) -> Self {
        Self {
            words,
            fallback: None,
        }
    }

    /// Probe `fallback` wherever `words` has no entry.
    pub fn with_fallback(mut self, fallback: &'a dyn Vocabulary) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn segment(&self, text: &str) -> Vec<String> {
        let decoded = DecodedText::new(text);
        self.spans(&decoded.chars)
            .into_iter()
            .map(|(start, end)| decoded.slice(start, end))
            .collect()
    }

    /// Segment each `Normal` segment; a hint's reading is one atomic token.
    pub fn segment_from_segments(&self, segments: &[TextSegment]) -> Vec<String> {
        let mut words = Vec::new();
        for segment in segments {
            match segment {
                TextSegment::FuriganaHint { reading, .. } => words.push(reading.clone()),
                TextSegment::Normal { text, .. } => words.extend(self.segment(text)),
            }
        }
        words
    }

    pub(crate) fn tokens(&self, segments: &[ResolvedSegment]) -> Vec<Token> {
        let _span = debug_span!("segment", segments = segments.len()).entered();
        let mut tokens = Vec::new();
        for resolved in segments {
            let origin_pos = resolved.segment.origin_pos();
            match (&resolved.segment, &resolved.origins) {
                (TextSegment::Normal { text, .. }, Some(origins)) => {
                    let chars: Vec<char> = text.chars().collect();
                    for (start, end) in self.spans(&chars) {
                        tokens.push(Token {
                            text: chars[start..end].iter().collect(),
                            origin_pos: origins[start],
                            origins: Some(origins[start..end].to_vec()),
                        });
                    }
                }
                (TextSegment::Normal { text, .. }, None) => {
                    let chars: Vec<char> = text.chars().collect();
                    for (start, end) in self.spans(&chars) {
                        tokens.push(Token {
                            text: chars[start..end].iter().collect(),
                            origin_pos,
                            origins: None,
                        });
                    }
                }
                (TextSegment::FuriganaHint { reading, .. }, _) => tokens.push(Token {
                    text: reading.clone(),
                    origin_pos,
                    origins: None,
                }),
            }
        }
        debug!(tokens = tokens.len());
        tokens
    }

    fn match_len(&self, chars: &[char], pos: usize) -> Option<usize> {
        self.words
            .match_len(chars, pos)
            .or_else(|| self.fallback.and_then(|f| f.match_len(chars, pos)))
    }

    /// Token spans as `(start, end)` code-point ranges. Whitespace is
    /// skipped and never part of a token.
    fn spans(&self, chars: &[char]) -> Vec<(usize, usize)> {
        let mut spans = Vec::new();
        let mut state = State::Seeking;
        let mut pos = 0;

        loop {
            match state {
                State::Seeking => {
                    if pos >= chars.len() {
                        break;
                    }
                    if chars[pos].is_whitespace() {
                        pos += 1;
                    } else if let Some(len) = self.match_len(chars, pos) {
                        spans.push((pos, pos + len));
                        pos += len;
                    } else {
                        state = State::InGrammarRun { start: pos };
                        pos += 1;
                    }
                }
                State::InGrammarRun { start } => {
                    let ends_run = pos >= chars.len()
                        || chars[pos].is_whitespace()
                        || self.match_len(chars, pos).is_some();
                    if ends_run {
                        spans.push((start, pos));
                        state = State::Seeking;
                    } else {
                        pos += 1;
                    }
                }
            }
        }
        spans
    }
}
