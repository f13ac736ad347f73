//! Greedy longest-match phoneme conversion.
//!
//! `convert` walks the input once: at each position it takes the longest
//! phoneme-dictionary entry, or copies the character through unchanged.
//! `convert_with_segmentation` first resolves reading hints and splits the
//! text into words, converts each word on its own and joins the results
//! with single spaces.

#[cfg(test)]
mod tests;

use serde::Serialize;
use tracing::{debug, debug_span};

use crate::dict::{PhonemeLookup, Vocabulary};
use crate::furigana::FuriganaResolver;
use crate::segmenter::{Segmenter, Token};
use crate::unicode::DecodedText;

/// One dictionary hit: the matched input text, its phonemes and the byte
/// offset of the match in the original input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionMatch {
    pub original: String,
    pub phoneme: String,
    pub position: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionResult {
    pub phonemes: String,
    pub matches: Vec<ConversionMatch>,
    pub unmatched: Vec<char>,
}

/// Pronunciation override for the topic particle.
///
/// は is read "ha" as a kana but pronounced "wa" when it marks the topic;
/// a token that is exactly the particle always gets `reading`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicParticle {
    pub glyph: String,
    pub reading: String,
}

impl Default for TopicParticle {
    fn default() -> Self {
        Self {
            glyph: "は".to_string(),
            reading: "wa".to_string(),
        }
    }
}

enum Step<'d> {
    Match {
        start: usize,
        len: usize,
        phoneme: &'d str,
    },
    Literal(usize),
}

pub struct Converter<'a> {
    phonemes: &'a dyn PhonemeLookup,
    phoneme_vocab: &'a dyn Vocabulary,
    words: Option<&'a dyn Vocabulary>,
    topic: TopicParticle,
}

impl<'a> Converter<'a> {
    pub fn new<P: PhonemeLookup>(phonemes: &'a P) -> Self {
        Self {
            phonemes,
            phoneme_vocab: phonemes,
            words: None,
            topic: TopicParticle::default(),
        }
    }

    /// Word list used for segmentation and compound detection.
    pub fn with_words(mut self, words: &'a dyn Vocabulary) -> Self {
        self.words = Some(words);
        self
    }

    pub fn with_topic_particle(mut self, topic: TopicParticle) -> Self {
        self.topic = topic;
        self
    }

    pub fn convert(&self, text: &str) -> String {
        let decoded = DecodedText::new(text);
        let mut out = String::with_capacity(text.len());
        self.walk(&decoded.chars, |step| match step {
            Step::Match { phoneme, .. } => out.push_str(phoneme),
            Step::Literal(pos) => out.push(decoded.chars[pos]),
        });
        out
    }

    pub fn convert_detailed(&self, text: &str) -> ConversionResult {
        let _span = debug_span!("convert_detailed", bytes = text.len()).entered();
        let decoded = DecodedText::new(text);
        let mut result = ConversionResult::default();
        self.convert_into(&decoded.chars, |pos| decoded.offsets[pos], &mut result);
        debug!(
            matches = result.matches.len(),
            unmatched = result.unmatched.len()
        );
        result
    }

    pub fn convert_with_segmentation(&self, text: &str) -> String {
        let _span = debug_span!("convert_with_segmentation", bytes = text.len()).entered();
        self.tokens(text)
            .iter()
            .map(|token| {
                if token.text == self.topic.glyph {
                    self.topic.reading.clone()
                } else {
                    self.convert(&token.text)
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Like `convert_with_segmentation`, with every match positioned in the
    /// original input. Matches inside substituted text (a hint's reading or
    /// a compound spliced from one) are positioned at the hinted word.
    pub fn convert_detailed_with_segmentation(&self, text: &str) -> ConversionResult {
        let _span =
            debug_span!("convert_detailed_with_segmentation", bytes = text.len()).entered();
        let mut result = ConversionResult::default();
        let mut parts = Vec::new();

        for token in self.tokens(text) {
            if token.text == self.topic.glyph {
                result.matches.push(ConversionMatch {
                    original: token.text.clone(),
                    phoneme: self.topic.reading.clone(),
                    position: token.origin_pos,
                });
                parts.push(self.topic.reading.clone());
                continue;
            }

            let chars: Vec<char> = token.text.chars().collect();
            let mut part = ConversionResult::default();
            let position = |pos: usize| match &token.origins {
                Some(origins) => origins[pos],
                None => token.origin_pos,
            };
            self.convert_into(&chars, position, &mut part);
            parts.push(part.phonemes);
            result.matches.extend(part.matches);
            result.unmatched.extend(part.unmatched);
        }

        result.phonemes = parts.join(" ");
        debug!(
            matches = result.matches.len(),
            unmatched = result.unmatched.len()
        );
        result
    }

    fn tokens(&self, text: &str) -> Vec<Token> {
        let (words, fallback) = match self.words {
            Some(words) => (words, Some(self.phoneme_vocab)),
            None => (self.phoneme_vocab, None),
        };
        let mut resolver = FuriganaResolver::new().with_vocabulary(words);
        let mut segmenter = Segmenter::new(words);
        if let Some(fallback) = fallback {
            resolver = resolver.with_fallback(fallback);
            segmenter = segmenter.with_fallback(fallback);
        }
        segmenter.tokens(&resolver.resolve(text))
    }

    fn convert_into<F>(&self, chars: &[char], position: F, result: &mut ConversionResult)
    where
        F: Fn(usize) -> usize,
    {
        self.walk(chars, |step| match step {
            Step::Match {
                start,
                len,
                phoneme,
            } => {
                result.phonemes.push_str(phoneme);
                result.matches.push(ConversionMatch {
                    original: chars[start..start + len].iter().collect(),
                    phoneme: phoneme.to_string(),
                    position: position(start),
                });
            }
            Step::Literal(pos) => {
                result.phonemes.push(chars[pos]);
                result.unmatched.push(chars[pos]);
            }
        });
    }

    /// Visit each longest match or literal fallback in input order. Every
    /// position is covered by exactly one step.
    fn walk<'d, F>(&'d self, chars: &[char], mut f: F)
    where
        F: FnMut(Step<'d>),
    {
        let mut pos = 0;
        while pos < chars.len() {
            match self.phonemes.lookup_longest(chars, pos) {
                Some((len, phoneme)) if len > 0 => {
                    f(Step::Match {
                        start: pos,
                        len,
                        phoneme,
                    });
                    pos += len;
                }
                _ => {
                    f(Step::Literal(pos));
                    pos += 1;
                }
            }
        }
    }
}
