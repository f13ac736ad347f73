//! Configured entry point: loads dictionaries and runs conversions.
//!
//! `Engine::load` does exactly what its [`EngineConfig`] says, degrading only
//! when an optional input file cannot be read:
//!
//! - binary source unreadable → text dictionaries
//! - word list unreadable → conversion without segmentation
//!
//! A binary trie compiled without a word list still segments, with its
//! phoneme entries standing in for words.
//!
//! A file that can be read but not parsed is always an error, as is an
//! unreadable phoneme JSON.

use std::path::Path;

use tracing::{debug, debug_span, warn};

use crate::binary::BinaryTrie;
use crate::config::{ConfigError, DictionarySource, EngineConfig};
use crate::converter::{ConversionResult, Converter, TopicParticle};
use crate::dict::{DictError, PhonemeDictionary, WordDictionary};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Dict(#[from] DictError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

enum Store {
    Binary(BinaryTrie),
    Text {
        phonemes: PhonemeDictionary,
        words: Option<WordDictionary>,
    },
}

/// Immutable after construction; share it freely across threads.
pub struct Engine {
    store: Store,
    segmentation: bool,
    topic: TopicParticle,
}

impl Engine {
    pub fn load(config: &EngineConfig) -> Result<Self, EngineError> {
        let _span = debug_span!("engine_load", source = ?config.dictionary_source).entered();
        let store = match config.dictionary_source {
            DictionarySource::Binary => match BinaryTrie::open(&config.paths.binary) {
                Ok(trie) => Store::Binary(trie),
                Err(DictError::Io(e)) => {
                    warn!(
                        path = %config.paths.binary.display(),
                        error = %e,
                        "binary dictionary unreadable, falling back to text dictionaries"
                    );
                    load_text(config)?
                }
                Err(e) => return Err(e.into()),
            },
            DictionarySource::Text => load_text(config)?,
        };

        let engine = Self {
            store,
            segmentation: config.enable_segmentation,
            topic: config.topic_particle(),
        };
        if config.enable_segmentation && !engine.segmentation_enabled() {
            warn!("no word list available, segmentation disabled");
        } else if config.enable_segmentation && !engine.has_words() {
            debug!("binary dictionary has no word markers, segmenting by phoneme entries");
        }
        debug!(
            binary = matches!(engine.store, Store::Binary(_)),
            segmentation = engine.segmentation_enabled(),
            "engine ready"
        );
        Ok(engine)
    }

    /// Read a config file and load the engine it describes.
    pub fn from_config_file(path: &Path) -> Result<Self, EngineError> {
        Self::load(&EngineConfig::load(path)?)
    }

    pub fn from_dictionaries(phonemes: PhonemeDictionary, words: Option<WordDictionary>) -> Self {
        Self {
            store: Store::Text { phonemes, words },
            segmentation: true,
            topic: TopicParticle::default(),
        }
    }

    pub fn from_binary(trie: BinaryTrie) -> Self {
        Self {
            store: Store::Binary(trie),
            segmentation: true,
            topic: TopicParticle::default(),
        }
    }

    pub fn with_topic_particle(mut self, topic: TopicParticle) -> Self {
        self.topic = topic;
        self
    }

    pub fn with_segmentation(mut self, enabled: bool) -> Self {
        self.segmentation = enabled;
        self
    }

    /// Whether `transcribe` segments: enabled in config and something to
    /// segment by. Text stores need a word list; binary stores fall back to
    /// their phoneme entries.
    pub fn segmentation_enabled(&self) -> bool {
        self.segmentation && (matches!(self.store, Store::Binary(_)) || self.has_words())
    }

    pub fn convert(&self, text: &str) -> String {
        self.with_converter(|c| c.convert(text))
    }

    pub fn convert_detailed(&self, text: &str) -> ConversionResult {
        self.with_converter(|c| c.convert_detailed(text))
    }

    pub fn convert_with_segmentation(&self, text: &str) -> String {
        self.with_converter(|c| c.convert_with_segmentation(text))
    }

    pub fn convert_detailed_with_segmentation(&self, text: &str) -> ConversionResult {
        self.with_converter(|c| c.convert_detailed_with_segmentation(text))
    }

    /// Convert with or without segmentation, as configured.
    pub fn transcribe(&self, text: &str) -> String {
        if self.segmentation_enabled() {
            self.convert_with_segmentation(text)
        } else {
            self.convert(text)
        }
    }

    pub fn transcribe_detailed(&self, text: &str) -> ConversionResult {
        if self.segmentation_enabled() {
            self.convert_detailed_with_segmentation(text)
        } else {
            self.convert_detailed(text)
        }
    }

    fn has_words(&self) -> bool {
        match &self.store {
            Store::Binary(trie) => trie.header().word_count > 0,
            Store::Text { words, .. } => words.as_ref().is_some_and(|w| !w.is_empty()),
        }
    }

    fn with_converter<R>(&self, f: impl FnOnce(&Converter<'_>) -> R) -> R {
        let has_words = self.has_words();
        match &self.store {
            Store::Binary(trie) => {
                let words = trie.words();
                let mut converter = Converter::new(trie).with_topic_particle(self.topic.clone());
                if has_words {
                    converter = converter.with_words(&words);
                }
                f(&converter)
            }
            Store::Text { phonemes, words } => {
                let mut converter =
                    Converter::new(phonemes).with_topic_particle(self.topic.clone());
                if let Some(words) = words.as_ref().filter(|_| has_words) {
                    converter = converter.with_words(words);
                }
                f(&converter)
            }
        }
    }
}

fn load_text(config: &EngineConfig) -> Result<Store, EngineError> {
    let phonemes = PhonemeDictionary::load_json(&config.paths.phonemes)?;
    let words = if config.enable_segmentation {
        match WordDictionary::load_word_list(&config.paths.words) {
            Ok(words) => Some(words),
            Err(DictError::Io(e)) => {
                warn!(path = %config.paths.words.display(), error = %e, "word list unreadable");
                None
            }
            Err(e) => return Err(e.into()),
        }
    } else {
        None
    };
    debug!(
        phonemes = phonemes.len(),
        words = words.as_ref().map_or(0, WordDictionary::len),
        "text dictionaries loaded"
    );
    Ok(Store::Text { phonemes, words })
}
