//! Text dictionary sources: a JSON object of phonemes and a line-based word list.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::{debug, debug_span};

use super::{DictError, PhonemeDictionary, WordDictionary};

impl PhonemeDictionary {
    /// Build from a JSON object `{ "text": "phoneme", ... }`.
    ///
    /// Entries with an empty key or an empty phoneme are skipped.
    pub fn from_json_str(json: &str) -> Result<Self, DictError> {
        let map: BTreeMap<String, String> =
            serde_json::from_str(json).map_err(|e| DictError::Parse(e.to_string()))?;
        let mut dict = Self::new();
        let mut skipped = 0usize;
        for (key, value) in map {
            if key.is_empty() || value.is_empty() {
                skipped += 1;
                continue;
            }
            dict.insert(&key, value);
        }
        debug!(entries = dict.len(), skipped, "phoneme dictionary parsed");
        Ok(dict)
    }

    pub fn load_json(path: &Path) -> Result<Self, DictError> {
        let _span = debug_span!("load_phoneme_json", path = %path.display()).entered();
        Self::from_json_str(&fs::read_to_string(path)?)
    }
}

impl WordDictionary {
    /// Build from one word per line. Lines are trimmed; blank lines skipped.
    pub fn from_lines(text: &str) -> Self {
        let dict = Self::from_words(text.lines().map(str::trim).filter(|w| !w.is_empty()));
        debug!(words = dict.len(), "word list parsed");
        dict
    }

    pub fn load_word_list(path: &Path) -> Result<Self, DictError> {
        let _span = debug_span!("load_word_list", path = %path.display()).entered();
        Ok(Self::from_lines(&fs::read_to_string(path)?))
    }
}
