pub mod binary;
pub mod config;
pub mod converter;
pub mod dict;
pub mod engine;
pub mod furigana;
pub mod segmenter;
pub mod trie;
pub mod unicode;

pub use engine::{Engine, EngineError};
