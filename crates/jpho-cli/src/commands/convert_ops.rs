use std::io::{self, BufRead};
use std::path::Path;
use std::process;

use jpho_core::binary::BinaryTrie;
use jpho_core::dict::{PhonemeDictionary, WordDictionary};
use jpho_core::Engine;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

/// Where the conversion dictionaries come from. `config` wins over the
/// explicit files; `binary` wins over `phonemes`.
#[derive(Default)]
pub struct EngineSource<'a> {
    pub config: Option<&'a str>,
    pub binary: Option<&'a str>,
    pub phonemes: Option<&'a str>,
    pub words: Option<&'a str>,
}

pub struct ConvertOptions {
    pub detailed: bool,
    /// Overrides the configured segmentation setting.
    pub segment: Option<bool>,
}

fn load_engine(source: &EngineSource) -> Engine {
    if let Some(config) = source.config {
        return die!(
            Engine::from_config_file(Path::new(config)),
            "Error loading {config}: {}"
        );
    }
    if let Some(binary) = source.binary {
        let trie = die!(BinaryTrie::open(Path::new(binary)), "Error opening {binary}: {}");
        return Engine::from_binary(trie);
    }
    let Some(phonemes_file) = source.phonemes else {
        eprintln!("Error: one of --config, --binary or --phonemes is required");
        process::exit(1);
    };
    let phonemes = die!(
        PhonemeDictionary::load_json(Path::new(phonemes_file)),
        "Error reading {phonemes_file}: {}"
    );
    let words = source.words.map(|file| {
        die!(
            WordDictionary::load_word_list(Path::new(file)),
            "Error reading {file}: {}"
        )
    });
    Engine::from_dictionaries(phonemes, words)
}

/// Convert each text argument, or each stdin line when none are given.
pub fn convert_cmd(source: &EngineSource, texts: &[String], opts: &ConvertOptions) {
    let mut engine = load_engine(source);
    if let Some(segment) = opts.segment {
        engine = engine.with_segmentation(segment);
    }

    if texts.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = die!(line, "Error reading stdin: {}");
            print_conversion(&engine, &line, opts.detailed);
        }
    } else {
        for text in texts {
            print_conversion(&engine, text, opts.detailed);
        }
    }
}

fn print_conversion(engine: &Engine, text: &str, detailed: bool) {
    if detailed {
        let result = engine.transcribe_detailed(text);
        let json = die!(serde_json::to_string(&result), "Error serializing result: {}");
        println!("{json}");
    } else {
        println!("{}", engine.transcribe(text));
    }
}
