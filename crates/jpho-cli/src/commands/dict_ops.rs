use std::fs;
use std::path::Path;
use std::process;

use jpho_core::binary::{self, BinaryTrie};
use jpho_core::dict::{PhonemeDictionary, WordDictionary};

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

pub fn compile(phonemes_file: &str, words_file: Option<&str>, output_file: &str) {
    let phonemes = die!(
        PhonemeDictionary::load_json(Path::new(phonemes_file)),
        "Error reading {phonemes_file}: {}"
    );
    let words = words_file.map(|file| {
        die!(
            WordDictionary::load_word_list(Path::new(file)),
            "Error reading {file}: {}"
        )
    });

    eprintln!(
        "Building trie from {} phonemes and {} words...",
        phonemes.len(),
        words.as_ref().map_or(0, WordDictionary::len)
    );

    let bytes = die!(
        binary::encode(&phonemes, words.as_ref()),
        "Error encoding dictionary: {}"
    );
    die!(fs::write(output_file, &bytes), "Error writing {output_file}: {}");

    eprintln!(
        "Wrote {output_file} ({:.1} MB)",
        bytes.len() as f64 / 1_048_576.0
    );
}

pub fn inspect(file: &str) {
    let trie = die!(BinaryTrie::open(Path::new(file)), "Error opening {file}: {}");
    let header = trie.header();
    let file_size = fs::metadata(file).map(|m| m.len()).unwrap_or(0);

    println!("File:     {file}");
    println!("Format:   JPHO v{}.{}", header.version_major, header.version_minor);
    println!("Size:     {file_size} bytes");
    println!("Phonemes: {}", header.phoneme_count);
    if header.word_count == 0 {
        println!("Words:    0 (segmentation uses phoneme entries)");
    } else {
        println!("Words:    {}", header.word_count);
    }
    println!("Root:     offset {}", header.root_offset);
}
