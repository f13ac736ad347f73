use clap::{Parser, Subcommand};

use jpho_cli::commands::convert_ops::{ConvertOptions, EngineSource};
use jpho_cli::commands::{config_ops, convert_ops, dict_ops};
use jpho_cli::trace_init::init_tracing;

#[derive(Parser)]
#[command(name = "jphotool", about = "Japanese text to phoneme conversion tool")]
struct Cli {
    /// Log debug events to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile text dictionaries into a binary trie
    Compile {
        /// Phoneme dictionary (JSON object)
        phonemes_file: String,
        /// Output file
        output_file: String,
        /// Word list (one word per line)
        #[arg(long)]
        words: Option<String>,
    },
    /// Show the header of a binary trie
    Inspect {
        /// Binary trie file
        file: String,
    },
    /// Convert text to phonemes (reads stdin lines when no text is given)
    Convert {
        /// Engine config TOML
        #[arg(long)]
        config: Option<String>,
        /// Binary trie file
        #[arg(long, conflicts_with = "config")]
        binary: Option<String>,
        /// Phoneme dictionary (JSON object)
        #[arg(long, conflicts_with_all = ["config", "binary"])]
        phonemes: Option<String>,
        /// Word list for segmentation (with --phonemes)
        #[arg(long, requires = "phonemes")]
        words: Option<String>,
        /// Print matches and unmatched characters as JSON
        #[arg(long)]
        detailed: bool,
        /// Force segmentation on
        #[arg(long, conflicts_with = "no_segment")]
        segment: bool,
        /// Force segmentation off
        #[arg(long)]
        no_segment: bool,
        /// Text to convert
        text: Vec<String>,
    },
    /// Export the default engine config as TOML
    ConfigExport,
    /// Validate an engine config TOML file
    ConfigValidate {
        /// Path to the TOML file
        file: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Compile {
            phonemes_file,
            output_file,
            words,
        } => dict_ops::compile(&phonemes_file, words.as_deref(), &output_file),
        Command::Inspect { file } => dict_ops::inspect(&file),
        Command::Convert {
            config,
            binary,
            phonemes,
            words,
            detailed,
            segment,
            no_segment,
            text,
        } => {
            let source = EngineSource {
                config: config.as_deref(),
                binary: binary.as_deref(),
                phonemes: phonemes.as_deref(),
                words: words.as_deref(),
            };
            let opts = ConvertOptions {
                detailed,
                segment: match (segment, no_segment) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                },
            };
            convert_ops::convert_cmd(&source, &text, &opts);
        }
        Command::ConfigExport => config_ops::config_export(),
        Command::ConfigValidate { file } => config_ops::config_validate(&file),
    }
}
