use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use wordproblem::Limits;

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the nonterminals with a rule producing exactly RHS
    Lookup {
        /// File containing the grammar
        file: PathBuf,

        /// Right hand side to look up
        rhs: String,
    },

    /// Decide membership of a word with the CYK algorithm
    Recognize {
        /// File containing the grammar
        file: PathBuf,

        /// Word over the terminals of the grammar
        word: String,

        /// Print the whole table, not just the verdict
        #[arg(short, long)]
        table: bool,
    },

    /// List every word derivable without exceeding a length
    Enumerate {
        /// File containing the grammar
        file: PathBuf,

        /// Longest word allowed during derivation
        #[arg(short, long, value_name = "LENGTH")]
        max_length: usize,

        /// Only report whether this word is derivable
        #[arg(short, long)]
        word: Option<String>,

        /// Print every generation instead of only the last
        #[arg(short, long)]
        all: bool,

        #[command(flatten)]
        limits: LimitArgs,
    },

    /// Print random words of bounded length from the language
    Sample {
        /// File containing the grammar
        file: PathBuf,

        /// Longest word allowed during derivation
        #[arg(short, long, value_name = "LENGTH")]
        max_length: usize,

        /// Amount to generate (default: 1)
        #[arg(short = 'n', long, value_name = "AMOUNT")]
        amount: Option<usize>,

        #[command(flatten)]
        limits: LimitArgs,
    },

    /// Decide a word with both procedures and compare the answers
    Check {
        /// File containing the grammar
        file: PathBuf,

        /// Word over the terminals of the grammar
        word: String,

        #[command(flatten)]
        limits: LimitArgs,
    },

    /// Run the built-in example grammars
    Demo,
}

#[derive(Args)]
pub struct LimitArgs {
    /// Give up after this many rewrite rounds
    #[arg(long, value_name = "ROUNDS")]
    pub max_rounds: Option<usize>,

    /// Give up once a generation holds more words than this
    #[arg(long, value_name = "WORDS")]
    pub max_words: Option<usize>,

    /// Remove every limit on closure generation
    #[arg(long, conflicts_with_all = ["max_rounds", "max_words"])]
    pub unbounded: bool,
}

impl LimitArgs {
    pub fn limits(&self) -> Limits {
        if self.unbounded {
            return Limits::unbounded();
        }

        let default = Limits::default();
        Limits {
            max_rounds: self.max_rounds.or(default.max_rounds),
            max_words: self.max_words.or(default.max_words),
        }
    }
}
