use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// File containing the grammar
    pub file: PathBuf,

    /// Sentence to parse, tokens separated by whitespace (default: one
    /// sentence per line of stdin)
    #[arg(short, long, value_name = "TOKENS")]
    pub sentence: Option<String>,

    /// Print every parse tree instead of the first one
    #[arg(short, long)]
    pub all: bool,

    /// Maximum number of trees printed with --all
    #[arg(short, long, value_name = "COUNT")]
    pub limit: Option<usize>,

    /// Print the grammar after conversion to Chomsky Normal Form
    #[arg(short = 'g', long)]
    pub show_grammar: bool,

    /// Print random sentences of the grammar instead of parsing
    #[arg(short = 'n', long, value_name = "AMOUNT")]
    pub sample: Option<u32>,

    /// Seed for --sample (default: random)
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Depth after which --sample only picks the shortest expansions
    #[arg(long, value_name = "DEPTH", default_value_t = 8)]
    pub depth: usize,
}
