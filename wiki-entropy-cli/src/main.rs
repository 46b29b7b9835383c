use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use log::info;

use wiki_entropy_core::export::{load_bigram_binary, load_bigram_json, save_bigram_binary, save_bigram_json, save_lengths_csv};
use wiki_entropy_core::io::{build_output_path, read_snapshot, read_text, wiki_chunk_paths};
use wiki_entropy_core::model::{sentence_lengths, BigramModel, BuildOptions, ZeroTotalPolicy};

/// Corpus statistics for entropy studies.
#[derive(Parser)]
#[command(name = "wiki-entropy", version)]
struct Cli {
	/// Log more (info with one flag, debug with two)
	#[arg(short, long, action = clap::ArgAction::Count, global = true)]
	verbose: u8,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Build a bigram transition table from a counts file and a pairs file
	Bigrams(BigramsArgs),
	/// Build the sentence-length table of a corpus snapshot
	Lengths(LengthsArgs),
	/// Sample a word chain from an exported bigram table
	Walk(WalkArgs),
}

#[derive(Args)]
struct BigramsArgs {
	/// One count per bigram, whitespace or line separated
	#[arg(long)]
	counts: PathBuf,

	/// Comma-separated "word1 word2" entries, aligned with the counts
	#[arg(long)]
	pairs: PathBuf,

	/// Output file (default: the counts path with a .json or .bin extension)
	#[arg(short, long)]
	output: Option<PathBuf>,

	/// Drop words whose counts add up to 0 instead of failing
	#[arg(long)]
	skip_degenerate: bool,

	/// Write a binary snapshot instead of JSON
	#[arg(long)]
	binary: bool,
}

#[derive(Args)]
struct LengthsArgs {
	/// Text files making up the snapshot, concatenated in order
	#[arg(conflicts_with_all = ["wiki_dir", "chunks"])]
	files: Vec<PathBuf>,

	/// Directory holding WikiExtractor output (wiki_00, wiki_01, ...)
	#[arg(long, requires = "chunks")]
	wiki_dir: Option<PathBuf>,

	/// Number of wiki_NN files to read from --wiki-dir
	#[arg(long, requires = "wiki_dir")]
	chunks: Option<usize>,

	/// Language name, used for the default output file <lang>_df.csv
	#[arg(long)]
	lang: String,

	/// Output file
	#[arg(short, long)]
	output: Option<PathBuf>,
}

#[derive(Args)]
struct WalkArgs {
	/// Bigram table written by `bigrams` (.json or .bin)
	#[arg(long)]
	model: PathBuf,

	/// Word to start from
	#[arg(long)]
	start: String,

	/// Maximum number of words drawn after the start word
	#[arg(long, default_value_t = 20)]
	max_words: usize,
}

fn run_bigrams(args: &BigramsArgs) -> Result<(), Box<dyn std::error::Error>> {
	let counts = read_text(&args.counts)?;
	let pairs = read_text(&args.pairs)?;

	let mut options = BuildOptions::default();
	if args.skip_degenerate {
		options.zero_total = ZeroTotalPolicy::Skip;
	}

	let model = BigramModel::from_sources(&counts, &pairs, &options)?;

	let extension = if args.binary { "bin" } else { "json" };
	let output = match &args.output {
		Some(path) => path.clone(),
		None => build_output_path(&args.counts, extension)?,
	};
	if args.binary {
		save_bigram_binary(&model, &output)?;
	} else {
		save_bigram_json(&model, &output)?;
	}

	info!("wrote {} words to {}", model.len(), output.display());
	Ok(())
}

fn run_lengths(args: &LengthsArgs) -> Result<(), Box<dyn std::error::Error>> {
	let paths = match (&args.wiki_dir, args.chunks) {
		(Some(dir), Some(chunks)) => wiki_chunk_paths(dir, chunks),
		_ if !args.files.is_empty() => args.files.clone(),
		_ => return Err("Expected input files or --wiki-dir with --chunks".into()),
	};

	let snapshot = read_snapshot(&paths)?;
	let lengths = sentence_lengths(&snapshot).dedup();

	let output = args.output.clone().unwrap_or_else(|| PathBuf::from(format!("{}_df.csv", args.lang)));
	save_lengths_csv(&lengths, &output)?;

	info!("wrote {} sentences to {}", lengths.len(), output.display());
	Ok(())
}

fn run_walk(args: &WalkArgs) -> Result<(), Box<dyn std::error::Error>> {
	let model = match args.model.extension().and_then(|e| e.to_str()) {
		Some("bin") => load_bigram_binary(&args.model)?,
		_ => load_bigram_json(&args.model)?,
	};

	let chain = model.walk(&args.start, args.max_words)?;
	println!("{}", chain.join(" "));
	Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	let cli = Cli::parse();

	let level = match cli.verbose {
		0 => "warn",
		1 => "info",
		_ => "debug",
	};
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

	match &cli.command {
		Command::Bigrams(args) => run_bigrams(args),
		Command::Lengths(args) => run_lengths(args),
		Command::Walk(args) => run_walk(args),
	}
}
