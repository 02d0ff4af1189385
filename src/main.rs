//! Extraction of French noun genders from the Google Books Ngram dataset
//!
//! This program reads the French 2-gram files whose first word is one of the
//! determiners "le", "la", "du" and "un"/"une", deduces the grammatical gender
//! of the noun that follows from the determiner, and tabulates how often each
//! noun was seen with each gender. General documentation about the dataset can
//! be found at <http://storage.googleapis.com/books/ngrams/books/datasetsv3.html>.

mod config;
mod decompose;
mod error;
mod pipeline;
mod progress;
mod sources;
mod stats;
mod table;
mod tsv;

use crate::{
    config::Config,
    progress::{ProgressConfig, ProgressReport, Work},
};
use clap::Parser;
use log::LevelFilter;
use std::{num::NonZeroU64, path::PathBuf};

/// Tabulate the grammatical gender of French nouns
///
/// The input data files must have been downloaded beforehand. The output is a
/// tab-separated table of (noun, gender, count) rows sorted by noun.
#[derive(Parser, Debug)]
#[command(version, author)]
struct Args {
    /// Directory where the Google Books Ngram data files can be found
    ///
    /// Defaults to the Downloads directory of the current user.
    #[arg(short = 'd', long, default_value = None)]
    input_dir: Option<PathBuf>,

    /// Name of the data files, with %s standing for the source name
    #[arg(long, default_value = "googlebooks-fre-all-2gram-20120701-%s.gz")]
    name_template: Box<str>,

    /// Path of the output table
    #[arg(short, long, default_value = "french_nouns.tsv")]
    output: PathBuf,

    /// Minimum accepted book publication year
    ///
    /// Older books may not represent modern language usage, so occurences
    /// from books published before this year are ignored.
    #[arg(short = 'y', long, default_value = "1980")]
    min_year: Year,

    /// Minimum accepted number of occurences of a noun with a given gender
    ///
    /// Rare nouns are often OCR errors, typos or proper nouns, so nouns that
    /// occur less often than this across all sources are left out.
    #[arg(short = 'm', long, default_value = "500")]
    min_count: NonZeroU64,

    /// JSON file describing the determiner sources to be used
    ///
    /// By default, the built-in "le", "la", "du" and "un" sources are used.
    #[arg(long, default_value = None)]
    sources: Option<PathBuf>,

    /// Process sources one after another instead of concurrently
    #[arg(long, default_value_t = false)]
    sequential: bool,
}
//
impl Args {
    /// Decode and validate CLI arguments
    pub fn parse_and_check() -> Result<Self> {
        // Decode CLI arguments
        let args = Args::parse();

        // Check CLI arguments for basic sanity
        anyhow::ensure!(
            args.min_year <= DATASET_PUBLICATION_YEAR,
            "requested minimum publication year excludes all books from the dataset"
        );
        anyhow::ensure!(
            args.name_template.contains("%s"),
            "data file name template should contain a %s placeholder for the source name"
        );
        if args.input_dir.is_none() {
            anyhow::ensure!(
                std::env::var_os("HOME").is_some(),
                "no input directory specified and HOME is not set"
            );
        }
        Ok(args)
    }

    /// Directory where the input data files are located
    pub fn input_dir(&self) -> PathBuf {
        self.input_dir.clone().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(PathBuf::from)
                .unwrap_or_default()
                .join("Downloads")
        })
    }
}
//
#[tokio::main]
async fn main() -> Result<()> {
    // Set up logging
    setup_logging().map_err(|e| anyhow::format_err!("{e}"))?;

    // Decode CLI arguments
    let args = Args::parse_and_check()?;

    // Load the source table, before touching any data file
    let sources = match &args.sources {
        Some(path) => sources::load(path).await?,
        None => sources::builtin()?,
    };
    let config = Config::new(args, sources);

    // Aggregate noun statistics from all sources, with a progress bar each
    let report = ProgressReport::new();
    let rows = pipeline::run(config.clone(), |source| {
        report.add(
            format!("Processing \"{}\"", source.name),
            ProgressConfig::new(Work::Steps(source.estimated_chunks(config.chunk_rows))),
        )
    })
    .await?;

    // Write down the result
    table::write_file(&config.output, &rows).await?;
    log::info!(
        "Wrote {} noun/gender pairs to {}",
        rows.len(),
        config.output.display()
    );
    Ok(())
}

/// Use anyhow for Result type erasure
pub use anyhow::Result;

/// Year where the dataset that we use was published
pub const DATASET_PUBLICATION_YEAR: Year = 2012;

/// Year of Gregorian Calendar
pub type Year = i16;

/// Number of occurences of an ngram
///
/// A single French 2-gram can be seen billions of times over the whole
/// dataset, so u32 would be too small once yearly counts are summed up.
pub type MatchCount = u64;

/// Number of books with occurences of an ngram over a single year
pub type VolumeCount = u32;

/// Addition operator for match counts
pub fn add_counts(x: MatchCount, y: MatchCount) -> MatchCount {
    x.checked_add(y).expect("overflow while adding match counts")
}

/// Set up logging
fn setup_logging() -> syslog::Result<()> {
    syslog::init(
        syslog::Facility::LOG_USER,
        if cfg!(feature = "log-trace") {
            LevelFilter::Trace
        } else if cfg!(debug_assertions) {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        },
        None,
    )
}
