//! Processing of the (optionally gzipped) TSV data files from Google

pub mod filter;

use crate::{
    config::Config,
    decompose::decompose,
    error::Error,
    progress::ChunkObserver,
    sources::SourceSpec,
    stats::NounCounts,
    MatchCount, VolumeCount, Year,
};
use async_compression::tokio::bufread::GzipDecoder;
use csv_async::AsyncReaderBuilder;
use futures::stream::StreamExt;
use serde::Deserialize;
use std::{io, path::Path, pin::pin, sync::Arc};
use tokio::{
    fs::File,
    io::{AsyncRead, BufReader},
};

use self::filter::RecordMatcher;

/// Entry from the dataset
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq)]
pub struct Entry {
    /// Tagged 2-gram whose frequency is being studied, e.g. "le_DET chien_NOUN"
    pub ngram: Box<str>,

    /// Year on which the data was recorded
    pub year: Year,

    /// Number of recorded occurences
    pub match_count: MatchCount,

    /// Number of books across which occurences were recorded
    pub volume_count: VolumeCount,
}

/// Aggregate the noun statistics of one source
///
/// The source's data file is read by chunks of `config.chunk_rows` entries,
/// which are filtered, broken down into nouns and folded into the source's
/// statistics before the next chunk is read. The observer is notified after
/// each chunk, and once the source is done with, successfully or not.
///
/// Statistics are only returned once the whole file has been read: any read
/// or decoding error aborts the processing of the source.
pub async fn aggregate_source(
    config: Arc<Config>,
    source: SourceSpec,
    mut observer: impl ChunkObserver,
) -> Result<NounCounts, Error> {
    let result = fold_source(&config, &source, &mut observer).await;
    observer.source_done();
    let counts = result?;
    log::debug!(
        "Source {:?} contributes {} matches across {} noun/gender pairs",
        source.name,
        counts.total(),
        counts.len()
    );
    Ok(counts)
}

/// Read a source's data file and fold the accepted entries into statistics
async fn fold_source(
    config: &Config,
    source: &SourceSpec,
    observer: &mut impl ChunkObserver,
) -> Result<NounCounts, Error> {
    // Open the data file
    let path = config.input_path(source);
    log::info!(
        "Aggregating source {:?} (determiner {:?}) from {}",
        source.name,
        source.keep,
        path.display()
    );
    let tsv_bytes = open(&path).await.map_err(|e| Error::OpenInput {
        source_name: source.name.clone(),
        path: path.clone(),
        source: e,
    })?;

    // Apply TSV decoder to uncompressed bytes
    let entries = AsyncReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .create_deserializer(tsv_bytes)
        .into_deserialize::<Entry>();
    let mut entries = pin!(entries);

    // Accumulate statistics from accepted entries, one chunk at a time
    let matcher = RecordMatcher::new(source, config.min_year);
    let mut counts = NounCounts::new();
    let (mut num_entries, mut num_accepted) = (0usize, 0usize);
    loop {
        let mut chunk = Vec::with_capacity(config.chunk_rows);
        while chunk.len() < config.chunk_rows {
            let Some(entry) = entries.next().await else {
                break;
            };
            chunk.push(entry.map_err(|e| Error::from_tsv(&source.name, e))?);
        }
        if chunk.is_empty() {
            break;
        }
        let chunk_len = chunk.len();
        for entry in chunk {
            if matcher.matches(&entry) {
                counts.add_record(decompose(source, entry)?);
                num_accepted += 1;
            }
        }
        num_entries += chunk_len;
        observer.chunk_done(chunk_len);
    }

    // Report on what happened
    log::info!(
        "Done with source {:?}: accepted {num_accepted}/{num_entries} entries, {} noun/gender pairs",
        source.name,
        counts.len()
    );
    if num_entries as u64 != source.row_count {
        log::debug!(
            "Source {:?} has {num_entries} entries, {} were expected",
            source.name,
            source.row_count
        );
    }
    Ok(counts)
}

/// Open a data file, decompressing it on the fly if it's gzipped
async fn open(path: &Path) -> io::Result<Box<dyn AsyncRead + Send + Unpin>> {
    let file = BufReader::new(File::open(path).await?);
    if path.extension().is_some_and(|ext| ext == "gz") {
        let mut decoder = GzipDecoder::new(file);
        decoder.multiple_members(true);
        Ok(Box::new(decoder))
    } else {
        Ok(Box::new(file))
    }
}
