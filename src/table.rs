//! Final noun table: thresholding, ordering and serialization

use crate::{decompose::Gender, stats::NounCounts, MatchCount, Result};
use anyhow::Context;
use csv_async::AsyncWriterBuilder;
use rayon::prelude::*;
use serde::Serialize;
use std::{num::NonZeroU64, path::Path};
use tokio::{
    fs::{self, File},
    io::{AsyncWrite, AsyncWriteExt, BufWriter},
};

/// Header line of the output table
const HEADER: &[u8] = b"noun\tgender\tcount\n";

/// Row of the output table
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ResultRow {
    pub noun: Box<str>,
    pub gender: Gender,
    pub count: MatchCount,
}

/// Turn the statistics of all sources into output table rows
///
/// Noun/gender pairs that were seen less than `min_count` times are dropped,
/// the others are sorted by noun then gender. Nouns are compared by code
/// point, so the order doesn't depend on the system locale.
pub fn finalize(counts: NounCounts, min_count: NonZeroU64) -> Vec<ResultRow> {
    let num_pairs = counts.len();
    let mut rows = (counts.into_inner().into_par_iter())
        .filter(|(_key, count)| *count >= min_count.get())
        .map(|((noun, gender), count)| ResultRow {
            noun,
            gender,
            count,
        })
        .collect::<Vec<_>>();
    log::info!(
        "Kept {}/{num_pairs} noun/gender pairs seen at least {min_count} times",
        rows.len()
    );

    // Noun/gender pairs are unique, so an unstable sort is deterministic
    rows.par_sort_unstable_by(|a, b| a.noun.cmp(&b.noun).then(a.gender.cmp(&b.gender)));
    rows
}

/// Serialize output table rows as TSV
pub async fn write_rows<W: AsyncWrite + Send + Unpin>(mut output: W, rows: &[ResultRow]) -> Result<()> {
    output
        .write_all(HEADER)
        .await
        .context("writing output table header")?;
    let mut serializer = AsyncWriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .create_serializer(output);
    for row in rows {
        serializer
            .serialize(row)
            .await
            .with_context(|| format!("writing output table row {row:?}"))?;
    }
    serializer.flush().await.context("flushing output table")?;
    Ok(())
}

/// Write output table rows to a file
///
/// The table is first written next to its final location, then moved there
/// once complete, so that an interrupted run does not leave a truncated table
/// behind.
pub async fn write_file(path: &Path, rows: &[ResultRow]) -> Result<()> {
    let mut partial_path = path.as_os_str().to_owned();
    partial_path.push(".partial");
    let file = File::create(&partial_path)
        .await
        .with_context(|| format!("creating {}", path.display()))?;
    write_rows(BufWriter::new(file), rows)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    fs::rename(&partial_path, path)
        .await
        .with_context(|| format!("moving finished table to {}", path.display()))?;
    Ok(())
}
