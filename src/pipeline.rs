//! Noun extraction across all determiner sources

use crate::{
    config::Config,
    progress::ChunkObserver,
    sources::SourceSpec,
    stats::NounCounts,
    table::{self, ResultRow},
    tsv, Result,
};
use anyhow::Context;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Extract the output table rows from all sources
///
/// `observe` is called once per source to set up the tracking of that
/// source's progress.
pub async fn run<O: ChunkObserver>(
    config: Arc<Config>,
    observe: impl FnMut(&SourceSpec) -> O,
) -> Result<Vec<ResultRow>> {
    let counts = collect(config.clone(), observe).await?;
    Ok(table::finalize(counts, config.min_count))
}

/// Aggregate and merge the statistics of all sources
///
/// Sources are processed concurrently, unless configured otherwise. Either way,
/// the result is only available once every source has been fully processed.
pub async fn collect<O: ChunkObserver>(
    config: Arc<Config>,
    mut observe: impl FnMut(&SourceSpec) -> O,
) -> Result<NounCounts> {
    let mut counts = NounCounts::new();
    let context = |source: &SourceSpec| format!("processing source {:?}", source.name);

    // Process sources in order, one at a time
    if config.sequential {
        for source in config.sources.iter() {
            let source_counts =
                tsv::aggregate_source(config.clone(), source.clone(), observe(source))
                    .await
                    .with_context(|| context(source))?;
            counts.merge(source_counts);
        }
        return Ok(counts);
    }

    // Start processing all the sources
    let mut source_tasks = JoinSet::new();
    for source in config.sources.iter() {
        let observer = observe(source);
        let config = config.clone();
        let source = source.clone();
        source_tasks.spawn(async move {
            let source_context = context(&source);
            tsv::aggregate_source(config, source, observer)
                .await
                .context(source_context)
        });
    }

    // Merge statistics from sources as they finish
    while let Some(source_counts) = source_tasks.join_next().await {
        counts.merge(source_counts.context("collecting results from one source")??);
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::tests::test_config,
        decompose::Gender,
        error::Error,
        tsv::tests::write_tsv,
    };
    use std::path::Path;

    /// Write small data files for all built-in sources
    fn write_corpus(dir: &Path) {
        write_tsv(
            &dir.join("2gram-le.tsv"),
            &[
                ("le_DET chien_NOUN", 1990, 600),
                ("le_DET chien_NOUN", 1975, 10_000),
                ("Le_DET livre_NOUN", 2000, 300),
                ("le_DET Paris_NOUN", 2000, 90_000),
                ("le_DET pain_NOUN", 1980, 499),
            ],
        );
        write_tsv(
            &dir.join("2gram-la.tsv"),
            &[
                ("la_DET livre_NOUN", 2001, 500),
                ("la_DET maison_NOUN", 1985, 250),
                ("La_DET maison_NOUN", 1986, 250),
                ("la_DET maison_VERB", 1986, 9_999),
            ],
        );
        write_tsv(
            &dir.join("2gram-du.tsv"),
            &[("du_DET pain_NOUN", 1999, 1), ("du_DET chien_NOUN", 1999, 1)],
        );
        write_tsv(
            &dir.join("2gram-un.tsv"),
            &[
                ("un_DET livre_NOUN", 2005, 200),
                ("une_DET amie_NOUN", 2005, 700),
                ("Une_DET amie_NOUN", 1979, 700),
            ],
        );
    }

    fn row(noun: &str, gender: Gender, count: u64) -> ResultRow {
        ResultRow {
            noun: noun.into(),
            gender,
            count,
        }
    }

    #[tokio::test]
    async fn extracts_nouns_from_all_sources() {
        let dir = tempfile::tempdir().unwrap();
        write_corpus(dir.path());
        let config = Arc::new(test_config(dir.path(), 2, 500));
        let rows = run(config, |_| ()).await.unwrap();
        assert_eq!(
            rows,
            [
                row("amie", Gender::Feminine, 700),
                row("chien", Gender::Masculine, 601),
                row("livre", Gender::Feminine, 500),
                row("livre", Gender::Masculine, 500),
                row("maison", Gender::Feminine, 500),
                row("pain", Gender::Masculine, 500),
            ]
        );
    }

    #[tokio::test]
    async fn global_counts_are_the_sum_of_source_counts() {
        let dir = tempfile::tempdir().unwrap();
        write_corpus(dir.path());
        let config = Arc::new(test_config(dir.path(), 3, 1));
        let global = collect(config.clone(), |_| ()).await.unwrap();
        let mut per_source_total = 0;
        for source in config.sources.iter() {
            per_source_total += tsv::aggregate_source(config.clone(), source.clone(), ())
                .await
                .unwrap()
                .total();
        }
        assert_eq!(global.total(), per_source_total);
        assert_eq!(global.total(), 600 + 300 + 499 + 500 + 500 + 2 + 200 + 700);
    }

    #[tokio::test]
    async fn sequential_and_concurrent_runs_agree() {
        let dir = tempfile::tempdir().unwrap();
        write_corpus(dir.path());
        let concurrent = Arc::new(test_config(dir.path(), 2, 1));
        let sequential = Arc::new(Config {
            sequential: true,
            ..(*concurrent).clone()
        });
        assert_eq!(
            run(concurrent, |_| ()).await.unwrap(),
            run(sequential, |_| ()).await.unwrap()
        );
    }

    #[tokio::test]
    async fn runs_are_reproducible() {
        let dir = tempfile::tempdir().unwrap();
        write_corpus(dir.path());
        let config = Arc::new(test_config(dir.path(), 2, 1));

        let mut outputs = Vec::new();
        for _ in 0..2 {
            let rows = run(config.clone(), |_| ()).await.unwrap();
            table::write_file(&config.output, &rows).await.unwrap();
            outputs.push(std::fs::read(&config.output).unwrap());
        }
        assert_eq!(outputs[0], outputs[1]);
    }

    #[tokio::test]
    async fn one_failing_source_fails_the_run() {
        let dir = tempfile::tempdir().unwrap();
        write_corpus(dir.path());
        std::fs::remove_file(dir.path().join("2gram-du.tsv")).unwrap();
        for sequential in [false, true] {
            let config = Arc::new(Config {
                sequential,
                ..test_config(dir.path(), 2, 1)
            });
            let err = run(config, |_| ()).await.unwrap_err();
            assert!(format!("{err:#}").contains("\"du\""), "{err:#}");
            assert!(matches!(
                err.downcast_ref::<Error>(),
                Some(Error::OpenInput { .. })
            ));
        }
    }
}
