//! Processing pipeline configuration

use crate::{sources::SourceSpec, Args, Year};
use std::{num::NonZeroU64, path::PathBuf, sync::Arc};

/// Number of rows that are read from a data file at once
///
/// This is the granularity of progress reporting and the bound on how many raw
/// records are resident in memory per source.
pub const CHUNK_ROWS: usize = 99_999;

/// Final process configuration
///
/// This is the result of combining digested [`Args`] with the validated source
/// table. Please refer to [`Args`] to know more about common fields.
#[allow(missing_docs)]
#[derive(Clone, Debug)]
pub struct Config {
    /// Where the data files of the sources are located
    pub input_dir: PathBuf,

    /// Data file name, with `%s` standing for the source name
    pub name_template: Box<str>,

    /// Determiner sources, in processing order
    pub sources: Box<[SourceSpec]>,

    /// Number of rows per data file chunk
    pub chunk_rows: usize,

    // Other fields have the same meaning as in Args
    pub output: PathBuf,
    pub min_year: Year,
    pub min_count: NonZeroU64,
    pub sequential: bool,
}
//
impl Config {
    /// Determine process configuration from initialization products
    pub(crate) fn new(args: Args, sources: Box<[SourceSpec]>) -> Arc<Self> {
        let input_dir = args.input_dir();
        let Args {
            input_dir: _,
            name_template,
            output,
            min_year,
            min_count,
            sources: _,
            sequential,
        } = args;
        Arc::new(Self {
            input_dir,
            name_template,
            sources,
            chunk_rows: CHUNK_ROWS,
            output,
            min_year,
            min_count,
            sequential,
        })
    }

    /// Location of the data file associated with a source
    pub fn input_path(&self, source: &SourceSpec) -> PathBuf {
        self.input_dir
            .join(self.name_template.replace("%s", &source.name))
    }
}
