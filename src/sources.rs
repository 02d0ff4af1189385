//! Determiner sources from the French 2-gram dataset
//!
//! Each source is a data file of 2-grams starting with a given determiner. The
//! determiner tells the gender of the noun that follows, and the ngram layout
//! tells where that noun starts, so a source is entirely described by a few
//! character offsets.

use crate::{decompose::Gender, error::Error, tsv::filter, Result};
use anyhow::Context;
use regex::Regex;
use serde::Deserialize;
use std::{collections::HashSet, path::Path, sync::OnceLock};

/// Load a source table from a JSON file
pub async fn load(path: &Path) -> Result<Box<[SourceSpec]>> {
    let json = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading source table {}", path.display()))?;
    let descriptions = serde_json::from_slice::<Vec<SourceDescription>>(&json)
        .map_err(|e| Error::configuration(&path.display().to_string(), e.to_string()))?;
    Ok(validate_all(&descriptions)?)
}

/// Built-in source table, covering "le", "la", "du" and "un"/"une"
pub fn builtin() -> Result<Box<[SourceSpec]>, Error> {
    validate_all(builtin_descriptions())
}

/// Validate a whole source table
pub fn validate_all(descriptions: &[SourceDescription]) -> Result<Box<[SourceSpec]>, Error> {
    if descriptions.is_empty() {
        return Err(Error::configuration("", "the source table is empty"));
    }
    let mut names = HashSet::new();
    descriptions
        .iter()
        .map(|description| {
            let source = SourceSpec::try_from(description)?;
            if !names.insert(source.name.clone()) {
                return Err(Error::configuration(&source.name, "source is listed twice"));
            }
            Ok(source)
        })
        .collect()
}

/// Source description, as written in a source table
///
/// Every field is optional at this stage so that missing fields can be
/// reported with the name of the offending source. Turn this into a
/// [`SourceSpec`] to validate it.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SourceDescription {
    /// Discriminant part of the data file name
    pub name: Option<String>,

    /// Regex fragment matching the determiner, in all accepted casings
    pub keep: Option<String>,

    /// Character position of the gender marker within the ngram
    pub discriminant: Option<usize>,

    /// Value of the gender marker for masculine nouns
    pub masc: Option<String>,

    /// Character position of masculine nouns within the ngram
    pub masc_start: Option<usize>,

    /// Character position of feminine nouns within the ngram
    pub fem_start: Option<usize>,

    /// Expected number of rows in the data file
    pub row_count: Option<u64>,
}

/// Validated description of a determiner source
#[derive(Clone, Debug)]
pub struct SourceSpec {
    /// Discriminant part of the data file name
    pub name: Box<str>,

    /// Regex fragment matching the determiner
    pub keep: Box<str>,

    /// Full-ngram pattern that records from this source should match
    pub pattern: Regex,

    /// Character position of the gender marker within the ngram
    pub discriminant: usize,

    /// Value of the gender marker for masculine nouns
    pub masculine_marker: char,

    /// Genders that may follow the determiner, and where nouns start
    pub layout: GenderLayout,

    /// Expected number of rows in the data file, only used for progress
    /// estimation
    pub row_count: u64,
}
//
impl SourceSpec {
    /// Expected number of data file chunks, for progress estimation
    pub fn estimated_chunks(&self, chunk_rows: usize) -> usize {
        usize::try_from(self.row_count.div_ceil(chunk_rows as u64)).unwrap_or(usize::MAX)
    }
}
//
impl TryFrom<&SourceDescription> for SourceSpec {
    type Error = Error;

    fn try_from(description: &SourceDescription) -> Result<Self, Error> {
        let SourceDescription {
            name,
            keep,
            discriminant,
            masc,
            masc_start,
            fem_start,
            row_count,
        } = description;
        let name = match name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => return Err(Error::configuration("", "missing source name")),
        };
        let missing = |field| Error::configuration(name, format!("missing field \"{field}\""));
        let keep = keep.as_deref().ok_or_else(|| missing("keep"))?;
        let pattern = filter::keep_regex(keep).map_err(|e| {
            Error::configuration(name, format!("invalid determiner pattern {keep:?}: {e}"))
        })?;
        let discriminant = discriminant.ok_or_else(|| missing("discriminant"))?;
        let masc = masc.as_deref().ok_or_else(|| missing("masc"))?;
        let mut marker_chars = masc.chars();
        let (Some(masculine_marker), None) = (marker_chars.next(), marker_chars.next()) else {
            return Err(Error::configuration(
                name,
                format!("masculine marker {masc:?} should be a single character"),
            ));
        };
        let layout = match (*masc_start, *fem_start) {
            (Some(masculine_start), Some(feminine_start)) => GenderLayout::Discriminated {
                masculine_start,
                feminine_start,
            },
            (Some(noun_start), None) => GenderLayout::MasculineOnly { noun_start },
            (None, Some(noun_start)) => GenderLayout::FeminineOnly { noun_start },
            (None, None) => {
                return Err(Error::configuration(
                    name,
                    "at least one of \"masc_start\" and \"fem_start\" is needed",
                ))
            }
        };
        Ok(Self {
            name: name.into(),
            keep: keep.into(),
            pattern,
            discriminant,
            masculine_marker,
            layout,
            row_count: row_count.unwrap_or(0),
        })
    }
}

/// Genders that can follow a determiner, with the associated noun positions
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum GenderLayout {
    /// Only masculine nouns follow this determiner (e.g. "le", "du")
    MasculineOnly { noun_start: usize },

    /// Only feminine nouns follow this determiner (e.g. "la")
    FeminineOnly { noun_start: usize },

    /// The determiner has a masculine and a feminine form (e.g. "un"/"une")
    Discriminated {
        masculine_start: usize,
        feminine_start: usize,
    },
}
//
impl GenderLayout {
    /// Character position where nouns of a given gender start, if this gender
    /// can occur at all
    pub fn noun_start(self, gender: Gender) -> Option<usize> {
        match (self, gender) {
            (Self::MasculineOnly { noun_start }, Gender::Masculine)
            | (Self::FeminineOnly { noun_start }, Gender::Feminine) => Some(noun_start),
            (Self::Discriminated { masculine_start, .. }, Gender::Masculine) => {
                Some(masculine_start)
            }
            (Self::Discriminated { feminine_start, .. }, Gender::Feminine) => Some(feminine_start),
            (Self::MasculineOnly { .. }, Gender::Feminine)
            | (Self::FeminineOnly { .. }, Gender::Masculine) => None,
        }
    }
}

/// Descriptions of the sources used by default, in processing order
fn builtin_descriptions() -> &'static [SourceDescription] {
    static LAZY: OnceLock<Box<[SourceDescription]>> = OnceLock::new();
    LAZY.get_or_init(|| {
        let source = |name: &str, keep: &str, discriminant, masc: &str| SourceDescription {
            name: Some(name.into()),
            keep: Some(keep.into()),
            discriminant: Some(discriminant),
            masc: Some(masc.into()),
            ..SourceDescription::default()
        };
        [
            SourceDescription {
                masc_start: Some(7),
                row_count: Some(249_600_630),
                ..source("le", "[Ll]e", 1, "e")
            },
            // The marker never matches, "la" is always followed by a feminine
            SourceDescription {
                fem_start: Some(7),
                row_count: Some(156_511_945),
                ..source("la", "[Ll]a", 1, "e")
            },
            // The marker always matches, "du" is always followed by a masculine
            SourceDescription {
                masc_start: Some(7),
                row_count: Some(67_674_376),
                ..source("du", "[Dd]u", 1, "u")
            },
            // "un_DET" has an underscore where "une_DET" has an "e"
            SourceDescription {
                masc_start: Some(7),
                fem_start: Some(8),
                row_count: Some(89_455_794),
                ..source("un", "[Uu]ne?", 2, "_")
            },
        ]
        .into_iter()
        .collect()
    })
}
