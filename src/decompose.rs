//! Breakdown of an accepted 2-gram into a noun and its gender

use crate::{error::Error, sources::SourceSpec, tsv::Entry, MatchCount};
use serde::Serialize;

/// Grammar tag that terminates the noun of every accepted 2-gram
const NOUN_TAG: &str = "_NOUN";

/// Grammatical gender of a French noun
///
/// Ordered like the single-letter codes used in the output table.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Gender {
    #[serde(rename = "f")]
    Feminine,
    #[serde(rename = "m")]
    Masculine,
}

/// Noun extracted from a 2-gram, with the 2-gram's statistics
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecomposedRecord {
    pub noun: Box<str>,
    pub gender: Gender,
    pub match_count: MatchCount,
}

/// Break down a 2-gram that was accepted by a source's filter
///
/// The ngram is expected to look like `<determiner>_DET <noun>_NOUN`, and to
/// have been checked for this layout beforehand. Any deviation is reported as
/// a [`Error::MatchInvariantViolation`].
pub fn decompose(source: &SourceSpec, entry: Entry) -> Result<DecomposedRecord, Error> {
    let violation = |reason| Error::MatchInvariantViolation {
        source_name: source.name.clone(),
        ngram: entry.ngram.clone(),
        reason,
    };

    // Find out the gender from the determiner's marker character
    let marker = (entry.ngram.chars().nth(source.discriminant))
        .ok_or_else(|| violation("ngram is too short to contain a gender marker"))?;
    let gender = if marker == source.masculine_marker {
        Gender::Masculine
    } else {
        Gender::Feminine
    };

    // Extract the noun between its start position and the grammar tag
    let noun_start = (source.layout.noun_start(gender))
        .ok_or_else(|| violation("source does not expect this gender"))?;
    let tagged = (entry.ngram.strip_suffix(NOUN_TAG))
        .ok_or_else(|| violation("ngram does not end with a noun tag"))?;
    let (start_idx, _) = (tagged.char_indices().nth(noun_start))
        .ok_or_else(|| violation("ngram is too short to contain a noun"))?;
    let noun = &tagged[start_idx..];
    if noun.contains(['_', ' ']) {
        return Err(violation("noun start position falls before the noun"));
    }

    log::trace!("Decomposed {entry:?} into {gender:?} noun {noun:?}");
    Ok(DecomposedRecord {
        noun: noun.into(),
        gender,
        match_count: entry.match_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources;

    fn source(name: &str) -> SourceSpec {
        (sources::builtin().unwrap().iter())
            .find(|s| &*s.name == name)
            .unwrap()
            .clone()
    }

    fn entry(ngram: &str, match_count: MatchCount) -> Entry {
        Entry {
            ngram: ngram.into(),
            year: 1990,
            match_count,
            volume_count: 1,
        }
    }

    fn decomposed(noun: &str, gender: Gender, match_count: MatchCount) -> DecomposedRecord {
        DecomposedRecord {
            noun: noun.into(),
            gender,
            match_count,
        }
    }

    #[test]
    fn le_yields_masculine_nouns() {
        let le = source("le");
        assert_eq!(
            decompose(&le, entry("le_DET chien_NOUN", 600)).unwrap(),
            decomposed("chien", Gender::Masculine, 600)
        );
        assert_eq!(
            decompose(&le, entry("Le_DET château_NOUN", 3)).unwrap(),
            decomposed("château", Gender::Masculine, 3)
        );
    }

    #[test]
    fn la_yields_feminine_nouns() {
        assert_eq!(
            decompose(&source("la"), entry("La_DET œuvre_NOUN", 42)).unwrap(),
            decomposed("œuvre", Gender::Feminine, 42)
        );
    }

    #[test]
    fn du_yields_masculine_nouns() {
        assert_eq!(
            decompose(&source("du"), entry("du_DET pain_NOUN", 8)).unwrap(),
            decomposed("pain", Gender::Masculine, 8)
        );
    }

    #[test]
    fn un_and_une_are_told_apart() {
        let un = source("un");
        assert_eq!(
            decompose(&un, entry("un_DET ami_NOUN", 5)).unwrap(),
            decomposed("ami", Gender::Masculine, 5)
        );
        assert_eq!(
            decompose(&un, entry("une_DET amie_NOUN", 7)).unwrap(),
            decomposed("amie", Gender::Feminine, 7)
        );
        assert_eq!(
            decompose(&un, entry("Une_DET élève_NOUN", 1)).unwrap(),
            decomposed("élève", Gender::Feminine, 1)
        );
    }

    #[test]
    fn impossible_gender_is_an_invariant_violation() {
        // "le" never yields a feminine, so a marker mismatch is a filter bug
        let err = decompose(&source("le"), entry("lo_DET chien_NOUN", 1)).unwrap_err();
        assert!(matches!(err, Error::MatchInvariantViolation { .. }));
    }

    #[test]
    fn malformed_ngrams_are_invariant_violations() {
        let un = source("un");
        for ngram in ["u", "un_DET ami", "un_DET _NOUN", "un_DET_NOUN"] {
            assert!(
                matches!(
                    decompose(&un, entry(ngram, 1)),
                    Err(Error::MatchInvariantViolation { .. })
                ),
                "{ngram:?} should not be decomposable"
            );
        }
    }

    #[test]
    fn gender_codes_sort_feminine_first() {
        assert!(Gender::Feminine < Gender::Masculine);
    }
}
