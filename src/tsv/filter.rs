//! Selection of the data file entries that a source is interested in

use crate::{sources::SourceSpec, tsv::Entry, Year};
use regex::Regex;

/// Lowercase letters of the French alphabet, accents included
const NOUN_LETTERS: &str = "a-záàâäãåçéèêëíìîïñóòôöõúùûüýÿæœ";

/// Build the pattern of the 2-grams that a determiner source keeps
///
/// `keep` is a regex fragment matching the determiner itself. The resulting
/// pattern matches the whole ngram: a tagged determiner, a single space, then a
/// tagged lowercase noun.
pub fn keep_regex(keep: &str) -> Result<Regex, regex::Error> {
    // At least one letter: a bare "le_DET _NOUN" has no noun to count
    Regex::new(&format!("^(?:{keep})_DET [{NOUN_LETTERS}]+_NOUN$"))
}

/// Data file entry filter of a determiner source
#[derive(Clone, Debug)]
pub struct RecordMatcher {
    /// Pattern of accepted 2-grams
    pattern: Regex,

    /// Minimal accepted book publication year
    min_year: Year,
}
//
impl RecordMatcher {
    /// Set up the filter of a source
    pub fn new(source: &SourceSpec, min_year: Year) -> Self {
        Self {
            pattern: source.pattern.clone(),
            min_year,
        }
    }

    /// Truth that an entry should be kept
    pub fn matches(&self, entry: &Entry) -> bool {
        /// Reasons why a data file entry could be discarded
        #[derive(Clone, Copy, Debug, Eq, PartialEq)]
        enum RejectCause {
            /// Entry is too old, may not reflect modern language usage
            Old,

            /// Entry is not a determiner followed by a lowercase noun
            Pattern,
        }

        // Determine if an entry should be rejected
        let rejection = if entry.year < self.min_year {
            Some(RejectCause::Old)
        } else if !self.pattern.is_match(&entry.ngram) {
            Some(RejectCause::Pattern)
        } else {
            None
        };

        // Report it in trace logs
        if let Some(rejection) = rejection {
            let cause = match rejection {
                RejectCause::Old => "it's too old",
                RejectCause::Pattern => "it's not a determiner + noun 2-gram",
            };
            log::trace!("Rejected {entry:?} because {cause}");
        }
        rejection.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources;

    fn matcher(name: &str) -> RecordMatcher {
        let sources = sources::builtin().unwrap();
        let source = sources.iter().find(|s| &*s.name == name).unwrap();
        RecordMatcher::new(source, 1980)
    }

    fn entry(ngram: &str, year: Year) -> Entry {
        Entry {
            ngram: ngram.into(),
            year,
            match_count: 600,
            volume_count: 10,
        }
    }

    #[test]
    fn accepts_determiner_and_lowercase_noun() {
        let le = matcher("le");
        assert!(le.matches(&entry("le_DET chien_NOUN", 1990)));
        assert!(le.matches(&entry("Le_DET château_NOUN", 1980)));
        assert!(le.matches(&entry("le_DET cœur_NOUN", 2008)));
        let un = matcher("un");
        assert!(un.matches(&entry("un_DET ami_NOUN", 1990)));
        assert!(un.matches(&entry("Une_DET amie_NOUN", 1990)));
    }

    #[test]
    fn rejects_old_entries() {
        let le = matcher("le");
        assert!(!le.matches(&entry("le_DET chien_NOUN", 1975)));
        assert!(!le.matches(&entry("le_DET chien_NOUN", 1979)));
    }

    #[test]
    fn rejects_other_patterns() {
        let le = matcher("le");
        for ngram in [
            // Other determiners, other casings
            "la_DET chien_NOUN",
            "LE_DET chien_NOUN",
            "les_DET chiens_NOUN",
            // Capitalized, non-alphabetic or empty nouns
            "le_DET Paris_NOUN",
            "le_DET chien2_NOUN",
            "le_DET chien-loup_NOUN",
            "le_DET _NOUN",
            // Other grammar tags
            "le_DET chien_VERB",
            "le_PRON chien_NOUN",
            "le chien",
            // Partial matches
            "xle_DET chien_NOUN",
            "le_DET chien_NOUN ",
            "le_DET  chien_NOUN",
        ] {
            assert!(!le.matches(&entry(ngram, 1990)), "{ngram:?} should be rejected");
        }
    }

    #[test]
    fn un_does_not_accept_other_forms() {
        let un = matcher("un");
        assert!(!un.matches(&entry("unee_DET amie_NOUN", 1990)));
        assert!(!un.matches(&entry("uns_DET amis_NOUN", 1990)));
    }
}
