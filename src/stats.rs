//! Noun usage statistics

use crate::{
    add_counts,
    decompose::{DecomposedRecord, Gender},
    MatchCount,
};
use std::collections::{hash_map, HashMap};

/// Accumulated match counts, keyed by noun and gender
///
/// This is used both for the statistics of a single source, which are built
/// one record at a time with [`add_record()`](Self::add_record), and for the
/// statistics of all sources, which are built by [`merge()`](Self::merge)-ing
/// the statistics of each source.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct NounCounts(HashMap<(Box<str>, Gender), MatchCount>);
//
impl NounCounts {
    /// Set up the accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Integrate a new record
    pub fn add_record(&mut self, record: DecomposedRecord) {
        let DecomposedRecord {
            noun,
            gender,
            match_count,
        } = record;
        self.add((noun, gender), match_count);
    }

    /// Merge statistics from another source into these ones
    ///
    /// Nouns that are known to both sides get the sum of both match counts.
    pub fn merge(&mut self, other: NounCounts) {
        // Iterate over the smallest map, insert into the largest one
        let other = if other.len() > self.len() {
            std::mem::replace(self, other)
        } else {
            other
        };
        for (key, match_count) in other.0 {
            self.add(key, match_count);
        }
    }

    /// Number of distinct noun/gender pairs
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Truth that no noun was recorded
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Match count of a noun with a certain gender, zero if it was never seen
    #[cfg(test)]
    pub fn get(&self, noun: &str, gender: Gender) -> MatchCount {
        self.0.get(&(noun.into(), gender)).copied().unwrap_or(0)
    }

    /// Sum of all match counts
    pub fn total(&self) -> MatchCount {
        self.0.values().copied().fold(0, add_counts)
    }

    /// Extract the raw (noun, gender) → match count table
    pub fn into_inner(self) -> HashMap<(Box<str>, Gender), MatchCount> {
        self.0
    }

    /// Add occurences to a noun/gender pair
    fn add(&mut self, key: (Box<str>, Gender), match_count: MatchCount) {
        match self.0.entry(key) {
            hash_map::Entry::Occupied(o) => {
                let o = o.into_mut();
                *o = add_counts(*o, match_count);
            }
            hash_map::Entry::Vacant(v) => {
                v.insert(match_count);
            }
        }
    }
}
//
impl FromIterator<DecomposedRecord> for NounCounts {
    fn from_iter<I: IntoIterator<Item = DecomposedRecord>>(iter: I) -> Self {
        let mut counts = Self::new();
        for record in iter {
            counts.add_record(record);
        }
        counts
    }
}
