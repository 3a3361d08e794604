use rayon::prelude::*;
use std::fmt;
use std::time::Instant;
use tracing::debug;

use crate::error::{Error, Result};
use crate::table::SuffixTable;
use crate::text::{concatenate, Alphabet};

/// Where a substring occurs in the corpus: the string index and the char
/// offset inside that string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Occurrence {
    pub string: usize,
    pub offset: usize,
}

/// A generalized suffix array over an immutable corpus of strings.
///
/// Every corpus string is terminated by its own sentinel before the suffix
/// table is built, so no common prefix ever runs from one string into the
/// next. The index is read-only after construction and can be shared across
/// threads.
pub struct CorpusIndex {
    strings: Vec<String>,
    alphabet: Alphabet,
    offsets: Box<[usize]>,
    table: SuffixTable,
    owners: Box<[usize]>,
}

impl CorpusIndex {
    pub fn new<I, S>(strings: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let strings: Vec<String> = strings.into_iter().map(Into::into).collect();
        if strings.is_empty() {
            return Err(Error::EmptyCorpus);
        }

        let start = Instant::now();
        let alphabet = Alphabet::new(strings.len())?;
        let (text, offsets) = concatenate(&alphabet, &strings);
        let table = SuffixTable::new(text);
        debug_assert!(table.is_sorted());

        // String `i` spans `offsets[i]..offsets[i + 1]`, its sentinel included.
        let owners: Box<[usize]> = table
            .table()
            .par_iter()
            .map(|&sufi| offsets.partition_point(|&o| o <= sufi) - 1)
            .collect::<Vec<_>>()
            .into();

        debug!(
            strings = strings.len(),
            symbols = table.len(),
            elapsed = ?start.elapsed(),
            "built generalized suffix array"
        );

        Ok(CorpusIndex {
            strings,
            alphabet,
            offsets,
            table,
            owners,
        })
    }

    /// Returns the corpus string at index `i`, unchanged.
    pub fn get(&self, i: usize) -> Result<&str> {
        self.strings
            .get(i)
            .map(String::as_str)
            .ok_or(Error::OutOfRange {
                index: i,
                len: self.strings.len(),
            })
    }

    /// Number of corpus strings.
    #[inline]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Always `false`: an index cannot be built over an empty corpus.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    #[inline]
    pub fn strings(&self) -> &[String] {
        &self.strings
    }

    #[inline]
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    #[inline]
    pub fn table(&self) -> &SuffixTable {
        &self.table
    }

    /// The encoded suffix at sorted position `k`, running to the end of the
    /// concatenated text.
    #[inline]
    pub fn suffix(&self, k: usize) -> &[u32] {
        self.table.suffix(k)
    }

    /// Corpus string that contains the suffix at sorted position `k`.
    #[inline]
    pub fn owner(&self, k: usize) -> usize {
        self.owners[k]
    }

    #[inline]
    pub fn owners(&self) -> &[usize] {
        &self.owners
    }

    #[inline]
    pub fn lcp(&self, k: usize) -> usize {
        self.table.lcp(k)
    }

    /// Start offset of every corpus string in the concatenated text, followed
    /// by the text length.
    #[inline]
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    pub fn is_sorted(&self) -> bool {
        self.table.is_sorted()
    }

    /// Returns true if `query` occurs inside some corpus string.
    pub fn contains(&self, query: &str) -> bool {
        self.table.contains(&self.alphabet.encode(query))
    }

    /// Every place `query` occurs in the corpus, ordered by string then offset.
    pub fn occurrences(&self, query: &str) -> Vec<Occurrence> {
        let (start, end) = self.table.boundaries(&self.alphabet.encode(query));
        let mut found: Vec<Occurrence> = (start..end)
            .map(|k| {
                let string = self.owners[k];
                Occurrence {
                    string,
                    offset: self.table.table()[k] - self.offsets[string],
                }
            })
            .collect();
        found.sort_unstable();
        found
    }
}

impl fmt::Debug for CorpusIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "\n-----------------------------------------")?;
        writeln!(f, "GENERALIZED SUFFIX ARRAY ({} strings)", self.len())?;
        for k in 0..self.table.len() {
            let string = self.owners[k];
            writeln!(
                f,
                "{} [{}+{}] lcp {} {}",
                k,
                string,
                self.table.table()[k] - self.offsets[string],
                self.table.lcp(k),
                self.alphabet.render(self.suffix(k)),
            )?;
        }
        writeln!(f, "-----------------------------------------")
    }
}
