use rayon::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::trace;

use crate::error::{Error, Result};
use crate::index::CorpusIndex;
use crate::table::common_prefix_len;

/// Minimum overlap a corpus string must share with a query to be reported.
///
/// At least one floor must be set. When both are set, an overlap has to clear
/// both of them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Thresholds {
    /// Absolute minimum overlap length, in chars.
    pub min_overlap_chars: Option<usize>,
    /// Minimum overlap as a fraction of the query length, in `(0, 1]`.
    pub min_overlap_pct: Option<f64>,
}

impl Thresholds {
    pub fn new(min_overlap_chars: Option<usize>, min_overlap_pct: Option<f64>) -> Self {
        Thresholds {
            min_overlap_chars,
            min_overlap_pct,
        }
    }

    pub fn chars(min_overlap_chars: usize) -> Self {
        Self::new(Some(min_overlap_chars), None)
    }

    pub fn pct(min_overlap_pct: f64) -> Self {
        Self::new(None, Some(min_overlap_pct))
    }

    pub fn with_chars(mut self, min_overlap_chars: usize) -> Self {
        self.min_overlap_chars = Some(min_overlap_chars);
        self
    }

    pub fn with_pct(mut self, min_overlap_pct: f64) -> Self {
        self.min_overlap_pct = Some(min_overlap_pct);
        self
    }

    pub fn validate(&self) -> Result<()> {
        match (self.min_overlap_chars, self.min_overlap_pct) {
            (None, None) => Err(Error::Config(
                "one of min_overlap_chars or min_overlap_pct is required".into(),
            )),
            (Some(0), _) => Err(Error::Config("min_overlap_chars must be at least 1".into())),
            (_, Some(p)) if !(p > 0.0 && p <= 1.0) => Err(Error::Config(format!(
                "min_overlap_pct must be in (0, 1], got {p}"
            ))),
            _ => Ok(()),
        }
    }

    /// Whether an overlap of `len` chars with a query of `query_len` chars
    /// clears every floor that is set. Zero-length overlaps never do.
    pub fn admits(&self, len: usize, query_len: usize) -> bool {
        len > 0
            && self.min_overlap_chars.map_or(true, |k| len >= k)
            && self
                .min_overlap_pct
                .map_or(true, |p| query_len > 0 && len as f64 / query_len as f64 >= p)
    }

    /// Smallest overlap admitted for a query of `query_len` chars, if any.
    pub fn floor(&self, query_len: usize) -> Option<usize> {
        let start = self.min_overlap_chars.unwrap_or(1).max(1);
        (start..=query_len).find(|&len| self.admits(len, query_len))
    }
}

impl CorpusIndex {
    /// Maps every corpus string whose longest common substring with `query`
    /// clears `thresholds` to the length of that substring, in chars.
    ///
    /// Each query suffix is located in the sorted suffix order by binary
    /// search. Corpus suffixes on either side of that point are scanned
    /// outwards while the running minimum of the LCP array stays at or above
    /// the floor, so every string reaching the floor for that query suffix is
    /// seen with its exact common prefix.
    pub fn similar(&self, query: &str, thresholds: &Thresholds) -> Result<HashMap<usize, usize>> {
        thresholds.validate()?;
        Ok(self.similar_unchecked(query, thresholds))
    }

    /// [`CorpusIndex::similar`] with the thresholds passed separately.
    pub fn similar_with(
        &self,
        query: &str,
        min_overlap_chars: Option<usize>,
        min_overlap_pct: Option<f64>,
    ) -> Result<HashMap<usize, usize>> {
        self.similar(query, &Thresholds::new(min_overlap_chars, min_overlap_pct))
    }

    /// Runs [`CorpusIndex::similar`] for every query in parallel.
    pub fn batch_similar<S>(
        &self,
        queries: &[S],
        thresholds: &Thresholds,
    ) -> Result<Vec<HashMap<usize, usize>>>
    where
        S: AsRef<str> + Sync,
    {
        thresholds.validate()?;
        Ok(queries
            .par_iter()
            .map(|query| self.similar_unchecked(query.as_ref(), thresholds))
            .collect())
    }

    fn similar_unchecked(&self, query: &str, thresholds: &Thresholds) -> HashMap<usize, usize> {
        let query = self.alphabet().encode(query);
        let floor = match thresholds.floor(query.len()) {
            Some(floor) => floor,
            None => return HashMap::new(),
        };

        // Query suffixes shorter than the floor can't produce a match.
        let mut best = (0..=query.len() - floor)
            .into_par_iter()
            .fold(HashMap::new, |mut acc, start| {
                self.neighborhood(&query[start..], floor, &mut acc);
                acc
            })
            .reduce(HashMap::new, merge_max);

        best.retain(|_, len| thresholds.admits(*len, query.len()));
        trace!(query_len = query.len(), floor, matches = best.len(), "similar");
        best
    }

    /// Records, for every suffix sharing at least `floor` symbols with
    /// `query` in sorted order around its insertion point, the common prefix
    /// length against the suffix's owner.
    fn neighborhood(&self, query: &[u32], floor: usize, best: &mut HashMap<usize, usize>) {
        let table = self.table();
        let point = table.insertion_point(query);

        if point < table.len() {
            let mut k = point;
            let mut pcl = common_prefix_len(query, table.suffix(k));
            while pcl >= floor {
                record(best, self.owner(k), pcl);
                k += 1;
                if k == table.len() {
                    break;
                }
                pcl = pcl.min(table.lcp(k));
            }
        }

        if point > 0 {
            let mut k = point - 1;
            let mut pcl = common_prefix_len(query, table.suffix(k));
            while pcl >= floor {
                record(best, self.owner(k), pcl);
                if k == 0 {
                    break;
                }
                pcl = pcl.min(table.lcp(k));
                k -= 1;
            }
        }
    }
}

#[inline]
fn record(best: &mut HashMap<usize, usize>, string: usize, pcl: usize) {
    let current = best.entry(string).or_insert(0);
    *current = (*current).max(pcl);
}

fn merge_max(mut a: HashMap<usize, usize>, b: HashMap<usize, usize>) -> HashMap<usize, usize> {
    for (string, pcl) in b {
        record(&mut a, string, pcl);
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hello_bella() -> CorpusIndex {
        CorpusIndex::new(["hello", "bella"]).unwrap()
    }

    fn map(pairs: &[(usize, usize)]) -> HashMap<usize, usize> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn similar_scenarios() {
        let index = hello_bella();
        let cases: &[(&str, Option<usize>, Option<f64>, &[(usize, usize)])] = &[
            ("ell", Some(3), None, &[(0, 3), (1, 3)]),
            ("hell", Some(3), None, &[(0, 4), (1, 3)]),
            ("yello", Some(4), None, &[(0, 4)]),
            ("xyz", Some(1), None, &[]),
            ("hell", None, Some(0.8), &[(0, 4)]),
            ("ell", Some(3), Some(0.1), &[(0, 3), (1, 3)]),
            ("all", Some(3), Some(0.1), &[]),
        ];
        for &(query, chars, pct, expected) in cases {
            assert_eq!(
                index.similar_with(query, chars, pct).unwrap(),
                map(expected),
                "{query} {chars:?} {pct:?}"
            );
        }
    }

    #[test]
    fn no_thresholds_is_a_config_error() {
        let index = CorpusIndex::new(["hello", "bello"]).unwrap();
        assert!(matches!(index.similar_with("abc", None, None), Err(Error::Config(_))));
    }

    #[test]
    fn invalid_thresholds_are_rejected() {
        for thresholds in [
            Thresholds::chars(0),
            Thresholds::pct(0.0),
            Thresholds::pct(1.5),
            Thresholds::pct(f64::NAN),
            Thresholds::chars(2).with_pct(-0.1),
        ] {
            assert!(matches!(thresholds.validate(), Err(Error::Config(_))), "{thresholds:?}");
        }
        assert!(Thresholds::pct(1.0).validate().is_ok());
    }

    #[test]
    fn floor_combines_both_thresholds() {
        assert_eq!(Thresholds::chars(3).floor(10), Some(3));
        assert_eq!(Thresholds::pct(0.8).floor(4), Some(4));
        assert_eq!(Thresholds::pct(0.5).floor(5), Some(3));
        assert_eq!(Thresholds::chars(2).with_pct(0.5).floor(10), Some(5));
        assert_eq!(Thresholds::chars(6).floor(5), None);
        assert_eq!(Thresholds::pct(0.5).floor(0), None);
    }

    #[test]
    fn empty_query_matches_nothing() {
        let index = hello_bella();
        assert!(index.similar("", &Thresholds::chars(1)).unwrap().is_empty());
        assert!(index.similar("", &Thresholds::pct(1.0)).unwrap().is_empty());
    }

    #[test]
    fn empty_strings_are_never_reported() {
        let index = CorpusIndex::new(["", "abc", ""]).unwrap();
        assert_eq!(index.similar("abc", &Thresholds::chars(1)).unwrap(), map(&[(1, 3)]));
    }

    #[test]
    fn duplicates_are_reported_separately() {
        let index = CorpusIndex::new(["abcd", "xbcx", "abcd"]).unwrap();
        assert_eq!(
            index.similar("zabcz", &Thresholds::chars(2)).unwrap(),
            map(&[(0, 3), (1, 2), (2, 3)])
        );
    }

    #[test]
    fn overlap_does_not_span_strings() {
        // "loab" only exists across the boundary of "hello" and "abba".
        let index = CorpusIndex::new(["hello", "abba"]).unwrap();
        assert_eq!(index.similar("loab", &Thresholds::chars(1)).unwrap(), map(&[(0, 2), (1, 2)]));
    }

    #[test]
    fn query_longer_than_corpus() {
        let index = CorpusIndex::new(["ab", "b"]).unwrap();
        let got = index.similar("zzzzzzzzabzzzzzzzz", &Thresholds::chars(1)).unwrap();
        assert_eq!(got, map(&[(0, 2), (1, 1)]));
    }

    #[test]
    fn batch_matches_single() {
        let index = hello_bella();
        let queries = ["ell", "hell", "yello", "xyz"];
        let thresholds = Thresholds::chars(3);
        let batch = index.batch_similar(&queries, &thresholds).unwrap();
        for (query, got) in queries.iter().zip(batch) {
            assert_eq!(got, index.similar(query, &thresholds).unwrap());
        }
        assert!(index.batch_similar(&queries, &Thresholds::default()).is_err());
    }

    #[test]
    fn thresholds_deserialize() {
        let thresholds: Thresholds =
            serde_json::from_str(r#"{"min_overlap_chars": 3, "min_overlap_pct": 0.5}"#).unwrap();
        assert_eq!(thresholds, Thresholds::chars(3).with_pct(0.5));

        let thresholds: Thresholds = serde_json::from_str(r#"{"min_overlap_pct": 0.5}"#).unwrap();
        assert_eq!(thresholds, Thresholds::pct(0.5));
    }
}
