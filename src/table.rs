use rayon::prelude::*;
use std::fmt;

/// A suffix table is a sequence of lexicographically sorted suffixes, paired
/// with the longest common prefix of every adjacent pair.
///
/// The text is a sequence of `u32` symbols. Callers that need suffixes never
/// to share a prefix across string boundaries terminate each string with a
/// unique symbol, see [`crate::text::Alphabet`].
#[derive(Clone, PartialEq, Eq)]
pub struct SuffixTable {
    text: Box<[u32]>,
    table: Box<[usize]>,
    lcp: Box<[usize]>,
}

impl SuffixTable {
    /// Creates a new suffix table for `text` by comparison sorting, then derives
    /// the LCP array in `O(n)`.
    pub fn new<S>(src: S) -> Self
    where
        S: Into<Box<[u32]>>,
    {
        let text = src.into();

        // Implicitly store the suffixes using indices into the text and sort
        // them in parallel. Rayon falls back to a sequential sort for small
        // inputs.
        let mut table: Vec<_> = (0..text.len()).collect();
        table.par_sort_unstable_by(|&a, &b| text[a..].cmp(&text[b..]));

        let lcp = lcp_array(&text, &table);
        SuffixTable {
            text,
            table: table.into(),
            lcp,
        }
    }

    /// Builds the table by sorting owned suffix copies. Quadratic memory; only
    /// useful as a reference in tests.
    pub fn new_naive<S>(src: S) -> Self
    where
        S: Into<Box<[u32]>>,
    {
        let text = src.into();
        let mut suffixes: Vec<(Vec<u32>, usize)> = (0..text.len())
            .map(|i| (text[i..].to_vec(), i))
            .collect();
        suffixes.sort();

        let table: Vec<usize> = suffixes.iter().map(|&(_, i)| i).collect();
        let mut lcp = vec![0; table.len()];
        for k in 1..table.len() {
            lcp[k] = common_prefix_len(&suffixes[k - 1].0, &suffixes[k].0);
        }

        SuffixTable {
            text,
            table: table.into(),
            lcp: lcp.into(),
        }
    }

    /// Consumes the suffix table and returns the underlying text, table and LCP array.
    pub fn into_parts(self) -> (Box<[u32]>, Box<[usize]>, Box<[usize]>) {
        (self.text, self.table, self.lcp)
    }

    /// Returns the number of suffixes in the table.
    ///
    /// Alternatively, this is the number of symbols in the text.
    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` iff `self.len() == 0`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn text(&self) -> &[u32] {
        &self.text
    }

    #[inline]
    pub fn table(&self) -> &[usize] {
        &self.table
    }

    #[inline]
    pub fn lcp_array(&self) -> &[usize] {
        &self.lcp
    }

    /// Returns the suffix at sorted position `i`.
    #[inline]
    pub fn suffix(&self, i: usize) -> &[u32] {
        &self.text[self.table[i]..]
    }

    /// Length of the common prefix of the suffixes at sorted positions `i - 1`
    /// and `i`. Zero for `i == 0`.
    #[inline]
    pub fn lcp(&self, i: usize) -> usize {
        self.lcp[i]
    }

    /// Checks if the suffix table is lexicographically sorted. This is always true for valid suffix tables.
    pub fn is_sorted(&self) -> bool {
        self.table
            .par_windows(2)
            .all(|pair| self.text[pair[0]..] <= self.text[pair[1]..])
    }

    /// Returns the first sorted position whose suffix is not less than `query`,
    /// i.e. where `query` would be inserted to keep the table sorted.
    ///
    /// This runs in `O(mlogn)` time, where `m == query.len()` and
    /// `n == self.len()`.
    pub fn insertion_point(&self, query: &[u32]) -> usize {
        binary_search(&self.table, |&sufi| query <= &self.text[sufi..])
    }

    /// Returns true if and only if `query` is in text.
    pub fn contains(&self, query: &[u32]) -> bool {
        !query.is_empty()
            && self
                .table
                .binary_search_by(|&sufi| {
                    self.text[sufi..]
                        .iter()
                        .take(query.len())
                        .cmp(query.iter())
                })
                .is_ok()
    }

    /// Returns an unordered list of positions where `query` starts in `text`.
    pub fn positions(&self, query: &[u32]) -> &[usize] {
        let (start, end) = self.boundaries(query);
        &self.table[start..end]
    }

    /// Determine start and end `table` indices of suffixes that start with `query`.
    pub fn boundaries(&self, query: &[u32]) -> (usize, usize) {
        if self.text.is_empty() || query.is_empty() {
            return (0, 0);
        }

        // Every suffix starting with `query` sorts at or after the insertion
        // point, and they are contiguous. The first one that doesn't start
        // with `query` becomes our upper bound.
        let start = self.insertion_point(query);
        let end = start
            + binary_search(&self.table[start..], |&sufi| {
                !self.text[sufi..].starts_with(query)
            });
        (start, end)
    }
}

impl fmt::Debug for SuffixTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "\n-----------------------------------------")?;
        writeln!(f, "SUFFIX TABLE")?;
        for (rank, &sufstart) in self.table.iter().enumerate() {
            writeln!(f, "suffix[{}] {} lcp {}", rank, sufstart, self.lcp[rank])?;
        }
        writeln!(f, "-----------------------------------------")
    }
}

/// Number of leading symbols `a` and `b` have in common.
#[inline]
pub fn common_prefix_len(a: &[u32], b: &[u32]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// Kasai et al.: walk suffixes in text order, reusing the previous LCP minus
/// one as a lower bound for the next.
fn lcp_array(text: &[u32], table: &[usize]) -> Box<[usize]> {
    let n = text.len();
    let mut rank = vec![0; n];
    for (r, &sufi) in table.iter().enumerate() {
        rank[sufi] = r;
    }

    let mut lcp = vec![0; n];
    let mut height = 0;
    for i in 0..n {
        if rank[i] == 0 {
            height = 0;
            continue;
        }
        let j = table[rank[i] - 1];
        while i + height < n && j + height < n && text[i + height] == text[j + height] {
            height += 1;
        }
        lcp[rank[i]] = height;
        height = height.saturating_sub(1);
    }
    lcp.into()
}

/// Binary search to find first element such that `pred(T) == true`.
///
/// Assumes that if `pred(xs[i]) == true` then `pred(xs[i+1]) == true`.
///
/// If all elements yield `pred(T) == false`, then `xs.len()` is returned.
fn binary_search<T, F>(xs: &[T], mut pred: F) -> usize
where
    F: FnMut(&T) -> bool,
{
    let (mut left, mut right) = (0, xs.len());
    while left < right {
        let mid = (left + right) / 2;
        if pred(&xs[mid]) {
            right = mid;
        } else {
            left = mid + 1;
        }
    }
    left
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols(text: &str) -> Vec<u32> {
        text.chars().map(|c| c as u32).collect()
    }

    fn sa(text: &str) -> SuffixTable {
        SuffixTable::new(symbols(text))
    }

    #[test]
    fn banana_order() {
        let sa = sa("banana");
        assert_eq!(sa.table(), &[5, 3, 1, 0, 4, 2]);
        assert_eq!(sa.lcp_array(), &[0, 1, 3, 0, 0, 2]);
        assert!(sa.is_sorted());
    }

    #[test]
    fn matches_naive() {
        for text in ["", "a", "aa", "mississippi", "tgtgtgtgcaccg", "☃abc☃"] {
            assert_eq!(sa(text), SuffixTable::new_naive(symbols(text)), "{text}");
        }
    }

    #[test]
    fn insertion_point_brackets_query() {
        let sa = sa("banana");
        let p = sa.insertion_point(&symbols("b"));
        assert_eq!(p, 3);
        assert!(sa.suffix(p - 1) < &symbols("b")[..]);
        assert_eq!(sa.insertion_point(&symbols("zzz")), sa.len());
        assert_eq!(sa.insertion_point(&symbols("")), 0);
    }

    #[test]
    fn positions_of_repeats() {
        let sa = sa("zzzzabczzzzzabczzzzzz");
        let mut got = sa.positions(&symbols("abc")).to_vec();
        got.sort();
        assert_eq!(got, vec![4, 12]);
        assert!(sa.contains(&symbols("abc")));
        assert!(!sa.contains(&symbols("abd")));
        assert!(!sa.contains(&[]));
        assert!(sa.positions(&[]).is_empty());
    }

    #[test]
    fn common_prefix_stops_at_mismatch() {
        assert_eq!(common_prefix_len(&[1, 2, 3], &[1, 2, 4]), 2);
        assert_eq!(common_prefix_len(&[1, 2], &[1, 2, 4]), 2);
        assert_eq!(common_prefix_len(&[], &[1]), 0);
    }
}
