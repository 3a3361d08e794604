use pyo3::exceptions::PyIndexError;
use pyo3::prelude::*;
use std::collections::HashMap;

use crate::index::CorpusIndex;
use crate::similar::Thresholds;

/// A generalized suffix array over a list of strings, answering which strings
/// share a long common substring with a query.
#[pyclass(name = "GeneralizedSuffixArray")]
pub struct PyCorpusIndex {
    index: CorpusIndex,
}

#[pymethods]
impl PyCorpusIndex {
    #[new]
    pub fn new_py(py: Python, strings: Vec<String>) -> PyResult<Self> {
        let index = py.allow_threads(|| CorpusIndex::new(strings))?;
        Ok(PyCorpusIndex { index })
    }

    /// Map from string index to overlap length for every string whose longest
    /// common substring with `query` clears the given thresholds.
    #[pyo3(signature = (query, min_overlap_chars=None, min_overlap_pct=None))]
    pub fn similar(
        &self,
        py: Python,
        query: &str,
        min_overlap_chars: Option<usize>,
        min_overlap_pct: Option<f64>,
    ) -> PyResult<HashMap<usize, usize>> {
        let thresholds = Thresholds::new(min_overlap_chars, min_overlap_pct);
        Ok(py.allow_threads(|| self.index.similar(query, &thresholds))?)
    }

    #[pyo3(signature = (queries, min_overlap_chars=None, min_overlap_pct=None))]
    pub fn batch_similar(
        &self,
        py: Python,
        queries: Vec<String>,
        min_overlap_chars: Option<usize>,
        min_overlap_pct: Option<f64>,
    ) -> PyResult<Vec<HashMap<usize, usize>>> {
        let thresholds = Thresholds::new(min_overlap_chars, min_overlap_pct);
        Ok(py.allow_threads(|| self.index.batch_similar(&queries, &thresholds))?)
    }

    pub fn contains(&self, query: &str) -> bool {
        self.index.contains(query)
    }

    /// `(string, offset)` pairs where `query` occurs.
    pub fn occurrences(&self, query: &str) -> Vec<(usize, usize)> {
        self.index
            .occurrences(query)
            .into_iter()
            .map(|o| (o.string, o.offset))
            .collect()
    }

    pub fn is_sorted(&self) -> bool {
        self.index.is_sorted()
    }

    pub fn __len__(&self) -> usize {
        self.index.len()
    }

    /// Negative indices count from the end, as with Python lists.
    pub fn __getitem__(&self, idx: isize) -> PyResult<String> {
        let len = self.index.len();
        let resolved = if idx < 0 { len as isize + idx } else { idx };
        if resolved < 0 {
            return Err(PyIndexError::new_err(format!(
                "index {idx} out of range for corpus of {len} strings"
            )));
        }
        Ok(self.index.get(resolved as usize)?.to_owned())
    }
}
