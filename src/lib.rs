pub mod error;
pub mod index;
pub mod similar;
pub mod table;
pub mod text;

pub use error::{Error, Result};
pub use index::{CorpusIndex, Occurrence};
pub use similar::Thresholds;
pub use table::SuffixTable;

/// Python bindings
#[cfg(feature = "python")]
mod bindings;

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
#[pymodule]
fn generalized_suffix_array(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<bindings::corpus_index::PyCorpusIndex>()?;
    Ok(())
}
