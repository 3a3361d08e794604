use pyo3::exceptions::{PyIndexError, PyValueError};
use pyo3::PyErr;

use crate::error::Error;

pub mod corpus_index;

impl From<Error> for PyErr {
    fn from(error: Error) -> Self {
        match error {
            Error::OutOfRange { .. } => PyIndexError::new_err(error.to_string()),
            _ => PyValueError::new_err(error.to_string()),
        }
    }
}
