use thiserror::Error;

use crate::value::Kind;

/// Errors raised by map and set operations.
///
/// Comparisons fail before the container is touched, so an `Err` never leaves a map or set
/// half-modified.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
#[non_exhaustive]
pub enum Error {
    /// The natural ordering was asked to compare keys of two different kinds.
    ///
    /// ```
    /// use somap::{Error, Kind, SoMap, Value};
    ///
    /// let mut map = SoMap::new();
    /// map.set(Value::from(1), "one").unwrap();
    ///
    /// let err = map.set(Value::from("1"), "one").unwrap_err();
    /// assert_eq!(err, Error::TypeMismatch { left: Kind::String, right: Kind::Number });
    /// assert_eq!(map.len(), 1);
    /// ```
    #[error("keys are not of the same kind: `{left}` cannot be ordered against `{right}`")]
    TypeMismatch {
        /// Kind of the key being inserted or looked up.
        left: Kind,
        /// Kind of the stored key it was compared against.
        right: Kind,
    },
}

/// `Result` with this crate's [`Error`] as the default error type.
pub type Result<T, E = Error> = core::result::Result<T, E>;
