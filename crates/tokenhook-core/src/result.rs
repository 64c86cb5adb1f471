//! Tagged outcome of one asynchronous contract call.

use std::error::Error;
use std::fmt;

use crate::normalize::{normalize, NormalizedError};

/// Outcome of a write call: either the transaction handle or the
/// normalized failure. Never both.
#[derive(Debug, Clone, PartialEq)]
pub enum CallResult<T> {
    /// The call was accepted by the network.
    Transaction(T),
    /// The call failed.
    Error(NormalizedError),
}

impl<T> CallResult<T> {
    /// Captures a `Result`, normalizing the error side.
    pub fn from_result<E>(result: Result<T, E>) -> Self
    where
        E: Into<Box<dyn Error + Send + Sync>> + 'static,
    {
        match result {
            Ok(tx) => Self::Transaction(tx),
            Err(e) => Self::Error(normalize(e)),
        }
    }

    /// The transaction handle, if the call succeeded.
    pub fn transaction(&self) -> Option<&T> {
        match self {
            Self::Transaction(tx) => Some(tx),
            Self::Error(_) => None,
        }
    }

    /// The normalized error, if the call failed.
    pub fn error(&self) -> Option<&NormalizedError> {
        match self {
            Self::Transaction(_) => None,
            Self::Error(e) => Some(e),
        }
    }

    /// Short outcome tag, `"transaction"` or `"error"`.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Transaction(_) => "transaction",
            Self::Error(_) => "error",
        }
    }

    /// Converts into a standard `Result`.
    pub fn into_result(self) -> Result<T, NormalizedError> {
        match self {
            Self::Transaction(tx) => Ok(tx),
            Self::Error(e) => Err(e),
        }
    }
}

impl<T: fmt::Display> fmt::Display for CallResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transaction(tx) => write!(f, "transaction {tx}"),
            Self::Error(e) => write!(f, "error: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_sets_only_transaction() {
        let result: CallResult<u64> = CallResult::from_result(Ok::<_, std::io::Error>(7));
        assert_eq!(result.transaction(), Some(&7));
        assert!(result.error().is_none());
        assert_eq!(result.outcome(), "transaction");
    }

    #[test]
    fn failure_sets_only_error() {
        let result: CallResult<u64> = CallResult::from_result(Err("nonce too low"));
        assert!(result.transaction().is_none());
        assert_eq!(result.error().unwrap().message(), "nonce too low");
        assert_eq!(result.to_string(), "error: nonce too low");
    }

    #[test]
    fn into_result_keeps_error() {
        let result: CallResult<u64> = CallResult::Error(NormalizedError::new("x"));
        assert_eq!(result.into_result().unwrap_err().message(), "x");
        assert_eq!(CallResult::Transaction(3u64).into_result(), Ok(3));
    }
}
