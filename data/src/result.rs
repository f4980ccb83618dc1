//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Error taxonomy shared by the whole editing core

use thiserror::Error;

/// Result type for core operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Error kinds threaded through sources, spans, chains and codecs.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed call parameters. A caller bug, never retried.
    #[error("invalid function or method arguments: {0}")]
    InvalidArguments(&'static str),

    /// An operation addressed bytes outside the valid range. A caller bug
    /// or a stale offset, never retried.
    #[error("attempt to access data outside valid range")]
    AccessRange,

    /// The underlying source failed. Wraps the lower-level cause and is
    /// surfaced to the caller without automatic retries.
    #[error("I/O error while {operation}: {source}")]
    Io {
        /// Description of the operation that failed
        operation: String,
        /// The lower-level failure
        #[source]
        source: std::io::Error,
    },

    /// An internal invariant was violated. Indicates a bug in the core
    /// itself and is always fatal to the operation.
    #[error("object is in inconsistent state: {0}")]
    ObjectInconsistency(&'static str),

    /// An unsupported codec or variant combination was requested.
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),
}

impl CoreError {
    /// Wraps a `std::io::Error` with a description of the failed operation.
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> CoreError {
        CoreError::Io {
            operation: operation.into(),
            source,
        }
    }

    /// Checks if the error indicates a mistake in how the caller invoked
    /// the API rather than a runtime condition.
    pub fn is_caller_bug(&self) -> bool {
        matches!(
            self,
            CoreError::InvalidArguments(_) | CoreError::AccessRange
        )
    }

    /// Checks if the error originated in the underlying storage.
    pub fn is_io(&self) -> bool {
        matches!(self, CoreError::Io { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::InvalidArguments("span cannot be empty");
        assert_eq!(
            err.to_string(),
            "invalid function or method arguments: span cannot be empty"
        );

        let err = CoreError::AccessRange;
        assert_eq!(err.to_string(), "attempt to access data outside valid range");
    }

    #[test]
    fn test_io_wraps_cause() {
        let cause = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = CoreError::io("opening /tmp/missing", cause);
        assert_eq!(err.to_string(), "I/O error while opening /tmp/missing: gone");
        assert!(err.is_io());
    }

    #[test]
    fn test_error_is_caller_bug() {
        assert!(CoreError::AccessRange.is_caller_bug());
        assert!(CoreError::InvalidArguments("x").is_caller_bug());
        assert!(!CoreError::ObjectInconsistency("x").is_caller_bug());
        assert!(!CoreError::NotImplemented("x").is_caller_bug());
    }
}
