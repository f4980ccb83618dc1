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

use thiserror::Error;

/// Failure attached to a single decode result.
///
/// These are data, not control flow: the decode loop accumulates them in
/// the result sequence and applies its recovery policy, instead of
/// aborting the whole run for every bad unit.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DecodeFailure {
    /// Not enough bytes were available for one more value unit. An
    /// availability problem, not a content problem.
    #[error("not enough data to decode one more value unit")]
    NoEnoughData,

    /// The unit's bytes could not be decoded into a value. The flow can
    /// usually continue with the next unit.
    #[error("value unit could not be decoded: {0}")]
    Invalid(String),

    /// The decode loop halted because recovery was impossible. Always the
    /// last element of a result sequence when present.
    #[error("decode flow stopped, recovery is impossible")]
    FlowStop,

    /// A codec failed outright instead of reporting the problem through a
    /// result value. Terminal for the decode run.
    #[error("codec failed: {0}")]
    Fatal(String),
}

impl DecodeFailure {
    /// Checks if this is the availability (rather than content) failure.
    pub fn is_no_enough_data(&self) -> bool {
        matches!(self, DecodeFailure::NoEnoughData)
    }

    /// Checks if this failure terminated the decode flow.
    pub fn is_flow_stop(&self) -> bool {
        matches!(self, DecodeFailure::FlowStop)
    }
}

/// Outcome of decoding one value unit.
///
/// `offset` is the position of the unit's binary representation from the
/// start of the buffer or stream and `binary_length` the number of bytes
/// that representation occupies. On failure `value` is absent and `error`
/// describes what went wrong; for [`DecodeFailure::NoEnoughData`] the
/// `binary_length` holds the number of bytes that were actually available.
/// A decode result is never mutated after creation.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodeResult<T> {
    /// The decoded value, absent when the unit failed to decode.
    pub value: Option<T>,
    /// Offset of the unit's binary representation.
    pub offset: u64,
    /// Length of the unit's binary representation in bytes.
    pub binary_length: u64,
    /// What went wrong, if anything.
    pub error: Option<DecodeFailure>,
}

impl<T> DecodeResult<T> {
    /// A successfully decoded unit.
    pub fn value(value: T, offset: u64, binary_length: u64) -> DecodeResult<T> {
        DecodeResult {
            value: Some(value),
            offset,
            binary_length,
            error: None,
        }
    }

    /// A failed unit.
    pub fn failure(error: DecodeFailure, offset: u64, binary_length: u64) -> DecodeResult<T> {
        DecodeResult {
            value: None,
            offset,
            binary_length,
            error: Some(error),
        }
    }

    /// Checks if the unit decoded successfully.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let ok = DecodeResult::value(42u32, 8, 4);
        assert!(ok.is_ok());
        assert_eq!(ok.value, Some(42));
        assert_eq!(ok.offset, 8);
        assert_eq!(ok.binary_length, 4);

        let bad: DecodeResult<u32> = DecodeResult::failure(DecodeFailure::NoEnoughData, 12, 2);
        assert!(!bad.is_ok());
        assert!(bad.value.is_none());
        assert!(bad.error.as_ref().unwrap().is_no_enough_data());
    }

    #[test]
    fn test_failure_display() {
        assert_eq!(
            DecodeFailure::FlowStop.to_string(),
            "decode flow stopped, recovery is impossible"
        );
        assert_eq!(
            DecodeFailure::Invalid("bad byte".into()).to_string(),
            "value unit could not be decoded: bad byte"
        );
    }
}
