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

use crate::codec::{Codec, DecodeContext};
use crate::result::DecodeResult;
use hexide_data::{CoreError, CoreResult};

/// Codec for character encodings with a fixed number of bytes per
/// character, driven by a decode table.
///
/// Only single-byte encodings are implemented: each input byte indexes a
/// 256-entry character table. A table of exactly 128 entries describes the
/// upper half (bytes `0x80..=0xFF`) and is completed with the low-ASCII
/// half; a 256-entry table is used as-is. Any other table length is
/// rejected at construction.
#[derive(Clone, Debug)]
pub struct FixedUnitCharCodec {
    name: String,
    decode_table: Vec<char>,
    unit_size: u64,
    mib_enum: u32,
}

impl FixedUnitCharCodec {
    /// Creates a character codec over `decode_table`.
    ///
    /// Fails with [`CoreError::InvalidArguments`] when `unit_size` is zero
    /// or a single-byte table does not have exactly 128 or 256 entries.
    pub fn new(
        name: impl Into<String>,
        decode_table: &str,
        unit_size: u64,
        mib_enum: u32,
    ) -> CoreResult<FixedUnitCharCodec> {
        if unit_size == 0 {
            return Err(CoreError::InvalidArguments(
                "character unit size must be positive",
            ));
        }

        let table_length = decode_table.chars().count();
        if unit_size == 1 && table_length != 128 && table_length != 256 {
            return Err(CoreError::InvalidArguments(
                "single-byte decode table must have exactly 128 or 256 entries",
            ));
        }

        let decode_table: Vec<char> = if unit_size == 1 && table_length == 128 {
            (0u8..128)
                .map(char::from)
                .chain(decode_table.chars())
                .collect()
        } else {
            decode_table.chars().collect()
        };

        Ok(FixedUnitCharCodec {
            name: name.into(),
            decode_table,
            unit_size,
            mib_enum,
        })
    }

    /// Mib enumeration value as specified in the IANA character-sets
    /// registry. Two codecs with the same mib value represent the same
    /// encoding; values outside the registry are unique and persistent.
    pub fn mib_enum(&self) -> u32 {
        self.mib_enum
    }
}

impl Codec for FixedUnitCharCodec {
    type Value = char;

    fn name(&self) -> String {
        self.name.clone()
    }

    fn is_fixed_size(&self) -> bool {
        true
    }

    fn unit_size(&self) -> Option<u64> {
        Some(self.unit_size)
    }

    fn decode_unit(&self, context: &mut DecodeContext<'_>) -> CoreResult<DecodeResult<char>> {
        if self.unit_size != 1 {
            return Err(CoreError::NotImplemented(
                "multi-byte character units are not supported",
            ));
        }

        let offset = context.offset() as u64;
        let raw = context.remaining();
        let Some(byte) = raw.first() else {
            return Err(CoreError::ObjectInconsistency(
                "character unit decoded without enough data",
            ));
        };

        let value = self.decode_table[usize::from(*byte)];
        context.advance(1);
        Ok(DecodeResult::value(value, offset, 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::UnitLimit;

    fn identity_table() -> String {
        // maps the upper half onto U+0080..U+00FF, like latin-1
        (0x80u32..0x100)
            .map(|code| char::from_u32(code).unwrap())
            .collect()
    }

    #[test]
    fn test_table_length_validation() {
        assert!(FixedUnitCharCodec::new("bad", "abc", 1, 9000).is_err());
        assert!(FixedUnitCharCodec::new("good", &identity_table(), 1, 9000).is_ok());
        assert!(matches!(
            FixedUnitCharCodec::new("zero", &identity_table(), 0, 9000),
            Err(CoreError::InvalidArguments(_))
        ));
    }

    #[test]
    fn test_low_ascii_half_is_completed() {
        let codec = FixedUnitCharCodec::new("latin", &identity_table(), 1, 9000).unwrap();
        let results = codec
            .decode_from_buffer(b"Ok!", 0, UnitLimit::All)
            .unwrap();
        let decoded: String = results.iter().filter_map(|r| r.value).collect();
        assert_eq!(decoded, "Ok!");
    }

    #[test]
    fn test_upper_half_goes_through_the_table() {
        let codec = FixedUnitCharCodec::new("latin", &identity_table(), 1, 9000).unwrap();
        let results = codec
            .decode_from_buffer(&[0xE9, 0xFC], 0, UnitLimit::All)
            .unwrap();
        assert_eq!(results[0].value, Some('é'));
        assert_eq!(results[1].value, Some('ü'));
        assert_eq!(results[1].offset, 1);
        assert_eq!(results[1].binary_length, 1);
    }

    #[test]
    fn test_full_256_entry_table_is_used_as_is() {
        let table: String = std::iter::repeat_n('x', 256).collect();
        let codec = FixedUnitCharCodec::new("all_x", &table, 1, 9001).unwrap();
        let results = codec
            .decode_from_buffer(b"abc", 0, UnitLimit::All)
            .unwrap();
        assert!(results.iter().all(|r| r.value == Some('x')));
    }

    #[test]
    fn test_multi_byte_units_are_not_implemented() {
        let codec = FixedUnitCharCodec::new("wide", "irrelevant", 2, 9002).unwrap();
        let results = codec
            .decode_from_buffer(b"abcd", 0, UnitLimit::All)
            .unwrap();
        // the escaped failure terminates the run with one fatal result
        assert_eq!(results.len(), 1);
        assert!(!results[0].is_ok());
    }

    #[test]
    fn test_mib_enum() {
        let codec = FixedUnitCharCodec::new("latin", &identity_table(), 1, 4).unwrap();
        assert_eq!(codec.mib_enum(), 4);
    }
}
