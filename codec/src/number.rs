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
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use hexide_data::{CoreError, CoreResult};

/// Byte order of a numeric value unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endianness {
    /// Least significant byte first.
    Little,
    /// Most significant byte first.
    Big,
}

impl Endianness {
    fn suffix(self) -> &'static str {
        match self {
            Endianness::Little => "le",
            Endianness::Big => "be",
        }
    }
}

/// Supported integer unit widths.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntegerFormat {
    /// One-byte integers.
    Bits8,
    /// Two-byte integers.
    Bits16,
    /// Four-byte integers.
    Bits32,
    /// Eight-byte integers.
    Bits64,
}

impl IntegerFormat {
    /// Number of bytes in one unit of this format.
    pub const fn unit_size(self) -> u64 {
        match self {
            IntegerFormat::Bits8 => 1,
            IntegerFormat::Bits16 => 2,
            IntegerFormat::Bits32 => 4,
            IntegerFormat::Bits64 => 8,
        }
    }

    const fn bits(self) -> u32 {
        self.unit_size() as u32 * 8
    }
}

/// Codec for fixed-width integer representations.
///
/// Decodes into `i128` so signed and unsigned units of every width share
/// one value type without lossy casts.
#[derive(Clone, Copy, Debug)]
pub struct IntegerCodec {
    format: IntegerFormat,
    signed: bool,
    endianness: Endianness,
}

impl IntegerCodec {
    /// Creates an integer codec for the given width, signedness and byte
    /// order.
    pub fn new(format: IntegerFormat, signed: bool, endianness: Endianness) -> IntegerCodec {
        IntegerCodec {
            format,
            signed,
            endianness,
        }
    }

    /// Unit width of this codec.
    pub fn format(&self) -> IntegerFormat {
        self.format
    }

    /// Checks if units are decoded as signed values.
    pub fn is_signed(&self) -> bool {
        self.signed
    }

    /// Byte order of this codec.
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }
}

impl Codec for IntegerCodec {
    type Value = i128;

    fn name(&self) -> String {
        format!(
            "int_{}{}{}",
            if self.signed { "" } else { "u" },
            self.format.bits(),
            self.endianness.suffix()
        )
    }

    fn is_fixed_size(&self) -> bool {
        true
    }

    fn unit_size(&self) -> Option<u64> {
        Some(self.format.unit_size())
    }

    fn decode_unit(&self, context: &mut DecodeContext<'_>) -> CoreResult<DecodeResult<i128>> {
        let offset = context.offset() as u64;
        let unit_size = self.format.unit_size() as usize;
        let raw = context.remaining();
        if raw.len() < unit_size {
            return Err(CoreError::ObjectInconsistency(
                "integer unit decoded without enough data",
            ));
        }

        let value: i128 = match (self.format, self.signed, self.endianness) {
            (IntegerFormat::Bits8, true, _) => i128::from(raw[0] as i8),
            (IntegerFormat::Bits8, false, _) => i128::from(raw[0]),
            (IntegerFormat::Bits16, true, Endianness::Little) => {
                i128::from(LittleEndian::read_i16(raw))
            }
            (IntegerFormat::Bits16, true, Endianness::Big) => {
                i128::from(BigEndian::read_i16(raw))
            }
            (IntegerFormat::Bits16, false, Endianness::Little) => {
                i128::from(LittleEndian::read_u16(raw))
            }
            (IntegerFormat::Bits16, false, Endianness::Big) => {
                i128::from(BigEndian::read_u16(raw))
            }
            (IntegerFormat::Bits32, true, Endianness::Little) => {
                i128::from(LittleEndian::read_i32(raw))
            }
            (IntegerFormat::Bits32, true, Endianness::Big) => {
                i128::from(BigEndian::read_i32(raw))
            }
            (IntegerFormat::Bits32, false, Endianness::Little) => {
                i128::from(LittleEndian::read_u32(raw))
            }
            (IntegerFormat::Bits32, false, Endianness::Big) => {
                i128::from(BigEndian::read_u32(raw))
            }
            (IntegerFormat::Bits64, true, Endianness::Little) => {
                i128::from(LittleEndian::read_i64(raw))
            }
            (IntegerFormat::Bits64, true, Endianness::Big) => {
                i128::from(BigEndian::read_i64(raw))
            }
            (IntegerFormat::Bits64, false, Endianness::Little) => {
                i128::from(LittleEndian::read_u64(raw))
            }
            (IntegerFormat::Bits64, false, Endianness::Big) => {
                i128::from(BigEndian::read_u64(raw))
            }
        };

        context.advance(unit_size);
        Ok(DecodeResult::value(value, offset, unit_size as u64))
    }
}

/// Supported floating-point unit widths.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FloatFormat {
    /// IEEE 754 single precision.
    Bits32,
    /// IEEE 754 double precision.
    Bits64,
}

impl FloatFormat {
    /// Number of bytes in one unit of this format.
    pub const fn unit_size(self) -> u64 {
        match self {
            FloatFormat::Bits32 => 4,
            FloatFormat::Bits64 => 8,
        }
    }

    const fn bits(self) -> u32 {
        self.unit_size() as u32 * 8
    }
}

/// Codec for fixed-width floating-point representations. Single precision
/// units are widened to `f64`.
#[derive(Clone, Copy, Debug)]
pub struct FloatCodec {
    format: FloatFormat,
    endianness: Endianness,
}

impl FloatCodec {
    /// Creates a float codec for the given width and byte order.
    pub fn new(format: FloatFormat, endianness: Endianness) -> FloatCodec {
        FloatCodec { format, endianness }
    }

    /// Unit width of this codec.
    pub fn format(&self) -> FloatFormat {
        self.format
    }

    /// Byte order of this codec.
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }
}

impl Codec for FloatCodec {
    type Value = f64;

    fn name(&self) -> String {
        format!("float_{}{}", self.format.bits(), self.endianness.suffix())
    }

    fn is_fixed_size(&self) -> bool {
        true
    }

    fn unit_size(&self) -> Option<u64> {
        Some(self.format.unit_size())
    }

    fn decode_unit(&self, context: &mut DecodeContext<'_>) -> CoreResult<DecodeResult<f64>> {
        let offset = context.offset() as u64;
        let unit_size = self.format.unit_size() as usize;
        let raw = context.remaining();
        if raw.len() < unit_size {
            return Err(CoreError::ObjectInconsistency(
                "float unit decoded without enough data",
            ));
        }

        let value = match (self.format, self.endianness) {
            (FloatFormat::Bits32, Endianness::Little) => f64::from(LittleEndian::read_f32(raw)),
            (FloatFormat::Bits32, Endianness::Big) => f64::from(BigEndian::read_f32(raw)),
            (FloatFormat::Bits64, Endianness::Little) => LittleEndian::read_f64(raw),
            (FloatFormat::Bits64, Endianness::Big) => BigEndian::read_f64(raw),
        };

        context.advance(unit_size);
        Ok(DecodeResult::value(value, offset, unit_size as u64))
    }
}
