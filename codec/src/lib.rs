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

//! # Hexide Codec Engine
//!
//! This crate turns raw bytes from the hexide data model into sequences of
//! typed values for display: integers, floats and characters, decoded with
//! rich partial-failure semantics.
//!
//! ## Core Components
//!
//! ### [`Codec`]
//!
//! The decode contract. Concrete codecs implement the one-unit primitive;
//! the provided decode loops handle unit limits, recovery after bad units
//! and protection against misbehaving codec implementations. Results are
//! accumulated as [`DecodeResult`] values; a bad unit is data, not an
//! aborted call.
//!
//! ### Concrete codecs
//!
//! [`IntegerCodec`] (8/16/32/64-bit, signed and unsigned, both byte
//! orders), [`FloatCodec`] (32/64-bit, both byte orders) and
//! [`FixedUnitCharCodec`] (table-driven single-byte character sets).
//!
//! ### [`EncodingRegistry`]
//!
//! Resolves encoding names and aliases (insensitive to case and name
//! punctuation) to character codec instances. Constructed explicitly from
//! static [`EncodingData`] records; unknown names resolve to `None`.
//!
//! ## Usage Example
//!
//! ```rust
//! use hexide_codec::{Codec, EncodingRegistry, UnitLimit};
//!
//! # fn example() -> hexide_data::CoreResult<()> {
//! let registry = EncodingRegistry::new();
//! let codec = registry.codec("KOI8-R").expect("built-in encoding");
//!
//! let results = codec.decode_from_buffer(&[0xd4, 0xc5, 0xcb], 0, UnitLimit::All)?;
//! let text: String = results.iter().filter_map(|r| r.value).collect();
//! assert_eq!(text, "тек");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(
    clippy::cargo,
    missing_docs,
    clippy::pedantic,
    future_incompatible,
    rust_2018_idioms
)]
#![allow(
    clippy::option_if_let_else,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc
)]

mod charset;
mod codec;
mod encodings;
mod number;
mod result;

pub use self::charset::FixedUnitCharCodec;
pub use self::codec::{Codec, DecodeContext, UnitLimit};
pub use self::encodings::{BUILTIN_ENCODINGS, EncodingData, EncodingRegistry, simple_name};
pub use self::number::{Endianness, FloatCodec, FloatFormat, IntegerCodec, IntegerFormat};
pub use self::result::{DecodeFailure, DecodeResult};
