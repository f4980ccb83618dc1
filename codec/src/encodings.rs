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

//! Character encoding tables and the registry resolving names to codecs.
//!
//! The decode tables below cover bytes `0x80..=0xFF` of each single-byte
//! encoding; the low-ASCII half is identical everywhere and completed by
//! [`FixedUnitCharCodec`]. Bytes with no assignment in an encoding map to
//! U+FFFD.

use crate::charset::FixedUnitCharCodec;
use std::collections::HashMap;
use tracing::warn;

/// Static description of one installed character encoding.
#[derive(Clone, Copy, Debug)]
pub struct EncodingData {
    /// Canonical encoding name as registered with IANA.
    pub name: &'static str,
    /// Alternative names resolving to the same encoding.
    pub aliases: &'static [&'static str],
    /// Mib enumeration value from the IANA character-sets registry.
    pub mib_enum: u32,
    /// Characters for bytes `0x80..=0xFF`, or a full 256-entry table.
    pub decode_table: &'static str,
}

const US_ASCII_TABLE: &str = "\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\
    \u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\
    \u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\
    \u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\
    \u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\
    \u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\
    \u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\
    \u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}";

const ISO_8859_1_TABLE: &str = "\u{80}\u{81}\u{82}\u{83}\u{84}\u{85}\u{86}\u{87}\u{88}\u{89}\u{8a}\u{8b}\u{8c}\u{8d}\u{8e}\u{8f}\
    \u{90}\u{91}\u{92}\u{93}\u{94}\u{95}\u{96}\u{97}\u{98}\u{99}\u{9a}\u{9b}\u{9c}\u{9d}\u{9e}\u{9f}\
    \u{a0}¡¢£¤¥¦§¨©ª«¬\u{ad}®¯\
    °±²³´µ¶·¸¹º»¼½¾¿\
    ÀÁÂÃÄÅÆÇÈÉÊËÌÍÎÏ\
    ÐÑÒÓÔÕÖ×ØÙÚÛÜÝÞß\
    àáâãäåæçèéêëìíîï\
    ðñòóôõö÷øùúûüýþÿ";

const WINDOWS_1251_TABLE: &str = "ЂЃ‚ѓ„…†‡€‰Љ‹ЊЌЋЏ\
    ђ‘’“”•–—\u{fffd}™љ›њќћџ\
    \u{a0}ЎўЈ¤Ґ¦§Ё©Є«¬\u{ad}®Ї\
    °±Ііґµ¶·ё№є»јЅѕї\
    АБВГДЕЖЗИЙКЛМНОП\
    РСТУФХЦЧШЩЪЫЬЭЮЯ\
    абвгдежзийклмноп\
    рстуфхцчшщъыьэюя";

const KOI8_R_TABLE: &str = "─│┌┐└┘├┤┬┴┼▀▄█▌▐\
    ░▒▓⌠■∙√≈≤≥\u{a0}⌡°²·÷\
    ═║╒ё╓╔╕╖╗╘╙╚╛╜╝╞\
    ╟╠╡Ё╢╣╤╥╦╧╨╩╪╫╬©\
    юабцдефгхийклмно\
    пярстужвьызшэщчъ\
    ЮАБЦДЕФГХИЙКЛМНО\
    ПЯРСТУЖВЬЫЗШЭЩЧЪ";

const IBM866_TABLE: &str = "АБВГДЕЖЗИЙКЛМНОП\
    РСТУФХЦЧШЩЪЫЬЭЮЯ\
    абвгдежзийклмноп\
    ░▒▓│┤╡╢╖╕╣║╗╝╜╛┐\
    └┴┬├─┼╞╟╚╔╩╦╠═╬╧\
    ╨╤╥╙╘╒╓╫╪┘┌█▄▌▐▀\
    рстуфхцчшщъыьэюя\
    ЁёЄєЇїЎў°∙·√№¤■\u{a0}";

/// The encodings shipped with the codec crate.
pub static BUILTIN_ENCODINGS: &[EncodingData] = &[
    EncodingData {
        name: "US-ASCII",
        aliases: &[
            "ANSI_X3.4-1968",
            "iso-ir-6",
            "ANSI_X3.4-1986",
            "ISO_646.irv:1991",
            "ascii",
            "ISO646-US",
            "us",
            "IBM367",
            "cp367",
            "csASCII",
        ],
        mib_enum: 3,
        decode_table: US_ASCII_TABLE,
    },
    EncodingData {
        name: "ISO-8859-1",
        aliases: &[
            "iso-ir-100",
            "ISO_8859-1",
            "latin1",
            "l1",
            "IBM819",
            "CP819",
            "csISOLatin1",
        ],
        mib_enum: 4,
        decode_table: ISO_8859_1_TABLE,
    },
    EncodingData {
        name: "windows-1251",
        aliases: &["cswindows1251", "win1251", "cp1251"],
        mib_enum: 2251,
        decode_table: WINDOWS_1251_TABLE,
    },
    EncodingData {
        name: "KOI8-R",
        aliases: &["csKOI8R"],
        mib_enum: 2084,
        decode_table: KOI8_R_TABLE,
    },
    EncodingData {
        name: "IBM866",
        aliases: &["cp866", "866", "csIBM866"],
        mib_enum: 2086,
        decode_table: IBM866_TABLE,
    },
];

/// Simple name used to compare encoding names. Two encodings with matching
/// simple names are considered the same encoding.
pub fn simple_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Registry resolving encoding names and aliases to character codecs.
///
/// Constructed explicitly and passed by reference wherever needed; there
/// is no hidden global instance. Lookups are insensitive to case and to
/// the space/underscore/dash punctuation of the queried name.
#[derive(Debug)]
pub struct EncodingRegistry {
    encodings: HashMap<String, &'static EncodingData>,
}

impl EncodingRegistry {
    /// Creates a registry over the built-in encodings.
    pub fn new() -> EncodingRegistry {
        EncodingRegistry::from_records(BUILTIN_ENCODINGS)
    }

    /// Creates a registry over externally provided encoding records.
    pub fn from_records(records: &'static [EncodingData]) -> EncodingRegistry {
        let mut encodings = HashMap::new();
        for record in records {
            for alias in record.aliases {
                encodings.insert(simple_name(alias), record);
            }
            encodings.insert(simple_name(record.name), record);
        }
        EncodingRegistry { encodings }
    }

    /// Checks if a codec for the encoding is installed.
    pub fn has_codec(&self, name: &str) -> bool {
        self.encodings.contains_key(&simple_name(name))
    }

    /// Returns a codec decoding characters of the named encoding, or
    /// `None` when the name resolves to no installed encoding.
    pub fn codec(&self, name: &str) -> Option<FixedUnitCharCodec> {
        let record = self.encodings.get(&simple_name(name))?;
        match FixedUnitCharCodec::new(record.name, record.decode_table, 1, record.mib_enum) {
            Ok(codec) => Some(codec),
            Err(err) => {
                warn!("encoding {} has a malformed decode table: {}", record.name, err);
                None
            }
        }
    }
}

impl Default for EncodingRegistry {
    fn default() -> Self {
        EncodingRegistry::new()
    }
}
