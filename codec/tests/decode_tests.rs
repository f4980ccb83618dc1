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

//! Decoding document streams end to end

use hexide_codec::{
    Codec, DecodeFailure, Endianness, EncodingRegistry, IntegerCodec, IntegerFormat, UnitLimit,
};
use hexide_data::{DataSource, Document, Readable, Span};

#[tokio::test]
async fn test_decode_document_bytes_as_integers() {
    let source = DataSource::buffer(&[0x01, 0x02, 0x03, 0x04, 0x05][..]);
    let document = Document::from_source(source).unwrap();

    let codec = IntegerCodec::new(IntegerFormat::Bits16, true, Endianness::Little);
    let results = codec
        .decode(document.read_all().unwrap(), UnitLimit::All)
        .await
        .unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].value, Some(0x0201));
    assert_eq!(results[1].value, Some(0x0403));
    assert_eq!(results[2].error, Some(DecodeFailure::NoEnoughData));
}

#[tokio::test]
async fn test_decode_follows_edits() {
    let source = DataSource::buffer(&[0x10, 0x20, 0x30, 0x40][..]);
    let mut document = Document::from_source(source).unwrap();
    document
        .insert_span(Span::buffer(&[0xAA, 0xBB][..]).unwrap(), 2)
        .unwrap();

    let codec = IntegerCodec::new(IntegerFormat::Bits16, false, Endianness::Big);
    let results = codec
        .decode(document.read_all().unwrap(), UnitLimit::All)
        .await
        .unwrap();

    let values: Vec<_> = results.iter().filter_map(|r| r.value).collect();
    assert_eq!(values, vec![0x1020, 0xAABB, 0x3040]);
}

#[tokio::test]
async fn test_streaming_short_circuit_over_large_fill() {
    // the source holds far more data than the requested unit count; the
    // codec resolves without draining all of it
    let source = DataSource::fill(1 << 20, 0x11);
    let document = Document::from_source(source).unwrap();

    let codec = IntegerCodec::new(IntegerFormat::Bits32, false, Endianness::Little);
    let results = codec
        .decode(document.read_all().unwrap(), UnitLimit::Count(3))
        .await
        .unwrap();

    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| r.value == Some(0x1111_1111)));
}

#[tokio::test]
async fn test_decode_characters_from_document() {
    let registry = EncodingRegistry::new();
    let codec = registry.codec("windows-1251").unwrap();

    // "Привет" in cp1251, spliced together from two spans
    let mut document = Document::new();
    document
        .push_span(Span::buffer(&[0xCF, 0xF0, 0xE8][..]).unwrap())
        .unwrap();
    document
        .push_span(Span::buffer(&[0xE2, 0xE5, 0xF2][..]).unwrap())
        .unwrap();

    let results = codec
        .decode(document.read_all().unwrap(), UnitLimit::All)
        .await
        .unwrap();
    let text: String = results.iter().filter_map(|r| r.value).collect();
    assert_eq!(text, "Привет");
}

#[tokio::test]
async fn test_grouping_fixed_results_into_rows() {
    // a display layer groups fixed-width results by a units-per-row
    // parameter; offsets stay consistent across the grouping
    let source = DataSource::buffer((0u8..32).collect::<Vec<_>>().as_slice());
    let document = Document::from_source(source).unwrap();

    let codec = IntegerCodec::new(IntegerFormat::Bits8, false, Endianness::Little);
    let results = codec
        .decode(document.read_all().unwrap(), UnitLimit::All)
        .await
        .unwrap();

    let units_per_row = 8;
    let rows: Vec<_> = results.chunks(units_per_row).collect();
    assert_eq!(rows.len(), 4);
    for (row_index, row) in rows.iter().enumerate() {
        assert_eq!(row[0].offset, (row_index * units_per_row) as u64);
    }
}
