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

//! End-to-end editing scenarios across sources, spans, chains and
//! documents

use hexide_data::{Chain, DataSource, Document, OpenMode, Readable, Span};
use tempdir::TempDir;

#[tokio::test]
async fn test_edit_file_backed_document() {
    let dir = TempDir::new("hexide").unwrap();
    let path = dir.path().join("document.bin");
    std::fs::write(&path, b"The quick brown fox").unwrap();

    let source = DataSource::open_file(&path, OpenMode::read()).await.unwrap();
    let mut document = Document::from_source(source).unwrap();
    assert_eq!(document.len(), 19);

    // replace "quick" with "sneaky" without touching the file
    document.remove(4, 5).unwrap();
    document
        .insert_span(Span::buffer(&b"sneaky"[..]).unwrap(), 4)
        .unwrap();

    let edited = document.read_all().unwrap().collect().await.unwrap();
    assert_eq!(&edited[..], b"The sneaky brown fox");

    // the file still holds the original bytes
    assert_eq!(std::fs::read(&path).unwrap(), b"The quick brown fox");
}

#[tokio::test]
async fn test_mixed_source_chain_reads_in_order() {
    let dir = TempDir::new("hexide").unwrap();
    let path = dir.path().join("tail.bin");
    std::fs::write(&path, b"-tail").unwrap();

    let file = DataSource::open_file(&path, OpenMode::read()).await.unwrap();

    let mut chain = Chain::new();
    chain.push_span(Span::buffer(&b"head"[..]).unwrap()).unwrap();
    chain.push_span(Span::fill(3, b'.').unwrap()).unwrap();
    chain.push_span(Span::over(file).unwrap()).unwrap();

    let collected = chain.read_all().unwrap().collect().await.unwrap();
    assert_eq!(&collected[..], b"head...-tail");

    // a window crossing all three spans
    let collected = chain.read(2, 8).unwrap().collect().await.unwrap();
    assert_eq!(&collected[..], b"ad...-ta");
}

#[tokio::test]
async fn test_take_chain_shares_bytes_with_origin() {
    let source = DataSource::buffer(&b"0123456789"[..]);
    let mut origin = Chain::new();
    origin.push_span(Span::over(source).unwrap()).unwrap();

    let mut taken = origin.take_chain(2, 6).unwrap();
    let collected = taken.read_all().unwrap().collect().await.unwrap();
    assert_eq!(&collected[..], b"234567");

    // editing the taken chain leaves the origin untouched
    taken.remove_range(0, 3).unwrap();
    let collected = origin.read_all().unwrap().collect().await.unwrap();
    assert_eq!(&collected[..], b"0123456789");
}

#[tokio::test]
async fn test_document_built_from_scratch() {
    let mut document = Document::new();
    document.push_span(Span::fill(4, b'a').unwrap()).unwrap();
    document
        .push_chain(
            Chain::from_spans(vec![
                Span::fill(2, b'b').unwrap(),
                Span::fill(2, b'c').unwrap(),
            ])
            .unwrap(),
        )
        .unwrap();
    document
        .insert_span(Span::buffer(&b"!"[..]).unwrap(), 0)
        .unwrap();

    assert_eq!(document.len(), 9);
    let collected = document.read_all().unwrap().collect().await.unwrap();
    assert_eq!(&collected[..], b"!aaaabbcc");
}

#[tokio::test]
async fn test_length_invariant_matches_drained_bytes() {
    let dir = TempDir::new("hexide").unwrap();
    let path = dir.path().join("invariant.bin");
    std::fs::write(&path, vec![0x5A; 1000]).unwrap();

    let file = DataSource::open_file(&path, OpenMode::read()).await.unwrap();
    let mut document = Document::from_source(file).unwrap();

    document.insert_span(Span::fill(123, 1).unwrap(), 500).unwrap();
    document.remove(50, 400).unwrap();
    document
        .insert_span(Span::buffer(vec![2u8; 77].as_slice()).unwrap(), 0)
        .unwrap();

    let drained = document.read_all().unwrap().collect().await.unwrap();
    assert_eq!(drained.len() as u64, document.len());
    assert_eq!(document.len(), 1000 + 123 - 400 + 77);
}

#[tokio::test]
async fn test_duplicated_content_aliases_one_source() {
    let source = DataSource::buffer(&b"xyz"[..]);
    let span = Span::over(source).unwrap();

    let mut chain = Chain::new();
    chain.push_span(span.clone()).unwrap();
    chain.push_span(span.clone()).unwrap();
    chain.insert_span(span, 3).unwrap();

    let collected = chain.read_all().unwrap().collect().await.unwrap();
    assert_eq!(&collected[..], b"xyzxyzxyz");
}
