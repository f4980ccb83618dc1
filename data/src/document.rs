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

use crate::chain::Chain;
use crate::result::CoreResult;
use crate::source::SharedSource;
use crate::span::Span;
use crate::stream::{ReadStream, Readable};
use std::sync::Arc;

/// One editable document: a chain of spans bound to the data source it was
/// opened from, if any.
///
/// The document is a thin façade over its chain; it adds no invariants of
/// its own. The originating source is kept only so the owner of the
/// document lifecycle can save back to it or close it.
#[derive(Debug, Default)]
pub struct Document {
    source: Option<SharedSource>,
    chain: Chain,
}

impl Document {
    /// Creates an empty document with no originating source.
    pub fn new() -> Document {
        Document::default()
    }

    /// Creates a document seeded from `source`: the chain starts with one
    /// span covering the whole source. An empty source seeds an empty
    /// chain.
    pub fn from_source(source: SharedSource) -> CoreResult<Document> {
        let mut chain = Chain::new();
        if source.length() > 0 {
            chain.push_span(Span::over(Arc::clone(&source))?)?;
        }
        Ok(Document {
            source: Some(source),
            chain,
        })
    }

    /// The source this document was opened from, if any.
    pub fn source(&self) -> Option<&SharedSource> {
        self.source.as_ref()
    }

    /// Number of bytes in the document.
    pub fn len(&self) -> u64 {
        self.chain.len()
    }

    /// Checks if the document holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Number of spans in the document's chain.
    pub fn span_count(&self) -> usize {
        self.chain.span_count()
    }

    /// Inserts a span at `position`. See [`Chain::insert_span`].
    pub fn insert_span(&mut self, span: Span, position: u64) -> CoreResult<()> {
        self.chain.insert_span(span, position)
    }

    /// Inserts a chain at `position`. See [`Chain::insert_chain`].
    pub fn insert_chain(&mut self, chain: Chain, position: u64) -> CoreResult<()> {
        self.chain.insert_chain(chain, position)
    }

    /// Appends a span. See [`Chain::push_span`].
    pub fn push_span(&mut self, span: Span) -> CoreResult<()> {
        self.chain.push_span(span)
    }

    /// Appends a chain. See [`Chain::push_chain`].
    pub fn push_chain(&mut self, chain: Chain) -> CoreResult<()> {
        self.chain.push_chain(chain)
    }

    /// Removes `size` bytes starting at `start`. See [`Chain::remove_range`].
    pub fn remove(&mut self, start: u64, size: u64) -> CoreResult<()> {
        self.chain.remove_range(start, size)
    }

    /// Clears the document's contents.
    pub fn clear(&mut self) {
        self.chain.reset();
    }
}

impl Readable for Document {
    fn length(&self) -> u64 {
        self.chain.len()
    }

    fn open_stream(&self, offset: u64, size: u64) -> CoreResult<ReadStream> {
        self.chain.open_stream(offset, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::DataSource;

    #[test]
    fn test_new_document_is_empty() {
        let document = Document::new();
        assert_eq!(document.len(), 0);
        assert!(document.source().is_none());
    }

    #[tokio::test]
    async fn test_seeded_document_covers_whole_source() {
        let source = DataSource::buffer(&b"0123456789"[..]);
        let document = Document::from_source(Arc::clone(&source)).unwrap();
        assert_eq!(document.len(), 10);
        assert_eq!(document.span_count(), 1);
        assert!(Arc::ptr_eq(document.source().unwrap(), &source));

        let collected = document.read_all().unwrap().collect().await.unwrap();
        assert_eq!(&collected[..], b"0123456789");
    }

    #[test]
    fn test_seeding_from_empty_source() {
        let source = DataSource::fill(0, 0);
        let document = Document::from_source(source).unwrap();
        assert_eq!(document.len(), 0);
        assert_eq!(document.span_count(), 0);
        assert!(document.source().is_some());
    }

    #[tokio::test]
    async fn test_edits_delegate_to_chain() {
        let source = DataSource::buffer(&b"0123456789"[..]);
        let mut document = Document::from_source(source).unwrap();

        document
            .insert_span(Span::buffer(&b"abc"[..]).unwrap(), 5)
            .unwrap();
        assert_eq!(document.len(), 13);

        let collected = document.read_all().unwrap().collect().await.unwrap();
        assert_eq!(&collected[..], b"01234abc56789");

        document.remove(5, 3).unwrap();
        let collected = document.read_all().unwrap().collect().await.unwrap();
        assert_eq!(&collected[..], b"0123456789");
    }

    #[test]
    fn test_clear() {
        let source = DataSource::buffer(&b"0123456789"[..]);
        let mut document = Document::from_source(source).unwrap();
        document.clear();
        assert_eq!(document.len(), 0);
        assert!(document.source().is_some());
    }
}
