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

use crate::range::Range;
use crate::result::{CoreError, CoreResult};
use crate::source::{DataSource, SharedSource};
use crate::stream::{ReadStream, Readable};
use bytes::BytesMut;
use std::sync::Arc;

/// Span is the minimal piece of constant binary data the editing core
/// operates on: an immutable reference to a contiguous byte region of one
/// data source.
///
/// A span never owns its source exclusively; cloning a span is cheap (a
/// shared handle and two integers) and splitting produces new spans without
/// touching the backing bytes.
#[derive(Clone)]
pub struct Span {
    source: SharedSource,
    source_offset: u64,
    source_length: u64,
}

impl Span {
    /// Creates a span over `[source_offset, source_offset + source_length)`
    /// of `source`.
    ///
    /// Fails with [`CoreError::InvalidArguments`] when the region overflows
    /// the addressable domain and with [`CoreError::AccessRange`] when it
    /// is not fully contained in the source.
    pub fn new(
        source: SharedSource,
        source_offset: u64,
        source_length: u64,
    ) -> CoreResult<Span> {
        let span_range = Range::new(source_offset, source_length);
        if !span_range.is_valid() {
            return Err(CoreError::InvalidArguments("span range overflows"));
        }
        if !Range::to(source.length()).contains_range(span_range) {
            return Err(CoreError::AccessRange);
        }
        Ok(Span {
            source,
            source_offset,
            source_length,
        })
    }

    /// Creates a span covering the whole source.
    ///
    /// Fails with [`CoreError::AccessRange`] for an empty source, which has
    /// no bytes a span could reference.
    pub fn over(source: SharedSource) -> CoreResult<Span> {
        let source_length = source.length();
        Span::new(source, 0, source_length)
    }

    /// Creates a span over a fresh fill source of `fill_size` repetitions
    /// of `fill_byte`.
    pub fn fill(fill_size: u64, fill_byte: u8) -> CoreResult<Span> {
        Span::over(DataSource::fill(fill_size, fill_byte))
    }

    /// Creates a span over a fresh buffer source owning `bytes`.
    pub fn buffer(bytes: impl Into<BytesMut>) -> CoreResult<Span> {
        Span::over(DataSource::buffer(bytes))
    }

    /// Number of bytes the span references.
    pub fn len(&self) -> u64 {
        self.source_length
    }

    /// Checks if the span references no bytes.
    pub fn is_empty(&self) -> bool {
        self.source_length == 0
    }

    /// The source this span references.
    pub fn source(&self) -> &SharedSource {
        &self.source
    }

    /// Offset of the referenced region inside the source.
    pub fn source_offset(&self) -> u64 {
        self.source_offset
    }

    /// Splits the span at `position`, a constant-time metadata operation.
    ///
    /// Returns `(left, right)` where `left` references the first `position`
    /// bytes and `right` the rest. When `position` is zero everything lands
    /// in the right half and `left` is `None`. The original span and its
    /// source are never touched.
    ///
    /// Fails with [`CoreError::AccessRange`] unless
    /// `0 <= position < self.len()`.
    pub fn split(&self, position: u64) -> CoreResult<(Option<Span>, Span)> {
        if !Range::to(self.len()).is_position_inside(position) {
            return Err(CoreError::AccessRange);
        }
        if position == 0 {
            return Ok((None, self.clone()));
        }
        let left = Span {
            source: Arc::clone(&self.source),
            source_offset: self.source_offset,
            source_length: position,
        };
        let right = Span {
            source: Arc::clone(&self.source),
            source_offset: self.source_offset + position,
            source_length: Range::to(self.len()).items_from(position),
        };
        Ok((Some(left), right))
    }
}

impl Readable for Span {
    fn length(&self) -> u64 {
        self.source_length
    }

    fn open_stream(&self, offset: u64, size: u64) -> CoreResult<ReadStream> {
        self.source
            .open_stream(self.source_offset + offset, size)
    }
}

impl std::fmt::Debug for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Span")
            .field("source", &self.source.url())
            .field("source_offset", &self.source_offset)
            .field("source_length", &self.source_length)
            .finish()
    }
}
