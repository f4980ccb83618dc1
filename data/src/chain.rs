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
use crate::span::Span;
use crate::stream::{ReadStream, Readable};
use std::collections::VecDeque;

/// Location of a chain position inside the span list: the index of the
/// containing span and the offset of the position from that span's start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChainPosition {
    /// Index of the span containing the position.
    pub span_index: usize,
    /// Offset of the position from the start of that span.
    pub offset_in_span: u64,
}

/// Chain represents an editable sequence of immutable spans: the
/// rope/piece-table core of a document.
///
/// Spans are contiguous in the chain's own coordinate space: span `i`
/// covers the bytes right after span `i - 1` regardless of where either
/// points inside its source. Source regions of different spans may overlap
/// or alias freely; that is expected when content is duplicated.
///
/// Every mutating operation preserves the central invariant: the cached
/// length equals the sum of the span lengths, with no gaps or overlaps in
/// chain coordinates.
#[derive(Clone, Default)]
pub struct Chain {
    spans: Vec<Span>,
    length: u64,
}

impl Chain {
    /// Creates an empty chain.
    pub fn new() -> Chain {
        Chain::default()
    }

    /// Creates a chain over the given spans in order.
    ///
    /// Fails with [`CoreError::InvalidArguments`] when the combined length
    /// would overflow the addressable domain.
    pub fn from_spans(spans: Vec<Span>) -> CoreResult<Chain> {
        let mut length: u64 = 0;
        for span in &spans {
            length = length
                .checked_add(span.len())
                .ok_or(CoreError::InvalidArguments("chain length overflows"))?;
        }
        Ok(Chain { spans, length })
    }

    /// Number of bytes in the chain.
    pub fn len(&self) -> u64 {
        self.length
    }

    /// Checks if the chain holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Number of spans currently in the chain.
    pub fn span_count(&self) -> usize {
        self.spans.len()
    }

    /// Copy of the span list this chain manages.
    pub fn spans(&self) -> Vec<Span> {
        self.spans.clone()
    }

    /// Appends a span at the end of the chain.
    pub fn push_span(&mut self, span: Span) -> CoreResult<()> {
        self.insert_span(span, self.length)
    }

    /// Appends all spans of the given chain to this chain.
    pub fn push_chain(&mut self, chain: Chain) -> CoreResult<()> {
        self.insert_chain(chain, self.length)
    }

    /// Inserts a single span at `position`.
    ///
    /// `position == len()` is the append case and is always legal, even
    /// though it is not a position inside the chain; this carve-out is
    /// deliberate, not an oversight.
    pub fn insert_span(&mut self, span: Span, position: u64) -> CoreResult<()> {
        let length = span.len();
        self.insert_chain(
            Chain {
                spans: vec![span],
                length,
            },
            position,
        )
    }

    /// Inserts all spans of `chain` at `position`.
    ///
    /// The inserted chain is consumed; its spans keep sharing their
    /// sources. `position == len()` appends (see [`Chain::insert_span`]).
    ///
    /// Fails with [`CoreError::InvalidArguments`] when the resulting length
    /// would overflow the addressable domain and with
    /// [`CoreError::AccessRange`] when `position` is past the end.
    pub fn insert_chain(&mut self, chain: Chain, position: u64) -> CoreResult<()> {
        let new_length = self
            .length
            .checked_add(chain.length)
            .ok_or(CoreError::InvalidArguments("chain length overflows"))?;

        if !Range::to(self.length).is_position_inside(position) && position != self.length {
            return Err(CoreError::AccessRange);
        }

        if position == self.length {
            self.spans.extend(chain.spans);
        } else {
            let insert_at = self.split_at_position(position)?;
            self.spans
                .splice(insert_at.span_index..insert_at.span_index, chain.spans);
        }
        self.length = new_length;
        Ok(())
    }

    /// Removes `size` bytes starting at `start`.
    ///
    /// Fails with [`CoreError::InvalidArguments`] when the range itself is
    /// malformed and with [`CoreError::AccessRange`] when it is not fully
    /// contained in the chain. Removing zero bytes is a no-op.
    pub fn remove_range(&mut self, start: u64, size: u64) -> CoreResult<()> {
        let removed = Range::new(start, size);
        if !removed.is_valid() {
            return Err(CoreError::InvalidArguments("removal range overflows"));
        }
        if !Range::to(self.length).contains_range(removed) {
            return Err(CoreError::AccessRange);
        }
        if size == 0 {
            return Ok(());
        }

        let from = self.split_at_position(start)?;
        if start + size == self.length {
            // the removed range reaches the end, there is no span after it
            self.spans.truncate(from.span_index);
        } else {
            let to = self.split_at_position(start + size)?;
            self.spans.drain(from.span_index..to.span_index);
        }
        self.length -= size;
        Ok(())
    }

    /// Creates a new chain over `[start, start + size)` of this chain.
    ///
    /// Non-destructive for the byte content: the returned chain shares the
    /// spans (or split fragments of them) with this chain, nothing is
    /// copied and this chain still reads the same afterwards. Taking zero
    /// bytes returns an empty chain.
    pub fn take_chain(&mut self, start: u64, size: u64) -> CoreResult<Chain> {
        let taken = Range::new(start, size);
        if !taken.is_valid() {
            return Err(CoreError::InvalidArguments("taken range overflows"));
        }
        if !Range::to(self.length).contains_range(taken) {
            return Err(CoreError::AccessRange);
        }
        if size == 0 {
            return Ok(Chain::new());
        }

        let from = self.split_at_position(start)?;
        let span_count = if start + size == self.length {
            self.spans.len() - from.span_index
        } else {
            let to = self.split_at_position(start + size)?;
            to.span_index - from.span_index
        };

        Chain::from_spans(
            self.spans[from.span_index..from.span_index + span_count].to_vec(),
        )
    }

    /// Finds the span index and in-span offset for `position`.
    ///
    /// Fails with [`CoreError::AccessRange`] when `position` is not inside
    /// the chain. A linear scan over the spans; chains typically hold few
    /// spans relative to their byte length, so no cumulative index is kept.
    pub fn position_data(&self, position: u64) -> CoreResult<ChainPosition> {
        if !Range::to(self.length).is_position_inside(position) {
            return Err(CoreError::AccessRange);
        }

        let mut current = 0u64;
        for (span_index, span) in self.spans.iter().enumerate() {
            if Range::new(current, span.len()).is_position_inside(position) {
                return Ok(ChainPosition {
                    span_index,
                    offset_in_span: position - current,
                });
            }
            current += span.len();
        }

        Err(CoreError::ObjectInconsistency(
            "position lookup fell through the span list",
        ))
    }

    /// Splits spans so the byte at `position` becomes the first byte of a
    /// span, if it is not already, and returns the position data for the
    /// now boundary-aligned position.
    ///
    /// This is the mechanism that gives insert and remove their splice
    /// points without ever touching source bytes. Splitting at an existing
    /// boundary changes nothing.
    pub fn split_at_position(&mut self, position: u64) -> CoreResult<ChainPosition> {
        let found = self.position_data(position)?;
        if found.offset_in_span == 0 {
            return Ok(found);
        }

        let (left, right) = self.spans[found.span_index].split(found.offset_in_span)?;
        let left = left.ok_or(CoreError::ObjectInconsistency(
            "interior split produced no left half",
        ))?;
        self.spans
            .splice(found.span_index..=found.span_index, [left, right]);

        Ok(ChainPosition {
            span_index: found.span_index + 1,
            offset_in_span: 0,
        })
    }

    /// Resets the chain to its empty state.
    pub fn reset(&mut self) {
        self.spans.clear();
        self.length = 0;
    }
}

impl Readable for Chain {
    fn length(&self) -> u64 {
        self.length
    }

    fn open_stream(&self, offset: u64, size: u64) -> CoreResult<ReadStream> {
        let mut segments = VecDeque::new();
        if size == 0 {
            return Ok(ReadStream::from_segments(segments));
        }

        let start = self.position_data(offset)?;
        let mut remains = size;
        let mut span_index = start.span_index;
        while remains > 0 && span_index < self.spans.len() {
            let span = &self.spans[span_index];
            let (read_position, available) = if span_index == start.span_index {
                (
                    start.offset_in_span,
                    Range::to(span.len()).items_from(start.offset_in_span),
                )
            } else {
                (0, span.len())
            };

            let read_size = remains.min(available);
            let sub_stream = span.open_stream(read_position, read_size)?;
            segments.extend(sub_stream.into_segments());

            remains -= read_size;
            span_index += 1;
        }

        Ok(ReadStream::from_segments(segments))
    }
}

impl std::fmt::Debug for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chain")
            .field("length", &self.length)
            .field("span_count", &self.spans.len())
            .finish()
    }
}
