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

//! # Read Stream Contract
//!
//! Every readable entity of the data model (data sources, spans, chains and
//! documents) hands out its bytes through the same suspension-friendly
//! contract: [`Readable::read`] validates the requested window and returns a
//! [`ReadStream`], a pull-model stream the consumer drains chunk by chunk.
//!
//! The stream guarantees:
//!
//! - chunks arrive in ascending offset order,
//! - at most `min_size` bytes are delivered in total,
//! - a source-level I/O failure is surfaced exactly once, after which the
//!   stream only reports end.
//!
//! Chunk boundaries carry no meaning; only the total byte sequence does.
//! Backpressure is inherent to the pull model (nothing is produced until
//! [`ReadStream::next_chunk`] is awaited) and cancellation is simply
//! dropping the stream.

use crate::range::Range;
use crate::result::{CoreError, CoreResult};
use crate::source;
use bytes::{Bytes, BytesMut};
use std::collections::VecDeque;
use std::fs::File;
use std::sync::{Arc, Mutex};

/// Ceiling on the size of a single delivered chunk. Longer segments are
/// delivered in several chunks so a consumer can stop pulling early without
/// the producer having materialized the whole window.
pub const MAX_CHUNK_SIZE: usize = 64 * 1024;

/// One planned piece of a read, resolved lazily when the consumer pulls.
pub(crate) enum Segment {
    /// Bytes already materialized in memory.
    Memory(Bytes),
    /// A run of one repeating byte, synthesized on demand.
    Fill { fill_byte: u8, remaining: u64 },
    /// A file window, read positionally when pulled.
    File {
        handle: Arc<Mutex<Option<File>>>,
        offset: u64,
        remaining: u64,
    },
}

/// Pull-model byte stream over a validated read window.
///
/// Created through [`Readable::read`] and friends; never constructed
/// directly by callers.
pub struct ReadStream {
    segments: VecDeque<Segment>,
    failed: bool,
}

impl ReadStream {
    pub(crate) fn from_segments(segments: VecDeque<Segment>) -> ReadStream {
        ReadStream {
            segments,
            failed: false,
        }
    }

    pub(crate) fn into_segments(self) -> VecDeque<Segment> {
        self.segments
    }

    /// Produces the next chunk of the stream, or `None` once every byte of
    /// the window has been delivered.
    ///
    /// A failed source read is reported once through `Err`; afterwards the
    /// stream behaves as exhausted. No chunk is ever delivered out of order
    /// and the total never exceeds the window the stream was created for.
    pub async fn next_chunk(&mut self) -> CoreResult<Option<Bytes>> {
        if self.failed {
            return Ok(None);
        }
        while let Some(segment) = self.segments.front_mut() {
            match segment {
                Segment::Memory(bytes) => {
                    if bytes.is_empty() {
                        self.segments.pop_front();
                        continue;
                    }
                    let take = bytes.len().min(MAX_CHUNK_SIZE);
                    let chunk = bytes.split_to(take);
                    if bytes.is_empty() {
                        self.segments.pop_front();
                    }
                    return Ok(Some(chunk));
                }
                Segment::Fill {
                    fill_byte,
                    remaining,
                } => {
                    if *remaining == 0 {
                        self.segments.pop_front();
                        continue;
                    }
                    let take = (*remaining).min(MAX_CHUNK_SIZE as u64) as usize;
                    let chunk = Bytes::from(vec![*fill_byte; take]);
                    *remaining -= take as u64;
                    if *remaining == 0 {
                        self.segments.pop_front();
                    }
                    return Ok(Some(chunk));
                }
                Segment::File {
                    handle,
                    offset,
                    remaining,
                } => {
                    if *remaining == 0 {
                        self.segments.pop_front();
                        continue;
                    }
                    let take = (*remaining).min(MAX_CHUNK_SIZE as u64) as usize;
                    let handle = Arc::clone(handle);
                    let at = *offset;
                    let chunk = match source::read_file_chunk(handle, at, take).await {
                        Ok(chunk) => chunk,
                        Err(err) => {
                            self.failed = true;
                            self.segments.clear();
                            return Err(err);
                        }
                    };
                    if chunk.is_empty() {
                        // The file ended short of the planned window, e.g.
                        // it was truncated after the stream was created.
                        self.segments.pop_front();
                        continue;
                    }
                    *offset += chunk.len() as u64;
                    *remaining -= chunk.len() as u64;
                    if *remaining == 0 {
                        self.segments.pop_front();
                    }
                    return Ok(Some(chunk));
                }
            }
        }
        Ok(None)
    }

    /// Drains the stream and concatenates every chunk into one buffer.
    pub async fn collect(mut self) -> CoreResult<Bytes> {
        let mut out = BytesMut::new();
        while let Some(chunk) = self.next_chunk().await? {
            out.extend_from_slice(&chunk);
        }
        Ok(out.freeze())
    }
}

impl std::fmt::Debug for ReadStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadStream")
            .field("pending_segments", &self.segments.len())
            .field("failed", &self.failed)
            .finish()
    }
}

/// Object managing a particular amount of readable binary data.
///
/// The provided methods validate the requested window; [`Readable::open_stream`]
/// is the per-type producer and may assume its arguments are valid.
pub trait Readable {
    /// Number of bytes addressable through this readable.
    fn length(&self) -> u64;

    /// Builds the stream for an already validated window. Implementation
    /// detail of each readable; call [`Readable::read`] instead.
    #[doc(hidden)]
    fn open_stream(&self, offset: u64, size: u64) -> CoreResult<ReadStream>;

    /// Creates a stream delivering at least `min_size` bytes starting at
    /// `offset`.
    ///
    /// Fails with [`CoreError::AccessRange`] if `offset` is not a valid
    /// position of this readable or fewer than `min_size` bytes are
    /// available from it.
    fn read(&self, offset: u64, min_size: u64) -> CoreResult<ReadStream> {
        let own_range = Range::to(self.length());
        let read_range = Range::new(offset, min_size);
        if !read_range.is_valid()
            || own_range.items_from(offset) < min_size
            || !own_range.is_position_inside(offset)
        {
            return Err(CoreError::AccessRange);
        }
        self.open_stream(offset, min_size)
    }

    /// Creates a stream over every byte from `offset` to the end, the
    /// equivalent of [`Readable::read`] with the minimum size left out.
    fn read_from(&self, offset: u64) -> CoreResult<ReadStream> {
        let min_size = Range::to(self.length()).items_from(offset);
        self.read(offset, min_size)
    }

    /// Creates a stream over the whole readable.
    fn read_all(&self) -> CoreResult<ReadStream> {
        self.read(0, self.length())
    }
}
