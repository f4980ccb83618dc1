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

//! # Hexide Data Model
//!
//! This crate is the binary-data editing core of the hexide hex editor: an
//! in-memory model that opens arbitrarily large byte sources, applies
//! localized edits without copying untouched bytes, and streams the
//! resulting logical byte sequence back out.
//!
//! ## Core Components
//!
//! ### [`DataSource`]
//!
//! A byte-addressable backing store: an owned memory buffer, a
//! repeating-byte fill generator, or a file on disk. Sources are shared
//! ([`SharedSource`]): many spans may reference one source, and the source
//! outlives all of them.
//!
//! ### [`Span`]
//!
//! An immutable reference to a contiguous byte region of one source.
//! Splitting a span is a constant-time metadata operation producing two new
//! spans; the backing bytes are never touched.
//!
//! ### [`Chain`]
//!
//! An ordered sequence of spans forming one logical document, the
//! rope/piece-table structure behind every edit. Inserting and removing
//! locate their splice points by splitting spans at the boundaries, so an
//! edit costs span surgery, not byte copies.
//!
//! ### [`Document`]
//!
//! A thin façade binding a chain to the source it was opened from,
//! exposing the public edit and read API.
//!
//! ### [`Readable`] / [`ReadStream`]
//!
//! The suspension and backpressure contract every readable entity
//! implements: validate a window, then deliver it as an ordered sequence of
//! pulled chunks with end and error signals.
//!
//! ## Usage Example
//!
//! ```rust
//! use hexide_data::{DataSource, Document, Readable, Span};
//!
//! # async fn example() -> hexide_data::CoreResult<()> {
//! // Open a document over an in-memory source
//! let source = DataSource::buffer(&b"hello world"[..]);
//! let mut document = Document::from_source(source)?;
//!
//! // Splice five zero bytes in at position 5 without copying anything
//! document.insert_span(Span::fill(5, 0)?, 5)?;
//!
//! // Stream the edited contents back out
//! let bytes = document.read_all()?.collect().await?;
//! assert_eq!(bytes.len(), 16);
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency Model
//!
//! Chain and span logic is synchronous and CPU-only; all storage I/O is
//! asynchronous and suspends the caller. Reads are non-mutating and may be
//! interleaved freely, but mutating a chain while a stream created from it
//! is still being drained is not supported: the design assumes a single
//! logical writer serializes edits against reads.

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

mod chain;
mod document;
mod range;
mod result;
mod source;
mod span;
mod stream;

pub use self::chain::{Chain, ChainPosition};
pub use self::document::Document;
pub use self::range::Range;
pub use self::result::{CoreError, CoreResult};
pub use self::source::{BufferSource, DataSource, FileSource, FillSource, OpenMode, SharedSource};
pub use self::span::Span;
pub use self::stream::{MAX_CHUNK_SIZE, ReadStream, Readable};
