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

//! # Data Sources
//!
//! A [`DataSource`] is a byte-addressable backing store. Three variants are
//! supported, modelled as one closed enum so every dispatch site is
//! exhaustiveness-checked:
//!
//! - [`DataSource::buffer`]: an owned in-memory buffer,
//! - [`DataSource::fill`]: a repeating-byte generator, like `/dev/zero`
//!   initialized with an arbitrary octet,
//! - [`DataSource::open_file`]: a file on disk, read positionally off the
//!   async path.
//!
//! Sources are always handed around as [`SharedSource`]: a span never owns
//! its source exclusively, and a source lives as long as any span still
//! references it. Closing a source is a decision of whoever owns the
//! document lifecycle; it is idempotent and in-flight readers fail their
//! next read with an I/O error instead of crashing.

use crate::range::Range;
use crate::result::{CoreError, CoreResult};
use crate::stream::{ReadStream, Readable, Segment};
use bytes::{Bytes, BytesMut};
use std::collections::VecDeque;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use tracing::debug;

/// Shared handle to a data source. Many spans may reference the same
/// source concurrently.
pub type SharedSource = Arc<DataSource>;

/// Process-unique identity for anonymous (buffer and fill) sources, used
/// only in diagnostic URLs.
static NEXT_SOURCE_ID: AtomicU64 = AtomicU64::new(1);

fn next_source_id() -> u64 {
    NEXT_SOURCE_ID.fetch_add(1, Ordering::Relaxed)
}

/// Flags controlling how a file source is opened.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OpenMode {
    /// Open without write access; the source will refuse writes.
    pub read_only: bool,
    /// Create the file if it does not exist yet.
    pub create: bool,
    /// Require creating a new file; opening fails if the path exists.
    pub create_new: bool,
}

impl OpenMode {
    /// Read-only access to an existing file.
    pub const fn read() -> OpenMode {
        OpenMode {
            read_only: true,
            create: false,
            create_new: false,
        }
    }

    /// Read-write access to an existing file.
    pub const fn read_write() -> OpenMode {
        OpenMode {
            read_only: false,
            create: false,
            create_new: false,
        }
    }

    /// Read-write access, creating the file when it is missing.
    pub const fn read_write_create() -> OpenMode {
        OpenMode {
            read_only: false,
            create: true,
            create_new: false,
        }
    }

    fn validate(&self) -> CoreResult<()> {
        if self.read_only && (self.create || self.create_new) {
            return Err(CoreError::InvalidArguments(
                "cannot create a file that is opened read-only",
            ));
        }
        Ok(())
    }
}

/// Byte-addressable backing store behind spans and documents.
pub enum DataSource {
    /// Owned in-memory buffer.
    Buffer(BufferSource),
    /// Repeating-byte generator of a declared size.
    Fill(FillSource),
    /// File on disk with a cached length.
    File(FileSource),
}

/// In-memory buffer source. Writes are in-place; the buffer cannot grow.
pub struct BufferSource {
    id: u64,
    bytes: RwLock<BytesMut>,
}

/// Repeating-byte source. Reads synthesize the requested bytes, there is
/// no underlying storage I/O.
pub struct FillSource {
    id: u64,
    fill_byte: u8,
    fill_size: u64,
}

/// File-backed source. The handle is shared by every in-flight read
/// stream; positional reads seek and read under the lock on the blocking
/// thread pool, so interleaved readers cannot race the cursor.
pub struct FileSource {
    path: PathBuf,
    writeable: bool,
    handle: Arc<Mutex<Option<File>>>,
    length: AtomicU64,
}

impl DataSource {
    /// Creates a source owning the given bytes.
    pub fn buffer(bytes: impl Into<BytesMut>) -> SharedSource {
        Arc::new(DataSource::Buffer(BufferSource {
            id: next_source_id(),
            bytes: RwLock::new(bytes.into()),
        }))
    }

    /// Creates a source yielding `fill_size` repetitions of `fill_byte`.
    pub fn fill(fill_size: u64, fill_byte: u8) -> SharedSource {
        Arc::new(DataSource::Fill(FillSource {
            id: next_source_id(),
            fill_byte,
            fill_size,
        }))
    }

    /// Opens a file source at `path` according to `mode`.
    ///
    /// Fails with [`CoreError::InvalidArguments`] on an illegal flag
    /// combination and with [`CoreError::Io`] when the file cannot be
    /// opened or stat-ed.
    pub async fn open_file(path: impl AsRef<Path>, mode: OpenMode) -> CoreResult<SharedSource> {
        mode.validate()?;
        let path = path.as_ref().to_path_buf();
        let open_path = path.clone();
        let opened = tokio::task::spawn_blocking(move || -> std::io::Result<(File, u64)> {
            let mut options = std::fs::OpenOptions::new();
            options.read(true).write(!mode.read_only);
            if mode.create_new {
                options.create_new(true);
            } else if mode.create {
                options.create(true);
            }
            let file = options.open(&open_path)?;
            let length = file.metadata()?.len();
            Ok((file, length))
        })
        .await
        .map_err(|err| CoreError::io("joining blocking open task", std::io::Error::other(err)))?;

        let (file, length) = opened
            .map_err(|err| CoreError::io(format!("opening file {}", path.display()), err))?;

        debug!("opened file source {} ({} bytes)", path.display(), length);
        Ok(Arc::new(DataSource::File(FileSource {
            path,
            writeable: !mode.read_only,
            handle: Arc::new(Mutex::new(Some(file))),
            length: AtomicU64::new(length),
        })))
    }

    /// Number of bytes addressable through this source.
    pub fn length(&self) -> u64 {
        match self {
            DataSource::Buffer(source) => source
                .bytes
                .read()
                .map(|bytes| bytes.len() as u64)
                .unwrap_or(0),
            DataSource::Fill(source) => source.fill_size,
            DataSource::File(source) => source.length.load(Ordering::Acquire),
        }
    }

    /// Checks if the source accepts writes.
    pub fn is_writeable(&self) -> bool {
        match self {
            DataSource::Buffer(_) => true,
            DataSource::Fill(_) => false,
            DataSource::File(source) => source.writeable,
        }
    }

    /// Diagnostic identifier of the source, for labelling only.
    pub fn url(&self) -> String {
        match self {
            DataSource::Buffer(source) => format!("buffer:#{}", source.id),
            DataSource::Fill(source) => format!("fill:#{}", source.id),
            DataSource::File(source) => format!("file://{}", source.path.display()),
        }
    }

    /// Writes `bytes` at `offset`.
    ///
    /// Fails with [`CoreError::Io`] if the source is not writeable and with
    /// [`CoreError::AccessRange`] when the write would exceed fixed bounds
    /// (a buffer cannot grow). A file may grow; its cached length is
    /// refreshed after the write.
    pub async fn write(&self, bytes: &[u8], offset: u64) -> CoreResult<()> {
        let write_range = Range::new(offset, bytes.len() as u64);
        if !write_range.is_valid() {
            return Err(CoreError::AccessRange);
        }
        match self {
            DataSource::Fill(_) => Err(self.read_only_error()),
            DataSource::File(source) if !source.writeable => Err(self.read_only_error()),
            DataSource::Buffer(source) => {
                let mut guard = source
                    .bytes
                    .write()
                    .map_err(|_| CoreError::ObjectInconsistency("buffer source lock poisoned"))?;
                if write_range.start() + write_range.size() > guard.len() as u64 {
                    return Err(CoreError::AccessRange);
                }
                let start = offset as usize;
                guard[start..start + bytes.len()].copy_from_slice(bytes);
                Ok(())
            }
            DataSource::File(source) => {
                let handle = Arc::clone(&source.handle);
                let payload = bytes.to_vec();
                let written =
                    tokio::task::spawn_blocking(move || -> std::io::Result<u64> {
                        let mut guard = handle
                            .lock()
                            .map_err(|_| std::io::Error::other("file source lock poisoned"))?;
                        let Some(file) = guard.as_mut() else {
                            return Err(std::io::Error::from(std::io::ErrorKind::NotConnected));
                        };
                        file.seek(SeekFrom::Start(offset))?;
                        file.write_all(&payload)?;
                        file.flush()?;
                        file.metadata().map(|meta| meta.len())
                    })
                    .await
                    .map_err(|err| {
                        CoreError::io("joining blocking write task", std::io::Error::other(err))
                    })?
                    .map_err(|err| {
                        CoreError::io(format!("writing to file {}", source.path.display()), err)
                    })?;
                source.length.store(written, Ordering::Release);
                Ok(())
            }
        }
    }

    fn read_only_error(&self) -> CoreError {
        CoreError::io(
            format!("writing to read-only source {}", self.url()),
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        )
    }

    /// Releases the underlying storage.
    ///
    /// Closing is idempotent. Streams still referencing a closed file
    /// source fail their next read with an I/O error; buffer and fill
    /// sources have nothing to release.
    pub fn close(&self) {
        if let DataSource::File(source) = self {
            let closed = source
                .handle
                .lock()
                .map(|mut guard| guard.take().is_some())
                .unwrap_or(false);
            if closed {
                debug!("closed file source {}", source.path.display());
            }
        }
    }
}

impl Readable for DataSource {
    fn length(&self) -> u64 {
        DataSource::length(self)
    }

    fn open_stream(&self, offset: u64, size: u64) -> CoreResult<ReadStream> {
        let avail = Range::to(self.length()).get_inside_size(Range::new(offset, size));
        let mut segments = VecDeque::new();
        if avail > 0 {
            match self {
                DataSource::Buffer(source) => {
                    let guard = source.bytes.read().map_err(|_| {
                        CoreError::ObjectInconsistency("buffer source lock poisoned")
                    })?;
                    let start = offset as usize;
                    let end = start + avail as usize;
                    segments.push_back(Segment::Memory(Bytes::copy_from_slice(
                        &guard[start..end],
                    )));
                }
                DataSource::Fill(source) => {
                    segments.push_back(Segment::Fill {
                        fill_byte: source.fill_byte,
                        remaining: avail,
                    });
                }
                DataSource::File(source) => {
                    segments.push_back(Segment::File {
                        handle: Arc::clone(&source.handle),
                        offset,
                        remaining: avail,
                    });
                }
            }
        }
        Ok(ReadStream::from_segments(segments))
    }
}

impl std::fmt::Debug for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataSource")
            .field("url", &self.url())
            .field("length", &self.length())
            .field("writeable", &self.is_writeable())
            .finish()
    }
}

/// Reads up to `size` bytes at `offset` from a shared file handle on the
/// blocking thread pool. Returns fewer bytes when the file ends early and
/// an empty buffer at end of file.
pub(crate) async fn read_file_chunk(
    handle: Arc<Mutex<Option<File>>>,
    offset: u64,
    size: usize,
) -> CoreResult<Bytes> {
    let chunk = tokio::task::spawn_blocking(move || -> std::io::Result<Bytes> {
        let mut guard = handle
            .lock()
            .map_err(|_| std::io::Error::other("file source lock poisoned"))?;
        let Some(file) = guard.as_mut() else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "file source is closed",
            ));
        };
        file.seek(SeekFrom::Start(offset))?;
        let mut buffer = vec![0u8; size];
        let mut filled = 0;
        while filled < size {
            let read = file.read(&mut buffer[filled..])?;
            if read == 0 {
                break;
            }
            filled += read;
        }
        buffer.truncate(filled);
        Ok(Bytes::from(buffer))
    })
    .await
    .map_err(|err| CoreError::io("joining blocking read task", std::io::Error::other(err)))?;

    chunk.map_err(|err| CoreError::io("reading from file source", err))
}
