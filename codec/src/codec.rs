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

//! # Decode-Flow Engine
//!
//! A [`Codec`] turns a byte buffer or stream into a sequence of typed
//! [`DecodeResult`]s. Concrete codecs implement the one-unit primitive
//! [`Codec::decode_unit`]; the driving loop provided here owns the
//! recovery state machine:
//!
//! - a unit that fails to decode but advances the cursor is recorded and
//!   skipped, and decoding continues with the next unit,
//! - a unit that fails without advancing the cursor is unrecoverable: its
//!   error is recorded, a [`DecodeFailure::FlowStop`] result is appended
//!   and the loop halts,
//! - a codec that reports success without advancing, or that produces
//!   overlapping units, would loop forever; the engine appends a
//!   `FlowStop` result and halts instead of retrying,
//! - a codec that fails outright (instead of reporting through a result
//!   value) terminates the run with a single [`DecodeFailure::Fatal`]
//!   result.

use crate::result::{DecodeFailure, DecodeResult};
use bytes::BytesMut;
use hexide_data::{CoreError, CoreResult, ReadStream};
use tracing::warn;

/// How many value units a decode run should attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnitLimit {
    /// Decode at most this many units. If data runs out before the count
    /// is reached, a trailing [`DecodeFailure::NoEnoughData`] result is
    /// appended.
    Count(u64),
    /// Decode every unit until the buffer is exhausted; a trailing
    /// partial unit is reported as [`DecodeFailure::NoEnoughData`].
    All,
    /// Decode as many complete units as fit; a trailing partial unit is
    /// ignored silently.
    Available,
}

impl UnitLimit {
    fn reports_no_enough_data(self) -> bool {
        !matches!(self, UnitLimit::Available)
    }

    fn allows(self, decoded: u64) -> bool {
        match self {
            UnitLimit::Count(count) => decoded < count,
            UnitLimit::All | UnitLimit::Available => true,
        }
    }
}

/// Cursor state shared between the decode loop and a codec's unit decoder.
///
/// A unit decoder reads from [`DecodeContext::remaining`] and moves the
/// cursor forward with [`DecodeContext::advance`]; it must not touch the
/// bytes behind the cursor.
pub struct DecodeContext<'a> {
    buffer: &'a [u8],
    offset: usize,
    prev_offset: usize,
}

impl<'a> DecodeContext<'a> {
    fn new(buffer: &'a [u8], offset: usize) -> DecodeContext<'a> {
        DecodeContext {
            buffer,
            offset,
            // primed with the start offset so the no-advance guard holds
            // from the first unit on
            prev_offset: offset,
        }
    }

    /// The whole input buffer.
    pub fn buffer(&self) -> &[u8] {
        self.buffer
    }

    /// Current cursor position inside the buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The bytes from the cursor to the end of the buffer.
    pub fn remaining(&self) -> &[u8] {
        &self.buffer[self.offset..]
    }

    /// Moves the cursor forward by `count` bytes, saturating at the end of
    /// the buffer.
    pub fn advance(&mut self, count: usize) {
        self.offset = self.offset.saturating_add(count).min(self.buffer.len());
    }
}

/// A codec extracts typed values from their binary representation.
///
/// A *value unit* is the binary representation of one value in the input;
/// the engine walks the input unit by unit. Implementations provide the
/// fixed metadata and [`Codec::decode_unit`]; the decode loops come for
/// free.
///
/// Codecs signal per-unit problems through the `error` field of the
/// returned [`DecodeResult`], not through `Err`: an `Err` escaping
/// `decode_unit` is treated as fatal for the whole decode run.
#[allow(async_fn_in_trait)]
pub trait Codec {
    /// The type of value one unit decodes into.
    type Value;

    /// Unique human-readable name of this codec configuration.
    fn name(&self) -> String;

    /// True if every valid value unit has a binary representation of the
    /// same size.
    fn is_fixed_size(&self) -> bool;

    /// Number of bytes in one unit, when the codec is fixed-size.
    fn unit_size(&self) -> Option<u64>;

    /// Decodes one value unit at the context cursor and advances the
    /// cursor past it. The engine guarantees at least one byte is
    /// available, and a full unit for fixed-size codecs.
    fn decode_unit(
        &self,
        context: &mut DecodeContext<'_>,
    ) -> CoreResult<DecodeResult<Self::Value>>;

    /// Decodes value units from `input`, starting at `input_offset`.
    ///
    /// The number of attempted units and the handling of a trailing
    /// partial unit are controlled by `limit`; see [`UnitLimit`].
    /// Regardless of the limit, decoding tries to recover and continue
    /// after a bad unit. When recovery is impossible the result sequence
    /// ends with a [`DecodeFailure::FlowStop`] entry.
    ///
    /// Fails with [`CoreError::InvalidArguments`] when `input` is empty or
    /// `input_offset` is at or past its end.
    fn decode_from_buffer(
        &self,
        input: &[u8],
        input_offset: usize,
        limit: UnitLimit,
    ) -> CoreResult<Vec<DecodeResult<Self::Value>>> {
        if input.is_empty() {
            return Err(CoreError::InvalidArguments("decode input buffer is empty"));
        }
        if input_offset >= input.len() {
            return Err(CoreError::InvalidArguments(
                "decode offset is at or past the end of the input",
            ));
        }

        let mut context = DecodeContext::new(input, input_offset);
        let mut results = Vec::new();
        let mut decoded: u64 = 0;
        while limit.allows(decoded) {
            if !process_unit(self, &mut context, limit, &mut results) {
                break;
            }
            decoded += 1;
            context.prev_offset = context.offset;
        }
        Ok(results)
    }

    /// Acts as [`Codec::decode_from_buffer`], but takes the bytes from a
    /// stream.
    ///
    /// Chunks are accumulated until the stream ends. For a fixed-size
    /// codec with `UnitLimit::Count`, decoding short-circuits as soon as
    /// enough bytes for the requested units have arrived, without waiting
    /// for the end of the stream.
    async fn decode(
        &self,
        mut stream: ReadStream,
        limit: UnitLimit,
    ) -> CoreResult<Vec<DecodeResult<Self::Value>>> {
        let mut accumulated = BytesMut::new();

        if let (Some(unit_size), UnitLimit::Count(count)) = (self.unit_size(), limit) {
            if self.is_fixed_size() {
                let wait_size = (unit_size as usize).saturating_mul(count as usize);
                while let Some(chunk) = stream.next_chunk().await? {
                    accumulated.extend_from_slice(&chunk);
                    if accumulated.len() >= wait_size {
                        // enough data arrived, decode it now
                        return self.decode_from_buffer(&accumulated, 0, limit);
                    }
                }
                return self.decode_from_buffer(&accumulated, 0, limit);
            }
        }

        while let Some(chunk) = stream.next_chunk().await? {
            accumulated.extend_from_slice(&chunk);
        }
        self.decode_from_buffer(&accumulated, 0, limit)
    }
}

/// Processes one unit: decodes it, applies the recovery policy and pushes
/// the produced results. Returns false when the loop must stop.
fn process_unit<C>(
    codec: &C,
    context: &mut DecodeContext<'_>,
    limit: UnitLimit,
    results: &mut Vec<DecodeResult<C::Value>>,
) -> bool
where
    C: Codec + ?Sized,
{
    let octets_left = (context.buffer.len() - context.offset) as u64;
    if octets_left == 0 {
        return false;
    }

    if codec.is_fixed_size() {
        if let Some(unit_size) = codec.unit_size() {
            if octets_left < unit_size {
                // not enough data left for one more unit
                if limit.reports_no_enough_data() {
                    results.push(DecodeResult::failure(
                        DecodeFailure::NoEnoughData,
                        context.offset as u64,
                        octets_left,
                    ));
                }
                return false;
            }
        }
    }

    let unit = match codec.decode_unit(context) {
        Ok(unit) => unit,
        Err(err) => {
            // codecs indicate problems through result values; a failure
            // escaping the unit decoder is terminal for this run
            warn!("codec {} failed while decoding a unit: {}", codec.name(), err);
            results.push(DecodeResult::failure(
                DecodeFailure::Fatal(err.to_string()),
                context.offset as u64,
                0,
            ));
            return false;
        }
    };

    if let Some(DecodeFailure::NoEnoughData) = unit.error {
        let mut unit = unit;
        if unit.binary_length != octets_left {
            warn!("incorrect binary length reported by codec {}", codec.name());
            unit.binary_length = octets_left;
        }
        if limit.reports_no_enough_data() {
            results.push(unit);
        }
        return false;
    }

    if (context.offset as u64) < context.prev_offset as u64 + unit.binary_length {
        // units must not overlap, although octets may be skipped
        warn!("codec {} produced overlapping value units", codec.name());
        results.push(DecodeResult::failure(
            DecodeFailure::FlowStop,
            context.prev_offset as u64,
            0,
        ));
        return false;
    }

    match unit.error {
        Some(_) => {
            if context.prev_offset >= context.offset {
                // the cursor did not move past the bad unit, no recovery
                let stop_offset = context.prev_offset as u64 + unit.binary_length;
                results.push(unit);
                results.push(DecodeResult::failure(DecodeFailure::FlowStop, stop_offset, 0));
                false
            } else {
                // skip the bad unit and keep going
                results.push(unit);
                true
            }
        }
        None => {
            if context.offset <= context.prev_offset {
                warn!("codec {} is stuck, stopping the decode flow", codec.name());
                results.push(DecodeResult::failure(
                    DecodeFailure::FlowStop,
                    context.prev_offset as u64,
                    0,
                ));
                false
            } else {
                results.push(unit);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexide_data::{DataSource, Readable};
    use tracing_test::traced_test;

    /// Decodes one byte per unit, flagging `0xFF` bytes as invalid but
    /// still advancing past them.
    struct ByteCodec;

    impl Codec for ByteCodec {
        type Value = u8;

        fn name(&self) -> String {
            "test_byte".to_string()
        }

        fn is_fixed_size(&self) -> bool {
            true
        }

        fn unit_size(&self) -> Option<u64> {
            Some(1)
        }

        fn decode_unit(
            &self,
            context: &mut DecodeContext<'_>,
        ) -> CoreResult<DecodeResult<u8>> {
            let offset = context.offset() as u64;
            let byte = context.remaining()[0];
            context.advance(1);
            if byte == 0xFF {
                Ok(DecodeResult::failure(
                    DecodeFailure::Invalid("reserved byte".into()),
                    offset,
                    1,
                ))
            } else {
                Ok(DecodeResult::value(byte, offset, 1))
            }
        }
    }

    /// Reports success without ever advancing the cursor.
    struct StuckCodec;

    impl Codec for StuckCodec {
        type Value = u8;

        fn name(&self) -> String {
            "test_stuck".to_string()
        }

        fn is_fixed_size(&self) -> bool {
            false
        }

        fn unit_size(&self) -> Option<u64> {
            None
        }

        fn decode_unit(
            &self,
            context: &mut DecodeContext<'_>,
        ) -> CoreResult<DecodeResult<u8>> {
            Ok(DecodeResult::value(0, context.offset() as u64, 0))
        }
    }

    /// Reports a recoverable error without advancing the cursor.
    struct StuckErrorCodec;

    impl Codec for StuckErrorCodec {
        type Value = u8;

        fn name(&self) -> String {
            "test_stuck_error".to_string()
        }

        fn is_fixed_size(&self) -> bool {
            false
        }

        fn unit_size(&self) -> Option<u64> {
            None
        }

        fn decode_unit(
            &self,
            context: &mut DecodeContext<'_>,
        ) -> CoreResult<DecodeResult<u8>> {
            Ok(DecodeResult::failure(
                DecodeFailure::Invalid("cannot make sense of this".into()),
                context.offset() as u64,
                0,
            ))
        }
    }

    /// Fails outright instead of reporting through a result value.
    struct FailingCodec;

    impl Codec for FailingCodec {
        type Value = u8;

        fn name(&self) -> String {
            "test_failing".to_string()
        }

        fn is_fixed_size(&self) -> bool {
            true
        }

        fn unit_size(&self) -> Option<u64> {
            Some(1)
        }

        fn decode_unit(
            &self,
            _context: &mut DecodeContext<'_>,
        ) -> CoreResult<DecodeResult<u8>> {
            Err(CoreError::NotImplemented("always fails"))
        }
    }

    #[test]
    fn test_decodes_all_units() {
        let results = ByteCodec
            .decode_from_buffer(b"abc", 0, UnitLimit::All)
            .unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].value, Some(b'a'));
        assert_eq!(results[1].offset, 1);
        assert!(results.iter().all(DecodeResult::is_ok));
    }

    #[test]
    fn test_count_limit_stops_early() {
        let results = ByteCodec
            .decode_from_buffer(b"abcdef", 0, UnitLimit::Count(2))
            .unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_rejects_empty_input() {
        assert!(matches!(
            ByteCodec.decode_from_buffer(b"", 0, UnitLimit::All),
            Err(CoreError::InvalidArguments(_))
        ));
    }

    #[test]
    fn test_rejects_offset_past_end() {
        assert!(matches!(
            ByteCodec.decode_from_buffer(b"abc", 3, UnitLimit::All),
            Err(CoreError::InvalidArguments(_))
        ));
    }

    #[test]
    fn test_recovers_after_bad_unit() {
        let results = ByteCodec
            .decode_from_buffer(&[b'a', 0xFF, b'b'], 0, UnitLimit::All)
            .unwrap();
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert_eq!(
            results[1].error,
            Some(DecodeFailure::Invalid("reserved byte".into()))
        );
        assert_eq!(results[2].value, Some(b'b'));
    }

    #[traced_test]
    #[test]
    fn test_stuck_codec_stops_the_flow() {
        let results = StuckCodec
            .decode_from_buffer(b"abc", 0, UnitLimit::All)
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].error, Some(DecodeFailure::FlowStop));
        assert!(logs_contain("is stuck"));
    }

    #[test]
    fn test_stuck_error_codec_reports_error_then_flow_stop() {
        let results = StuckErrorCodec
            .decode_from_buffer(b"abc", 0, UnitLimit::All)
            .unwrap();
        assert_eq!(results.len(), 2);
        assert!(matches!(
            results[0].error,
            Some(DecodeFailure::Invalid(_))
        ));
        assert_eq!(results[1].error, Some(DecodeFailure::FlowStop));
    }

    #[test]
    fn test_failing_codec_is_fatal() {
        let results = FailingCodec
            .decode_from_buffer(b"abc", 0, UnitLimit::All)
            .unwrap();
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0].error, Some(DecodeFailure::Fatal(_))));
    }

    #[tokio::test]
    async fn test_stream_decode_matches_buffer_decode() {
        let source = DataSource::buffer(&b"abcdef"[..]);
        let stream = source.read_all().unwrap();
        let streamed = ByteCodec.decode(stream, UnitLimit::All).await.unwrap();
        let buffered = ByteCodec
            .decode_from_buffer(b"abcdef", 0, UnitLimit::All)
            .unwrap();
        assert_eq!(streamed, buffered);
    }

    #[tokio::test]
    async fn test_stream_decode_short_circuits_on_count() {
        // one oversized chunk crossing the threshold decodes early and
        // still resolves correctly
        let source = DataSource::buffer(&b"abcdef"[..]);
        let stream = source.read_all().unwrap();
        let results = ByteCodec.decode(stream, UnitLimit::Count(2)).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].value, Some(b'a'));
        assert_eq!(results[1].value, Some(b'b'));
    }
}
