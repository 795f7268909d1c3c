// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::{Value, WireType};
use std::io::{self, Write};

/// The number of bytes needed to encode the value as a [`varint`].
///
/// [`varint`]: https://protobuf.dev/programming-guides/encoding/#varints
#[inline]
pub const fn proto_len(value: u64) -> u64 {
    // https://github.com/google/protobuf/blob/3.3.x/src/google/protobuf/io/coded_stream.h#L1301-L1309
    ((((value | 1).leading_zeros() ^ 63) * 9 + 73) / 64) as u64
}

/// Encodes a [`varint`] according to protobuf semantics.
///
/// Serialization happens one byte at a time; use a buffered writer.
///
/// [`varint`]: https://protobuf.dev/programming-guides/encoding/#varints
#[inline]
pub fn encode<W: Write>(mut value: u64, writer: &mut W) -> io::Result<()> {
    loop {
        let byte = if value < 0x80 {
            value as u8
        } else {
            ((value & 0x7F) | 0x80) as u8
        };
        writer.write_all(&[byte])?;
        if value < 0x80 {
            return Ok(());
        }
        value >>= 7;
    }
}

/// You can use varint to store any of the listed data types:
/// int32 | int64 | uint32 | uint64 | bool | enum | sint32 | sint64
///
/// # Safety
///
/// The [`Value::WIRE_TYPE`] must be [`WireType::Varint`]!
pub unsafe trait Varint: Value + Sized {}

unsafe impl Value for u64 {
    const WIRE_TYPE: WireType = WireType::Varint;

    fn proto_len(&self) -> u64 {
        proto_len(*self)
    }

    fn encode<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        encode(*self, writer)
    }
}

/// Negative numbers take the full ten bytes, matching protobuf's `int64`.
unsafe impl Value for i64 {
    const WIRE_TYPE: WireType = WireType::Varint;

    fn proto_len(&self) -> u64 {
        proto_len(*self as u64)
    }

    fn encode<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        encode(*self as u64, writer)
    }
}

unsafe impl Varint for u64 {}
unsafe impl Varint for i64 {}

/// Packed repeated varints. The zero-size optimization treats an empty slice
/// as the zero value.
unsafe impl<T: Varint> Value for &'_ [T] {
    const WIRE_TYPE: WireType = WireType::LengthDelimited;

    fn proto_len(&self) -> u64 {
        self.iter().map(Value::proto_len).sum()
    }

    fn encode<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for value in self.iter() {
            value.encode(writer)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Record, NO_OPT_ZERO};

    #[test]
    fn test_varint_range() {
        assert_eq!(proto_len(0), 1);
        assert_eq!(proto_len(0x7F), 1);
        assert_eq!(proto_len(0x80), 2);
        assert_eq!(proto_len(u64::MAX), 10);
        assert_eq!((-1i64).proto_len(), 10);
    }

    #[test]
    fn test_varint_bytes() {
        let mut buffer = Vec::new();
        encode(300, &mut buffer).unwrap();
        assert_eq!(&[0xAC, 0x02], buffer.as_slice());
    }

    #[test]
    fn test_packed() {
        let values: &[i64] = &[1, 150, 3];
        let mut buffer = Vec::new();
        Record::<&[i64], 2, NO_OPT_ZERO>::from(values)
            .encode(&mut buffer)
            .unwrap();
        // key, length, then 1, 150 (two bytes), 3.
        assert_eq!(&[0x12, 0x04, 0x01, 0x96, 0x01, 0x03], buffer.as_slice());
    }

    #[test]
    fn fuzz_proto_len() {
        bolero::check!().with_type::<u64>().for_each(|value| {
            let mut buffer = Vec::new();
            encode(*value, &mut buffer).unwrap();
            assert_eq!(buffer.len() as u64, proto_len(*value));
        });
    }
}
