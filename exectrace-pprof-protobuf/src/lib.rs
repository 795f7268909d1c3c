// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

//! This crate implements Protobuf serializers for the subset of [`profiles`]
//! that execution-trace CPU profiles need, plus two extensions:
//!
//! - [Function]
//! - [Label] and [LabelSet] (extension, `Profile.label_set = 16`)
//! - [Location] and [Line]
//! - [Mapping]
//! - [Sample] and [Breakdown] (extension, `Sample.breakdown = 4`)
//! - [ValueType]
//!
//! Serialization often happens one byte at a time, so a buffered writer
//! should probably be used.
//!
//! There is no serializer for Profile. The string table can only be known
//! after every other message has been written, so the profile is streamed
//! one top-level record at a time instead.
//!
//! Indices into the string table are represented by [StringOffset], which uses
//! a 32-bit number. ID fields are still 64-bit, so the user can control their
//! values, e.g. a location may use its program counter as its id.
//!
//! [`profiles`]: https://github.com/google/pprof/blob/main/proto/profile.proto

/// Implements [`Value`] for a message whose fields are all [`Record`]s,
/// writing them in the order listed. The message's `Default` must be its
/// zero representation, as [`Value`] requires.
macro_rules! impl_message {
    ($message:ident $(<$lt:lifetime>)? { $($field:ident),+ $(,)? }) => {
        unsafe impl$(<$lt>)? $crate::Value for $message$(<$lt>)? {
            const WIRE_TYPE: $crate::WireType = $crate::WireType::LengthDelimited;

            fn proto_len(&self) -> u64 {
                0 $(+ self.$field.proto_len())+
            }

            fn encode<W: ::std::io::Write>(&self, writer: &mut W) -> ::std::io::Result<()> {
                $(self.$field.encode(writer)?;)+
                Ok(())
            }
        }
    };
}

mod function;
mod label;
mod label_set;
mod location;
mod mapping;
mod sample;
mod string;
mod value_type;
mod varint;

#[cfg(feature = "prost_impls")]
pub mod prost_impls;

pub use function::*;
pub use label::*;
pub use label_set::*;
pub use location::*;
pub use mapping::*;
pub use sample::*;
pub use string::*;
pub use value_type::*;
pub use varint::Varint;

use std::fmt::{Debug, Formatter};
use std::io::{self, Write};

/// A record of a given type, field number, and whether to perform the
/// zero-size optimization or not.
#[derive(Copy, Clone, Default, Eq, Hash, PartialEq)]
#[repr(transparent)]
#[cfg_attr(test, derive(bolero::generator::TypeGenerator))]
pub struct Record<T: Value, const N: u32, const O: bool> {
    pub value: T,
}

/// Represents the wire type for the in-wire protobuf encoding. There are more
/// types than are represented here; these are just the supported ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum WireType {
    Varint = 0,
    LengthDelimited = 2,
}

/// A value is stored differently depending on the wire_type.
///
/// # Safety
/// The Default implementation must return the zero-representation of the
/// value, because the zero-size optimization compares against it.
pub unsafe trait Value: Default + Eq {
    /// The wire type this value uses.
    const WIRE_TYPE: WireType;

    /// The number of bytes it takes to encode this value.
    fn proto_len(&self) -> u64;

    /// Encode the value to the in-wire protobuf format.
    ///
    /// Serialization often happens one byte at a time, so a buffered writer
    /// should probably be used.
    fn encode<W: Write>(&self, writer: &mut W) -> io::Result<()>;
}

/// Intended to be provided to a Record to mean that it _should_ optimize for
/// a value of zero. See also [`NO_OPT_ZERO`].
pub const OPT_ZERO: bool = true;

/// Intended to be provided to a Record to mean that it shouldn't optimize for
/// a value of zero. Should be used on fields that should not be zero, such as
/// Mapping.id, and on every string table entry.
pub const NO_OPT_ZERO: bool = false;

impl<T: Value, const N: u32, const O: bool> From<T> for Record<T, N, O> {
    fn from(value: T) -> Self {
        Record { value }
    }
}

impl<T: Value, const N: u32, const O: bool> Record<T, N, O> {
    #[inline]
    pub fn proto_len(&self) -> u64 {
        if O && self.value == T::default() {
            return 0;
        }
        let proto_len = self.value.proto_len();
        let len = if T::WIRE_TYPE == WireType::LengthDelimited {
            varint::proto_len(proto_len)
        } else {
            0
        };
        let tag = Tag::new(N, T::WIRE_TYPE).proto_len();
        tag + len + proto_len
    }

    pub fn encode<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        if O && self.value == T::default() {
            return Ok(());
        }
        Tag::new(N, T::WIRE_TYPE).encode(writer)?;
        if T::WIRE_TYPE == WireType::LengthDelimited {
            varint::encode(self.value.proto_len(), writer)?;
        }
        self.value.encode(writer)
    }
}

impl<T: Debug + Value, const N: u32, const O: bool> Debug for Record<T, N, O> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Record")
            .field("value", &self.value)
            .field("number", &N)
            .field("optimize_for_zero", &O)
            .finish()
    }
}

/// The smallest possible protobuf field number.
const MIN_FIELD: u32 = 1;

/// The largest possible protobuf field number.
const MAX_FIELD: u32 = (1 << 29) - 1;

/// A tag is a combination of a wire_type, stored in the least significant
/// three bits, and the field number that is defined in the .proto file.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Tag(u32);

impl Tag {
    #[cfg_attr(debug_assertions, track_caller)]
    #[inline]
    pub const fn new(field: u32, wire_type: WireType) -> Self {
        debug_assert!(field >= MIN_FIELD && field <= MAX_FIELD);
        Self((field << 3) | wire_type as u32)
    }

    #[inline]
    pub fn proto_len(self) -> u64 {
        varint::proto_len(u64::from(self.0))
    }

    #[inline]
    pub fn encode<W: Write>(self, writer: &mut W) -> io::Result<()> {
        varint::encode(u64::from(self.0), writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_layout() {
        // Profile.string_table = 6, length-delimited.
        assert_eq!(Tag(0x32), Tag::new(6, WireType::LengthDelimited));
        // Profile.label_set = 16 needs a two-byte key.
        assert_eq!(2, Tag::new(16, WireType::LengthDelimited).proto_len());
        assert_eq!(1, Tag::new(15, WireType::Varint).proto_len());
    }

    #[test]
    fn zero_size_optimization() {
        let mut buffer = Vec::new();
        Record::<i64, 9, OPT_ZERO>::from(0).encode(&mut buffer).unwrap();
        assert!(buffer.is_empty());
        assert_eq!(0, Record::<i64, 9, OPT_ZERO>::from(0).proto_len());

        Record::<u64, 1, NO_OPT_ZERO>::from(0).encode(&mut buffer).unwrap();
        assert_eq!(&[0x08, 0x00], buffer.as_slice());
    }

    #[test]
    fn empty_string_is_written_when_not_optimized() {
        let mut buffer = Vec::new();
        let record = Record::<&str, 6, NO_OPT_ZERO>::from("");
        record.encode(&mut buffer).unwrap();
        assert_eq!(&[0x32, 0x00], buffer.as_slice());
        assert_eq!(buffer.len() as u64, record.proto_len());
    }

    #[test]
    fn proto_len_matches_encoding() {
        bolero::check!()
            .with_type::<(u64, i64)>()
            .for_each(|(a, b)| {
                let mut buffer = Vec::new();
                let first = Record::<u64, 3, OPT_ZERO>::from(*a);
                let second = Record::<i64, 12, NO_OPT_ZERO>::from(*b);
                first.encode(&mut buffer).unwrap();
                second.encode(&mut buffer).unwrap();
                assert_eq!(buffer.len() as u64, first.proto_len() + second.proto_len());
            });
    }
}
