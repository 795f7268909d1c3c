// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::borrow::Cow;
use std::collections::TryReserveError;
use std::io;
use std::num::TryFromIntError;

/// Represents errors that occur while encoding a profile.
///
/// Encoding is one-shot: after an error, any bytes already handed to the
/// writer are an incomplete artifact and should be discarded.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    /// The underlying writer rejected a write.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// A parameter was incorrect.
    #[error("invalid input: {0}")]
    InvalidInput(Cow<'static, str>),
    /// Failed to allocate memory needed for the operation.
    #[error("out of memory")]
    OutOfMemory,
    /// The underlying container or storage is full. This is different from
    /// out of memory, because it's caused by some other limitation, such as
    /// the size being limited to 32-bit, or the output buffer having reached
    /// its configured maximum size.
    #[error("storage full")]
    StorageFull,
    /// Some other error.
    #[error("{0}")]
    Other(Cow<'static, str>),
}

impl ProfileError {
    pub fn other(error: impl Into<Cow<'static, str>>) -> Self {
        Self::Other(error.into())
    }

    pub fn invalid_input(error: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidInput(error.into())
    }
}

impl From<TryReserveError> for ProfileError {
    #[cold]
    fn from(_: TryReserveError) -> Self {
        Self::OutOfMemory
    }
}

impl From<indexmap::TryReserveError> for ProfileError {
    #[cold]
    fn from(_: indexmap::TryReserveError) -> Self {
        Self::OutOfMemory
    }
}

impl From<TryFromIntError> for ProfileError {
    #[cold]
    fn from(_: TryFromIntError) -> Self {
        Self::StorageFull
    }
}
