// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::ProfileError;
use exectrace_pprof_protobuf::{Record, Value};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{self, Write};

/// The default limit on the size of a compressed profile.
pub const DEFAULT_MAX_COMPRESSED_SIZE: usize = 64 * 1024 * 1024;

/// This type wraps a [`Vec`] to provide a [`Write`] interface that has a max
/// capacity that won't be exceeded. Additionally, it gracefully handles
/// out-of-memory conditions instead of panicking.
#[derive(Debug)]
pub struct SizeRestrictedBuffer {
    vec: Vec<u8>,
    max_capacity: usize,
}

impl SizeRestrictedBuffer {
    pub fn new(max_capacity: usize) -> Self {
        let mut vec = Vec::new();

        // Use about 1/4 of the requested capacity as the initial size, but
        // no more than 2 MiB to begin with. Very large limits are usually
        // upload limits, and don't make for good size hints.
        const MIB: usize = 1024 * 1024;
        let initial_capacity = (max_capacity >> 2).min(2 * MIB).next_power_of_two();

        // If this fails, then later writes will report it.
        _ = vec.try_reserve(initial_capacity);
        SizeRestrictedBuffer { vec, max_capacity }
    }

    pub fn as_slice(&self) -> &[u8] {
        self.vec.as_slice()
    }

    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }
}

impl From<SizeRestrictedBuffer> for Vec<u8> {
    fn from(buf: SizeRestrictedBuffer) -> Self {
        buf.vec
    }
}

impl Write for SizeRestrictedBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let additional = buf.len();
        if additional <= self.max_capacity.wrapping_sub(self.vec.len()) {
            self.vec.try_reserve(additional)?;
            self.vec.extend_from_slice(buf);
            Ok(additional)
        } else {
            Err(io::ErrorKind::StorageFull.into())
        }
    }

    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Gzip-compresses a profile as it's being written, into a buffer of bounded
/// size.
#[derive(Debug)]
pub struct Compressor {
    encoder: GzEncoder<SizeRestrictedBuffer>,
}

impl Compressor {
    /// Creates a new compressor with the given max capacity for the output
    /// buffer. This capacity is for after compression, not the input.
    pub fn with_max_capacity(max_capacity: usize) -> Compressor {
        Compressor {
            encoder: GzEncoder::new(SizeRestrictedBuffer::new(max_capacity), Compression::fast()),
        }
    }

    /// Encodes the record.
    ///
    /// # Errors
    ///
    /// Fails if the output buffer is full.
    pub fn encode<P: Value, const F: u32, const O: bool>(
        &mut self,
        data: Record<P, F, O>,
    ) -> Result<(), ProfileError> {
        data.encode(&mut self.encoder).map_err(map_io_error)
    }

    /// Finish the compression, and return the compressed data.
    ///
    /// # Errors
    ///
    /// Fails if the gzip trailer doesn't fit in the output buffer.
    pub fn finish(self) -> Result<Vec<u8>, ProfileError> {
        let buffer = self.encoder.finish().map_err(map_io_error)?;
        Ok(buffer.into())
    }
}

impl Write for Compressor {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.encoder.write(buf)
    }

    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        self.encoder.flush()
    }
}

/// The buffer reports its limit as an io error; callers get the dedicated
/// variant instead.
pub(crate) fn map_io_error(err: io::Error) -> ProfileError {
    match err.kind() {
        io::ErrorKind::StorageFull => ProfileError::StorageFull,
        io::ErrorKind::OutOfMemory => ProfileError::OutOfMemory,
        _ => ProfileError::Io(err),
    }
}
