// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::compressor::DEFAULT_MAX_COMPRESSED_SIZE;
use crate::ProfileError;

/// Capacity hints to minimize reallocations during interning and
/// deduplication, and the limit for compressed output.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EncoderOptions {
    pub reserve_strings: usize,
    pub reserve_functions: usize,
    pub reserve_locations: usize,
    pub reserve_label_sets: usize,
    pub reserve_samples: usize,
    /// The compressed profile may not be larger than this many bytes.
    pub max_compressed_size: usize,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        // These are using 7/8th of a power of 2 because that's the max load
        // factor for hash tables in the current implementation.
        Self {
            reserve_strings: 224,
            reserve_functions: 112,
            reserve_locations: 896,
            reserve_label_sets: 56,
            reserve_samples: 448,
            max_compressed_size: DEFAULT_MAX_COMPRESSED_SIZE,
        }
    }
}

impl EncoderOptions {
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.max_compressed_size == 0 {
            return Err(ProfileError::invalid_input(
                "max_compressed_size must be greater than zero",
            ));
        }
        Ok(())
    }
}
