// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::collections::SetHasher;
use crate::ProfileError;
use exectrace_pprof_protobuf::{self as pprof, Record, NO_OPT_ZERO};
use indexmap::IndexMap;
use std::borrow::Cow;
use std::io::Write;

/// String table that interns strings to compact offsets. The empty string is
/// always at offset 0, so the offset of a string is also its position in the
/// emitted `Profile.string_table`. Uses `Cow<'a, str>` so callers can pass
/// either strings borrowed from the trace or owned strings, like formatted
/// goroutine ids.
pub struct StringTable<'a> {
    // Using a Map with () as the value for the sake of using the entry API,
    // which is absent on the Set version.
    map: IndexMap<Cow<'a, str>, (), SetHasher>,
}

impl<'a> StringTable<'a> {
    pub fn new() -> Result<Self, ProfileError> {
        Self::with_capacity(0)
    }

    pub fn with_capacity(cap: usize) -> Result<Self, ProfileError> {
        let mut map = IndexMap::with_hasher(SetHasher::default());
        map.try_reserve(cap.max(1))?;
        map.insert(Cow::Borrowed(""), ());
        Ok(Self { map })
    }

    /// Returns the offset of the string, adding it to the table if this is
    /// its first occurrence.
    pub fn intern<S: Into<Cow<'a, str>>>(
        &mut self,
        s: S,
    ) -> Result<pprof::StringOffset, ProfileError> {
        let cow: Cow<'a, str> = s.into();
        if let Some(index) = self.map.get_index_of(cow.as_ref()) {
            return Ok(pprof::StringOffset::try_from(index)?);
        }
        let offset = pprof::StringOffset::try_from(self.map.len())?;
        self.map.try_reserve(1)?;
        self.map.insert(cow, ());
        Ok(offset)
    }

    /// The number of strings in the table, including the empty string.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Always false, the empty string is always present.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn get(&self, offset: pprof::StringOffset) -> Option<&str> {
        self.map
            .get_index(usize::from(offset))
            .map(|(s, _)| s.as_ref())
    }

    /// Iterates the strings in offset order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(Cow::as_ref)
    }

    /// Writes every string as a `Profile.string_table` entry, in offset
    /// order. The empty string is written too.
    pub fn encode<W: Write>(&self, writer: &mut W) -> Result<(), ProfileError> {
        for s in self.iter() {
            Record::<&str, 6, NO_OPT_ZERO>::from(s).encode(writer)?;
        }
        Ok(())
    }
}
