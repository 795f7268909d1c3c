// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

mod string_table;

pub use string_table::*;

use crate::ProfileError;
use std::hash::{BuildHasherDefault, Hash};
use std::num::NonZeroU32;

pub type SetHasher = BuildHasherDefault<rustc_hash::FxHasher>;

pub type FxHashMap<K, V> = std::collections::HashMap<K, V, SetHasher>;
pub type FxIndexMap<K, V> = indexmap::IndexMap<K, V, SetHasher>;
pub type FxIndexSet<K> = indexmap::IndexSet<K, SetHasher>;

pub trait Id: Copy + Eq + Hash {
    type RawId;

    /// Convert from a usize offset into an Id. Returns `None` if the offset
    /// cannot be represented by the Id.
    fn from_offset(offset: usize) -> Option<Self>;

    fn to_raw_id(&self) -> Self::RawId;
}

pub trait Item: Eq + Hash {
    /// The Id associated with this Item, e.g. LabelSet -> LabelSetId.
    type Id: Id;
}

/// Creates a non-zero, 32-bit unsigned id from the offset. It's guaranteed to
/// be the offset + 1, with guards to not overflow the size of u32.
///
/// This is useful because pprof functions may not have an id of zero, even
/// if it's the first item in the collection.
#[inline]
pub fn small_non_zero_pprof_id(offset: usize) -> Option<NonZeroU32> {
    let small: u32 = offset.try_into().ok()?;
    NonZeroU32::new(small.checked_add(1)?)
}

pub trait Dedup<T: Item> {
    /// Deduplicate the Item and return its associated Id. The collection
    /// is left unchanged if an error is returned.
    fn try_dedup(&mut self, item: T) -> Result<<T as Item>::Id, ProfileError>;
}

impl<T: Item> Dedup<T> for FxIndexSet<T> {
    fn try_dedup(&mut self, item: T) -> Result<<T as Item>::Id, ProfileError> {
        if let Some(offset) = self.get_index_of(&item) {
            return <T as Item>::Id::from_offset(offset).ok_or(ProfileError::StorageFull);
        }
        let id = <T as Item>::Id::from_offset(self.len()).ok_or(ProfileError::StorageFull)?;
        self.try_reserve(1)?;
        self.insert(item);
        Ok(id)
    }
}
