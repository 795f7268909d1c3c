// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::collections::{Dedup, FxIndexSet, Id, Item};
use crate::ProfileError;
use std::borrow::Cow;
use std::fmt;

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Label {
    pub key: Cow<'static, str>,
    pub value: Cow<'static, str>,
}

impl Label {
    pub fn new(key: impl Into<Cow<'static, str>>, value: impl Into<Cow<'static, str>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// An ordered sequence of labels. Two sets are the same only if they hold
/// the same labels in the same order, compared key by key and value by value.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct LabelSet {
    labels: Box<[Label]>,
}

impl LabelSet {
    pub fn new(labels: impl Into<Box<[Label]>>) -> Self {
        Self {
            labels: labels.into(),
        }
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }
}

impl Item for LabelSet {
    type Id = LabelSetId;
}

/// Label set ids start at 0, unlike most pprof ids.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct LabelSetId(u32);

impl LabelSetId {
    pub const ZERO: Self = Self(0);
}

impl Id for LabelSetId {
    type RawId = u32;

    fn from_offset(offset: usize) -> Option<Self> {
        u32::try_from(offset).ok().map(Self)
    }

    fn to_raw_id(&self) -> u32 {
        self.0
    }
}

impl From<LabelSetId> for u64 {
    fn from(id: LabelSetId) -> Self {
        id.0.into()
    }
}

impl From<LabelSetId> for i64 {
    fn from(id: LabelSetId) -> Self {
        id.0.into()
    }
}

impl fmt::Display for LabelSetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Deduplicates the label sets of sample events, handing out dense ids in
/// first-encounter order.
#[derive(Debug, Default)]
pub struct LabelSetRegistry {
    sets: FxIndexSet<LabelSet>,
}

impl LabelSetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Result<Self, ProfileError> {
        let mut sets = FxIndexSet::default();
        sets.try_reserve(capacity)?;
        Ok(Self { sets })
    }

    pub fn dedup(&mut self, labels: impl Into<Box<[Label]>>) -> Result<LabelSetId, ProfileError> {
        self.sets.try_dedup(LabelSet::new(labels))
    }

    #[cfg(test)]
    pub fn get(&self, id: LabelSetId) -> Option<&LabelSet> {
        self.sets.get_index(id.to_raw_id() as usize)
    }

    /// Iterates the label sets in id order.
    pub fn iter(&self) -> impl Iterator<Item = (LabelSetId, &LabelSet)> {
        self.sets
            .iter()
            .enumerate()
            .map(|(offset, set)| (LabelSetId(offset as u32), set))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
